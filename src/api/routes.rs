use axum::{routing::get, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::exercise_types::exercise_type_routes;
use super::health::health_check;
use super::training_blocks::training_block_routes;
use super::training_plans::training_plan_routes;
use super::users::user_routes;
use super::workouts::workout_routes;
use crate::config::AppConfig;
use crate::db::Database;
use crate::middleware::{cors_layer, with_security_headers};

pub fn create_routes(db: Database, config: &AppConfig) -> Router {
    let api = Router::new()
        .route("/api/health", get(health_check))
        .merge(user_routes(db.clone()))
        .merge(training_plan_routes(db.clone()))
        .merge(training_block_routes(db.clone()))
        .merge(exercise_type_routes(db.clone()))
        .merge(workout_routes(db));

    with_security_headers(api, config)
        .layer(cors_layer(config))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
