use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use axum_extra::extract::WithRejection;

use super::{IdPath, JsonBody};
use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use crate::models::validation::{decode_payload, require_fields};
use crate::models::{CreateUser, TrainingPlan, User};
use crate::services::UserService;

/// User routes. The `:user` segment is the access key, except on the
/// training-plans listing where it is the numeric user id.
pub fn user_routes(db: Database) -> Router {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/:user", get(get_user).delete(delete_user))
        .route("/api/users/:user/training-plans", get(get_user_training_plans))
        .with_state(UserService::new(db))
}

#[tracing::instrument(skip(service, payload))]
async fn create_user(
    State(service): State<UserService>,
    WithRejection(Json(payload), _): JsonBody,
) -> ApiResult<(StatusCode, Json<User>)> {
    require_fields(&payload, &["access_key", "nickname"])?;
    let request: CreateUser = decode_payload(payload)?;

    let user = service.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[tracing::instrument(skip(service, access_key))]
async fn get_user(
    State(service): State<UserService>,
    WithRejection(Path(access_key), _): WithRejection<Path<String>, ApiError>,
) -> ApiResult<Json<User>> {
    let user = service.get_user_by_access_key(&access_key).await?;
    Ok(Json(user))
}

#[tracing::instrument(skip(service, access_key))]
async fn delete_user(
    State(service): State<UserService>,
    WithRejection(Path(access_key), _): WithRejection<Path<String>, ApiError>,
) -> ApiResult<StatusCode> {
    service.delete_user(&access_key).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(service))]
async fn get_user_training_plans(
    State(service): State<UserService>,
    WithRejection(Path(user_id), _): IdPath,
) -> ApiResult<Json<Vec<TrainingPlan>>> {
    let plans = service.get_user_training_plans(user_id).await?;
    Ok(Json(plans))
}
