use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use super::{IdPath, JsonBody, QueryParams};
use crate::db::Database;
use crate::error::ApiResult;
use crate::models::validation::{decode_payload, require_fields};
use crate::models::{CreateTrainingPlan, TrainingPlan, UpdateTrainingPlan};
use crate::services::TrainingPlanService;

#[derive(Debug, Deserialize)]
pub struct PlanQuery {
    /// Restrict the listing to one user's plans
    pub user_id: Option<i64>,
}

pub fn training_plan_routes(db: Database) -> Router {
    Router::new()
        .route("/api/training-plans", get(list_plans).post(create_plan))
        .route(
            "/api/training-plans/:id",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
        .with_state(TrainingPlanService::new(db))
}

#[tracing::instrument(skip(service))]
async fn list_plans(
    State(service): State<TrainingPlanService>,
    WithRejection(Query(query), _): QueryParams<PlanQuery>,
) -> ApiResult<Json<Vec<TrainingPlan>>> {
    let plans = service.list_plans(query.user_id).await?;
    Ok(Json(plans))
}

#[tracing::instrument(skip(service, payload))]
async fn create_plan(
    State(service): State<TrainingPlanService>,
    WithRejection(Json(payload), _): JsonBody,
) -> ApiResult<(StatusCode, Json<TrainingPlan>)> {
    require_fields(&payload, &["user_id", "name"])?;
    let request: CreateTrainingPlan = decode_payload(payload)?;

    let plan = service.create_plan(request).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[tracing::instrument(skip(service))]
async fn get_plan(
    State(service): State<TrainingPlanService>,
    WithRejection(Path(plan_id), _): IdPath,
) -> ApiResult<Json<TrainingPlan>> {
    let plan = service.get_plan(plan_id).await?;
    Ok(Json(plan))
}

#[tracing::instrument(skip(service, payload))]
async fn update_plan(
    State(service): State<TrainingPlanService>,
    WithRejection(Path(plan_id), _): IdPath,
    WithRejection(Json(payload), _): JsonBody,
) -> ApiResult<Json<TrainingPlan>> {
    let patch: UpdateTrainingPlan = decode_payload(payload)?;

    let plan = service.update_plan(plan_id, patch).await?;
    Ok(Json(plan))
}

#[tracing::instrument(skip(service))]
async fn delete_plan(
    State(service): State<TrainingPlanService>,
    WithRejection(Path(plan_id), _): IdPath,
) -> ApiResult<StatusCode> {
    service.delete_plan(plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
