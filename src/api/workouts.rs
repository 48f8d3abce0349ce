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
use crate::error::{ApiError, ApiResult};
use crate::models::validation::{decode_payload, require_fields};
use crate::models::{CreateExerciseLog, CreateWorkout, ExerciseLog, UpdateWorkout, Workout};
use crate::services::WorkoutService;

#[derive(Debug, Deserialize)]
pub struct WorkoutQuery {
    pub block_id: Option<i64>,
}

pub fn workout_routes(db: Database) -> Router {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route("/api/workouts/block/:id", get(list_block_workouts))
        .route(
            "/api/workouts/:id",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
        .route(
            "/api/workouts/:id/exercises/:exercise_id/logs",
            get(list_logs).post(create_log),
        )
        .with_state(WorkoutService::new(db))
}

#[tracing::instrument(skip(service))]
async fn list_workouts(
    State(service): State<WorkoutService>,
    WithRejection(Query(query), _): QueryParams<WorkoutQuery>,
) -> ApiResult<Json<Vec<Workout>>> {
    let block_id = query
        .block_id
        .ok_or_else(|| ApiError::BadRequest("block_id query parameter is required".to_string()))?;

    let workouts = service.list_workouts(block_id).await?;
    Ok(Json(workouts))
}

#[tracing::instrument(skip(service))]
async fn list_block_workouts(
    State(service): State<WorkoutService>,
    WithRejection(Path(block_id), _): IdPath,
) -> ApiResult<Json<Vec<Workout>>> {
    let workouts = service.list_workouts(block_id).await?;
    Ok(Json(workouts))
}

#[tracing::instrument(skip(service, payload))]
async fn create_workout(
    State(service): State<WorkoutService>,
    WithRejection(Json(payload), _): JsonBody,
) -> ApiResult<(StatusCode, Json<Workout>)> {
    require_fields(
        &payload,
        &["block_id", "name", "planned_date", "sequence_order"],
    )?;
    let request: CreateWorkout = decode_payload(payload)?;

    let workout = service.create_workout(request).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

#[tracing::instrument(skip(service))]
async fn get_workout(
    State(service): State<WorkoutService>,
    WithRejection(Path(workout_id), _): IdPath,
) -> ApiResult<Json<Workout>> {
    let workout = service.get_workout(workout_id).await?;
    Ok(Json(workout))
}

#[tracing::instrument(skip(service, payload))]
async fn update_workout(
    State(service): State<WorkoutService>,
    WithRejection(Path(workout_id), _): IdPath,
    WithRejection(Json(payload), _): JsonBody,
) -> ApiResult<Json<Workout>> {
    let patch: UpdateWorkout = decode_payload(payload)?;

    let workout = service.update_workout(workout_id, patch).await?;
    Ok(Json(workout))
}

#[tracing::instrument(skip(service))]
async fn delete_workout(
    State(service): State<WorkoutService>,
    WithRejection(Path(workout_id), _): IdPath,
) -> ApiResult<StatusCode> {
    service.delete_workout(workout_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(service))]
async fn list_logs(
    State(service): State<WorkoutService>,
    WithRejection(Path((workout_id, exercise_id)), _): WithRejection<Path<(i64, i64)>, ApiError>,
) -> ApiResult<Json<Vec<ExerciseLog>>> {
    let logs = service.list_logs(workout_id, exercise_id).await?;
    Ok(Json(logs))
}

#[tracing::instrument(skip(service, payload))]
async fn create_log(
    State(service): State<WorkoutService>,
    WithRejection(Path((workout_id, exercise_id)), _): WithRejection<Path<(i64, i64)>, ApiError>,
    WithRejection(Json(payload), _): JsonBody,
) -> ApiResult<(StatusCode, Json<ExerciseLog>)> {
    require_fields(&payload, &["sets"])?;
    let request: CreateExerciseLog = decode_payload(payload)?;

    let log = service.create_log(workout_id, exercise_id, request).await?;
    Ok((StatusCode::CREATED, Json(log)))
}
