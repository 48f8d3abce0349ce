use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;

use super::{IdPath, JsonBody};
use crate::db::Database;
use crate::error::ApiResult;
use crate::models::validation::{decode_payload, require_fields};
use crate::models::{CreateExerciseType, ExerciseType};
use crate::services::ExerciseTypeService;

pub fn exercise_type_routes(db: Database) -> Router {
    Router::new()
        .route(
            "/api/exercise-types",
            get(list_exercise_types).post(create_exercise_type),
        )
        .route(
            "/api/exercise-types/:id",
            get(get_exercise_type).delete(delete_exercise_type),
        )
        .with_state(ExerciseTypeService::new(db))
}

#[tracing::instrument(skip(service))]
async fn list_exercise_types(
    State(service): State<ExerciseTypeService>,
) -> ApiResult<Json<Vec<ExerciseType>>> {
    let types = service.list_exercise_types().await?;
    Ok(Json(types))
}

#[tracing::instrument(skip(service, payload))]
async fn create_exercise_type(
    State(service): State<ExerciseTypeService>,
    WithRejection(Json(payload), _): JsonBody,
) -> ApiResult<(StatusCode, Json<ExerciseType>)> {
    require_fields(&payload, &["name", "category"])?;
    let request: CreateExerciseType = decode_payload(payload)?;

    let exercise_type = service.create_exercise_type(request).await?;
    Ok((StatusCode::CREATED, Json(exercise_type)))
}

#[tracing::instrument(skip(service))]
async fn get_exercise_type(
    State(service): State<ExerciseTypeService>,
    WithRejection(Path(type_id), _): IdPath,
) -> ApiResult<Json<ExerciseType>> {
    let exercise_type = service.get_exercise_type(type_id).await?;
    Ok(Json(exercise_type))
}

#[tracing::instrument(skip(service))]
async fn delete_exercise_type(
    State(service): State<ExerciseTypeService>,
    WithRejection(Path(type_id), _): IdPath,
) -> ApiResult<StatusCode> {
    service.delete_exercise_type(type_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
