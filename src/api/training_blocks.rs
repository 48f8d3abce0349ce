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
use crate::models::{CreateTrainingBlock, TrainingBlock, UpdateTrainingBlock};
use crate::services::TrainingBlockService;

#[derive(Debug, Deserialize)]
pub struct BlockQuery {
    pub plan_id: Option<i64>,
}

pub fn training_block_routes(db: Database) -> Router {
    Router::new()
        .route("/api/training-blocks", get(list_blocks).post(create_block))
        .route(
            "/api/training-blocks/:id",
            get(get_block).put(update_block).delete(delete_block),
        )
        .with_state(TrainingBlockService::new(db))
}

#[tracing::instrument(skip(service))]
async fn list_blocks(
    State(service): State<TrainingBlockService>,
    WithRejection(Query(query), _): QueryParams<BlockQuery>,
) -> ApiResult<Json<Vec<TrainingBlock>>> {
    let plan_id = query
        .plan_id
        .ok_or_else(|| ApiError::BadRequest("plan_id query parameter is required".to_string()))?;

    let blocks = service.list_blocks(plan_id).await?;
    Ok(Json(blocks))
}

#[tracing::instrument(skip(service, payload))]
async fn create_block(
    State(service): State<TrainingBlockService>,
    WithRejection(Json(payload), _): JsonBody,
) -> ApiResult<(StatusCode, Json<TrainingBlock>)> {
    require_fields(
        &payload,
        &["plan_id", "name", "primary_focus", "duration_weeks", "sequence_order"],
    )?;
    let request: CreateTrainingBlock = decode_payload(payload)?;

    let block = service.create_block(request).await?;
    Ok((StatusCode::CREATED, Json(block)))
}

#[tracing::instrument(skip(service))]
async fn get_block(
    State(service): State<TrainingBlockService>,
    WithRejection(Path(block_id), _): IdPath,
) -> ApiResult<Json<TrainingBlock>> {
    let block = service.get_block(block_id).await?;
    Ok(Json(block))
}

#[tracing::instrument(skip(service, payload))]
async fn update_block(
    State(service): State<TrainingBlockService>,
    WithRejection(Path(block_id), _): IdPath,
    WithRejection(Json(payload), _): JsonBody,
) -> ApiResult<Json<TrainingBlock>> {
    let patch: UpdateTrainingBlock = decode_payload(payload)?;

    let block = service.update_block(block_id, patch).await?;
    Ok(Json(block))
}

#[tracing::instrument(skip(service))]
async fn delete_block(
    State(service): State<TrainingBlockService>,
    WithRejection(Path(block_id), _): IdPath,
) -> ApiResult<StatusCode> {
    service.delete_block(block_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
