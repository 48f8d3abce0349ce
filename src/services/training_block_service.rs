use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::db::{training_blocks, training_plans, Database};
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateTrainingBlock, TrainingBlock, UpdateTrainingBlock};

const SEQUENCE_CONFLICT: &str = "Training block with this sequence order already exists in plan";

#[derive(Clone)]
pub struct TrainingBlockService {
    db: Database,
}

impl TrainingBlockService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Blocks of one plan in sequence order.
    pub async fn list_blocks(&self, plan_id: i64) -> ApiResult<Vec<TrainingBlock>> {
        let mut conn = self.db.read().await?;
        training_plans::find_plan(&mut conn, plan_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Training plan", plan_id))?;

        let blocks = training_blocks::list_blocks_for_plan(&mut conn, plan_id).await?;
        Ok(blocks)
    }

    pub async fn create_block(&self, block_data: CreateTrainingBlock) -> ApiResult<TrainingBlock> {
        block_data.validate()?;

        let mut tx = self.db.write().await?;
        training_plans::find_plan(&mut tx, block_data.plan_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Training plan", block_data.plan_id))?;
        let block = training_blocks::insert_block(&mut tx, &block_data, Utc::now())
            .await
            .map_err(|e| ApiError::from(e).on_conflict(SEQUENCE_CONFLICT))?;
        tx.commit().await?;

        info!(block_id = block.id, plan_id = block.plan_id, "Created training block");
        Ok(block)
    }

    pub async fn get_block(&self, block_id: i64) -> ApiResult<TrainingBlock> {
        let mut conn = self.db.read().await?;
        training_blocks::find_block(&mut conn, block_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Training block", block_id))
    }

    pub async fn update_block(&self, block_id: i64, patch: UpdateTrainingBlock) -> ApiResult<TrainingBlock> {
        let mut tx = self.db.write().await?;
        let mut block = training_blocks::find_block(&mut tx, block_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Training block", block_id))?;

        block.apply(patch)?;
        let block = training_blocks::update_block(&mut tx, &block, Utc::now())
            .await
            .map_err(|e| ApiError::from(e).on_conflict(SEQUENCE_CONFLICT))?;
        tx.commit().await?;

        info!(block_id, "Updated training block");
        Ok(block)
    }

    pub async fn delete_block(&self, block_id: i64) -> ApiResult<()> {
        let mut tx = self.db.write().await?;
        if training_blocks::delete_block(&mut tx, block_id).await? == 0 {
            return Err(ApiError::not_found("Training block", block_id));
        }
        tx.commit().await?;

        info!(block_id, "Deleted training block");
        Ok(())
    }
}
