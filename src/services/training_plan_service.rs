use chrono::Utc;
use tracing::info;

use crate::db::{training_plans, users, Database};
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateTrainingPlan, TrainingPlan, UpdateTrainingPlan};

#[derive(Clone)]
pub struct TrainingPlanService {
    db: Database,
}

impl TrainingPlanService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_plans(&self, user_id: Option<i64>) -> ApiResult<Vec<TrainingPlan>> {
        let mut conn = self.db.read().await?;
        let plans = training_plans::list_plans(&mut conn, user_id).await?;
        Ok(plans)
    }

    pub async fn create_plan(&self, plan_data: CreateTrainingPlan) -> ApiResult<TrainingPlan> {
        let new_plan = plan_data.into_new()?;

        let mut tx = self.db.write().await?;
        users::find_user_by_id(&mut tx, new_plan.user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User", new_plan.user_id))?;
        let plan = training_plans::insert_plan(&mut tx, &new_plan, Utc::now()).await?;
        tx.commit().await?;

        info!(plan_id = plan.id, user_id = plan.user_id, "Created training plan");
        Ok(plan)
    }

    pub async fn get_plan(&self, plan_id: i64) -> ApiResult<TrainingPlan> {
        let mut conn = self.db.read().await?;
        training_plans::find_plan(&mut conn, plan_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Training plan", plan_id))
    }

    pub async fn update_plan(&self, plan_id: i64, patch: UpdateTrainingPlan) -> ApiResult<TrainingPlan> {
        let mut tx = self.db.write().await?;
        let mut plan = training_plans::find_plan(&mut tx, plan_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Training plan", plan_id))?;

        plan.apply(patch)?;
        let plan = training_plans::update_plan(&mut tx, &plan, Utc::now()).await?;
        tx.commit().await?;

        info!(plan_id, "Updated training plan");
        Ok(plan)
    }

    pub async fn delete_plan(&self, plan_id: i64) -> ApiResult<()> {
        let mut tx = self.db.write().await?;
        if training_plans::delete_plan(&mut tx, plan_id).await? == 0 {
            return Err(ApiError::not_found("Training plan", plan_id));
        }
        tx.commit().await?;

        info!(plan_id, "Deleted training plan");
        Ok(())
    }
}
