use chrono::Utc;
use tracing::{debug, info};
use validator::Validate;

use crate::db::{training_plans, users, Database};
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateUser, TrainingPlan, User};

#[derive(Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create_user(&self, user_data: CreateUser) -> ApiResult<User> {
        user_data.validate()?;

        let mut tx = self.db.write().await?;
        let user = users::insert_user(&mut tx, &user_data, Utc::now())
            .await
            .map_err(|e| ApiError::from(e).on_conflict("Access key already exists"))?;
        tx.commit().await?;

        info!(user_id = user.id, "Created user");
        Ok(user)
    }

    /// Look a user up by access key and record the access.
    pub async fn get_user_by_access_key(&self, access_key: &str) -> ApiResult<User> {
        let mut tx = self.db.write().await?;
        let user = users::find_user_by_access_key(&mut tx, access_key)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        let user = users::touch_last_access(&mut tx, user.id, Utc::now()).await?;
        tx.commit().await?;

        debug!(user_id = user.id, "Fetched user by access key");
        Ok(user)
    }

    pub async fn get_user_training_plans(&self, user_id: i64) -> ApiResult<Vec<TrainingPlan>> {
        let mut conn = self.db.read().await?;
        users::find_user_by_id(&mut conn, user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User", user_id))?;

        let plans = training_plans::list_plans(&mut conn, Some(user_id)).await?;
        Ok(plans)
    }

    pub async fn delete_user(&self, access_key: &str) -> ApiResult<()> {
        let mut tx = self.db.write().await?;
        let user = users::find_user_by_access_key(&mut tx, access_key)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        users::delete_user(&mut tx, user.id).await?;
        tx.commit().await?;

        info!(user_id = user.id, "Deleted user and owned training plans");
        Ok(())
    }
}
