use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use crate::db::{exercise_types, Database};
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateExerciseType, ExerciseType};

#[derive(Clone)]
pub struct ExerciseTypeService {
    db: Database,
}

impl ExerciseTypeService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_exercise_types(&self) -> ApiResult<Vec<ExerciseType>> {
        let mut conn = self.db.read().await?;
        let types = exercise_types::list_exercise_types(&mut conn).await?;
        Ok(types)
    }

    pub async fn create_exercise_type(&self, type_data: CreateExerciseType) -> ApiResult<ExerciseType> {
        type_data.validate()?;

        let mut tx = self.db.write().await?;
        let exercise_type =
            exercise_types::insert_exercise_type(&mut tx, &type_data, Utc::now()).await?;
        tx.commit().await?;

        info!(type_id = exercise_type.id, name = %exercise_type.name, "Created exercise type");
        Ok(exercise_type)
    }

    pub async fn get_exercise_type(&self, type_id: i64) -> ApiResult<ExerciseType> {
        let mut conn = self.db.read().await?;
        exercise_types::find_exercise_type(&mut conn, type_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Exercise type", type_id))
    }

    pub async fn delete_exercise_type(&self, type_id: i64) -> ApiResult<()> {
        let mut tx = self.db.write().await?;
        if exercise_types::delete_exercise_type(&mut tx, type_id).await? == 0 {
            return Err(ApiError::not_found("Exercise type", type_id));
        }
        tx.commit().await?;

        warn!(type_id, "Deleted exercise type and every workout exercise that used it");
        Ok(())
    }
}
