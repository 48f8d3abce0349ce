use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Validate)]
pub struct TrainingBlock {
    pub id: i64,
    pub plan_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub primary_focus: String,
    #[validate(range(min = 1))]
    pub duration_weeks: i32,
    #[validate(range(min = 0))]
    pub sequence_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTrainingBlock {
    pub plan_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub primary_focus: String,
    #[validate(range(min = 1))]
    pub duration_weeks: i32,
    #[validate(range(min = 0))]
    pub sequence_order: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTrainingBlock {
    pub name: Option<String>,
    pub primary_focus: Option<String>,
    pub duration_weeks: Option<i32>,
    pub sequence_order: Option<i32>,
}

impl TrainingBlock {
    pub fn apply(&mut self, patch: UpdateTrainingBlock) -> ApiResult<()> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(primary_focus) = patch.primary_focus {
            self.primary_focus = primary_focus;
        }
        if let Some(duration_weeks) = patch.duration_weeks {
            self.duration_weeks = duration_weeks;
        }
        if let Some(sequence_order) = patch.sequence_order {
            self.sequence_order = sequence_order;
        }

        self.validate()?;
        Ok(())
    }
}
