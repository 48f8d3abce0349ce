use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::deserialize_some;
use super::validation::{check_date_range, parse_optional_date};
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Validate)]
pub struct TrainingPlan {
    pub id: i64,
    pub user_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 50))]
    pub progression_type: Option<String>,
    #[validate(range(min = 0, max = 168))]
    pub target_weekly_hours: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTrainingPlan {
    pub user_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 50))]
    pub progression_type: Option<String>,
    #[validate(range(min = 0, max = 168))]
    pub target_weekly_hours: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A validated plan ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewTrainingPlan {
    pub user_id: i64,
    pub name: String,
    pub progression_type: Option<String>,
    pub target_weekly_hours: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl CreateTrainingPlan {
    pub fn into_new(self) -> ApiResult<NewTrainingPlan> {
        self.validate()?;

        let start_date = parse_optional_date(self.start_date.as_deref())?;
        let end_date = parse_optional_date(self.end_date.as_deref())?;
        if let (Some(start), Some(end)) = (start_date, end_date) {
            check_date_range(start, end)?;
        }

        Ok(NewTrainingPlan {
            user_id: self.user_id,
            name: self.name,
            progression_type: self.progression_type,
            target_weekly_hours: self.target_weekly_hours,
            start_date,
            end_date,
        })
    }
}

/// Partial update. Absent keys leave the stored value alone; an explicit
/// `null` clears one of the optional columns.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTrainingPlan {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub progression_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub target_weekly_hours: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub start_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub end_date: Option<Option<String>>,
}

impl TrainingPlan {
    pub fn apply(&mut self, patch: UpdateTrainingPlan) -> ApiResult<()> {
        let dates_changed = patch.start_date.is_some() || patch.end_date.is_some();

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(progression_type) = patch.progression_type {
            self.progression_type = progression_type;
        }
        if let Some(target_weekly_hours) = patch.target_weekly_hours {
            self.target_weekly_hours = target_weekly_hours;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = parse_optional_date(start_date.as_deref())?;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = parse_optional_date(end_date.as_deref())?;
        }

        self.validate()?;
        if dates_changed {
            if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
                check_date_range(start, end)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use serde_json::json;

    fn plan() -> TrainingPlan {
        TrainingPlan {
            id: 1,
            user_id: 1,
            name: "Spring Strength".to_string(),
            progression_type: Some("linear".to_string()),
            target_weekly_hours: Some(6),
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_absent_and_null_are_distinct() {
        let patch: UpdateTrainingPlan =
            serde_json::from_value(json!({ "progression_type": null })).unwrap();
        assert_eq!(patch.progression_type, Some(None));
        assert_eq!(patch.target_weekly_hours, None);
        assert!(patch.name.is_none());
    }

    #[test]
    fn test_apply_leaves_omitted_fields_unchanged() {
        let mut current = plan();
        let patch: UpdateTrainingPlan =
            serde_json::from_value(json!({ "name": "Summer Strength" })).unwrap();

        current.apply(patch).unwrap();

        assert_eq!(current.name, "Summer Strength");
        assert_eq!(current.progression_type.as_deref(), Some("linear"));
        assert_eq!(current.target_weekly_hours, Some(6));
        assert_eq!(current.start_date, NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_apply_clears_nullable_field() {
        let mut current = plan();
        let patch: UpdateTrainingPlan =
            serde_json::from_value(json!({ "target_weekly_hours": null })).unwrap();

        current.apply(patch).unwrap();
        assert_eq!(current.target_weekly_hours, None);
    }

    #[test]
    fn test_apply_rechecks_date_range() {
        let mut current = plan();
        let patch: UpdateTrainingPlan =
            serde_json::from_value(json!({ "end_date": "2024-01-01" })).unwrap();

        assert!(matches!(current.apply(patch), Err(ApiError::InvalidDateRange)));
    }

    #[test]
    fn test_create_rejects_reversed_dates() {
        let request = CreateTrainingPlan {
            user_id: 1,
            name: "Plan".to_string(),
            progression_type: None,
            target_weekly_hours: None,
            start_date: Some("2024-06-01".to_string()),
            end_date: Some("2024-06-01".to_string()),
        };

        assert!(matches!(request.into_new(), Err(ApiError::InvalidDateRange)));
    }
}
