use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::{types::Json, FromRow};
use validator::Validate;

use super::deserialize_some;
use super::validation::{parse_date, parse_optional_date};
use crate::error::ApiResult;

/// Flat status enumeration; any status may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum WorkoutStatus {
    #[default]
    Planned,
    Completed,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Validate)]
pub struct Workout {
    pub id: i64,
    pub block_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub planned_date: NaiveDate,
    pub actual_date: Option<NaiveDate>,
    pub status: WorkoutStatus,
    #[validate(range(min = 0))]
    pub sequence_order: i32,
    #[sqlx(skip)]
    pub exercises: Vec<WorkoutExercise>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One exercise row of a workout, joined with its catalog name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutExercise {
    pub id: i64,
    #[serde(skip)]
    pub workout_id: i64,
    pub exercise_type_id: i64,
    pub exercise_name: String,
    pub sets: i32,
    pub reps: i32,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    #[serde(rename = "order")]
    pub order_index: i32,
    #[sqlx(skip)]
    pub logs: Vec<ExerciseLog>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoggedSet {
    #[validate(range(min = 0))]
    pub reps: i32,
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub rpe: Option<f64>,
}

/// Performance actually recorded against a workout exercise.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExerciseLog {
    pub id: i64,
    pub workout_exercise_id: i64,
    pub logged_at: DateTime<Utc>,
    pub sets: Json<Vec<LoggedSet>>,
    pub notes: Option<String>,
    pub perceived_effort: Option<i32>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExerciseEntry {
    pub exercise_type_id: i64,
    #[validate(range(min = 1))]
    pub sets: i32,
    #[validate(range(min = 1))]
    pub reps: i32,
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewWorkoutExercise {
    pub exercise_type_id: i64,
    pub sets: i32,
    pub reps: i32,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub order_index: i32,
}

/// Entries without an explicit `order` take their 1-based list position.
pub fn resolve_exercise_entries(entries: Vec<ExerciseEntry>) -> Vec<NewWorkoutExercise> {
    entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| NewWorkoutExercise {
            exercise_type_id: entry.exercise_type_id,
            sets: entry.sets,
            reps: entry.reps,
            weight: entry.weight,
            notes: entry.notes,
            order_index: entry.order.unwrap_or(position as i32 + 1),
        })
        .collect()
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateWorkout {
    pub block_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub planned_date: String,
    pub actual_date: Option<String>,
    #[serde(default)]
    pub status: WorkoutStatus,
    #[validate(range(min = 0))]
    pub sequence_order: i32,
    #[serde(default)]
    #[validate(nested)]
    pub exercises: Vec<ExerciseEntry>,
}

#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub block_id: i64,
    pub name: String,
    pub planned_date: NaiveDate,
    pub actual_date: Option<NaiveDate>,
    pub status: WorkoutStatus,
    pub sequence_order: i32,
    pub exercises: Vec<NewWorkoutExercise>,
}

impl CreateWorkout {
    pub fn into_new(self) -> ApiResult<NewWorkout> {
        self.validate()?;

        Ok(NewWorkout {
            block_id: self.block_id,
            name: self.name,
            planned_date: parse_date(&self.planned_date)?,
            actual_date: parse_optional_date(self.actual_date.as_deref())?,
            status: self.status,
            sequence_order: self.sequence_order,
            exercises: resolve_exercise_entries(self.exercises),
        })
    }
}

/// Partial update. A present `exercises` list replaces the stored one.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateWorkout {
    pub name: Option<String>,
    pub sequence_order: Option<i32>,
    pub planned_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub actual_date: Option<Option<String>>,
    pub status: Option<WorkoutStatus>,
    #[validate(nested)]
    pub exercises: Option<Vec<ExerciseEntry>>,
}

impl Workout {
    /// Merge scalar fields of the patch; returns the replacement exercise
    /// list when one was supplied.
    pub fn apply(&mut self, patch: UpdateWorkout) -> ApiResult<Option<Vec<NewWorkoutExercise>>> {
        patch.validate()?;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(sequence_order) = patch.sequence_order {
            self.sequence_order = sequence_order;
        }
        if let Some(planned_date) = patch.planned_date {
            self.planned_date = parse_date(&planned_date)?;
        }
        if let Some(actual_date) = patch.actual_date {
            self.actual_date = parse_optional_date(actual_date.as_deref())?;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }

        self.validate()?;
        Ok(patch.exercises.map(resolve_exercise_entries))
    }
}

fn default_completed() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateExerciseLog {
    #[validate(nested)]
    pub sets: Vec<LoggedSet>,
    #[serde(default, deserialize_with = "deserialize_log_time")]
    pub logged_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub perceived_effort: Option<i32>,
    #[serde(default = "default_completed")]
    pub completed: bool,
}

/// RFC 3339 timestamps keep their offset; one without an offset is read as UTC.
fn deserialize_log_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(time) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(time.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(Utc.from_utc_datetime(&naive)))
        .map_err(|_| {
            de::Error::custom(format!(
                "Invalid logged_at '{raw}'. Use an ISO 8601 timestamp such as 2024-01-21T14:30:00Z"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use serde_json::json;

    fn workout() -> Workout {
        Workout {
            id: 3,
            block_id: 2,
            name: "Lower Body A".to_string(),
            planned_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            actual_date: None,
            status: WorkoutStatus::Planned,
            sequence_order: 1,
            exercises: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(json!(WorkoutStatus::Skipped), json!("skipped"));
        let status: WorkoutStatus = serde_json::from_value(json!("completed")).unwrap();
        assert_eq!(status, WorkoutStatus::Completed);
        assert!(serde_json::from_value::<WorkoutStatus>(json!("pending")).is_err());
    }

    #[test]
    fn test_resolve_fills_missing_order_from_position() {
        let entries: Vec<ExerciseEntry> = serde_json::from_value(json!([
            { "exercise_type_id": 1, "sets": 3, "reps": 5 },
            { "exercise_type_id": 2, "sets": 3, "reps": 8, "order": 7 },
            { "exercise_type_id": 3, "sets": 2, "reps": 12 }
        ]))
        .unwrap();

        let orders: Vec<i32> = resolve_exercise_entries(entries)
            .iter()
            .map(|entry| entry.order_index)
            .collect();
        assert_eq!(orders, vec![1, 7, 3]);
    }

    #[test]
    fn test_status_transitions_are_unrestricted() {
        let mut current = workout();
        for status in ["completed", "skipped", "planned", "skipped"] {
            let patch: UpdateWorkout = serde_json::from_value(json!({ "status": status })).unwrap();
            current.apply(patch).unwrap();
        }
        assert_eq!(current.status, WorkoutStatus::Skipped);
    }

    #[test]
    fn test_apply_keeps_exercises_when_absent() {
        let mut current = workout();
        let patch: UpdateWorkout =
            serde_json::from_value(json!({ "actual_date": "2024-03-05" })).unwrap();

        let replacement = current.apply(patch).unwrap();
        assert!(replacement.is_none());
        assert_eq!(current.actual_date, NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn test_apply_rejects_bad_planned_date() {
        let mut current = workout();
        let patch: UpdateWorkout =
            serde_json::from_value(json!({ "planned_date": "March 4th" })).unwrap();

        assert!(matches!(current.apply(patch), Err(ApiError::InvalidDateFormat(_))));
    }

    #[test]
    fn test_log_defaults_to_completed() {
        let log: CreateExerciseLog = serde_json::from_value(json!({
            "sets": [{ "reps": 5, "weight": 82.5, "rpe": 8.0 }]
        }))
        .unwrap();
        assert!(log.completed);
        assert!(log.logged_at.is_none());
    }

    #[test]
    fn test_log_time_without_offset_is_utc() {
        let log: CreateExerciseLog = serde_json::from_value(json!({
            "sets": [{ "reps": 5 }],
            "logged_at": "2024-01-21T14:30:00"
        }))
        .unwrap();
        assert_eq!(log.logged_at, Utc.with_ymd_and_hms(2024, 1, 21, 14, 30, 0).single());

        let log: CreateExerciseLog = serde_json::from_value(json!({
            "sets": [{ "reps": 5 }],
            "logged_at": "2024-01-21T16:30:00+02:00"
        }))
        .unwrap();
        assert_eq!(log.logged_at, Utc.with_ymd_and_hms(2024, 1, 21, 14, 30, 0).single());
    }

    #[test]
    fn test_log_time_rejects_garbage() {
        let err = serde_json::from_value::<CreateExerciseLog>(json!({
            "sets": [{ "reps": 5 }],
            "logged_at": "yesterday"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Invalid logged_at 'yesterday'"));

        let log: CreateExerciseLog =
            serde_json::from_value(json!({ "sets": [{ "reps": 5 }], "logged_at": null })).unwrap();
        assert!(log.logged_at.is_none());
    }
}
