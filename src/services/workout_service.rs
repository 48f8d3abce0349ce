use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::{debug, info};
use validator::Validate;

use crate::db::{exercise_types, training_blocks, workouts, Database};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateExerciseLog, CreateWorkout, ExerciseLog, NewWorkoutExercise, UpdateWorkout, Workout,
};

const SEQUENCE_CONFLICT: &str = "Workout with this sequence order already exists in block";
const EXERCISE_ORDER_CONFLICT: &str = "Duplicate exercise order within workout";

#[derive(Clone)]
pub struct WorkoutService {
    db: Database,
}

impl WorkoutService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Workouts of one block in sequence order, each with its exercises.
    pub async fn list_workouts(&self, block_id: i64) -> ApiResult<Vec<Workout>> {
        let mut conn = self.db.read().await?;
        training_blocks::find_block(&mut conn, block_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Training block", block_id))?;

        let mut list = workouts::list_workouts_for_block(&mut conn, block_id).await?;
        for workout in &mut list {
            workouts::load_exercises(&mut conn, workout).await?;
        }
        Ok(list)
    }

    pub async fn create_workout(&self, workout_data: CreateWorkout) -> ApiResult<Workout> {
        let new_workout = workout_data.into_new()?;
        let now = Utc::now();

        let mut tx = self.db.write().await?;
        training_blocks::find_block(&mut tx, new_workout.block_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Training block", new_workout.block_id))?;

        let mut workout = workouts::insert_workout(&mut tx, &new_workout, now)
            .await
            .map_err(|e| ApiError::from(e).on_conflict(SEQUENCE_CONFLICT))?;
        insert_exercises(&mut tx, workout.id, &new_workout.exercises, now).await?;
        workouts::load_exercises(&mut tx, &mut workout).await?;
        tx.commit().await?;

        info!(
            workout_id = workout.id,
            block_id = workout.block_id,
            exercises = workout.exercises.len(),
            "Created workout"
        );
        Ok(workout)
    }

    pub async fn get_workout(&self, workout_id: i64) -> ApiResult<Workout> {
        let mut conn = self.db.read().await?;
        let mut workout = workouts::find_workout(&mut conn, workout_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Workout", workout_id))?;
        workouts::load_exercises(&mut conn, &mut workout).await?;
        Ok(workout)
    }

    pub async fn update_workout(&self, workout_id: i64, patch: UpdateWorkout) -> ApiResult<Workout> {
        let now = Utc::now();

        let mut tx = self.db.write().await?;
        let mut workout = workouts::find_workout(&mut tx, workout_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Workout", workout_id))?;

        let replacement = workout.apply(patch)?;
        let mut workout = workouts::update_workout(&mut tx, &workout, now)
            .await
            .map_err(|e| ApiError::from(e).on_conflict(SEQUENCE_CONFLICT))?;

        if let Some(exercises) = replacement {
            let removed = workouts::delete_exercises(&mut tx, workout_id).await?;
            debug!(workout_id, removed, "Replacing workout exercises");
            insert_exercises(&mut tx, workout_id, &exercises, now).await?;
        }
        workouts::load_exercises(&mut tx, &mut workout).await?;
        tx.commit().await?;

        info!(workout_id, status = ?workout.status, "Updated workout");
        Ok(workout)
    }

    pub async fn delete_workout(&self, workout_id: i64) -> ApiResult<()> {
        let mut tx = self.db.write().await?;
        if workouts::delete_workout(&mut tx, workout_id).await? == 0 {
            return Err(ApiError::not_found("Workout", workout_id));
        }
        tx.commit().await?;

        info!(workout_id, "Deleted workout");
        Ok(())
    }

    pub async fn list_logs(&self, workout_id: i64, exercise_id: i64) -> ApiResult<Vec<ExerciseLog>> {
        let mut conn = self.db.read().await?;
        find_workout_exercise(&mut conn, workout_id, exercise_id).await?;

        let logs = workouts::list_logs_for_exercise(&mut conn, exercise_id).await?;
        Ok(logs)
    }

    /// Record performance against one exercise of a workout.
    pub async fn create_log(
        &self,
        workout_id: i64,
        exercise_id: i64,
        log_data: CreateExerciseLog,
    ) -> ApiResult<ExerciseLog> {
        log_data.validate()?;

        let mut tx = self.db.write().await?;
        find_workout_exercise(&mut tx, workout_id, exercise_id).await?;
        let log = workouts::insert_log(&mut tx, exercise_id, &log_data, Utc::now()).await?;
        tx.commit().await?;

        info!(workout_id, exercise_id, log_id = log.id, "Logged exercise performance");
        Ok(log)
    }
}

async fn find_workout_exercise(
    conn: &mut SqliteConnection,
    workout_id: i64,
    exercise_id: i64,
) -> ApiResult<()> {
    workouts::find_workout(conn, workout_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Workout", workout_id))?;
    workouts::find_exercise(conn, workout_id, exercise_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Workout exercise", exercise_id))?;
    Ok(())
}

async fn insert_exercises(
    conn: &mut SqliteConnection,
    workout_id: i64,
    exercises: &[NewWorkoutExercise],
    now: DateTime<Utc>,
) -> ApiResult<()> {
    for exercise in exercises {
        exercise_types::find_exercise_type(conn, exercise.exercise_type_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Exercise type", exercise.exercise_type_id))?;

        workouts::insert_exercise(conn, workout_id, exercise, now)
            .await
            .map_err(|e| ApiError::from(e).on_conflict(EXERCISE_ORDER_CONFLICT))?;
    }
    Ok(())
}
