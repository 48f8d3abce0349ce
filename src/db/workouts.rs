use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{types::Json, SqliteConnection};

use crate::models::{
    CreateExerciseLog, ExerciseLog, NewWorkout, NewWorkoutExercise, Workout, WorkoutExercise,
};

const WORKOUT_COLUMNS: &str = "id, block_id, name, planned_date, actual_date, status, sequence_order, created_at, updated_at";

pub async fn insert_workout(
    conn: &mut SqliteConnection,
    workout: &NewWorkout,
    now: DateTime<Utc>,
) -> Result<Workout, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO workouts (
            block_id, name, planned_date, actual_date, status, sequence_order, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
        RETURNING {WORKOUT_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Workout>(&sql)
        .bind(workout.block_id)
        .bind(&workout.name)
        .bind(workout.planned_date)
        .bind(workout.actual_date)
        .bind(workout.status)
        .bind(workout.sequence_order)
        .bind(now)
        .fetch_one(&mut *conn)
        .await
}

pub async fn find_workout(
    conn: &mut SqliteConnection,
    workout_id: i64,
) -> Result<Option<Workout>, sqlx::Error> {
    let sql = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?1");

    sqlx::query_as::<_, Workout>(&sql)
        .bind(workout_id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn list_workouts_for_block(
    conn: &mut SqliteConnection,
    block_id: i64,
) -> Result<Vec<Workout>, sqlx::Error> {
    let sql = format!(
        "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE block_id = ?1 ORDER BY sequence_order ASC"
    );

    sqlx::query_as::<_, Workout>(&sql)
        .bind(block_id)
        .fetch_all(&mut *conn)
        .await
}

pub async fn update_workout(
    conn: &mut SqliteConnection,
    workout: &Workout,
    now: DateTime<Utc>,
) -> Result<Workout, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE workouts
        SET name = ?2,
            planned_date = ?3,
            actual_date = ?4,
            status = ?5,
            sequence_order = ?6,
            updated_at = ?7
        WHERE id = ?1
        RETURNING {WORKOUT_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Workout>(&sql)
        .bind(workout.id)
        .bind(&workout.name)
        .bind(workout.planned_date)
        .bind(workout.actual_date)
        .bind(workout.status)
        .bind(workout.sequence_order)
        .bind(now)
        .fetch_one(&mut *conn)
        .await
}

pub async fn delete_workout(conn: &mut SqliteConnection, workout_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM workouts WHERE id = ?1")
        .bind(workout_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

// Workout exercises

pub async fn insert_exercise(
    conn: &mut SqliteConnection,
    workout_id: i64,
    exercise: &NewWorkoutExercise,
    now: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO workout_exercises (
            workout_id, exercise_type_id, sets, reps, weight, notes, order_index, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
        RETURNING id
        "#,
    )
    .bind(workout_id)
    .bind(exercise.exercise_type_id)
    .bind(exercise.sets)
    .bind(exercise.reps)
    .bind(exercise.weight)
    .bind(&exercise.notes)
    .bind(exercise.order_index)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
}

/// Removes every exercise row of the workout; their logs cascade.
pub async fn delete_exercises(conn: &mut SqliteConnection, workout_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM workout_exercises WHERE workout_id = ?1")
        .bind(workout_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn list_exercises(
    conn: &mut SqliteConnection,
    workout_id: i64,
) -> Result<Vec<WorkoutExercise>, sqlx::Error> {
    sqlx::query_as::<_, WorkoutExercise>(
        r#"
        SELECT we.id, we.workout_id, we.exercise_type_id, et.name AS exercise_name,
               we.sets, we.reps, we.weight, we.notes, we.order_index
        FROM workout_exercises we
        JOIN exercise_types et ON et.id = we.exercise_type_id
        WHERE we.workout_id = ?1
        ORDER BY we.order_index ASC
        "#,
    )
    .bind(workout_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn find_exercise(
    conn: &mut SqliteConnection,
    workout_id: i64,
    exercise_id: i64,
) -> Result<Option<WorkoutExercise>, sqlx::Error> {
    sqlx::query_as::<_, WorkoutExercise>(
        r#"
        SELECT we.id, we.workout_id, we.exercise_type_id, et.name AS exercise_name,
               we.sets, we.reps, we.weight, we.notes, we.order_index
        FROM workout_exercises we
        JOIN exercise_types et ON et.id = we.exercise_type_id
        WHERE we.workout_id = ?1 AND we.id = ?2
        "#,
    )
    .bind(workout_id)
    .bind(exercise_id)
    .fetch_optional(&mut *conn)
    .await
}

// Exercise logs

pub async fn insert_log(
    conn: &mut SqliteConnection,
    workout_exercise_id: i64,
    log: &CreateExerciseLog,
    now: DateTime<Utc>,
) -> Result<ExerciseLog, sqlx::Error> {
    sqlx::query_as::<_, ExerciseLog>(
        r#"
        INSERT INTO exercise_logs (
            workout_exercise_id, logged_at, sets, notes, perceived_effort, completed, created_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        RETURNING id, workout_exercise_id, logged_at, sets, notes, perceived_effort, completed, created_at
        "#,
    )
    .bind(workout_exercise_id)
    .bind(log.logged_at.unwrap_or(now))
    .bind(Json(&log.sets))
    .bind(&log.notes)
    .bind(log.perceived_effort)
    .bind(log.completed)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
}

pub async fn list_logs_for_exercise(
    conn: &mut SqliteConnection,
    workout_exercise_id: i64,
) -> Result<Vec<ExerciseLog>, sqlx::Error> {
    sqlx::query_as::<_, ExerciseLog>(
        r#"
        SELECT id, workout_exercise_id, logged_at, sets, notes, perceived_effort, completed, created_at
        FROM exercise_logs
        WHERE workout_exercise_id = ?1
        ORDER BY logged_at ASC, id ASC
        "#,
    )
    .bind(workout_exercise_id)
    .fetch_all(&mut *conn)
    .await
}

async fn list_logs_for_workout(
    conn: &mut SqliteConnection,
    workout_id: i64,
) -> Result<Vec<ExerciseLog>, sqlx::Error> {
    sqlx::query_as::<_, ExerciseLog>(
        r#"
        SELECT l.id, l.workout_exercise_id, l.logged_at, l.sets, l.notes,
               l.perceived_effort, l.completed, l.created_at
        FROM exercise_logs l
        JOIN workout_exercises we ON we.id = l.workout_exercise_id
        WHERE we.workout_id = ?1
        ORDER BY l.logged_at ASC, l.id ASC
        "#,
    )
    .bind(workout_id)
    .fetch_all(&mut *conn)
    .await
}

/// Fill in the exercise list of a workout row, each with its logs.
pub async fn load_exercises(
    conn: &mut SqliteConnection,
    workout: &mut Workout,
) -> Result<(), sqlx::Error> {
    let mut exercises = list_exercises(conn, workout.id).await?;

    let mut logs_by_exercise: HashMap<i64, Vec<ExerciseLog>> = HashMap::new();
    for log in list_logs_for_workout(conn, workout.id).await? {
        logs_by_exercise
            .entry(log.workout_exercise_id)
            .or_default()
            .push(log);
    }

    for exercise in &mut exercises {
        exercise.logs = logs_by_exercise.remove(&exercise.id).unwrap_or_default();
    }

    workout.exercises = exercises;
    Ok(())
}
