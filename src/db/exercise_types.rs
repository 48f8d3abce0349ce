use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::models::{CreateExerciseType, ExerciseType};

pub async fn insert_exercise_type(
    conn: &mut SqliteConnection,
    exercise_type: &CreateExerciseType,
    now: DateTime<Utc>,
) -> Result<ExerciseType, sqlx::Error> {
    sqlx::query_as::<_, ExerciseType>(
        r#"
        INSERT INTO exercise_types (name, category, description, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?4)
        RETURNING id, name, category, description, created_at, updated_at
        "#,
    )
    .bind(&exercise_type.name)
    .bind(&exercise_type.category)
    .bind(&exercise_type.description)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
}

pub async fn find_exercise_type(
    conn: &mut SqliteConnection,
    type_id: i64,
) -> Result<Option<ExerciseType>, sqlx::Error> {
    sqlx::query_as::<_, ExerciseType>(
        "SELECT id, name, category, description, created_at, updated_at FROM exercise_types WHERE id = ?1",
    )
    .bind(type_id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn list_exercise_types(
    conn: &mut SqliteConnection,
) -> Result<Vec<ExerciseType>, sqlx::Error> {
    sqlx::query_as::<_, ExerciseType>(
        "SELECT id, name, category, description, created_at, updated_at FROM exercise_types ORDER BY name ASC, id ASC",
    )
    .fetch_all(&mut *conn)
    .await
}

/// Workout exercise rows referencing the type are removed by cascade.
pub async fn delete_exercise_type(
    conn: &mut SqliteConnection,
    type_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM exercise_types WHERE id = ?1")
        .bind(type_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
