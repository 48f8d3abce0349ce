use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::models::{CreateTrainingBlock, TrainingBlock};

pub async fn insert_block(
    conn: &mut SqliteConnection,
    block: &CreateTrainingBlock,
    now: DateTime<Utc>,
) -> Result<TrainingBlock, sqlx::Error> {
    sqlx::query_as::<_, TrainingBlock>(
        r#"
        INSERT INTO training_blocks (
            plan_id, name, primary_focus, duration_weeks, sequence_order, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        RETURNING id, plan_id, name, primary_focus, duration_weeks, sequence_order,
                  created_at, updated_at
        "#,
    )
    .bind(block.plan_id)
    .bind(&block.name)
    .bind(&block.primary_focus)
    .bind(block.duration_weeks)
    .bind(block.sequence_order)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
}

pub async fn find_block(
    conn: &mut SqliteConnection,
    block_id: i64,
) -> Result<Option<TrainingBlock>, sqlx::Error> {
    sqlx::query_as::<_, TrainingBlock>(
        r#"
        SELECT id, plan_id, name, primary_focus, duration_weeks, sequence_order,
               created_at, updated_at
        FROM training_blocks
        WHERE id = ?1
        "#,
    )
    .bind(block_id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn list_blocks_for_plan(
    conn: &mut SqliteConnection,
    plan_id: i64,
) -> Result<Vec<TrainingBlock>, sqlx::Error> {
    sqlx::query_as::<_, TrainingBlock>(
        r#"
        SELECT id, plan_id, name, primary_focus, duration_weeks, sequence_order,
               created_at, updated_at
        FROM training_blocks
        WHERE plan_id = ?1
        ORDER BY sequence_order ASC
        "#,
    )
    .bind(plan_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn update_block(
    conn: &mut SqliteConnection,
    block: &TrainingBlock,
    now: DateTime<Utc>,
) -> Result<TrainingBlock, sqlx::Error> {
    sqlx::query_as::<_, TrainingBlock>(
        r#"
        UPDATE training_blocks
        SET name = ?2,
            primary_focus = ?3,
            duration_weeks = ?4,
            sequence_order = ?5,
            updated_at = ?6
        WHERE id = ?1
        RETURNING id, plan_id, name, primary_focus, duration_weeks, sequence_order,
                  created_at, updated_at
        "#,
    )
    .bind(block.id)
    .bind(&block.name)
    .bind(&block.primary_focus)
    .bind(block.duration_weeks)
    .bind(block.sequence_order)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
}

pub async fn delete_block(conn: &mut SqliteConnection, block_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM training_blocks WHERE id = ?1")
        .bind(block_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
