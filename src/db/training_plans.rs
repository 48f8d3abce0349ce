use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::models::{NewTrainingPlan, TrainingPlan};

pub async fn insert_plan(
    conn: &mut SqliteConnection,
    plan: &NewTrainingPlan,
    now: DateTime<Utc>,
) -> Result<TrainingPlan, sqlx::Error> {
    sqlx::query_as::<_, TrainingPlan>(
        r#"
        INSERT INTO training_plans (
            user_id, name, progression_type, target_weekly_hours,
            start_date, end_date, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
        RETURNING id, user_id, name, progression_type, target_weekly_hours,
                  start_date, end_date, created_at, updated_at
        "#,
    )
    .bind(plan.user_id)
    .bind(&plan.name)
    .bind(&plan.progression_type)
    .bind(plan.target_weekly_hours)
    .bind(plan.start_date)
    .bind(plan.end_date)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
}

pub async fn find_plan(
    conn: &mut SqliteConnection,
    plan_id: i64,
) -> Result<Option<TrainingPlan>, sqlx::Error> {
    sqlx::query_as::<_, TrainingPlan>(
        r#"
        SELECT id, user_id, name, progression_type, target_weekly_hours,
               start_date, end_date, created_at, updated_at
        FROM training_plans
        WHERE id = ?1
        "#,
    )
    .bind(plan_id)
    .fetch_optional(&mut *conn)
    .await
}

/// Newest first; `user_id = None` lists every plan.
pub async fn list_plans(
    conn: &mut SqliteConnection,
    user_id: Option<i64>,
) -> Result<Vec<TrainingPlan>, sqlx::Error> {
    sqlx::query_as::<_, TrainingPlan>(
        r#"
        SELECT id, user_id, name, progression_type, target_weekly_hours,
               start_date, end_date, created_at, updated_at
        FROM training_plans
        WHERE ?1 IS NULL OR user_id = ?1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
}

/// Persist every mutable column of an already merged plan.
pub async fn update_plan(
    conn: &mut SqliteConnection,
    plan: &TrainingPlan,
    now: DateTime<Utc>,
) -> Result<TrainingPlan, sqlx::Error> {
    sqlx::query_as::<_, TrainingPlan>(
        r#"
        UPDATE training_plans
        SET name = ?2,
            progression_type = ?3,
            target_weekly_hours = ?4,
            start_date = ?5,
            end_date = ?6,
            updated_at = ?7
        WHERE id = ?1
        RETURNING id, user_id, name, progression_type, target_weekly_hours,
                  start_date, end_date, created_at, updated_at
        "#,
    )
    .bind(plan.id)
    .bind(&plan.name)
    .bind(&plan.progression_type)
    .bind(plan.target_weekly_hours)
    .bind(plan.start_date)
    .bind(plan.end_date)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
}

pub async fn delete_plan(conn: &mut SqliteConnection, plan_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM training_plans WHERE id = ?1")
        .bind(plan_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
