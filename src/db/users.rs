use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::models::{CreateUser, User};

pub async fn insert_user(
    conn: &mut SqliteConnection,
    user: &CreateUser,
    now: DateTime<Utc>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (access_key, nickname, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?3)
        RETURNING id, access_key, nickname, created_at, updated_at, last_access
        "#,
    )
    .bind(&user.access_key)
    .bind(&user.nickname)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
}

pub async fn find_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, access_key, nickname, created_at, updated_at, last_access FROM users WHERE id = ?1",
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn find_user_by_access_key(
    conn: &mut SqliteConnection,
    access_key: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, access_key, nickname, created_at, updated_at, last_access FROM users WHERE access_key = ?1",
    )
    .bind(access_key)
    .fetch_optional(&mut *conn)
    .await
}

/// Stamp `last_access` and return the refreshed row.
pub async fn touch_last_access(
    conn: &mut SqliteConnection,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET last_access = ?2
        WHERE id = ?1
        RETURNING id, access_key, nickname, created_at, updated_at, last_access
        "#,
    )
    .bind(user_id)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
}

/// Owned plans, blocks, workouts and their exercise rows go with the user
/// through `ON DELETE CASCADE`.
pub async fn delete_user(conn: &mut SqliteConnection, user_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
