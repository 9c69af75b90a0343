use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{DbContext, DbError};

/// Authentication account. Identity/role data lives in the `profiles` table
/// keyed by the same id.
#[derive(Debug, Deserialize, FromRow, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

pub async fn create_user(db: &DbContext, new_user: NewUser) -> Result<User, DbError> {
    let id = Uuid::new_v4().to_string();
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, created_at, updated_at)
        VALUES (?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING id, email, password_hash, created_at, updated_at
        "#,
    )
    .bind(&id)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .fetch_one(db)
    .await?;
    Ok(user)
}

pub async fn get_user_by_id(db: &DbContext, id: &str) -> Result<User, DbError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(user)
}

pub async fn get_user_by_email(db: &DbContext, email: &str) -> Result<User, DbError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, created_at, updated_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_one(db)
    .await?;
    Ok(user)
}
