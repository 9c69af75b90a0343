use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{DbContext, DbError};

/// Invariant maintained by all writers: `is_occupied` implies
/// `current_tenant_id` is set, and a set tenant implies `is_occupied`.
#[derive(Debug, Deserialize, FromRow, Serialize)]
pub struct Room {
    pub id: String,
    pub room_number: String,
    pub floor_number: i64,
    pub monthly_rent: f64,
    pub is_occupied: bool,
    pub current_tenant_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewRoom {
    pub room_number: String,
    pub floor_number: i64,
    pub monthly_rent: f64,
    pub is_occupied: bool,
    pub current_tenant_id: Option<String>,
}

pub async fn create_room(db: &DbContext, new_room: NewRoom) -> Result<Room, DbError> {
    let id = Uuid::new_v4().to_string();
    let room = sqlx::query_as::<_, Room>(
        r#"
        INSERT INTO rooms (id, room_number, floor_number, monthly_rent, is_occupied, current_tenant_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING id, room_number, floor_number, monthly_rent, is_occupied, current_tenant_id, created_at, updated_at
        "#,
    )
    .bind(&id)
    .bind(&new_room.room_number)
    .bind(new_room.floor_number)
    .bind(new_room.monthly_rent)
    .bind(new_room.is_occupied)
    .bind(&new_room.current_tenant_id)
    .fetch_one(db)
    .await?;
    Ok(room)
}

pub async fn get_room_by_id(db: &DbContext, id: &str) -> Result<Room, DbError> {
    let room = sqlx::query_as::<_, Room>(
        r#"
        SELECT id, room_number, floor_number, monthly_rent, is_occupied, current_tenant_id, created_at, updated_at
        FROM rooms
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(room)
}

pub async fn list_rooms(db: &DbContext) -> Result<Vec<Room>, DbError> {
    let rooms = sqlx::query_as::<_, Room>(
        r#"
        SELECT id, room_number, floor_number, monthly_rent, is_occupied, current_tenant_id, created_at, updated_at
        FROM rooms
        ORDER BY room_number
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rooms)
}

/// Writes back all mutable columns of a fetched and modified `Room` value.
pub async fn update_room(db: &DbContext, room: &Room) -> Result<Room, DbError> {
    let room = sqlx::query_as::<_, Room>(
        r#"
        UPDATE rooms
        SET room_number = ?,
            floor_number = ?,
            monthly_rent = ?,
            is_occupied = ?,
            current_tenant_id = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING id, room_number, floor_number, monthly_rent, is_occupied, current_tenant_id, created_at, updated_at
        "#,
    )
    .bind(&room.room_number)
    .bind(room.floor_number)
    .bind(room.monthly_rent)
    .bind(room.is_occupied)
    .bind(&room.current_tenant_id)
    .bind(&room.id)
    .fetch_one(db)
    .await?;
    Ok(room)
}

/// Marks a room occupied by a tenant, or frees it. Used by the lease
/// lifecycle so the occupancy flag and tenant reference change together.
pub async fn set_room_occupancy(
    db: &DbContext,
    id: &str,
    is_occupied: bool,
    current_tenant_id: Option<&str>,
) -> Result<(), DbError> {
    sqlx::query(
        r#"
        UPDATE rooms
        SET is_occupied = ?, current_tenant_id = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(is_occupied)
    .bind(current_tenant_id)
    .bind(id)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn delete_room(db: &DbContext, id: &str) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM rooms WHERE id = ?").bind(id).execute(db).await?;
    Ok(result.rows_affected())
}

pub async fn count_rooms(db: &DbContext) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rooms")
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn count_occupied_rooms(db: &DbContext) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rooms WHERE is_occupied = 1")
        .fetch_one(db)
        .await?;
    Ok(count)
}
