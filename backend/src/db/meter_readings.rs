use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{DbContext, DbError};

#[derive(Debug, Deserialize, FromRow, Serialize)]
pub struct MeterReading {
    pub id: String,
    pub room_id: String,
    pub reading_value: f64,
    pub reading_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewMeterReading {
    pub room_id: String,
    pub reading_value: f64,
    pub reading_date: NaiveDate,
}

pub async fn create_meter_reading(db: &DbContext, new_reading: NewMeterReading) -> Result<MeterReading, DbError> {
    let id = Uuid::new_v4().to_string();
    let reading = sqlx::query_as::<_, MeterReading>(
        r#"
        INSERT INTO meter_readings (id, room_id, reading_value, reading_date, created_at, updated_at)
        VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING id, room_id, reading_value, reading_date, created_at, updated_at
        "#,
    )
    .bind(&id)
    .bind(&new_reading.room_id)
    .bind(new_reading.reading_value)
    .bind(new_reading.reading_date)
    .fetch_one(db)
    .await?;
    Ok(reading)
}

pub async fn list_meter_readings_for_room(db: &DbContext, room_id: &str) -> Result<Vec<MeterReading>, DbError> {
    let readings = sqlx::query_as::<_, MeterReading>(
        r#"
        SELECT id, room_id, reading_value, reading_date, created_at, updated_at
        FROM meter_readings
        WHERE room_id = ?
        ORDER BY reading_date DESC, created_at DESC
        "#,
    )
    .bind(room_id)
    .fetch_all(db)
    .await?;
    Ok(readings)
}
