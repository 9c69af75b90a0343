use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{DbContext, DbError, Role};

#[derive(Debug, Deserialize, FromRow, Serialize)]
pub struct Profile {
    pub id: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub aadhaar_number: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_photo_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewProfile {
    pub id: String,
    pub full_name: Option<String>,
    pub role: Role,
}

/// Partial profile update; `None` fields keep their current value.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub aadhaar_number: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_photo_url: Option<String>,
}

pub async fn create_profile(db: &DbContext, new_profile: NewProfile) -> Result<Profile, DbError> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (id, full_name, role, created_at, updated_at)
        VALUES (?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING id, full_name, role, aadhaar_number, phone_number, date_of_birth, profile_photo_url, created_at, updated_at
        "#,
    )
    .bind(&new_profile.id)
    .bind(&new_profile.full_name)
    .bind(new_profile.role)
    .fetch_one(db)
    .await?;
    Ok(profile)
}

pub async fn get_profile_by_id(db: &DbContext, id: &str) -> Result<Profile, DbError> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, full_name, role, aadhaar_number, phone_number, date_of_birth, profile_photo_url, created_at, updated_at
        FROM profiles
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(profile)
}

pub async fn update_profile(db: &DbContext, id: &str, patch: ProfilePatch) -> Result<Profile, DbError> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET full_name = COALESCE(?, full_name),
            aadhaar_number = COALESCE(?, aadhaar_number),
            phone_number = COALESCE(?, phone_number),
            date_of_birth = COALESCE(?, date_of_birth),
            profile_photo_url = COALESCE(?, profile_photo_url),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING id, full_name, role, aadhaar_number, phone_number, date_of_birth, profile_photo_url, created_at, updated_at
        "#,
    )
    .bind(&patch.full_name)
    .bind(&patch.aadhaar_number)
    .bind(&patch.phone_number)
    .bind(patch.date_of_birth)
    .bind(&patch.profile_photo_url)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(profile)
}

pub async fn list_profiles_by_role(db: &DbContext, role: Role) -> Result<Vec<Profile>, DbError> {
    let profiles = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, full_name, role, aadhaar_number, phone_number, date_of_birth, profile_photo_url, created_at, updated_at
        FROM profiles
        WHERE role = ?
        ORDER BY created_at
        "#,
    )
    .bind(role)
    .fetch_all(db)
    .await?;
    Ok(profiles)
}
