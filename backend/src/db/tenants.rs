use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{DbContext, DbError};

/// Lease record tying a tenant profile to a room. The row id IS the tenant's
/// profile id.
#[derive(Debug, Deserialize, FromRow, Serialize)]
pub struct TenantLease {
    pub id: String,
    pub room_id: String,
    pub lease_start_date: NaiveDate,
    pub lease_end_date: NaiveDate,
    pub rent_due_day: i64,
    pub aadhaar_verified: bool,
    pub contract_signed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewTenantLease {
    pub id: String,
    pub room_id: String,
    pub lease_start_date: NaiveDate,
    pub lease_end_date: NaiveDate,
    pub rent_due_day: i64,
}

/// Lease expanded with the tenant's profile and room for management lists.
#[derive(Debug, Deserialize, FromRow, Serialize)]
pub struct TenantOverview {
    pub id: String,
    pub room_id: String,
    pub lease_start_date: NaiveDate,
    pub lease_end_date: NaiveDate,
    pub rent_due_day: i64,
    pub aadhaar_verified: bool,
    pub contract_signed: bool,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub room_number: String,
}

pub async fn create_tenant_lease(db: &DbContext, new_lease: NewTenantLease) -> Result<TenantLease, DbError> {
    let lease = sqlx::query_as::<_, TenantLease>(
        r#"
        INSERT INTO tenants (id, room_id, lease_start_date, lease_end_date, rent_due_day, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING id, room_id, lease_start_date, lease_end_date, rent_due_day, aadhaar_verified, contract_signed, created_at, updated_at
        "#,
    )
    .bind(&new_lease.id)
    .bind(&new_lease.room_id)
    .bind(new_lease.lease_start_date)
    .bind(new_lease.lease_end_date)
    .bind(new_lease.rent_due_day)
    .fetch_one(db)
    .await?;
    Ok(lease)
}

pub async fn get_tenant_lease_by_id(db: &DbContext, id: &str) -> Result<TenantLease, DbError> {
    let lease = sqlx::query_as::<_, TenantLease>(
        r#"
        SELECT id, room_id, lease_start_date, lease_end_date, rent_due_day, aadhaar_verified, contract_signed, created_at, updated_at
        FROM tenants
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(lease)
}

pub async fn list_tenant_overviews(db: &DbContext) -> Result<Vec<TenantOverview>, DbError> {
    let tenants = sqlx::query_as::<_, TenantOverview>(
        r#"
        SELECT
            t.id, t.room_id, t.lease_start_date, t.lease_end_date, t.rent_due_day,
            t.aadhaar_verified, t.contract_signed,
            p.full_name, p.phone_number,
            r.room_number
        FROM tenants t
        JOIN profiles p ON p.id = t.id
        JOIN rooms r ON r.id = t.room_id
        ORDER BY r.room_number
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(tenants)
}

/// Writes back all mutable lease columns of a fetched and modified value.
pub async fn update_tenant_lease(db: &DbContext, lease: &TenantLease) -> Result<TenantLease, DbError> {
    let lease = sqlx::query_as::<_, TenantLease>(
        r#"
        UPDATE tenants
        SET room_id = ?,
            lease_start_date = ?,
            lease_end_date = ?,
            rent_due_day = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING id, room_id, lease_start_date, lease_end_date, rent_due_day, aadhaar_verified, contract_signed, created_at, updated_at
        "#,
    )
    .bind(&lease.room_id)
    .bind(lease.lease_start_date)
    .bind(lease.lease_end_date)
    .bind(lease.rent_due_day)
    .bind(&lease.id)
    .fetch_one(db)
    .await?;
    Ok(lease)
}

/// Sets the owner-controlled verification flags; `None` keeps the current value.
pub async fn set_tenant_verification(
    db: &DbContext,
    id: &str,
    aadhaar_verified: Option<bool>,
    contract_signed: Option<bool>,
) -> Result<TenantLease, DbError> {
    let lease = sqlx::query_as::<_, TenantLease>(
        r#"
        UPDATE tenants
        SET aadhaar_verified = COALESCE(?, aadhaar_verified),
            contract_signed = COALESCE(?, contract_signed),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING id, room_id, lease_start_date, lease_end_date, rent_due_day, aadhaar_verified, contract_signed, created_at, updated_at
        "#,
    )
    .bind(aadhaar_verified)
    .bind(contract_signed)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(lease)
}

pub async fn delete_tenant_lease(db: &DbContext, id: &str) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM tenants WHERE id = ?").bind(id).execute(db).await?;
    Ok(result.rows_affected())
}

pub async fn lease_exists_for_room(db: &DbContext, room_id: &str) -> Result<bool, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tenants WHERE room_id = ?")
        .bind(room_id)
        .fetch_one(db)
        .await?;
    Ok(count > 0)
}
