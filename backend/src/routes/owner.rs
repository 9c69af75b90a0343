use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::core;
use crate::db;
use crate::routes::api::ApiError;
use crate::services::notifier;

// ---------------------------------------------------------------------------
// Dashboard

pub async fn dashboard(State(context): State<core::ArcContext>) -> Result<impl IntoResponse, ApiError> {
    let total_rooms = db::count_rooms(&context.db).await?;
    let occupied_rooms = db::count_occupied_rooms(&context.db).await?;
    let pending_maintenance =
        db::count_maintenance_requests_by_status(&context.db, db::MaintenanceStatus::Pending).await?;
    let pending_payments = db::count_payments_by_status(&context.db, db::VerificationStatus::Pending).await?;
    let verified_total = db::verified_payment_total(&context.db).await?;

    Ok(Json(json!({
        "result": "ok",
        "dashboard": {
            "total_rooms": total_rooms,
            "occupied_rooms": occupied_rooms,
            "available_rooms": total_rooms - occupied_rooms,
            "pending_maintenance": pending_maintenance,
            "pending_payments": pending_payments,
            "verified_payment_total": verified_total,
        }
    })))
}

// ---------------------------------------------------------------------------
// Rooms

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoom {
    #[validate(length(min = 1, message = "Room number is required"))]
    pub room_number: String,
    pub floor_number: i64,
    #[validate(range(min = 0.01, message = "Monthly rent must be greater than 0"))]
    pub monthly_rent: f64,
    #[serde(default)]
    pub is_occupied: bool,
    pub current_tenant_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoom {
    #[validate(length(min = 1, message = "Room number is required"))]
    pub room_number: Option<String>,
    pub floor_number: Option<i64>,
    #[validate(range(min = 0.01, message = "Monthly rent must be greater than 0"))]
    pub monthly_rent: Option<f64>,
    pub is_occupied: Option<bool>,
    pub current_tenant_id: Option<String>,
}

pub async fn list_rooms(State(context): State<core::ArcContext>) -> Result<impl IntoResponse, ApiError> {
    let rooms = db::list_rooms(&context.db).await?;
    Ok(Json(json!({"result": "ok", "rooms": rooms})))
}

pub async fn create_room(
    State(context): State<core::ArcContext>,
    Json(payload): Json<CreateRoom>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    // A tenant reference implies occupancy; occupancy requires a tenant.
    let is_occupied = payload.is_occupied || payload.current_tenant_id.is_some();
    if is_occupied && payload.current_tenant_id.is_none() {
        return Err(ApiError::InvalidInput(
            "An occupied room must reference its current tenant".to_string(),
        ));
    }

    let room = db::create_room(
        &context.db,
        db::NewRoom {
            room_number: payload.room_number,
            floor_number: payload.floor_number,
            monthly_rent: payload.monthly_rent,
            is_occupied,
            current_tenant_id: payload.current_tenant_id,
        },
    )
    .await?;

    tracing::info!(room_id = room.id, room_number = room.room_number, "Room created");
    Ok(Json(json!({"result": "ok", "room": room})))
}

pub async fn update_room(
    State(context): State<core::ArcContext>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRoom>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let mut room = match db::get_room_by_id(&context.db, &id).await {
        Ok(room) => room,
        Err(core::DbError::RowNotFound) => return Err(ApiError::NotFound("Room")),
        Err(e) => return Err(e.into()),
    };

    if let Some(room_number) = payload.room_number {
        room.room_number = room_number;
    }
    if let Some(floor_number) = payload.floor_number {
        room.floor_number = floor_number;
    }
    if let Some(monthly_rent) = payload.monthly_rent {
        room.monthly_rent = monthly_rent;
    }
    if let Some(current_tenant_id) = payload.current_tenant_id {
        room.current_tenant_id = Some(current_tenant_id);
    }
    if let Some(is_occupied) = payload.is_occupied {
        room.is_occupied = is_occupied;
        // Freeing the room also drops the tenant reference
        if !is_occupied {
            room.current_tenant_id = None;
        }
    }

    if room.current_tenant_id.is_some() {
        room.is_occupied = true;
    }
    if room.is_occupied && room.current_tenant_id.is_none() {
        return Err(ApiError::InvalidInput(
            "An occupied room must reference its current tenant".to_string(),
        ));
    }

    let room = db::update_room(&context.db, &room).await?;
    Ok(Json(json!({"result": "ok", "room": room})))
}

pub async fn delete_room(
    State(context): State<core::ArcContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if db::lease_exists_for_room(&context.db, &id).await? {
        return Err(ApiError::Conflict(
            "Room has an active lease and cannot be deleted".to_string(),
        ));
    }

    let deleted = db::delete_room(&context.db, &id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Room"));
    }
    Ok(Json(json!({"result": "ok"})))
}

// ---------------------------------------------------------------------------
// Tenants (lease records)

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTenant {
    #[validate(length(min = 1, message = "Tenant profile id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Room id is required"))]
    pub room_id: String,
    pub lease_start_date: NaiveDate,
    pub lease_end_date: NaiveDate,
    #[validate(range(min = 1, max = 31, message = "Rent due day must be between 1 and 31"))]
    pub rent_due_day: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTenant {
    pub room_id: Option<String>,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 31, message = "Rent due day must be between 1 and 31"))]
    pub rent_due_day: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyTenant {
    pub aadhaar_verified: Option<bool>,
    pub contract_signed: Option<bool>,
}

pub async fn list_tenants(State(context): State<core::ArcContext>) -> Result<impl IntoResponse, ApiError> {
    let tenants = db::list_tenant_overviews(&context.db).await?;
    Ok(Json(json!({"result": "ok", "tenants": tenants})))
}

pub async fn create_tenant(
    State(context): State<core::ArcContext>,
    Json(payload): Json<CreateTenant>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    if payload.lease_start_date > payload.lease_end_date {
        return Err(ApiError::InvalidInput(
            "Lease start date must not be after the lease end date".to_string(),
        ));
    }

    let profile = match db::get_profile_by_id(&context.db, &payload.id).await {
        Ok(profile) => profile,
        Err(core::DbError::RowNotFound) => return Err(ApiError::NotFound("Tenant profile")),
        Err(e) => return Err(e.into()),
    };
    if profile.role != core::Role::Tenant {
        return Err(ApiError::InvalidInput("The referenced profile is not a tenant".to_string()));
    }

    let room = match db::get_room_by_id(&context.db, &payload.room_id).await {
        Ok(room) => room,
        Err(core::DbError::RowNotFound) => return Err(ApiError::NotFound("Room")),
        Err(e) => return Err(e.into()),
    };
    if room.is_occupied && room.current_tenant_id.as_deref() != Some(payload.id.as_str()) {
        return Err(ApiError::Conflict("Room is already occupied by another tenant".to_string()));
    }

    let lease = db::create_tenant_lease(
        &context.db,
        db::NewTenantLease {
            id: payload.id,
            room_id: payload.room_id,
            lease_start_date: payload.lease_start_date,
            lease_end_date: payload.lease_end_date,
            rent_due_day: payload.rent_due_day,
        },
    )
    .await?;

    db::set_room_occupancy(&context.db, &lease.room_id, true, Some(&lease.id)).await?;

    tracing::info!(tenant_id = lease.id, room_id = lease.room_id, "Tenant lease created");
    Ok(Json(json!({"result": "ok", "tenant": lease})))
}

pub async fn update_tenant(
    State(context): State<core::ArcContext>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTenant>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let mut lease = match db::get_tenant_lease_by_id(&context.db, &id).await {
        Ok(lease) => lease,
        Err(core::DbError::RowNotFound) => return Err(ApiError::NotFound("Tenant")),
        Err(e) => return Err(e.into()),
    };

    let previous_room_id = lease.room_id.clone();
    if let Some(room_id) = payload.room_id {
        lease.room_id = room_id;
    }
    if let Some(lease_start_date) = payload.lease_start_date {
        lease.lease_start_date = lease_start_date;
    }
    if let Some(lease_end_date) = payload.lease_end_date {
        lease.lease_end_date = lease_end_date;
    }
    if let Some(rent_due_day) = payload.rent_due_day {
        lease.rent_due_day = rent_due_day;
    }

    if lease.lease_start_date > lease.lease_end_date {
        return Err(ApiError::InvalidInput(
            "Lease start date must not be after the lease end date".to_string(),
        ));
    }

    if lease.room_id != previous_room_id {
        let room = match db::get_room_by_id(&context.db, &lease.room_id).await {
            Ok(room) => room,
            Err(core::DbError::RowNotFound) => return Err(ApiError::NotFound("Room")),
            Err(e) => return Err(e.into()),
        };
        if room.is_occupied {
            return Err(ApiError::Conflict("Room is already occupied by another tenant".to_string()));
        }
    }

    let lease = db::update_tenant_lease(&context.db, &lease).await?;

    if lease.room_id != previous_room_id {
        db::set_room_occupancy(&context.db, &previous_room_id, false, None).await?;
        db::set_room_occupancy(&context.db, &lease.room_id, true, Some(&lease.id)).await?;
    }

    Ok(Json(json!({"result": "ok", "tenant": lease})))
}

pub async fn verify_tenant(
    State(context): State<core::ArcContext>,
    Path(id): Path<String>,
    Json(payload): Json<VerifyTenant>,
) -> Result<impl IntoResponse, ApiError> {
    let lease = match db::set_tenant_verification(&context.db, &id, payload.aadhaar_verified, payload.contract_signed)
        .await
    {
        Ok(lease) => lease,
        Err(core::DbError::RowNotFound) => return Err(ApiError::NotFound("Tenant")),
        Err(e) => return Err(e.into()),
    };

    if payload.aadhaar_verified == Some(true) {
        notifier::notify_user(
            &context.db,
            &lease.id,
            db::NotificationKind::Success,
            "Identity verified",
            "Your identity document has been verified by the owner.",
            Some("/tenant/profile"),
        )
        .await;
    }

    Ok(Json(json!({"result": "ok", "tenant": lease})))
}

pub async fn delete_tenant(
    State(context): State<core::ArcContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let lease = match db::get_tenant_lease_by_id(&context.db, &id).await {
        Ok(lease) => lease,
        Err(core::DbError::RowNotFound) => return Err(ApiError::NotFound("Tenant")),
        Err(e) => return Err(e.into()),
    };

    db::delete_tenant_lease(&context.db, &id).await?;
    db::set_room_occupancy(&context.db, &lease.room_id, false, None).await?;

    tracing::info!(tenant_id = id, room_id = lease.room_id, "Tenant lease removed");
    Ok(Json(json!({"result": "ok"})))
}

// ---------------------------------------------------------------------------
// Maintenance

#[derive(Debug, Deserialize)]
pub struct MaintenanceListQuery {
    pub status: Option<db::MaintenanceStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMaintenanceStatus {
    pub status: db::MaintenanceStatus,
}

pub async fn list_maintenance(
    State(context): State<core::ArcContext>,
    Query(query): Query<MaintenanceListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = db::list_maintenance_requests(&context.db, query.status).await?;
    Ok(Json(json!({"result": "ok", "requests": requests})))
}

pub async fn update_maintenance_status(
    State(context): State<core::ArcContext>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMaintenanceStatus>,
) -> Result<impl IntoResponse, ApiError> {
    let request = match db::get_maintenance_request_by_id(&context.db, &id).await {
        Ok(request) => request,
        Err(core::DbError::RowNotFound) => return Err(ApiError::NotFound("Maintenance request")),
        Err(e) => return Err(e.into()),
    };

    if !request.status.can_transition_to(payload.status) {
        return Err(ApiError::InvalidStatusTransition {
            from: request.status.as_str(),
            to: payload.status.as_str(),
        });
    }

    let request = db::set_maintenance_status(&context.db, &id, payload.status).await?;

    notifier::notify_user(
        &context.db,
        &request.tenant_id,
        db::NotificationKind::Info,
        "Maintenance update",
        &format!(
            "Your {} request is now {}.",
            request.request_type,
            request.status.as_str().replace('_', " ")
        ),
        Some("/tenant/maintenance"),
    )
    .await;

    Ok(Json(json!({"result": "ok", "request": request})))
}

// ---------------------------------------------------------------------------
// Payments

#[derive(Debug, Deserialize)]
pub struct VerifyPayment {
    pub status: db::VerificationStatus,
}

pub async fn list_payments(State(context): State<core::ArcContext>) -> Result<impl IntoResponse, ApiError> {
    let payments = db::list_payment_details(&context.db).await?;
    let total_verified = db::verified_payment_total(&context.db).await?;
    Ok(Json(json!({
        "result": "ok",
        "payments": payments,
        "total_verified": total_verified,
    })))
}

pub async fn verify_payment(
    State(context): State<core::ArcContext>,
    Path(id): Path<String>,
    Json(payload): Json<VerifyPayment>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.status == db::VerificationStatus::Pending {
        return Err(ApiError::InvalidInput(
            "Verification status must be 'verified' or 'rejected'".to_string(),
        ));
    }

    let payment = match db::get_payment_by_id(&context.db, &id).await {
        Ok(payment) => payment,
        Err(core::DbError::RowNotFound) => return Err(ApiError::NotFound("Payment")),
        Err(e) => return Err(e.into()),
    };

    if !payment.verification_status.can_transition_to(payload.status) {
        return Err(ApiError::InvalidStatusTransition {
            from: payment.verification_status.as_str(),
            to: payload.status.as_str(),
        });
    }

    let payment = db::set_payment_verification(&context.db, &id, payload.status).await?;

    let (kind, title, message) = match payment.verification_status {
        db::VerificationStatus::Verified => (
            db::NotificationKind::Success,
            "Payment verified",
            format!("Your payment of {:.2} has been verified.", payment.amount),
        ),
        _ => (
            db::NotificationKind::Warning,
            "Payment rejected",
            format!("Your payment of {:.2} was rejected. Please contact the owner.", payment.amount),
        ),
    };
    notifier::notify_user(&context.db, &payment.tenant_id, kind, title, &message, Some("/tenant/payments")).await;

    Ok(Json(json!({"result": "ok", "payment": payment})))
}

// ---------------------------------------------------------------------------
// Meter readings

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMeterReading {
    #[validate(range(min = 0.0, message = "Reading value must not be negative"))]
    pub reading_value: f64,
    pub reading_date: NaiveDate,
}

pub async fn list_meter_readings(
    State(context): State<core::ArcContext>,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let readings = db::list_meter_readings_for_room(&context.db, &room_id).await?;
    Ok(Json(json!({"result": "ok", "readings": readings})))
}

pub async fn create_meter_reading(
    State(context): State<core::ArcContext>,
    Path(room_id): Path<String>,
    Json(payload): Json<CreateMeterReading>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    // The room must exist before a reading can be attached to it
    if let Err(core::DbError::RowNotFound) = db::get_room_by_id(&context.db, &room_id).await {
        return Err(ApiError::NotFound("Room"));
    }

    let reading = db::create_meter_reading(
        &context.db,
        db::NewMeterReading {
            room_id,
            reading_value: payload.reading_value,
            reading_date: payload.reading_date,
        },
    )
    .await?;

    Ok(Json(json!({"result": "ok", "reading": reading})))
}
