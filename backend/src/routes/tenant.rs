use axum::Extension;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::auth;
use crate::core;
use crate::db;
use crate::routes::api::ApiError;
use crate::services::notifier;

// ---------------------------------------------------------------------------
// Dashboard

pub async fn dashboard(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
) -> Result<impl IntoResponse, ApiError> {
    let lease = match db::get_tenant_lease_by_id(&context.db, &claims.sub).await {
        Ok(lease) => Some(lease),
        Err(core::DbError::RowNotFound) => None,
        Err(e) => return Err(e.into()),
    };

    let room = match &lease {
        Some(lease) => Some(db::get_room_by_id(&context.db, &lease.room_id).await?),
        None => None,
    };

    let unread_notifications = db::unread_notification_count(&context.db, &claims.sub).await?;
    let latest_payment = db::list_payments_for_tenant(&context.db, &claims.sub)
        .await?
        .into_iter()
        .next();

    Ok(Json(json!({
        "result": "ok",
        "dashboard": {
            "lease": lease,
            "room": room,
            "unread_notifications": unread_notifications,
            "latest_payment": latest_payment,
        }
    })))
}

// ---------------------------------------------------------------------------
// Profile

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_photo_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitVerification {
    #[validate(length(equal = 12, message = "Aadhaar number must be 12 digits"))]
    pub aadhaar_number: String,
    pub document_photo_url: Option<String>,
}

pub async fn get_profile(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = db::get_profile_by_id(&context.db, &claims.sub).await?;
    let user = db::get_user_by_id(&context.db, &claims.sub).await?;
    let lease = match db::get_tenant_lease_by_id(&context.db, &claims.sub).await {
        Ok(lease) => Some(lease),
        Err(core::DbError::RowNotFound) => None,
        Err(e) => return Err(e.into()),
    };

    Ok(Json(json!({
        "result": "ok",
        "profile": profile,
        "email": user.email,
        "lease": lease,
    })))
}

pub async fn update_profile(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
    Json(payload): Json<UpdateProfile>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let profile = db::update_profile(
        &context.db,
        &claims.sub,
        db::ProfilePatch {
            full_name: payload.full_name,
            phone_number: payload.phone_number,
            date_of_birth: payload.date_of_birth,
            profile_photo_url: payload.profile_photo_url,
            ..Default::default()
        },
    )
    .await?;

    Ok(Json(json!({"result": "ok", "profile": profile})))
}

/// Submits the identity verification data: the Aadhaar number and the
/// uploaded document photo reference. The verified flag itself is
/// owner-controlled and stays untouched here.
pub async fn submit_verification(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
    Json(payload): Json<SubmitVerification>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    if !payload.aadhaar_number.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::InvalidInput("Aadhaar number must contain only digits".to_string()));
    }

    let profile = db::update_profile(
        &context.db,
        &claims.sub,
        db::ProfilePatch {
            aadhaar_number: Some(payload.aadhaar_number),
            profile_photo_url: payload.document_photo_url,
            ..Default::default()
        },
    )
    .await?;

    notifier::notify_owners(
        &context.db,
        db::NotificationKind::Info,
        "Verification submitted",
        &format!(
            "{} has submitted identity documents for verification.",
            profile.full_name.as_deref().unwrap_or("A tenant")
        ),
        Some("/owner/tenants"),
    )
    .await;

    Ok(Json(json!({"result": "ok", "profile": profile})))
}

// ---------------------------------------------------------------------------
// Payments

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePayment {
    #[validate(range(min = 0.01, message = "Amount must be greater than 0"))]
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub payment_screenshot_url: Option<String>,
}

pub async fn list_payments(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = db::list_payments_for_tenant(&context.db, &claims.sub).await?;
    Ok(Json(json!({"result": "ok", "payments": payments})))
}

pub async fn create_payment(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
    Json(payload): Json<CreatePayment>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    // A payment is always tied to the room of the tenant's active lease
    let lease = match db::get_tenant_lease_by_id(&context.db, &claims.sub).await {
        Ok(lease) => lease,
        Err(core::DbError::RowNotFound) => {
            return Err(ApiError::InvalidInput(
                "No active lease found; payments require an assigned room".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let payment = db::create_payment(
        &context.db,
        db::NewPayment {
            tenant_id: claims.sub.clone(),
            room_id: lease.room_id,
            amount: payload.amount,
            payment_date: payload.payment_date,
            payment_screenshot_url: payload.payment_screenshot_url,
        },
    )
    .await?;

    notifier::notify_owners(
        &context.db,
        db::NotificationKind::Info,
        "Payment submitted",
        &format!("{} submitted a payment of {:.2} for verification.", claims.name, payment.amount),
        Some("/owner/payments"),
    )
    .await;

    tracing::info!(payment_id = payment.id, tenant_id = claims.sub, "Payment submitted");
    Ok(Json(json!({"result": "ok", "payment": payment})))
}

// ---------------------------------------------------------------------------
// Maintenance

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaintenanceRequest {
    #[validate(length(min = 1, message = "Request type is required"))]
    pub request_type: String,
    pub description: Option<String>,
}

pub async fn list_maintenance(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = db::list_maintenance_requests_for_tenant(&context.db, &claims.sub).await?;
    Ok(Json(json!({"result": "ok", "requests": requests})))
}

pub async fn create_maintenance(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
    Json(payload): Json<CreateMaintenanceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let lease = match db::get_tenant_lease_by_id(&context.db, &claims.sub).await {
        Ok(lease) => lease,
        Err(core::DbError::RowNotFound) => {
            return Err(ApiError::InvalidInput(
                "No active lease found; maintenance requests require an assigned room".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let request = db::create_maintenance_request(
        &context.db,
        db::NewMaintenanceRequest {
            tenant_id: claims.sub.clone(),
            room_id: lease.room_id,
            request_type: payload.request_type,
            description: payload.description,
        },
    )
    .await?;

    notifier::notify_owners(
        &context.db,
        db::NotificationKind::Info,
        "New maintenance request",
        &format!("{} reported a {} issue.", claims.name, request.request_type),
        Some("/owner/maintenance"),
    )
    .await;

    tracing::info!(request_id = request.id, tenant_id = claims.sub, "Maintenance request submitted");
    Ok(Json(json!({"result": "ok", "request": request})))
}
