use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::{AppointmentRequest, ContactRequest, StatusUpdateRequest};
use crate::server::{AdminAccess, AppState};

/// `?limit=N` on list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Most recent records to return; all when absent
    pub limit: Option<usize>,
}

fn list_params(
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<ListParams> {
    params
        .map(|Query(params)| params)
        .map_err(|_| AppError::Validation("limit must be a non-negative integer".to_string()))
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        debug!(error = %rejection, "Rejected request body");
        AppError::MalformedPayload
    })
}

/// `GET /api/health`: liveness plus the active storage backend
pub async fn health_handler(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let storage = state.service.health().await?;

    Ok(Json(json!({
        "message": format!("{} is running", state.config.business.name),
        "timestamp": Utc::now().to_rfc3339(),
        "database": storage,
    })))
}

/// `GET /api/info`: public business metadata
pub async fn info_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "business": state.config.business }))
}

/// `GET /api/services`: the service catalogue
pub async fn services_handler(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let services = state.service.list_services().await?;

    Ok(Json(json!({
        "success": true,
        "count": services.len(),
        "data": services,
    })))
}

/// `GET /api/appointments`: admin listing, newest first
pub async fn list_appointments_handler(
    _admin: AdminAccess,
    State(state): State<AppState>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let params = list_params(params)?;
    let appointments = state.service.list_appointments(params.limit).await?;

    Ok(Json(json!({
        "success": true,
        "count": appointments.len(),
        "data": appointments,
    })))
}

/// `POST /api/appointments`: public booking form
pub async fn create_appointment_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AppointmentRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let request = json_body(payload)?;
    let appointment = state.service.create_appointment(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Appointment request submitted successfully!",
            "data": {
                "id": appointment.id,
                "name": appointment.name,
                "service": appointment.service,
            },
        })),
    ))
}

/// `PUT /api/appointments/{id}/status`: admin status change
pub async fn update_status_handler(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let request = json_body(payload)?;

    // A malformed id cannot name a stored appointment.
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("Appointment {id} not found")))?;

    let appointment = state
        .service
        .update_appointment_status(id, request.status.as_deref())
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Appointment status updated to {}", appointment.status),
        "data": appointment,
    })))
}

/// `POST /api/contact`: public contact form
pub async fn create_contact_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContactRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let request = json_body(payload)?;
    state.service.create_contact(request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Thank you for your message! We'll get back to you within 24 hours.",
    })))
}

/// `GET /api/contacts`: admin listing, newest first
pub async fn list_contacts_handler(
    _admin: AdminAccess,
    State(state): State<AppState>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let params = list_params(params)?;
    let contacts = state.service.list_contacts(params.limit).await?;

    Ok(Json(json!({
        "success": true,
        "count": contacts.len(),
        "data": contacts,
    })))
}
