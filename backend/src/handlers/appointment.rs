//! Appointment HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::AppointmentInput;

use crate::services::AppointmentService;
use crate::AppState;

/// List all appointments
pub async fn list_appointments(State(state): State<AppState>) -> impl IntoResponse {
    let service = AppointmentService::new(state.db.clone());

    match service.list_appointments().await {
        Ok(appointments) => (StatusCode::OK, Json(appointments)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get an appointment
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
) -> impl IntoResponse {
    let service = AppointmentService::new(state.db.clone());

    match service.get_appointment(appointment_id).await {
        Ok(appointment) => (StatusCode::OK, Json(appointment)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Book an appointment
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(input): Json<AppointmentInput>,
) -> impl IntoResponse {
    let service = AppointmentService::new(state.db.clone());

    match service.create_appointment(input).await {
        Ok(appointment) => (StatusCode::CREATED, Json(appointment)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update an appointment
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
    Json(input): Json<AppointmentInput>,
) -> impl IntoResponse {
    let service = AppointmentService::new(state.db.clone());

    match service.update_appointment(appointment_id, input).await {
        Ok(appointment) => (StatusCode::OK, Json(appointment)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Cancel an appointment
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
) -> impl IntoResponse {
    let service = AppointmentService::new(state.db.clone());

    match service.delete_appointment(appointment_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
