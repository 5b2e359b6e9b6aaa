//! Request handlers: thin mapping between HTTP and the record service.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use portal_service::{Logged, PatientPayload, PatientView, PaymentPayload, PaymentView, ServiceError};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Logged>,
}

/// A service failure carried to the wire.
///
/// Validation failures map to 400, missing records to 404, everything else
/// to an opaque 500 - the detail for unexpected failures stays in the logs.
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.0 {
            ServiceError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, "validation", self.0.to_string())
            }
            ServiceError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, "not_found", self.0.to_string())
            }
            ServiceError::Unexpected { message } => {
                tracing::error!(detail = %message, "Unexpected service failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Patient Portal",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ready" }))
}

// ---- Patients ----

pub async fn list_patients(State(state): State<AppState>) -> ApiResult<Json<Vec<PatientView>>> {
    Ok(Json(state.service.list_patients().await?))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<PatientView>> {
    match state.service.get_patient(id).await? {
        Some(patient) => Ok(Json(patient)),
        None => Err(ServiceError::not_found("patient", id).into()),
    }
}

pub async fn create_patient(
    State(state): State<AppState>,
    Json(payload): Json<PatientPayload>,
) -> ApiResult<(StatusCode, Json<PatientView>)> {
    let created = state.service.create_patient(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<PatientPayload>,
) -> ApiResult<Json<PatientView>> {
    Ok(Json(state.service.update_patient(id, payload).await?))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.service.delete_patient(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- Payments ----

pub async fn list_patient_payments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<PaymentView>>> {
    Ok(Json(state.service.list_payments(id).await?))
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<PaymentPayload>,
) -> ApiResult<(StatusCode, Json<PaymentView>)> {
    let created = state.service.add_payment(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
