use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};

use crate::error::ApiError;
use crate::wire::{ErrorRes, HealthRes, MessageRes, PatientListRes, SortParams};
use crate::AppState;
use pms_core::{PatientDraft, PatientUpdate, PatientView};

pub(crate) const BANNER_MESSAGE: &str = "Patient Management System API";
pub(crate) const ABOUT_MESSAGE: &str = "A fully functional API to manage your patient records";
pub(crate) const DELETED_MESSAGE: &str = "patient deleted";

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn banner() -> Json<MessageRes> {
    Json(MessageRes::new(BANNER_MESSAGE))
}

#[utoipa::path(
    get,
    path = "/about",
    responses(
        (status = 200, description = "Service description", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn about() -> Json<MessageRes> {
    Json(MessageRes::new(ABOUT_MESSAGE))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks. Does not touch the records file.
#[axum::debug_handler]
pub(crate) async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "PMS REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/view",
    responses(
        (status = 200, description = "All patients keyed by id", body = PatientListRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List all patients in the system
///
/// # Errors
/// Returns `500 Internal Server Error` if the records file cannot be read.
#[axum::debug_handler]
pub(crate) async fn view_patients(
    State(state): State<AppState>,
) -> Result<Json<PatientListRes>, ApiError> {
    let patients = state.patient_service.list()?;
    Ok(Json(patients.into_iter().collect()))
}

#[utoipa::path(
    get,
    path = "/patient/{id}",
    params(("id" = String, Path, description = "ID of the patient in the DB")),
    responses(
        (status = 200, description = "Patient", body = PatientView),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn view_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientView>, ApiError> {
    let patient = state.patient_service.get(&id)?;
    Ok(Json(patient.view()))
}

#[utoipa::path(
    get,
    path = "/sort",
    params(SortParams),
    responses(
        (status = 200, description = "Patients in sorted order", body = [PatientView]),
        (status = 400, description = "Missing or invalid sort field or order", body = ErrorRes)
    )
)]
/// List all patients sorted by height, weight or BMI
///
/// Patients with equal keys keep their store order in both directions.
#[axum::debug_handler]
pub(crate) async fn sort_patients(
    State(state): State<AppState>,
    params: Result<Query<SortParams>, QueryRejection>,
) -> Result<Json<Vec<PatientView>>, ApiError> {
    let Query(params) = params?;
    let patients = state
        .patient_service
        .sort(&params.sort_by, params.order.as_deref())?;
    Ok(Json(patients.iter().map(|p| p.view()).collect()))
}

#[utoipa::path(
    post,
    path = "/create",
    request_body = PatientDraft,
    responses(
        (status = 201, description = "Patient created", body = PatientView),
        (status = 400, description = "Patient already exists", body = ErrorRes),
        (status = 422, description = "Malformed body or validation failed", body = ErrorRes)
    )
)]
/// Create a new patient record
///
/// The body must carry every field including the caller-assigned `id`.
///
/// # Errors
/// - `422 Unprocessable Entity` listing every invalid or missing field,
/// - `400 Bad Request` if the id is already taken.
#[axum::debug_handler]
pub(crate) async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<PatientView>), ApiError> {
    let Json(draft) = payload?;
    let patient = state.patient_service.create(draft)?;
    Ok((StatusCode::CREATED, Json(patient.view())))
}

#[utoipa::path(
    put,
    path = "/edit/{id}",
    params(("id" = String, Path, description = "ID of the patient to update")),
    request_body = PatientUpdate,
    responses(
        (status = 200, description = "Patient updated", body = PatientView),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 422, description = "Malformed body or merged record failed validation", body = ErrorRes)
    )
)]
/// Update some fields of an existing patient
///
/// Only fields present in the body are changed. An `id` in the body is ignored; the path id
/// always wins.
#[axum::debug_handler]
pub(crate) async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PatientUpdate>, JsonRejection>,
) -> Result<Json<PatientView>, ApiError> {
    let Json(update) = payload?;
    let patient = state.patient_service.update(&id, update)?;
    Ok(Json(patient.view()))
}

#[utoipa::path(
    delete,
    path = "/delete/{id}",
    params(("id" = String, Path, description = "ID of the patient to delete")),
    responses(
        (status = 200, description = "Patient deleted", body = MessageRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageRes>, ApiError> {
    state.patient_service.delete(&id)?;
    Ok(Json(MessageRes::new(DELETED_MESSAGE)))
}
