//! Mapping from core errors to HTTP responses.

use crate::wire::{ErrorRes, FieldErrorRes};
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use pms_core::PatientError;

/// Error returned by REST handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Vec<FieldErrorRes>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        let (status, message, details) = match err {
            PatientError::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed".to_string(),
                e.violations()
                    .iter()
                    .map(|v| FieldErrorRes {
                        field: v.field().to_string(),
                        message: v.message().to_string(),
                    })
                    .collect(),
            ),
            PatientError::NotFound(_) => {
                (StatusCode::NOT_FOUND, "Patient not found".to_string(), vec![])
            }
            PatientError::AlreadyExists(_) => (
                StatusCode::BAD_REQUEST,
                "Patient already exists".to_string(),
                vec![],
            ),
            PatientError::InvalidArgument(message) => (StatusCode::BAD_REQUEST, message, vec![]),
            other => {
                tracing::error!("Patient store error: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                    vec![],
                )
            }
        };

        Self {
            status,
            message,
            details,
        }
    }
}

/// A request body that is not JSON, or JSON of the wrong shape.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection {
            JsonRejection::MissingJsonContentType(_) => rejection.status(),
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self {
            status,
            message: rejection.body_text(),
            details: vec![],
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
            details: vec![],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorRes {
            error: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}
