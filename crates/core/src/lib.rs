//! # PMS Core
//!
//! Core business logic for the patient records service.
//!
//! This crate contains pure data operations over a whole-collection record store:
//! - The patient entity model with its derived fields (BMI and verdict)
//! - Partial-update merge with per-field presence tracking
//! - The record store contract and its JSON file implementation
//! - The sort/query contract and the `PatientService` that ties it together
//!
//! **No API concerns**: HTTP routing, status codes and OpenAPI documents belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod service;
pub mod sort;
pub mod store;
pub mod update;
pub mod validation;

pub use config::CoreConfig;
pub use constants::DEFAULT_RECORDS_FILE;
pub use error::{PatientError, PatientResult};
pub use patient::{bmi, Gender, Patient, PatientDraft, PatientView, Verdict};
pub use service::PatientService;
pub use sort::{SortField, SortOrder};
pub use store::{JsonFileStore, PatientRecords, RecordStore, StoredPatient};
pub use update::PatientUpdate;
pub use validation::{FieldViolation, ValidationError};

// Re-export the validated text primitive used across the model.
pub use pms_types::{NonEmptyText, TextError};
