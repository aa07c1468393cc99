//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::constants::DEFAULT_RECORDS_FILE;
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    records_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The records file itself may not exist yet (it is created on the first save), but the
    /// directory that will hold it must.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidInput` if the path is empty, names a directory, or its
    /// parent directory does not exist.
    pub fn new(records_file: PathBuf) -> PatientResult<Self> {
        if records_file.as_os_str().is_empty() {
            return Err(PatientError::InvalidInput(
                "records file path cannot be empty".into(),
            ));
        }

        if records_file.is_dir() {
            return Err(PatientError::InvalidInput(format!(
                "records file path is a directory: {}",
                records_file.display()
            )));
        }

        let parent = records_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if !parent.is_dir() {
            return Err(PatientError::InvalidInput(format!(
                "records directory does not exist: {}",
                parent.display()
            )));
        }

        Ok(Self { records_file })
    }

    pub fn records_file(&self) -> &Path {
        &self.records_file
    }
}

/// Resolve the records file path from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_RECORDS_FILE`].
pub fn records_file_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDS_FILE))
}
