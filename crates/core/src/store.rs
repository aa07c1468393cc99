//! Record store: whole-collection persistence of patient records.
//!
//! ## Storage Layout
//!
//! Records live in a single JSON object keyed by patient id. The id is the key and is not
//! repeated inside the stored value:
//!
//! ```text
//! {
//!   "P001": { "name": "...", "city": "...", "age": 28, "gender": "female",
//!             "height": 1.65, "weight": 90.0 },
//!   ...
//! }
//! ```
//!
//! Object order is significant: it is the iteration order of the store, which is the order
//! records were created in and the tie-break order for sorting.
//!
//! ## Pure Data Operations
//!
//! Stores load and save the complete collection. They hold no cache and take no locks; two
//! writers racing on the same file end with whichever saved last.

use crate::constants::STAGING_SUFFIX;
use crate::patient::{Gender, Patient, PatientDraft};
use crate::validation::ValidationError;
use crate::{PatientError, PatientResult};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// STORED VALUE
// ============================================================================

/// The non-id fields of a patient as persisted.
///
/// Keys other than these (for example `bmi` or `verdict` written by other tooling) are
/// ignored on load and dropped on the next save.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredPatient {
    pub name: String,
    pub city: String,
    pub age: i64,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
}

impl From<&Patient> for StoredPatient {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name().to_string(),
            city: patient.city().to_string(),
            age: i64::from(patient.age()),
            gender: patient.gender(),
            height: patient.height(),
            weight: patient.weight(),
        }
    }
}

impl StoredPatient {
    /// Rebuild the full patient by combining this value with its key.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the stored fields break any patient constraint.
    pub fn to_patient(&self, id: &str) -> Result<Patient, ValidationError> {
        Patient::try_from(PatientDraft {
            id: Some(id.to_string()),
            name: Some(self.name.clone()),
            city: Some(self.city.clone()),
            age: Some(self.age),
            gender: Some(self.gender.as_str().to_string()),
            height: Some(self.height),
            weight: Some(self.weight),
        })
    }
}

// ============================================================================
// ORDERED RECORD SET
// ============================================================================

/// Ordered mapping from patient id to stored fields.
///
/// Lookups are linear scans. Replacing a record keeps its position and removing one keeps
/// the relative order of the others.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientRecords {
    entries: Vec<(String, StoredPatient)>,
}

impl PatientRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&StoredPatient> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, value)| value)
    }

    /// Insert or replace the record under `id`.
    ///
    /// A new id is appended at the end. Returns the previous value if one was replaced.
    pub fn insert(&mut self, id: impl Into<String>, value: StoredPatient) -> Option<StoredPatient> {
        let id = id.into();
        match self.position(&id) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((id, value));
                None
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<StoredPatient> {
        let i = self.position(id)?;
        Some(self.entries.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoredPatient)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl Serialize for PatientRecords {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PatientRecords {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordsVisitor;

        impl<'de> Visitor<'de> for RecordsVisitor {
            type Value = PatientRecords;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an object mapping patient ids to patient records")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut records = PatientRecords::new();
                while let Some((id, value)) = access.next_entry::<String, StoredPatient>()? {
                    if records.contains(&id) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate patient id: {id}"
                        )));
                    }
                    records.entries.push((id, value));
                }
                Ok(records)
            }
        }

        deserializer.deserialize_map(RecordsVisitor)
    }
}

// ============================================================================
// STORE CONTRACT
// ============================================================================

/// Whole-collection persistence for patient records.
pub trait RecordStore: Send + Sync {
    /// Load every record.
    fn load(&self) -> PatientResult<PatientRecords>;

    /// Replace the persisted collection with `records`.
    fn save(&self, records: &PatientRecords) -> PatientResult<()>;
}

/// Record store backed by one pretty-printed JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(STAGING_SUFFIX);
        self.path.with_file_name(name)
    }

    /// Parse records from JSON text.
    ///
    /// Uses `serde_path_to_error` so a schema mismatch names the offending value
    /// (e.g. `P002.age`).
    pub fn parse(json_text: &str) -> PatientResult<PatientRecords> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);
        serde_path_to_error::deserialize::<_, PatientRecords>(&mut deserializer).map_err(|err| {
            let path = err.path().to_string();
            let path = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            PatientError::Deserialization(format!(
                "records schema mismatch at {path}: {}",
                err.into_inner()
            ))
        })
    }
}

impl RecordStore for JsonFileStore {
    /// A missing or blank file is an empty collection.
    fn load(&self) -> PatientResult<PatientRecords> {
        if !self.path.exists() {
            tracing::debug!("records file {} absent, starting empty", self.path.display());
            return Ok(PatientRecords::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(PatientError::FileRead)?;
        if contents.trim().is_empty() {
            return Ok(PatientRecords::new());
        }

        Self::parse(&contents)
    }

    /// Writes a sibling staging file and renames it over the records file, so readers see
    /// either the old collection or the new one.
    fn save(&self, records: &PatientRecords) -> PatientResult<()> {
        let json = serde_json::to_string_pretty(records).map_err(PatientError::Serialization)?;

        let staging = self.staging_path();
        fs::write(&staging, json).map_err(PatientError::FileWrite)?;
        if let Err(e) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(PatientError::FileWrite(e));
        }

        Ok(())
    }
}
