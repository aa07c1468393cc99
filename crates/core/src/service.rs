//! Patient service.
//!
//! The record operations (list, get, sort, create, update, delete) over a
//! [`RecordStore`]. Every call loads the full collection at entry and mutating calls save the
//! full collection back exactly once, after the change has been validated. Nothing is cached
//! between calls.

use crate::patient::{Patient, PatientDraft};
use crate::sort::{parse_sort, sort_patients};
use crate::store::{PatientRecords, RecordStore, StoredPatient};
use crate::update::PatientUpdate;
use crate::{PatientError, PatientResult};

/// Pure patient data operations - no API concerns
#[derive(Clone, Debug)]
pub struct PatientService<S> {
    store: S,
}

impl<S: RecordStore> PatientService<S> {
    /// Creates a new instance of PatientService over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rebuild validated patients from loaded records, in store order.
    fn patients(records: &PatientRecords) -> PatientResult<Vec<Patient>> {
        records
            .iter()
            .map(|(id, stored)| {
                stored
                    .to_patient(id)
                    .map_err(|source| PatientError::CorruptRecord {
                        id: id.to_string(),
                        source,
                    })
            })
            .collect()
    }

    fn stored_patient(records: &PatientRecords, id: &str) -> PatientResult<Patient> {
        let stored = records
            .get(id)
            .ok_or_else(|| PatientError::NotFound(id.to_string()))?;
        stored
            .to_patient(id)
            .map_err(|source| PatientError::CorruptRecord {
                id: id.to_string(),
                source,
            })
    }

    /// Lists every patient in store order.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if the store cannot be read or holds an invalid record.
    pub fn list(&self) -> PatientResult<Vec<Patient>> {
        let records = self.store.load()?;
        Self::patients(&records)
    }

    /// Fetches one patient.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if `id` is not in the store.
    pub fn get(&self, id: &str) -> PatientResult<Patient> {
        let records = self.store.load()?;
        Self::stored_patient(&records, id)
    }

    /// Lists every patient ordered by `sort_by` (`height`, `weight` or `bmi`).
    ///
    /// `order` is `asc` or `desc` and defaults to `asc`. Ties keep store order.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidArgument` for an unknown field or order. The arguments
    /// are checked before the store is read.
    pub fn sort(&self, sort_by: &str, order: Option<&str>) -> PatientResult<Vec<Patient>> {
        let (field, order) = parse_sort(sort_by, order)?;
        let mut patients = self.list()?;
        sort_patients(&mut patients, field, order);
        Ok(patients)
    }

    /// Creates a patient from a full field set.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if:
    /// - the draft fails validation (`Validation`), checked before the store is read,
    /// - a patient with the same id exists (`AlreadyExists`); the existing record is untouched.
    pub fn create(&self, draft: PatientDraft) -> PatientResult<Patient> {
        let patient = Patient::try_from(draft).inspect_err(|e| {
            tracing::warn!("create rejected: {}", e);
        })?;

        let mut records = self.store.load()?;
        if records.contains(patient.id()) {
            tracing::warn!("create rejected: patient {} already exists", patient.id());
            return Err(PatientError::AlreadyExists(patient.id().to_string()));
        }

        records.insert(patient.id(), StoredPatient::from(&patient));
        self.store.save(&records)?;

        tracing::info!("created patient {}", patient.id());
        Ok(patient)
    }

    /// Applies a partial update to an existing patient.
    ///
    /// Read-merge-validate-write: the merged record is validated in full before anything is
    /// saved, and the record keeps its position in the store.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if:
    /// - `id` is not in the store (`NotFound`),
    /// - the merged record fails validation (`Validation`); the stored record is untouched.
    pub fn update(&self, id: &str, update: PatientUpdate) -> PatientResult<Patient> {
        let mut records = self.store.load()?;
        let existing = Self::stored_patient(&records, id)?;

        let merged = existing.merge(update).inspect_err(|e| {
            tracing::warn!("update of patient {} rejected: {}", id, e);
        })?;

        records.insert(id, StoredPatient::from(&merged));
        self.store.save(&records)?;

        tracing::info!("updated patient {}", id);
        Ok(merged)
    }

    /// Removes a patient.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if `id` is not in the store; nothing is saved.
    pub fn delete(&self, id: &str) -> PatientResult<()> {
        let mut records = self.store.load()?;
        if records.remove(id).is_none() {
            return Err(PatientError::NotFound(id.to_string()));
        }
        self.store.save(&records)?;

        tracing::info!("deleted patient {}", id);
        Ok(())
    }
}
