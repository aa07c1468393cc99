//! Partial updates with per-field presence tracking.
//!
//! Each field of [`PatientUpdate`] is an `Option<Option<T>>`:
//! - `None`: the caller did not mention the field; the stored value is kept
//! - `Some(Some(v))`: the caller supplied a value; it replaces the stored value
//! - `Some(None)`: the caller sent an explicit `null`; the field is cleared and the merged
//!   record fails validation as missing a required field
//!
//! The `id` is never updatable. An `id` key in an update payload is ignored.

use crate::patient::{Patient, PatientDraft};
use crate::validation::ValidationError;
use serde::{Deserialize, Deserializer};

/// Sparse set of proposed field values for an existing patient.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PatientUpdate {
    #[serde(default, deserialize_with = "present")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub age: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub height: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub weight: Option<Option<f64>>,
}

/// Marks a key that appeared in the payload, whether its value was `null` or not.
/// Absent keys never reach this function and fall back to `Default` (`None`).
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PatientUpdate {
    /// Returns true if the update names no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.city.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.height.is_none()
            && self.weight.is_none()
    }

    /// Overwrite every supplied field of `draft`, leaving the rest untouched.
    fn apply_to(self, draft: &mut PatientDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(city) = self.city {
            draft.city = city;
        }
        if let Some(age) = self.age {
            draft.age = age;
        }
        if let Some(gender) = self.gender {
            draft.gender = gender;
        }
        if let Some(height) = self.height {
            draft.height = height;
        }
        if let Some(weight) = self.weight {
            draft.weight = weight;
        }
    }
}

impl Patient {
    /// Merge a partial update onto this patient.
    ///
    /// The merged field set goes through the same validation as a fresh construction, so the
    /// result is either a fully valid patient or an error; a subset of the changes is never
    /// applied on its own. `self` is left unchanged either way.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every constraint the merged record violates.
    pub fn merge(&self, update: PatientUpdate) -> Result<Patient, ValidationError> {
        let mut draft = PatientDraft::from(self);
        update.apply_to(&mut draft);
        Patient::try_from(draft)
    }
}
