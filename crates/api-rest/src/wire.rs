//! Request and response bodies specific to the REST surface.
//!
//! Patient payloads (`PatientDraft`, `PatientUpdate`, `PatientView`) come from `pms-core`;
//! this module only adds the envelopes around them.

use pms_core::{Patient, PatientView};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::{IntoParams, ToSchema};

/// Plain message body used by the banner, about and delete endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

impl MessageRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// One violated field constraint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorRes {
    pub field: String,
    pub message: String,
}

/// Error body returned for every failed request handled by this API.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldErrorRes>,
}

/// Every patient keyed by id, in store order.
#[derive(Clone, Debug, ToSchema)]
#[schema(value_type = Object)]
pub struct PatientListRes(pub Vec<PatientView>);

impl FromIterator<Patient> for PatientListRes {
    fn from_iter<I: IntoIterator<Item = Patient>>(iter: I) -> Self {
        Self(iter.into_iter().map(|p| p.view()).collect())
    }
}

impl Serialize for PatientListRes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for view in &self.0 {
            map.serialize_entry(&view.id, view)?;
        }
        map.end()
    }
}

/// Query string of `GET /sort`.
#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortParams {
    /// One of `height`, `weight`, `bmi`.
    pub sort_by: String,
    /// `asc` (default) or `desc`.
    pub order: Option<String>,
}
