//! Patient entity model.
//!
//! Responsibilities:
//! - Define the validated [`Patient`] entity and its raw input form, [`PatientDraft`]
//! - Compute the derived fields (BMI and [`Verdict`]) from stored state on every access
//! - Provide [`PatientView`], the serialisable shape returned to callers
//!
//! Notes:
//! - Derived fields are never stored; they cannot go stale when height or weight change
//! - Construction either yields a fully valid patient or lists every violated constraint

use crate::constants::{BMI_NORMAL_FROM, BMI_OBESE_FROM, BMI_OVERWEIGHT_FROM};
use crate::validation::{ValidationError, Violations};
use pms_types::NonEmptyText;
use serde::{Deserialize, Serialize};

// ============================================================================
// Enumerations
// ============================================================================

/// Recorded gender of a patient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    /// Wire format string.
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Others => "others",
        }
    }

    /// Parse from wire format string. Matching is case-sensitive.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "others" => Some(Gender::Others),
            _ => None,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical reading of a BMI value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Verdict {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Verdict {
    /// Classify a BMI value. Each band includes its lower bound.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < BMI_NORMAL_FROM {
            Verdict::Underweight
        } else if bmi < BMI_OVERWEIGHT_FROM {
            Verdict::Normal
        } else if bmi < BMI_OBESE_FROM {
            Verdict::Overweight
        } else {
            Verdict::Obese
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Underweight => "Underweight",
            Verdict::Normal => "Normal",
            Verdict::Overweight => "Overweight",
            Verdict::Obese => "Obese",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body-mass-index for a height in metres and a weight in kilograms, rounded to 2 decimals.
///
/// Rounding works on the exact binary value of the quotient and sends exact ties to the even
/// digit, so `33.3 / 1.2²` (exactly `23.125`) gives `23.12`.
pub fn bmi(height: f64, weight: f64) -> f64 {
    let raw = weight / height.powi(2);
    format!("{raw:.2}").parse().unwrap_or(raw)
}

// ============================================================================
// Raw input
// ============================================================================

/// Unvalidated patient field set.
///
/// Every field is optional so that a missing field is reported as a validation failure
/// alongside all the others rather than aborting deserialisation at the first gap.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PatientDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: Option<String>,
    /// Height in metres.
    #[serde(default)]
    pub height: Option<f64>,
    /// Weight in kilograms.
    #[serde(default)]
    pub weight: Option<f64>,
}

impl From<&Patient> for PatientDraft {
    fn from(patient: &Patient) -> Self {
        Self {
            id: Some(patient.id.as_str().to_string()),
            name: Some(patient.name.as_str().to_string()),
            city: Some(patient.city.as_str().to_string()),
            age: Some(i64::from(patient.age)),
            gender: Some(patient.gender.as_str().to_string()),
            height: Some(patient.height),
            weight: Some(patient.weight),
        }
    }
}

// ============================================================================
// Entity
// ============================================================================

/// A validated patient record.
///
/// Fields are private so that every instance has passed full validation.
#[derive(Clone, Debug, PartialEq)]
pub struct Patient {
    id: NonEmptyText,
    name: NonEmptyText,
    city: NonEmptyText,
    age: u8,
    gender: Gender,
    height: f64,
    weight: f64,
}

impl TryFrom<PatientDraft> for Patient {
    type Error = ValidationError;

    fn try_from(draft: PatientDraft) -> Result<Self, Self::Error> {
        let mut violations = Violations::default();

        let id = violations.text("id", draft.id);
        let name = violations.text("name", draft.name);
        let city = violations.text("city", draft.city);
        let age = violations.age(draft.age);
        let gender = violations.gender(draft.gender);
        let height = violations.positive("height", draft.height);
        let weight = violations.positive("weight", draft.weight);

        // Extreme but positive measurements can still overflow the quotient.
        let height = match (height, weight) {
            (Some(h), Some(w)) if !bmi(h, w).is_finite() => {
                violations.push("height", "height and weight must give a finite BMI");
                None
            }
            _ => height,
        };

        match (id, name, city, age, gender, height, weight) {
            (Some(id), Some(name), Some(city), Some(age), Some(gender), Some(height), Some(weight)) => {
                Ok(Self {
                    id,
                    name,
                    city,
                    age,
                    gender,
                    height,
                    weight,
                })
            }
            _ => Err(violations.into_error()),
        }
    }
}

impl Patient {
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn city(&self) -> &str {
        self.city.as_str()
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Height in metres.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Weight in kilograms.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// BMI computed from the current height and weight.
    pub fn bmi(&self) -> f64 {
        bmi(self.height, self.weight)
    }

    /// Verdict for the rounded BMI.
    pub fn verdict(&self) -> Verdict {
        Verdict::from_bmi(self.bmi())
    }

    /// Snapshot of the patient with derived fields filled in.
    pub fn view(&self) -> PatientView {
        PatientView::from(self)
    }
}

// ============================================================================
// Response shape
// ============================================================================

/// Patient as returned to callers: the stored fields plus `bmi` and `verdict`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PatientView {
    pub id: String,
    pub name: String,
    pub city: String,
    pub age: u8,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    pub bmi: f64,
    pub verdict: Verdict,
}

impl From<&Patient> for PatientView {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id().to_string(),
            name: patient.name().to_string(),
            city: patient.city().to_string(),
            age: patient.age,
            gender: patient.gender,
            height: patient.height,
            weight: patient.weight,
            bmi: patient.bmi(),
            verdict: patient.verdict(),
        }
    }
}
