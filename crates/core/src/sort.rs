//! Sort/query contract over patient records.

use crate::patient::Patient;
use crate::{PatientError, PatientResult};
use std::str::FromStr;

/// Numeric field a listing can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Height, SortField::Weight, SortField::Bmi];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Height => "height",
            SortField::Weight => "weight",
            SortField::Bmi => "bmi",
        }
    }

    /// Sort key for one patient; BMI is computed on the fly.
    pub fn key(self, patient: &Patient) -> f64 {
        match self {
            SortField::Height => patient.height(),
            SortField::Weight => patient.weight(),
            SortField::Bmi => patient.bmi(),
        }
    }
}

impl FromStr for SortField {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                let choices = SortField::ALL
                    .iter()
                    .map(|f| format!("'{}'", f.as_str()))
                    .collect::<Vec<_>>()
                    .join(", ");
                PatientError::InvalidArgument(format!("Invalid field. Choose from [{choices}]"))
            })
    }
}

/// Direction of a sorted listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(PatientError::InvalidArgument(
                "Order must be asc or desc".into(),
            )),
        }
    }
}

/// Parse raw query values. A missing `order` means ascending.
///
/// # Errors
///
/// Returns `PatientError::InvalidArgument` if either value is outside its allowed set.
pub fn parse_sort(sort_by: &str, order: Option<&str>) -> PatientResult<(SortField, SortOrder)> {
    let field = sort_by.parse::<SortField>()?;
    let order = order.map(str::parse::<SortOrder>).transpose()?.unwrap_or_default();
    Ok((field, order))
}

/// Sort patients in place by `field`.
///
/// The sort is stable in both directions: patients with equal keys keep their incoming
/// (store) order whether the listing is ascending or descending.
pub fn sort_patients(patients: &mut [Patient], field: SortField, order: SortOrder) {
    patients.sort_by(|a, b| {
        let ordering = field.key(a).total_cmp(&field.key(b));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
