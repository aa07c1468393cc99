//! Constants used throughout the PMS core crate.

/// Default records file when no explicit path is configured.
pub const DEFAULT_RECORDS_FILE: &str = "patients.json";

/// Suffix of the sibling file a save is staged in before it replaces the records file.
pub const STAGING_SUFFIX: &str = "tmp";

/// Exclusive lower bound for a patient's age.
pub const MIN_AGE_EXCLUSIVE: i64 = 0;

/// Exclusive upper bound for a patient's age.
pub const MAX_AGE_EXCLUSIVE: i64 = 120;

/// BMI at and above which a patient is no longer underweight.
pub const BMI_NORMAL_FROM: f64 = 18.5;

/// BMI at and above which a patient is overweight.
pub const BMI_OVERWEIGHT_FROM: f64 = 25.0;

/// BMI at and above which a patient is obese.
pub const BMI_OBESE_FROM: f64 = 30.0;
