//! # Pipeline Primitives
//!
//! Hardcoded defaults and limits for the hospinet pipeline.
//!
//! ## Primitives
//!
//! 1. **Discretisation**: Bins continuous stay intervals into time units.
//! 2. **Return Window**: Bounds the gap over which successive presences link.
//! 3. **Overlap Cap**: Bounds the number of overlap-resolution passes.

/// Default discretisation step, in days.
pub const DEFAULT_DISCRETISATION: i64 = 1;

/// Default return window, in time units.
///
/// Successive presences of one subject separated by this gap or more are
/// treated as independent journeys and do not form an edge.
pub const DEFAULT_RETURN_WINDOW: f64 = 365.0;

/// Default maximum number of overlap-resolution passes.
pub const DEFAULT_OVERLAP_ITERS: usize = 100;

/// Default column names of a standardised stay table.
pub const SUBJECT_COLUMN: &str = "sID";
/// Facility column.
pub const FACILITY_COLUMN: &str = "fID";
/// Admission column.
pub const ADMISSION_COLUMN: &str = "Adate";
/// Discharge column.
pub const DISCHARGE_COLUMN: &str = "Ddate";

/// Reference epoch that calendar dates are normalised against (2017-03-01).
pub const REFERENCE_DATE: (i32, u32, u32) = (2017, 3, 1);

/// Cell contents interpreted as missing values when reading tables.
pub const NULL_TOKENS: &[&str] = &[
    "", "NA", "na", "Na", "N/A", "n/a", "N/a", "NaN", "''", " ", "NULL",
];

/// Seconds in a day, for normalising calendar timestamps.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum number of time units a single stay may expand into.
///
/// Prevents a corrupt discharge value from exploding the presence table.
pub const MAX_STAY_UNITS: i64 = 1_000_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        assert_eq!(DEFAULT_DISCRETISATION, 1);
        assert_eq!(DEFAULT_RETURN_WINDOW, 365.0);
        assert_eq!(DEFAULT_OVERLAP_ITERS, 100);
    }

    #[test]
    fn null_tokens_include_empty() {
        assert!(NULL_TOKENS.contains(&""));
        assert!(NULL_TOKENS.contains(&"NULL"));
    }
}
