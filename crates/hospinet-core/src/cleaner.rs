//! # Stay Table Cleaner
//!
//! Turns a raw stay table into non-overlapping, typed stay records.
//!
//! Steps, in order:
//! 1. Standardise columns (schema error if any required column is absent)
//! 2. Coerce identifiers and instants (calendar dates become day offsets)
//! 3. Handle missing values per [`RemovalPolicy`]
//! 4. Handle records discharged before admission per [`RemovalPolicy`]
//! 5. Remove exact duplicates
//! 6. Resolve overlapping stays
//!
//! Data-quality problems are never dropped silently: the default policy
//! fails, and deletions are counted in the [`CleaningReport`].

use crate::overlap::{fix_overlaps, num_overlaps};
use crate::primitives::{DEFAULT_OVERLAP_ITERS, REFERENCE_DATE, SECONDS_PER_DAY};
use crate::table::{ColumnMapping, RawTable, parse_day_offset};
use crate::{HospinetError, StayRecord};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// What to do with records that fail a data-quality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    /// Return an error.
    #[default]
    Fail,
    /// Delete the offending records.
    Record,
    /// Delete every record of any subject with an offending record.
    Subject,
}

/// Cleaning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Names of the required columns.
    pub columns: ColumnMapping,
    /// Policy for records with missing values.
    pub missing: RemovalPolicy,
    /// Policy for records discharged before admission.
    pub errors: RemovalPolicy,
    /// `chrono` format of calendar instants. `None` reads numeric day offsets.
    pub date_format: Option<String>,
    /// Epoch calendar instants are normalised against.
    pub reference_date: NaiveDateTime,
    /// Maximum number of overlap-resolution passes.
    pub n_iters: usize,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        let (year, month, day) = REFERENCE_DATE;
        Self {
            columns: ColumnMapping::default(),
            missing: RemovalPolicy::Fail,
            errors: RemovalPolicy::Fail,
            date_format: None,
            reference_date: NaiveDate::from_ymd_opt(year, month, day)
                .unwrap_or_default()
                .and_time(NaiveTime::default()),
            n_iters: DEFAULT_OVERLAP_ITERS,
        }
    }
}

impl CleaningConfig {
    /// Parse an admission/discharge cell into fractional days.
    fn parse_instant(&self, column: &str, value: &str) -> Result<f64, HospinetError> {
        let Some(format) = &self.date_format else {
            return parse_day_offset(column, value);
        };

        let trimmed = value.trim();
        NaiveDateTime::parse_from_str(trimmed, format)
            .or_else(|_| {
                NaiveDate::parse_from_str(trimmed, format).map(|d| d.and_time(NaiveTime::default()))
            })
            .map(|instant| days_since(instant, self.reference_date))
            .map_err(|_| HospinetError::InvalidValue {
                column: column.to_string(),
                value: value.to_string(),
            })
    }
}

/// Fractional days from `reference` to `instant`.
#[must_use]
pub fn days_since(instant: NaiveDateTime, reference: NaiveDateTime) -> f64 {
    (instant - reference).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Counts describing what cleaning did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Rows in the input table.
    pub rows_read: usize,
    /// Records dropped for missing values.
    pub missing_dropped: usize,
    /// Records dropped for discharge before admission.
    pub erroneous_dropped: usize,
    /// Exact duplicates removed.
    pub duplicates_dropped: usize,
    /// Overlapping pairs left after the iteration cap.
    pub overlaps_remaining: usize,
}

/// Cleaned stay records plus the report of how they were obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    /// Non-overlapping (unless the cap was hit) stay records.
    pub records: Vec<StayRecord>,
    /// What cleaning did.
    pub report: CleaningReport,
}

// =============================================================================
// CLEANING
// =============================================================================

/// A row after coercion; `None` marks a missing cell.
struct CoercedRow {
    subject: Option<String>,
    facility: Option<String>,
    admission: Option<f64>,
    discharge: Option<f64>,
}

impl CoercedRow {
    fn into_record(self) -> Option<StayRecord> {
        Some(StayRecord::new(
            self.subject?,
            self.facility?,
            self.admission?,
            self.discharge?,
        ))
    }
}

/// Clean a raw stay table.
///
/// # Errors
///
/// - `MissingColumns` if required columns are absent
/// - `InvalidValue` if an instant cannot be coerced
/// - `MissingValues`/`ErroneousRecords` when found under `RemovalPolicy::Fail`
pub fn clean_table(table: &RawTable, config: &CleaningConfig) -> Result<CleanedTable, HospinetError> {
    let mut report = CleaningReport {
        rows_read: table.len(),
        ..CleaningReport::default()
    };

    tracing::info!("Checking existence of columns...");
    let idx = table.locate(&config.columns)?;

    tracing::info!("Coercing types...");
    let identifier = |cell: &Option<String>| {
        cell.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let mut rows = Vec::with_capacity(table.len());
    for row in table.rows() {
        let admission = row[idx.admission]
            .as_deref()
            .map(|v| config.parse_instant(&config.columns.admission, v))
            .transpose()?;
        let discharge = row[idx.discharge]
            .as_deref()
            .map(|v| config.parse_instant(&config.columns.discharge, v))
            .transpose()?;
        rows.push(CoercedRow {
            subject: identifier(&row[idx.subject]),
            facility: identifier(&row[idx.facility]),
            admission,
            discharge,
        });
    }

    tracing::info!("Checking for missing values...");
    let (complete, incomplete): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .map(|row| {
            let subject = row.subject.clone();
            row.into_record().ok_or(subject)
        })
        .partition(Result::is_ok);
    let mut records: Vec<StayRecord> = complete.into_iter().flatten().collect();
    let missing_subjects: Vec<Option<String>> =
        incomplete.into_iter().filter_map(Result::err).collect();

    if !missing_subjects.is_empty() {
        tracing::info!("Found {} records with missing values.", missing_subjects.len());
        report.missing_dropped = missing_subjects.len();
        match config.missing {
            RemovalPolicy::Fail => {
                return Err(HospinetError::MissingValues {
                    count: missing_subjects.len(),
                });
            }
            RemovalPolicy::Record => {}
            RemovalPolicy::Subject => {
                let subjects: BTreeSet<String> = missing_subjects.into_iter().flatten().collect();
                report.missing_dropped += drop_subjects(&mut records, &subjects);
            }
        }
    }

    tracing::info!("Checking for erroneous records...");
    let erroneous: Vec<&StayRecord> = records
        .iter()
        .filter(|r| r.admission > r.discharge)
        .collect();
    if !erroneous.is_empty() {
        let count = erroneous.len();
        tracing::info!("Found {} records with date errors.", count);
        match config.errors {
            RemovalPolicy::Fail => return Err(HospinetError::ErroneousRecords { count }),
            RemovalPolicy::Record => {
                records.retain(|r| r.admission <= r.discharge);
                report.erroneous_dropped = count;
            }
            RemovalPolicy::Subject => {
                let subjects: BTreeSet<String> = erroneous
                    .iter()
                    .map(|r| r.subject.as_str().to_string())
                    .collect();
                report.erroneous_dropped = drop_subjects(&mut records, &subjects);
            }
        }
    }

    tracing::info!("Removing duplicate records...");
    let before = records.len();
    records.sort_by(|a, b| {
        a.subject
            .cmp(&b.subject)
            .then_with(|| a.facility.cmp(&b.facility))
            .then_with(|| a.admission.total_cmp(&b.admission))
            .then_with(|| a.discharge.total_cmp(&b.discharge))
    });
    records.dedup();
    report.duplicates_dropped = before - records.len();

    tracing::info!("Finding and fixing overlapping records...");
    let records = fix_overlaps(&records, config.n_iters)?;
    report.overlaps_remaining = num_overlaps(&records);
    tracing::info!(
        "{} overlaps remaining after iterations...",
        report.overlaps_remaining
    );

    Ok(CleanedTable { records, report })
}

/// Remove every record of the given subjects; returns how many were removed.
fn drop_subjects(records: &mut Vec<StayRecord>, subjects: &BTreeSet<String>) -> usize {
    let before = records.len();
    records.retain(|r| !subjects.contains(r.subject.as_str()));
    before - records.len()
}

// =============================================================================
// TESTS
// =============================================================================
