//! # Stay Tables
//!
//! Untyped tables of stay records as they arrive from upstream extracts,
//! and the column mapping that locates the four required columns.
//!
//! Reading and writing goes through caller-supplied `Read`/`Write` handles;
//! file handling stays in the app layer.

use crate::primitives::{
    ADMISSION_COLUMN, DISCHARGE_COLUMN, FACILITY_COLUMN, NULL_TOKENS, SUBJECT_COLUMN,
};
use crate::{HospinetError, StayRecord};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

// =============================================================================
// COLUMN MAPPING
// =============================================================================

/// Names of the required columns in an input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Subject (patient) identifier column.
    pub subject: String,
    /// Facility identifier column.
    pub facility: String,
    /// Admission instant column.
    pub admission: String,
    /// Discharge instant column.
    pub discharge: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            subject: SUBJECT_COLUMN.to_string(),
            facility: FACILITY_COLUMN.to_string(),
            admission: ADMISSION_COLUMN.to_string(),
            discharge: DISCHARGE_COLUMN.to_string(),
        }
    }
}

impl ColumnMapping {
    fn names(&self) -> [&str; 4] {
        [
            &self.subject,
            &self.facility,
            &self.admission,
            &self.discharge,
        ]
    }
}

/// Positions of the required columns within a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    pub subject: usize,
    pub facility: usize,
    pub admission: usize,
    pub discharge: usize,
}

// =============================================================================
// RAW TABLE
// =============================================================================

/// A headered table of optional string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Create an empty table with the given header.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns `HospinetError::DeserializationError` if the row width does
    /// not match the header.
    pub fn push_row(&mut self, row: Vec<Option<String>>) -> Result<(), HospinetError> {
        if row.len() != self.columns.len() {
            return Err(HospinetError::DeserializationError(format!(
                "Row has {} cells, expected {}",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Read a headered CSV table.
    ///
    /// Cells matching one of the null tokens are read as missing.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, HospinetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let columns = reader
            .headers()
            .map_err(|e| HospinetError::DeserializationError(format!("CSV header: {}", e)))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut table = Self::new(columns);

        for result in reader.records() {
            let record = result
                .map_err(|e| HospinetError::DeserializationError(format!("CSV record: {}", e)))?;
            let row = record
                .iter()
                .map(|cell| {
                    if NULL_TOKENS.contains(&cell) {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect();
            table.push_row(row)?;
        }

        Ok(table)
    }

    /// Column names, in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows, in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Locate the four required columns.
    ///
    /// # Errors
    ///
    /// Returns `HospinetError::MissingColumns` naming every absent column.
    pub fn locate(&self, mapping: &ColumnMapping) -> Result<ColumnIndices, HospinetError> {
        let names = mapping.names();
        let found: Vec<Option<usize>> = names.iter().map(|n| self.column_index(n)).collect();

        let missing: Vec<String> = names
            .iter()
            .zip(&found)
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| (*name).to_string())
            .collect();

        match found.as_slice() {
            [Some(subject), Some(facility), Some(admission), Some(discharge)] => {
                Ok(ColumnIndices {
                    subject: *subject,
                    facility: *facility,
                    admission: *admission,
                    discharge: *discharge,
                })
            }
            _ => Err(HospinetError::MissingColumns(missing)),
        }
    }
}

// =============================================================================
// TYPED CONVERSION
// =============================================================================

/// Parse a numeric day offset from a cell.
pub(crate) fn parse_day_offset(column: &str, value: &str) -> Result<f64, HospinetError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| HospinetError::InvalidValue {
            column: column.to_string(),
            value: value.to_string(),
        })
}

/// Convert an already-clean table with numeric day offsets into stay records.
///
/// # Errors
///
/// - `MissingColumns` if a required column is absent
/// - `MissingValues` if any required cell is missing
/// - `InvalidValue` if an admission or discharge cell is not a number
pub fn records_from_table(
    table: &RawTable,
    mapping: &ColumnMapping,
) -> Result<Vec<StayRecord>, HospinetError> {
    let idx = table.locate(mapping)?;
    let mut records = Vec::with_capacity(table.len());
    let mut missing = 0usize;

    for row in table.rows() {
        let cells = (
            row[idx.subject].as_deref(),
            row[idx.facility].as_deref(),
            row[idx.admission].as_deref(),
            row[idx.discharge].as_deref(),
        );
        let (Some(subject), Some(facility), Some(admission), Some(discharge)) = cells else {
            missing += 1;
            continue;
        };

        records.push(StayRecord::new(
            subject.trim(),
            facility.trim(),
            parse_day_offset(&mapping.admission, admission)?,
            parse_day_offset(&mapping.discharge, discharge)?,
        ));
    }

    if missing > 0 {
        return Err(HospinetError::MissingValues { count: missing });
    }
    Ok(records)
}

/// Write stay records as a CSV table with the mapping's column names.
pub fn write_stays_csv<W: Write>(
    records: &[StayRecord],
    mapping: &ColumnMapping,
    writer: W,
) -> Result<(), HospinetError> {
    let mut writer = csv::Writer::from_writer(writer);
    let to_err = |e: csv::Error| HospinetError::SerializationError(format!("CSV: {}", e));

    writer.write_record(mapping.names()).map_err(to_err)?;
    for record in records {
        let admission = record.admission.to_string();
        let discharge = record.discharge.to_string();
        writer
            .write_record([
                record.subject.as_str(),
                record.facility.as_str(),
                admission.as_str(),
                discharge.as_str(),
            ])
            .map_err(to_err)?;
    }
    writer
        .flush()
        .map_err(|e| HospinetError::IoError(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
