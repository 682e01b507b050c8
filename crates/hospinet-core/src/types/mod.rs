//! # Core Type Definitions
//!
//! This module contains all core types for the hospinet temporal network engine:
//! - Identifiers (`SubjectId`, `FacilityId`, `TimeUnit`)
//! - Stay and presence records (`StayRecord`, `PresenceRow`)
//! - Temporal graph elements (`TemporalNode`, `EdgeWeight`)
//! - Error types (`HospinetError`)
//!
//! ## Determinism Guarantees
//!
//! All identifier and node types implement `Ord` so they can key
//! `BTreeMap`/`BTreeSet` collections. Edge counters use saturating arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a subject (patient) whose stays are recorded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl SubjectId {
    /// Create a new subject identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a facility (hospital, ward, care home).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FacilityId(pub String);

impl FacilityId {
    /// Create a new facility identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A discretised time unit: a multiple of the discretisation step,
/// counted in days from the reference epoch.
pub type TimeUnit = i64;

// =============================================================================
// STAY RECORDS
// =============================================================================

/// A subject's continuous occupancy of one facility.
///
/// Admission and discharge are fractional days from the reference epoch.
/// Upstream cleaning guarantees `admission <= discharge`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StayRecord {
    /// The subject staying.
    pub subject: SubjectId,
    /// The facility occupied.
    pub facility: FacilityId,
    /// Admission instant (fractional days).
    pub admission: f64,
    /// Discharge instant (fractional days).
    pub discharge: f64,
}

impl StayRecord {
    /// Create a new stay record.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        facility: impl Into<String>,
        admission: f64,
        discharge: f64,
    ) -> Self {
        Self {
            subject: SubjectId::new(subject),
            facility: FacilityId::new(facility),
            admission,
            discharge,
        }
    }

    /// Length of the stay in days.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.discharge - self.admission
    }

    /// Whether the closed-open intervals of two stays intersect.
    ///
    /// Touching intervals and zero-length intervals never overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.admission.max(other.admission) < self.discharge.min(other.discharge)
    }
}

/// One discretised time unit of a stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceRow {
    /// The subject present.
    pub subject: SubjectId,
    /// The facility the subject is present at.
    pub facility: FacilityId,
    /// The discretised time unit.
    pub time: TimeUnit,
    /// Admission instant of the originating stay (ordering key).
    pub admission: f64,
}

// =============================================================================
// TEMPORAL GRAPH ELEMENTS
// =============================================================================

/// A node of the temporal network: a facility at a time unit.
///
/// Identity is the pair; ordering is by facility, then time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TemporalNode {
    /// The facility.
    pub facility: FacilityId,
    /// The discretised time unit.
    pub time: TimeUnit,
}

impl TemporalNode {
    /// Create a new temporal node.
    #[must_use]
    pub fn new(facility: impl Into<String>, time: TimeUnit) -> Self {
        Self {
            facility: FacilityId::new(facility),
            time,
        }
    }

    /// Build a node from an existing facility identifier.
    #[must_use]
    pub fn at(facility: FacilityId, time: TimeUnit) -> Self {
        Self { facility, time }
    }
}

/// Renders the interchange node token `(facility,time)`.
impl fmt::Display for TemporalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.facility, self.time)
    }
}

/// Parses a node token `(facility,time)`.
///
/// The last comma separates the facility from the time, so facility
/// identifiers may themselves contain commas. Quoted tuple tokens such as
/// `('X', 3)` are accepted too.
impl FromStr for TemporalNode {
    type Err = HospinetError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || HospinetError::InvalidNodeToken(token.to_string());

        let inner = token
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let (facility, time) = inner.rsplit_once(',').ok_or_else(invalid)?;
        let facility = facility.trim_matches('\'');

        if facility.is_empty() || facility.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        let time: TimeUnit = time.trim().parse().map_err(|_| invalid())?;

        Ok(Self::new(facility, time))
    }
}

/// Weight of a directed edge in the temporal network.
///
/// Counts the subjects making the transition. Uses saturating arithmetic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct EdgeWeight(pub i64);

impl EdgeWeight {
    /// Create a new edge weight with the given value.
    #[must_use]
    pub const fn new(weight: i64) -> Self {
        Self(weight)
    }

    /// Increment the edge weight by 1 using saturating arithmetic.
    #[must_use]
    pub const fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Get the raw weight value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the hospinet pipeline.
///
/// - Schema errors are always fatal
/// - Data-quality errors are fatal unless the caller opts into deletion
/// - Metric errors are recoverable in non-safe time series
#[derive(Debug, Error)]
pub enum HospinetError {
    /// Required columns are absent from the input table.
    #[error("Column(s) {} not found in the table", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The discretisation step is not a positive integer.
    #[error("Invalid discretisation step: {0} (must be > 0)")]
    InvalidDiscretisation(i64),

    /// The return window is NaN or not positive.
    #[error("Invalid return window: {0} (must be a positive number or infinity)")]
    InvalidReturnWindow(f64),

    /// Records with missing values were found and deletion was not requested.
    #[error("Found {count} records with missing values")]
    MissingValues { count: usize },

    /// Records discharged before admission were found and deletion was not requested.
    #[error("Found {count} records with discharge before admission")]
    ErroneousRecords { count: usize },

    /// A stay has a missing or unordered interval where an ordered one is required.
    #[error("Unordered stay interval for subject {subject}: admission {admission}, discharge {discharge}")]
    UnorderedInterval {
        subject: SubjectId,
        admission: f64,
        discharge: f64,
    },

    /// A stay expands into more time units than the presence table allows.
    #[error("Stay of subject {subject} spans {units} time units (max {max})")]
    StayTooLong {
        subject: SubjectId,
        units: i64,
        max: i64,
    },

    /// A stay instant has no representable time unit at this discretisation.
    #[error("Stay of subject {subject} has instant {instant} outside the time-unit range")]
    InstantOutOfRange { subject: SubjectId, instant: f64 },

    /// A cell value could not be coerced to its column type.
    #[error("Invalid value {value:?} in column {column}")]
    InvalidValue { column: String, value: String },

    /// A node token could not be parsed.
    #[error("Invalid node token: {0:?}")]
    InvalidNodeToken(String),

    /// A graph metric failed on a snapshot.
    #[error("Metric evaluation failed: {0}")]
    Metric(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_weight_saturating_increment() {
        let weight = EdgeWeight::new(i64::MAX);
        assert_eq!(weight.increment().value(), i64::MAX);
    }

    #[test]
    fn edge_weight_normal_increment() {
        assert_eq!(EdgeWeight::default().increment().value(), 1);
    }

    #[test]
    fn node_token_roundtrip() {
        let node = TemporalNode::new("ward-7", 42);
        let token = node.to_string();
        assert_eq!(token, "(ward-7,42)");
        assert_eq!(token.parse::<TemporalNode>().expect("parse"), node);
    }

    #[test]
    fn node_token_negative_time_and_comma_in_facility() {
        let node: TemporalNode = "(a,b,-3)".parse().expect("parse");
        assert_eq!(node.facility.as_str(), "a,b");
        assert_eq!(node.time, -3);
    }

    #[test]
    fn node_token_accepts_quoted_tuple() {
        let node: TemporalNode = "('X', 3)".parse().expect("parse");
        assert_eq!(node, TemporalNode::new("X", 3));
    }

    #[test]
    fn node_token_rejects_malformed() {
        for token in ["X,1", "(X1)", "(X,one)", "( ,1)", "(a b,1)", "(,1)"] {
            assert!(
                matches!(token.parse::<TemporalNode>(), Err(HospinetError::InvalidNodeToken(_))),
                "{token} should be rejected"
            );
        }
    }

    #[test]
    fn nodes_order_by_facility_then_time() {
        let mut nodes = vec![
            TemporalNode::new("B", 0),
            TemporalNode::new("A", 5),
            TemporalNode::new("A", 1),
        ];
        nodes.sort();
        assert_eq!(
            nodes,
            vec![
                TemporalNode::new("A", 1),
                TemporalNode::new("A", 5),
                TemporalNode::new("B", 0),
            ]
        );
    }

    #[test]
    fn stays_touching_do_not_overlap() {
        let a = StayRecord::new("s", "P", 0.0, 3.0);
        let b = StayRecord::new("s", "Q", 3.0, 8.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn zero_length_stay_never_overlaps() {
        let point = StayRecord::new("s", "P", 3.0, 3.0);
        let span = StayRecord::new("s", "Q", 0.0, 5.0);
        assert!(!point.overlaps(&span));
    }

    #[test]
    fn nested_stay_overlaps() {
        let outer = StayRecord::new("s", "P", 0.0, 10.0);
        let inner = StayRecord::new("s", "Q", 2.0, 4.0);
        assert!(outer.overlaps(&inner));
        assert_eq!(inner.duration(), 2.0);
    }

    #[test]
    fn missing_columns_message_lists_columns() {
        let err = HospinetError::MissingColumns(vec!["sID".into(), "Adate".into()]);
        assert_eq!(err.to_string(), "Column(s) sID, Adate not found in the table");
    }
}
