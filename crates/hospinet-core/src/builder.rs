//! # Network Builder
//!
//! Turns resolved stay records into a [`TemporalNetwork`].
//!
//! 1. Discretise every stay into one presence row per time unit
//! 2. Register every distinct (facility, time) pair as a node
//! 3. Link consecutive presences of one subject within the return window
//!
//! Parallel transitions accumulate into one edge of higher weight.

use crate::network::TemporalNetwork;
use crate::primitives::{DEFAULT_DISCRETISATION, DEFAULT_RETURN_WINDOW, MAX_STAY_UNITS};
use crate::table::{ColumnMapping, RawTable, records_from_table};
use crate::{HospinetError, PresenceRow, StayRecord, TemporalNode};

/// Builds temporal networks from stay records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkBuilder {
    discretisation: i64,
    return_window: f64,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self {
            discretisation: DEFAULT_DISCRETISATION,
            return_window: DEFAULT_RETURN_WINDOW,
        }
    }
}

impl NetworkBuilder {
    /// Create a builder.
    ///
    /// # Errors
    ///
    /// - `InvalidDiscretisation` if `discretisation <= 0`
    /// - `InvalidReturnWindow` if `return_window` is NaN or `<= 0`
    ///
    /// An infinite return window links every pair of consecutive presences.
    pub fn new(discretisation: i64, return_window: f64) -> Result<Self, HospinetError> {
        if discretisation <= 0 {
            return Err(HospinetError::InvalidDiscretisation(discretisation));
        }
        // NaN fails the comparison.
        if !(return_window > 0.0) {
            return Err(HospinetError::InvalidReturnWindow(return_window));
        }
        Ok(Self {
            discretisation,
            return_window,
        })
    }

    /// The discretisation step.
    #[must_use]
    pub fn discretisation(&self) -> i64 {
        self.discretisation
    }

    /// The return window, in time units.
    #[must_use]
    pub fn return_window(&self) -> f64 {
        self.return_window
    }

    /// Expand stays into one presence row per occupied time unit.
    ///
    /// Time units run from `floor(admission / D) * D` in steps of `D` while
    /// they do not exceed the discharge instant, so a zero-length stay still
    /// yields one row.
    ///
    /// # Errors
    ///
    /// - `UnorderedInterval` for non-finite or unordered bounds
    /// - `StayTooLong` if a stay exceeds `MAX_STAY_UNITS` time units
    /// - `InstantOutOfRange` if a time unit does not fit in an `i64`
    pub fn discretise(&self, records: &[StayRecord]) -> Result<Vec<PresenceRow>, HospinetError> {
        let step = self.discretisation;
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            let ordered = record.admission.is_finite()
                && record.discharge.is_finite()
                && record.admission <= record.discharge;
            if !ordered {
                return Err(HospinetError::UnorderedInterval {
                    subject: record.subject.clone(),
                    admission: record.admission,
                    discharge: record.discharge,
                });
            }

            let out_of_range = |instant: f64| HospinetError::InstantOutOfRange {
                subject: record.subject.clone(),
                instant,
            };

            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
            let first_unit = (record.admission / step as f64).floor();
            if !(first_unit >= i64::MIN as f64 && first_unit < i64::MAX as f64) {
                return Err(out_of_range(record.admission));
            }
            let first = (first_unit as i64)
                .checked_mul(step)
                .ok_or_else(|| out_of_range(record.admission))?;

            let units = ((record.discharge - first as f64) / step as f64)
                .floor()
                .min(i64::MAX as f64) as i64;
            let units = units.saturating_add(1);
            if units > MAX_STAY_UNITS {
                return Err(HospinetError::StayTooLong {
                    subject: record.subject.clone(),
                    units,
                    max: MAX_STAY_UNITS,
                });
            }
            (units - 1)
                .checked_mul(step)
                .and_then(|span| first.checked_add(span))
                .ok_or_else(|| out_of_range(record.discharge))?;

            rows.extend((0..units).map(|k| PresenceRow {
                subject: record.subject.clone(),
                facility: record.facility.clone(),
                time: first + k * step,
                admission: record.admission,
            }));
        }

        Ok(rows)
    }

    /// Build a temporal network from resolved stay records.
    pub fn build(&self, records: &[StayRecord]) -> Result<TemporalNetwork, HospinetError> {
        let mut rows = self.discretise(records)?;
        rows.sort_by(|a, b| {
            a.subject
                .cmp(&b.subject)
                .then_with(|| a.time.cmp(&b.time))
                .then_with(|| a.admission.total_cmp(&b.admission))
                .then_with(|| a.facility.cmp(&b.facility))
        });

        let mut network = TemporalNetwork::new();
        for row in &rows {
            network.add_node(TemporalNode::at(row.facility.clone(), row.time));
        }

        for pair in rows.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.subject != next.subject {
                continue;
            }
            // Gaps at or beyond the window start an independent journey.
            if ((next.time - prev.time) as f64) < self.return_window {
                network.increment_edge(
                    TemporalNode::at(prev.facility.clone(), prev.time),
                    TemporalNode::at(next.facility.clone(), next.time),
                );
            }
        }

        tracing::info!(
            stays = records.len(),
            presences = rows.len(),
            nodes = network.node_count(),
            edges = network.edge_count(),
            "temporal network built"
        );
        Ok(network)
    }

    /// Build a temporal network straight from a clean numeric table.
    ///
    /// # Errors
    ///
    /// Returns `MissingColumns` if the mapping's columns are absent, plus
    /// every error of [`records_from_table`] and [`NetworkBuilder::build`].
    pub fn build_from_table(
        &self,
        table: &RawTable,
        mapping: &ColumnMapping,
    ) -> Result<TemporalNetwork, HospinetError> {
        let records = records_from_table(table, mapping)?;
        self.build(&records)
    }
}

// =============================================================================
// TESTS
// =============================================================================
