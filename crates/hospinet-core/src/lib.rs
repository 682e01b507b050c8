//! # hospinet-core
//!
//! The deterministic temporal-network engine for hospinet - THE LOGIC.
//!
//! This crate turns tables of facility stays (subject, facility, admission,
//! discharge) into a time-discretised directed network of patient movement,
//! and evaluates graph metrics over its per-instant snapshots.
//!
//! ## Pipeline
//!
//! ```text
//! RawTable -> cleaner (overlap) -> NetworkBuilder -> TemporalNetwork -> snapshot -> time series
//!                                                          |
//!                                                        export
//! ```
//!
//! ## Architectural Constraints
//!
//! - Pure, synchronous Rust: no async, no network dependencies
//! - Deterministic: `BTreeMap`/`BTreeSet` only, no randomness
//! - Batch: tables are closed and finite; networks are built once, then read
//! - I/O only through caller-supplied `Read`/`Write` handles

// =============================================================================
// MODULES
// =============================================================================

pub mod algo;
pub mod builder;
pub mod cleaner;
pub mod export;
pub mod graph;
pub mod network;
pub mod overlap;
pub mod primitives;
pub mod snapshot;
pub mod table;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    EdgeWeight, FacilityId, HospinetError, PresenceRow, StayRecord, SubjectId, TemporalNode,
    TimeUnit,
};

// =============================================================================
// RE-EXPORTS: Cleaning
// =============================================================================

pub use cleaner::{CleanedTable, CleaningConfig, CleaningReport, RemovalPolicy, clean_table};
pub use overlap::{fix_overlaps, num_overlaps};
pub use table::{ColumnMapping, RawTable, records_from_table, write_stays_csv};

// =============================================================================
// RE-EXPORTS: Network
// =============================================================================

pub use builder::NetworkBuilder;
pub use graph::{DiGraph, FacilityGraph};
pub use network::{NetworkSummary, StaticProjection, TemporalNetwork};

// =============================================================================
// RE-EXPORTS: Analysis
// =============================================================================

pub use algo::{
    FnMetric, GlobalReachingCentrality, GraphMetric, MaxPageRank, PageRank,
    local_reaching_centrality,
};
pub use snapshot::{
    Failover, OutboundSnapshots, failover, global_reaching_timeseries,
    global_reaching_timeseries_over, snapshots_outbound, snapshots_outbound_with,
    temporal_timeseries, temporal_timeseries_over,
};

// =============================================================================
// RE-EXPORTS: Interchange
// =============================================================================

pub use export::{
    CanonicalHeader, CanonicalNetwork, SerializableEdge, SerializableNetwork, canonical_checksum,
    export_canonical, from_edge_list, import_canonical, to_edge_list, verify_canonical,
};

#[cfg(feature = "crypto-hash")]
pub use export::{canonical_crypto_hash, verify_crypto_hash};
