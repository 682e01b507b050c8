//! # Interchange Formats
//!
//! Three ways to move a [`TemporalNetwork`] out of the process and back:
//!
//! | Form | Isolated nodes | Use |
//! |------|----------------|-----|
//! | canonical (`postcard`) | kept | bit-exact archival and verification |
//! | [`SerializableNetwork`] (serde) | kept | JSON in the app layer |
//! | edge list | dropped | line-oriented `(facility,time) (facility,time) weight` |
//!
//! Every form round-trips: `export(import(export(G))) == export(G)`.

use crate::network::TemporalNetwork;
use crate::{EdgeWeight, HospinetError, TemporalNode};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

// =============================================================================
// CANONICAL FORMAT
// =============================================================================

/// Magic bytes for canonical export format.
pub const CANONICAL_MAGIC: [u8; 4] = *b"HNET"; // Hospinet Network

/// Current canonical format version.
pub const CANONICAL_VERSION: u8 = 1;

/// Maximum allowed node count in canonical imports.
pub const MAX_IMPORT_NODE_COUNT: u64 = 10_000_000;

/// Maximum allowed edge count in canonical imports.
pub const MAX_IMPORT_EDGE_COUNT: u64 = 50_000_000;

/// Header for canonical export files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalHeader {
    /// Magic bytes to identify the format.
    pub magic: [u8; 4],

    /// Format version for compatibility.
    pub version: u8,

    /// Number of nodes in the export.
    pub node_count: u64,

    /// Number of edges in the export.
    pub edge_count: u64,

    /// Checksum of the data section.
    pub checksum: u64,
}

impl CanonicalHeader {
    /// Create a new header with the given counts.
    #[must_use]
    pub fn new(node_count: u64, edge_count: u64, checksum: u64) -> Self {
        Self {
            magic: CANONICAL_MAGIC,
            version: CANONICAL_VERSION,
            node_count,
            edge_count,
            checksum,
        }
    }

    /// Validate magic and version.
    pub fn validate(&self) -> Result<(), HospinetError> {
        if self.magic != CANONICAL_MAGIC {
            return Err(HospinetError::DeserializationError(
                "Invalid file format".to_string(),
            ));
        }
        if self.version != CANONICAL_VERSION {
            return Err(HospinetError::DeserializationError(
                "Unsupported file version".to_string(),
            ));
        }
        Ok(())
    }
}

/// A node in canonical format, sorted by (facility, time).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct CanonicalNode {
    /// Facility identifier.
    pub facility: String,

    /// Time unit.
    pub time: i64,
}

impl From<&TemporalNode> for CanonicalNode {
    fn from(node: &TemporalNode) -> Self {
        Self {
            facility: node.facility.as_str().to_string(),
            time: node.time,
        }
    }
}

impl From<CanonicalNode> for TemporalNode {
    fn from(node: CanonicalNode) -> Self {
        TemporalNode::new(node.facility, node.time)
    }
}

/// An edge in canonical format, sorted by (from, to).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct CanonicalEdge {
    /// Source node.
    pub from: CanonicalNode,

    /// Target node.
    pub to: CanonicalNode,

    /// Number of transitions.
    pub weight: i64,
}

/// A temporal network in canonical format for bit-exact serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalNetwork {
    /// Nodes sorted by (facility, time), including isolated nodes.
    pub nodes: Vec<CanonicalNode>,

    /// Edges sorted by (from, to).
    pub edges: Vec<CanonicalEdge>,
}

impl CanonicalNetwork {
    /// Create the canonical form of a network.
    #[must_use]
    pub fn from_network(network: &TemporalNetwork) -> Self {
        // Network iteration is already sorted; sort anyway so the format
        // does not depend on storage order.
        let mut nodes: Vec<CanonicalNode> = network.nodes().map(CanonicalNode::from).collect();
        nodes.sort();

        let mut edges: Vec<CanonicalEdge> = network
            .edges()
            .map(|(from, to, weight)| CanonicalEdge {
                from: from.into(),
                to: to.into(),
                weight: weight.value(),
            })
            .collect();
        edges.sort();

        Self { nodes, edges }
    }

    /// Rebuild the network.
    #[must_use]
    pub fn to_network(&self) -> TemporalNetwork {
        TemporalNetwork::from_parts(
            self.nodes.iter().cloned().map(TemporalNode::from),
            self.edges.iter().map(|edge| {
                (
                    TemporalNode::from(edge.from.clone()),
                    TemporalNode::from(edge.to.clone()),
                    EdgeWeight::new(edge.weight),
                )
            }),
        )
    }

    /// Compute a deterministic, order-sensitive checksum of the data.
    ///
    /// This is **NOT** a cryptographic hash: it detects accidental
    /// corruption only. Use `canonical_crypto_hash` for tamper detection.
    #[must_use]
    pub fn checksum(&self) -> u64 {
        let mut hash: u64 = 0;

        for node in &self.nodes {
            hash = hash.rotate_left(7) ^ node_hash(node);
        }
        for edge in &self.edges {
            hash = hash.rotate_left(11) ^ node_hash(&edge.from);
            hash = hash.rotate_left(13) ^ node_hash(&edge.to).rotate_left(3);
            hash = hash.rotate_left(5) ^ (edge.weight as u64);
        }

        hash
    }
}

fn node_hash(node: &CanonicalNode) -> u64 {
    let facility = node
        .facility
        .bytes()
        .fold(0u64, |h, b| h.rotate_left(5) ^ u64::from(b));
    facility.rotate_left(17) ^ (node.time as u64)
}

// =============================================================================
// CANONICAL EXPORT / IMPORT
// =============================================================================

/// Export a network to canonical postcard format.
///
/// Format:
/// ```text
/// [header_len: u32 LE] [CanonicalHeader (postcard)] [CanonicalNetwork (postcard)]
/// ```
pub fn export_canonical(network: &TemporalNetwork) -> Result<Vec<u8>, HospinetError> {
    let canonical = CanonicalNetwork::from_network(network);
    let header = CanonicalHeader::new(
        canonical.nodes.len() as u64,
        canonical.edges.len() as u64,
        canonical.checksum(),
    );

    let header_bytes = postcard::to_allocvec(&header)
        .map_err(|e| HospinetError::SerializationError(format!("Header: {}", e)))?;
    let data_bytes = postcard::to_allocvec(&canonical)
        .map_err(|e| HospinetError::SerializationError(format!("Data: {}", e)))?;

    let mut result = Vec::with_capacity(4 + header_bytes.len() + data_bytes.len());
    result.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
    result.extend_from_slice(&header_bytes);
    result.extend_from_slice(&data_bytes);

    Ok(result)
}

/// Import a network from canonical postcard format.
///
/// Validates magic, version, size limits, checksum and counts.
pub fn import_canonical(data: &[u8]) -> Result<TemporalNetwork, HospinetError> {
    let Some((len_bytes, rest)) = data.split_first_chunk::<4>() else {
        return Err(HospinetError::DeserializationError(
            "Data too short".to_string(),
        ));
    };
    let header_len = u32::from_le_bytes(*len_bytes) as usize;
    if rest.len() < header_len {
        return Err(HospinetError::DeserializationError(
            "Data too short for header".to_string(),
        ));
    }
    let (header_bytes, data_bytes) = rest.split_at(header_len);

    let header: CanonicalHeader = postcard::from_bytes(header_bytes)
        .map_err(|e| HospinetError::DeserializationError(format!("Header: {}", e)))?;
    header.validate()?;

    // Size limits are checked before the data section is decoded.
    if header.node_count > MAX_IMPORT_NODE_COUNT {
        return Err(HospinetError::DeserializationError(format!(
            "Node count {} exceeds maximum allowed {}",
            header.node_count, MAX_IMPORT_NODE_COUNT
        )));
    }
    if header.edge_count > MAX_IMPORT_EDGE_COUNT {
        return Err(HospinetError::DeserializationError(format!(
            "Edge count {} exceeds maximum allowed {}",
            header.edge_count, MAX_IMPORT_EDGE_COUNT
        )));
    }

    let canonical: CanonicalNetwork = postcard::from_bytes(data_bytes)
        .map_err(|e| HospinetError::DeserializationError(format!("Data: {}", e)))?;

    let computed = canonical.checksum();
    if computed != header.checksum {
        return Err(HospinetError::DeserializationError(format!(
            "Checksum mismatch: expected {}, got {}",
            header.checksum, computed
        )));
    }
    if canonical.nodes.len() as u64 != header.node_count {
        return Err(HospinetError::DeserializationError(
            "Node count mismatch".to_string(),
        ));
    }
    if canonical.edges.len() as u64 != header.edge_count {
        return Err(HospinetError::DeserializationError(
            "Edge count mismatch".to_string(),
        ));
    }

    Ok(canonical.to_network())
}

/// Check that a network matches a canonical export.
pub fn verify_canonical(
    network: &TemporalNetwork,
    canonical_data: &[u8],
) -> Result<bool, HospinetError> {
    let imported = import_canonical(canonical_data)?;
    Ok(CanonicalNetwork::from_network(network) == CanonicalNetwork::from_network(&imported))
}

/// Compute the canonical checksum of a network.
#[must_use]
pub fn canonical_checksum(network: &TemporalNetwork) -> u64 {
    CanonicalNetwork::from_network(network).checksum()
}

// =============================================================================
// CRYPTOGRAPHIC HASH SUPPORT
// =============================================================================

/// BLAKE3 hash of the canonical export, as 64 hex characters.
#[cfg(feature = "crypto-hash")]
pub fn canonical_crypto_hash(network: &TemporalNetwork) -> Result<String, HospinetError> {
    let data = export_canonical(network)?;
    Ok(blake3::hash(&data).to_hex().to_string())
}

/// Check a network against a BLAKE3 hash of its canonical export.
#[cfg(feature = "crypto-hash")]
pub fn verify_crypto_hash(
    network: &TemporalNetwork,
    expected_hash: &str,
) -> Result<bool, HospinetError> {
    Ok(canonical_crypto_hash(network)? == expected_hash)
}

// =============================================================================
// SERIALIZABLE NETWORK (serde / JSON)
// =============================================================================

/// A serde-friendly network: nodes as `{facility, time}` records.
///
/// Facilities are stored verbatim, so names with whitespace or quotes
/// survive the round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SerializableNetwork {
    /// Every node, sorted by (facility, time).
    pub nodes: Vec<CanonicalNode>,

    /// Weighted edges, sorted by (source, target).
    pub edges: Vec<SerializableEdge>,
}

/// One edge of a [`SerializableNetwork`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SerializableEdge {
    /// Source node.
    pub source: CanonicalNode,
    /// Target node.
    pub target: CanonicalNode,
    /// Number of transitions.
    pub weight: i64,
}

impl From<&TemporalNetwork> for SerializableNetwork {
    fn from(network: &TemporalNetwork) -> Self {
        Self {
            nodes: network.nodes().map(CanonicalNode::from).collect(),
            edges: network
                .edges()
                .map(|(from, to, weight)| SerializableEdge {
                    source: CanonicalNode::from(from),
                    target: CanonicalNode::from(to),
                    weight: weight.value(),
                })
                .collect(),
        }
    }
}

impl SerializableNetwork {
    /// Rebuild the network.
    #[must_use]
    pub fn to_network(&self) -> TemporalNetwork {
        let nodes: Vec<TemporalNode> = self.nodes.iter().cloned().map(TemporalNode::from).collect();
        let edges: Vec<(TemporalNode, TemporalNode, EdgeWeight)> = self
            .edges
            .iter()
            .map(|edge| {
                (
                    TemporalNode::from(edge.source.clone()),
                    TemporalNode::from(edge.target.clone()),
                    EdgeWeight::new(edge.weight),
                )
            })
            .collect();
        TemporalNetwork::from_parts(nodes, edges)
    }
}

// =============================================================================
// EDGE LIST
// =============================================================================

/// Render the node token, rejecting facilities that would not parse back.
fn node_token(node: &TemporalNode) -> Result<String, HospinetError> {
    let token = node.to_string();
    match token.parse::<TemporalNode>() {
        Ok(parsed) if parsed == *node => Ok(token),
        _ => Err(HospinetError::InvalidNodeToken(token)),
    }
}

/// Write the edge list, one `(facility,time) (facility,time) weight` per line.
///
/// # Errors
///
/// Returns `InvalidNodeToken` for facilities containing whitespace (or any
/// other identifier whose token would not parse back to the same node).
pub fn to_edge_list(network: &TemporalNetwork) -> Result<String, HospinetError> {
    let mut out = String::new();
    for (from, to, weight) in network.edges() {
        writeln!(
            out,
            "{} {} {}",
            node_token(from)?,
            node_token(to)?,
            weight.value()
        )
        .map_err(|e| HospinetError::SerializationError(format!("Edge list: {}", e)))?;
    }
    Ok(out)
}

/// Parse an edge list. Blank lines are ignored.
pub fn from_edge_list(text: &str) -> Result<TemporalNetwork, HospinetError> {
    let mut edges: Vec<(TemporalNode, TemporalNode, EdgeWeight)> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => {}
            [from, to, weight] => {
                let weight: i64 = weight.parse().map_err(|_| {
                    HospinetError::DeserializationError(format!(
                        "Line {}: invalid weight {:?}",
                        line_no + 1,
                        weight
                    ))
                })?;
                edges.push((from.parse()?, to.parse()?, EdgeWeight::new(weight)));
            }
            _ => {
                return Err(HospinetError::DeserializationError(format!(
                    "Line {}: expected 3 fields, found {}",
                    line_no + 1,
                    fields.len()
                )));
            }
        }
    }

    Ok(TemporalNetwork::from_parts(Vec::new(), edges))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn n(facility: &str, t: i64) -> TemporalNode {
        TemporalNode::new(facility, t)
    }

    fn create_test_network() -> TemporalNetwork {
        TemporalNetwork::from_parts(
            vec![n("Z", 9)],
            vec![
                (n("X", 0), n("Y", 3), EdgeWeight::new(2)),
                (n("Y", 3), n("Y", 4), EdgeWeight::new(1)),
                (n("X", 0), n("X", 1), EdgeWeight::new(5)),
            ],
        )
    }

    fn split_export(exported: &[u8]) -> (CanonicalHeader, &[u8]) {
        let header_len =
            u32::from_le_bytes([exported[0], exported[1], exported[2], exported[3]]) as usize;
        let header = postcard::from_bytes(&exported[4..4 + header_len]).expect("parse header");
        (header, &exported[4 + header_len..])
    }

    fn assemble(header: &CanonicalHeader, data: &[u8]) -> Vec<u8> {
        let header_bytes = postcard::to_allocvec(header).expect("serialize header");
        let mut out = Vec::new();
        out.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(&header_bytes);
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn canonical_roundtrip_keeps_isolated_nodes() {
        let network = create_test_network();

        let exported = export_canonical(&network).expect("export");
        let imported = import_canonical(&exported).expect("import");

        assert_eq!(imported, network);
        assert!(imported.contains_node(&n("Z", 9)));
        assert!(imported.indices_consistent());
    }

    #[test]
    fn canonical_export_deterministic() {
        let network = create_test_network();

        let export1 = export_canonical(&network).expect("export 1");
        let export2 = export_canonical(&network).expect("export 2");

        assert_eq!(export1, export2, "Exports must be bit-identical");
    }

    #[test]
    fn canonical_reexport_is_identical() {
        let network = create_test_network();
        let first = export_canonical(&network).expect("export");
        let second = export_canonical(&import_canonical(&first).expect("import")).expect("export");
        assert_eq!(first, second);
    }

    #[test]
    fn verify_canonical_success_and_mismatch() {
        let network = create_test_network();
        let exported = export_canonical(&network).expect("export");
        assert!(verify_canonical(&network, &exported).expect("verify"));

        let other = TemporalNetwork::from_parts(vec![n("Q", 1)], Vec::new());
        assert!(!verify_canonical(&other, &exported).expect("verify"));
    }

    #[test]
    fn checksum_changes_with_weight() {
        let a = TemporalNetwork::from_parts(Vec::new(), vec![(n("A", 0), n("B", 1), EdgeWeight::new(1))]);
        let b = TemporalNetwork::from_parts(Vec::new(), vec![(n("A", 0), n("B", 1), EdgeWeight::new(2))]);
        assert_ne!(canonical_checksum(&a), canonical_checksum(&b));
    }

    #[test]
    fn checksum_distinguishes_swapped_facilities() {
        let a = TemporalNetwork::from_parts(Vec::new(), vec![(n("A", 0), n("B", 1), EdgeWeight::new(1))]);
        let b = TemporalNetwork::from_parts(Vec::new(), vec![(n("B", 0), n("A", 1), EdgeWeight::new(1))]);
        assert_ne!(canonical_checksum(&a), canonical_checksum(&b));
    }

    #[test]
    fn header_validation() {
        assert!(CanonicalHeader::new(10, 5, 12345).validate().is_ok());

        let bad_magic = CanonicalHeader {
            magic: *b"XXXX",
            ..CanonicalHeader::new(0, 0, 0)
        };
        assert!(bad_magic.validate().is_err());

        let bad_version = CanonicalHeader {
            version: 99,
            ..CanonicalHeader::new(0, 0, 0)
        };
        assert!(bad_version.validate().is_err());
    }

    #[test]
    fn empty_network_export() {
        let exported = export_canonical(&TemporalNetwork::new()).expect("export empty");
        let imported = import_canonical(&exported).expect("import empty");
        assert_eq!(imported.node_count(), 0);
    }

    // =========================================================================
    // Corrupted imports
    // =========================================================================

    #[test]
    fn corrupted_import_too_short() {
        assert!(matches!(
            import_canonical(&[]),
            Err(HospinetError::DeserializationError(_))
        ));
        assert!(import_canonical(&[0x01, 0x02, 0x03]).is_err());
    }

    #[test]
    fn corrupted_import_header_length_exceeds_data() {
        let mut data = vec![0xe8, 0x03, 0x00, 0x00]; // 1000 in little-endian u32
        data.extend_from_slice(&[0x00, 0x00, 0x00]);
        assert!(import_canonical(&data).is_err());
    }

    #[test]
    fn corrupted_import_invalid_magic_bytes() {
        let mut exported = export_canonical(&create_test_network()).expect("export");
        exported[4..8].copy_from_slice(&[0xFF; 4]);

        let err = import_canonical(&exported).expect_err("bad magic");
        assert!(err.to_string().contains("Invalid file format"), "got: {err}");
    }

    #[test]
    fn corrupted_import_checksum_mismatch() {
        let mut exported = export_canonical(&create_test_network()).expect("export");
        if let Some(last) = exported.last_mut() {
            *last ^= 0xFF;
        }

        let err = import_canonical(&exported).expect_err("corrupted");
        let msg = err.to_string();
        assert!(msg.contains("Checksum") || msg.contains("Data"), "got: {msg}");
    }

    #[test]
    fn corrupted_import_truncated_data_section() {
        let exported = export_canonical(&create_test_network()).expect("export");
        let (header, data) = split_export(&exported);
        let truncated = assemble(&header, &data[..1]);
        assert!(import_canonical(&truncated).is_err());
    }

    #[test]
    fn corrupted_import_node_count_mismatch() {
        let exported = export_canonical(&create_test_network()).expect("export");
        let (mut header, data) = split_export(&exported);
        header.node_count += 100;

        let err = import_canonical(&assemble(&header, data)).expect_err("mismatch");
        assert!(err.to_string().contains("Node count mismatch"), "got: {err}");
    }

    #[test]
    fn corrupted_import_edge_count_mismatch() {
        let exported = export_canonical(&create_test_network()).expect("export");
        let (mut header, data) = split_export(&exported);
        header.edge_count += 50;

        assert!(import_canonical(&assemble(&header, data)).is_err());
    }

    #[test]
    fn corrupted_import_excessive_counts() {
        let header = CanonicalHeader::new(MAX_IMPORT_NODE_COUNT + 1, 0, 0);
        let err = import_canonical(&assemble(&header, &[0u8; 10])).expect_err("limit");
        assert!(err.to_string().contains("exceeds maximum"), "got: {err}");

        let header = CanonicalHeader::new(10, MAX_IMPORT_EDGE_COUNT + 1, 0);
        let err = import_canonical(&assemble(&header, &[0u8; 10])).expect_err("limit");
        assert!(err.to_string().contains("exceeds maximum"), "got: {err}");
    }

    #[test]
    fn corrupted_import_counts_at_limit_fail_later() {
        let header = CanonicalHeader::new(MAX_IMPORT_NODE_COUNT, MAX_IMPORT_EDGE_COUNT, 0);
        let err = import_canonical(&assemble(&header, &[0u8; 10])).expect_err("bad data");
        assert!(!err.to_string().contains("exceeds maximum"), "got: {err}");
    }

    #[test]
    fn corrupted_import_random_bytes() {
        let random_data: Vec<u8> = (0..100).map(|i| (i * 17 + 31) as u8).collect();
        assert!(import_canonical(&random_data).is_err());
    }

    // =========================================================================
    // Serializable network
    // =========================================================================

    #[test]
    fn serializable_roundtrip() {
        let network = create_test_network();
        let serializable = SerializableNetwork::from(&network);

        assert!(serializable.nodes.contains(&CanonicalNode::from(&n("Z", 9))));
        assert_eq!(serializable.to_network(), network);
    }

    #[test]
    fn serializable_keeps_facility_verbatim() {
        let network = TemporalNetwork::from_parts(
            vec![n("'A'", 0)],
            vec![(n("St Mary", 0), n("a,b", 1), EdgeWeight::new(3))],
        );

        let json = serde_json::to_string(&SerializableNetwork::from(&network)).expect("encode");
        let decoded: SerializableNetwork = serde_json::from_str(&json).expect("decode");
        let restored = decoded.to_network();

        assert_eq!(restored, network);
        assert!(restored.contains_node(&n("'A'", 0)));
        assert!(restored.contains_node(&n("St Mary", 0)));
    }

    #[test]
    fn edge_list_rejects_what_json_keeps() {
        let network = TemporalNetwork::from_parts(
            Vec::new(),
            vec![(n("St Mary", 0), n("B", 1), EdgeWeight::new(1))],
        );
        assert!(matches!(
            to_edge_list(&network),
            Err(HospinetError::InvalidNodeToken(_))
        ));
        assert_eq!(SerializableNetwork::from(&network).to_network(), network);
    }

    // =========================================================================
    // Edge list
    // =========================================================================

    #[test]
    fn edge_list_lines() {
        let text = to_edge_list(&create_test_network()).expect("edge list");
        assert_eq!(text, "(X,0) (X,1) 5\n(X,0) (Y,3) 2\n(Y,3) (Y,4) 1\n");
    }

    #[test]
    fn edge_list_roundtrip_is_stable() {
        let first = to_edge_list(&create_test_network()).expect("edge list");
        let reimported = from_edge_list(&first).expect("parse");
        assert_eq!(to_edge_list(&reimported).expect("edge list"), first);
        // Isolated nodes are not representable in an edge list.
        assert!(!reimported.contains_node(&n("Z", 9)));
    }

    #[test]
    fn edge_list_rejects_whitespace_facility() {
        let network = TemporalNetwork::from_parts(
            Vec::new(),
            vec![(n("St Mary", 0), n("X", 1), EdgeWeight::new(1))],
        );
        assert!(matches!(
            to_edge_list(&network),
            Err(HospinetError::InvalidNodeToken(_))
        ));
    }

    #[test]
    fn edge_list_parse_errors() {
        assert!(from_edge_list("(A,0) (B,1)\n").is_err());
        assert!(from_edge_list("(A,0) (B,1) many\n").is_err());
        assert!(from_edge_list("A0 (B,1) 1\n").is_err());
        assert_eq!(
            from_edge_list("\n(A,0) (B,1) 3\n\n")
                .expect("parse")
                .edge_count(),
            1
        );
    }
}
