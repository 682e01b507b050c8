//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::{NetworkFormat, SeriesMetric};
use crate::config::HospinetConfig;
use hospinet_core::{
    HospinetError, MaxPageRank, NetworkSummary, PageRank, RawTable, SerializableNetwork,
    TemporalNetwork, TimeUnit, canonical_checksum, canonical_crypto_hash, clean_table,
    export_canonical, from_edge_list, global_reaching_timeseries, import_canonical,
    records_from_table, temporal_timeseries, to_edge_list, write_stays_csv,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum stay-table size (500 MB).
const MAX_TABLE_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Maximum network file size (500 MB).
const MAX_NETWORK_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), HospinetError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| HospinetError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(HospinetError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path, which must name an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, HospinetError> {
    let canonical = path.canonicalize().map_err(|e| {
        HospinetError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(HospinetError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path whose parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, HospinetError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        HospinetError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(HospinetError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| HospinetError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn create_file(path: &Path) -> Result<File, HospinetError> {
    let validated = validate_output_path(path)?;
    File::create(&validated)
        .map_err(|e| HospinetError::IoError(format!("Create '{}': {}", path.display(), e)))
}

/// Writer for `path`, or stdout when no path is given.
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, HospinetError> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(create_file(path)?))),
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

fn write_all(mut out: impl Write, bytes: &[u8]) -> Result<(), HospinetError> {
    out.write_all(bytes)
        .and_then(|()| out.flush())
        .map_err(|e| HospinetError::IoError(e.to_string()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, HospinetError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| HospinetError::SerializationError(format!("JSON: {}", e)))
}

// =============================================================================
// FILE I/O
// =============================================================================

/// Read a CSV stay table.
pub fn read_stay_table(path: &Path) -> Result<RawTable, HospinetError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_TABLE_FILE_SIZE)?;

    let file = File::open(&validated)
        .map_err(|e| HospinetError::IoError(format!("Open '{}': {}", path.display(), e)))?;
    let table = RawTable::from_csv(BufReader::new(file))?;
    tracing::info!(path = %path.display(), rows = table.len(), "stay table read");
    Ok(table)
}

/// Load a network file, trying canonical, then JSON, then edge list.
pub fn load_network(path: &Path) -> Result<TemporalNetwork, HospinetError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_NETWORK_FILE_SIZE)?;

    let bytes = std::fs::read(&validated)
        .map_err(|e| HospinetError::IoError(format!("Read '{}': {}", path.display(), e)))?;

    let canonical_err = match import_canonical(&bytes) {
        Ok(network) => return Ok(network),
        Err(e) => e,
    };

    let text = std::str::from_utf8(&bytes).map_err(|_| {
        HospinetError::DeserializationError(format!(
            "'{}' is not a network file: {}",
            path.display(),
            canonical_err
        ))
    })?;

    match serde_json::from_str::<SerializableNetwork>(text) {
        Ok(serializable) => Ok(serializable.to_network()),
        Err(json_err) => from_edge_list(text).map_err(|lgl_err| {
            HospinetError::DeserializationError(format!(
                "'{}' is not a network file (canonical: {}; json: {}; edge list: {})",
                path.display(),
                canonical_err,
                json_err,
                lgl_err
            ))
        }),
    }
}

/// Write a network file in the requested format.
pub fn write_network(
    network: &TemporalNetwork,
    path: &Path,
    format: NetworkFormat,
) -> Result<(), HospinetError> {
    let bytes = match format {
        NetworkFormat::Canonical => export_canonical(network)?,
        NetworkFormat::Json => to_json(&SerializableNetwork::from(network))?.into_bytes(),
        NetworkFormat::Lgl => to_edge_list(network)?.into_bytes(),
    };
    write_all(BufWriter::new(create_file(path)?), &bytes)?;
    tracing::info!(path = %path.display(), ?format, "network written");
    Ok(())
}

fn print_summary(summary: &NetworkSummary) {
    let span = match (summary.first_time, summary.last_time) {
        (Some(first), Some(last)) => format!("{} .. {}", first, last),
        _ => "-".to_string(),
    };
    println!("Nodes:        {}", summary.node_count);
    println!("Edges:        {}", summary.edge_count);
    println!("Facilities:   {}", summary.facility_count);
    println!("Time units:   {}", summary.time_count);
    println!("Time span:    {}", span);
    println!("Transitions:  {}", summary.total_weight);
}

// =============================================================================
// CLEAN COMMAND
// =============================================================================

/// Clean a raw stay table and write the resolved stays.
pub fn cmd_clean(
    config: &HospinetConfig,
    json_mode: bool,
    input: &Path,
    output: &Path,
) -> Result<(), HospinetError> {
    let table = read_stay_table(input)?;
    let cleaned = clean_table(&table, &config.cleaning_config())?;

    let writer = BufWriter::new(create_file(output)?);
    write_stays_csv(&cleaned.records, &config.columns, writer)?;

    if json_mode {
        println!("{}", to_json(&cleaned.report)?);
        return Ok(());
    }

    let report = &cleaned.report;
    println!("hospinet Cleaning Report");
    println!("========================");
    println!("Rows read:            {}", report.rows_read);
    println!("Missing dropped:      {}", report.missing_dropped);
    println!("Erroneous dropped:    {}", report.erroneous_dropped);
    println!("Duplicates dropped:   {}", report.duplicates_dropped);
    println!("Overlaps remaining:   {}", report.overlaps_remaining);
    println!("Stays written:        {}", cleaned.records.len());
    Ok(())
}

// =============================================================================
// BUILD COMMAND
// =============================================================================

/// Build a temporal network from a stay table.
pub fn cmd_build(
    config: &HospinetConfig,
    json_mode: bool,
    input: &Path,
    output: &Path,
    format: NetworkFormat,
    skip_clean: bool,
) -> Result<(), HospinetError> {
    let builder = config.builder()?;
    let table = read_stay_table(input)?;

    let records = if skip_clean {
        records_from_table(&table, &config.columns)?
    } else {
        clean_table(&table, &config.cleaning_config())?.records
    };

    let network = builder.build(&records)?;
    write_network(&network, output, format)?;

    let summary = network.summary();
    if json_mode {
        println!("{}", to_json(&summary)?);
    } else {
        println!("Network written to {}", output.display());
        print_summary(&summary);
    }
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show network summary.
pub fn cmd_status(json_mode: bool, path: &Path) -> Result<(), HospinetError> {
    let network = load_network(path)?;
    let summary = network.summary();

    if json_mode {
        let output = serde_json::json!({
            "network": path.to_string_lossy(),
            "summary": summary,
            "checksum": canonical_checksum(&network),
        });
        println!("{}", to_json(&output)?);
        return Ok(());
    }

    println!("hospinet Network Status");
    println!("=======================");
    println!("Network:      {}", path.display());
    println!();
    print_summary(&summary);
    println!("Checksum:     {:016x}", canonical_checksum(&network));
    Ok(())
}

// =============================================================================
// PROJECT COMMAND
// =============================================================================

/// Project a network onto a static facility graph, written as JSON.
pub fn cmd_project(path: &Path, output: Option<&Path>) -> Result<(), HospinetError> {
    let network = load_network(path)?;
    let projection = network.to_static();

    let facilities: Vec<_> = projection
        .presence
        .iter()
        .map(|(facility, presence)| {
            serde_json::json!({ "id": facility.as_str(), "presence": presence })
        })
        .collect();
    let edges: Vec<_> = projection
        .graph
        .edges()
        .map(|(from, to, weight)| {
            serde_json::json!({ "source": from.as_str(), "target": to.as_str(), "weight": weight })
        })
        .collect();
    let document = serde_json::json!({ "facilities": facilities, "edges": edges });

    let mut text = to_json(&document)?;
    text.push('\n');
    write_all(open_output(output)?, text.as_bytes())
}

// =============================================================================
// TIMESERIES COMMAND
// =============================================================================

/// Evaluate a metric over every outbound snapshot.
///
/// Writes CSV (`t,value`) by default and a JSON array in JSON mode.
pub fn cmd_timeseries(
    json_mode: bool,
    path: &Path,
    metric: SeriesMetric,
    safe: bool,
    default: f64,
    output: Option<&Path>,
) -> Result<(), HospinetError> {
    let network = load_network(path)?;

    let series = match metric {
        SeriesMetric::GlobalReaching => global_reaching_timeseries(&network)?,
        SeriesMetric::PagerankMax => {
            temporal_timeseries(&network, MaxPageRank(PageRank::default()), safe, default)?
        }
    };
    tracing::info!(?metric, points = series.len(), "time series computed");

    let out = open_output(output)?;
    if json_mode {
        let points: Vec<_> = series
            .iter()
            .map(|(t, value)| serde_json::json!({ "t": t, "value": value }))
            .collect();
        let mut text = to_json(&points)?;
        text.push('\n');
        return write_all(out, text.as_bytes());
    }

    write_series_csv(&series, out)
}

fn write_series_csv(series: &[(TimeUnit, f64)], out: impl Write) -> Result<(), HospinetError> {
    let to_err = |e: csv::Error| HospinetError::SerializationError(format!("CSV: {}", e));
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(["t", "value"]).map_err(to_err)?;
    for (t, value) in series {
        writer
            .write_record([t.to_string(), value.to_string()])
            .map_err(to_err)?;
    }
    writer
        .flush()
        .map_err(|e| HospinetError::IoError(e.to_string()))
}

// =============================================================================
// CONVERT COMMAND
// =============================================================================

/// Convert a network between interchange formats.
pub fn cmd_convert(input: &Path, output: &Path, format: NetworkFormat) -> Result<(), HospinetError> {
    let network = load_network(input)?;
    write_network(&network, output, format)?;
    println!(
        "Converted {} nodes, {} edges to {}",
        network.node_count(),
        network.edge_count(),
        output.display()
    );
    Ok(())
}

// =============================================================================
// HASH COMMAND
// =============================================================================

/// Compute the BLAKE3 hash of a network's canonical form.
pub fn cmd_hash(json_mode: bool, path: &Path) -> Result<(), HospinetError> {
    let network = load_network(path)?;
    let hash = canonical_crypto_hash(&network)?;
    let checksum = canonical_checksum(&network);

    if json_mode {
        let output = serde_json::json!({
            "algorithm": "BLAKE3",
            "hash": hash,
            "checksum": checksum,
            "node_count": network.node_count(),
            "edge_count": network.edge_count(),
        });
        println!("{}", to_json(&output)?);
        return Ok(());
    }

    println!("BLAKE3:    {}", hash);
    println!("Checksum:  {:016x}", checksum);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_in_current_directory() {
        let resolved = validate_output_path(Path::new("out.bin")).expect("resolve");
        assert_eq!(resolved.file_name().and_then(|f| f.to_str()), Some("out.bin"));
    }

    #[test]
    fn output_path_with_missing_parent_rejected() {
        assert!(validate_output_path(Path::new("/definitely/not/here/out.bin")).is_err());
    }

    #[test]
    fn missing_input_rejected() {
        assert!(matches!(
            load_network(Path::new("/definitely/not/here.bin")),
            Err(HospinetError::IoError(_))
        ));
    }

    #[test]
    fn series_csv_has_header() {
        let mut buf = Vec::new();
        write_series_csv(&[(0, 1.0), (3, 0.5)], &mut buf).expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "t,value\n0,1\n3,0.5\n");
    }
}
