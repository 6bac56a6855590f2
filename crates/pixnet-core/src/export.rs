//! # Table Export
//!
//! Column ordering and CSV serialization of the edge and node tables.
//!
//! ## Column Contract
//!
//! - Edges: `source, target, weight, distance, rank`, then every other column
//!   in lexicographic order.
//! - Nodes: `id`, then every other column in lexicographic order.
//!
//! Columns are the union over all rows; a row without a value for a column
//! gets an empty cell. Identical input always yields byte-identical headers.

use crate::primitives::{EDGE_LEADING_COLUMNS, NODE_ID_COLUMN, NODES_FILE_SUFFIX, axis_name};
use crate::{NeighborEdge, NodeRecord, NodeTable, PixnetError, Point};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One table row: column name to rendered cell.
pub type Row = BTreeMap<String, String>;

// =============================================================================
// CELL FORMATTING
// =============================================================================

/// Render a float the way the exported tables expect.
///
/// Shortest round-trip digits; integral values keep a trailing `.0`; very
/// small or very large magnitudes use an exponent with a signed, two-digit
/// minimum exponent (`1e-05`, `1e+16`).
#[must_use]
pub fn format_float(v: f64) -> String {
    if !v.is_finite() {
        return if v.is_nan() {
            "nan".to_string()
        } else if v > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }

    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let raw = format!("{v:e}");
        let Some((mantissa, exponent)) = raw.split_once('e') else {
            return raw;
        };
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(d) => ('-', d),
            None => ('+', exponent),
        };
        return format!("{mantissa}e{sign}{digits:0>2}");
    }

    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Render a metadata value as a cell.
///
/// Strings are written verbatim, `null` as an empty cell, nested values as
/// compact JSON.
#[must_use]
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn insert_position(row: &mut Row, prefix: &str, position: &Point) {
    for (i, c) in position.coords().iter().enumerate() {
        row.insert(format!("{prefix}{}", axis_name(i)), format_float(*c));
    }
}

// =============================================================================
// ROWS
// =============================================================================

/// Cells of an edge row.
#[must_use]
pub fn edge_row(edge: &NeighborEdge) -> Row {
    let mut row = Row::new();
    row.insert("source".to_string(), edge.source.clone());
    row.insert("target".to_string(), edge.target.clone());
    row.insert("weight".to_string(), format_float(edge.weight));
    row.insert("distance".to_string(), format_float(edge.distance));
    row.insert("rank".to_string(), edge.rank.to_string());
    insert_position(&mut row, "source_", &edge.source_pos);
    insert_position(&mut row, "target_", &edge.target_pos);
    row
}

/// Cells of a node row.
///
/// Metadata is applied last and may shadow position or asset columns of the
/// same name.
#[must_use]
pub fn node_row(node: &NodeRecord) -> Row {
    let mut row = Row::new();
    row.insert(NODE_ID_COLUMN.to_string(), node.id.clone());
    insert_position(&mut row, "", &node.position);
    for (kind, path) in &node.assets {
        row.insert(kind.column().to_string(), path.display().to_string());
    }
    for (key, value) in &node.metadata {
        row.insert(key.clone(), format_value(value));
    }
    row
}

// =============================================================================
// COLUMN ORDER
// =============================================================================

/// `leading` in order, then every other seen column sorted.
#[must_use]
pub fn order_columns<'a>(
    leading: &[&str],
    seen: impl IntoIterator<Item = &'a String>,
) -> Vec<String> {
    let rest: BTreeSet<&String> = seen
        .into_iter()
        .filter(|c| !leading.contains(&c.as_str()))
        .collect();

    leading
        .iter()
        .map(|c| (*c).to_string())
        .chain(rest.into_iter().cloned())
        .collect()
}

/// Header of the edge table.
#[must_use]
pub fn edge_columns(rows: &[Row]) -> Vec<String> {
    order_columns(&EDGE_LEADING_COLUMNS, rows.iter().flat_map(|r| r.keys()))
}

/// Header of the node table.
#[must_use]
pub fn node_columns(rows: &[Row]) -> Vec<String> {
    order_columns(&[NODE_ID_COLUMN], rows.iter().flat_map(|r| r.keys()))
}

// =============================================================================
// CSV WRITING
// =============================================================================

fn write_table<W: Write>(writer: W, columns: &[String], rows: &[Row]) -> Result<(), PixnetError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(columns)?;
    for row in rows {
        csv_writer.write_record(
            columns
                .iter()
                .map(|c| row.get(c).map(String::as_str).unwrap_or("")),
        )?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the edge table. Returns the number of data rows.
pub fn write_edges<W: Write>(writer: W, edges: &[NeighborEdge]) -> Result<usize, PixnetError> {
    let rows: Vec<Row> = edges.iter().map(edge_row).collect();
    write_table(writer, &edge_columns(&rows), &rows)?;
    Ok(rows.len())
}

/// Write the node table in first-occurrence order. Returns the number of data rows.
pub fn write_nodes<W: Write>(writer: W, nodes: &NodeTable) -> Result<usize, PixnetError> {
    let rows: Vec<Row> = nodes.iter().map(node_row).collect();
    write_table(writer, &node_columns(&rows), &rows)?;
    Ok(rows.len())
}

// =============================================================================
// PATHS & DIGESTS
// =============================================================================

/// Nodes file path derived from the edges path: `<dir>/<stem>_nodes.csv`.
#[must_use]
pub fn nodes_path_for(edges_path: &Path) -> PathBuf {
    let stem = edges_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    edges_path.with_file_name(format!("{stem}{NODES_FILE_SUFFIX}"))
}

/// BLAKE3 hex digest of exported bytes.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn file_digest(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

// =============================================================================
// TESTS
// =============================================================================
