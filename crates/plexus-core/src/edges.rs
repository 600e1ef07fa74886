//! Edge-list readers.
//!
//! Two on-disk shapes are accepted:
//!
//! - **Text**: one edge per line. Endpoints are separated by a comma, a tab,
//!   or (when neither is present) whitespace. Blank lines and lines starting
//!   with `#` are ignored.
//! - **JSON**: an array of records, each an array of two node values
//!   (integers or strings), e.g. `[["hall", "kitchen"], [101, 102]]`.
//!   A `[null, null]` record is the adjacency detector's "nothing found"
//!   marker and is skipped.
//!
//! Tokens that parse as integers become [`NodeKey::Id`], everything else a
//! [`NodeKey::Label`]. Record arity is checked when the graph is built, so
//! a malformed row is reported with its line (text) or record index (JSON).

use std::fmt;
use std::fs;
use std::io::{self, BufRead, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::ErrorCode;
use crate::graph::{Graph, GraphError};

// ---------------------------------------------------------------------------
// NodeKey
// ---------------------------------------------------------------------------

/// A node identifier as found in an edge file: a numeric element ID or a
/// room label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeKey {
    Id(i64),
    Label(String),
}

impl NodeKey {
    /// Parse a text token: integers become IDs, anything else a label.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        token
            .parse::<i64>()
            .map_or_else(|_| Self::Label(token.to_string()), Self::Id)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

impl From<&str> for NodeKey {
    fn from(value: &str) -> Self {
        Self::Label(value.to_string())
    }
}

impl From<i64> for NodeKey {
    fn from(value: i64) -> Self {
        Self::Id(value)
    }
}

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

/// Edge file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeFormat {
    Text,
    Json,
}

impl EdgeFormat {
    /// Guess from a file extension: `.json` is JSON, anything else text.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

impl FromStr for EdgeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" | "csv" | "tsv" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown edge format '{other}' (expected text or json)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Where in the input a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// 1-based line number in a text file.
    Line(usize),
    /// 0-based index into a JSON array.
    Record(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => write!(f, "line {line}"),
            Self::Record(index) => write!(f, "record {index}"),
        }
    }
}

/// Errors from reading an edge list.
#[derive(Debug, thiserror::Error)]
pub enum EdgeReadError {
    #[error("failed to read edge file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read edge list")]
    Io(#[from] io::Error),

    #[error("edge list is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("invalid edge at {location}: {detail}")]
    InvalidInput { location: Location, detail: String },
}

impl EdgeReadError {
    /// Machine-readable code for CLI error rendering.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Open { .. } | Self::Io(_) => ErrorCode::EdgeFileUnreadable,
            Self::Json(_) => ErrorCode::EdgeFileMalformed,
            Self::InvalidInput { .. } => ErrorCode::InvalidEdge,
        }
    }
}

// ---------------------------------------------------------------------------
// EdgeRecords
// ---------------------------------------------------------------------------

/// Parsed edge records plus where each one came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeRecords {
    /// One entry per record; arity is not yet validated.
    pub records: Vec<Vec<NodeKey>>,
    /// Source location of each record, parallel to `records`.
    pub locations: Vec<Location>,
    /// `[null, null]` markers that were dropped.
    pub skipped: usize,
}

impl EdgeRecords {
    fn push(&mut self, record: Vec<NodeKey>, location: Location) {
        self.records.push(record);
        self.locations.push(location);
    }

    /// Number of records read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records were read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build the canonical graph from these records.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeReadError::InvalidInput`] pointing at the first record
    /// that is not a pair.
    pub fn into_graph(self) -> Result<Graph<NodeKey>, EdgeReadError> {
        let locations = self.locations;
        Graph::try_from_records(self.records).map_err(|err| match err {
            GraphError::InvalidInput { index, arity } => EdgeReadError::InvalidInput {
                location: locations
                    .get(index)
                    .copied()
                    .unwrap_or(Location::Record(index)),
                detail: format!("expected 2 endpoints, found {arity}"),
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

/// Read and parse an edge file. The format defaults to a guess from the
/// file extension.
///
/// # Errors
///
/// Returns [`EdgeReadError::Open`] if the file cannot be read, or a parse
/// error from [`parse_edges`].
#[instrument]
pub fn read_edge_file(path: &Path, format: Option<EdgeFormat>) -> Result<EdgeRecords, EdgeReadError> {
    let content = fs::read_to_string(path).map_err(|source| EdgeReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let format = format.unwrap_or_else(|| EdgeFormat::from_path(path));
    parse_edges(&content, format)
}

/// Read an edge list from any reader (stdin, a socket, a test buffer).
///
/// # Errors
///
/// Returns [`EdgeReadError::Io`] on read failure, or a parse error from
/// [`parse_edges`].
pub fn read_edges<R: Read>(mut reader: R, format: EdgeFormat) -> Result<EdgeRecords, EdgeReadError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_edges(&content, format)
}

/// Parse edge-list text in the given format.
///
/// # Errors
///
/// Returns [`EdgeReadError::Json`] for unparsable JSON and
/// [`EdgeReadError::InvalidInput`] for records that cannot be edges.
pub fn parse_edges(content: &str, format: EdgeFormat) -> Result<EdgeRecords, EdgeReadError> {
    let records = match format {
        EdgeFormat::Text => parse_text(content.as_bytes())?,
        EdgeFormat::Json => parse_json(content)?,
    };
    debug!(
        records = records.len(),
        skipped = records.skipped,
        ?format,
        "edge list parsed"
    );
    Ok(records)
}

fn parse_text<R: BufRead>(reader: R) -> Result<EdgeRecords, EdgeReadError> {
    let mut out = EdgeRecords::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = if let Some(delim) = [',', '\t']
            .into_iter()
            .find(|&d| trimmed.contains(d))
        {
            trimmed.split(delim).map(str::trim).collect()
        } else {
            trimmed.split_whitespace().collect()
        };

        if tokens.iter().any(|t| t.is_empty()) {
            return Err(EdgeReadError::InvalidInput {
                location: Location::Line(line_no),
                detail: "empty node name".to_string(),
            });
        }

        let record = tokens.into_iter().map(NodeKey::from_token).collect();
        out.push(record, Location::Line(line_no));
    }

    Ok(out)
}

fn parse_json(content: &str) -> Result<EdgeRecords, EdgeReadError> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        return Err(EdgeReadError::InvalidInput {
            location: Location::Record(0),
            detail: "top-level value must be an array of edges".to_string(),
        });
    };

    let mut out = EdgeRecords::default();
    for (index, item) in items.into_iter().enumerate() {
        let location = Location::Record(index);
        let invalid = |detail: &str| EdgeReadError::InvalidInput {
            location,
            detail: detail.to_string(),
        };

        let Value::Array(endpoints) = item else {
            return Err(invalid("edge must be an array of two nodes"));
        };

        let nodes = endpoints
            .into_iter()
            .map(|endpoint| match endpoint {
                Value::Null => Ok(None),
                Value::String(label) => Ok(Some(NodeKey::Label(label))),
                Value::Number(num) => num
                    .as_i64()
                    .map(|id| Some(NodeKey::Id(id)))
                    .ok_or_else(|| invalid("numeric node IDs must be integers")),
                _ => Err(invalid("node must be an integer or a string")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if nodes.len() == 2 && nodes.iter().all(Option::is_none) {
            out.skipped += 1;
            continue;
        }

        let record: Option<Vec<NodeKey>> = nodes.into_iter().collect();
        let Some(record) = record else {
            return Err(invalid("edge has a null endpoint"));
        };
        out.push(record, location);
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
