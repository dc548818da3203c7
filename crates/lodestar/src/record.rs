//! Node records and their JSON form.
//!
//! A [`NodeRecord`] is one element of the input array: an `id`, the ids it
//! connects to, and whatever other fields the producer attached. The extra
//! fields are carried through untouched and in their original order, so the
//! output differs from the input only by the appended `x`/`y` pair.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::{Builder, NamedTempFile};

use crate::{error::LodestarError, geometry::Position};

/// Field names written by the pipeline, dropped from input records on load.
const POSITION_FIELDS: [&str; 2] = ["x", "y"];

/// One node of the input list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    id: String,
    connections: Vec<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl NodeRecord {
    /// Creates a record without extra fields.
    pub fn new(id: impl Into<String>, connections: Vec<String>) -> Self {
        Self {
            id: id.into(),
            connections,
            extra: Map::new(),
        }
    }

    /// Returns the node identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the connected identifiers in input order.
    pub fn connections(&self) -> &[String] {
        &self.connections
    }

    /// Returns fields other than `id` and `connections`.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    fn strip_positions(&mut self) {
        self.extra
            .retain(|key, _| !POSITION_FIELDS.contains(&key.as_str()));
    }
}

/// A [`NodeRecord`] annotated with its layout position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedRecord {
    #[serde(flatten)]
    record: NodeRecord,
    x: f64,
    y: f64,
}

impl PositionedRecord {
    /// Attaches `position` to `record`.
    pub fn new(record: NodeRecord, position: Position) -> Self {
        Self {
            record,
            x: position.x(),
            y: position.y(),
        }
    }

    /// Returns the original record.
    pub fn record(&self) -> &NodeRecord {
        &self.record
    }

    /// Returns the assigned position.
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Parse a JSON array of node records.
///
/// Stale `x`/`y` fields left by an earlier run are removed.
///
/// # Errors
///
/// Returns [`LodestarError::Json`] if `source` is not a JSON array of
/// `{id, connections}` objects.
pub fn parse_records(source: &str) -> Result<Vec<NodeRecord>, LodestarError> {
    let mut records: Vec<NodeRecord> = serde_json::from_str(source)?;
    for record in &mut records {
        record.strip_positions();
    }
    debug!(records = records.len(); "Parsed node records");
    Ok(records)
}

/// Read and parse a node list file.
///
/// # Errors
///
/// Returns [`LodestarError::Io`] if the file cannot be read and
/// [`LodestarError::Json`] if it cannot be parsed.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<NodeRecord>, LodestarError> {
    let path = path.as_ref();
    info!(path = path.display().to_string(); "Loading node list");
    let source = fs::read_to_string(path)?;
    parse_records(&source)
}

/// Serialize records as 2-space indented JSON.
///
/// Non-ASCII characters are written as-is.
///
/// # Errors
///
/// Returns [`LodestarError::Json`] if serialization fails.
pub fn to_json<T: Serialize>(records: &[T]) -> Result<String, LodestarError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write records to `path`, replacing any existing file.
///
/// The JSON is written to a temporary file next to `path` and renamed into
/// place, so a failure never leaves a truncated file behind. An existing
/// file keeps its permissions; a new one gets the same mode a plain create
/// would give it.
///
/// # Errors
///
/// Returns [`LodestarError::Io`] if the temporary file cannot be created,
/// written or renamed.
pub fn save_records<T: Serialize>(
    path: impl AsRef<Path>,
    records: &[T],
) -> Result<(), LodestarError> {
    let path = path.as_ref();
    let json = to_json(records)?;

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = temp_file_for(path, dir)?;
    file.write_all(json.as_bytes())?;
    file.persist(path).map_err(|err| err.error)?;

    info!(path = path.display().to_string(), records = records.len(); "Node list written");
    Ok(())
}

/// Create the temporary file that will replace `path`.
fn temp_file_for(path: &Path, dir: &Path) -> io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Narrowed by the umask, like `File::create`
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let file = builder.tempfile_in(dir)?;

    if let Ok(metadata) = fs::metadata(path) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    Ok(file)
}
