//! Binary graph snapshots
//!
//! A snapshot is the bincode encoding of a [`Graph`]. Encoding is
//! deterministic: the same graph always produces the same bytes.

use crate::graph::Graph;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Snapshot errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Encode a graph
pub fn to_bytes(graph: &Graph) -> SnapshotResult<Vec<u8>> {
    Ok(bincode::serialize(graph)?)
}

/// Decode a graph, rebuilding and checking its name index
pub fn from_bytes(bytes: &[u8]) -> SnapshotResult<Graph> {
    Ok(bincode::deserialize(bytes)?)
}

/// Write a graph to `path`, replacing any existing file
pub fn save_graph(graph: &Graph, path: impl AsRef<Path>) -> SnapshotResult<()> {
    let path = path.as_ref();
    let bytes = to_bytes(graph)?;
    fs::write(path, &bytes)?;

    debug!(
        "Wrote snapshot {:?} ({} vertices, {} edges, {} bytes)",
        path,
        graph.vertex_count(),
        graph.edge_count(),
        bytes.len()
    );
    Ok(())
}

/// Read a graph written by [`save_graph`]
pub fn load_graph(path: impl AsRef<Path>) -> SnapshotResult<Graph> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    Ok(bincode::deserialize_from(reader)?)
}
