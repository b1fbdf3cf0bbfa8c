//! Persistence layer
//!
//! Converted graphs are written as self-contained binary snapshots, one file
//! per graph. There is no schema versioning: a snapshot is readable by the
//! build of this crate that wrote it.

pub mod snapshot;

pub use snapshot::{
    from_bytes, load_graph, save_graph, to_bytes, SnapshotError, SnapshotResult,
};
