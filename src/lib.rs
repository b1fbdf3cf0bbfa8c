//! dotgraph
//!
//! Batch converter from Graphviz DOT files to binary graph snapshots.
//!
//! # Architecture
//!
//! - [`dot`]: pest grammar and parser producing a [`dot::SourceGraph`]
//! - [`graph`]: in-memory attributed graph with an identifier index
//! - [`convert`]: single-file conversion and the directory batch
//! - [`persistence`]: bincode snapshots of [`graph::Graph`]
//! - [`config`]: layered converter settings
//!
//! ## Example Usage
//!
//! ```rust
//! use dotgraph::convert::GraphConverter;
//! use dotgraph::graph::PropertyValue;
//!
//! let graph = GraphConverter::default()
//!     .convert_str("digraph Flow { X -> Y [weight=3]; }")?;
//!
//! assert!(graph.is_directed());
//! assert_eq!(graph.vertex_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//!
//! // Values keep their textual form unless numeral coercion is enabled
//! let edge = &graph.edges()[0];
//! assert_eq!(
//!     edge.get_attribute("weight"),
//!     Some(&PropertyValue::String("3".to_string()))
//! );
//! # Ok::<(), dotgraph::convert::ConvertError>(())
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod convert;
pub mod dot;
pub mod graph;
pub mod persistence;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, ConverterConfig};

pub use convert::{
    convert_directory, output_path_for, BatchReport, ConvertError, ConvertOptions,
    ConvertResult, FailureKind, FileOutcome, GraphConverter,
};

pub use dot::{parse_dot, DotError, DotResult, DotValue, SourceGraph};

pub use graph::{
    Edge, EdgeId, Graph, GraphError, GraphResult, PropertyMap, PropertyValue, Vertex, VertexId,
};

pub use persistence::{load_graph, save_graph, SnapshotError, SnapshotResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
