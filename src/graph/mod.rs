//! Attributed graph model
//!
//! This module implements the conversion target:
//! - Named vertices with attribute maps
//! - Directed or undirected edges addressed by position, with attribute maps
//! - Multiple edges between the same vertices and self-loops
//! - Graph-level attributes

pub mod edge;
pub mod property;
pub mod store;
pub mod types;
pub mod vertex;

// Re-export main types
pub use edge::Edge;
pub use property::{PropertyMap, PropertyValue};
pub use store::{Graph, GraphError, GraphResult};
pub use types::{EdgeId, VertexId};
pub use vertex::{Vertex, NAME_KEY};
