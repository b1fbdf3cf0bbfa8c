//! Edge implementation for the attributed graph
//!
//! Edges reference their endpoints by vertex position. Whether an edge is
//! ordered is a property of the owning graph, not of the edge.

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, VertexId};
use serde::{Deserialize, Serialize};

/// An edge in the attributed graph
///
/// Multiple edges between the same pair of vertices and self-loops are
/// allowed; each one is addressed by its own `EdgeId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Position of this edge in the graph
    pub id: EdgeId,

    /// Source vertex (tail in a directed graph)
    pub source: VertexId,

    /// Target vertex (head in a directed graph)
    pub target: VertexId,

    /// Attributes associated with this edge
    pub attributes: PropertyMap,
}

impl Edge {
    /// Create a new edge without attributes
    pub fn new(id: EdgeId, source: VertexId, target: VertexId) -> Self {
        Edge {
            id,
            source,
            target,
            attributes: PropertyMap::new(),
        }
    }

    /// Set an attribute value, returning the previous one
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.attributes.insert(key.into(), value.into())
    }

    /// Get an attribute value
    pub fn get_attribute(&self, key: &str) -> Option<&PropertyValue> {
        self.attributes.get(key)
    }

    /// Get number of attributes
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Check if this edge joins the two vertices
    ///
    /// With `directed` false the endpoints are compared in either order.
    pub fn joins(&self, source: VertexId, target: VertexId, directed: bool) -> bool {
        (self.source == source && self.target == target)
            || (!directed && self.source == target && self.target == source)
    }

    /// Check if this edge is a self-loop
    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }
}
