//! Vertex implementation for the attributed graph

use super::property::{PropertyMap, PropertyValue};
use super::types::VertexId;
use serde::{Deserialize, Serialize};

/// Attribute key holding the vertex identifier. It cannot be set as a regular
/// attribute.
pub const NAME_KEY: &str = "name";

/// A vertex in the attributed graph
///
/// Vertices have:
/// - A position in the vertex list
/// - A unique name (the DOT node identifier)
/// - Attributes (key-value pairs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Position of this vertex in the graph
    pub id: VertexId,

    /// Unique identifier used for lookups
    pub name: String,

    /// Attributes associated with this vertex
    pub attributes: PropertyMap,
}

impl Vertex {
    /// Create a new vertex without attributes
    pub fn new(id: VertexId, name: impl Into<String>) -> Self {
        Vertex {
            id,
            name: name.into(),
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

    /// Check if attribute exists
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Get number of attributes
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}
