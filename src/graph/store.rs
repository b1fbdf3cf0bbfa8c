//! In-memory attributed graph
//!
//! Vertices and edges live in insertion-ordered vectors and are addressed by
//! position. A name index maps each vertex identifier to its position so that
//! edges given as identifier pairs resolve without scanning.

use super::edge::Edge;
use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, VertexId};
use super::vertex::{Vertex, NAME_KEY};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Vertex '{0}' already exists")]
    DuplicateVertex(String),

    #[error("Vertex '{0}' not found")]
    UnknownVertex(String),

    #[error("Vertex {0} not found")]
    VertexNotFound(VertexId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Attribute '{key}' on vertex '{vertex}' collides with the vertex identifier key")]
    ReservedAttribute { key: String, vertex: String },

    #[error("Edge {0} references missing vertex {1}")]
    DanglingEdge(EdgeId, VertexId),

    #[error("Inconsistent graph data: {0}")]
    Inconsistent(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Attributed graph with named vertices
///
/// The name index is derived data: it is skipped when serializing and rebuilt
/// (and checked) when a graph is deserialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredGraph")]
pub struct Graph {
    /// Graph ID from the DOT header, if any
    name: Option<String>,

    /// Whether edges are ordered pairs
    directed: bool,

    /// Graph-level attributes
    attributes: PropertyMap,

    /// Vertex storage, position == VertexId
    vertices: Vec<Vertex>,

    /// Edge storage, position == EdgeId
    edges: Vec<Edge>,

    /// Vertex name -> position
    #[serde(skip_serializing)]
    name_index: FxHashMap<String, VertexId>,
}

/// Serialized layout of [`Graph`]; must list the serialized fields in order
#[derive(Deserialize)]
struct StoredGraph {
    name: Option<String>,
    directed: bool,
    attributes: PropertyMap,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl TryFrom<StoredGraph> for Graph {
    type Error = GraphError;

    fn try_from(stored: StoredGraph) -> GraphResult<Self> {
        let mut name_index = FxHashMap::default();
        name_index.reserve(stored.vertices.len());

        for (position, vertex) in stored.vertices.iter().enumerate() {
            if vertex.id.index() != position {
                return Err(GraphError::Inconsistent(format!(
                    "vertex '{}' stored at position {} has id {}",
                    vertex.name, position, vertex.id
                )));
            }
            if name_index.insert(vertex.name.clone(), vertex.id).is_some() {
                return Err(GraphError::DuplicateVertex(vertex.name.clone()));
            }
        }

        for (position, edge) in stored.edges.iter().enumerate() {
            if edge.id.index() != position {
                return Err(GraphError::Inconsistent(format!(
                    "edge stored at position {} has id {}",
                    position, edge.id
                )));
            }
            for endpoint in [edge.source, edge.target] {
                if endpoint.index() >= stored.vertices.len() {
                    return Err(GraphError::DanglingEdge(edge.id, endpoint));
                }
            }
        }

        Ok(Graph {
            name: stored.name,
            directed: stored.directed,
            attributes: stored.attributes,
            vertices: stored.vertices,
            edges: stored.edges,
            name_index,
        })
    }
}

impl Graph {
    /// Create a new empty graph
    pub fn new(directed: bool) -> Self {
        Graph {
            name: None,
            directed,
            attributes: PropertyMap::new(),
            vertices: Vec::new(),
            edges: Vec::new(),
            name_index: FxHashMap::default(),
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Add a vertex with a unique name
    pub fn add_vertex(&mut self, name: impl Into<String>) -> GraphResult<VertexId> {
        let name = name.into();
        if self.name_index.contains_key(&name) {
            return Err(GraphError::DuplicateVertex(name));
        }

        let id = VertexId::new(self.vertices.len());
        self.name_index.insert(name.clone(), id);
        self.vertices.push(Vertex::new(id, name));
        Ok(id)
    }

    /// Add several vertices in order
    pub fn add_vertices<I, S>(&mut self, names: I) -> GraphResult<Vec<VertexId>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(|name| self.add_vertex(name)).collect()
    }

    /// Add an edge between two existing vertices
    pub fn add_edge(&mut self, source: VertexId, target: VertexId) -> GraphResult<EdgeId> {
        let id = EdgeId::new(self.edges.len());
        for endpoint in [source, target] {
            if endpoint.index() >= self.vertices.len() {
                return Err(GraphError::VertexNotFound(endpoint));
            }
        }

        self.edges.push(Edge::new(id, source, target));
        Ok(id)
    }

    /// Add an edge between two vertices given by name
    pub fn add_edge_by_name(&mut self, source: &str, target: &str) -> GraphResult<EdgeId> {
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;
        self.add_edge(source, target)
    }

    /// Add several edges given by name pairs; ids are returned in input order
    pub fn add_edges_by_name<'a, I>(&mut self, pairs: I) -> GraphResult<Vec<EdgeId>>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .map(|(source, target)| self.add_edge_by_name(source, target))
            .collect()
    }

    /// Look up a vertex position by name
    pub fn find_vertex(&self, name: &str) -> Option<VertexId> {
        self.name_index.get(name).copied()
    }

    fn resolve(&self, name: &str) -> GraphResult<VertexId> {
        self.find_vertex(name)
            .ok_or_else(|| GraphError::UnknownVertex(name.to_string()))
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    pub fn vertex_by_name(&self, name: &str) -> Option<&Vertex> {
        self.find_vertex(name).and_then(|id| self.vertex(id))
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// Set a vertex attribute
    ///
    /// The `name` key is reserved for the identifier. Setting it to the
    /// vertex's own name is accepted and changes nothing; any other value is
    /// rejected.
    pub fn set_vertex_attribute(
        &mut self,
        id: VertexId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<Option<PropertyValue>> {
        let key = key.into();
        let value = value.into();
        let vertex = self
            .vertices
            .get_mut(id.index())
            .ok_or(GraphError::VertexNotFound(id))?;

        if key == NAME_KEY {
            if value.to_text() == vertex.name {
                return Ok(None);
            }
            return Err(GraphError::ReservedAttribute {
                key,
                vertex: vertex.name.clone(),
            });
        }

        Ok(vertex.set_attribute(key, value))
    }

    /// Set an edge attribute
    pub fn set_edge_attribute(
        &mut self,
        id: EdgeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<Option<PropertyValue>> {
        let edge = self
            .edges
            .get_mut(id.index())
            .ok_or(GraphError::EdgeNotFound(id))?;
        Ok(edge.set_attribute(key, value))
    }

    /// Set a graph-level attribute
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.attributes.insert(key.into(), value.into())
    }

    pub fn attributes(&self) -> &PropertyMap {
        &self.attributes
    }

    /// All edges joining the two vertices, in insertion order
    pub fn edges_between(&self, source: VertexId, target: VertexId) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|edge| edge.joins(source, target, self.directed))
            .map(|edge| edge.id)
            .collect()
    }

    /// Names of an edge's endpoints as (source, target)
    pub fn endpoint_names(&self, id: EdgeId) -> Option<(&str, &str)> {
        let edge = self.edge(id)?;
        let source = self.vertex(edge.source)?;
        let target = self.vertex(edge.target)?;
        Some((source.name.as_str(), target.name.as_str()))
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.directed == other.directed
            && self.attributes == other.attributes
            && self.vertices == other.vertices
            && self.edges == other.edges
    }
}
