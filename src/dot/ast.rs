//! Parsed DOT graph
//!
//! A flattened view of a DOT document: subgraphs are dissolved into the node
//! and edge lists, defaults are already applied, and ports are recorded as
//! edge attributes.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::fmt;

/// A DOT attribute value, tagged with the lexical form it was written in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DotValue {
    /// Bare identifier, e.g. `box`
    Ident(String),
    /// Unquoted numeral, e.g. `3` or `-0.5`
    Numeral(String),
    /// Double-quoted string with escapes resolved and `+` parts joined
    Quoted(String),
    /// HTML string, without the outer angle brackets
    Html(String),
}

impl DotValue {
    /// Text of the value as the DOT collaborator surfaces it
    pub fn as_str(&self) -> &str {
        match self {
            DotValue::Ident(s) | DotValue::Numeral(s) | DotValue::Quoted(s) | DotValue::Html(s) => s,
        }
    }
}

impl fmt::Display for DotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DotValue::Html(s) => write!(f, "<{}>", s),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Attribute map of a node, edge or graph, in assignment order
pub type DotAttributes = IndexMap<String, DotValue>;

/// An edge statement expanded to a single tail/head pair
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEdge {
    pub source: String,
    pub target: String,
    pub attributes: DotAttributes,
}

/// Graph as read from a DOT document
#[derive(Debug, Clone, PartialEq)]
pub struct SourceGraph {
    /// Graph ID from the header
    pub name: Option<String>,

    /// `digraph` (true) or `graph` (false)
    pub directed: bool,

    /// `strict` graphs fold repeated edges into one
    pub strict: bool,

    /// Root-level graph attributes
    pub attributes: DotAttributes,

    /// Node identifier -> attributes, in first-mention order
    nodes: IndexMap<String, DotAttributes>,

    /// Edges in statement order
    edges: Vec<SourceEdge>,

    /// Endpoint pair -> edge position, only maintained for strict graphs
    strict_index: FxHashMap<(String, String), usize>,
}

impl SourceGraph {
    pub fn new(directed: bool, strict: bool) -> Self {
        SourceGraph {
            name: None,
            directed,
            strict,
            attributes: DotAttributes::new(),
            nodes: IndexMap::new(),
            edges: Vec::new(),
            strict_index: FxHashMap::default(),
        }
    }

    /// Declare a node if it is new, seeding it with `defaults`
    ///
    /// Returns true when the node was created by this call.
    pub fn ensure_node(&mut self, id: &str, defaults: &DotAttributes) -> bool {
        if self.nodes.contains_key(id) {
            return false;
        }
        self.nodes.insert(id.to_string(), defaults.clone());
        true
    }

    /// Set attributes on a node, declaring it without defaults if needed
    pub fn set_node_attributes(&mut self, id: &str, attributes: DotAttributes) {
        let entry = self.nodes.entry(id.to_string()).or_default();
        entry.extend(attributes);
    }

    /// Append an edge; in a strict graph a repeated edge merges into the first
    pub fn add_edge(&mut self, source: &str, target: &str, attributes: DotAttributes) {
        if self.strict {
            let key = self.edge_key(source, target);
            if let Some(&position) = self.strict_index.get(&key) {
                self.edges[position].attributes.extend(attributes);
                return;
            }
            self.strict_index.insert(key, self.edges.len());
        }

        self.edges.push(SourceEdge {
            source: source.to_string(),
            target: target.to_string(),
            attributes,
        });
    }

    fn edge_key(&self, source: &str, target: &str) -> (String, String) {
        if !self.directed && target < source {
            (target.to_string(), source.to_string())
        } else {
            (source.to_string(), target.to_string())
        }
    }

    /// Node identifiers with their attributes, in first-mention order
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &DotAttributes)> {
        self.nodes.iter().map(|(id, attrs)| (id.as_str(), attrs))
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|id| id.as_str())
    }

    pub fn node_attributes(&self, id: &str) -> Option<&DotAttributes> {
        self.nodes.get(id)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn edges(&self) -> &[SourceEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
