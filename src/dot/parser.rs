//! DOT parser using Pest
//!
//! Turns DOT text into a [`SourceGraph`]. Statements are walked in document
//! order with a stack of default-attribute scopes, one per subgraph.

use super::ast::{DotAttributes, DotValue, SourceGraph};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "dot/dot.pest"]
struct DotParser;

/// Parser errors
#[derive(Error, Debug)]
pub enum DotError {
    /// Pest parsing error
    #[error("Syntax error: {0}")]
    PestError(#[from] Box<pest::error::Error<Rule>>),

    /// Semantic error
    #[error("Semantic error: {0}")]
    SemanticError(String),
}

impl From<pest::error::Error<Rule>> for DotError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        DotError::PestError(Box::new(err))
    }
}

pub type DotResult<T> = Result<T, DotError>;

/// Parse a DOT document containing one graph
pub fn parse_dot(input: &str) -> DotResult<SourceGraph> {
    let file = DotParser::parse(Rule::file, input)?
        .next()
        .ok_or_else(|| DotError::SemanticError("Empty document".to_string()))?;

    let graph = file
        .into_inner()
        .find(|pair| pair.as_rule() == Rule::graph)
        .ok_or_else(|| DotError::SemanticError("Missing graph".to_string()))?;

    parse_graph(graph)
}

fn parse_graph(pair: Pair<Rule>) -> DotResult<SourceGraph> {
    let mut strict = false;
    let mut directed = false;
    let mut name = None;
    let mut body = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::strict_kw => strict = true,
            Rule::graph_kind => {
                directed = inner
                    .into_inner()
                    .next()
                    .map(|kind| kind.as_rule() == Rule::digraph_kw)
                    .unwrap_or(false);
            }
            Rule::id => name = Some(parse_id(inner)?.as_str().to_string()),
            Rule::stmt_list => body = Some(inner),
            _ => {}
        }
    }

    let mut builder = GraphBuilder::new(SourceGraph::new(directed, strict));
    builder.graph.name = name;
    if let Some(body) = body {
        builder.walk_stmt_list(body)?;
    }
    Ok(builder.graph)
}

/// Default attributes in effect inside one graph or subgraph body
#[derive(Debug, Clone, Default)]
struct Scope {
    node_defaults: DotAttributes,
    edge_defaults: DotAttributes,
}

/// A node reference inside an edge statement
#[derive(Debug, Clone)]
struct Endpoint {
    id: String,
    port: Option<String>,
}

struct GraphBuilder {
    graph: SourceGraph,
    scopes: Vec<Scope>,
}

impl GraphBuilder {
    fn new(graph: SourceGraph) -> Self {
        GraphBuilder {
            graph,
            scopes: vec![Scope::default()],
        }
    }

    fn scope(&self) -> DotResult<&Scope> {
        self.scopes
            .last()
            .ok_or_else(|| DotError::SemanticError("Scope stack is empty".to_string()))
    }

    fn scope_mut(&mut self) -> DotResult<&mut Scope> {
        self.scopes
            .last_mut()
            .ok_or_else(|| DotError::SemanticError("Scope stack is empty".to_string()))
    }

    fn is_root(&self) -> bool {
        self.scopes.len() == 1
    }

    /// Walk a statement list, returning the nodes it mentions
    fn walk_stmt_list(&mut self, pair: Pair<Rule>) -> DotResult<Vec<String>> {
        let mut members = Vec::new();

        for stmt in pair.into_inner() {
            match stmt.as_rule() {
                Rule::attr_stmt => self.attr_stmt(stmt)?,
                Rule::id_assign => self.id_assign(stmt)?,
                Rule::edge_stmt => members.extend(self.edge_stmt(stmt)?),
                _ => {}
            }
        }

        Ok(members)
    }

    fn attr_stmt(&mut self, pair: Pair<Rule>) -> DotResult<()> {
        let mut target = None;
        let mut attributes = DotAttributes::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::attr_target => {
                    target = inner.into_inner().next().map(|kw| kw.as_rule());
                }
                Rule::attr_list => attributes = parse_attr_list(inner)?,
                _ => {}
            }
        }

        match target {
            Some(Rule::graph_kw) => {
                // Subgraph-level graph attributes have no counterpart in the output
                if self.is_root() {
                    self.graph.attributes.extend(attributes);
                }
            }
            Some(Rule::node_kw) => self.scope_mut()?.node_defaults.extend(attributes),
            Some(Rule::edge_kw) => self.scope_mut()?.edge_defaults.extend(attributes),
            _ => {
                return Err(DotError::SemanticError(
                    "Attribute statement without target".to_string(),
                ))
            }
        }
        Ok(())
    }

    fn id_assign(&mut self, pair: Pair<Rule>) -> DotResult<()> {
        let mut ids = pair.into_inner();
        let key = next_id(&mut ids)?;
        let value = next_id(&mut ids)?;

        if self.is_root() {
            self.graph.attributes.insert(key.as_str().to_string(), value);
        }
        Ok(())
    }

    fn node_stmt(&mut self, node_id: Pair<Rule>, attributes: DotAttributes) -> DotResult<String> {
        let endpoint = parse_node_id(node_id)?;
        self.declare_node(&endpoint.id)?;
        if !attributes.is_empty() {
            self.graph.set_node_attributes(&endpoint.id, attributes);
        }
        Ok(endpoint.id)
    }

    /// Edge chain, or a node or subgraph statement when there is no edge operator
    fn edge_stmt(&mut self, pair: Pair<Rule>) -> DotResult<Vec<String>> {
        let parts: Vec<Pair<Rule>> = pair.into_inner().collect();
        if !parts.iter().any(|part| part.as_rule() == Rule::edge_op) {
            return self.lone_operand(parts);
        }

        let mut operands: Vec<Vec<Endpoint>> = Vec::new();
        let mut explicit = DotAttributes::new();

        for inner in parts {
            match inner.as_rule() {
                Rule::edge_operand => operands.push(self.edge_operand(inner)?),
                Rule::edge_op => self.check_edge_op(inner.as_str())?,
                Rule::attr_list => explicit = parse_attr_list(inner)?,
                _ => {}
            }
        }

        let mut attributes = self.scope()?.edge_defaults.clone();
        attributes.extend(explicit);

        for window in operands.windows(2) {
            let (tails, heads) = (&window[0], &window[1]);
            for tail in tails {
                for head in heads {
                    let mut edge_attributes = attributes.clone();
                    if let Some(port) = &tail.port {
                        edge_attributes.insert("tailport".to_string(), DotValue::Quoted(port.clone()));
                    }
                    if let Some(port) = &head.port {
                        edge_attributes.insert("headport".to_string(), DotValue::Quoted(port.clone()));
                    }
                    self.graph.add_edge(&tail.id, &head.id, edge_attributes);
                }
            }
        }

        Ok(operands
            .into_iter()
            .flatten()
            .map(|endpoint| endpoint.id)
            .collect())
    }

    fn lone_operand(&mut self, parts: Vec<Pair<Rule>>) -> DotResult<Vec<String>> {
        let mut operand = None;
        let mut attributes = None;

        for part in parts {
            match part.as_rule() {
                Rule::edge_operand => operand = part.into_inner().next(),
                Rule::attr_list => attributes = Some(parse_attr_list(part)?),
                _ => {}
            }
        }

        let operand =
            operand.ok_or_else(|| DotError::SemanticError("Empty statement".to_string()))?;
        match (operand.as_rule(), attributes) {
            (Rule::node_id, attributes) => {
                let id = self.node_stmt(operand, attributes.unwrap_or_default())?;
                Ok(vec![id])
            }
            (Rule::subgraph, None) => self.subgraph(operand),
            (Rule::subgraph, Some(_)) => Err(DotError::SemanticError(
                "Attribute list after a subgraph".to_string(),
            )),
            _ => Err(DotError::SemanticError(format!(
                "Unexpected statement: {}",
                operand.as_str()
            ))),
        }
    }

    fn edge_operand(&mut self, pair: Pair<Rule>) -> DotResult<Vec<Endpoint>> {
        let inner = pair
            .into_inner()
            .next()
            .ok_or_else(|| DotError::SemanticError("Empty edge operand".to_string()))?;

        match inner.as_rule() {
            Rule::node_id => {
                let endpoint = parse_node_id(inner)?;
                self.declare_node(&endpoint.id)?;
                Ok(vec![endpoint])
            }
            Rule::subgraph => Ok(self
                .subgraph(inner)?
                .into_iter()
                .map(|id| Endpoint { id, port: None })
                .collect()),
            _ => Err(DotError::SemanticError(format!(
                "Unexpected edge operand: {}",
                inner.as_str()
            ))),
        }
    }

    fn check_edge_op(&self, op: &str) -> DotResult<()> {
        match (op, self.graph.directed) {
            ("->", true) | ("--", false) => Ok(()),
            ("->", false) => Err(DotError::SemanticError(
                "'->' used in an undirected graph".to_string(),
            )),
            _ => Err(DotError::SemanticError(
                "'--' used in a directed graph".to_string(),
            )),
        }
    }

    /// Walk a subgraph body in its own scope, returning its distinct members
    fn subgraph(&mut self, pair: Pair<Rule>) -> DotResult<Vec<String>> {
        let inherited = self.scope()?.clone();
        self.scopes.push(inherited);

        let mut members = Vec::new();
        for inner in pair.into_inner() {
            if inner.as_rule() == Rule::stmt_list {
                members = self.walk_stmt_list(inner)?;
            }
        }

        self.scopes.pop();

        let mut seen = std::collections::HashSet::new();
        members.retain(|id| seen.insert(id.clone()));
        Ok(members)
    }

    fn declare_node(&mut self, id: &str) -> DotResult<()> {
        if !self.graph.has_node(id) {
            let defaults = self.scope()?.node_defaults.clone();
            self.graph.ensure_node(id, &defaults);
        }
        Ok(())
    }
}

fn parse_node_id(pair: Pair<Rule>) -> DotResult<Endpoint> {
    let mut id = None;
    let mut port = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::id => id = Some(parse_id(inner)?.as_str().to_string()),
            Rule::port => {
                let parts = inner
                    .into_inner()
                    .map(|part| parse_id(part).map(|value| value.as_str().to_string()))
                    .collect::<DotResult<Vec<_>>>()?;
                port = Some(parts.join(":"));
            }
            _ => {}
        }
    }

    let id = id.ok_or_else(|| DotError::SemanticError("Node reference without ID".to_string()))?;
    Ok(Endpoint { id, port })
}

fn parse_attr_list(pair: Pair<Rule>) -> DotResult<DotAttributes> {
    let mut attributes = DotAttributes::new();

    for attr in pair.into_inner() {
        if attr.as_rule() != Rule::attr {
            continue;
        }
        let mut ids = attr.into_inner();
        let key = next_id(&mut ids)?;
        // A bare attribute name switches the attribute on
        let value = match ids.next() {
            Some(value) => parse_id(value)?,
            None => DotValue::Ident("true".to_string()),
        };
        attributes.insert(key.as_str().to_string(), value);
    }

    Ok(attributes)
}

fn next_id(pairs: &mut pest::iterators::Pairs<Rule>) -> DotResult<DotValue> {
    let pair = pairs
        .next()
        .ok_or_else(|| DotError::SemanticError("Expected an ID".to_string()))?;
    parse_id(pair)
}

fn parse_id(pair: Pair<Rule>) -> DotResult<DotValue> {
    let text = pair.as_str().to_string();
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| DotError::SemanticError(format!("Malformed ID: {}", text)))?;

    let value = match inner.as_rule() {
        Rule::ident => DotValue::Ident(inner.as_str().to_string()),
        Rule::numeral => DotValue::Numeral(inner.as_str().to_string()),
        Rule::html => DotValue::Html(
            inner
                .into_inner()
                .next()
                .map(|body| body.as_str().to_string())
                .unwrap_or_default(),
        ),
        Rule::quoted_concat => {
            let mut joined = String::new();
            for quoted in inner.into_inner() {
                let raw = quoted.into_inner().next().map(|body| body.as_str()).unwrap_or("");
                joined.push_str(&unescape_quoted(raw));
            }
            DotValue::Quoted(joined)
        }
        other => {
            return Err(DotError::SemanticError(format!(
                "Unexpected ID kind {:?}: {}",
                other, text
            )))
        }
    };
    Ok(value)
}

/// Resolve `\"` and backslash-newline continuations; other escapes are kept
/// verbatim for the label renderer.
fn unescape_quoted(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some('\r') => {
                let rest = chars.as_str();
                if let Some(stripped) = rest.strip_prefix('\n') {
                    chars = stripped.chars();
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
