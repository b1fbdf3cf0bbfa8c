//! DOT language input
//!
//! Reads a Graphviz DOT document into a [`SourceGraph`]:
//! - `graph`/`digraph`, optional `strict` and graph ID
//! - node, edge and attribute statements, `ID = ID` assignments
//! - edge chains and subgraph operands
//! - quoted, HTML, numeral and identifier IDs; comments

pub mod ast;
pub mod parser;

pub use ast::{DotAttributes, DotValue, SourceEdge, SourceGraph};
pub use parser::{parse_dot, DotError, DotResult};
