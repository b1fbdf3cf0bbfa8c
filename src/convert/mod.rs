//! DOT to graph conversion
//!
//! [`GraphConverter`] turns one DOT document into a [`Graph`]:
//! 1. parse the text into a [`SourceGraph`]
//! 2. create an empty graph with the same directedness
//! 3. add every node as a vertex, in first-mention order
//! 4. add every edge by identifier pair through the name index
//! 5. copy node attributes onto the vertex with the same name
//! 6. copy edge attributes onto the edge created for that statement, matched
//!    by position so parallel edges keep their own attributes
//! 7. write the snapshot
//!
//! [`convert_directory`] drives this over every DOT file of a directory.

pub mod batch;

pub use batch::{convert_directory, BatchReport, FileOutcome};

use crate::config::ConverterConfig;
use crate::dot::{parse_dot, DotError, DotValue, SourceGraph};
use crate::graph::{Graph, GraphError, PropertyValue};
use crate::persistence::{save_graph, SnapshotError};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Coarse classification of a conversion failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The input directory is absent or cannot be listed; ends the run
    MissingInputDirectory,
    /// The DOT file could not be read or is malformed
    ParseFailure,
    /// Building the graph or copying attributes failed
    ConversionFailure,
    /// Serializing or writing the snapshot failed
    WriteFailure,
}

/// Conversion errors
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Input folder '{}' does not exist", .0.display())]
    MissingInputDirectory(PathBuf),

    #[error("Failed to list input folder '{}': {source}", .path.display())]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create output folder '{}': {source}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] DotError),

    #[error("Conversion failed: {0}")]
    Conversion(#[from] GraphError),

    #[error("Write failed: {0}")]
    Write(#[from] SnapshotError),

    #[error("Failed to report progress: {0}")]
    Report(#[from] io::Error),
}

impl ConvertError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ConvertError::MissingInputDirectory(_) | ConvertError::ListDirectory { .. } => {
                FailureKind::MissingInputDirectory
            }
            ConvertError::Read { .. } | ConvertError::Parse(_) => FailureKind::ParseFailure,
            ConvertError::Conversion(_) => FailureKind::ConversionFailure,
            ConvertError::OutputDirectory { .. }
            | ConvertError::Write(_)
            | ConvertError::Report(_) => FailureKind::WriteFailure,
        }
    }
}

pub type ConvertResult<T> = Result<T, ConvertError>;

/// How DOT values and file names are mapped
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Store unquoted numerals as Integer/Float
    pub coerce_numerals: bool,
    /// Suffix stripped from input names
    pub input_extension: String,
    /// Suffix appended to output names
    pub output_extension: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions::from(&ConverterConfig::default())
    }
}

impl From<&ConverterConfig> for ConvertOptions {
    fn from(config: &ConverterConfig) -> Self {
        ConvertOptions {
            coerce_numerals: config.coerce_numerals,
            input_extension: config.input_extension.clone(),
            output_extension: config.output_extension.clone(),
        }
    }
}

/// Single-file DOT to graph converter
#[derive(Debug, Clone, Default)]
pub struct GraphConverter {
    options: ConvertOptions,
}

impl GraphConverter {
    pub fn new(options: ConvertOptions) -> Self {
        GraphConverter { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Build a graph from parsed DOT
    pub fn build(&self, source: &SourceGraph) -> ConvertResult<Graph> {
        let mut graph = Graph::new(source.directed);
        graph.set_name(source.name.clone());
        for (key, value) in &source.attributes {
            graph.set_attribute(key.clone(), self.property_value(value));
        }

        graph.add_vertices(source.node_ids())?;

        // Edge ids line up with source.edges() by position
        let edge_ids = graph.add_edges_by_name(
            source
                .edges()
                .iter()
                .map(|edge| (edge.source.as_str(), edge.target.as_str())),
        )?;

        for (name, attributes) in source.nodes() {
            let vertex = graph
                .find_vertex(name)
                .ok_or_else(|| GraphError::UnknownVertex(name.to_string()))?;
            for (key, value) in attributes {
                graph.set_vertex_attribute(vertex, key.clone(), self.property_value(value))?;
            }
        }

        for (edge, source_edge) in edge_ids.iter().zip(source.edges()) {
            for (key, value) in &source_edge.attributes {
                graph.set_edge_attribute(*edge, key.clone(), self.property_value(value))?;
            }
        }

        debug!(
            "Built graph with {} vertices and {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Parse and build from DOT text
    pub fn convert_str(&self, text: &str) -> ConvertResult<Graph> {
        let source = parse_dot(text)?;
        self.build(&source)
    }

    /// Convert one DOT file and write its snapshot into `output_dir`
    ///
    /// Returns the path of the written snapshot.
    pub fn convert_file(&self, input: &Path, output_dir: &Path) -> ConvertResult<PathBuf> {
        let text = std::fs::read_to_string(input).map_err(|source| ConvertError::Read {
            path: input.to_path_buf(),
            source,
        })?;

        let graph = self.convert_str(&text)?;
        let output = output_path_for(
            input,
            output_dir,
            &self.options.input_extension,
            &self.options.output_extension,
        );
        save_graph(&graph, &output)?;
        Ok(output)
    }

    fn property_value(&self, value: &DotValue) -> PropertyValue {
        match value {
            DotValue::Html(markup) => PropertyValue::Html(markup.clone()),
            DotValue::Numeral(text) if self.options.coerce_numerals => coerce_numeral(text),
            other => PropertyValue::String(other.as_str().to_string()),
        }
    }
}

fn coerce_numeral(text: &str) -> PropertyValue {
    if let Ok(integer) = text.parse::<i64>() {
        PropertyValue::Integer(integer)
    } else if let Ok(float) = text.parse::<f64>() {
        PropertyValue::Float(float)
    } else {
        PropertyValue::String(text.to_string())
    }
}

/// Output location for an input file: its base name with the trailing
/// `from_extension` replaced by `to_extension`, inside `output_dir`
pub fn output_path_for(
    input: &Path,
    output_dir: &Path,
    from_extension: &str,
    to_extension: &str,
) -> PathBuf {
    let file_name = input.file_name().unwrap_or_default();
    let mut output = match file_name.to_str() {
        Some(name) => OsString::from(name.strip_suffix(from_extension).unwrap_or(name)),
        None => strip_extension(file_name, from_extension)
            .unwrap_or(file_name)
            .to_os_string(),
    };
    output.push(to_extension);
    output_dir.join(output)
}

/// Strip a dotted extension from a non UTF-8 name, one component at a time
fn strip_extension<'a>(name: &'a OsStr, extension: &str) -> Option<&'a OsStr> {
    let components = extension.strip_prefix('.')?;
    let mut stem = Path::new(name);
    for component in components.rsplit('.') {
        if component.is_empty() || stem.extension() != Some(OsStr::new(component)) {
            return None;
        }
        stem = Path::new(stem.file_stem()?);
    }
    Some(stem.as_os_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeId;

    fn string(s: &str) -> PropertyValue {
        PropertyValue::String(s.to_string())
    }

    #[test]
    fn test_convert_scenario_a() {
        let graph = GraphConverter::default()
            .convert_str("digraph { X -> Y [weight=3]; }")
            .unwrap();

        assert!(graph.is_directed());
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.endpoint_names(EdgeId::new(0)), Some(("X", "Y")));
        assert_eq!(
            graph.edge(EdgeId::new(0)).unwrap().get_attribute("weight"),
            Some(&string("3"))
        );
    }

    #[test]
    fn test_undirected_stays_undirected() {
        let graph = GraphConverter::default().convert_str("graph { a -- b }").unwrap();
        assert!(!graph.is_directed());
    }

    #[test]
    fn test_node_attributes_copied() {
        let input = r#"
            digraph Flow {
                node [fontname="Source Code Pro"]
                b0 [label="ControlFlow: 0x1000", shape=box]
                b1 [label=<<i>loc</i>>, shape=ellipse]
                b0 -> b1 [style=dashed, color=blue]
            }
        "#;
        let graph = GraphConverter::default().convert_str(input).unwrap();

        let b0 = graph.vertex_by_name("b0").unwrap();
        assert_eq!(b0.get_attribute("label"), Some(&string("ControlFlow: 0x1000")));
        assert_eq!(b0.get_attribute("fontname"), Some(&string("Source Code Pro")));

        let b1 = graph.vertex_by_name("b1").unwrap();
        assert_eq!(
            b1.get_attribute("label"),
            Some(&PropertyValue::Html("<i>loc</i>".to_string()))
        );

        let edge = graph.edge(EdgeId::new(0)).unwrap();
        assert_eq!(edge.get_attribute("style"), Some(&string("dashed")));
        assert_eq!(edge.attribute_count(), 2);
    }

    #[test]
    fn test_parallel_edges_keep_own_attributes() {
        let input = "digraph { a -> b [color=red]; a -> b [color=blue]; }";
        let graph = GraphConverter::default().convert_str(input).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(
            graph.edge(EdgeId::new(0)).unwrap().get_attribute("color"),
            Some(&string("red"))
        );
        assert_eq!(
            graph.edge(EdgeId::new(1)).unwrap().get_attribute("color"),
            Some(&string("blue"))
        );
    }

    #[test]
    fn test_self_loop() {
        let graph = GraphConverter::default()
            .convert_str("digraph { a -> a [label=loop] }")
            .unwrap();
        assert_eq!(graph.vertex_count(), 1);
        assert!(graph.edge(EdgeId::new(0)).unwrap().is_loop());
    }

    #[test]
    fn test_graph_level_data() {
        let graph = GraphConverter::default()
            .convert_str("digraph Flow { graph [label=\"PDG\"]; a }")
            .unwrap();
        assert_eq!(graph.name(), Some("Flow"));
        assert_eq!(graph.attributes().get("label"), Some(&string("PDG")));
    }

    #[test]
    fn test_numeral_coercion() {
        let converter = GraphConverter::new(ConvertOptions {
            coerce_numerals: true,
            ..ConvertOptions::default()
        });
        let graph = converter
            .convert_str("digraph { a [w=3, f=-0.5, q=\"7\", big=99999999999999999999] }")
            .unwrap();

        let a = graph.vertex_by_name("a").unwrap();
        assert_eq!(a.get_attribute("w"), Some(&PropertyValue::Integer(3)));
        assert_eq!(a.get_attribute("f"), Some(&PropertyValue::Float(-0.5)));
        // Quoted numbers are strings
        assert_eq!(a.get_attribute("q"), Some(&string("7")));
        assert_eq!(a.get_attribute("big"), Some(&PropertyValue::Float(1e20)));
    }

    #[test]
    fn test_reserved_name_attribute_fails_conversion() {
        let err = GraphConverter::default()
            .convert_str("digraph { a [name=b] }")
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::ConversionFailure);

        // Repeating the identifier is harmless
        let graph = GraphConverter::default()
            .convert_str("digraph { a [name=a, color=red] }")
            .unwrap();
        assert_eq!(graph.vertex_by_name("a").unwrap().attribute_count(), 1);
    }

    #[test]
    fn test_parse_failure_kind() {
        let err = GraphConverter::default()
            .convert_str("digraph { a -> b ")
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::ParseFailure);
    }

    #[test]
    fn test_output_path_for() {
        let out = Path::new("/out");
        assert_eq!(
            output_path_for(Path::new("/in/a.dot"), out, ".dot", ".pkl"),
            PathBuf::from("/out/a.pkl")
        );
        // Only the trailing extension is replaced
        assert_eq!(
            output_path_for(Path::new("/in/x.dot.dot"), out, ".dot", ".pkl"),
            PathBuf::from("/out/x.dot.pkl")
        );
        assert_eq!(
            output_path_for(Path::new("/in/readme"), out, ".dot", ".pkl"),
            PathBuf::from("/out/readme.pkl")
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_output_path_for_non_utf8_name() {
        use std::os::unix::ffi::OsStrExt;

        let out = Path::new("/out");
        let input = Path::new(OsStr::from_bytes(b"/in/x\xfe.dot.dot"));
        assert_eq!(
            output_path_for(input, out, ".dot", ".pkl"),
            out.join(OsStr::from_bytes(b"x\xfe.dot.pkl"))
        );

        let input = Path::new(OsStr::from_bytes(b"/in/y\xfe.flow.gv"));
        assert_eq!(
            output_path_for(input, out, ".flow.gv", ".graph"),
            out.join(OsStr::from_bytes(b"y\xfe.graph"))
        );
        // Suffix that is not an extension is kept
        assert_eq!(
            output_path_for(input, out, "_gv", ".graph"),
            out.join(OsStr::from_bytes(b"y\xfe.flow.gv.graph"))
        );
    }
}
