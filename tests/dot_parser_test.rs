//! DOT parsing through the public API, on inputs shaped like real generator
//! output

use dotgraph::graph::PropertyValue;
use dotgraph::{parse_dot, DotError, DotValue, GraphConverter};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn quoted(s: &str) -> DotValue {
    DotValue::Quoted(s.to_string())
}

#[test]
fn test_control_flow_with_clusters() {
    let input = r#"
digraph Flow {
graph [label="Control Flow Graph for main", labelloc="t", fontsize=35, fontname="Source Code Pro"]
node [fontname="Source Code Pro"]
edge [fontname="Source Code Pro"]
subgraph cluster_entry {
    label = "entry";
    b0 [label="0x1000: push rbp\l0x1001: mov rbp, rsp\l", shape=box]
}
b1 [label="0x1004: ret\l", shape=box]
b0 -> b1 [label="", style=solid]
b0 -> b1 [label="jump", style=dashed]
}
"#;
    let source = parse_dot(input).unwrap();
    assert_eq!(source.node_count(), 2);
    assert_eq!(source.edge_count(), 2);
    assert_eq!(
        source.node_attributes("b0").unwrap().get("label"),
        Some(&quoted("0x1000: push rbp\\l0x1001: mov rbp, rsp\\l"))
    );
    // The cluster label does not replace the graph label
    assert_eq!(
        source.attributes.get("label"),
        Some(&quoted("Control Flow Graph for main"))
    );

    let graph = GraphConverter::default().build(&source).unwrap();
    let first = &graph.edges()[0];
    let second = &graph.edges()[1];
    // Explicit empty values are kept
    assert_eq!(first.get_attribute("label"), Some(&PropertyValue::String(String::new())));
    assert_eq!(
        second.get_attribute("label"),
        Some(&PropertyValue::String("jump".to_string()))
    );
}

#[test]
fn test_strict_graph_merges_repeated_edges() {
    let input = "strict graph { a -- b [color=red]; b -- a [style=bold]; a -- c }";
    let source = parse_dot(input).unwrap();
    assert_eq!(source.edge_count(), 2);

    let graph = GraphConverter::default().build(&source).unwrap();
    let merged = &graph.edges()[0];
    assert_eq!(merged.attribute_count(), 2);
    assert_eq!(graph.endpoint_names(merged.id), Some(("a", "b")));
}

#[test]
fn test_non_strict_keeps_multi_edges() {
    let source = parse_dot("graph { a -- b; b -- a; a -- b }").unwrap();
    assert_eq!(source.edge_count(), 3);

    let graph = GraphConverter::default().build(&source).unwrap();
    let (a, b) = (graph.find_vertex("a").unwrap(), graph.find_vertex("b").unwrap());
    assert_eq!(graph.edges_between(a, b).len(), 3);
}

#[test]
fn test_ports_become_edge_attributes() {
    let graph = GraphConverter::default()
        .convert_str("digraph { n0:out -> n1:in:w }")
        .unwrap();
    let edge = &graph.edges()[0];
    assert_eq!(edge.get_attribute("tailport"), Some(&PropertyValue::String("out".to_string())));
    assert_eq!(edge.get_attribute("headport"), Some(&PropertyValue::String("in:w".to_string())));
    assert_eq!(graph.vertex_count(), 2);
}

#[test]
fn test_windows_line_endings_and_bom() {
    let input = "\u{FEFF}digraph {\r\n  a -> b;\r\n  b [label=\"x\"];\r\n}\r\n";
    let source = parse_dot(input).unwrap();
    assert_eq!(source.node_ids().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(source.node_attributes("b").unwrap().get("label"), Some(&quoted("x")));
}

#[test]
fn test_subgraph_on_both_sides() {
    let source = parse_dot("digraph { {a b} -> {c d} }").unwrap();
    let pairs: Vec<(&str, &str)> = source
        .edges()
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(pairs, vec![("a", "c"), ("a", "d"), ("b", "c"), ("b", "d")]);
}

#[test]
fn test_errors() {
    assert!(matches!(parse_dot(""), Err(DotError::PestError(_))));
    assert!(matches!(parse_dot("digraph { a -> b } trailing"), Err(DotError::PestError(_))));
    assert!(matches!(parse_dot("digraph { a [label=\"open] }"), Err(DotError::PestError(_))));
    assert!(matches!(parse_dot("graph { a -> b }"), Err(DotError::SemanticError(_))));
}

#[test]
fn test_nested_edge_operands() {
    let source = parse_dot("digraph { a -> { b -> { c -> { d } } } }").unwrap();

    let mut pairs: Vec<(&str, &str)> = source
        .edges()
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    pairs.sort();
    assert_eq!(
        pairs,
        vec![("a", "b"), ("a", "c"), ("a", "d"), ("b", "c"), ("b", "d"), ("c", "d")]
    );
    assert_eq!(source.node_ids().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_nested_cluster_defaults() {
    let input = r#"
digraph {
    node [shape=box]
    subgraph cluster_a {
        node [color=red]
        a1
        subgraph cluster_b {
            node [style=filled]
            edge [weight=2]
            b1
            subgraph cluster_c { node [shape=ellipse] c1 }
            b2
            b1 -> b2
        }
        a2
    }
    top
    top -> a1
}
"#;
    let source = parse_dot(input).unwrap();
    let attr = |node: &str, key: &str| {
        source
            .node_attributes(node)
            .unwrap()
            .get(key)
            .map(|v| v.as_str().to_string())
    };
    let some = |s: &str| Some(s.to_string());

    assert_eq!(attr("c1", "shape"), some("ellipse"));
    assert_eq!(attr("c1", "color"), some("red"));
    assert_eq!(attr("c1", "style"), some("filled"));

    // Inner defaults do not leak outwards
    assert_eq!(attr("b2", "shape"), some("box"));
    assert_eq!(attr("b2", "style"), some("filled"));
    assert_eq!(attr("a2", "style"), None);
    assert_eq!(attr("a2", "color"), some("red"));
    assert_eq!(source.node_attributes("top").unwrap().len(), 1);

    assert_eq!(source.edges()[0].attributes.get("weight").map(|v| v.as_str()), Some("2"));
    assert!(source.edges()[1].attributes.is_empty());
}

#[test]
fn test_deeply_nested_subgraphs_parse_quickly() {
    let depth = 40;
    let statement = format!("digraph {{ {} a {} }}", "{".repeat(depth), "}".repeat(depth));
    let operand = format!("digraph {{ x -> {} y {} }}", "{".repeat(depth), "}".repeat(depth));

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let nested = parse_dot(&statement).map(|g| (g.node_count(), g.edge_count()));
        let chained = parse_dot(&operand).map(|g| (g.node_count(), g.edge_count()));
        let _ = tx.send((nested.ok(), chained.ok()));
    });

    let (nested, chained) = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("nested subgraphs must parse in linear time");
    assert_eq!(nested, Some((1, 0)));
    assert_eq!(chained, Some((2, 1)));
}
