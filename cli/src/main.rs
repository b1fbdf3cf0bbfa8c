//! dotgraph CLI: batch conversion and snapshot inspection

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use dotgraph::graph::{Graph, PropertyMap};
use dotgraph::{convert_directory, load_graph, BatchReport, ConverterConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dotgraph-cli", version, about = "DOT to graph snapshot converter")]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every DOT file of a directory
    Convert {
        /// Directory containing DOT files
        #[arg(long, env = "DOTGRAPH_INPUT_DIR")]
        input: PathBuf,

        /// Directory receiving snapshots
        #[arg(long, env = "DOTGRAPH_OUTPUT_DIR")]
        output: PathBuf,

        /// YAML file with further settings
        #[arg(long, env = "DOTGRAPH_CONFIG")]
        config: Option<PathBuf>,

        /// Store unquoted numerals as numbers
        #[arg(long)]
        coerce_numerals: bool,
    },
    /// Print the contents of a snapshot
    Inspect {
        /// Snapshot file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            coerce_numerals,
        } => run_convert(input, output, config, coerce_numerals, &cli.format),
        Commands::Inspect { file } => run_inspect(&file, &cli.format),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_convert(
    input: PathBuf,
    output: PathBuf,
    config_file: Option<PathBuf>,
    coerce_numerals: bool,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match config_file {
        Some(path) => ConverterConfig::from_file(path)?,
        None => ConverterConfig::default(),
    };
    config.input_dir = input;
    config.output_dir = output;
    config.coerce_numerals |= coerce_numerals;
    config.validate()?;

    match format {
        OutputFormat::Json => {
            let report = convert_directory(&config, &mut std::io::sink())?;
            println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
        }
        OutputFormat::Table => {
            let stdout = std::io::stdout();
            let report = convert_directory(&config, &mut stdout.lock())?;
            println!(
                "{} converted, {} failed",
                report.success_count(),
                report.failure_count()
            );
        }
    }

    Ok(())
}

fn report_json(report: &BatchReport) -> serde_json::Value {
    let files: Vec<serde_json::Value> = report
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(path) => serde_json::json!({
                "file": outcome.file_name,
                "output": path.display().to_string(),
            }),
            Err(err) => serde_json::json!({
                "file": outcome.file_name,
                "error": err.to_string(),
                "kind": format!("{:?}", err.kind()),
            }),
        })
        .collect();

    serde_json::json!({
        "converted": report.success_count(),
        "failed": report.failure_count(),
        "files": files,
    })
}

fn run_inspect(
    file: &Path,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let graph = load_graph(file)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&graph)?);
        }
        OutputFormat::Table => print_graph_tables(&graph),
    }

    Ok(())
}

fn print_graph_tables(graph: &Graph) {
    println!("Name:     {}", graph.name().unwrap_or("(anonymous)"));
    println!(
        "Kind:     {}",
        if graph.is_directed() { "directed" } else { "undirected" }
    );
    if !graph.attributes().is_empty() {
        println!("Graph:    {}", format_attributes(graph.attributes()));
    }
    println!();

    let mut vertices = Table::new();
    vertices.set_content_arrangement(ContentArrangement::Dynamic);
    vertices.set_header(vec!["#", "name", "attributes"]);
    for vertex in graph.vertices() {
        vertices.add_row(vec![
            vertex.id.index().to_string(),
            vertex.name.clone(),
            format_attributes(&vertex.attributes),
        ]);
    }
    println!("{}", vertices);
    println!("{} vertex(es)", graph.vertex_count());

    let arrow = if graph.is_directed() { "->" } else { "--" };
    let mut edges = Table::new();
    edges.set_content_arrangement(ContentArrangement::Dynamic);
    edges.set_header(vec!["#", "edge", "parallel", "attributes"]);
    for edge in graph.edges() {
        let (source, target) = graph.endpoint_names(edge.id).unwrap_or(("?", "?"));
        // "k/n": k-th of n edges joining the same endpoints
        let siblings = graph.edges_between(edge.source, edge.target);
        let rank = siblings.iter().position(|id| *id == edge.id).map_or(0, |p| p + 1);
        edges.add_row(vec![
            edge.id.index().to_string(),
            format!("{} {} {}", source, arrow, target),
            format!("{}/{}", rank, siblings.len()),
            format_attributes(&edge.attributes),
        ]);
    }
    println!("{}", edges);
    println!("{} edge(s)", graph.edge_count());
}

fn format_attributes(attributes: &PropertyMap) -> String {
    attributes
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}
