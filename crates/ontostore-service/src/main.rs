//! ontostore command-line binary.
//!
//! Reads `ontostore.toml` (or the path given with `--config`), connects to the
//! configured SPARQL endpoint, and runs one subcommand against it.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use ontostore_core::query::QueryResult;
use ontostore_service::{SchemaSynchronizer, ServiceConfig, TripleStoreService};
use ontostore_sparql::SparqlStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Triple-store access and ontology sync")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "ontostore.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Load ontology files, writing only what changed since the last load.
  Sync {
    /// Files to load; defaults to `schema_paths` from the config.
    files: Vec<PathBuf>,
  },
  /// Run a SPARQL query or update and print the result.
  Query { sparql: String },
  /// List the named graphs holding data.
  Graphs,
  /// Print every tracked ontology, merged, as N-Triples.
  Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let config = ServiceConfig::load(&cli.config).context("failed to read configuration")?;

  let store = SparqlStore::connect(&config.endpoint_url, config.timeout())
    .await
    .with_context(|| format!("failed to connect to {}", config.endpoint_url))?;
  let service = TripleStoreService::new(store)
    .await
    .context("failed to load the internal ontology")?;

  match cli.command {
    Command::Sync { files } => {
      let files = if files.is_empty() { config.schema_paths } else { files };
      let report = SchemaSynchronizer::new(&service)
        .load_schemas(&files)
        .await
        .context("failed to read schema records")?;
      for (path, outcome) in &report.succeeded {
        println!("{}\t{outcome:?}", path.display());
      }
      for (path, error) in &report.failed {
        println!("{}\tfailed: {error}", path.display());
      }
      if !report.is_success() {
        anyhow::bail!("{} of {} files failed to load", report.failed.len(), files.len());
      }
    }
    Command::Query { sparql } => {
      let result = service.query(&sparql).await.context("query failed")?;
      print_result(result);
    }
    Command::Graphs => {
      let graphs = service
        .store()
        .list_graphs()
        .await
        .context("failed to list graphs")?;
      for graph in graphs {
        println!("{}", graph.as_str());
      }
    }
    Command::Schema => {
      let graph = SchemaSynchronizer::new(&service)
        .get_schema_graph()
        .await
        .context("failed to read the schema graph")?;
      print!("{}", graph.to_ntriples());
    }
  }

  Ok(())
}

fn print_result(result: QueryResult) {
  match result {
    QueryResult::Empty => {}
    QueryResult::Boolean(answer) => println!("{answer}"),
    QueryResult::Graph(graph) => print!("{}", graph.to_ntriples()),
    QueryResult::Solutions(solutions) => {
      println!("{}", solutions.variables().join("\t"));
      for row in solutions.rows() {
        let cells: Vec<String> = row
          .values()
          .iter()
          .map(|v| v.as_ref().map(ToString::to_string).unwrap_or_default())
          .collect();
        println!("{}", cells.join("\t"));
      }
    }
  }
}
