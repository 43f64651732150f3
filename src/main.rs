//! Flightgraph - CLI
//!
//! Retrieval over a Neo4j airline operations graph: a fixed query catalog
//! plus node-embedding training and vector similarity search.

use anyhow::Result;
use clap::{Parser, Subcommand};
use flightgraph::retriever::GraphRetriever;
use flightgraph::Config;
use serde_json::{Map, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flightgraph")]
#[command(about = "Graph retrieval over airline operational data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one retrieval intent against the graph
    Retrieve {
        /// Intent name (e.g. flights_from, flights_between, similar_nodes)
        #[arg(short, long)]
        intent: String,

        /// Entity bindings as key=value pairs (repeatable)
        #[arg(short, long = "entity", value_parser = parse_entity)]
        entities: Vec<(String, Value)>,
    },

    /// Train node embeddings and (re)create the vector indexes
    BuildEmbeddings {
        /// Training method: node2vec or graphsage
        #[arg(short, long)]
        method: String,
    },
}

/// Parse one `key=value` entity binding. Values that parse as JSON numbers
/// stay numeric (so `k=10` binds an integer); everything else is a string.
fn parse_entity(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let value = match value.parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::from(value),
    };
    Ok((key.to_string(), value))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,flightgraph=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let retriever = GraphRetriever::connect(&config).await?;

    match cli.command {
        Commands::Retrieve { intent, entities } => {
            let entities: Map<String, Value> = entities.into_iter().collect();
            // An unknown intent prints the sentinel and exits 0; only
            // malformed entities or store failures are fatal
            let result = retriever.retrieve(&intent, &entities).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Commands::BuildEmbeddings { method } => {
            let status = retriever.build_embeddings(&method).await?;
            println!("{status}");
            Ok(())
        }
    }
}
