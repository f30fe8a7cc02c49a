//! Oakline CLI - catalog queries and inventory reports.
//!
//! # Usage
//!
//! ```bash
//! # Featured products from the live dataset (SANITY_* env vars)
//! oak-cli featured
//!
//! # Filtered listing from a local `sanity dataset export`
//! oak-cli --dataset-file production.ndjson filter --color walnut --in-stock --sort price-ascending
//!
//! # Inventory reports
//! oak-cli low-stock --threshold 3
//! oak-cli out-of-stock
//!
//! # Print the GROQ and parameters for a query without running it
//! oak-cli groq search "oak table"
//! ```
//!
//! # Commands
//!
//! Every catalog query is a subcommand and prints its records as JSON.
//! `groq <query>` prints the rendered query instead.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::QueryCommand;

#[derive(Parser)]
#[command(name = "oak-cli")]
#[command(author, version, about = "Oakline catalog tools")]
struct Cli {
    /// Answer queries from a local NDJSON dataset export instead of the Sanity API
    #[arg(long, global = true, env = "OAKLINE_DATASET_FILE")]
    dataset_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Query(QueryCommand),

    /// Print the GROQ and parameters for a query instead of running it
    Groq {
        #[command(subcommand)]
        query: QueryCommand,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oakline_cli=info,oakline_storefront=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Query(query) => commands::execute(&query, cli.dataset_file.as_deref()).await?,
        Commands::Groq { query } => commands::print_groq(&query)?,
    }
    Ok(())
}
