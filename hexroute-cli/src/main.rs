//! HEXROUTE CLI - Command-line interface
//!
//! Commands:
//! - catalog: Build and inspect the affinity pattern catalog
//! - route: Populate a map and route units across it

mod catalog_cmd;
mod route_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexroute")]
#[command(about = "Affinity-constrained multi-turn routing on hex grids")]
struct Cli {
    /// Random seed for catalog rotations and map population
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the pattern catalog and report its contents
    Catalog(catalog_cmd::CatalogArgs),
    /// Route units across a randomly populated map
    Route(route_cmd::RouteArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG overrides)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog(args) => catalog_cmd::run(args, cli.seed),
        Commands::Route(args) => route_cmd::run(args, cli.seed),
    }
}
