//! Catalog command - build the pattern catalog and print it

use anyhow::{Context, Result};
use clap::Args;
use rand_chacha::ChaCha8Rng;

use hexroute_core::{CatalogSpec, PatternCatalog};

use crate::route_cmd::create_rng;

#[derive(Args)]
pub struct CatalogArgs {
    /// Number of instance keys to list (text output)
    #[arg(long, default_value = "10")]
    pub show: usize,

    /// Output the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

/// Summary of a built catalog
#[derive(Debug, serde::Serialize)]
struct CatalogSummary {
    shape_classes: usize,
    color_classes: usize,
    fill_classes: usize,
    instances: usize,
    keys: Vec<String>,
}

pub fn run(args: CatalogArgs, seed: Option<u64>) -> Result<()> {
    let mut rng: ChaCha8Rng = create_rng(seed);
    let catalog = PatternCatalog::build(&CatalogSpec::default(), &mut rng)
        .context("Failed to build pattern catalog")?;

    tracing::info!("Built catalog with {} instances", catalog.len());

    let summary = summarize(&catalog);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_text_summary(&summary, args.show);
    }

    Ok(())
}

fn summarize(catalog: &PatternCatalog) -> CatalogSummary {
    CatalogSummary {
        shape_classes: catalog.shape_classes().len(),
        color_classes: catalog.color_classes().len(),
        fill_classes: catalog.fill_classes().len(),
        instances: catalog.len(),
        keys: catalog.entries().iter().map(|p| p.key()).collect(),
    }
}

fn print_text_summary(summary: &CatalogSummary, show: usize) {
    println!("\n=== Pattern Catalog ===");
    println!("Shape classes: {}", summary.shape_classes);
    println!("Color classes: {}", summary.color_classes);
    println!("Fill classes:  {}", summary.fill_classes);
    println!("Instances:     {}", summary.instances);

    if show > 0 {
        println!("\nFirst {} keys:", show.min(summary.keys.len()));
        for key in summary.keys.iter().take(show) {
            println!("  {}", key);
        }
    }
}
