mod compare;
mod search;

use clap::{Parser, Subcommand};
use metriks_pricing::DesiredItem;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "metriks")]
#[command(about = "Search the pharmacy catalog and compare basket prices across retailers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the catalog, loading one or more pages
    Search {
        /// Text to search for (at least 2 characters)
        text: String,
        /// Bias results toward the configured home location
        #[arg(long)]
        nearby: bool,
        /// Number of pages to load before printing
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    /// Price a basket at every configured retailer
    Compare {
        /// Item to buy, as ID or ID:QTY (repeatable)
        #[arg(long = "item", required = true)]
        items: Vec<DesiredItem>,
        /// Only compare these retailers (repeatable; defaults to all)
        #[arg(long = "retailer")]
        retailers: Vec<String>,
        /// Let retailers missing some items compete
        #[arg(long)]
        allow_partial: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("metriks: run `metriks search <text>` or `metriks compare --item <ID:QTY>`");
        return Ok(());
    };

    let config = metriks_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Search {
            text,
            nearby,
            pages,
        } => search::run_search(&config, &text, nearby, pages).await,
        Commands::Compare {
            items,
            retailers,
            allow_partial,
        } => compare::run_compare(&config, &items, &retailers, allow_partial).await,
    }
}
