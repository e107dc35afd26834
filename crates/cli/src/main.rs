//! Pocket Shop CLI - Database migrations and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! shop-cli migrate
//!
//! # Load catalog items from YAML
//! shop-cli seed items crates/cli/seeds/items.yaml
//!
//! # Validate a seed file without touching the database
//! shop-cli seed items crates/cli/seeds/items.yaml --dry-run
//! ```
//!
//! # Environment Variables
//!
//! - `SHOP_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Pocket Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert catalog items from a YAML file
    Items {
        /// Path to a YAML list of `{title, des, price, image}` entries
        file: String,

        /// Validate the file but don't insert anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Items { file, dry_run } => commands::seed::items(&file, dry_run).await?,
        },
    }
    Ok(())
}
