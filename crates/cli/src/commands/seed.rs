//! Seed the catalog from a YAML file.
//!
//! The file is a list of items with the same fields `POST /api/items` accepts:
//!
//! ```yaml
//! - title: Ceramic mug
//!   des: 350 ml, dishwasher safe
//!   price: 12.5
//!   image: https://cdn.example.com/mug.png
//! ```
//!
//! Every entry is validated before the database is touched; one bad entry
//! aborts the whole run.

use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

use pocket_shop_api::db::{self, ItemRepository, PgItemRepository};
use pocket_shop_api::models::{ItemDraft, ItemInput};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] db::RepositoryError),
}

/// Parse and validate seed entries.
///
/// Logs every invalid entry (1-based) before failing.
///
/// # Errors
///
/// Returns `SeedError::Yaml` for malformed YAML (including negative prices)
/// and `SeedError::Invalid` if any entry has an empty field.
pub fn parse_items(content: &str) -> Result<Vec<ItemDraft>, SeedError> {
    let inputs: Vec<ItemInput> = serde_yaml::from_str(content)?;

    let mut drafts = Vec::with_capacity(inputs.len());
    let mut failures = 0;
    for (index, input) in inputs.into_iter().enumerate() {
        match input.validate() {
            Ok(draft) => drafts.push(draft),
            Err(message) => {
                error!(entry = index + 1, "{message}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(SeedError::Invalid(failures));
    }
    Ok(drafts)
}

/// Insert the items listed in `file_path`.
///
/// # Errors
///
/// Returns `SeedError` if the file can't be read or validated, the database
/// URL is unset, or an insert fails.
pub async fn items(file_path: &str, dry_run: bool) -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::FileNotFound(file_path.to_owned()));
    }

    info!(path = %file_path, "Loading items from file");
    let content = tokio::fs::read_to_string(path).await?;
    let drafts = parse_items(&content)?;
    info!(items = drafts.len(), "Seed file validated");

    if dry_run {
        info!("Dry run, nothing inserted");
        return Ok(());
    }

    let database_url =
        super::database_url().ok_or(SeedError::MissingEnvVar("SHOP_DATABASE_URL"))?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let repository = PgItemRepository::new(pool);
    for draft in drafts {
        let item = repository.create(draft).await?;
        info!(item_id = %item.id, title = %item.title, "Inserted item");
    }

    info!("Seeding complete!");
    Ok(())
}
