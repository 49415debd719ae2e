//! # Fixture Seeder
//!
//! Loads the JSON fixtures into a LightBnB database for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./lightbnb.db (or $LIGHTBNB_DATABASE_PATH) from ./fixtures
//! cargo run -p lightbnb-db --bin seed
//!
//! # Custom database and fixture directory
//! cargo run -p lightbnb-db --bin seed -- --db ./data/dev.db --fixtures ./fixtures
//!
//! # Show the generated search SQL
//! RUST_LOG=lightbnb_db=debug cargo run -p lightbnb-db --bin seed
//! ```
//!
//! A database that already has users is left untouched.

use std::path::PathBuf;

use clap::Parser;
use lightbnb_core::{FilterCriteria, DEFAULT_LIMIT};
use lightbnb_db::{Database, DbConfig, Fixtures};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "seed", version, about = "Load LightBnB fixture data into SQLite")]
struct Args {
    /// Database file path (overrides LIGHTBNB_DATABASE_PATH)
    #[arg(long, short = 'd')]
    db: Option<PathBuf>,

    /// Directory holding users.json, properties.json, reservations.json
    /// and property_reviews.json
    #[arg(long, short = 'f', default_value = "./fixtures")]
    fixtures: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = DbConfig::from_env()?;
    if let Some(path) = args.db {
        config.database_path = path;
    }

    info!(path = %config.database_path.display(), "Connecting to database");
    let db = Database::new(config).await?;

    // fixtures are applied in one transaction, so any user means a full seed
    let existing = db.users().count().await?;
    if existing > 0 {
        warn!(users = existing, "Database already seeded, skipping (delete the file to reseed)");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let fixtures = Fixtures::load_dir(&args.fixtures)?;
    let summary = fixtures.apply(&db).await?;
    info!(
        users = summary.users,
        properties = summary.properties,
        reservations = summary.reservations,
        reviews = summary.reviews,
        elapsed = ?start.elapsed(),
        "Seed complete"
    );

    // Verify search
    let all = db
        .properties()
        .search(&FilterCriteria::default(), DEFAULT_LIMIT)
        .await?;
    if let Some(cheapest) = all.first() {
        info!(
            count = all.len(),
            cheapest = %cheapest.property.nightly_price(),
            "Search (no filters)"
        );
    }

    let rated = FilterCriteria {
        minimum_rating: Some(4.0),
        ..Default::default()
    };
    let rated = db.properties().search(&rated, DEFAULT_LIMIT).await?;
    info!(count = rated.len(), "Search (minimum_rating=4)");

    db.close().await;
    Ok(())
}
