// ABOUTME: Seed utility loading an ingredient catalog from a JSON file
// ABOUTME: Reads [{name, measurement_unit}] records and bulk-inserts them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! # Ingredient Import Binary
//!
//! Loads the ingredient catalog from a JSON array of
//! `{"name": ..., "measurement_unit": ...}` records.
//!
//! Usage:
//! ```bash
//! cargo run --bin import-ingredients -- --file data/ingredients.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use foodgram_server::config::environment::ServerConfig;
use foodgram_server::database::Database;
use foodgram_server::logging;
use serde::Deserialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "import-ingredients")]
#[command(about = "Load the ingredient catalog from a JSON file")]
pub struct Args {
    /// Path to the JSON file
    #[arg(long, short)]
    file: String,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,
}

#[derive(Deserialize)]
struct IngredientRecord {
    name: String,
    measurement_unit: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env()?;

    let database_url = match args.database_url {
        Some(url) => url,
        None => {
            let config = ServerConfig::from_env()?;
            config.database.url.to_connection_string()
        }
    };

    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file))?;
    let records: Vec<IngredientRecord> =
        serde_json::from_str(&raw).context("Malformed ingredient JSON")?;

    let database = Database::new(&database_url).await?;
    database.migrate().await?;

    let rows: Vec<(String, String)> = records
        .into_iter()
        .map(|r| (r.name, r.measurement_unit))
        .collect();
    let inserted = database.bulk_insert_ingredients(&rows).await?;

    info!(inserted, file = %args.file, "ingredient catalog loaded");
    Ok(())
}
