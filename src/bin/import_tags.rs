// ABOUTME: Seed utility loading the tag catalog from a JSON file
// ABOUTME: Reads [{slug, name, color}] records and bulk-inserts them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! # Tag Import Binary
//!
//! Loads the tag catalog from a JSON array of
//! `{"slug": ..., "name": ..., "color": ...}` records.
//!
//! Usage:
//! ```bash
//! cargo run --bin import-tags -- --file data/tags.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use foodgram_server::config::environment::ServerConfig;
use foodgram_server::database::Database;
use foodgram_server::logging;
use serde::Deserialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "import-tags")]
#[command(about = "Load the tag catalog from a JSON file")]
pub struct Args {
    /// Path to the JSON file
    #[arg(long, short)]
    file: String,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,
}

#[derive(Deserialize)]
struct TagRecord {
    slug: String,
    name: String,
    color: String,
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
    let records: Vec<TagRecord> = serde_json::from_str(&raw).context("Malformed tag JSON")?;

    let database = Database::new(&database_url).await?;
    database.migrate().await?;

    let rows: Vec<(String, String, String)> = records
        .into_iter()
        .map(|r| (r.slug, r.name, r.color))
        .collect();
    let inserted = database.bulk_insert_tags(&rows).await?;

    info!(inserted, file = %args.file, "tag catalog loaded");
    Ok(())
}
