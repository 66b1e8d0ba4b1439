// ABOUTME: Production server binary: loads configuration, migrates, serves HTTP
// ABOUTME: Falls back to a generated JWT secret when none is configured
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Project

//! # Foodgram API Server Binary
//!
//! Starts the recipe-sharing REST API with bearer-token authentication and
//! SQLite storage.

use anyhow::Result;
use clap::Parser;
use foodgram_server::auth::{generate_jwt_secret, AuthManager};
use foodgram_server::config::environment::ServerConfig;
use foodgram_server::database::Database;
use foodgram_server::logging;
use foodgram_server::server::{self, ServerResources};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram - recipe sharing REST API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Foodgram API server");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url.to_connection_string()).await?;
    database.migrate().await?;
    info!("Database ready");

    // Tokens signed with an ephemeral secret do not survive a restart
    let jwt_secret = match &config.auth.jwt_secret {
        Some(secret) => secret.clone().into_bytes(),
        None => {
            warn!("JWT_SECRET not set, generating an ephemeral secret");
            generate_jwt_secret().to_vec()
        }
    };
    let auth_manager = AuthManager::new(jwt_secret, config.auth.jwt_expiry_hours);

    let resources = Arc::new(ServerResources::new(database, auth_manager, config));
    server::serve(resources).await
}
