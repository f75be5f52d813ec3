//! # Seed Data Initializer
//!
//! Writes the seed catalog into a fresh store database.
//!
//! ## Usage
//! ```bash
//! # Initialize the default database file
//! cargo run -p kasir-store --bin seed
//!
//! # Specify database path
//! cargo run -p kasir-store --bin seed -- --db ./data/kasir.db
//!
//! # Overwrite an existing snapshot
//! cargo run -p kasir-store --bin seed -- --force
//! ```
//!
//! The seed catalog is the six-item menu the till starts from on first
//! run (`AppState::seed`). Existing snapshots are left alone unless
//! `--force` is given.

use std::env;

use kasir_core::AppState;
use kasir_store::{SqliteStore, Store, StoreConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kasir.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => {
                force = true;
            }
            "--help" | "-h" => {
                println!("Kasir POS Seed Data Initializer");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kasir.db)");
                println!("  -f, --force        Overwrite an existing snapshot");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kasir POS Seed Data Initializer");
    println!("==================================");
    println!("Database: {}", db_path);
    println!();

    let store = SqliteStore::connect(StoreConfig::new(&db_path)).await?;
    println!("✓ Connected to database");

    if store.load().await?.is_some() && !force {
        println!("⚠ Database already has a snapshot");
        println!("  Re-run with --force to overwrite it.");
        return Ok(());
    }

    let state = AppState::seed();
    store.save(&state).await?;

    println!("✓ Seeded {} menu items", state.menu.len());
    for item in &state.menu {
        println!("    {} - {} ({}, stock {})", item.id, item.name, item.price, item.stock);
    }

    Ok(())
}
