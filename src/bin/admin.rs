//! CLI administration tool for the geocoding cache.
//!
//! Negative results are cached without expiry, so this tool is how stale
//! entries get invalidated without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show the cached record for a location
//! cargo run --bin admin -- cache show "7th West, Oakland, CA"
//!
//! # Remove one cached location
//! cargo run --bin admin -- cache delete "7th West, Oakland, CA"
//!
//! # List cached negative results
//! cargo run --bin admin -- cache list --status not_found --limit 20
//!
//! # Remove every cached negative result
//! cargo run --bin admin -- cache purge-not-found
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use geocode_cache::domain::entities::{LocationRecord, LocationStatus};
use geocode_cache::domain::repositories::LocationRepository;
use geocode_cache::infrastructure::persistence::PgLocationRepository;
use geocode_cache::utils::connection_string::mask_connection_string;
use geocode_cache::utils::location_key::normalize_location;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing the geocoding cache.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect and invalidate cached locations
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Show cache statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Cache management subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// Show the cached record for a location
    Show {
        /// Location as a client would send it (normalized before lookup)
        location: String,
    },

    /// Remove a cached location so it is re-queried on next lookup
    Delete {
        location: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List cached locations, most recent first
    List {
        /// Only show records with this status
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,

        /// Maximum number of records to show
        #[arg(short, long, default_value_t = 50)]
        limit: i64,
    },

    /// Remove every cached not-found result
    PurgeNotFound {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Found,
    #[value(name = "not_found", alias = "not-found")]
    NotFound,
}

impl From<StatusArg> for LocationStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Found => LocationStatus::Found,
            StatusArg::NotFound => LocationStatus::NotFound,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    let repo = PgLocationRepository::new(Arc::new(pool.clone()));

    match cli.command {
        Commands::Cache { action } => handle_cache_action(action, &repo).await?,
        Commands::Stats => handle_stats(&repo).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches cache management commands.
async fn handle_cache_action(action: CacheAction, repo: &PgLocationRepository) -> Result<()> {
    match action {
        CacheAction::Show { location } => show_location(repo, &location).await,
        CacheAction::Delete { location, yes } => delete_location(repo, &location, yes).await,
        CacheAction::List { status, limit } => {
            list_locations(repo, status.map(Into::into), limit).await
        }
        CacheAction::PurgeNotFound { yes } => purge_not_found(repo, yes).await,
    }
}

fn print_record(record: &LocationRecord) {
    let status = match record.status() {
        LocationStatus::Found => "FOUND".green(),
        LocationStatus::NotFound => "NOT FOUND".red(),
    };

    println!("  Location:  {}", record.location().as_str().cyan());
    println!("  Status:    {}", status);
    if record.is_found() {
        println!("  Address:   {}", record.full_address());
        println!(
            "  Latitude:  {}",
            record.latitude().to_string().bright_white()
        );
        println!(
            "  Longitude: {}",
            record.longitude().to_string().bright_white()
        );
    }
}

async fn show_location(repo: &PgLocationRepository, location: &str) -> Result<()> {
    let key = normalize_location(location)?;

    let record = repo
        .get(&key)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read location: {}", e))?;

    match record {
        Some(record) => {
            println!("{}", "📍 Cached location".bright_blue().bold());
            println!();
            print_record(&record);
            println!();
        }
        None => {
            println!(
                "{}",
                format!("  Nothing cached for '{}'", key).yellow()
            );
        }
    }

    Ok(())
}

async fn delete_location(repo: &PgLocationRepository, location: &str, yes: bool) -> Result<()> {
    let key = normalize_location(location)?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove cached location '{}'?", key))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let existed = repo
        .delete(&key)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete location: {}", e))?;

    if existed {
        println!("{}", format!("✅ Removed '{}'", key).green().bold());
    } else {
        println!("{}", format!("  Nothing cached for '{}'", key).yellow());
    }

    Ok(())
}

/// Lists cached locations in a table.
///
/// # Output Format
///
/// ```text
/// 📋 Cached locations
///
///   Location                        Status      Lat         Lng          Updated
///   ──────────────────────────────────────────────────────────────────────────────
///   7th west, oakland, ca           FOUND       37.77493    -122.251686  2025-01-15 10:30
///   atlantis                        NOT FOUND   -           -            2025-01-16 14:20
/// ```
async fn list_locations(
    repo: &PgLocationRepository,
    status: Option<LocationStatus>,
    limit: i64,
) -> Result<()> {
    println!("{}", "📋 Cached locations".bright_blue().bold());
    println!();

    let locations = repo
        .list(status, limit.max(1))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list locations: {}", e))?;

    if locations.is_empty() {
        println!("{}", "  No cached locations".yellow());
        return Ok(());
    }

    println!(
        "  {:<32} {:<11} {:<11} {:<12} {}",
        "Location".bright_white().bold(),
        "Status".bright_white().bold(),
        "Lat".bright_white().bold(),
        "Lng".bright_white().bold(),
        "Updated".bright_white().bold()
    );
    println!("  {}", "─".repeat(86).bright_black());

    for stored in &locations {
        let record = &stored.record;
        let (status, lat, lng) = if record.is_found() {
            (
                "FOUND".green(),
                record.latitude().to_string(),
                record.longitude().to_string(),
            )
        } else {
            ("NOT FOUND".red(), "-".to_string(), "-".to_string())
        };

        println!(
            "  {:<32} {:<11} {:<11} {:<12} {}",
            truncate(record.location().as_str(), 32).cyan(),
            status,
            lat,
            lng,
            stored
                .updated_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Shown: {}",
        locations.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn purge_not_found(repo: &PgLocationRepository, yes: bool) -> Result<()> {
    let counts = repo
        .count_by_status()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count locations: {}", e))?;

    if counts.not_found == 0 {
        println!("{}", "  No cached not-found results".yellow());
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove {} cached not-found results? They will be re-queried on next lookup.",
                counts.not_found
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = repo
        .purge_not_found()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge locations: {}", e))?;

    println!(
        "{}",
        format!("✅ Removed {} not-found results", removed)
            .green()
            .bold()
    );

    Ok(())
}

/// Displays cache statistics.
async fn handle_stats(repo: &PgLocationRepository) -> Result<()> {
    println!("{}", "📊 Cache Statistics".bright_blue().bold());
    println!();

    let counts = repo
        .count_by_status()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count locations: {}", e))?;

    println!(
        "  {}      {}",
        "Found:".bright_white(),
        counts.found.to_string().green().bold()
    );
    println!(
        "  {}  {}",
        "Not found:".bright_white(),
        counts.not_found.to_string().red().bold()
    );
    println!(
        "  {}      {}",
        "Total:".bright_white(),
        counts.total().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Dispatches database operation commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            print!("Checking database connection... ");

            match sqlx::query("SELECT 1").execute(pool).await {
                Ok(_) => println!("{}", "✅ OK".green().bold()),
                Err(e) => {
                    println!("{}", "❌ FAILED".red().bold());
                    anyhow::bail!("Database error: {}", e);
                }
            }
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
