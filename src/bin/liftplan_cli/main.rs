// ABOUTME: Liftplan CLI - command-line access to the plan store and engine services
// ABOUTME: Migrates and seeds the database, resolves daily and weekly plans, records completions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Create tables
//! liftplan-cli migrate
//!
//! # Load demo exercises, templates and a subscribed demo user
//! liftplan-cli seed-demo
//!
//! # What does the user train today (or on a given date)
//! liftplan-cli today --user <uuid> --date 2025-03-10
//!
//! # Full week view
//! liftplan-cli week --user <uuid> --week 2
//!
//! # Record sets for an exercise of a session
//! liftplan-cli complete --user <uuid> --session <uuid> --exercise <uuid> --sets "60:12,60:12,60:11"
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use liftplan::config::environment::{DatabaseUrl, ServerConfig};
use liftplan::database_plugins::sqlite::SqliteDatabase;
use liftplan::logging::LoggingConfig;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "liftplan-cli",
    about = "Liftplan training plan CLI",
    long_about = "Command-line tool for seeding and querying the Liftplan plan store."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Create tables and indexes
    Migrate,

    /// Insert demo exercises, templates, a subscription and an override
    SeedDemo,

    /// Resolve the session for a day
    Today {
        /// User ID
        #[arg(long)]
        user: Uuid,

        /// Calendar date (defaults to today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Include exercise details
        #[arg(long)]
        detailed: bool,
    },

    /// Resolve a full plan week
    Week {
        /// User ID
        #[arg(long)]
        user: Uuid,

        /// Week number 1-5 (defaults to the current week)
        #[arg(long)]
        week: Option<u8>,
    },

    /// Record completed sets for one exercise of a session
    Complete {
        /// User ID
        #[arg(long)]
        user: Uuid,

        /// Session template ID
        #[arg(long)]
        session: Uuid,

        /// Exercise ID (prescribed or alternative)
        #[arg(long)]
        exercise: Uuid,

        /// Completed sets as "weight:reps" pairs, comma-separated
        #[arg(long)]
        sets: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = &cli.database_url {
        config.database.url = DatabaseUrl::parse_url(url)?;
        config.validate()?;
    }

    let mut logging = LoggingConfig::for_server(&config);
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;
    info!("{}", config.summary());

    let store = Arc::new(SqliteDatabase::from_config(&config.database).await?);

    match cli.command {
        Command::Migrate => commands::plan::migrate(&store).await?,
        Command::SeedDemo => commands::seed::seed_demo(Arc::clone(&store)).await?,
        Command::Today {
            user,
            date,
            detailed,
        } => commands::plan::today(Arc::clone(&store), user, date, detailed).await?,
        Command::Week { user, week } => {
            commands::plan::week(Arc::clone(&store), user, week).await?;
        }
        Command::Complete {
            user,
            session,
            exercise,
            sets,
        } => commands::plan::complete(Arc::clone(&store), user, session, exercise, &sets).await?,
    }

    store.pool().close().await;
    Ok(())
}
