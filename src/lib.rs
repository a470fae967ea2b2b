// ABOUTME: Main library entry point for the Liftplan training plan engine
// ABOUTME: Plan resolution, subscription status, progression evaluation and admin writes over a plan store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Liftplan
//!
//! Backend engine for coach-managed strength training plans.
//!
//! ## Features
//!
//! - **Plan resolution**: what a user trains on a date, from daily pins,
//!   subscriptions, five-week level templates and per-user overrides
//! - **Subscription status**: lazily derived `ACTIVE` / `EXPIRING_SOON` /
//!   `EXPIRED` / `CANCELED` with an append-only action ledger
//! - **Progression**: pass/fail over completed sets and a recommended next weight
//! - **Administration**: validated writes for templates, overrides, ledgers and pins
//!
//! ## Architecture
//!
//! - **Models & errors**: `liftplan-core`
//! - **Storage**: the `PlanStore` trait with a SQLite implementation
//! - **Services**: `PlanResolver`, `ProgressionService`, `PlanAdminService`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use liftplan::config::environment::ServerConfig;
//! use liftplan::database_plugins::sqlite::SqliteDatabase;
//! use liftplan::plans::PlanResolver;
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let store = Arc::new(SqliteDatabase::from_config(&config.database).await?);
//!
//!     let resolver = PlanResolver::new(store);
//!     let today = resolver.resolve_daily_session(Uuid::new_v4(), None).await?;
//!     println!("{}", serde_json::to_string_pretty(&today)?);
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Plan store abstraction and SQLite implementation
pub mod database_plugins;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Plan resolution, validation and administration
pub mod plans;

/// Progression evaluation
pub mod progression;

/// Shared domain models
pub use liftplan_core::models;

/// Plan constants
pub use liftplan_core::constants;
