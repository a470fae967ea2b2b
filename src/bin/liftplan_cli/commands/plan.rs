// ABOUTME: Plan query and completion commands for liftplan-cli
// ABOUTME: Wraps the resolver and progression service and prints their JSON results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::helpers::display::print_json;
use crate::helpers::sets::parse_sets;
use anyhow::Result;
use chrono::NaiveDate;
use liftplan::database_plugins::sqlite::SqliteDatabase;
use liftplan::database_plugins::PlanStore;
use liftplan::plans::PlanResolver;
use liftplan::progression::ProgressionService;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Apply the schema
pub async fn migrate(store: &SqliteDatabase) -> Result<()> {
    store.migrate().await?;
    print_json(&json!({ "migrated": true }))
}

/// Resolve one day
pub async fn today(
    store: Arc<SqliteDatabase>,
    user_id: Uuid,
    date: Option<NaiveDate>,
    detailed: bool,
) -> Result<()> {
    let resolver = PlanResolver::new(store);
    if detailed {
        print_json(&resolver.resolve_daily_workout(user_id, date).await?)
    } else {
        print_json(&resolver.resolve_daily_session(user_id, date).await?)
    }
}

/// Resolve one week
pub async fn week(store: Arc<SqliteDatabase>, user_id: Uuid, week_number: Option<u8>) -> Result<()> {
    let resolver = PlanResolver::new(store);
    print_json(&resolver.resolve_week_plan(user_id, week_number).await?)
}

/// Record a completed exercise
pub async fn complete(
    store: Arc<SqliteDatabase>,
    user_id: Uuid,
    session_template_id: Uuid,
    exercise_id: Uuid,
    sets: &str,
) -> Result<()> {
    let sets = parse_sets(sets)?;
    let service = ProgressionService::new(store);
    let outcome = service
        .complete_exercise(user_id, session_template_id, exercise_id, &sets)
        .await?;
    print_json(&json!({ "progression": outcome }))
}
