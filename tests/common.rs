// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory plan stores, quiet logging and template/subscription fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    missing_docs,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `liftplan`

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use liftplan::constants::plan::WEEKS_PER_PLAN;
use liftplan::database_plugins::sqlite::SqliteDatabase;
use liftplan::database_plugins::PlanStore;
use liftplan::models::{
    DayKey, Difficulty, Exercise, LevelTemplate, Placement, SessionItem, SessionTemplate,
    Subscription, SubscriptionStatus, TargetReps, WeekTemplate,
};
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls verbosity; default is WARN
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Fresh in-memory store with the schema applied
pub async fn create_test_store() -> Arc<SqliteDatabase> {
    init_test_logging();
    let store = SqliteDatabase::new("sqlite::memory:").await.unwrap();
    store.migrate().await.unwrap();
    Arc::new(store)
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn item(exercise_id: Uuid, target_reps: TargetReps) -> SessionItem {
    SessionItem {
        exercise_id,
        alternatives: Vec::new(),
        sets: 3,
        target_reps,
        rest_time_seconds: 90,
        recommended_starting_weight_kg: None,
        progression_rules: Vec::new(),
    }
}

pub fn session_template(title: &str, items: Vec<SessionItem>) -> SessionTemplate {
    SessionTemplate {
        id: Uuid::new_v4(),
        title: title.to_owned(),
        difficulty: Some(Difficulty::Intermediate),
        duration_minutes: Some(45),
        items,
        updated_at: Utc::now(),
    }
}

/// Five weeks, each with the same `(day, session)` placements
pub fn level_template(name: &str, placements: &[(DayKey, Uuid)]) -> LevelTemplate {
    let now = Utc::now();
    LevelTemplate {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        is_active: true,
        weeks: (1..=WEEKS_PER_PLAN)
            .map(|week_number| week(week_number, placements))
            .collect(),
        created_at: now,
        updated_at: now,
    }
}

pub fn week(week_number: u8, placements: &[(DayKey, Uuid)]) -> WeekTemplate {
    let mut week = WeekTemplate::empty(week_number);
    for (order, (day, session_id)) in placements.iter().enumerate() {
        week.days
            .get_mut(*day)
            .push(Placement::new(*session_id, order as i32));
    }
    week
}

pub fn subscription(
    user_id: Uuid,
    level_template_id: Uuid,
    status: SubscriptionStatus,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
) -> Subscription {
    Subscription {
        id: Uuid::new_v4(),
        user_id,
        level_template_id,
        status,
        start_at,
        end_at,
        auto_renew: false,
        history: Vec::new(),
        created_at: start_at,
    }
}

pub fn exercise(name: &str) -> Exercise {
    Exercise {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        muscle_group: None,
        equipment: None,
        video_url: None,
    }
}

/// Everything a resolver test needs: two sessions, a level placing
/// `monday` on Mondays and `thursday` on Thursdays, and a running subscription
pub struct PlanFixture {
    pub store: Arc<SqliteDatabase>,
    pub user_id: Uuid,
    pub monday: SessionTemplate,
    pub thursday: SessionTemplate,
    pub level: LevelTemplate,
    pub subscription: Subscription,
}

/// Subscription runs 2024-01-01 (a Monday) through 2024-03-31
pub async fn plan_fixture() -> PlanFixture {
    let store = create_test_store().await;
    let user_id = Uuid::new_v4();

    let monday = session_template(
        "Lower Body",
        vec![item(Uuid::new_v4(), TargetReps::Range { min: 8, max: 12 })],
    );
    let thursday = session_template(
        "Upper Body",
        vec![
            item(Uuid::new_v4(), TargetReps::Fixed(10)),
            item(Uuid::new_v4(), TargetReps::Fixed(10)),
        ],
    );
    store.upsert_session_template(&monday).await.unwrap();
    store.upsert_session_template(&thursday).await.unwrap();

    let level = level_template(
        "Intermediate",
        &[(DayKey::Mon, monday.id), (DayKey::Thu, thursday.id)],
    );
    store.upsert_level_template(&level).await.unwrap();

    let subscription = subscription(
        user_id,
        level.id,
        SubscriptionStatus::Active,
        utc(2024, 1, 1, 9),
        utc(2024, 3, 31, 0),
    );
    store.upsert_subscription(&subscription).await.unwrap();

    PlanFixture {
        store,
        user_id,
        monday,
        thursday,
        level,
        subscription,
    }
}
