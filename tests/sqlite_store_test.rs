// ABOUTME: Integration tests for the SQLite plan store
// ABOUTME: Document round trips, batch lookups, ledger appends, day-bounded pins and file databases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::float_cmp)]

mod common;

use common::{
    create_test_store, date, exercise, item, level_template, session_template, subscription, utc,
};
use liftplan::config::environment::{DatabaseConfig, DatabaseUrl};
use liftplan::database_plugins::sqlite::SqliteDatabase;
use liftplan::database_plugins::PlanStore;
use liftplan::errors::ErrorCode;
use liftplan::models::{
    ClientPlanOverride, DailyProgram, DayKey, DayOverride, ExerciseHistory, HistoryAction,
    HistoryEntry, Placement, ProgressionStatus, SetLog, SubscriptionStatus, TargetReps,
};
use uuid::Uuid;

#[tokio::test]
async fn test_migrate_is_repeatable() {
    let store = create_test_store().await;
    store.migrate().await.unwrap();
    store.migrate().await.unwrap();
}

#[tokio::test]
async fn test_level_template_round_trip_and_name_lookup() {
    let store = create_test_store().await;
    let mut level = level_template("Novice", &[(DayKey::Tue, Uuid::new_v4())]);
    level.created_at = utc(2024, 5, 1, 8);
    level.updated_at = utc(2024, 5, 2, 8);
    store.upsert_level_template(&level).await.unwrap();

    let by_id = store.get_level_template(level.id).await.unwrap().unwrap();
    assert_eq!(by_id, level);

    let by_name = store
        .get_level_template_by_name("Novice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id, level.id);
    assert!(store
        .get_level_template_by_name("Elite")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_level_template_name_is_unique() {
    let store = create_test_store().await;
    store
        .upsert_level_template(&level_template("Shared", &[]))
        .await
        .unwrap();

    let err = store
        .upsert_level_template(&level_template("Shared", &[]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
}

#[tokio::test]
async fn test_session_template_batch_get_skips_unknown_ids() {
    let store = create_test_store().await;
    let mut push = session_template("Push", vec![item(Uuid::new_v4(), TargetReps::Fixed(8))]);
    push.updated_at = utc(2024, 5, 1, 8);
    push.difficulty = None;
    let mut pull = session_template("Pull", Vec::new());
    pull.updated_at = utc(2024, 5, 1, 9);
    store.upsert_session_template(&push).await.unwrap();
    store.upsert_session_template(&pull).await.unwrap();

    let found = store
        .get_session_templates(&[push.id, Uuid::new_v4(), pull.id])
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.contains(&push));
    assert!(found.contains(&pull));

    assert!(store.get_session_templates(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_exercise_batch_get() {
    let store = create_test_store().await;
    let mut press = exercise("Overhead Press");
    press.muscle_group = Some("shoulders".to_owned());
    press.video_url = Some("https://videos.example/press".to_owned());
    store.upsert_exercise(&press).await.unwrap();

    let found = store
        .get_exercises(&[press.id, Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(found, vec![press]);
}

#[tokio::test]
async fn test_plan_override_round_trip_keeps_inherited_days() {
    let store = create_test_store().await;
    let user_id = Uuid::new_v4();
    let mut plan_override = ClientPlanOverride::inherit_all(user_id, Uuid::new_v4(), utc(2024, 5, 1, 8));
    plan_override.overrides_by_week[3].days.fri =
        DayOverride::from_placements(vec![Placement::new(Uuid::new_v4(), 2)]);
    store.upsert_plan_override(&plan_override).await.unwrap();

    let stored = store.get_plan_override(user_id).await.unwrap().unwrap();
    assert_eq!(stored, plan_override);
    assert!(!stored.overrides_by_week[3].days.thu.is_replaced());
    assert!(store
        .get_plan_override(Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_subscription_upsert_preserves_history() {
    let store = create_test_store().await;
    let user_id = Uuid::new_v4();
    let mut sub = subscription(
        user_id,
        Uuid::new_v4(),
        SubscriptionStatus::Active,
        utc(2024, 1, 1, 0),
        utc(2024, 2, 5, 0),
    );
    store.upsert_subscription(&sub).await.unwrap();

    let entry = HistoryEntry {
        action: HistoryAction::Assign,
        from_level_template_id: None,
        to_level_template_id: Some(sub.level_template_id),
        date: utc(2024, 1, 1, 0),
        admin_id: None,
        note: Some("first".to_owned()),
    };
    store.append_subscription_history(sub.id, &entry).await.unwrap();

    // A later document write carries no history and must not wipe the ledger
    sub.status = SubscriptionStatus::Canceled;
    store.upsert_subscription(&sub).await.unwrap();

    let stored = store.get_subscription(sub.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SubscriptionStatus::Canceled);
    assert_eq!(stored.history, vec![entry]);

    let listed = store.list_subscriptions(user_id).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_history_append_to_unknown_subscription() {
    let store = create_test_store().await;
    let entry = HistoryEntry {
        action: HistoryAction::Renew,
        from_level_template_id: None,
        to_level_template_id: None,
        date: utc(2024, 1, 1, 0),
        admin_id: None,
        note: None,
    };

    let err = store
        .append_subscription_history(Uuid::new_v4(), &entry)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_daily_program_matches_whole_day() {
    let store = create_test_store().await;
    let user_id = Uuid::new_v4();
    let program = DailyProgram {
        id: Uuid::new_v4(),
        user_id,
        date: utc(2024, 6, 10, 23),
        week_number: Some(2),
        session_template_id: Some(Uuid::new_v4()),
        legacy_session_id: None,
        calorie_target: Some(2500),
        completed: false,
    };
    store.upsert_daily_program(&program).await.unwrap();

    let found = store
        .get_daily_program(user_id, date(2024, 6, 10))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, program);

    assert!(store
        .get_daily_program(user_id, date(2024, 6, 11))
        .await
        .unwrap()
        .is_none());
    assert!(store
        .get_daily_program(Uuid::new_v4(), date(2024, 6, 10))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_daily_program_one_per_user_and_day() {
    let store = create_test_store().await;
    let user_id = Uuid::new_v4();
    let morning = DailyProgram {
        id: Uuid::new_v4(),
        user_id,
        date: utc(2024, 6, 10, 6),
        week_number: None,
        session_template_id: Some(Uuid::new_v4()),
        legacy_session_id: None,
        calorie_target: None,
        completed: false,
    };
    let evening = DailyProgram {
        id: Uuid::new_v4(),
        date: utc(2024, 6, 10, 20),
        session_template_id: None,
        ..morning.clone()
    };

    store.upsert_daily_program(&morning).await.unwrap();
    let stored = store.upsert_daily_program(&evening).await.unwrap();
    assert!(stored.session_template_id.is_none());

    assert!(store
        .delete_daily_program(user_id, date(2024, 6, 10))
        .await
        .unwrap());
    assert!(store
        .get_daily_program(user_id, date(2024, 6, 10))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_exercise_history_overwrite() {
    let store = create_test_store().await;
    let (user_id, exercise_id) = (Uuid::new_v4(), Uuid::new_v4());
    let mut history = ExerciseHistory {
        user_id,
        exercise_id,
        last_weight: 80.0,
        last_reps: vec![5, 5, 4],
        last_sets: vec![SetLog::done(80.0, 5), SetLog::done(80.0, 5), SetLog::done(80.0, 4)],
        last_completed_at: utc(2024, 6, 1, 18),
        recommended_next_weight: None,
        progression_status: ProgressionStatus::Failed,
        total_volume: 1120.0,
    };
    store.upsert_exercise_history(&history).await.unwrap();
    assert_eq!(
        store
            .get_exercise_history(user_id, exercise_id)
            .await
            .unwrap()
            .unwrap(),
        history
    );

    history.last_reps = vec![5, 5, 5];
    history.recommended_next_weight = Some(82.0);
    history.progression_status = ProgressionStatus::Eligible;
    store.upsert_exercise_history(&history).await.unwrap();

    let stored = store
        .get_exercise_history(user_id, exercise_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.recommended_next_weight, Some(82.0));
    assert_eq!(stored.progression_status, ProgressionStatus::Eligible);
}

#[tokio::test]
async fn test_file_database_persists_across_connections() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        url: DatabaseUrl::SQLite {
            path: dir.path().join("plans.db"),
        },
        auto_migrate: true,
    };
    let press = exercise("Push Press");

    {
        let store = SqliteDatabase::from_config(&config).await.unwrap();
        store.upsert_exercise(&press).await.unwrap();
        store.pool().close().await;
    }

    let reopened = SqliteDatabase::from_config(&config).await.unwrap();
    assert_eq!(reopened.get_exercises(&[press.id]).await.unwrap(), vec![press]);
}
