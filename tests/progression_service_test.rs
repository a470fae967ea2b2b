// ABOUTME: Integration tests for recording completed exercises and progression decisions
// ABOUTME: Exercises the service against an in-memory SQLite store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::float_cmp)]

mod common;

use common::{create_test_store, item, session_template, utc};
use liftplan::database_plugins::PlanStore;
use liftplan::errors::ErrorCode;
use liftplan::models::{ProgressionStatus, SetLog, TargetReps};
use liftplan::progression::ProgressionService;
use uuid::Uuid;

fn sets(weight: f64, reps: &[u32]) -> Vec<SetLog> {
    reps.iter().map(|&r| SetLog::done(weight, r)).collect()
}

const TARGET: TargetReps = TargetReps::Range { min: 8, max: 12 };

#[tokio::test]
async fn test_first_completion_has_no_recommendation() {
    let store = create_test_store().await;
    let service = ProgressionService::new(store.clone());
    let (user_id, exercise_id) = (Uuid::new_v4(), Uuid::new_v4());

    let outcome = service
        .evaluate_progression_at(user_id, exercise_id, &sets(60.0, &[12, 12, 12]), TARGET, utc(2024, 1, 1, 10))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome.progression_status, ProgressionStatus::Eligible);
    assert!(outcome.recommended_next_weight.is_none());
    assert_eq!(outcome.total_volume, 2160.0);

    let stored = store
        .get_exercise_history(user_id, exercise_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.last_reps, vec![12, 12, 12]);
    assert_eq!(stored.last_completed_at, utc(2024, 1, 1, 10));
    assert_eq!(stored.last_sets.len(), 3);
}

#[tokio::test]
async fn test_pass_then_fail_adjusts_recommendation() {
    let store = create_test_store().await;
    let service = ProgressionService::new(store.clone());
    let (user_id, exercise_id) = (Uuid::new_v4(), Uuid::new_v4());

    service
        .evaluate_progression_at(user_id, exercise_id, &sets(60.0, &[10, 10, 10]), TARGET, utc(2024, 1, 1, 10))
        .await
        .unwrap();

    let passed = service
        .evaluate_progression_at(user_id, exercise_id, &sets(60.0, &[12, 12, 12]), TARGET, utc(2024, 1, 3, 10))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(passed.progression_status, ProgressionStatus::Eligible);
    assert_eq!(passed.recommended_next_weight, Some(62.0));

    let failed = service
        .evaluate_progression_at(user_id, exercise_id, &sets(62.0, &[12, 11, 9]), TARGET, utc(2024, 1, 5, 10))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(failed.progression_status, ProgressionStatus::Failed);
    assert_eq!(failed.recommended_next_weight, Some(62.0));
    assert_eq!(failed.last_weight, 62.0);
}

#[tokio::test]
async fn test_repeated_completion_is_idempotent_and_volume_not_accumulated() {
    let store = create_test_store().await;
    let service = ProgressionService::new(store.clone());
    let (user_id, exercise_id) = (Uuid::new_v4(), Uuid::new_v4());
    let logged = sets(50.0, &[12, 12]);
    let at = utc(2024, 2, 1, 18);

    service
        .evaluate_progression_at(user_id, exercise_id, &logged, TARGET, at)
        .await
        .unwrap();
    let first = store.get_exercise_history(user_id, exercise_id).await.unwrap();

    service
        .evaluate_progression_at(user_id, exercise_id, &logged, TARGET, at)
        .await
        .unwrap();
    service
        .evaluate_progression_at(user_id, exercise_id, &logged, TARGET, at)
        .await
        .unwrap();
    let third = store
        .get_exercise_history(user_id, exercise_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(third.total_volume, 1200.0);
    assert_eq!(third.recommended_next_weight, Some(52.0));
    assert_eq!(third.last_reps, first.unwrap().last_reps);
}

#[tokio::test]
async fn test_no_counted_sets_leaves_history_untouched() {
    let store = create_test_store().await;
    let service = ProgressionService::new(store.clone());
    let (user_id, exercise_id) = (Uuid::new_v4(), Uuid::new_v4());

    let skipped = vec![
        SetLog {
            weight: Some(60.0),
            reps_completed: Some(12),
            completed: false,
        },
        SetLog {
            weight: None,
            reps_completed: None,
            completed: true,
        },
    ];

    let outcome = service
        .evaluate_progression_at(user_id, exercise_id, &skipped, TARGET, utc(2024, 1, 1, 10))
        .await
        .unwrap();

    assert!(outcome.is_none());
    assert!(store
        .get_exercise_history(user_id, exercise_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_complete_exercise_uses_session_target() {
    let store = create_test_store().await;
    let service = ProgressionService::new(store.clone());
    let user_id = Uuid::new_v4();
    let exercise_id = Uuid::new_v4();
    let session = session_template("Push", vec![item(exercise_id, TargetReps::Fixed(5))]);
    store.upsert_session_template(&session).await.unwrap();

    // Fixed(5): five reps on every set passes
    let outcome = service
        .complete_exercise_at(user_id, session.id, exercise_id, &sets(100.0, &[5, 5, 5]), utc(2024, 1, 1, 10))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome.progression_status, ProgressionStatus::Eligible);
}

#[tokio::test]
async fn test_complete_exercise_accepts_alternative() {
    let store = create_test_store().await;
    let service = ProgressionService::new(store.clone());
    let user_id = Uuid::new_v4();
    let (prescribed, alternative) = (Uuid::new_v4(), Uuid::new_v4());

    let mut squat = item(prescribed, TargetReps::Range { min: 6, max: 8 });
    squat.alternatives = vec![alternative];
    let session = session_template("Legs", vec![squat]);
    store.upsert_session_template(&session).await.unwrap();

    let outcome = service
        .complete_exercise_at(user_id, session.id, alternative, &sets(24.0, &[8, 7]), utc(2024, 1, 1, 10))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome.progression_status, ProgressionStatus::Failed);
    // history is keyed by the exercise actually performed
    assert!(store
        .get_exercise_history(user_id, alternative)
        .await
        .unwrap()
        .is_some());
    assert!(store
        .get_exercise_history(user_id, prescribed)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_complete_exercise_unknown_session_or_exercise() {
    let store = create_test_store().await;
    let service = ProgressionService::new(store.clone());
    let user_id = Uuid::new_v4();
    let session = session_template("Pull", vec![item(Uuid::new_v4(), TARGET)]);
    store.upsert_session_template(&session).await.unwrap();

    let missing_session = service
        .complete_exercise_at(user_id, Uuid::new_v4(), Uuid::new_v4(), &sets(40.0, &[12]), utc(2024, 1, 1, 10))
        .await
        .unwrap_err();
    assert_eq!(missing_session.code, ErrorCode::ResourceNotFound);

    let missing_exercise = service
        .complete_exercise_at(user_id, session.id, Uuid::new_v4(), &sets(40.0, &[12]), utc(2024, 1, 1, 10))
        .await
        .unwrap_err();
    assert_eq!(missing_exercise.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_nan_weight_rejected_before_write() {
    let store = create_test_store().await;
    let service = ProgressionService::new(store.clone());
    let (user_id, exercise_id) = (Uuid::new_v4(), Uuid::new_v4());

    let err = service
        .evaluate_progression(user_id, exercise_id, &[SetLog::done(f64::NAN, 12)], TargetReps::Fixed(10))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(store
        .get_exercise_history(user_id, exercise_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_negative_weight_leaves_prior_history_untouched() {
    let store = create_test_store().await;
    let service = ProgressionService::new(store.clone());
    let (user_id, exercise_id) = (Uuid::new_v4(), Uuid::new_v4());

    service
        .evaluate_progression_at(user_id, exercise_id, &sets(40.0, &[10, 10]), TargetReps::Fixed(10), utc(2024, 1, 1, 10))
        .await
        .unwrap();

    let err = service
        .evaluate_progression_at(
            user_id,
            exercise_id,
            &[SetLog::done(40.0, 12), SetLog::done(-40.0, 12)],
            TargetReps::Fixed(10),
            utc(2024, 1, 3, 10),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let stored = store
        .get_exercise_history(user_id, exercise_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.last_weight, 40.0);
    assert_eq!(stored.total_volume, 800.0);
    assert_eq!(stored.last_completed_at, utc(2024, 1, 1, 10));
}
