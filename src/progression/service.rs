// ABOUTME: Store-backed progression service for recording completed exercises
// ABOUTME: Looks up rep targets on session templates and upserts exercise history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{apply_evaluation, evaluate_sets, validate_set_weights, ProgressionOutcome};
use crate::database_plugins::PlanStore;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use chrono::{DateTime, Utc};
use liftplan_core::models::{SetLog, TargetReps};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Records exercise completions and keeps per-exercise history current
pub struct ProgressionService<S: PlanStore> {
    store: Arc<S>,
}

impl<S: PlanStore> Clone for ProgressionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: PlanStore> ProgressionService<S> {
    /// Create a service over `store`
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Evaluate `sets` against `target_reps` and persist the result
    ///
    /// Returns `None` without writing when no set counts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when a counted set has a negative or non-finite
    /// weight, or an error when the store fails
    pub async fn evaluate_progression(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        sets: &[SetLog],
        target_reps: TargetReps,
    ) -> AppResult<Option<ProgressionOutcome>> {
        self.evaluate_progression_at(user_id, exercise_id, sets, target_reps, Utc::now())
            .await
    }

    /// Same as [`Self::evaluate_progression`] with an explicit completion time
    ///
    /// # Errors
    ///
    /// Returns an error when the store fails
    pub async fn evaluate_progression_at(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        sets: &[SetLog],
        target_reps: TargetReps,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ProgressionOutcome>> {
        validate_set_weights(sets).map_err(|e| e.with_user_id(user_id))?;

        let Some(evaluation) = evaluate_sets(sets, target_reps) else {
            debug!(
                user_id = %user_id,
                exercise_id = %exercise_id,
                "No counted sets, history left untouched"
            );
            return Ok(None);
        };

        let prior = self.store.get_exercise_history(user_id, exercise_id).await?;
        let history = apply_evaluation(
            prior.as_ref(),
            &evaluation,
            sets,
            user_id,
            exercise_id,
            now,
        );
        self.store.upsert_exercise_history(&history).await?;

        AppLogger::log_progression(
            &user_id.to_string(),
            &exercise_id.to_string(),
            history.progression_status.as_str(),
            history.recommended_next_weight,
        );
        Ok(Some(ProgressionOutcome::from(&history)))
    }

    /// Record a completed exercise from a session, using the session's rep target
    ///
    /// `exercise_id` may be the prescribed exercise or one of its alternatives.
    /// Targets come from the base session template.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the session template does not exist or
    /// does not prescribe the exercise, or an error when the store fails
    pub async fn complete_exercise(
        &self,
        user_id: Uuid,
        session_template_id: Uuid,
        exercise_id: Uuid,
        sets: &[SetLog],
    ) -> AppResult<Option<ProgressionOutcome>> {
        self.complete_exercise_at(user_id, session_template_id, exercise_id, sets, Utc::now())
            .await
    }

    /// Same as [`Self::complete_exercise`] with an explicit completion time
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the session or exercise is unknown, or
    /// an error when the store fails
    pub async fn complete_exercise_at(
        &self,
        user_id: Uuid,
        session_template_id: Uuid,
        exercise_id: Uuid,
        sets: &[SetLog],
        now: DateTime<Utc>,
    ) -> AppResult<Option<ProgressionOutcome>> {
        let session = self
            .store
            .get_session_template(session_template_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Session template {session_template_id}"))
                    .with_user_id(user_id)
            })?;

        let target_reps = session
            .item_for_exercise(exercise_id)
            .map(|item| item.target_reps)
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Exercise {exercise_id} in session template {session_template_id}"
                ))
                .with_resource_id(exercise_id.to_string())
            })?;

        self.evaluate_progression_at(user_id, exercise_id, sets, target_reps, now)
            .await
    }
}
