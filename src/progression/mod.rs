// ABOUTME: Strength progression evaluator folding completed sets into per-exercise history
// ABOUTME: Pass when every counted set reaches the rep ceiling; next weight is +2 kg on a pass
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Progression Evaluation
//!
//! Only sets that are marked completed and carry both a weight and a rep count
//! are counted. A session passes when every counted set reached the upper end
//! of the rep target.
//!
//! ```text
//! first completion:   status = eligible | failed, no recommendation
//! later completions:  pass -> eligible, next = last_weight + 2.0
//!                     fail -> failed,   next = last_weight
//! ```
//!
//! Counted sets must carry a finite, non-negative weight; anything else is
//! rejected before the store is touched.
//!
//! Volume is recomputed from the submitted sets on every write and never
//! accumulated, so replaying the same sets leaves the record unchanged.
//! Declared `ProgressionRule`s on session items are not consulted.

/// Store-backed progression service
pub mod service;

pub use service::ProgressionService;

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use liftplan_core::constants::progression::WEIGHT_STEP_KG;
use liftplan_core::models::{ExerciseHistory, ProgressionStatus, SetLog, TargetReps};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Pass/fail verdict over the counted sets of one completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetEvaluation {
    /// Every counted set reached the rep ceiling
    pub all_passed: bool,
    /// Weight of the last counted set in submission order
    pub last_weight: f64,
    /// Reps of each counted set
    pub last_reps: Vec<u32>,
    /// Sum of weight x reps over counted sets
    pub total_volume: f64,
}

/// Outcome returned to the caller after a history write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionOutcome {
    /// Stored progression status
    pub progression_status: ProgressionStatus,
    /// Weight of the last counted set
    pub last_weight: f64,
    /// Reps of each counted set
    pub last_reps: Vec<u32>,
    /// Suggested load for next time
    pub recommended_next_weight: Option<f64>,
    /// Volume of this completion
    pub total_volume: f64,
}

impl From<&ExerciseHistory> for ProgressionOutcome {
    fn from(history: &ExerciseHistory) -> Self {
        Self {
            progression_status: history.progression_status,
            last_weight: history.last_weight,
            last_reps: history.last_reps.clone(),
            recommended_next_weight: history.recommended_next_weight,
            total_volume: history.total_volume,
        }
    }
}

/// Reject counted sets whose weight is not a usable load
///
/// # Errors
///
/// Returns `InvalidInput` naming the first offending set
pub fn validate_set_weights(sets: &[SetLog]) -> AppResult<()> {
    for (index, set) in sets.iter().enumerate() {
        let Some((weight, _)) = set.counted() else {
            continue;
        };
        if !weight.is_finite() || weight < 0.0 {
            return Err(AppError::invalid_input(format!(
                "Set {index} has weight {weight}; expected a finite load of 0 kg or more"
            ))
            .with_details(json!({ "set_index": index })));
        }
    }
    Ok(())
}

/// Evaluate a completion against its rep target
///
/// Returns `None` when no set counts, in which case nothing should be written.
#[must_use]
pub fn evaluate_sets(sets: &[SetLog], target_reps: TargetReps) -> Option<SetEvaluation> {
    let counted: Vec<(f64, u32)> = sets.iter().filter_map(SetLog::counted).collect();
    let &(last_weight, _) = counted.last()?;

    let bar = target_reps.max();
    Some(SetEvaluation {
        all_passed: counted.iter().all(|&(_, reps)| reps >= bar),
        last_weight,
        last_reps: counted.iter().map(|&(_, reps)| reps).collect(),
        total_volume: counted
            .iter()
            .map(|&(weight, reps)| weight * f64::from(reps))
            .sum(),
    })
}

/// Fold an evaluation into the user's history record for the exercise
///
/// `prior` is the stored record, if any. The returned record replaces it.
#[must_use]
pub fn apply_evaluation(
    prior: Option<&ExerciseHistory>,
    evaluation: &SetEvaluation,
    sets: &[SetLog],
    user_id: Uuid,
    exercise_id: Uuid,
    now: DateTime<Utc>,
) -> ExerciseHistory {
    let progression_status = if evaluation.all_passed {
        ProgressionStatus::Eligible
    } else {
        ProgressionStatus::Failed
    };

    let recommended_next_weight = prior.map(|_| {
        if evaluation.all_passed {
            evaluation.last_weight + WEIGHT_STEP_KG
        } else {
            evaluation.last_weight
        }
    });

    ExerciseHistory {
        user_id,
        exercise_id,
        last_weight: evaluation.last_weight,
        last_reps: evaluation.last_reps.clone(),
        last_sets: sets.to_vec(),
        last_completed_at: now,
        recommended_next_weight,
        progression_status,
        total_volume: evaluation.total_volume,
    }
}
