// ABOUTME: Exercise history records folded from completed sets by the progression evaluator
// ABOUTME: Set logs, progression status, and the per-user per-exercise history document
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded set from a workout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLog {
    /// Load in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Reps performed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps_completed: Option<u32>,
    /// Whether the athlete marked the set done
    #[serde(default)]
    pub completed: bool,
}

impl SetLog {
    /// Completed set with weight and reps recorded
    #[must_use]
    pub const fn done(weight: f64, reps_completed: u32) -> Self {
        Self {
            weight: Some(weight),
            reps_completed: Some(reps_completed),
            completed: true,
        }
    }

    /// Weight and reps of a set that counts toward progression
    #[must_use]
    pub const fn counted(&self) -> Option<(f64, u32)> {
        match (self.completed, self.weight, self.reps_completed) {
            (true, Some(weight), Some(reps)) => Some((weight, reps)),
            _ => None,
        }
    }
}

/// Progression state of an exercise for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionStatus {
    /// No decision yet
    #[default]
    Stable,
    /// Every set hit the rep target
    Eligible,
    /// At least one set fell short
    Failed,
}

impl ProgressionStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Eligible => "eligible",
            Self::Failed => "failed",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "eligible" => Self::Eligible,
            "failed" => Self::Failed,
            _ => Self::Stable,
        }
    }
}

/// Last completion of an exercise by a user (unique per user and exercise)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseHistory {
    /// Athlete
    pub user_id: Uuid,
    /// Exercise performed
    pub exercise_id: Uuid,
    /// Weight of the last counted set
    pub last_weight: f64,
    /// Reps per counted set
    pub last_reps: Vec<u32>,
    /// Full set log of the last completion
    pub last_sets: Vec<SetLog>,
    /// When the exercise was last completed
    pub last_completed_at: DateTime<Utc>,
    /// Weight suggested for next time; absent after the first completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_next_weight: Option<f64>,
    /// Outcome of the last evaluation
    pub progression_status: ProgressionStatus,
    /// Sum of weight x reps over counted sets of the last completion
    pub total_volume: f64,
}
