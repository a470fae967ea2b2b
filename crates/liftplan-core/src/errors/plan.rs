// ABOUTME: Structured invariant violations raised by plan, override and subscription writes
// ABOUTME: Converts into AppError with the INVARIANT_VIOLATION code for HTTP formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Error Types
//!
//! Raised before a write reaches the store. A structurally invalid template,
//! override or subscription is never persisted.

use super::{AppError, ErrorCode};
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Invariant violations detected while validating a plan write
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A plan must carry exactly five weeks
    #[error("plan must contain exactly {expected} weeks, found {found}")]
    WeekCount {
        /// Required number of weeks
        expected: usize,
        /// Number of weeks supplied
        found: usize,
    },
    /// Week numbers are limited to 1..=5
    #[error("week number {week_number} is outside 1..={max}")]
    WeekNumberOutOfRange {
        /// Offending week number
        week_number: u8,
        /// Highest valid week number
        max: u8,
    },
    /// Each week number may appear once
    #[error("week number {week_number} appears more than once")]
    DuplicateWeek {
        /// Repeated week number
        week_number: u8,
    },
    /// An edited week must hold between 4 and 7 placements
    #[error("week {week_number} has {count} sessions, expected between {min} and {max}")]
    SessionsPerWeek {
        /// Week being edited
        week_number: u8,
        /// Placements across all seven days
        count: usize,
        /// Lower bound
        min: usize,
        /// Upper bound
        max: usize,
    },
    /// A session item lists more alternatives than allowed
    #[error("exercise {exercise_id} lists {count} alternatives, at most {max} allowed")]
    TooManyAlternatives {
        /// Primary exercise of the item
        exercise_id: Uuid,
        /// Alternatives supplied
        count: usize,
        /// Allowed maximum
        max: usize,
    },
    /// A required display name or title is blank
    #[error("{field} must not be empty")]
    EmptyName {
        /// Field that was blank
        field: &'static str,
    },
    /// Rep ranges need `min <= max` and a non-zero upper bound
    #[error("invalid rep target {min}..{max}")]
    InvalidTargetReps {
        /// Lower bound
        min: u32,
        /// Upper bound
        max: u32,
    },
    /// Subscription periods must end after they start
    #[error("subscription period ends at {end_at} which is not after {start_at}")]
    InvalidPeriod {
        /// Period start
        start_at: DateTime<Utc>,
        /// Period end
        end_at: DateTime<Utc>,
    },
}

impl From<PlanError> for AppError {
    fn from(error: PlanError) -> Self {
        Self::new(ErrorCode::InvariantViolation, error.to_string()).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_error_maps_to_invariant_violation() {
        let error: AppError = PlanError::SessionsPerWeek {
            week_number: 2,
            count: 9,
            min: 4,
            max: 7,
        }
        .into();

        assert_eq!(error.code, ErrorCode::InvariantViolation);
        assert!(error.message.contains("week 2 has 9 sessions"));
    }
}
