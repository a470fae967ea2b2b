// ABOUTME: Structural invariant checks for templates, overrides and subscription periods
// ABOUTME: Every admin write runs these before the store sees the document
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use liftplan_core::constants::plan::{
    MAX_ALTERNATIVES, MAX_SESSIONS_PER_WEEK, MIN_SESSIONS_PER_WEEK, WEEKS_PER_PLAN,
};
use liftplan_core::errors::PlanError;
use liftplan_core::models::{
    DayKey, LevelTemplate, Placement, SessionItem, SessionTemplate, TargetReps, WeekOverride,
    WeekTemplate,
};
use std::collections::HashSet;

/// Week numbers must be exactly `{1, ..., 5}`
///
/// # Errors
///
/// Returns a `PlanError` for a wrong count, an out-of-range or a repeated week number
pub fn validate_week_numbers(
    week_numbers: impl ExactSizeIterator<Item = u8>,
) -> Result<(), PlanError> {
    let expected = usize::from(WEEKS_PER_PLAN);
    if week_numbers.len() != expected {
        return Err(PlanError::WeekCount {
            expected,
            found: week_numbers.len(),
        });
    }

    let mut seen = HashSet::with_capacity(expected);
    for week_number in week_numbers {
        validate_week_number(week_number)?;
        if !seen.insert(week_number) {
            return Err(PlanError::DuplicateWeek { week_number });
        }
    }
    Ok(())
}

/// Week number must lie in `1..=5`
///
/// # Errors
///
/// Returns `PlanError::WeekNumberOutOfRange` otherwise
pub const fn validate_week_number(week_number: u8) -> Result<(), PlanError> {
    if week_number == 0 || week_number > WEEKS_PER_PLAN {
        return Err(PlanError::WeekNumberOutOfRange {
            week_number,
            max: WEEKS_PER_PLAN,
        });
    }
    Ok(())
}

/// Shape check applied when a level template is created or replaced.
///
/// The 4–7 sessions-per-week rule is not checked here; it only applies to the
/// single-week update path.
///
/// # Errors
///
/// Returns a `PlanError` for a blank name or a malformed week list
pub fn validate_level_template(template: &LevelTemplate) -> Result<(), PlanError> {
    if template.name.trim().is_empty() {
        return Err(PlanError::EmptyName {
            field: "level template name",
        });
    }
    validate_week_numbers(template.weeks.iter().map(|w| w.week_number))
}

/// Placement count check for an edited week
///
/// # Errors
///
/// Returns `PlanError::SessionsPerWeek` when the week holds fewer than 4 or more than 7
pub const fn validate_sessions_per_week(week_number: u8, count: usize) -> Result<(), PlanError> {
    if count < MIN_SESSIONS_PER_WEEK || count > MAX_SESSIONS_PER_WEEK {
        return Err(PlanError::SessionsPerWeek {
            week_number,
            count,
            min: MIN_SESSIONS_PER_WEEK,
            max: MAX_SESSIONS_PER_WEEK,
        });
    }
    Ok(())
}

/// Check applied by the week-update operation on a level template
///
/// # Errors
///
/// Returns a `PlanError` for a bad week number or placement count
pub fn validate_week_update(week: &WeekTemplate) -> Result<(), PlanError> {
    validate_week_number(week.week_number)?;
    validate_sessions_per_week(week.week_number, week.placement_count())
}

/// Placements a user would see in a week once `week_override` is laid over `base`
#[must_use]
pub fn effective_week_placements(base: Option<&WeekTemplate>, week_override: &WeekOverride) -> usize {
    DayKey::ALL
        .iter()
        .map(|&day| {
            let base_day = base.map_or(&[] as &[Placement], |w| w.days.get(day).as_slice());
            week_override.days.get(day).resolve(base_day).len()
        })
        .sum()
}

/// Check applied by the week-update operation on a client plan override
///
/// # Errors
///
/// Returns a `PlanError` when the overlaid week falls outside 4–7 sessions
pub fn validate_override_week_update(
    base: Option<&WeekTemplate>,
    week_override: &WeekOverride,
) -> Result<(), PlanError> {
    validate_week_number(week_override.week_number)?;
    validate_sessions_per_week(
        week_override.week_number,
        effective_week_placements(base, week_override),
    )
}

/// Rep targets need `min <= max` and a non-zero bar
///
/// # Errors
///
/// Returns `PlanError::InvalidTargetReps` otherwise
pub const fn validate_target_reps(target: TargetReps) -> Result<(), PlanError> {
    let (min, max) = (target.min(), target.max());
    if max == 0 || min > max {
        return Err(PlanError::InvalidTargetReps { min, max });
    }
    Ok(())
}

/// Item checks: at most three alternatives and a sane rep target
///
/// # Errors
///
/// Returns the first `PlanError` found
pub fn validate_session_items(items: &[SessionItem]) -> Result<(), PlanError> {
    for item in items {
        if item.alternatives.len() > MAX_ALTERNATIVES {
            return Err(PlanError::TooManyAlternatives {
                exercise_id: item.exercise_id,
                count: item.alternatives.len(),
                max: MAX_ALTERNATIVES,
            });
        }
        validate_target_reps(item.target_reps)?;
    }
    Ok(())
}

/// Session template checks: non-blank title plus item checks
///
/// # Errors
///
/// Returns the first `PlanError` found
pub fn validate_session_template(template: &SessionTemplate) -> Result<(), PlanError> {
    if template.title.trim().is_empty() {
        return Err(PlanError::EmptyName {
            field: "session template title",
        });
    }
    validate_session_items(&template.items)
}

/// Subscription periods must end strictly after they start
///
/// # Errors
///
/// Returns `PlanError::InvalidPeriod` otherwise
pub fn validate_period(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Result<(), PlanError> {
    if end_at <= start_at {
        return Err(PlanError::InvalidPeriod { start_at, end_at });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftplan_core::models::DayOverride;
    use uuid::Uuid;

    fn week_with(week_number: u8, sessions: usize) -> WeekTemplate {
        let mut week = WeekTemplate::empty(week_number);
        for (index, day) in DayKey::ALL.iter().cycle().take(sessions).enumerate() {
            week.days
                .get_mut(*day)
                .push(Placement::new(Uuid::new_v4(), index as i32));
        }
        week
    }

    fn item(alternatives: usize) -> SessionItem {
        SessionItem {
            exercise_id: Uuid::new_v4(),
            alternatives: (0..alternatives).map(|_| Uuid::new_v4()).collect(),
            sets: 3,
            target_reps: TargetReps::Range { min: 8, max: 12 },
            rest_time_seconds: 90,
            recommended_starting_weight_kg: None,
            progression_rules: Vec::new(),
        }
    }

    #[test]
    fn test_week_numbers_must_be_one_through_five() {
        assert!(validate_week_numbers([1, 2, 3, 4, 5].into_iter()).is_ok());
        assert!(validate_week_numbers([5, 4, 3, 2, 1].into_iter()).is_ok());
        assert_eq!(
            validate_week_numbers([1, 2, 3, 4].into_iter()),
            Err(PlanError::WeekCount {
                expected: 5,
                found: 4
            })
        );
        assert_eq!(
            validate_week_numbers([1, 2, 3, 3, 5].into_iter()),
            Err(PlanError::DuplicateWeek { week_number: 3 })
        );
        assert!(matches!(
            validate_week_numbers([1, 2, 3, 4, 6].into_iter()),
            Err(PlanError::WeekNumberOutOfRange { week_number: 6, .. })
        ));
    }

    #[test]
    fn test_week_update_bounds() {
        assert!(validate_week_update(&week_with(1, 3)).is_err());
        assert!(validate_week_update(&week_with(1, 4)).is_ok());
        assert!(validate_week_update(&week_with(1, 7)).is_ok());
        assert!(validate_week_update(&week_with(1, 8)).is_err());
    }

    #[test]
    fn test_alternatives_limit() {
        assert!(validate_session_items(&[item(3)]).is_ok());
        assert!(matches!(
            validate_session_items(&[item(4)]),
            Err(PlanError::TooManyAlternatives { count: 4, .. })
        ));
    }

    #[test]
    fn test_override_week_counts_overlaid_days() {
        let base = week_with(2, 4);
        let mut week_override = WeekOverride::inherit_all(2);
        week_override.days.mon = DayOverride::from_placements(vec![
            Placement::new(Uuid::new_v4(), 0),
            Placement::new(Uuid::new_v4(), 1),
            Placement::new(Uuid::new_v4(), 2),
            Placement::new(Uuid::new_v4(), 3),
        ]);

        // base: one placement on mon..thu; override turns mon into four
        assert_eq!(effective_week_placements(Some(&base), &week_override), 7);
        assert!(validate_override_week_update(Some(&base), &week_override).is_ok());
    }

    #[test]
    fn test_invalid_rep_range_rejected() {
        assert!(validate_target_reps(TargetReps::Range { min: 12, max: 8 }).is_err());
        assert!(validate_target_reps(TargetReps::Fixed(0)).is_err());
        assert!(validate_target_reps(TargetReps::Fixed(5)).is_ok());
    }
}
