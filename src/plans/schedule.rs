// ABOUTME: Pure calendar arithmetic and day-list overlay used by the plan resolver
// ABOUTME: Week numbering with clamping, weekday keys, override overlay, placement pick
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use liftplan_core::constants::plan::{DAYS_PER_WEEK, WEEKS_PER_PLAN};
use liftplan_core::models::{ClientPlanOverride, DayKey, Placement, WeekTemplate};

/// Plan week containing `date` for a subscription starting at `start_at`.
///
/// Week 1 starts on the start date; dates before the start clamp to week 1 and
/// anything past day 35 stays on week 5.
#[must_use]
pub fn week_number(start_at: DateTime<Utc>, date: NaiveDate) -> u8 {
    let elapsed_days = date.signed_duration_since(start_at.date_naive()).num_days();
    let week = elapsed_days.div_euclid(DAYS_PER_WEEK) + 1;
    week.clamp(1, i64::from(WEEKS_PER_PLAN)) as u8
}

/// Day key for a calendar date
#[must_use]
pub fn day_key(date: NaiveDate) -> DayKey {
    DayKey::from_weekday(date.weekday())
}

/// Placement list for `day` after applying an active plan override.
///
/// A replaced override day wins wholesale; an inherited day, an inactive
/// override or a missing week all fall back to the template week. A missing
/// template week yields an empty list.
#[must_use]
pub fn day_placements<'a>(
    template_week: Option<&'a WeekTemplate>,
    plan_override: Option<&'a ClientPlanOverride>,
    week_number: u8,
    day: DayKey,
) -> &'a [Placement] {
    let base = template_week.map_or(&[] as &[Placement], |week| week.days.get(day).as_slice());

    plan_override
        .filter(|o| o.is_active())
        .and_then(|o| o.week(week_number))
        .map_or(base, |week| week.days.get(day).resolve(base))
}

/// Placements sorted by `order`, ties kept in array order
#[must_use]
pub fn ordered_placements(placements: &[Placement]) -> Vec<&Placement> {
    let mut ordered: Vec<&Placement> = placements.iter().collect();
    ordered.sort_by_key(|p| p.order);
    ordered
}

/// Placement performed first on a day
#[must_use]
pub fn first_placement(placements: &[Placement]) -> Option<&Placement> {
    // min_by_key returns the first of equal minima, preserving array order on ties
    placements.iter().min_by_key(|p| p.order)
}
