// ABOUTME: Per-user plan and session overrides layered on top of level/session templates
// ABOUTME: Whole-day replacement modelled as an Inherited/Replaced tagged union per day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::template::{DayMap, Placement, SessionItem};
use crate::constants::plan::WEEKS_PER_PLAN;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Day entry of a week override.
///
/// On the wire a day is a plain placement list; an empty list deserializes to
/// `Inherited`, so "empty means inherit" is a type-level branch here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Placement>", into = "Vec<Placement>")]
pub enum DayOverride {
    /// Use the base template's day unchanged
    #[default]
    Inherited,
    /// Replace the base template's day wholesale (never empty)
    Replaced(Vec<Placement>),
}

impl DayOverride {
    /// Build from a placement list, treating an empty list as `Inherited`
    #[must_use]
    pub fn from_placements(placements: Vec<Placement>) -> Self {
        if placements.is_empty() {
            Self::Inherited
        } else {
            Self::Replaced(placements)
        }
    }

    /// Placement list effective for this day given the base template's list
    #[must_use]
    pub fn resolve<'a>(&'a self, base: &'a [Placement]) -> &'a [Placement] {
        match self {
            Self::Inherited => base,
            Self::Replaced(placements) => placements,
        }
    }

    /// Whether this day replaces the base day
    #[must_use]
    pub const fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced(_))
    }
}

impl From<Vec<Placement>> for DayOverride {
    fn from(placements: Vec<Placement>) -> Self {
        Self::from_placements(placements)
    }
}

impl From<DayOverride> for Vec<Placement> {
    fn from(day: DayOverride) -> Self {
        match day {
            DayOverride::Inherited => Self::new(),
            DayOverride::Replaced(placements) => placements,
        }
    }
}

/// One week of a client plan override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekOverride {
    /// Week number, 1..=5
    pub week_number: u8,
    /// Per-day override entries
    #[serde(default)]
    pub days: DayMap<DayOverride>,
}

impl WeekOverride {
    /// Week override that inherits every day
    #[must_use]
    pub fn inherit_all(week_number: u8) -> Self {
        Self {
            week_number,
            days: DayMap::default(),
        }
    }
}

/// Whether a client plan override participates in resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideStatus {
    /// Applied on top of the base template
    #[default]
    Active,
    /// Stored but ignored
    Inactive,
}

impl OverrideStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            _ => Self::Inactive,
        }
    }
}

/// Per-user week/day substitutions on top of a level template (one per user)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPlanOverride {
    /// User the override belongs to
    pub user_id: Uuid,
    /// Level template the override was written against
    pub base_level_template_id: Uuid,
    /// Exactly five weeks, numbered 1..=5
    pub overrides_by_week: Vec<WeekOverride>,
    /// Active or inactive
    #[serde(default)]
    pub status: OverrideStatus,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl ClientPlanOverride {
    /// Override with five all-inherit weeks
    #[must_use]
    pub fn inherit_all(user_id: Uuid, base_level_template_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            base_level_template_id,
            overrides_by_week: (1..=WEEKS_PER_PLAN)
                .map(WeekOverride::inherit_all)
                .collect(),
            status: OverrideStatus::Active,
            updated_at: now,
        }
    }

    /// Whether resolution should apply this override
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == OverrideStatus::Active
    }

    /// Find the week override with the given number
    #[must_use]
    pub fn week(&self, week_number: u8) -> Option<&WeekOverride> {
        self.overrides_by_week
            .iter()
            .find(|w| w.week_number == week_number)
    }
}

/// Per-user substitution of a session template's items.
///
/// Written by coaches but not consulted when resolving a user's session;
/// resolved sessions always carry the base template's items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOverride {
    /// User the override belongs to
    pub user_id: Uuid,
    /// Session template being substituted
    pub session_template_id: Uuid,
    /// Replacement items
    pub items: Vec<SessionItem>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_day_deserializes_as_inherited() {
        let days: DayMap<DayOverride> = serde_json::from_str(r#"{"mon": [], "tue": []}"#).unwrap();
        assert_eq!(days.mon, DayOverride::Inherited);
        assert_eq!(days.sun, DayOverride::Inherited);
    }

    #[test]
    fn test_replaced_day_wins_over_base() {
        let base = vec![Placement::new(Uuid::new_v4(), 0)];
        let replacement = Placement::new(Uuid::new_v4(), 0);
        let day = DayOverride::from_placements(vec![replacement.clone()]);

        assert_eq!(day.resolve(&base), &[replacement]);
        assert_eq!(DayOverride::Inherited.resolve(&base), base.as_slice());
    }

    #[test]
    fn test_inherited_serializes_as_empty_list() {
        let json = serde_json::to_value(DayOverride::Inherited).unwrap();
        assert_eq!(json, serde_json::json!([]));
    }
}
