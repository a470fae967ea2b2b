// ABOUTME: Level and session template models for the five-week base training plans
// ABOUTME: Day keys, day maps, placements, session items, rep targets and progression rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Day slot within a plan week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKey {
    /// Monday
    Mon,
    /// Tuesday
    Tue,
    /// Wednesday
    Wed,
    /// Thursday
    Thu,
    /// Friday
    Fri,
    /// Saturday
    Sat,
    /// Sunday
    Sun,
}

impl DayKey {
    /// All day keys in week order, Monday first
    pub const ALL: [Self; 7] = [
        Self::Mon,
        Self::Tue,
        Self::Wed,
        Self::Thu,
        Self::Fri,
        Self::Sat,
        Self::Sun,
    ];

    /// Map a chrono weekday onto its day key
    #[must_use]
    pub const fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Mon,
            Weekday::Tue => Self::Tue,
            Weekday::Wed => Self::Wed,
            Weekday::Thu => Self::Thu,
            Weekday::Fri => Self::Fri,
            Weekday::Sat => Self::Sat,
            Weekday::Sun => Self::Sun,
        }
    }

    /// Storage and wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
            Self::Thu => "thu",
            Self::Fri => "fri",
            Self::Sat => "sat",
            Self::Sun => "sun",
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per weekday, serialized as `{ "mon": .., ..., "sun": .. }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayMap<T> {
    /// Monday
    pub mon: T,
    /// Tuesday
    pub tue: T,
    /// Wednesday
    pub wed: T,
    /// Thursday
    pub thu: T,
    /// Friday
    pub fri: T,
    /// Saturday
    pub sat: T,
    /// Sunday
    pub sun: T,
}

impl<T> DayMap<T> {
    /// Borrow the value for a day
    #[must_use]
    pub const fn get(&self, day: DayKey) -> &T {
        match day {
            DayKey::Mon => &self.mon,
            DayKey::Tue => &self.tue,
            DayKey::Wed => &self.wed,
            DayKey::Thu => &self.thu,
            DayKey::Fri => &self.fri,
            DayKey::Sat => &self.sat,
            DayKey::Sun => &self.sun,
        }
    }

    /// Mutably borrow the value for a day
    pub fn get_mut(&mut self, day: DayKey) -> &mut T {
        match day {
            DayKey::Mon => &mut self.mon,
            DayKey::Tue => &mut self.tue,
            DayKey::Wed => &mut self.wed,
            DayKey::Thu => &mut self.thu,
            DayKey::Fri => &mut self.fri,
            DayKey::Sat => &mut self.sat,
            DayKey::Sun => &mut self.sun,
        }
    }

    /// Iterate days in week order
    pub fn iter(&self) -> impl Iterator<Item = (DayKey, &T)> {
        DayKey::ALL.into_iter().map(move |day| (day, self.get(day)))
    }
}

/// Reference from a week/day slot to a session template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Session template performed in this slot
    pub session_template_id: Uuid,
    /// Optional coach note shown with the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Display order within the day, lowest first
    #[serde(default)]
    pub order: i32,
}

impl Placement {
    /// Placement with no note
    #[must_use]
    pub const fn new(session_template_id: Uuid, order: i32) -> Self {
        Self {
            session_template_id,
            note: None,
            order,
        }
    }
}

/// One week of a level template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTemplate {
    /// Week number, 1..=5
    pub week_number: u8,
    /// Ordered placements per day
    #[serde(default)]
    pub days: DayMap<Vec<Placement>>,
}

impl WeekTemplate {
    /// Empty week (every day a rest day)
    #[must_use]
    pub fn empty(week_number: u8) -> Self {
        Self {
            week_number,
            days: DayMap::default(),
        }
    }

    /// Total placements across all seven days
    #[must_use]
    pub fn placement_count(&self) -> usize {
        self.days.iter().map(|(_, placements)| placements.len()).sum()
    }
}

/// Base five-week plan granted by a subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelTemplate {
    /// Unique identifier
    pub id: Uuid,
    /// Unique display name
    pub name: String,
    /// Whether coaches can assign this template
    pub is_active: bool,
    /// Exactly five weeks, numbered 1..=5
    pub weeks: Vec<WeekTemplate>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl LevelTemplate {
    /// Find the week with the given number
    #[must_use]
    pub fn week(&self, week_number: u8) -> Option<&WeekTemplate> {
        self.weeks.iter().find(|w| w.week_number == week_number)
    }
}

/// Coach-assigned difficulty label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Entry level
    Beginner,
    /// Some training experience
    Intermediate,
    /// Experienced lifters
    Advanced,
}

impl Difficulty {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Prescribed repetitions: a fixed count or an inclusive range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetReps {
    /// Exactly this many reps
    Fixed(u32),
    /// Anywhere in `min..=max`
    Range {
        /// Lower bound
        min: u32,
        /// Upper bound
        max: u32,
    },
}

impl TargetReps {
    /// Lower bound of the target
    #[must_use]
    pub const fn min(self) -> u32 {
        match self {
            Self::Fixed(reps) => reps,
            Self::Range { min, .. } => min,
        }
    }

    /// Upper bound of the target; the pass bar for progression
    #[must_use]
    pub const fn max(self) -> u32 {
        match self {
            Self::Fixed(reps) => reps,
            Self::Range { max, .. } => max,
        }
    }
}

/// Condition side of a declarative progression rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCondition {
    /// Reps above the rule value
    RepsAbove,
    /// Reps below the rule value
    RepsBelow,
    /// Reps within the rule range
    RepsInRange,
}

/// Action side of a declarative progression rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    /// Add `weight_change`
    IncreaseWeight,
    /// Subtract `weight_change`
    DecreaseWeight,
    /// Keep the current weight
    MaintainWeight,
}

/// Declarative progression rule attached to a session item.
///
/// Stored for the admin UI only. The progression evaluator applies a fixed
/// "+2 kg on a full pass, otherwise hold" rule and never reads these, so
/// `weight_change` and `message` have no effect on recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionRule {
    /// When the rule fires
    pub condition: RuleCondition,
    /// Rep threshold or range the condition compares against
    pub value: TargetReps,
    /// What the rule would do
    pub action: RuleAction,
    /// Weight delta in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_change: Option<f64>,
    /// Message shown to the athlete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One exercise prescription inside a session template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionItem {
    /// Primary exercise
    pub exercise_id: Uuid,
    /// Substitutes the athlete may pick, at most three
    #[serde(default)]
    pub alternatives: Vec<Uuid>,
    /// Working sets
    pub sets: u32,
    /// Rep target per set
    pub target_reps: TargetReps,
    /// Rest between sets
    pub rest_time_seconds: u32,
    /// Suggested first-time load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_starting_weight_kg: Option<f64>,
    /// Declarative rules, inert at evaluation time
    #[serde(default)]
    pub progression_rules: Vec<ProgressionRule>,
}

impl SessionItem {
    /// Whether this item prescribes `exercise_id` directly or as an alternative
    #[must_use]
    pub fn covers(&self, exercise_id: Uuid) -> bool {
        self.exercise_id == exercise_id || self.alternatives.contains(&exercise_id)
    }
}

/// Reusable, ordered exercise prescription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTemplate {
    /// Unique identifier
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Difficulty label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Expected duration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// Items in execution order
    #[serde(default)]
    pub items: Vec<SessionItem>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl SessionTemplate {
    /// First item that prescribes `exercise_id` (directly or as an alternative)
    #[must_use]
    pub fn item_for_exercise(&self, exercise_id: Uuid) -> Option<&SessionItem> {
        self.items.iter().find(|item| item.covers(exercise_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_reps_deserializes_number_or_range() {
        let fixed: TargetReps = serde_json::from_str("10").unwrap();
        let range: TargetReps = serde_json::from_str(r#"{"min":8,"max":12}"#).unwrap();

        assert_eq!(fixed.max(), 10);
        assert_eq!(range.min(), 8);
        assert_eq!(range.max(), 12);
    }

    #[test]
    fn test_day_key_sunday_maps_to_sun() {
        assert_eq!(DayKey::from_weekday(Weekday::Sun), DayKey::Sun);
        assert_eq!(DayKey::from_weekday(Weekday::Mon).as_str(), "mon");
    }

    #[test]
    fn test_week_placement_count_spans_all_days() {
        let mut week = WeekTemplate::empty(1);
        week.days.mon.push(Placement::new(Uuid::new_v4(), 0));
        week.days.wed.push(Placement::new(Uuid::new_v4(), 0));
        week.days.sun.push(Placement::new(Uuid::new_v4(), 1));

        assert_eq!(week.placement_count(), 3);
    }

    #[test]
    fn test_day_map_missing_days_default_to_empty() {
        let days: DayMap<Vec<Placement>> = serde_json::from_str(r#"{"mon": []}"#).unwrap();
        assert!(days.sun.is_empty());
    }
}
