// ABOUTME: Plan resolver answering "what does this user train on this date" and the weekly plan view
// ABOUTME: Walks daily pin, subscription, level template and plan override, degrading to rest days
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Resolution
//!
//! Resolution order for a `(user, date)` pair, first match wins:
//!
//! 1. A daily pin for the calendar day. A pin with a session reference yields
//!    that session; a pin without one is an explicit rest day.
//! 2. The selected subscription. None means a rest day.
//! 3. The subscription's level template week for the computed week number,
//!    with the user's active plan override laid over it day by day.
//! 4. The placement with the lowest `order` on that day.
//!
//! Missing referenced documents degrade to "no session". Only store failures
//! are returned as errors.

use super::schedule::{day_key, day_placements, first_placement, ordered_placements, week_number};
use super::status::{select_subscription, SubscriptionEnvelope};
use crate::database_plugins::PlanStore;
use crate::errors::{AppError, AppResult, ErrorCode};
use chrono::{DateTime, NaiveDate, Utc};
use liftplan_core::constants::plan::WEEKS_PER_PLAN;
use liftplan_core::models::{
    ClientPlanOverride, DayKey, Difficulty, Exercise, LevelTemplate, Placement, SessionItem,
    SessionTemplate, Subscription,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Compact session view returned by the daily and weekly reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session template ID
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Expected duration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// Difficulty label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Number of prescribed items
    pub exercise_count: usize,
    /// Coach note from the placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SessionSummary {
    fn from_template(template: &SessionTemplate, note: Option<String>) -> Self {
        Self {
            id: template.id,
            title: template.title.clone(),
            duration_minutes: template.duration_minutes,
            difficulty: template.difficulty,
            exercise_count: template.items.len(),
            note,
        }
    }
}

/// Session item with catalog records joined in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionItemDetail {
    /// Prescription as stored on the template
    #[serde(flatten)]
    pub item: SessionItem,
    /// Primary exercise record, `None` when missing from the catalog
    pub exercise: Option<Exercise>,
    /// Alternative exercise records that exist in the catalog
    pub alternative_exercises: Vec<Exercise>,
}

/// Full session view for the workout screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    /// Session template ID
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Expected duration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// Difficulty label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Coach note from the placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Items in execution order
    pub items: Vec<SessionItemDetail>,
}

/// Result of resolving one user's day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyResolution<T> {
    /// Session to perform, `None` for a rest day
    pub session: Option<T>,
    /// Plan week, when a pin or a subscription provides one
    pub week_number: Option<u8>,
    /// Weekday of the resolved date
    pub day_name: DayKey,
    /// Subscription that drives the plan
    pub subscription: Option<SubscriptionEnvelope>,
}

/// One placement in the weekly view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSession {
    /// Referenced session template
    pub session_template_id: Uuid,
    /// Display order within the day
    pub order: i32,
    /// Summary, `None` when the template no longer exists
    pub session: Option<SessionSummary>,
}

/// One day in the weekly view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedDay {
    /// Weekday
    pub day_name: DayKey,
    /// Placements sorted by order; empty on rest days
    pub sessions: Vec<PlannedSession>,
}

/// Seven-day plan for one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPlan {
    /// Plan week shown
    pub week_number: u8,
    /// Monday through Sunday
    pub days: Vec<PlannedDay>,
    /// Subscription that drives the plan
    pub subscription: Option<SubscriptionEnvelope>,
}

/// Where resolution landed before the session document is loaded
struct Located {
    placement: Option<(Uuid, Option<String>)>,
    week_number: Option<u8>,
    day_name: DayKey,
    subscription: Option<SubscriptionEnvelope>,
}

/// Read-side plan resolution over any `PlanStore`
pub struct PlanResolver<S: PlanStore> {
    store: Arc<S>,
}

impl<S: PlanStore> Clone for PlanResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: PlanStore> PlanResolver<S> {
    /// Create a resolver over `store`
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Session summary for `date` (today when `None`)
    ///
    /// # Errors
    ///
    /// Returns an error only when the store fails
    pub async fn resolve_daily_session(
        &self,
        user_id: Uuid,
        date: Option<NaiveDate>,
    ) -> AppResult<DailyResolution<SessionSummary>> {
        let now = Utc::now();
        self.resolve_daily_session_at(user_id, date.unwrap_or_else(|| now.date_naive()), now)
            .await
    }

    /// Session summary for `date`, evaluating subscription status at `now`
    ///
    /// # Errors
    ///
    /// Returns an error only when the store fails
    pub async fn resolve_daily_session_at(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<DailyResolution<SessionSummary>> {
        let located = self.locate(user_id, date, now).await?;

        let session = match &located.placement {
            Some((session_id, note)) => self
                .load_session(*session_id)
                .await?
                .map(|template| SessionSummary::from_template(&template, note.clone())),
            None => None,
        };

        Ok(located.into_resolution(session))
    }

    /// Full session detail for `date` (today when `None`)
    ///
    /// # Errors
    ///
    /// Returns an error only when the store fails
    pub async fn resolve_daily_workout(
        &self,
        user_id: Uuid,
        date: Option<NaiveDate>,
    ) -> AppResult<DailyResolution<SessionDetail>> {
        let now = Utc::now();
        self.resolve_daily_workout_at(user_id, date.unwrap_or_else(|| now.date_naive()), now)
            .await
    }

    /// Full session detail for `date`, with exercise records joined in
    ///
    /// # Errors
    ///
    /// Returns an error only when the store fails
    pub async fn resolve_daily_workout_at(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<DailyResolution<SessionDetail>> {
        let located = self.locate(user_id, date, now).await?;

        let session = match &located.placement {
            Some((session_id, note)) => match self.load_session(*session_id).await? {
                Some(template) => Some(self.session_detail(template, note.clone()).await?),
                None => None,
            },
            None => None,
        };

        Ok(located.into_resolution(session))
    }

    /// Weekly plan for `week_number` (the current week when `None`)
    ///
    /// # Errors
    ///
    /// Returns an error for a week number outside 1..=5 or when the store fails
    pub async fn resolve_week_plan(
        &self,
        user_id: Uuid,
        week_number: Option<u8>,
    ) -> AppResult<WeekPlan> {
        self.resolve_week_plan_at(user_id, week_number, Utc::now())
            .await
    }

    /// Weekly plan evaluated at `now`. Daily pins are not applied here.
    ///
    /// # Errors
    ///
    /// Returns an error for a week number outside 1..=5 or when the store fails
    pub async fn resolve_week_plan_at(
        &self,
        user_id: Uuid,
        week_number: Option<u8>,
        now: DateTime<Utc>,
    ) -> AppResult<WeekPlan> {
        if let Some(requested) = week_number {
            if requested == 0 || requested > WEEKS_PER_PLAN {
                return Err(AppError::new(
                    ErrorCode::ValueOutOfRange,
                    format!("Week number {requested} is outside 1..={WEEKS_PER_PLAN}"),
                ));
            }
        }

        let subscriptions = self.store.list_subscriptions(user_id).await?;
        let Some(subscription) = select_subscription(&subscriptions, now) else {
            debug!(user_id = %user_id, "No subscription, empty week plan");
            return Ok(WeekPlan {
                week_number: week_number.unwrap_or(1),
                days: DayKey::ALL
                    .into_iter()
                    .map(|day_name| PlannedDay {
                        day_name,
                        sessions: Vec::new(),
                    })
                    .collect(),
                subscription: None,
            });
        };

        let week = week_number.unwrap_or_else(|| week_number_at(subscription, now));
        let (level_template, plan_override) = tokio::try_join!(
            self.store.get_level_template(subscription.level_template_id),
            self.store.get_plan_override(user_id),
        )?;
        if level_template.is_none() {
            warn!(
                user_id = %user_id,
                level_template_id = %subscription.level_template_id,
                "Subscription references a missing level template"
            );
        }

        let template_week = level_template.as_ref().and_then(|t| t.week(week));
        let day_lists: Vec<(DayKey, Vec<&Placement>)> = DayKey::ALL
            .into_iter()
            .map(|day| {
                let placements = day_placements(template_week, plan_override.as_ref(), week, day);
                (day, ordered_placements(placements))
            })
            .collect();

        let mut session_ids: Vec<Uuid> = day_lists
            .iter()
            .flat_map(|(_, placements)| placements.iter().map(|p| p.session_template_id))
            .collect();
        session_ids.sort_unstable();
        session_ids.dedup();

        let sessions: HashMap<Uuid, SessionTemplate> = self
            .store
            .get_session_templates(&session_ids)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        let days = day_lists
            .into_iter()
            .map(|(day_name, placements)| PlannedDay {
                day_name,
                sessions: placements
                    .into_iter()
                    .map(|p| PlannedSession {
                        session_template_id: p.session_template_id,
                        order: p.order,
                        session: sessions
                            .get(&p.session_template_id)
                            .map(|t| SessionSummary::from_template(t, p.note.clone())),
                    })
                    .collect(),
            })
            .collect();

        debug!(user_id = %user_id, week_number = week, "Resolved week plan");
        Ok(WeekPlan {
            week_number: week,
            days,
            subscription: Some(envelope(subscription, level_template.as_ref(), now)),
        })
    }

    /// Steps 1 through 4: pin, subscription, template week and placement
    async fn locate(&self, user_id: Uuid, date: NaiveDate, now: DateTime<Utc>) -> AppResult<Located> {
        let day_name = day_key(date);

        let (pin, subscriptions) = tokio::try_join!(
            self.store.get_daily_program(user_id, date),
            self.store.list_subscriptions(user_id),
        )?;
        let selected = select_subscription(&subscriptions, now);

        if let Some(pin) = pin {
            let level_template = match selected {
                Some(subscription) => {
                    self.store
                        .get_level_template(subscription.level_template_id)
                        .await?
                }
                None => None,
            };
            let session_id = pin.pinned_session_id();
            debug!(
                user_id = %user_id,
                date = %date,
                session_template_id = ?session_id,
                "Daily pin found"
            );
            return Ok(Located {
                placement: session_id.map(|id| (id, None)),
                week_number: pin
                    .week_number
                    .or_else(|| selected.map(|s| week_number(s.start_at, date))),
                day_name,
                subscription: selected.map(|s| envelope(s, level_template.as_ref(), now)),
            });
        }

        let Some(subscription) = selected else {
            debug!(user_id = %user_id, date = %date, "No subscription, rest day");
            return Ok(Located {
                placement: None,
                week_number: None,
                day_name,
                subscription: None,
            });
        };

        let week = week_number(subscription.start_at, date);
        let (level_template, plan_override) = tokio::try_join!(
            self.store.get_level_template(subscription.level_template_id),
            self.store.get_plan_override(user_id),
        )?;

        let placement = pick_placement(
            level_template.as_ref(),
            plan_override.as_ref(),
            week,
            day_name,
        );
        if level_template.is_none() {
            warn!(
                user_id = %user_id,
                level_template_id = %subscription.level_template_id,
                "Subscription references a missing level template"
            );
        }
        debug!(
            user_id = %user_id,
            date = %date,
            week_number = week,
            day = %day_name,
            session_template_id = ?placement.as_ref().map(|(id, _)| *id),
            "Resolved placement"
        );

        Ok(Located {
            placement,
            week_number: Some(week),
            day_name,
            subscription: Some(envelope(subscription, level_template.as_ref(), now)),
        })
    }

    async fn load_session(&self, session_id: Uuid) -> AppResult<Option<SessionTemplate>> {
        let template = self.store.get_session_template(session_id).await?;
        if template.is_none() {
            warn!(session_template_id = %session_id, "Placement references a missing session template");
        }
        Ok(template)
    }

    async fn session_detail(
        &self,
        template: SessionTemplate,
        note: Option<String>,
    ) -> AppResult<SessionDetail> {
        let mut exercise_ids: Vec<Uuid> = template
            .items
            .iter()
            .flat_map(|item| std::iter::once(item.exercise_id).chain(item.alternatives.iter().copied()))
            .collect();
        exercise_ids.sort_unstable();
        exercise_ids.dedup();

        let catalog: HashMap<Uuid, Exercise> = self
            .store
            .get_exercises(&exercise_ids)
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        let items = template
            .items
            .into_iter()
            .map(|item| SessionItemDetail {
                exercise: catalog.get(&item.exercise_id).cloned(),
                alternative_exercises: item
                    .alternatives
                    .iter()
                    .filter_map(|id| catalog.get(id).cloned())
                    .collect(),
                item,
            })
            .collect();

        Ok(SessionDetail {
            id: template.id,
            title: template.title,
            duration_minutes: template.duration_minutes,
            difficulty: template.difficulty,
            note,
            items,
        })
    }
}

impl Located {
    fn into_resolution<T>(self, session: Option<T>) -> DailyResolution<T> {
        DailyResolution {
            session,
            week_number: self.week_number,
            day_name: self.day_name,
            subscription: self.subscription,
        }
    }
}

/// First placement of the overlaid day, with its note
fn pick_placement(
    level_template: Option<&LevelTemplate>,
    plan_override: Option<&ClientPlanOverride>,
    week: u8,
    day: DayKey,
) -> Option<(Uuid, Option<String>)> {
    let template_week = level_template.and_then(|t| t.week(week));
    first_placement(day_placements(template_week, plan_override, week, day))
        .map(|p| (p.session_template_id, p.note.clone()))
}

fn week_number_at(subscription: &Subscription, now: DateTime<Utc>) -> u8 {
    week_number(subscription.start_at, now.date_naive())
}

fn envelope(
    subscription: &Subscription,
    level_template: Option<&LevelTemplate>,
    now: DateTime<Utc>,
) -> SubscriptionEnvelope {
    SubscriptionEnvelope::build(subscription, level_template.map(|t| t.name.clone()), now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftplan_core::models::{DayOverride, WeekTemplate};

    fn template_with_monday(session_id: Uuid) -> LevelTemplate {
        let now = Utc::now();
        LevelTemplate {
            id: Uuid::new_v4(),
            name: "Foundations".to_owned(),
            is_active: true,
            weeks: (1..=WEEKS_PER_PLAN)
                .map(|n| {
                    let mut week = WeekTemplate::empty(n);
                    week.days.mon.push(Placement::new(session_id, 0));
                    week
                })
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_pick_placement_prefers_replaced_day() {
        let base_session = Uuid::new_v4();
        let override_session = Uuid::new_v4();
        let template = template_with_monday(base_session);

        let mut plan_override = ClientPlanOverride::inherit_all(Uuid::new_v4(), template.id, Utc::now());
        plan_override.overrides_by_week[2].days.mon =
            DayOverride::from_placements(vec![Placement::new(override_session, 0)]);

        let week_three = pick_placement(Some(&template), Some(&plan_override), 3, DayKey::Mon);
        let week_two = pick_placement(Some(&template), Some(&plan_override), 2, DayKey::Mon);

        assert_eq!(week_three.map(|(id, _)| id), Some(override_session));
        assert_eq!(week_two.map(|(id, _)| id), Some(base_session));
    }

    #[test]
    fn test_pick_placement_without_template_is_rest() {
        assert!(pick_placement(None, None, 1, DayKey::Mon).is_none());
    }
}
