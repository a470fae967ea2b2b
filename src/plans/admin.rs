// ABOUTME: Coach/admin write path for templates, overrides, subscriptions and daily pins
// ABOUTME: Validates structural invariants before any document reaches the store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Administration
//!
//! Every operation validates its input, checks referenced documents exist and
//! then writes through the `PlanStore`. Concurrent edits to the same document
//! are last-write-wins. Subscription commands append one history entry each.

use super::status::select_subscription;
use super::validation::{
    validate_level_template, validate_override_week_update, validate_period,
    validate_session_items, validate_session_template, validate_week_number,
    validate_week_numbers, validate_week_update,
};
use crate::database_plugins::PlanStore;
use crate::errors::{AppError, AppResult, PlanError};
use crate::logging::AppLogger;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use liftplan_core::models::{
    ClientPlanOverride, DailyProgram, Exercise, HistoryAction, HistoryEntry, LevelTemplate,
    OverrideStatus, SessionItem, SessionOverride, SessionTemplate, Subscription,
    SubscriptionStatus, WeekOverride, WeekTemplate,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Input for granting a level template to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignSubscriptionRequest {
    /// Receiving user
    pub user_id: Uuid,
    /// Granted level template
    pub level_template_id: Uuid,
    /// Period start
    pub start_at: DateTime<Utc>,
    /// Period end, strictly after `start_at`
    pub end_at: DateTime<Utc>,
    /// Auto-renew flag
    #[serde(default)]
    pub auto_renew: bool,
    /// Acting admin
    #[serde(default)]
    pub admin_id: Option<Uuid>,
    /// Free-form note for the ledger
    #[serde(default)]
    pub note: Option<String>,
}

/// Input for pinning a day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinDailyProgramRequest {
    /// Pinned user
    pub user_id: Uuid,
    /// Calendar day
    pub date: NaiveDate,
    /// Session to perform; `None` pins a rest day
    #[serde(default)]
    pub session_template_id: Option<Uuid>,
    /// Week number to display with the pin
    #[serde(default)]
    pub week_number: Option<u8>,
    /// Calorie target for the day
    #[serde(default)]
    pub calorie_target: Option<u32>,
}

/// Admin write service over any `PlanStore`
pub struct PlanAdminService<S: PlanStore> {
    store: Arc<S>,
}

impl<S: PlanStore> Clone for PlanAdminService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: PlanStore> PlanAdminService<S> {
    /// Create a service over `store`
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    // ================================
    // Level Templates
    // ================================

    /// Create a level template with a fresh ID
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` for malformed weeks, `ResourceAlreadyExists`
    /// when the name is taken, or a store error
    pub async fn create_level_template(
        &self,
        name: &str,
        weeks: Vec<WeekTemplate>,
    ) -> AppResult<LevelTemplate> {
        let now = Utc::now();
        let template = LevelTemplate {
            id: Uuid::new_v4(),
            name: name.trim().to_owned(),
            is_active: true,
            weeks: sorted_weeks(weeks),
            created_at: now,
            updated_at: now,
        };
        check("create_level_template", validate_level_template(&template))?;

        if self
            .store
            .get_level_template_by_name(&template.name)
            .await?
            .is_some()
        {
            return Err(AppError::already_exists(format!(
                "Level template named '{}'",
                template.name
            )));
        }

        self.store.upsert_level_template(&template).await?;
        AppLogger::log_admin_write("create", "level_template", &template.id.to_string());
        Ok(template)
    }

    /// Replace an existing level template wholesale
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown ID, `InvariantViolation` for
    /// malformed weeks, `ResourceAlreadyExists` when renaming onto a taken name,
    /// or a store error
    pub async fn replace_level_template(
        &self,
        mut template: LevelTemplate,
    ) -> AppResult<LevelTemplate> {
        template.name = template.name.trim().to_owned();
        template.weeks = sorted_weeks(template.weeks);
        check("replace_level_template", validate_level_template(&template))?;

        let existing = self
            .store
            .get_level_template(template.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Level template {}", template.id)))?;

        if let Some(holder) = self.store.get_level_template_by_name(&template.name).await? {
            if holder.id != template.id {
                return Err(AppError::already_exists(format!(
                    "Level template named '{}'",
                    template.name
                )));
            }
        }

        template.created_at = existing.created_at;
        template.updated_at = Utc::now();
        self.store.upsert_level_template(&template).await?;
        AppLogger::log_admin_write("replace", "level_template", &template.id.to_string());
        Ok(template)
    }

    /// Replace one week of a level template; the week must hold 4 to 7 sessions
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` for a bad week, `ResourceNotFound` for an
    /// unknown template, or a store error
    pub async fn update_level_template_week(
        &self,
        level_template_id: Uuid,
        week: WeekTemplate,
    ) -> AppResult<LevelTemplate> {
        check("update_level_template_week", validate_week_update(&week))?;

        let mut template = self
            .store
            .get_level_template(level_template_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Level template {level_template_id}")))?;

        let week_number = week.week_number;
        match template.weeks.iter_mut().find(|w| w.week_number == week_number) {
            Some(slot) => *slot = week,
            None => {
                template.weeks.push(week);
                template.weeks = sorted_weeks(template.weeks);
            }
        }
        template.updated_at = Utc::now();

        self.store.upsert_level_template(&template).await?;
        AppLogger::log_admin_write(
            "update_week",
            "level_template",
            &format!("{level_template_id}#{week_number}"),
        );
        Ok(template)
    }

    // ================================
    // Session Templates & Catalog
    // ================================

    /// Insert or replace a session template
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` for a blank title, more than three
    /// alternatives or a bad rep target, or a store error
    pub async fn upsert_session_template(
        &self,
        mut template: SessionTemplate,
    ) -> AppResult<SessionTemplate> {
        check("upsert_session_template", validate_session_template(&template))?;

        template.updated_at = Utc::now();
        self.store.upsert_session_template(&template).await?;
        AppLogger::log_admin_write("upsert", "session_template", &template.id.to_string());
        Ok(template)
    }

    /// Insert or replace an exercise catalog record
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` for a blank name, or a store error
    pub async fn upsert_exercise(&self, exercise: Exercise) -> AppResult<Exercise> {
        if exercise.name.trim().is_empty() {
            return Err(check_err(
                "upsert_exercise",
                PlanError::EmptyName {
                    field: "exercise name",
                },
            ));
        }

        self.store.upsert_exercise(&exercise).await?;
        AppLogger::log_admin_write("upsert", "exercise", &exercise.id.to_string());
        Ok(exercise)
    }

    // ================================
    // Client Overrides
    // ================================

    /// Insert or replace a user's plan override
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` for a malformed week list, `ResourceNotFound`
    /// when the base level template is unknown, or a store error
    pub async fn upsert_plan_override(
        &self,
        mut plan_override: ClientPlanOverride,
    ) -> AppResult<ClientPlanOverride> {
        plan_override
            .overrides_by_week
            .sort_by_key(|w| w.week_number);
        check(
            "upsert_plan_override",
            validate_week_numbers(plan_override.overrides_by_week.iter().map(|w| w.week_number)),
        )?;
        self.require_level_template(plan_override.base_level_template_id)
            .await?;

        plan_override.updated_at = Utc::now();
        self.store.upsert_plan_override(&plan_override).await?;
        AppLogger::log_admin_write("upsert", "plan_override", &plan_override.user_id.to_string());
        Ok(plan_override)
    }

    /// Mark a user's plan override inactive so resolution ignores it
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the user has no override, or a store error
    pub async fn deactivate_plan_override(&self, user_id: Uuid) -> AppResult<ClientPlanOverride> {
        let mut plan_override = self
            .store
            .get_plan_override(user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Plan override").with_user_id(user_id)
            })?;

        plan_override.status = OverrideStatus::Inactive;
        plan_override.updated_at = Utc::now();
        self.store.upsert_plan_override(&plan_override).await?;
        AppLogger::log_admin_write("deactivate", "plan_override", &user_id.to_string());
        Ok(plan_override)
    }

    /// Replace one week of a user's plan override
    ///
    /// When the user has no override yet, one inheriting every day is created
    /// against the level template of their current subscription. The overlaid
    /// week must hold 4 to 7 sessions.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` for a bad week, `ResourceNotFound` when
    /// neither an override nor a subscription exists, or a store error
    pub async fn update_override_week(
        &self,
        user_id: Uuid,
        week_override: WeekOverride,
    ) -> AppResult<ClientPlanOverride> {
        check(
            "update_override_week",
            validate_week_number(week_override.week_number),
        )?;

        let now = Utc::now();
        let mut plan_override = match self.store.get_plan_override(user_id).await? {
            Some(existing) => existing,
            None => {
                let subscriptions = self.store.list_subscriptions(user_id).await?;
                let subscription = select_subscription(&subscriptions, now).ok_or_else(|| {
                    AppError::not_found("Subscription").with_user_id(user_id)
                })?;
                ClientPlanOverride::inherit_all(user_id, subscription.level_template_id, now)
            }
        };

        let base = self
            .store
            .get_level_template(plan_override.base_level_template_id)
            .await?;
        let base_week = base.as_ref().and_then(|t| t.week(week_override.week_number));
        check(
            "update_override_week",
            validate_override_week_update(base_week, &week_override),
        )?;

        let week_number = week_override.week_number;
        match plan_override
            .overrides_by_week
            .iter_mut()
            .find(|w| w.week_number == week_number)
        {
            Some(slot) => *slot = week_override,
            None => {
                plan_override.overrides_by_week.push(week_override);
                plan_override
                    .overrides_by_week
                    .sort_by_key(|w| w.week_number);
            }
        }
        plan_override.updated_at = now;

        self.store.upsert_plan_override(&plan_override).await?;
        AppLogger::log_admin_write(
            "update_week",
            "plan_override",
            &format!("{user_id}#{week_number}"),
        );
        Ok(plan_override)
    }

    /// Store a user's substitute item list for one session template.
    ///
    /// Resolution and progression read the base template only, so the stored
    /// items are not yet reflected in resolved sessions.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` for bad items, `ResourceNotFound` for an
    /// unknown session template, or a store error
    pub async fn upsert_session_override(
        &self,
        user_id: Uuid,
        session_template_id: Uuid,
        items: Vec<SessionItem>,
    ) -> AppResult<SessionOverride> {
        check("upsert_session_override", validate_session_items(&items))?;
        if self
            .store
            .get_session_template(session_template_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found(format!(
                "Session template {session_template_id}"
            )));
        }

        let session_override = SessionOverride {
            user_id,
            session_template_id,
            items,
            updated_at: Utc::now(),
        };
        self.store.upsert_session_override(&session_override).await?;
        AppLogger::log_admin_write(
            "upsert",
            "session_override",
            &format!("{user_id}/{session_template_id}"),
        );
        Ok(session_override)
    }

    // ================================
    // Subscription Ledger
    // ================================

    /// Grant a level template to a user for a period
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` for an empty period, `ResourceNotFound` for
    /// an unknown template, `InvalidInput` for an inactive one, or a store error
    pub async fn assign_subscription(
        &self,
        request: AssignSubscriptionRequest,
    ) -> AppResult<Subscription> {
        check(
            "assign_subscription",
            validate_period(request.start_at, request.end_at),
        )?;
        let template = self.require_level_template(request.level_template_id).await?;
        if !template.is_active {
            return Err(AppError::invalid_input(format!(
                "Level template '{}' is not active",
                template.name
            )));
        }

        let now = Utc::now();
        let subscription = Subscription {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            level_template_id: request.level_template_id,
            status: SubscriptionStatus::Active,
            start_at: request.start_at,
            end_at: request.end_at,
            auto_renew: request.auto_renew,
            history: vec![HistoryEntry {
                action: HistoryAction::Assign,
                from_level_template_id: None,
                to_level_template_id: Some(request.level_template_id),
                date: now,
                admin_id: request.admin_id,
                note: request.note,
            }],
            created_at: now,
        };

        self.store.upsert_subscription(&subscription).await?;
        AppLogger::log_admin_write("assign", "subscription", &subscription.id.to_string());
        Ok(subscription)
    }

    /// Extend a subscription to `end_at`, reactivating it if needed
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown subscription,
    /// `InvariantViolation` when `end_at` is not after the start, or a store error
    pub async fn renew_subscription(
        &self,
        subscription_id: Uuid,
        end_at: DateTime<Utc>,
        admin_id: Option<Uuid>,
        note: Option<String>,
    ) -> AppResult<Subscription> {
        let mut subscription = self.require_subscription(subscription_id).await?;
        check("renew_subscription", validate_period(subscription.start_at, end_at))?;

        subscription.end_at = end_at;
        subscription.status = SubscriptionStatus::Active;
        let entry = HistoryEntry {
            action: HistoryAction::Renew,
            from_level_template_id: None,
            to_level_template_id: None,
            date: Utc::now(),
            admin_id,
            note,
        };
        self.write_with_history(subscription, entry, "renew").await
    }

    /// Move a subscription to a different level template
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown subscription or template, or a
    /// store error
    pub async fn change_subscription_level(
        &self,
        subscription_id: Uuid,
        level_template_id: Uuid,
        admin_id: Option<Uuid>,
        note: Option<String>,
    ) -> AppResult<Subscription> {
        let mut subscription = self.require_subscription(subscription_id).await?;
        self.require_level_template(level_template_id).await?;

        let entry = HistoryEntry {
            action: HistoryAction::ChangeLevel,
            from_level_template_id: Some(subscription.level_template_id),
            to_level_template_id: Some(level_template_id),
            date: Utc::now(),
            admin_id,
            note,
        };
        subscription.level_template_id = level_template_id;
        self.write_with_history(subscription, entry, "change_level")
            .await
    }

    /// Cancel a subscription; canceled status wins over any end date
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown subscription, or a store error
    pub async fn cancel_subscription(
        &self,
        subscription_id: Uuid,
        admin_id: Option<Uuid>,
        note: Option<String>,
    ) -> AppResult<Subscription> {
        let mut subscription = self.require_subscription(subscription_id).await?;

        subscription.status = SubscriptionStatus::Canceled;
        subscription.auto_renew = false;
        let entry = HistoryEntry {
            action: HistoryAction::Cancel,
            from_level_template_id: None,
            to_level_template_id: None,
            date: Utc::now(),
            admin_id,
            note,
        };
        self.write_with_history(subscription, entry, "cancel").await
    }

    // ================================
    // Daily Pins
    // ================================

    /// Pin a session (or a rest day) to one calendar day for a user
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` for a bad week number, `ResourceNotFound`
    /// for an unknown session template, or a store error
    pub async fn pin_daily_program(&self, request: PinDailyProgramRequest) -> AppResult<DailyProgram> {
        if let Some(week_number) = request.week_number {
            check("pin_daily_program", validate_week_number(week_number))?;
        }
        if let Some(session_template_id) = request.session_template_id {
            if self
                .store
                .get_session_template(session_template_id)
                .await?
                .is_none()
            {
                return Err(AppError::not_found(format!(
                    "Session template {session_template_id}"
                )));
            }
        }

        let program = DailyProgram {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            date: request.date.and_time(NaiveTime::MIN).and_utc(),
            week_number: request.week_number,
            session_template_id: request.session_template_id,
            legacy_session_id: None,
            calorie_target: request.calorie_target,
            completed: false,
        };

        let stored = self.store.upsert_daily_program(&program).await?;
        AppLogger::log_admin_write(
            "pin",
            "daily_program",
            &format!("{}@{}", request.user_id, request.date),
        );
        Ok(stored)
    }

    /// Remove a day's pin; returns whether one existed
    ///
    /// # Errors
    ///
    /// Returns a store error
    pub async fn unpin_daily_program(&self, user_id: Uuid, date: NaiveDate) -> AppResult<bool> {
        let removed = self.store.delete_daily_program(user_id, date).await?;
        if removed {
            AppLogger::log_admin_write("unpin", "daily_program", &format!("{user_id}@{date}"));
        }
        Ok(removed)
    }

    // ================================
    // Helpers
    // ================================

    async fn require_level_template(&self, id: Uuid) -> AppResult<LevelTemplate> {
        self.store
            .get_level_template(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Level template {id}")))
    }

    async fn require_subscription(&self, id: Uuid) -> AppResult<Subscription> {
        self.store
            .get_subscription(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Subscription {id}")))
    }

    /// Persist scalar changes, append the ledger entry and return the stored row
    async fn write_with_history(
        &self,
        subscription: Subscription,
        entry: HistoryEntry,
        operation: &str,
    ) -> AppResult<Subscription> {
        self.store.upsert_subscription(&subscription).await?;
        self.store
            .append_subscription_history(subscription.id, &entry)
            .await?;
        AppLogger::log_admin_write(operation, "subscription", &subscription.id.to_string());

        self.store
            .get_subscription(subscription.id)
            .await?
            .ok_or_else(|| AppError::internal("Subscription vanished after write"))
    }
}

fn sorted_weeks(mut weeks: Vec<WeekTemplate>) -> Vec<WeekTemplate> {
    weeks.sort_by_key(|w| w.week_number);
    weeks
}

/// Convert a validation result, logging the rejection
fn check(operation: &str, result: Result<(), PlanError>) -> AppResult<()> {
    result.map_err(|e| check_err(operation, e))
}

fn check_err(operation: &str, error: PlanError) -> AppError {
    AppLogger::log_admin_rejection(operation, &error.to_string());
    AppError::from(error)
}
