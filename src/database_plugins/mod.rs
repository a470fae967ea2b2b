// ABOUTME: Storage abstraction for templates, overrides, subscriptions, pins and history
// ABOUTME: Plugin architecture so the engine runs against SQLite or any document-shaped store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use liftplan_core::models::{
    ClientPlanOverride, DailyProgram, Exercise, ExerciseHistory, HistoryEntry, LevelTemplate,
    SessionOverride, SessionTemplate, Subscription,
};
use uuid::Uuid;

/// SQLite implementation
pub mod sqlite;

/// Core storage abstraction trait
///
/// Every engine service is generic over this trait. Operations are the basic
/// document-store verbs: find one, find many, upsert and append-to-array.
/// Missing documents are `Ok(None)`; only I/O and decoding failures are errors.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Create tables and indexes if they do not exist
    async fn migrate(&self) -> AppResult<()>;

    // ================================
    // Level & Session Templates
    // ================================

    /// Get a level template by ID
    async fn get_level_template(&self, id: Uuid) -> AppResult<Option<LevelTemplate>>;

    /// Get a level template by its unique name
    async fn get_level_template_by_name(&self, name: &str) -> AppResult<Option<LevelTemplate>>;

    /// Insert or replace a level template (name must stay unique)
    async fn upsert_level_template(&self, template: &LevelTemplate) -> AppResult<()>;

    /// Get a session template by ID
    async fn get_session_template(&self, id: Uuid) -> AppResult<Option<SessionTemplate>>;

    /// Get every session template whose ID is in `ids` (unknown IDs are skipped)
    async fn get_session_templates(&self, ids: &[Uuid]) -> AppResult<Vec<SessionTemplate>>;

    /// Insert or replace a session template
    async fn upsert_session_template(&self, template: &SessionTemplate) -> AppResult<()>;

    // ================================
    // Exercise Catalog
    // ================================

    /// Get every exercise whose ID is in `ids` (unknown IDs are skipped)
    async fn get_exercises(&self, ids: &[Uuid]) -> AppResult<Vec<Exercise>>;

    /// Insert or replace an exercise
    async fn upsert_exercise(&self, exercise: &Exercise) -> AppResult<()>;

    // ================================
    // Overrides
    // ================================

    /// Get the user's plan override regardless of status
    async fn get_plan_override(&self, user_id: Uuid) -> AppResult<Option<ClientPlanOverride>>;

    /// Insert or replace the user's plan override
    async fn upsert_plan_override(&self, plan_override: &ClientPlanOverride) -> AppResult<()>;

    /// Get the user's override of one session template
    async fn get_session_override(
        &self,
        user_id: Uuid,
        session_template_id: Uuid,
    ) -> AppResult<Option<SessionOverride>>;

    /// Insert or replace a session override (unique per user and session template)
    async fn upsert_session_override(&self, session_override: &SessionOverride) -> AppResult<()>;

    // ================================
    // Subscription Ledger
    // ================================

    /// Get a subscription by ID
    async fn get_subscription(&self, id: Uuid) -> AppResult<Option<Subscription>>;

    /// All subscriptions of a user, in no particular order
    async fn list_subscriptions(&self, user_id: Uuid) -> AppResult<Vec<Subscription>>;

    /// Insert a subscription with its history, or update its scalar fields.
    /// The stored history of an existing subscription is left untouched.
    async fn upsert_subscription(&self, subscription: &Subscription) -> AppResult<()>;

    /// Append one entry to a subscription's history
    async fn append_subscription_history(
        &self,
        subscription_id: Uuid,
        entry: &HistoryEntry,
    ) -> AppResult<()>;

    // ================================
    // Daily Pins
    // ================================

    /// Pin for `(user_id, date)`, matched over the whole calendar day
    async fn get_daily_program(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<DailyProgram>>;

    /// Insert or replace the pin for the program's user and calendar day,
    /// returning the stored row
    async fn upsert_daily_program(&self, program: &DailyProgram) -> AppResult<DailyProgram>;

    /// Remove the pin for `(user_id, date)`; returns whether a row existed
    async fn delete_daily_program(&self, user_id: Uuid, date: NaiveDate) -> AppResult<bool>;

    // ================================
    // Exercise History
    // ================================

    /// Get the user's history for one exercise
    async fn get_exercise_history(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> AppResult<Option<ExerciseHistory>>;

    /// Insert or overwrite the user's history for one exercise
    async fn upsert_exercise_history(&self, history: &ExerciseHistory) -> AppResult<()>;
}
