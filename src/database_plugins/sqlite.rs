// ABOUTME: SQLite implementation of the plan store using sqlx
// ABOUTME: Templates, overrides and history arrays live in JSON text columns; timestamps are RFC3339
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::PlanStore;
use crate::config::DatabaseConfig;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, Utc};
use liftplan_core::models::{
    ClientPlanOverride, DailyProgram, Difficulty, Exercise, ExerciseHistory, HistoryEntry,
    LevelTemplate, OverrideStatus, ProgressionStatus, SessionOverride, SessionTemplate,
    Subscription, SubscriptionStatus,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

/// Schema statements, applied in order by `migrate`
const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS level_templates (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        is_active INTEGER NOT NULL DEFAULT 1,
        weeks TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS session_templates (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        difficulty TEXT,
        duration_minutes INTEGER,
        items TEXT NOT NULL DEFAULT '[]',
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS exercises (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        muscle_group TEXT,
        equipment TEXT,
        video_url TEXT
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS plan_overrides (
        user_id TEXT PRIMARY KEY,
        base_level_template_id TEXT NOT NULL,
        overrides_by_week TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'active',
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS session_overrides (
        user_id TEXT NOT NULL,
        session_template_id TEXT NOT NULL,
        items TEXT NOT NULL DEFAULT '[]',
        updated_at TEXT NOT NULL,
        PRIMARY KEY (user_id, session_template_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS subscriptions (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        level_template_id TEXT NOT NULL,
        status TEXT NOT NULL,
        start_at TEXT NOT NULL,
        end_at TEXT NOT NULL,
        auto_renew INTEGER NOT NULL DEFAULT 0,
        history TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_subscriptions_user ON subscriptions(user_id)",
    r"
    CREATE TABLE IF NOT EXISTS daily_programs (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        date TEXT NOT NULL,
        day TEXT NOT NULL,
        week_number INTEGER,
        session_template_id TEXT,
        legacy_session_id TEXT,
        calorie_target INTEGER,
        completed INTEGER NOT NULL DEFAULT 0,
        UNIQUE (user_id, day)
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_daily_programs_user_date ON daily_programs(user_id, date)",
    r"
    CREATE TABLE IF NOT EXISTS exercise_history (
        user_id TEXT NOT NULL,
        exercise_id TEXT NOT NULL,
        last_weight REAL NOT NULL,
        last_reps TEXT NOT NULL DEFAULT '[]',
        last_sets TEXT NOT NULL DEFAULT '[]',
        last_completed_at TEXT NOT NULL,
        recommended_next_weight REAL,
        progression_status TEXT NOT NULL DEFAULT 'stable',
        total_volume REAL NOT NULL DEFAULT 0,
        PRIMARY KEY (user_id, exercise_id)
    )
    ",
];

/// SQLite-backed plan store
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open (creating if needed) the database at `database_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the connection fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true);

        // An in-memory database lives as long as its connection; keep exactly one open
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to SQLite: {e}")))?;

        info!("Connected to SQLite plan store");
        Ok(Self { pool })
    }

    /// Open the configured database, applying the schema when auto-migrate is on
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or migration fails
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        let database = Self::new(&config.url.to_connection_string()).await?;
        if config.auto_migrate {
            database.migrate().await?;
        }
        Ok(database)
    }

    /// Underlying connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PlanStore for SqliteDatabase {
    async fn migrate(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        }
        debug!(statements = SCHEMA.len(), "Plan store schema applied");
        Ok(())
    }

    // ================================
    // Level & Session Templates
    // ================================

    async fn get_level_template(&self, id: Uuid) -> AppResult<Option<LevelTemplate>> {
        let row = sqlx::query(
            r"
            SELECT id, name, is_active, weeks, created_at, updated_at
            FROM level_templates
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get level template: {e}")))?;

        row.map(|r| row_to_level_template(&r)).transpose()
    }

    async fn get_level_template_by_name(&self, name: &str) -> AppResult<Option<LevelTemplate>> {
        let row = sqlx::query(
            r"
            SELECT id, name, is_active, weeks, created_at, updated_at
            FROM level_templates
            WHERE name = $1
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get level template: {e}")))?;

        row.map(|r| row_to_level_template(&r)).transpose()
    }

    async fn upsert_level_template(&self, template: &LevelTemplate) -> AppResult<()> {
        let weeks_json = serde_json::to_string(&template.weeks)?;

        sqlx::query(
            r"
            INSERT INTO level_templates (id, name, is_active, weeks, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                is_active = excluded.is_active,
                weeks = excluded.weeks,
                updated_at = excluded.updated_at
            ",
        )
        .bind(template.id.to_string())
        .bind(&template.name)
        .bind(template.is_active)
        .bind(weeks_json)
        .bind(format_timestamp(template.created_at))
        .bind(format_timestamp(template.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(format!("Level template named '{}'", template.name))
            } else {
                AppError::database(format!("Failed to upsert level template: {e}"))
            }
        })?;

        Ok(())
    }

    async fn get_session_template(&self, id: Uuid) -> AppResult<Option<SessionTemplate>> {
        let row = sqlx::query(
            r"
            SELECT id, title, difficulty, duration_minutes, items, updated_at
            FROM session_templates
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get session template: {e}")))?;

        row.map(|r| row_to_session_template(&r)).transpose()
    }

    async fn get_session_templates(&self, ids: &[Uuid]) -> AppResult<Vec<SessionTemplate>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r"
            SELECT id, title, difficulty, duration_minutes, items, updated_at
            FROM session_templates
            WHERE id IN (SELECT value FROM json_each($1))
            ",
        )
        .bind(serde_json::to_string(ids)?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list session templates: {e}")))?;

        rows.iter().map(row_to_session_template).collect()
    }

    async fn upsert_session_template(&self, template: &SessionTemplate) -> AppResult<()> {
        let items_json = serde_json::to_string(&template.items)?;

        sqlx::query(
            r"
            INSERT INTO session_templates (id, title, difficulty, duration_minutes, items, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                difficulty = excluded.difficulty,
                duration_minutes = excluded.duration_minutes,
                items = excluded.items,
                updated_at = excluded.updated_at
            ",
        )
        .bind(template.id.to_string())
        .bind(&template.title)
        .bind(template.difficulty.map(Difficulty::as_str))
        .bind(template.duration_minutes.map(i64::from))
        .bind(items_json)
        .bind(format_timestamp(template.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert session template: {e}")))?;

        Ok(())
    }

    // ================================
    // Exercise Catalog
    // ================================

    async fn get_exercises(&self, ids: &[Uuid]) -> AppResult<Vec<Exercise>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r"
            SELECT id, name, muscle_group, equipment, video_url
            FROM exercises
            WHERE id IN (SELECT value FROM json_each($1))
            ",
        )
        .bind(serde_json::to_string(ids)?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list exercises: {e}")))?;

        rows.iter().map(row_to_exercise).collect()
    }

    async fn upsert_exercise(&self, exercise: &Exercise) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO exercises (id, name, muscle_group, equipment, video_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                muscle_group = excluded.muscle_group,
                equipment = excluded.equipment,
                video_url = excluded.video_url
            ",
        )
        .bind(exercise.id.to_string())
        .bind(&exercise.name)
        .bind(&exercise.muscle_group)
        .bind(&exercise.equipment)
        .bind(&exercise.video_url)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert exercise: {e}")))?;

        Ok(())
    }

    // ================================
    // Overrides
    // ================================

    async fn get_plan_override(&self, user_id: Uuid) -> AppResult<Option<ClientPlanOverride>> {
        let row = sqlx::query(
            r"
            SELECT user_id, base_level_template_id, overrides_by_week, status, updated_at
            FROM plan_overrides
            WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get plan override: {e}")))?;

        row.map(|r| row_to_plan_override(&r)).transpose()
    }

    async fn upsert_plan_override(&self, plan_override: &ClientPlanOverride) -> AppResult<()> {
        let weeks_json = serde_json::to_string(&plan_override.overrides_by_week)?;

        sqlx::query(
            r"
            INSERT INTO plan_overrides (user_id, base_level_template_id, overrides_by_week, status, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(user_id) DO UPDATE SET
                base_level_template_id = excluded.base_level_template_id,
                overrides_by_week = excluded.overrides_by_week,
                status = excluded.status,
                updated_at = excluded.updated_at
            ",
        )
        .bind(plan_override.user_id.to_string())
        .bind(plan_override.base_level_template_id.to_string())
        .bind(weeks_json)
        .bind(plan_override.status.as_str())
        .bind(format_timestamp(plan_override.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert plan override: {e}")))?;

        Ok(())
    }

    async fn get_session_override(
        &self,
        user_id: Uuid,
        session_template_id: Uuid,
    ) -> AppResult<Option<SessionOverride>> {
        let row = sqlx::query(
            r"
            SELECT user_id, session_template_id, items, updated_at
            FROM session_overrides
            WHERE user_id = $1 AND session_template_id = $2
            ",
        )
        .bind(user_id.to_string())
        .bind(session_template_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get session override: {e}")))?;

        row.map(|r| row_to_session_override(&r)).transpose()
    }

    async fn upsert_session_override(&self, session_override: &SessionOverride) -> AppResult<()> {
        let items_json = serde_json::to_string(&session_override.items)?;

        sqlx::query(
            r"
            INSERT INTO session_overrides (user_id, session_template_id, items, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(user_id, session_template_id) DO UPDATE SET
                items = excluded.items,
                updated_at = excluded.updated_at
            ",
        )
        .bind(session_override.user_id.to_string())
        .bind(session_override.session_template_id.to_string())
        .bind(items_json)
        .bind(format_timestamp(session_override.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert session override: {e}")))?;

        Ok(())
    }

    // ================================
    // Subscription Ledger
    // ================================

    async fn get_subscription(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, level_template_id, status, start_at, end_at, auto_renew, history, created_at
            FROM subscriptions
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get subscription: {e}")))?;

        row.map(|r| row_to_subscription(&r)).transpose()
    }

    async fn list_subscriptions(&self, user_id: Uuid) -> AppResult<Vec<Subscription>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, level_template_id, status, start_at, end_at, auto_renew, history, created_at
            FROM subscriptions
            WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list subscriptions: {e}")))?;

        rows.iter().map(row_to_subscription).collect()
    }

    async fn upsert_subscription(&self, subscription: &Subscription) -> AppResult<()> {
        let history_json = serde_json::to_string(&subscription.history)?;

        sqlx::query(
            r"
            INSERT INTO subscriptions (id, user_id, level_template_id, status, start_at, end_at, auto_renew, history, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT(id) DO UPDATE SET
                level_template_id = excluded.level_template_id,
                status = excluded.status,
                start_at = excluded.start_at,
                end_at = excluded.end_at,
                auto_renew = excluded.auto_renew
            ",
        )
        .bind(subscription.id.to_string())
        .bind(subscription.user_id.to_string())
        .bind(subscription.level_template_id.to_string())
        .bind(subscription.status.as_str())
        .bind(format_timestamp(subscription.start_at))
        .bind(format_timestamp(subscription.end_at))
        .bind(subscription.auto_renew)
        .bind(history_json)
        .bind(format_timestamp(subscription.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert subscription: {e}")))?;

        Ok(())
    }

    async fn append_subscription_history(
        &self,
        subscription_id: Uuid,
        entry: &HistoryEntry,
    ) -> AppResult<()> {
        let entry_json = serde_json::to_string(entry)?;

        let result = sqlx::query(
            r"
            UPDATE subscriptions
            SET history = json_insert(history, '$[#]', json($1))
            WHERE id = $2
            ",
        )
        .bind(entry_json)
        .bind(subscription_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to append subscription history: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Subscription {subscription_id}")));
        }
        Ok(())
    }

    // ================================
    // Daily Pins
    // ================================

    async fn get_daily_program(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<DailyProgram>> {
        let (start, end) = day_bounds(date);

        let row = sqlx::query(
            r"
            SELECT id, user_id, date, week_number, session_template_id, legacy_session_id,
                   calorie_target, completed
            FROM daily_programs
            WHERE user_id = $1 AND date >= $2 AND date < $3
            ORDER BY date ASC
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .bind(start)
        .bind(end)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get daily program: {e}")))?;

        row.map(|r| row_to_daily_program(&r)).transpose()
    }

    async fn upsert_daily_program(&self, program: &DailyProgram) -> AppResult<DailyProgram> {
        sqlx::query(
            r"
            INSERT INTO daily_programs (id, user_id, date, day, week_number, session_template_id,
                                        legacy_session_id, calorie_target, completed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT(user_id, day) DO UPDATE SET
                date = excluded.date,
                week_number = excluded.week_number,
                session_template_id = excluded.session_template_id,
                legacy_session_id = excluded.legacy_session_id,
                calorie_target = excluded.calorie_target,
                completed = excluded.completed
            ",
        )
        .bind(program.id.to_string())
        .bind(program.user_id.to_string())
        .bind(format_timestamp(program.date))
        .bind(program.calendar_date().to_string())
        .bind(program.week_number.map(i64::from))
        .bind(program.session_template_id.map(|id| id.to_string()))
        .bind(program.legacy_session_id.map(|id| id.to_string()))
        .bind(program.calorie_target.map(i64::from))
        .bind(program.completed)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert daily program: {e}")))?;

        self.get_daily_program(program.user_id, program.calendar_date())
            .await?
            .ok_or_else(|| AppError::internal("Daily program vanished after upsert"))
    }

    async fn delete_daily_program(&self, user_id: Uuid, date: NaiveDate) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM daily_programs WHERE user_id = $1 AND day = $2")
            .bind(user_id.to_string())
            .bind(date.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete daily program: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    // ================================
    // Exercise History
    // ================================

    async fn get_exercise_history(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> AppResult<Option<ExerciseHistory>> {
        let row = sqlx::query(
            r"
            SELECT user_id, exercise_id, last_weight, last_reps, last_sets, last_completed_at,
                   recommended_next_weight, progression_status, total_volume
            FROM exercise_history
            WHERE user_id = $1 AND exercise_id = $2
            ",
        )
        .bind(user_id.to_string())
        .bind(exercise_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get exercise history: {e}")))?;

        row.map(|r| row_to_exercise_history(&r)).transpose()
    }

    async fn upsert_exercise_history(&self, history: &ExerciseHistory) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO exercise_history (user_id, exercise_id, last_weight, last_reps, last_sets,
                                          last_completed_at, recommended_next_weight,
                                          progression_status, total_volume)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT(user_id, exercise_id) DO UPDATE SET
                last_weight = excluded.last_weight,
                last_reps = excluded.last_reps,
                last_sets = excluded.last_sets,
                last_completed_at = excluded.last_completed_at,
                recommended_next_weight = excluded.recommended_next_weight,
                progression_status = excluded.progression_status,
                total_volume = excluded.total_volume
            ",
        )
        .bind(history.user_id.to_string())
        .bind(history.exercise_id.to_string())
        .bind(history.last_weight)
        .bind(serde_json::to_string(&history.last_reps)?)
        .bind(serde_json::to_string(&history.last_sets)?)
        .bind(format_timestamp(history.last_completed_at))
        .bind(history.recommended_next_weight)
        .bind(history.progression_status.as_str())
        .bind(history.total_volume)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert exercise history: {e}")))?;

        Ok(())
    }
}

// ================================
// Row conversion helpers
// ================================

/// Fixed-width RFC3339 so lexical order in SQLite matches chronological order
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime '{value}': {e}")))
}

fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))
}

fn parse_optional_uuid(value: Option<String>) -> AppResult<Option<Uuid>> {
    value.as_deref().map(parse_uuid).transpose()
}

/// Half-open `[00:00, next 00:00)` range covering a UTC calendar day
fn day_bounds(date: NaiveDate) -> (String, String) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    (format_timestamp(start), format_timestamp(start + Duration::days(1)))
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn row_to_level_template(row: &SqliteRow) -> AppResult<LevelTemplate> {
    let id_str: String = row.get("id");
    let weeks_json: String = row.get("weeks");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");
    let is_active: i64 = row.get("is_active");

    Ok(LevelTemplate {
        id: parse_uuid(&id_str)?,
        name: row.get("name"),
        is_active: is_active == 1,
        weeks: serde_json::from_str(&weeks_json)?,
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

fn row_to_session_template(row: &SqliteRow) -> AppResult<SessionTemplate> {
    let id_str: String = row.get("id");
    let difficulty: Option<String> = row.get("difficulty");
    let duration_minutes: Option<i64> = row.get("duration_minutes");
    let items_json: String = row.get("items");
    let updated_at_str: String = row.get("updated_at");

    Ok(SessionTemplate {
        id: parse_uuid(&id_str)?,
        title: row.get("title"),
        difficulty: difficulty.as_deref().and_then(Difficulty::parse),
        duration_minutes: duration_minutes.and_then(|m| u32::try_from(m).ok()),
        items: serde_json::from_str(&items_json)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

fn row_to_exercise(row: &SqliteRow) -> AppResult<Exercise> {
    let id_str: String = row.get("id");

    Ok(Exercise {
        id: parse_uuid(&id_str)?,
        name: row.get("name"),
        muscle_group: row.get("muscle_group"),
        equipment: row.get("equipment"),
        video_url: row.get("video_url"),
    })
}

fn row_to_plan_override(row: &SqliteRow) -> AppResult<ClientPlanOverride> {
    let user_id_str: String = row.get("user_id");
    let base_str: String = row.get("base_level_template_id");
    let weeks_json: String = row.get("overrides_by_week");
    let status_str: String = row.get("status");
    let updated_at_str: String = row.get("updated_at");

    Ok(ClientPlanOverride {
        user_id: parse_uuid(&user_id_str)?,
        base_level_template_id: parse_uuid(&base_str)?,
        overrides_by_week: serde_json::from_str(&weeks_json)?,
        status: OverrideStatus::parse(&status_str),
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

fn row_to_session_override(row: &SqliteRow) -> AppResult<SessionOverride> {
    let user_id_str: String = row.get("user_id");
    let session_str: String = row.get("session_template_id");
    let items_json: String = row.get("items");
    let updated_at_str: String = row.get("updated_at");

    Ok(SessionOverride {
        user_id: parse_uuid(&user_id_str)?,
        session_template_id: parse_uuid(&session_str)?,
        items: serde_json::from_str(&items_json)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

fn row_to_subscription(row: &SqliteRow) -> AppResult<Subscription> {
    let id_str: String = row.get("id");
    let user_id_str: String = row.get("user_id");
    let level_str: String = row.get("level_template_id");
    let status_str: String = row.get("status");
    let start_at_str: String = row.get("start_at");
    let end_at_str: String = row.get("end_at");
    let auto_renew: i64 = row.get("auto_renew");
    let history_json: String = row.get("history");
    let created_at_str: String = row.get("created_at");

    Ok(Subscription {
        id: parse_uuid(&id_str)?,
        user_id: parse_uuid(&user_id_str)?,
        level_template_id: parse_uuid(&level_str)?,
        status: SubscriptionStatus::parse(&status_str),
        start_at: parse_timestamp(&start_at_str)?,
        end_at: parse_timestamp(&end_at_str)?,
        auto_renew: auto_renew == 1,
        history: serde_json::from_str(&history_json)?,
        created_at: parse_timestamp(&created_at_str)?,
    })
}

fn row_to_daily_program(row: &SqliteRow) -> AppResult<DailyProgram> {
    let id_str: String = row.get("id");
    let user_id_str: String = row.get("user_id");
    let date_str: String = row.get("date");
    let week_number: Option<i64> = row.get("week_number");
    let calorie_target: Option<i64> = row.get("calorie_target");
    let completed: i64 = row.get("completed");

    Ok(DailyProgram {
        id: parse_uuid(&id_str)?,
        user_id: parse_uuid(&user_id_str)?,
        date: parse_timestamp(&date_str)?,
        week_number: week_number.and_then(|w| u8::try_from(w).ok()),
        session_template_id: parse_optional_uuid(row.get("session_template_id"))?,
        legacy_session_id: parse_optional_uuid(row.get("legacy_session_id"))?,
        calorie_target: calorie_target.and_then(|c| u32::try_from(c).ok()),
        completed: completed == 1,
    })
}

fn row_to_exercise_history(row: &SqliteRow) -> AppResult<ExerciseHistory> {
    let user_id_str: String = row.get("user_id");
    let exercise_str: String = row.get("exercise_id");
    let reps_json: String = row.get("last_reps");
    let sets_json: String = row.get("last_sets");
    let completed_at_str: String = row.get("last_completed_at");
    let status_str: String = row.get("progression_status");

    Ok(ExerciseHistory {
        user_id: parse_uuid(&user_id_str)?,
        exercise_id: parse_uuid(&exercise_str)?,
        last_weight: row.get("last_weight"),
        last_reps: serde_json::from_str(&reps_json)?,
        last_sets: serde_json::from_str(&sets_json)?,
        last_completed_at: parse_timestamp(&completed_at_str)?,
        recommended_next_weight: row.get("recommended_next_weight"),
        progression_status: ProgressionStatus::parse(&status_str),
        total_volume: row.get("total_volume"),
    })
}
