// ABOUTME: Daily program pins that force a specific day's content for one user
// ABOUTME: A pinned row short-circuits subscription/template resolution for its date
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Explicit per-user per-date assignment (unique per user and calendar day)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgram {
    /// Unique identifier
    pub id: Uuid,
    /// Pinned user
    pub user_id: Uuid,
    /// Day of the pin; may carry time-of-day noise from the writer
    pub date: DateTime<Utc>,
    /// Week number shown alongside the pinned session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_number: Option<u8>,
    /// Pinned session template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_template_id: Option<Uuid>,
    /// Single-session reference written by older clients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_session_id: Option<Uuid>,
    /// Calorie target for the day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calorie_target: Option<u32>,
    /// Whether the user completed the day
    #[serde(default)]
    pub completed: bool,
}

impl DailyProgram {
    /// Session pinned for the day, preferring the current field over the legacy one
    #[must_use]
    pub fn pinned_session_id(&self) -> Option<Uuid> {
        self.session_template_id.or(self.legacy_session_id)
    }

    /// Calendar day this pin applies to
    #[must_use]
    pub fn calendar_date(&self) -> NaiveDate {
        self.date.date_naive()
    }
}
