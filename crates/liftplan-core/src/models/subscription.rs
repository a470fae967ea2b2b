// ABOUTME: Subscription ledger models granting a user a level template for a bounded period
// ABOUTME: Stored status, computed effective status, and the append-only action history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse, manually-set status persisted on a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    /// Granted
    Active,
    /// Marked expired by an admin
    Expired,
    /// Canceled; terminal
    Canceled,
}

impl SubscriptionStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Canceled => "CANCELED",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "ACTIVE" => Self::Active,
            "CANCELED" => Self::Canceled,
            _ => Self::Expired,
        }
    }
}

/// Status derived at read time from stored status, `end_at` and the clock.
/// Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectiveStatus {
    /// More than the warning window remains
    Active,
    /// Ends within the warning window
    ExpiringSoon,
    /// `end_at` has passed
    Expired,
    /// Stored status is canceled
    Canceled,
}

/// Ledger action recorded in a subscription's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// First grant
    Assign,
    /// Period extended
    Renew,
    /// Moved to a different level template
    ChangeLevel,
    /// Canceled
    Cancel,
}

impl HistoryAction {
    /// Label shown to the user as the subscription's last action
    #[must_use]
    pub const fn display_label(self) -> &'static str {
        match self {
            Self::Assign => "ASSIGN",
            Self::Renew => "RENEW",
            Self::ChangeLevel => "UPGRADE",
            Self::Cancel => "CANCELED",
        }
    }
}

/// One append-only ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// What happened
    pub action: HistoryAction,
    /// Level before a change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_level_template_id: Option<Uuid>,
    /// Level after a change or assignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_level_template_id: Option<Uuid>,
    /// When it happened
    pub date: DateTime<Utc>,
    /// Admin who performed it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<Uuid>,
    /// Free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Time-bounded grant of a level template to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Unique identifier
    pub id: Uuid,
    /// Subscriber
    pub user_id: Uuid,
    /// Granted level template
    pub level_template_id: Uuid,
    /// Stored (coarse) status
    pub status: SubscriptionStatus,
    /// Period start
    pub start_at: DateTime<Utc>,
    /// Period end
    pub end_at: DateTime<Utc>,
    /// Whether billing renews automatically
    pub auto_renew: bool,
    /// Append-only action history, not guaranteed to be date-ordered
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// History entry with the latest `date`
    #[must_use]
    pub fn last_history_entry(&self) -> Option<&HistoryEntry> {
        self.history.iter().max_by_key(|entry| entry.date)
    }
}
