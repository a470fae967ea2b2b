// ABOUTME: Subscription status state machine, selection query and last-action lookup
// ABOUTME: Effective status is a pure function of stored status, end date and the clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Subscription Status
//!
//! Expiry is lazy: nothing ever writes `EXPIRED` back to the store. Every read
//! path derives the effective status from `(status, end_at, now)`.

use chrono::{DateTime, NaiveDate, Utc};
use liftplan_core::constants::subscription::EXPIRING_SOON_DAYS;
use liftplan_core::models::{EffectiveStatus, Subscription, SubscriptionStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whole calendar days from `now`'s date to `end_at`'s date; negative once past
#[must_use]
pub fn days_remaining(end_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    calendar_days_between(now.date_naive(), end_at.date_naive())
}

/// Signed day difference `to - from` between two calendar dates
#[must_use]
pub fn calendar_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Effective status of a subscription at `now`
#[must_use]
pub fn effective_status(
    status: SubscriptionStatus,
    end_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> EffectiveStatus {
    if status == SubscriptionStatus::Canceled {
        return EffectiveStatus::Canceled;
    }
    if now >= end_at {
        return EffectiveStatus::Expired;
    }
    let remaining = days_remaining(end_at, now);
    if (0..=EXPIRING_SOON_DAYS).contains(&remaining) {
        EffectiveStatus::ExpiringSoon
    } else {
        EffectiveStatus::Active
    }
}

/// Pick the subscription that drives a user's plan.
///
/// Prefers a stored-`ACTIVE` subscription that has not ended (latest `end_at`
/// when several qualify); otherwise falls back to the latest-ending one of any
/// status so lapsed users still see their most recent plan.
#[must_use]
pub fn select_subscription(
    subscriptions: &[Subscription],
    now: DateTime<Utc>,
) -> Option<&Subscription> {
    subscriptions
        .iter()
        .filter(|s| s.status == SubscriptionStatus::Active && s.end_at > now)
        .max_by_key(|s| s.end_at)
        .or_else(|| subscriptions.iter().max_by_key(|s| s.end_at))
}

/// Most recent ledger action, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastAction {
    /// `ASSIGN`, `RENEW`, `UPGRADE` or `CANCELED`
    pub action: String,
    /// When it happened
    pub date: DateTime<Utc>,
    /// Admin note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Normalized subscription view returned with every resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionEnvelope {
    /// Subscription identifier
    pub subscription_id: Uuid,
    /// Granted level template
    pub level_template_id: Uuid,
    /// Level template name when it still resolves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_name: Option<String>,
    /// Computed status
    pub status: EffectiveStatus,
    /// Period start
    pub start_at: DateTime<Utc>,
    /// Period end
    pub end_at: DateTime<Utc>,
    /// Calendar days until `end_at`
    pub days_remaining: i64,
    /// Auto-renew flag
    pub auto_renew: bool,
    /// Latest history entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action: Option<LastAction>,
}

impl SubscriptionEnvelope {
    /// Build the envelope for `subscription` at `now`
    #[must_use]
    pub fn build(
        subscription: &Subscription,
        level_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            subscription_id: subscription.id,
            level_template_id: subscription.level_template_id,
            level_name,
            status: effective_status(subscription.status, subscription.end_at, now),
            start_at: subscription.start_at,
            end_at: subscription.end_at,
            days_remaining: days_remaining(subscription.end_at, now),
            auto_renew: subscription.auto_renew,
            last_action: last_action(subscription),
        }
    }
}

/// Latest history entry by date, with its display label
#[must_use]
pub fn last_action(subscription: &Subscription) -> Option<LastAction> {
    subscription.last_history_entry().map(|entry| LastAction {
        action: entry.action.display_label().to_owned(),
        date: entry.date,
        note: entry.note.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use liftplan_core::models::{HistoryAction, HistoryEntry};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 15, 30, 0).unwrap()
    }

    fn subscription(status: SubscriptionStatus, end_at: DateTime<Utc>) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            level_template_id: Uuid::new_v4(),
            status,
            start_at: end_at - Duration::days(35),
            end_at,
            auto_renew: false,
            history: Vec::new(),
            created_at: end_at - Duration::days(35),
        }
    }

    #[test]
    fn test_expiring_soon_at_seven_day_boundary() {
        let status = effective_status(
            SubscriptionStatus::Active,
            now() + Duration::days(7),
            now(),
        );
        assert_eq!(status, EffectiveStatus::ExpiringSoon);
    }

    #[test]
    fn test_active_beyond_seven_days() {
        let status = effective_status(
            SubscriptionStatus::Active,
            now() + Duration::days(8),
            now(),
        );
        assert_eq!(status, EffectiveStatus::Active);
    }

    #[test]
    fn test_expired_one_second_after_end() {
        let status = effective_status(
            SubscriptionStatus::Active,
            now() - Duration::seconds(1),
            now(),
        );
        assert_eq!(status, EffectiveStatus::Expired);
        assert_eq!(days_remaining(now() - Duration::seconds(1), now()), 0);
    }

    #[test]
    fn test_expiring_soon_later_the_same_day() {
        let status = effective_status(
            SubscriptionStatus::Active,
            now() + Duration::hours(2),
            now(),
        );
        assert_eq!(status, EffectiveStatus::ExpiringSoon);
    }

    #[test]
    fn test_canceled_is_authoritative() {
        for end_at in [now() + Duration::days(90), now() - Duration::days(90)] {
            assert_eq!(
                effective_status(SubscriptionStatus::Canceled, end_at, now()),
                EffectiveStatus::Canceled
            );
        }
    }

    #[test]
    fn test_days_remaining_negative_when_past() {
        assert_eq!(days_remaining(now() - Duration::days(3), now()), -3);
    }

    #[test]
    fn test_select_prefers_running_active_subscription() {
        let running = subscription(SubscriptionStatus::Active, now() + Duration::days(10));
        let later_canceled = subscription(SubscriptionStatus::Canceled, now() + Duration::days(60));
        let subs = vec![later_canceled, running.clone()];

        assert_eq!(select_subscription(&subs, now()).map(|s| s.id), Some(running.id));
    }

    #[test]
    fn test_select_falls_back_to_latest_end() {
        let old = subscription(SubscriptionStatus::Expired, now() - Duration::days(60));
        let recent = subscription(SubscriptionStatus::Canceled, now() - Duration::days(5));
        let subs = vec![recent.clone(), old];

        let selected = select_subscription(&subs, now()).unwrap();
        assert_eq!(selected.id, recent.id);
        assert_eq!(
            effective_status(selected.status, selected.end_at, now()),
            EffectiveStatus::Canceled
        );
    }

    #[test]
    fn test_select_none_without_subscriptions() {
        assert!(select_subscription(&[], now()).is_none());
    }

    #[test]
    fn test_last_action_uses_latest_date_not_insertion_order() {
        let mut sub = subscription(SubscriptionStatus::Active, now() + Duration::days(20));
        sub.history = vec![
            HistoryEntry {
                action: HistoryAction::ChangeLevel,
                from_level_template_id: None,
                to_level_template_id: None,
                date: now() - Duration::days(1),
                admin_id: None,
                note: Some("moved up".to_owned()),
            },
            HistoryEntry {
                action: HistoryAction::Assign,
                from_level_template_id: None,
                to_level_template_id: None,
                date: now() - Duration::days(30),
                admin_id: None,
                note: None,
            },
        ];

        let action = last_action(&sub).unwrap();
        assert_eq!(action.action, "UPGRADE");
        assert_eq!(action.note.as_deref(), Some("moved up"));
    }
}
