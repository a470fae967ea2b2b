// ABOUTME: Core data models for training plans, overrides, subscriptions and history
// ABOUTME: Shared by the resolver, progression evaluator, admin service and stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Document-shaped entities of the training plan engine. Field names serialize
//! in camelCase for the HTTP layer.

/// Daily program pins
pub mod daily;
/// Exercise catalog entries
pub mod exercise;
/// Client plan and session overrides
pub mod overrides;
/// Exercise history and set logs
pub mod progress;
/// Subscription ledger
pub mod subscription;
/// Level and session templates
pub mod template;

pub use daily::DailyProgram;
pub use exercise::Exercise;
pub use overrides::{ClientPlanOverride, DayOverride, OverrideStatus, SessionOverride, WeekOverride};
pub use progress::{ExerciseHistory, ProgressionStatus, SetLog};
pub use subscription::{
    EffectiveStatus, HistoryAction, HistoryEntry, Subscription, SubscriptionStatus,
};
pub use template::{
    DayKey, DayMap, Difficulty, LevelTemplate, Placement, ProgressionRule, RuleAction,
    RuleCondition, SessionItem, SessionTemplate, TargetReps, WeekTemplate,
};
