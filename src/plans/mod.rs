// ABOUTME: Plan engine: subscription status, calendar math, validation, resolution and admin writes
// ABOUTME: Services are generic over the `PlanStore` trait and share one store handle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Admin write operations
pub mod admin;
/// Daily and weekly plan resolution
pub mod resolver;
/// Week numbering and day overlay
pub mod schedule;
/// Subscription status and selection
pub mod status;
/// Structural invariant checks
pub mod validation;

pub use admin::{AssignSubscriptionRequest, PinDailyProgramRequest, PlanAdminService};
pub use resolver::{
    DailyResolution, PlanResolver, PlannedDay, PlannedSession, SessionDetail, SessionItemDetail,
    SessionSummary, WeekPlan,
};
pub use status::{LastAction, SubscriptionEnvelope};
