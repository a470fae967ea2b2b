// ABOUTME: Application-wide constants for plan shape, subscription windows and progression
// ABOUTME: Single source of truth for the numeric invariants enforced across the engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Level template shape constraints
pub mod plan {
    /// Number of weeks in every level template and client plan override
    pub const WEEKS_PER_PLAN: u8 = 5;

    /// Minimum placements across the seven days of an edited week
    pub const MIN_SESSIONS_PER_WEEK: usize = 4;

    /// Maximum placements across the seven days of an edited week
    pub const MAX_SESSIONS_PER_WEEK: usize = 7;

    /// Maximum alternative exercises per session item
    pub const MAX_ALTERNATIVES: usize = 3;

    /// Days per plan week, used for week number arithmetic
    pub const DAYS_PER_WEEK: i64 = 7;
}

/// Subscription status computation
pub mod subscription {
    /// A subscription ending within this many calendar days is `EXPIRING_SOON`
    pub const EXPIRING_SOON_DAYS: i64 = 7;
}

/// Progression evaluation
pub mod progression {
    /// Fixed weight increment (kg) recommended after a fully passed exercise
    pub const WEIGHT_STEP_KG: f64 = 2.0;
}

/// Service identifiers used in structured logs
pub mod service_names {
    /// Default service name
    pub const LIFTPLAN: &str = "liftplan";
}
