// ABOUTME: Crate-level error surface for the plan engine
// ABOUTME: Re-exports the shared error types so services and stores use one `AppError`
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! Error codes, `AppError` and the domain `PlanError` live in `liftplan-core`
//! so the model crate can return them too. This module re-exports them under
//! the path services import from.

pub use liftplan_core::errors::{AppError, AppResult, ErrorCode, ErrorContext, PlanError};
