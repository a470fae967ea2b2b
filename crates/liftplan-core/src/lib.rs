// ABOUTME: Core types and constants for the Liftplan training plan engine
// ABOUTME: Foundation crate with error handling, plan/subscription models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Liftplan Core
//!
//! Foundation crate providing shared types and constants for the Liftplan
//! training plan engine. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `PlanError`
//! - **constants**: Plan shape, subscription window and progression constants
//! - **models**: Templates, overrides, subscriptions, daily pins and exercise history

/// Unified error handling system with standard error codes and HTTP status mapping
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (templates, overrides, subscriptions, history)
pub mod models;
