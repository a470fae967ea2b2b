// ABOUTME: Configuration management module for runtime settings
// ABOUTME: Environment-driven server configuration shared by the CLI and embedding services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment and server configuration
pub mod environment;

pub use environment::{DatabaseConfig, DatabaseUrl, Environment, LogLevel, ServerConfig};
