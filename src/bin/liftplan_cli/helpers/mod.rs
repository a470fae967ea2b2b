// ABOUTME: Helper modules for liftplan-cli
// ABOUTME: Set-list parsing and JSON output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod display;
pub mod sets;
