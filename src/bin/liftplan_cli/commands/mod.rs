// ABOUTME: Command modules for liftplan-cli
// ABOUTME: Plan queries and completions, plus demo data seeding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod plan;
pub mod seed;
