// ABOUTME: Parser for the --sets argument of the complete command
// ABOUTME: Turns "60:12,60:12,62.5:10" into completed set logs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{anyhow, bail, Context, Result};
use liftplan::models::SetLog;

/// Parse comma-separated `weight:reps` pairs into completed sets
pub fn parse_sets(input: &str) -> Result<Vec<SetLog>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (weight, reps) = part
                .split_once(':')
                .ok_or_else(|| anyhow!("Set '{part}' is not in weight:reps form"))?;
            let weight: f64 = weight
                .trim()
                .parse()
                .with_context(|| format!("Invalid weight in set '{part}'"))?;
            if !weight.is_finite() || weight < 0.0 {
                bail!("Weight in set '{part}' must be a finite load of 0 or more");
            }
            let reps: u32 = reps
                .trim()
                .parse()
                .with_context(|| format!("Invalid reps in set '{part}'"))?;
            Ok(SetLog::done(weight, reps))
        })
        .collect()
}
