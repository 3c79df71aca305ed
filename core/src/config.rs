// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::collatz::DEFAULT_MAX_STEPS;
use crate::error::FanoutError;
use std::fmt;

/// Largest accepted worker count. Every worker is an OS thread or process.
pub const MAX_WORKERS: usize = 4096;

/// Unit of parallelism used for the workers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMode {
    Threads,
    Procs,
}

impl fmt::Display for SpawnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnMode::Threads => write!(f, "Threads"),
            SpawnMode::Procs => write!(f, "Processes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: SpawnMode,
    pub workers: usize,
    /// Exclusive upper bound of the range
    pub limit: u64,
    /// Iteration cap per evaluated value
    pub max_steps: u64,
}

impl RunConfig {
    /// Validate raw command-line values. Non-numeric or zero counts are errors,
    /// as is a worker count above [`MAX_WORKERS`].
    pub fn parse(mode: SpawnMode, workers: &str, limit: &str) -> Result<Self, FanoutError> {
        let workers = parse_positive::<usize>("worker count", workers)?;
        if workers > MAX_WORKERS {
            return Err(FanoutError::Validation {
                field: "worker count",
                value: workers.to_string(),
                reason: "exceeds 4096",
            });
        }
        let limit = parse_positive::<u64>("N", limit)?;
        Ok(Self {
            mode,
            workers,
            limit,
            max_steps: DEFAULT_MAX_STEPS,
        })
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn print_summary(&self) {
        println!("=== COLLATZ FAN-OUT ({}) ===", self.mode);
        println!("Configuration:");
        println!("  - Workers: {}", self.workers);
        println!("  - Range: [0, {})", self.limit);
        println!("  - Max steps per value: {}", self.max_steps);
    }
}

fn parse_positive<T>(field: &'static str, raw: &str) -> Result<T, FanoutError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    let value: T = raw.trim().parse().map_err(|_| FanoutError::Validation {
        field,
        value: raw.to_string(),
        reason: "not a non-negative integer",
    })?;
    if value == T::default() {
        return Err(FanoutError::Validation {
            field,
            value: raw.to_string(),
            reason: "must be greater than zero",
        });
    }
    Ok(value)
}
