// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the fan-out run.

use thiserror::Error;

/// Exit status for a malformed command line.
pub const USAGE_EXIT_CODE: u8 = 1;

/// Exit status for a well-formed command line with invalid values.
pub const VALIDATION_EXIT_CODE: u8 = 2;

/// Errors that stop a run before any worker is launched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FanoutError {
    /// Wrong argument count, missing or unknown spawn mode.
    #[error("{0}")]
    Usage(String),

    /// Worker count or limit is not a positive integer.
    #[error("incorrect {field}: {value:?} ({reason})")]
    Validation {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl FanoutError {
    pub fn exit_code(&self) -> u8 {
        match self {
            FanoutError::Usage(_) => USAGE_EXIT_CODE,
            FanoutError::Validation { .. } => VALIDATION_EXIT_CODE,
        }
    }
}

/// A worker could not be started. The run continues without it.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to spawn {unit} for worker {index}: {source}")]
    Os {
        unit: &'static str,
        index: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode task for worker {index}: {source}")]
    Encode {
        index: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("spawn of worker {index} rejected by fault injection")]
    Injected { index: u64 },
}

impl SpawnError {
    pub fn worker_index(&self) -> u64 {
        match self {
            SpawnError::Os { index, .. }
            | SpawnError::Encode { index, .. }
            | SpawnError::Injected { index } => *index,
        }
    }
}

/// A Collatz evaluation that could not reach 1.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("sequence from {start} did not reach 1 within {max_steps} steps")]
    StepLimitExceeded { start: u64, max_steps: u64 },

    #[error("sequence from {start} overflowed u64 at {value}")]
    Overflow { start: u64, value: u64 },

    #[error("sequence from 0 never reaches 1")]
    ZeroInput,
}

/// Failure while collecting a worker handle after the barrier.
#[derive(Debug, Error)]
pub enum JoinError {
    #[error("worker {unit} panicked")]
    Panicked { unit: &'static str },

    #[error("join task failed: {0}")]
    Runtime(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        // Arrange
        let usage = FanoutError::Usage("missing mode".to_string());
        let validation = FanoutError::Validation {
            field: "worker count",
            value: "0".to_string(),
            reason: "must be positive",
        };

        // Assert
        assert_eq!(usage.exit_code(), USAGE_EXIT_CODE);
        assert_eq!(validation.exit_code(), VALIDATION_EXIT_CODE);
        assert_ne!(usage.exit_code(), validation.exit_code());
    }

    #[test]
    fn test_validation_message_names_field_and_value() {
        let error = FanoutError::Validation {
            field: "N",
            value: "abc".to_string(),
            reason: "not a number",
        };
        assert_eq!(error.to_string(), "incorrect N: \"abc\" (not a number)");
    }

    #[test]
    fn test_spawn_error_reports_worker_index() {
        let error = SpawnError::Os {
            unit: "thread",
            index: 7,
            source: std::io::Error::other("out of resources"),
        };
        assert_eq!(error.worker_index(), 7);
        assert_eq!(SpawnError::Injected { index: 3 }.worker_index(), 3);
    }
}
