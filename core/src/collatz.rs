// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::EvaluationError;

/// Iteration cap used when none is configured.
pub const DEFAULT_MAX_STEPS: u64 = 10_000;

/// Run the 3n+1 sequence from `n` until it reaches 1.
///
/// Returns the number of steps taken. A sequence that needs more than
/// `max_steps` steps, or whose next value does not fit in a `u64`, is
/// reported as a fault instead of looping forever.
pub fn evaluate(n: u64, max_steps: u64) -> Result<u64, EvaluationError> {
    if n == 0 {
        return Err(EvaluationError::ZeroInput);
    }

    let start = n;
    let mut value = n;
    let mut steps = 0;
    while value != 1 {
        if steps == max_steps {
            return Err(EvaluationError::StepLimitExceeded { start, max_steps });
        }
        value = if value % 2 == 0 {
            value / 2
        } else {
            value
                .checked_mul(3)
                .and_then(|tripled| tripled.checked_add(1))
                .ok_or(EvaluationError::Overflow { start, value })?
        };
        steps += 1;
    }
    Ok(steps)
}
