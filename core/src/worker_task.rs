// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::collatz::evaluate;
use crate::worker_spec::WorkerSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Exit status of a worker process whose slice contained faulted values.
pub const WORKER_FAULT_EXIT_CODE: i32 = 3;

/// How a worker finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Every value in the slice reached 1
    Completed,
    /// At least one value hit the iteration cap or overflowed
    Faulted,
    /// The worker ended without reporting (panic, crash, signal)
    Lost,
}

impl WorkerOutcome {
    /// Status a worker process exits with
    pub fn exit_code(self) -> i32 {
        match self {
            WorkerOutcome::Completed => 0,
            WorkerOutcome::Faulted => WORKER_FAULT_EXIT_CODE,
            WorkerOutcome::Lost => 1,
        }
    }

    /// Interpret a reaped child's exit code. `None` means killed by a signal.
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => WorkerOutcome::Completed,
            Some(WORKER_FAULT_EXIT_CODE) => WorkerOutcome::Faulted,
            _ => WorkerOutcome::Lost,
        }
    }
}

impl fmt::Display for WorkerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerOutcome::Completed => write!(f, "completed"),
            WorkerOutcome::Faulted => write!(f, "faulted"),
            WorkerOutcome::Lost => write!(f, "lost"),
        }
    }
}

/// Unit of work handed to a thread or a child process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerTask {
    spec: WorkerSpec,
    max_steps: u64,
}

impl WorkerTask {
    pub fn new(spec: WorkerSpec, max_steps: u64) -> Self {
        Self { spec, max_steps }
    }

    pub fn spec(&self) -> &WorkerSpec {
        &self.spec
    }

    /// Evaluate every value in the slice. A fault does not stop the worker.
    pub fn run(self) -> WorkerOutcome {
        let index = self.spec.index();
        let mut evaluated = 0u64;
        let mut faults = 0u64;

        for n in self.spec.slice() {
            evaluated += 1;
            if let Err(e) = evaluate(n, self.max_steps) {
                if faults == 0 {
                    warn!(worker = index, "{}", e);
                }
                faults += 1;
            }
        }

        if faults > 0 {
            warn!(
                worker = index,
                evaluated, faults, "worker finished with faulted values"
            );
            WorkerOutcome::Faulted
        } else {
            debug!(worker = index, evaluated, "worker finished");
            WorkerOutcome::Completed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collatz::DEFAULT_MAX_STEPS;

    #[test]
    fn test_run_completes_clean_slice() {
        // Arrange
        let task = WorkerTask::new(WorkerSpec::new(1, 2, 1_000), DEFAULT_MAX_STEPS);

        // Act
        let outcome = task.run();

        // Assert
        assert_eq!(outcome, WorkerOutcome::Completed);
    }

    #[test]
    fn test_run_faults_but_finishes_slice() {
        // 27 needs 111 steps; everything else below 30 needs far fewer than 100
        let task = WorkerTask::new(WorkerSpec::new(1, 1, 30), 100);
        assert_eq!(task.run(), WorkerOutcome::Faulted);
    }

    #[test]
    fn test_empty_slice_completes() {
        let task = WorkerTask::new(WorkerSpec::new(4, 4, 1), DEFAULT_MAX_STEPS);
        assert_eq!(task.run(), WorkerOutcome::Completed);
    }

    #[test]
    fn test_exit_code_protocol() {
        assert_eq!(WorkerOutcome::from_exit_code(Some(0)), WorkerOutcome::Completed);
        assert_eq!(
            WorkerOutcome::from_exit_code(Some(WorkerOutcome::Faulted.exit_code())),
            WorkerOutcome::Faulted
        );
        assert_eq!(WorkerOutcome::from_exit_code(Some(101)), WorkerOutcome::Lost);
        assert_eq!(WorkerOutcome::from_exit_code(None), WorkerOutcome::Lost);
    }
}
