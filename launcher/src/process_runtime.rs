// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use collatz_fanout_core::completion_signaling::CompletionCounter;
use collatz_fanout_core::error::{JoinError, SpawnError};
use collatz_fanout_core::worker_runtime::WorkerRuntime;
use collatz_fanout_core::worker_task::{WorkerOutcome, WorkerTask};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::warn;

/// Process-based runtime.
///
/// Each worker is this binary re-executed with `--worker-task <json>`. The
/// parent counts completions itself: one reaper task per child awaits its
/// exit and signals the counter, so children are reaped in exit order.
#[derive(Debug, Clone)]
pub struct ProcessRuntime {
    program: PathBuf,
}

impl ProcessRuntime {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn current_exe() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }
}

impl WorkerRuntime for ProcessRuntime {
    type Handle = JoinHandle<()>;

    fn unit(&self) -> &'static str {
        "proc"
    }

    fn spawn(
        &mut self,
        task: WorkerTask,
        counter: &CompletionCounter,
    ) -> Result<Self::Handle, SpawnError> {
        let index = task.spec().index();
        let task_json =
            serde_json::to_string(&task).map_err(|source| SpawnError::Encode { index, source })?;

        let mut child = Command::new(&self.program)
            .arg("--worker-task")
            .arg(task_json)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SpawnError::Os {
                unit: "proc",
                index,
                source,
            })?;

        let token = counter.token(index);
        Ok(tokio::spawn(async move {
            let outcome = match child.wait().await {
                Ok(status) => WorkerOutcome::from_exit_code(status.code()),
                Err(e) => {
                    warn!(worker = index, "failed to reap child: {}", e);
                    WorkerOutcome::Lost
                }
            };
            println!("Reaped proc {}: {}", index, outcome);
            token.signal(outcome);
        }))
    }

    async fn join(handle: Self::Handle) -> Result<(), JoinError> {
        handle.await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collatz_fanout_core::collatz::DEFAULT_MAX_STEPS;
    use collatz_fanout_core::worker_spec::WorkerSpec;

    #[tokio::test]
    async fn test_missing_program_is_spawn_failure() {
        // Arrange
        let counter = CompletionCounter::new();
        let mut runtime = ProcessRuntime::new("/nonexistent/collatz-fanout-worker");
        let task = WorkerTask::new(WorkerSpec::new(2, 4, 100), DEFAULT_MAX_STEPS);

        // Act
        let result = runtime.spawn(task, &counter);

        // Assert
        let error = result.unwrap_err();
        assert!(matches!(error, SpawnError::Os { index: 2, .. }));
        assert_eq!(counter.completed(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_is_reaped_into_counter() {
        // `true` ignores its arguments and exits 0
        let counter = CompletionCounter::new();
        let mut runtime = ProcessRuntime::new("true");
        let task = WorkerTask::new(WorkerSpec::new(1, 1, 10), DEFAULT_MAX_STEPS);

        let handle = runtime.spawn(task, &counter).unwrap();
        counter.wait_for(1).await;
        ProcessRuntime::join(handle).await.unwrap();

        assert_eq!(counter.completed(), 1);
        assert_eq!(counter.lost(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unexpected_exit_status_is_lost() {
        // `false` exits 1, which is not part of the worker protocol
        let counter = CompletionCounter::new();
        let task = WorkerTask::new(WorkerSpec::new(1, 1, 10), DEFAULT_MAX_STEPS);

        let handle = ProcessRuntime::new("false").spawn(task, &counter).unwrap();
        counter.wait_for(1).await;
        ProcessRuntime::join(handle).await.unwrap();

        assert_eq!(counter.lost(), 1);
    }
}
