// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::completion_signaling::CompletionCounter;
use crate::error::{JoinError, SpawnError};
use crate::worker_runtime::WorkerRuntime;
use crate::worker_task::WorkerTask;
use std::thread::{self, JoinHandle};

/// Thread-based runtime. Workers share the parent's address space and
/// signal the shared counter themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRuntime;

impl WorkerRuntime for ThreadRuntime {
    type Handle = JoinHandle<()>;

    fn unit(&self) -> &'static str {
        "thread"
    }

    fn spawn(
        &mut self,
        task: WorkerTask,
        counter: &CompletionCounter,
    ) -> Result<Self::Handle, SpawnError> {
        let index = task.spec().index();
        let counter = counter.clone();
        thread::Builder::new()
            .name(format!("collatz-worker-{}", index))
            .spawn(move || {
                let token = counter.token(index);
                token.signal(task.run());
            })
            .map_err(|source| SpawnError::Os {
                unit: "thread",
                index,
                source,
            })
    }

    async fn join(handle: Self::Handle) -> Result<(), JoinError> {
        tokio::task::spawn_blocking(move || {
            handle
                .join()
                .map_err(|_| JoinError::Panicked { unit: "thread" })
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collatz::DEFAULT_MAX_STEPS;
    use crate::worker_spec::WorkerSpec;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_thread_worker_signals_and_joins() {
        // Arrange
        let counter = CompletionCounter::new();
        let mut runtime = ThreadRuntime;
        let task = WorkerTask::new(WorkerSpec::new(1, 1, 100), DEFAULT_MAX_STEPS);

        // Act
        let handle = runtime.spawn(task, &counter).unwrap();
        counter.wait_for(1).await;
        let joined = ThreadRuntime::join(handle).await;

        // Assert
        assert!(joined.is_ok());
        assert_eq!(counter.completed(), 1);
        assert_eq!(counter.faulted(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_thread_worker_reports_fault() {
        let counter = CompletionCounter::new();
        let task = WorkerTask::new(WorkerSpec::new(1, 1, 30), 100);

        let handle = ThreadRuntime.spawn(task, &counter).unwrap();
        counter.wait_for(1).await;
        ThreadRuntime::join(handle).await.unwrap();

        assert_eq!(counter.faulted(), 1);
    }
}
