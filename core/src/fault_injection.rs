// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::completion_signaling::CompletionCounter;
use crate::error::{JoinError, SpawnError};
use crate::worker_runtime::WorkerRuntime;
use crate::worker_task::WorkerTask;
use rand::Rng;

/// Configuration for simulated spawn failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultConfig {
    /// Probability (0-100) that any spawn fails
    pub spawn_failure_probability: u32,
    /// Worker indices whose spawn always fails
    pub failing_workers: Vec<u64>,
}

impl FaultConfig {
    pub fn is_enabled(&self) -> bool {
        self.spawn_failure_probability > 0 || !self.failing_workers.is_empty()
    }

    fn should_fail(&self, index: u64) -> bool {
        if self.failing_workers.contains(&index) {
            return true;
        }
        self.spawn_failure_probability > 0
            && rand::rng().random_range(0..100) < self.spawn_failure_probability
    }
}

/// Wraps a runtime and rejects some spawns before they reach the OS
#[derive(Debug, Clone)]
pub struct FaultInjectingRuntime<R> {
    inner: R,
    faults: FaultConfig,
}

impl<R> FaultInjectingRuntime<R> {
    pub fn new(inner: R, faults: FaultConfig) -> Self {
        Self { inner, faults }
    }
}

impl<R: WorkerRuntime> WorkerRuntime for FaultInjectingRuntime<R> {
    type Handle = R::Handle;

    fn unit(&self) -> &'static str {
        self.inner.unit()
    }

    fn spawn(
        &mut self,
        task: WorkerTask,
        counter: &CompletionCounter,
    ) -> Result<Self::Handle, SpawnError> {
        let index = task.spec().index();
        if self.faults.should_fail(index) {
            return Err(SpawnError::Injected { index });
        }
        self.inner.spawn(task, counter)
    }

    async fn join(handle: Self::Handle) -> Result<(), JoinError> {
        R::join(handle).await
    }
}
