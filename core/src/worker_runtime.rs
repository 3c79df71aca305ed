// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::completion_signaling::CompletionCounter;
use crate::error::{JoinError, SpawnError};
use crate::worker_task::WorkerTask;
use std::future::Future;

/// Trait for abstracting the unit of parallelism (threads, processes)
pub trait WorkerRuntime: Send {
    type Handle: Send;

    /// Name of one unit of execution, used in progress lines
    fn unit(&self) -> &'static str;

    /// Start one worker running `task`.
    ///
    /// The worker's completion token must be taken from `counter` only once
    /// the spawn has succeeded, so a failed spawn is never counted.
    fn spawn(
        &mut self,
        task: WorkerTask,
        counter: &CompletionCounter,
    ) -> Result<Self::Handle, SpawnError>;

    /// Collect the worker after it has signaled completion
    fn join(handle: Self::Handle) -> impl Future<Output = Result<(), JoinError>> + Send;
}
