// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::worker_task::WorkerOutcome;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::warn;

#[derive(Debug, Default)]
struct Shared {
    completed: AtomicUsize,
    faulted: AtomicUsize,
    lost: AtomicUsize,
    notify: Notify,
}

/// Shared count of workers that have finished.
///
/// Cloning shares the same counters. Only ever incremented, once per worker,
/// through a [`CompletionToken`].
#[derive(Debug, Clone, Default)]
pub struct CompletionCounter {
    shared: Arc<Shared>,
}

impl CompletionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for a worker that is now running
    pub fn token(&self, worker_index: u64) -> CompletionToken {
        CompletionToken {
            worker_index,
            shared: Some(self.shared.clone()),
        }
    }

    /// Workers that have signaled, whatever their outcome
    pub fn completed(&self) -> usize {
        self.shared.completed.load(Ordering::Acquire)
    }

    pub fn faulted(&self) -> usize {
        self.shared.faulted.load(Ordering::Acquire)
    }

    pub fn lost(&self) -> usize {
        self.shared.lost.load(Ordering::Acquire)
    }

    /// Block until at least `target` workers have signaled
    pub async fn wait_for(&self, target: usize) {
        loop {
            // Created before the check; a signal landing in between leaves a
            // permit behind, so the await below returns immediately.
            let notified = self.shared.notify.notified();
            if self.completed() >= target {
                return;
            }
            notified.await;
        }
    }
}

/// One-shot completion signal owned by a single worker.
///
/// Dropping a token that was never signaled records the worker as lost, so
/// a panicking worker still releases the barrier.
#[derive(Debug)]
pub struct CompletionToken {
    worker_index: u64,
    shared: Option<Arc<Shared>>,
}

impl CompletionToken {
    pub fn signal(mut self, outcome: WorkerOutcome) {
        self.record(outcome);
    }

    fn record(&mut self, outcome: WorkerOutcome) {
        let Some(shared) = self.shared.take() else {
            return;
        };
        match outcome {
            WorkerOutcome::Completed => {}
            WorkerOutcome::Faulted => {
                shared.faulted.fetch_add(1, Ordering::AcqRel);
            }
            WorkerOutcome::Lost => {
                shared.lost.fetch_add(1, Ordering::AcqRel);
            }
        }
        shared.completed.fetch_add(1, Ordering::AcqRel);
        shared.notify.notify_one();
    }
}

impl Drop for CompletionToken {
    fn drop(&mut self) {
        if self.shared.is_some() {
            warn!(worker = self.worker_index, "worker ended without signaling");
            self.record(WorkerOutcome::Lost);
        }
    }
}
