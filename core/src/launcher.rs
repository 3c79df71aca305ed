// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::completion_signaling::CompletionCounter;
use crate::config::RunConfig;
use crate::worker_runtime::WorkerRuntime;
use crate::worker_spec::WorkerSpec;
use crate::worker_task::WorkerTask;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Lifecycle of one fan-out run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Idle,
    Launching,
    Running,
    Draining,
    Done,
}

/// What a finished run observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    pub requested: usize,
    pub spawned: usize,
    /// Indices of workers that never started
    pub spawn_failures: Vec<u64>,
    /// Completion signals received, whatever the outcome
    pub completed: usize,
    pub faulted: usize,
    pub lost: usize,
    pub elapsed: Duration,
}

impl LaunchReport {
    pub fn print_summary(&self) {
        println!(
            "Completed: {}/{} workers (faulted: {}, lost: {}, spawn failures: {})",
            self.completed,
            self.requested,
            self.faulted,
            self.lost,
            self.spawn_failures.len()
        );
        println!("Total time: {:.2}s", self.elapsed.as_secs_f64());
    }
}

/// Fans a range out to `W` workers and waits for all of them.
///
/// Generic over the unit of parallelism. The barrier target is the number of
/// workers that actually started, so a failed spawn never blocks the parent.
pub struct Launcher<R: WorkerRuntime> {
    runtime: R,
    state: LaunchState,
    counter: CompletionCounter,
}

impl<R: WorkerRuntime> Launcher<R> {
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            state: LaunchState::Idle,
            counter: CompletionCounter::new(),
        }
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    fn transition(&mut self, next: LaunchState) {
        debug!(from = ?self.state, to = ?next, "launcher state");
        self.state = next;
    }

    pub async fn run(&mut self, config: &RunConfig) -> LaunchReport {
        let start = Instant::now();
        self.counter = CompletionCounter::new();
        self.transition(LaunchState::Launching);

        let unit = self.runtime.unit();
        let stride = config.workers as u64;
        let mut handles = Vec::new();
        let mut spawn_failures = Vec::new();

        for index in 1..=stride {
            let task = WorkerTask::new(
                WorkerSpec::new(index, stride, config.limit),
                config.max_steps,
            );
            match self.runtime.spawn(task, &self.counter) {
                Ok(handle) => {
                    println!("Spawn {} {}... done!", unit, index);
                    handles.push(handle);
                }
                Err(e) => {
                    println!("Spawn {} {}... failed!", unit, index);
                    warn!("{}", e);
                    spawn_failures.push(e.worker_index());
                }
            }
        }
        self.transition(LaunchState::Running);

        let target = handles.len();
        if !spawn_failures.is_empty() {
            warn!(
                requested = config.workers,
                target, "waiting only for the workers that started"
            );
        }
        self.transition(LaunchState::Draining);
        self.counter.wait_for(target).await;

        for handle in handles {
            if let Err(e) = R::join(handle).await {
                warn!("{}", e);
            }
        }
        self.transition(LaunchState::Done);

        LaunchReport {
            requested: config.workers,
            spawned: target,
            spawn_failures,
            completed: self.counter.completed(),
            faulted: self.counter.faulted(),
            lost: self.counter.lost(),
            elapsed: start.elapsed(),
        }
    }
}
