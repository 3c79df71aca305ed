// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub mod collatz;
pub mod completion_signaling;
pub mod config;
pub mod error;
pub mod fault_injection;
pub mod launcher;
pub mod partitioner;
pub mod thread_runtime;
pub mod worker_runtime;
pub mod worker_spec;
pub mod worker_task;
