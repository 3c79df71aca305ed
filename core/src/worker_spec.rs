// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::partitioner::{next_slice, Slice};
use serde::{Deserialize, Serialize};

/// Identity of one worker's share of the range.
///
/// Built once per worker before launch and moved into that worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSpec {
    index: u64,
    stride: u64,
    limit: u64,
}

impl WorkerSpec {
    pub fn new(index: u64, stride: u64, limit: u64) -> Self {
        Self {
            index,
            stride,
            limit,
        }
    }

    /// 1-based worker index
    pub fn index(&self) -> u64 {
        self.index
    }

    /// The values this worker owns
    pub fn slice(&self) -> Slice {
        next_slice(self.index, self.stride, self.limit)
    }
}
