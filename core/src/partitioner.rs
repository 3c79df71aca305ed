// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Striped partitioning of the range `[0, limit)`.
//!
//! Worker `i` of `W` owns `i, i + W, i + 2W, ...` below `limit`. Workers
//! `1..=W` together cover `[1, limit)` exactly once. The value `0` is owned
//! by nobody and is never evaluated.

use std::iter::FusedIterator;

/// Lazy sequence of the values owned by one worker.
///
/// A slice is consumed once by its owning worker and cannot be restarted.
#[derive(Debug)]
pub struct Slice {
    next: u64,
    stride: u64,
    limit: u64,
}

/// Build the slice for `worker_index` when the range is split `stride` ways.
///
/// A `stride` of 0 is treated as 1.
pub fn next_slice(worker_index: u64, stride: u64, limit: u64) -> Slice {
    Slice {
        next: worker_index,
        stride: stride.max(1),
        limit,
    }
}

impl Iterator for Slice {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next >= self.limit {
            return None;
        }
        let current = self.next;
        // Past u64::MAX there is nothing left below limit
        self.next = current.checked_add(self.stride).unwrap_or(self.limit);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next >= self.limit {
            0
        } else {
            (self.limit - 1 - self.next) / self.stride + 1
        };
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Slice {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_slice_strides_from_index() {
        // Act
        let values: Vec<u64> = next_slice(2, 3, 12).collect();

        // Assert
        assert_eq!(values, vec![2, 5, 8, 11]);
    }

    #[test]
    fn test_slice_excludes_limit() {
        let values: Vec<u64> = next_slice(1, 2, 7).collect();
        assert_eq!(values, vec![1, 3, 5]);
    }

    #[test]
    fn test_empty_when_index_reaches_limit() {
        assert_eq!(next_slice(5, 8, 5).count(), 0);
        assert_eq!(next_slice(1, 1, 0).count(), 0);
        assert_eq!(next_slice(1, 4, 1).count(), 0);
    }

    #[test]
    fn test_single_worker_owns_everything_but_zero() {
        let values: Vec<u64> = next_slice(1, 1, 6).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_zero_stride_behaves_as_one() {
        let values: Vec<u64> = next_slice(3, 0, 6).collect();
        assert_eq!(values, vec![3, 4, 5]);
    }

    #[test]
    fn test_slice_stops_before_overflow() {
        // Arrange
        let start = u64::MAX - 2;

        // Act
        let values: Vec<u64> = next_slice(start, 2, u64::MAX).collect();

        // Assert
        assert_eq!(values, vec![u64::MAX - 2]);
    }

    #[test]
    fn test_size_hint_is_exact() {
        let mut slice = next_slice(3, 4, 20);
        assert_eq!(slice.size_hint(), (5, Some(5)));
        slice.next();
        assert_eq!(slice.size_hint(), (4, Some(4)));
        assert_eq!(slice.count(), 4);
    }

    #[test]
    fn test_slice_is_fused() {
        let mut slice = next_slice(1, 2, 3);
        assert_eq!(slice.next(), Some(1));
        assert_eq!(slice.next(), None);
        assert_eq!(slice.next(), None);
    }

    proptest! {
        #[test]
        fn prop_workers_partition_range_without_gaps_or_overlap(
            workers in 1u64..=64,
            limit in 1u64..=2_000,
        ) {
            let mut seen = BTreeSet::new();
            let mut total = 0u64;
            for index in 1..=workers {
                for value in next_slice(index, workers, limit) {
                    prop_assert!(seen.insert(value), "value {} owned twice", value);
                    total += 1;
                }
            }

            let expected: BTreeSet<u64> = (1..limit).collect();
            prop_assert_eq!(total, limit - 1);
            prop_assert_eq!(seen, expected);
        }
    }
}
