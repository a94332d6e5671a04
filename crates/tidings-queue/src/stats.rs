// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Lifetime counters of an event queue.

use std::sync::atomic::{AtomicU64, Ordering};

/// A snapshot of a queue's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Pushes that entered the buffer.
    pub accepted: u64,
    /// Pushes dropped because the buffer was full.
    pub overflowed: u64,
    /// Events handed to a consumer by `get_next` or `wait`.
    pub delivered: u64,
    /// Events removed without delivery: `drop_next`, `flush` and purges.
    pub discarded: u64,
}

impl QueueStats {
    /// Number of events that were accepted and have not yet left the queue.
    pub fn in_flight(&self) -> u64 {
        self.accepted
            .saturating_sub(self.delivered)
            .saturating_sub(self.discarded)
    }
}

/// Relaxed atomics; a snapshot is consistent per counter, not across them.
#[derive(Debug, Default)]
pub(crate) struct QueueCounters {
    accepted: AtomicU64,
    overflowed: AtomicU64,
    delivered: AtomicU64,
    discarded: AtomicU64,
}

impl QueueCounters {
    pub(crate) fn accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn overflowed(&self) {
        self.overflowed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn discarded(&self, count: usize) {
        self.discarded.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> QueueStats {
        QueueStats {
            accepted: self.accepted.load(Ordering::Relaxed),
            overflowed: self.overflowed.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_and_in_flight() {
        let counters = QueueCounters::default();
        counters.accepted();
        counters.accepted();
        counters.accepted();
        counters.overflowed();
        counters.delivered();
        counters.discarded(1);

        let stats = counters.snapshot();
        assert_eq!(
            stats,
            QueueStats {
                accepted: 3,
                overflowed: 1,
                delivered: 1,
                discarded: 1,
            }
        );
        assert_eq!(stats.in_flight(), 1);
    }
}
