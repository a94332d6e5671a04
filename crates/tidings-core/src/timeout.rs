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

//! How long a consumer is willing to block waiting for an event.

use std::time::{Duration, Instant};

/// The bound on a blocking wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Block until an event arrives.
    Forever,
    /// Block for at most this long. A zero duration polls.
    After(Duration),
}

impl Timeout {
    /// Builds a timeout from a millisecond count.
    ///
    /// Any negative value means "wait forever", matching the usual sentinel
    /// of C-style event APIs.
    pub fn from_millis(msecs: i64) -> Self {
        if msecs < 0 {
            Timeout::Forever
        } else {
            Timeout::After(Duration::from_millis(msecs as u64))
        }
    }

    /// Returns the absolute deadline for a wait starting at `start`, or `None`
    /// for an unbounded wait.
    ///
    /// The deadline is fixed once per wait so that spurious wake-ups can
    /// never push it further out.
    pub fn deadline_from(self, start: Instant) -> Option<Instant> {
        match self {
            Timeout::Forever => None,
            // An overflowing deadline is as good as forever.
            Timeout::After(d) => start.checked_add(d),
        }
    }

    /// Returns `true` for [`Timeout::Forever`].
    pub fn is_forever(self) -> bool {
        matches!(self, Timeout::Forever)
    }
}

impl From<Duration> for Timeout {
    fn from(d: Duration) -> Self {
        Timeout::After(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_millis_is_forever() {
        assert_eq!(Timeout::from_millis(-1), Timeout::Forever);
        assert!(Timeout::from_millis(-42).is_forever());
    }

    #[test]
    fn test_zero_millis_polls() {
        assert_eq!(Timeout::from_millis(0), Timeout::After(Duration::ZERO));
    }

    #[test]
    fn test_deadline() {
        let start = Instant::now();
        assert_eq!(Timeout::Forever.deadline_from(start), None);
        assert_eq!(
            Timeout::from_millis(50).deadline_from(start),
            Some(start + Duration::from_millis(50))
        );
    }

    #[test]
    fn test_overflowing_deadline_is_unbounded() {
        let start = Instant::now();
        assert_eq!(Timeout::After(Duration::MAX).deadline_from(start), None);
    }
}
