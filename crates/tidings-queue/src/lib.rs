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

//! # Tidings Queue
//!
//! Thread-safe, bounded, strictly FIFO event queues.
//!
//! Any number of [`EventSource`]s push shared event records into the queues
//! they are registered with; a primary consumer thread drains each queue with
//! [`EventQueue::get_next`], [`EventQueue::peek_next`] or the blocking
//! [`EventQueue::wait`].
//!
//! A record pushed into several queues is shared, not duplicated: every queue
//! holds one [`SharedEvent`] handle and the source's
//! [`release`](EventSource::release) hook runs once the last holder lets go.
//!
//! Two locking rules hold throughout the crate:
//! * a queue never calls into an event source while holding its own lock;
//! * a queue never releases a record while holding its own lock.

#![warn(missing_docs)]

mod queue;
mod shared;
mod source;
mod stats;
mod user;

pub use self::queue::{EventQueue, QueueHandle};
pub use self::shared::SharedEvent;
pub use self::source::{EventSource, SourceQueues};
pub use self::stats::QueueStats;
pub use self::user::UserEventSource;

pub use tidings_core::{
    ConfigError, Event, EventHeader, EventKind, EventPayload, QueueConfig, QueueId, SourceId,
    Timeout,
};
