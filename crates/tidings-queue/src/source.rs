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

//! The event source contract and the source-side registration table.

use crate::queue::QueueHandle;
use crate::shared::SharedEvent;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tidings_core::{Event, QueueId, SourceId};

/// A producer of events.
///
/// Keyboards, mice, timers and application code all implement this trait.
/// The queue only relies on the methods below; how a source produces events
/// is its own business.
///
/// All methods may be called from any thread. None of them is ever called
/// while a queue's lock is held, so implementations are free to call back
/// into the queue.
pub trait EventSource: Send + Sync + 'static {
    /// The source's identity, stamped on every event it emits.
    fn id(&self) -> SourceId;

    /// Called by a queue before it records the source as a member.
    ///
    /// From this point on the source should push its events into `queue`.
    fn on_registered(&self, queue: QueueHandle);

    /// Called by a queue after it has dropped the source from its members.
    ///
    /// When this returns the source must no longer push into the queue; the
    /// queue purges the source's remaining records right after.
    fn on_unregistered(&self, queue: QueueId);

    /// Receives an event once no queue holds it any more.
    ///
    /// Sources that pool their records recycle them here. The default frees
    /// the event.
    fn release(&self, event: Event) {
        let _ = event;
    }
}

/// The per-source table of queues a source feeds.
///
/// Sources embed one of these and forward [`EventSource::on_registered`] and
/// [`EventSource::on_unregistered`] to [`attach`](Self::attach) and
/// [`detach`](Self::detach). The table only holds weak [`QueueHandle`]s, so a
/// source never keeps a queue alive.
///
/// [`emit`](Self::emit) holds the table lock while it fans a record out.
/// Because `on_unregistered` needs the same lock, a queue unregistering the
/// source waits for any emission in flight before it purges, and no record
/// can slip in behind the purge. Lock order is always table, then queue.
#[derive(Debug, Default)]
pub struct SourceQueues {
    queues: Mutex<Vec<QueueHandle>>,
}

impl SourceQueues {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<QueueHandle>> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a queue. Returns `false` if it was already present.
    pub fn attach(&self, queue: QueueHandle) -> bool {
        let mut queues = self.lock();
        if queues.iter().any(|q| q.id() == queue.id()) {
            return false;
        }
        queues.push(queue);
        true
    }

    /// Removes a queue. Returns `false` if it was not present.
    pub fn detach(&self, queue: QueueId) -> bool {
        let mut queues = self.lock();
        match queues.iter().position(|q| q.id() == queue) {
            Some(index) => {
                queues.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if the queue is in the table.
    pub fn contains(&self, queue: QueueId) -> bool {
        self.lock().iter().any(|q| q.id() == queue)
    }

    /// The ids of every queue in the table.
    pub fn queue_ids(&self) -> Vec<QueueId> {
        self.lock().iter().map(QueueHandle::id).collect()
    }

    /// Number of queues in the table.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the source feeds no queue.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Offers `event` to every queue in the table and returns how many
    /// queues it was offered to.
    ///
    /// Each queue that accepts the record takes its own share. The caller's
    /// share is given back after the table lock is released, so if no queue
    /// kept the record the source's release hook runs here, lock-free.
    pub fn emit(&self, event: SharedEvent) -> usize {
        let offered = {
            let queues = self.lock();
            for queue in queues.iter() {
                queue.push(&event);
            }
            queues.len()
        };
        drop(event);
        offered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::EventQueue;

    #[test]
    fn test_attach_is_idempotent() {
        let queue = EventQueue::new();
        let table = SourceQueues::new();

        assert!(table.attach(queue.handle()));
        assert!(!table.attach(queue.handle()));
        assert_eq!(table.len(), 1);
        assert!(table.contains(queue.id()));
    }

    #[test]
    fn test_detach() {
        let first = EventQueue::new();
        let second = EventQueue::new();
        let table = SourceQueues::new();
        table.attach(first.handle());
        table.attach(second.handle());

        assert!(table.detach(first.id()));
        assert!(!table.detach(first.id()));
        assert_eq!(table.queue_ids(), vec![second.id()]);

        assert!(table.detach(second.id()));
        assert!(table.is_empty());
    }

    #[test]
    fn test_emit_fans_out_to_every_queue() {
        let first = EventQueue::new();
        let second = EventQueue::new();
        let table = SourceQueues::new();
        table.attach(first.handle());
        table.attach(second.handle());

        let source = SourceId::next();
        let offered = table.emit(SharedEvent::detached(Event::timer(source, 1)));

        assert_eq!(offered, 2);
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first.peek_next(), second.peek_next());

        first.flush();
        second.flush();
    }

    #[test]
    fn test_emit_to_dropped_queue_is_inert() {
        let table = SourceQueues::new();
        {
            let queue = EventQueue::new();
            table.attach(queue.handle());
        }
        let offered = table.emit(SharedEvent::detached(Event::timer(SourceId::next(), 1)));
        assert_eq!(offered, 1);
    }
}
