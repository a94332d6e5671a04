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

//! The event queue and its blocking wait protocol.

use crate::shared::SharedEvent;
use crate::source::EventSource;
use crate::stats::{QueueCounters, QueueStats};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, ThreadId};
use std::time::Instant;
use tidings_core::{Event, QueueConfig, QueueId, SourceId, Timeout};

/// A registered source, with its id cached so the queue never has to call
/// into the source while locked.
struct Registration {
    id: SourceId,
    source: Arc<dyn EventSource>,
}

struct QueueState {
    events: VecDeque<SharedEvent>,
    sources: Vec<Registration>,
    /// Bumped by every completed unregistration.
    epoch: u64,
}

/// Serializes `register` and `unregister` on one queue, callbacks included.
///
/// Separate from the buffer lock, which is never held across a callback.
/// Re-entrant on the owning thread, so a source callback may itself register
/// or unregister with the same queue.
#[derive(Default)]
struct RegistrationGate {
    owner: Mutex<Option<(ThreadId, usize)>>,
    free: Condvar,
}

impl RegistrationGate {
    fn enter(&self) -> GatePass<'_> {
        let me = thread::current().id();
        let mut owner = self.owner.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            let current = *owner;
            match current {
                None => {
                    *owner = Some((me, 1));
                    break;
                }
                Some((id, depth)) if id == me => {
                    *owner = Some((id, depth + 1));
                    break;
                }
                Some(_) => {
                    owner = self
                        .free
                        .wait(owner)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
        GatePass { gate: self }
    }
}

struct GatePass<'a> {
    gate: &'a RegistrationGate,
}

impl Drop for GatePass<'_> {
    fn drop(&mut self) {
        let mut owner = self
            .gate
            .owner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *owner = match *owner {
            Some((id, depth)) if depth > 1 => Some((id, depth - 1)),
            _ => None,
        };
        if owner.is_none() {
            self.gate.free.notify_all();
        }
    }
}

pub(crate) struct QueueShared {
    id: QueueId,
    capacity: usize,
    registration: RegistrationGate,
    state: Mutex<QueueState>,
    not_empty: Condvar,
    counters: QueueCounters,
}

impl QueueShared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a share of `event`, or drops it silently if the buffer is full.
    fn push(&self, event: &SharedEvent) {
        let mut state = self.lock();
        if state.events.len() >= self.capacity {
            self.counters.overflowed();
            log::trace!(
                "{} full ({} events), dropping event from {}",
                self.id,
                self.capacity,
                event.source()
            );
            return;
        }
        state.events.push_back(event.clone());
        self.counters.accepted();
        // Every waiter re-checks the buffer, so wake them all.
        self.not_empty.notify_all();
    }
}

/// A weak, cloneable reference to a queue, held by event sources.
///
/// A handle never keeps its queue alive. Once the queue is destroyed every
/// operation on the handle becomes inert.
#[derive(Clone)]
pub struct QueueHandle {
    id: QueueId,
    shared: Weak<QueueShared>,
}

impl QueueHandle {
    /// The id of the referenced queue.
    pub fn id(&self) -> QueueId {
        self.id
    }

    /// Pushes a share of `event` into the queue.
    ///
    /// Never blocks beyond the queue's critical section and never fails: if
    /// the queue is full, or gone, the event is simply not retained.
    ///
    /// Sources must only push into queues they are registered with. Records
    /// from anywhere else (a [`SharedEvent::detached`] one, say) are not
    /// purged by `unregister`; drain them before dropping the queue, or its
    /// destruction check fails in debug builds.
    pub fn push(&self, event: &SharedEvent) {
        if let Some(shared) = self.shared.upgrade() {
            shared.push(event);
        }
    }

    /// Returns `true` if the queue is empty or gone.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of buffered events, or 0 if the queue is gone.
    pub fn len(&self) -> usize {
        self.shared
            .upgrade()
            .map_or(0, |shared| shared.lock().events.len())
    }

    /// Returns `true` while the queue exists.
    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl fmt::Debug for QueueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueHandle")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// A bounded FIFO buffer of events fed by registered sources.
///
/// The queue is owned by whoever created it; share it between threads by
/// reference or behind an `Arc`. Dropping it destroys it: every source is
/// unregistered first, which purges and releases any events still buffered.
///
/// Removing an event from the buffer and releasing it are separate steps.
/// Removal always happens under the queue lock; release always happens after
/// the lock is dropped, because a release may run a source's callback and
/// that callback may call back into this queue.
pub struct EventQueue {
    shared: Arc<QueueShared>,
}

impl EventQueue {
    /// Creates an empty queue with the default configuration.
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Creates an empty queue with the given configuration.
    ///
    /// A zero capacity is raised to one.
    pub fn with_config(config: QueueConfig) -> Self {
        let capacity = config.capacity.max(1);
        let id = QueueId::next();
        log::info!("{id} created with capacity {capacity}");
        Self {
            shared: Arc::new(QueueShared {
                id,
                capacity,
                registration: RegistrationGate::default(),
                state: Mutex::new(QueueState {
                    events: VecDeque::with_capacity(capacity),
                    sources: Vec::new(),
                    epoch: 0,
                }),
                not_empty: Condvar::new(),
                counters: QueueCounters::default(),
            }),
        }
    }

    /// The queue's identity.
    pub fn id(&self) -> QueueId {
        self.shared.id
    }

    /// The maximum number of buffered events.
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// A weak handle sources can push through.
    pub fn handle(&self) -> QueueHandle {
        QueueHandle {
            id: self.shared.id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Registers a source with the queue. Registering a member again does
    /// nothing.
    ///
    /// The source is told about the queue before the queue counts it as a
    /// member. Registrations and unregistrations on one queue are serialized,
    /// so the queue's membership and the source's own table always agree
    /// once the call returns.
    pub fn register(&self, source: Arc<dyn EventSource>) {
        let id = source.id();
        let _pass = self.shared.registration.enter();
        loop {
            let epoch = {
                let state = self.shared.lock();
                if state.sources.iter().any(|r| r.id == id) {
                    return;
                }
                state.epoch
            };

            source.on_registered(self.handle());

            let mut state = self.shared.lock();
            // The callback registered the source itself.
            if state.sources.iter().any(|r| r.id == id) {
                return;
            }
            // The callback unregistered something, possibly this source, so
            // the source may have detached us again. Tell it once more.
            if state.epoch != epoch {
                continue;
            }
            state.sources.push(Registration {
                id,
                source: Arc::clone(&source),
            });
            log::debug!("{} registered {}", self.shared.id, id);
            return;
        }
    }

    /// Unregisters a source and purges every buffered event it emitted,
    /// keeping the remaining events in order. Returns `false` if the source
    /// was not a member.
    ///
    /// When this returns, no event from the source is reachable from the
    /// queue.
    pub fn unregister(&self, source: SourceId) -> bool {
        let _pass = self.shared.registration.enter();
        let registration = {
            let mut state = self.shared.lock();
            match state.sources.iter().position(|r| r.id == source) {
                Some(index) => state.sources.remove(index),
                None => return false,
            }
        };

        registration.source.on_unregistered(self.shared.id);

        let purged: VecDeque<SharedEvent> = {
            let mut state = self.shared.lock();
            let (purged, kept): (VecDeque<_>, VecDeque<_>) = std::mem::take(&mut state.events)
                .into_iter()
                .partition(|event| event.source() == source);
            state.events = kept;
            state.epoch += 1;
            self.shared.counters.discarded(purged.len());
            purged
        };

        log::debug!(
            "{} unregistered {}, purged {} events",
            self.shared.id,
            source,
            purged.len()
        );
        // Release outside the lock.
        drop(purged);
        drop(registration);
        true
    }

    /// Returns `true` if the source is a member.
    pub fn is_registered(&self, source: SourceId) -> bool {
        self.shared.lock().sources.iter().any(|r| r.id == source)
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.shared.lock().sources.len()
    }

    /// Returns `true` if no event is buffered.
    pub fn is_empty(&self) -> bool {
        self.shared.lock().events.is_empty()
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.shared.lock().events.len()
    }

    /// Removes the next event and returns a copy of it, or `None` if the
    /// queue is empty.
    pub fn get_next(&self) -> Option<Event> {
        let next = self.take_next()?;
        self.shared.counters.delivered();
        Some(next.event())
    }

    /// Returns a copy of the next event without removing it, or `None` if the
    /// queue is empty.
    pub fn peek_next(&self) -> Option<Event> {
        self.shared.lock().events.front().map(SharedEvent::event)
    }

    /// Removes and discards the next event. Returns `false` if the queue was
    /// empty.
    pub fn drop_next(&self) -> bool {
        match self.take_next() {
            Some(next) => {
                self.shared.counters.discarded(1);
                drop(next);
                true
            }
            None => false,
        }
    }

    /// Removes the head under the lock. The caller releases it lock-free.
    fn take_next(&self) -> Option<SharedEvent> {
        self.shared.lock().events.pop_front()
    }

    /// Drops every buffered event.
    ///
    /// Events are taken from the tail. The lock is dropped around each
    /// release, so events pushed concurrently may or may not survive.
    pub fn flush(&self) {
        let mut flushed = 0usize;
        let mut state = self.shared.lock();
        while let Some(event) = state.events.pop_back() {
            self.shared.counters.discarded(1);
            drop(state);
            drop(event);
            flushed += 1;
            state = self.shared.lock();
        }
        drop(state);
        log::trace!("{} flushed {} events", self.shared.id, flushed);
    }

    /// Waits until the queue is non-empty, then removes the next event and
    /// returns a copy of it.
    ///
    /// Returns `None` if `timeout` elapses first, leaving the buffer
    /// untouched. With [`Timeout::Forever`] this only returns `Some`.
    pub fn wait(&self, timeout: Timeout) -> Option<Event> {
        let next = {
            let mut state = self.wait_until_nonempty(timeout)?;
            let next = state.events.pop_front();
            debug_assert!(next.is_some(), "woke on an empty queue");
            next
        }?;
        self.shared.counters.delivered();
        Some(next.event())
    }

    /// Waits until the queue is non-empty without removing anything.
    ///
    /// Returns `false` if `timeout` elapses first.
    pub fn wait_nonempty(&self, timeout: Timeout) -> bool {
        self.wait_until_nonempty(timeout).is_some()
    }

    /// Blocks on the condition variable until the buffer has an event or the
    /// deadline passes. Returns the held lock on success.
    ///
    /// The deadline is computed once, up front, so spurious wake-ups cannot
    /// extend it.
    fn wait_until_nonempty(&self, timeout: Timeout) -> Option<MutexGuard<'_, QueueState>> {
        let shared = &*self.shared;
        let mut state = shared.lock();

        let Some(deadline) = timeout.deadline_from(Instant::now()) else {
            let state = shared
                .not_empty
                .wait_while(state, |state| state.events.is_empty())
                .unwrap_or_else(PoisonError::into_inner);
            return Some(state);
        };

        while state.events.is_empty() {
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            state = shared
                .not_empty
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        Some(state)
    }

    /// A snapshot of the queue's lifetime counters.
    pub fn stats(&self) -> QueueStats {
        self.shared.counters.snapshot()
    }

    /// Destroys the queue. Same as dropping it.
    ///
    /// Every source is unregistered first. Debug builds then check that the
    /// buffer is empty, which only fails if records were pushed through a
    /// [`QueueHandle`] without a registered source behind them.
    pub fn destroy(self) {
        drop(self);
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("EventQueue")
            .field("id", &self.shared.id)
            .field("capacity", &self.shared.capacity)
            .field("len", &state.events.len())
            .field("sources", &state.sources.len())
            .finish()
    }
}

impl Drop for EventQueue {
    fn drop(&mut self) {
        loop {
            let last = self.shared.lock().sources.last().map(|r| r.id);
            match last {
                Some(source) => {
                    self.unregister(source);
                }
                None => break,
            }
        }

        let leftover = {
            let mut state = self.shared.lock();
            debug_assert!(state.sources.is_empty(), "destroyed queue still has sources");
            std::mem::take(&mut state.events)
        };
        // Only records pushed by unregistered parties can be left here. A
        // second panic during an unwind would abort, so stay quiet then.
        debug_assert!(
            leftover.is_empty() || thread::panicking(),
            "destroyed queue still holds {} events",
            leftover.len()
        );
        drop(leftover);
        log::info!("{} destroyed", self.shared.id);
    }
}
