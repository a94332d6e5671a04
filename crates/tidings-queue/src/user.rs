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

//! A ready-made event source for application-defined events.

use crate::queue::QueueHandle;
use crate::shared::SharedEvent;
use crate::source::{EventSource, SourceQueues};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tidings_core::{Event, QueueId, SourceId};

type ReleaseHook = Box<dyn Fn(&Event) + Send + Sync>;

/// An event source the application emits into directly.
///
/// Besides user events it can emit any prebuilt [`Event`], which makes it a
/// convenient stand-in for timers or input devices. An optional release hook
/// sees every event once the last queue has let go of it.
pub struct UserEventSource {
    id: SourceId,
    this: Weak<UserEventSource>,
    queues: SourceQueues,
    release_hook: Option<ReleaseHook>,
    emitted: AtomicU64,
    released: AtomicU64,
}

impl UserEventSource {
    /// Creates a source with no release hook.
    pub fn new() -> Arc<Self> {
        Self::build(None)
    }

    /// Creates a source whose `hook` runs for every released event.
    ///
    /// The hook runs on whichever thread released the last share, never
    /// under a queue lock.
    pub fn with_release_hook(hook: impl Fn(&Event) + Send + Sync + 'static) -> Arc<Self> {
        Self::build(Some(Box::new(hook)))
    }

    fn build(release_hook: Option<ReleaseHook>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            id: SourceId::next(),
            this: this.clone(),
            queues: SourceQueues::new(),
            release_hook,
            emitted: AtomicU64::new(0),
            released: AtomicU64::new(0),
        })
    }

    /// Emits a user event of type `user_kind` into every queue the source is
    /// registered with. Returns the number of queues it was offered to.
    pub fn emit(&self, user_kind: u32, data: [isize; 4]) -> usize {
        self.emit_event(Event::user(self.id, user_kind, data))
    }

    /// Emits a prebuilt event, attributed to this source.
    pub fn emit_event(&self, event: Event) -> usize {
        let origin: Weak<dyn EventSource> = self.this.clone();
        let shared = SharedEvent::new(event.with_source(self.id), origin);
        self.emitted.fetch_add(1, Ordering::Relaxed);
        self.queues.emit(shared)
    }

    /// The queues this source currently feeds.
    pub fn queues(&self) -> &SourceQueues {
        &self.queues
    }

    /// Total events emitted.
    pub fn emitted_count(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Total events released back to the source.
    pub fn released_count(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }
}

impl EventSource for UserEventSource {
    fn id(&self) -> SourceId {
        self.id
    }

    fn on_registered(&self, queue: QueueHandle) {
        self.queues.attach(queue);
    }

    fn on_unregistered(&self, queue: QueueId) {
        self.queues.detach(queue);
    }

    fn release(&self, event: Event) {
        self.released.fetch_add(1, Ordering::Relaxed);
        if let Some(hook) = &self.release_hook {
            hook(&event);
        }
    }
}

impl fmt::Debug for UserEventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserEventSource")
            .field("id", &self.id)
            .field("queues", &self.queues.len())
            .field("emitted", &self.emitted_count())
            .field("released", &self.released_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::EventQueue;
    use std::sync::Mutex;

    #[test]
    fn test_emit_without_queues_releases_immediately() {
        let source = UserEventSource::new();
        assert_eq!(source.emit(1, [0; 4]), 0);
        assert_eq!(source.emitted_count(), 1);
        assert_eq!(source.released_count(), 1);
    }

    #[test]
    fn test_registration_updates_table() {
        let queue = EventQueue::new();
        let source = UserEventSource::new();

        queue.register(source.clone());
        assert!(source.queues().contains(queue.id()));

        assert!(queue.unregister(source.id()));
        assert!(source.queues().is_empty());
    }

    #[test]
    fn test_release_hook_sees_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let source = UserEventSource::with_release_hook(move |event| {
            sink.lock().unwrap().push(*event);
        });
        let queue = EventQueue::new();
        queue.register(source.clone());

        source.emit(7, [1, 2, 3, 4]);
        assert!(seen.lock().unwrap().is_empty());

        let delivered = queue.get_next().unwrap();
        let released = seen.lock().unwrap().clone();
        assert_eq!(released, vec![delivered]);
        assert_eq!(source.released_count(), 1);
    }

    #[test]
    fn test_emit_event_restamps_source() {
        let queue = EventQueue::new();
        let source = UserEventSource::new();
        queue.register(source.clone());

        source.emit_event(Event::timer(SourceId::next(), 12));
        let event = queue.get_next().unwrap();
        assert_eq!(event.source(), source.id());
    }
}
