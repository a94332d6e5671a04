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

//! Shared ownership of event records across queues.

use crate::source::EventSource;
use std::fmt;
use std::sync::{Arc, Weak};
use tidings_core::{Event, SourceId};

/// The record behind a [`SharedEvent`]. Returned to its source when dropped.
struct EventRecord {
    event: Event,
    origin: Option<Weak<dyn EventSource>>,
}

impl Drop for EventRecord {
    fn drop(&mut self) {
        if let Some(source) = self.origin.as_ref().and_then(Weak::upgrade) {
            source.release(self.event);
        }
    }
}

/// A reference-counted handle to an event record.
///
/// Cloning the handle takes another share of the record; dropping it gives
/// the share back. When the last share is dropped, the originating source's
/// [`release`](EventSource::release) hook receives the event exactly once,
/// on whichever thread dropped it. If the source is already gone the record
/// is simply freed.
///
/// Queues only clone a handle under their lock and only drop one with the
/// lock released, so a release hook never runs inside a queue's critical
/// section.
#[derive(Clone)]
pub struct SharedEvent {
    record: Arc<EventRecord>,
}

impl SharedEvent {
    /// Wraps `event` in a new record owned by the caller, remembering `origin`
    /// for the release hook.
    ///
    /// The back-reference is weak: a record never keeps its source alive.
    pub fn new(event: Event, origin: Weak<dyn EventSource>) -> Self {
        Self {
            record: Arc::new(EventRecord {
                event,
                origin: Some(origin),
            }),
        }
    }

    /// Wraps `event` in a record with no release hook.
    ///
    /// A detached record has no registered source, so no `unregister` ever
    /// purges it. Whoever pushes one into a queue must drain it before the
    /// queue is dropped.
    pub fn detached(event: Event) -> Self {
        Self {
            record: Arc::new(EventRecord {
                event,
                origin: None,
            }),
        }
    }

    /// Returns a value copy of the event.
    ///
    /// The copy is an independent value: it is not shared, counted or linked
    /// to any queue.
    pub fn event(&self) -> Event {
        self.record.event
    }

    /// The id of the source that emitted the record.
    pub fn source(&self) -> SourceId {
        self.record.event.source()
    }

    /// How many handles to this record currently exist.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.record)
    }

    /// Returns `true` if both handles refer to the same record.
    pub fn ptr_eq(&self, other: &SharedEvent) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
    }
}

impl fmt::Debug for SharedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEvent")
            .field("event", &self.record.event)
            .field("shares", &self.share_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::QueueHandle;
    use std::sync::Mutex;
    use tidings_core::QueueId;

    struct RecordingSource {
        id: SourceId,
        released: Mutex<Vec<Event>>,
    }

    impl EventSource for RecordingSource {
        fn id(&self) -> SourceId {
            self.id
        }
        fn on_registered(&self, _queue: QueueHandle) {}
        fn on_unregistered(&self, _queue: QueueId) {}
        fn release(&self, event: Event) {
            self.released.lock().unwrap().push(event);
        }
    }

    fn recording_source() -> Arc<RecordingSource> {
        Arc::new(RecordingSource {
            id: SourceId::next(),
            released: Mutex::new(Vec::new()),
        })
    }

    fn origin_of(source: &Arc<RecordingSource>) -> Weak<dyn EventSource> {
        let weak: Weak<RecordingSource> = Arc::downgrade(source);
        weak
    }

    #[test]
    fn test_release_on_last_drop() {
        let source = recording_source();
        let origin = origin_of(&source);
        let event = Event::user(source.id, 1, [5, 0, 0, 0]);

        let first = SharedEvent::new(event, origin);
        let second = first.clone();
        assert_eq!(first.share_count(), 2);
        assert!(first.ptr_eq(&second));

        drop(first);
        assert!(source.released.lock().unwrap().is_empty());

        drop(second);
        assert_eq!(*source.released.lock().unwrap(), vec![event]);
    }

    #[test]
    fn test_release_skipped_when_source_gone() {
        let source = recording_source();
        let origin = origin_of(&source);
        let shared = SharedEvent::new(Event::timer(source.id, 1), origin);
        drop(source);
        // Must not panic or touch freed state.
        drop(shared);
    }

    #[test]
    fn test_detached_record() {
        let source = SourceId::next();
        let shared = SharedEvent::detached(Event::timer(source, 4));
        assert_eq!(shared.source(), source);
        assert_eq!(shared.share_count(), 1);
        assert_eq!(shared.event().kind(), tidings_core::EventKind::Timer);
    }
}
