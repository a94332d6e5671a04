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

use super::kind::EventKind;
use super::payload::{EventPayload, TimerPayload, UserPayload};
use crate::id::SourceId;
use std::time::Instant;

/// The part common to every event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventHeader {
    /// What happened.
    pub kind: EventKind,
    /// Who emitted it. Identity only; the source is never owned by the event.
    pub source: SourceId,
    /// When it was created.
    pub timestamp: Instant,
}

/// A complete event: header plus payload.
///
/// Construction goes through [`Event::new`] (or one of the shorthands),
/// which guarantees the kind and payload family agree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    header: EventHeader,
    payload: EventPayload,
}

impl Event {
    /// Builds an event, or returns `None` if `kind` does not carry `payload`'s
    /// family.
    pub fn new(
        kind: EventKind,
        source: SourceId,
        timestamp: Instant,
        payload: EventPayload,
    ) -> Option<Self> {
        if !kind.accepts(&payload) {
            return None;
        }
        Some(Self {
            header: EventHeader {
                kind,
                source,
                timestamp,
            },
            payload,
        })
    }

    /// Builds an event stamped with the current time.
    pub fn now(kind: EventKind, source: SourceId, payload: EventPayload) -> Option<Self> {
        Self::new(kind, source, Instant::now(), payload)
    }

    /// Shorthand for an application-defined event.
    pub fn user(source: SourceId, user_kind: u32, data: [isize; 4]) -> Self {
        Self {
            header: EventHeader {
                kind: EventKind::User(user_kind),
                source,
                timestamp: Instant::now(),
            },
            payload: EventPayload::User(UserPayload { data }),
        }
    }

    /// Shorthand for a timer tick.
    pub fn timer(source: SourceId, count: i64) -> Self {
        Self {
            header: EventHeader {
                kind: EventKind::Timer,
                source,
                timestamp: Instant::now(),
            },
            payload: EventPayload::Timer(TimerPayload { count }),
        }
    }

    /// Returns the same event attributed to another source.
    pub fn with_source(mut self, source: SourceId) -> Self {
        self.header.source = source;
        self
    }

    /// The common header.
    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    /// The type tag.
    pub fn kind(&self) -> EventKind {
        self.header.kind
    }

    /// The originating source.
    pub fn source(&self) -> SourceId {
        self.header.source
    }

    /// Creation time.
    pub fn timestamp(&self) -> Instant {
        self.header.timestamp
    }

    /// The variant-specific data.
    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }
}
