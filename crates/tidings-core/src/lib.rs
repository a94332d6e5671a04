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

//! # Tidings Core
//!
//! Foundational crate containing the plain value types shared by every
//! tidings event queue: event records, source and queue identities,
//! wait timeouts and queue configuration.
//!
//! Nothing in this crate synchronizes. The concurrent machinery lives in
//! `tidings-queue`, which builds on these types.

#![warn(missing_docs)]

pub mod config;
pub mod event;
pub mod id;
pub mod timeout;

pub use config::{ConfigError, QueueConfig};
pub use event::{Event, EventHeader, EventKind, EventPayload};
pub use id::{QueueId, SourceId};
pub use timeout::Timeout;
