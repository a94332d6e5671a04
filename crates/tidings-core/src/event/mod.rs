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

//! Event record value types.
//!
//! An [`Event`] is a plain `Copy` value: a common [`EventHeader`] (kind tag,
//! originating source, creation time) followed by a fixed-size
//! [`EventPayload`]. The shared-ownership bookkeeping that lets one record sit
//! in several queues at once lives in `tidings-queue`, never in the value
//! itself, so every `Event` a consumer receives is an unshared copy.

mod kind;
mod payload;
mod record;

pub use self::kind::EventKind;
pub use self::payload::{
    DisplayPayload, EventPayload, JoystickPayload, KeyPayload, MousePayload, TimerPayload,
    UserPayload,
};
pub use self::record::{Event, EventHeader};
