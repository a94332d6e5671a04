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

//! Fixed-size payloads, one per event family.
//!
//! Every payload is `Copy` and holds only fixed-size fields, so an
//! [`EventPayload`] is never larger than its biggest variant and never
//! allocates.

/// Keyboard payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyPayload {
    /// Backend-independent key code.
    pub keycode: u32,
    /// The Unicode scalar produced by the key, or 0 if none.
    pub unichar: u32,
    /// Bitmask of the modifier keys held at the time.
    pub modifiers: u32,
}

/// Mouse payload. Deltas are relative to the previous mouse event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MousePayload {
    /// Cursor x-coordinate.
    pub x: i32,
    /// Cursor y-coordinate.
    pub y: i32,
    /// Wheel position.
    pub z: i32,
    /// Change in x.
    pub dx: i32,
    /// Change in y.
    pub dy: i32,
    /// Change in wheel position.
    pub dz: i32,
    /// The button involved, 1-based. Zero for pure motion.
    pub button: u32,
}

/// Joystick payload.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JoystickPayload {
    /// Index of the stick on the device.
    pub stick: u32,
    /// Index of the axis on the stick.
    pub axis: u32,
    /// Axis position in `-1.0..=1.0`.
    pub pos: f32,
    /// The button involved.
    pub button: u32,
}

/// Timer payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerPayload {
    /// The timer's tick count at emission.
    pub count: i64,
}

/// Display payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayPayload {
    /// Left edge of the affected area.
    pub x: i32,
    /// Top edge of the affected area.
    pub y: i32,
    /// Width of the affected area, or the new display width on resize.
    pub width: i32,
    /// Height of the affected area, or the new display height on resize.
    pub height: i32,
}

/// Application-defined payload: four machine-word slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserPayload {
    /// Opaque slots, interpreted by the application.
    pub data: [isize; 4],
}

/// The variant-specific part of an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventPayload {
    /// See [`KeyPayload`].
    Key(KeyPayload),
    /// See [`MousePayload`].
    Mouse(MousePayload),
    /// See [`JoystickPayload`].
    Joystick(JoystickPayload),
    /// See [`TimerPayload`].
    Timer(TimerPayload),
    /// See [`DisplayPayload`].
    Display(DisplayPayload),
    /// See [`UserPayload`].
    User(UserPayload),
}

impl EventPayload {
    /// Returns the user slots if this is a [`EventPayload::User`] payload.
    pub fn as_user(&self) -> Option<&UserPayload> {
        match self {
            EventPayload::User(user) => Some(user),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_fixed_size() {
        // Largest variant plus the discriminant.
        let largest = std::mem::size_of::<MousePayload>().max(std::mem::size_of::<UserPayload>());
        assert!(std::mem::size_of::<EventPayload>() <= largest + std::mem::align_of::<EventPayload>());
    }

    #[test]
    fn test_as_user() {
        let user = EventPayload::User(UserPayload { data: [1, 2, 3, 4] });
        assert_eq!(user.as_user().map(|u| u.data), Some([1, 2, 3, 4]));
        assert!(EventPayload::Timer(TimerPayload { count: 1 }).as_user().is_none());
    }
}
