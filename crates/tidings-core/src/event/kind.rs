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

use super::payload::EventPayload;

/// The type tag of an event.
///
/// Each kind belongs to exactly one payload family; see [`EventKind::accepts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A key went down.
    KeyDown,
    /// A held key auto-repeated.
    KeyRepeat,
    /// A key was released.
    KeyUp,
    /// The mouse moved or the wheel turned.
    MouseAxes,
    /// A mouse button was pressed.
    MouseButtonDown,
    /// A mouse button was released.
    MouseButtonUp,
    /// The cursor entered a display.
    MouseEnterDisplay,
    /// The cursor left a display.
    MouseLeaveDisplay,
    /// A joystick axis changed position.
    JoystickAxis,
    /// A joystick button was pressed.
    JoystickButtonDown,
    /// A joystick button was released.
    JoystickButtonUp,
    /// A timer ticked.
    Timer,
    /// Part of a display needs repainting.
    DisplayExpose,
    /// A display was resized.
    DisplayResize,
    /// The close button of a display was clicked.
    DisplayClose,
    /// The display lost its rendering context.
    DisplayLost,
    /// The display got its rendering context back.
    DisplayFound,
    /// The display gained focus.
    DisplaySwitchIn,
    /// The display lost focus.
    DisplaySwitchOut,
    /// An application-defined event type.
    User(u32),
}

impl EventKind {
    /// Returns `true` if `payload` is the payload family this kind carries.
    pub fn accepts(self, payload: &EventPayload) -> bool {
        use EventKind::*;
        match payload {
            EventPayload::Key(_) => matches!(self, KeyDown | KeyRepeat | KeyUp),
            EventPayload::Mouse(_) => matches!(
                self,
                MouseAxes
                    | MouseButtonDown
                    | MouseButtonUp
                    | MouseEnterDisplay
                    | MouseLeaveDisplay
            ),
            EventPayload::Joystick(_) => {
                matches!(self, JoystickAxis | JoystickButtonDown | JoystickButtonUp)
            }
            EventPayload::Timer(_) => matches!(self, Timer),
            EventPayload::Display(_) => matches!(
                self,
                DisplayExpose
                    | DisplayResize
                    | DisplayClose
                    | DisplayLost
                    | DisplayFound
                    | DisplaySwitchIn
                    | DisplaySwitchOut
            ),
            EventPayload::User(_) => matches!(self, User(_)),
        }
    }

    /// Returns `true` for application-defined kinds.
    pub fn is_user(self) -> bool {
        matches!(self, EventKind::User(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::payload::{KeyPayload, TimerPayload, UserPayload};

    #[test]
    fn test_kind_payload_agreement() {
        let key = EventPayload::Key(KeyPayload::default());
        assert!(EventKind::KeyDown.accepts(&key));
        assert!(EventKind::KeyUp.accepts(&key));
        assert!(!EventKind::Timer.accepts(&key));

        let timer = EventPayload::Timer(TimerPayload { count: 3 });
        assert!(EventKind::Timer.accepts(&timer));
        assert!(!EventKind::MouseAxes.accepts(&timer));
    }

    #[test]
    fn test_user_kinds() {
        let user = EventPayload::User(UserPayload::default());
        assert!(EventKind::User(1024).accepts(&user));
        assert!(EventKind::User(7).is_user());
        assert!(!EventKind::DisplayClose.is_user());
        assert!(!EventKind::DisplayClose.accepts(&user));
    }
}
