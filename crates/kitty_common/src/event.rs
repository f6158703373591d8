use crate::key::{Key, Mod};

/// Identifies a timer scheduled through [`EventSource::set_timer`].
///
/// [`EventSource::set_timer`]: crate::screen::EventSource::set_timer
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TimerId(pub u32);

impl TimerId {
    /// First id free for game-defined timers.
    pub const USER: TimerId = TimerId(0);
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u8),
}

/// An input event as reported by an [`EventSource`].
///
/// [`EventSource`]: crate::screen::EventSource
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Event {
    /// The window was asked to close.
    Quit,
    KeyDown {
        key: Key,
        keymod: Mod,
    },
    KeyUp {
        key: Key,
        keymod: Mod,
    },
    MouseButtonDown {
        button: MouseButton,
        pos: (i32, i32),
    },
    MouseButtonUp {
        button: MouseButton,
        pos: (i32, i32),
    },
    MouseMotion {
        pos: (i32, i32),
    },
    Timer(TimerId),
    Unknown,
}

impl Event {
    pub fn key_down(key: Key) -> Event {
        Event::KeyDown {
            key,
            keymod: Mod::empty(),
        }
    }

    pub fn key_down_with(key: Key, keymod: Mod) -> Event {
        Event::KeyDown { key, keymod }
    }
}

/// Returns true if `event` presses `key`. When `modifier` is given, at least
/// one of its keys must also be held.
pub fn keypressed(event: &Event, key: Key, modifier: Option<Mod>) -> bool {
    match *event {
        Event::KeyDown { key: k, keymod } => {
            k == key && modifier.map_or(true, |m| keymod.intersects(m))
        }
        _ => false,
    }
}
