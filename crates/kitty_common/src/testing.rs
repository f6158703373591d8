//! In-memory stand-ins for a real display, for tests.

use std::collections::VecDeque;

use anyhow::Result;

use crate::color::Color;
use crate::event::{Event, TimerId};
use crate::img::Bitmap;
use crate::screen::{EventSource, Screen};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blit {
    pub size: (u32, u32),
    pub topleft: (i32, i32),
}

/// Records every drawing call instead of rendering.
#[derive(Debug)]
pub struct FakeScreen {
    pub size: (u32, u32),
    pub fullscreen: bool,
    pub fills: Vec<Color>,
    pub blits: Vec<Blit>,
    pub updates: usize,
    pub mode_changes: Vec<((u32, u32), bool)>,
}

impl Default for FakeScreen {
    fn default() -> Self {
        FakeScreen {
            size: (SCREEN_WIDTH, SCREEN_HEIGHT),
            fullscreen: false,
            fills: Vec::new(),
            blits: Vec::new(),
            updates: 0,
            mode_changes: Vec::new(),
        }
    }
}

impl Screen for FakeScreen {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn set_mode(&mut self, size: (u32, u32), fullscreen: bool) -> Result<()> {
        self.size = size;
        self.fullscreen = fullscreen;
        self.mode_changes.push((size, fullscreen));
        Ok(())
    }

    fn fill(&mut self, color: Color) -> Result<()> {
        self.fills.push(color);
        Ok(())
    }

    fn blit(&mut self, bitmap: &Bitmap, topleft: (i32, i32)) -> Result<()> {
        self.blits.push(Blit {
            size: bitmap.size(),
            topleft,
        });
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        self.updates += 1;
        Ok(())
    }
}

/// Hands out pre-recorded batches of events, one batch per poll.
///
/// Polling past the end of the script panics: a state that keeps polling
/// after its last scripted event would otherwise spin forever.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    batches: VecDeque<Vec<Event>>,
    pub polls: usize,
    pub timers: Vec<(TimerId, u32)>,
}

impl ScriptedEvents {
    pub fn new(batches: impl IntoIterator<Item = Vec<Event>>) -> Self {
        ScriptedEvents {
            batches: batches.into_iter().collect(),
            ..Default::default()
        }
    }

    /// A script that delivers all `events` in a single poll.
    pub fn single_batch(events: impl IntoIterator<Item = Event>) -> Self {
        ScriptedEvents::new([events.into_iter().collect()])
    }

    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self) -> Vec<Event> {
        self.polls += 1;
        match self.batches.pop_front() {
            Some(batch) => batch,
            None => panic!("event script exhausted after {} polls", self.polls - 1),
        }
    }

    fn set_timer(&mut self, id: TimerId, interval_ms: u32) {
        self.timers.push((id, interval_ms));
    }
}
