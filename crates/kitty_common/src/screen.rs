use anyhow::Result;

use crate::color::Color;
use crate::event::{Event, TimerId};
use crate::img::Bitmap;

/// A drawable display surface.
pub trait Screen {
    fn size(&self) -> (u32, u32);
    fn is_fullscreen(&self) -> bool;
    /// Reinitialises the display. Anything drawn before the switch may be lost.
    fn set_mode(&mut self, size: (u32, u32), fullscreen: bool) -> Result<()>;
    fn fill(&mut self, color: Color) -> Result<()>;
    fn blit(&mut self, bitmap: &Bitmap, topleft: (i32, i32)) -> Result<()>;
    /// Presents everything drawn since the last update.
    fn update(&mut self) -> Result<()>;
}

/// The queue events are polled from.
pub trait EventSource {
    /// Drains every currently queued event, oldest first.
    fn poll(&mut self) -> Vec<Event>;
    /// Schedules `Event::Timer(id)` every `interval_ms`. An interval of 0
    /// cancels the timer.
    fn set_timer(&mut self, id: TimerId, interval_ms: u32);
}

/// What a game state gets to touch while it runs.
pub struct Ctx<'a> {
    pub screen: &'a mut dyn Screen,
    pub events: &'a mut dyn EventSource,
}

impl<'a> Ctx<'a> {
    pub fn new(screen: &'a mut dyn Screen, events: &'a mut dyn EventSource) -> Self {
        Ctx { screen, events }
    }
}
