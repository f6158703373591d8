//! Game states and the event loop that drives them.
//!
//! A state draws itself once when constructed, then [`GameState::run`] polls
//! the event queue until the state deactivates. Each event is offered to the
//! state's handlers in registration order until one of them reports that it
//! consumed the event by returning `Ok(true)`; events nobody consumes are
//! dropped.
//!
//! Every state gets two handlers for free: `handle_fullscreen` (F11 toggles
//! between windowed and fullscreen) and `handle_quit` (window close or
//! Ctrl+C). States override them by overriding the trait methods, and add
//! their own with [`Handlers::with`].

use anyhow::Result;

use crate::color::Color;
use crate::error::Error;
use crate::event::{Event, TimerId};
use crate::img::{self, AssetSource, Factory, LoadOptions, PngFactory};
use crate::rect::Rect;
use crate::screen::{Ctx, Screen};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// The display area every mode switch returns to.
pub const RECT: Rect = Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT);

const HANDLER_PREFIX: &str = "handle_";
const FULLSCREEN_HANDLER: &str = "handle_fullscreen";
const QUIT_HANDLER: &str = "handle_quit";

/// An event handler. Returns whether it consumed the event.
pub type Handler<S> = fn(&mut S, &mut Ctx<'_>, &Event) -> Result<bool>;

/// The ordered handler table of a state type.
pub struct Handlers<S> {
    entries: Vec<(&'static str, Handler<S>)>,
}

impl<S: GameState> Handlers<S> {
    pub fn empty() -> Self {
        Handlers {
            entries: Vec::new(),
        }
    }

    /// `handle_fullscreen` followed by `handle_quit`.
    pub fn builtin() -> Self {
        Self::empty()
            .with(FULLSCREEN_HANDLER, S::handle_fullscreen)
            .with(QUIT_HANDLER, S::handle_quit)
    }

    /// Appends `handler`, or swaps it in place of the handler already
    /// registered under `name`.
    pub fn with(mut self, name: &'static str, handler: Handler<S>) -> Self {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = handler,
            None => self.entries.push((name, handler)),
        }
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    fn validate(&self) -> Result<()> {
        for (name, _) in &self.entries {
            if name.len() <= HANDLER_PREFIX.len() || !name.starts_with(HANDLER_PREFIX) {
                return Err(Error::InvariantViolation(format!(
                    "handler `{}` must be named `{}<something>`",
                    name, HANDLER_PREFIX
                ))
                .into());
            }
        }
        if !self.entries.iter().any(|(name, _)| *name == QUIT_HANDLER) {
            return Err(Error::InvariantViolation(format!(
                "no `{}` registered, the state could never stop running",
                QUIT_HANDLER
            ))
            .into());
        }
        Ok(())
    }
}

/// State shared by every game state: the liveness flag and the handler
/// table captured at construction.
pub struct Base<S> {
    active: bool,
    handlers: Vec<(&'static str, Handler<S>)>,
}

impl<S: GameState> Base<S> {
    /// Captures `S::handlers()`.
    pub fn new() -> Result<Self> {
        Self::with_handlers(S::handlers())
    }

    pub fn with_handlers(handlers: Handlers<S>) -> Result<Self> {
        handlers.validate()?;
        Ok(Base {
            active: true,
            handlers: handlers.entries,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|(name, _)| *name).collect()
    }
}

pub trait GameState: Sized {
    fn base(&self) -> &Base<Self>;
    fn base_mut(&mut self) -> &mut Base<Self>;

    /// Redraws the whole screen.
    fn draw(&mut self, screen: &mut dyn Screen) -> Result<()>;

    /// Runs once after the loop exits.
    fn cleanup(&mut self, _ctx: &mut Ctx<'_>) {}

    fn handlers() -> Handlers<Self> {
        Handlers::builtin()
    }

    fn handle_quit(&mut self, ctx: &mut Ctx<'_>, event: &Event) -> Result<bool> {
        builtin::quit(self, ctx, event)
    }

    fn handle_fullscreen(&mut self, ctx: &mut Ctx<'_>, event: &Event) -> Result<bool> {
        builtin::fullscreen(self, ctx, event)
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn is_active(&self) -> bool {
        self.base().active
    }

    fn deactivate(&mut self) {
        self.base_mut().active = false;
    }

    /// Finishes construction with the initial draw. Constructors end with
    /// this.
    fn initialized(mut self, screen: &mut dyn Screen) -> Result<Self> {
        self.draw(screen)?;
        log::debug!("{} ready", self.name());
        Ok(self)
    }

    /// Offers `event` to each handler in order until one consumes it.
    fn dispatch(&mut self, ctx: &mut Ctx<'_>, event: &Event) -> Result<bool> {
        let mut index = 0;
        while let Some(&(name, handler)) = self.base().handlers.get(index) {
            if handler(self, ctx, event)? {
                log::trace!("{:?} consumed by {}", event, name);
                return Ok(true);
            }
            index += 1;
        }
        Ok(false)
    }

    /// Polls and dispatches events until the state deactivates, then cleans
    /// up. Cleanup also runs when a handler fails.
    fn run(&mut self, ctx: &mut Ctx<'_>) -> Result<()> {
        log::info!("{} running", self.name());
        let result = event_loop(self, ctx);
        self.cleanup(ctx);
        log::info!("{} stopped", self.name());
        result
    }
}

fn event_loop<S: GameState>(state: &mut S, ctx: &mut Ctx<'_>) -> Result<()> {
    while state.is_active() {
        for event in ctx.events.poll() {
            state.dispatch(ctx, &event)?;
            if !state.is_active() {
                break;
            }
        }
    }
    Ok(())
}

/// Default bodies of the built-in handlers, for overrides that want to fall
/// back to them.
pub mod builtin {
    use anyhow::Result;

    use super::{GameState, RECT};
    use crate::event::{keypressed, Event};
    use crate::key::{Key, Mod};
    use crate::screen::Ctx;

    pub const FULLSCREEN_KEY: Key = Key::F11;

    pub fn quit<S: GameState>(state: &mut S, _ctx: &mut Ctx<'_>, event: &Event) -> Result<bool> {
        if *event == Event::Quit || keypressed(event, Key::C, Some(Mod::CTRL)) {
            state.deactivate();
            return Ok(true);
        }
        Ok(false)
    }

    pub fn fullscreen<S: GameState>(
        state: &mut S,
        ctx: &mut Ctx<'_>,
        event: &Event,
    ) -> Result<bool> {
        if !keypressed(event, FULLSCREEN_KEY, None) {
            return Ok(false);
        }
        let fullscreen = !ctx.screen.is_fullscreen();
        log::info!(
            "Switching to {} mode",
            if fullscreen { "fullscreen" } else { "windowed" }
        );
        ctx.screen.set_mode(RECT.size(), fullscreen)?;
        // The old surface contents do not survive a mode switch.
        state.draw(&mut *ctx.screen)?;
        Ok(true)
    }
}

/// Shows the bundled title card until its display time runs out or the
/// player quits.
pub struct TitleCard {
    base: Base<TitleCard>,
    image: PngFactory,
    expired: bool,
}

impl TitleCard {
    pub const TIMED_QUIT: TimerId = TimerId::USER;
    pub const DISPLAY_TIME_MS: u32 = 5000;

    pub fn new(ctx: &mut Ctx<'_>) -> Result<Self> {
        let options = LoadOptions::builder().source(AssetSource::Common).build();
        let image = img::load("title_card", options)?;
        let card = TitleCard {
            base: Base::new()?,
            image,
            expired: false,
        }
        .initialized(&mut *ctx.screen)?;
        ctx.events.set_timer(Self::TIMED_QUIT, Self::DISPLAY_TIME_MS);
        Ok(card)
    }

    /// Whether the card stopped because its display time ran out rather than
    /// because the player quit.
    pub fn expired(&self) -> bool {
        self.expired
    }
}

impl GameState for TitleCard {
    fn base(&self) -> &Base<Self> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base<Self> {
        &mut self.base
    }

    fn draw(&mut self, screen: &mut dyn Screen) -> Result<()> {
        screen.fill(Color::BLUE)?;
        self.image.draw(screen)?;
        screen.update()
    }

    fn handle_quit(&mut self, ctx: &mut Ctx<'_>, event: &Event) -> Result<bool> {
        if *event == Event::Timer(Self::TIMED_QUIT) {
            self.expired = true;
            self.deactivate();
            return Ok(true);
        }
        builtin::quit(self, ctx, event)
    }

    fn cleanup(&mut self, ctx: &mut Ctx<'_>) {
        ctx.events.set_timer(Self::TIMED_QUIT, 0);
    }
}

#[cfg(test)]
mod tests;
