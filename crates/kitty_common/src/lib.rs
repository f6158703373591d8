pub mod color;
pub mod error;
pub mod event;
pub mod img;
pub mod key;
pub mod rect;
pub mod screen;
pub mod state;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use color::Color;
pub use error::Error;
pub use event::{keypressed, Event, MouseButton, TimerId};
pub use img::{AssetSource, Bitmap, Factory, LoadOptions, PngFactory, RectFactory};
pub use key::{Key, Mod};
pub use rect::Rect;
pub use screen::{Ctx, EventSource, Screen};
pub use state::{Base, GameState, Handler, Handlers, TitleCard};

/// Base display width in pixels, used for windowed and fullscreen modes alike.
pub const SCREEN_WIDTH: u32 = 1024;
/// Base display height in pixels.
pub const SCREEN_HEIGHT: u32 = 576;
