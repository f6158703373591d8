mod timers;

use std::time::Instant;

use anyhow::{anyhow, Result};
use sdl2::event::Event as SdlEvent;
use sdl2::keyboard::{Keycode, Mod as SdlMod};
use sdl2::mouse::MouseButton as SdlMouseButton;
use sdl2::pixels::{Color as SdlColor, PixelFormatEnum};
use sdl2::rect::Rect as SdlRect;
use sdl2::render::{BlendMode, TextureCreator, WindowCanvas};
use sdl2::video::{FullscreenType, WindowContext};
use typed_builder::TypedBuilder;

pub use kitty_common;
pub use sdl2;
pub use timers::{Timers, MAX_WAIT};

use kitty_common::{
    Bitmap, Color, Ctx, Event, EventSource, Key, Mod, MouseButton, Screen, TimerId,
    SCREEN_HEIGHT, SCREEN_WIDTH,
};

#[derive(TypedBuilder)]
pub struct SdlInitInfo {
    #[builder(setter(into))]
    pub title: String,
    #[builder(default = SCREEN_WIDTH)]
    pub width: u32,
    #[builder(default = SCREEN_HEIGHT)]
    pub height: u32,
    #[builder(default = false)]
    pub fullscreen: bool,
}

/// Owns the SDL subsystems and lends them out as a [`Ctx`].
pub struct SdlContext {
    _sdl_context: sdl2::Sdl,
    _video_subsystem: sdl2::VideoSubsystem,
    pub screen: SdlScreen,
    pub events: SdlEvents,
}

impl SdlContext {
    pub fn new(sdl_init_info: SdlInitInfo) -> Result<Self> {
        let SdlInitInfo {
            title,
            width,
            height,
            fullscreen,
        } = sdl_init_info;
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
        let window = video_subsystem
            .window(&title, width, height)
            .position_centered()
            .build()?;
        let mut canvas = window.into_canvas().present_vsync().build()?;
        // Drawing always happens at the base resolution; SDL scales it to
        // whatever the window currently is.
        canvas.set_logical_size(width, height)?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;
        log::info!("Opened '{}' at {}x{}", title, width, height);

        let mut screen = SdlScreen {
            canvas,
            texture_creator,
            size: (width, height),
        };
        if fullscreen {
            screen.set_mode((width, height), true)?;
        }

        Ok(SdlContext {
            _sdl_context: sdl_context,
            _video_subsystem: video_subsystem,
            screen,
            events: SdlEvents::new(event_pump),
        })
    }

    pub fn ctx(&mut self) -> Ctx<'_> {
        Ctx::new(&mut self.screen, &mut self.events)
    }
}

pub struct SdlScreen {
    canvas: WindowCanvas,
    texture_creator: TextureCreator<WindowContext>,
    size: (u32, u32),
}

impl Screen for SdlScreen {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn is_fullscreen(&self) -> bool {
        self.canvas.window().fullscreen_state() != FullscreenType::Off
    }

    fn set_mode(&mut self, (width, height): (u32, u32), fullscreen: bool) -> Result<()> {
        let window = self.canvas.window_mut();
        if fullscreen {
            window
                .set_fullscreen(FullscreenType::Desktop)
                .map_err(|e| anyhow!(e))?;
        } else {
            window
                .set_fullscreen(FullscreenType::Off)
                .map_err(|e| anyhow!(e))?;
            window.set_size(width, height)?;
        }
        self.canvas.set_logical_size(width, height)?;
        self.size = (width, height);
        Ok(())
    }

    fn fill(&mut self, color: Color) -> Result<()> {
        self.canvas.set_draw_color(map_color(color));
        self.canvas.clear();
        Ok(())
    }

    fn blit(&mut self, bitmap: &Bitmap, (x, y): (i32, i32)) -> Result<()> {
        let (width, height) = bitmap.size();
        let mut texture = self
            .texture_creator
            .create_texture_static(PixelFormatEnum::RGBA32, width, height)?;
        texture.update(None, bitmap.as_bytes(), bitmap.pitch())?;
        texture.set_blend_mode(BlendMode::Blend);
        self.canvas
            .copy(&texture, None, SdlRect::new(x, y, width, height))
            .map_err(|e| anyhow!(e))
    }

    fn update(&mut self) -> Result<()> {
        self.canvas.present();
        Ok(())
    }
}

/// SDL event queue plus the repeating timers scheduled on it.
pub struct SdlEvents {
    event_pump: sdl2::EventPump,
    timers: Timers,
}

impl SdlEvents {
    fn new(event_pump: sdl2::EventPump) -> Self {
        SdlEvents {
            event_pump,
            timers: Timers::default(),
        }
    }
}

impl EventSource for SdlEvents {
    fn poll(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        let timeout = self.timers.wait_budget(Instant::now());
        if let Some(event) = self.event_pump.wait_event_timeout(timeout.as_millis() as u32) {
            events.push(map_event(event));
            events.extend(self.event_pump.poll_iter().map(map_event));
        }
        events.extend(self.timers.expired(Instant::now()));
        events
    }

    fn set_timer(&mut self, id: TimerId, interval_ms: u32) {
        self.timers.set(id, interval_ms, Instant::now());
    }
}

pub fn map_color(color: Color) -> SdlColor {
    SdlColor::RGBA(color.r, color.g, color.b, color.a)
}

pub fn map_event(event: SdlEvent) -> Event {
    match event {
        SdlEvent::Quit { .. } => Event::Quit,
        SdlEvent::KeyDown {
            keycode, keymod, ..
        } => Event::KeyDown {
            key: keycode.map_or(Key::Unknown, map_keycode),
            keymod: map_keymod(keymod),
        },
        SdlEvent::KeyUp {
            keycode, keymod, ..
        } => Event::KeyUp {
            key: keycode.map_or(Key::Unknown, map_keycode),
            keymod: map_keymod(keymod),
        },
        SdlEvent::MouseButtonDown {
            mouse_btn, x, y, ..
        } => Event::MouseButtonDown {
            button: map_mouse_button(mouse_btn),
            pos: (x, y),
        },
        SdlEvent::MouseButtonUp {
            mouse_btn, x, y, ..
        } => Event::MouseButtonUp {
            button: map_mouse_button(mouse_btn),
            pos: (x, y),
        },
        SdlEvent::MouseMotion { x, y, .. } => Event::MouseMotion { pos: (x, y) },
        _ => Event::Unknown,
    }
}

pub fn map_keymod(keymod: SdlMod) -> Mod {
    let pairs = [
        (SdlMod::LSHIFTMOD, Mod::LSHIFT),
        (SdlMod::RSHIFTMOD, Mod::RSHIFT),
        (SdlMod::LCTRLMOD, Mod::LCTRL),
        (SdlMod::RCTRLMOD, Mod::RCTRL),
        (SdlMod::LALTMOD, Mod::LALT),
        (SdlMod::RALTMOD, Mod::RALT),
    ];
    pairs
        .into_iter()
        .filter(|(sdl, _)| keymod.contains(*sdl))
        .fold(Mod::empty(), |acc, (_, m)| acc | m)
}

pub fn map_mouse_button(button: SdlMouseButton) -> MouseButton {
    match button {
        SdlMouseButton::Left => MouseButton::Left,
        SdlMouseButton::Middle => MouseButton::Middle,
        SdlMouseButton::Right => MouseButton::Right,
        SdlMouseButton::X1 => MouseButton::Other(4),
        SdlMouseButton::X2 => MouseButton::Other(5),
        SdlMouseButton::Unknown => MouseButton::Other(0),
    }
}

pub fn map_keycode(keycode: Keycode) -> Key {
    match keycode {
        Keycode::A => Key::A,
        Keycode::B => Key::B,
        Keycode::C => Key::C,
        Keycode::D => Key::D,
        Keycode::E => Key::E,
        Keycode::F => Key::F,
        Keycode::G => Key::G,
        Keycode::H => Key::H,
        Keycode::I => Key::I,
        Keycode::J => Key::J,
        Keycode::K => Key::K,
        Keycode::L => Key::L,
        Keycode::M => Key::M,
        Keycode::N => Key::N,
        Keycode::O => Key::O,
        Keycode::P => Key::P,
        Keycode::Q => Key::Q,
        Keycode::R => Key::R,
        Keycode::S => Key::S,
        Keycode::T => Key::T,
        Keycode::U => Key::U,
        Keycode::V => Key::V,
        Keycode::W => Key::W,
        Keycode::X => Key::X,
        Keycode::Y => Key::Y,
        Keycode::Z => Key::Z,
        Keycode::Num0 | Keycode::Kp0 => Key::Num0,
        Keycode::Num1 | Keycode::Kp1 => Key::Num1,
        Keycode::Num2 | Keycode::Kp2 => Key::Num2,
        Keycode::Num3 | Keycode::Kp3 => Key::Num3,
        Keycode::Num4 | Keycode::Kp4 => Key::Num4,
        Keycode::Num5 | Keycode::Kp5 => Key::Num5,
        Keycode::Num6 | Keycode::Kp6 => Key::Num6,
        Keycode::Num7 | Keycode::Kp7 => Key::Num7,
        Keycode::Num8 | Keycode::Kp8 => Key::Num8,
        Keycode::Num9 | Keycode::Kp9 => Key::Num9,
        Keycode::F1 => Key::F1,
        Keycode::F2 => Key::F2,
        Keycode::F3 => Key::F3,
        Keycode::F4 => Key::F4,
        Keycode::F5 => Key::F5,
        Keycode::F6 => Key::F6,
        Keycode::F7 => Key::F7,
        Keycode::F8 => Key::F8,
        Keycode::F9 => Key::F9,
        Keycode::F10 => Key::F10,
        Keycode::F11 => Key::F11,
        Keycode::F12 => Key::F12,
        Keycode::Left => Key::Left,
        Keycode::Right => Key::Right,
        Keycode::Up => Key::Up,
        Keycode::Down => Key::Down,
        Keycode::Escape => Key::Escape,
        Keycode::Return | Keycode::KpEnter => Key::Return,
        Keycode::Space => Key::Space,
        Keycode::Backspace => Key::Backspace,
        Keycode::Tab => Key::Tab,
        _ => Key::Unknown,
    }
}
