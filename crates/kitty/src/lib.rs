use anyhow::Result;
use kitty_common::img::FromAsset;
use kitty_common::state::RECT;
use kitty_common::{
    local_assets, Base, Color, Ctx, Event, Factory, GameState, Handlers, Key, LoadOptions,
    MouseButton, PngFactory, RectFactory, Screen, TitleCard,
};
use kitty_sdl2::{SdlContext, SdlInitInfo};

const BACKGROUND: Color = Color::rgb(40, 44, 64);

/// A paw print that walks with the arrow keys and jumps back to the middle
/// of the screen when clicked.
pub struct Playground {
    base: Base<Playground>,
    paw: PngFactory,
}

impl Playground {
    pub const STEP: i32 = 16;

    pub fn new(screen: &mut dyn Screen) -> Result<Self> {
        let options = LoadOptions::builder()
            .position(RECT.center())
            .shift((-0.5, -0.5))
            .source(local_assets!())
            .build();
        Playground {
            base: Base::new()?,
            paw: PngFactory::from_asset("paw", options)?,
        }
        .initialized(screen)
    }

    pub fn paw(&self) -> &PngFactory {
        &self.paw
    }

    fn handle_click(&mut self, ctx: &mut Ctx<'_>, event: &Event) -> Result<bool> {
        let Event::MouseButtonDown {
            button: MouseButton::Left,
            pos,
        } = *event
        else {
            return Ok(false);
        };
        if !self.paw.collidepoint(pos) {
            return Ok(false);
        }
        let (cx, cy) = self.paw.rect().center();
        let (hx, hy) = RECT.center();
        self.paw.move_by((hx - cx, hy - cy));
        self.draw(&mut *ctx.screen)?;
        Ok(true)
    }

    fn handle_arrows(&mut self, ctx: &mut Ctx<'_>, event: &Event) -> Result<bool> {
        let Event::KeyDown { key, .. } = *event else {
            return Ok(false);
        };
        let delta = match key {
            Key::Left => (-Self::STEP, 0),
            Key::Right => (Self::STEP, 0),
            Key::Up => (0, -Self::STEP),
            Key::Down => (0, Self::STEP),
            _ => return Ok(false),
        };
        self.paw.move_by(delta);
        self.draw(&mut *ctx.screen)?;
        Ok(true)
    }
}

impl GameState for Playground {
    fn base(&self) -> &Base<Self> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base<Self> {
        &mut self.base
    }

    fn draw(&mut self, screen: &mut dyn Screen) -> Result<()> {
        screen.fill(BACKGROUND)?;
        self.paw.draw(screen)?;
        screen.update()
    }

    fn handlers() -> Handlers<Self> {
        Handlers::builtin()
            .with("handle_click", Self::handle_click)
            .with("handle_arrows", Self::handle_arrows)
    }
}

/// Shows the title card and, unless the player quit it early, the
/// playground.
pub fn run(fullscreen: bool) -> Result<()> {
    let init_info = SdlInitInfo::builder()
        .title("Kitty")
        .fullscreen(fullscreen)
        .build();
    let mut sdl = SdlContext::new(init_info)?;
    let mut ctx = sdl.ctx();

    let mut title_card = TitleCard::new(&mut ctx)?;
    title_card.run(&mut ctx)?;
    if !title_card.expired() {
        return Ok(());
    }

    let mut playground = Playground::new(&mut *ctx.screen)?;
    playground.run(&mut ctx)
}
