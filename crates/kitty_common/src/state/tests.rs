use anyhow::{anyhow, Result};

use super::{builtin, Base, GameState, Handlers, TitleCard, RECT};
use crate::color::Color;
use crate::error::Error;
use crate::event::{Event, MouseButton, TimerId};
use crate::img::Bitmap;
use crate::key::{Key, Mod};
use crate::screen::{Ctx, Screen};
use crate::testing::{FakeScreen, ScriptedEvents};

/// Counts draws and cleanups, and records the events no built-in handler
/// wanted.
struct MockGame {
    base: Base<MockGame>,
    drawn: usize,
    cleaned: usize,
    active_at_cleanup: Option<bool>,
    leftovers: Vec<Event>,
}

impl MockGame {
    fn new(screen: &mut dyn Screen) -> Self {
        MockGame {
            base: Base::new().unwrap(),
            drawn: 0,
            cleaned: 0,
            active_at_cleanup: None,
            leftovers: Vec::new(),
        }
        .initialized(screen)
        .unwrap()
    }

    fn handle_leftover(&mut self, _ctx: &mut Ctx<'_>, event: &Event) -> Result<bool> {
        self.leftovers.push(*event);
        Ok(false)
    }
}

impl GameState for MockGame {
    fn base(&self) -> &Base<Self> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base<Self> {
        &mut self.base
    }

    fn draw(&mut self, _screen: &mut dyn Screen) -> Result<()> {
        self.drawn += 1;
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut Ctx<'_>) {
        self.cleaned += 1;
        self.active_at_cleanup = Some(self.is_active());
    }

    fn handlers() -> Handlers<Self> {
        Handlers::builtin().with("handle_leftover", Self::handle_leftover)
    }
}

fn ctrl_c() -> Event {
    Event::key_down_with(Key::C, Mod::LCTRL)
}

fn f11() -> Event {
    Event::key_down(Key::F11)
}

fn setup() -> (FakeScreen, ScriptedEvents, MockGame) {
    let mut screen = FakeScreen::default();
    let game = MockGame::new(&mut screen);
    (screen, ScriptedEvents::default(), game)
}

#[test]
fn construction_draws_once_and_is_active() {
    let (_screen, _events, game) = setup();
    assert!(game.is_active());
    assert_eq!(game.drawn, 1);
    assert_eq!(game.cleaned, 0);
}

#[test]
fn handlers_keep_registration_order() {
    let (_screen, _events, game) = setup();
    assert_eq!(
        game.base().handler_names(),
        vec!["handle_fullscreen", "handle_quit", "handle_leftover"]
    );
}

#[test]
fn quit_on_window_close() {
    let (mut screen, mut events, mut game) = setup();
    let mut ctx = Ctx::new(&mut screen, &mut events);
    assert!(game.handle_quit(&mut ctx, &Event::Quit).unwrap());
    assert!(!game.is_active());
}

#[test]
fn quit_on_ctrl_c() {
    let (mut screen, mut events, mut game) = setup();
    let mut ctx = Ctx::new(&mut screen, &mut events);
    assert!(game.handle_quit(&mut ctx, &ctrl_c()).unwrap());
    assert!(!game.is_active());
}

#[test]
fn quit_ignores_other_events() {
    let (mut screen, mut events, mut game) = setup();
    let mut ctx = Ctx::new(&mut screen, &mut events);
    assert!(!game.handle_quit(&mut ctx, &Event::key_down(Key::C)).unwrap());
    assert!(!game.handle_quit(&mut ctx, &f11()).unwrap());
    assert!(game.is_active());
}

#[test]
fn quit_twice_is_harmless() {
    let (mut screen, mut events, mut game) = setup();
    let mut ctx = Ctx::new(&mut screen, &mut events);
    assert!(game.handle_quit(&mut ctx, &Event::Quit).unwrap());
    assert!(game.handle_quit(&mut ctx, &ctrl_c()).unwrap());
    assert!(!game.is_active());
}

#[test]
fn fullscreen_switches_mode_and_redraws() {
    let (mut screen, mut events, mut game) = setup();
    screen.fullscreen = false;
    let consumed = game
        .handle_fullscreen(&mut Ctx::new(&mut screen, &mut events), &f11())
        .unwrap();
    assert!(consumed);
    assert!(screen.fullscreen);
    assert_eq!(screen.mode_changes, vec![(RECT.size(), true)]);
    assert_eq!(game.drawn, 2);
}

#[test]
fn unfullscreen_switches_back() {
    let (mut screen, mut events, mut game) = setup();
    screen.fullscreen = true;
    game.handle_fullscreen(&mut Ctx::new(&mut screen, &mut events), &f11())
        .unwrap();
    assert!(!screen.fullscreen);
    assert_eq!(screen.mode_changes, vec![(RECT.size(), false)]);
    assert_eq!(game.drawn, 2);
}

#[test]
fn fullscreen_ignores_other_keys() {
    let (mut screen, mut events, mut game) = setup();
    let mut ctx = Ctx::new(&mut screen, &mut events);
    assert!(!game
        .handle_fullscreen(&mut ctx, &Event::key_down(Key::F10))
        .unwrap());
    assert!(!game.handle_fullscreen(&mut ctx, &Event::Quit).unwrap());
    drop(ctx);
    assert!(screen.mode_changes.is_empty());
    assert_eq!(game.drawn, 1);
}

#[test]
fn run_toggles_then_quits() {
    let (mut screen, _, mut game) = setup();
    let mut events = ScriptedEvents::single_batch([f11(), f11(), f11(), ctrl_c()]);
    game.run(&mut Ctx::new(&mut screen, &mut events)).unwrap();
    assert!(screen.fullscreen);
    assert_eq!(game.drawn, 4);
    assert!(!game.is_active());
    assert_eq!(game.cleaned, 1);
}

#[test]
fn draw_count_and_fullscreen_follow_toggle_count() {
    for toggles in 0..5 {
        let (mut screen, _, mut game) = setup();
        let mut script: Vec<Event> = (0..toggles).map(|_| f11()).collect();
        script.push(Event::Quit);
        let mut events = ScriptedEvents::single_batch(script);
        game.run(&mut Ctx::new(&mut screen, &mut events)).unwrap();
        assert_eq!(game.drawn, toggles + 1);
        assert_eq!(screen.fullscreen, toggles % 2 == 1);
    }
}

#[test]
fn run_cleans_up_once_after_loop_exit() {
    let (mut screen, _, mut game) = setup();
    let mut events = ScriptedEvents::new([
        vec![Event::key_down(Key::A)],
        vec![],
        vec![Event::MouseMotion { pos: (3, 4) }, Event::Quit],
    ]);
    game.run(&mut Ctx::new(&mut screen, &mut events)).unwrap();
    assert_eq!(events.polls, 3);
    assert_eq!(game.cleaned, 1);
    assert_eq!(game.active_at_cleanup, Some(false));
}

#[test]
fn run_stops_polling_once_inactive() {
    let (mut screen, _, mut game) = setup();
    let mut events = ScriptedEvents::new([vec![Event::Quit, f11()], vec![f11()]]);
    game.run(&mut Ctx::new(&mut screen, &mut events)).unwrap();
    assert_eq!(events.polls, 1);
    assert_eq!(events.remaining(), 1);
    // The F11 queued behind the quit is not dispatched.
    assert_eq!(game.drawn, 1);
    assert!(screen.mode_changes.is_empty());
}

#[test]
fn unconsumed_events_fall_through_to_later_handlers() {
    let (mut screen, _, mut game) = setup();
    let click = Event::MouseButtonDown {
        button: MouseButton::Left,
        pos: (1, 2),
    };
    let mut events =
        ScriptedEvents::single_batch([click, f11(), Event::key_down(Key::C), ctrl_c()]);
    game.run(&mut Ctx::new(&mut screen, &mut events)).unwrap();
    // F11 and Ctrl+C were consumed by the built-ins.
    assert_eq!(game.leftovers, vec![click, Event::key_down(Key::C)]);
}

#[test]
fn dispatch_reports_unconsumed() {
    let (mut screen, mut events, mut game) = setup();
    let mut ctx = Ctx::new(&mut screen, &mut events);
    assert!(!game.dispatch(&mut ctx, &Event::Unknown).unwrap());
    assert!(game.dispatch(&mut ctx, &Event::Quit).unwrap());
}

#[test]
fn registering_an_existing_name_replaces_it() {
    fn ignore_quit(_: &mut MockGame, _: &mut Ctx<'_>, _: &Event) -> Result<bool> {
        Ok(false)
    }

    let handlers = MockGame::handlers().with("handle_quit", ignore_quit);
    assert_eq!(
        handlers.names(),
        vec!["handle_fullscreen", "handle_quit", "handle_leftover"]
    );

    let mut screen = FakeScreen::default();
    let mut events = ScriptedEvents::default();
    let mut game = MockGame::new(&mut screen);
    game.base = Base::with_handlers(handlers).unwrap();
    let mut ctx = Ctx::new(&mut screen, &mut events);
    assert!(!game.dispatch(&mut ctx, &Event::Quit).unwrap());
    assert!(game.is_active());
}

/// A state that never registers a quit handler.
struct Unstoppable {
    base: Base<Unstoppable>,
}

impl GameState for Unstoppable {
    fn base(&self) -> &Base<Self> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base<Self> {
        &mut self.base
    }

    fn draw(&mut self, _screen: &mut dyn Screen) -> Result<()> {
        Ok(())
    }

    fn handlers() -> Handlers<Self> {
        Handlers::empty().with("handle_fullscreen", builtin::fullscreen)
    }
}

#[test]
fn base_without_quit_handler_is_rejected() {
    let err = Base::<Unstoppable>::new().err().unwrap();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InvariantViolation(_))
    ));
}

#[test]
fn handler_names_must_follow_convention() {
    let handlers = Handlers::<MockGame>::builtin().with("on_click", MockGame::handle_leftover);
    let err = Base::with_handlers(handlers).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InvariantViolation(_))
    ));

    let handlers = Handlers::<MockGame>::builtin().with("handle_", MockGame::handle_leftover);
    assert!(Base::with_handlers(handlers).is_err());
}

/// Fails every mode switch.
#[derive(Default)]
struct BrokenDisplay {
    inner: FakeScreen,
}

impl Screen for BrokenDisplay {
    fn size(&self) -> (u32, u32) {
        self.inner.size()
    }

    fn is_fullscreen(&self) -> bool {
        self.inner.is_fullscreen()
    }

    fn set_mode(&mut self, _size: (u32, u32), _fullscreen: bool) -> Result<()> {
        Err(anyhow!("display lost"))
    }

    fn fill(&mut self, color: Color) -> Result<()> {
        self.inner.fill(color)
    }

    fn blit(&mut self, bitmap: &Bitmap, topleft: (i32, i32)) -> Result<()> {
        self.inner.blit(bitmap, topleft)
    }

    fn update(&mut self) -> Result<()> {
        self.inner.update()
    }
}

#[test]
fn handler_error_aborts_run_after_cleanup() {
    let mut screen = BrokenDisplay::default();
    let mut game = MockGame::new(&mut screen);
    let mut events = ScriptedEvents::single_batch([f11(), Event::Quit]);
    let err = game
        .run(&mut Ctx::new(&mut screen, &mut events))
        .unwrap_err();
    assert_eq!(err.to_string(), "display lost");
    assert_eq!(game.cleaned, 1);
    assert_eq!(game.drawn, 1);
}

#[test]
fn title_card_draws_and_schedules_timer() {
    let mut screen = FakeScreen::default();
    let mut events = ScriptedEvents::default();
    let card = TitleCard::new(&mut Ctx::new(&mut screen, &mut events)).unwrap();
    assert!(card.is_active());
    assert_eq!(screen.fills, vec![Color::BLUE]);
    assert_eq!(screen.blits.len(), 1);
    assert_eq!(screen.blits[0].topleft, (0, 0));
    assert_eq!(screen.updates, 1);
    assert_eq!(
        events.timers,
        vec![(TitleCard::TIMED_QUIT, TitleCard::DISPLAY_TIME_MS)]
    );
}

#[test]
fn title_card_quits_when_timer_fires() {
    let mut screen = FakeScreen::default();
    let mut events = ScriptedEvents::single_batch([Event::Timer(TitleCard::TIMED_QUIT)]);
    let mut card = TitleCard::new(&mut Ctx::new(&mut screen, &mut events)).unwrap();
    card.run(&mut Ctx::new(&mut screen, &mut events)).unwrap();
    assert!(!card.is_active());
    assert!(card.expired());
    assert_eq!(
        events.timers,
        vec![
            (TitleCard::TIMED_QUIT, TitleCard::DISPLAY_TIME_MS),
            (TitleCard::TIMED_QUIT, 0),
        ]
    );
}

#[test]
fn title_card_still_quits_on_ctrl_c() {
    let mut screen = FakeScreen::default();
    let other_timer = Event::Timer(TimerId(7));
    let mut events = ScriptedEvents::new([vec![other_timer], vec![ctrl_c()]]);
    let mut card = TitleCard::new(&mut Ctx::new(&mut screen, &mut events)).unwrap();
    card.run(&mut Ctx::new(&mut screen, &mut events)).unwrap();
    assert!(!card.is_active());
    assert!(!card.expired());
    assert_eq!(events.polls, 2);
    assert_eq!(events.timers.last(), Some(&(TitleCard::TIMED_QUIT, 0)));
}

#[test]
fn title_card_redraws_on_fullscreen() {
    let mut screen = FakeScreen::default();
    let mut events = ScriptedEvents::single_batch([f11(), Event::Quit]);
    let mut card = TitleCard::new(&mut Ctx::new(&mut screen, &mut events)).unwrap();
    card.run(&mut Ctx::new(&mut screen, &mut events)).unwrap();
    assert!(screen.fullscreen);
    assert_eq!(screen.fills.len(), 2);
    assert_eq!(screen.updates, 2);
}
