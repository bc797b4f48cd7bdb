use std::path::PathBuf;

use glam::Vec2;
use pharcobial_core::{GraphicCatalog, GraphicKey, InputEvent, Key, Position, SpriteId};
use pharcobial_game::{Game, GameOptions, SetupError, SimulationClock, ViewId};
use pharcobial_rendering::{
    Canvas, Color, FrameInput, GraphicError, LoopControl, TextPosition, TextStyle,
};
use pharcobial_system_pursuit::FixedTrigger;
use pharcobial_world::{query, sprites::Sprite};

#[derive(Debug, Default)]
struct RecordingCanvas {
    graphics: Vec<String>,
    texts: Vec<String>,
}

impl RecordingCanvas {
    fn start_frame(&mut self) {
        self.graphics.clear();
        self.texts.clear();
    }
}

impl GraphicCatalog for RecordingCanvas {
    fn contains(&mut self, _key: &GraphicKey) -> bool {
        true
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, _color: Color) {}

    fn draw_graphic(&mut self, key: &GraphicKey, _position: Vec2) -> Result<(), GraphicError> {
        self.graphics.push(key.to_string());
        Ok(())
    }

    fn draw_text(&mut self, text: &str, _style: TextStyle, _position: TextPosition) {
        self.texts.push(text.to_owned());
    }
}

fn options() -> GameOptions {
    GameOptions {
        assets_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../assets"),
        seed: Some(7),
        ..GameOptions::default()
    }
}

fn game() -> Game {
    Game::setup_with_trigger(options(), Box::new(FixedTrigger(false))).expect("game should set up")
}

fn press(key: Key) -> InputEvent {
    InputEvent::KeyDown(key)
}

fn frame(game: &mut Game, canvas: &mut RecordingCanvas, events: &[InputEvent]) -> LoopControl {
    canvas.start_frame();
    let input = FrameInput {
        events: events.to_vec(),
    };
    game.frame(input, canvas).expect("frame should succeed")
}

fn player_position(game: &Game) -> Position {
    query::player(game.world().world()).base().position()
}

#[test]
fn setup_starts_in_the_running_world() {
    let game = game();

    assert_eq!(game.active_view_id(), ViewId::World);
    assert_eq!(game.clock(), SimulationClock::Running);
    assert!(game.is_running());
    assert_eq!(player_position(&game), Position::new(64, 64));

    let window = game.window_config();
    assert_eq!((window.width, window.height), (1280, 960));
    assert_eq!(game.display().size(), Vec2::new(640.0, 480.0));
}

#[test]
fn seeded_setup_loads_the_default_map() {
    let game = Game::setup(options()).expect("seeded game should set up");

    assert_eq!(query::map(game.world().world()).id(), "default");
}

#[test]
fn world_frame_draws_sprites_and_hud() {
    let mut game = game();
    let mut canvas = RecordingCanvas::default();

    assert_eq!(frame(&mut game, &mut canvas, &[]), LoopControl::Continue);

    assert!(canvas.graphics.iter().any(|graphic| graphic == "grass"));
    assert!(canvas.graphics.iter().any(|graphic| graphic == "wizard"));
    assert_eq!(canvas.texts, ["default (2, 2)"]);
}

#[test]
fn menu_pauses_the_world_until_continue() {
    let mut game = game();
    let mut canvas = RecordingCanvas::default();

    let _ = frame(&mut game, &mut canvas, &[press(Key::Right)]);
    assert_eq!(player_position(&game), Position::new(72, 64));

    let _ = frame(&mut game, &mut canvas, &[press(Key::Escape)]);
    assert_eq!(game.active_view_id(), ViewId::MainMenu);
    assert_eq!(game.clock(), SimulationClock::Paused);
    assert_eq!(canvas.texts, ["Continue", "Options", "Quit"]);
    assert!(canvas.graphics.is_empty());

    let _ = frame(&mut game, &mut canvas, &[]);
    assert_eq!(player_position(&game), Position::new(72, 64));

    let _ = frame(&mut game, &mut canvas, &[press(Key::Enter)]);
    assert_eq!(game.active_view_id(), ViewId::World);
    assert_eq!(game.clock(), SimulationClock::Running);

    // The menu halted the player, so the held key no longer moves it.
    let _ = frame(&mut game, &mut canvas, &[]);
    assert_eq!(player_position(&game), Position::new(72, 64));
}

#[test]
fn paused_world_keeps_its_tick_and_camera() {
    let mut game = game();
    let mut canvas = RecordingCanvas::default();
    let monster = || SpriteId::new("adversary-monster-0");
    let monster_position = |game: &Game| {
        query::find(game.world().world(), &monster())
            .map(|sprite| sprite.base().position())
            .expect("monster should exist")
    };

    let _ = frame(&mut game, &mut canvas, &[]);
    let tick = query::tick_index(game.world().world());
    let offset = game.world().camera().offset();
    let chased_to = monster_position(&game);

    let _ = frame(&mut game, &mut canvas, &[press(Key::Escape)]);
    for _ in 0..5 {
        let _ = frame(&mut game, &mut canvas, &[]);
    }

    assert_eq!(game.clock(), SimulationClock::Paused);
    assert_eq!(query::tick_index(game.world().world()), tick);
    assert_eq!(monster_position(&game), chased_to);
    assert_eq!(game.world().camera().offset(), offset);
    assert_eq!(canvas.texts, ["Continue", "Options", "Quit"]);

    let _ = frame(&mut game, &mut canvas, &[press(Key::Escape)]);
    assert_eq!(game.active_view_id(), ViewId::World);
    assert_eq!(query::tick_index(game.world().world()), tick + 1);
    assert_eq!(game.world().camera().offset(), offset);
    assert!(canvas.graphics.iter().any(|graphic| graphic == "pharma"));
}

#[test]
fn options_menu_toggles_music() {
    let mut game = game();
    let mut canvas = RecordingCanvas::default();

    let _ = frame(
        &mut game,
        &mut canvas,
        &[press(Key::Escape), press(Key::Down), press(Key::Enter)],
    );
    assert_eq!(game.active_view_id(), ViewId::OptionsMenu);
    assert_eq!(canvas.texts, ["Back", "Music (enabled)", "Sfx (enabled)"]);

    let _ = frame(&mut game, &mut canvas, &[press(Key::Down), press(Key::Enter)]);
    assert!(game.options().disable_music);
    assert_eq!(canvas.texts, ["Back", "Music (disabled)", "Sfx (enabled)"]);
    assert_eq!(game.options_menu().items()[1].title(), "Music (disabled)");

    let _ = frame(&mut game, &mut canvas, &[press(Key::Escape)]);
    assert_eq!(game.active_view_id(), ViewId::MainMenu);
    let _ = frame(&mut game, &mut canvas, &[press(Key::Escape)]);
    assert_eq!(game.active_view_id(), ViewId::World);
}

#[test]
fn reopened_menu_selects_the_first_item() {
    let mut game = game();
    let mut canvas = RecordingCanvas::default();

    let _ = frame(&mut game, &mut canvas, &[press(Key::Escape), press(Key::Down)]);
    assert_eq!(game.main_menu().selected(), 1);

    let _ = frame(&mut game, &mut canvas, &[press(Key::Escape), press(Key::Escape)]);
    assert_eq!(game.active_view_id(), ViewId::MainMenu);
    assert_eq!(game.main_menu().selected(), 0);
}

#[test]
fn quit_event_and_quit_item_both_exit() {
    let mut game = game();
    let mut canvas = RecordingCanvas::default();
    assert_eq!(
        frame(&mut game, &mut canvas, &[InputEvent::Quit]),
        LoopControl::Exit
    );
    assert!(!game.is_running());

    let mut game = self::game();
    let quit_item = [
        press(Key::Escape),
        press(Key::Down),
        press(Key::Down),
        press(Key::Enter),
    ];
    assert_eq!(frame(&mut game, &mut canvas, &quit_item), LoopControl::Exit);
}

#[test]
fn missing_map_aborts_setup() {
    let options = GameOptions {
        map_id: "missing".to_owned(),
        ..options()
    };

    assert!(matches!(Game::setup(options), Err(SetupError::Map(_))));
}

#[test]
fn invalid_options_abort_setup() {
    let options = GameOptions {
        fps: 0,
        ..options()
    };

    assert!(matches!(Game::setup(options), Err(SetupError::Options(_))));
}
