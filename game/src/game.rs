//! Ordered setup and the per-frame cycle.

use anyhow::Context as _;
use pharcobial_core::{ControlEvent, GameAction};
use pharcobial_rendering::{
    Camera, Canvas, FrameInput, LoopControl, RenderGroup, WindowConfig,
};
use pharcobial_system_pursuit::{Ambush, Trigger};
use pharcobial_world::{
    collision::{Collision, CollisionError},
    map::{Map, MapLoadError},
    query,
    sprites::Sprite,
    LevelError, World,
};
use thiserror::Error;

use crate::{
    display::Display,
    events::EventDispatcher,
    menu::Menu,
    options::{GameOptions, OptionsError},
    views::{SimulationClock, Transition, View, ViewId, ViewStack},
    world_view::WorldView,
};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Options failed validation.
    #[error("invalid options")]
    Options(#[from] OptionsError),
    /// The window is too small for a logical screen.
    #[error("display {width}x{height} has no area")]
    EmptyDisplay {
        /// Logical width.
        width: u32,
        /// Logical height.
        height: u32,
    },
    /// The map could not be loaded.
    #[error("failed to load map")]
    Map(#[from] MapLoadError),
    /// The collision grid does not fit the map.
    #[error("failed to build collision grid")]
    Collision(#[from] CollisionError),
    /// Sprites could not be spawned.
    #[error("failed to populate level")]
    Level(#[from] LevelError),
}

/// Every subsystem of a running session, built in a fixed order.
#[derive(Debug)]
pub struct Game {
    options: GameOptions,
    display: Display,
    dispatcher: EventDispatcher,
    stack: ViewStack,
    world: WorldView,
    main_menu: Menu,
    options_menu: Menu,
    running: bool,
}

impl Game {
    /// Builds a session whose ambush trigger is seeded from the options.
    pub fn setup(options: GameOptions) -> Result<Self, SetupError> {
        let trigger: Box<dyn Trigger> = match options.seed {
            Some(seed) => Box::new(Ambush::seeded(seed)),
            None => Box::new(Ambush::from_entropy()),
        };
        Self::setup_with_trigger(options, trigger)
    }

    /// Builds a session with an explicit ambush trigger.
    ///
    /// Options, display, map, world view, collision and sprites are each
    /// validated before the next is constructed.
    pub fn setup_with_trigger(
        options: GameOptions,
        trigger: Box<dyn Trigger>,
    ) -> Result<Self, SetupError> {
        options.validate()?;

        let display = Display::new(&options);
        display.validate()?;

        let map = Map::load(options.maps_dir(), &options.map_id)?;
        map.validate()?;

        let camera = Camera::new(display.size());
        let group = RenderGroup::new();
        log::debug!("World view ready.");

        let collision = Collision::from_map(&map);
        collision.validate(&map)?;

        let world = World::new(map, collision, trigger)?;
        let player = query::player(&world).id().clone();

        let mut world = WorldView::new(world, camera, group, options.show_hud, display.font_size());
        world.camera_mut().follow(player);

        let main_menu = Menu::main(&display);
        let options_menu = Menu::options(&display, &options);
        log::info!("{} set up with map `{}`", pharcobial_core::GAME_NAME, options.map_id);

        Ok(Self {
            dispatcher: EventDispatcher::new(options.key_bindings),
            options,
            display,
            stack: ViewStack::new(),
            world,
            main_menu,
            options_menu,
            running: true,
        })
    }

    /// Runs one frame: dispatches input, updates the world under the stack's
    /// clock, then updates and draws the active view.
    pub fn frame(
        &mut self,
        input: FrameInput,
        canvas: &mut dyn Canvas,
    ) -> anyhow::Result<LoopControl> {
        for event in input.events {
            let Some(action) = self.dispatcher.dispatch(event, self.stack.active()) else {
                continue;
            };

            match action {
                GameAction::Quit => self.running = false,
                GameAction::OpenMenu => {
                    self.world.halt_player();
                    self.apply(Transition::Push(ViewId::MainMenu))?;
                }
                GameAction::Continue(control) => {
                    let transition = self.handle_control(control);
                    self.apply(transition)?;
                }
            }

            if !self.running {
                log::info!("Quitting.");
                return Ok(LoopControl::Exit);
            }
        }

        let clock = self.stack.clock();
        self.world.update(clock, canvas);
        if self.stack.active() != ViewId::World {
            self.active_view().update(clock, canvas);
        }
        self.active_view().draw(canvas);

        Ok(LoopControl::Continue)
    }

    fn handle_control(&mut self, control: ControlEvent) -> Transition {
        let Self {
            options,
            stack,
            world,
            main_menu,
            options_menu,
            ..
        } = self;

        let view: &mut dyn View = match stack.active() {
            ViewId::World => world,
            ViewId::MainMenu => main_menu,
            ViewId::OptionsMenu => options_menu,
        };
        view.handle_control(control, options)
    }

    fn active_view(&mut self) -> &mut dyn View {
        match self.stack.active() {
            ViewId::World => &mut self.world,
            ViewId::MainMenu => &mut self.main_menu,
            ViewId::OptionsMenu => &mut self.options_menu,
        }
    }

    fn apply(&mut self, transition: Transition) -> anyhow::Result<()> {
        match transition {
            Transition::None => return Ok(()),
            Transition::Push(view) => {
                match view {
                    ViewId::MainMenu => self.main_menu.reset(&self.options),
                    ViewId::OptionsMenu => self.options_menu.reset(&self.options),
                    ViewId::World => {}
                }
                self.stack.push(view);
            }
            Transition::Pop => {
                let _ = self.stack.pop().context("menu tried to leave the world view")?;
            }
            Transition::Quit => {
                self.running = false;
                return Ok(());
            }
        }
        log::debug!("{:?} view active", self.active_view().id());
        Ok(())
    }

    /// Window the backend should open.
    #[must_use]
    pub fn window_config(&self) -> WindowConfig {
        self.display.window_config()
    }

    /// Current options, including menu toggles.
    #[must_use]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    /// Logical screen.
    #[must_use]
    pub fn display(&self) -> &Display {
        &self.display
    }

    /// View on top of the stack.
    #[must_use]
    pub fn active_view_id(&self) -> ViewId {
        self.stack.active()
    }

    /// Whether the world simulation advances.
    #[must_use]
    pub fn clock(&self) -> SimulationClock {
        self.stack.clock()
    }

    /// Whether the loop should keep going.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// The world view.
    #[must_use]
    pub fn world(&self) -> &WorldView {
        &self.world
    }

    /// The main menu.
    #[must_use]
    pub fn main_menu(&self) -> &Menu {
        &self.main_menu
    }

    /// The options menu.
    #[must_use]
    pub fn options_menu(&self) -> &Menu {
        &self.options_menu
    }
}
