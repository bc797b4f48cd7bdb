//! The explorable level as a view.

use glam::Vec2;
use pharcobial_core::{ControlEvent, GraphicCatalog, GraphicKey};
use pharcobial_rendering::{
    Camera, Canvas, Color, RenderGroup, SpritePresentation, TextPosition, TextStyle,
};
use pharcobial_world::{query, sprites::Sprite, World};

use crate::{
    options::GameOptions,
    views::{SimulationClock, Transition, View, ViewId},
};

/// Where the heads-up display is anchored.
const HUD_ORIGIN: Vec2 = Vec2::new(8.0, 8.0);

/// Lends a canvas to the world as its graphic catalog.
struct CanvasCatalog<'a>(&'a mut dyn Canvas);

impl GraphicCatalog for CanvasCatalog<'_> {
    fn contains(&mut self, key: &GraphicKey) -> bool {
        self.0.contains(key)
    }
}

/// Simulates the world and draws it through a camera following the player.
#[derive(Debug)]
pub struct WorldView {
    world: World,
    camera: Camera,
    group: RenderGroup,
    presentations: Vec<SpritePresentation>,
    show_hud: bool,
    font_size: f32,
}

impl WorldView {
    /// Wraps a populated world.
    #[must_use]
    pub fn new(
        world: World,
        camera: Camera,
        group: RenderGroup,
        show_hud: bool,
        font_size: u32,
    ) -> Self {
        Self {
            world,
            camera,
            group,
            presentations: Vec::new(),
            show_hud,
            font_size: font_size as f32,
        }
    }

    /// Level being shown.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Camera used to draw the level.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access to the camera, used to choose the followee.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Stops the player when the view loses focus.
    pub fn halt_player(&mut self) {
        self.world.halt_player();
    }

    fn present(sprite: &dyn Sprite) -> SpritePresentation {
        SpritePresentation {
            id: sprite.id().clone(),
            rect: sprite.rect(),
            graphic: sprite.base().graphic().clone(),
            layer: sprite.layer(),
            visible: sprite.base().is_visible(),
        }
    }

    fn hud_text(&self) -> String {
        let (column, row) = query::player(&self.world).base().position().tile();
        format!("{} ({column}, {row})", query::map(&self.world).id())
    }
}

impl View for WorldView {
    fn id(&self) -> ViewId {
        ViewId::World
    }

    fn handle_control(&mut self, event: ControlEvent, _options: &mut GameOptions) -> Transition {
        self.world.handle_control(event);
        Transition::None
    }

    /// Simulates one frame unless `clock` is paused.
    ///
    /// Presentations and the camera are refreshed even while paused.
    fn update(&mut self, clock: SimulationClock, canvas: &mut dyn Canvas) {
        if clock == SimulationClock::Running {
            let mut catalog = CanvasCatalog(canvas);
            self.world.update(&mut catalog);
        }

        self.presentations = query::sprites(&self.world).map(Self::present).collect();
        self.camera.update(&self.presentations);
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        canvas.clear(Color::BLACK);
        let _ = self
            .group
            .draw_in_view(&self.presentations, &self.camera, canvas);

        if self.show_hud {
            let text = self.hud_text();
            canvas.draw_text(
                &text,
                TextStyle::new(self.font_size, Color::WHITE),
                TextPosition::At(HUD_ORIGIN),
            );
        }
    }
}
