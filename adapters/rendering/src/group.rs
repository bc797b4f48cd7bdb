use glam::Vec2;
use pharcobial_core::{GraphicKey, Layer, SpriteId};

use crate::{Camera, Canvas, SpritePresentation};

/// A single graphic placed on the logical screen.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    /// Sprite the command draws.
    pub id: SpriteId,
    /// Graphic to draw.
    pub graphic: GraphicKey,
    /// Top-left corner in logical screen pixels.
    pub position: Vec2,
}

/// Orders visible sprites by depth and draws them in two passes.
#[derive(Debug, Default)]
pub struct RenderGroup {
    commands: Vec<DrawCommand>,
}

impl RenderGroup {
    /// Creates an empty render group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the draw order for `sprites` as seen through `camera`.
    ///
    /// Visible sprites are stably sorted by the vertical coordinate of their
    /// center. Ground sprites are emitted first and top-layer sprites second,
    /// each pass keeping the sorted order.
    #[must_use]
    pub fn draw_order(sprites: &[SpritePresentation], camera: &Camera) -> Vec<DrawCommand> {
        let mut visible: Vec<&SpritePresentation> =
            sprites.iter().filter(|sprite| sprite.visible).collect();
        visible.sort_by_key(|sprite| sprite.rect.center().y());

        [Layer::Ground, Layer::Top]
            .into_iter()
            .flat_map(|layer| {
                visible
                    .iter()
                    .filter(move |sprite| sprite.layer == layer)
                    .map(move |sprite| DrawCommand {
                        id: sprite.id.clone(),
                        graphic: sprite.graphic.clone(),
                        position: camera.world_to_screen(sprite.rect.origin()),
                    })
            })
            .collect()
    }

    /// Draws `sprites` onto `canvas` through `camera`, returning how many were drawn.
    ///
    /// A graphic the canvas cannot find is skipped with a warning.
    pub fn draw_in_view(
        &mut self,
        sprites: &[SpritePresentation],
        camera: &Camera,
        canvas: &mut dyn Canvas,
    ) -> usize {
        self.commands = Self::draw_order(sprites, camera);

        let mut drawn = 0;
        for command in &self.commands {
            match canvas.draw_graphic(&command.graphic, command.position) {
                Ok(()) => drawn += 1,
                Err(error) => log::warn!("skipping {}: {error}", command.id),
            }
        }
        drawn
    }

    /// Commands submitted by the most recent [`RenderGroup::draw_in_view`].
    #[must_use]
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.commands
    }
}
