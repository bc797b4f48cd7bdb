use glam::Vec2;
use pharcobial_core::{Position, SpriteId};

use crate::SpritePresentation;

/// Viewport that keeps a followed sprite centered on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    offset: Vec2,
    followee: Option<SpriteId>,
    viewport: Vec2,
}

impl Camera {
    /// Creates a camera with a zero offset and nothing to follow.
    #[must_use]
    pub fn new(viewport: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            followee: None,
            viewport,
        }
    }

    /// Starts following the sprite with the given identifier.
    pub fn follow(&mut self, id: SpriteId) {
        log::debug!("camera following {id}");
        self.followee = Some(id);
    }

    /// World-to-screen translation currently applied.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Snaps the offset so the followee's center sits mid-viewport.
    ///
    /// The offset is left untouched when nothing is followed or the followee
    /// is not among `sprites`.
    pub fn update(&mut self, sprites: &[SpritePresentation]) {
        let Some(followee) = &self.followee else {
            return;
        };
        let Some(target) = sprites.iter().find(|sprite| &sprite.id == followee) else {
            return;
        };

        let center = target.rect.center();
        self.offset = Vec2::new(center.x() as f32, center.y() as f32) - self.viewport / 2.0;
    }

    /// Converts a world position into logical screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, position: Position) -> Vec2 {
        Vec2::new(position.x() as f32, position.y() as f32) - self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharcobial_core::{GraphicKey, Layer, Rect};

    fn presentation(id: &str, x: i32, y: i32) -> SpritePresentation {
        SpritePresentation {
            id: SpriteId::new(id),
            rect: Rect::block(Position::new(x, y)),
            graphic: GraphicKey::new(id),
            layer: Layer::Top,
            visible: true,
        }
    }

    #[test]
    fn offset_centers_followee_regardless_of_previous_offset() {
        let mut camera = Camera::new(Vec2::new(640.0, 480.0));
        camera.follow(SpriteId::player());
        let sprites = [presentation("player", 1000, 300)];

        camera.update(&sprites);
        camera.update(&sprites);

        assert_eq!(camera.offset(), Vec2::new(1016.0 - 320.0, 316.0 - 240.0));
        assert_eq!(
            camera.world_to_screen(Position::new(1000, 300)),
            Vec2::new(304.0, 224.0)
        );
    }

    #[test]
    fn missing_followee_freezes_offset() {
        let mut camera = Camera::new(Vec2::new(100.0, 100.0));
        camera.follow(SpriteId::player());
        camera.update(&[presentation("player", 50, 50)]);
        let frozen = camera.offset();

        camera.update(&[presentation("wizard", 500, 500)]);
        assert_eq!(camera.offset(), frozen);

        let mut idle = Camera::new(Vec2::new(100.0, 100.0));
        idle.update(&[presentation("player", 50, 50)]);
        assert_eq!(idle.offset(), Vec2::ZERO);
    }
}
