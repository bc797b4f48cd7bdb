#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pharcobial game.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the pure systems, the view layer and the platform adapters. Adapters
//! translate physical input into [`InputEvent`] values, the game resolves
//! those through [`KeyBindings`] into [`ControlEvent`]s and [`GameAction`]s,
//! and the world exposes its entities as pixel-space [`Rect`]s tagged with a
//! [`GraphicKey`] and a draw [`Layer`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Title shown in the window caption and in the startup log line.
pub const GAME_NAME: &str = "Pharcobial";

/// Edge length of a single map tile, measured in world pixels.
pub const BLOCK_SIZE: i32 = 32;

/// Top-left anchored location expressed in world pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new position from pixel coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts a tile coordinate into the pixel position of that tile's top-left corner.
    #[must_use]
    pub const fn from_tile(column: i32, row: i32) -> Self {
        Self::new(column * BLOCK_SIZE, row * BLOCK_SIZE)
    }

    /// Horizontal pixel coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical pixel coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns a copy with the horizontal coordinate replaced.
    #[must_use]
    pub const fn with_x(self, x: i32) -> Self {
        Self { x, y: self.y }
    }

    /// Returns a copy with the vertical coordinate replaced.
    #[must_use]
    pub const fn with_y(self, y: i32) -> Self {
        Self { x: self.x, y }
    }

    /// Tile column and row containing this position.
    #[must_use]
    pub const fn tile(&self) -> (i32, i32) {
        (
            self.x.div_euclid(BLOCK_SIZE),
            self.y.div_euclid(BLOCK_SIZE),
        )
    }
}

/// Axis-aligned rectangle expressed in world pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    origin: Position,
    width: i32,
    height: i32,
}

impl Rect {
    /// Creates a rectangle anchored at `origin` with the provided size.
    #[must_use]
    pub const fn new(origin: Position, width: i32, height: i32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Creates a block-sized rectangle anchored at `origin`.
    #[must_use]
    pub const fn block(origin: Position) -> Self {
        Self::new(origin, BLOCK_SIZE, BLOCK_SIZE)
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.origin.x
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.origin.y
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.origin.x + self.width
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.origin.y + self.height
    }

    /// Integer center of the rectangle, rounded toward the top-left.
    #[must_use]
    pub const fn center(&self) -> Position {
        Position::new(
            self.origin.x + self.width / 2,
            self.origin.y + self.height / 2,
        )
    }

    /// Grows the rectangle by `dw`/`dh` pixels while keeping its center fixed.
    #[must_use]
    pub const fn inflate(self, dw: i32, dh: i32) -> Self {
        Self {
            origin: Position::new(self.origin.x - dw / 2, self.origin.y - dh / 2),
            width: self.width + dw,
            height: self.height + dh,
        }
    }

    /// Reports whether the two rectangles share any interior area.
    ///
    /// Rectangles that merely touch along an edge do not intersect.
    #[must_use]
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Identifier naming an entity, unique within its spawn category.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(String);

impl SpriteId {
    /// Identifier always used by the player character.
    pub const PLAYER: &'static str = "player";

    /// Creates a new identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Identifier of the player character.
    #[must_use]
    pub fn player() -> Self {
        Self::new(Self::PLAYER)
    }

    /// Borrowed string form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-character key identifying a tile kind within a map grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey(char);

impl TileKey {
    /// Cell hosting a bush that may come alive.
    pub const BUSH: TileKey = TileKey('B');
    /// Impassable emptiness outside the playable area.
    pub const VOID: TileKey = TileKey('X');

    /// Wraps an arbitrary tile character.
    #[must_use]
    pub const fn new(key: char) -> Self {
        Self(key)
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Names a graphic asset together with the orientation it is drawn in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphicKey {
    id: String,
    mirrored: bool,
}

impl GraphicKey {
    /// Graphic drawn in its authored orientation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mirrored: false,
        }
    }

    /// Graphic flipped horizontally.
    #[must_use]
    pub fn mirrored(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mirrored: true,
        }
    }

    /// Graphic with an explicit orientation.
    #[must_use]
    pub fn with_orientation(id: impl Into<String>, mirrored: bool) -> Self {
        Self {
            id: id.into(),
            mirrored,
        }
    }

    /// Asset identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the graphic is flipped horizontally.
    #[must_use]
    pub const fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Key of the unmirrored graphic this one derives from.
    #[must_use]
    pub fn unmirrored(&self) -> Self {
        Self::new(self.id.clone())
    }
}

impl fmt::Display for GraphicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mirrored {
            write!(f, "{}-right", self.id)
        } else {
            f.write_str(&self.id)
        }
    }
}

/// Answers whether a graphic can be drawn, loading it on first request.
pub trait GraphicCatalog {
    /// Returns `true` when the graphic exists and can be drawn.
    fn contains(&mut self, key: &GraphicKey) -> bool;
}

/// Draw pass an entity belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Ground clutter drawn first.
    Ground,
    /// Player, adversaries and transient effects drawn above everything else.
    Top,
}

/// Physical keys recognised by the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Letter W.
    W,
    /// Letter A.
    A,
    /// Letter S.
    S,
    /// Letter D.
    D,
    /// Space bar.
    Space,
    /// Enter / return.
    Enter,
    /// Escape.
    Escape,
}

impl Key {
    /// Every key the adapters poll, in a stable order.
    pub const ALL: [Key; 11] = [
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Space,
        Key::Enter,
        Key::Escape,
    ];
}

/// Raw input captured by a platform adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A key went down.
    KeyDown(Key),
    /// A key was released.
    KeyUp(Key),
    /// The platform asked the game to close.
    Quit,
}

/// Logical controls that keys are bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    /// Move or select upward.
    Up,
    /// Move or select downward.
    Down,
    /// Move left.
    Left,
    /// Move right.
    Right,
    /// Interact with whatever is in front of the player.
    Activate,
    /// Confirm a menu selection.
    Enter,
    /// Open or leave a menu.
    Escape,
}

/// Edge of a control as seen by views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlEvent {
    /// The control was pressed.
    Pressed(Control),
    /// The control was released.
    Released(Control),
}

/// Mapping from logical controls to physical keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Key bound to [`Control::Up`].
    pub up: Key,
    /// Key bound to [`Control::Down`].
    pub down: Key,
    /// Key bound to [`Control::Left`].
    pub left: Key,
    /// Key bound to [`Control::Right`].
    pub right: Key,
    /// Key bound to [`Control::Activate`].
    pub activate: Key,
    /// Key bound to [`Control::Enter`].
    pub enter: Key,
    /// Key bound to [`Control::Escape`].
    pub escape: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: Key::Up,
            down: Key::Down,
            left: Key::Left,
            right: Key::Right,
            activate: Key::Space,
            enter: Key::Enter,
            escape: Key::Escape,
        }
    }
}

impl KeyBindings {
    fn pairs(&self) -> [(Key, Control); 7] {
        [
            (self.up, Control::Up),
            (self.down, Control::Down),
            (self.left, Control::Left),
            (self.right, Control::Right),
            (self.activate, Control::Activate),
            (self.enter, Control::Enter),
            (self.escape, Control::Escape),
        ]
    }

    /// Resolves the control bound to `key`, if any.
    #[must_use]
    pub fn control_for(&self, key: Key) -> Option<Control> {
        self.pairs()
            .into_iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, control)| control)
    }

    /// Returns the first key bound to more than one control.
    #[must_use]
    pub fn duplicate(&self) -> Option<Key> {
        let pairs = self.pairs();
        pairs.iter().enumerate().find_map(|(index, (key, _))| {
            pairs[index + 1..]
                .iter()
                .any(|(other, _)| other == key)
                .then_some(*key)
        })
    }

    /// Translates a raw input event into a control edge.
    #[must_use]
    pub fn resolve(&self, event: InputEvent) -> Option<ControlEvent> {
        match event {
            InputEvent::KeyDown(key) => self.control_for(key).map(ControlEvent::Pressed),
            InputEvent::KeyUp(key) => self.control_for(key).map(ControlEvent::Released),
            InputEvent::Quit => None,
        }
    }
}

/// Action the game loop takes in response to a single input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameAction {
    /// Stop the loop and release platform resources.
    Quit,
    /// Pause the world and show the main menu.
    OpenMenu,
    /// Forward the control edge to the active view.
    Continue(ControlEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inflate_keeps_center_fixed() {
        let rect = Rect::block(Position::new(64, 32));
        let vision = rect.inflate(rect.height(), rect.width());

        assert_eq!(vision.center(), rect.center());
        assert_eq!(vision.origin(), Position::new(48, 16));
        assert_eq!(vision.width(), 64);
        assert_eq!(vision.height(), 64);
    }

    #[test]
    fn touching_rectangles_do_not_intersect() {
        let left = Rect::block(Position::new(0, 0));
        let right = Rect::block(Position::new(BLOCK_SIZE, 0));
        let overlapping = Rect::block(Position::new(BLOCK_SIZE - 1, 4));

        assert!(!left.intersects(&right));
        assert!(left.intersects(&overlapping));
        assert!(overlapping.intersects(&right));
    }

    #[test]
    fn tile_of_negative_position_rounds_down() {
        assert_eq!(Position::new(-1, 33).tile(), (-1, 1));
        assert_eq!(Position::from_tile(2, 3), Position::new(64, 96));
    }

    #[test]
    fn default_bindings_resolve_arrow_keys() {
        let bindings = KeyBindings::default();

        assert_eq!(
            bindings.resolve(InputEvent::KeyDown(Key::Left)),
            Some(ControlEvent::Pressed(Control::Left))
        );
        assert_eq!(
            bindings.resolve(InputEvent::KeyUp(Key::Space)),
            Some(ControlEvent::Released(Control::Activate))
        );
        assert_eq!(bindings.resolve(InputEvent::KeyDown(Key::W)), None);
        assert_eq!(bindings.resolve(InputEvent::Quit), None);
        assert_eq!(bindings.duplicate(), None);
    }

    #[test]
    fn duplicate_binding_is_reported() {
        let bindings = KeyBindings {
            activate: Key::Enter,
            ..KeyBindings::default()
        };

        assert_eq!(bindings.duplicate(), Some(Key::Enter));
    }

    #[test]
    fn mirrored_graphic_display_uses_right_suffix() {
        assert_eq!(GraphicKey::mirrored("pharma").to_string(), "pharma-right");
        assert_eq!(GraphicKey::new("pharma").to_string(), "pharma");
        assert_eq!(
            GraphicKey::mirrored("pharma").unmirrored(),
            GraphicKey::new("pharma")
        );
    }
}
