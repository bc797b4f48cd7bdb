//! Main and options menus.

use glam::Vec2;
use pharcobial_core::{Control, ControlEvent};
use pharcobial_rendering::{Canvas, Color, TextPosition, TextStyle};

use crate::{
    display::Display,
    options::GameOptions,
    views::{SimulationClock, Transition, View, ViewId},
};

/// Font size of the highlighted item.
pub const SELECTED_SIZE: f32 = 36.0;

/// Font size of every other item.
pub const ITEM_SIZE: f32 = 34.0;

/// Horizontal nudge applied to the highlighted item.
const SELECTED_INDENT: f32 = 8.0;

/// Vertical gap added below the menu origin.
const ITEM_MARGIN: f32 = 10.0;

/// What a menu item does when activated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// Return to the world.
    Continue,
    /// Open the options menu.
    OpenOptions,
    /// Stop the game.
    Quit,
    /// Return to the previous menu.
    Back,
    /// Flip the music setting.
    ToggleMusic,
    /// Flip the sound-effect setting.
    ToggleSfx,
}

/// A selectable line in a menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem {
    title: String,
    index: usize,
    action: MenuAction,
}

impl MenuItem {
    fn new(title: impl Into<String>, index: usize, action: MenuAction) -> Self {
        Self {
            title: title.into(),
            index,
            action,
        }
    }

    /// Text shown for the item.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Position of the item within its menu.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Action bound to the item.
    #[must_use]
    pub const fn action(&self) -> MenuAction {
        self.action
    }
}

/// Placement of one menu item on the logical screen.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuLine {
    /// Item title.
    pub title: String,
    /// Top-left corner of the text.
    pub position: Vec2,
    /// Size and color of the text.
    pub style: TextStyle,
}

/// A vertical list of items with one highlighted.
#[derive(Clone, Debug, PartialEq)]
pub struct Menu {
    id: ViewId,
    items: Vec<MenuItem>,
    selected: usize,
    origin: Vec2,
}

impl Menu {
    /// Continue, Options and Quit.
    #[must_use]
    pub fn main(display: &Display) -> Self {
        Self::with_items(
            ViewId::MainMenu,
            display,
            vec![
                MenuItem::new("Continue", 0, MenuAction::Continue),
                MenuItem::new("Options", 1, MenuAction::OpenOptions),
                MenuItem::new("Quit", 2, MenuAction::Quit),
            ],
        )
    }

    /// Back plus the audio toggles, titled from the current `options`.
    #[must_use]
    pub fn options(display: &Display, options: &GameOptions) -> Self {
        let mut menu = Self::with_items(
            ViewId::OptionsMenu,
            display,
            vec![
                MenuItem::new("Back", 0, MenuAction::Back),
                MenuItem::new("", 1, MenuAction::ToggleMusic),
                MenuItem::new("", 2, MenuAction::ToggleSfx),
            ],
        );
        menu.refresh_titles(options);
        menu
    }

    fn with_items(id: ViewId, display: &Display, items: Vec<MenuItem>) -> Self {
        let origin = Vec2::new(
            (display.half_width() / 2) as f32,
            (display.half_height() / 2) as f32,
        );
        Self {
            id,
            items,
            selected: 0,
            origin,
        }
    }

    /// Items in display order.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Index of the highlighted item.
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Highlights the next item, wrapping to the first.
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len().max(1);
    }

    /// Highlights the previous item, wrapping to the last.
    pub fn select_previous(&mut self) {
        let count = self.items.len().max(1);
        self.selected = (self.selected + count - 1) % count;
    }

    /// Prepares the menu for being shown again.
    pub fn reset(&mut self, options: &GameOptions) {
        self.selected = 0;
        self.refresh_titles(options);
    }

    /// Runs the highlighted item.
    pub fn activate(&mut self, options: &mut GameOptions) -> Transition {
        let Some(action) = self.items.get(self.selected).map(MenuItem::action) else {
            return Transition::None;
        };
        log::debug!("menu action {action:?}");

        match action {
            MenuAction::Continue | MenuAction::Back => Transition::Pop,
            MenuAction::OpenOptions => Transition::Push(ViewId::OptionsMenu),
            MenuAction::Quit => Transition::Quit,
            MenuAction::ToggleMusic => {
                options.disable_music = !options.disable_music;
                self.refresh_titles(options);
                Transition::None
            }
            MenuAction::ToggleSfx => {
                options.disable_sfx = !options.disable_sfx;
                self.refresh_titles(options);
                Transition::None
            }
        }
    }

    /// Where and how each item is drawn.
    #[must_use]
    pub fn layout(&self) -> Vec<MenuLine> {
        self.items
            .iter()
            .map(|item| {
                let highlighted = item.index == self.selected;
                let (size, color, indent) = if highlighted {
                    (SELECTED_SIZE, Color::GREEN, SELECTED_INDENT)
                } else {
                    (ITEM_SIZE, Color::WHITE, 0.0)
                };
                let y = self.origin.y + item.index as f32 * size + ITEM_MARGIN;
                MenuLine {
                    title: item.title.clone(),
                    position: Vec2::new(self.origin.x - indent, y),
                    style: TextStyle::new(size, color),
                }
            })
            .collect()
    }

    fn refresh_titles(&mut self, options: &GameOptions) {
        for item in &mut self.items {
            match item.action {
                MenuAction::ToggleMusic => {
                    item.title = format!("Music ({})", state(!options.disable_music));
                }
                MenuAction::ToggleSfx => {
                    item.title = format!("Sfx ({})", state(!options.disable_sfx));
                }
                _ => {}
            }
        }
    }
}

fn state(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

impl View for Menu {
    fn id(&self) -> ViewId {
        self.id
    }

    fn handle_control(&mut self, event: ControlEvent, options: &mut GameOptions) -> Transition {
        let ControlEvent::Pressed(control) = event else {
            return Transition::None;
        };

        match control {
            Control::Up => {
                self.select_previous();
                Transition::None
            }
            Control::Down => {
                self.select_next();
                Transition::None
            }
            Control::Enter => self.activate(options),
            Control::Escape => Transition::Pop,
            Control::Left | Control::Right | Control::Activate => Transition::None,
        }
    }

    fn update(&mut self, _clock: SimulationClock, _canvas: &mut dyn Canvas) {}

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        canvas.clear(Color::BLACK);
        for line in self.layout() {
            canvas.draw_text(&line.title, line.style, TextPosition::At(line.position));
        }
    }
}
