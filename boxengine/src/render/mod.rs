//! Drawing: a canvas-like [`Surface`] and the [`Renderer`] that paints the
//! intro screen, the game frame and the pause overlay onto it.

mod draw_list;
mod style;
mod text_grid;

use anyhow::Result;

pub use draw_list::{DrawCommand, DrawList};
pub use style::{Color, Font, Palette};
pub use text_grid::TextGrid;

use crate::entity::Movable;
use crate::error::EngineError;
use crate::math::{Rect, Vec2};
use crate::world::World;

/// Size of the pause menu box in pixels.
pub const PAUSE_MENU_SIZE: Vec2 = Vec2::new(350.0, 50.0);
/// Instruction shown inside the pause menu.
pub const PAUSE_TEXT: &str = "Press SPACE to continue";

/// A 2D drawing target with canvas-style stateful fill colour and font.
///
/// The host creates and sizes the surface; the engine only draws on it.
pub trait Surface {
    /// Width and height in pixels.
    fn size(&self) -> (f32, f32);

    fn clear_rect(&mut self, rect: Rect);

    /// Fill `rect` with the current fill style.
    fn fill_rect(&mut self, rect: Rect);

    /// Draw `text` with its baseline starting at `position`, using the
    /// current fill style and font.
    fn fill_text(&mut self, text: &str, position: Vec2);

    fn set_fill_style(&mut self, color: Color);

    fn set_font(&mut self, font: &Font);

    /// Hand the finished frame to the host. Surfaces that draw directly can
    /// leave this as a no-op.
    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Paints game state onto a [`Surface`].
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    palette: Palette,
    font: Font,
}

impl Renderer {
    pub fn new(palette: Palette, font: Font) -> Self {
        Self { palette, font }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    fn clear_background(&self, surface: &mut dyn Surface) {
        let (width, height) = surface.size();
        let full = Rect::new(0.0, 0.0, width, height);
        surface.clear_rect(full);
        surface.set_fill_style(self.palette.background);
        surface.fill_rect(full);
    }

    /// Blank screen shown before the game starts.
    pub fn draw_intro(&self, surface: &mut dyn Surface) {
        self.clear_background(surface);
    }

    /// Full game frame: background, score, enemies, then the player on top.
    ///
    /// Fails with [`EngineError::NoActivePlayer`] before touching the surface
    /// if the world has no player.
    pub fn draw_game(&self, surface: &mut dyn Surface, world: &World) -> Result<(), EngineError> {
        let player = world.player()?;
        self.clear_background(surface);

        let (width, _) = surface.size();
        surface.set_fill_style(self.palette.score);
        surface.set_font(&self.font);
        surface.fill_text(&player.score().to_string(), Vec2::new(width - 50.0, 30.0));

        surface.set_fill_style(self.palette.enemy);
        for (_, enemy) in world.iter_enemies() {
            match enemy.colour {
                Some(colour) => {
                    surface.set_fill_style(colour);
                    surface.fill_rect(enemy.bounds());
                    surface.set_fill_style(self.palette.enemy);
                }
                None => surface.fill_rect(enemy.bounds()),
            }
        }

        surface.set_fill_style(self.palette.player);
        surface.fill_rect(player.bounds());
        Ok(())
    }

    /// Centered menu box over whatever is already on the surface.
    pub fn draw_pause_menu(&self, surface: &mut dyn Surface) {
        let (width, height) = surface.size();
        let left = (width - PAUSE_MENU_SIZE.x) / 2.0;
        let top = (height - PAUSE_MENU_SIZE.y) / 4.0;

        surface.set_fill_style(self.palette.pause_menu);
        surface.fill_rect(Rect::new(left, top, PAUSE_MENU_SIZE.x, PAUSE_MENU_SIZE.y));
        surface.set_fill_style(self.palette.pause_text);
        surface.set_font(&self.font);
        surface.fill_text(PAUSE_TEXT, Vec2::new(left + 60.0, top + 30.0));
    }
}
