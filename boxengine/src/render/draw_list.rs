use crate::math::{Rect, Vec2};
use crate::render::{Color, Font, Surface};

/// One recorded drawing operation, with the style that was active for it.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    FillRect {
        rect: Rect,
        color: Color,
    },
    FillText {
        text: String,
        position: Vec2,
        color: Color,
        font: Font,
    },
}

/// A surface that records every draw call instead of rasterizing it.
///
/// Useful for tests and for hosts that replay frames onto their own
/// backend: drain the commands with [`DrawList::take`] after each frame.
pub struct DrawList {
    width: f32,
    height: f32,
    fill_style: Color,
    font: Font,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Create an empty list for a `width` x `height` surface.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            fill_style: Color::BLACK,
            font: Font::default(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Remove and return all recorded commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Forget all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Filled rectangles in draw order, with their colours.
    pub fn filled_rects(&self) -> impl Iterator<Item = (Rect, Color)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillRect { rect, color } => Some((*rect, *color)),
            _ => None,
        })
    }

    /// Text draws in order, with position and colour.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Vec2, Color)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillText {
                text,
                position,
                color,
                ..
            } => Some((text.as_str(), *position, *color)),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Clear(rect));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color: self.fill_style,
        });
    }

    fn fill_text(&mut self, text: &str, position: Vec2) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            position,
            color: self.fill_style,
            font: self.font.clone(),
        });
    }

    fn set_fill_style(&mut self, color: Color) {
        self.fill_style = color;
    }

    fn set_font(&mut self, font: &Font) {
        self.font = font.clone();
    }
}
