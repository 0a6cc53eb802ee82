use std::collections::HashMap;
use std::io::Write;

use anyhow::{Context, Result};

use crate::math::{Rect, Vec2};
use crate::render::{Color, Font, Surface};

/// Brightness ramp used for colours without an explicit glyph.
const RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '%', '#', '@'];

/// A surface that rasterizes onto a grid of characters.
///
/// Each cell covers `width / columns` by `height / rows` pixels. Colours map
/// to glyphs through [`TextGrid::with_glyph`], falling back to a brightness
/// ramp. With an output attached, [`Surface::present`] writes the grid
/// whenever it changed since the last present.
pub struct TextGrid {
    width: f32,
    height: f32,
    columns: usize,
    rows: usize,
    cells: Vec<char>,
    fill_style: Color,
    glyphs: HashMap<Color, char>,
    output: Option<Box<dyn Write>>,
    last_presented: Option<String>,
}

impl TextGrid {
    pub fn new(width: f32, height: f32, columns: usize, rows: usize) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            width,
            height,
            columns,
            rows,
            cells: vec![' '; columns * rows],
            fill_style: Color::BLACK,
            glyphs: HashMap::new(),
            output: None,
            last_presented: None,
        }
    }

    /// Draw `color` with `glyph` instead of the brightness ramp.
    #[must_use]
    pub fn with_glyph(mut self, color: Color, glyph: char) -> Self {
        self.glyphs.insert(color, glyph);
        self
    }

    /// Write presented frames to `output` (e.g. stdout).
    #[must_use]
    pub fn with_output(mut self, output: Box<dyn Write>) -> Self {
        self.output = Some(output);
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Character at a cell, if inside the grid.
    pub fn cell(&self, column: usize, row: usize) -> Option<char> {
        (column < self.columns && row < self.rows).then(|| self.cells[row * self.columns + column])
    }

    /// The grid as text, one line per row.
    pub fn render_string(&self) -> String {
        self.cells
            .chunks(self.columns)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn cell_size(&self) -> Vec2 {
        Vec2::new(
            self.width / self.columns as f32,
            self.height / self.rows as f32,
        )
    }

    fn glyph_for(&self, color: Color) -> char {
        if let Some(&glyph) = self.glyphs.get(&color) {
            return glyph;
        }
        let index = (color.luminance() * (RAMP.len() - 1) as f32).round() as usize;
        RAMP[index.min(RAMP.len() - 1)]
    }

    /// Cells touched by `rect` as half-open column and row ranges.
    fn cell_span(&self, rect: Rect) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let cell = self.cell_size();
        let to_range = |start: f32, end: f32, step: f32, limit: usize| {
            let first = (start / step).floor().max(0.0) as usize;
            let last = (end / step).ceil().max(0.0) as usize;
            first.min(limit)..last.min(limit)
        };
        (
            to_range(rect.x, rect.right(), cell.x, self.columns),
            to_range(rect.y, rect.bottom(), cell.y, self.rows),
        )
    }

    fn paint(&mut self, rect: Rect, glyph: char) {
        let (columns, rows) = self.cell_span(rect);
        for row in rows {
            for column in columns.clone() {
                self.cells[row * self.columns + column] = glyph;
            }
        }
    }
}

impl Surface for TextGrid {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.paint(rect, ' ');
    }

    fn fill_rect(&mut self, rect: Rect) {
        let glyph = self.glyph_for(self.fill_style);
        self.paint(rect, glyph);
    }

    fn fill_text(&mut self, text: &str, position: Vec2) {
        let cell = self.cell_size();
        // The baseline sits at `position.y`; glyphs occupy the cell above it.
        let row = ((position.y - 1.0) / cell.y).floor();
        let column = (position.x / cell.x).floor();
        if row < 0.0 || row >= self.rows as f32 {
            return;
        }
        let row = row as usize;
        for (offset, ch) in text.chars().enumerate() {
            let x = column + offset as f32;
            if x < 0.0 {
                continue;
            }
            let x = x as usize;
            if x >= self.columns {
                break;
            }
            self.cells[row * self.columns + x] = ch;
        }
    }

    fn set_fill_style(&mut self, color: Color) {
        self.fill_style = color;
    }

    fn set_font(&mut self, _font: &Font) {}

    fn present(&mut self) -> Result<()> {
        let frame = self.render_string();
        let Some(output) = self.output.as_mut() else {
            return Ok(());
        };
        if self.last_presented.as_deref() == Some(frame.as_str()) {
            return Ok(());
        }
        // Home the cursor so frames overwrite each other in a terminal.
        writeln!(output, "\x1b[H{frame}").context("failed to write frame")?;
        output.flush().context("failed to flush frame")?;
        self.last_presented = Some(frame);
        Ok(())
    }
}
