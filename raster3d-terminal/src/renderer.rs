/// Character-grid output for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use raster3d_core::{CharCanvas, Surface, GLYPH_RAMP};
use std::io::Write;

/// Owns the character grid the pipeline draws into and writes it to a
/// terminal.
pub struct AsciiRenderer {
    canvas: CharCanvas,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            canvas: CharCanvas::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.canvas.width()
    }

    pub fn height(&self) -> usize {
        self.canvas.height()
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.canvas.resize(width, height);
    }

    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    pub fn canvas(&self) -> &CharCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut CharCanvas {
        &mut self.canvas
    }

    /// Queue the whole grid, one row per terminal line. Colour only changes
    /// between glyphs of different density bands.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for (y, row) in self.canvas.rows().enumerate() {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for &c in row {
                let color = glyph_color(c);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Denser glyphs are brighter surfaces; colour them accordingly
fn glyph_color(c: char) -> Color {
    let Some(index) = GLYPH_RAMP.iter().position(|&g| g as char == c) else {
        return Color::White;
    };
    match index * 4 / GLYPH_RAMP.len() {
        0 => Color::Cyan,
        1 => Color::White,
        2 => Color::Grey,
        _ => Color::DarkGrey,
    }
}
