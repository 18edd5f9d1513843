/// Character-grid surface for terminal output
use std::fmt;

use crate::surface::{Point2, Surface};

/// Glyphs ordered from densest to sparsest.
///
/// This is the common 70-level ASCII density ramp, whose sparsest level is
/// a blank cell. The blank is only reached below brightness `1/70`, a face
/// within about 0.8 degrees of edge-on to the light; any brighter face gets
/// a visible glyph.
pub const GLYPH_RAMP: &[u8; 70] =
    b"$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\\|()1{}[]?-_+~<>i!lI;:,\"^`'. ";

/// Map a brightness in `[0, 1]` to a glyph: brighter is denser.
///
/// `0` maps to the last (blank) glyph and `1` to the first.
pub fn brightness_to_glyph(brightness: f64) -> char {
    let last = GLYPH_RAMP.len() - 1;
    let b = if brightness.is_nan() {
        0.0
    } else {
        brightness.clamp(0.0, 1.0)
    };
    let index = ((b * GLYPH_RAMP.len() as f64).floor() as usize).min(last);
    GLYPH_RAMP[last - index] as char
}

/// Range of sample indices `i` for which `round(start + i * inc)` can land
/// in `[0, extent)`. `None` when no sample can.
fn sample_window(start: f64, inc: f64, extent: usize) -> Option<(f64, f64)> {
    let (lo, hi) = (-0.5, extent as f64 - 0.5);
    if inc == 0.0 {
        return (start >= lo && start < hi).then_some((f64::NEG_INFINITY, f64::INFINITY));
    }
    let (a, b) = ((lo - start) / inc, (hi - start) / inc);
    Some((a.min(b), a.max(b)))
}

/// A `height × width` grid of characters, blank by default
#[derive(Debug, Clone)]
pub struct CharCanvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl CharCanvas {
    pub const BLANK: char = ' ';

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Self::BLANK; width * height],
        }
    }

    /// Change the grid size; contents are discarded
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(width * height, Self::BLANK);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        // chunks() panics on 0
        self.cells.chunks(self.width.max(1))
    }

    fn plot(&mut self, x: f64, y: f64, glyph: char) {
        let (x, y) = (x.round(), y.round());
        if x >= 0.0 && y >= 0.0 && x < self.width as f64 && y < self.height as f64 {
            self.cells[y as usize * self.width + x as usize] = glyph;
        }
    }

    /// Fill the rows between two edges that start at `a` and `b` and move
    /// by `a_slope`/`b_slope` in x per row, for `rows` rows past the start.
    fn fill_span(&mut self, a: Point2, a_slope: f64, b: Point2, b_slope: f64, rows: f64, glyph: char) {
        if !(rows >= 0.0) || !rows.is_finite() {
            return;
        }
        let Some((first, last)) = sample_window(a.1, 1.0, self.height) else {
            return;
        };
        let first = (first.floor() - 1.0).max(0.0);
        let last = (last.ceil() + 1.0).min(rows.floor());
        if first > last {
            return;
        }
        for k in first as usize..=last as usize {
            let k = k as f64;
            let y = a.1 + k;
            self.draw_line((a.0 + a_slope * k, y), (b.0 + b_slope * k, y), glyph);
        }
    }
}

impl Surface for CharCanvas {
    type Color = char;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self) {
        self.cells.fill(Self::BLANK);
    }

    fn shade(&self, brightness: f64) -> char {
        brightness_to_glyph(brightness)
    }

    /// Parametric DDA with `round(|Δx + Δy|)` steps.
    ///
    /// The step count under-samples lines where Δx and Δy have opposite
    /// signs; a line with `Δx == -Δy` plots only its first point.
    fn draw_line(&mut self, p1: Point2, p2: Point2, glyph: char) {
        let (dx, dy) = (p2.0 - p1.0, p2.1 - p1.1);
        let steps = (dx + dy).abs().round();
        if !steps.is_finite() {
            return;
        }
        if steps == 0.0 {
            self.plot(p1.0, p1.1, glyph);
            return;
        }
        let (x_inc, y_inc) = (dx / steps, dy / steps);

        // Skip samples that cannot land on the grid
        let (Some(xs), Some(ys)) = (
            sample_window(p1.0, x_inc, self.width),
            sample_window(p1.1, y_inc, self.height),
        ) else {
            return;
        };
        let first = (xs.0.max(ys.0).floor() - 1.0).max(0.0);
        let last = (xs.1.min(ys.1).ceil() + 1.0).min(steps);
        if first > last {
            return;
        }

        for i in first as usize..=last as usize {
            let i = i as f64;
            self.plot(p1.0 + i * x_inc, p1.1 + i * y_inc, glyph);
        }
    }

    /// Split at the middle vertex into a flat-bottom and a flat-top half and
    /// fill each scanline by scanline. A zero vertical extent uses a divisor
    /// of 1 for the edge slope.
    fn fill_triangle(&mut self, p1: Point2, p2: Point2, p3: Point2, glyph: char) {
        let mut vertices = [p1, p2, p3];
        vertices.sort_by(|a, b| a.1.total_cmp(&b.1));
        let [low, mid, high] = vertices;

        let slope = |from: Point2, to: Point2| {
            let dy = to.1 - from.1;
            (to.0 - from.0) / if dy == 0.0 { 1.0 } else { dy }
        };

        let low_high = slope(low, high);
        let split = (low.0 + low_high * (mid.1 - low.1), mid.1);

        self.fill_span(low, slope(low, mid), low, low_high, mid.1 - low.1, glyph);
        self.fill_span(mid, slope(mid, high), split, low_high, high.1 - mid.1, glyph);
    }
}

impl fmt::Display for CharCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for &c in row {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}
