/// In-memory framebuffer surface
use std::io::{self, Write};

use crate::surface::{Point2, Surface};

/// A `0x00RRGGBB` framebuffer
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: usize,
    height: usize,
    background: u32,
    pixels: Vec<u32>,
}

/// Pack a gray level into `0x00RRGGBB`
pub fn gray(level: u8) -> u32 {
    let g = u32::from(level);
    (g << 16) | (g << 8) | g
}

/// Gray level `round(b * 255)` for a brightness in `[0, 1]`; NaN is black
pub fn shade_gray(brightness: f64) -> u32 {
    let b = if brightness.is_nan() { 0.0 } else { brightness.clamp(0.0, 1.0) };
    gray((b * 255.0).round() as u8)
}

impl PixelCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_background(width, height, 0)
    }

    pub fn with_background(width: usize, height: usize, background: u32) -> Self {
        Self {
            width,
            height,
            background,
            pixels: vec![background; width * height],
        }
    }

    /// Change the canvas size; contents are discarded
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, self.background);
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    fn put(&mut self, x: i64, y: i64, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    /// Write the canvas as a binary PPM (P6) image
    pub fn write_ppm<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for &p in &self.pixels {
            bytes.extend_from_slice(&[(p >> 16) as u8, (p >> 8) as u8, p as u8]);
        }
        writer.write_all(&bytes)
    }

    /// Clip a segment to the canvas grown by one pixel (Liang–Barsky).
    fn clip_segment(&self, p1: Point2, p2: Point2) -> Option<(Point2, Point2)> {
        let (dx, dy) = (p2.0 - p1.0, p2.1 - p1.1);
        let (min_x, max_x) = (-1.0, self.width as f64);
        let (min_y, max_y) = (-1.0, self.height as f64);
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;

        for (p, q) in [
            (-dx, p1.0 - min_x),
            (dx, max_x - p1.0),
            (-dy, p1.1 - min_y),
            (dy, max_y - p1.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let r = q / p;
                if p < 0.0 {
                    t0 = t0.max(r);
                } else {
                    t1 = t1.min(r);
                }
            }
        }

        (t0 <= t1).then(|| {
            (
                (p1.0 + t0 * dx, p1.1 + t0 * dy),
                (p1.0 + t1 * dx, p1.1 + t1 * dy),
            )
        })
    }
}

impl Surface for PixelCanvas {
    type Color = u32;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    fn shade(&self, brightness: f64) -> u32 {
        shade_gray(brightness)
    }

    /// Integer Bresenham between the rounded endpoints
    fn draw_line(&mut self, p1: Point2, p2: Point2, color: u32) {
        if ![p1.0, p1.1, p2.0, p2.1].iter().all(|v| v.is_finite()) {
            return;
        }
        let Some((a, b)) = self.clip_segment(p1, p2) else {
            return;
        };

        let (mut x0, mut y0) = (a.0.round() as i64, a.1.round() as i64);
        let (x1, y1) = (b.0.round() as i64, b.1.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Fill pixels whose centres fall inside the triangle, either winding
    fn fill_triangle(&mut self, p1: Point2, p2: Point2, p3: Point2, color: u32) {
        let (v0, v1, v2) = (p1, p2, p3);
        if ![v0, v1, v2].iter().all(|v| v.0.is_finite() && v.1.is_finite()) {
            return;
        }

        // Bounding box clipped to the canvas
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0);
        let max_x = v0.0.max(v1.0).max(v2.0).ceil().min(self.width as f64 - 1.0);
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0);
        let max_y = v0.1.max(v1.1).max(v2.1).ceil().min(self.height as f64 - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        for y in min_y as usize..=max_y as usize {
            for x in min_x as usize..=max_x as usize {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.pixels[y * self.width + x] = color;
                    }
                }
            }
        }
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(v0: Point2, v1: Point2, v2: Point2, p: Point2) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-12 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
