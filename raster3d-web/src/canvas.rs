/// Surface over a browser 2D canvas context
use raster3d_core::{shade_gray, Point2, Surface};
use web_sys::CanvasRenderingContext2d;

/// CSS colour string for a `0x00RRGGBB` value
pub fn css_color(color: u32) -> String {
    format!("#{:06x}", color & 0x00ff_ffff)
}

/// Draws paths straight onto a canvas; the browser does the rasterizing.
///
/// Colours are `0x00RRGGBB`, the same as [`raster3d_core::PixelCanvas`].
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: usize,
    height: usize,
    background: u32,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, width: usize, height: usize) -> Self {
        Self {
            ctx,
            width,
            height,
            background: 0,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    fn path(&self, points: &[Point2]) {
        self.ctx.begin_path();
        if let Some((first, rest)) = points.split_first() {
            self.ctx.move_to(first.0, first.1);
            for p in rest {
                self.ctx.line_to(p.0, p.1);
            }
        }
    }
}

impl Surface for CanvasSurface {
    type Color = u32;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self) {
        self.ctx.set_fill_style_str(&css_color(self.background));
        self.ctx
            .fill_rect(0.0, 0.0, self.width as f64, self.height as f64);
    }

    fn shade(&self, brightness: f64) -> u32 {
        shade_gray(brightness)
    }

    fn draw_line(&mut self, p1: Point2, p2: Point2, color: u32) {
        self.ctx.set_stroke_style_str(&css_color(color));
        self.path(&[p1, p2]);
        self.ctx.stroke();
    }

    fn fill_triangle(&mut self, p1: Point2, p2: Point2, p3: Point2, color: u32) {
        let css = css_color(color);
        self.ctx.set_fill_style_str(&css);
        // Stroke too, so neighbouring triangles leave no anti-aliased seams
        self.ctx.set_stroke_style_str(&css);
        self.path(&[p1, p2, p3]);
        self.ctx.close_path();
        self.ctx.fill();
        self.ctx.stroke();
    }
}
