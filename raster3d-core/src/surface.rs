/// Drawing targets for the rasterization stage
use serde::{Deserialize, Serialize};

/// A point on a surface, in cell/pixel units
pub type Point2 = (f64, f64);

/// How screen-space triangles are put on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Filled,
    Wireframe,
}

/// A discrete 2D drawing target.
///
/// Writes outside `[0, width) × [0, height)` are dropped silently.
pub trait Surface {
    /// What a single cell/pixel holds
    type Color: Copy;

    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Reset every cell to the background
    fn clear(&mut self);

    /// Map a brightness in `[0, 1]` to this surface's color
    fn shade(&self, brightness: f64) -> Self::Color;

    fn draw_line(&mut self, p1: Point2, p2: Point2, color: Self::Color);

    fn fill_triangle(&mut self, p1: Point2, p2: Point2, p3: Point2, color: Self::Color);
}
