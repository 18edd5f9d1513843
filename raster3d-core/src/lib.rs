/// raster3d core library - software 3D rendering without a GPU
///
/// Everything needed to turn triangle meshes into pixels or characters:
/// homogeneous vectors and 4x4 matrices, object poses, a look-at camera with
/// perspective projection, typed triangle stages, an OBJ loader and two
/// rasterizing surfaces. Front ends only supply a surface and a frame loop.

pub mod char_canvas;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod obj;
pub mod pipeline;
pub mod pixel_canvas;
pub mod projection;
pub mod surface;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use char_canvas::{brightness_to_glyph, CharCanvas, GLYPH_RAMP};
pub use error::{LoadError, MathError};
pub use geometry::{ClipTriangle, Mesh, ScreenTriangle, Triangle};
pub use matrix::Matrix4x4;
pub use obj::{load_obj, parse_obj};
pub use pipeline::{FrameStats, Renderer};
pub use pixel_canvas::{shade_gray, PixelCanvas};
pub use projection::{Camera, Frustum};
pub use surface::{Point2, RenderMode, Surface};
pub use transform::{Pose, RotationState, Transform};
pub use vector::Vector3D;
