/// Triangle stages and meshes.
///
/// A triangle moves through three types on its way to a surface:
/// [`Triangle`] (object space, owned by a [`Mesh`]), [`ClipTriangle`]
/// (after model-view-projection, before the perspective divide) and
/// [`ScreenTriangle`] (after the divide, in surface units). Culling, depth
/// sorting and shading only exist on `ClipTriangle`.
use crate::error::MathError;
use crate::matrix::Matrix4x4;
use crate::pipeline::{FrameStats, Renderer};
use crate::projection::Camera;
use crate::surface::{Point2, RenderMode, Surface};
use crate::transform::Pose;
use crate::vector::Vector3D;

/// Unit normal of `edge(p0→p1) × edge(p1→p2)`; counter-clockwise winding
/// points outward.
fn face_normal(points: &[Vector3D; 3]) -> Result<Vector3D, MathError> {
    let n = (points[0] - points[1]).cross(&(points[1] - points[2]));
    Vector3D::direction(n.x, n.y, n.z).normalize()
}

/// An object-space triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub points: [Vector3D; 3],
}

impl Triangle {
    pub fn new(p0: Vector3D, p1: Vector3D, p2: Vector3D) -> Self {
        Self {
            points: [p0, p1, p2],
        }
    }

    pub fn normal(&self) -> Result<Vector3D, MathError> {
        face_normal(&self.points)
    }

    /// Apply a model-view-projection matrix to every point
    pub fn to_clip(&self, mvp: &Matrix4x4) -> ClipTriangle {
        ClipTriangle {
            points: self.points.map(|p| p.mul_matrix(mvp)),
        }
    }
}

/// A triangle in clip space: transformed, not yet divided by `w`.
///
/// The viewer sits at the clip-space origin, so the direction from the
/// camera to a vertex is the vertex itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipTriangle {
    pub points: [Vector3D; 3],
}

impl ClipTriangle {
    pub fn normal(&self) -> Result<Vector3D, MathError> {
        face_normal(&self.points)
    }

    /// Backface test against the first vertex. Degenerate triangles are
    /// never visible.
    pub fn is_visible(&self) -> bool {
        self.normal()
            .map(|normal| self.faces_viewer(&normal))
            .unwrap_or(false)
    }

    pub(crate) fn faces_viewer(&self, normal: &Vector3D) -> bool {
        normal.dot(&self.points[0]) < 0.0
    }

    /// Mean z of the three vertices, used as the painter's sort key
    pub fn mean_depth(&self) -> f64 {
        self.points.iter().map(|p| p.z).sum::<f64>() / 3.0
    }

    /// Lambertian brightness in `[0, 1]`. Light from behind counts the same
    /// as light from the front.
    pub fn shade(&self, light: &Vector3D) -> Result<f64, MathError> {
        Ok(brightness(&self.normal()?, light))
    }

    /// Perspective divide and viewport mapping onto a `width × height`
    /// surface. Returns `None` when a vertex has `w == 0`.
    pub fn project(&self, width: usize, height: usize) -> Option<ScreenTriangle> {
        let (half_w, half_h) = (width as f64 / 2.0, height as f64 / 2.0);
        let mut points = [(0.0, 0.0); 3];
        for (out, p) in points.iter_mut().zip(&self.points) {
            let x = p.x / p.w * half_w + half_w;
            let y = p.y / p.w * half_h + half_h;
            if !x.is_finite() || !y.is_finite() {
                return None;
            }
            *out = (x, y);
        }
        Some(ScreenTriangle { points })
    }
}

/// `|n · l| / (|n| |l|)`, or 0 for a zero-length light
pub(crate) fn brightness(normal: &Vector3D, light: &Vector3D) -> f64 {
    let denom = normal.length() * light.length();
    if denom == 0.0 {
        return 0.0;
    }
    (normal.dot(light).abs() / denom).clamp(0.0, 1.0)
}

/// A triangle in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub points: [Point2; 3],
}

impl ScreenTriangle {
    pub fn rasterize<S: Surface>(&self, surface: &mut S, color: S::Color, mode: RenderMode) {
        let [a, b, c] = self.points;
        match mode {
            RenderMode::Filled => surface.fill_triangle(a, b, c, color),
            RenderMode::Wireframe => {
                surface.draw_line(a, b, color);
                surface.draw_line(b, c, color);
                surface.draw_line(c, a, color);
            }
        }
    }
}

/// A 3D mesh: object-space triangles plus a world pose.
///
/// Rendering never modifies the triangles; only the pose advances.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    pub pose: Pose,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
            pose: Pose::default(),
        }
    }

    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles,
            pose: Pose::default(),
        }
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Two triangles for a planar quad `a b c d` (counter-clockwise)
    fn add_quad(&mut self, a: Vector3D, b: Vector3D, c: Vector3D, d: Vector3D) {
        self.add_triangle(Triangle::new(a, b, c));
        self.add_triangle(Triangle::new(a, c, d));
    }

    /// Axis-aligned cube centred on the origin, wound outward
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let v = |x: f64, y: f64, z: f64| Vector3D::new(x * h, y * h, z * h);
        let mut mesh = Self::with_capacity(12);

        // Front, back, top, bottom, right, left
        mesh.add_quad(v(-1.0, -1.0, 1.0), v(1.0, -1.0, 1.0), v(1.0, 1.0, 1.0), v(-1.0, 1.0, 1.0));
        mesh.add_quad(v(-1.0, -1.0, -1.0), v(-1.0, 1.0, -1.0), v(1.0, 1.0, -1.0), v(1.0, -1.0, -1.0));
        mesh.add_quad(v(-1.0, 1.0, -1.0), v(-1.0, 1.0, 1.0), v(1.0, 1.0, 1.0), v(1.0, 1.0, -1.0));
        mesh.add_quad(v(-1.0, -1.0, -1.0), v(1.0, -1.0, -1.0), v(1.0, -1.0, 1.0), v(-1.0, -1.0, 1.0));
        mesh.add_quad(v(1.0, -1.0, -1.0), v(1.0, 1.0, -1.0), v(1.0, 1.0, 1.0), v(1.0, -1.0, 1.0));
        mesh.add_quad(v(-1.0, -1.0, -1.0), v(-1.0, -1.0, 1.0), v(-1.0, 1.0, 1.0), v(-1.0, 1.0, -1.0));

        mesh
    }

    /// Square frustum: a 2×2 base at y = -1 and a 1×1 top at y = 1
    pub fn cut_pyramid() -> Self {
        let b = [
            Vector3D::new(-1.0, -1.0, -1.0),
            Vector3D::new(-1.0, -1.0, 1.0),
            Vector3D::new(1.0, -1.0, 1.0),
            Vector3D::new(1.0, -1.0, -1.0),
        ];
        let t = [
            Vector3D::new(-0.5, 1.0, -0.5),
            Vector3D::new(-0.5, 1.0, 0.5),
            Vector3D::new(0.5, 1.0, 0.5),
            Vector3D::new(0.5, 1.0, -0.5),
        ];
        let mut mesh = Self::with_capacity(12);

        mesh.add_quad(b[0], b[3], b[2], b[1]);
        mesh.add_quad(t[0], t[1], t[2], t[3]);
        mesh.add_quad(b[1], b[2], t[2], t[1]);
        mesh.add_quad(b[0], t[0], t[3], b[3]);
        mesh.add_quad(b[3], t[3], t[2], b[2]);
        mesh.add_quad(b[0], b[1], t[1], t[0]);

        mesh
    }

    /// Draw one frame with a default [`Renderer`] and advance the pose
    pub fn draw<S: Surface>(&mut self, surface: &mut S, camera: &Camera) -> FrameStats {
        Renderer::default().draw(self, camera, surface)
    }
}
