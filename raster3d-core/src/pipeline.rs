/// Per-frame transform, cull, sort and rasterize
use log::trace;

use crate::geometry::{brightness, ClipTriangle, Mesh};
use crate::projection::Camera;
use crate::surface::{RenderMode, Surface};
use crate::transform::Transform;
use crate::vector::Vector3D;

/// What happened to a mesh's triangles during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Rasterized onto the surface
    pub drawn: usize,
    /// Facing away from the camera
    pub culled: usize,
    /// Zero-area after transform
    pub degenerate: usize,
    /// A vertex had `w == 0`, so the divide produced no usable coordinates
    pub unprojectable: usize,
}

impl FrameStats {
    pub fn total(&self) -> usize {
        self.drawn + self.culled + self.degenerate + self.unprojectable
    }
}

impl std::ops::AddAssign for FrameStats {
    fn add_assign(&mut self, other: FrameStats) {
        self.drawn += other.drawn;
        self.culled += other.culled;
        self.degenerate += other.degenerate;
        self.unprojectable += other.unprojectable;
    }
}

/// Draws meshes onto a surface.
///
/// Owns a scratch buffer of clip-space triangles that is refilled on every
/// draw, so a mesh's own triangles are only ever read.
#[derive(Debug, Clone)]
pub struct Renderer {
    light: Vector3D,
    mode: RenderMode,
    scratch: Vec<ClipTriangle>,
}

impl Renderer {
    /// `light` is a direction in clip space; `(0, 0, 1)` lights faces that
    /// look straight at the camera.
    pub fn new(light: Vector3D, mode: RenderMode) -> Self {
        Self {
            light,
            mode,
            scratch: Vec::new(),
        }
    }

    pub fn light(&self) -> Vector3D {
        self.light
    }

    pub fn set_light(&mut self, light: Vector3D) {
        self.light = light;
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    /// Render one frame of `mesh`, then advance its pose.
    ///
    /// Triangles are drawn farthest first. Nothing is clipped against the
    /// near plane: triangles behind the camera are projected and drawn like
    /// any other.
    pub fn draw<S: Surface>(&mut self, mesh: &mut Mesh, camera: &Camera, surface: &mut S) -> FrameStats {
        let mvp = Transform::mvp_matrix(&mesh.pose, camera.transform());

        self.scratch.clear();
        self.scratch
            .extend(mesh.triangles().iter().map(|tri| tri.to_clip(&mvp)));
        // Stable, so equal depths keep mesh order
        self.scratch
            .sort_by(|a, b| b.mean_depth().total_cmp(&a.mean_depth()));

        let (width, height) = (surface.width(), surface.height());
        let mut stats = FrameStats::default();

        for tri in &self.scratch {
            let normal = match tri.normal() {
                Ok(normal) => normal,
                Err(_) => {
                    stats.degenerate += 1;
                    continue;
                }
            };
            if !tri.faces_viewer(&normal) {
                stats.culled += 1;
                continue;
            }
            let Some(screen) = tri.project(width, height) else {
                stats.unprojectable += 1;
                continue;
            };

            let color = match self.mode {
                RenderMode::Filled => surface.shade(brightness(&normal, &self.light)),
                RenderMode::Wireframe => surface.shade(1.0),
            };
            screen.rasterize(surface, color, self.mode);
            stats.drawn += 1;
        }

        mesh.pose.advance();

        trace!(
            "frame: {} drawn, {} culled, {} degenerate, {} unprojectable",
            stats.drawn,
            stats.culled,
            stats.degenerate,
            stats.unprojectable
        );
        stats
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Vector3D::direction(0.0, 0.0, 1.0), RenderMode::Filled)
    }
}
