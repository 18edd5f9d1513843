/// raster3d web - the software pipeline drawing onto an HTML canvas
///
/// The 3D work happens in `raster3d-core`; this crate only binds a canvas
/// element's 2D context as the drawing surface and exposes a small
/// wasm-bindgen API for a page's animation loop.
use log::{debug, info};
use raster3d_core::{parse_obj, Camera, Mesh, Pose, RenderMode, Renderer, RotationState, Surface, Vector3D};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub mod canvas;
pub mod logger;

pub use canvas::CanvasSurface;
pub use logger::init_logging;

/// The scene shown before anything is loaded
fn default_pose() -> Pose {
    Pose {
        position: [0.0, 0.0, -300.0],
        angular_velocity: RotationState::new(0.0, 1.0, 0.0),
        scale: 20.0,
        ..Pose::default()
    }
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
    camera: Camera,
    renderer: Renderer,
    meshes: Vec<Mesh>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Bind to the `<canvas>` with the given element id
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebRenderer, JsValue> {
        logger::install_default();
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("document object not found"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas element not found"))?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context not available"))?
            .dyn_into()?;

        let (width, height) = (canvas.width().max(1), canvas.height().max(1));
        let mut camera = Camera::default();
        camera
            .set_aspect_ratio(width as f64 / height as f64)
            .map_err(js_error)?;
        info!("bound canvas `{}` at {}x{}", canvas_id, width, height);

        Ok(WebRenderer {
            surface: CanvasSurface::new(ctx, width as usize, height as usize),
            canvas,
            camera,
            renderer: Renderer::default(),
            meshes: vec![Mesh::cut_pyramid().with_pose(default_pose())],
        })
    }

    /// Draw one frame and advance every mesh; returns the number of
    /// triangles drawn
    pub fn render(&mut self) -> Result<usize, JsValue> {
        let (width, height) = (self.canvas.width() as usize, self.canvas.height() as usize);
        if width > 0 && height > 0 && (width, height) != (self.surface.width(), self.surface.height()) {
            self.camera
                .set_aspect_ratio(width as f64 / height as f64)
                .map_err(js_error)?;
            self.surface.resize(width, height);
        }

        self.surface.clear();
        let mut drawn = 0;
        for mesh in &mut self.meshes {
            drawn += self.renderer.draw(mesh, &self.camera, &mut self.surface).drawn;
        }
        Ok(drawn)
    }

    /// Translate the camera, keeping its view direction
    pub fn move_camera(&mut self, dx: f64, dy: f64, dz: f64) -> Result<(), JsValue> {
        self.camera
            .move_by(Vector3D::direction(dx, dy, dz))
            .map_err(js_error)
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.renderer.set_mode(if wireframe {
            RenderMode::Wireframe
        } else {
            RenderMode::Filled
        });
    }

    /// Degrees per frame, for every mesh
    pub fn set_rotation_speed(&mut self, x: f64, y: f64, z: f64) {
        for mesh in &mut self.meshes {
            mesh.pose.set_rotation_speed(x, y, z);
        }
    }

    /// Replace the scene with a mesh parsed from OBJ text
    pub fn load_obj(&mut self, text: &str) -> Result<(), JsValue> {
        let mesh = parse_obj(text).map_err(js_error)?;
        debug!("web scene: {} triangles", mesh.len());
        self.meshes = vec![mesh.with_pose(default_pose())];
        Ok(())
    }
}
