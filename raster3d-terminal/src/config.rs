//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`R3D_SECTION__KEY`)

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use raster3d_core::{
    load_obj, Camera, Frustum, LoadError, MathError, Mesh, Pose, RenderMode, Renderer,
    RotationState, Vector3D,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from the `config` directory
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory. Missing files
    /// are skipped; missing keys take their defaults.
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // R3D_INPUT__STEP=5 -> input.step = 5
        figment = figment.merge(Env::prefixed("R3D_").split("__"));

        Ok(figment.extract()?)
    }
}

/// Camera placement and frustum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f64; 3],
    pub target: [f64; 3],
    /// Up direction
    pub up: [f64; 3],
    /// Vertical field of view in degrees
    pub fov: f64,
    /// Near plane, negative (in front of the camera)
    pub near: f64,
    /// Far plane, negative
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 0.0],
            target: [0.0, 0.0, -1.0],
            up: [0.0, 1.0, 0.0],
            fov: 45.0,
            near: -1.0,
            far: -1000.0,
        }
    }
}

impl CameraConfig {
    /// Build a camera for a surface with the given width/height ratio
    pub fn build(&self, aspect: f64) -> Result<Camera, MathError> {
        let [ex, ey, ez] = self.eye;
        let [tx, ty, tz] = self.target;
        let [ux, uy, uz] = self.up;
        Camera::with_frustum(
            Vector3D::new(ex, ey, ez),
            Vector3D::new(tx, ty, tz),
            Vector3D::direction(ux, uy, uz),
            Frustum {
                fov: self.fov,
                aspect,
                near: self.near,
                far: self.far,
            },
        )
    }
}

/// Built-in meshes available without an OBJ file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    #[default]
    Cube,
    CutPyramid,
}

/// The mesh to show and how it moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// OBJ file; `shape` is used when absent
    pub mesh: Option<PathBuf>,
    pub shape: Shape,
    pub position: [f64; 3],
    /// Units per frame
    pub velocity: [f64; 3],
    /// Initial rotation in degrees
    pub rotation: [f64; 3],
    /// Degrees per frame
    pub rotation_speed: [f64; 3],
    pub scale: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            mesh: None,
            shape: Shape::Cube,
            position: [0.0, 0.0, -300.0],
            velocity: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            rotation_speed: [0.0, 0.3, 0.0],
            scale: 20.0,
        }
    }
}

impl SceneConfig {
    pub fn pose(&self) -> Pose {
        let [rx, ry, rz] = self.rotation;
        let [sx, sy, sz] = self.rotation_speed;
        Pose {
            position: self.position,
            velocity: self.velocity,
            rotation: RotationState::new(rx, ry, rz),
            angular_velocity: RotationState::new(sx, sy, sz),
            scale: self.scale,
        }
    }

    /// Load or build the mesh and place it
    pub fn build_mesh(&self) -> Result<Mesh, LoadError> {
        let mesh = match &self.mesh {
            Some(path) => load_obj(path)?,
            None => match self.shape {
                Shape::Cube => Mesh::cube(2.0),
                Shape::CutPyramid => Mesh::cut_pyramid(),
            },
        };
        Ok(mesh.with_pose(self.pose()))
    }
}

/// How frames are drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mode: RenderMode,
    /// Light direction in clip space
    pub light: [f64; 3],
    /// Minimum time per frame in milliseconds; 0 disables pacing
    pub frame_time_ms: u64,
    /// Image size for headless PPM output
    pub image_width: usize,
    pub image_height: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Filled,
            light: [0.0, 0.0, 1.0],
            frame_time_ms: 33,
            image_width: 800,
            image_height: 600,
        }
    }
}

impl RenderConfig {
    pub fn renderer(&self) -> Renderer {
        let [x, y, z] = self.light;
        Renderer::new(Vector3D::direction(x, y, z), self.mode)
    }
}

/// Keyboard handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Camera movement per key press, in world units
    pub step: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { step: 2.0 }
    }
}

/// Debug configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace); `RUST_LOG` wins
    pub log_level: String,
    /// Draw the status line over the top row
    pub show_status: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            show_status: true,
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(#[source] Box<figment::Error>);

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("raster3d-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.camera.fov, 45.0);
        assert_eq!(config.scene.position, [0.0, 0.0, -300.0]);
        assert_eq!(config.scene.shape, Shape::Cube);
        assert_eq!(config.render.mode, RenderMode::Filled);
        assert_eq!(config.input.step, 2.0);
    }

    #[test]
    fn test_shipped_default_matches_code_defaults() {
        let text = include_str!("../../config/default.toml");
        let parsed: AppConfig = toml::from_str(text).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("rotation_speed"));
        assert!(toml.contains("mode = \"filled\""));
    }

    #[test]
    #[serial]
    fn test_missing_directory_gives_defaults() {
        let config = AppConfig::load_from("/nonexistent/raster3d/config").unwrap();
        assert_eq!(config.scene, SceneConfig::default());
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    #[serial]
    fn test_user_file_overrides_default_file() {
        let dir = scratch_dir("layers");
        fs::write(
            dir.join("default.toml"),
            "[scene]\nshape = \"cut_pyramid\"\nscale = 5.0\n",
        )
        .unwrap();
        fs::write(dir.join("user.toml"), "[scene]\nscale = 7.5\n\n[render]\nmode = \"wireframe\"\n").unwrap();

        let config = AppConfig::load_from(&dir).unwrap();
        assert_eq!(config.scene.shape, Shape::CutPyramid);
        assert_eq!(config.scene.scale, 7.5);
        assert_eq!(config.scene.position, [0.0, 0.0, -300.0]);
        assert_eq!(config.render.mode, RenderMode::Wireframe);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_bad_value_is_an_error() {
        let dir = scratch_dir("bad");
        fs::write(dir.join("default.toml"), "[render]\nmode = \"dotted\"\n").unwrap();
        assert!(AppConfig::load_from(&dir).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_env_overrides_user_file() {
        let dir = scratch_dir("env");
        fs::write(dir.join("user.toml"), "[input]\nstep = 3.0\n\n[render]\nmode = \"filled\"\n").unwrap();

        std::env::set_var("R3D_INPUT__STEP", "5");
        std::env::set_var("R3D_RENDER__MODE", "wireframe");
        std::env::set_var("R3D_CAMERA__EYE", "[1.0, 2.0, 3.0]");
        let config = AppConfig::load_from(&dir);
        std::env::remove_var("R3D_INPUT__STEP");
        std::env::remove_var("R3D_RENDER__MODE");
        std::env::remove_var("R3D_CAMERA__EYE");

        let config = config.unwrap();
        assert_eq!(config.input.step, 5.0);
        assert_eq!(config.render.mode, RenderMode::Wireframe);
        assert_eq!(config.camera.eye, [1.0, 2.0, 3.0]);
        assert_eq!(config.camera.target, [0.0, 0.0, -1.0]);

        // Without the variables the file value is back
        let config = AppConfig::load_from(&dir).unwrap();
        assert_eq!(config.input.step, 3.0);
        assert_eq!(config.render.mode, RenderMode::Filled);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_camera_and_scene_builders() {
        let config = AppConfig::default();
        let camera = config.camera.build(2.0).unwrap();
        assert_eq!(camera.frustum().aspect, 2.0);
        assert_eq!(camera.frustum().fov, 45.0);

        let mesh = config.scene.build_mesh().unwrap();
        assert_eq!(mesh.len(), 12);
        assert_eq!(mesh.pose.scale, 20.0);
        assert_eq!(mesh.pose.angular_velocity, RotationState::new(0.0, 0.3, 0.0));

        let mut bad = CameraConfig::default();
        bad.up = [0.0, 0.0, 1.0];
        assert_eq!(bad.build(1.0).unwrap_err(), MathError::DegenerateBasis);
    }
}
