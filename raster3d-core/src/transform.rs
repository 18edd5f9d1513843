/// Per-object pose state and the model transform built from it
use crate::matrix::Matrix4x4;

/// Rotation state around three axes (in degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Rotate by delta amounts (in degrees)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    pub fn rotate_by(&mut self, delta: &RotationState) {
        self.rotate(delta.x, delta.y, delta.z);
    }
}

/// Position, motion and size of a mesh in world space.
///
/// `velocity` and `angular_velocity` are applied once per drawn frame by
/// [`Pose::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub rotation: RotationState,
    pub angular_velocity: RotationState,
    pub scale: f64,
}

impl Pose {
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: [x, y, z],
            ..Self::default()
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64, z: f64) {
        self.position = [x, y, z];
    }

    pub fn set_velocity(&mut self, vx: f64, vy: f64, vz: f64) {
        self.velocity = [vx, vy, vz];
    }

    pub fn set_rotation(&mut self, x: f64, y: f64, z: f64) {
        self.rotation = RotationState::new(x, y, z);
    }

    pub fn set_rotation_speed(&mut self, x: f64, y: f64, z: f64) {
        self.angular_velocity = RotationState::new(x, y, z);
    }

    /// Step one frame: `rotation += angular_velocity`, `position += velocity`
    pub fn advance(&mut self) {
        self.rotation.rotate_by(&self.angular_velocity);
        for (p, v) in self.position.iter_mut().zip(self.velocity) {
            *p += v;
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            velocity: [0.0; 3],
            rotation: RotationState::zero(),
            angular_velocity: RotationState::zero(),
            scale: 1.0,
        }
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation matrix applying X, then Y, then Z
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4x4 {
        Matrix4x4::rotate_x(rotation.x)
            * Matrix4x4::rotate_y(rotation.y)
            * Matrix4x4::rotate_z(rotation.z)
    }

    /// Object-to-world matrix: scale, rotate X/Y/Z, translate
    pub fn model_matrix(pose: &Pose) -> Matrix4x4 {
        let [x, y, z] = pose.position;
        Matrix4x4::uniform_scale(pose.scale)
            * Self::rotation_matrix(&pose.rotation)
            * Matrix4x4::translation(x, y, z)
    }

    /// Full object-to-clip matrix: model followed by the camera's view-projection
    pub fn mvp_matrix(pose: &Pose, view_projection: &Matrix4x4) -> Matrix4x4 {
        Self::model_matrix(pose).multiply(view_projection)
    }
}
