/// Camera and projection utilities
use crate::error::MathError;
use crate::matrix::Matrix4x4;
use crate::vector::Vector3D;

/// Frustum parameters. `near` and `far` are negative: the camera looks
/// down its own -z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Vertical field of view in degrees
    pub fov: f64,
    /// Width over height of the target surface
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            fov: 90.0,
            aspect: 1.0,
            near: -1.0,
            far: -1000.0,
        }
    }
}

/// Camera pose plus frustum, with a cached view-projection matrix.
///
/// Every setter recomputes the cache before returning. A setter that would
/// produce an invalid matrix leaves the camera untouched and returns the
/// error.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vector3D,
    target: Vector3D,
    up: Vector3D,
    frustum: Frustum,
    view_projection: Matrix4x4,
}

impl Camera {
    pub fn new(eye: Vector3D, target: Vector3D, up: Vector3D) -> Result<Self, MathError> {
        Self::with_frustum(eye, target, up, Frustum::default())
    }

    pub fn with_frustum(
        eye: Vector3D,
        target: Vector3D,
        up: Vector3D,
        frustum: Frustum,
    ) -> Result<Self, MathError> {
        let view_projection = Self::compute(&eye, &target, &up, &frustum)?;
        Ok(Self {
            eye,
            target,
            up,
            frustum,
            view_projection,
        })
    }

    fn compute(
        eye: &Vector3D,
        target: &Vector3D,
        up: &Vector3D,
        frustum: &Frustum,
    ) -> Result<Matrix4x4, MathError> {
        let view = Matrix4x4::look_at(eye, target, up)?;
        let projection = Matrix4x4::perspective_projection(
            frustum.fov,
            frustum.aspect,
            frustum.near,
            frustum.far,
        )?;
        Ok(view.multiply(&projection))
    }

    /// Recompute the matrix for the candidate state and commit it on success
    fn update(
        &mut self,
        eye: Vector3D,
        target: Vector3D,
        up: Vector3D,
        frustum: Frustum,
    ) -> Result<(), MathError> {
        self.view_projection = Self::compute(&eye, &target, &up, &frustum)?;
        self.eye = eye;
        self.target = target;
        self.up = up;
        self.frustum = frustum;
        Ok(())
    }

    /// Cached view × projection matrix
    pub fn transform(&self) -> &Matrix4x4 {
        &self.view_projection
    }

    pub fn view_matrix(&self) -> Result<Matrix4x4, MathError> {
        Matrix4x4::look_at(&self.eye, &self.target, &self.up)
    }

    pub fn eye(&self) -> Vector3D {
        self.eye
    }

    pub fn target(&self) -> Vector3D {
        self.target
    }

    pub fn up(&self) -> Vector3D {
        self.up
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Place the eye at `position`, keeping the eye-to-target direction
    pub fn move_to(&mut self, position: Vector3D) -> Result<(), MathError> {
        let direction = self.target - self.eye;
        self.update(position, position + direction, self.up, self.frustum)
    }

    /// Translate eye and target together
    pub fn move_by(&mut self, delta: Vector3D) -> Result<(), MathError> {
        self.update(self.eye + delta, self.target + delta, self.up, self.frustum)
    }

    pub fn set_up(&mut self, up: Vector3D) -> Result<(), MathError> {
        self.update(self.eye, self.target, up, self.frustum)
    }

    pub fn set_fov(&mut self, fov: f64) -> Result<(), MathError> {
        let frustum = Frustum { fov, ..self.frustum };
        self.update(self.eye, self.target, self.up, frustum)
    }

    pub fn set_aspect_ratio(&mut self, aspect: f64) -> Result<(), MathError> {
        let frustum = Frustum {
            aspect,
            ..self.frustum
        };
        self.update(self.eye, self.target, self.up, frustum)
    }
}

impl Default for Camera {
    /// Camera at the origin looking down -z with y up
    fn default() -> Self {
        let eye = Vector3D::zero();
        let target = Vector3D::new(0.0, 0.0, -1.0);
        let up = Vector3D::direction(0.0, 1.0, 0.0);
        let frustum = Frustum::default();
        let view_projection = Self::compute(&eye, &target, &up, &frustum)
            .unwrap_or_else(|_| Matrix4x4::identity());
        Self {
            eye,
            target,
            up,
            frustum,
            view_projection,
        }
    }
}
