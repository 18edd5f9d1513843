/// Homogeneous 3D vectors
use std::ops::{Add, Mul, Sub};

use crate::error::MathError;
use crate::matrix::Matrix4x4;

/// A point (`w == 1`) or direction (`w == 0`) in homogeneous coordinates.
///
/// Every operation returns a new value. Binary operations keep the `w` of the
/// left operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector3D {
    /// Create a point (`w = 1`)
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    /// Create a direction (`w = 0`)
    pub fn direction(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, w: 0.0 }
    }

    pub fn with_w(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn mul_scalar(&self, n: f64) -> Self {
        Self::with_w(self.x * n, self.y * n, self.z * n, self.w)
    }

    /// Transform as a row vector: `self * m`
    pub fn mul_matrix(&self, m: &Matrix4x4) -> Self {
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        Self::with_w(
            x * m[0][0] + y * m[1][0] + z * m[2][0] + w * m[3][0],
            x * m[0][1] + y * m[1][1] + z * m[2][1] + w * m[3][1],
            x * m[0][2] + y * m[1][2] + z * m[2][2] + w * m[3][2],
            x * m[0][3] + y * m[1][3] + z * m[2][3] + w * m[3][3],
        )
    }

    /// Euclidean length of the xyz part, without overflow for large
    /// components
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y).hypot(self.z)
    }

    /// Unit vector in the same direction. Fails for zero, infinite or NaN
    /// lengths.
    pub fn normalize(&self) -> Result<Self, MathError> {
        let len = self.length();
        if !(len.is_finite() && len > 0.0) {
            return Err(MathError::ZeroLength);
        }
        Ok(Self::with_w(self.x / len, self.y / len, self.z / len, self.w))
    }

    /// Cross product of the xyz parts. Only meaningful for directions; the
    /// result carries `self.w` regardless.
    pub fn cross(&self, other: &Self) -> Self {
        Self::with_w(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
            self.w,
        )
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl Default for Vector3D {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[f64; 3]> for Vector3D {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, other: Vector3D) -> Vector3D {
        Vector3D::with_w(self.x + other.x, self.y + other.y, self.z + other.z, self.w)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    fn sub(self, other: Vector3D) -> Vector3D {
        Vector3D::with_w(self.x - other.x, self.y - other.y, self.z - other.z, self.w)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Vector3D;

    fn mul(self, n: f64) -> Vector3D {
        self.mul_scalar(n)
    }
}

impl Mul<&Matrix4x4> for Vector3D {
    type Output = Vector3D;

    fn mul(self, m: &Matrix4x4) -> Vector3D {
        self.mul_matrix(m)
    }
}
