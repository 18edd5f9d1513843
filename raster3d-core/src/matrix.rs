/// 4x4 transform matrices for row-vector math
use std::ops::{Index, IndexMut, Mul};

use crate::error::MathError;
use crate::vector::Vector3D;

/// Row-major 4x4 matrix. Points are transformed as row vectors
/// (`v' = v * M`), so transforms compose left to right.
///
/// The default value is all zeros, not the identity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Matrix4x4 {
    rows: [[f64; 4]; 4],
}

fn deg_to_rad(degrees: f64) -> f64 {
    degrees / 180.0 * std::f64::consts::PI
}

impl Matrix4x4 {
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[[f64; 4]; 4] {
        &self.rows
    }

    pub fn identity() -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Standard product: `result[i][j] = Σ_k self[i][k] * other[k][j]`
    pub fn multiply(&self, other: &Matrix4x4) -> Self {
        let mut result = Self::default();
        for i in 0..4 {
            for j in 0..4 {
                result.rows[i][j] = (0..4).map(|k| self.rows[i][k] * other.rows[k][j]).sum();
            }
        }
        result
    }

    /// Rotation about the x axis, angle in degrees
    pub fn rotate_x(angle: f64) -> Self {
        let (s, c) = deg_to_rad(angle).sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the y axis, angle in degrees
    pub fn rotate_y(angle: f64) -> Self {
        let (s, c) = deg_to_rad(angle).sin_cos();
        Self::from_rows([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the z axis, angle in degrees
    pub fn rotate_z(angle: f64) -> Self {
        let (s, c) = deg_to_rad(angle).sin_cos();
        Self::from_rows([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self::from_rows([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn uniform_scale(s: f64) -> Self {
        Self::scale(s, s, s)
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [dx, dy, dz, 1.0],
        ])
    }

    /// View matrix for a camera at `eye` looking at `target`.
    ///
    /// The basis is forward = `target - eye`, right = `up × forward`,
    /// true up = `forward × right`. Fails when `eye == target` or when `up`
    /// is parallel to the view direction.
    pub fn look_at(eye: &Vector3D, target: &Vector3D, up: &Vector3D) -> Result<Self, MathError> {
        let forward = (*target - *eye)
            .normalize()
            .map_err(|_| MathError::DegenerateBasis)?;
        let right = up
            .cross(&forward)
            .normalize()
            .map_err(|_| MathError::DegenerateBasis)?;
        let true_up = forward.cross(&right).normalize()?;

        let basis = Self::from_rows([
            [right.x, true_up.x, forward.x, 0.0],
            [right.y, true_up.y, forward.y, 0.0],
            [right.z, true_up.z, forward.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Ok(Self::translation(-eye.x, -eye.y, -eye.z).multiply(&basis))
    }

    /// Perspective projection with the field of view in degrees.
    ///
    /// `near` and `far` follow the negative-z convention (e.g. `-1.0`,
    /// `-1000.0`). The resulting `w` is the negated view-space z, so the
    /// perspective divide is `coord / w`.
    pub fn perspective_projection(
        fov: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Result<Self, MathError> {
        if !(fov > 0.0 && fov < 180.0) || !(aspect > 0.0) || near == far {
            return Err(MathError::InvalidProjection {
                fov,
                aspect,
                near,
                far,
            });
        }

        let half_tan = (deg_to_rad(fov) / 2.0).tan();
        let sx = 1.0 / half_tan / aspect;
        let sy = 1.0 / half_tan;
        let sz = (far + near) / (far - near);
        let dz = -2.0 * far * near / (far - near);

        Ok(Self::from_rows([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, -1.0],
            [0.0, 0.0, dz, 0.0],
        ]))
    }
}

impl Index<usize> for Matrix4x4 {
    type Output = [f64; 4];

    fn index(&self, row: usize) -> &[f64; 4] {
        &self.rows[row]
    }
}

impl IndexMut<usize> for Matrix4x4 {
    fn index_mut(&mut self, row: usize) -> &mut [f64; 4] {
        &mut self.rows[row]
    }
}

impl Mul for Matrix4x4 {
    type Output = Matrix4x4;

    fn mul(self, other: Matrix4x4) -> Matrix4x4 {
        self.multiply(&other)
    }
}

impl Mul<&Matrix4x4> for &Matrix4x4 {
    type Output = Matrix4x4;

    fn mul(self, other: &Matrix4x4) -> Matrix4x4 {
        self.multiply(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_matrix_eq(a: &Matrix4x4, b: &Matrix4x4, tolerance: f64) {
        for i in 0..4 {
            for j in 0..4 {
                assert!(
                    (a[i][j] - b[i][j]).abs() <= tolerance,
                    "[{}][{}]: {} != {}",
                    i,
                    j,
                    a[i][j],
                    b[i][j]
                );
            }
        }
    }

    fn assert_point(v: Vector3D, x: f64, y: f64, z: f64) {
        assert!((v.x - x).abs() < 1e-9, "x: {} != {}", v.x, x);
        assert!((v.y - y).abs() < 1e-9, "y: {} != {}", v.y, y);
        assert!((v.z - z).abs() < 1e-9, "z: {} != {}", v.z, z);
    }

    /// Deterministic pseudo-random matrices in [-10, 10)
    fn sample_matrices(count: usize) -> Vec<Matrix4x4> {
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 11) as f64 / (1u64 << 53) as f64) * 20.0 - 10.0
        };
        (0..count)
            .map(|_| {
                let mut m = Matrix4x4::default();
                for i in 0..4 {
                    for j in 0..4 {
                        m[i][j] = next();
                    }
                }
                m
            })
            .collect()
    }

    fn to_nalgebra(m: &Matrix4x4) -> nalgebra::Matrix4<f64> {
        nalgebra::Matrix4::from_fn(|i, j| m[i][j])
    }

    #[test]
    fn test_default_is_zero() {
        let m = Matrix4x4::default();
        assert!(m.rows().iter().flatten().all(|&v| v == 0.0));
    }

    #[test]
    fn test_creation_and_indexing() {
        let values = [
            [6.0, 8.0, 7.0, 3.0],
            [7.0, 1.0, 14.0, 9.0],
            [1.0, 2.0, 17.0, 7.0],
            [18.0, 15.0, 15.0, 4.0],
        ];
        let m = Matrix4x4::from_rows(values);
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(m[i][j], values[i][j]);
            }
        }
    }

    #[test]
    fn test_multiply() {
        let a = Matrix4x4::from_rows([
            [13.0, 2.0, 9.0, 6.0],
            [14.0, 3.0, 16.0, 7.0],
            [7.0, 18.0, 11.0, 12.0],
            [7.0, 1.0, 18.0, 16.0],
        ]);
        let b = Matrix4x4::from_rows([
            [18.0, 12.0, 11.0, 4.0],
            [14.0, 10.0, 19.0, 6.0],
            [13.0, 8.0, 12.0, 8.0],
            [15.0, 12.0, 3.0, 13.0],
        ]);
        let expected = Matrix4x4::from_rows([
            [469.0, 320.0, 307.0, 214.0],
            [607.0, 410.0, 424.0, 293.0],
            [701.0, 496.0, 587.0, 380.0],
            [614.0, 430.0, 360.0, 386.0],
        ]);
        assert_eq!(a * b, expected);
    }

    #[test]
    fn test_multiply_matches_nalgebra() {
        let samples = sample_matrices(8);
        for pair in samples.windows(2) {
            let ours = pair[0].multiply(&pair[1]);
            let reference = to_nalgebra(&pair[0]) * to_nalgebra(&pair[1]);
            for i in 0..4 {
                for j in 0..4 {
                    assert!((ours[i][j] - reference[(i, j)]).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_multiply_is_associative() {
        let samples = sample_matrices(9);
        for triple in samples.chunks(3) {
            let (a, b, c) = (&triple[0], &triple[1], &triple[2]);
            let left = (a * b).multiply(c);
            let right = a.multiply(&(b * c));
            assert_matrix_eq(&left, &right, 1e-9);
        }
    }

    #[test]
    fn test_identity_is_two_sided() {
        let id = Matrix4x4::identity();
        for m in sample_matrices(4) {
            assert_eq!(id * m, m);
            assert_eq!(m * id, m);
        }
    }

    #[test]
    fn test_rotations_are_right_handed() {
        let x_axis = Vector3D::new(1.0, 0.0, 0.0);
        let y_axis = Vector3D::new(0.0, 1.0, 0.0);
        let z_axis = Vector3D::new(0.0, 0.0, 1.0);

        assert_point(y_axis * &Matrix4x4::rotate_x(90.0), 0.0, 0.0, 1.0);
        assert_point(z_axis * &Matrix4x4::rotate_y(90.0), 1.0, 0.0, 0.0);
        assert_point(x_axis * &Matrix4x4::rotate_z(90.0), 0.0, 1.0, 0.0);
    }

    #[test]
    fn test_scale_and_translation() {
        let p = Vector3D::new(1.0, 2.0, 3.0);
        assert_point(p * &Matrix4x4::scale(2.0, 3.0, 4.0), 2.0, 6.0, 12.0);
        assert_point(p * &Matrix4x4::uniform_scale(0.5), 0.5, 1.0, 1.5);
        assert_point(p * &Matrix4x4::translation(-1.0, 1.0, 10.0), 0.0, 3.0, 13.0);

        // Directions are not translated
        let d = Vector3D::direction(1.0, 2.0, 3.0) * &Matrix4x4::translation(5.0, 5.0, 5.0);
        assert_point(d, 1.0, 2.0, 3.0);
    }

    #[test]
    fn test_composition_order_is_left_to_right() {
        // Scale first, then translate
        let m = Matrix4x4::uniform_scale(2.0) * Matrix4x4::translation(1.0, 0.0, 0.0);
        assert_point(Vector3D::new(1.0, 0.0, 0.0) * &m, 3.0, 0.0, 0.0);

        let m = Matrix4x4::translation(1.0, 0.0, 0.0) * Matrix4x4::uniform_scale(2.0);
        assert_point(Vector3D::new(1.0, 0.0, 0.0) * &m, 4.0, 0.0, 0.0);
    }

    #[test]
    fn test_look_at_moves_target_onto_forward_axis() {
        let eye = Vector3D::new(3.0, 4.0, 5.0);
        let target = Vector3D::new(3.0, 4.0, -5.0);
        let up = Vector3D::direction(0.0, 1.0, 0.0);
        let view = Matrix4x4::look_at(&eye, &target, &up).unwrap();

        assert_point(eye * &view, 0.0, 0.0, 0.0);
        assert_point(target * &view, 0.0, 0.0, 10.0);
        // World up stays up
        assert_point(Vector3D::new(3.0, 5.0, 5.0) * &view, 0.0, 1.0, 0.0);
    }

    #[test]
    fn test_look_at_degenerate() {
        let eye = Vector3D::zero();
        let up = Vector3D::direction(0.0, 1.0, 0.0);
        assert_eq!(
            Matrix4x4::look_at(&eye, &Vector3D::new(0.0, 5.0, 0.0), &up),
            Err(MathError::DegenerateBasis)
        );
        assert_eq!(
            Matrix4x4::look_at(&eye, &eye, &up),
            Err(MathError::DegenerateBasis)
        );
    }

    #[test]
    fn test_perspective_projection_layout() {
        let p = Matrix4x4::perspective_projection(90.0, 2.0, -1.0, -1000.0).unwrap();
        assert!((p[0][0] - 0.5).abs() < 1e-12);
        assert!((p[1][1] - 1.0).abs() < 1e-12);
        assert!((p[2][2] - 1001.0 / 999.0).abs() < 1e-12);
        assert!((p[3][2] - 2000.0 / 999.0).abs() < 1e-12);
        assert_eq!(p[2][3], -1.0);
        assert_eq!(p[3][3], 0.0);

        // w' = -z
        let v = Vector3D::new(1.0, 1.0, 7.0) * &p;
        assert_eq!(v.w, -7.0);
    }

    #[test]
    fn test_perspective_projection_rejects_bad_parameters() {
        assert!(Matrix4x4::perspective_projection(0.0, 1.0, -1.0, -10.0).is_err());
        assert!(Matrix4x4::perspective_projection(180.0, 1.0, -1.0, -10.0).is_err());
        assert!(Matrix4x4::perspective_projection(60.0, 0.0, -1.0, -10.0).is_err());
        assert!(Matrix4x4::perspective_projection(60.0, 1.0, -1.0, -1.0).is_err());
        assert!(Matrix4x4::perspective_projection(f64::NAN, 1.0, -1.0, -10.0).is_err());
    }
}
