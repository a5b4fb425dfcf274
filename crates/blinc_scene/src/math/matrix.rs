//! 4x4 transformation matrix

use super::{Vec3, DEG_TO_RAD, RAD_TO_DEG};

/// 4x4 transformation matrix (column-major, `cols[col][row]`)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_translation(v: Vec3) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [v.x, v.y, v.z, 1.0],
            ],
        }
    }

    pub fn from_scale(v: Vec3) -> Self {
        Self {
            cols: [
                [v.x, 0.0, 0.0, 0.0],
                [0.0, v.y, 0.0, 0.0],
                [0.0, 0.0, v.z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotation around the X axis (radians)
    pub fn from_rotation_x(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, s, 0.0],
                [0.0, -s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotation around the Y axis (radians)
    pub fn from_rotation_y(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            cols: [
                [c, 0.0, -s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotation around the Z axis (radians)
    pub fn from_rotation_z(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotation from Euler angles in degrees (x = pitch, y = yaw, z = roll).
    ///
    /// Applied as yaw, then pitch, then roll: `Ry * Rx * Rz`.
    pub fn from_euler_degrees(rotation: Vec3) -> Self {
        let ry = Self::from_rotation_y(rotation.y * DEG_TO_RAD);
        let rx = Self::from_rotation_x(rotation.x * DEG_TO_RAD);
        let rz = Self::from_rotation_z(rotation.z * DEG_TO_RAD);
        ry.mul(&rx).mul(&rz)
    }

    /// Compose `T * R * S` from a local transform
    pub fn compose(position: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Self {
        Self::from_translation(position)
            .mul(&Self::from_euler_degrees(rotation_degrees))
            .mul(&Self::from_scale(scale))
    }

    /// Multiply two matrices (`self * other`)
    pub fn mul(&self, other: &Mat4) -> Mat4 {
        let mut result = [[0.0f32; 4]; 4];
        for (i, col) in result.iter_mut().enumerate() {
            for (j, cell) in col.iter_mut().enumerate() {
                for k in 0..4 {
                    *cell += self.cols[k][j] * other.cols[i][k];
                }
            }
        }
        Mat4 { cols: result }
    }

    /// Transform a point (applies translation)
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.cols;
        Vec3::new(
            m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0],
            m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1],
            m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2],
        )
    }

    /// Transform a direction (ignores translation)
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.cols;
        Vec3::new(
            m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z,
            m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z,
            m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z,
        )
    }

    /// Translation column
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.cols[3][0], self.cols[3][1], self.cols[3][2])
    }

    /// Inverse of an affine matrix (bottom row `0 0 0 1`).
    ///
    /// Returns `None` when the linear part is singular.
    pub fn inverse_affine(&self) -> Option<Mat4> {
        let m = &self.cols;
        // a[row][col] of the upper-left 3x3
        let a = |r: usize, c: usize| m[c][r];

        let c00 = a(1, 1) * a(2, 2) - a(1, 2) * a(2, 1);
        let c01 = a(1, 2) * a(2, 0) - a(1, 0) * a(2, 2);
        let c02 = a(1, 0) * a(2, 1) - a(1, 1) * a(2, 0);
        let det = a(0, 0) * c00 + a(0, 1) * c01 + a(0, 2) * c02;
        if det.abs() <= f32::EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        // inv[row][col]
        let inv = [
            [
                c00 * inv_det,
                (a(0, 2) * a(2, 1) - a(0, 1) * a(2, 2)) * inv_det,
                (a(0, 1) * a(1, 2) - a(0, 2) * a(1, 1)) * inv_det,
            ],
            [
                c01 * inv_det,
                (a(0, 0) * a(2, 2) - a(0, 2) * a(2, 0)) * inv_det,
                (a(0, 2) * a(1, 0) - a(0, 0) * a(1, 2)) * inv_det,
            ],
            [
                c02 * inv_det,
                (a(0, 1) * a(2, 0) - a(0, 0) * a(2, 1)) * inv_det,
                (a(0, 0) * a(1, 1) - a(0, 1) * a(1, 0)) * inv_det,
            ],
        ];

        let t = self.translation();
        let mut cols = [[0.0f32; 4]; 4];
        for (c, col) in cols.iter_mut().take(3).enumerate() {
            for (r, cell) in col.iter_mut().take(3).enumerate() {
                *cell = inv[r][c];
            }
        }
        for r in 0..3 {
            cols[3][r] = -(inv[r][0] * t.x + inv[r][1] * t.y + inv[r][2] * t.z);
        }
        cols[3][3] = 1.0;
        Some(Mat4 { cols })
    }

    /// Euler angles in degrees matching [`from_euler_degrees`](Self::from_euler_degrees).
    ///
    /// Scale is divided out of each basis column first. At +/-90 degrees of
    /// pitch the roll is folded into yaw.
    pub fn to_euler_degrees(&self) -> Vec3 {
        let column = |c: usize| {
            let v = Vec3::new(self.cols[c][0], self.cols[c][1], self.cols[c][2]);
            let len = v.length();
            if len > 0.0 {
                v * (1.0 / len)
            } else {
                v
            }
        };
        let (x_axis, y_axis, z_axis) = (column(0), column(1), column(2));

        // m[row][col]: row 1, col 2 holds -sin(pitch) for Ry * Rx * Rz
        let m12 = z_axis.y.clamp(-1.0, 1.0);
        let pitch = (-m12).asin();
        let (yaw, roll) = if m12.abs() < 0.999_999 {
            (z_axis.x.atan2(z_axis.z), x_axis.y.atan2(y_axis.y))
        } else {
            ((-x_axis.z).atan2(x_axis.x), 0.0)
        };
        Vec3::new(pitch * RAD_TO_DEG, yaw * RAD_TO_DEG, roll * RAD_TO_DEG)
    }

    /// Approximate equality with an absolute tolerance
    pub fn abs_diff_eq(&self, other: &Mat4, epsilon: f32) -> bool {
        self.cols
            .iter()
            .flatten()
            .zip(other.cols.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}
