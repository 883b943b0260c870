//! Affine transform implementation.
//!
//! This module provides a 4x4 homogeneous affine transform (linear part plus
//! translation). All matrices handled by the resolver and the reslice filter
//! are this fixed shape, so there is no shape-mismatch case anywhere.

use std::fmt;

use nalgebra::{Matrix3, Matrix4, Vector4};
use serde::{Deserialize, Serialize};

use super::trait_::Transform;
use crate::error::{ResliceError, Result};
use crate::geometry::{Point3, Spacing3, Vector3};

/// Relative tolerance on the determinant below which a matrix is singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Affine Transform stored as a 4x4 homogeneous matrix.
///
/// Points are treated as column vectors: `y = M * [x, 1]^T`. The bottom row is
/// conventionally `[0, 0, 0, 1]` but this is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f64; 4]; 4]", into = "[[f64; 4]; 4]")]
pub struct AffineTransform {
    matrix: Matrix4<f64>,
}

impl AffineTransform {
    /// Create a transform from an nalgebra matrix.
    pub fn new(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Create the identity transform.
    pub fn identity() -> Self {
        Self::new(Matrix4::identity())
    }

    /// Create a transform from row-major values.
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self::new(Matrix4::from_fn(|r, c| rows[r][c]))
    }

    /// Create a pure scaling transform.
    pub fn scaling(scale: &Spacing3) -> Self {
        Self::new(Matrix4::new_nonuniform_scaling(scale))
    }

    /// Create a pure translation transform.
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self::new(Matrix4::new_translation(&Vector3::new(tx, ty, tz)))
    }

    /// Get the underlying matrix.
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Get the matrix as row-major values.
    pub fn rows(&self) -> [[f64; 4]; 4] {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.matrix[(r, c)];
            }
        }
        rows
    }

    /// Get a single element.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.matrix[(row, col)]
    }

    /// Set a single element.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.matrix[(row, col)] = value;
    }

    /// Matrix product `self * rhs`: apply `rhs` first, then `self`.
    pub fn multiply(&self, rhs: &AffineTransform) -> AffineTransform {
        Self::new(self.matrix * rhs.matrix)
    }

    /// Determinant of the full 4x4 matrix.
    pub fn determinant(&self) -> f64 {
        self.matrix.determinant()
    }

    /// Invert the transform.
    ///
    /// Fails with `SingularMatrix` when the determinant is negligible relative
    /// to the scale of the entries it depends on, or when the LU inversion
    /// does not produce a finite result. For a matrix with bottom row
    /// `[0, 0, 0, 1]` only the 3x3 linear block is measured, so large
    /// translations never make a well-conditioned transform look singular.
    pub fn invert(&self) -> Result<AffineTransform> {
        let (det, scale, order) = if self.has_affine_bottom_row() {
            let linear: Matrix3<f64> = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
            (linear.determinant(), linear.amax(), 3)
        } else {
            (self.determinant(), self.matrix.amax(), 4)
        };

        if scale == 0.0 || !scale.is_finite() {
            return Err(ResliceError::singular(format!(
                "cannot invert matrix with largest linear entry {}",
                scale
            )));
        }

        if det.abs() <= SINGULAR_EPSILON * scale.powi(order) {
            return Err(ResliceError::singular(format!(
                "determinant {:e} is too close to zero",
                det
            )));
        }

        let inverse = self
            .matrix
            .lu()
            .try_inverse()
            .ok_or_else(|| ResliceError::singular("LU decomposition failed"))?;

        if inverse.iter().any(|v| !v.is_finite()) {
            return Err(ResliceError::singular("inverse has non-finite entries"));
        }

        Ok(Self::new(inverse))
    }

    fn has_affine_bottom_row(&self) -> bool {
        self.matrix[(3, 0)] == 0.0
            && self.matrix[(3, 1)] == 0.0
            && self.matrix[(3, 2)] == 0.0
            && self.matrix[(3, 3)] == 1.0
    }

    /// Check element-wise equality within an absolute tolerance.
    pub fn approx_eq(&self, other: &AffineTransform, tolerance: f64) -> bool {
        self.matrix
            .iter()
            .zip(other.matrix.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// Check whether this is exactly the identity.
    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[[f64; 4]; 4]> for AffineTransform {
    fn from(rows: [[f64; 4]; 4]) -> Self {
        Self::from_rows(rows)
    }
}

impl From<AffineTransform> for [[f64; 4]; 4] {
    fn from(transform: AffineTransform) -> Self {
        transform.rows()
    }
}

impl Transform for AffineTransform {
    fn transform_point(&self, point: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(point.x, point.y, point.z, 1.0);
        Point3::new(v[0], v[1], v[2])
    }
}

/// Formats the matrix in the same whitespace-separated layout the matrix
/// file reader accepts.
impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            let row: Vec<String> = (0..4).map(|c| format!("{}", self.matrix[(r, c)])).collect();
            if r < 3 {
                writeln!(f, "{}", row.join(" "))?;
            } else {
                write!(f, "{}", row.join(" "))?;
            }
        }
        Ok(())
    }
}
