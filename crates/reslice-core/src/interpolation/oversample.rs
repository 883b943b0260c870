//! Oversampling factors and the interpolation spec.
//!
//! When the output grid is coarser than the source, each output voxel is
//! sampled several times along each axis and the sub-samples are averaged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::method::InterpolationMethod;
use crate::error::{ResliceError, Result};
use crate::geometry::Spacing3;

/// Slack applied to the voxel size ratio so that rounding noise in a ratio of
/// exactly `n` does not bump the factor to `n + 1`.
const AUTO_RATIO_SLACK: f64 = 0.999;

/// Per-axis oversampling factors, each at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct Oversample([usize; 3]);

impl Oversample {
    /// One sample per voxel.
    pub const UNIT: Oversample = Oversample([1, 1, 1]);

    /// Validate a user supplied vector, which must hold exactly three values.
    pub fn from_values(values: &[i64]) -> Result<Self> {
        if values.len() != 3 {
            return Err(ResliceError::oversample(format!(
                "expected a vector of 3 values, got {}",
                values.len()
            )));
        }
        if values.iter().any(|&v| v < 1) {
            return Err(ResliceError::oversample(format!(
                "oversample factors must be greater than zero, got {:?}",
                values
            )));
        }
        Ok(Self([values[0] as usize, values[1] as usize, values[2] as usize]))
    }

    /// Factors derived from voxel sizes: `max(1, ceil(output / source))` per
    /// axis, so only downsampling triggers supersampling.
    pub fn auto(output_voxel_size: &Spacing3, source_voxel_size: &Spacing3) -> Self {
        let mut factors = [1usize; 3];
        for (axis, factor) in factors.iter_mut().enumerate() {
            let ratio = output_voxel_size[axis] / source_voxel_size[axis];
            let n = (AUTO_RATIO_SLACK * ratio).ceil();
            if n.is_finite() && n > 1.0 {
                *factor = n as usize;
            }
        }
        Self(factors)
    }

    pub fn factors(&self) -> [usize; 3] {
        self.0
    }

    /// Number of sub-samples per output voxel.
    pub fn sample_count(&self) -> usize {
        self.0.iter().product()
    }

    /// Sub-sample offsets along one axis, in output voxel units.
    ///
    /// Offsets are evenly spaced and symmetric about the voxel centre:
    /// `(k + 0.5) / n - 0.5` for `k` in `0..n`. A factor of one yields `[0]`.
    pub fn offsets(&self, axis: usize) -> Vec<f64> {
        let n = self.0[axis];
        let step = 1.0 / n as f64;
        let from = 0.5 * (step - 1.0);
        (0..n).map(|k| from + k as f64 * step).collect()
    }
}

impl Default for Oversample {
    fn default() -> Self {
        Self::UNIT
    }
}

impl TryFrom<Vec<i64>> for Oversample {
    type Error = ResliceError;

    fn try_from(values: Vec<i64>) -> Result<Self> {
        Self::from_values(&values)
    }
}

impl From<Oversample> for Vec<i64> {
    fn from(oversample: Oversample) -> Self {
        oversample.0.iter().map(|&f| f as i64).collect()
    }
}

impl fmt::Display for Oversample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0[0], self.0[1], self.0[2])
    }
}

/// Parses a comma separated list such as `2,2,1`.
impl FromStr for Oversample {
    type Err = ResliceError;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|token| {
                token.trim().parse::<i64>().map_err(|_| {
                    ResliceError::oversample(format!("\"{}\" is not an integer", token.trim()))
                })
            })
            .collect::<Result<Vec<i64>>>()?;
        Self::from_values(&values)
    }
}

/// Kernel plus oversampling, fixed for one reslice operation.
///
/// `oversample: None` means the factors are derived from the voxel sizes of
/// the grids involved once they are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterpolationSpec {
    pub method: InterpolationMethod,
    pub oversample: Option<Oversample>,
}

impl InterpolationSpec {
    pub fn new(method: InterpolationMethod, oversample: Option<Oversample>) -> Self {
        Self { method, oversample }
    }

    /// Explicit factors if given, otherwise derived from the voxel sizes.
    pub fn resolve_oversample(&self, output_voxel_size: &Spacing3, source_voxel_size: &Spacing3) -> Oversample {
        self.oversample
            .unwrap_or_else(|| Oversample::auto(output_voxel_size, source_voxel_size))
    }
}
