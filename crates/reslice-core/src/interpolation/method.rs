//! Interpolation method selection.
//!
//! The kernel is chosen once from configuration and then dispatched through
//! this closed set of variants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::cubic::CubicInterpolator;
use super::linear::LinearInterpolator;
use super::nearest::NearestNeighborInterpolator;
use super::trait_::Interpolator;
use crate::error::ResliceError;
use crate::geometry::Point3;
use crate::image::VoxelAccess;

/// Interpolation kernel used when reslicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    Nearest,
    #[default]
    Linear,
    Cubic,
}

impl InterpolationMethod {
    /// Accepted selector strings.
    pub const CHOICES: [&'static str; 3] = ["nearest", "linear", "cubic"];
}

impl Interpolator for InterpolationMethod {
    fn support_margin(&self) -> f64 {
        match self {
            Self::Nearest => NearestNeighborInterpolator.support_margin(),
            Self::Linear => LinearInterpolator.support_margin(),
            Self::Cubic => CubicInterpolator.support_margin(),
        }
    }

    fn interpolate<V: VoxelAccess + ?Sized>(&self, volume: &V, index: &Point3) -> f32 {
        match self {
            Self::Nearest => NearestNeighborInterpolator.interpolate(volume, index),
            Self::Linear => LinearInterpolator.interpolate(volume, index),
            Self::Cubic => CubicInterpolator.interpolate(volume, index),
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::CHOICES[*self as usize])
    }
}

impl FromStr for InterpolationMethod {
    type Err = ResliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "linear" => Ok(Self::Linear),
            "cubic" => Ok(Self::Cubic),
            _ => Err(ResliceError::UnsupportedKernel(s.to_string())),
        }
    }
}
