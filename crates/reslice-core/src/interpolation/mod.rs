//! Interpolation types and operations.
//!
//! This module provides interpolation traits and implementations
//! for sampling values at continuous coordinates.

pub mod trait_;
pub mod nearest;
pub mod linear;
pub mod cubic;
pub mod method;
pub mod oversample;

pub use trait_::{Interpolator, FILL_VALUE};
pub use nearest::NearestNeighborInterpolator;
pub use linear::LinearInterpolator;
pub use cubic::CubicInterpolator;
pub use method::InterpolationMethod;
pub use oversample::{InterpolationSpec, Oversample};
