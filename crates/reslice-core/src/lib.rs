//! Affine transform resolution and volume reslicing.
//!
//! The crate resolves the affine transform relating two image spaces and
//! resamples a source volume onto a target voxel grid under it.
//!
//! * [`transform`]: fixed 4x4 affine transforms and the ASCII matrix reader
//! * [`resolver`]: inverse / reference / x-flip / replace resolution
//! * [`interpolation`]: nearest, linear and cubic kernels plus oversampling
//! * [`filter`]: the parallel reslice filter
//! * [`plan`]: validated options to output header and volume

pub mod error;
pub mod geometry;
pub mod image;
pub mod transform;
pub mod interpolation;
pub mod filter;
pub mod config;
pub mod resolver;
pub mod plan;

pub use error::{ResliceError, Result};
pub use image::{Image, ImageHeader, VoxelGrid};
pub use transform::AffineTransform;
pub use config::{TransformOptions, ValidatedOptions};
pub use resolver::{ResolvedTransform, TransformResolver};
pub use plan::{GridProvider, TransformOutput, TransformPlan};
