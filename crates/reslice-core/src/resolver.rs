//! Transform resolution.
//!
//! Combines the supplied transform, the inverse flag, an optional reference
//! grid (with optional x-flip correction) and the replace policy into the
//! single transform `C` applied to the source image.
//!
//! Steps, in order:
//! 1. invert the supplied transform if requested;
//! 2. with a reference grid, optionally apply the x-flip correction, then
//!    compose with the reference grid transform and force replace;
//! 3. without a reference grid, use the supplied transform or identity.

use crate::config::ValidatedOptions;
use crate::error::{ResliceError, Result};
use crate::image::VoxelGrid;
use crate::transform::AffineTransform;

/// Outcome of transform resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTransform {
    transform: AffineTransform,
    replace: bool,
    supplied: bool,
}

impl ResolvedTransform {
    /// The resolved transform `C`.
    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    /// Whether `C` replaces the source transform rather than composing with it.
    pub fn replace(&self) -> bool {
        self.replace
    }

    /// Whether a transform was supplied at all.
    pub fn is_supplied(&self) -> bool {
        self.supplied
    }

    /// World transform the source image ends up with.
    ///
    /// * replace: `C`
    /// * compose: `C * source`
    /// * nothing supplied: `source` unchanged
    pub fn output_transform(&self, source: &AffineTransform) -> AffineTransform {
        if !self.supplied {
            *source
        } else if self.replace {
            self.transform
        } else {
            self.transform.multiply(source)
        }
    }

    /// Source world transform and output-to-source world step for reslicing.
    ///
    /// Under compose, `C` maps output world coordinates onto the untouched
    /// source: `(source, C)`. Under replace, `C` becomes the source transform
    /// and the step is the identity: `(C, I)`. With nothing supplied the
    /// source is used as is.
    pub fn reslice_frame(&self, source: &AffineTransform) -> (AffineTransform, AffineTransform) {
        if self.supplied && !self.replace {
            (*source, self.transform)
        } else {
            (self.output_transform(source), AffineTransform::identity())
        }
    }
}

/// X-axis flip within a grid: negate x and shift by the grid's x extent,
/// `(dim_x - 1) * vox_x`.
pub fn flip_x_matrix(grid: &VoxelGrid) -> AffineTransform {
    let mut flip = AffineTransform::identity();
    flip.set(0, 0, -1.0);
    flip.set(0, 3, (grid.dims()[0] as f64 - 1.0) * grid.voxel_size().x);
    flip
}

/// Convert a transform from an x-reversed convention: `R_ref * T * R_orig`.
///
/// `R_ref` flips within the reference grid and `R_orig` within the source
/// grid; their roles swap when the transform was inverted.
pub fn flip_x_correction(
    transform: &AffineTransform,
    reference: &VoxelGrid,
    source: &VoxelGrid,
    inverse: bool,
) -> AffineTransform {
    let mut r_ref = flip_x_matrix(reference);
    let mut r_orig = flip_x_matrix(source);
    if inverse {
        std::mem::swap(&mut r_ref, &mut r_orig);
    }
    r_ref.multiply(&transform.multiply(&r_orig))
}

/// Resolves the effective transform for one operation.
#[derive(Debug, Clone, Default)]
pub struct TransformResolver<'a> {
    transform: Option<AffineTransform>,
    inverse: bool,
    replace: bool,
    flip_x: bool,
    reference: Option<&'a VoxelGrid>,
}

impl<'a> TransformResolver<'a> {
    /// Resolver with no transform supplied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver configured from validated options and the loaded reference grid.
    pub fn from_options(options: &ValidatedOptions, reference: Option<&'a VoxelGrid>) -> Self {
        Self {
            transform: options.transform,
            inverse: options.inverse,
            replace: options.replace,
            flip_x: options.flip_x,
            reference,
        }
    }

    pub fn with_transform(mut self, transform: AffineTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn with_flip_x(mut self, flip_x: bool) -> Self {
        self.flip_x = flip_x;
        self
    }

    pub fn with_reference(mut self, reference: &'a VoxelGrid) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Resolve the transform applied to `source`.
    pub fn resolve(&self, source: &VoxelGrid) -> Result<ResolvedTransform> {
        let mut transform = self.transform;
        let mut replace = self.replace;

        if self.inverse {
            let t = transform.ok_or(ResliceError::MissingTransform("inverse"))?;
            transform = Some(t.invert()?);
            tracing::debug!("Inverted supplied transform");
        }

        let resolved = match self.reference {
            Some(reference) => {
                let mut t = transform.ok_or(ResliceError::MissingTransform("reference"))?;
                if self.flip_x {
                    t = flip_x_correction(&t, reference, source, self.inverse);
                    tracing::debug!("Applied x-flip correction (inverse: {})", self.inverse);
                }
                replace = true;
                reference.transform().multiply(&t)
            }
            None => {
                if self.flip_x {
                    tracing::debug!("x-flip correction ignored without a reference image");
                }
                transform.unwrap_or_else(AffineTransform::identity)
            }
        };

        if replace && transform.is_none() {
            return Err(ResliceError::MissingTransform("replace"));
        }

        Ok(ResolvedTransform {
            transform: resolved,
            replace,
            supplied: transform.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Spacing3;

    fn grid(dims: [usize; 3], vox: f64) -> VoxelGrid {
        VoxelGrid::new(
            dims,
            Spacing3::new(vox, vox, vox),
            AffineTransform::translation(-10.0, 5.0, 2.0),
        )
        .unwrap()
    }

    #[test]
    fn test_flip_x_matrix() {
        let flip = flip_x_matrix(&grid([11, 4, 4], 2.0));
        assert_eq!(flip.get(0, 0), -1.0);
        assert_eq!(flip.get(0, 3), 20.0);
        assert_eq!(flip.get(1, 1), 1.0);
        // involution
        assert!(flip.multiply(&flip).approx_eq(&AffineTransform::identity(), 1e-12));
    }

    #[test]
    fn test_nothing_supplied_is_identity() {
        let resolved = TransformResolver::new().resolve(&grid([4, 4, 4], 1.0)).unwrap();
        assert!(resolved.transform().is_identity());
        assert!(!resolved.is_supplied());
        assert!(!resolved.replace());

        let source = AffineTransform::translation(1.0, 2.0, 3.0);
        assert_eq!(resolved.output_transform(&source), source);
    }

    #[test]
    fn test_missing_transform() {
        let source = grid([4, 4, 4], 1.0);
        let reference = grid([4, 4, 4], 1.0);

        let err = TransformResolver::new().with_inverse(true).resolve(&source).unwrap_err();
        assert!(matches!(err, ResliceError::MissingTransform("inverse")));

        let err = TransformResolver::new().with_reference(&reference).resolve(&source).unwrap_err();
        assert!(matches!(err, ResliceError::MissingTransform("reference")));

        let err = TransformResolver::new().with_replace(true).resolve(&source).unwrap_err();
        assert!(matches!(err, ResliceError::MissingTransform("replace")));
    }

    #[test]
    fn test_singular_inverse() {
        let mut singular = AffineTransform::identity();
        singular.set(1, 1, 0.0);
        let err = TransformResolver::new()
            .with_transform(singular)
            .with_inverse(true)
            .resolve(&grid([4, 4, 4], 1.0))
            .unwrap_err();
        assert!(matches!(err, ResliceError::SingularMatrix(_)));
    }

    #[test]
    fn test_reference_forces_replace() {
        let t = AffineTransform::translation(3.0, 0.0, 0.0);
        let reference = grid([4, 4, 4], 1.0);
        let resolved = TransformResolver::new()
            .with_transform(t)
            .with_reference(&reference)
            .resolve(&grid([4, 4, 4], 1.0))
            .unwrap();
        assert!(resolved.replace());
        assert_eq!(*resolved.transform(), reference.transform().multiply(&t));
    }

    #[test]
    fn test_reslice_frame() {
        let source = AffineTransform::translation(1.0, 2.0, 3.0);
        let t = AffineTransform::translation(3.0, 0.0, 0.0);

        let compose = TransformResolver::new().with_transform(t).resolve(&grid([4, 4, 4], 1.0)).unwrap();
        assert_eq!(compose.reslice_frame(&source), (source, t));

        let replace = TransformResolver::new()
            .with_transform(t)
            .with_replace(true)
            .resolve(&grid([4, 4, 4], 1.0))
            .unwrap();
        assert_eq!(replace.reslice_frame(&source), (t, AffineTransform::identity()));

        let none = TransformResolver::new().resolve(&grid([4, 4, 4], 1.0)).unwrap();
        assert_eq!(none.reslice_frame(&source), (source, AffineTransform::identity()));
    }

    #[test]
    fn test_flip_without_reference_is_ignored() {
        let t = AffineTransform::translation(3.0, 0.0, 0.0);
        let resolved = TransformResolver::new()
            .with_transform(t)
            .with_flip_x(true)
            .resolve(&grid([4, 4, 4], 1.0))
            .unwrap();
        assert_eq!(*resolved.transform(), t);
        assert!(!resolved.replace());
    }
}
