//! Operation configuration.
//!
//! `TransformOptions` is the raw option surface handed over by a front end
//! (command line, JSON job file). `validate` turns it into `ValidatedOptions`
//! once, before any transform math runs: the transform file is read and shape
//! checked first, then the interpolation, oversampling and datatype settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ResliceError, Result};
use crate::image::DataType;
use crate::interpolation::{InterpolationMethod, InterpolationSpec, Oversample};
use crate::transform::{load_matrix, AffineTransform};

/// Raw, unvalidated options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Path of a 4x4 ASCII transform file.
    pub transform: Option<PathBuf>,
    /// Invert the supplied transform before use.
    pub inverse: bool,
    /// Replace the input transform instead of composing with it.
    pub replace: bool,
    /// Template image to reslice onto.
    pub reslice: Option<PathBuf>,
    /// Image the supplied transform maps onto.
    pub reference: Option<PathBuf>,
    /// Transform assumes an x-reversed coordinate convention.
    pub flip_x: bool,
    /// Interpolation selector: nearest, linear or cubic.
    pub interp: Option<String>,
    /// Oversampling factors, one per axis.
    pub oversample: Option<Vec<i64>>,
    /// Output datatype identifier.
    pub datatype: Option<String>,
}

impl TransformOptions {
    /// Validate every option, reading the transform file if one is given.
    pub fn validate(&self) -> Result<ValidatedOptions> {
        let transform = self.transform.as_ref().map(load_matrix).transpose()?;
        self.validate_with(transform)
    }

    /// Validate every option using an already parsed transform in place of
    /// the transform path.
    pub fn validate_with(&self, transform: Option<AffineTransform>) -> Result<ValidatedOptions> {
        let method = match &self.interp {
            Some(selector) => selector.parse::<InterpolationMethod>()?,
            None => InterpolationMethod::default(),
        };

        let oversample = self
            .oversample
            .as_deref()
            .map(Oversample::from_values)
            .transpose()?;

        let datatype = self
            .datatype
            .as_deref()
            .map(str::parse::<DataType>)
            .transpose()?;

        Ok(ValidatedOptions {
            transform,
            inverse: self.inverse,
            replace: self.replace,
            reslice: self.reslice.clone(),
            reference: self.reference.clone(),
            flip_x: self.flip_x,
            interpolation: InterpolationSpec::new(method, oversample),
            datatype,
        })
    }
}

/// Options after parsing and validation. Immutable for one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedOptions {
    pub transform: Option<AffineTransform>,
    pub inverse: bool,
    pub replace: bool,
    pub reslice: Option<PathBuf>,
    pub reference: Option<PathBuf>,
    pub flip_x: bool,
    pub interpolation: InterpolationSpec,
    pub datatype: Option<DataType>,
}

impl ValidatedOptions {
    /// Options carrying only a transform.
    pub fn with_transform(transform: AffineTransform) -> Self {
        Self {
            transform: Some(transform),
            ..Self::default()
        }
    }

    /// Fail with `MissingTransform` if an option that needs a transform was
    /// given without one. Checked in the order inverse, reference, replace.
    pub fn check_transform_requirements(&self) -> Result<()> {
        if self.transform.is_some() {
            return Ok(());
        }
        if self.inverse {
            return Err(ResliceError::MissingTransform("inverse"));
        }
        if self.reference.is_some() {
            return Err(ResliceError::MissingTransform("reference"));
        }
        if self.replace {
            return Err(ResliceError::MissingTransform("replace"));
        }
        Ok(())
    }
}
