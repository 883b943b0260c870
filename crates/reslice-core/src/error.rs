//! Error types for transform resolution and reslicing.
//!
//! Every variant is fatal: an operation that hits one of these aborts before
//! any output volume or header is produced.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for transform and reslice operations.
#[derive(Error, Debug)]
pub enum ResliceError {
    /// Supplied matrix does not parse to exactly 4x4 real numbers.
    #[error("transform matrix supplied in \"{source_name}\" is not 4x4: {reason}")]
    MalformedTransform {
        source_name: String,
        reason: String,
    },

    /// Inversion requested on a non-invertible matrix.
    #[error("singular matrix: {0}")]
    SingularMatrix(String),

    /// An option that needs a transform was given without one.
    #[error("no transform provided for option '-{0}' (specify using '-transform' option)")]
    MissingTransform(&'static str),

    /// Oversampling vector has the wrong length or a factor below one.
    #[error("invalid oversampling factors: {0}")]
    InvalidOversample(String),

    /// Interpolation selector outside {nearest, linear, cubic}.
    #[error("unsupported interpolation method \"{0}\"")]
    UnsupportedKernel(String),

    /// Unknown output datatype identifier.
    #[error("unsupported datatype \"{0}\"")]
    UnsupportedDatatype(String),

    /// Voxel grid or volume geometry is unusable.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Reference or template header could not be supplied.
    #[error("failed to load image header \"{path}\": {reason}")]
    Grid {
        path: PathBuf,
        reason: String,
    },

    /// Transform file could not be read.
    #[error("failed to read \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for transform and reslice operations.
pub type Result<T> = std::result::Result<T, ResliceError>;

impl ResliceError {
    /// Create a malformed transform error.
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTransform {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a singular matrix error.
    pub fn singular(msg: impl Into<String>) -> Self {
        Self::SingularMatrix(msg.into())
    }

    /// Create an invalid oversampling error.
    pub fn oversample(msg: impl Into<String>) -> Self {
        Self::InvalidOversample(msg.into())
    }

    /// Create an invalid grid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }

    /// Create a header provider error.
    pub fn grid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Grid {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_transform_display() {
        let err = ResliceError::MissingTransform("inverse");
        assert_eq!(
            err.to_string(),
            "no transform provided for option '-inverse' (specify using '-transform' option)"
        );
    }

    #[test]
    fn test_malformed_display() {
        let err = ResliceError::malformed("xfm.txt", "expected 4 rows, got 3");
        let msg = err.to_string();
        assert!(msg.contains("xfm.txt"));
        assert!(msg.contains("not 4x4"));
        assert!(msg.contains("got 3"));
    }

    #[test]
    fn test_error_creation() {
        assert!(matches!(ResliceError::singular("det = 0"), ResliceError::SingularMatrix(_)));
        assert!(matches!(ResliceError::oversample("x"), ResliceError::InvalidOversample(_)));
        assert!(matches!(ResliceError::invalid_grid("x"), ResliceError::InvalidGrid(_)));
    }
}
