//! Image header metadata.
//!
//! The header is what the surrounding writer needs besides the samples: a
//! name, the grid geometry, an optional datatype override and the comment
//! log describing what was done to the image.

use serde::{Deserialize, Serialize};

use super::datatype::DataType;
use super::grid::VoxelGrid;

/// Image header: name, geometry and history comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageHeader {
    /// Name or path the header was loaded from.
    pub name: String,
    /// Geometry of the image.
    pub grid: VoxelGrid,
    /// Sample datatype, `None` when unchanged from the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<DataType>,
    /// Processing history.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

impl ImageHeader {
    /// Create a header with no datatype override and no comments.
    pub fn new(name: impl Into<String>, grid: VoxelGrid) -> Self {
        Self {
            name: name.into(),
            grid,
            datatype: None,
            comments: Vec::new(),
        }
    }

    /// Append a comment to the history.
    pub fn push_comment(&mut self, comment: impl Into<String>) {
        self.comments.push(comment.into());
    }
}
