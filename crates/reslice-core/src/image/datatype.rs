//! Output sample datatypes.
//!
//! Samples are computed in floating point; when an integer output type is
//! requested, values are rounded to nearest and saturated to the type range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResliceError;

/// Sample datatype of an output volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Bit,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl DataType {
    /// All identifiers accepted by `from_str`.
    pub const IDENTIFIERS: [&'static str; 9] = [
        "bit", "int8", "uint8", "int16", "uint16", "int32", "uint32", "float32", "float64",
    ];

    pub fn is_integer(self) -> bool {
        !matches!(self, DataType::Float32 | DataType::Float64)
    }

    fn range(self) -> Option<(f64, f64)> {
        match self {
            DataType::Bit => Some((0.0, 1.0)),
            DataType::Int8 => Some((i8::MIN as f64, i8::MAX as f64)),
            DataType::UInt8 => Some((0.0, u8::MAX as f64)),
            DataType::Int16 => Some((i16::MIN as f64, i16::MAX as f64)),
            DataType::UInt16 => Some((0.0, u16::MAX as f64)),
            DataType::Int32 => Some((i32::MIN as f64, i32::MAX as f64)),
            DataType::UInt32 => Some((0.0, u32::MAX as f64)),
            DataType::Float32 | DataType::Float64 => None,
        }
    }

    /// Convert a computed sample to the value this type would store.
    ///
    /// NaN maps to zero for integer types.
    pub fn cast(self, value: f32) -> f32 {
        match self.range() {
            None => value,
            Some(_) if value.is_nan() => 0.0,
            Some((lo, hi)) => {
                let rounded = (value as f64).round().clamp(lo, hi);
                rounded as f32
            }
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Bit => "bit",
            DataType::Int8 => "int8",
            DataType::UInt8 => "uint8",
            DataType::Int16 => "int16",
            DataType::UInt16 => "uint16",
            DataType::Int32 => "int32",
            DataType::UInt32 => "uint32",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
        };
        f.write_str(name)
    }
}

impl FromStr for DataType {
    type Err = ResliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bit" => Ok(DataType::Bit),
            "int8" => Ok(DataType::Int8),
            "uint8" => Ok(DataType::UInt8),
            "int16" => Ok(DataType::Int16),
            "uint16" => Ok(DataType::UInt16),
            "int32" => Ok(DataType::Int32),
            "uint32" => Ok(DataType::UInt32),
            "float32" => Ok(DataType::Float32),
            "float64" => Ok(DataType::Float64),
            _ => Err(ResliceError::UnsupportedDatatype(s.to_string())),
        }
    }
}
