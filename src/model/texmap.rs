//! Texture-mapping region metadata

use crate::error::{Error, Result};
use nalgebra::Point3;

/// Texture projection method of a texmap region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TexMapMethod {
    /// Planar projection
    Planar,
    /// Cylindrical projection
    Cylindrical,
    /// Spherical projection
    Spherical,
}

impl TexMapMethod {
    /// Parse a method keyword (case-insensitive).
    pub fn from_keyword(keyword: &str) -> Result<Self> {
        match keyword.to_lowercase().as_str() {
            "planar" => Ok(TexMapMethod::Planar),
            "cylindrical" => Ok(TexMapMethod::Cylindrical),
            "spherical" => Ok(TexMapMethod::Spherical),
            other => Err(Error::ParseError(format!(
                "unknown texmap method '{}'",
                other
            ))),
        }
    }
}

/// Texture projection attached to geometry inside a texmap region.
#[derive(Debug, Clone, PartialEq)]
pub struct TexMap {
    /// Projection method
    pub method: TexMapMethod,
    /// Three projection reference points
    pub points: [Point3<f64>; 3],
    /// Texture image name
    pub texture: String,
    /// Optional gloss image name
    pub glossmap: Option<String>,
}
