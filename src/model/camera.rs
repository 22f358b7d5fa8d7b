//! Camera records accumulated from `!LEOCAD CAMERA` meta lines

use nalgebra::{Point3, Vector3};

/// A camera definition.
///
/// Fields accumulate across one or more command lines; the record joins the
/// session camera list only once its terminating `NAME` field is consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees
    pub fov: f64,
    /// Near clipping distance
    pub z_near: f64,
    /// Far clipping distance
    pub z_far: f64,
    /// Camera position
    pub position: Point3<f64>,
    /// Look-at target
    pub target_position: Point3<f64>,
    /// Up direction
    pub up_vector: Vector3<f64>,
    /// Orthographic rather than perspective projection
    pub orthographic: bool,
    /// Hidden in the host scene
    pub hidden: bool,
    /// Display name; consuming it finalizes the record
    pub name: String,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 30.0,
            z_near: 10.0,
            z_far: 4000.0,
            position: Point3::origin(),
            target_position: Point3::origin(),
            up_vector: Vector3::new(0.0, 1.0, 0.0),
            orthographic: false,
            hidden: false,
            name: String::new(),
        }
    }
}
