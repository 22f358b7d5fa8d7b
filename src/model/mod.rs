//! Data structures representing parsed LDraw documents

mod camera;
mod color;
mod core;
mod texmap;

pub use camera::Camera;
pub use color::{
    COLOR_EDGE, COLOR_INHERIT, Color, ColorTable, Finish, GlitterFinish, GrainSize, Rgb,
    SpeckleFinish,
};
pub use core::{
    ChildRef, Classification, Face, FaceInfo, Geometry, MetaCommand, SourceFile, SubfileInstance,
};
pub use texmap::{TexMap, TexMapMethod};
