//! Color palette types
//!
//! LDraw colors live in one global table loaded from `LDConfig.ldr` (or the
//! alternate `LDCfgalt.ldr`). Codes 16 and 24 are inheritance markers
//! resolved during composition, never concrete colors in final output.

use std::collections::HashMap;

/// Color code that inherits the parent instance color.
pub const COLOR_INHERIT: u32 = 16;

/// Color code that selects the parent color's edge color.
pub const COLOR_EDGE: u32 = 24;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red component
    pub red: u8,
    /// Green component
    pub green: u8,
    /// Blue component
    pub blue: u8,
}

impl Rgb {
    /// Construct from individual components.
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Grain size of a glitter or speckle finish, either a single size or a
/// min/max range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrainSize {
    /// Uniform grain size
    Size(f64),
    /// Grain size range
    MinMax {
        /// Smallest grain size
        min: f64,
        /// Largest grain size
        max: f64,
    },
}

/// Glitter material parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GlitterFinish {
    /// Glitter particle color
    pub value: Rgb,
    /// Optional particle transparency
    pub alpha: Option<u8>,
    /// Optional particle luminance
    pub luminance: Option<u8>,
    /// Surface fraction covered by particles
    pub fraction: f64,
    /// Volume fraction of particles
    pub vfraction: f64,
    /// Particle size
    pub size: GrainSize,
}

/// Speckle material parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeckleFinish {
    /// Speckle particle color
    pub value: Rgb,
    /// Optional particle transparency
    pub alpha: Option<u8>,
    /// Optional particle luminance
    pub luminance: Option<u8>,
    /// Surface fraction covered by particles
    pub fraction: f64,
    /// Particle size
    pub size: GrainSize,
}

/// Surface finish of a palette color.
#[derive(Debug, Clone, PartialEq)]
pub enum Finish {
    /// Chrome finish
    Chrome,
    /// Pearlescent finish
    Pearlescent,
    /// Rubber finish
    Rubber,
    /// Matte metallic finish
    MatteMetallic,
    /// Metal finish
    Metal,
    /// Glitter material
    Glitter(GlitterFinish),
    /// Speckle material
    Speckle(SpeckleFinish),
}

/// One palette entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    /// Numeric palette code
    pub code: u32,
    /// Display name
    pub name: String,
    /// Main color
    pub value: Rgb,
    /// Edge color drawn around the part outline
    pub edge: Rgb,
    /// Optional transparency (0 transparent, 255 opaque)
    pub alpha: Option<u8>,
    /// Optional luminance for glowing colors
    pub luminance: Option<u8>,
    /// Optional surface finish
    pub finish: Option<Finish>,
}

/// The global numeric-code → color palette, loaded once per session.
#[derive(Debug, Default)]
pub struct ColorTable {
    colors: HashMap<u32, Color>,
}

impl ColorTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a palette entry.
    pub fn insert(&mut self, color: Color) {
        self.colors.insert(color.code, color);
    }

    /// Look up a palette entry by code.
    pub fn get(&self, code: u32) -> Option<&Color> {
        self.colors.get(&code)
    }

    /// Number of palette entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True when no entries have been loaded.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
