//! Import configuration
//!
//! [`ParseConfig`] enumerates every option that changes what a parse run
//! produces. Options that alter composed geometry participate in the
//! instance cache key (see [`builder`](crate::builder)), so two runs with
//! different settings never share cached geometry by accident.

use std::path::PathBuf;

/// Primitive resolution variant.
///
/// The LDraw library ships curved primitives in three resolutions; the
/// variant selects which `p/` subdirectory the resolver prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    /// Standard resolution primitives from `p/`
    #[default]
    Standard,
    /// High resolution primitives from `p/48/`
    High,
    /// Low resolution primitives from `p/8/`
    Low,
}

impl Resolution {
    /// The `p/` subdirectory this resolution prefers, if any.
    pub fn primitive_dir(&self) -> Option<&'static str> {
        match self {
            Resolution::Standard => None,
            Resolution::High => Some("48"),
            Resolution::Low => Some("8"),
        }
    }
}

/// Smoothing strategy recorded for downstream renderers.
///
/// The engine itself performs no smoothing; the choice participates in the
/// instance cache key because renderers cannot share geometry prepared for
/// different strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SmoothType {
    /// No smoothing
    #[default]
    None,
    /// Angle-based auto smoothing
    AutoSmooth,
    /// Edge-split smoothing
    EdgeSplit,
}

/// Configuration for one parse run.
///
/// Built with chained `with_*` methods:
///
/// ```
/// use libldraw::{ParseConfig, Resolution};
///
/// let config = ParseConfig::new()
///     .with_resolution(Resolution::High)
///     .with_remove_doubles(0.05)
///     .with_meta_step(1, 3);
/// ```
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Library search roots for the filesystem resolver.
    pub library_paths: Vec<PathBuf>,
    /// Primitive resolution variant.
    pub resolution: Resolution,
    /// Substitute logo-bearing stud variants when they resolve.
    pub display_logo: bool,
    /// Logo variant name used for substitution (e.g. `"logo3"`).
    pub chosen_logo: String,
    /// Weld coincident vertices of composed geometry.
    pub remove_doubles: bool,
    /// Welding distance used when `remove_doubles` is set.
    pub merge_distance: f64,
    /// Smoothing strategy recorded for the renderer.
    pub smooth_type: SmoothType,
    /// Load `LDCfgalt.ldr` instead of `LDConfig.ldr`.
    pub use_alt_colors: bool,
    /// Subsurface material toggle recorded for the renderer.
    pub add_subsurface: bool,
    /// Emit step meta commands and assign frame numbers.
    pub meta_step: bool,
    /// First frame of the stepped animation.
    pub starting_step_frame: i64,
    /// Frame spacing between steps.
    pub frames_per_step: i64,
    /// Emit save marker events.
    pub meta_save: bool,
    /// Emit clear marker events.
    pub meta_clear: bool,
    /// Surface `PRINT`/`WRITE` lines as diagnostic messages.
    pub meta_print_write: bool,
    /// Honor grouping meta commands.
    pub meta_group: bool,
    /// Parse texture-mapping regions; when off, fallback geometry is used.
    pub texmap: bool,
    /// Skip stud subfiles entirely.
    pub no_studs: bool,
}

impl ParseConfig {
    /// Create a configuration with default settings and no library roots.
    pub fn new() -> Self {
        Self {
            library_paths: Vec::new(),
            resolution: Resolution::Standard,
            display_logo: false,
            chosen_logo: "logo3".to_string(),
            remove_doubles: false,
            merge_distance: 0.05,
            smooth_type: SmoothType::None,
            use_alt_colors: false,
            add_subsurface: false,
            meta_step: false,
            starting_step_frame: 1,
            frames_per_step: 3,
            meta_save: false,
            meta_clear: false,
            meta_print_write: false,
            meta_group: false,
            texmap: true,
            no_studs: false,
        }
    }

    /// Add a library search root.
    pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_paths.push(path.into());
        self
    }

    /// Select the primitive resolution variant.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Enable logo substitution on studs with the given logo variant.
    pub fn with_display_logo(mut self, chosen_logo: impl Into<String>) -> Self {
        self.display_logo = true;
        self.chosen_logo = chosen_logo.into();
        self
    }

    /// Enable coincident-vertex welding at the given merge distance.
    pub fn with_remove_doubles(mut self, merge_distance: f64) -> Self {
        self.remove_doubles = true;
        self.merge_distance = merge_distance;
        self
    }

    /// Select the smoothing strategy recorded for the renderer.
    pub fn with_smooth_type(mut self, smooth_type: SmoothType) -> Self {
        self.smooth_type = smooth_type;
        self
    }

    /// Load the alternate color table (`LDCfgalt.ldr`).
    pub fn with_alt_colors(mut self) -> Self {
        self.use_alt_colors = true;
        self
    }

    /// Record the subsurface material toggle.
    pub fn with_subsurface(mut self) -> Self {
        self.add_subsurface = true;
        self
    }

    /// Enable stepped animation events with the given frame layout.
    pub fn with_meta_step(mut self, starting_frame: i64, frames_per_step: i64) -> Self {
        self.meta_step = true;
        self.starting_step_frame = starting_frame;
        self.frames_per_step = frames_per_step;
        self
    }

    /// Emit save marker events.
    pub fn with_meta_save(mut self) -> Self {
        self.meta_save = true;
        self
    }

    /// Emit clear marker events.
    pub fn with_meta_clear(mut self) -> Self {
        self.meta_clear = true;
        self
    }

    /// Surface `PRINT`/`WRITE` lines as diagnostic messages.
    pub fn with_meta_print_write(mut self) -> Self {
        self.meta_print_write = true;
        self
    }

    /// Honor grouping meta commands.
    pub fn with_meta_group(mut self) -> Self {
        self.meta_group = true;
        self
    }

    /// Disable texture-mapping regions (fallback geometry is used instead).
    pub fn without_texmap(mut self) -> Self {
        self.texmap = false;
        self
    }

    /// Skip stud subfiles entirely.
    pub fn without_studs(mut self) -> Self {
        self.no_studs = true;
        self
    }

    /// Name of the color table document this configuration selects.
    pub fn color_table_name(&self) -> &'static str {
        if self.use_alt_colors {
            "LDCfgalt.ldr"
        } else {
            "LDConfig.ldr"
        }
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::new()
    }
}
