//! # libldraw
//!
//! A pure Rust parsing and instancing engine for the LDraw brick-model
//! file format.
//!
//! LDraw documents are line-oriented text describing a model as geometry
//! primitives plus subfile references that may instance a part thousands
//! of times. This library parses possibly-nested model/part files into an
//! instanced tree, composes transforms and inherited colors, and merges
//! geometry with deduplication: a part referenced N times under identical
//! options is parsed once and geometry-composed once.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Multi-part document (MPD) splitting
//! - Color table loading with finish metadata
//! - Grouping, stepping, camera, and texture-mapping meta commands
//! - Per-session caches, diagnostics, and cache-traffic counters
//!
//! ## Example
//!
//! ```no_run
//! use libldraw::{ParseConfig, Scene};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ParseConfig::new().with_library_path("/usr/share/ldraw");
//! let scene = Scene::from_path_with_config("models/car.ldr", config)?;
//!
//! println!("{} parts, {} cameras", scene.parts.len(), scene.cameras.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
pub mod config;
pub mod error;
pub mod mesh_ops;
pub mod model;
pub mod mpd;
pub mod resolver;
mod session;
mod special_bricks;
mod tokenizer;

pub(crate) mod parser;

pub use builder::{GeometryKey, MetaEvent, PartInstance, Scene};
pub use config::{ParseConfig, Resolution, SmoothType};
pub use error::{Error, Result};
pub use model::{
    COLOR_EDGE, COLOR_INHERIT, Camera, ChildRef, Classification, Color, ColorTable, Face,
    FaceInfo, Finish, Geometry, GlitterFinish, GrainSize, MetaCommand, Rgb, SourceFile,
    SpeckleFinish, SubfileInstance, TexMap, TexMapMethod,
};
pub use resolver::{FileSystemResolver, LibraryResolver, MemoryResolver};
pub use session::{Diagnostics, SessionStats};
pub use tokenizer::{LineType, parse_line};

use std::path::Path;
use std::sync::Arc;

use crate::resolver::normalize_name;

impl Scene {
    /// Load a scene from an entry file path with the default configuration.
    ///
    /// The entry file's directory joins the library search roots, so
    /// model-relative references resolve.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_path_with_config(path, ParseConfig::new())
    }

    /// Load a scene from an entry file path with a custom configuration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use libldraw::{ParseConfig, Resolution, Scene};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ParseConfig::new()
    ///     .with_library_path("/usr/share/ldraw")
    ///     .with_resolution(Resolution::High)
    ///     .with_remove_doubles(0.05);
    /// let scene = Scene::from_path_with_config("models/car.ldr", config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_path_with_config<P: AsRef<Path>>(path: P, config: ParseConfig) -> Result<Self> {
        let path = path.as_ref();
        let mut roots = config.library_paths.clone();
        if let Some(parent) = path.parent() {
            roots.insert(0, parent.to_path_buf());
        }
        let resolver = FileSystemResolver::new(roots, config.resolution);

        let entry_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::MissingFile(path.display().to_string()))?;
        let lines = session::decode_lines(std::fs::read(path)?);

        Self::from_lines(lines, &entry_name, &resolver, config)
    }

    /// Load a scene through a custom [`LibraryResolver`].
    ///
    /// The entry document itself is fetched through the resolver, split as
    /// an MPD archive if applicable, then parsed.
    pub fn from_resolver(
        entry: &str,
        resolver: &dyn LibraryResolver,
        config: ParseConfig,
    ) -> Result<Self> {
        let bytes = resolver
            .resolve(entry)
            .ok_or_else(|| Error::MissingFile(entry.to_string()))?;
        Self::from_lines(session::decode_lines(bytes), entry, resolver, config)
    }

    fn from_lines(
        lines: Vec<String>,
        entry_name: &str,
        resolver: &dyn LibraryResolver,
        config: ParseConfig,
    ) -> Result<Self> {
        let mut session = session::ParseSession::new(config, resolver);
        session.load_color_table()?;

        let document = mpd::split_document(lines, &normalize_name(entry_name));
        let root_name = document.root_name.clone();
        session.register_mpd(document);

        let root: Arc<SourceFile> = parser::parse_file(&mut session, &root_name)
            .ok_or_else(|| Error::MissingFile(root_name.clone()))?;

        Ok(builder::build_scene(session, root))
    }
}
