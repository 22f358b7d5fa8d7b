//! Parse session state
//!
//! Every cache and accumulator of one run — parsed files, MPD
//! sub-documents, composed geometry, the color table, the group-id
//! registry, cameras, diagnostics, counters — is owned by one
//! [`ParseSession`], passed by reference through all recursive calls. A
//! fresh session per run; dropping it is the reset. Nothing is implicitly
//! shared between runs.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::builder::GeometryKey;
use crate::config::ParseConfig;
use crate::error::{Error, Result};
use crate::model::{Camera, ColorTable, Geometry, SourceFile};
use crate::mpd::MpdDocument;
use crate::resolver::{LibraryResolver, normalize_name};

/// Non-fatal findings of one run.
///
/// A missing referenced file, a malformed line, or a cyclic reference kills
/// only the construct it belongs to; the run continues and the findings are
/// collected here. No partial geometry is ever attributed to a failed
/// construct.
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Referenced files the resolver could not find
    pub missing_files: Vec<String>,
    /// Count of rejected lines
    pub malformed_lines: usize,
    /// Files whose reference chains loop back on themselves
    pub cyclic_references: Vec<String>,
    /// `PRINT`/`WRITE` passthrough and other surfaced messages
    pub messages: Vec<String>,
}

impl Diagnostics {
    /// Number of distinct missing-file reports.
    pub fn missing_file_count(&self) -> usize {
        self.missing_files.len()
    }

    /// True when the run produced no findings at all.
    pub fn is_clean(&self) -> bool {
        self.missing_files.is_empty()
            && self.malformed_lines == 0
            && self.cyclic_references.is_empty()
    }
}

/// Cache-traffic counters of one run.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionStats {
    /// Files actually parsed (cache misses)
    pub files_parsed: usize,
    /// File lookups answered from the cache
    pub file_cache_hits: usize,
    /// Geometry compositions actually performed (cache misses)
    pub geometry_composed: usize,
    /// Instance lookups answered from the geometry cache
    pub geometry_cache_hits: usize,
}

/// State owned by one parse run.
pub struct ParseSession<'r> {
    /// Configuration of this run.
    pub config: ParseConfig,
    resolver: &'r dyn LibraryResolver,
    mpd_files: HashMap<String, Vec<String>>,
    pub(crate) files: HashMap<String, Arc<SourceFile>>,
    pub(crate) in_progress: HashSet<String>,
    pub(crate) geometry_cache: HashMap<GeometryKey, Arc<Geometry>>,
    /// The global color palette.
    pub colors: ColorTable,
    /// Group-id → group-name registry fed by `GROUP_DEF` commands.
    pub group_names: HashMap<String, String>,
    /// Cameras in the order their terminating name fields were consumed.
    pub cameras: Vec<Camera>,
    /// Findings of this run.
    pub diagnostics: Diagnostics,
    /// Cache-traffic counters of this run.
    pub stats: SessionStats,
}

impl<'r> ParseSession<'r> {
    /// Create a fresh session over a resolver.
    pub fn new(config: ParseConfig, resolver: &'r dyn LibraryResolver) -> Self {
        Self {
            config,
            resolver,
            mpd_files: HashMap::new(),
            files: HashMap::new(),
            in_progress: HashSet::new(),
            geometry_cache: HashMap::new(),
            colors: ColorTable::new(),
            group_names: HashMap::new(),
            cameras: Vec::new(),
            diagnostics: Diagnostics::default(),
            stats: SessionStats::default(),
        }
    }

    /// Register the sub-documents of a split MPD archive. They are consulted
    /// before the resolver for every later lookup.
    pub fn register_mpd(&mut self, document: MpdDocument) {
        for (name, lines) in document.files {
            self.mpd_files.insert(name, lines);
        }
    }

    /// Read the lines of a logical file: MPD sub-documents first, then the
    /// library resolver. `None` means the name cannot be resolved.
    pub(crate) fn read_file(&mut self, filename: &str) -> Option<Vec<String>> {
        let normalized = normalize_name(filename);
        if let Some(lines) = self.mpd_files.get(&normalized) {
            return Some(lines.clone());
        }
        self.resolver.resolve(filename).map(decode_lines)
    }

    /// Whether a logical name resolves at all. Used to probe for logo
    /// variants before committing to a substitution.
    pub(crate) fn can_resolve(&self, filename: &str) -> bool {
        self.mpd_files.contains_key(&normalize_name(filename))
            || self.resolver.resolve(filename).is_some()
    }

    /// Load the color table selected by the configuration.
    ///
    /// The table document is parsed through the ordinary file path, so its
    /// `!COLOUR` lines land in [`ParseSession::colors`]. A missing table is
    /// fatal to the run.
    pub fn load_color_table(&mut self) -> Result<()> {
        let name = self.config.color_table_name();
        if crate::parser::parse_file(self, name).is_none() {
            return Err(Error::MissingFile(name.to_string()));
        }
        log::debug!("loaded {} colors from {}", self.colors.len(), name);
        Ok(())
    }
}

/// Decode file bytes into lines. LDraw library files predate UTF-8 and may
/// carry stray high bytes; decoding is lossy rather than failing.
pub(crate) fn decode_lines(bytes: Vec<u8>) -> Vec<String> {
    String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect()
}
