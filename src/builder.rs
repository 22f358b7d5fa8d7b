//! Node tree building and geometry instancing
//!
//! A depth-first traversal from the root file resolves every child
//! reference into placed, composed geometry. Model-classified files are
//! pure containers; the first non-model file on a branch becomes a
//! *top-level part*, the unit of composition and caching. A part
//! instanced N times under one [`GeometryKey`] is composed exactly once —
//! repeat instantiations reuse the cached `Arc<Geometry>` wholesale,
//! without re-traversal.

use std::sync::Arc;

use nalgebra::Matrix4;

use crate::config::{ParseConfig, Resolution, SmoothType};
use crate::mesh_ops;
use crate::model::{
    COLOR_EDGE, COLOR_INHERIT, Camera, ChildRef, ColorTable, FaceInfo, Geometry, MetaCommand,
    SourceFile,
};
use crate::session::{Diagnostics, ParseSession, SessionStats};
use crate::special_bricks;

/// Instance cache key: the deterministic identity of one composed geometry.
///
/// Two instantiations share composed geometry exactly when their keys are
/// equal; every configuration option that changes composition output is a
/// field here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeometryKey {
    /// Primitive resolution variant
    pub resolution: Resolution,
    /// Effective instance color the part was composed under
    pub color: u32,
    /// Logo choice, when logo display is enabled
    pub logo: Option<String>,
    /// Coincident-vertex welding enabled
    pub remove_doubles: bool,
    /// Smoothing strategy recorded for the renderer
    pub smooth: SmoothType,
    /// Alternate color table in use
    pub alt_colors: bool,
    /// Subsurface material toggle
    pub subsurface: bool,
    /// Composed under the edge-color marker
    pub edge_color: bool,
    /// Logical filename of the part
    pub filename: String,
}

impl GeometryKey {
    fn for_instance(config: &ParseConfig, color: u32, filename: &str) -> Self {
        Self {
            resolution: config.resolution,
            color,
            logo: config.display_logo.then(|| config.chosen_logo.clone()),
            remove_doubles: config.remove_doubles,
            smooth: config.smooth_type,
            alt_colors: config.use_alt_colors,
            subsurface: config.add_subsurface,
            edge_color: color == COLOR_EDGE,
            filename: filename.to_string(),
        }
    }
}

/// An event of the meta stream, in document order.
///
/// The stream carries everything an external renderer or animation layer
/// needs to segment the part list: step boundaries with their frame
/// numbers, group boundaries, and save/clear markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaEvent {
    /// Build step boundary
    Step {
        /// 1-based step index
        index: usize,
        /// Frame the step becomes visible at
        frame: i64,
    },
    /// Save marker
    Save {
        /// Frame of the marker
        frame: i64,
    },
    /// Clear marker
    Clear {
        /// Frame of the marker
        frame: i64,
    },
    /// A named group opened
    GroupBegin {
        /// Group name
        name: String,
    },
    /// The active group closed
    GroupEnd {
        /// Name of the group that closed, when one was active
        name: Option<String>,
    },
}

/// One placed top-level part.
#[derive(Debug, Clone)]
pub struct PartInstance {
    /// The part's source file
    pub file: Arc<SourceFile>,
    /// World transform of this placement
    pub transform: Matrix4<f64>,
    /// Effective color code
    pub color: u32,
    /// Composed geometry, shared between identical instantiations
    pub geometry: Arc<Geometry>,
    /// Step index this part appears in
    pub step: usize,
    /// Active group name at this placement
    pub group: Option<String>,
}

/// The fully resolved output of one run.
#[derive(Debug)]
pub struct Scene {
    /// Node tree rooted at the entry file
    pub root: Arc<SourceFile>,
    /// Placed top-level parts, in document order
    pub parts: Vec<PartInstance>,
    /// Cameras, in the order their definitions completed
    pub cameras: Vec<Camera>,
    /// Meta-event stream
    pub events: Vec<MetaEvent>,
    /// The loaded color palette
    pub colors: ColorTable,
    /// Non-fatal findings of the run
    pub diagnostics: Diagnostics,
    /// Cache-traffic counters of the run
    pub stats: SessionStats,
}

/// Build the scene for a parsed root file, consuming the session.
pub(crate) fn build_scene(mut session: ParseSession, root: Arc<SourceFile>) -> Scene {
    let frame = step_frame(&session.config, 0);
    let mut builder = SceneBuilder {
        session: &mut session,
        parts: Vec::new(),
        events: Vec::new(),
        step: 0,
        frame,
        group: None,
        end_group_after_next: false,
    };

    if root.classification.is_model() {
        builder.walk_container(&root, &Matrix4::identity(), COLOR_INHERIT);
    } else {
        builder.instantiate_part(&root, &Matrix4::identity(), COLOR_INHERIT);
    }

    let SceneBuilder { parts, events, .. } = builder;
    Scene {
        root,
        parts,
        events,
        cameras: std::mem::take(&mut session.cameras),
        colors: std::mem::take(&mut session.colors),
        diagnostics: std::mem::take(&mut session.diagnostics),
        stats: session.stats,
    }
}

struct SceneBuilder<'s, 'r> {
    session: &'s mut ParseSession<'r>,
    parts: Vec<PartInstance>,
    events: Vec<MetaEvent>,
    step: usize,
    frame: i64,
    group: Option<String>,
    end_group_after_next: bool,
}

impl SceneBuilder<'_, '_> {
    /// Walk a model scope: metas drive traversal state, model children
    /// nest, anything else becomes a top-level part.
    fn walk_container(&mut self, file: &Arc<SourceFile>, matrix: &Matrix4<f64>, color: u32) {
        for child in &file.children {
            match child {
                ChildRef::Meta(meta) => self.handle_meta(meta),
                ChildRef::Subfile(inst) => {
                    if self.skips(&inst.file) {
                        continue;
                    }
                    let color = effective_color(inst.color, color);
                    let matrix = matrix * inst.transform;
                    if inst.file.classification.is_model() {
                        self.walk_container(&inst.file, &matrix, color);
                    } else {
                        self.instantiate_part(&inst.file, &matrix, color);
                    }
                }
            }
        }
    }

    /// Place one top-level part, composing its geometry on the first
    /// encounter of its key and reusing the cached result afterwards.
    fn instantiate_part(&mut self, file: &Arc<SourceFile>, world: &Matrix4<f64>, color: u32) {
        let key = GeometryKey::for_instance(&self.session.config, color, &file.filename);

        let geometry = match self.session.geometry_cache.get(&key).cloned() {
            Some(geometry) => {
                self.session.stats.geometry_cache_hits += 1;
                log::trace!("geometry cache hit for '{}'", file.filename);
                geometry
            }
            None => {
                let mut composed = Geometry::new();
                // parts compose in their own space; the placement transform
                // lives on the instance
                self.compose(file, &Matrix4::identity(), color, &mut composed, false, false);
                if self.session.config.remove_doubles {
                    mesh_ops::weld_geometry(&mut composed, self.session.config.merge_distance);
                }
                let geometry = Arc::new(composed);
                self.session
                    .geometry_cache
                    .insert(key, geometry.clone());
                self.session.stats.geometry_composed += 1;
                geometry
            }
        };

        let group = if self.session.config.meta_group {
            self.take_group()
        } else {
            None
        };
        self.parts.push(PartInstance {
            file: file.clone(),
            transform: *world,
            color,
            geometry,
            step: self.step,
            group,
        });
    }

    /// Accumulate a file and its subtree into `acc` under `matrix`.
    fn compose(
        &mut self,
        file: &Arc<SourceFile>,
        matrix: &Matrix4<f64>,
        color: u32,
        acc: &mut Geometry,
        is_stud: bool,
        is_edge_logo: bool,
    ) {
        let is_stud = is_stud || special_bricks::is_stud(&file.name);
        let is_edge_logo = is_edge_logo || special_bricks::is_edge_logo(&file.name);

        append_geometry(
            acc,
            &file.geometry,
            matrix,
            color,
            is_stud,
            is_edge_logo,
            self.session.config.display_logo,
        );

        for child in &file.children {
            match child {
                ChildRef::Meta(meta) => self.handle_meta(meta),
                ChildRef::Subfile(inst) => {
                    if self.skips(&inst.file) {
                        continue;
                    }
                    let color = effective_color(inst.color, color);
                    let matrix = matrix * inst.transform;
                    self.compose(&inst.file, &matrix, color, acc, is_stud, is_edge_logo);
                }
            }
        }
    }

    fn handle_meta(&mut self, meta: &MetaCommand) {
        match meta {
            MetaCommand::Step => {
                self.step += 1;
                if self.session.config.meta_step {
                    self.frame = step_frame(&self.session.config, self.step);
                    self.events.push(MetaEvent::Step {
                        index: self.step,
                        frame: self.frame,
                    });
                }
            }
            MetaCommand::Save => self.events.push(MetaEvent::Save { frame: self.frame }),
            MetaCommand::Clear => self.events.push(MetaEvent::Clear { frame: self.frame }),
            MetaCommand::GroupBegin { name } => {
                if self.session.config.meta_group {
                    self.group = Some(name.clone());
                    self.end_group_after_next = false;
                    self.events.push(MetaEvent::GroupBegin { name: name.clone() });
                }
            }
            MetaCommand::GroupEnd => {
                if self.session.config.meta_group {
                    self.events.push(MetaEvent::GroupEnd {
                        name: self.group.take(),
                    });
                }
            }
            // the id registry was fed during parsing
            MetaCommand::GroupDef { .. } => {}
            MetaCommand::GroupNext { id } => {
                if self.session.config.meta_group {
                    if let Some(name) = self.session.group_names.get(id) {
                        self.group = Some(name.clone());
                    } else {
                        log::warn!("GROUP_NXT references undefined group id '{}'", id);
                    }
                    // the next part ends the span either way
                    self.end_group_after_next = true;
                }
            }
            // face tagging happened during parsing
            MetaCommand::TexmapStart { .. }
            | MetaCommand::TexmapNext { .. }
            | MetaCommand::TexmapEnd => {}
        }
    }

    /// The group the next part joins; an id-indirect group covers exactly
    /// one part.
    fn take_group(&mut self) -> Option<String> {
        let group = self.group.clone();
        if self.end_group_after_next {
            self.group = None;
            self.end_group_after_next = false;
        }
        group
    }

    fn skips(&self, file: &SourceFile) -> bool {
        self.session.config.no_studs && file.name.starts_with("stud")
    }
}

fn effective_color(code: u32, inherited: u32) -> u32 {
    if code == COLOR_INHERIT { inherited } else { code }
}

fn step_frame(config: &ParseConfig, step: usize) -> i64 {
    config.starting_step_frame + config.frames_per_step * (step as i64 + 1)
}

/// Transform `local` by `matrix` and append it to `acc`, resolving face
/// colors against the instance color.
fn append_geometry(
    acc: &mut Geometry,
    local: &Geometry,
    matrix: &Matrix4<f64>,
    color: u32,
    is_stud: bool,
    is_edge_logo: bool,
    display_logo: bool,
) {
    let vertex_offset = acc.vertices.len();
    acc.vertices
        .extend(local.vertices.iter().map(|v| matrix.transform_point(v)));
    acc.faces
        .extend(local.faces.iter().map(|f| f.offset(vertex_offset)));
    acc.face_info
        .extend(local.face_info.iter().map(|i| resolve_face_info(i, color, is_stud)));

    // logo overlays contribute their outline only when logos are displayed
    if !is_edge_logo || display_logo {
        let edge_offset = acc.edge_vertices.len();
        acc.edge_vertices
            .extend(local.edge_vertices.iter().map(|v| matrix.transform_point(v)));
        acc.edges
            .extend(local.edges.iter().map(|[a, b]| [a + edge_offset, b + edge_offset]));
    }
}

/// Resolve one stored FaceInfo against the color of the instance being
/// composed: stored 16 inherits, stored or inherited 24 selects the edge
/// color, and stud geometry never takes directional grain.
fn resolve_face_info(info: &FaceInfo, instance_color: u32, is_stud: bool) -> FaceInfo {
    let stored = info.color;
    let use_edge_color = instance_color == COLOR_EDGE || stored == COLOR_EDGE;
    let color = if stored == COLOR_INHERIT || stored == COLOR_EDGE {
        instance_color
    } else {
        stored
    };
    FaceInfo {
        color,
        use_edge_color,
        grain_slope_allowed: !is_stud,
        texmap: info.texmap.clone(),
    }
}
