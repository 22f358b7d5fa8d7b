//! Core LDraw document structures

use std::sync::Arc;

use nalgebra::{Matrix4, Point3};

use crate::model::texmap::TexMap;

/// Classification of a source file, from its `!LDRAW_ORG` tag.
///
/// Classification governs whether a file's geometry merges into its parent
/// (subparts, primitives) or stays a separate top-level object (parts,
/// shortcuts), and whether a file is a pure container (models).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Classification {
    /// A model: a container of parts, contributes no geometry of its own
    Model,
    /// A part: the unit of instancing and geometry composition
    Part,
    /// A subpart: merges into the containing part
    Subpart,
    /// A primitive: shared low-level geometry, merges like a subpart
    Primitive,
    /// A shortcut: a pre-combined assembly, treated like a part
    Shortcut,
    /// No recognized tag seen
    #[default]
    Unknown,
}

impl Classification {
    /// Map an `!LDRAW_ORG` tag to a classification.
    ///
    /// `Unofficial_`-prefixed variants normalize to their inner type, so
    /// `Unofficial_Part` classifies as [`Classification::Part`].
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.to_lowercase();
        let tag = tag.strip_prefix("unofficial_").unwrap_or(&tag);
        match tag {
            "model" => Classification::Model,
            "part" => Classification::Part,
            "subpart" => Classification::Subpart,
            "primitive" | "8_primitive" | "48_primitive" => Classification::Primitive,
            "shortcut" => Classification::Shortcut,
            _ => Classification::Unknown,
        }
    }

    /// Whether this file is a container of parts.
    ///
    /// Untagged files are treated as models: entry documents frequently
    /// carry no `!LDRAW_ORG` tag, and a file that turns out to hold
    /// geometry is reclassified to `Part` during parsing.
    pub fn is_model(&self) -> bool {
        matches!(self, Classification::Model | Classification::Unknown)
    }

    /// Whether geometry of this file merges into the containing part.
    pub fn merges_into_parent(&self) -> bool {
        matches!(self, Classification::Subpart | Classification::Primitive)
    }
}

/// A face of 3 or 4 vertex indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Face {
    /// Triangle of vertex indices
    Triangle([usize; 3]),
    /// Quadrilateral of vertex indices
    Quad([usize; 4]),
}

impl Face {
    /// The vertex indices of this face.
    pub fn indices(&self) -> &[usize] {
        match self {
            Face::Triangle(v) => v,
            Face::Quad(v) => v,
        }
    }

    /// Rebuild the face with every index shifted by `offset`.
    pub fn offset(&self, offset: usize) -> Face {
        match self {
            Face::Triangle([a, b, c]) => Face::Triangle([a + offset, b + offset, c + offset]),
            Face::Quad([a, b, c, d]) => {
                Face::Quad([a + offset, b + offset, c + offset, d + offset])
            }
        }
    }
}

/// Per-face metadata, parallel to [`Geometry::faces`].
///
/// During parsing `color` holds the raw line color, which may be the
/// inherit marker 16 or the edge marker 24; composition resolves both, so
/// neither marker survives into a [`Scene`](crate::Scene).
#[derive(Debug, Clone)]
pub struct FaceInfo {
    /// Face color code (resolved in composed output)
    pub color: u32,
    /// Render with the color's edge color
    pub use_edge_color: bool,
    /// Directional grain/slope texturing may be applied
    pub grain_slope_allowed: bool,
    /// Texture projection for faces inside a texmap region
    pub texmap: Option<Arc<TexMap>>,
}

impl FaceInfo {
    /// Face info with the given color and no special flags.
    pub fn new(color: u32) -> Self {
        Self {
            color,
            use_edge_color: false,
            grain_slope_allowed: true,
            texmap: None,
        }
    }
}

/// Polygon geometry of one file or one composed part.
///
/// Face vertices and edge vertices are kept apart: edges form the separate
/// outline mesh LDraw models carry alongside their faces.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    /// Face vertex positions
    pub vertices: Vec<Point3<f64>>,
    /// Faces of 3 or 4 indices into `vertices`
    pub faces: Vec<Face>,
    /// Per-face metadata, always the same length as `faces`
    pub face_info: Vec<FaceInfo>,
    /// Edge vertex positions
    pub edge_vertices: Vec<Point3<f64>>,
    /// Edge segments as index pairs into `edge_vertices`
    pub edges: Vec<[usize; 2]>,
}

impl Geometry {
    /// Create an empty geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one edge segment.
    pub fn push_edge(&mut self, a: Point3<f64>, b: Point3<f64>) {
        let base = self.edge_vertices.len();
        self.edge_vertices.push(a);
        self.edge_vertices.push(b);
        self.edges.push([base, base + 1]);
    }

    /// Append one face with its metadata.
    pub fn push_face(&mut self, corners: &[Point3<f64>], info: FaceInfo) {
        let base = self.vertices.len();
        self.vertices.extend_from_slice(corners);
        let face = match corners.len() {
            3 => Face::Triangle([base, base + 1, base + 2]),
            4 => Face::Quad([base, base + 1, base + 2, base + 3]),
            n => unreachable!("face arity {} is rejected during tokenization", n),
        };
        self.faces.push(face);
        self.face_info.push(info);
    }

    /// True when there are no faces and no edges.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.edges.is_empty()
    }
}

/// A subfile instancing: a shared file under a transform and color.
#[derive(Debug, Clone)]
pub struct SubfileInstance {
    /// The referenced file
    pub file: Arc<SourceFile>,
    /// Local affine transform of this instance
    pub transform: Matrix4<f64>,
    /// Color code; 16 inherits the parent color
    pub color: u32,
}

/// A meta command threaded through the child-node stream.
///
/// Meta commands are interpreted in document order during tree building;
/// they mutate traversal state and emit events but never touch geometry.
#[derive(Debug, Clone)]
pub enum MetaCommand {
    /// Build step boundary
    Step,
    /// Save marker
    Save,
    /// Clear marker
    Clear,
    /// Name-based group opening (`!LEOCAD GROUP BEGIN`)
    GroupBegin {
        /// Group display name
        name: String,
    },
    /// Name-based group closing (`!LEOCAD GROUP END`)
    GroupEnd,
    /// Id-indirect group definition (`!LDCAD GROUP_DEF`)
    GroupDef {
        /// Group id referenced by later `GROUP_NXT` commands
        id: String,
        /// Group display name
        name: String,
    },
    /// Id-indirect group application to the next part (`!LDCAD GROUP_NXT`)
    GroupNext {
        /// Group id, resolved through the session registry
        id: String,
    },
    /// Texture-mapping region opening
    TexmapStart {
        /// Projection of the region
        texmap: Arc<TexMap>,
    },
    /// Single-line texture-mapping region
    TexmapNext {
        /// Projection of the region
        texmap: Arc<TexMap>,
    },
    /// Texture-mapping region closing
    TexmapEnd,
}

/// A child node of a source file: either a subfile instancing or a meta
/// command. Order is significant; the list is a linear script interpreted
/// left to right.
#[derive(Debug, Clone)]
pub enum ChildRef {
    /// A subfile instanced under a transform and color
    Subfile(SubfileInstance),
    /// A meta command
    Meta(MetaCommand),
}

/// One parsed source file.
///
/// Parsed at most once per logical name, cached on the session, and shared
/// immutably afterwards.
#[derive(Debug)]
pub struct SourceFile {
    /// Normalized logical filename this file was requested under
    pub filename: String,
    /// Display name from the `Name:` tag, or the path basename
    pub name: String,
    /// Classification from the `!LDRAW_ORG` tag (possibly reclassified)
    pub classification: Classification,
    /// Geometry local to this file
    pub geometry: Geometry,
    /// Ordered child nodes
    pub children: Vec<ChildRef>,
}

impl SourceFile {
    /// The path basename of the logical filename.
    pub fn basename(&self) -> &str {
        self.filename
            .rsplit('/')
            .next()
            .unwrap_or(&self.filename)
    }
}
