//! File parsing
//!
//! One file is parsed in a single left-to-right pass over its lines,
//! producing local geometry and an ordered child-node list. Subfile
//! references re-enter [`parse_file`] through the session cache, so the
//! whole reference graph is resolved by the time the entry file's parse
//! returns.
//!
//! The pass is context sensitive: meta commands change how subsequent
//! lines are read. The texture-mapping state is an explicit machine with
//! states {inactive, started, fallback, next}; camera fields accumulate in
//! a pending record until a terminating name field arrives.

mod camera;
mod color;
mod geometry;

use std::sync::Arc;

use crate::error::Error;
use crate::model::{
    Camera, ChildRef, Classification, Geometry, MetaCommand, SourceFile, TexMap, TexMapMethod,
};
use crate::resolver::normalize_name;
use crate::session::ParseSession;
use crate::tokenizer::{parse_line, rest_after_fields};

/// Maximum fields any line type needs: a subfile reference has 14 fixed
/// fields plus the filename remainder.
const MAX_FIELDS: usize = 15;

/// Texture-mapping phase of the pass.
enum TexmapPhase {
    /// No region open
    Inactive,
    /// Between `START` and `FALLBACK`/`END`
    Started(Arc<TexMap>),
    /// Inside the non-textured replacement sub-region
    Fallback(Arc<TexMap>),
    /// Inside a single-line `NEXT` sub-region
    Next(Arc<TexMap>),
}

/// A file being parsed; becomes an immutable [`SourceFile`] when the pass
/// completes.
pub(crate) struct PendingFile {
    pub filename: String,
    pub name: String,
    pub classification: Classification,
    pub geometry: Geometry,
    pub children: Vec<ChildRef>,
}

impl PendingFile {
    fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            name: String::new(),
            classification: Classification::default(),
            geometry: Geometry::new(),
            children: Vec::new(),
        }
    }

    fn finish(mut self) -> SourceFile {
        if self.name.is_empty() {
            self.name = self
                .filename
                .rsplit('/')
                .next()
                .unwrap_or(&self.filename)
                .to_string();
        }
        SourceFile {
            filename: self.filename,
            name: self.name,
            classification: self.classification,
            geometry: self.geometry,
            children: self.children,
        }
    }
}

/// Parse a file by logical name, or fetch it from the session cache.
///
/// Returns `None` when the name cannot be resolved or closes a reference
/// cycle; both are recorded as diagnostics and the caller continues
/// without the branch.
pub(crate) fn parse_file(session: &mut ParseSession, filename: &str) -> Option<Arc<SourceFile>> {
    let normalized = normalize_name(filename);

    if let Some(file) = session.files.get(&normalized) {
        session.stats.file_cache_hits += 1;
        return Some(file.clone());
    }
    if session.in_progress.contains(&normalized) {
        log::warn!("{}", Error::CyclicReference(normalized.clone()));
        session.diagnostics.cyclic_references.push(normalized);
        return None;
    }
    // look up under the caller's spelling: the MPD map normalizes on its
    // own, and on-disk libraries may be case sensitive
    let Some(lines) = session.read_file(filename) else {
        log::warn!("missing '{}'", normalized);
        session.diagnostics.missing_files.push(normalized);
        return None;
    };

    session.in_progress.insert(normalized.clone());
    let file = parse_lines(session, &normalized, &lines);
    session.in_progress.remove(&normalized);

    let file = Arc::new(file);
    session.files.insert(normalized, file.clone());
    session.stats.files_parsed += 1;
    Some(file)
}

/// The single left-to-right pass over one file's lines.
fn parse_lines(session: &mut ParseSession, filename: &str, lines: &[String]) -> SourceFile {
    let mut file = PendingFile::new(filename);
    let mut phase = TexmapPhase::Inactive;
    let mut pending_camera: Option<Camera> = None;

    for line in lines {
        let Some(params) = parse_line(line, MAX_FIELDS) else {
            continue;
        };

        if params[0] == "0" {
            handle_meta_line(
                session,
                &mut file,
                &mut phase,
                &mut pending_camera,
                &params,
                line,
            );
            continue;
        }

        // plain geometry; the texmap phase decides whether the line is kept
        // and which projection tags it
        let keep = match &phase {
            TexmapPhase::Inactive => Some(None),
            // geometry ahead of FALLBACK is kept either way, tagged only
            // when texturing is on
            TexmapPhase::Started(t) | TexmapPhase::Next(t) => {
                Some(session.config.texmap.then(|| t.clone()))
            }
            // the fallback sub-region replaces textured geometry when
            // texturing is off, and is dropped entirely when it is on
            TexmapPhase::Fallback(_) => (!session.config.texmap).then_some(None),
        };
        if let Some(texmap) = keep {
            if let Err(err) = geometry::parse_geometry_line(session, &mut file, &params, line, texmap)
            {
                reject_line(session, line, err);
            }
            if matches!(phase, TexmapPhase::Next(_)) {
                end_texmap(&mut file, &mut phase);
            }
        }
    }

    file.finish()
}

/// Dispatch one `0` line by its meta keyword.
fn handle_meta_line(
    session: &mut ParseSession,
    file: &mut PendingFile,
    phase: &mut TexmapPhase,
    pending_camera: &mut Option<Camera>,
    params: &[&str],
    line: &str,
) {
    match params[1].to_lowercase().as_str() {
        "!colour" => match color::parse_colour_line(line) {
            Ok(color) => session.colors.insert(color),
            Err(err) => reject_line(session, line, err),
        },
        "!ldraw_org" => {
            if let Some(&tag) = params.get(2) {
                // an LCAD wrapper nests the real type one token further in
                let tag = if tag.eq_ignore_ascii_case("lcad") {
                    params.get(3).copied().unwrap_or(tag)
                } else {
                    tag
                };
                file.classification = Classification::from_tag(tag);
            }
        }
        "name:" => {
            file.name = rest_after_fields(line, 2).to_lowercase();
        }
        "step" => {
            if session.config.meta_step {
                file.children.push(ChildRef::Meta(MetaCommand::Step));
            }
            // a texmap region never spans a step
            end_texmap(file, phase);
        }
        "save" => {
            if session.config.meta_save {
                file.children.push(ChildRef::Meta(MetaCommand::Save));
            }
        }
        "clear" => {
            if session.config.meta_clear {
                file.children.push(ChildRef::Meta(MetaCommand::Clear));
            }
        }
        "print" | "write" => {
            if session.config.meta_print_write {
                let message = rest_after_fields(line, 2).to_string();
                log::info!("{}: {}", file.filename, message);
                session.diagnostics.messages.push(message);
            }
        }
        "!ldcad" => handle_ldcad(session, file, params, line),
        "!leocad" => handle_leocad(session, file, pending_camera, params, line),
        "!texmap" => {
            if matches!(*phase, TexmapPhase::Next(_)) {
                // a NEXT sub-region covers exactly the following geometry;
                // another texmap command ends it and is itself dropped
                end_texmap(file, phase);
                return;
            }
            handle_texmap(session, file, phase, params, line);
        }
        "!:" => {
            // pass-through geometry of a textured region
            if !session.config.texmap {
                return;
            }
            let (texmap, was_next) = match &*phase {
                TexmapPhase::Started(t) => (Some(t.clone()), false),
                TexmapPhase::Next(t) => (Some(t.clone()), true),
                _ => (None, false),
            };
            if let Some(texmap) = texmap {
                let rest = rest_after_fields(line, 2).to_string();
                if let Some(inner) = parse_line(&rest, MAX_FIELDS) {
                    if let Err(err) =
                        geometry::parse_geometry_line(session, file, &inner, &rest, Some(texmap))
                    {
                        reject_line(session, &rest, err);
                    }
                }
                if was_next {
                    end_texmap(file, phase);
                }
            }
        }
        _ => {
            // unrecognized meta keywords are ignored for forward
            // compatibility; they still terminate a NEXT sub-region
            if matches!(*phase, TexmapPhase::Next(_)) {
                end_texmap(file, phase);
            }
        }
    }
}

/// `!LDCAD GROUP_DEF` / `GROUP_NXT`, the id-indirect grouping dialect.
fn handle_ldcad(session: &mut ParseSession, file: &mut PendingFile, params: &[&str], line: &str) {
    let brackets = bracket_args(line);
    match params.get(2).map(|k| k.to_lowercase()).as_deref() {
        Some("group_def") => {
            // [<scope>] [<id>] [<pos>] [<name>] [...]
            match (bracket_value(&brackets, 1), bracket_value(&brackets, 3)) {
                (Some(id), Some(name)) => {
                    // first definition of an id wins
                    session
                        .group_names
                        .entry(id.to_string())
                        .or_insert_with(|| name.to_string());
                    file.children.push(ChildRef::Meta(MetaCommand::GroupDef {
                        id: id.to_string(),
                        name: name.to_string(),
                    }));
                }
                _ => reject_line(
                    session,
                    line,
                    Error::malformed_line(line, "GROUP_DEF without id/name"),
                ),
            }
        }
        Some("group_nxt") => match bracket_value(&brackets, 0) {
            Some(id) => {
                file.children
                    .push(ChildRef::Meta(MetaCommand::GroupNext { id: id.to_string() }));
            }
            None => reject_line(
                session,
                line,
                Error::malformed_line(line, "GROUP_NXT without id"),
            ),
        },
        _ => {}
    }
}

/// `!LEOCAD GROUP BEGIN/END` and `!LEOCAD CAMERA` fields.
fn handle_leocad(
    session: &mut ParseSession,
    file: &mut PendingFile,
    pending_camera: &mut Option<Camera>,
    params: &[&str],
    line: &str,
) {
    match params.get(2).map(|k| k.to_lowercase()).as_deref() {
        Some("group") => match params.get(3).map(|k| k.to_lowercase()).as_deref() {
            Some("begin") => {
                let name = rest_after_fields(line, 4);
                if !name.is_empty() {
                    file.children.push(ChildRef::Meta(MetaCommand::GroupBegin {
                        name: name.to_string(),
                    }));
                }
            }
            Some("end") => {
                file.children.push(ChildRef::Meta(MetaCommand::GroupEnd));
            }
            _ => {}
        },
        Some("camera") => {
            match camera::consume_camera_line(pending_camera, rest_after_fields(line, 3)) {
                Ok(Some(camera)) => session.cameras.push(camera),
                Ok(None) => {}
                Err(err) => reject_line(session, line, err),
            }
        }
        _ => {}
    }
}

/// `!TEXMAP` commands outside a NEXT sub-region.
fn handle_texmap(
    session: &mut ParseSession,
    file: &mut PendingFile,
    phase: &mut TexmapPhase,
    params: &[&str],
    line: &str,
) {
    match params.get(2).map(|k| k.to_lowercase()).as_deref() {
        Some(keyword @ ("start" | "next")) => {
            let texmap = match parse_texmap_projection(params, line) {
                Ok(texmap) => Arc::new(texmap),
                Err(err) => {
                    reject_line(session, line, err);
                    return;
                }
            };
            if keyword == "start" {
                file.children.push(ChildRef::Meta(MetaCommand::TexmapStart {
                    texmap: texmap.clone(),
                }));
                *phase = TexmapPhase::Started(texmap);
            } else {
                if matches!(*phase, TexmapPhase::Inactive) {
                    log::warn!("TEXMAP NEXT without START in '{}'", file.filename);
                    session
                        .diagnostics
                        .messages
                        .push(format!("TEXMAP NEXT without START in '{}'", file.filename));
                }
                file.children.push(ChildRef::Meta(MetaCommand::TexmapNext {
                    texmap: texmap.clone(),
                }));
                *phase = TexmapPhase::Next(texmap);
            }
        }
        Some("fallback") => {
            if let TexmapPhase::Started(texmap) = phase {
                let texmap = texmap.clone();
                *phase = TexmapPhase::Fallback(texmap);
            } else {
                log::warn!("TEXMAP FALLBACK outside a region in '{}'", file.filename);
            }
        }
        Some("end") => end_texmap(file, phase),
        _ => {}
    }
}

/// `START <method> <9 floats> <texture> [glossmap]` argument block.
fn parse_texmap_projection(params: &[&str], line: &str) -> crate::error::Result<TexMap> {
    if params.len() < 14 {
        return Err(Error::malformed_line(line, "texmap with too few fields"));
    }
    let method = TexMapMethod::from_keyword(params[3])?;
    let mut coords = [0.0_f64; 9];
    for (slot, field) in coords.iter_mut().zip(params[4..13].iter().copied()) {
        *slot = field
            .parse::<f64>()
            .map_err(|_| Error::parse_error_with_context("texmap point", field))?;
    }
    Ok(TexMap {
        method,
        points: [
            nalgebra::Point3::new(coords[0], coords[1], coords[2]),
            nalgebra::Point3::new(coords[3], coords[4], coords[5]),
            nalgebra::Point3::new(coords[6], coords[7], coords[8]),
        ],
        texture: params[13].to_string(),
        glossmap: params.get(14).map(|s| s.to_string()),
    })
}

/// Close the open texmap region, if any, emitting its end marker.
fn end_texmap(file: &mut PendingFile, phase: &mut TexmapPhase) {
    if !matches!(*phase, TexmapPhase::Inactive) {
        file.children.push(ChildRef::Meta(MetaCommand::TexmapEnd));
        *phase = TexmapPhase::Inactive;
    }
}

/// Record a rejected line: counted, logged, never fabricated into output.
fn reject_line(session: &mut ParseSession, line: &str, err: Error) {
    log::warn!("rejected line '{}': {}", line.trim(), err);
    session.diagnostics.malformed_lines += 1;
}

/// All `[key=value]` pairs of a `!LDCAD` line, in order.
fn bracket_args(line: &str) -> Vec<(String, String)> {
    let mut args = Vec::new();
    let mut rest = line;
    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']') else {
            break;
        };
        let body = &rest[open + 1..open + close];
        if let Some((key, value)) = body.split_once('=') {
            args.push((key.trim().to_string(), value.trim().to_string()));
        } else {
            args.push((body.trim().to_string(), String::new()));
        }
        rest = &rest[open + close + 1..];
    }
    args
}

/// The value of the `index`-th bracketed argument, if present and non-empty.
fn bracket_value<'a>(brackets: &'a [(String, String)], index: usize) -> Option<&'a str> {
    brackets
        .get(index)
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
}
