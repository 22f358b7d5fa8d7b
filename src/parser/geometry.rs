//! Geometry line parsing (types 1/2/3/4/5)

use std::sync::Arc;

use nalgebra::{Matrix4, Point3};

use crate::error::{Error, Result};
use crate::model::{Classification, ChildRef, FaceInfo, SubfileInstance, TexMap};
use crate::resolver::normalize_name;
use crate::session::ParseSession;
use crate::special_bricks;

use super::PendingFile;

/// Parse one geometry line into `file`.
///
/// `texmap` is the projection of the active texmap region, already filtered
/// by the caller to the geometry this configuration keeps.
pub(crate) fn parse_geometry_line(
    session: &mut ParseSession,
    file: &mut PendingFile,
    params: &[&str],
    line: &str,
    texmap: Option<Arc<TexMap>>,
) -> Result<()> {
    match params[0] {
        "1" => parse_subfile_ref(session, file, params, line),
        // conditional edges carry two control points we do not need
        "2" | "5" => parse_edge(file, params, line),
        "3" => parse_face(file, params, line, 3, texmap),
        "4" => parse_face(file, params, line, 4, texmap),
        other => unreachable!("line type {} is rejected by the tokenizer", other),
    }
}

/// Parse a color code field, decimal or `0x`-prefixed direct color.
pub(crate) fn parse_color_code(field: &str) -> Result<u32> {
    if let Some(hex) = field.strip_prefix("0x").or_else(|| field.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
            .map_err(|_| Error::parse_error_with_context("direct color code", field))
    } else {
        field
            .parse::<u32>()
            .map_err(|_| Error::parse_error_with_context("color code", field))
    }
}

fn parse_f64(field: &str, what: &str) -> Result<f64> {
    field
        .parse::<f64>()
        .map_err(|_| Error::parse_error_with_context(what, field))
}

fn parse_point(fields: &[&str]) -> Result<Point3<f64>> {
    Ok(Point3::new(
        parse_f64(fields[0], "vertex coordinate")?,
        parse_f64(fields[1], "vertex coordinate")?,
        parse_f64(fields[2], "vertex coordinate")?,
    ))
}

/// Type 1: `1 <color> x y z a b c d e f g h i <filename>`.
///
/// The filename is the remainder after the 14 fixed fields, so names with
/// embedded spaces resolve correctly.
fn parse_subfile_ref(
    session: &mut ParseSession,
    file: &mut PendingFile,
    params: &[&str],
    line: &str,
) -> Result<()> {
    if params.len() < 15 {
        return Err(Error::malformed_line(
            line,
            "subfile reference needs 14 fields and a filename",
        ));
    }
    let color = parse_color_code(params[1])?;
    let mut t = [0.0_f64; 12];
    for (slot, field) in t.iter_mut().zip(params[2..14].iter().copied()) {
        *slot = parse_f64(field, "transform element")?;
    }
    let (x, y, z) = (t[0], t[1], t[2]);
    let (a, b, c, d, e, f, g, h, i) = (t[3], t[4], t[5], t[6], t[7], t[8], t[9], t[10], t[11]);
    #[rustfmt::skip]
    let transform = Matrix4::new(
        a, b, c, x,
        d, e, f, y,
        g, h, i, z,
        0.0, 0.0, 0.0, 1.0,
    );

    let mut filename = normalize_name(params[14]);
    if session.config.display_logo {
        if let Some(variant) =
            special_bricks::logo_variant(&filename, &session.config.chosen_logo)
        {
            if session.can_resolve(&variant) {
                filename = variant;
            }
        }
    }

    // a missing or cyclic target was recorded by parse_file; the reference
    // contributes no child node and parsing continues
    let Some(child) = super::parse_file(session, &filename) else {
        return Ok(());
    };

    if file.classification.is_model() && child.classification.merges_into_parent() {
        file.classification = Classification::Part;
    }
    file.children.push(ChildRef::Subfile(SubfileInstance {
        file: child,
        transform,
        color,
    }));
    Ok(())
}

/// Type 2 (and 5, using the first two points): `2 <color> x1 y1 z1 x2 y2 z2`.
fn parse_edge(file: &mut PendingFile, params: &[&str], line: &str) -> Result<()> {
    if params.len() < 8 {
        return Err(Error::malformed_line(line, "edge needs two vertices"));
    }
    let a = parse_point(&params[2..5])?;
    let b = parse_point(&params[5..8])?;
    file.geometry.push_edge(a, b);
    reclassify_on_geometry(file);
    Ok(())
}

/// Types 3 and 4: `<type> <color>` followed by 3 or 4 vertices.
fn parse_face(
    file: &mut PendingFile,
    params: &[&str],
    line: &str,
    corners: usize,
    texmap: Option<Arc<TexMap>>,
) -> Result<()> {
    if params.len() < 2 + corners * 3 {
        return Err(Error::malformed_line(line, "face with too few coordinates"));
    }
    let color = parse_color_code(params[1])?;
    let mut points = Vec::with_capacity(corners);
    for corner in 0..corners {
        let base = 2 + corner * 3;
        points.push(parse_point(&params[base..base + 3])?);
    }

    let mut info = FaceInfo::new(color);
    info.texmap = texmap;
    file.geometry.push_face(&points, info);
    reclassify_on_geometry(file);
    Ok(())
}

/// A file tagged (or defaulting to) model that carries its own geometry is
/// really a part.
fn reclassify_on_geometry(file: &mut PendingFile) {
    if file.classification.is_model() {
        file.classification = Classification::Part;
    }
}
