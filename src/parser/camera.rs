//! `!LEOCAD CAMERA` field machine
//!
//! Camera commands can be grouped on one line (`FOV 30 ZNEAR 25 NAME main`)
//! or spread over several; fields accumulate into one pending record and
//! are consumed left to right until the line is exhausted. `NAME` takes the
//! rest of the line, finalizes the record, and is by definition the last
//! field.

use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};
use crate::model::Camera;

/// Consume the camera fields of one line.
///
/// `rest` is the line remainder after the `CAMERA` keyword. Returns the
/// finalized camera when the terminating `NAME` field was consumed;
/// otherwise the accumulated state stays in `pending` for following lines.
pub(crate) fn consume_camera_line(
    pending: &mut Option<Camera>,
    rest: &str,
) -> Result<Option<Camera>> {
    let camera = pending.get_or_insert_with(Camera::default);
    let mut cursor = rest.trim();

    while !cursor.is_empty() {
        let (token, after) = split_token(cursor);
        match token.to_uppercase().as_str() {
            "FOV" => {
                let (v, after) = take_float(after, "camera FOV")?;
                camera.fov = v;
                cursor = after;
            }
            "ZNEAR" => {
                let (v, after) = take_float(after, "camera ZNEAR")?;
                camera.z_near = v;
                cursor = after;
            }
            "ZFAR" => {
                let (v, after) = take_float(after, "camera ZFAR")?;
                camera.z_far = v;
                cursor = after;
            }
            "POSITION" => {
                let (v, after) = take_vec3(after, "camera POSITION")?;
                camera.position = Point3::from(v);
                cursor = after;
            }
            "TARGET_POSITION" => {
                let (v, after) = take_vec3(after, "camera TARGET_POSITION")?;
                camera.target_position = Point3::from(v);
                cursor = after;
            }
            "UP_VECTOR" => {
                let (v, after) = take_vec3(after, "camera UP_VECTOR")?;
                camera.up_vector = v;
                cursor = after;
            }
            "ORTHOGRAPHIC" => {
                camera.orthographic = true;
                cursor = after;
            }
            "HIDDEN" => {
                camera.hidden = true;
                cursor = after;
            }
            "NAME" => {
                camera.name = after.trim().to_string();
                return Ok(pending.take());
            }
            _ => cursor = after,
        }
    }
    Ok(None)
}

/// Split the first whitespace-separated token off `s`.
fn split_token(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim_start()),
        None => (s, ""),
    }
}

fn take_float<'a>(s: &'a str, what: &str) -> Result<(f64, &'a str)> {
    let (token, rest) = split_token(s);
    if token.is_empty() {
        return Err(Error::ParseError(format!("{} missing its value", what)));
    }
    let value = token
        .parse::<f64>()
        .map_err(|_| Error::parse_error_with_context(what, token))?;
    Ok((value, rest))
}

fn take_vec3<'a>(s: &'a str, what: &str) -> Result<(Vector3<f64>, &'a str)> {
    let (x, s) = take_float(s, what)?;
    let (y, s) = take_float(s, what)?;
    let (z, s) = take_float(s, what)?;
    Ok((Vector3::new(x, y, z), s))
}
