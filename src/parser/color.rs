//! `!COLOUR` definition parsing
//!
//! Color definitions follow the LDraw color definition language:
//!
//! ```text
//! 0 !COLOUR <name> CODE <c> VALUE <#rrggbb> EDGE <#rrggbb>
//!     [ALPHA <a>] [LUMINANCE <l>]
//!     [CHROME | PEARLESCENT | RUBBER | MATTE_METALLIC | METAL | MATERIAL <params>]
//! ```
//!
//! Unknown tokens are skipped for forward compatibility; a definition that
//! is missing its code, value, or edge color is rejected.

use crate::error::{Error, Result};
use crate::model::{Color, Finish, GlitterFinish, GrainSize, Rgb, SpeckleFinish};

/// Parse one `0 !COLOUR` line into a palette entry.
pub(crate) fn parse_colour_line(line: &str) -> Result<Color> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(Error::malformed_line(line, "colour definition too short"));
    }
    let name = tokens[2].to_string();

    let mut code = None;
    let mut value = None;
    let mut edge = None;
    let mut alpha = None;
    let mut luminance = None;
    let mut finish = None;

    let mut i = 3;
    while i < tokens.len() {
        match tokens[i].to_uppercase().as_str() {
            "CODE" => {
                code = Some(keyed_value(&tokens, i, line)?.parse::<u32>()?);
                i += 2;
            }
            "VALUE" => {
                value = Some(parse_rgb(keyed_value(&tokens, i, line)?)?);
                i += 2;
            }
            "EDGE" => {
                edge = Some(parse_rgb(keyed_value(&tokens, i, line)?)?);
                i += 2;
            }
            "ALPHA" => {
                alpha = Some(keyed_value(&tokens, i, line)?.parse::<u8>()?);
                i += 2;
            }
            "LUMINANCE" => {
                luminance = Some(keyed_value(&tokens, i, line)?.parse::<u8>()?);
                i += 2;
            }
            "CHROME" => {
                finish = Some(Finish::Chrome);
                i += 1;
            }
            "PEARLESCENT" => {
                finish = Some(Finish::Pearlescent);
                i += 1;
            }
            "RUBBER" => {
                finish = Some(Finish::Rubber);
                i += 1;
            }
            "MATTE_METALLIC" => {
                finish = Some(Finish::MatteMetallic);
                i += 1;
            }
            "METAL" => {
                finish = Some(Finish::Metal);
                i += 1;
            }
            "MATERIAL" => {
                finish = Some(parse_material(&tokens[i + 1..], line)?);
                break;
            }
            _ => i += 1,
        }
    }

    Ok(Color {
        code: code.ok_or_else(|| Error::malformed_line(line, "colour definition without CODE"))?,
        name,
        value: value
            .ok_or_else(|| Error::malformed_line(line, "colour definition without VALUE"))?,
        edge: edge.ok_or_else(|| Error::malformed_line(line, "colour definition without EDGE"))?,
        alpha,
        luminance,
        finish,
    })
}

/// Parse a `MATERIAL GLITTER ...` or `MATERIAL SPECKLE ...` tail.
fn parse_material(tokens: &[&str], line: &str) -> Result<Finish> {
    let kind = tokens
        .first()
        .ok_or_else(|| Error::malformed_line(line, "MATERIAL without a kind"))?;

    let mut value = None;
    let mut alpha = None;
    let mut luminance = None;
    let mut fraction = None;
    let mut vfraction = None;
    let mut size = None;
    let mut minsize = None;
    let mut maxsize = None;

    let mut i = 1;
    while i < tokens.len() {
        match tokens[i].to_uppercase().as_str() {
            "VALUE" => {
                value = Some(parse_rgb(keyed_value(tokens, i, line)?)?);
                i += 2;
            }
            "ALPHA" => {
                alpha = Some(keyed_value(tokens, i, line)?.parse::<u8>()?);
                i += 2;
            }
            "LUMINANCE" => {
                luminance = Some(keyed_value(tokens, i, line)?.parse::<u8>()?);
                i += 2;
            }
            "FRACTION" => {
                fraction = Some(keyed_value(tokens, i, line)?.parse::<f64>()?);
                i += 2;
            }
            "VFRACTION" => {
                vfraction = Some(keyed_value(tokens, i, line)?.parse::<f64>()?);
                i += 2;
            }
            "SIZE" => {
                size = Some(keyed_value(tokens, i, line)?.parse::<f64>()?);
                i += 2;
            }
            "MINSIZE" => {
                minsize = Some(keyed_value(tokens, i, line)?.parse::<f64>()?);
                i += 2;
            }
            "MAXSIZE" => {
                maxsize = Some(keyed_value(tokens, i, line)?.parse::<f64>()?);
                i += 2;
            }
            _ => i += 1,
        }
    }

    let grain = match (size, minsize, maxsize) {
        (Some(s), _, _) => GrainSize::Size(s),
        (None, Some(min), Some(max)) => GrainSize::MinMax { min, max },
        _ => return Err(Error::malformed_line(line, "material without grain size")),
    };
    let value =
        value.ok_or_else(|| Error::malformed_line(line, "material without VALUE"))?;
    let fraction =
        fraction.ok_or_else(|| Error::malformed_line(line, "material without FRACTION"))?;

    match kind.to_uppercase().as_str() {
        "GLITTER" => Ok(Finish::Glitter(GlitterFinish {
            value,
            alpha,
            luminance,
            fraction,
            vfraction: vfraction
                .ok_or_else(|| Error::malformed_line(line, "glitter without VFRACTION"))?,
            size: grain,
        })),
        "SPECKLE" => Ok(Finish::Speckle(SpeckleFinish {
            value,
            alpha,
            luminance,
            fraction,
            size: grain,
        })),
        other => Err(Error::ParseError(format!(
            "unknown material kind '{}'",
            other
        ))),
    }
}

/// The value token following a keyword at index `i`.
fn keyed_value<'a>(tokens: &[&'a str], i: usize, line: &str) -> Result<&'a str> {
    tokens
        .get(i + 1)
        .copied()
        .ok_or_else(|| Error::malformed_line(line, "keyword without a value"))
}

/// Parse a `#rrggbb` or `0xrrggbb` color value.
fn parse_rgb(field: &str) -> Result<Rgb> {
    let hex = field
        .strip_prefix('#')
        .or_else(|| field.strip_prefix("0x"))
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::parse_error_with_context("hex color value", field));
    }
    Ok(Rgb::new(
        u8::from_str_radix(&hex[0..2], 16)?,
        u8::from_str_radix(&hex[2..4], 16)?,
        u8::from_str_radix(&hex[4..6], 16)?,
    ))
}
