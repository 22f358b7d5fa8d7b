//! Line tokenization for the LDraw grammar
//!
//! LDraw files are line oriented. Every line starts with a numeric type code
//! (0 meta, 1 subfile reference, 2 edge, 3 triangle, 4 quad, 5 conditional
//! edge) followed by whitespace-separated fields. Some trailing fields
//! (filenames, group names, camera names) may contain embedded spaces, so
//! the tokenizer caps the field count and leaves the untouched remainder of
//! the line in the final field.

/// Line-type code of an LDraw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineType {
    /// `0` — meta command or comment
    Meta,
    /// `1` — subfile reference under a transform and color
    SubfileRef,
    /// `2` — edge segment
    Edge,
    /// `3` — triangle
    Triangle,
    /// `4` — quadrilateral
    Quad,
    /// `5` — conditional edge, treated as an ordinary edge
    ConditionalEdge,
}

impl LineType {
    /// Map a leading field to a line type. Unrecognized codes return `None`.
    pub fn from_field(field: &str) -> Option<Self> {
        match field {
            "0" => Some(LineType::Meta),
            "1" => Some(LineType::SubfileRef),
            "2" => Some(LineType::Edge),
            "3" => Some(LineType::Triangle),
            "4" => Some(LineType::Quad),
            "5" => Some(LineType::ConditionalEdge),
            _ => None,
        }
    }
}

/// Split a line into at most `max_fields` whitespace-separated fields.
///
/// The final field is the trimmed remainder of the line, preserving any
/// internal spacing — this is what lets filenames and display names with
/// embedded spaces survive tokenization.
///
/// Returns `None` for lines that should be skipped without being an error:
/// blank lines, lines with fewer than two fields, and lines whose leading
/// field is not a recognized type code.
pub fn parse_line(line: &str, max_fields: usize) -> Option<Vec<&str>> {
    let mut fields = Vec::with_capacity(max_fields.min(16));
    let mut rest = line.trim();

    while fields.len() + 1 < max_fields {
        match rest.split_whitespace().next() {
            Some(field) => {
                fields.push(field);
                // `rest` is trimmed, so the field starts at index 0
                rest = rest[field.len()..].trim_start();
                if rest.is_empty() {
                    break;
                }
            }
            None => break,
        }
    }
    if !rest.is_empty() && fields.len() + 1 == max_fields {
        fields.push(rest.trim_end());
    }

    if fields.len() < 2 {
        return None;
    }
    LineType::from_field(fields[0])?;
    Some(fields)
}

/// The trimmed remainder of `line` after its first `n` whitespace-separated
/// fields. Internal spacing of the remainder is preserved.
pub fn rest_after_fields(line: &str, n: usize) -> &str {
    let mut rest = line.trim();
    for _ in 0..n {
        rest = rest
            .split_once(char::is_whitespace)
            .map(|(_, r)| r.trim_start())
            .unwrap_or("");
    }
    rest.trim_end()
}
