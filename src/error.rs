//! Error types for LDraw parsing
//!
//! All errors carry a bracketed error code for categorization:
//!
//! - **E1xxx**: I/O and file resolution errors
//! - **E2xxx**: Line grammar errors
//! - **E3xxx**: Structural errors
//!
//! ## Error Codes
//!
//! - `E1001`: I/O error reading a file
//! - `E1002`: Required file could not be resolved (entry file or color table)
//! - `E2001`: Malformed line (wrong field count or unusable fields)
//! - `E2002`: Numeric parse error in a geometry or meta field
//! - `E3001`: Cyclic subfile reference
//!
//! Missing *referenced* files and malformed lines encountered mid-parse are
//! recovered at the file boundary and surfaced through
//! [`Diagnostics`](crate::Diagnostics) rather than as `Err` values; the
//! variants here are the fatal paths.

use std::io;
use thiserror::Error;

/// Result type for LDraw operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when loading LDraw documents
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading a file
    ///
    /// **Error Code**: E1001
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required file could not be resolved against the library search roots
    ///
    /// **Error Code**: E1002
    ///
    /// Raised only for files whose absence is fatal to the run: the entry
    /// file itself and the color table document. A missing subfile reference
    /// is a diagnostic instead.
    #[error("[E1002] missing required file: {0}")]
    MissingFile(String),

    /// A line did not match the LDraw grammar
    ///
    /// **Error Code**: E2001
    ///
    /// **Common Causes**:
    /// - Too few fields for the line type
    /// - An unrecognized line-type code
    #[error("[E2001] malformed line: {0}")]
    MalformedLine(String),

    /// Parse error for numeric values
    ///
    /// **Error Code**: E2002
    #[error("[E2002] parse error: {0}")]
    ParseError(String),

    /// Cyclic subfile reference
    ///
    /// **Error Code**: E3001
    ///
    /// A file directly or transitively references itself. The offending
    /// branch is abandoned and recorded; no geometry is fabricated for it.
    #[error("[E3001] cyclic reference involving '{0}'")]
    CyclicReference(String),
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Self {
        Error::ParseError(format!("failed to parse floating-point number: {}", err))
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::ParseError(format!("failed to parse integer: {}", err))
    }
}

impl Error {
    /// Create a ParseError with context about what was being parsed
    ///
    /// # Arguments
    /// * `field_name` - The field being parsed (e.g. "transform element")
    /// * `value` - The value that failed to parse
    pub fn parse_error_with_context(field_name: &str, value: &str) -> Self {
        Error::ParseError(format!("failed to parse {}: got '{}'", field_name, value))
    }

    /// Create a MalformedLine error naming the offending line
    pub fn malformed_line(line: &str, reason: &str) -> Self {
        Error::MalformedLine(format!("{} in '{}'", reason, line.trim()))
    }
}
