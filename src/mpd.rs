//! Multi-Part Document (MPD) splitting
//!
//! An MPD archive embeds several logical files in one document, delimited by
//! `0 FILE <name>` and `0 NOFILE` meta lines. Splitting happens before any
//! other parsing; the resulting sub-documents are consulted ahead of the
//! library resolver when a file is requested by name.

use std::collections::HashMap;

use crate::resolver::normalize_name;
use crate::tokenizer::{parse_line, rest_after_fields};

/// Result of splitting one document.
#[derive(Debug)]
pub struct MpdDocument {
    /// Logical name of the root sub-document (the first `FILE` line), or the
    /// caller-supplied name for single-file documents.
    pub root_name: String,
    /// Sub-document lines by normalized logical name. Single-file documents
    /// produce exactly one entry under the caller-supplied name.
    pub files: HashMap<String, Vec<String>>,
}

/// Split `lines` into named sub-documents.
///
/// If the first line is not a `0 FILE` meta the document is single-file and
/// comes back unchanged under `fallback_name`. Otherwise `FILE` flushes the
/// open sub-document and opens a new one, `NOFILE` closes the open
/// sub-document without opening another, and anything else appends to the
/// open sub-document — so trailing lines after a closing `NOFILE` are
/// dropped rather than attributed to the previous sub-document.
pub fn split_document(lines: Vec<String>, fallback_name: &str) -> MpdDocument {
    let is_mpd = lines
        .first()
        .map(|line| line.trim().to_lowercase().starts_with("0 f"))
        .unwrap_or(false);

    if !is_mpd {
        let root_name = normalize_name(fallback_name);
        let mut files = HashMap::new();
        files.insert(root_name.clone(), lines);
        return MpdDocument { root_name, files };
    }

    let mut files = HashMap::new();
    let mut root_name: Option<String> = None;
    let mut current: Option<(String, Vec<String>)> = None;

    for line in lines {
        let params = parse_line(&line, 9);

        let keyword = params
            .as_ref()
            .filter(|p| p[0] == "0")
            .map(|p| p[1].to_lowercase());

        match keyword.as_deref() {
            Some("file") => {
                if let Some((name, body)) = current.take() {
                    files.insert(name, body);
                }
                // the name is the remainder after "0 FILE", spaces included
                let name = normalize_name(rest_after_fields(&line, 2));
                if root_name.is_none() {
                    root_name = Some(name.clone());
                }
                current = Some((name, Vec::new()));
            }
            Some("nofile") => {
                if let Some((name, body)) = current.take() {
                    files.insert(name, body);
                }
            }
            _ => {
                if let Some((_, body)) = current.as_mut() {
                    body.push(line);
                }
            }
        }
    }
    if let Some((name, body)) = current.take() {
        files.insert(name, body);
    }

    let root_name = root_name.unwrap_or_else(|| normalize_name(fallback_name));
    MpdDocument { root_name, files }
}
