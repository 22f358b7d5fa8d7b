//! Reserved filenames with special handling
//!
//! A handful of library files are recognized by name: studs (whose circular
//! tops must not receive directional grain texturing, and which can carry an
//! embossed logo) and the logo overlays themselves.

/// Stud files eligible for logo-variant substitution.
const STUDS: &[&str] = &["stud.dat", "stud2.dat"];

/// Logo overlay files whose edge geometry is dropped unless logo display is
/// enabled.
const EDGE_LOGOS: &[&str] = &["logo.dat", "logo2.dat"];

/// Whether `filename` is a stud file (grain/slope texturing is suppressed
/// under it).
pub fn is_stud(filename: &str) -> bool {
    STUDS.contains(&filename)
}

/// Whether `filename` is a logo overlay file.
pub fn is_edge_logo(filename: &str) -> bool {
    EDGE_LOGOS.contains(&filename)
}

/// The logo-bearing variant name for a stud file, e.g.
/// `stud.dat` + `logo3` → `stud-logo3.dat`.
///
/// Returns `None` for files that are not studs.
pub fn logo_variant(filename: &str, chosen_logo: &str) -> Option<String> {
    if !is_stud(filename) {
        return None;
    }
    let (stem, ext) = filename.rsplit_once('.')?;
    Some(format!("{}-{}.{}", stem, chosen_logo, ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logo_variant() {
        assert_eq!(
            logo_variant("stud.dat", "logo3").as_deref(),
            Some("stud-logo3.dat")
        );
        assert_eq!(
            logo_variant("stud2.dat", "logo4").as_deref(),
            Some("stud2-logo4.dat")
        );
        assert_eq!(logo_variant("3001.dat", "logo3"), None);
    }

    #[test]
    fn test_stud_and_logo_tables() {
        assert!(is_stud("stud.dat"));
        assert!(!is_stud("stud3.dat"));
        assert!(is_edge_logo("logo2.dat"));
        assert!(!is_edge_logo("logo5.dat"));
    }
}
