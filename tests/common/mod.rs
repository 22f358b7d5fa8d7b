//! Shared fixtures: an in-memory part library with a minimal color table.

// not every test crate uses every fixture
#![allow(dead_code)]

use libldraw::{MemoryResolver, ParseConfig, Scene};

/// A cut-down `LDConfig.ldr` with the codes the tests use.
pub const LDCONFIG: &str = "\
0 LDraw.org Configuration File
0 Name: LDConfig.ldr
0 !LDRAW_ORG Configuration UPDATE 2023-06-06
0 !COLOUR Black CODE 0 VALUE #1B2A34 EDGE #2B4354
0 !COLOUR Blue CODE 1 VALUE #1E5AA8 EDGE #333333
0 !COLOUR Green CODE 2 VALUE #00852B EDGE #333333
0 !COLOUR Red CODE 4 VALUE #B40000 EDGE #333333
0 !COLOUR Main_Colour CODE 16 VALUE #FFFF80 EDGE #333333
0 !COLOUR Edge_Colour CODE 24 VALUE #7F7F7F EDGE #333333
0 !COLOUR Trans_Clear CODE 47 VALUE #FCFCFC EDGE #C3C3C3 ALPHA 128
0 !COLOUR Chrome_Silver CODE 383 VALUE #CECECE EDGE #9C9C9C CHROME
";

/// Alternate table: Red deliberately differs so the toggle is observable.
pub const LDCFGALT: &str = "\
0 LDraw.org Alternate Configuration File
0 Name: LDCfgalt.ldr
0 !COLOUR Red CODE 4 VALUE #C40026 EDGE #333333
0 !COLOUR Main_Colour CODE 16 VALUE #FFFF80 EDGE #333333
";

/// A simple brick part: one quad face and one outline edge.
pub const BRICK: &str = "\
0 Brick 2 x 4
0 Name: 3001.dat
0 !LDRAW_ORG Part UPDATE 2004-03
2 24 4 0 2 -4 0 2
4 16 4 0 2 -4 0 2 -4 0 -2 4 0 -2
";

/// A subpart referenced by composite parts.
pub const BRICK_STUD_GROUP: &str = "\
0 Brick 2 x 4 Stud Group
0 Name: s/3001s01.dat
0 !LDRAW_ORG Subpart
3 16 0 0 0 1 0 0 0 0 1
";

/// Build a resolver holding the color tables plus the given files.
pub fn resolver_with(files: &[(&str, &str)]) -> MemoryResolver {
    let mut resolver = MemoryResolver::new();
    resolver.insert("LDConfig.ldr", LDCONFIG);
    resolver.insert("LDCfgalt.ldr", LDCFGALT);
    for (name, content) in files {
        resolver.insert(name, *content);
    }
    resolver
}

/// Load `entry` against a library of `files` with the default configuration.
pub fn load(entry: &str, files: &[(&str, &str)]) -> Scene {
    load_with(entry, files, ParseConfig::new())
}

/// Load `entry` against a library of `files` with a custom configuration.
pub fn load_with(entry: &str, files: &[(&str, &str)], config: ParseConfig) -> Scene {
    Scene::from_resolver(entry, &resolver_with(files), config).expect("scene should load")
}
