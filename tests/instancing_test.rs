//! Integration tests for the instance cache and color inheritance.

mod common;

use std::sync::Arc;

use common::{BRICK, BRICK_STUD_GROUP, load, load_with};
use libldraw::{COLOR_INHERIT, ParseConfig, Resolution};

const WALL: &str = "\
0 Wall
0 Name: wall.ldr
1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat
1 4 40 0 0 1 0 0 0 1 0 0 0 1 3001.dat
1 4 80 0 0 1 0 0 0 1 0 0 0 1 3001.dat
1 2 120 0 0 1 0 0 0 1 0 0 0 1 3001.dat
";

#[test]
fn test_file_parsed_once_per_logical_name() {
    let scene = load("wall.ldr", &[("wall.ldr", WALL), ("3001.dat", BRICK)]);

    // all four instances share the identical cached SourceFile
    for part in &scene.parts[1..] {
        assert!(Arc::ptr_eq(&scene.parts[0].file, &part.file));
    }
    // wall.ldr + 3001.dat + the color table
    assert_eq!(scene.stats.files_parsed, 3);
    assert_eq!(scene.stats.file_cache_hits, 3);
}

#[test]
fn test_identical_instances_composed_once() {
    let scene = load("wall.ldr", &[("wall.ldr", WALL), ("3001.dat", BRICK)]);

    // three red instances share one composed geometry; green gets its own
    assert_eq!(scene.stats.geometry_composed, 2);
    assert_eq!(scene.stats.geometry_cache_hits, 2);
    assert!(Arc::ptr_eq(&scene.parts[0].geometry, &scene.parts[1].geometry));
    assert!(Arc::ptr_eq(&scene.parts[0].geometry, &scene.parts[2].geometry));
    assert!(!Arc::ptr_eq(&scene.parts[0].geometry, &scene.parts[3].geometry));
}

#[test]
fn test_inherited_color_resolves_into_face_info() {
    let scene = load("wall.ldr", &[("wall.ldr", WALL), ("3001.dat", BRICK)]);

    // the brick's quad is stored with the inherit marker 16
    let red = &scene.parts[0];
    assert_eq!(red.geometry.face_info[0].color, 4);
    let green = &scene.parts[3];
    assert_eq!(green.geometry.face_info[0].color, 2);

    // the marker never survives composition
    for part in &scene.parts {
        for info in &part.geometry.face_info {
            assert_ne!(info.color, COLOR_INHERIT);
        }
    }
}

#[test]
fn test_nested_inherit_resolves_to_outermost_explicit_color() {
    // assembly passes 16 through; the outer instance's color 4 must win
    let assembly = "\
0 Name: assembly.ldr
0 !LDRAW_ORG Shortcut
1 16 0 0 0 1 0 0 0 1 0 0 0 1 s\\3001s01.dat
";
    let entry = "0 Name: top.ldr\n1 4 0 0 0 1 0 0 0 1 0 0 0 1 assembly.ldr\n";
    let scene = load(
        "top.ldr",
        &[
            ("top.ldr", entry),
            ("assembly.ldr", assembly),
            ("s/3001s01.dat", BRICK_STUD_GROUP),
        ],
    );

    assert_eq!(scene.parts.len(), 1);
    assert_eq!(scene.parts[0].geometry.face_info[0].color, 4);
}

#[test]
fn test_explicit_face_color_wins_over_inherited() {
    let flagged = "\
0 Name: flag.dat
0 !LDRAW_ORG Part
3 1 0 0 0 1 0 0 0 0 1
3 16 0 0 0 1 0 0 0 0 1
";
    let entry = "0 Name: top.ldr\n1 4 0 0 0 1 0 0 0 1 0 0 0 1 flag.dat\n";
    let scene = load("top.ldr", &[("top.ldr", entry), ("flag.dat", flagged)]);

    let info = &scene.parts[0].geometry.face_info;
    assert_eq!(info[0].color, 1);
    assert_eq!(info[1].color, 4);
}

#[test]
fn test_edge_color_marker_sets_flag() {
    let edged = "\
0 Name: edged.dat
0 !LDRAW_ORG Part
3 24 0 0 0 1 0 0 0 0 1
";
    let entry = "0 Name: top.ldr\n1 4 0 0 0 1 0 0 0 1 0 0 0 1 edged.dat\n";
    let scene = load("top.ldr", &[("top.ldr", entry), ("edged.dat", edged)]);

    let info = &scene.parts[0].geometry.face_info[0];
    assert!(info.use_edge_color);
    assert_eq!(info.color, 4);
}

#[test]
fn test_nested_subpart_transform_composes() {
    // subpart shifted 10 along x inside the part; instance shifted 5 more
    let part = "\
0 Name: shifted.dat
0 !LDRAW_ORG Part
1 16 10 0 0 1 0 0 0 1 0 0 0 1 s\\3001s01.dat
";
    let entry = "0 Name: top.ldr\n1 4 5 0 0 1 0 0 0 1 0 0 0 1 shifted.dat\n";
    let scene = load(
        "top.ldr",
        &[
            ("top.ldr", entry),
            ("shifted.dat", part),
            ("s/3001s01.dat", BRICK_STUD_GROUP),
        ],
    );

    let part = &scene.parts[0];
    // composed geometry lives in part space: the subpart offset is baked in
    assert_eq!(part.geometry.vertices[0].x, 10.0);
    // the instance placement stays on the transform
    assert_eq!(part.transform[(0, 3)], 5.0);
}

#[test]
fn test_resolution_participates_in_cache_key() {
    let scene = load_with(
        "wall.ldr",
        &[("wall.ldr", WALL), ("3001.dat", BRICK)],
        ParseConfig::new().with_resolution(Resolution::High),
    );
    // still composes per color, resolution is merely part of the key
    assert_eq!(scene.stats.geometry_composed, 2);
}

#[test]
fn test_logo_substitution_when_variant_resolves() {
    let part = "\
0 Name: plate.dat
0 !LDRAW_ORG Part
1 16 0 -4 0 1 0 0 0 1 0 0 0 1 stud.dat
";
    let stud = "\
0 Name: stud.dat
0 !LDRAW_ORG Primitive
3 16 0 0 0 1 0 0 0 0 1
";
    let stud_logo = "\
0 Name: stud-logo3.dat
0 !LDRAW_ORG Primitive
3 16 0 0 0 1 0 0 0 0 1
3 16 0 0 0 2 0 0 0 0 2
";
    let files = [
        ("top.ldr", "0 Name: top.ldr\n1 4 0 0 0 1 0 0 0 1 0 0 0 1 plate.dat\n"),
        ("plate.dat", part),
        ("stud.dat", stud),
        ("stud-logo3.dat", stud_logo),
    ];

    let plain = load("top.ldr", &files);
    assert_eq!(plain.parts[0].geometry.faces.len(), 1);

    let logoed = load_with(
        "top.ldr",
        &files,
        ParseConfig::new().with_display_logo("logo3"),
    );
    assert_eq!(logoed.parts[0].geometry.faces.len(), 2);

    // a missing variant falls back to the plain stud
    let fallback = load_with(
        "top.ldr",
        &files,
        ParseConfig::new().with_display_logo("logo5"),
    );
    assert_eq!(fallback.parts[0].geometry.faces.len(), 1);
}

#[test]
fn test_logo_outline_dropped_unless_displayed() {
    let part = "\
0 Name: marked.dat
0 !LDRAW_ORG Part
4 16 1 0 1 -1 0 1 -1 0 -1 1 0 -1
1 16 0 -4 0 1 0 0 0 1 0 0 0 1 logo.dat
";
    let logo = "\
0 Name: logo.dat
0 !LDRAW_ORG Primitive
2 24 0 0 0 1 0 0
";
    let files = [
        ("top.ldr", "0 Name: top.ldr\n1 4 0 0 0 1 0 0 0 1 0 0 0 1 marked.dat\n"),
        ("marked.dat", part),
        ("logo.dat", logo),
    ];

    let hidden = load("top.ldr", &files);
    assert_eq!(hidden.parts[0].geometry.edges.len(), 0);

    let displayed = load_with(
        "top.ldr",
        &files,
        ParseConfig::new().with_display_logo("logo3"),
    );
    assert_eq!(displayed.parts[0].geometry.edges.len(), 1);
}

#[test]
fn test_stud_suppression() {
    let studded = "\
0 Name: studded.dat
0 !LDRAW_ORG Part
4 16 1 0 1 -1 0 1 -1 0 -1 1 0 -1
1 16 0 -4 0 1 0 0 0 1 0 0 0 1 stud.dat
";
    let stud = "\
0 Stud
0 Name: stud.dat
0 !LDRAW_ORG Primitive
3 16 0 0 0 1 0 0 0 0 1
";
    let files = [("top.ldr", "0 Name: top.ldr\n1 4 0 0 0 1 0 0 0 1 0 0 0 1 studded.dat\n"),
        ("studded.dat", studded),
        ("stud.dat", stud)];

    let with_studs = load("top.ldr", &files);
    assert_eq!(with_studs.parts[0].geometry.faces.len(), 2);
    // the stud's top never takes directional grain
    assert!(!with_studs.parts[0].geometry.face_info[1].grain_slope_allowed);
    assert!(with_studs.parts[0].geometry.face_info[0].grain_slope_allowed);

    let without = load_with("top.ldr", &files, ParseConfig::new().without_studs());
    assert_eq!(without.parts[0].geometry.faces.len(), 1);
}
