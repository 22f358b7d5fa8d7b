//! Integration tests for basic document parsing and error recovery.

mod common;

use common::{BRICK, BRICK_STUD_GROUP, load, load_with};
use libldraw::{Classification, ParseConfig};

const CAR: &str = "\
0 Car
0 Name: car.ldr
1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat
1 2 40 0 0 1 0 0 0 1 0 0 0 1 3001.dat
";

#[test]
fn test_simple_model_produces_parts() {
    let scene = load("car.ldr", &[("car.ldr", CAR), ("3001.dat", BRICK)]);

    assert_eq!(scene.root.name, "car.ldr");
    assert!(scene.root.classification.is_model());
    assert_eq!(scene.parts.len(), 2);
    assert_eq!(scene.parts[0].color, 4);
    assert_eq!(scene.parts[1].color, 2);
    assert!(scene.diagnostics.is_clean());

    // the placement transform carries the instance translation
    assert_eq!(scene.parts[1].transform[(0, 3)], 40.0);
}

#[test]
fn test_part_geometry_composed() {
    let scene = load("car.ldr", &[("car.ldr", CAR), ("3001.dat", BRICK)]);

    let geometry = &scene.parts[0].geometry;
    assert_eq!(geometry.faces.len(), 1);
    assert_eq!(geometry.face_info.len(), 1);
    assert_eq!(geometry.edges.len(), 1);
    assert_eq!(geometry.vertices.len(), 4);
}

#[test]
fn test_part_classification_from_org_tag() {
    let scene = load("car.ldr", &[("car.ldr", CAR), ("3001.dat", BRICK)]);
    assert_eq!(scene.parts[0].file.classification, Classification::Part);
    assert_eq!(scene.parts[0].file.name, "3001.dat");
}

#[test]
fn test_untagged_file_with_geometry_becomes_part() {
    let untagged = "0 Just a quad\n4 16 1 0 1 -1 0 1 -1 0 -1 1 0 -1\n";
    let entry = "0 Name: top.ldr\n1 4 0 0 0 1 0 0 0 1 0 0 0 1 quad.dat\n";
    let scene = load("top.ldr", &[("top.ldr", entry), ("quad.dat", untagged)]);

    assert_eq!(scene.parts.len(), 1);
    assert_eq!(scene.parts[0].file.classification, Classification::Part);
}

#[test]
fn test_model_with_subpart_reclassified_as_part() {
    // a file tagged Model that references a subpart is really a part
    let composite = "\
0 Name: odd.ldr
0 !LDRAW_ORG Model
1 16 0 0 0 1 0 0 0 1 0 0 0 1 s\\3001s01.dat
";
    let entry = "0 Name: top.ldr\n1 4 0 0 0 1 0 0 0 1 0 0 0 1 odd.ldr\n";
    let scene = load(
        "top.ldr",
        &[
            ("top.ldr", entry),
            ("odd.ldr", composite),
            ("s/3001s01.dat", BRICK_STUD_GROUP),
        ],
    );

    assert_eq!(scene.parts.len(), 1);
    assert_eq!(scene.parts[0].file.classification, Classification::Part);
    // the subpart's triangle merged into the part
    assert_eq!(scene.parts[0].geometry.faces.len(), 1);
}

#[test]
fn test_missing_reference_recorded_and_skipped() {
    let entry = "\
0 Name: top.ldr
1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat
1 4 0 0 0 1 0 0 0 1 0 0 0 1 nonexistent.dat
";
    let scene = load("top.ldr", &[("top.ldr", entry), ("3001.dat", BRICK)]);

    assert_eq!(scene.parts.len(), 1);
    assert_eq!(scene.diagnostics.missing_file_count(), 1);
    assert_eq!(scene.diagnostics.missing_files[0], "nonexistent.dat");
}

#[test]
fn test_malformed_face_line_rejected_without_crash() {
    let part = "\
0 Name: bad.dat
0 !LDRAW_ORG Part
3 16 0 0 0 1 0
3 16 0 0 0 1 0 0 0 0 1
3 16 0 0 zero 1 0 0 0 0 1
";
    let entry = "0 Name: top.ldr\n1 4 0 0 0 1 0 0 0 1 0 0 0 1 bad.dat\n";
    let scene = load("top.ldr", &[("top.ldr", entry), ("bad.dat", part)]);

    // only the well-formed triangle contributes a face
    assert_eq!(scene.parts[0].geometry.faces.len(), 1);
    assert_eq!(scene.diagnostics.malformed_lines, 2);
}

#[test]
fn test_unrecognized_meta_ignored() {
    let entry = "\
0 Name: top.ldr
0 !SOMEFUTURE extension data
0 ROTATION CENTER 0 0 0 1
1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat
";
    let scene = load("top.ldr", &[("top.ldr", entry), ("3001.dat", BRICK)]);
    assert_eq!(scene.parts.len(), 1);
    assert!(scene.diagnostics.is_clean());
}

#[test]
fn test_print_write_surfaced_as_messages() {
    let entry = "\
0 Name: top.ldr
0 PRINT assembling the frame
0 WRITE check alignment
1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat
";
    let scene = load_with(
        "top.ldr",
        &[("top.ldr", entry), ("3001.dat", BRICK)],
        ParseConfig::new().with_meta_print_write(),
    );

    assert_eq!(
        scene.diagnostics.messages,
        vec!["assembling the frame", "check alignment"]
    );
}

#[test]
fn test_filename_with_embedded_spaces_resolves() {
    let entry = "0 Name: top.ldr\n1 4 0 0 0 1 0 0 0 1 0 0 0 1 front left wheel.ldr\n";
    let wheel = "0 Name: front left wheel.ldr\n4 16 1 0 1 -1 0 1 -1 0 -1 1 0 -1\n";
    let scene = load(
        "top.ldr",
        &[("top.ldr", entry), ("front left wheel.ldr", wheel)],
    );

    assert_eq!(scene.parts.len(), 1);
    assert_eq!(scene.parts[0].file.filename, "front left wheel.ldr");
}

#[test]
fn test_cyclic_reference_terminates_with_diagnostic() {
    let a = "0 Name: a.ldr\n1 4 0 0 0 1 0 0 0 1 0 0 0 1 b.ldr\n";
    let b = "\
0 Name: b.ldr
3 16 0 0 0 1 0 0 0 0 1
1 4 0 0 0 1 0 0 0 1 0 0 0 1 a.ldr
";
    let scene = load("a.ldr", &[("a.ldr", a), ("b.ldr", b)]);

    assert_eq!(scene.diagnostics.cyclic_references, vec!["a.ldr"]);
    // the acyclic geometry still made it through
    assert_eq!(scene.parts.len(), 1);
    assert_eq!(scene.parts[0].geometry.faces.len(), 1);
}

#[test]
fn test_entry_missing_is_fatal() {
    let resolver = common::resolver_with(&[]);
    let err = libldraw::Scene::from_resolver("absent.ldr", &resolver, ParseConfig::new())
        .unwrap_err();
    assert!(matches!(err, libldraw::Error::MissingFile(_)));
}
