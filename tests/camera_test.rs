//! Integration tests for camera record accumulation.

mod common;

use common::{BRICK, load};
use nalgebra::{Point3, Vector3};

#[test]
fn test_camera_accumulates_until_name() {
    let entry = "\
0 Name: top.ldr
0 !LEOCAD CAMERA FOV 25
0 !LEOCAD CAMERA ZNEAR 50 ZFAR 100000
0 !LEOCAD CAMERA POSITION 100 50 -100
0 !LEOCAD CAMERA TARGET_POSITION 0 0 0 UP_VECTOR 0 1 0 NAME main camera
1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat
";
    let scene = load("top.ldr", &[("top.ldr", entry), ("3001.dat", BRICK)]);

    assert_eq!(scene.cameras.len(), 1);
    let camera = &scene.cameras[0];
    assert_eq!(camera.fov, 25.0);
    assert_eq!(camera.z_near, 50.0);
    assert_eq!(camera.z_far, 100000.0);
    assert_eq!(camera.position, Point3::new(100.0, 50.0, -100.0));
    assert_eq!(camera.target_position, Point3::origin());
    assert_eq!(camera.up_vector, Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(camera.name, "main camera");
    assert!(!camera.orthographic);
}

#[test]
fn test_multiple_cameras_in_definition_order() {
    let entry = "\
0 Name: top.ldr
0 !LEOCAD CAMERA FOV 20 NAME first
0 !LEOCAD CAMERA ORTHOGRAPHIC HIDDEN NAME second
1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat
";
    let scene = load("top.ldr", &[("top.ldr", entry), ("3001.dat", BRICK)]);

    assert_eq!(scene.cameras.len(), 2);
    assert_eq!(scene.cameras[0].name, "first");
    assert_eq!(scene.cameras[1].name, "second");
    assert!(scene.cameras[1].orthographic);
    assert!(scene.cameras[1].hidden);
}

#[test]
fn test_unterminated_camera_not_appended() {
    let entry = "\
0 Name: top.ldr
0 !LEOCAD CAMERA FOV 20 ZNEAR 5
1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat
";
    let scene = load("top.ldr", &[("top.ldr", entry), ("3001.dat", BRICK)]);

    // no terminating NAME field was consumed
    assert!(scene.cameras.is_empty());
}
