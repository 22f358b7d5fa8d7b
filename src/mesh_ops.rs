//! Geometry post-processing
//!
//! The only in-crate post-pass is coincident-vertex welding of composed
//! geometry: vertices within the merge distance collapse to one, faces are
//! re-indexed, and faces or edges that collapse below their minimum arity
//! are dropped together with their metadata.

use std::collections::HashMap;

use nalgebra::{Point3, distance};

use crate::model::{Face, Geometry};

/// Weld coincident vertices of `geometry` in place.
///
/// Face vertices and edge vertices are welded independently (they live in
/// separate lists). A quad that collapses to three distinct corners
/// becomes a triangle; anything below that is dropped, along with its
/// FaceInfo. Degenerate edges are dropped.
pub fn weld_geometry(geometry: &mut Geometry, merge_distance: f64) {
    let (vertices, remap) = weld_points(&geometry.vertices, merge_distance);
    geometry.vertices = vertices;

    let mut faces = Vec::with_capacity(geometry.faces.len());
    let mut face_info = Vec::with_capacity(geometry.face_info.len());
    for (face, info) in geometry.faces.iter().zip(&geometry.face_info) {
        if let Some(face) = remap_face(face, &remap) {
            faces.push(face);
            face_info.push(info.clone());
        }
    }
    geometry.faces = faces;
    geometry.face_info = face_info;

    let (edge_vertices, edge_remap) = weld_points(&geometry.edge_vertices, merge_distance);
    geometry.edge_vertices = edge_vertices;
    geometry.edges = geometry
        .edges
        .iter()
        .map(|[a, b]| [edge_remap[*a], edge_remap[*b]])
        .filter(|[a, b]| a != b)
        .collect();
}

/// Collapse points within `merge_distance` of each other.
///
/// Returns the kept points and a remap from old index to kept index.
/// Points are bucketed into a grid with cells the size of the merge
/// distance, so only the 27 surrounding cells need checking per point.
fn weld_points(points: &[Point3<f64>], merge_distance: f64) -> (Vec<Point3<f64>>, Vec<usize>) {
    let cell = merge_distance.max(f64::EPSILON);
    let mut grid: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
    let mut kept: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    let mut remap = Vec::with_capacity(points.len());

    for point in points {
        let (cx, cy, cz) = cell_of(point, cell);
        let mut found = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(indices) = grid.get(&(cx + dx, cy + dy, cz + dz)) {
                        for &index in indices {
                            if distance(&kept[index], point) <= merge_distance {
                                found = Some(index);
                                break 'search;
                            }
                        }
                    }
                }
            }
        }
        let index = match found {
            Some(index) => index,
            None => {
                let index = kept.len();
                kept.push(*point);
                grid.entry((cx, cy, cz)).or_default().push(index);
                index
            }
        };
        remap.push(index);
    }
    (kept, remap)
}

fn cell_of(point: &Point3<f64>, cell: f64) -> (i64, i64, i64) {
    (
        (point.x / cell).floor() as i64,
        (point.y / cell).floor() as i64,
        (point.z / cell).floor() as i64,
    )
}

/// Re-index a face, dropping it when it degenerates.
fn remap_face(face: &Face, remap: &[usize]) -> Option<Face> {
    match face {
        Face::Triangle([a, b, c]) => {
            let (a, b, c) = (remap[*a], remap[*b], remap[*c]);
            (a != b && b != c && a != c).then_some(Face::Triangle([a, b, c]))
        }
        Face::Quad([a, b, c, d]) => {
            let mapped = [remap[*a], remap[*b], remap[*c], remap[*d]];
            let mut unique: Vec<usize> = Vec::with_capacity(4);
            for index in mapped {
                if !unique.contains(&index) {
                    unique.push(index);
                }
            }
            match unique.len() {
                4 => Some(Face::Quad(mapped)),
                3 => Some(Face::Triangle([unique[0], unique[1], unique[2]])),
                _ => None,
            }
        }
    }
}
