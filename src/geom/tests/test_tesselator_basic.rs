use crate::geom::{EarClipTesselator, Point3, Tesselator, TesselatorError, Vec3};

use super::{square_ring, triangle_area_sum};

fn assert_ccw_around(vertices: &[Point3], indices: &[u32], normal: Vec3) {
    for tri in indices.chunks_exact(3) {
        let a = vertices[tri[0] as usize];
        let b = vertices[tri[1] as usize];
        let c = vertices[tri[2] as usize];
        assert!((b - a).cross(c - a).dot(normal) > 0.0, "triangle {tri:?} is clockwise");
    }
}

#[test]
fn square_yields_two_triangles() {
    let ring = square_ring("outer", true, (0.0, 0.0), 1.0);
    let mut tess = EarClipTesselator::new();
    tess.init(4, Vec3::Z);
    tess.add_contour(ring.vertices());
    tess.compute().expect("tesselate square");

    assert_eq!(tess.vertices().len(), 4);
    assert_eq!(tess.indices().len(), 6);
    assert!((triangle_area_sum(tess.vertices(), tess.indices()) - 1.0).abs() < 1e-9);
    assert_ccw_around(tess.vertices(), tess.indices(), Vec3::Z);
}

#[test]
fn concave_outline_is_covered_exactly() {
    let outline = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(2.0, 1.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(1.0, 2.0, 0.0),
        Point3::new(0.0, 2.0, 0.0),
    ];
    let mut tess = EarClipTesselator::new();
    tess.init(outline.len(), Vec3::Z);
    tess.add_contour(&outline);
    tess.compute().expect("tesselate L shape");

    assert_eq!(tess.indices().len(), 12);
    assert!((triangle_area_sum(tess.vertices(), tess.indices()) - 3.0).abs() < 1e-9);
    assert_ccw_around(tess.vertices(), tess.indices(), Vec3::Z);
}

#[test]
fn hole_is_left_uncovered() {
    let outer = square_ring("outer", true, (0.0, 0.0), 4.0);
    let hole = square_ring("hole", false, (1.0, 1.0), 2.0);

    let mut tess = EarClipTesselator::new();
    tess.init(8, Vec3::Z);
    tess.add_contour(outer.vertices());
    tess.add_contour(hole.vertices());
    tess.compute().expect("tesselate square with hole");

    assert_eq!(tess.vertices().len(), 8);
    assert_eq!(tess.indices().len() % 3, 0);
    assert!(tess.indices().iter().all(|&i| i < 8));
    assert!((triangle_area_sum(tess.vertices(), tess.indices()) - 12.0).abs() < 1e-9);
    assert_ccw_around(tess.vertices(), tess.indices(), Vec3::Z);

    let diag = tess.diagnostics().expect("ear clipper keeps diagnostics");
    assert_eq!(diag.contour_count, 2);
    assert_eq!(diag.skipped_contour_count, 0);
}

#[test]
fn hole_outside_outline_is_skipped() {
    let outer = square_ring("outer", true, (0.0, 0.0), 4.0);
    let stray = square_ring("stray", false, (10.0, 10.0), 1.0);

    let mut tess = EarClipTesselator::new();
    tess.init(8, Vec3::Z);
    tess.add_contour(outer.vertices());
    tess.add_contour(stray.vertices());
    tess.compute().expect("stray hole does not fail the polygon");

    assert_eq!(tess.vertices().len(), 8);
    assert_eq!(tess.indices().len(), 6);
    assert!(tess.indices().iter().all(|&i| i < 4));
    assert!((triangle_area_sum(tess.vertices(), tess.indices()) - 16.0).abs() < 1e-9);
    assert_eq!(tess.diagnostics().map(|d| d.skipped_contour_count), Some(1));
}

#[test]
fn two_holes_are_both_cut_out() {
    let outer = square_ring("outer", true, (0.0, 0.0), 6.0);
    let left = square_ring("left", false, (1.0, 1.0), 1.0);
    let right = square_ring("right", false, (4.0, 4.0), 1.0);

    let mut tess = EarClipTesselator::new();
    tess.init(12, Vec3::Z);
    for ring in [&outer, &left, &right] {
        tess.add_contour(ring.vertices());
    }
    tess.compute().expect("tesselate square with two holes");

    assert!((triangle_area_sum(tess.vertices(), tess.indices()) - 34.0).abs() < 1e-9);
    assert_ccw_around(tess.vertices(), tess.indices(), Vec3::Z);
}

#[test]
fn downward_normal_flips_winding() {
    let ring = square_ring("outer", true, (0.0, 0.0), 1.0);
    let down = Vec3::new(0.0, 0.0, -1.0);
    let mut tess = EarClipTesselator::new();
    tess.init(4, down);
    tess.add_contour(ring.vertices());
    tess.compute().expect("tesselate square");

    assert_eq!(tess.indices().len(), 6);
    assert_ccw_around(tess.vertices(), tess.indices(), down);
}

#[test]
fn short_contours_produce_no_triangles() {
    let mut tess = EarClipTesselator::new();
    tess.init(2, Vec3::Z);
    tess.add_contour(&[Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)]);
    tess.compute().expect("degenerate input is not an error");
    assert_eq!(tess.vertices().len(), 2);
    assert!(tess.indices().is_empty());

    let outer = square_ring("outer", true, (0.0, 0.0), 4.0);
    tess.init(6, Vec3::Z);
    tess.add_contour(outer.vertices());
    tess.add_contour(&[Point3::new(1.0, 1.0, 0.0), Point3::new(2.0, 1.0, 0.0)]);
    tess.compute().expect("short hole is skipped");
    assert_eq!(tess.vertices().len(), 6);
    assert_eq!(tess.indices().len(), 6);
    assert_eq!(tess.diagnostics().map(|d| d.skipped_contour_count), Some(1));
}

#[test]
fn non_finite_input_is_rejected() {
    let mut tess = EarClipTesselator::new();
    tess.init(3, Vec3::Z);
    tess.add_contour(&[
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(f64::NAN, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]);
    assert_eq!(tess.compute(), Err(TesselatorError::NonFiniteVertices { contour: 0 }));
}

#[test]
fn init_resets_previous_polygon() {
    let mut tess = EarClipTesselator::new();
    let big = square_ring("big", true, (0.0, 0.0), 4.0);
    tess.init(4, Vec3::Z);
    tess.add_contour(big.vertices());
    tess.compute().expect("first polygon");

    let tri = [
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    tess.init(3, Vec3::ZERO);
    tess.add_contour(&tri);
    tess.compute().expect("second polygon");

    assert_eq!(tess.vertices(), &tri);
    assert_eq!(tess.indices().len(), 3);
}
