mod test_appearance_basic;
mod test_tesselator_basic;

use crate::geom::{LinearRing, Point3};

/// Axis-aligned square in the z = 0 plane, counter-clockwise seen from +Z.
pub(super) fn square_ring(id: &str, is_exterior: bool, origin: (f64, f64), size: f64) -> LinearRing {
    let (x, y) = origin;
    LinearRing::with_vertices(
        id,
        is_exterior,
        vec![
            Point3::new(x, y, 0.0),
            Point3::new(x + size, y, 0.0),
            Point3::new(x + size, y + size, 0.0),
            Point3::new(x, y + size, 0.0),
        ],
    )
}

/// Sum of the 3D areas of all triangles in an index buffer.
pub(super) fn triangle_area_sum(vertices: &[Point3], indices: &[u32]) -> f64 {
    indices
        .chunks_exact(3)
        .map(|tri| {
            let a = vertices[tri[0] as usize];
            let b = vertices[tri[1] as usize];
            let c = vertices[tri[2] as usize];
            0.5 * (b - a).cross(c - a).length()
        })
        .sum()
}
