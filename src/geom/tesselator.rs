//! Polygon tesselation behind the [`Tesselator`] contract.
//!
//! A tesselator receives the rings of one polygon as contours (outline first,
//! holes after it) together with a reference normal, and produces a vertex
//! buffer plus a triangle index buffer. Implementations are free to add or
//! drop vertices; callers must read the vertex buffer back instead of assuming
//! it equals the concatenated input.
//!
//! [`EarClipTesselator`] is the built-in implementation: contours are projected
//! onto the plane perpendicular to the normal and handed to `earcutr`, holes
//! included. It keeps the input vertex buffer unchanged and emits triangles
//! counter-clockwise as seen from the normal.

use std::ops::Range;

use serde::Serialize;

use super::error::TesselatorError;
use super::ring::newell_normal;
use super::{Point3, Tolerance, Vec3};
use crate::logger::LOG_TARGET;

pub trait Tesselator {
    /// Resets all state for a new polygon.
    fn init(&mut self, expected_vertex_count: usize, normal: Vec3);

    /// Appends one closed contour. The first contour is the outline.
    fn add_contour(&mut self, contour: &[Point3]);

    fn compute(&mut self) -> Result<(), TesselatorError>;

    fn vertices(&self) -> &[Point3];

    fn indices(&self) -> &[u32];

    /// Statistics of the last `compute`, when the implementation keeps any.
    fn diagnostics(&self) -> Option<&TesselationDiagnostics> {
        None
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TesselationDiagnostics {
    pub input_vertex_count: usize,
    pub contour_count: usize,
    /// Contours left out: fewer than 3 points, or a hole outside the outline.
    pub skipped_contour_count: usize,
    pub output_triangle_count: usize,
    pub culled_degenerate_triangles: usize,
}

#[derive(Debug, Clone)]
pub struct EarClipTesselator {
    tolerance: Tolerance,
    normal: Vec3,
    vertices: Vec<Point3>,
    contours: Vec<Range<usize>>,
    indices: Vec<u32>,
    diagnostics: TesselationDiagnostics,
}

impl EarClipTesselator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_tolerance(Tolerance::default_geom())
    }

    #[must_use]
    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            normal: Vec3::ZERO,
            vertices: Vec::new(),
            contours: Vec::new(),
            indices: Vec::new(),
            diagnostics: TesselationDiagnostics::default(),
        }
    }

    #[must_use]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Collects the outline and every hole that has at least one vertex
    /// inside the outline.
    fn contour_set(&mut self, points: &[Point2]) -> ContourSet {
        let mut set = ContourSet::default();
        let outline = self.contours[0].clone();
        set.push(outline.clone(), points);

        for (contour, range) in self.contours.iter().enumerate().skip(1) {
            if range.len() < 3 {
                self.diagnostics.skipped_contour_count += 1;
                continue;
            }
            let inside = points[range.clone()]
                .iter()
                .any(|&p| contains_point(&points[outline.clone()], p));
            if !inside {
                log::debug!(target: LOG_TARGET, "hole contour {contour} lies outside the outline, skipped");
                self.diagnostics.skipped_contour_count += 1;
                continue;
            }
            set.hole_starts.push(set.source.len());
            set.push(range.clone(), points);
        }
        set
    }
}

impl Default for EarClipTesselator {
    fn default() -> Self {
        Self::new()
    }
}

impl Tesselator for EarClipTesselator {
    fn init(&mut self, expected_vertex_count: usize, normal: Vec3) {
        self.normal = normal;
        self.vertices.clear();
        self.vertices.reserve(expected_vertex_count);
        self.contours.clear();
        self.indices.clear();
        self.diagnostics = TesselationDiagnostics::default();
    }

    fn add_contour(&mut self, contour: &[Point3]) {
        let start = self.vertices.len();
        self.vertices.extend_from_slice(contour);
        self.contours.push(start..self.vertices.len());
    }

    fn compute(&mut self) -> Result<(), TesselatorError> {
        self.indices.clear();
        self.diagnostics = TesselationDiagnostics {
            input_vertex_count: self.vertices.len(),
            contour_count: self.contours.len(),
            ..TesselationDiagnostics::default()
        };

        for (contour, range) in self.contours.iter().enumerate() {
            if self.vertices[range.clone()].iter().any(|p| !p.is_finite()) {
                return Err(TesselatorError::NonFiniteVertices { contour });
            }
        }

        let Some(outline) = self.contours.first().cloned() else {
            return Ok(());
        };
        if outline.len() < 3 {
            self.diagnostics.skipped_contour_count = self.contours.len();
            log::debug!(target: LOG_TARGET, "outer contour has fewer than 3 points, nothing to tesselate");
            return Ok(());
        }

        let plane = ProjectionPlane::new(self.normal, &self.vertices[outline]);
        let points: Vec<Point2> = self.vertices.iter().map(|p| plane.project(*p)).collect();
        let set = self.contour_set(&points);

        let triangles = earcutr::earcut(&set.coords, &set.hole_starts, 2).map_err(|_| {
            TesselatorError::TriangulationFailed {
                vertex_count: set.source.len(),
            }
        })?;

        let min_area = self.tolerance.eps_squared();
        let mut indices = Vec::with_capacity(triangles.len());
        for tri in triangles.chunks_exact(3) {
            let [a, b, c] = [set.source[tri[0]], set.source[tri[1]], set.source[tri[2]]];
            let doubled = orient2d(points[a as usize], points[b as usize], points[c as usize]);
            if !doubled.is_finite() || 0.5 * doubled.abs() <= min_area {
                self.diagnostics.culled_degenerate_triangles += 1;
                continue;
            }
            if doubled > 0.0 {
                indices.extend_from_slice(&[a, b, c]);
            } else {
                indices.extend_from_slice(&[a, c, b]);
            }
        }

        self.diagnostics.output_triangle_count = indices.len() / 3;
        self.indices = indices;
        Ok(())
    }

    fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    fn indices(&self) -> &[u32] {
        &self.indices
    }

    fn diagnostics(&self) -> Option<&TesselationDiagnostics> {
        Some(&self.diagnostics)
    }
}

/// Flat `[u0, v0, u1, v1, ...]` input for `earcutr`, with the vertex buffer
/// index of every entry.
#[derive(Debug, Default)]
struct ContourSet {
    coords: Vec<f64>,
    hole_starts: Vec<usize>,
    source: Vec<u32>,
}

impl ContourSet {
    #[allow(clippy::cast_possible_truncation)]
    fn push(&mut self, range: Range<usize>, points: &[Point2]) {
        for i in range {
            self.coords.extend_from_slice(&[points[i].u, points[i].v]);
            self.source.push(i as u32);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Projection
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point2 {
    u: f64,
    v: f64,
}

/// Right-handed (u, v, normal) frame, so loops counter-clockwise around the
/// normal stay counter-clockwise after projection.
struct ProjectionPlane {
    origin: Point3,
    u_axis: Vec3,
    v_axis: Vec3,
}

impl ProjectionPlane {
    fn new(normal: Vec3, outer: &[Point3]) -> Self {
        let n = normal
            .normalized()
            .or_else(|| newell_normal(outer))
            .unwrap_or(Vec3::Z);
        let helper = if n.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
        let u_axis = (helper - n * helper.dot(n)).normalized().unwrap_or(Vec3::X);
        let v_axis = n.cross(u_axis);
        Self {
            origin: outer.first().copied().unwrap_or(Point3::ORIGIN),
            u_axis,
            v_axis,
        }
    }

    fn project(&self, p: Point3) -> Point2 {
        let d = p - self.origin;
        Point2 {
            u: d.dot(self.u_axis),
            v: d.dot(self.v_axis),
        }
    }
}

/// Twice the signed area of `(a, b, c)`; positive when counter-clockwise.
fn orient2d(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.u - a.u) * (c.v - a.v) - (b.v - a.v) * (c.u - a.u)
}

/// Even-odd test of `p` against the closed loop `ring`.
fn contains_point(ring: &[Point2], p: Point2) -> bool {
    let mut inside = false;
    let mut prev = ring[ring.len() - 1];
    for &curr in ring {
        if (curr.v > p.v) != (prev.v > p.v) {
            let u_cross = curr.u + (p.v - curr.v) * (prev.u - curr.u) / (prev.v - curr.v);
            if p.u < u_cross {
                inside = !inside;
            }
        }
        prev = curr;
    }
    inside
}
