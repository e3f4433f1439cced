use super::{Point3, Tolerance, Vec3};
use crate::appearance::TextureTargetDefinition;
use crate::logger::CityGmlLogger;

/// A closed loop of 3D points bounding a polygon (outline or hole).
///
/// The closing point is implicit: the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing {
    id: String,
    is_exterior: bool,
    vertices: Vec<Point3>,
}

impl LinearRing {
    #[must_use]
    pub fn new(id: impl Into<String>, is_exterior: bool) -> Self {
        Self {
            id: id.into(),
            is_exterior,
            vertices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_vertices(id: impl Into<String>, is_exterior: bool, vertices: Vec<Point3>) -> Self {
        Self {
            id: id.into(),
            is_exterior,
            vertices,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn is_exterior(&self) -> bool {
        self.is_exterior
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn add_vertex(&mut self, vertex: Point3) {
        self.vertices.push(vertex);
    }

    /// Moves the vertex storage out, leaving the ring empty.
    pub fn take_vertices(&mut self) -> Vec<Point3> {
        std::mem::take(&mut self.vertices)
    }

    /// Unit normal by Newell's method; zero for rings without area.
    #[must_use]
    pub fn compute_normal(&self) -> Vec3 {
        newell_normal(&self.vertices).unwrap_or(Vec3::ZERO)
    }

    /// Removes consecutive duplicate vertices (cyclically, so a repeated
    /// closing point goes too) and erases the matching entries from every
    /// coordinate list in `targets` that belongs to this ring.
    ///
    /// Returns the number of vertices removed.
    pub fn remove_duplicate_vertices(
        &mut self,
        targets: &mut [TextureTargetDefinition],
        logger: Option<&dyn CityGmlLogger>,
    ) -> usize {
        let vertex_count = self.vertices.len();
        for target in targets.iter() {
            for coords in target.texture_coordinates() {
                if coords.targets(self) && coords.len() != vertex_count {
                    crate::citygml_log_warn!(
                        logger,
                        "Number of vertices in LinearRing with id '{}' ({}) does not match with number of texture coordinates in coordinates list with id '{}' ({})",
                        self.id,
                        vertex_count,
                        coords.id(),
                        coords.len()
                    );
                }
            }
        }

        if vertex_count < 2 {
            return 0;
        }

        let threshold = Tolerance::DUPLICATE_VERTEX.eps;
        let mut removed = 0usize;
        let mut i = 0usize;
        while i < self.vertices.len() && self.vertices.len() > 2 {
            let next = (i + 1) % self.vertices.len();
            if self.vertices[i].distance_squared_to(self.vertices[next]) <= threshold {
                self.vertices.remove(i);
                removed += 1;
                for target in targets.iter_mut() {
                    for coords in target.texture_coordinates_mut() {
                        if coords.target_ring_id() == self.id {
                            coords.erase(i);
                        }
                    }
                }
            } else {
                i += 1;
            }
        }

        if removed > 0 {
            log::trace!(
                target: crate::logger::LOG_TARGET,
                "removed {removed} duplicate vertices from ring '{}'",
                self.id
            );
        }
        removed
    }
}

/// Newell's method. `None` when fewer than 3 points or the loop has no area.
pub(crate) fn newell_normal(points: &[Point3]) -> Option<Vec3> {
    let len = points.len();
    if len < 3 {
        return None;
    }

    let mut n = Vec3::ZERO;
    for (i, current) in points.iter().enumerate() {
        let next = points[(i + 1) % len];
        n.x += (current.y - next.y) * (current.z + next.z);
        n.y += (current.z - next.z) * (current.x + next.x);
        n.z += (current.x - next.x) * (current.y + next.y);
    }
    n.normalized()
}
