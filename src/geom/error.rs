use super::ring::LinearRing;

/// Failure modes of the built-in tesselator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TesselatorError {
    #[error("contour {contour} contains non-finite coordinates")]
    NonFiniteVertices { contour: usize },
    #[error("failed to triangulate polygon with {vertex_count} contour vertices")]
    TriangulationFailed { vertex_count: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum GeomError {
    /// The polygon was already finished; the rejected ring is handed back.
    #[error("can't add LinearRing '{}' to finished Polygon '{polygon_id}'", .ring.id())]
    InvalidState {
        polygon_id: String,
        ring: Box<LinearRing>,
    },
    #[error("can't change the normal orientation of finished Polygon '{polygon_id}'")]
    NegNormalAfterFinish { polygon_id: String },
    #[error(transparent)]
    Tesselation(#[from] TesselatorError),
}

impl GeomError {
    /// Recovers the ring rejected by a finished polygon.
    #[must_use]
    pub fn into_rejected_ring(self) -> Option<LinearRing> {
        match self {
            Self::InvalidState { ring, .. } => Some(*ring),
            _ => None,
        }
    }
}

pub type GeomResult<T> = Result<T, GeomError>;
