//! Diagnostics recorded while a polygon is finished.
//!
//! Every data-quality problem found by `Polygon::finish` is also sent to the
//! logger; the diagnostics keep the same information in a form callers can
//! inspect or aggregate across a whole document.
//!
//! # Example
//!
//! ```ignore
//! polygon.finish(true, &mut tesselator, true, None)?;
//!
//! let diag = polygon.diagnostics();
//! if diag.has_vertex_count_drift() {
//!     eprintln!("texture coordinates of {} may be misaligned", polygon.id());
//! }
//! ```

use std::fmt;

use serde::Serialize;

use super::tesselator::TesselationDiagnostics;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PolygonDiagnostics {
    /// Number of rings that contributed vertices (exterior plus interiors).
    pub ring_count: usize,

    /// Vertices removed by duplicate removal before index computation.
    pub removed_duplicate_vertex_count: usize,

    /// Whether indices came from the tesselator rather than the simple fan.
    pub tesselated: bool,

    /// Total ring vertex count handed to index computation.
    pub input_vertex_count: usize,

    /// Vertex count after index computation.
    pub vertex_count: usize,

    pub triangle_count: usize,

    /// Fewer than 3 vertices after index computation.
    pub degenerate: bool,

    /// Statistics reported by the tesselator, when it keeps any.
    pub tesselation: Option<TesselationDiagnostics>,

    /// Warning and error texts emitted while finishing.
    pub warnings: Vec<String>,
}

impl PolygonDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if tesselation added or dropped vertices, which leaves
    /// ring-relative texture coordinates misaligned.
    #[must_use]
    pub fn has_vertex_count_drift(&self) -> bool {
        self.tesselated && self.input_vertex_count != self.vertex_count
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns `true` if no issues were detected.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.degenerate && !self.has_vertex_count_drift() && self.warnings.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Accumulates another polygon's diagnostics, e.g. for a document summary.
    ///
    /// Counts are summed, flags are OR'd and warnings appended. Per-polygon
    /// tesselator statistics are not merged.
    pub fn merge(&mut self, other: &PolygonDiagnostics) {
        self.ring_count += other.ring_count;
        self.removed_duplicate_vertex_count += other.removed_duplicate_vertex_count;
        self.tesselated = self.tesselated || other.tesselated;
        self.input_vertex_count += other.input_vertex_count;
        self.vertex_count += other.vertex_count;
        self.triangle_count += other.triangle_count;
        self.degenerate = self.degenerate || other.degenerate;
        self.warnings.extend(other.warnings.iter().cloned());
    }

    /// Format: `"V:{vertices} T:{triangles} [issues...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("V:{} T:{}", self.vertex_count, self.triangle_count)];

        if self.removed_duplicate_vertex_count > 0 {
            parts.push(format!("dedup:{}", self.removed_duplicate_vertex_count));
        }
        if self.has_vertex_count_drift() {
            parts.push(format!("drift:{}->{}", self.input_vertex_count, self.vertex_count));
        }
        if self.degenerate {
            parts.push("degenerate".to_string());
        }

        parts.join(" ")
    }
}

impl fmt::Display for PolygonDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Polygon Diagnostics:")?;
        writeln!(f, "  Rings: {}", self.ring_count)?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;
        writeln!(f, "  Mode: {}", if self.tesselated { "tesselated" } else { "fan" })?;

        if self.removed_duplicate_vertex_count > 0 {
            writeln!(f, "  Duplicate vertices removed: {}", self.removed_duplicate_vertex_count)?;
        }
        if self.has_vertex_count_drift() {
            writeln!(
                f,
                "  Vertex count drift: {} -> {}",
                self.input_vertex_count, self.vertex_count
            )?;
        }

        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }

        let status = if self.is_clean() {
            "CLEAN"
        } else if self.degenerate {
            "DEGENERATE"
        } else {
            "ISSUES DETECTED"
        };
        writeln!(f, "  Status: {status}")?;

        Ok(())
    }
}
