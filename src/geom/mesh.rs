use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::tesselator::EarClipTesselator;
use crate::logger::CityGmlLogger;

/// Flat render buffers for one finished polygon.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PolygonMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    pub uvs: Option<Vec<[f64; 2]>>,
    pub normals: Option<Vec<[f64; 3]>>,
}

impl PolygonMesh {
    /// Create a new mesh with positions and indices only.
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            uvs: None,
            normals: None,
        }
    }

    #[must_use]
    pub fn with_attributes(
        positions: Vec<[f64; 3]>,
        indices: Vec<u32>,
        uvs: Option<Vec<[f64; 2]>>,
        normals: Option<Vec<[f64; 3]>>,
    ) -> Self {
        Self {
            positions,
            indices,
            uvs,
            normals,
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all vertex indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }

    #[must_use]
    pub fn has_triangle_indices(&self) -> bool {
        self.indices.len() % 3 == 0
    }

    /// Returns true if all optional vertex attribute buffers match `positions.len()`.
    #[must_use]
    pub fn has_valid_attribute_lengths(&self) -> bool {
        let n = self.positions.len();
        self.uvs.as_ref().is_none_or(|uvs| uvs.len() == n)
            && self.normals.as_ref().is_none_or(|normals| normals.len() == n)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.has_triangle_indices() {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if !self.has_valid_attribute_lengths() {
            return Err("mesh attribute buffers do not match vertex count".to_string());
        }
        Ok(())
    }

    /// Position buffer as `[x0, y0, z0, x1, y1, z1, ...]`.
    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        self.positions.as_flattened()
    }

    /// UV buffer as `[u0, v0, u1, v1, ...]`.
    #[must_use]
    pub fn uvs_flat(&self) -> Option<&[f64]> {
        self.uvs.as_deref().map(<[[f64; 2]]>::as_flattened)
    }

    #[must_use]
    pub fn normals_flat(&self) -> Option<&[f64]> {
        self.normals.as_deref().map(<[[f64; 3]]>::as_flattened)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Build configuration
// ─────────────────────────────────────────────────────────────────────────────

/// How polygons are turned into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Route index computation through the tesselator instead of the simple fan.
    pub tesselate: bool,
    /// Remove duplicate ring vertices before index computation.
    pub optimize: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            tesselate: true,
            optimize: true,
        }
    }
}

/// Everything a batch of `Polygon::finish` calls shares.
pub struct BuildContext {
    pub options: BuildOptions,
    pub tesselator: EarClipTesselator,
    pub logger: Option<Arc<dyn CityGmlLogger>>,
}

impl BuildContext {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(BuildOptions::default())
    }

    #[must_use]
    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            options,
            tesselator: EarClipTesselator::new(),
            logger: None,
        }
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn CityGmlLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    #[must_use]
    pub fn logger(&self) -> Option<&dyn CityGmlLogger> {
        self.logger.as_deref()
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("options", &self.options)
            .field("tesselator", &self.tesselator)
            .field("has_logger", &self.logger.is_some())
            .finish()
    }
}
