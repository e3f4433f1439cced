//! Planar polygon with holes, turned into a triangle mesh by [`Polygon::finish`].
//!
//! A polygon owns one exterior ring and any number of interior rings. Until it
//! is finished it accepts rings; `finish` removes duplicate vertices, moves the
//! ring vertices into a flat buffer and computes triangle indices, either with
//! a plain fan over the concatenated vertices or through a [`Tesselator`].
//! Afterwards the polygon is read-only and may be shared by several parent
//! geometries.
//!
//! Texture coordinates stay stored per ring on the polygon's
//! [`AppearanceTarget`] and are assembled on request, aligned with the final
//! vertex buffer.

use std::fmt;
use std::sync::Arc;

use super::diagnostics::PolygonDiagnostics;
use super::error::{GeomError, GeomResult};
use super::mesh::{BuildContext, PolygonMesh};
use super::ring::LinearRing;
use super::tesselator::Tesselator;
use super::{Point3, TexCoord, Vec3};
use crate::appearance::{Appearance, AppearanceTarget, Material, Texture};
use crate::logger::{CityGmlLogger, LOG_TARGET, LogLevel, log_message};

#[derive(Clone)]
pub struct Polygon {
    id: String,
    logger: Option<Arc<dyn CityGmlLogger>>,
    exterior_ring: Option<LinearRing>,
    interior_rings: Vec<LinearRing>,
    neg_normal: bool,
    finished: bool,
    normal: Vec3,
    vertices: Vec<Point3>,
    indices: Vec<u32>,
    appearance: AppearanceTarget,
    diagnostics: PolygonDiagnostics,
}

impl Polygon {
    #[must_use]
    pub fn new(id: impl Into<String>, logger: Option<Arc<dyn CityGmlLogger>>) -> Self {
        Self {
            id: id.into(),
            logger,
            exterior_ring: None,
            interior_rings: Vec::new(),
            neg_normal: false,
            finished: false,
            normal: Vec3::ZERO,
            vertices: Vec::new(),
            indices: Vec::new(),
            appearance: AppearanceTarget::new(),
            diagnostics: PolygonDiagnostics::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn exterior_ring(&self) -> Option<&LinearRing> {
        self.exterior_ring.as_ref()
    }

    #[must_use]
    pub fn interior_rings(&self) -> &[LinearRing] {
        &self.interior_rings
    }

    #[must_use]
    pub fn neg_normal(&self) -> bool {
        self.neg_normal
    }

    pub fn set_neg_normal(&mut self, neg_normal: bool) -> GeomResult<()> {
        if self.finished {
            return Err(GeomError::NegNormalAfterFinish {
                polygon_id: self.id.clone(),
            });
        }
        self.neg_normal = neg_normal;
        Ok(())
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Flat vertex buffer. Empty until the polygon is finished.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Triangle list indexing into [`Self::vertices`].
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Normal captured by `finish` before the ring vertices were released.
    #[must_use]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    #[must_use]
    pub fn appearance_target(&self) -> &AppearanceTarget {
        &self.appearance
    }

    pub fn appearance_target_mut(&mut self) -> &mut AppearanceTarget {
        &mut self.appearance
    }

    #[must_use]
    pub fn diagnostics(&self) -> &PolygonDiagnostics {
        &self.diagnostics
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rings
    // ─────────────────────────────────────────────────────────────────────────

    /// Takes ownership of `ring`.
    ///
    /// A finished polygon rejects the ring and hands it back inside
    /// [`GeomError::InvalidState`]. A second exterior ring is dropped with a
    /// warning; the first one is kept.
    pub fn add_ring(&mut self, ring: LinearRing) -> GeomResult<()> {
        if self.finished {
            return Err(GeomError::InvalidState {
                polygon_id: self.id.clone(),
                ring: Box::new(ring),
            });
        }

        if ring.is_exterior() {
            if let Some(existing) = &self.exterior_ring {
                crate::citygml_log_warn!(
                    self.logger.as_deref(),
                    "Duplicate definition of exterior LinearRing for Polygon with id '{}'. Keeping exterior LinearRing with id '{}' and ignore LinearRing with id '{}'",
                    self.id,
                    existing.id(),
                    ring.id()
                );
                return Ok(());
            }
            self.exterior_ring = Some(ring);
        } else {
            self.interior_rings.push(ring);
        }
        Ok(())
    }

    /// Unit normal of the exterior ring, flipped when `neg_normal` is set.
    /// Zero without an exterior ring, and after `finish` released the ring
    /// vertices (see [`Self::normal`]).
    #[must_use]
    pub fn compute_normal(&self) -> Vec3 {
        let Some(exterior) = &self.exterior_ring else {
            return Vec3::ZERO;
        };
        let normal = exterior.compute_normal();
        if self.neg_normal { -normal } else { normal }
    }

    fn rings(&self) -> impl Iterator<Item = &LinearRing> {
        self.exterior_ring.iter().chain(self.interior_rings.iter())
    }

    fn rings_mut(&mut self) -> impl Iterator<Item = &mut LinearRing> {
        self.exterior_ring.iter_mut().chain(self.interior_rings.iter_mut())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Finish
    // ─────────────────────────────────────────────────────────────────────────

    /// Computes the vertex and index buffers. Only the first call has an
    /// effect; polygons shared between geometries get finished repeatedly.
    ///
    /// With `optimize`, duplicate ring vertices are removed first and the
    /// matching texture coordinates are erased with them. With
    /// `do_tesselate`, `tesselator` produces the triangles; otherwise a fan
    /// over the concatenated ring vertices is used, which is only correct for
    /// a single convex ring.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::Tesselation`] when the tesselator fails. The
    /// polygon counts as finished anyway and keeps empty buffers.
    pub fn finish(
        &mut self,
        do_tesselate: bool,
        tesselator: &mut dyn Tesselator,
        optimize: bool,
        logger: Option<&dyn CityGmlLogger>,
    ) -> GeomResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        let mut diagnostics = PolygonDiagnostics {
            ring_count: self.rings().count(),
            tesselated: do_tesselate,
            ..PolygonDiagnostics::default()
        };

        if optimize {
            diagnostics.removed_duplicate_vertex_count = self.remove_duplicate_vertices_in_rings(logger);
        }

        self.normal = self.compute_normal();
        self.vertices.clear();
        self.indices.clear();

        let input_vertex_count = self.rings().map(LinearRing::len).sum::<usize>();
        diagnostics.input_vertex_count = input_vertex_count;

        let result = if do_tesselate {
            self.create_indices_with_tesselation(tesselator)
        } else {
            self.create_simple_indices();
            Ok(())
        };

        diagnostics.vertex_count = self.vertices.len();
        diagnostics.triangle_count = self.indices.len() / 3;

        if let Err(err) = result {
            self.diagnostics = diagnostics;
            return Err(err);
        }

        if do_tesselate {
            diagnostics.tesselation = tesselator.diagnostics().cloned();
            if input_vertex_count != self.vertices.len() {
                let message = format!(
                    "Tesselation of Polygon with id '{}' has changed the number of Polygons, causing a mismatch of texture coordinates and vertices.",
                    self.id
                );
                log_message(logger, LogLevel::Error, &message);
                diagnostics.add_warning(message);
            }
        }

        if self.vertices.len() < 3 {
            diagnostics.degenerate = true;
            let message = format!("Polygon with id {} has less than 3 vertices.", self.id);
            log_message(logger, LogLevel::Warning, &message);
            diagnostics.add_warning(message);
        }

        log::debug!(
            target: LOG_TARGET,
            "finished polygon '{}': {}",
            self.id,
            diagnostics.summary()
        );
        self.diagnostics = diagnostics;
        Ok(())
    }

    /// [`Self::finish`] with the options, tesselator and logger of `ctx`.
    pub fn finish_with_context(&mut self, ctx: &mut BuildContext) -> GeomResult<()> {
        let logger = ctx.logger.clone();
        self.finish(
            ctx.options.tesselate,
            &mut ctx.tesselator,
            ctx.options.optimize,
            logger.as_deref(),
        )
    }

    fn remove_duplicate_vertices_in_rings(&mut self, logger: Option<&dyn CityGmlLogger>) -> usize {
        let targets = self.appearance.texture_target_definitions_mut();
        let mut removed = 0;
        if let Some(exterior) = self.exterior_ring.as_mut() {
            removed += exterior.remove_duplicate_vertices(targets, logger);
        }
        for ring in &mut self.interior_rings {
            removed += ring.remove_duplicate_vertices(targets, logger);
        }
        removed
    }

    fn create_simple_indices(&mut self) {
        let mut vertices = Vec::with_capacity(self.rings().map(LinearRing::len).sum());
        for ring in self.rings_mut() {
            vertices.extend(ring.take_vertices());
        }
        self.vertices = vertices;
        self.indices = fan_indices(self.vertices.len());
    }

    fn create_indices_with_tesselation(&mut self, tesselator: &mut dyn Tesselator) -> GeomResult<()> {
        let vertex_count = self.rings().map(LinearRing::len).sum();
        tesselator.init(vertex_count, self.normal);
        for ring in self.rings_mut() {
            tesselator.add_contour(&ring.take_vertices());
        }
        tesselator.compute()?;

        self.vertices = tesselator.vertices().to_vec();
        self.indices = tesselator.indices().to_vec();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn material_for(&self, theme: &str, front: bool) -> Option<&Material> {
        self.appearance
            .material_target_definition_for_theme(theme, front)
            .map(|definition| definition.appearance().as_ref())
    }

    /// Front side first, then back side.
    #[must_use]
    pub fn material_for_any_side(&self, theme: &str) -> Option<&Material> {
        self.material_for(theme, true)
            .or_else(|| self.material_for(theme, false))
    }

    #[must_use]
    pub fn texture_for(&self, theme: &str, front: bool) -> Option<&Texture> {
        self.appearance
            .texture_target_definition_for_theme(theme, front)
            .map(|definition| definition.appearance().as_ref())
    }

    /// Front side first, then back side.
    #[must_use]
    pub fn texture_for_any_side(&self, theme: &str) -> Option<&Texture> {
        self.texture_for(theme, true)
            .or_else(|| self.texture_for(theme, false))
    }

    /// Shared handle to the texture for `theme` on the given side.
    #[must_use]
    pub fn texture_for_theme(&self, theme: &str, front: bool) -> Option<Arc<Texture>> {
        self.appearance
            .texture_target_definition_for_theme(theme, front)
            .map(|definition| Arc::clone(definition.appearance()))
    }

    /// Texture coordinates for `theme`, one per entry of [`Self::vertices`].
    ///
    /// Coordinates are concatenated per ring in vertex order (exterior first).
    /// The result is then cut or padded to the vertex count: surplus entries
    /// are dropped, missing entries repeat the last coordinate. Vertices the
    /// tesselator inserted therefore get a meaningless coordinate. When no
    /// ring has coordinates at all, the padding is `(0, 0)`.
    ///
    /// Empty when no texture is bound to `theme` on that side.
    #[must_use]
    pub fn tex_coords_for_theme(&self, theme: &str, front: bool) -> Vec<TexCoord> {
        let Some(definition) = self.appearance.texture_target_definition_for_theme(theme, front) else {
            return Vec::new();
        };
        let logger = self.logger.as_deref();
        let texture_id = definition.appearance().id();

        let ring_ids: Vec<&str> = self.rings().map(LinearRing::id).collect();
        if definition.texture_coordinates_count() != ring_ids.len() {
            crate::citygml_log_warn!(
                logger,
                "Texture with id '{}' targets Polygon with id '{}' but the number of TextureCoordinates objects is not equal with the number of LinearRing objects. (Ring objects: {} TextureCoordinates objects: {})",
                texture_id,
                self.id,
                ring_ids.len(),
                definition.texture_coordinates_count()
            );
        }

        let mut tex_coords = Vec::with_capacity(self.vertices.len());
        for ring_id in ring_ids {
            match definition.texture_coordinates_for_ring_id(ring_id) {
                Some(coordinates) => tex_coords.extend_from_slice(coordinates.coords()),
                None => crate::citygml_log_warn!(
                    logger,
                    "Texture with id '{}' targets Polygon with id '{}' but does not contain a TextureCoordinates object for LinearRing with id '{}'",
                    texture_id,
                    self.id,
                    ring_id
                ),
            }
        }

        // Tesselation may have changed the vertex count.
        let fill = tex_coords.last().copied().unwrap_or_default();
        tex_coords.resize(self.vertices.len(), fill);
        tex_coords
    }

    /// Render buffers of the finished polygon. `theme` selects the texture
    /// coordinates; without a theme, or when it resolves to nothing, the mesh
    /// carries no UVs.
    #[must_use]
    pub fn to_mesh(&self, theme: Option<&str>, front: bool) -> PolygonMesh {
        let positions = self.vertices.iter().map(|p| p.to_array()).collect::<Vec<_>>();
        let normals = (self.normal != Vec3::ZERO).then(|| vec![self.normal.to_array(); positions.len()]);
        let uvs = theme
            .filter(|theme| self.appearance.texture_target_definition_for_theme(theme, front).is_some())
            .map(|theme| {
                self.tex_coords_for_theme(theme, front)
                    .into_iter()
                    .map(TexCoord::to_array)
                    .collect()
            });
        PolygonMesh::with_attributes(positions, self.indices.clone(), uvs, normals)
    }
}

impl fmt::Debug for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polygon")
            .field("id", &self.id)
            .field("exterior_ring", &self.exterior_ring)
            .field("interior_rings", &self.interior_rings)
            .field("neg_normal", &self.neg_normal)
            .field("finished", &self.finished)
            .field("vertices", &self.vertices)
            .field("indices", &self.indices)
            .field("appearance", &self.appearance)
            .field("has_logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

/// Triangles `(i, i + 1, i + 2)` over `vertex_count` vertices; nothing below 3.
#[allow(clippy::cast_possible_truncation)]
fn fan_indices(vertex_count: usize) -> Vec<u32> {
    if vertex_count < 3 {
        return Vec::new();
    }
    (0..vertex_count - 2)
        .flat_map(|i| {
            let i = i as u32;
            [i, i + 1, i + 2]
        })
        .collect()
}

/// Finishes every polygon in `polygons` with the settings of `ctx`.
///
/// A failing polygon does not stop the batch: every polygon is finished and
/// the failures come back as `(index, error)` pairs in input order. Each one is
/// also logged as an error through `ctx`'s logger.
///
/// With the `parallel` feature the batch is spread over the rayon pool, each
/// worker with its own tesselator built with `ctx`'s tolerance.
#[must_use]
pub fn finish_all(polygons: &mut [Polygon], ctx: &mut BuildContext) -> Vec<(usize, GeomError)> {
    log::debug!(target: LOG_TARGET, "finishing {} polygons", polygons.len());
    let failures = finish_batch(polygons, ctx);
    for (index, err) in &failures {
        crate::citygml_log_error!(
            ctx.logger(),
            "Failed to finish Polygon with id '{}': {}",
            polygons[*index].id(),
            err
        );
    }
    failures
}

#[cfg(feature = "parallel")]
fn finish_batch(polygons: &mut [Polygon], ctx: &BuildContext) -> Vec<(usize, GeomError)> {
    use rayon::prelude::*;

    use super::tesselator::EarClipTesselator;

    let options = ctx.options;
    let tolerance = ctx.tesselator.tolerance();
    let logger = ctx.logger();
    polygons
        .par_iter_mut()
        .enumerate()
        .map_init(
            || EarClipTesselator::with_tolerance(tolerance),
            |tesselator, (index, polygon)| {
                polygon
                    .finish(options.tesselate, tesselator, options.optimize, logger)
                    .err()
                    .map(|err| (index, err))
            },
        )
        .flatten()
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn finish_batch(polygons: &mut [Polygon], ctx: &mut BuildContext) -> Vec<(usize, GeomError)> {
    polygons
        .iter_mut()
        .enumerate()
        .filter_map(|(index, polygon)| polygon.finish_with_context(ctx).err().map(|err| (index, err)))
        .collect()
}
