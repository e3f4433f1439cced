use std::collections::HashMap;
use std::sync::Arc;

use super::{Appearance, Material, Texture};
use crate::geom::{LinearRing, TexCoord};

// ============================================================================
// Texture coordinates
// ============================================================================

/// Texture coordinates for exactly one ring, one entry per ring vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureCoordinates {
    id: String,
    target_ring_id: String,
    coords: Vec<TexCoord>,
}

impl TextureCoordinates {
    #[must_use]
    pub fn new(id: impl Into<String>, target_ring_id: impl Into<String>, coords: Vec<TexCoord>) -> Self {
        Self {
            id: id.into(),
            target_ring_id: target_ring_id.into(),
            coords,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn target_ring_id(&self) -> &str {
        &self.target_ring_id
    }

    #[must_use]
    pub fn coords(&self) -> &[TexCoord] {
        &self.coords
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[must_use]
    pub fn targets(&self, ring: &LinearRing) -> bool {
        self.target_ring_id == ring.id()
    }

    /// Removes the coordinate at `index`. Returns `false` when out of range.
    pub fn erase(&mut self, index: usize) -> bool {
        if index < self.coords.len() {
            self.coords.remove(index);
            true
        } else {
            false
        }
    }
}

// ============================================================================
// Target definitions
// ============================================================================

/// Binds a texture to one polygon, with per-ring coordinates.
#[derive(Debug, Clone)]
pub struct TextureTargetDefinition {
    target_id: String,
    appearance: Arc<Texture>,
    coordinates: Vec<TextureCoordinates>,
}

impl TextureTargetDefinition {
    #[must_use]
    pub fn new(target_id: impl Into<String>, appearance: Arc<Texture>) -> Self {
        Self {
            target_id: target_id.into(),
            appearance,
            coordinates: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_coordinates(mut self, coordinates: TextureCoordinates) -> Self {
        self.coordinates.push(coordinates);
        self
    }

    pub fn add_texture_coordinates(&mut self, coordinates: TextureCoordinates) {
        self.coordinates.push(coordinates);
    }

    #[must_use]
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    #[must_use]
    pub fn appearance(&self) -> &Arc<Texture> {
        &self.appearance
    }

    #[must_use]
    pub fn texture_coordinates_count(&self) -> usize {
        self.coordinates.len()
    }

    #[must_use]
    pub fn texture_coordinates(&self) -> &[TextureCoordinates] {
        &self.coordinates
    }

    pub fn texture_coordinates_mut(&mut self) -> &mut [TextureCoordinates] {
        &mut self.coordinates
    }

    #[must_use]
    pub fn texture_coordinates_for_ring_id(&self, ring_id: &str) -> Option<&TextureCoordinates> {
        self.coordinates
            .iter()
            .find(|coords| coords.target_ring_id() == ring_id)
    }
}

/// Binds a material to one polygon.
#[derive(Debug, Clone)]
pub struct MaterialTargetDefinition {
    target_id: String,
    appearance: Arc<Material>,
}

impl MaterialTargetDefinition {
    #[must_use]
    pub fn new(target_id: impl Into<String>, appearance: Arc<Material>) -> Self {
        Self {
            target_id: target_id.into(),
            appearance,
        }
    }

    #[must_use]
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    #[must_use]
    pub fn appearance(&self) -> &Arc<Material> {
        &self.appearance
    }
}

// ============================================================================
// Lookup by (theme, side)
// ============================================================================

#[derive(Debug, Clone, Default)]
struct ThemeIndex {
    front: HashMap<String, usize>,
    back: HashMap<String, usize>,
}

impl ThemeIndex {
    fn side(&self, front: bool) -> &HashMap<String, usize> {
        if front { &self.front } else { &self.back }
    }

    fn get(&self, theme: &str, front: bool) -> Option<usize> {
        self.side(front).get(theme).copied()
    }

    fn insert(&mut self, theme: &str, front: bool, index: usize) {
        let side = if front { &mut self.front } else { &mut self.back };
        side.insert(theme.to_owned(), index);
    }

    fn themes(&self, front: bool) -> Vec<String> {
        let mut themes: Vec<String> = self.side(front).keys().cloned().collect();
        themes.sort();
        themes
    }
}

/// Owns the texture and material target definitions of one polygon.
///
/// A definition is registered under every theme of its appearance, on the
/// side the appearance declares. Registering a second definition for the
/// same (theme, side) replaces the lookup entry; the earlier definition stays
/// in [`Self::texture_target_definitions`] so its coordinates keep following
/// ring edits.
#[derive(Debug, Clone, Default)]
pub struct AppearanceTarget {
    texture_targets: Vec<TextureTargetDefinition>,
    material_targets: Vec<MaterialTargetDefinition>,
    texture_index: ThemeIndex,
    material_index: ThemeIndex,
}

impl AppearanceTarget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_texture_target_definition(&mut self, definition: TextureTargetDefinition) {
        let index = self.texture_targets.len();
        let front = definition.appearance().is_front();
        for theme in definition.appearance().themes() {
            self.texture_index.insert(theme, front, index);
        }
        self.texture_targets.push(definition);
    }

    pub fn add_material_target_definition(&mut self, definition: MaterialTargetDefinition) {
        let index = self.material_targets.len();
        let front = definition.appearance().is_front();
        for theme in definition.appearance().themes() {
            self.material_index.insert(theme, front, index);
        }
        self.material_targets.push(definition);
    }

    #[must_use]
    pub fn texture_target_definition_for_theme(
        &self,
        theme: &str,
        front: bool,
    ) -> Option<&TextureTargetDefinition> {
        self.texture_index
            .get(theme, front)
            .and_then(|index| self.texture_targets.get(index))
    }

    #[must_use]
    pub fn material_target_definition_for_theme(
        &self,
        theme: &str,
        front: bool,
    ) -> Option<&MaterialTargetDefinition> {
        self.material_index
            .get(theme, front)
            .and_then(|index| self.material_targets.get(index))
    }

    #[must_use]
    pub fn texture_target_definitions(&self) -> &[TextureTargetDefinition] {
        &self.texture_targets
    }

    pub fn texture_target_definitions_mut(&mut self) -> &mut [TextureTargetDefinition] {
        &mut self.texture_targets
    }

    #[must_use]
    pub fn material_target_definitions(&self) -> &[MaterialTargetDefinition] {
        &self.material_targets
    }

    /// Sorted themes that have a texture on the requested side.
    #[must_use]
    pub fn all_texture_themes(&self, front: bool) -> Vec<String> {
        self.texture_index.themes(front)
    }

    /// Sorted themes that have a material on the requested side.
    #[must_use]
    pub fn all_material_themes(&self, front: bool) -> Vec<String> {
        self.material_index.themes(front)
    }
}
