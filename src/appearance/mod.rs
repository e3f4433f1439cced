//! Materials, textures and the per-polygon tables that bind them to themes.
//!
//! Appearance objects are shared (`Arc`) between every target definition and
//! polygon that uses them. Target definitions point at appearances, never the
//! other way round.

mod material;
mod target;
mod texture;

pub use material::Material;
pub use target::{
    AppearanceTarget, MaterialTargetDefinition, TextureCoordinates, TextureTargetDefinition,
};
pub use texture::{Texture, WrapMode};

/// Identity shared by every appearance kind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppearanceInfo {
    pub id: String,
    pub themes: Vec<String>,
    /// `true` when the appearance applies to the front face, `false` for the back face.
    pub is_front: bool,
}

impl AppearanceInfo {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            themes: Vec::new(),
            is_front: true,
        }
    }
}

pub trait Appearance {
    fn info(&self) -> &AppearanceInfo;

    fn id(&self) -> &str {
        &self.info().id
    }

    fn themes(&self) -> &[String] {
        &self.info().themes
    }

    fn is_front(&self) -> bool {
        self.info().is_front
    }
}
