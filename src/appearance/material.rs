use super::{Appearance, AppearanceInfo};

/// X3D-style material.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    info: AppearanceInfo,
    pub diffuse: [f64; 3],
    pub emissive: [f64; 3],
    pub specular: [f64; 3],
    pub ambient_intensity: f64,
    pub shininess: f64,
    pub transparency: f64,
    pub is_smooth: bool,
}

impl Material {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            info: AppearanceInfo::new(id),
            diffuse: [0.8, 0.8, 0.8],
            emissive: [0.0, 0.0, 0.0],
            specular: [1.0, 1.0, 1.0],
            ambient_intensity: 0.2,
            shininess: 0.2,
            transparency: 0.0,
            is_smooth: false,
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.info.themes.push(theme.into());
        self
    }

    #[must_use]
    pub fn with_front(mut self, is_front: bool) -> Self {
        self.info.is_front = is_front;
        self
    }

    #[must_use]
    pub fn with_diffuse(mut self, diffuse: [f64; 3]) -> Self {
        self.diffuse = diffuse;
        self
    }

    #[must_use]
    pub fn with_transparency(mut self, transparency: f64) -> Self {
        self.transparency = transparency.clamp(0.0, 1.0);
        self
    }
}

impl Appearance for Material {
    fn info(&self) -> &AppearanceInfo {
        &self.info
    }
}
