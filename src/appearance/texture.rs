use super::{Appearance, AppearanceInfo};

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    None,
    Wrap,
    Mirror,
    Clamp,
    Border,
}

/// A parameterized image texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    info: AppearanceInfo,
    pub url: String,
    pub repeat: bool,
    pub wrap_mode: WrapMode,
    pub border_color: Option<[f64; 4]>,
}

impl Texture {
    #[must_use]
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            info: AppearanceInfo::new(id),
            url: url.into(),
            repeat: false,
            wrap_mode: WrapMode::None,
            border_color: None,
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
    pub fn with_wrap_mode(mut self, wrap_mode: WrapMode) -> Self {
        self.wrap_mode = wrap_mode;
        self.repeat = matches!(wrap_mode, WrapMode::Wrap | WrapMode::Mirror);
        self
    }
}

impl Appearance for Texture {
    fn info(&self) -> &AppearanceInfo {
        &self.info
    }
}
