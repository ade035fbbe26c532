// src/config.rs
use crate::constants::{DEFAULT_BG, DEFAULT_BORDER, DEFAULT_FG, DEFAULT_FONT_FAMILY,
                      DEFAULT_FONT_SIZE};

/// Static configuration for a drawing surface: the font names tried in
/// priority order (the first loadable one becomes the chain head) and the
/// color names for the default scheme.
#[derive(Clone, Debug)]
pub struct DrawConfig {
    pub font_names: Vec<String>,
    pub font_size: f32,
    pub fg: String,
    pub bg: String,
    pub border: String,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            font_names: vec![DEFAULT_FONT_FAMILY.to_string()],
            font_size: DEFAULT_FONT_SIZE,
            fg: DEFAULT_FG.to_string(),
            bg: DEFAULT_BG.to_string(),
            border: DEFAULT_BORDER.to_string(),
        }
    }
}

impl DrawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fonts<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.font_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_colors(mut self, fg: &str, bg: &str) -> Self {
        self.fg = fg.to_string();
        self.bg = bg.to_string();
        self
    }

    pub fn with_border(mut self, border: &str) -> Self {
        self.border = border.to_string();
        self
    }

    /// Scheme color names in role order.
    pub fn scheme_names(&self) -> [&str; 3] {
        [&self.fg, &self.bg, &self.border]
    }
}
