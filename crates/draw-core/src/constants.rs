// src/constants.rs

pub const DEFAULT_FONT_FAMILY: &str = "monospace";
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Default scheme roles: foreground, background, border.
pub const DEFAULT_FG: &str = "#bbbbbb";
pub const DEFAULT_BG: &str = "#222222";
pub const DEFAULT_BORDER: &str = "#444444";
