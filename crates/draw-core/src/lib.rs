//! draw-core - backend-agnostic drawing layer for window-manager bars and
//! menus.
//!
//! Owns an off-screen ARGB pixmap, a color-scheme table, and a
//! priority-ordered font chain with lazy fallback acquisition, and renders
//! single-line UTF-8 text into a pixel budget with ellipsis truncation.
//! Font loading/matching and window presentation are collaborator traits;
//! backends implement them, the core never talks to a platform directly.

pub mod color;
pub mod config;
pub mod constants;
pub mod drawing;
pub mod dummy_backend;
pub mod error;
pub mod font;
pub mod text;
pub mod traits;
pub mod utf8;

// Re-export main types
pub use color::{Color, ColorScheme, SchemeRole};
pub use config::DrawConfig;
pub use drawing::DrawSurface;
pub use error::{DrawError, DrawResult};
pub use font::{FontChain, FontPattern, SystemFontSystem};
pub use text::{Geometry, Mode};

// Re-export traits and types
pub use traits::*;
