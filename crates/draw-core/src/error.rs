// src/error.rs
use thiserror::Error;

/// Error hierarchy for the drawing core.
///
/// Font-load failures are non-fatal per font (the chain just omits the
/// entry); configuration errors such as a misbuilt chain or a bad color
/// scheme are unrecoverable and callers are expected to abort on them.
#[derive(Error, Debug)]
pub enum DrawError {
    // Font loading and matching
    #[error("cannot load font '{name}'")]
    FontLoad { name: String },

    #[error("refusing color font '{name}'")]
    ColorFont { name: String },

    #[error("no font in the set could be loaded")]
    NoFontLoaded,

    #[error("the first font in the chain must be loaded from a font name")]
    ChainMisconfigured,

    // Color scheme construction
    #[error("cannot parse color '{name}'")]
    ColorParse { name: String },

    #[error("a color scheme needs at least two colors, got {count}")]
    SchemeTooSmall { count: usize },

    // Font file access
    #[error("font i/o error: {source}")]
    FontIo {
        #[from]
        source: std::io::Error,
    },
}

pub type DrawResult<T> = Result<T, DrawError>;
