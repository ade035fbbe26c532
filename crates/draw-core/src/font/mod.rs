//! Font chain with lazy fallback acquisition.
//!
//! A chain is a priority-ordered list of loaded faces; index order is
//! glyph-selection priority. Fallback faces discovered during rendering are
//! appended at the tail and live for the chain's lifetime.

pub mod cache;
pub mod discovery;
pub mod fallback;

pub use cache::{FontChain, LoadedFont};
pub use discovery::SystemFontSystem;
pub use fallback::resolve;

/// A font-matching descriptor: what `open_by_name` parses from a font name
/// and what fallback queries are synthesized from. The charset lists code
/// points a match must cover.
#[derive(Clone, Debug, PartialEq)]
pub struct FontPattern {
    pub family: String,
    pub size: f32,
    pub charset: Vec<u32>,
    pub scalable: bool,
    /// `Some(false)` forbids color faces; `None` leaves it to the matcher.
    pub color: Option<bool>,
    /// Concrete font file, filled in by the matcher where known.
    pub file: Option<std::path::PathBuf>,
}

impl FontPattern {
    /// Parse a font name of the form `family` or `family:size=N`,
    /// fontconfig-style. Unrecognized properties are ignored.
    pub fn parse(name: &str, default_size: f32) -> Self {
        let mut parts = name.split(':');
        let family = parts.next().unwrap_or("").trim().to_string();
        let mut size = default_size;
        for prop in parts {
            if let Some(v) = prop.trim().strip_prefix("size=") {
                if let Ok(s) = v.parse::<f32>() {
                    size = s;
                }
            }
        }
        Self {
            family,
            size,
            charset: Vec::new(),
            scalable: false,
            color: None,
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_family() {
        let p = FontPattern::parse("DejaVu Sans Mono", 12.0);
        assert_eq!(p.family, "DejaVu Sans Mono");
        assert_eq!(p.size, 12.0);
    }

    #[test]
    fn parse_family_with_size() {
        let p = FontPattern::parse("monospace:size=10.5", 12.0);
        assert_eq!(p.family, "monospace");
        assert_eq!(p.size, 10.5);
    }

    #[test]
    fn parse_ignores_unknown_properties() {
        let p = FontPattern::parse("Hack:style=Regular:size=9", 12.0);
        assert_eq!(p.family, "Hack");
        assert_eq!(p.size, 9.0);
    }
}
