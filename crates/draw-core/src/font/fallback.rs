//! Dynamic fallback resolution: when no chained font covers a code point,
//! synthesize a query from the chain head's origin pattern and ask the font
//! system for a substitute.

use crate::error::{DrawError, DrawResult};
use crate::font::cache::{FontChain, LoadedFont};
use crate::traits::FontSystem;

/// Try to acquire a fallback font covering `cp`.
///
/// On success the font is appended at the chain tail (lowest priority) and
/// its index returned. `None` means no usable font: a match that failed to
/// open, opened without the glyph, or no match at all. The miss is memoized
/// so the font system is queried at most once per distinct code point per
/// chain lifetime; the caller renders the code point with the chain head
/// regardless, so something is always drawn.
///
/// The chain head must have been loaded by name; a head without an origin
/// pattern is a configuration error the caller should treat as fatal.
pub fn resolve(
    chain: &mut FontChain,
    fs: &mut dyn FontSystem,
    cp: u32,
) -> DrawResult<Option<usize>> {
    if chain.is_unresolved(cp) {
        return Ok(None);
    }

    let head = chain.head();
    let origin = head.origin().ok_or(DrawError::ChainMisconfigured)?;
    let size = head.size();

    let mut query = origin.clone();
    query.charset = vec![cp];
    query.scalable = true;
    query.color = Some(false);

    let Some(best) = fs.match_pattern(&query) else {
        tracing::debug!("no fallback match for U+{cp:04X}");
        chain.mark_unresolved(cp);
        return Ok(None);
    };

    let opened = match fs.open_by_pattern(&best, size) {
        Ok(opened) => opened,
        Err(e) => {
            tracing::warn!("fallback match for U+{cp:04X} failed to open: {e}");
            chain.mark_unresolved(cp);
            return Ok(None);
        }
    };

    // Fallback fonts carry no origin pattern; queries always clone the head's.
    match LoadedFont::from_opened(opened, size, None) {
        Ok(font) if font.covers(cp) => {
            tracing::debug!("fallback '{}' appended for U+{cp:04X}", font.family());
            Ok(Some(chain.push(font)))
        }
        Ok(font) => {
            // Matched but glyph-incomplete: discard and let the head draw
            // its missing-glyph box.
            tracing::debug!("fallback '{}' lacks U+{cp:04X}, discarded", font.family());
            chain.mark_unresolved(cp);
            Ok(None)
        }
        Err(e) => {
            tracing::debug!("fallback for U+{cp:04X} rejected: {e}");
            chain.mark_unresolved(cp);
            Ok(None)
        }
    }
}
