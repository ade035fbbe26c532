//! Collaborator seams: loaded faces, the font-matching system, and the
//! presentation side a surface maps onto. Backends implement these; the
//! core never talks to a font or window system directly.

use crate::error::DrawResult;
use crate::font::FontPattern;

/// One rasterized glyph. `left` and `top` position the bitmap relative to
/// the pen: `left` shifts right of the pen, `top` is rows above the
/// baseline. Coverage is one byte per pixel, row-major.
pub struct RasterGlyph {
    pub bitmap: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
}

/// A loaded typeface at a fixed pixel size.
pub trait Face {
    /// True iff the face maps `cp` to a real glyph.
    fn glyph_exists(&self, cp: u32) -> bool;

    /// Horizontal advance for `cp` in whole pixels. Unmapped code points
    /// report the missing-glyph advance; this never fails.
    fn advance(&self, cp: u32) -> u32;

    fn ascent(&self) -> u32;
    fn descent(&self) -> u32;

    /// Whether the face carries color glyph tables. Color faces are
    /// rejected by the font cache.
    fn is_color(&self) -> bool;

    fn rasterize(&self, cp: u32) -> RasterGlyph;
}

/// A face handed back by the font system together with the descriptor it
/// was opened from.
pub struct OpenedFace {
    pub face: Box<dyn Face>,
    pub pattern: FontPattern,
}

/// The font-matching collaborator: opens faces by name or by matched
/// pattern and answers best-match queries for fallback resolution.
pub trait FontSystem {
    fn open_by_name(&mut self, name: &str, size: f32) -> DrawResult<OpenedFace>;

    fn open_by_pattern(&mut self, pattern: &FontPattern, size: f32) -> DrawResult<OpenedFace>;

    /// Best match for a fallback query, or `None` when nothing plausibly
    /// satisfies it.
    fn match_pattern(&mut self, query: &FontPattern) -> Option<FontPattern>;
}

/// Destination for the copy-to-window presentation call. `pixels` is the
/// full surface in 0xAARRGGBB, `stride` its width; the rectangle selects
/// the region to present at the same position in the target.
pub trait PresentTarget {
    fn present(&mut self, pixels: &[u32], stride: u32, x: i32, y: i32, w: u32, h: u32);
}
