//! The font chain: ordered owned faces with coverage lookup and extent
//! measurement.

use std::collections::HashSet;

use crate::error::{DrawError, DrawResult};
use crate::font::FontPattern;
use crate::traits::{Face, FontSystem, OpenedFace, RasterGlyph};
use crate::utf8;

/// One loaded font in the chain: a face at a fixed pixel size plus the
/// descriptor it was loaded from. Only name-loaded fonts carry an origin
/// pattern; fallback queries are cloned from the chain head's.
pub struct LoadedFont {
    face: Box<dyn Face>,
    family: String,
    size: f32,
    ascent: u32,
    height: u32,
    origin: Option<FontPattern>,
}

impl LoadedFont {
    /// Wrap an opened face, rejecting color faces. Color glyphs render
    /// corrupted on this backend, so they are refused outright rather than
    /// drawn wrong.
    pub(crate) fn from_opened(
        opened: OpenedFace,
        size: f32,
        origin: Option<FontPattern>,
    ) -> DrawResult<Self> {
        if opened.face.is_color() {
            return Err(DrawError::ColorFont {
                name: opened.pattern.family.clone(),
            });
        }
        let ascent = opened.face.ascent();
        let height = ascent + opened.face.descent();
        Ok(Self {
            face: opened.face,
            family: opened.pattern.family,
            size,
            ascent,
            height,
            origin,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Fixed line height: ascent + descent.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn ascent(&self) -> u32 {
        self.ascent
    }

    pub fn origin(&self) -> Option<&FontPattern> {
        self.origin.as_ref()
    }

    pub fn covers(&self, cp: u32) -> bool {
        self.face.glyph_exists(cp)
    }

    pub fn advance(&self, cp: u32) -> u32 {
        self.face.advance(cp)
    }

    pub fn rasterize(&self, cp: u32) -> RasterGlyph {
        self.face.rasterize(cp)
    }

    /// Measure any byte prefix of a larger string: width is the sum of
    /// per-code-point advances of `bytes` decoded as UTF-8, height the
    /// fixed line height. Bytes that are not a sequence start count one
    /// replacement glyph each.
    pub fn measure(&self, bytes: &[u8]) -> (u32, u32) {
        let mut width = 0u32;
        let mut rest = bytes;
        while !rest.is_empty() {
            let (cp, consumed) = utf8::decode(rest);
            let step = consumed.max(1);
            width += self.face.advance(cp);
            rest = &rest[step..];
        }
        (width, self.height)
    }
}

/// Priority-ordered chain of owned fonts. Index 0 is the head (highest
/// priority); fallback fonts are appended at the tail and never preempt
/// earlier entries. Teardown is the reverse-order `Vec` drop.
pub struct FontChain {
    fonts: Vec<LoadedFont>,
    /// Code points fallback resolution already failed for; the resolver is
    /// consulted at most once per distinct code point per chain lifetime.
    unresolved: HashSet<u32>,
}

impl FontChain {
    /// Load fonts by name in caller priority order: `names[0]` becomes the
    /// chain head. Individual load failures are logged and the name is
    /// omitted; only a fully empty result is an error.
    pub fn from_names(
        fs: &mut dyn FontSystem,
        names: &[&str],
        size: f32,
    ) -> DrawResult<Self> {
        let mut fonts = Vec::with_capacity(names.len());
        for name in names {
            // The parsed name, not the matched face's own descriptor,
            // drives later fallback queries; matching from the face's
            // descriptor loses the substitution behaviour and yields
            // missing-glyph boxes instead of fallbacks.
            let origin = FontPattern::parse(name, size);
            let loaded = fs
                .open_by_name(name, origin.size)
                .and_then(|opened| LoadedFont::from_opened(opened, origin.size, Some(origin)));
            match loaded {
                Ok(font) => fonts.push(font),
                Err(e) => tracing::warn!("skipping font '{name}': {e}"),
            }
        }
        if fonts.is_empty() {
            return Err(DrawError::NoFontLoaded);
        }
        Ok(Self {
            fonts,
            unresolved: HashSet::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn get(&self, index: usize) -> &LoadedFont {
        &self.fonts[index]
    }

    pub fn head(&self) -> &LoadedFont {
        &self.fonts[0]
    }

    /// Line height of the head font; callers size bars and menu rows off
    /// this.
    pub fn height(&self) -> u32 {
        self.head().height()
    }

    /// Index of the first font covering `cp`, in priority order.
    pub fn font_for(&self, cp: u32) -> Option<usize> {
        self.fonts.iter().position(|f| f.covers(cp))
    }

    /// Build a chain from already-loaded fonts, in priority order.
    pub(crate) fn from_fonts(fonts: Vec<LoadedFont>) -> Self {
        Self {
            fonts,
            unresolved: HashSet::new(),
        }
    }

    /// Append a fallback font at the tail (lowest priority).
    pub(crate) fn push(&mut self, font: LoadedFont) -> usize {
        self.fonts.push(font);
        self.fonts.len() - 1
    }

    pub(crate) fn mark_unresolved(&mut self, cp: u32) {
        self.unresolved.insert(cp);
    }

    pub(crate) fn is_unresolved(&self, cp: u32) -> bool {
        self.unresolved.contains(&cp)
    }
}
