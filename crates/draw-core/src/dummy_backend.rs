//! Recording/synthetic collaborators for headless tests: fixed-metric faces
//! with scripted coverage, a scriptable font system, and a present target
//! that records what was mapped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{DrawError, DrawResult};
use crate::font::FontPattern;
use crate::traits::{Face, FontSystem, OpenedFace, PresentTarget, RasterGlyph};

/// Fixed-advance synthetic face. Coverage is a list of inclusive code point
/// ranges; every glyph rasterizes to a solid box and is logged, so tests
/// can assert exactly which code points were painted.
#[derive(Clone)]
pub struct DummyFace {
    pub advance: u32,
    pub ascent: u32,
    pub descent: u32,
    pub color: bool,
    coverage: Vec<(u32, u32)>,
    painted: Arc<Mutex<Vec<u32>>>,
}

impl DummyFace {
    pub fn new(advance: u32, ascent: u32, descent: u32) -> Self {
        Self {
            advance,
            ascent,
            descent,
            color: false,
            coverage: Vec::new(),
            painted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Inclusive code point ranges this face claims glyphs for.
    pub fn with_coverage(mut self, ranges: &[(u32, u32)]) -> Self {
        self.coverage = ranges.to_vec();
        self
    }

    /// Shared log of rasterized code points, in paint order. Clones of this
    /// face (e.g. the one handed to a chain) share the same log.
    pub fn painted(&self) -> Arc<Mutex<Vec<u32>>> {
        Arc::clone(&self.painted)
    }
}

impl Face for DummyFace {
    fn glyph_exists(&self, cp: u32) -> bool {
        self.coverage.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
    }

    fn advance(&self, _cp: u32) -> u32 {
        self.advance
    }

    fn ascent(&self) -> u32 {
        self.ascent
    }

    fn descent(&self) -> u32 {
        self.descent
    }

    fn is_color(&self) -> bool {
        self.color
    }

    fn rasterize(&self, cp: u32) -> RasterGlyph {
        self.painted.lock().unwrap().push(cp);
        let (w, h) = (self.advance, self.ascent + self.descent);
        RasterGlyph {
            bitmap: vec![0xFF; (w * h) as usize],
            width: w,
            height: h,
            left: 0,
            top: self.ascent as i32,
        }
    }
}

/// Scriptable font system: faces are registered by family name;
/// `match_result` names the family every fallback query resolves to (or
/// `None` for no match). All match queries are recorded.
#[derive(Default)]
pub struct DummyFontSystem {
    faces: HashMap<String, DummyFace>,
    pub match_result: Option<String>,
    pub match_queries: Vec<FontPattern>,
    pub pattern_opens: Vec<String>,
}

impl DummyFontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, family: &str, face: DummyFace) {
        self.faces.insert(family.to_string(), face);
    }
}

impl FontSystem for DummyFontSystem {
    fn open_by_name(&mut self, name: &str, size: f32) -> DrawResult<OpenedFace> {
        let pattern = FontPattern::parse(name, size);
        let face = self
            .faces
            .get(&pattern.family)
            .cloned()
            .ok_or_else(|| DrawError::FontLoad {
                name: name.to_string(),
            })?;
        Ok(OpenedFace {
            face: Box::new(face),
            pattern,
        })
    }

    fn open_by_pattern(&mut self, pattern: &FontPattern, _size: f32) -> DrawResult<OpenedFace> {
        self.pattern_opens.push(pattern.family.clone());
        let face = self
            .faces
            .get(&pattern.family)
            .cloned()
            .ok_or_else(|| DrawError::FontLoad {
                name: pattern.family.clone(),
            })?;
        Ok(OpenedFace {
            face: Box::new(face),
            pattern: pattern.clone(),
        })
    }

    fn match_pattern(&mut self, query: &FontPattern) -> Option<FontPattern> {
        self.match_queries.push(query.clone());
        self.match_result.as_ref().map(|family| FontPattern {
            family: family.clone(),
            size: query.size,
            charset: query.charset.clone(),
            scalable: true,
            color: Some(false),
            file: None,
        })
    }
}

/// Present target that records mapped regions and keeps the last frame.
#[derive(Default)]
pub struct DummyPresentTarget {
    pub presents: Vec<(i32, i32, u32, u32)>,
    pub frame: Vec<u32>,
    pub stride: u32,
}

impl DummyPresentTarget {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresentTarget for DummyPresentTarget {
    fn present(&mut self, pixels: &[u32], stride: u32, x: i32, y: i32, w: u32, h: u32) {
        self.presents.push((x, y, w, h));
        self.frame = pixels.to_vec();
        self.stride = stride;
    }
}
