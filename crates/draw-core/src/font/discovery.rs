//! System font discovery: the production [`FontSystem`] backed by fontdue
//! and platform font-directory scanning.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{DrawError, DrawResult};
use crate::font::FontPattern;
use crate::traits::{Face, FontSystem, OpenedFace, RasterGlyph};

/// fontdue-backed face at a fixed pixel size.
struct FontdueFace {
    font: fontdue::Font,
    size: f32,
    ascent: u32,
    descent: u32,
}

impl FontdueFace {
    fn new(font: fontdue::Font, size: f32) -> Self {
        let (ascent, descent) = match font.horizontal_line_metrics(size) {
            Some(m) => (
                m.ascent.round().max(0.0) as u32,
                (-m.descent).round().max(0.0) as u32,
            ),
            // No horizontal metrics: approximate the line box from the size.
            None => (size.round() as u32, 0),
        };
        Self {
            font,
            size,
            ascent,
            descent,
        }
    }

    fn to_char(cp: u32) -> char {
        char::from_u32(cp).unwrap_or('\u{FFFD}')
    }
}

impl Face for FontdueFace {
    fn glyph_exists(&self, cp: u32) -> bool {
        self.font.lookup_glyph_index(Self::to_char(cp)) != 0
    }

    fn advance(&self, cp: u32) -> u32 {
        // Unmapped code points resolve to glyph 0 and report the
        // missing-glyph advance.
        let metrics = self.font.metrics(Self::to_char(cp), self.size);
        metrics.advance_width.round().max(0.0) as u32
    }

    fn ascent(&self) -> u32 {
        self.ascent
    }

    fn descent(&self) -> u32 {
        self.descent
    }

    fn is_color(&self) -> bool {
        // fontdue only parses outline tables; color-glyph fonts either fail
        // to load or surface here without their color data.
        false
    }

    fn rasterize(&self, cp: u32) -> RasterGlyph {
        let (metrics, bitmap) = self.font.rasterize(Self::to_char(cp), self.size);
        RasterGlyph {
            bitmap,
            width: metrics.width as u32,
            height: metrics.height as u32,
            left: metrics.xmin,
            top: metrics.height as i32 + metrics.ymin,
        }
    }
}

#[derive(Clone)]
struct IndexedFont {
    family: String,
    path: PathBuf,
}

/// Production font system: scans platform font directories, opens faces
/// with fontdue, and answers fallback queries by glyph coverage.
pub struct SystemFontSystem {
    search_paths: Vec<PathBuf>,
    index: Option<Vec<IndexedFont>>,
    loaded: HashMap<PathBuf, fontdue::Font>,
}

impl Default for SystemFontSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemFontSystem {
    pub fn new() -> Self {
        Self::with_search_paths(default_search_paths())
    }

    pub fn with_search_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths: paths,
            index: None,
            loaded: HashMap::new(),
        }
    }

    fn ensure_index(&mut self) {
        if self.index.is_some() {
            return;
        }
        let mut index = Vec::new();
        for search_path in &self.search_paths {
            scan_dir(search_path, &mut index);
        }
        tracing::debug!("indexed {} font files", index.len());
        self.index = Some(index);
    }

    fn load(&mut self, path: &Path) -> DrawResult<fontdue::Font> {
        if let Some(font) = self.loaded.get(path) {
            return Ok(font.clone());
        }
        let data = std::fs::read(path)?;
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|_| DrawError::FontLoad {
                name: path.display().to_string(),
            })?;
        self.loaded.insert(path.to_path_buf(), font.clone());
        Ok(font)
    }

    fn entries(&mut self) -> Vec<IndexedFont> {
        self.ensure_index();
        self.index.clone().unwrap_or_default()
    }
}

impl FontSystem for SystemFontSystem {
    fn open_by_name(&mut self, name: &str, size: f32) -> DrawResult<OpenedFace> {
        let pattern = FontPattern::parse(name, size);
        let wanted = pattern.family.to_lowercase();
        let entry = self
            .entries()
            .into_iter()
            .find(|e| {
                let family = e.family.to_lowercase();
                family == wanted || family.contains(&wanted)
            })
            .ok_or_else(|| DrawError::FontLoad {
                name: name.to_string(),
            })?;
        let font = self.load(&entry.path)?;
        Ok(OpenedFace {
            face: Box::new(FontdueFace::new(font, pattern.size)),
            pattern,
        })
    }

    fn open_by_pattern(&mut self, pattern: &FontPattern, size: f32) -> DrawResult<OpenedFace> {
        let font = match &pattern.file {
            Some(path) => self.load(path)?,
            None => return self.open_by_name(&pattern.family, size),
        };
        Ok(OpenedFace {
            face: Box::new(FontdueFace::new(font, size)),
            pattern: pattern.clone(),
        })
    }

    fn match_pattern(&mut self, query: &FontPattern) -> Option<FontPattern> {
        let wanted = query.family.to_lowercase();
        let mut best: Option<(i32, IndexedFont)> = None;

        for entry in self.entries() {
            let Ok(font) = self.load(&entry.path) else {
                continue;
            };
            let covers_all = query.charset.iter().all(|&cp| {
                font.lookup_glyph_index(FontdueFace::to_char(cp)) != 0
            });
            if !covers_all {
                continue;
            }
            // Prefer the queried family, then anything at all.
            let mut score = 0;
            if entry.family.to_lowercase().contains(&wanted) {
                score += 100;
            }
            if best.as_ref().map(|(s, _)| score > *s).unwrap_or(true) {
                best = Some((score, entry));
            }
        }

        best.map(|(_, entry)| FontPattern {
            family: entry.family,
            size: query.size,
            charset: query.charset.clone(),
            scalable: true,
            color: Some(false),
            file: Some(entry.path),
        })
    }
}

fn scan_dir(dir: &Path, index: &mut Vec<IndexedFont>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(&path, index);
        } else if is_font_file(&path) {
            let family = path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            index.push(IndexedFont { family, path });
        }
    }
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ttf") | Some("otf")
    )
}

fn default_search_paths() -> Vec<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let mut paths = vec![
            PathBuf::from("/usr/share/fonts"),
            PathBuf::from("/usr/local/share/fonts"),
        ];
        if let Ok(home) = std::env::var("HOME") {
            paths.push(PathBuf::from(home).join(".fonts"));
        }
        paths
    }

    #[cfg(target_os = "macos")]
    {
        vec![
            PathBuf::from("/System/Library/Fonts"),
            PathBuf::from("/Library/Fonts"),
        ]
    }

    #[cfg(target_os = "windows")]
    {
        vec![PathBuf::from("C:\\Windows\\Fonts")]
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}
