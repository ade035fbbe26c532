//! Single-pass text layout and rendering.
//!
//! The engine walks a UTF-8 byte string, groups consecutive code points
//! into runs by which chained font covers them, measures each run against
//! the remaining pixel budget (truncating with an ellipsis when it does not
//! fit), and either paints the run or just accumulates width. Fallback
//! fonts are acquired lazily mid-scan when no chained font covers a code
//! point.

use crate::color::{Color, SchemeRole};
use crate::drawing::{blend, fill_rect, DrawSurface};
use crate::error::DrawResult;
use crate::font::cache::LoadedFont;
use crate::font::fallback;
use crate::traits::FontSystem;
use crate::utf8;

/// Whether a pass paints or only measures. Measure treats the budget as
/// unbounded and touches no pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Measure,
    Render,
}

/// Target box for a render pass: text is laid out from `x` (plus left
/// padding), vertically centered in `h`, and budgeted to `w` pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Geometry {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

impl DrawSurface {
    /// Lay out `text` and either paint it (`Mode::Render`) or measure it
    /// (`Mode::Measure`).
    ///
    /// Returns the accumulated width in measure mode, and the final cursor
    /// position plus the leftover budget in render mode. Requires an active
    /// font chain (and scheme when rendering); without them the call is a
    /// no-op returning 0. Malformed UTF-8 never fails: each bad byte or
    /// sequence renders as the replacement glyph of whatever font is
    /// active.
    pub fn draw_text(
        &mut self,
        fs: &mut dyn FontSystem,
        mode: Mode,
        geom: Geometry,
        left_pad: u32,
        text: &[u8],
        invert: bool,
    ) -> DrawResult<i32> {
        let render = mode == Mode::Render;

        let DrawSurface {
            width: surf_w,
            height: surf_h,
            pixels,
            scheme,
            chain,
        } = self;
        let Some(chain) = chain.as_mut() else {
            return Ok(0);
        };
        let scheme = scheme.as_ref();
        if render && scheme.is_none() {
            return Ok(0);
        }
        if text.is_empty() {
            // Nothing is painted, not even the background fill.
            return Ok(if render {
                geom.x.saturating_add(clamp_w(geom.w))
            } else {
                0
            });
        }

        let mut x = geom.x;
        let y = geom.y;
        let h = geom.h;
        let mut w = if render { geom.w } else { u32::MAX };

        if render {
            if let Some(scm) = scheme {
                let bg_role = if invert { SchemeRole::Fg } else { SchemeRole::Bg };
                let bg = scm.color(bg_role).to_argb();
                fill_rect(pixels, *surf_w, *surf_h, x, y, geom.w, h, bg);
            }
            x = x.saturating_add(left_pad as i32);
            w = w.saturating_sub(left_pad);
        }
        let fg_role = if invert { SchemeRole::Bg } else { SchemeRole::Fg };
        let fg = scheme.map(|scm| scm.color(fg_role));

        let mut used = 0usize;
        let mut rest = text;
        // Set when the stopping code point has no covering font even after
        // fallback; the next scan consumes it with `used` so the pass
        // always makes forward progress.
        let mut force_next = false;
        let mut scratch: Vec<u8> = Vec::new();
        let mut boundaries: Vec<usize> = Vec::new();

        loop {
            let run_all = rest;
            let mut run_len = 0usize;
            boundaries.clear();
            let mut next_font: Option<usize> = None;
            let mut missing: Option<u32> = None;

            while !rest.is_empty() {
                let (cp, consumed) = utf8::decode(rest);
                // Zero consumption marks a byte that is no sequence start;
                // skip it as one replacement glyph.
                let step = consumed.max(1);
                if force_next {
                    force_next = false;
                    run_len += step;
                    boundaries.push(run_len);
                    rest = &rest[step..];
                    continue;
                }
                match chain.font_for(cp) {
                    Some(idx) if idx == used => {
                        run_len += step;
                        boundaries.push(run_len);
                        rest = &rest[step..];
                    }
                    Some(idx) => {
                        next_font = Some(idx);
                        break;
                    }
                    None => {
                        missing = Some(cp);
                        break;
                    }
                }
            }

            if run_len > 0 {
                let run = &run_all[..run_len];
                let font = chain.get(used);
                let (mut ew, _) = font.measure(run);

                // Shorten whole code points until the run fits the budget.
                let mut keep = run_len;
                while keep > 0 && ew > w {
                    boundaries.pop();
                    keep = boundaries.last().copied().unwrap_or(0);
                    if keep > 0 {
                        ew = font.measure(&run[..keep]).0;
                    }
                }

                if keep > 0 {
                    let drawn: &[u8] = if keep < run_len {
                        elide(&mut scratch, &mut boundaries, run, keep);
                        &scratch
                    } else {
                        run
                    };
                    if render {
                        if let Some(fg) = fg {
                            let baseline =
                                y + (h as i32 - font.height() as i32) / 2 + font.ascent() as i32;
                            paint_run(pixels, *surf_w, *surf_h, font, drawn, x, baseline, fg);
                        }
                    }
                    x = x.saturating_add(ew as i32);
                    w -= ew;
                }
            }

            if rest.is_empty() {
                break;
            }
            if let Some(idx) = next_font {
                used = idx;
            } else if let Some(cp) = missing {
                match fallback::resolve(chain, fs, cp)? {
                    Some(idx) => used = idx,
                    None => {
                        // The character is drawn regardless, as the head
                        // font's missing-glyph box.
                        used = 0;
                        force_next = true;
                    }
                }
            }
        }

        Ok(if render { x.saturating_add(clamp_w(w)) } else { x })
    }

    /// Pixel width of `text` with the active font chain; fallback fonts may
    /// be acquired as a side effect, exactly as during rendering.
    pub fn text_width(&mut self, fs: &mut dyn FontSystem, text: &[u8]) -> DrawResult<u32> {
        let w = self.draw_text(fs, Mode::Measure, Geometry::default(), 0, text, false)?;
        Ok(w.max(0) as u32)
    }
}

fn clamp_w(w: u32) -> i32 {
    w.min(i32::MAX as u32) as i32
}

/// Replace the tail of a shortened run with an ellipsis: whole trailing
/// code points are dropped until up to three bytes are free, then filled
/// with dots. The dotted run is never re-measured; the width of the
/// measured prefix stands (known looseness, dots are narrow).
fn elide(scratch: &mut Vec<u8>, boundaries: &mut Vec<usize>, run: &[u8], keep: usize) {
    let dots = keep.min(3);
    let mut prefix = keep;
    while keep - prefix < dots && prefix > 0 {
        boundaries.pop();
        prefix = boundaries.last().copied().unwrap_or(0);
    }
    scratch.clear();
    scratch.extend_from_slice(&run[..prefix]);
    scratch.resize(prefix + dots, b'.');
}

fn paint_run(
    pixels: &mut [u32],
    surf_w: u32,
    surf_h: u32,
    font: &LoadedFont,
    run: &[u8],
    x: i32,
    baseline: i32,
    fg: Color,
) {
    let mut pen = x;
    let mut rest = run;
    while !rest.is_empty() {
        let (cp, consumed) = utf8::decode(rest);
        let step = consumed.max(1);
        let glyph = font.rasterize(cp);
        let gx = pen + glyph.left;
        let gy = baseline - glyph.top;
        for row in 0..glyph.height {
            let py = gy + row as i32;
            if py < 0 || py >= surf_h as i32 {
                continue;
            }
            for col in 0..glyph.width {
                let px = gx + col as i32;
                if px < 0 || px >= surf_w as i32 {
                    continue;
                }
                let cov = glyph.bitmap[(row * glyph.width + col) as usize];
                if cov == 0 {
                    continue;
                }
                let i = (py as u32 * surf_w + px as u32) as usize;
                pixels[i] = blend(pixels[i], fg, cov);
            }
        }
        pen = pen.saturating_add(font.advance(cp) as i32);
        rest = &rest[step..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorScheme;
    use crate::dummy_backend::{DummyFace, DummyFontSystem};
    use crate::font::FontChain;

    const SNOWMAN: u32 = 0x2603;

    /// Alpha covers ASCII at 10px/glyph, Beta covers Latin-1 supplement at
    /// 20px/glyph.
    fn setup() -> (DrawSurface, DummyFontSystem) {
        let mut fs = DummyFontSystem::new();
        fs.insert("Alpha", DummyFace::new(10, 10, 2).with_coverage(&[(0x20, 0x7E)]));
        fs.insert("Beta", DummyFace::new(20, 10, 2).with_coverage(&[(0xA0, 0xFF)]));
        let chain = FontChain::from_names(&mut fs, &["Alpha", "Beta"], 12.0).unwrap();
        let mut surf = DrawSurface::new(200, 20);
        surf.set_font_chain(chain);
        surf.set_scheme(ColorScheme::new(&["#ffffff", "#000000"]).unwrap());
        (surf, fs)
    }

    #[test]
    fn measure_empty_is_zero() {
        let (mut surf, mut fs) = setup();
        assert_eq!(surf.text_width(&mut fs, b"").unwrap(), 0);
    }

    #[test]
    fn measure_sums_run_widths_across_fonts() {
        let (mut surf, mut fs) = setup();
        assert_eq!(surf.text_width(&mut fs, b"ab").unwrap(), 20);
        // 'é' is only in Beta: three runs, 10 + 20 + 10.
        assert_eq!(surf.text_width(&mut fs, "aéb".as_bytes()).unwrap(), 40);
    }

    #[test]
    fn render_without_chain_or_scheme_is_a_noop() {
        let mut fs = DummyFontSystem::new();
        let mut surf = DrawSurface::new(10, 10);
        let geom = Geometry::new(0, 0, 10, 10);
        assert_eq!(
            surf.draw_text(&mut fs, Mode::Render, geom, 0, b"x", false).unwrap(),
            0
        );
    }

    #[test]
    fn render_empty_returns_cursor_plus_budget_and_paints_nothing() {
        let (mut surf, mut fs) = setup();
        let geom = Geometry::new(5, 0, 50, 20);
        let end = surf.draw_text(&mut fs, Mode::Render, geom, 0, b"", false).unwrap();
        assert_eq!(end, 55);
        assert_eq!(surf.pixel(5, 0), Some(0));
    }

    #[test]
    fn render_consistent_with_measure() {
        let (mut surf, mut fs) = setup();
        let text = "aébc".as_bytes();
        let width = surf.text_width(&mut fs, text).unwrap();
        let lpad = 4;
        // Budget sized exactly: leftover is zero, so the return value is
        // the final cursor.
        let geom = Geometry::new(7, 0, width + lpad, 20);
        let end = surf.draw_text(&mut fs, Mode::Render, geom, lpad, text, false).unwrap();
        assert_eq!(end - geom.x - lpad as i32, width as i32);
    }

    #[test]
    fn truncation_appends_ellipsis_within_budget() {
        let (mut surf, _) = setup();
        let alpha = DummyFace::new(10, 10, 2).with_coverage(&[(0x20, 0x7E)]);
        let log = alpha.painted();
        let mut fs = DummyFontSystem::new();
        fs.insert("Alpha", alpha);
        surf.set_font_chain(FontChain::from_names(&mut fs, &["Alpha"], 12.0).unwrap());

        // "hello" is 50px; a 45px budget keeps 4 code points, and the
        // ellipsis replaces the tail: "h...".
        let geom = Geometry::new(0, 0, 45, 20);
        let end = surf.draw_text(&mut fs, Mode::Render, geom, 0, b"hello", false).unwrap();
        let painted: Vec<u32> = log.lock().unwrap().clone();
        assert_eq!(painted, vec!['h' as u32, '.' as u32, '.' as u32, '.' as u32]);
        // Cursor advanced by the measured truncated width (40), leftover 5.
        assert_eq!(end, 45);
    }

    #[test]
    fn tight_budget_leaves_only_dots() {
        let (mut surf, _) = setup();
        let alpha = DummyFace::new(10, 10, 2).with_coverage(&[(0x20, 0x7E)]);
        let log = alpha.painted();
        let mut fs = DummyFontSystem::new();
        fs.insert("Alpha", alpha);
        surf.set_font_chain(FontChain::from_names(&mut fs, &["Alpha"], 12.0).unwrap());

        let geom = Geometry::new(0, 0, 35, 20);
        surf.draw_text(&mut fs, Mode::Render, geom, 0, b"hello", false).unwrap();
        let painted: Vec<u32> = log.lock().unwrap().clone();
        assert_eq!(painted, vec!['.' as u32; 3]);
    }

    #[test]
    fn no_ellipsis_when_text_fits() {
        let (mut surf, _) = setup();
        let alpha = DummyFace::new(10, 10, 2).with_coverage(&[(0x20, 0x7E)]);
        let log = alpha.painted();
        let mut fs = DummyFontSystem::new();
        fs.insert("Alpha", alpha);
        surf.set_font_chain(FontChain::from_names(&mut fs, &["Alpha"], 12.0).unwrap());

        let geom = Geometry::new(0, 0, 100, 20);
        surf.draw_text(&mut fs, Mode::Render, geom, 0, b"hi", false).unwrap();
        let painted: Vec<u32> = log.lock().unwrap().clone();
        assert_eq!(painted, vec!['h' as u32, 'i' as u32]);
    }

    #[test]
    fn zero_budget_renders_nothing_but_succeeds() {
        let (mut surf, mut fs) = setup();
        let geom = Geometry::new(3, 0, 0, 20);
        let end = surf.draw_text(&mut fs, Mode::Render, geom, 0, b"hello", false).unwrap();
        assert_eq!(end, 3);
        // Measurement of the same text is unaffected.
        assert_eq!(surf.text_width(&mut fs, b"hello").unwrap(), 50);
    }

    #[test]
    fn fallback_font_is_used_and_appended() {
        let (mut surf, mut fs) = setup();
        fs.insert(
            "Symbols",
            DummyFace::new(30, 10, 2).with_coverage(&[(SNOWMAN, SNOWMAN)]),
        );
        fs.match_result = Some("Symbols".to_string());

        let width = surf.text_width(&mut fs, "a☃a".as_bytes()).unwrap();
        assert_eq!(width, 10 + 30 + 10);
        let chain = surf.font_chain().unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.font_for(SNOWMAN), Some(2));
        assert_eq!(fs.match_queries.len(), 1);
    }

    #[test]
    fn unresolvable_code_point_still_renders_with_head() {
        let (mut surf, mut fs) = setup();
        fs.match_result = None;

        // Two occurrences, one resolver query (memoized miss), and the
        // head font draws both as missing-glyph boxes at its own advance.
        let width = surf.text_width(&mut fs, "☃☃".as_bytes()).unwrap();
        assert_eq!(width, 20);
        assert_eq!(fs.match_queries.len(), 1);
        assert_eq!(surf.font_chain().unwrap().len(), 2);
    }

    #[test]
    fn malformed_bytes_make_forward_progress() {
        let (mut surf, mut fs) = setup();
        fs.match_result = None;
        // A lone continuation byte decodes to the replacement code point
        // which no font covers; the pass must not stall on it.
        let width = surf.text_width(&mut fs, &[b'a', 0x80, b'b']).unwrap();
        assert_eq!(width, 30);
    }

    #[test]
    fn glyphs_are_vertically_centered() {
        let (mut surf, mut fs) = setup();
        // Font height 12 in a 20px row: 4px of slack above, glyph rows
        // occupy y=4..16.
        let geom = Geometry::new(0, 0, 40, 20);
        surf.draw_text(&mut fs, Mode::Render, geom, 0, b"a", false).unwrap();
        assert_eq!(surf.pixel(0, 3), Some(0xFF000000));
        assert_eq!(surf.pixel(0, 4), Some(0xFFFFFFFF));
        assert_eq!(surf.pixel(0, 15), Some(0xFFFFFFFF));
        assert_eq!(surf.pixel(0, 16), Some(0xFF000000));
        assert_eq!(surf.pixel(10, 4), Some(0xFF000000));
    }

    #[test]
    fn invert_swaps_color_roles() {
        let (mut surf, mut fs) = setup();
        let geom = Geometry::new(0, 0, 40, 20);
        surf.draw_text(&mut fs, Mode::Render, geom, 0, b"a", true).unwrap();
        // Background filled with the foreground color, glyph in background
        // color.
        assert_eq!(surf.pixel(0, 3), Some(0xFFFFFFFF));
        assert_eq!(surf.pixel(0, 4), Some(0xFF000000));
    }

    #[test]
    fn left_pad_offsets_the_text() {
        let (mut surf, mut fs) = setup();
        let geom = Geometry::new(0, 0, 40, 20);
        surf.draw_text(&mut fs, Mode::Render, geom, 6, b"a", false).unwrap();
        assert_eq!(surf.pixel(5, 4), Some(0xFF000000));
        assert_eq!(surf.pixel(6, 4), Some(0xFFFFFFFF));
    }
}
