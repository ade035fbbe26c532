//! The drawable surface: an off-screen ARGB pixmap plus the active color
//! scheme and font chain. Rendering happens here; presentation is a copy to
//! a [`PresentTarget`].

use crate::color::{Color, ColorScheme, SchemeRole};
use crate::font::FontChain;
use crate::traits::PresentTarget;

/// Off-screen drawing surface. The scheme and font chain are owned by the
/// surface and swapped wholesale; both live for the surface's lifetime once
/// set. Single-threaded by design: callers serialize access externally.
pub struct DrawSurface {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) pixels: Vec<u32>,
    pub(crate) scheme: Option<ColorScheme>,
    pub(crate) chain: Option<FontChain>,
}

impl DrawSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
            scheme: None,
            chain: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Drop the pixmap and recreate it at the new size. Contents are not
    /// preserved.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; (width * height) as usize];
    }

    pub fn set_scheme(&mut self, scheme: ColorScheme) {
        self.scheme = Some(scheme);
    }

    pub fn scheme(&self) -> Option<&ColorScheme> {
        self.scheme.as_ref()
    }

    pub fn set_font_chain(&mut self, chain: FontChain) {
        self.chain = Some(chain);
    }

    pub fn font_chain(&self) -> Option<&FontChain> {
        self.chain.as_ref()
    }

    /// Pixel at (x, y), if inside the surface. Mostly useful for tests and
    /// software present targets.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Filled or outlined rectangle in the active scheme's foreground role
    /// (background when inverted). No-op without a scheme. The outline
    /// spans `w-1 x h-1` so the rectangle stays inside the given box.
    pub fn rect(&mut self, x: i32, y: i32, w: u32, h: u32, filled: bool, invert: bool) {
        let Some(scheme) = self.scheme.as_ref() else {
            return;
        };
        let role = if invert { SchemeRole::Bg } else { SchemeRole::Fg };
        let argb = scheme.color(role).to_argb();
        if filled {
            fill_rect(&mut self.pixels, self.width, self.height, x, y, w, h, argb);
        } else if w > 0 && h > 0 {
            fill_rect(&mut self.pixels, self.width, self.height, x, y, w, 1, argb);
            fill_rect(&mut self.pixels, self.width, self.height, x, y + h as i32 - 1, w, 1, argb);
            fill_rect(&mut self.pixels, self.width, self.height, x, y, 1, h, argb);
            fill_rect(&mut self.pixels, self.width, self.height, x + w as i32 - 1, y, 1, h, argb);
        }
    }

    /// Present a region of the pixmap at the same position in the target.
    pub fn map(&self, target: &mut dyn PresentTarget, x: i32, y: i32, w: u32, h: u32) {
        target.present(&self.pixels, self.width, x, y, w, h);
    }
}

/// Clip a rectangle to the surface; returns half-open pixel bounds.
pub(crate) fn clip(
    surf_w: u32,
    surf_h: u32,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
) -> Option<(u32, u32, u32, u32)> {
    let x0 = x.max(0) as u32;
    let y0 = y.max(0) as u32;
    let x1 = x.saturating_add(w.min(i32::MAX as u32) as i32).max(0) as u32;
    let y1 = y.saturating_add(h.min(i32::MAX as u32) as i32).max(0) as u32;
    let x1 = x1.min(surf_w);
    let y1 = y1.min(surf_h);
    if x0 < x1 && y0 < y1 {
        Some((x0, y0, x1, y1))
    } else {
        None
    }
}

pub(crate) fn fill_rect(
    pixels: &mut [u32],
    surf_w: u32,
    surf_h: u32,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    argb: u32,
) {
    let Some((x0, y0, x1, y1)) = clip(surf_w, surf_h, x, y, w, h) else {
        return;
    };
    for row in y0..y1 {
        let start = (row * surf_w + x0) as usize;
        let end = (row * surf_w + x1) as usize;
        pixels[start..end].fill(argb);
    }
}

/// Blend `color` over `dst` with 8-bit coverage.
pub(crate) fn blend(dst: u32, color: Color, coverage: u8) -> u32 {
    if coverage == 0xFF {
        return color.to_argb() | 0xFF00_0000;
    }
    let src = color.to_argb();
    let cov = coverage as u32;
    let inv = 255 - cov;
    let ch = |shift: u32| {
        let s = (src >> shift) & 0xFF;
        let d = (dst >> shift) & 0xFF;
        ((s * cov + d * inv) / 255) << shift
    };
    0xFF00_0000 | ch(16) | ch(8) | ch(0)
}
