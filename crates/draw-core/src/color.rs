// src/color.rs
use crate::error::{DrawError, DrawResult};

/// Color in 0.0..=1.0 space with alpha channel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Default for Color {
    fn default() -> Self {
        Color {
            r: 1.0,
            g: 1.0,
            b: 1.0,
            a: 1.0,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rgba({:.2}, {:.2}, {:.2}, {:.2})",
            self.r, self.g, self.b, self.a
        )
    }
}

// Named colors resolvable without a display server. Anything fancier goes
// through the hex forms.
const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }),
    ("white", Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 }),
    ("red", Color { r: 0.8, g: 0.0, b: 0.0, a: 1.0 }),
    ("green", Color { r: 0.0, g: 0.8, b: 0.0, a: 1.0 }),
    ("yellow", Color { r: 0.8, g: 0.8, b: 0.0, a: 1.0 }),
    ("blue", Color { r: 0.0, g: 0.0, b: 0.8, a: 1.0 }),
    ("magenta", Color { r: 0.8, g: 0.0, b: 0.8, a: 1.0 }),
    ("cyan", Color { r: 0.0, g: 0.8, b: 0.8, a: 1.0 }),
    ("gray", Color { r: 0.5, g: 0.5, b: 0.5, a: 1.0 }),
    ("grey", Color { r: 0.5, g: 0.5, b: 0.5, a: 1.0 }),
];

impl Color {
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse a color name: `#rrggbb`, `#rgb`, or one of the named colors.
    pub fn parse(name: &str) -> DrawResult<Self> {
        let err = || DrawError::ColorParse {
            name: name.to_string(),
        };

        if let Some(hex) = name.strip_prefix('#') {
            let digit = |i: usize| {
                hex.as_bytes()
                    .get(i)
                    .and_then(|b| (*b as char).to_digit(16))
                    .map(|d| d as f64)
            };
            return match hex.len() {
                6 => {
                    let mut ch = [0.0f64; 3];
                    for (k, c) in ch.iter_mut().enumerate() {
                        let (hi, lo) = (digit(2 * k).ok_or_else(err)?,
                                        digit(2 * k + 1).ok_or_else(err)?);
                        *c = (hi * 16.0 + lo) / 255.0;
                    }
                    Ok(Color::rgb(ch[0], ch[1], ch[2]))
                }
                3 => {
                    let mut ch = [0.0f64; 3];
                    for (k, c) in ch.iter_mut().enumerate() {
                        let d = digit(k).ok_or_else(err)?;
                        *c = (d * 16.0 + d) / 255.0;
                    }
                    Ok(Color::rgb(ch[0], ch[1], ch[2]))
                }
                _ => Err(err()),
            };
        }

        let lower = name.to_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|(_, c)| *c)
            .ok_or_else(err)
    }

    /// Pack as 0xAARRGGBB for the software pixmap.
    pub fn to_argb(self) -> u32 {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (q(self.a) << 24) | (q(self.r) << 16) | (q(self.g) << 8) | q(self.b)
    }
}

/// Scheme slot roles; `Border` is optional and falls back to `Fg` when a
/// two-color scheme is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemeRole {
    Fg = 0,
    Bg = 1,
    Border = 2,
}

/// A fixed ordered color table, created wholesale from color names and
/// swapped wholesale; slots are never reassigned in place.
#[derive(Clone, Debug)]
pub struct ColorScheme {
    colors: Box<[Color]>,
}

impl ColorScheme {
    /// Parses all names up front; any failure yields an error and no scheme.
    /// A scheme needs at least two colors (foreground and background).
    pub fn new(names: &[&str]) -> DrawResult<Self> {
        if names.len() < 2 {
            return Err(DrawError::SchemeTooSmall { count: names.len() });
        }
        let colors = names
            .iter()
            .map(|n| Color::parse(n))
            .collect::<DrawResult<Vec<_>>>()?;
        Ok(Self {
            colors: colors.into_boxed_slice(),
        })
    }

    pub fn color(&self, role: SchemeRole) -> Color {
        self.colors
            .get(role as usize)
            .copied()
            .unwrap_or(self.colors[SchemeRole::Fg as usize])
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_long() {
        let c = Color::parse("#ff8000").unwrap();
        assert!((c.r - 1.0).abs() < 1e-9);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-9);
        assert!((c.b - 0.0).abs() < 1e-9);
    }

    #[test]
    fn parse_hex_short() {
        let c = Color::parse("#f00").unwrap();
        assert_eq!(c, Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn parse_named_case_insensitive() {
        assert_eq!(Color::parse("Black").unwrap(), Color::rgb(0.0, 0.0, 0.0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            Color::parse("#12345"),
            Err(DrawError::ColorParse { .. })
        ));
        assert!(matches!(
            Color::parse("no-such-color"),
            Err(DrawError::ColorParse { .. })
        ));
    }

    #[test]
    fn argb_packing() {
        assert_eq!(Color::rgb(1.0, 0.0, 0.0).to_argb(), 0xFFFF0000);
        assert_eq!(Color::rgb(0.0, 0.0, 0.0).to_argb(), 0xFF000000);
    }

    #[test]
    fn scheme_requires_two_colors() {
        assert!(matches!(
            ColorScheme::new(&["#ffffff"]),
            Err(DrawError::SchemeTooSmall { count: 1 })
        ));
        assert!(matches!(
            ColorScheme::new(&[]),
            Err(DrawError::SchemeTooSmall { count: 0 })
        ));
    }

    #[test]
    fn scheme_fails_cleanly_on_bad_name() {
        assert!(ColorScheme::new(&["#ffffff", "bogus"]).is_err());
    }

    #[test]
    fn scheme_border_falls_back_to_fg() {
        let scm = ColorScheme::new(&["#ffffff", "#000000"]).unwrap();
        assert_eq!(scm.color(SchemeRole::Border), scm.color(SchemeRole::Fg));
        let scm3 = ColorScheme::new(&["#ffffff", "#000000", "#444444"]).unwrap();
        assert_ne!(scm3.color(SchemeRole::Border), scm3.color(SchemeRole::Fg));
    }
}
