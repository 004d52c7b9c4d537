//! Structured colours with an explicit alpha channel.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;

/// An sRGB colour with a separate alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Build an opaque colour from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Same channels, alpha replaced (clamped to `0.0..=1.0`).
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: clamp_alpha(a),
            ..self
        }
    }

    /// Same channels, alpha multiplied by `factor`.
    pub fn scale_alpha(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor)
    }

    /// Build a colour from hue (degrees), saturation and lightness in `0..=1`.
    pub fn from_hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        let (r, g, b) = hsl_to_rgb(h, s, l);
        Self::new(r, g, b, clamp_alpha(a))
    }

    /// Parse a colour, falling back to `fallback` when the string is malformed.
    pub fn parse_or(input: &str, fallback: Rgba) -> Rgba {
        match input.parse() {
            Ok(color) => color,
            Err(err) => {
                tracing::warn!(input, %err, "invalid colour, using fallback");
                fallback
            }
        }
    }

    /// Composite over black and convert to a terminal colour.
    pub fn to_terminal(self) -> Color {
        let a = clamp_alpha(self.a);
        Color::Rgb(
            (self.r as f32 * a) as u8,
            (self.g as f32 * a) as u8,
            (self.b as f32 * a) as u8,
        )
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

fn clamp_alpha(a: f32) -> f32 {
    if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) }
}

/// Error returned when a colour string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    input: String,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised colour `{}`", self.input)
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for Rgba {
    type Err = ColorParseError;

    /// Accepts `rgba(r, g, b, a)`, `rgb(r, g, b)`, `#rgb`, `#rrggbb`,
    /// `#rrggbbaa` and a few named colours.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError {
            input: s.to_string(),
        };
        let trimmed = s.trim().to_ascii_lowercase();

        match trimmed.as_str() {
            "white" => return Ok(Rgba::WHITE),
            "black" => return Ok(Rgba::BLACK),
            "transparent" => return Ok(Rgba::TRANSPARENT),
            _ => {}
        }

        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(err);
        }

        let (body, expects_alpha) = if let Some(rest) = trimmed.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = trimmed.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(err());
        };
        let body = body.strip_suffix(')').ok_or_else(err)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();

        let channel = |p: &str| p.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0) as u8);
        match (parts.as_slice(), expects_alpha) {
            ([r, g, b, a], true) => {
                let a = a.parse::<f32>().map_err(|_| err())?;
                Ok(Rgba::new(
                    channel(r).ok_or_else(err)?,
                    channel(g).ok_or_else(err)?,
                    channel(b).ok_or_else(err)?,
                    clamp_alpha(a),
                ))
            }
            ([r, g, b], false) => Ok(Rgba::rgb(
                channel(r).ok_or_else(err)?,
                channel(g).ok_or_else(err)?,
                channel(b).ok_or_else(err)?,
            )),
            _ => Err(err()),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => {
            let nibble = |i: usize| {
                let v = u8::from_str_radix(hex.get(i..i + 1)?, 16).ok()?;
                Some(v * 17)
            };
            Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)? as f32 / 255.0,
        )),
        _ => None,
    }
}

/// Convert HSL to RGB channels. Hue in degrees, saturation and lightness in `0..=1`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        let v = (l * 255.0) as u8;
        return (v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h.rem_euclid(360.0) / 360.0;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    ((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgba() {
        let c: Rgba = "rgba(255, 128, 0, 0.5)".parse().unwrap();
        assert_eq!(c, Rgba::new(255, 128, 0, 0.5));
        let c: Rgba = "rgba(64,224,208,0.6)".parse().unwrap();
        assert_eq!(c, Rgba::new(64, 224, 208, 0.6));
    }

    #[test]
    fn test_parse_rgb_and_hex() {
        assert_eq!("rgb(1, 2, 3)".parse::<Rgba>().unwrap(), Rgba::rgb(1, 2, 3));
        assert_eq!("#7f5af0".parse::<Rgba>().unwrap(), Rgba::rgb(0x7f, 0x5a, 0xf0));
        assert_eq!("#fff".parse::<Rgba>().unwrap(), Rgba::WHITE);
        let c = "#ffffff80".parse::<Rgba>().unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!("White".parse::<Rgba>().unwrap(), Rgba::WHITE);
    }

    #[test]
    fn test_parse_malformed_falls_back() {
        assert!("rgba(1, 2, 3)".parse::<Rgba>().is_err());
        assert!("hsl(1, 2, 3)".parse::<Rgba>().is_err());
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("rgba(a, 2, 3, 0.5)".parse::<Rgba>().is_err());
        let fallback = Rgba::new(1, 2, 3, 0.4);
        assert_eq!(Rgba::parse_or("not a colour", fallback), fallback);
    }

    #[test]
    fn test_with_alpha_keeps_channels() {
        let c = Rgba::new(10, 20, 30, 0.8).with_alpha(0.25);
        assert_eq!(c, Rgba::new(10, 20, 30, 0.25));
        assert_eq!(c.with_alpha(3.0).a, 1.0);
        assert_eq!(c.with_alpha(-1.0).a, 0.0);
        assert_eq!(c.with_alpha(f32::NAN).a, 0.0);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
        assert_eq!(hsl_to_rgb(480.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 0.5), (127, 127, 127));
    }

    #[test]
    fn test_to_terminal_blends_alpha() {
        assert_eq!(Rgba::new(200, 100, 50, 0.5).to_terminal(), Color::Rgb(100, 50, 25));
    }
}
