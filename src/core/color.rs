//! Zero-alloc ANSI true-colour wrapper for the alert banner.

use std::{fmt, str};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex colour digit")]
    InvalidHexDigit,
    #[error("hex colour must be exactly 6 digits")]
    InvalidHexLength,
}

/// Plain 24-bit colour.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let h = hex.trim().trim_start_matches('#');
        if h.len() != 6 || !h.is_ascii() {
            return Err(ColorError::InvalidHexLength);
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorError::InvalidHexDigit);
        Ok(Self::new(byte(&h[..2])?, byte(&h[2..4])?, byte(&h[4..])?))
    }

    /// `self` at opacity `alpha` composited over white.
    #[must_use]
    pub fn over_white(self, alpha: f64) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mix = |c: u8| (f64::from(c) * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

// --- AnsiCode ---
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnsiCode {
    Static(&'static str),
    Inline { buf: [u8; 20], len: u8 },
}

impl AnsiCode {
    #[inline]
    #[must_use]
    pub const fn reset() -> Self {
        Self::Static("\x1b[0m")
    }

    /// Foreground escape `ESC[38;2;R;G;Bm`.
    #[must_use]
    pub fn fg(c: Rgb) -> Self {
        Self::true_color(b"\x1b[38;2;", c)
    }

    /// Background escape `ESC[48;2;R;G;Bm`.
    #[must_use]
    pub fn bg(c: Rgb) -> Self {
        Self::true_color(b"\x1b[48;2;", c)
    }

    fn true_color(prefix: &[u8; 7], c: Rgb) -> Self {
        let mut buf = [0u8; 20];
        buf[..7].copy_from_slice(prefix);
        let mut len = 7;

        for (i, v) in [c.r, c.g, c.b].into_iter().enumerate() {
            len += write_u8(&mut buf[len..], v);
            if i != 2 {
                buf[len] = b';';
                len += 1;
            }
        }
        buf[len] = b'm';
        len += 1;
        #[allow(clippy::cast_possible_truncation)]
        let len = len as u8; // at most 19
        Self::Inline { buf, len }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Static(s) => s,
            // only ever filled with ASCII digits and escape bytes
            Self::Inline { buf, len } => str::from_utf8(&buf[..*len as usize]).unwrap_or(""),
        }
    }
}

// --- Helpers ---
fn write_u8(dst: &mut [u8], mut n: u8) -> usize {
    let mut tmp = [0u8; 3];
    let mut i = 3;
    loop {
        i -= 1;
        tmp[i] = b'0' + n % 10;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    let len = 3 - i;
    dst[..len].copy_from_slice(&tmp[i..]);
    len
}

impl fmt::Display for AnsiCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wrap `text` in foreground + background colours and a reset sequence.
#[inline]
#[must_use]
pub fn paint(fg: Rgb, bg: Rgb, text: &str) -> String {
    format!("{}{}{text}{}", AnsiCode::bg(bg), AnsiCode::fg(fg), AnsiCode::reset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_display() {
        let c = Rgb::from_hex("#FFA500").unwrap();
        assert_eq!(c, Rgb::new(255, 165, 0));
        assert_eq!(c.to_string(), "#FFA500");
        assert_eq!(Rgb::from_hex("fffaf0").unwrap(), Rgb::new(255, 250, 240));
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert_eq!(Rgb::from_hex("#FFF"), Err(ColorError::InvalidHexLength));
        assert_eq!(Rgb::from_hex("#GG0000"), Err(ColorError::InvalidHexDigit));
    }

    #[test]
    fn escapes_are_built_in_place() {
        assert_eq!(AnsiCode::fg(Rgb::new(255, 0, 7)).as_str(), "\x1b[38;2;255;0;7m");
        assert_eq!(AnsiCode::bg(Rgb::new(1, 22, 133)).as_str(), "\x1b[48;2;1;22;133m");
    }

    #[test]
    fn alpha_blends_toward_white() {
        assert_eq!(Rgb::new(255, 0, 0).over_white(0.1), Rgb::new(255, 230, 230));
        assert_eq!(Rgb::new(10, 20, 30).over_white(1.0), Rgb::new(10, 20, 30));
    }
}
