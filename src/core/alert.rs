//! Expensive-request classification and banner severity.
//!
//! At or above the warning threshold the controller raises an alert.  The
//! banner starts in the base warning colours and slides from orange toward
//! red as `power` moves from the threshold to `max_power`.

use crate::core::color::{Rgb, paint};

/// Green channel of the warning colour at intensity 0 (`#FFA500`).
const WARNING_GREEN: f64 = 165.0;
/// Opacity of the tinted banner background.
const BACKGROUND_ALPHA: f64 = 0.1;

/// `power >= threshold`.
#[inline]
#[must_use]
pub fn is_expensive(power: u32, threshold: u32) -> bool {
    power >= threshold
}

/// 0 up to the threshold, then linear toward 1 at `max_power`, clamped.
#[must_use]
pub fn intensity(power: u32, threshold: u32, max_power: u32) -> f64 {
    if power <= threshold {
        return 0.0;
    }
    if max_power <= threshold {
        return 1.0;
    }
    (f64::from(power - threshold) / f64::from(max_power - threshold)).min(1.0)
}

/// Banner colours used at intensity 0.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BannerColors {
    pub background: Rgb,
    pub foreground: Rgb,
}

/// Resolved colours for one frame of the banner.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BannerStyle {
    pub background: Rgb,
    pub foreground: Rgb,
}

/// Alert as handed to the banner renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Alert {
    pub active: bool,
    pub intensity: f64,
    pub message: Option<String>,
}

impl Alert {
    #[must_use]
    pub fn inactive() -> Self {
        Self {
            active: false,
            intensity: 0.0,
            message: None,
        }
    }

    #[must_use]
    pub fn evaluate(power: u32, threshold: u32, max_power: u32, text: &str) -> Self {
        if !is_expensive(power, threshold) {
            return Self::inactive();
        }
        Self {
            active: true,
            intensity: intensity(power, threshold, max_power),
            message: Some(text.to_owned()),
        }
    }

    /// Exactly at the threshold the base colours are kept; past it the
    /// colour is `rgb(255, 165 - 165 * intensity, 0)` on a 10 % tint.
    #[must_use]
    pub fn style(&self, base: &BannerColors) -> BannerStyle {
        if self.intensity <= 0.0 {
            return BannerStyle {
                background: base.background,
                foreground: base.foreground,
            };
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let green = (WARNING_GREEN - self.intensity * WARNING_GREEN).round() as u8;
        let foreground = Rgb::new(255, green, 0);
        BannerStyle {
            background: foreground.over_white(BACKGROUND_ALPHA),
            foreground,
        }
    }

    /// Terminal rendering; `None` while inactive.
    #[must_use]
    pub fn render(&self, base: &BannerColors) -> Option<String> {
        let message = self.message.as_deref().filter(|_| self.active)?;
        let style = self.style(base);
        Some(paint(style.foreground, style.background, &format!(" {message} ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: BannerColors = BannerColors {
        background: Rgb::new(0xFF, 0xFA, 0xF0),
        foreground: Rgb::new(0xFF, 0xA5, 0x00),
    };

    #[test]
    fn threshold_is_inclusive() {
        assert!(!is_expensive(999, 1_000));
        assert!(is_expensive(1_000, 1_000));
        assert!(!is_expensive(2_999, 3_000));
        assert!(is_expensive(3_000, 3_000));
    }

    #[test]
    fn intensity_ramps_linearly() {
        assert!(intensity(3_000, 3_000, 10_000).abs() < f64::EPSILON);
        assert!((intensity(6_500, 3_000, 10_000) - 0.5).abs() < 1e-12);
        assert!((intensity(10_000, 3_000, 10_000) - 1.0).abs() < f64::EPSILON);
        assert!((intensity(20_000, 3_000, 10_000) - 1.0).abs() < f64::EPSILON);
        assert!((intensity(5, 1, 1) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn style_moves_from_orange_to_red() {
        let at_threshold = Alert::evaluate(3_000, 3_000, 10_000, "w");
        assert!(at_threshold.active);
        assert_eq!(at_threshold.style(&BASE).foreground, BASE.foreground);
        assert_eq!(at_threshold.style(&BASE).background, BASE.background);

        let halfway = Alert::evaluate(6_500, 3_000, 10_000, "w").style(&BASE);
        assert_eq!(halfway.foreground, Rgb::new(255, 83, 0));

        let max = Alert::evaluate(10_000, 3_000, 10_000, "w").style(&BASE);
        assert_eq!(max.foreground, Rgb::new(255, 0, 0));
        assert_eq!(max.background, Rgb::new(255, 230, 230));
    }

    #[test]
    fn inactive_alert_renders_nothing() {
        let alert = Alert::evaluate(10, 1_000, 10_000, "w");
        assert_eq!(alert, Alert::inactive());
        assert!(alert.render(&BASE).is_none());

        let active = Alert::evaluate(1_000, 1_000, 10_000, "heavy");
        assert!(active.render(&BASE).unwrap().contains(" heavy "));
    }
}
