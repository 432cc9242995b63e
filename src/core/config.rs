//! Run-time configuration object + fluent builder.

use crate::core::{
    alert::BannerColors,
    color::Rgb,
    constants::{
        CLASSIC_MAX_POWER, CLASSIC_WARNING_THRESHOLD, HARD_MAX_POWER, MAX_OUTPUT_DIGITS,
        OUTPUT_DIGITS, RANGED_LIMITS, RANGED_WARNING_THRESHOLD, WARNING_BACKGROUND_HEX,
        WARNING_FOREGROUND_HEX, WARNING_TEXT,
    },
    error::ConfigError,
    series::Mode,
};

/// Which sample sequence the chart receives.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ChartPolicy {
    /// Always the full `1..=N`.
    #[default]
    Dense,
    /// Running history of requested term-counts, cut back on revisits.
    History,
}

/// The two shipped configurations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Variant {
    /// One slider up to 10 000, warning from 3 000, history chart.
    Classic,
    /// Selectable upper bounds, warning from 1 000, dense chart.
    Ranged,
}

impl Variant {
    #[must_use]
    pub fn builder(self) -> ConfigBuilder {
        match self {
            Self::Classic => ConfigBuilder::new()
                .max_power(CLASSIC_MAX_POWER)
                .warning_threshold(CLASSIC_WARNING_THRESHOLD)
                .range_limits([CLASSIC_MAX_POWER])
                .mode(Mode::FullRecompute)
                .chart(ChartPolicy::History),
            Self::Ranged => ConfigBuilder::new()
                .max_power(RANGED_LIMITS[RANGED_LIMITS.len() - 1])
                .warning_threshold(RANGED_WARNING_THRESHOLD)
                .range_limits(RANGED_LIMITS)
                .mode(Mode::Incremental)
                .chart(ChartPolicy::Dense),
        }
    }
}

/// Immutable parameters handed to the controller.
#[derive(Debug, Clone)]
pub struct Config {
    pub max_power: u32,
    pub warning_threshold: u32,
    /// Sorted, deduplicated.
    pub range_limits: Vec<u32>,
    pub initial_limit: u32,
    pub mode: Mode,
    pub chart: ChartPolicy,
    pub digits: u32,
    pub warning_text: String,
    pub banner: BannerColors,
}

impl Config {
    #[inline]
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    #[inline]
    #[must_use]
    pub fn supports_limit(&self, limit: u32) -> bool {
        self.range_limits.binary_search(&limit).is_ok()
    }
}

/// Fluent builder; nothing is validated until `build`.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    max_power: Option<u32>,
    warning_threshold: Option<u32>,
    range_limits: Option<Vec<u32>>,
    initial_limit: Option<u32>,
    mode: Option<Mode>,
    chart: Option<ChartPolicy>,
    digits: Option<u32>,
    warning_text: Option<String>,
    background: Option<String>,
    foreground: Option<String>,
    above_hard_cap: bool,
}

impl ConfigBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn max_power(mut self, v: u32) -> Self {
        self.max_power = Some(v);
        self
    }
    #[inline]
    #[must_use]
    pub fn warning_threshold(mut self, v: u32) -> Self {
        self.warning_threshold = Some(v);
        self
    }
    #[inline]
    #[must_use]
    pub fn range_limits<I: IntoIterator<Item = u32>>(mut self, limits: I) -> Self {
        self.range_limits = Some(limits.into_iter().collect());
        self
    }
    #[inline]
    #[must_use]
    pub fn initial_limit(mut self, v: u32) -> Self {
        self.initial_limit = Some(v);
        self
    }
    #[inline]
    #[must_use]
    pub fn mode(mut self, m: Mode) -> Self {
        self.mode = Some(m);
        self
    }
    #[inline]
    #[must_use]
    pub fn chart(mut self, c: ChartPolicy) -> Self {
        self.chart = Some(c);
        self
    }
    #[inline]
    #[must_use]
    pub fn digits(mut self, d: u32) -> Self {
        self.digits = Some(d);
        self
    }
    #[inline]
    #[must_use]
    pub fn warning_text(mut self, t: impl Into<String>) -> Self {
        self.warning_text = Some(t.into());
        self
    }
    /// `#RRGGBB` banner colours at intensity 0.
    #[inline]
    #[must_use]
    pub fn banner_colors(mut self, background: impl Into<String>, foreground: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self.foreground = Some(foreground.into());
        self
    }
    /// Allow `max_power` beyond [`HARD_MAX_POWER`].
    #[inline]
    #[must_use]
    pub fn confirm_above_hard_cap(mut self, yes: bool) -> Self {
        self.above_hard_cap = yes;
        self
    }

    /// Validate and freeze.
    ///
    /// Without explicit range limits the single bound `max_power` is used;
    /// without `max_power` the largest range limit is used.
    ///
    /// # Errors
    /// Any [`ConfigError`] describing the first inconsistency found.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut limits = match (self.range_limits, self.max_power) {
            (Some(l), _) => l,
            (None, Some(max)) => vec![max],
            (None, None) => vec![CLASSIC_MAX_POWER],
        };
        limits.sort_unstable();
        limits.dedup();
        let (Some(&lowest), Some(&highest)) = (limits.first(), limits.last()) else {
            return Err(ConfigError::EmptyRangeLimits);
        };
        if lowest == 0 {
            return Err(ConfigError::ZeroRangeLimit);
        }

        let max = self.max_power.unwrap_or(highest);
        if highest > max {
            return Err(ConfigError::LimitAboveMax {
                limit: highest,
                max,
            });
        }
        if max > HARD_MAX_POWER && !self.above_hard_cap {
            return Err(ConfigError::HardCapExceeded {
                max,
                cap: HARD_MAX_POWER,
            });
        }

        let threshold = self.warning_threshold.unwrap_or(CLASSIC_WARNING_THRESHOLD);
        if threshold == 0 || threshold > max {
            return Err(ConfigError::ThresholdOutOfRange { threshold, max });
        }

        let initial_limit = self.initial_limit.unwrap_or(highest);
        if limits.binary_search(&initial_limit).is_err() {
            return Err(ConfigError::InitialLimitNotSelectable {
                limit: initial_limit,
            });
        }

        let digits = self.digits.unwrap_or(OUTPUT_DIGITS);
        if digits > MAX_OUTPUT_DIGITS {
            return Err(ConfigError::DigitsOutOfRange {
                digits,
                max: MAX_OUTPUT_DIGITS,
            });
        }

        let banner = BannerColors {
            background: Rgb::from_hex(self.background.as_deref().unwrap_or(WARNING_BACKGROUND_HEX))?,
            foreground: Rgb::from_hex(self.foreground.as_deref().unwrap_or(WARNING_FOREGROUND_HEX))?,
        };

        Ok(Config {
            max_power: max,
            warning_threshold: threshold,
            range_limits: limits,
            initial_limit,
            mode: self.mode.unwrap_or_default(),
            chart: self.chart.unwrap_or_default(),
            digits,
            warning_text: self.warning_text.unwrap_or_else(|| WARNING_TEXT.to_owned()),
            banner,
        })
    }
}

/// Ergonomic `?` on a builder chain.
impl From<ConfigBuilder> for Result<Config, ConfigError> {
    fn from(b: ConfigBuilder) -> Self {
        b.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorError;

    #[test]
    fn presets_are_valid() {
        let classic = Variant::Classic.builder().build().unwrap();
        assert_eq!(classic.range_limits, vec![10_000]);
        assert_eq!(classic.warning_threshold, 3_000);
        assert_eq!(classic.mode, Mode::FullRecompute);
        assert_eq!(classic.chart, ChartPolicy::History);

        let ranged = Variant::Ranged.builder().build().unwrap();
        assert_eq!(ranged.range_limits, RANGED_LIMITS.to_vec());
        assert_eq!(ranged.initial_limit, 10_000);
        assert_eq!(ranged.warning_threshold, 1_000);
        assert_eq!(ranged.digits, OUTPUT_DIGITS);
        assert_eq!(ranged.banner.foreground, Rgb::new(255, 165, 0));
    }

    #[test]
    fn limits_are_sorted_and_deduplicated() {
        let cfg = Config::builder()
            .range_limits([500, 50, 500])
            .warning_threshold(10)
            .initial_limit(50)
            .build()
            .unwrap();
        assert_eq!(cfg.range_limits, vec![50, 500]);
        assert_eq!(cfg.max_power, 500);
        assert!(cfg.supports_limit(50));
        assert!(!cfg.supports_limit(51));
    }

    #[test]
    fn inconsistent_settings_are_rejected() {
        let r: Result<Config, ConfigError> = Config::builder().range_limits(Vec::new()).into();
        assert!(matches!(r, Err(ConfigError::EmptyRangeLimits)));

        let r = Config::builder().range_limits([0, 10]).build();
        assert!(matches!(r, Err(ConfigError::ZeroRangeLimit)));

        let r = Config::builder().max_power(100).range_limits([200]).build();
        assert!(matches!(r, Err(ConfigError::LimitAboveMax { limit: 200, max: 100 })));

        let r = Config::builder().max_power(100).warning_threshold(101).build();
        assert!(matches!(r, Err(ConfigError::ThresholdOutOfRange { .. })));

        let r = Config::builder()
            .range_limits([10, 20])
            .warning_threshold(5)
            .initial_limit(15)
            .build();
        assert!(matches!(r, Err(ConfigError::InitialLimitNotSelectable { limit: 15 })));

        let r = Variant::Classic.builder().digits(31).build();
        assert!(matches!(r, Err(ConfigError::DigitsOutOfRange { digits: 31, .. })));

        let r = Variant::Classic.builder().banner_colors("#FFF", "#000000").build();
        assert!(matches!(r, Err(ConfigError::Color(ColorError::InvalidHexLength))));
    }

    #[test]
    fn hard_cap_needs_confirmation() {
        let r = Config::builder().max_power(HARD_MAX_POWER + 1).build();
        assert!(matches!(r, Err(ConfigError::HardCapExceeded { .. })));

        let cfg = Config::builder()
            .max_power(HARD_MAX_POWER + 1)
            .confirm_above_hard_cap(true)
            .build()
            .unwrap();
        assert_eq!(cfg.range_limits, vec![HARD_MAX_POWER + 1]);
    }
}
