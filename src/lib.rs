//! Public-facing crate root – re-exports + one-shot helper.

pub mod cli;
pub mod core;

pub use core::{
    alert::{Alert, BannerColors, BannerStyle},
    config::{ChartPolicy, Config, ConfigBuilder, Variant},
    constants::{INITIAL_APPROXIMATION, OUTPUT_DIGITS},
    controller::{ChartPoint, Controller, Event, State, Update},
    decimal::Decimal,
    error::{AppError, ConfigError, ControllerError, SeriesError},
    series::{Accumulator, Mode, Sample, full_recompute},
    session::{Outcome, Session, spawn},
};

/// Plain π approximation after `terms` terms with [`OUTPUT_DIGITS`]
/// fractional digits, no caching, no clamping.
///
/// # Errors
/// [`SeriesError::InvalidTermCount`] if `terms == 0`.
pub fn approximate_pi(terms: u32) -> Result<String, SeriesError> {
    Accumulator::new(Mode::FullRecompute)
        .approximate(terms)
        .map(|s| s.formatted(OUTPUT_DIGITS))
}
