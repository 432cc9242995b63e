//! Range & alert controller: the state machine between input events and the
//! accumulator.
//!
//! Handling an event is split in two pure halves:
//! 1. [`Controller::validate`] turns a raw [`Event`] into a [`Command`] or a
//!    rejection, borrowing the controller immutably.
//! 2. [`State::apply`] maps `(State, Command)` to the next `State` by value.
//!
//! [`Controller::handle`] glues them to the accumulator.  A rejected event
//! never mutates anything, so the previous state stays intact.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::core::{
    alert::{Alert, is_expensive},
    cancel::{Interrupt, Never},
    config::{ChartPolicy, Config},
    constants::INITIAL_POWER,
    decimal::Decimal,
    error::ControllerError,
    series::{Accumulator, Sample},
};

/// Payloads delivered by the input surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Slider moved.  Not yet validated: may be negative or fractional.
    TermCount(f64),
    /// Upper bound picked from the selector.
    RangeLimit(u32),
}

impl Event {
    /// Whether `config` can ever accept this event.  Validity does not
    /// depend on controller state; only clamping does.
    ///
    /// # Errors
    /// [`ControllerError::InvalidTermCount`] for non-finite, fractional or
    /// `< 1` term counts, [`ControllerError::RangeLimitNotSupported`] for a
    /// limit outside the configured set.
    pub fn check(self, config: &Config) -> Result<(), ControllerError> {
        match self {
            Self::TermCount(requested) => {
                if !requested.is_finite() || requested < 1.0 || requested.fract() > 0.0 {
                    return Err(ControllerError::InvalidTermCount { requested });
                }
            }
            Self::RangeLimit(limit) => {
                if !config.supports_limit(limit) {
                    return Err(ControllerError::RangeLimitNotSupported {
                        requested: limit,
                        supported: config.range_limits.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A validated event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// Already clamped to `1..=range_limit`.
    Request { term_count: u32 },
    Reset { range_limit: u32 },
}

/// `Idle(power, range_limit, alert_active)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct State {
    power: u32,
    range_limit: u32,
    alert_active: bool,
}

impl State {
    #[must_use]
    pub fn initial(config: &Config) -> Self {
        Self {
            power: INITIAL_POWER,
            range_limit: config.initial_limit,
            alert_active: false,
        }
    }

    #[must_use]
    pub fn apply(self, command: Command, warning_threshold: u32) -> Self {
        match command {
            Command::Request { term_count } => Self {
                power: term_count,
                alert_active: is_expensive(term_count, warning_threshold),
                ..self
            },
            Command::Reset { range_limit } => Self {
                power: INITIAL_POWER,
                range_limit,
                alert_active: false,
            },
        }
    }

    #[inline]
    #[must_use]
    pub fn power(&self) -> u32 {
        self.power
    }
    #[inline]
    #[must_use]
    pub fn range_limit(&self) -> u32 {
        self.range_limit
    }
    #[inline]
    #[must_use]
    pub fn alert_active(&self) -> bool {
        self.alert_active
    }
}

/// One chart sample as text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChartPoint {
    pub term_count: u32,
    pub value: String,
}

/// Everything the presentation layer needs after a transition.
#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    pub state: State,
    pub approximation: String,
    /// Strictly increasing in `term_count`.
    pub samples: Vec<ChartPoint>,
    pub alert: Alert,
}

pub struct Controller {
    config: Config,
    state: State,
    accumulator: Accumulator,
    approximation: String,
    /// Dense chart length; the cache may run ahead after an interrupted
    /// extension.
    charted: usize,
    /// Only used by [`ChartPolicy::History`].
    history: Vec<ChartPoint>,
}

impl Controller {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let state = State::initial(&config);
        let accumulator = Accumulator::new(config.mode);
        let approximation = initial_approximation(&config);
        Self {
            config,
            state,
            accumulator,
            approximation,
            charted: 0,
            history: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
    #[inline]
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }
    #[inline]
    #[must_use]
    pub fn approximation(&self) -> &str {
        &self.approximation
    }
    #[inline]
    #[must_use]
    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Check an event against the current state without touching it.
    ///
    /// # Errors
    /// Whatever [`Event::check`] reports.
    pub fn validate(&self, event: Event) -> Result<Command, ControllerError> {
        event.check(&self.config)?;
        Ok(match event {
            Event::TermCount(requested) => {
                let clamped = requested.min(f64::from(self.state.range_limit));
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let term_count = clamped as u32; // integral and within 1..=range_limit
                Command::Request { term_count }
            }
            Event::RangeLimit(range_limit) => Command::Reset { range_limit },
        })
    }

    /// # Errors
    /// See [`validate`](Self::validate).
    pub fn handle(&mut self, event: Event) -> Result<Update, ControllerError> {
        self.handle_with(event, &Never)
    }

    /// Like [`handle`](Self::handle), abandoning the computation once
    /// `interrupt` reports a newer request.
    ///
    /// # Errors
    /// See [`validate`](Self::validate); additionally
    /// [`ControllerError::Superseded`], in which case state, approximation
    /// and chart are unchanged.
    pub fn handle_with(
        &mut self,
        event: Event,
        interrupt: &impl Interrupt,
    ) -> Result<Update, ControllerError> {
        let command = self.validate(event).inspect_err(|e| warn!(?event, "rejected: {e}"))?;

        match command {
            Command::Request { term_count } => {
                let t0 = Instant::now();
                let sample = self.accumulator.approximate_with(term_count, interrupt)?;
                self.approximation = sample.formatted(self.config.digits);
                self.charted = term_count as usize;
                if self.config.chart == ChartPolicy::History {
                    self.record_history(&sample);
                }
                debug!(
                    term_count,
                    elapsed = ?t0.elapsed(),
                    approximation = %self.approximation,
                    "request served"
                );
            }
            Command::Reset { range_limit } => {
                self.accumulator.clear();
                self.history.clear();
                self.charted = 0;
                self.approximation = initial_approximation(&self.config);
                info!(range_limit, "range limit selected, state reset");
            }
        }
        self.state = self.state.apply(command, self.config.warning_threshold);
        Ok(self.snapshot())
    }

    /// Convenience for `handle(Event::TermCount(n))`.
    ///
    /// # Errors
    /// See [`validate`](Self::validate).
    pub fn request_term_count(&mut self, n: f64) -> Result<Update, ControllerError> {
        self.handle(Event::TermCount(n))
    }

    /// Convenience for `handle(Event::RangeLimit(limit))`.
    ///
    /// # Errors
    /// See [`validate`](Self::validate).
    pub fn select_range_limit(&mut self, limit: u32) -> Result<Update, ControllerError> {
        self.handle(Event::RangeLimit(limit))
    }

    /// Drop entries at or above the new term-count, then append it.
    fn record_history(&mut self, sample: &Sample) {
        let n = sample.term_count();
        let keep = self.history.partition_point(|p| p.term_count < n);
        self.history.truncate(keep);
        self.history.push(ChartPoint {
            term_count: n,
            value: self.approximation.clone(),
        });
    }

    #[must_use]
    pub fn samples(&self) -> Vec<ChartPoint> {
        match self.config.chart {
            ChartPolicy::History => self.history.clone(),
            ChartPolicy::Dense => self
                .accumulator
                .samples()
                .iter()
                .take(self.charted)
                .map(|s| ChartPoint {
                    term_count: s.term_count(),
                    value: s.formatted(self.config.digits),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn alert(&self) -> Alert {
        Alert::evaluate(
            self.state.power,
            self.config.warning_threshold,
            self.config.max_power,
            &self.config.warning_text,
        )
    }

    #[must_use]
    pub fn snapshot(&self) -> Update {
        Update {
            state: self.state,
            approximation: self.approximation.clone(),
            samples: self.samples(),
            alert: self.alert(),
        }
    }
}

/// `4` at the configured number of digits.
fn initial_approximation(config: &Config) -> String {
    Decimal::from_int(4).format_fixed(config.digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        cancel::Generations,
        config::Variant,
        constants::{CANCEL_CHECK_INTERVAL, INITIAL_APPROXIMATION},
        series::Mode,
    };

    fn ranged() -> Controller {
        Controller::new(Variant::Ranged.builder().build().unwrap())
    }

    fn classic() -> Controller {
        Controller::new(Variant::Classic.builder().build().unwrap())
    }

    #[test]
    fn starts_idle_at_power_one() {
        let c = ranged();
        assert_eq!(c.state().power(), 1);
        assert_eq!(c.state().range_limit(), 10_000);
        assert!(!c.state().alert_active());
        assert_eq!(c.approximation(), INITIAL_APPROXIMATION);
        assert!(c.samples().is_empty());
    }

    #[test]
    fn apply_is_pure() {
        let cfg = Variant::Ranged.builder().build().unwrap();
        let s0 = State::initial(&cfg);
        let s1 = s0.apply(Command::Request { term_count: 1_500 }, 1_000);
        assert_eq!(s0.power(), 1);
        assert_eq!(s1.power(), 1_500);
        assert!(s1.alert_active());
        let s2 = s1.apply(Command::Reset { range_limit: 100 }, 1_000);
        assert_eq!((s2.power(), s2.range_limit(), s2.alert_active()), (1, 100, false));
    }

    #[test]
    fn requests_above_the_limit_are_clamped() {
        let mut c = ranged();
        c.select_range_limit(100).unwrap();
        let update = c.request_term_count(5_000.0).unwrap();
        assert_eq!(update.state.power(), 100);
        assert_eq!(update.samples.len(), 100);
        assert!(!update.alert.active);
    }

    #[test]
    fn invalid_term_counts_leave_state_untouched() {
        let mut c = ranged();
        c.request_term_count(12.0).unwrap();
        let before = c.snapshot();
        for bad in [0.0, -5.0, 2.5, f64::NAN, f64::INFINITY] {
            let err = c.request_term_count(bad).unwrap_err();
            assert!(matches!(err, ControllerError::InvalidTermCount { .. }));
            assert_eq!(c.snapshot(), before);
        }
        assert_eq!(c.accumulator().stats().requests, 1);
    }

    #[test]
    fn screening_ignores_controller_state() {
        let cfg = Variant::Ranged.builder().build().unwrap();
        assert!(Event::TermCount(50_000.0).check(&cfg).is_ok());
        assert!(Event::RangeLimit(1_000).check(&cfg).is_ok());
        assert!(Event::TermCount(0.5).check(&cfg).is_err());
        assert!(Event::RangeLimit(42).check(&cfg).is_err());

        let mut c = Controller::new(cfg);
        c.select_range_limit(100).unwrap();
        // still valid, just clamped
        assert!(Event::TermCount(50_000.0).check(c.config()).is_ok());
        assert_eq!(
            c.validate(Event::TermCount(50_000.0)),
            Ok(Command::Request { term_count: 100 })
        );
    }

    #[test]
    fn unsupported_limit_is_rejected() {
        let mut c = ranged();
        c.request_term_count(50.0).unwrap();
        let err = c.select_range_limit(42).unwrap_err();
        assert_eq!(
            err,
            ControllerError::RangeLimitNotSupported {
                requested: 42,
                supported: vec![100, 1_000, 5_000, 10_000],
            }
        );
        assert_eq!(c.state().power(), 50);
    }

    #[test]
    fn selecting_a_limit_resets_everything() {
        let mut c = ranged();
        c.request_term_count(2_000.0).unwrap();
        assert!(c.state().alert_active());

        let update = c.select_range_limit(5_000).unwrap();
        assert_eq!(update.state.power(), 1);
        assert_eq!(update.state.range_limit(), 5_000);
        assert!(!update.state.alert_active());
        assert!(update.samples.is_empty());
        assert_eq!(update.approximation, INITIAL_APPROXIMATION);
        assert!(c.accumulator().samples().is_empty());
    }

    #[test]
    fn classic_alert_boundary() {
        let mut c = classic();
        assert!(!c.request_term_count(2_999.0).unwrap().alert.active);
        let update = c.request_term_count(3_000.0).unwrap();
        assert!(update.alert.active);
        assert!(update.alert.intensity.abs() < f64::EPSILON);
        assert_eq!(update.alert.message.as_deref(), Some(c.config().warning_text.as_str()));
    }

    #[test]
    fn history_chart_appends_and_cuts_back() {
        let mut c = classic();
        c.request_term_count(3.0).unwrap();
        c.request_term_count(10.0).unwrap();
        c.request_term_count(7.0).unwrap();
        let counts: Vec<u32> = c.samples().iter().map(|p| p.term_count).collect();
        assert_eq!(counts, vec![3, 7]);

        let update = c.request_term_count(20.0).unwrap();
        let counts: Vec<u32> = update.samples.iter().map(|p| p.term_count).collect();
        assert_eq!(counts, vec![3, 7, 20]);
        assert_eq!(update.samples[2].value, update.approximation);

        let update = c.request_term_count(7.0).unwrap();
        assert_eq!(update.samples.len(), 2);
    }

    #[test]
    fn dense_chart_matches_the_full_sequence() {
        let mut c = ranged();
        let update = c.request_term_count(3.0).unwrap();
        let values: Vec<&str> = update.samples.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "4.0000000000000000000",
                "2.6666666666666666667",
                "3.4666666666666666667",
            ]
        );
    }

    #[test]
    fn custom_digits_shape_every_output() {
        let cfg = Variant::Ranged.builder().digits(4).build().unwrap();
        let mut c = Controller::new(cfg);
        assert_eq!(c.approximation(), "4.0000");
        assert_eq!(c.request_term_count(2.0).unwrap().approximation, "2.6667");
    }

    #[test]
    fn superseded_request_changes_nothing_visible() {
        let cfg = Variant::Ranged.builder().mode(Mode::Incremental).build().unwrap();
        let mut c = Controller::new(cfg);
        c.request_term_count(5.0).unwrap();
        let before = c.snapshot();

        let generations = Generations::new();
        let token = generations.token(generations.next());
        generations.next();
        let err = c.handle_with(Event::TermCount(2_000.0), &token).unwrap_err();
        assert!(matches!(err, ControllerError::Superseded { .. }));
        assert_eq!(c.state(), before.state);
        assert_eq!(c.approximation(), before.approximation);
        assert_eq!(c.samples(), before.samples);
        // partial progress stays in the cache, all of it correct
        assert_eq!(
            c.accumulator().samples().len(),
            5 + CANCEL_CHECK_INTERVAL as usize
        );
    }
}
