//! Leibniz series accumulation with a reusable sample cache.
//!
//! Term `i` is `(-1)^i / (2i + 1)`; the approximation after `N` terms is four
//! times the partial sum.  The cache holds one [`Sample`] per term-count,
//! `1..=len`, so it can be
//! * **extended** by summing only the missing terms,
//! * **truncated** to a smaller term-count without touching any value.
//!
//! Two strategies share that cache code:
//! * `Mode::Incremental`   - keep the cache between requests
//! * `Mode::FullRecompute` - start from an empty cache every time
//!
//! Both run identical arithmetic in identical order, so they agree digit for
//! digit on every `N`.

use std::{mem, num::NonZeroU64};

use tracing::{debug, trace};

use crate::core::{
    cancel::{Interrupt, Never},
    constants::CANCEL_CHECK_INTERVAL,
    decimal::Decimal,
    error::SeriesError,
};

/// `(-1)^index / (2 * index + 1)`.
#[must_use]
pub fn term(index: u32) -> Decimal {
    let denominator = NonZeroU64::MIN.saturating_add(2 * u64::from(index));
    let magnitude = Decimal::divide(&Decimal::from_int(1), denominator);
    if index % 2 == 0 {
        magnitude
    } else {
        magnitude.negate()
    }
}

/// Partial sum after `term_count` terms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    term_count: u32,
    partial_sum: Decimal,
}

impl Sample {
    #[inline]
    #[must_use]
    pub fn term_count(&self) -> u32 {
        self.term_count
    }

    /// Unscaled sum of the first `term_count` terms.
    #[inline]
    #[must_use]
    pub fn partial_sum(&self) -> &Decimal {
        &self.partial_sum
    }

    /// `4 × partial_sum`.
    #[inline]
    #[must_use]
    pub fn approximation(&self) -> Decimal {
        &self.partial_sum * 4
    }

    #[inline]
    #[must_use]
    pub fn formatted(&self, digits: u32) -> String {
        self.approximation().format_fixed(digits)
    }
}

/// Selectable accumulation strategy.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Incremental,
    FullRecompute,
}

/// Work counters, the only way to observe reuse from outside.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    pub requests: u64,
    pub terms_evaluated: u64,
    pub samples_reused: u64,
    pub samples_discarded: u64,
}

/// What `advance` is going to do for a given `n`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reuse {
    /// `n` is already the last cached term-count.
    Hit,
    /// Drop everything above `keep`; nothing is computed.
    Truncate { keep: u32 },
    /// Reuse `1..=from`, compute `from + 1..=to`.
    Extend { from: u32, to: u32 },
}

/// Result of one cache step.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Progress {
    /// The sample for the requested term-count.
    Complete(Sample),
    /// Stopped early; the cache is valid up to `reached`.
    Interrupted { reached: u32 },
}

/// Ordered samples for term-counts `1..=len`.
#[derive(Clone, Debug, Default)]
pub struct SampleCache {
    samples: Vec<Sample>,
}

impl SampleCache {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[inline]
    #[must_use]
    pub fn largest_term_count(&self) -> u32 {
        self.samples.last().map_or(0, |s| s.term_count)
    }

    #[must_use]
    pub fn get(&self, term_count: u32) -> Option<&Sample> {
        let index = usize::try_from(term_count).ok()?.checked_sub(1)?;
        self.samples.get(index).filter(|s| s.term_count == term_count)
    }

    /// Entry `k` holds term-count `k + 1` for every `k`.
    ///
    /// Entries are only ever appended in order, so checking the last one is
    /// enough.
    fn is_prefix_consistent(&self) -> bool {
        self.largest_term_count() as usize == self.samples.len()
    }

    /// Length of the leading run that satisfies the prefix invariant.
    fn consistent_prefix_len(&self) -> usize {
        self.samples
            .iter()
            .zip(1u32..)
            .take_while(|(s, k)| s.term_count == *k)
            .count()
    }

    /// Pure reuse decision for `n` (`n >= 1`).
    #[must_use]
    pub fn plan(&self, n: u32) -> Reuse {
        let cached = self.largest_term_count();
        if !self.is_prefix_consistent() {
            let from = u32::try_from(self.consistent_prefix_len()).unwrap_or(u32::MAX);
            return if n <= from {
                Reuse::Truncate { keep: n }
            } else {
                Reuse::Extend { from, to: n }
            };
        }
        match n.cmp(&cached) {
            std::cmp::Ordering::Equal => Reuse::Hit,
            std::cmp::Ordering::Less => Reuse::Truncate { keep: n },
            std::cmp::Ordering::Greater => Reuse::Extend { from: cached, to: n },
        }
    }

    /// Move the cache to term-count `n`, reusing every value already present.
    ///
    /// Consumes the old cache and hands back the new one together with the
    /// outcome.  When `interrupt` fires, the returned cache still satisfies
    /// the prefix invariant, it just ends short of `n`.
    pub fn advance(
        mut self,
        n: u32,
        interrupt: &impl Interrupt,
        stats: &mut Stats,
    ) -> (Self, Progress) {
        debug_assert!(n >= 1, "term counts start at 1");
        let plan = self.plan(n);
        trace!(?plan, n, cached = self.len(), "cache plan");

        let (from, to) = match plan {
            Reuse::Hit => {
                stats.samples_reused += self.samples.len() as u64;
                let last = self.samples[self.samples.len() - 1].clone();
                return (self, Progress::Complete(last));
            }
            Reuse::Truncate { keep } => {
                let keep = keep as usize;
                stats.samples_discarded += (self.samples.len() - keep) as u64;
                stats.samples_reused += keep as u64;
                self.samples.truncate(keep);
                debug!(keep, "truncated sample cache");
                let last = self.samples[keep - 1].clone();
                return (self, Progress::Complete(last));
            }
            Reuse::Extend { from, to } => (from, to),
        };

        let from_len = from as usize;
        stats.samples_discarded += (self.samples.len() - from_len) as u64;
        stats.samples_reused += from_len as u64;
        self.samples.truncate(from_len);
        self.samples.reserve((to - from) as usize);

        let mut running = self
            .samples
            .last()
            .map_or_else(Decimal::zero, |s| s.partial_sum.clone());

        for index in from..to {
            if (index - from) % CANCEL_CHECK_INTERVAL == 0 && index != from && interrupt.is_superseded() {
                debug!(reached = index, target = to, "extension interrupted");
                return (self, Progress::Interrupted { reached: index });
            }
            running += &term(index);
            stats.terms_evaluated += 1;
            self.samples.push(Sample {
                term_count: index + 1,
                partial_sum: running.clone(),
            });
        }
        debug!(from, to, "extended sample cache");

        let last = Sample {
            term_count: to,
            partial_sum: running,
        };
        (self, Progress::Complete(last))
    }
}

/// Approximation engine holding the cache between requests.
#[derive(Debug, Default)]
pub struct Accumulator {
    mode: Mode,
    cache: SampleCache,
    stats: Stats,
}

impl Accumulator {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            cache: SampleCache::default(),
            stats: Stats::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Samples `1..=N` of the last completed request.
    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        self.cache.samples()
    }

    pub fn clear(&mut self) {
        self.cache = SampleCache::default();
    }

    /// Sample after `n` terms.
    ///
    /// # Errors
    /// [`SeriesError::InvalidTermCount`] if `n == 0`.
    pub fn approximate(&mut self, n: u32) -> Result<Sample, SeriesError> {
        self.approximate_with(n, &Never)
    }

    /// Like [`approximate`](Self::approximate) but polls `interrupt` while
    /// summing.
    ///
    /// # Errors
    /// [`SeriesError::InvalidTermCount`] if `n == 0`,
    /// [`SeriesError::Superseded`] if `interrupt` fired first.
    pub fn approximate_with(
        &mut self,
        n: u32,
        interrupt: &impl Interrupt,
    ) -> Result<Sample, SeriesError> {
        if n < 1 {
            return Err(SeriesError::InvalidTermCount { requested: n });
        }
        self.stats.requests += 1;

        match self.mode {
            Mode::Incremental => {
                let (cache, progress) =
                    mem::take(&mut self.cache).advance(n, interrupt, &mut self.stats);
                self.cache = cache;
                match progress {
                    Progress::Complete(sample) => Ok(sample),
                    Progress::Interrupted { reached } => Err(SeriesError::Superseded { reached }),
                }
            }
            Mode::FullRecompute => {
                let (fresh, progress) =
                    SampleCache::default().advance(n, interrupt, &mut self.stats);
                match progress {
                    Progress::Complete(sample) => {
                        self.cache = fresh;
                        Ok(sample)
                    }
                    Progress::Interrupted { reached } => Err(SeriesError::Superseded { reached }),
                }
            }
        }
    }
}

/// Samples `1..=n` computed from scratch.  The correctness baseline.
///
/// # Errors
/// [`SeriesError::InvalidTermCount`] if `n == 0`.
pub fn full_recompute(n: u32) -> Result<Vec<Sample>, SeriesError> {
    let mut acc = Accumulator::new(Mode::FullRecompute);
    acc.approximate(n)?;
    Ok(acc.cache.samples)
}
