use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::{
    config::{ChartPolicy, Config, ConfigBuilder, Variant},
    error::ConfigError,
    series::Mode,
};

/// Top-level CLI structure.
#[derive(Parser)]
#[command(
    name = "leibniz",
    about = "Approximate π with the Leibniz series, term by term"
)]
pub struct Cli {
    /// Emit debug logs and timings on stderr (`RUST_LOG` overrides)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Approximation after N terms, with the alert banner
    Approx(ApproxArgs),
    /// Every partial sum 1..=N as `term_count,approximation` CSV
    Series(ApproxArgs),
    /// Drive a session from an event stream (`n 42`, `limit 1000`, `flush`)
    Replay(ReplayArgs),
    /// Describe the built-in configurations
    Variants,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum VariantArg {
    Classic,
    Ranged,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Incremental,
    Full,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ChartArg {
    Dense,
    History,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Classic => Self::Classic,
            VariantArg::Ranged => Self::Ranged,
        }
    }
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Incremental => Self::Incremental,
            ModeArg::Full => Self::FullRecompute,
        }
    }
}

impl From<ChartArg> for ChartPolicy {
    fn from(c: ChartArg) -> Self {
        match c {
            ChartArg::Dense => Self::Dense,
            ChartArg::History => Self::History,
        }
    }
}

/// Settings shared by every computing subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Built-in configuration to start from
    #[arg(long, value_enum, default_value = "ranged")]
    pub variant: VariantArg,

    /// Accumulation strategy (variant default if omitted)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Chart sample policy (variant default if omitted)
    #[arg(long, value_enum)]
    pub chart: Option<ChartArg>,

    /// Fractional digits in the output
    #[arg(long)]
    pub digits: Option<u32>,

    /// Upper bound for the term count
    #[arg(long)]
    pub max_power: Option<u32>,

    /// Term count from which requests are flagged as expensive
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Selectable range limits, comma separated
    #[arg(long, value_delimiter = ',')]
    pub limits: Option<Vec<u32>>,

    /// Range limit active at start
    #[arg(long)]
    pub initial_limit: Option<u32>,

    /// Accept a max power above the hard cap
    #[arg(long)]
    pub force: bool,
}

impl ConfigArgs {
    pub fn build(&self) -> Result<Config, ConfigError> {
        let mut b: ConfigBuilder = Variant::from(self.variant).builder();
        if let Some(m) = self.mode {
            b = b.mode(m.into());
        }
        if let Some(c) = self.chart {
            b = b.chart(c.into());
        }
        if let Some(d) = self.digits {
            b = b.digits(d);
        }
        if let Some(limits) = &self.limits {
            b = b.range_limits(limits.iter().copied());
        } else if let Some(max) = self.max_power {
            b = b.range_limits([max]);
        }
        if let Some(max) = self.max_power {
            b = b.max_power(max);
        }
        if let Some(t) = self.threshold {
            b = b.warning_threshold(t);
        }
        if let Some(l) = self.initial_limit {
            b = b.initial_limit(l);
        }
        b.confirm_above_hard_cap(self.force).build()
    }
}

/// `leibniz approx …` / `leibniz series …`
#[derive(Args, Debug)]
pub struct ApproxArgs {
    /// Number of terms to sum (clamped to the active range limit)
    #[arg(value_name = "N", allow_negative_numbers = true)]
    pub terms: f64,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// `leibniz replay …`
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Event file (use `-` for stdin)
    #[arg(value_name = "FILE", default_value = "-")]
    pub file: String,

    /// Compute on a background worker instead of inline
    #[arg(long)]
    pub threaded: bool,

    /// Print the full sample sequence with every update
    #[arg(long)]
    pub samples: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}
