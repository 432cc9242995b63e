//! A collection of constants.

/// Fractional digits carried internally by [`Decimal`](crate::core::decimal::Decimal).
///
/// 10 000 terms each rounded at 1e-40 stay far below the 1e-19 output step.
pub const INTERNAL_SCALE: u32 = 40;

/// Approximations are printed with 19 fractional digits.
pub const OUTPUT_DIGITS: u32 = 19;
/// Leave at least ten guard digits between output and internal precision.
pub const MAX_OUTPUT_DIGITS: u32 = 30;

/// Every session starts with a single term summed.
pub const INITIAL_POWER: u32 = 1;
/// `4 × 1`, shown before the first request is computed.
pub const INITIAL_APPROXIMATION: &str = "4.0000000000000000000";

/// No configuration may go past this without explicit confirmation.
pub const HARD_MAX_POWER: u32 = 100_000;

/// Single-slider variant: one fixed bound.
pub const CLASSIC_MAX_POWER: u32 = 10_000;
pub const CLASSIC_WARNING_THRESHOLD: u32 = 3_000;

/// Selectable-range variant.
pub const RANGED_LIMITS: [u32; 4] = [100, 1_000, 5_000, 10_000];
pub const RANGED_WARNING_THRESHOLD: u32 = 1_000;

/// How many terms are summed between two cancellation polls.
pub const CANCEL_CHECK_INTERVAL: u32 = 64;

pub const WARNING_TEXT: &str =
    "Warning: this calculation can be very heavy and may fail to complete.";
/// Banner colours at intensity 0.
pub const WARNING_BACKGROUND_HEX: &str = "#FFFAF0";
pub const WARNING_FOREGROUND_HEX: &str = "#FFA500";
