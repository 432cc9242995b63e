//! Fixed-point decimal backed by a big integer.
//!
//! A [`Decimal`] stores an integer count of `10^-INTERNAL_SCALE` units, so
//! addition and negation are exact and only division rounds.  Rounding is
//! always half away from zero, both when dividing at the internal scale and
//! when formatting down to fewer digits.

use std::{
    fmt,
    num::NonZeroU64,
    ops::{AddAssign, Mul},
    sync::OnceLock,
};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

use crate::core::constants::{INTERNAL_SCALE, OUTPUT_DIGITS};

#[inline]
fn pow10(exp: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exp as usize)
}

/// `10^INTERNAL_SCALE`, i.e. the representation of `1`.
fn unit() -> &'static BigInt {
    static UNIT: OnceLock<BigInt> = OnceLock::new();
    UNIT.get_or_init(|| pow10(INTERNAL_SCALE))
}

/// `n / d` rounded half away from zero.  `d` must be positive.
fn round_div(n: &BigInt, d: &BigInt) -> BigInt {
    let (q, r) = n.div_rem(d); // truncates toward zero, `r` carries the sign of `n`
    if r.abs() * 2u32 >= *d {
        if n.is_negative() { q - 1 } else { q + 1 }
    } else {
        q
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal {
    units: BigInt,
}

impl Decimal {
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_int(v: i64) -> Self {
        Self {
            units: BigInt::from(v) * unit(),
        }
    }

    /// `numerator / denominator` at the internal scale.
    ///
    /// The denominator type rules out zero and negative divisors, so this
    /// never fails.
    #[must_use]
    pub fn divide(numerator: &Self, denominator: NonZeroU64) -> Self {
        Self {
            units: round_div(&numerator.units, &BigInt::from(denominator.get())),
        }
    }

    #[inline]
    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            units: -&self.units,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.units.is_negative()
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.units.is_zero()
    }

    /// Render with exactly `digits` fractional digits, half away from zero.
    ///
    /// A value that rounds to zero is printed without a sign.
    ///
    /// # Panics
    /// If `digits` exceeds the internal scale.
    #[must_use]
    pub fn format_fixed(&self, digits: u32) -> String {
        assert!(
            digits <= INTERNAL_SCALE,
            "cannot format {digits} digits from a scale of {INTERNAL_SCALE}"
        );
        let rounded = round_div(&self.units, &pow10(INTERNAL_SCALE - digits));
        let (int, frac) = rounded.abs().div_rem(&pow10(digits));
        let sign = if rounded.is_negative() { "-" } else { "" };
        if digits == 0 {
            return format!("{sign}{int}");
        }
        let frac = frac.to_string();
        format!("{sign}{int}.{frac:0>width$}", width = digits as usize)
    }
}

impl AddAssign<&Decimal> for Decimal {
    #[inline]
    fn add_assign(&mut self, rhs: &Decimal) {
        self.units += &rhs.units;
    }
}

/// Exact scaling by a small integer (the final `× 4`).
impl Mul<u32> for &Decimal {
    type Output = Decimal;

    #[inline]
    fn mul(self, rhs: u32) -> Decimal {
        Decimal {
            units: &self.units * rhs,
        }
    }
}

/// `{}` prints [`OUTPUT_DIGITS`] fractional digits, `{:.N}` prints `N`
/// (capped at the internal scale).
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f
            .precision()
            .map_or(OUTPUT_DIGITS, |p| u32::try_from(p).unwrap_or(INTERNAL_SCALE))
            .min(INTERNAL_SCALE);
        f.write_str(&self.format_fixed(digits))
    }
}
