use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;
use bigdecimal::{BigDecimal, RoundingMode, Zero};
use serde::Serialize;

/// Significant digits kept by decimal arithmetic.
pub const DECIMAL_PRECISION: u64 = 28;

/// Numeric representation used for every quantity of one simulation run.
///
/// Two implementations are provided:
///     - `f64`: binary floating point, fast, drifts over long runs.
///     - `BigDecimal`: decimal kept to `DECIMAL_PRECISION` significant
///       digits after every operation.
///
/// The queue trigger is a strict `<` between two accumulated values,
/// so a run never mixes representations.
pub trait Scalar:
    Clone
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Serialize
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Name shown in logs and reports.
    const NAME: &'static str;

    fn zero() -> Self;

    fn from_u64(v: u64) -> Self;

    /// Parse a user supplied number. `None` when malformed or not finite.
    fn parse(s: &str) -> Option<Self>;

    /// Render with exactly `places` digits after the decimal point.
    fn fixed(&self, places: usize) -> String;

    /// Bring the result of an arithmetic operation back to the working precision.
    fn rounded(self) -> Self {
        self
    }

    fn is_positive(&self) -> bool {
        *self > Self::zero()
    }

    fn is_negative(&self) -> bool {
        *self < Self::zero()
    }
}

impl Scalar for f64 {
    const NAME: &'static str = "float";

    fn zero() -> Self {
        0.
    }

    fn from_u64(v: u64) -> Self {
        v as f64
    }

    fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn fixed(&self, places: usize) -> String {
        format!("{:.*}", places, self)
    }
}

impl Scalar for BigDecimal {
    const NAME: &'static str = "decimal";

    fn zero() -> Self {
        <BigDecimal as Zero>::zero()
    }

    fn from_u64(v: u64) -> Self {
        BigDecimal::from(v)
    }

    fn parse(s: &str) -> Option<Self> {
        BigDecimal::from_str(s.trim()).ok()
    }

    fn fixed(&self, places: usize) -> String {
        self.with_scale_round(places as i64, RoundingMode::HalfEven).to_string()
    }

    /// Round half-even to `DECIMAL_PRECISION` significant digits,
    /// then drop trailing zeros of the fraction.
    fn rounded(self) -> Self {
        let digits = self.digits();
        let (_, scale) = self.as_bigint_and_exponent();
        let value = if digits > DECIMAL_PRECISION {
            let scale = scale - (digits - DECIMAL_PRECISION) as i64;
            self.with_scale_round(scale, RoundingMode::HalfEven)
        }
        else {
            self
        };
        let value = value.normalized();
        let (_, scale) = value.as_bigint_and_exponent();
        if scale < 0 {
            value.with_scale(0)
        }
        else {
            value
        }
    }
}
