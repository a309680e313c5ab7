//! Fixed-precision decimal arithmetic with offset-randomized comparison.
//!
//! A [`Fixed`] stores its value times `10^COMPUTE_SCALE` in a single `I512`.
//! Arithmetic rounds half-even back to `COMPUTE_SCALE` places, while
//! comparison, equality, and hashing all go through the same rounding to
//! `COMPARE_SCALE` places after adding a per-process random offset. Two
//! values that agree after that rounding are indistinguishable everywhere,
//! which is what lets circles and points be used as hash keys.

use std::{
    cmp::Ordering,
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
    iter::Sum,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
    str::FromStr,
    sync::OnceLock,
};

use bnum::{cast::As, types::I512};
use rand::Rng;
use thiserror::Error;

/// Decimal places carried by every stored value and arithmetic result.
pub const COMPUTE_SCALE: u32 = 40;
/// Decimal places that participate in comparison, equality, and hashing.
pub const COMPARE_SCALE: u32 = 20;

const _: () = assert!(COMPARE_SCALE < COMPUTE_SCALE);
// The comparison offset is sampled through a u128.
const _: () = assert!(COMPUTE_SCALE - COMPARE_SCALE <= 38);

const PI_50: &str = "3.14159265358979323846264338327950288419716939937511";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixedError {
    #[error("atan2(0, 0) is undefined")]
    Atan2Undefined,
    #[error("not a decimal literal: {0:?}")]
    InvalidDecimal(String),
    #[error("angle {0} is outside [0, 2pi)")]
    AngleOutOfRange(Fixed),
}

fn ten_pow(exponent: u32) -> I512 {
    I512::from(10_u8).pow(exponent)
}

/// `10^COMPUTE_SCALE`, the unit count of 1.
fn one_units() -> I512 {
    static UNITS: OnceLock<I512> = OnceLock::new();
    *UNITS.get_or_init(|| ten_pow(COMPUTE_SCALE))
}

/// `10^(COMPUTE_SCALE - COMPARE_SCALE)`, the width of a comparison bucket.
fn bucket_units() -> I512 {
    static UNITS: OnceLock<I512> = OnceLock::new();
    *UNITS.get_or_init(|| ten_pow(COMPUTE_SCALE - COMPARE_SCALE))
}

/// The per-process comparison offset, drawn once from `[0, 10^-COMPARE_SCALE)`
/// and immutable afterwards. Mutating it would invalidate every hash computed
/// so far.
fn offset_units() -> I512 {
    static OFFSET: OnceLock<I512> = OnceLock::new();
    *OFFSET.get_or_init(|| {
        let bound = 10_u128.pow(COMPUTE_SCALE - COMPARE_SCALE);
        I512::from(rand::rng().random_range(0..bound))
    })
}

/// Round `num / den` to the nearest integer, ties to even.
fn div_round_half_even(num: I512, den: I512) -> I512 {
    debug_assert!(den != I512::ZERO);
    let (num, den) = if den < I512::ZERO { (-num, -den) } else { (num, den) };
    let quotient = num.div_euclid(den);
    let remainder = num.rem_euclid(den);
    match (remainder << 1_u32).cmp(&den) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + I512::ONE,
        Ordering::Equal => {
            if quotient.rem_euclid(I512::from(2_u8)) == I512::ZERO {
                quotient
            } else {
                quotient + I512::ONE
            }
        }
    }
}

/// A signed decimal scalar with `COMPUTE_SCALE` places.
#[derive(Clone, Copy)]
pub struct Fixed {
    units: I512,
}

impl Fixed {
    pub const ZERO: Fixed = Fixed { units: I512::ZERO };

    fn one() -> Fixed {
        Fixed { units: one_units() }
    }

    /// The comparison bucket this value falls into. Everything observable
    /// about a `Fixed` (`==`, `<`, hash) is a function of this number.
    fn compare_units(&self) -> I512 {
        (self.units + offset_units()).div_euclid(bucket_units())
    }

    /// Fuzzy comparison against zero, in the style of a sign function.
    #[must_use]
    pub fn cmp_zero(&self) -> Ordering {
        self.cmp(&Fixed::ZERO)
    }

    /// Returns `true` if the value compares equal to zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.cmp_zero() == Ordering::Equal
    }

    #[must_use]
    pub fn abs(self) -> Fixed {
        if self.units < I512::ZERO { -self } else { self }
    }

    /// Lossy conversion, used only to seed Newton iterations.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        let approx: f64 = self.units.as_();
        approx / 1e40
    }

    /// Square root to `COMPUTE_SCALE` places, by Newton iteration seeded from
    /// the `f64` square root. Negative inputs saturate to zero.
    #[must_use]
    pub fn sqrt(self) -> Fixed {
        if self.units <= I512::ZERO {
            return Fixed::ZERO;
        }
        let two = Fixed::from(2);
        let seed = self.to_f64().sqrt();
        let mut guess = if seed.is_finite() && seed > 0.0 {
            Fixed::from(seed)
        } else {
            self
        };
        if guess.units == I512::ZERO {
            guess = self;
        }
        // The seed is good to ~16 places and Newton doubles that each round,
        // so this converges in two or three iterations; the bound is a guard
        // against unit-level oscillation.
        for _ in 0..64 {
            let next = (guess + self / guess) / two;
            let delta = next.units - guess.units;
            guess = next;
            if delta.abs() <= I512::ONE {
                break;
            }
        }
        guess
    }

    /// Arcsine in `[-pi/2, pi/2]`. Inputs outside `[-1, 1]` clamp to the
    /// endpoints. Taylor at 0 for small arguments, the Puiseux expansion at 1
    /// otherwise; the two meet at 1/2 where both converge quickly.
    #[must_use]
    pub fn asin(self) -> Fixed {
        if self.units < I512::ZERO {
            return -(-self).asin();
        }
        let one = Fixed::one();
        if self > one {
            return half_pi();
        }
        if (self.units << 1_u32) <= one_units() {
            return taylor_asin(self);
        }
        // asin(x) = pi/2 - sqrt(2(1-x)) * sum c_n (1-x)^n,
        // c_0 = 1, c_{n+1}/c_n = (2n+1)^2 / (4(n+1)(2n+3)).
        let z = one - self;
        let mut term = Fixed::one();
        let mut sum = term;
        let mut n: i64 = 0;
        while term.units != I512::ZERO {
            let numerator = Fixed::from((2 * n + 1) * (2 * n + 1));
            let denominator = Fixed::from(4 * (n + 1) * (2 * n + 3));
            term = term * z * numerator / denominator;
            sum += term;
            n += 1;
        }
        half_pi() - (z * Fixed::from(2)).sqrt() * sum
    }

    /// Arccosine in `[0, pi]`; out-of-range inputs clamp to the endpoints.
    #[must_use]
    pub fn acos(self) -> Fixed {
        half_pi() - self.asin()
    }

    /// Arctangent in `(-pi/2, pi/2)`.
    #[must_use]
    pub fn atan(self) -> Fixed {
        (self / (Fixed::one() + self * self).sqrt()).asin()
    }

    /// The angle of the vector `(x, y)` measured counterclockwise from the
    /// positive x axis, in `[0, 2pi)`.
    ///
    /// # Errors
    ///
    /// Fails when both arguments compare equal to zero.
    pub fn atan2_mod_two_pi(y: Fixed, x: Fixed) -> Result<Fixed, FixedError> {
        match (x.cmp_zero(), y.cmp_zero()) {
            (Ordering::Equal, Ordering::Equal) => Err(FixedError::Atan2Undefined),
            (Ordering::Equal, Ordering::Greater) => Ok(half_pi()),
            (Ordering::Equal, Ordering::Less) => Ok(three_half_pi()),
            (Ordering::Greater, Ordering::Equal) => Ok(Fixed::ZERO),
            (Ordering::Less, Ordering::Equal) => Ok(pi()),
            (x_sign, y_sign) => {
                let reference = (y.abs() / x.abs()).atan();
                Ok(match (x_sign, y_sign) {
                    (Ordering::Greater, Ordering::Greater) => reference,
                    (Ordering::Less, Ordering::Greater) => pi() - reference,
                    (Ordering::Less, Ordering::Less) => pi() + reference,
                    _ => two_pi() - reference,
                })
            }
        }
    }

    /// Sine by the Taylor series at 0, after normalizing into `[0, 2pi)`.
    #[must_use]
    pub fn sin(self) -> Fixed {
        let x = self.mod_two_pi();
        let x_squared = x * x;
        let mut term = x;
        let mut sum = x;
        let mut n: i64 = 1;
        while term.units != I512::ZERO {
            term = -(term * x_squared) / Fixed::from((2 * n) * (2 * n + 1));
            sum += term;
            n += 1;
        }
        sum
    }

    #[must_use]
    pub fn cos(self) -> Fixed {
        (self + half_pi()).sin()
    }

    /// Normalize into `[0, 2pi)` under the fuzzy comparisons.
    ///
    /// Written as a subtraction loop on purpose: a value may compare equal to
    /// `2pi` while its exact units fall short of it, so dividing by the exact
    /// constant would disagree with `==`.
    #[must_use]
    pub fn mod_two_pi(self) -> Fixed {
        let tau = two_pi();
        let mut value = self;
        while value >= tau {
            value -= tau;
        }
        while value < Fixed::ZERO {
            value += tau;
        }
        value
    }
}

/// Taylor series of asin at 0; converges fast for |x| <= 1/2.
fn taylor_asin(x: Fixed) -> Fixed {
    let x_squared = x * x;
    let mut term = x;
    let mut sum = x;
    let mut n: i64 = 0;
    while term.units != I512::ZERO {
        let numerator = Fixed::from((2 * n + 1) * (2 * n + 1));
        let denominator = Fixed::from((2 * n + 2) * (2 * n + 3));
        term = term * x_squared * numerator / denominator;
        sum += term;
        n += 1;
    }
    sum
}

pub fn pi() -> Fixed {
    static PI: OnceLock<Fixed> = OnceLock::new();
    *PI.get_or_init(|| PI_50.parse().expect("the pi literal parses"))
}

pub fn two_pi() -> Fixed {
    static TWO_PI: OnceLock<Fixed> = OnceLock::new();
    *TWO_PI.get_or_init(|| pi() * Fixed::from(2))
}

pub fn half_pi() -> Fixed {
    static HALF_PI: OnceLock<Fixed> = OnceLock::new();
    *HALF_PI.get_or_init(|| pi() / Fixed::from(2))
}

pub fn three_half_pi() -> Fixed {
    static THREE_HALF_PI: OnceLock<Fixed> = OnceLock::new();
    *THREE_HALF_PI.get_or_init(|| pi() + half_pi())
}

impl PartialEq for Fixed {
    fn eq(&self, other: &Self) -> bool {
        self.compare_units() == other.compare_units()
    }
}

impl Eq for Fixed {}

impl PartialOrd for Fixed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fixed {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_units().cmp(&other.compare_units())
    }
}

impl Hash for Fixed {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.compare_units().hash(state);
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Fixed) {
        self.units += rhs.units;
    }
}

impl Add for Fixed {
    type Output = Fixed;

    fn add(mut self, rhs: Fixed) -> Fixed {
        self += rhs;
        self
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Fixed) {
        self.units -= rhs.units;
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    fn sub(mut self, rhs: Fixed) -> Fixed {
        self -= rhs;
        self
    }
}

impl MulAssign for Fixed {
    fn mul_assign(&mut self, rhs: Fixed) {
        self.units = div_round_half_even(self.units * rhs.units, one_units());
    }
}

impl Mul for Fixed {
    type Output = Fixed;

    fn mul(mut self, rhs: Fixed) -> Fixed {
        self *= rhs;
        self
    }
}

impl DivAssign for Fixed {
    fn div_assign(&mut self, rhs: Fixed) {
        self.units = div_round_half_even(self.units * one_units(), rhs.units);
    }
}

impl Div for Fixed {
    type Output = Fixed;

    fn div(mut self, rhs: Fixed) -> Fixed {
        self /= rhs;
        self
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    fn neg(self) -> Fixed {
        Fixed { units: -self.units }
    }
}

impl Sum for Fixed {
    fn sum<I: Iterator<Item = Fixed>>(iter: I) -> Fixed {
        iter.fold(Fixed::ZERO, |acc, value| acc + value)
    }
}

impl From<i64> for Fixed {
    fn from(value: i64) -> Fixed {
        Fixed {
            units: I512::from(value) * one_units(),
        }
    }
}

impl From<i32> for Fixed {
    fn from(value: i32) -> Fixed {
        Fixed::from(i64::from(value))
    }
}

impl From<u32> for Fixed {
    fn from(value: u32) -> Fixed {
        Fixed::from(i64::from(value))
    }
}

impl From<f64> for Fixed {
    /// Exact dyadic expansion of the `f64`; nothing beyond the input's own 53
    /// bits is invented or lost.
    fn from(value: f64) -> Fixed {
        assert!(value.is_finite(), "only finite values are representable");
        assert!(value.abs() < 1e100, "value out of range: {value}");
        if value == 0.0 {
            return Fixed::ZERO;
        }
        let bits = value.to_bits();
        let mantissa_bits = bits & ((1_u64 << 52) - 1);
        let biased_exponent = ((bits >> 52) & 0x7ff) as i32;
        let (mantissa, exponent) = if biased_exponent == 0 {
            (mantissa_bits, -1074_i32)
        } else {
            (mantissa_bits | (1_u64 << 52), biased_exponent - 1075)
        };
        let scaled = I512::from(mantissa) * one_units();
        let magnitude = if exponent >= 0 {
            scaled << exponent.unsigned_abs()
        } else if exponent < -300 {
            // Far below the representable resolution.
            I512::ZERO
        } else {
            div_round_half_even(scaled, I512::ONE << exponent.unsigned_abs())
        };
        Fixed {
            units: if value < 0.0 { -magnitude } else { magnitude },
        }
    }
}

impl FromStr for Fixed {
    type Err = FixedError;

    fn from_str(s: &str) -> Result<Fixed, FixedError> {
        let invalid = || FixedError::InvalidDecimal(s.to_owned());
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        let digits = |text: &str| -> Result<I512, FixedError> {
            text.chars().try_fold(I512::ZERO, |acc, c| {
                let digit = c.to_digit(10).ok_or_else(invalid)?;
                Ok(acc * I512::from(10_u8) + I512::from(digit))
            })
        };
        let mut units = digits(int_part)? * one_units();
        let frac_digits = u32::try_from(frac_part.len()).map_err(|_| invalid())?;
        if frac_digits > 0 {
            let frac = digits(frac_part)?;
            units += if frac_digits <= COMPUTE_SCALE {
                frac * ten_pow(COMPUTE_SCALE - frac_digits)
            } else {
                div_round_half_even(frac, ten_pow(frac_digits - COMPUTE_SCALE))
            };
        }
        Ok(Fixed {
            units: if negative { -units } else { units },
        })
    }
}

impl Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.units.abs();
        let int_part = magnitude / one_units();
        let frac_part = magnitude % one_units();
        let sign = if self.units < I512::ZERO { "-" } else { "" };
        let mut frac_digits = frac_part.to_string();
        frac_digits.insert_str(0, &"0".repeat(COMPUTE_SCALE as usize - frac_digits.len()));
        let frac_digits = frac_digits.trim_end_matches('0');
        if frac_digits.is_empty() {
            write!(f, "{sign}{int_part}")
        } else {
            write!(f, "{sign}{int_part}.{frac_digits}")
        }
    }
}

impl Debug for Fixed {
    // A forty-digit mantissa in struct notation helps nobody.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}
