use std::{
    cmp::Ordering,
    fmt::{self, Debug},
    hash::{Hash, Hasher},
    sync::OnceLock,
};

use crate::fixed::{two_pi, Fixed, FixedError};

/// An angle normalized to `[0, 2pi)`, with its sine and cosine computed at
/// most once.
#[derive(Clone)]
pub struct Angle {
    radians: Fixed,
    sin: OnceLock<Fixed>,
    cos: OnceLock<Fixed>,
}

impl Angle {
    pub const ZERO: Angle = Angle {
        radians: Fixed::ZERO,
        sin: OnceLock::new(),
        cos: OnceLock::new(),
    };

    /// Wrap an already-normalized value.
    ///
    /// # Errors
    ///
    /// Fails when the value falls outside `[0, 2pi)` under the fuzzy
    /// comparisons.
    pub fn new(radians: Fixed) -> Result<Angle, FixedError> {
        if radians < Fixed::ZERO || radians >= two_pi() {
            return Err(FixedError::AngleOutOfRange(radians));
        }
        Ok(Angle {
            radians,
            sin: OnceLock::new(),
            cos: OnceLock::new(),
        })
    }

    /// Normalize an arbitrary value into `[0, 2pi)`.
    #[must_use]
    pub fn from_radians(radians: Fixed) -> Angle {
        Angle {
            radians: radians.mod_two_pi(),
            sin: OnceLock::new(),
            cos: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn radians(&self) -> Fixed {
        self.radians
    }

    #[must_use]
    pub fn sin(&self) -> Fixed {
        *self.sin.get_or_init(|| self.radians.sin())
    }

    #[must_use]
    pub fn cos(&self) -> Fixed {
        *self.cos.get_or_init(|| self.radians.cos())
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        self.radians == other.radians
    }
}

impl Eq for Angle {}

impl PartialOrd for Angle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Angle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.radians.cmp(&other.radians)
    }
}

impl Hash for Angle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.radians.hash(state);
    }
}

impl Debug for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} rad", self.radians)
    }
}
