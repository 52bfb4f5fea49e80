//! Number value type: signed, unsigned, or floating point.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display, Formatter};

/// Internal representation of a number.
#[derive(Copy, Clone)]
enum Repr {
    /// Signed 64-bit integer
    I64(i64),
    /// Unsigned 64-bit integer that does not fit in `i64`
    U64(u64),
    /// Finite 64-bit floating point
    F64(f64),
}

/// A JSON number value.
///
/// Integers that fit in `i64` are always stored as `i64`, so two equal
/// integers compare equal regardless of how they were produced. Floats are
/// always finite.
#[derive(Copy, Clone)]
pub struct VNumber(Repr);

impl VNumber {
    /// Creates a number from an i64.
    #[must_use]
    pub const fn from_i64(v: i64) -> Self {
        VNumber(Repr::I64(v))
    }

    /// Creates a number from a u64.
    #[must_use]
    pub const fn from_u64(v: u64) -> Self {
        if v <= i64::MAX as u64 {
            VNumber(Repr::I64(v as i64))
        } else {
            VNumber(Repr::U64(v))
        }
    }

    /// Creates a number from an f64.
    ///
    /// Returns `None` if the value is NaN or infinite.
    #[must_use]
    pub fn from_f64(v: f64) -> Option<Self> {
        v.is_finite().then_some(VNumber(Repr::F64(v)))
    }

    /// Converts to i64 if it is an integer that fits.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        match self.0 {
            Repr::I64(i) => Some(i),
            Repr::U64(_) | Repr::F64(_) => None,
        }
    }

    /// Converts to u64 if it is a non-negative integer.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        match self.0 {
            Repr::I64(i) => u64::try_from(i).ok(),
            Repr::U64(u) => Some(u),
            Repr::F64(_) => None,
        }
    }

    /// Returns the float, if this number is one.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        match self.0 {
            Repr::F64(f) => Some(f),
            Repr::I64(_) | Repr::U64(_) => None,
        }
    }

    /// Converts to f64, rounding large integers.
    #[must_use]
    pub fn to_f64_lossy(&self) -> f64 {
        match self.0 {
            Repr::I64(i) => i as f64,
            Repr::U64(u) => u as f64,
            Repr::F64(f) => f,
        }
    }

    /// Returns `true` if this number was stored as a float.
    #[must_use]
    pub fn is_float(&self) -> bool {
        matches!(self.0, Repr::F64(_))
    }

    /// Returns `true` if this number is an integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        !self.is_float()
    }
}

impl PartialEq for VNumber {
    fn eq(&self, other: &Self) -> bool {
        match (self.0, other.0) {
            (Repr::I64(a), Repr::I64(b)) => a == b,
            (Repr::U64(a), Repr::U64(b)) => a == b,
            (Repr::F64(a), Repr::F64(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for VNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.0, other.0) {
            (Repr::I64(a), Repr::I64(b)) => a.partial_cmp(&b),
            (Repr::U64(a), Repr::U64(b)) => a.partial_cmp(&b),
            // a U64 is always above i64::MAX
            (Repr::I64(_), Repr::U64(_)) => Some(Ordering::Less),
            (Repr::U64(_), Repr::I64(_)) => Some(Ordering::Greater),
            _ => self.to_f64_lossy().partial_cmp(&other.to_f64_lossy()),
        }
    }
}

impl Debug for VNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for VNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::I64(i) => write!(f, "{i}"),
            Repr::U64(u) => write!(f, "{u}"),
            // Debug keeps the fractional part ("1.0", not "1")
            Repr::F64(v) => write!(f, "{v:?}"),
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for VNumber {
                fn from(v: $t) -> Self {
                    VNumber::from_i64(v as i64)
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for VNumber {
                fn from(v: $t) -> Self {
                    VNumber::from_u64(v as u64)
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);
