use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::Error;

/// A finite JSON number held in double precision.
///
/// Infinite and NaN doubles are rejected at construction, so every `Number`
/// has a JSON text form and the type can implement [`Eq`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number(f64);

impl Number {
    pub const ZERO: Number = Number(0.0);
    /// The most negative representable number.
    pub const MIN: Number = Number(f64::MIN);
    /// The largest representable number.
    pub const MAX: Number = Number(f64::MAX);

    /// Creates a number from a finite double.
    ///
    /// # Errors
    /// [`Error::NonFinite`] for infinite or NaN input.
    pub fn new(value: f64) -> Result<Self, Error> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(Error::NonFinite(value))
        }
    }

    /// The underlying double.
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, h: &mut H) {
        // 0.0 and -0.0 compare equal and must hash alike.
        if self.0 == 0.0 {
            0.0f64.to_bits().hash(h);
        } else {
            self.0.to_bits().hash(h);
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! impl_from_integer {
    ($($int:ty),*) => {$(
        impl From<$int> for Number {
            #[allow(clippy::cast_precision_loss)]
            fn from(value: $int) -> Self {
                Number(value as f64)
            }
        }
    )*};
}

impl_from_integer!(u8, u16, u32, u64, i8, i16, i32, i64);

impl TryFrom<f64> for Number {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Error> {
        Number::new(value)
    }
}

impl TryFrom<f32> for Number {
    type Error = Error;

    fn try_from(value: f32) -> Result<Self, Error> {
        Number::new(f64::from(value))
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::Number;
    use crate::error::Error;

    #[test]
    fn zero() {
        assert_eq!(Number::ZERO.get(), 0.0);
    }

    #[test_case(f64::INFINITY)]
    #[test_case(f64::NEG_INFINITY)]
    #[test_case(f64::NAN)]
    fn non_finite_is_rejected(value: f64) {
        assert!(matches!(Number::new(value), Err(Error::NonFinite(_))));
    }

    #[test]
    fn non_finite_float_conversion_is_rejected() {
        assert!(Number::try_from(f32::NAN).is_err());
        assert!(Number::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn integer_widening_is_total() {
        assert_eq!(Number::from(7u8).get(), 7.0);
        assert_eq!(Number::from(-3i64).get(), -3.0);
        assert_eq!(Number::from(u64::MAX).get(), u64::MAX as f64);
    }

    #[test]
    fn display_uses_plain_notation() {
        assert_eq!(Number::from(42u8).to_string(), "42");
        assert_eq!(Number::new(-12.5).unwrap().to_string(), "-12.5");
    }

    #[test]
    fn negative_zero_equals_zero() {
        assert_eq!(Number::new(-0.0).unwrap(), Number::ZERO);
    }
}
