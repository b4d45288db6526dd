use num_traits::{Float, FloatConst, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

/// Floating point scalar the solver is generic over.
///
/// Blanket-implemented for every type with the listed `num_traits` and
/// formatting bounds, which in practice means `f32` and `f64`.
pub trait FloatT:
    Float + FloatConst + NumAssign + FromPrimitive + Default + Debug + Display + LowerExp + Send + 'static
{
    /// Converts an `f64` constant.  Values that do not fit become NaN,
    /// which the solver's finiteness checks then catch.
    #[inline]
    fn lit(x: f64) -> Self {
        Self::from_f64(x).unwrap_or_else(Self::nan)
    }

    /// Converts a count, e.g. a dimension used as a divisor.
    #[inline]
    fn from_count(n: usize) -> Self {
        Self::from_usize(n).unwrap_or_else(Self::nan)
    }

    /// `self` limited to `[lo, hi]`
    #[inline]
    fn clip(self, lo: Self, hi: Self) -> Self {
        if self < lo {
            lo
        } else if self > hi {
            hi
        } else {
            self
        }
    }
}

impl<T> FloatT for T where
    T: Float
        + FloatConst
        + NumAssign
        + FromPrimitive
        + Default
        + Debug
        + Display
        + LowerExp
        + Send
        + 'static
{
}
