use super::FloatT;
use itertools::izip;

/// In-place arithmetic on dense vectors.
///
/// Mutating methods return `&mut Self` so that short sequences read
/// left to right, e.g. `y.copy_from(v).hadamard(d)`.
pub trait VectorMath<T> {
    /// `self = src`
    fn copy_from(&mut self, src: &[T]) -> &mut Self;

    /// every entry set to `c`
    fn set(&mut self, c: T) -> &mut Self;

    /// `self *= c`
    fn scale(&mut self, c: T) -> &mut Self;

    /// `self = -self`
    fn negate(&mut self) -> &mut Self;

    /// `self[i] *= d[i]`
    fn hadamard(&mut self, d: &[T]) -> &mut Self;

    /// `self = a*x + b*self`
    fn axpby(&mut self, a: T, x: &[T], b: T) -> &mut Self;

    /// `self = a*x + b*y`
    fn waxpby(&mut self, a: T, x: &[T], b: T, y: &[T]) -> &mut Self;

    fn dot(&self, y: &[T]) -> T;

    /// ‖self‖²
    fn sumsq(&self) -> T;

    /// Euclidean norm
    fn norm(&self) -> T;

    /// Largest absolute entry.  NaN if any entry is NaN.
    fn norm_inf(&self) -> T;

    /// ‖self - y‖∞
    fn norm_inf_diff(&self, y: &[T]) -> T;

    /// ‖self - y‖
    fn dist(&self, y: &[T]) -> T;

    /// Smallest entry, `+∞` for an empty vector.
    fn minimum(&self) -> T;

    /// No entry is infinite or NaN
    fn is_finite(&self) -> bool;
}

impl<T: FloatT> VectorMath<T> for [T] {
    fn copy_from(&mut self, src: &[T]) -> &mut Self {
        self.copy_from_slice(src);
        self
    }

    fn set(&mut self, c: T) -> &mut Self {
        self.fill(c);
        self
    }

    fn scale(&mut self, c: T) -> &mut Self {
        self.iter_mut().for_each(|v| *v *= c);
        self
    }

    fn negate(&mut self) -> &mut Self {
        self.iter_mut().for_each(|v| *v = -*v);
        self
    }

    fn hadamard(&mut self, d: &[T]) -> &mut Self {
        debug_assert_eq!(self.len(), d.len());
        for (v, &di) in izip!(self.iter_mut(), d) {
            *v *= di;
        }
        self
    }

    fn axpby(&mut self, a: T, x: &[T], b: T) -> &mut Self {
        debug_assert_eq!(self.len(), x.len());
        for (v, &xi) in izip!(self.iter_mut(), x) {
            *v = a * xi + b * *v;
        }
        self
    }

    fn waxpby(&mut self, a: T, x: &[T], b: T, y: &[T]) -> &mut Self {
        debug_assert!(self.len() == x.len() && self.len() == y.len());
        for (v, &xi, &yi) in izip!(self.iter_mut(), x, y) {
            *v = a * xi + b * yi;
        }
        self
    }

    fn dot(&self, y: &[T]) -> T {
        debug_assert_eq!(self.len(), y.len());
        izip!(self, y).fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }

    fn sumsq(&self) -> T {
        self.dot(self)
    }

    fn norm(&self) -> T {
        self.sumsq().sqrt()
    }

    fn norm_inf(&self) -> T {
        // a plain max fold would drop NaNs
        let mut out = T::zero();
        for &v in self {
            if v.is_nan() {
                return v;
            }
            out = out.max(v.abs());
        }
        out
    }

    fn norm_inf_diff(&self, y: &[T]) -> T {
        izip!(self, y).fold(T::zero(), |acc, (&a, &b)| acc.max((a - b).abs()))
    }

    fn dist(&self, y: &[T]) -> T {
        izip!(self, y)
            .fold(T::zero(), |acc, (&a, &b)| acc + (a - b) * (a - b))
            .sqrt()
    }

    fn minimum(&self) -> T {
        self.iter().fold(T::infinity(), |acc, &v| acc.min(v))
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|v| v.is_finite())
    }
}
