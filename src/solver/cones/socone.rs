use super::*;
use crate::algebra::*;
use itertools::izip;

/// The cone `{(t,u) : ‖u‖ ≤ t}`, stored with the bound `t` first.
#[derive(Debug, Clone)]
pub struct SecondOrderCone<T> {
    dim: usize,
    // NT scaling point, normalised so that wᵀQw = 1
    w: Vec<T>,
    // scalar factor of Θ = ηW̄
    η: T,
    // reflection Q = diag(1,-1,...,-1) from the scaling matrices
    q: Vec<T>,
}

impl<T> SecondOrderCone<T>
where
    T: FloatT,
{
    // dim ≥ 2 is checked by CompositeCone::new
    pub(crate) fn new(dim: usize) -> Self {
        debug_assert!(dim >= 2);
        let mut w = vec![T::zero(); dim];
        w[0] = T::one();
        let mut q = vec![-T::one(); dim];
        q[0] = T::one();
        Self {
            dim,
            w,
            η: T::one(),
            q,
        }
    }

    /// The scaling point w̄ and scale η, with Θ² = η²(2w̄w̄ᵀ - Q)
    pub(crate) fn scaling_point(&self) -> (&[T], T) {
        (&self.w, self.η)
    }
}

impl<T> Cone<T> for SecondOrderCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.dim
    }

    fn degree(&self) -> usize {
        1
    }

    fn unit_initialization(&self, x: &mut [T], s: &mut [T]) {
        x.fill(T::zero());
        s.fill(T::zero());
        self.add_scaled_e(x, T::one());
        self.add_scaled_e(s, T::one());
    }

    fn is_interior(&self, x: &[T]) -> bool {
        x[0] > T::zero() && _soc_residual(x) > T::zero()
    }

    fn update_scaling(&mut self, x: &[T], s: &[T], reflection: &[T]) -> bool {
        if !(self.is_interior(x) && self.is_interior(s)) {
            return false;
        }
        let two: T = T::lit(2.0);
        let half: T = T::lit(0.5);

        let xscale = T::sqrt(_soc_residual(x));
        let sscale = T::sqrt(_soc_residual(s));
        let γ = T::sqrt((T::one() + x.dot(s) / (xscale * sscale)) * half);

        // w̄ = (x/xscale + Qs/sscale) / 2γ
        for (w, &x, &s, &q) in izip!(&mut self.w, x, s, reflection) {
            *w = x / (two * xscale * γ) + q * s / (two * sscale * γ);
        }
        self.η = T::sqrt(xscale / sscale);
        self.q.copy_from(reflection);

        self.w.is_finite() && self.η.is_finite()
    }

    fn mul_theta(&self, y: &mut [T], v: &[T]) {
        // fast product with the Lorentz boost W̄, as in ECOS
        let w = &self.w;
        let ζ = w[1..].dot(&v[1..]);
        let c = v[0] + ζ / (T::one() + w[0]);

        y[0] = self.η * (w[0] * v[0] + ζ);
        for (y, &v, &w) in izip!(&mut y[1..], &v[1..], &w[1..]) {
            *y = self.η * (v + c * w);
        }
    }

    fn mul_theta_inv(&self, y: &mut [T], v: &[T]) {
        // Θ⁻¹ = η⁻¹QW̄Q
        let (w, q) = (&self.w, &self.q);
        let v0 = q[0] * v[0];
        let ζ = izip!(&w[1..], &q[1..], &v[1..]).fold(T::zero(), |acc, (&w, &q, &v)| acc + w * q * v);
        let c = v0 + ζ / (T::one() + w[0]);

        y[0] = q[0] * (w[0] * v0 + ζ) / self.η;
        for (y, &v, &w, &q) in izip!(&mut y[1..], &v[1..], &w[1..], &q[1..]) {
            *y = q * (q * v + c * w) / self.η;
        }
    }

    fn mul_theta_sq(&self, y: &mut [T], v: &[T]) {
        let two: T = T::lit(2.0);
        let η2 = self.η * self.η;
        let wv = self.w.dot(v);
        for (y, &v, &w, &q) in izip!(y, v, &self.w, &self.q) {
            *y = η2 * (two * w * wv - q * v);
        }
    }

    fn circ_op(&self, z: &mut [T], x: &[T], y: &[T]) {
        z[0] = x.dot(y);
        let (x0, y0) = (x[0], y[0]);
        z[1..].waxpby(x0, &y[1..], y0, &x[1..]);
    }

    fn inv_circ_op(&self, z: &mut [T], x: &[T], y: &[T]) {
        let pinv = T::recip(_soc_residual(x));
        let v = x[1..].dot(&y[1..]);

        z[0] = (x[0] * y[0] - v) * pinv;

        let c1 = pinv * (v / x[0] - y[0]);
        let c2 = T::recip(x[0]);
        z[1..].waxpby(c1, &x[1..], c2, &y[1..]);
    }

    fn add_scaled_e(&self, v: &mut [T], α: T) {
        v[0] += α;
    }

    fn max_step(&self, v: &[T], dv: &[T]) -> T {
        soc_max_step(v, dv)
    }
}

// t² - ‖u‖²
pub(crate) fn _soc_residual<T>(z: &[T]) -> T
where
    T: FloatT,
{
    let (z1, z2) = (z[0], &z[1..]);
    z1 * z1 - z2.sumsq()
}

/// Supremum of the step α ≥ 0 keeping `v + α dv` in the second-order
/// cone, with the bound coordinate first.  Returns 1 if `dv` never
/// reaches the boundary and 0 if `v` is not in the cone.  A slice with
/// no bounded part is treated as a single orthant coordinate.
pub fn soc_max_step<T>(v: &[T], dv: &[T]) -> T
where
    T: FloatT,
{
    if v.len() < 2 {
        return orthant_max_step(v, dv);
    }

    // smallest positive root of ‖v₁+αdv₁‖² = (v₀ + αdv₀)²
    let two: T = T::lit(2.);
    let four: T = T::lit(4.);

    let a = _soc_residual(dv);
    let b = two * (v[0] * dv[0] - v[1..].dot(&dv[1..]));
    let c = _soc_residual(v);
    let d = b * b - four * a * c;

    if c < T::zero() || v[0] < T::zero() {
        return T::zero();
    }

    #[allow(clippy::if_same_then_else)]
    if (a > T::zero() && b > T::zero()) || d < T::zero() {
        // no positive real root
        return T::one();
    } else if a == T::zero() {
        // direction on the boundary of the cone.  Linear in α
        return if b < T::zero() { -c / b } else { T::one() };
    } else if c == T::zero() {
        // already on the boundary; the other root is -b/a
        return if a >= T::zero() { T::one() } else { T::zero() };
    }

    // avoid cancellation, see §1.4: Goldberg, ACM Computing Surveys, 1991
    let t = if b >= T::zero() {
        -b - T::sqrt(d)
    } else {
        -b + T::sqrt(d)
    };

    let r1: T = (two * c) / t;
    let r2: T = t / (two * a);

    let r1 = if r1 < T::zero() { T::infinity() } else { r1 };
    let r2 = if r2 < T::zero() { T::infinity() } else { r2 };
    let α = T::min(r1, r2);

    if α.is_finite() {
        α
    } else {
        T::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reflection(n: usize) -> Vec<f64> {
        let mut q = vec![-1.; n];
        q[0] = 1.;
        q
    }

    #[test]
    fn test_soc_scaling_identities() {
        let mut K = SecondOrderCone::<f64>::new(4);
        let x = [3., 1., -1., 0.5];
        let s = [2., -0.3, 0.9, 1.2];
        assert!(K.update_scaling(&x, &s, &reflection(4)));

        // λ = Θ⁻¹x = Θs
        let mut λx = [0.; 4];
        let mut λs = [0.; 4];
        K.mul_theta_inv(&mut λx, &x);
        K.mul_theta(&mut λs, &s);
        assert!(λx.norm_inf_diff(&λs) < 1e-12);

        // x = Θ²s
        let mut y = [0.; 4];
        K.mul_theta_sq(&mut y, &s);
        assert!(y.norm_inf_diff(&x) < 1e-12);

        // ΘΘ⁻¹ = I
        let v = [0.7, -2., 0.1, 3.];
        let mut t = [0.; 4];
        K.mul_theta_inv(&mut t, &v);
        K.mul_theta(&mut y, &t);
        assert!(y.norm_inf_diff(&v) < 1e-12);

        // w̄ᵀQw̄ = 1
        let (w, _) = K.scaling_point();
        assert!((_soc_residual(w) - 1.).abs() < 1e-12);
    }

    #[test]
    fn test_soc_scaling_rejects_exterior() {
        let mut K = SecondOrderCone::<f64>::new(3);
        assert!(!K.update_scaling(&[1., 2., 0.], &[1., 0., 0.], &reflection(3)));
        assert!(!K.update_scaling(&[1., 0., 0.], &[-2., 0., 0.], &reflection(3)));
    }

    #[test]
    fn test_soc_jordan() {
        let K = SecondOrderCone::<f64>::new(3);
        let x = [3., 1., -2.];
        let y = [1., 0.5, 4.];
        let mut z = [0.; 3];
        let mut w = [0.; 3];
        K.circ_op(&mut z, &x, &y);
        assert_eq!(z, [3. + 0.5 - 8., 1.5 + 1., 12. - 2.]);
        K.inv_circ_op(&mut w, &x, &z);
        assert!(w.norm_inf_diff(&y) < 1e-12);
    }

    #[test]
    fn test_soc_step_length() {
        // from (1,0) moving straight out along u: hits ‖u‖ = t at α = 1/2
        let α: f64 = soc_max_step(&[1., 0.], &[0., 2.]);
        assert!((α - 0.5).abs() < 1e-15);

        // moving into the cone never leaves it
        assert_eq!(soc_max_step(&[1., 0., 0.], &[1., 0.5, 0.]), 1.);

        // shrinking the bound: t = 2 - 4α ≥ 0 with u = 0 gives α = 1/2
        let α: f64 = soc_max_step(&[2., 0., 0.], &[-4., 0., 0.]);
        assert!((α - 0.5).abs() < 1e-15);

        // along a boundary ray of the cone: 1 - 2α ≥ 0
        let α: f64 = soc_max_step(&[1., 0.], &[-1., 1.]);
        assert!((α - 0.5).abs() < 1e-15);

        // points outside the cone allow no step
        assert_eq!(soc_max_step(&[1., 3.], &[1., 0.]), 0.);

        // no bounded part behaves as the orthant
        assert_eq!(soc_max_step(&[2.], &[-4.]), 0.5);
        assert_eq!(soc_max_step(&[2.], &[4.]), 1.);
    }

    #[test]
    fn test_soc_unit_initialization() {
        let K = SecondOrderCone::<f64>::new(3);
        let mut x = [9.; 3];
        let mut s = [9.; 3];
        K.unit_initialization(&mut x, &mut s);
        assert_eq!(x, [1., 0., 0.]);
        assert_eq!(s, [1., 0., 0.]);
        assert_eq!(K.degree(), 1);
    }
}
