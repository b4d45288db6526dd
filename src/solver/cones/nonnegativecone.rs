use super::*;
use itertools::izip;

/// A block of non-negative orthant coordinates
#[derive(Debug, Clone)]
pub struct NonnegativeCone<T> {
    dim: usize,
    // Θ = diag(sqrt(x/s))
    θ: Vec<T>,
}

impl<T> NonnegativeCone<T>
where
    T: FloatT,
{
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            θ: vec![T::one(); dim],
        }
    }
}

impl<T> Cone<T> for NonnegativeCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.dim
    }

    fn degree(&self) -> usize {
        self.dim
    }

    fn unit_initialization(&self, x: &mut [T], s: &mut [T]) {
        x.fill(T::one());
        s.fill(T::one());
    }

    fn is_interior(&self, x: &[T]) -> bool {
        x.iter().all(|&xi| xi > T::zero())
    }

    fn update_scaling(&mut self, x: &[T], s: &[T], _reflection: &[T]) -> bool {
        if !(self.is_interior(x) && self.is_interior(s)) {
            return false;
        }
        for (θ, &x, &s) in izip!(&mut self.θ, x, s) {
            *θ = T::sqrt(x / s);
        }
        true
    }

    fn mul_theta(&self, y: &mut [T], v: &[T]) {
        for (y, &θ, &v) in izip!(y, &self.θ, v) {
            *y = θ * v;
        }
    }

    fn mul_theta_inv(&self, y: &mut [T], v: &[T]) {
        for (y, &θ, &v) in izip!(y, &self.θ, v) {
            *y = v / θ;
        }
    }

    fn mul_theta_sq(&self, y: &mut [T], v: &[T]) {
        for (y, &θ, &v) in izip!(y, &self.θ, v) {
            *y = θ * θ * v;
        }
    }

    fn circ_op(&self, z: &mut [T], x: &[T], y: &[T]) {
        for (z, &x, &y) in izip!(z, x, y) {
            *z = x * y;
        }
    }

    fn inv_circ_op(&self, z: &mut [T], x: &[T], y: &[T]) {
        for (z, &x, &y) in izip!(z, x, y) {
            *z = y / x;
        }
    }

    fn add_scaled_e(&self, v: &mut [T], α: T) {
        v.iter_mut().for_each(|v| *v += α);
    }

    fn max_step(&self, v: &[T], dv: &[T]) -> T {
        orthant_max_step(v, dv)
    }
}

impl<T: FloatT> NonnegativeCone<T> {
    /// Diagonal of Θ², one entry per coordinate
    pub(crate) fn theta_sq_diag(&self) -> impl Iterator<Item = T> + '_ {
        self.θ.iter().map(|&θ| θ * θ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::VectorMath;

    #[test]
    fn test_nonnegative_scaling() {
        let mut K = NonnegativeCone::<f64>::new(3);
        let x = [4., 1., 2.];
        let s = [1., 4., 2.];
        assert!(K.update_scaling(&x, &s, &[1.; 3]));

        // Θ⁻¹x and Θs agree
        let mut λx = [0.; 3];
        let mut λs = [0.; 3];
        K.mul_theta_inv(&mut λx, &x);
        K.mul_theta(&mut λs, &s);
        assert!(λx.norm_inf_diff(&λs) < 1e-14);
        assert!(λx.norm_inf_diff(&[2., 2., 2.]) < 1e-14);

        let mut y = [0.; 3];
        K.mul_theta_sq(&mut y, &s);
        assert!(y.norm_inf_diff(&x) < 1e-14);

        assert!(!K.update_scaling(&[1., 0., 1.], &s, &[1.; 3]));
    }

    #[test]
    fn test_nonnegative_step() {
        let K = NonnegativeCone::<f64>::new(3);
        assert_eq!(K.max_step(&[1., 2., 3.], &[-2., 1., -1.]), 0.5);
        assert_eq!(K.max_step(&[1., 2., 3.], &[0., 1., 2.]), 1.);
        assert_eq!(K.max_step(&[1., 2., 3.], &[-0.1, 0., 0.]), 10.);
    }

    #[test]
    fn test_nonnegative_jordan() {
        let K = NonnegativeCone::<f64>::new(2);
        let x = [2., 4.];
        let y = [3., -2.];
        let mut z = [0.; 2];
        let mut w = [0.; 2];
        K.circ_op(&mut z, &x, &y);
        K.inv_circ_op(&mut w, &x, &z);
        assert_eq!(z, [6., -8.]);
        assert_eq!(w, y);
    }
}
