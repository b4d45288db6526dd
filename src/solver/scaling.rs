use crate::algebra::*;
use crate::solver::cones::{CompositeCone, SupportedCone};

/// Block-diagonal scaling matrices aligned with the cone partition,
/// stored as their diagonals.
///
/// `t`/`t_inv` are the identity on every cone.  `w`/`w_inv` are the
/// identity on the orthant and the reflection diag(+1,-1,...,-1) on each
/// second-order cone, which is its own inverse.  `w` feeds the cone
/// scaling update and `w_inv` the Schur complement A(Θ⁻¹W⁻¹)²Aᵀ.
#[derive(Debug, Clone)]
pub(crate) struct ScalingMatrices<T> {
    pub t: Vec<T>,
    pub t_inv: Vec<T>,
    pub w: Vec<T>,
    pub w_inv: Vec<T>,
}

impl<T> ScalingMatrices<T>
where
    T: FloatT,
{
    pub fn new(cones: &CompositeCone<T>) -> Self {
        let n = cones.numel;
        let mut scaling = Self {
            t: vec![T::one(); n],
            t_inv: vec![T::one(); n],
            w: vec![T::one(); n],
            w_inv: vec![T::one(); n],
        };
        scaling.update(cones);
        scaling
    }

    /// Rebuilds the diagonals for the current iterate.
    pub fn update(&mut self, cones: &CompositeCone<T>) {
        for (cone, rng) in cones.iter() {
            match cone {
                SupportedCone::NonnegativeCone(_) => {
                    for v in [&mut self.t, &mut self.t_inv, &mut self.w, &mut self.w_inv] {
                        v[rng.clone()].set(T::one());
                    }
                }
                SupportedCone::SecondOrderCone(_) => {
                    self.t[rng.clone()].set(T::one());
                    self.t_inv[rng.clone()].set(T::one());
                    for v in [&mut self.w, &mut self.w_inv] {
                        v[rng.clone()].set(-T::one());
                        v[rng.start] = T::one();
                    }
                }
            }
        }
    }

    /// y = Tv
    pub fn mul_t(&self, y: &mut [T], v: &[T]) {
        y.copy_from(v).hadamard(&self.t);
    }

    /// y = T⁻¹v
    pub fn mul_t_inv(&self, y: &mut [T], v: &[T]) {
        y.copy_from(v).hadamard(&self.t_inv);
    }
}
