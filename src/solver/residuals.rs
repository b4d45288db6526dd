#![allow(non_snake_case)]
use crate::algebra::*;
use crate::solver::cones::CompositeCone;
use crate::solver::direction::SearchDirection;
use crate::solver::intermediates::Intermediates;
use crate::solver::program::ProgramData;
use crate::solver::variables::Variables;

// ---------------
// Residuals of the homogeneous embedding
// ---------------

/// Residuals at the current iterate
///
/// ```text
/// rp = bτ - Ax
/// rd = cτ - Aᵀw - s
/// rg = κ + cᵀx - bᵀw
/// ```
#[derive(Debug, Clone)]
pub(crate) struct HomogeneousResiduals<T> {
    pub rp: Vec<T>,
    pub rd: Vec<T>,
    pub rg: T,

    // inner products used by the termination checks
    pub dot_cx: T,
    pub dot_bw: T,
}

impl<T> HomogeneousResiduals<T>
where
    T: FloatT,
{
    pub fn new(data: &ProgramData<'_, T>, variables: &Variables<T>) -> Self {
        let (A, b, c) = (data.A, data.b, data.c);
        let τ = variables.τ;

        let mut rp = b.to_vec();
        rp.scale(τ);
        A.gemv(&mut rp, &variables.x, -T::one(), T::one());

        let mut rd = c.to_vec();
        rd.scale(τ);
        A.gemv_t(&mut rd, &variables.w, -T::one(), T::one());
        rd.axpby(-T::one(), &variables.s, T::one());

        let dot_cx = c.dot(&variables.x);
        let dot_bw = b.dot(&variables.w);
        let rg = variables.κ + dot_cx - dot_bw;

        Self {
            rp,
            rd,
            rg,
            dot_cx,
            dot_bw,
        }
    }
}

/// Right hand side terms r1..r5 of the Newton system.
#[derive(Debug, Clone)]
pub(crate) struct NewtonResiduals<T> {
    pub r1: Vec<T>,
    pub r2: Vec<T>,
    pub r3: T,
    pub r4: Vec<T>,
    pub r5: T,
}

impl<T> NewtonResiduals<T>
where
    T: FloatT,
{
    /// Residuals targeting a reduction by (1-σ) of the homogeneous
    /// residuals and the centred complementarity σμ.  With an affine
    /// direction, the Mehrotra second order terms are included.
    pub fn new(
        residuals: &HomogeneousResiduals<T>,
        variables: &Variables<T>,
        intermediates: &Intermediates<T>,
        cones: &CompositeCone<T>,
        σ: T,
        μ: T,
        affine: Option<&SearchDirection<T>>,
    ) -> Self {
        let η = T::one() - σ;

        let mut r1 = residuals.rp.clone();
        r1.scale(η);
        let mut r2 = residuals.rd.clone();
        r2.scale(η);
        let r3 = η * residuals.rg;

        // r4 = σμe - λ∘λ - (Θ⁻¹dx)∘(Θds)
        let n = variables.x.len();
        let mut r4 = vec![T::zero(); n];
        cones.circ_op(&mut r4, &intermediates.xbar, &intermediates.sbar);
        r4.negate();
        cones.add_scaled_e(&mut r4, σ * μ);

        let mut r5 = σ * μ - variables.τ * variables.κ;

        if let Some(step) = affine {
            let mut dxbar = vec![T::zero(); n];
            let mut dsbar = vec![T::zero(); n];
            let mut prod = vec![T::zero(); n];
            cones.mul_theta_inv(&mut dxbar, &step.dx);
            cones.mul_theta(&mut dsbar, &step.ds);
            cones.circ_op(&mut prod, &dxbar, &dsbar);
            r4.axpby(-T::one(), &prod, T::one());
            r5 -= step.dτ * step.dκ;
        }

        Self { r1, r2, r3, r4, r5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homogeneous_residuals() {
        // 2x - y = 1
        let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![2.0, -1.0]);
        let (b, c) = (vec![1.0], vec![3.0, 1.0]);
        let data = ProgramData {
            A: &A,
            b: &b,
            c: &c,
        };

        let mut v = Variables::new(2, 1);
        v.x = vec![1.0, 2.0];
        v.w = vec![0.5];
        v.s = vec![1.0, 1.0];
        v.τ = 2.0;
        v.κ = 0.25;

        let res = HomogeneousResiduals::new(&data, &v);
        // bτ - Ax = 2 - 0
        assert_eq!(res.rp, vec![2.0]);
        // cτ - Aᵀw - s = (6 - 1 - 1, 2 + 0.5 - 1)
        assert_eq!(res.rd, vec![4.0, 1.5]);
        // κ + cᵀx - bᵀw = 0.25 + 5 - 0.5
        assert_eq!(res.rg, 4.75);
        assert_eq!((res.dot_cx, res.dot_bw), (5.0, 0.5));
    }
}
