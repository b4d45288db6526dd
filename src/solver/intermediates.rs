#![allow(non_snake_case)]
use crate::algebra::*;
use crate::solver::cones::CompositeCone;
use crate::solver::program::ProgramData;
use crate::solver::scaling::ScalingMatrices;
use crate::solver::schur::SchurComplement;
use crate::solver::variables::Variables;
use crate::solver::{BreakdownCause, HipmSettings, SolverError};

/// Per-iteration quantities shared by every direction solve of an
/// iteration.
///
/// `xbar = Θ⁻¹Tx` and `sbar = ΘT⁻¹s` are the scaled point λ seen from
/// either side.  `g1`, `g2` solve the Newton system for the τ column:
///
/// ```text
/// M g2 = b + AΘ²c,   g1 = Θ²(Aᵀg2 - c)
/// ```
#[derive(Debug, Clone)]
pub(crate) struct Intermediates<T> {
    pub xbar: Vec<T>,
    pub sbar: Vec<T>,
    pub g1: Vec<T>,
    pub g2: Vec<T>,
}

impl<T> Intermediates<T>
where
    T: FloatT,
{
    /// Updates the cone scalings for the current iterate, then assembles
    /// and factors the Schur complement.
    pub fn new(
        data: &ProgramData<'_, T>,
        variables: &Variables<T>,
        cones: &mut CompositeCone<T>,
        scaling: &ScalingMatrices<T>,
        schur: &mut SchurComplement<T>,
        settings: &HipmSettings<T>,
    ) -> Result<Self, SolverError> {
        let (n, m) = (variables.x.len(), variables.w.len());
        let mut work = vec![T::zero(); n];

        let mut tx = vec![T::zero(); n];
        let mut ts = vec![T::zero(); n];
        scaling.mul_t(&mut tx, &variables.x);
        scaling.mul_t_inv(&mut ts, &variables.s);

        if !cones.update_scaling(&tx, &ts, &scaling.w) {
            return Err(BreakdownCause::LeftCone.into());
        }

        let mut xbar = vec![T::zero(); n];
        let mut sbar = vec![T::zero(); n];
        cones.mul_theta_inv(&mut xbar, &tx);
        cones.mul_theta(&mut sbar, &ts);

        // M = A(Θ⁻¹W⁻¹)²Aᵀ
        schur.assemble(data.A, cones, &scaling.w_inv);
        schur.factor(settings)?;

        // g2 = M \ (b + AΘ²c)
        let mut rhs = data.b.to_vec();
        cones.mul_theta_sq(&mut work, data.c);
        data.A.gemv(&mut rhs, &work, T::one(), T::one());
        let mut g2 = vec![T::zero(); m];
        schur.solve(&mut g2, &rhs, settings)?;

        // g1 = Θ²(Aᵀg2 - c)
        work.copy_from(data.c);
        data.A.gemv_t(&mut work, &g2, T::one(), -T::one());
        let mut g1 = vec![T::zero(); n];
        cones.mul_theta_sq(&mut g1, &work);

        if !(xbar.is_finite() && sbar.is_finite() && g1.is_finite()) {
            return Err(BreakdownCause::NonFinite.into());
        }

        Ok(Self { xbar, sbar, g1, g2 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intermediates_lp() {
        // x0 - x1 = 1 over the orthant, at x = (2,1), s = (1,4)
        let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1.0, -1.0]);
        let (b, c) = (vec![1.0], vec![1.0, 0.0]);
        let data = ProgramData {
            A: &A,
            b: &b,
            c: &c,
        };
        let mut cones = CompositeCone::new(2, &[]).unwrap();
        let scaling = ScalingMatrices::new(&cones);
        let mut schur = SchurComplement::new(&A, &cones);
        let settings = HipmSettings::default();

        let mut v = Variables::new(2, 1);
        v.x = vec![2.0, 1.0];
        v.s = vec![1.0, 4.0];

        let inter =
            Intermediates::new(&data, &v, &mut cones, &scaling, &mut schur, &settings).unwrap();

        // λ = sqrt(x∘s)
        let λ = [2f64.sqrt(), 2.0];
        for i in 0..2 {
            assert!((inter.xbar[i] - λ[i]).abs() < 1e-14);
            assert!((inter.sbar[i] - λ[i]).abs() < 1e-14);
        }

        // Θ² = diag(2, 1/4), M = 2.25, g2 = (1 + 2)/2.25
        let g2 = 3.0 / 2.25;
        assert!((inter.g2[0] - g2).abs() < 1e-12);
        // g1 = Θ²(Aᵀg2 - c) = (2(g2 - 1), -g2/4)
        assert!((inter.g1[0] - 2.0 * (g2 - 1.0)).abs() < 1e-12);
        assert!((inter.g1[1] + g2 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_intermediates_left_cone() {
        let A = CscMatrix::new(1, 1, vec![0, 1], vec![0], vec![1.0]);
        let (b, c) = (vec![1.0], vec![1.0]);
        let data = ProgramData {
            A: &A,
            b: &b,
            c: &c,
        };
        let mut cones = CompositeCone::new(1, &[]).unwrap();
        let scaling = ScalingMatrices::new(&cones);
        let mut schur = SchurComplement::new(&A, &cones);

        let mut v = Variables::new(1, 1);
        v.x = vec![-1.0];
        v.s = vec![1.0];
        let result = Intermediates::new(
            &data,
            &v,
            &mut cones,
            &scaling,
            &mut schur,
            &HipmSettings::default(),
        );
        assert_eq!(
            result.unwrap_err(),
            SolverError::NumericalBreakdown(BreakdownCause::LeftCone)
        );
    }
}
