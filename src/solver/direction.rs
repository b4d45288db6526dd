#![allow(non_snake_case)]
use crate::algebra::*;
use crate::solver::cones::CompositeCone;
use crate::solver::intermediates::Intermediates;
use crate::solver::program::ProgramData;
use crate::solver::residuals::NewtonResiduals;
use crate::solver::schur::SchurComplement;
use crate::solver::variables::Variables;
use crate::solver::{BreakdownCause, HipmSettings, SolverError};

/// Newton step in every component of the iterate
#[derive(Debug, Clone)]
pub(crate) struct SearchDirection<T> {
    pub dx: Vec<T>,
    pub dw: Vec<T>,
    pub ds: Vec<T>,
    pub dτ: T,
    pub dκ: T,
}

impl<T> SearchDirection<T>
where
    T: FloatT,
{
    /// Solves the Newton system
    ///
    /// ```text
    ///  A dx - b dτ                = r1
    ///  Aᵀdw + ds - c dτ           = r2
    /// -cᵀdx + bᵀdw - dκ           = r3
    ///  λ∘(Θ⁻¹dx + Θds)            = r4
    ///  κ dτ + τ dκ                = r5
    /// ```
    ///
    /// by eliminating ds and dx onto the Schur complement in dw, with
    /// the τ column handled by the precomputed `g1`, `g2`.
    pub fn new(
        data: &ProgramData<'_, T>,
        variables: &Variables<T>,
        intermediates: &Intermediates<T>,
        cones: &CompositeCone<T>,
        schur: &mut SchurComplement<T>,
        r: &NewtonResiduals<T>,
        settings: &HipmSettings<T>,
    ) -> Result<Self, SolverError> {
        let (A, b, c) = (data.A, data.b, data.c);
        let (τ, κ) = (variables.τ, variables.κ);
        let (n, m) = (variables.x.len(), variables.w.len());
        let (g1, g2) = (&intermediates.g1, &intermediates.g2);

        // v = Θ⁻¹(λ\r4)
        let mut work = vec![T::zero(); n];
        let mut v = vec![T::zero(); n];
        cones.inv_circ_op(&mut work, &intermediates.xbar, &r.r4);
        cones.mul_theta_inv(&mut v, &work);

        // q = r2 - v
        let mut q = r.r2.clone();
        q.axpby(-T::one(), &v, T::one());

        // M h2 = r1 + AΘ²q
        let mut rhs = r.r1.clone();
        cones.mul_theta_sq(&mut work, &q);
        A.gemv(&mut rhs, &work, T::one(), T::one());
        let mut h2 = vec![T::zero(); m];
        schur.solve(&mut h2, &rhs, settings)?;

        // h1 = Θ²(Aᵀh2 - q)
        work.copy_from(&q);
        A.gemv_t(&mut work, &h2, T::one(), -T::one());
        let mut h1 = vec![T::zero(); n];
        cones.mul_theta_sq(&mut h1, &work);

        // the denominator is κ/τ + ‖Θ(Aᵀg2 - c)‖², positive in exact
        // arithmetic
        let den = κ / τ - c.dot(g1) + b.dot(g2);
        if !den.is_finite() || den <= T::epsilon() * T::epsilon() {
            return Err(BreakdownCause::SingularDenominator(den.to_f64().unwrap_or(f64::NAN)).into());
        }
        let dτ = (r.r3 + r.r5 / τ + c.dot(&h1) - b.dot(&h2)) / den;

        let mut dx = h1;
        dx.axpby(dτ, g1, T::one());
        let mut dw = h2;
        dw.axpby(dτ, g2, T::one());

        // ds = v - Θ⁻¹(Θ⁻¹dx)
        let mut ds = v;
        cones.mul_theta_inv(&mut work, &dx);
        let mut t = vec![T::zero(); n];
        cones.mul_theta_inv(&mut t, &work);
        ds.axpby(-T::one(), &t, T::one());

        let dκ = (r.r5 - κ * dτ) / τ;

        let step = Self { dx, dw, ds, dτ, dκ };
        if step.is_finite() {
            Ok(step)
        } else {
            Err(BreakdownCause::NonFinite.into())
        }
    }

    pub fn is_finite(&self) -> bool {
        self.dx.is_finite()
            && self.dw.is_finite()
            && self.ds.is_finite()
            && self.dτ.is_finite()
            && self.dκ.is_finite()
    }
}
