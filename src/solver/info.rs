use crate::algebra::*;
use crate::solver::residuals::HomogeneousResiduals;
use crate::solver::variables::Variables;
use crate::solver::HipmSettings;

/// Status of the solver at termination
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
pub enum SolverStatus {
    /// Iteration in progress or not started
    #[default]
    Unsolved,
    /// An optimal primal-dual pair was found
    Solved,
    /// The homogeneous embedding certifies infeasibility
    Infeasible,
    /// μ and τ vanished without an infeasibility certificate
    IllPosed,
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Progress summary passed to the iteration observer and the
/// termination callback once per iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IterationRecord<T> {
    pub iteration: u32,
    /// duality measure (xᵀs + τκ)/n
    pub mu: T,
    /// ‖bτ - Ax‖, relative to its initial value
    pub primal_infeasibility: T,
    /// ‖cτ - Aᵀw - s‖, relative to its initial value
    pub dual_infeasibility: T,
    /// |κ + cᵀx - bᵀw|, relative to its initial value
    pub gap: T,
    /// |cᵀx - bᵀw|/τ / (1 + |bᵀw|/τ)
    pub significance: T,
    /// cᵀx/τ
    pub objective: T,
    pub tau: T,
    pub kappa: T,
    /// step length of the previous iteration
    pub step_length: T,
    /// centring parameter of the previous iteration
    pub sigma: T,
}

/// Termination measures of the current iterate.
#[derive(Debug, Clone, Default)]
pub(crate) struct SolveInfo<T> {
    pub record: IterationRecord<T>,
    pub status: SolverStatus,

    // ‖Ax/τ - b‖ and ‖(Aᵀw + s)/τ - c‖, relative to their initial values
    pub candidate_primal_infeasibility: T,
    pub candidate_dual_infeasibility: T,

    // normalizers max(1, ‖·‖) fixed at the initial point
    norm_rp0: T,
    norm_rd0: T,
    norm_rg0: T,
    pub μ0: T,
}

impl<T> SolveInfo<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self {
            norm_rp0: T::one(),
            norm_rd0: T::one(),
            norm_rg0: T::one(),
            μ0: T::one(),
            ..Self::default()
        }
    }

    /// Fixes the normalizers at the initial point
    pub fn set_initial(&mut self, residuals: &HomogeneousResiduals<T>, μ: T) {
        self.norm_rp0 = T::max(T::one(), residuals.rp.norm());
        self.norm_rd0 = T::max(T::one(), residuals.rd.norm());
        self.norm_rg0 = T::max(T::one(), residuals.rg.abs());
        self.μ0 = μ;
    }

    pub fn update(&mut self, residuals: &HomogeneousResiduals<T>, variables: &Variables<T>, μ: T) {
        let τ = variables.τ;
        let norm_rp = residuals.rp.norm();
        let norm_rd = residuals.rd.norm();

        let rec = &mut self.record;
        rec.mu = μ;
        rec.primal_infeasibility = norm_rp / self.norm_rp0;
        rec.dual_infeasibility = norm_rd / self.norm_rd0;
        rec.gap = residuals.rg.abs() / self.norm_rg0;
        rec.significance = (residuals.dot_cx - residuals.dot_bw).abs() / τ
            / (T::one() + residuals.dot_bw.abs() / τ);
        rec.objective = residuals.dot_cx / τ;
        rec.tau = τ;
        rec.kappa = variables.κ;

        // Ax/τ - b = -rp/τ and (Aᵀw + s)/τ - c = -rd/τ
        self.candidate_primal_infeasibility = norm_rp / τ / self.norm_rp0;
        self.candidate_dual_infeasibility = norm_rd / τ / self.norm_rd0;
    }

    /// Evaluates the termination predicates in the order
    /// solved, infeasible, ill-posed.
    pub fn check_termination(&mut self, settings: &HipmSettings<T>) -> SolverStatus {
        let rec = &self.record;
        let τ_vanished = rec.tau <= settings.tau_threshold * T::max(T::one(), rec.kappa);

        self.status = if self.candidate_primal_infeasibility <= settings.infeasibility_threshold
            && self.candidate_dual_infeasibility <= settings.infeasibility_threshold
            && rec.significance <= settings.significance_threshold
        {
            SolverStatus::Solved
        } else if rec.primal_infeasibility <= settings.infeasibility_threshold
            && rec.dual_infeasibility <= settings.infeasibility_threshold
            && rec.gap <= settings.duality_gap_threshold
            && τ_vanished
            && rec.kappa >= settings.kappa_threshold
        {
            SolverStatus::Infeasible
        } else if rec.mu <= settings.mu_threshold * self.μ0 && τ_vanished {
            SolverStatus::IllPosed
        } else {
            SolverStatus::Unsolved
        };
        self.status
    }
}
