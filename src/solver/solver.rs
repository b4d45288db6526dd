#![allow(non_snake_case)]
use crate::algebra::*;
use crate::io::{ConfigurablePrintTarget, PrintTarget};
use crate::solver::callbacks::{Callback, SolverCallbacks};
use crate::solver::cones::CompositeCone;
use crate::solver::direction::SearchDirection;
use crate::solver::info::{IterationRecord, SolveInfo, SolverStatus};
use crate::solver::intermediates::Intermediates;
use crate::solver::program::{ConicProgram, ProgramData};
use crate::solver::residuals::{HomogeneousResiduals, NewtonResiduals};
use crate::solver::scaling::ScalingMatrices;
use crate::solver::schur::SchurComplement;
use crate::solver::steplength::step_length;
use crate::solver::variables::Variables;
use crate::solver::{HipmSettings, SolverError};
use crate::timers::*;
use std::time::Instant;

/// Summary of a successful solve.  The primal and dual points are
/// written back into the [`ConicProgram`].
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<T> {
    /// final duality measure (xᵀs + τκ)/n
    pub mu: T,
    /// cᵀx at the solution
    pub objective: T,
    pub iterations: u32,
    /// wall-clock time of the solve in seconds
    pub solve_time: f64,
    /// τ and κ of the homogeneous iterate before it was rescaled
    pub tau: T,
    pub kappa: T,
}

/// Homogeneous self-dual interior point solver for programs over the
/// non-negative orthant and second-order cones.
///
/// ```
/// use hipm::solver::*;
///
/// // minimize x0 subject to x0 - x1 = 1, x ≥ 0
/// let mut builder = ProgramBuilder::<f64>::new();
/// let x0 = builder.add_variable(1.0);
/// let x1 = builder.add_variable(0.0);
/// builder.add_constraint(&[(x0, 1.0), (x1, -1.0)], 1.0);
/// builder.add_nonnegative(x0);
/// builder.add_nonnegative(x1);
/// let mut program = builder.build().unwrap();
///
/// let mut solver = HipmSolver::new(HipmSettings::default());
/// let solution = solver.solve(&mut program).unwrap();
/// assert!((solution.objective - 1.0).abs() < 1e-6);
/// assert!((program.value(x0).unwrap() - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug)]
pub struct HipmSolver<T: FloatT = f64> {
    pub settings: HipmSettings<T>,
    callbacks: SolverCallbacks<T>,
    print_target: PrintTarget,
    timers: Option<Timers>,
}

impl<T> HipmSolver<T>
where
    T: FloatT,
{
    pub fn new(settings: HipmSettings<T>) -> Self {
        Self {
            settings,
            callbacks: SolverCallbacks::default(),
            print_target: PrintTarget::default(),
            timers: None,
        }
    }

    /// Installs a hook called with the progress record of every iteration
    pub fn set_observer(&mut self, observer: impl FnMut(&IterationRecord<T>) + 'static) {
        self.callbacks.observer = Some(Box::new(observer));
    }

    pub fn unset_observer(&mut self) {
        self.callbacks.observer = None;
    }

    /// Installs a callback that stops the solve with
    /// [`SolverError::Callback`] when it returns true
    pub fn set_termination_callback(&mut self, callback: fn(&IterationRecord<T>) -> bool) {
        self.callbacks.termination_callback = Callback::Rust(callback);
    }

    pub fn unset_termination_callback(&mut self) {
        self.callbacks.termination_callback = Callback::None;
    }

    /// Phase timings of the most recent solve
    pub fn timers(&self) -> Option<&Timers> {
        self.timers.as_ref()
    }

    /// Solves `program` from the unit starting point.
    ///
    /// On success the program's x, w and s are overwritten with the
    /// solution.  On any error the program is left unchanged.
    pub fn solve(&mut self, program: &mut ConicProgram<T>) -> Result<Solution<T>, SolverError> {
        self.settings.validate()?;

        let mut timers = Timers::default();
        let mut info = SolveInfo::new();
        let start = Instant::now();

        let mut checked;
        let mut schur;
        timeit! {timers => "setup"; {
            checked = program.check_out()?;
            schur = SchurComplement::new(checked.a(), checked.cones());
        }}

        let (data, cones) = checked.split();

        // print failures never affect the solve
        notimeit! {timers; {
            let out = &mut self.print_target;
            let _ = info.print_configuration(out, &self.settings, &data, cones);
            let _ = info.print_status_header(out, &self.settings);
        }}

        let result;
        timeit! {timers => "solve"; {
            result = self.iterate(&data, cones, &mut schur, &mut info, &mut timers, start);
        }}
        let solve_time = start.elapsed().as_secs_f64();

        let _ = info.print_footer(
            &mut self.print_target,
            &self.settings,
            result.as_ref().err(),
            solve_time,
        );
        self.timers = Some(timers);

        let (mut variables, iterations) = result?;
        let rec = &info.record;
        let solution = Solution {
            mu: rec.mu,
            objective: rec.objective,
            iterations,
            solve_time,
            tau: rec.tau,
            kappa: rec.kappa,
        };

        variables.rescale();
        checked.check_in(&variables.x, &variables.w, &variables.s)?;

        Ok(solution)
    }

    // main loop.  Returns the iterate found SOLVED and its iteration count
    fn iterate(
        &mut self,
        data: &ProgramData<'_, T>,
        cones: &mut CompositeCone<T>,
        schur: &mut SchurComplement<T>,
        info: &mut SolveInfo<T>,
        timers: &mut Timers,
        start: Instant,
    ) -> Result<(Variables<T>, u32), SolverError> {
        let settings = &self.settings;
        let (n, m) = (data.A.n, data.A.m);

        let mut variables = Variables::new(n, m);
        variables.unit_initialization(cones);
        let mut scaling = ScalingMatrices::new(cones);

        let ncols = T::from_count(usize::max(n, 1));
        let nbarrier = T::from_count(cones.degree + 1);

        let mut iter: u32 = 0;
        let mut α = T::zero();
        let mut σ = T::zero();

        loop {
            let residuals = HomogeneousResiduals::new(data, &variables);
            let complementarity = variables.complementarity();
            let μ = complementarity / ncols;

            if iter == 0 {
                info.set_initial(&residuals, μ);
            }
            info.update(&residuals, &variables, μ);
            info.record.iteration = iter;
            info.record.step_length = α;
            info.record.sigma = σ;

            let status = info.check_termination(settings);

            notimeit! {timers; {
                let _ = info.print_status(&mut self.print_target, settings);
                self.callbacks.observe(&info.record);
            }}

            match status {
                SolverStatus::Solved => return Ok((variables, iter)),
                SolverStatus::Infeasible => return Err(SolverError::ProgramInfeasible),
                SolverStatus::IllPosed => return Err(SolverError::IllPosed),
                SolverStatus::Unsolved => {}
            }

            if self.callbacks.check_termination(&info.record) {
                return Err(SolverError::Callback);
            }
            if iter >= settings.max_iter {
                return Err(SolverError::MaxIterations(iter));
            }
            if start.elapsed().as_secs_f64() > settings.time_limit {
                return Err(SolverError::MaxTime);
            }

            // centring target over the barrier degree plus the τκ pair
            let μc = complementarity / nbarrier;

            timeit! {timers => "scaling"; {
                scaling.update(cones);
            }}

            let intermediates;
            timeit! {timers => "factorisation"; {
                intermediates = Intermediates::new(data, &variables, cones, &scaling, schur, settings)?;
            }}

            let step;
            timeit! {timers => "direction"; {
                let affine = if settings.predictor_corrector {
                    let r = NewtonResiduals::new(
                        &residuals, &variables, &intermediates, cones, T::zero(), μc, None,
                    );
                    let affine = SearchDirection::new(
                        data, &variables, &intermediates, cones, schur, &r, settings,
                    )?;
                    let α_aff = step_length(cones, &variables, &affine);
                    σ = T::powi(T::one() - α_aff, 3);
                    Some(affine)
                } else {
                    σ = settings.sigma_fixed;
                    None
                };

                let r = NewtonResiduals::new(
                    &residuals, &variables, &intermediates, cones, σ, μc, affine.as_ref(),
                );
                step = SearchDirection::new(
                    data, &variables, &intermediates, cones, schur, &r, settings,
                )?;
            }}

            α = step_length(cones, &variables, &step) * settings.max_step_fraction;
            if α < settings.min_step_length {
                return Err(SolverError::InsufficientProgress(α.to_f64().unwrap_or(0.0)));
            }

            variables.add_step(&step, α);
            iter += 1;
        }
    }
}

impl<T> ConfigurablePrintTarget for HipmSolver<T>
where
    T: FloatT,
{
    fn print_target(&mut self) -> &mut PrintTarget {
        &mut self.print_target
    }
}
