//! Interior point solver for linear and second-order cone programs.
//!
//! Programs are stated in the standard conic form
//!
//! ```text
//! minimize    cᵀx
//! subject to  Ax = b,  x ∈ K
//! ```
//!
//! where `K` is a product of non-negative orthant columns and
//! second-order cones.  The solver follows a Mehrotra predictor-corrector
//! path on the homogeneous self-dual embedding, so that infeasible
//! programs are detected without a phase one.
//!
//! A program is built either from matrices with [`ConicProgram::new`] or
//! incrementally with [`ProgramBuilder`], and solved by
//! [`HipmSolver::solve`].

// internal module structure
pub mod cones;
mod direction;
mod error;
mod info;
mod info_print;
mod intermediates;
mod program;
mod residuals;
mod scaling;
mod schur;
mod settings;
#[allow(clippy::module_inception)]
mod solver;
mod steplength;
mod variables;

pub(crate) mod callbacks;

#[cfg(feature = "serde")]
mod json;

//allows declaration of cone constraints
pub use crate::solver::cones::{SupportedConeT, SupportedConeT::*};

pub use crate::solver::callbacks::IterationObserver;
pub use crate::solver::error::*;
pub use crate::solver::info::{IterationRecord, SolverStatus};
pub use crate::solver::program::{
    CheckedOutProgram, ConicProgram, ProgramBuilder, VariableId, VariableMap,
};
pub use crate::solver::settings::*;
pub use crate::solver::solver::{HipmSolver, Solution};
