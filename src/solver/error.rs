use crate::algebra::SparseFormatError;
use crate::ldl::LdlError;
use crate::solver::cones::ConeError;
use crate::solver::{SettingsError, VariableId};
use thiserror::Error;

/// Errors raised while validating or checking out a
/// [`ConicProgram`](crate::solver::ConicProgram)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgramError {
    #[error("Incompatible dimension for {what}: expected {expected}, found {found}")]
    IncompatibleDimension {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Bad constraint matrix: {0}")]
    BadMatrix(#[from] SparseFormatError),
    #[error("Cone references column {column} but the program has {ncols} columns")]
    ColumnOutOfRange { column: usize, ncols: usize },
    #[error("Column {0} belongs to more than one cone")]
    DuplicateColumn(usize),
    #[error("Column {0} does not belong to any cone")]
    UncoveredColumn(usize),
    #[error("Second-order cone with bound column {bound} has an empty vector part")]
    EmptySecondOrderCone { bound: usize },
    #[error(transparent)]
    Cone(#[from] ConeError),
    #[error("Unknown variable {0:?}")]
    UnknownVariable(VariableId),
    #[error("Variable map does not match the program columns")]
    InconsistentVariableMap,
}

/// Reason for a [`SolverError::NumericalBreakdown`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BreakdownCause {
    #[error("Schur complement factorisation failed ({0})")]
    Factorisation(LdlError),
    #[error("homogeneous direction denominator is singular ({0:e})")]
    SingularDenominator(f64),
    #[error("search direction is not finite")]
    NonFinite,
    #[error("iterate is no longer interior to the cone")]
    LeftCone,
}

/// Abnormal terminations of [`HipmSolver::solve`](crate::solver::HipmSolver::solve)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Program is primal or dual infeasible")]
    ProgramInfeasible,
    #[error("Program is ill-posed")]
    IllPosed,
    #[error("Numerical breakdown: {0}")]
    NumericalBreakdown(#[from] BreakdownCause),
    #[error("Iteration limit ({0}) reached")]
    MaxIterations(u32),
    #[error("Time limit reached")]
    MaxTime,
    #[error("Insufficient progress: step length {0:e}")]
    InsufficientProgress(f64),
    #[error("Solve cancelled by termination callback")]
    Callback,
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl From<LdlError> for SolverError {
    fn from(e: LdlError) -> Self {
        SolverError::NumericalBreakdown(BreakdownCause::Factorisation(e))
    }
}
