//! __hipm__ is a primal-dual interior point solver for linear and
//! second-order cone programs, built on the homogeneous self-dual
//! embedding.  It solves problems of the form
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & c^T x\\\\\[2ex\]
//!  \text{subject to} & Ax = b \\\\\[1ex\]
//!         & x \in \mathcal{K}
//!  \end{array}
//! $$
//!
//! with decision variables $x \in \mathbb{R}^n$, data
//! $A \in \mathbb{R}^{m \times n}$, $b \in \mathbb{R}^m$,
//! $c \in \mathbb{R}^n$, and $\mathcal{K}$ a product of non-negative
//! orthant columns and second-order cones.  The dual program is solved
//! alongside:
//!
//! $$
//! \begin{array}{rl}
//! \text{maximize} & b^T w\\\\\[2ex\]
//!  \text{subject to} & A^T w + s = c \\\\\[1ex\]
//!         & s \in \mathcal{K}
//!  \end{array}
//! $$
//!
//! ## Features
//!
//! * __Infeasibility detection__: the homogeneous embedding certifies
//!   primal or dual infeasibility without a separate phase one.
//!
//! * __Sparse linear algebra__: each iteration factors the Schur
//!   complement $A\Theta^2A^T$ with a sparse LDLᵀ factorisation and AMD
//!   ordering, refined against the unregularised matrix.
//!
//! * __Stable variable ids__: programs built with
//!   [`ProgramBuilder`](crate::solver::ProgramBuilder) keep their
//!   variable identities whatever column layout the solver chooses.
//!
//! See [`solver`] for the solver API.

//Rust hates greek characters
#![allow(confusable_idents)]

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod io;
pub mod ldl;
pub mod solver;
pub mod timers;
