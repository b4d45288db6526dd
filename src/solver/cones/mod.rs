#![allow(non_snake_case)]

//! Cone model: the non-negative orthant and the second-order cone.
//!
//! Every cone operates on its own contiguous slice of the working
//! vectors, with the bound coordinate of a second-order cone first.

use crate::algebra::FloatT;
use enum_dispatch::*;
use thiserror::Error;

mod compositecone;
mod nonnegativecone;
mod socone;

pub use compositecone::*;
pub use nonnegativecone::*;
pub use socone::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Invalid cone dimensions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConeError {
    #[error("second-order cone of dimension {0}; at least 2 is required")]
    SecondOrderDimension(usize),
}

/// Cone membership of program columns, as supplied by the caller.
///
/// Column indices refer to the columns of the constraint matrix of a
/// [`ConicProgram`](crate::solver::ConicProgram).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SupportedConeT {
    /// The column is constrained to be non-negative
    NonnegativeConeT(usize),
    /// `‖x[vector]‖ ≤ x[bound]`
    SecondOrderConeT {
        bound: usize,
        vector: Vec<usize>,
    },
}

impl SupportedConeT {
    /// Program columns covered by this cone, bound first.
    pub fn columns(&self) -> Vec<usize> {
        match self {
            SupportedConeT::NonnegativeConeT(col) => vec![*col],
            SupportedConeT::SecondOrderConeT { bound, vector } => {
                std::iter::once(*bound).chain(vector.iter().copied()).collect()
            }
        }
    }
}

/// Operations on a single cone, over its local slice of a vector.
///
/// The Nesterov-Todd scaling Θ computed in
/// [`update_scaling`](Cone::update_scaling) satisfies `x = Θ²s`, so that
/// `λ = Θ⁻¹x = Θs` is the common scaled point.
#[enum_dispatch]
pub trait Cone<T>
where
    T: FloatT,
{
    /// number of coordinates
    fn numel(&self) -> usize;

    /// barrier degree
    fn degree(&self) -> usize;

    /// x = s = e
    fn unit_initialization(&self, x: &mut [T], s: &mut [T]);

    /// strict membership of the cone interior
    fn is_interior(&self, x: &[T]) -> bool;

    /// Computes the scaling point for the pair (x,s).  `reflection` is the
    /// cone's block of the reflection diagonal.  Returns false if either
    /// point is outside the cone interior.
    fn update_scaling(&mut self, x: &[T], s: &[T], reflection: &[T]) -> bool;

    /// y = Θv
    fn mul_theta(&self, y: &mut [T], v: &[T]);

    /// y = Θ⁻¹v
    fn mul_theta_inv(&self, y: &mut [T], v: &[T]);

    /// y = Θ²v
    fn mul_theta_sq(&self, y: &mut [T], v: &[T]);

    /// Jordan product z = x∘y
    fn circ_op(&self, z: &mut [T], x: &[T], y: &[T]);

    /// Inverse Jordan product z = x\y, i.e. the solution of x∘z = y
    fn inv_circ_op(&self, z: &mut [T], x: &[T], y: &[T]);

    /// v += αe
    fn add_scaled_e(&self, v: &mut [T], α: T);

    /// Supremum of the step α ≥ 0 keeping `v + α dv` in the cone, for `v`
    /// inside the cone.  Directions that never reach the boundary return
    /// the neutral value 1.
    fn max_step(&self, v: &[T], dv: &[T]) -> T;
}

/// Tagged variant over the supported cones
#[enum_dispatch(Cone<T>)]
#[derive(Debug, Clone)]
pub enum SupportedCone<T>
where
    T: FloatT,
{
    NonnegativeCone(NonnegativeCone<T>),
    SecondOrderCone(SecondOrderCone<T>),
}

/// Supremum of the step α ≥ 0 keeping `v + α dv ≥ 0` elementwise,
/// or 1 if no coordinate decreases.
pub fn orthant_max_step<T: FloatT>(v: &[T], dv: &[T]) -> T {
    let mut α = T::infinity();
    for (&vi, &dvi) in std::iter::zip(v, dv) {
        if dvi < T::zero() {
            α = T::min(α, -vi / dvi);
        }
    }
    if α.is_finite() {
        α
    } else {
        T::one()
    }
}
