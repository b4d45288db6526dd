//! Linear algebra for the solver.
//!
//! Dense vectors are plain slices with the operations of [`VectorMath`].
//! The constraint matrix and the Schur complement are held as
//! [`CscMatrix`].

mod csc;
mod floats;
mod vector;

pub use csc::*;
pub use floats::*;
pub use vector::*;
