#![allow(non_snake_case)]

use super::{FloatT, VectorMath};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Structural defects found by [`CscMatrix::check_format`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SparseFormatError {
    #[error("colptr, rowval and nzval lengths do not agree with the matrix size")]
    IncompatibleDimension,
    #[error("column pointers are not non-decreasing")]
    BadColptr,
    #[error("row indices out of range or not strictly increasing within a column")]
    BadRowval,
}

/// Compressed sparse column matrix.
///
/// Column `j` holds the entries `nzval[colptr[j]..colptr[j+1]]` in the
/// rows `rowval[colptr[j]..colptr[j+1]]`.  The 2 x 3 matrix
/// ```text
/// [1.  .  2.]
/// [.  3.  4.]
/// ```
/// is
/// ```
/// use hipm::algebra::CscMatrix;
///
/// let A = CscMatrix::new(2, 3, vec![0, 1, 2, 4], vec![0, 1, 0, 1], vec![1., 3., 2., 4.]);
/// assert!(A.check_format().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CscMatrix<T = f64> {
    /// rows
    pub m: usize,
    /// columns
    pub n: usize,
    pub colptr: Vec<usize>,
    pub rowval: Vec<usize>,
    pub nzval: Vec<T>,
}

impl<T: FloatT> CscMatrix<T> {
    /// Wraps the raw arrays without checking them.  See
    /// [`check_format`](Self::check_format).
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        Self {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// `m x n` matrix without entries
    pub fn zeros(m: usize, n: usize) -> Self {
        Self::new(m, n, vec![0; n + 1], Vec::new(), Vec::new())
    }

    pub fn identity(n: usize) -> Self {
        Self::new(n, n, (0..=n).collect(), (0..n).collect(), vec![T::one(); n])
    }

    /// Builds a matrix from `(row, col, value)` triplets in any order.
    /// Repeated positions are summed.
    pub fn new_from_triplets(
        m: usize,
        n: usize,
        triplets: &[(usize, usize, T)],
    ) -> Result<Self, SparseFormatError> {
        if triplets.iter().any(|&(r, c, _)| r >= m || c >= n) {
            return Err(SparseFormatError::BadRowval);
        }

        let mut order: Vec<usize> = (0..triplets.len()).collect();
        order.sort_by_key(|&k| (triplets[k].1, triplets[k].0));

        let mut A = Self::zeros(m, n);
        let mut prev = None;
        for k in order {
            let (r, c, v) = triplets[k];
            match (prev == Some((r, c)), A.nzval.last_mut()) {
                (true, Some(last)) => *last += v,
                _ => {
                    A.rowval.push(r);
                    A.nzval.push(v);
                    A.colptr[c + 1] += 1;
                }
            }
            prev = Some((r, c));
        }
        for c in 1..=n {
            A.colptr[c] += A.colptr[c - 1];
        }
        Ok(A)
    }

    pub fn nrows(&self) -> usize {
        self.m
    }

    pub fn ncols(&self) -> usize {
        self.n
    }

    pub fn nnz(&self) -> usize {
        self.nzval.len()
    }

    /// Verifies array lengths, monotone column pointers and strictly
    /// increasing in-range row indices.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        let nnz = self.nzval.len();
        if self.colptr.len() != self.n + 1
            || self.rowval.len() != nnz
            || self.colptr.first() != Some(&0)
            || self.colptr.last() != Some(&nnz)
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if self.colptr.windows(2).any(|w| w[1] < w[0]) {
            return Err(SparseFormatError::BadColptr);
        }
        for j in 0..self.n {
            let rows = self.col_rows(j);
            let sorted = rows.windows(2).all(|w| w[0] < w[1]);
            if !sorted || rows.last().is_some_and(|&r| r >= self.m) {
                return Err(SparseFormatError::BadRowval);
            }
        }
        Ok(())
    }

    /// Row indices of column `j`
    #[inline]
    pub fn col_rows(&self, j: usize) -> &[usize] {
        &self.rowval[self.colptr[j]..self.colptr[j + 1]]
    }

    /// Values of column `j`
    #[inline]
    pub fn col_vals(&self, j: usize) -> &[T] {
        &self.nzval[self.colptr[j]..self.colptr[j + 1]]
    }

    /// No structural entry below the diagonal
    pub fn is_triu(&self) -> bool {
        (0..self.n).all(|j| self.col_rows(j).iter().all(|&i| i <= j))
    }

    /// Value stored at `(row, col)`, `None` when not structurally present.
    pub fn get_entry(&self, (row, col): (usize, usize)) -> Option<T> {
        let k = self.col_rows(col).binary_search(&row).ok()?;
        Some(self.col_vals(col)[k])
    }

    /// The matrix whose column `j` is column `perm[j]` of `self`.
    pub fn permute_columns(&self, perm: &[usize]) -> Self {
        let mut B = Self::zeros(self.m, perm.len());
        B.rowval.reserve(self.nnz());
        B.nzval.reserve(self.nnz());
        for (j, &src) in perm.iter().enumerate() {
            B.rowval.extend_from_slice(self.col_rows(src));
            B.nzval.extend_from_slice(self.col_vals(src));
            B.colptr[j + 1] = B.nzval.len();
        }
        B
    }

    /// `y = a*A*x + b*y`
    pub fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        debug_assert!(x.len() == self.n && y.len() == self.m);
        scale_or_clear(y, b);
        for (j, &xj) in x.iter().enumerate() {
            let axj = a * xj;
            for (&i, &v) in self.col_rows(j).iter().zip(self.col_vals(j)) {
                y[i] += v * axj;
            }
        }
    }

    /// `y = a*Aᵀ*x + b*y`
    pub fn gemv_t(&self, y: &mut [T], x: &[T], a: T, b: T) {
        debug_assert!(x.len() == self.m && y.len() == self.n);
        for (j, yj) in y.iter_mut().enumerate() {
            let s = self
                .col_rows(j)
                .iter()
                .zip(self.col_vals(j))
                .fold(T::zero(), |acc, (&i, &v)| acc + v * x[i]);
            *yj = if b == T::zero() { a * s } else { a * s + b * *yj };
        }
    }

    /// `y = a*M*x + b*y` for the symmetric M whose upper triangle is
    /// stored in `self`.
    pub fn symv_triu(&self, y: &mut [T], x: &[T], a: T, b: T) {
        debug_assert!(self.m == self.n && x.len() == self.n && y.len() == self.n);
        scale_or_clear(y, b);
        for j in 0..self.n {
            for (&i, &v) in self.col_rows(j).iter().zip(self.col_vals(j)) {
                y[i] += a * v * x[j];
                if i != j {
                    y[j] += a * v * x[i];
                }
            }
        }
    }
}

// b = 0 discards y, including any NaNs in it
fn scale_or_clear<T: FloatT>(y: &mut [T], b: T) {
    if b == T::zero() {
        y.set(T::zero());
    } else if b != T::one() {
        y.scale(b);
    }
}
