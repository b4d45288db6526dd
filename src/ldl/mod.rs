//! Sparse LDLᵀ factorisation of the Schur complement.
//!
//! The matrix is supplied as its upper triangle, reordered with AMD and
//! factored row by row ("up-looking") along its elimination tree.  Only
//! positive pivots are accepted, so the factorisation is meant for
//! positive (semi)definite matrices like `AΘ²Aᵀ`; small pivots can be
//! repaired by dynamic regularisation.

#![allow(non_snake_case)]

use crate::algebra::{CscMatrix, FloatT};
use thiserror::Error;

/// Failures of [`LdlFactorisation`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LdlError {
    #[error("matrix is not square")]
    NotSquare,
    #[error("matrix is not upper triangular")]
    NotUpperTriangular,
    #[error("non-positive pivot")]
    ZeroPivot,
    #[error("non-finite pivot")]
    NonFinitePivot,
    #[error("fill-reducing ordering failed")]
    OrderingFailed,
}

/// Pivots below `eps` are replaced by `delta`.
#[derive(Debug, Clone, Copy)]
pub struct DynamicRegularization<T> {
    pub eps: T,
    pub delta: T,
}

/// LDLᵀ factors of P M Pᵀ for a fixed sparsity pattern of M.
#[derive(Debug)]
pub struct LdlFactorisation<T = f64> {
    // position k of the factored matrix holds row/column perm[k] of M
    perm: Vec<usize>,
    // P M Pᵀ, upper triangle, and where each entry of M went
    pmp: CscMatrix<T>,
    dest: Vec<usize>,

    parent: Vec<Option<usize>>,
    // unit lower triangular factor, diagonal not stored
    Lp: Vec<usize>,
    Li: Vec<usize>,
    Lx: Vec<T>,
    d: Vec<T>,

    regularization: Option<DynamicRegularization<T>>,
    regularized: usize,

    // scratch
    y: Vec<T>,
    mark: Vec<usize>,
    stack: Vec<usize>,
    filled: Vec<usize>,
}

impl<T: FloatT> LdlFactorisation<T> {
    /// Orders, analyses and factors the upper triangle `M`.
    pub fn new(
        M: &CscMatrix<T>,
        regularization: Option<DynamicRegularization<T>>,
    ) -> Result<Self, LdlError> {
        if M.m != M.n {
            return Err(LdlError::NotSquare);
        }
        if !M.is_triu() {
            return Err(LdlError::NotUpperTriangular);
        }
        let n = M.n;

        let perm = if n == 0 {
            Vec::new()
        } else {
            let (perm, _, _) = amd::order(n, &M.colptr, &M.rowval, &amd::Control::default())
                .map_err(|_| LdlError::OrderingFailed)?;
            perm
        };
        let (pmp, dest) = permute_triu(M, &perm);
        let (parent, Lp) = analyse(&pmp);
        let nnzL = Lp[n];

        let mut ldl = Self {
            perm,
            pmp,
            dest,
            parent,
            Lp,
            Li: vec![0; nnzL],
            Lx: vec![T::zero(); nnzL],
            d: vec![T::zero(); n],
            regularization,
            regularized: 0,
            y: vec![T::zero(); n],
            mark: vec![usize::MAX; n],
            stack: vec![0; n],
            filled: vec![0; n],
        };
        ldl.refactor()?;
        Ok(ldl)
    }

    pub fn dim(&self) -> usize {
        self.d.len()
    }

    /// Pivots replaced by dynamic regularisation in the last factorisation
    pub fn regularized_pivots(&self) -> usize {
        self.regularized
    }

    /// Loads new values for M.  `nzval` is laid out like the `nzval` of
    /// the matrix given to [`new`](Self::new).
    pub fn update_values(&mut self, nzval: &[T]) {
        for (&k, &v) in self.dest.iter().zip(nzval) {
            self.pmp.nzval[k] = v;
        }
    }

    /// Numeric factorisation of the current values.
    pub fn refactor(&mut self) -> Result<(), LdlError> {
        let n = self.dim();
        self.regularized = 0;
        self.mark.fill(usize::MAX);
        self.filled.fill(0);
        self.y.fill(T::zero());

        for k in 0..n {
            self.mark[k] = k;

            // scatter column k of PMPᵀ into y and collect the rows of
            // L that it touches, in topological order, on stack[top..]
            let mut top = n;
            for idx in self.pmp.colptr[k]..self.pmp.colptr[k + 1] {
                let mut i = self.pmp.rowval[idx];
                self.y[i] += self.pmp.nzval[idx];

                let mut len = 0;
                while self.mark[i] != k {
                    self.stack[len] = i;
                    len += 1;
                    self.mark[i] = k;
                    match self.parent[i] {
                        Some(p) => i = p,
                        None => break,
                    }
                }
                // the path was collected leaf first
                while len > 0 {
                    len -= 1;
                    top -= 1;
                    self.stack.swap(top, len);
                }
            }

            let mut dk = self.y[k];
            self.y[k] = T::zero();

            for &i in &self.stack[top..n] {
                let yi = self.y[i];
                self.y[i] = T::zero();

                let start = self.Lp[i];
                let end = start + self.filled[i];
                for p in start..end {
                    self.y[self.Li[p]] -= self.Lx[p] * yi;
                }
                let lki = yi / self.d[i];
                dk -= lki * yi;
                self.Li[end] = k;
                self.Lx[end] = lki;
                self.filled[i] += 1;
            }

            self.d[k] = self.pivot(dk)?;
        }
        Ok(())
    }

    fn pivot(&mut self, dk: T) -> Result<T, LdlError> {
        let dk = match self.regularization {
            Some(reg) if dk < reg.eps => {
                self.regularized += 1;
                reg.delta
            }
            _ => dk,
        };
        if !dk.is_finite() {
            Err(LdlError::NonFinitePivot)
        } else if dk <= T::zero() {
            Err(LdlError::ZeroPivot)
        } else {
            Ok(dk)
        }
    }

    /// Solves Mx = b in place.
    pub fn solve(&mut self, b: &mut [T]) {
        let n = self.dim();
        debug_assert_eq!(b.len(), n);
        let x = &mut self.y;

        for (xk, &pk) in x.iter_mut().zip(&self.perm) {
            *xk = b[pk];
        }
        // L z = x
        for j in 0..n {
            let xj = x[j];
            for p in self.Lp[j]..self.Lp[j + 1] {
                x[self.Li[p]] -= self.Lx[p] * xj;
            }
        }
        for (xk, &dk) in x.iter_mut().zip(&self.d) {
            *xk /= dk;
        }
        // Lᵀ x = z
        for j in (0..n).rev() {
            let mut s = x[j];
            for p in self.Lp[j]..self.Lp[j + 1] {
                s -= self.Lx[p] * x[self.Li[p]];
            }
            x[j] = s;
        }
        for (xk, &pk) in x.iter_mut().zip(&self.perm) {
            b[pk] = *xk;
            *xk = T::zero();
        }
    }
}

// Upper triangle of P M Pᵀ, with P given by `perm`, and the position in
// it of every entry of M.
fn permute_triu<T: FloatT>(M: &CscMatrix<T>, perm: &[usize]) -> (CscMatrix<T>, Vec<usize>) {
    let n = M.n;
    let mut inv = vec![0; n];
    for (k, &p) in perm.iter().enumerate() {
        inv[p] = k;
    }

    let target = |row: usize, col: usize| {
        let (r, c) = (inv[row], inv[col]);
        (r.min(c), r.max(c))
    };

    let mut P = CscMatrix::zeros(n, n);
    for j in 0..n {
        for &i in M.col_rows(j) {
            P.colptr[target(i, j).1 + 1] += 1;
        }
    }
    for j in 0..n {
        P.colptr[j + 1] += P.colptr[j];
    }

    let mut next = P.colptr[..n].to_vec();
    let mut dest = vec![0; M.nnz()];
    P.rowval = vec![0; M.nnz()];
    P.nzval = vec![T::zero(); M.nnz()];
    for j in 0..n {
        for idx in M.colptr[j]..M.colptr[j + 1] {
            let (r, c) = target(M.rowval[idx], j);
            let k = next[c];
            next[c] += 1;
            P.rowval[k] = r;
            P.nzval[k] = M.nzval[idx];
            dest[idx] = k;
        }
    }
    (P, dest)
}

// Elimination tree of an upper triangle and the column pointers of its
// strictly lower LDLᵀ factor.
fn analyse<T: FloatT>(P: &CscMatrix<T>) -> (Vec<Option<usize>>, Vec<usize>) {
    let n = P.n;
    let mut parent = vec![None; n];
    let mut mark = vec![usize::MAX; n];
    let mut count = vec![0; n];

    for k in 0..n {
        mark[k] = k;
        for &i0 in P.col_rows(k) {
            let mut i = i0;
            while mark[i] != k {
                let p = *parent[i].get_or_insert(k);
                count[i] += 1;
                mark[i] = k;
                i = p;
            }
        }
    }

    let mut Lp = vec![0; n + 1];
    for j in 0..n {
        Lp[j + 1] = Lp[j] + count[j];
    }
    (parent, Lp)
}
