#![allow(non_snake_case)]

use crate::algebra::*;
use crate::ldl::{DynamicRegularization, LdlFactorisation};
use crate::solver::cones::{CompositeCone, SupportedCone};
use crate::solver::{BreakdownCause, HipmSettings, SolverError};
use std::collections::BTreeSet;
use std::iter::zip;

// -------------------------------------
// Schur complement M = AΘ²Aᵀ
// -------------------------------------

// Each block contributes a dense outer-product term to M over the rows
// touched by its columns.  An orthant block is a single column, a
// second-order block is a whole cone.
#[derive(Debug)]
struct SchurBlock {
    cols: std::ops::Range<usize>,
    // sorted rows of A touched by cols
    rows: Vec<usize>,
    // nzval index in M of the local triu entry (p,q), p ≤ q, packed
    // column-wise at q(q+1)/2 + p
    nzidx: Vec<usize>,
}

/// Upper triangle of M = AΘ²Aᵀ on a pattern fixed at construction,
/// with its regularized LDLᵀ factors.
#[derive(Debug)]
pub(crate) struct SchurComplement<T> {
    // unregularized values, used for refinement
    M: CscMatrix<T>,
    blocks: Vec<SchurBlock>,
    diag_idx: Vec<usize>,
    ldl: Option<LdlFactorisation<T>>,

    // regularized copy of M.nzval
    vals: Vec<T>,
    // work vectors for refinement and assembly
    work_e: Vec<T>,
    work_dx: Vec<T>,
    work_local: Vec<T>,
}

impl<T> SchurComplement<T>
where
    T: FloatT,
{
    /// Symbolic construction of the pattern of M.
    pub fn new(A: &CscMatrix<T>, cones: &CompositeCone<T>) -> Self {
        let m = A.m;

        let mut blocks = Vec::new();
        for (cone, rng) in cones.iter() {
            match cone {
                SupportedCone::NonnegativeCone(_) => {
                    for j in rng {
                        blocks.push(_make_block(A, j..(j + 1)));
                    }
                }
                SupportedCone::SecondOrderCone(_) => {
                    blocks.push(_make_block(A, rng));
                }
            }
        }

        // column-wise sets of row indices, diagonal always present
        let mut pattern: Vec<BTreeSet<usize>> = (0..m).map(|r| BTreeSet::from([r])).collect();
        for block in blocks.iter() {
            for (q, &rq) in block.rows.iter().enumerate() {
                for &rp in &block.rows[..=q] {
                    pattern[rq].insert(rp);
                }
            }
        }

        let mut colptr = Vec::with_capacity(m + 1);
        let mut rowval = Vec::new();
        colptr.push(0);
        for col in pattern.iter() {
            rowval.extend(col.iter().copied());
            colptr.push(rowval.len());
        }
        let nnz = rowval.len();
        let M = CscMatrix::new(m, m, colptr, rowval, vec![T::zero(); nnz]);

        let locate = |row: usize, col: usize| -> usize {
            let first = M.colptr[col];
            let last = M.colptr[col + 1];
            // every searched entry was inserted above
            match M.rowval[first..last].binary_search(&row) {
                Ok(k) | Err(k) => first + k,
            }
        };

        for block in blocks.iter_mut() {
            let k = block.rows.len();
            let mut nzidx = Vec::with_capacity(triangular_number(k));
            for q in 0..k {
                for p in 0..=q {
                    nzidx.push(locate(block.rows[p], block.rows[q]));
                }
            }
            block.nzidx = nzidx;
        }
        let diag_idx = (0..m).map(|r| locate(r, r)).collect();
        let maxk = blocks.iter().map(|b| b.rows.len()).max().unwrap_or(0);

        Self {
            M,
            blocks,
            diag_idx,
            ldl: None,
            vals: vec![T::zero(); nnz],
            work_e: vec![T::zero(); m],
            work_dx: vec![T::zero(); m],
            work_local: vec![T::zero(); triangular_number(maxk)],
        }
    }

    pub fn nrows(&self) -> usize {
        self.M.m
    }

    /// Numeric assembly of M for the current scaling of `cones`.
    /// `w_inv` is the diagonal of W⁻¹ from the scaling matrices.
    pub fn assemble(&mut self, A: &CscMatrix<T>, cones: &CompositeCone<T>, w_inv: &[T]) {
        let two: T = T::lit(2.0);
        self.M.nzval.set(T::zero());

        let mut blocks = self.blocks.iter();

        for (cone, rng) in cones.iter() {
            match cone {
                SupportedCone::NonnegativeCone(c) => {
                    // θ²aaᵀ for each column
                    for (j, θ2) in zip(rng, c.theta_sq_diag()) {
                        let Some(block) = blocks.next() else {
                            return;
                        };
                        // the block rows are exactly this column's rows
                        let a = &A.nzval[A.colptr[j]..A.colptr[j + 1]];
                        let mut t = 0;
                        for q in 0..a.len() {
                            for p in 0..=q {
                                self.M.nzval[block.nzidx[t]] += θ2 * a[p] * a[q];
                                t += 1;
                            }
                        }
                    }
                }
                SupportedCone::SecondOrderCone(c) => {
                    // η²(2uuᵀ - Σⱼ Qⱼⱼaⱼaⱼᵀ) with u = A_K w̄
                    let Some(block) = blocks.next() else {
                        return;
                    };
                    let (w, η) = c.scaling_point();
                    let k = block.rows.len();
                    let local = &mut self.work_local[..triangular_number(k)];
                    local.set(T::zero());

                    let mut u = vec![T::zero(); k];
                    for (j, &wj) in zip(block.cols.clone(), w) {
                        for idx in A.colptr[j]..A.colptr[j + 1] {
                            let p = _local_row(&block.rows, A.rowval[idx]);
                            u[p] += A.nzval[idx] * wj;
                        }
                    }
                    for q in 0..k {
                        for p in 0..=q {
                            local[triangular_number(q) + p] += two * u[p] * u[q];
                        }
                    }

                    for j in block.cols.clone() {
                        let qj = w_inv[j];
                        for i2 in A.colptr[j]..A.colptr[j + 1] {
                            let q = _local_row(&block.rows, A.rowval[i2]);
                            for i1 in A.colptr[j]..=i2 {
                                let p = _local_row(&block.rows, A.rowval[i1]);
                                local[triangular_number(q) + p] -= qj * A.nzval[i1] * A.nzval[i2];
                            }
                        }
                    }

                    let η2 = η * η;
                    for (&idx, &v) in zip(&block.nzidx, local.iter()) {
                        self.M.nzval[idx] += η2 * v;
                    }
                }
            }
        }
    }

    /// Static regularization of the diagonal followed by an LDLᵀ
    /// factorisation.  The symbolic analysis is done on first use.
    pub fn factor(&mut self, settings: &HipmSettings<T>) -> Result<(), SolverError> {
        if self.nrows() == 0 {
            return Ok(());
        }

        let maxdiag = self
            .diag_idx
            .iter()
            .map(|&k| self.M.nzval[k].abs())
            .fold(T::zero(), T::max);
        let shift = settings.static_regularization_constant
            + settings.static_regularization_proportional * maxdiag;
        self.vals.copy_from(&self.M.nzval);
        for &k in &self.diag_idx {
            self.vals[k] += shift;
        }

        match self.ldl.as_mut() {
            Some(ldl) => {
                ldl.update_values(&self.vals);
                ldl.refactor()?;
            }
            None => {
                let regularization =
                    settings
                        .dynamic_regularization_enable
                        .then_some(DynamicRegularization {
                            eps: settings.dynamic_regularization_eps,
                            delta: settings.dynamic_regularization_delta,
                        });
                let mut shifted = self.M.clone();
                shifted.nzval.copy_from(&self.vals);
                self.ldl = Some(LdlFactorisation::new(&shifted, regularization)?);
            }
        }
        Ok(())
    }

    /// Solves Mx = b with the current factors, refined against the
    /// unregularized M.
    pub fn solve(
        &mut self,
        x: &mut [T],
        b: &[T],
        settings: &HipmSettings<T>,
    ) -> Result<(), SolverError> {
        let Some(ldl) = self.ldl.as_mut() else {
            // nothing to solve without constraints
            return Ok(());
        };

        x.copy_from(b);
        ldl.solve(x);

        if settings.iterative_refinement_enable {
            let mut refine = Refinement {
                ldl,
                M: &self.M,
                r: &mut self.work_e,
                trial: &mut self.work_dx,
            };
            refine.run(x, b, settings);
        }

        if x.is_finite() {
            Ok(())
        } else {
            Err(BreakdownCause::NonFinite.into())
        }
    }
}

fn _make_block<T: FloatT>(A: &CscMatrix<T>, cols: std::ops::Range<usize>) -> SchurBlock {
    let mut rows: Vec<usize> = cols
        .clone()
        .flat_map(|j| A.rowval[A.colptr[j]..A.colptr[j + 1]].iter().copied())
        .collect();
    rows.sort_unstable();
    rows.dedup();
    SchurBlock {
        cols,
        rows,
        nzidx: Vec::new(),
    }
}

#[inline]
fn _local_row(rows: &[usize], row: usize) -> usize {
    match rows.binary_search(&row) {
        Ok(k) | Err(k) => k,
    }
}

#[inline]
fn triangular_number(k: usize) -> usize {
    (k * (k + 1)) >> 1
}

// Corrections x += M⁻¹(b - Mx) through the regularized factors, stopping
// once the residual is within tolerance or stops shrinking by at least
// the stop ratio.  A trial that makes the residual worse is discarded.
struct Refinement<'a, T> {
    ldl: &'a mut LdlFactorisation<T>,
    M: &'a CscMatrix<T>,
    r: &'a mut [T],
    trial: &'a mut [T],
}

impl<T: FloatT> Refinement<'_, T> {
    fn run(&mut self, x: &mut [T], b: &[T], settings: &HipmSettings<T>) {
        let tol = settings.iterative_refinement_abstol
            + settings.iterative_refinement_reltol * b.norm_inf();

        let mut err = Self::residual(self.M, self.r, b, x);
        for _ in 0..settings.iterative_refinement_max_iter {
            if !err.is_finite() || err <= tol {
                return;
            }
            self.trial.copy_from(self.r);
            self.ldl.solve(self.trial);
            self.trial.axpby(T::one(), x, T::one());

            let trial_err = Self::residual(self.M, self.r, b, self.trial);
            if trial_err < err {
                x.copy_from(self.trial);
            }
            if trial_err * settings.iterative_refinement_stop_ratio > err {
                return;
            }
            err = trial_err;
        }
    }

    // r = b - Mξ, returns ‖r‖∞
    fn residual(M: &CscMatrix<T>, r: &mut [T], b: &[T], ξ: &[T]) -> T {
        r.copy_from(b);
        M.symv_triu(r, ξ, -T::one(), T::one());
        r.norm_inf()
    }
}
