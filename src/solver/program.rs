#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::cones::{CompositeCone, SupportedConeT};
use crate::solver::ProgramError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Caller-side identity of a program variable.
///
/// Ids are stable under the column layout chosen for the constraint
/// matrix; see [`VariableMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariableId(pub(crate) usize);

impl VariableId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Bidirectional map between variable ids and matrix columns.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariableMap {
    // column of each variable
    columns: Vec<usize>,
    // variable of each column
    variables: Vec<usize>,
}

impl VariableMap {
    /// Maps variable `i` to column `i`
    pub fn identity(n: usize) -> Self {
        Self {
            columns: (0..n).collect(),
            variables: (0..n).collect(),
        }
    }

    /// Builds the map from the column of each variable, which must
    /// be a permutation of `0..columns.len()`.
    pub fn from_columns(columns: Vec<usize>) -> Result<Self, ProgramError> {
        let n = columns.len();
        let mut variables = vec![usize::MAX; n];
        for (v, &col) in columns.iter().enumerate() {
            if col >= n || variables[col] != usize::MAX {
                return Err(ProgramError::InconsistentVariableMap);
            }
            variables[col] = v;
        }
        Ok(Self { columns, variables })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// column holding variable `v`
    pub fn column(&self, v: VariableId) -> Result<usize, ProgramError> {
        self.columns
            .get(v.0)
            .copied()
            .ok_or(ProgramError::UnknownVariable(v))
    }

    /// variable held in `column`
    pub fn variable(&self, column: usize) -> Option<VariableId> {
        self.variables.get(column).map(|&v| VariableId(v))
    }

    /// Checks that the map is a bijection onto `0..ncols`
    pub fn check(&self, ncols: usize) -> Result<(), ProgramError> {
        if self.columns.len() != ncols || self.variables.len() != ncols {
            return Err(ProgramError::InconsistentVariableMap);
        }
        let consistent = self
            .columns
            .iter()
            .enumerate()
            .all(|(v, &col)| self.variables.get(col) == Some(&v));
        if consistent {
            Ok(())
        } else {
            Err(ProgramError::InconsistentVariableMap)
        }
    }
}

/// A conic program
///
/// ```text
/// minimize    cᵀx
/// subject to  Ax = b,  x ∈ K
/// ```
///
/// with dual `maximize bᵀw` subject to `Aᵀw + s = c`, `s ∈ K`.  The
/// program owns the primal point `x`, the dual point `w` and the dual
/// slack `s`; a successful solve overwrites all three.
#[derive(Debug, Clone)]
pub struct ConicProgram<T: FloatT = f64> {
    A: CscMatrix<T>,
    b: Vec<T>,
    c: Vec<T>,
    x: Vec<T>,
    w: Vec<T>,
    s: Vec<T>,
    cones: Vec<SupportedConeT>,
    map: VariableMap,
}

impl<T> ConicProgram<T>
where
    T: FloatT,
{
    /// Creates a program whose variable ids are the column indices of `A`.
    pub fn new(
        A: CscMatrix<T>,
        b: Vec<T>,
        c: Vec<T>,
        cones: Vec<SupportedConeT>,
    ) -> Result<Self, ProgramError> {
        let map = VariableMap::identity(A.n);
        Self::with_variable_map(A, b, c, cones, map)
    }

    pub(crate) fn with_variable_map(
        A: CscMatrix<T>,
        b: Vec<T>,
        c: Vec<T>,
        cones: Vec<SupportedConeT>,
        map: VariableMap,
    ) -> Result<Self, ProgramError> {
        let (m, n) = (A.m, A.n);
        let program = Self {
            A,
            b,
            c,
            x: vec![T::zero(); n],
            w: vec![T::zero(); m],
            s: vec![T::zero(); n],
            cones,
            map,
        };
        program.validate()?;
        Ok(program)
    }

    /// Checks dimensions, the matrix format, the variable map and
    /// that the cones partition the columns.
    pub fn validate(&self) -> Result<(), ProgramError> {
        let (m, n) = (self.A.m, self.A.n);

        for (what, expected, found) in [
            ("b", m, self.b.len()),
            ("c", n, self.c.len()),
            ("x", n, self.x.len()),
            ("w", m, self.w.len()),
            ("s", n, self.s.len()),
        ] {
            if expected != found {
                return Err(ProgramError::IncompatibleDimension {
                    what,
                    expected,
                    found,
                });
            }
        }

        self.A.check_format()?;
        self.map.check(n)?;
        _check_cone_partition(&self.cones, n)
    }

    /// number of constraints
    pub fn nrows(&self) -> usize {
        self.A.m
    }

    /// number of variables
    pub fn ncols(&self) -> usize {
        self.A.n
    }

    pub fn a(&self) -> &CscMatrix<T> {
        &self.A
    }

    pub fn b(&self) -> &[T] {
        &self.b
    }

    pub fn c(&self) -> &[T] {
        &self.c
    }

    pub fn x(&self) -> &[T] {
        &self.x
    }

    pub fn w(&self) -> &[T] {
        &self.w
    }

    pub fn s(&self) -> &[T] {
        &self.s
    }

    pub fn cones(&self) -> &[SupportedConeT] {
        &self.cones
    }

    pub fn variable_map(&self) -> &VariableMap {
        &self.map
    }

    /// primal value of a variable
    pub fn value(&self, v: VariableId) -> Result<T, ProgramError> {
        Ok(self.x[self.map.column(v)?])
    }

    /// dual slack of a variable
    pub fn dual_slack(&self, v: VariableId) -> Result<T, ProgramError> {
        Ok(self.s[self.map.column(v)?])
    }

    /// Prepares the working copies for a solve.
    ///
    /// Columns are reordered so that the orthant columns come first,
    /// followed by each second-order cone with its bound column leading.
    /// The returned guard borrows the program exclusively until it is
    /// checked in or dropped.
    pub fn check_out(&mut self) -> Result<CheckedOutProgram<'_, T>, ProgramError> {
        self.validate()?;

        let mut perm = Vec::with_capacity(self.A.n);
        let mut soc_dims = Vec::new();

        for cone in self.cones.iter() {
            if let SupportedConeT::NonnegativeConeT(col) = cone {
                perm.push(*col);
            }
        }
        let n_orthant = perm.len();

        for cone in self.cones.iter() {
            if let SupportedConeT::SecondOrderConeT { .. } = cone {
                let cols = cone.columns();
                soc_dims.push(cols.len());
                perm.extend(cols);
            }
        }

        let A = self.A.permute_columns(&perm);
        let c = perm.iter().map(|&j| self.c[j]).collect();
        let b = self.b.clone();
        let cones = CompositeCone::new(n_orthant, &soc_dims)?;

        Ok(CheckedOutProgram {
            program: self,
            A,
            b,
            c,
            cones,
            perm,
        })
    }
}

/// Working copy of a [`ConicProgram`] held for the duration of a solve.
///
/// Column `j` of the working matrix is column `perm[j]` of the program.
#[derive(Debug)]
pub struct CheckedOutProgram<'a, T: FloatT> {
    program: &'a mut ConicProgram<T>,
    pub(crate) A: CscMatrix<T>,
    pub(crate) b: Vec<T>,
    pub(crate) c: Vec<T>,
    pub(crate) cones: CompositeCone<T>,
    perm: Vec<usize>,
}

impl<'a, T> CheckedOutProgram<'a, T>
where
    T: FloatT,
{
    pub fn nrows(&self) -> usize {
        self.A.m
    }

    pub fn ncols(&self) -> usize {
        self.A.n
    }

    /// constraint matrix in working column order
    pub fn a(&self) -> &CscMatrix<T> {
        &self.A
    }

    pub fn b(&self) -> &[T] {
        &self.b
    }

    /// cost in working column order
    pub fn c(&self) -> &[T] {
        &self.c
    }

    pub fn cones(&self) -> &CompositeCone<T> {
        &self.cones
    }

    /// Splits the guard into read-only matrices and the mutable cones
    pub(crate) fn split(&mut self) -> (ProgramData<'_, T>, &mut CompositeCone<T>) {
        let data = ProgramData {
            A: &self.A,
            b: &self.b,
            c: &self.c,
        };
        (data, &mut self.cones)
    }

    /// program column of working column `j`
    pub fn program_column(&self, j: usize) -> usize {
        self.perm[j]
    }

    /// Writes a result in working column order back to the program.
    pub fn check_in(self, x: &[T], w: &[T], s: &[T]) -> Result<(), ProgramError> {
        let CheckedOutProgram {
            program, A, perm, ..
        } = self;
        let (m, n) = (A.m, A.n);
        for (what, expected, found) in [("x", n, x.len()), ("w", m, w.len()), ("s", n, s.len())] {
            if expected != found {
                return Err(ProgramError::IncompatibleDimension {
                    what,
                    expected,
                    found,
                });
            }
        }

        for (j, &col) in perm.iter().enumerate() {
            program.x[col] = x[j];
            program.s[col] = s[j];
        }
        program.w.copy_from_slice(w);
        Ok(())
    }
}

/// Borrowed view of the working matrices
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProgramData<'a, T> {
    pub A: &'a CscMatrix<T>,
    pub b: &'a [T],
    pub c: &'a [T],
}

fn _check_cone_partition(cones: &[SupportedConeT], ncols: usize) -> Result<(), ProgramError> {
    let mut covered = vec![false; ncols];

    for cone in cones {
        if let SupportedConeT::SecondOrderConeT { bound, vector } = cone {
            if vector.is_empty() {
                return Err(ProgramError::EmptySecondOrderCone { bound: *bound });
            }
        }
        for column in cone.columns() {
            match covered.get_mut(column) {
                None => return Err(ProgramError::ColumnOutOfRange { column, ncols }),
                Some(true) => return Err(ProgramError::DuplicateColumn(column)),
                Some(flag) => *flag = true,
            }
        }
    }

    match covered.iter().position(|&flag| !flag) {
        Some(column) => Err(ProgramError::UncoveredColumn(column)),
        None => Ok(()),
    }
}

// ---------------------------------
// incremental construction
// ---------------------------------

#[derive(Debug, Clone)]
enum ConeEntry {
    Nonnegative(VariableId),
    SecondOrder(VariableId, Vec<VariableId>),
}

impl ConeEntry {
    fn variables(&self) -> Vec<VariableId> {
        match self {
            ConeEntry::Nonnegative(v) => vec![*v],
            ConeEntry::SecondOrder(bound, vector) => {
                std::iter::once(*bound).chain(vector.iter().copied()).collect()
            }
        }
    }
}

/// Assembles a [`ConicProgram`] variable by variable.
///
/// Columns are assigned at [`build`](Self::build) in cone order, with the
/// bound of each second-order cone first, so the columns of the built
/// program generally differ from the order in which variables were added.
///
/// ```
/// use hipm::solver::*;
///
/// let mut builder = ProgramBuilder::<f64>::new();
/// let u = builder.add_variable(0.0);
/// let t = builder.add_variable(1.0);
/// builder.add_constraint(&[(u, 1.0)], 3.0);
/// builder.add_second_order(t, &[u]);
///
/// let program = builder.build().unwrap();
/// assert_eq!(program.variable_map().column(t).unwrap(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder<T: FloatT = f64> {
    costs: Vec<T>,
    rows: Vec<(Vec<(VariableId, T)>, T)>,
    cones: Vec<ConeEntry>,
}

impl<T> ProgramBuilder<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self {
            costs: Vec::new(),
            rows: Vec::new(),
            cones: Vec::new(),
        }
    }

    /// Adds a variable with objective coefficient `cost`
    pub fn add_variable(&mut self, cost: T) -> VariableId {
        self.costs.push(cost);
        VariableId(self.costs.len() - 1)
    }

    /// Adds the equality `Σ coef⋅var = rhs` and returns its row index
    pub fn add_constraint(&mut self, terms: &[(VariableId, T)], rhs: T) -> usize {
        self.rows.push((terms.to_vec(), rhs));
        self.rows.len() - 1
    }

    pub fn add_nonnegative(&mut self, v: VariableId) {
        self.cones.push(ConeEntry::Nonnegative(v));
    }

    /// `‖vector‖ ≤ bound`
    pub fn add_second_order(&mut self, bound: VariableId, vector: &[VariableId]) {
        self.cones
            .push(ConeEntry::SecondOrder(bound, vector.to_vec()));
    }

    pub fn build(&self) -> Result<ConicProgram<T>, ProgramError> {
        let nvars = self.costs.len();
        let check = |v: VariableId| {
            if v.0 < nvars {
                Ok(v)
            } else {
                Err(ProgramError::UnknownVariable(v))
            }
        };

        // lay out columns cone by cone.  Variables outside every
        // cone go last and are reported by validation
        let mut columns = vec![usize::MAX; nvars];
        let mut next = 0;
        let cone_vars = self
            .cones
            .iter()
            .map(|cone| cone.variables())
            .collect::<Vec<_>>();

        for v in cone_vars.iter().flatten().copied().chain((0..nvars).map(VariableId)) {
            let v = check(v)?;
            if columns[v.0] == usize::MAX {
                columns[v.0] = next;
                next += 1;
            }
        }
        let map = VariableMap::from_columns(columns)?;

        let mut triplets = Vec::new();
        for (row, (terms, _)) in self.rows.iter().enumerate() {
            for &(v, value) in terms {
                triplets.push((row, map.column(check(v)?)?, value));
            }
        }
        let A = CscMatrix::new_from_triplets(self.rows.len(), nvars, &triplets)?;

        let b = self.rows.iter().map(|(_, rhs)| *rhs).collect();
        let mut c = vec![T::zero(); nvars];
        for (v, &cost) in self.costs.iter().enumerate() {
            c[map.column(VariableId(v))?] = cost;
        }

        let cones = self
            .cones
            .iter()
            .zip(cone_vars.iter())
            .map(|(cone, vars)| -> Result<SupportedConeT, ProgramError> {
                let cols = vars
                    .iter()
                    .map(|&v| map.column(v))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(match cone {
                    ConeEntry::Nonnegative(_) => SupportedConeT::NonnegativeConeT(cols[0]),
                    ConeEntry::SecondOrder(..) => SupportedConeT::SecondOrderConeT {
                        bound: cols[0],
                        vector: cols[1..].to_vec(),
                    },
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        ConicProgram::with_variable_map(A, b, c, cones, map)
    }
}
