use super::*;
use std::ops::Range;

/// Product of cones laid out over contiguous column ranges.
#[derive(Debug, Clone)]
pub struct CompositeCone<T: FloatT = f64> {
    cones: Vec<SupportedCone<T>>,

    //overall size of the composite cone
    pub(crate) numel: usize,
    pub(crate) degree: usize,

    //ranges for the indices of the constituent cones
    pub(crate) rng_cones: Vec<Range<usize>>,
}

impl<T> CompositeCone<T>
where
    T: FloatT,
{
    /// Builds a composite cone from consecutive blocks.  `n_orthant`
    /// leading coordinates form one non-negative block, followed by one
    /// second-order cone for each entry of `soc_dims`.  Second-order
    /// cones need at least two coordinates.
    pub fn new(n_orthant: usize, soc_dims: &[usize]) -> Result<Self, ConeError> {
        if let Some(&dim) = soc_dims.iter().find(|&&d| d < 2) {
            return Err(ConeError::SecondOrderDimension(dim));
        }
        let mut cones: Vec<SupportedCone<T>> = Vec::with_capacity(soc_dims.len() + 1);

        if n_orthant > 0 {
            cones.push(NonnegativeCone::new(n_orthant).into());
        }
        for &dim in soc_dims {
            cones.push(SecondOrderCone::new(dim).into());
        }

        let numel = cones.iter().map(|c| c.numel()).sum();
        let degree = cones.iter().map(|c| c.degree()).sum();
        let rng_cones = _make_rng_cones(&cones);

        Ok(Self {
            cones,
            numel,
            degree,
            rng_cones,
        })
    }

    /// total number of coordinates
    pub fn numel(&self) -> usize {
        self.numel
    }

    /// barrier degree, one per orthant coordinate and per second-order cone
    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn len(&self) -> usize {
        self.cones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cones.is_empty()
    }

    /// Iterates over the cones and their column ranges
    pub fn iter(&self) -> impl Iterator<Item = (&SupportedCone<T>, Range<usize>)> {
        self.cones.iter().zip(self.rng_cones.iter().cloned())
    }

    pub fn unit_initialization(&self, x: &mut [T], s: &mut [T]) {
        for (cone, rng) in self.iter() {
            cone.unit_initialization(&mut x[rng.clone()], &mut s[rng]);
        }
    }

    pub fn is_interior(&self, x: &[T]) -> bool {
        self.iter().all(|(cone, rng)| cone.is_interior(&x[rng]))
    }

    /// Refreshes every cone's scaling.  False if any pair has left
    /// its cone interior.
    pub fn update_scaling(&mut self, x: &[T], s: &[T], reflection: &[T]) -> bool {
        let mut is_ok = true;
        for (cone, rng) in self.cones.iter_mut().zip(self.rng_cones.iter()) {
            let rng = rng.clone();
            is_ok &= cone.update_scaling(&x[rng.clone()], &s[rng.clone()], &reflection[rng]);
        }
        is_ok
    }

    pub fn mul_theta(&self, y: &mut [T], v: &[T]) {
        for (cone, rng) in self.iter() {
            cone.mul_theta(&mut y[rng.clone()], &v[rng]);
        }
    }

    pub fn mul_theta_inv(&self, y: &mut [T], v: &[T]) {
        for (cone, rng) in self.iter() {
            cone.mul_theta_inv(&mut y[rng.clone()], &v[rng]);
        }
    }

    pub fn mul_theta_sq(&self, y: &mut [T], v: &[T]) {
        for (cone, rng) in self.iter() {
            cone.mul_theta_sq(&mut y[rng.clone()], &v[rng]);
        }
    }

    pub fn circ_op(&self, z: &mut [T], x: &[T], y: &[T]) {
        for (cone, rng) in self.iter() {
            cone.circ_op(&mut z[rng.clone()], &x[rng.clone()], &y[rng]);
        }
    }

    pub fn inv_circ_op(&self, z: &mut [T], x: &[T], y: &[T]) {
        for (cone, rng) in self.iter() {
            cone.inv_circ_op(&mut z[rng.clone()], &x[rng.clone()], &y[rng]);
        }
    }

    pub fn add_scaled_e(&self, v: &mut [T], α: T) {
        for (cone, rng) in self.iter() {
            cone.add_scaled_e(&mut v[rng], α);
        }
    }

    /// Smallest step over all cones, 1 if none binds
    pub fn max_step(&self, v: &[T], dv: &[T]) -> T {
        self.iter().fold(T::one(), |α, (cone, rng)| {
            T::min(α, cone.max_step(&v[rng.clone()], &dv[rng]))
        })
    }
}

fn _make_rng_cones<T>(cones: &[SupportedCone<T>]) -> Vec<Range<usize>>
where
    T: FloatT,
{
    let mut rngs = Vec::with_capacity(cones.len());
    let mut start = 0;
    for cone in cones {
        let stop = start + cone.numel();
        rngs.push(start..stop);
        start = stop;
    }
    rngs
}
