use crate::algebra::*;
use crate::solver::cones::CompositeCone;
use crate::solver::direction::SearchDirection;

// ---------------
// Iterate of the homogeneous embedding
// ---------------

/// Current point (x, w, s, τ, κ) in working column order
#[derive(Debug, Clone)]
pub(crate) struct Variables<T> {
    pub x: Vec<T>,
    pub w: Vec<T>,
    pub s: Vec<T>,
    pub τ: T,
    pub κ: T,
}

impl<T> Variables<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            x: vec![T::zero(); n],
            w: vec![T::zero(); m],
            s: vec![T::zero(); n],
            τ: T::one(),
            κ: T::one(),
        }
    }

    /// x = s = e, w = 0, τ = κ = 1
    pub fn unit_initialization(&mut self, cones: &CompositeCone<T>) {
        cones.unit_initialization(&mut self.x, &mut self.s);
        self.w.set(T::zero());
        self.τ = T::one();
        self.κ = T::one();
    }

    /// xᵀs + τκ
    pub fn complementarity(&self) -> T {
        self.x.dot(&self.s) + self.τ * self.κ
    }

    pub fn add_step(&mut self, step: &SearchDirection<T>, α: T) {
        self.x.axpby(α, &step.dx, T::one());
        self.w.axpby(α, &step.dw, T::one());
        self.s.axpby(α, &step.ds, T::one());
        self.τ += α * step.dτ;
        self.κ += α * step.dκ;
    }

    /// Divides x, w and s by τ, giving a point of the unembedded program
    pub fn rescale(&mut self) {
        let scale = T::recip(self.τ);
        self.x.scale(scale);
        self.w.scale(scale);
        self.s.scale(scale);
        self.κ *= scale;
        self.τ = T::one();
    }
}
