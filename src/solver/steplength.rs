use crate::algebra::*;
use crate::solver::cones::CompositeCone;
use crate::solver::direction::SearchDirection;
use crate::solver::variables::Variables;

/// Largest α ≤ 1 keeping x + αdx and s + αds in the cone and
/// τ + αdτ, κ + αdκ non-negative.
pub(crate) fn step_length<T>(
    cones: &CompositeCone<T>,
    variables: &Variables<T>,
    step: &SearchDirection<T>,
) -> T
where
    T: FloatT,
{
    let αx = cones.max_step(&variables.x, &step.dx);
    let αs = cones.max_step(&variables.s, &step.ds);
    let mut α = T::min(αx, αs);

    if step.dτ < T::zero() {
        α = T::min(α, -variables.τ / step.dτ);
    }
    if step.dκ < T::zero() {
        α = T::min(α, -variables.κ / step.dκ);
    }

    α.clip(T::zero(), T::one())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_length() {
        let cones = CompositeCone::<f64>::new(1, &[2]).unwrap();
        let mut v = Variables::new(3, 0);
        v.unit_initialization(&cones);

        let mut step = SearchDirection {
            dx: vec![-0.5, 0.0, 0.0],
            dw: vec![],
            ds: vec![0.0, 0.0, 0.0],
            dτ: 0.0,
            dκ: 0.0,
        };
        assert_eq!(step_length(&cones, &v, &step), 1.0);

        step.dx[0] = -4.0;
        assert_eq!(step_length(&cones, &v, &step), 0.25);

        // the bound coordinate of the cone, scaled to 0.2
        step.ds = vec![0.0, -5.0, 0.0];
        assert_eq!(step_length(&cones, &v, &step), 0.2);

        step.dτ = -10.0;
        assert_eq!(step_length(&cones, &v, &step), 0.1);

        step.dκ = -20.0;
        assert_eq!(step_length(&cones, &v, &step), 0.05);
    }
}
