#![allow(non_snake_case)]

use hipm::{algebra::*, solver::*};

#[test]
fn test_ill_posed_thresholds() {
    // with μ and τ thresholds of one the unit starting point already
    // satisfies the ill-posed predicate, while its residuals rule out
    // the other two
    let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1., -1.]);
    let cones = vec![NonnegativeConeT(0), NonnegativeConeT(1)];
    let mut program = ConicProgram::new(A, vec![1.], vec![1., 0.], cones).unwrap();

    let settings = HipmSettingsBuilder::default()
        .mu_threshold(1.0)
        .tau_threshold(1.0)
        .build()
        .unwrap();
    let mut solver = HipmSolver::new(settings);

    let iterations = std::rc::Rc::new(std::cell::Cell::new(0u32));
    let counter = iterations.clone();
    solver.set_observer(move |_| counter.set(counter.get() + 1));

    assert_eq!(solver.solve(&mut program), Err(SolverError::IllPosed));
    assert_eq!(iterations.get(), 1);
    assert_eq!(program.x(), &[0., 0.]);
}

#[test]
fn test_all_zero_program() {
    // A = 0, b = 0, c = 0: every x ∈ K is optimal.  The iterates keep
    // x fixed and drive s and κ to zero with τ = 1
    let A = CscMatrix::new(1, 2, vec![0, 0, 0], vec![], vec![]);
    let cones = vec![NonnegativeConeT(0), NonnegativeConeT(1)];
    let mut program = ConicProgram::new(A, vec![0.], vec![0., 0.], cones).unwrap();

    let mut solver = HipmSolver::new(HipmSettings::default());
    let solution = solver.solve(&mut program).unwrap();

    assert_eq!(solution.objective, 0.);
    assert!(f64::abs(solution.tau - 1.) <= 1e-12);
    assert!(program.x().minimum() > 0.);
    assert!(program.s().norm_inf() <= 1e-7);
    assert_eq!(program.w(), &[0.]);
}

#[test]
fn test_all_zero_second_order_program() {
    let A = CscMatrix::new(1, 3, vec![0, 0, 0, 0], vec![], vec![]);
    let cones = vec![SecondOrderConeT {
        bound: 0,
        vector: vec![1, 2],
    }];
    let mut program = ConicProgram::new(A, vec![0.], vec![0.; 3], cones).unwrap();

    let mut solver = HipmSolver::new(HipmSettings::default());
    let solution = solver.solve(&mut program).unwrap();

    assert_eq!(solution.objective, 0.);
    assert!(program.s().norm_inf() <= 1e-7);
}
