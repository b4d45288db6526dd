#![allow(non_snake_case)]

use hipm::{algebra::*, solver::*};

// minimize t subject to y = 3, z = 4, ‖(y,z)‖ ≤ t
fn basic_socp_data() -> (CscMatrix<f64>, Vec<f64>, Vec<f64>, Vec<SupportedConeT>) {
    let A = CscMatrix::new_from_triplets(2, 3, &[(0, 1, 1.), (1, 2, 1.)]).unwrap();
    let b = vec![3., 4.];
    let c = vec![1., 0., 0.];
    let cones = vec![SecondOrderConeT {
        bound: 0,
        vector: vec![1, 2],
    }];
    (A, b, c, cones)
}

#[test]
fn test_socp_feasible() {
    let (A, b, c, cones) = basic_socp_data();
    let mut program = ConicProgram::new(A, b, c, cones).unwrap();

    let mut solver = HipmSolver::new(HipmSettings::default());
    let solution = solver.solve(&mut program).unwrap();

    let refsol = vec![5., 3., 4.];
    assert!(program.x().dist(&refsol) <= 1e-5);
    assert!(f64::abs(solution.objective - 5.) <= 1e-6);

    // w = (3/5, 4/5) and s = (1, -3/5, -4/5) on the boundary of the cone
    let refw = vec![0.6, 0.8];
    assert!(program.w().dist(&refw) <= 1e-5);
    assert!(f64::abs(program.b().dot(program.w()) - 5.) <= 1e-6);
}

#[test]
fn test_socp_mixed_cones() {
    // adds min u with u - v = 1, u,v ≥ 0 to the cone problem, with
    // the cone columns listed after the orthant columns
    let mut builder = ProgramBuilder::<f64>::new();
    let u = builder.add_variable(1.);
    let v = builder.add_variable(0.);
    let t = builder.add_variable(1.);
    let y = builder.add_variable(0.);
    let z = builder.add_variable(0.);
    builder.add_constraint(&[(y, 1.)], 3.);
    builder.add_constraint(&[(z, 1.)], 4.);
    builder.add_constraint(&[(u, 1.), (v, -1.)], 1.);
    builder.add_second_order(t, &[y, z]);
    builder.add_nonnegative(u);
    builder.add_nonnegative(v);
    let mut program = builder.build().unwrap();

    let mut solver = HipmSolver::new(HipmSettings::default());
    let solution = solver.solve(&mut program).unwrap();

    assert!(f64::abs(solution.objective - 6.) <= 1e-6);
    assert!(f64::abs(program.value(t).unwrap() - 5.) <= 1e-5);
    assert!(f64::abs(program.value(u).unwrap() - 1.) <= 1e-6);
    assert!(f64::abs(program.value(v).unwrap()) <= 1e-6);

    // the primal point is in the cone
    let (t, y, z) = (
        program.value(t).unwrap(),
        program.value(y).unwrap(),
        program.value(z).unwrap(),
    );
    assert!(f64::hypot(y, z) <= t + 1e-8);
}

#[test]
fn test_socp_infeasible() {
    // t = 1 and y = 3 violate ‖(y,z)‖ ≤ t
    let A = CscMatrix::new_from_triplets(2, 3, &[(0, 0, 1.), (1, 1, 1.)]).unwrap();
    let b = vec![1., 3.];
    let c = vec![0., 0., 1.];
    let cones = vec![SecondOrderConeT {
        bound: 0,
        vector: vec![1, 2],
    }];
    let mut program = ConicProgram::new(A, b, c, cones).unwrap();

    let mut solver = HipmSolver::new(HipmSettings::default());
    assert_eq!(
        solver.solve(&mut program),
        Err(SolverError::ProgramInfeasible)
    );
}
