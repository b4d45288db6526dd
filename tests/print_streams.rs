#![allow(non_snake_case)]

use hipm::{algebra::*, io::ConfigurablePrintTarget, solver::*};

fn test_print_solver() -> (HipmSolver<f64>, ConicProgram<f64>) {
    let A = CscMatrix::identity(1);
    let cones = vec![NonnegativeConeT(0)];
    let program = ConicProgram::new(A, vec![1.], vec![0.], cones).unwrap();
    let settings = HipmSettingsBuilder::default().verbose(true).build().unwrap();
    (HipmSolver::new(settings), program)
}

#[test]
fn test_print_to_stdout() {
    let (mut solver, mut program) = test_print_solver();
    solver.print_to_stdout();
    solver.solve(&mut program).unwrap();
}

#[test]
fn test_print_to_buffer() {
    let (mut solver, mut program) = test_print_solver();
    solver.print_to_buffer();
    solver.solve(&mut program).unwrap();
    let result = solver.get_print_buffer().unwrap();
    assert!(result.contains("hipm v"));
    assert!(result.contains("Terminated with status = Solved"));
}

#[test]
fn test_print_to_file() {
    use std::io::{Read, Seek};

    let (mut solver, mut program) = test_print_solver();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    solver.print_to_file(file.into_file());
    solver.solve(&mut program).unwrap();

    let mut buffer = String::new();
    file2.rewind().unwrap();
    file2.read_to_string(&mut buffer).unwrap();
    assert!(buffer.contains("hipm v"));
}

#[test]
fn test_print_error_footer() {
    let (mut solver, mut program) = test_print_solver();
    solver.settings.max_iter = 0;
    solver.print_to_buffer();
    assert_eq!(
        solver.solve(&mut program),
        Err(SolverError::MaxIterations(0))
    );
    let result = solver.get_print_buffer().unwrap();
    assert!(result.contains("Terminated with error: Iteration limit (0) reached"));
}

#[test]
fn test_print_buffer_not_configured() {
    let (mut solver, _) = test_print_solver();
    assert!(solver.get_print_buffer().is_err());
}
