#![allow(non_snake_case)]

use hipm::{algebra::*, solver::*};
use std::cell::RefCell;
use std::rc::Rc;

fn callback_program() -> ConicProgram<f64> {
    // minimize x0 subject to x0 - x1 = 1, x ≥ 0
    let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1., -1.]);
    let cones = vec![NonnegativeConeT(0), NonnegativeConeT(1)];
    ConicProgram::new(A, vec![1.], vec![1., 0.], cones).unwrap()
}

// setup a custom termination function
fn stop_at_three(record: &IterationRecord<f64>) -> bool {
    record.iteration >= 3
}

#[test]
fn test_termination_callback() {
    let mut program = callback_program();
    let mut solver = HipmSolver::new(HipmSettings::default());

    solver.set_termination_callback(stop_at_three);
    assert_eq!(solver.solve(&mut program), Err(SolverError::Callback));
    assert_eq!(program.x(), &[0., 0.]);

    // without the callback the same program solves
    solver.unset_termination_callback();
    assert!(solver.solve(&mut program).is_ok());
}

#[test]
fn test_observer() {
    let mut program = callback_program();
    let mut solver = HipmSolver::new(HipmSettings::default());

    let records = Rc::new(RefCell::new(Vec::new()));
    let sink = records.clone();
    solver.set_observer(move |record| sink.borrow_mut().push(record.clone()));

    let solution = solver.solve(&mut program).unwrap();
    {
        let records = records.borrow();

        // one record per iteration, including the starting point
        assert_eq!(records.len() as u32, solution.iterations + 1);
        for (k, record) in records.iter().enumerate() {
            assert_eq!(record.iteration, k as u32);
        }

        let first = &records[0];
        assert_eq!(first.tau, 1.);
        assert_eq!(first.kappa, 1.);
        assert_eq!(first.primal_infeasibility, 1.);

        let last = records.last().unwrap();
        assert_eq!(last.mu, solution.mu);
        assert!(last.mu < first.mu);
        assert!(last.step_length > 0. && last.step_length <= 0.99);
    }

    // the observer is dropped with its captured sink
    solver.unset_observer();
    assert_eq!(Rc::strong_count(&records), 1);
    let count = records.borrow().len();
    solver.solve(&mut program).unwrap();
    assert_eq!(records.borrow().len(), count);
}
