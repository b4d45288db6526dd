#![allow(non_snake_case)]
#![cfg(feature = "serde")]

use hipm::{algebra::*, solver::*};
use std::io::{Seek, SeekFrom};

#[test]
fn test_json_io() {
    let A = CscMatrix::new_from_triplets(2, 3, &[(0, 1, 1.), (1, 2, 1.)]).unwrap();
    let cones = vec![SecondOrderConeT {
        bound: 0,
        vector: vec![1, 2],
    }];
    let mut program = ConicProgram::new(A, vec![3., 4.], vec![1., 0., 0.], cones).unwrap();

    let mut solver = HipmSolver::new(HipmSettings::default());
    solver.solve(&mut program).unwrap();

    // write the program to a file
    let mut file = tempfile::tempfile().unwrap();
    program
        .write_to_file(&mut file, Some(&solver.settings))
        .unwrap();

    // read the program from the file
    file.seek(SeekFrom::Start(0)).unwrap();
    let (mut program2, settings) = ConicProgram::<f64>::read_from_file(&mut file).unwrap();
    let mut solver2 = HipmSolver::new(settings.unwrap());
    solver2.solve(&mut program2).unwrap();
    assert_eq!(program.x(), program2.x());
    assert_eq!(program.w(), program2.w());

    // and again with custom settings
    file.seek(SeekFrom::Start(0)).unwrap();
    let (mut program3, _) = ConicProgram::<f64>::read_from_file(&mut file).unwrap();
    let settings = HipmSettingsBuilder::default().max_iter(1).build().unwrap();
    let mut solver3 = HipmSolver::new(settings);
    assert_eq!(
        solver3.solve(&mut program3),
        Err(SolverError::MaxIterations(1))
    );
}

#[test]
fn test_json_builder_program() {
    // the variable map survives the round trip
    let mut builder = ProgramBuilder::<f64>::new();
    let y = builder.add_variable(0.);
    let t = builder.add_variable(1.);
    builder.add_constraint(&[(y, 1.)], -2.);
    builder.add_second_order(t, &[y]);
    let program = builder.build().unwrap();

    let mut file = tempfile::tempfile().unwrap();
    program.write_to_file(&mut file, None).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let (mut program2, settings) = ConicProgram::<f64>::read_from_file(&mut file).unwrap();
    assert!(settings.is_none());

    let mut solver = HipmSolver::new(HipmSettings::default());
    solver.solve(&mut program2).unwrap();
    assert!(f64::abs(program2.value(t).unwrap() - 2.) <= 1e-6);
    assert!(f64::abs(program2.value(y).unwrap() + 2.) <= 1e-6);
}
