#![allow(non_snake_case)]

use hipm::{algebra::*, solver::*};

// columns: x0 ≥ 0, cone (x3; x1, x2), x4 ≥ 0
fn mixed_program() -> ConicProgram<f64> {
    let A = CscMatrix::new_from_triplets(
        2,
        5,
        &[(0, 0, 1.), (0, 1, 2.), (1, 2, 3.), (1, 3, 4.), (0, 4, 5.)],
    )
    .unwrap();
    let cones = vec![
        NonnegativeConeT(4),
        SecondOrderConeT {
            bound: 3,
            vector: vec![1, 2],
        },
        NonnegativeConeT(0),
    ];
    ConicProgram::new(A, vec![1., 2.], vec![10., 11., 12., 13., 14.], cones).unwrap()
}

#[test]
fn test_checkout_layout() {
    let mut program = mixed_program();
    let checked = program.check_out().unwrap();

    // orthant columns first in cone order, then the cone with its bound
    let order: Vec<_> = (0..5).map(|j| checked.program_column(j)).collect();
    assert_eq!(order, vec![4, 0, 3, 1, 2]);
    assert_eq!(checked.c(), &[14., 10., 13., 11., 12.]);
    assert_eq!(checked.a().get_entry((0, 0)), Some(5.));
    assert_eq!(checked.a().get_entry((1, 2)), Some(4.));
    assert_eq!(checked.cones().len(), 2);
    assert_eq!(checked.cones().degree(), 3);
}

#[test]
fn test_checkin_scatters() {
    let mut program = mixed_program();
    let checked = program.check_out().unwrap();

    let x = [1., 2., 3., 4., 5.];
    let s = [-1., -2., -3., -4., -5.];
    checked.check_in(&x, &[7., 8.], &s).unwrap();

    assert_eq!(program.x(), &[2., 4., 5., 3., 1.]);
    assert_eq!(program.s(), &[-2., -4., -5., -3., -1.]);
    assert_eq!(program.w(), &[7., 8.]);
}

#[test]
fn test_checkin_dimension_error() {
    let mut program = mixed_program();
    let checked = program.check_out().unwrap();
    let err = checked.check_in(&[0.; 4], &[0.; 2], &[0.; 5]).unwrap_err();
    assert_eq!(
        err,
        ProgramError::IncompatibleDimension {
            what: "x",
            expected: 5,
            found: 4
        }
    );
    assert_eq!(program.x(), &[0.; 5]);
}

#[test]
fn test_dropped_checkout_leaves_program() {
    let mut program = mixed_program();
    {
        let _checked = program.check_out().unwrap();
    }
    assert_eq!(program.x(), &[0.; 5]);
    assert_eq!(program.c(), &[10., 11., 12., 13., 14.]);
}

#[test]
fn test_program_errors() {
    let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1., 1.]);

    let err = ConicProgram::new(
        A.clone(),
        vec![1., 2.],
        vec![0., 0.],
        vec![NonnegativeConeT(0), NonnegativeConeT(1)],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ProgramError::IncompatibleDimension { what: "b", .. }
    ));

    let err = ConicProgram::new(
        A.clone(),
        vec![1.],
        vec![0., 0.],
        vec![NonnegativeConeT(0), NonnegativeConeT(0)],
    )
    .unwrap_err();
    assert_eq!(err, ProgramError::DuplicateColumn(0));

    let err =
        ConicProgram::new(A.clone(), vec![1.], vec![0., 0.], vec![NonnegativeConeT(0)]).unwrap_err();
    assert_eq!(err, ProgramError::UncoveredColumn(1));

    let err = ConicProgram::new(
        A.clone(),
        vec![1.],
        vec![0., 0.],
        vec![NonnegativeConeT(0), NonnegativeConeT(2)],
    )
    .unwrap_err();
    assert_eq!(err, ProgramError::ColumnOutOfRange { column: 2, ncols: 2 });

    let err = ConicProgram::new(
        A,
        vec![1.],
        vec![0., 0.],
        vec![
            NonnegativeConeT(1),
            SecondOrderConeT {
                bound: 0,
                vector: vec![],
            },
        ],
    )
    .unwrap_err();
    assert_eq!(err, ProgramError::EmptySecondOrderCone { bound: 0 });

    // unsorted row indices
    let A = CscMatrix::new(2, 1, vec![0, 2], vec![1, 0], vec![1., 1.]);
    let err = ConicProgram::new(A, vec![1., 1.], vec![0.], vec![NonnegativeConeT(0)]).unwrap_err();
    assert!(matches!(err, ProgramError::BadMatrix(_)));
}

#[test]
fn test_builder_errors() {
    let mut builder = ProgramBuilder::<f64>::new();
    let x = builder.add_variable(1.);
    builder.add_constraint(&[(x, 1.)], 1.);
    // x is in no cone
    let err = builder.build().unwrap_err();
    assert_eq!(err, ProgramError::UncoveredColumn(0));

    let mut other = ProgramBuilder::<f64>::new();
    other.add_variable(0.);
    let y = other.add_variable(0.);
    builder.add_nonnegative(y);
    assert_eq!(builder.build().unwrap_err(), ProgramError::UnknownVariable(y));
}
