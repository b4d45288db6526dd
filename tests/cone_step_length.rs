use hipm::solver::cones::*;

// deterministic family of points and directions
fn wave(n: usize, k: usize, scale: f64) -> Vec<f64> {
    (0..n)
        .map(|i| scale * f64::sin(1.7 * (i + 1) as f64 + 0.9 * k as f64))
        .collect()
}

fn interior_point(cones: &CompositeCone<f64>, k: usize) -> Vec<f64> {
    let n = cones.numel();
    let mut x = vec![0.; n];
    let mut s = vec![0.; n];
    cones.unit_initialization(&mut x, &mut s);
    // e + small perturbation stays interior
    for (xi, p) in x.iter_mut().zip(wave(n, k + 11, 0.2)) {
        *xi += p;
    }
    x
}

fn moved(v: &[f64], dv: &[f64], α: f64) -> Vec<f64> {
    v.iter().zip(dv).map(|(v, d)| v + α * d).collect()
}

#[test]
fn test_step_stays_interior() {
    let cones = CompositeCone::<f64>::new(3, &[3, 4]).unwrap();

    for k in 0..50 {
        let v = interior_point(&cones, k);
        assert!(cones.is_interior(&v));

        let dv = wave(cones.numel(), k, 0.5 + k as f64 / 4.);
        let α = cones.max_step(&v, &dv);
        assert!((0. ..=1.).contains(&α));

        assert!(cones.is_interior(&moved(&v, &dv, 0.999 * α)));
        if α < 1. {
            // the step reaches the boundary
            assert!(!cones.is_interior(&moved(&v, &dv, 1.001 * α)));
        }
    }
}

#[test]
fn test_step_is_monotone_in_scale() {
    // doubling the direction at most halves the step
    let cones = CompositeCone::<f64>::new(2, &[3]).unwrap();
    for k in 0..20 {
        let v = interior_point(&cones, k);
        let dv = wave(cones.numel(), k, 3.);
        let dv2: Vec<f64> = dv.iter().map(|d| 2. * d).collect();

        let α = cones.max_step(&v, &dv);
        let α2 = cones.max_step(&v, &dv2);
        assert!(α2 <= α);
        if α < 1. {
            assert!(f64::abs(α2 - α / 2.) <= 1e-12);
        }
    }
}

#[test]
fn test_directions_into_the_cone() {
    // a direction in the cone never limits the step
    let cones = CompositeCone::<f64>::new(1, &[3]).unwrap();
    let v = interior_point(&cones, 0);
    let dv = vec![0.5, 2.0, 1.0, -1.0];
    assert_eq!(cones.max_step(&v, &dv), 1.);
}

#[test]
fn test_second_order_boundary_direction() {
    // dv on the boundary of the cone pointing outward from the origin
    assert!(f64::abs(soc_max_step(&[1., 0.], &[-1., 1.]) - 0.5) <= 1e-15);
    // and pointing inward
    assert_eq!(
        CompositeCone::<f64>::new(0, &[2]).unwrap().max_step(&[1., 0.], &[1., 1.]),
        1.
    );
}
