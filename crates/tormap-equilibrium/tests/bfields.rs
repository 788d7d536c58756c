use std::f64::consts::{PI, TAU};

use approx::assert_relative_eq;
use tormap_interp::{Accelerator, CellCache};

use tormap_equilibrium::{Bfield, NumericBfield, synthetic};

fn scratch() -> (Accelerator, Accelerator, CellCache) {
    (Accelerator::new(), Accelerator::new(), CellCache::new())
}

#[test]
fn test_numeric_bfield_creation_and_getters() {
    let dataset = synthetic::lar_dataset(32, 65, 0.1, 2.0);
    let bfield = NumericBfield::from_dataset(&dataset, "bicubic").unwrap();

    println!("{bfield:?}");

    assert_eq!(bfield.typ(), "bicubic");
    assert_eq!(bfield.shape(), (32, 65));
    assert_eq!(bfield.psip_wall(), 0.1);
    assert_eq!(bfield.psi_wall(), 0.2);
    assert_eq!(bfield.b_data(), dataset.b_data);
    assert_eq!(bfield.db_dpsip_data().dim(), (32, 65));
    assert_eq!(bfield.db_dtheta_data().dim(), (32, 65));
}

#[test]
fn test_evaluation_reproduces_samples() {
    let dataset = synthetic::lar_dataset(24, 49, 0.1, 2.0);
    let bfield = NumericBfield::from_dataset(&dataset, "bicubic").unwrap();
    let (mut xacc, mut yacc, mut cache) = scratch();

    for (i, psip) in dataset.psip_data.iter().enumerate() {
        for (j, theta) in dataset.theta_data.iter().enumerate() {
            let b = bfield
                .b(*psip, *theta, &mut xacc, &mut yacc, &mut cache)
                .unwrap();
            assert_relative_eq!(b, dataset.b_data[[i, j]], epsilon = 1e-12);
        }
    }
}

#[test]
fn test_theta_periodicity() {
    let dataset = synthetic::lar_dataset(24, 49, 0.1, 2.0);
    let bfield = NumericBfield::from_dataset(&dataset, "bicubic").unwrap();
    let (mut xacc, mut yacc, mut cache) = scratch();

    let psip = 0.05;
    for theta in [0.3, PI, 5.1] {
        let base = bfield
            .b(psip, theta, &mut xacc, &mut yacc, &mut cache)
            .unwrap();
        for wrapped in [theta + TAU, theta - TAU, theta + 3.0 * TAU] {
            let value = bfield
                .b(psip, wrapped, &mut xacc, &mut yacc, &mut cache)
                .unwrap();
            assert_relative_eq!(value, base, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_partials_against_analytical_lar_field() {
    // B = 1 - √(2·q0·ψp)·cosθ with q0 = 2.
    let dataset = synthetic::lar_dataset(96, 193, 0.1, 2.0);
    let bfield = NumericBfield::from_dataset(&dataset, "bicubic").unwrap();
    let (mut xacc, mut yacc, mut cache) = scratch();

    for (psip, theta) in [(0.03_f64, 0.7), (0.05, PI), (0.08, 4.4)] {
        let radius = (2.0 * 2.0 * psip).sqrt();
        let db_dpsip = bfield
            .db_dpsip(psip, theta, &mut xacc, &mut yacc, &mut cache)
            .unwrap();
        assert_relative_eq!(
            db_dpsip,
            -2.0 / radius * theta.cos(),
            max_relative = 1e-3,
            epsilon = 1e-5
        );

        let db_dtheta = bfield
            .db_dtheta(psip, theta, &mut xacc, &mut yacc, &mut cache)
            .unwrap();
        assert_relative_eq!(
            db_dtheta,
            radius * theta.sin(),
            max_relative = 1e-3,
            epsilon = 1e-5
        );
    }
}

#[test]
fn test_tabulated_partials_are_used_when_supplied() {
    let mut dataset = synthetic::lar_dataset(24, 49, 0.1, 2.0);
    let tabulated = ndarray::Array2::from_elem((24, 49), 0.123);
    dataset.db_dpsip_data = Some(tabulated.clone());
    let bfield = NumericBfield::from_dataset(&dataset, "bicubic").unwrap();

    assert_eq!(bfield.db_dpsip_data(), tabulated);
}

#[test]
fn test_second_partials_match_finite_differences() {
    let dataset = synthetic::lar_dataset(64, 129, 0.1, 2.0);
    let bfield = NumericBfield::from_dataset(&dataset, "bicubic").unwrap();
    let (mut xacc, mut yacc, mut cache) = scratch();

    let (psip, theta) = (0.0501, 2.01);
    let step = 1e-6;
    let fd = (bfield
        .db_dtheta(psip, theta + step, &mut xacc, &mut yacc, &mut cache)
        .unwrap()
        - bfield
            .db_dtheta(psip, theta - step, &mut xacc, &mut yacc, &mut cache)
            .unwrap())
        / (2.0 * step);
    let d2 = bfield
        .d2b_dtheta2(psip, theta, &mut xacc, &mut yacc, &mut cache)
        .unwrap();
    assert_relative_eq!(d2, fd, max_relative = 1e-4, epsilon = 1e-6);
}
