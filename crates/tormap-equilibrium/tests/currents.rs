use approx::assert_relative_eq;
use tormap_interp::Accelerator;

use tormap_equilibrium::{Currents, NumericCurrents, synthetic};

#[test]
fn test_numeric_currents_creation_and_getters() {
    let dataset = synthetic::lar_dataset(32, 33, 0.1, 2.0);
    let currents = NumericCurrents::from_dataset(&dataset, "steffen").unwrap();

    println!("{currents:?}");

    assert_eq!(currents.typ(), "steffen");
    assert_eq!(currents.len(), 32);
    assert_eq!(currents.psip_data(), dataset.psip_data);
    assert_eq!(currents.g_data(), dataset.g_data);
    assert_eq!(currents.i_data(), dataset.i_data);
}

#[test]
fn test_evaluation_and_derivatives() {
    let dataset = synthetic::lar_dataset(32, 33, 0.1, 2.0);
    let currents = NumericCurrents::from_dataset(&dataset, "cubic").unwrap();
    let mut acc = Accelerator::new();

    // g = 1 and I = 0 over the whole profile.
    for psip in [0.01, 0.033, 0.07, 0.099] {
        assert_relative_eq!(currents.g(psip, &mut acc).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(currents.i(psip, &mut acc).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            currents.dg_dpsip(psip, &mut acc).unwrap(),
            0.0,
            epsilon = 1e-10
        );
        assert_relative_eq!(
            currents.di_dpsip(psip, &mut acc).unwrap(),
            0.0,
            epsilon = 1e-10
        );
    }
}

#[test]
fn test_shared_accelerator_across_components() {
    use tormap_equilibrium::{NumericQfactor, Qfactor};

    let dataset = synthetic::lar_dataset(32, 33, 0.1, 2.0);
    let qfactor = NumericQfactor::from_dataset(&dataset, "cubic").unwrap();
    let currents = NumericCurrents::from_dataset(&dataset, "cubic").unwrap();

    // All four profiles share psip_data, so co-evaluating them at one ψp
    // costs a single interval search.
    let mut acc = Accelerator::new();
    let psip = 0.042;
    qfactor.q(psip, &mut acc).unwrap();
    qfactor.psi(psip, &mut acc).unwrap();
    currents.g(psip, &mut acc).unwrap();
    currents.i(psip, &mut acc).unwrap();

    assert_eq!(acc.misses(), 1);
    assert_eq!(acc.hits(), 3);
}
