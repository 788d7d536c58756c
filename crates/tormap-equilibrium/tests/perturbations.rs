use approx::assert_relative_eq;
use tormap_interp::Accelerator;

use tormap_equilibrium::{
    Harmonic, HarmonicCache, NumericPerturbation, Perturbation, PhaseMethod, synthetic,
};

#[test]
fn test_empty_perturbation_sums_to_zero() {
    let perturbation = NumericPerturbation::from_harmonics(vec![]);

    println!("{perturbation:?}");

    assert!(perturbation.is_empty());
    assert_eq!(perturbation.len(), 0);

    let mut acc = Accelerator::new();
    let mut caches: Vec<HarmonicCache> = Vec::new();
    let (psip, theta, zeta, time) = (0.005, 3.14, 6.28, 0.0);

    assert_eq!(
        perturbation
            .p(psip, theta, zeta, time, &mut acc, &mut caches)
            .unwrap(),
        0.0
    );
    assert_eq!(
        perturbation
            .dp_dpsip(psip, theta, zeta, time, &mut acc, &mut caches)
            .unwrap(),
        0.0
    );
    assert_eq!(
        perturbation
            .dp_dtheta(psip, theta, zeta, time, &mut acc, &mut caches)
            .unwrap(),
        0.0
    );
    assert_eq!(
        perturbation
            .dp_dzeta(psip, theta, zeta, time, &mut acc, &mut caches)
            .unwrap(),
        0.0
    );
    assert_eq!(
        perturbation
            .dp_dt(psip, theta, zeta, time, &mut acc, &mut caches)
            .unwrap(),
        0.0
    );
}

#[test]
fn test_sum_equals_harmonic_contributions() {
    let mut dataset = synthetic::lar_dataset(32, 33, 0.1, 2.0);
    dataset.harmonics.push(synthetic::harmonic_data(&dataset, 2, 1, 1e-4));
    dataset.harmonics.push(synthetic::harmonic_data(&dataset, 3, 2, 5e-5));
    let perturbation =
        NumericPerturbation::from_dataset(&dataset, "steffen", PhaseMethod::Constant).unwrap();
    assert_eq!(perturbation.len(), 2);

    let mut acc = Accelerator::new();
    let mut caches = vec![HarmonicCache::new(), HarmonicCache::new()];
    let (psip, theta, zeta, time) = (0.033, 1.2, 0.4, 0.0);

    let total = perturbation
        .p(psip, theta, zeta, time, &mut acc, &mut caches)
        .unwrap();

    let mut single_caches = vec![HarmonicCache::new(), HarmonicCache::new()];
    let first = perturbation[0]
        .h(psip, theta, zeta, time, &mut acc, &mut single_caches[0])
        .unwrap();
    let second = perturbation[1]
        .h(psip, theta, zeta, time, &mut acc, &mut single_caches[1])
        .unwrap();
    assert_relative_eq!(total, first + second, epsilon = 1e-15);
}

#[test]
fn test_indexing_preserves_order() {
    let mut dataset = synthetic::lar_dataset(32, 33, 0.1, 2.0);
    dataset.harmonics.push(synthetic::harmonic_data(&dataset, 2, 1, 1e-4));
    dataset.harmonics.push(synthetic::harmonic_data(&dataset, 3, 2, 1e-4));
    let perturbation =
        NumericPerturbation::from_dataset(&dataset, "steffen", PhaseMethod::Constant).unwrap();

    assert_eq!((perturbation[0].m(), perturbation[0].n()), (2, 1));
    assert_eq!((perturbation[1].m(), perturbation[1].n()), (3, 2));
}
