use std::f64::consts::PI;

use approx::assert_relative_eq;
use tormap_interp::Accelerator;

use tormap_equilibrium::{Harmonic, HarmonicCache, NumericHarmonic, PhaseMethod, synthetic};

fn harmonic(phase_method: PhaseMethod, omega: f64) -> NumericHarmonic {
    let mut dataset = synthetic::lar_dataset(32, 33, 0.1, 2.0);
    let mut data = synthetic::harmonic_data(&dataset, 2, 1, 1e-3);
    data.omega = omega;
    dataset.harmonics.push(data);
    NumericHarmonic::from_dataset(&dataset, 0, "steffen", phase_method).unwrap()
}

#[test]
fn test_creation_and_getters() {
    let harmonic = harmonic(PhaseMethod::Constant, 0.0);

    println!("{harmonic:?}");

    assert_eq!(harmonic.m(), 2);
    assert_eq!(harmonic.n(), 1);
    assert_eq!(harmonic.omega(), 0.0);
    assert_eq!(harmonic.phase_average(), 0.0);
    assert_eq!(harmonic.len(), 32);
    assert_eq!(harmonic.psip_data().len(), 32);
    assert_eq!(harmonic.a_data().len(), 32);
    assert_eq!(harmonic.phase_data().len(), 32);
}

#[test]
fn test_value_matches_formula() {
    let harmonic = harmonic(PhaseMethod::Constant, 0.0);
    let mut acc = Accelerator::new();
    let mut cache = HarmonicCache::new();

    let (psip, theta, zeta, time) = (0.05, 0.8, 0.3, 0.0);
    let amplitude = harmonic.a(psip, &mut acc).unwrap();
    // α(0.05) at mid-profile: 4·1e-3·0.5·0.5, to spline accuracy
    assert_relative_eq!(amplitude, 1e-3, max_relative = 1e-2);

    let value = harmonic
        .h(psip, theta, zeta, time, &mut acc, &mut cache)
        .unwrap();
    let angle = 2.0 * theta - zeta;
    assert_relative_eq!(value, amplitude * angle.cos(), max_relative = 1e-12);
}

#[test]
fn test_derivatives_match_finite_differences() {
    let harmonic = harmonic(PhaseMethod::Constant, 0.0);
    let mut acc = Accelerator::new();

    let (psip, theta, zeta, time) = (0.041, 1.1, 2.7, 0.0);
    let step = 1e-6;
    let mut eval = |psip: f64, theta: f64, zeta: f64| {
        let mut cache = HarmonicCache::new();
        harmonic
            .h(psip, theta, zeta, time, &mut acc, &mut cache)
            .unwrap()
    };

    let fd_psip = (eval(psip + step, theta, zeta) - eval(psip - step, theta, zeta)) / (2.0 * step);
    let fd_theta = (eval(psip, theta + step, zeta) - eval(psip, theta - step, zeta)) / (2.0 * step);
    let fd_zeta = (eval(psip, theta, zeta + step) - eval(psip, theta, zeta - step)) / (2.0 * step);

    let mut cache = HarmonicCache::new();
    assert_relative_eq!(
        harmonic
            .dh_dpsip(psip, theta, zeta, time, &mut acc, &mut cache)
            .unwrap(),
        fd_psip,
        max_relative = 1e-5,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        harmonic
            .dh_dtheta(psip, theta, zeta, time, &mut acc, &mut cache)
            .unwrap(),
        fd_theta,
        max_relative = 1e-5,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        harmonic
            .dh_dzeta(psip, theta, zeta, time, &mut acc, &mut cache)
            .unwrap(),
        fd_zeta,
        max_relative = 1e-5,
        epsilon = 1e-9
    );
}

#[test]
fn test_time_dependence_with_interpolated_phase() {
    let omega = 0.75;
    let harmonic = harmonic(PhaseMethod::Interpolated, omega);
    let mut acc = Accelerator::new();

    let (psip, theta, zeta) = (0.05, 0.8, PI);
    let amplitude = harmonic.a(psip, &mut acc).unwrap();

    // dh/dt = -ω·α·sin(angle).
    let time = 1.3;
    let mut cache = HarmonicCache::new();
    let dh_dt = harmonic
        .dh_dt(psip, theta, zeta, time, &mut acc, &mut cache)
        .unwrap();
    let angle = 2.0 * theta - zeta + omega * time;
    assert_relative_eq!(dh_dt, -omega * amplitude * angle.sin(), max_relative = 1e-10);

    // The time-independent harmonic reports zero drive.
    let frozen = self::harmonic(PhaseMethod::Constant, 0.0);
    let mut cache = HarmonicCache::new();
    assert_eq!(
        frozen
            .dh_dt(psip, theta, zeta, time, &mut acc, &mut cache)
            .unwrap(),
        0.0
    );
}

#[test]
fn test_cache_hits_and_misses() {
    let harmonic = harmonic(PhaseMethod::Constant, 0.0);
    let mut acc = Accelerator::new();
    let mut cache = HarmonicCache::new();

    let (psip, theta, zeta, time) = (0.05, 0.0, 3.14, 0.0);
    harmonic.h(psip, theta, zeta, time, &mut acc, &mut cache).unwrap();
    harmonic.dh_dpsip(psip, theta, zeta, time, &mut acc, &mut cache).unwrap();
    harmonic.dh_dtheta(psip, theta, zeta, time, &mut acc, &mut cache).unwrap();
    harmonic.dh_dzeta(psip, theta, zeta, time, &mut acc, &mut cache).unwrap();
    harmonic.dh_dt(psip, theta, zeta, time, &mut acc, &mut cache).unwrap();
    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.hits(), 4);

    let (psip, theta, zeta, time) = (0.05, 0.0, 3.14, 0.1);
    harmonic.h(psip, theta, zeta, time, &mut acc, &mut cache).unwrap();
    harmonic.dh_dzeta(psip, theta, zeta, time, &mut acc, &mut cache).unwrap();
    assert_eq!(cache.misses(), 2);
    assert_eq!(cache.hits(), 5);
}
