use std::f64::consts::{PI, TAU};

use approx::assert_abs_diff_eq;

use tormap_equilibrium::{
    NumericBfield, NumericCurrents, NumericPerturbation, NumericQfactor, PhaseMethod, synthetic,
};
use tormap_simulate::{
    EventDirection, InitialConditions, MappingConfig, MappingParameters, Particle, PoincareSection,
};

type Components = (
    NumericQfactor,
    NumericCurrents,
    NumericBfield,
    NumericPerturbation,
);

fn uniform_components(psip_wall: f64, q0: f64) -> Components {
    let dataset = synthetic::uniform_dataset(32, 33, psip_wall, q0);
    (
        NumericQfactor::from_dataset(&dataset, "cubic").unwrap(),
        NumericCurrents::from_dataset(&dataset, "cubic").unwrap(),
        NumericBfield::from_dataset(&dataset, "bicubic").unwrap(),
        NumericPerturbation::from_harmonics(vec![]),
    )
}

fn uniform_initials(rho0: f64) -> InitialConditions {
    InitialConditions {
        time0: 0.0,
        theta0: 0.0,
        psip0: 0.1,
        rho0,
        zeta0: 0.0,
        mu: 0.5,
    }
}

/// Mapping on the θ = 0 surface of the uniform equilibrium: the flux is
/// frozen and ζ advances by 2πq per return.
#[test]
fn test_theta_section_of_closed_orbit() {
    let q0 = 2.0;
    let (qfactor, currents, bfield, perturbation) = uniform_components(0.2, q0);
    let params = MappingParameters::new(PoincareSection::ConstTheta, 0.0, 5);

    let mut particle = Particle::new(&uniform_initials(0.01));
    particle
        .map(
            &qfactor,
            &currents,
            &bfield,
            &perturbation,
            &params,
            &MappingConfig::default(),
        )
        .unwrap();

    assert!(particle.status.is_completed());
    assert_eq!(particle.evolution.steps_stored(), 5);

    let psips = particle.evolution.psip();
    for psip in psips.iter() {
        assert_abs_diff_eq!(*psip, 0.1, epsilon = 1e-8);
    }

    let zetas = particle.evolution.zeta().to_vec();
    for pair in zetas.windows(2) {
        assert_abs_diff_eq!(pair[1] - pair[0], TAU * q0, epsilon = 1e-6);
    }
    // The first return is itself one full turn from the seed at ζ = 0.
    assert_abs_diff_eq!(zetas[0], TAU * q0, epsilon = 1e-6);
}

/// Every recorded crossing sits on the surface to integrator accuracy.
#[test]
fn test_crossings_land_on_section() {
    let (qfactor, currents, bfield, perturbation) = uniform_components(0.2, 2.0);
    let alpha = 1.2345;
    let params = MappingParameters::new(PoincareSection::ConstTheta, alpha, 8);
    let config = MappingConfig::default();

    let mut particle = Particle::new(&uniform_initials(0.01));
    particle
        .map(&qfactor, &currents, &bfield, &perturbation, &params, &config)
        .unwrap();

    assert!(particle.status.is_completed());
    for theta in particle.evolution.theta().iter() {
        let offset = (theta - alpha).rem_euclid(TAU);
        let distance = offset.min(TAU - offset);
        assert!(distance <= 10.0 * config.error_abs_tol + 1e-12);
    }
    // Chronological order of the crossings.
    let times = particle.evolution.time().to_vec();
    assert!(times.windows(2).all(|pair| pair[0] < pair[1]));
}

/// A ζ section of the same orbit: θ advances by 2π/q per crossing.
#[test]
fn test_zeta_section_of_closed_orbit() {
    let q0 = 2.0;
    let (qfactor, currents, bfield, perturbation) = uniform_components(0.2, q0);
    let params = MappingParameters::new(PoincareSection::ConstZeta, 1.0, 6);
    // Keep ζ advancing less than a full turn per step, so no crossing can
    // hide inside a single step of this fast orbit.
    let config = MappingConfig {
        max_step: 300.0,
        ..Default::default()
    };

    let mut particle = Particle::new(&uniform_initials(0.01));
    particle
        .map(&qfactor, &currents, &bfield, &perturbation, &params, &config)
        .unwrap();

    assert!(particle.status.is_completed());
    assert_eq!(particle.evolution.steps_stored(), 6);

    for zeta in particle.evolution.zeta().iter() {
        let offset = (zeta - 1.0).rem_euclid(TAU);
        let distance = offset.min(TAU - offset);
        assert_abs_diff_eq!(distance, 0.0, epsilon = 1e-9);
    }
    let thetas = particle.evolution.theta().to_vec();
    for pair in thetas.windows(2) {
        assert_abs_diff_eq!(pair[1] - pair[0], TAU / q0, epsilon = 1e-6);
    }
}

/// The direction filter separates ascending from descending crossings.
#[test]
fn test_event_direction_filter() {
    let (qfactor, currents, bfield, perturbation) = uniform_components(0.2, 2.0);
    let params = MappingParameters::new(PoincareSection::ConstTheta, 0.0, 3);

    // This orbit only ever crosses ascending.
    let config = MappingConfig {
        event_direction: EventDirection::Ascending,
        ..Default::default()
    };
    let mut particle = Particle::new(&uniform_initials(0.01));
    particle
        .map(&qfactor, &currents, &bfield, &perturbation, &params, &config)
        .unwrap();
    assert!(particle.status.is_completed());
    assert_eq!(particle.evolution.steps_stored(), 3);

    // Filtering for descending crossings finds none before the budget runs
    // out.
    let config = MappingConfig {
        event_direction: EventDirection::Descending,
        max_steps: 2000,
        ..Default::default()
    };
    let mut particle = Particle::new(&uniform_initials(0.01));
    particle
        .map(&qfactor, &currents, &bfield, &perturbation, &params, &config)
        .unwrap();
    assert!(particle.status.is_completed());
    assert_eq!(particle.evolution.steps_stored(), 0);

    // A counter-rotating orbit crosses descending.
    let mut particle = Particle::new(&uniform_initials(-0.01));
    particle
        .map(&qfactor, &currents, &bfield, &perturbation, &params, &config)
        .unwrap();
    assert!(particle.status.is_completed());
    assert_eq!(particle.evolution.steps_stored(), 3);
}

/// Mapping a perturbed LAR orbit: the map completes and stays on the
/// surface, with the flux no longer frozen.
#[test]
fn test_mapping_with_perturbation() {
    let mut dataset = synthetic::lar_dataset(64, 129, 0.1, 2.0);
    dataset
        .harmonics
        .push(synthetic::harmonic_data(&dataset, 2, 1, 1e-5));
    let qfactor = NumericQfactor::from_dataset(&dataset, "cubic").unwrap();
    let currents = NumericCurrents::from_dataset(&dataset, "cubic").unwrap();
    let bfield = NumericBfield::from_dataset(&dataset, "bicubic").unwrap();
    let perturbation =
        NumericPerturbation::from_dataset(&dataset, "cubic", PhaseMethod::Constant).unwrap();

    let initial_conditions = InitialConditions {
        time0: 0.0,
        theta0: PI,
        psip0: 0.05,
        rho0: 1e-3,
        zeta0: 0.0,
        mu: 0.0,
    };
    let params = MappingParameters::new(PoincareSection::ConstTheta, PI, 4);
    let config = MappingConfig::default();

    let mut particle = Particle::new(&initial_conditions);
    particle
        .map(&qfactor, &currents, &bfield, &perturbation, &params, &config)
        .unwrap();

    assert!(particle.status.is_completed(), "status: {:?}", particle.status);
    assert_eq!(particle.evolution.steps_stored(), 4);
    for theta in particle.evolution.theta().iter() {
        let offset = (theta - PI).rem_euclid(TAU);
        let distance = offset.min(TAU - offset);
        assert!(distance <= 1e-9);
    }
}

/// A mapping run aborts with the wall status when the orbit leaves.
#[test]
fn test_mapping_escape() {
    let dataset = synthetic::lar_dataset(64, 129, 0.1, 2.0);
    let qfactor = NumericQfactor::from_dataset(&dataset, "cubic").unwrap();
    let currents = NumericCurrents::from_dataset(&dataset, "cubic").unwrap();
    let bfield = NumericBfield::from_dataset(&dataset, "bicubic").unwrap();
    let perturbation = NumericPerturbation::from_harmonics(vec![]);

    let initial_conditions = InitialConditions {
        time0: 0.0,
        theta0: -PI / 2.0,
        psip0: 0.099,
        rho0: 0.05,
        zeta0: 0.0,
        mu: 1.0,
    };
    let params = MappingParameters::new(PoincareSection::ConstTheta, 0.0, 100);

    let mut particle = Particle::new(&initial_conditions);
    particle
        .map(
            &qfactor,
            &currents,
            &bfield,
            &perturbation,
            &params,
            &MappingConfig::default(),
        )
        .unwrap();

    assert!(particle.status.is_escaped_wall());
    assert!(particle.evolution.steps_stored() < 100);
}
