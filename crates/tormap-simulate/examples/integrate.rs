//! Integrates a single particle in a synthetic LAR equilibrium and prints
//! a summary of its orbit.

use tormap_equilibrium::{
    NumericBfield, NumericCurrents, NumericPerturbation, NumericQfactor, synthetic,
};
use tormap_simulate::{InitialConditions, IntegrationConfig, Particle};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = synthetic::lar_dataset(128, 257, 0.1, 2.0);
    let qfactor = NumericQfactor::from_dataset(&dataset, "cubic")?;
    let currents = NumericCurrents::from_dataset(&dataset, "cubic")?;
    let bfield = NumericBfield::from_dataset(&dataset, "bicubic")?;
    let perturbation = NumericPerturbation::from_harmonics(vec![]);

    let initial_conditions = InitialConditions {
        time0: 0.0,
        theta0: 0.0,
        psip0: 0.05,
        rho0: 0.01,
        zeta0: 0.0,
        mu: 0.0,
    };

    let mut particle = Particle::new(&initial_conditions);
    particle.integrate(
        &qfactor,
        &currents,
        &bfield,
        &perturbation,
        (0.0, 1e4),
        &IntegrationConfig::default(),
    )?;

    println!("{particle:#?}");
    Ok(())
}
