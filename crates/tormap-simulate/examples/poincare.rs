//! Computes a Poincaré map of a batch of particles spread over the flux
//! profile of a perturbed LAR equilibrium.

use ndarray::Array1;

use tormap_equilibrium::{
    NumericBfield, NumericCurrents, NumericPerturbation, NumericQfactor, PhaseMethod, synthetic,
};
use tormap_simulate::{
    Heap, HeapInitialConditions, MappingConfig, MappingParameters, PoincareSection,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut dataset = synthetic::lar_dataset(128, 257, 0.1, 2.0);
    dataset
        .harmonics
        .push(synthetic::harmonic_data(&dataset, 2, 1, 1e-5));
    let qfactor = NumericQfactor::from_dataset(&dataset, "cubic")?;
    let currents = NumericCurrents::from_dataset(&dataset, "cubic")?;
    let bfield = NumericBfield::from_dataset(&dataset, "bicubic")?;
    let perturbation = NumericPerturbation::from_dataset(&dataset, "cubic", PhaseMethod::Constant)?;

    let count = 24;
    let psips = Array1::linspace(0.01, 0.09, count);
    let initials = HeapInitialConditions::build(
        &vec![std::f64::consts::PI; count],
        psips.as_slice().expect("owned layout"),
        &vec![1e-3; count],
        &vec![0.0; count],
        &vec![0.0; count],
    )?;

    let mut heap = Heap::new(&initials);
    let params = MappingParameters::new(PoincareSection::ConstTheta, std::f64::consts::PI, 50);
    heap.poincare(
        &qfactor,
        &currents,
        &bfield,
        &perturbation,
        &params,
        &MappingConfig::default(),
    )?;

    println!("{heap:#?}");
    println!("first row of fluxes: {:?}", heap.psips().row(0));
    Ok(())
}
