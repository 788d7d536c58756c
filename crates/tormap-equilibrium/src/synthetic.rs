//! Synthetic equilibrium datasets.
//!
//! Stand-ins for a real reconstruction, mainly for tests, examples and
//! benches. The profiles are smooth and physically sensible, so splines
//! built over them behave like they do on experimental data.

use std::f64::consts::TAU;

use ndarray::{Array1, Array2};

use crate::{EquilibriumDataset, Flux, HarmonicData};

/// A dataset with uniform field `B = 1` and constant q-factor.
///
/// Orbits in this equilibrium are closed and conserve every invariant
/// exactly, which makes it the reference case for integrator tests.
pub fn uniform_dataset(n_psip: usize, n_theta: usize, psip_wall: Flux, q0: f64) -> EquilibriumDataset {
    dataset_with_field(n_psip, n_theta, psip_wall, q0, |_, _| 1.0)
}

/// A Large Aspect Ratio dataset, `B(ψ, θ) = 1 - √(2ψ)·cosθ` with constant
/// q-factor.
pub fn lar_dataset(n_psip: usize, n_theta: usize, psip_wall: Flux, q0: f64) -> EquilibriumDataset {
    dataset_with_field(n_psip, n_theta, psip_wall, q0, |psi, theta| {
        1.0 - (2.0 * psi).sqrt() * theta.cos()
    })
}

/// Builds the dataset grids and samples the given `B(ψ, θ)` formula.
fn dataset_with_field(
    n_psip: usize,
    n_theta: usize,
    psip_wall: Flux,
    q0: f64,
    field: impl Fn(Flux, f64) -> f64,
) -> EquilibriumDataset {
    let psip_data = Array1::linspace(0.0, psip_wall, n_psip);
    let theta_data = Array1::linspace(0.0, TAU, n_theta);

    let q_data = Array1::from_elem(n_psip, q0);
    let psi_data = &psip_data * q0;
    let g_data = Array1::ones(n_psip);
    let i_data = Array1::zeros(n_psip);

    let minor_radius = |i: usize| (2.0 * psi_data[i]).sqrt();
    let b_data = Array2::from_shape_fn((n_psip, n_theta), |(i, j)| {
        field(psi_data[i], theta_data[j])
    });
    let r_data = Array2::from_shape_fn((n_psip, n_theta), |(i, j)| {
        1.0 + minor_radius(i) * theta_data[j].cos()
    });
    let z_data = Array2::from_shape_fn((n_psip, n_theta), |(i, j)| {
        minor_radius(i) * theta_data[j].sin()
    });

    EquilibriumDataset {
        psip_data,
        q_data,
        psi_data,
        g_data,
        i_data,
        theta_data,
        b_data,
        r_data,
        z_data,
        db_dpsip_data: None,
        db_dtheta_data: None,
        psip_wall,
        psi_wall: q0 * psip_wall,
        baxis: 1.0,
        raxis: 1.65,
        harmonics: Vec::new(),
    }
}

/// Sample arrays for a harmonic with a parabolic amplitude profile
/// `α(ψp) = 4·eps·(ψp/ψp_wall)·(1 - ψp/ψp_wall)`, vanishing on the axis
/// and at the wall.
pub fn harmonic_data(dataset: &EquilibriumDataset, m: i64, n: i64, eps: f64) -> HarmonicData {
    let wall = dataset.psip_wall;
    let a_data = dataset
        .psip_data
        .mapv(|psip| 4.0 * eps * (psip / wall) * (1.0 - psip / wall));
    HarmonicData {
        m,
        n,
        a_data,
        phase_data: Array1::zeros(dataset.psip_data.len()),
        omega: 0.0,
    }
}
