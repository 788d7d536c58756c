#![doc = include_str!("../README.md")]

mod analytic;
mod bfields;
mod cache;
mod currents;
mod dataset;
mod error;
mod eval;
mod harmonics;
mod perturbations;
mod qfactors;

pub mod synthetic;

pub use eval::{Bfield, Currents, Harmonic, Perturbation, Qfactor};

pub use bfields::NumericBfield;
pub use currents::NumericCurrents;
pub use harmonics::{NumericHarmonic, PhaseMethod};
pub use perturbations::NumericPerturbation;
pub use qfactors::NumericQfactor;

pub use analytic::{ConstQfactor, LarBfield, LarCurrents, UniformBfield};

pub use cache::HarmonicCache;
pub use dataset::{EquilibriumDataset, HarmonicData};
pub use error::EqError;

pub type Result<T> = std::result::Result<T, EqError>;

/// Magnetic flux, in Normalized Units.
#[doc(alias = "f64")]
pub type Flux = f64;

/// Angle in radians.
#[doc(alias = "f64")]
pub type Radians = f64;

/// Distance, in Normalized Units (normalized to the major radius R).
#[doc(alias = "f64")]
pub type Length = f64;

/// Magnetic moment, in Normalized Units.
#[doc(alias = "f64")]
pub type MagneticMoment = f64;
