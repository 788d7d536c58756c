#![doc = include_str!("../README.md")]

mod config;
mod error;
mod evolution;
mod heap;
mod initials;
mod particle;
mod progress;
mod rkf45;
mod routines;
mod state;
mod stats;

pub(crate) use rkf45::Stepper;

pub use config::{EventDirection, IntegrationConfig, MappingConfig, SteppingMethod};
pub use error::{ConfigError, HeapError, ParticleError};
pub use evolution::Evolution;
pub use heap::{Heap, Routine};
pub use initials::HeapInitialConditions;
pub use particle::{InitialConditions, Particle, Status};
pub use routines::{MappingParameters, PoincareSection};
pub use state::State;
pub use stats::HeapStats;

pub type Result<T> = std::result::Result<T, ParticleError>;
