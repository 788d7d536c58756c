//! Integration routines.

mod henon;
mod integrate;
mod map;

pub(crate) use integrate::integrate;
pub(crate) use map::map_integrate;

pub use map::{MappingParameters, PoincareSection};
