#![doc = include_str!("../README.md")]

mod accel;
mod akima;
mod cache;
mod cubic;
mod error;
mod linear;
mod spline;
mod spline2d;
mod steffen;

pub use accel::Accelerator;
pub use cache::CellCache;
pub use error::{DomainError, InterpError};
pub use spline::{InterpType, Spline, make_spline};
pub use spline2d::{Interp2dType, Spline2d, make_spline2d};

pub type Result<T> = std::result::Result<T, InterpError>;
