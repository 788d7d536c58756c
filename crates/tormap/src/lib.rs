//! Umbrella crate re-exporting the whole workspace.
//!
//! Downstream users depend on this crate alone:
//!
//! ```
//! use tormap::equilibrium::synthetic;
//! use tormap::simulate::{Heap, HeapInitialConditions};
//!
//! let dataset = synthetic::lar_dataset(64, 129, 0.1, 2.0);
//! let initials = HeapInitialConditions::build(&[0.0], &[0.05], &[1e-3], &[0.0], &[0.0]).unwrap();
//! let heap = Heap::new(&initials);
//! assert_eq!(heap.len(), 1);
//! # let _ = dataset;
//! ```

pub use tormap_equilibrium as equilibrium;
pub use tormap_interp as interp;
pub use tormap_simulate as simulate;
