use tormap_interp::{DomainError, InterpError};

/// Equilibrium construction and evaluation errors.
#[derive(thiserror::Error, Debug)]
pub enum EqError {
    /// A required variable is missing, empty, or contains non-finite
    /// samples.
    #[error("variable `{0}` is missing or contains non-finite samples")]
    MalformedInput(String),

    /// A variable's shape disagrees with the rest of the dataset.
    #[error("variable `{name}` has shape {got:?}, expected {expected:?}")]
    ShapeMismatch {
        /// Variable name.
        name: String,
        /// The shape implied by the dataset's grids.
        expected: Vec<usize>,
        /// The supplied shape.
        got: Vec<usize>,
    },

    /// Error creating a spline.
    #[error("error creating spline: {0}")]
    Interpolation(#[from] InterpError),

    /// Spline evaluation at a non-finite point.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
