/// Evaluation at a point where interpolation is not defined.
///
/// Splines extrapolate naturally outside their domain, so this is only
/// returned for queries that are not finite numbers. Range policing is left
/// to the caller, which knows what leaving the grid means physically.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("cannot interpolate at non-finite point {value}")]
pub struct DomainError {
    /// The offending query point.
    pub value: f64,
}

/// Spline construction and evaluation errors.
#[derive(thiserror::Error, Debug)]
pub enum InterpError {
    /// The requested interpolation type is not one of the known selectors.
    #[error("unknown interpolation type `{0}`")]
    UnknownInterpolation(String),

    /// Not enough sample points for the requested interpolation type.
    #[error("`{typ}` interpolation requires at least {min} points, got {got}")]
    InsufficientPoints {
        /// Interpolation type name.
        typ: &'static str,
        /// Minimum number of points of the type.
        min: usize,
        /// Supplied number of points.
        got: usize,
    },

    /// The abscissa is not strictly increasing.
    #[error("abscissa must be strictly increasing")]
    NonMonotone,

    /// Periodic interpolation requested over data that does not close.
    #[error("endpoint values differ; data is not periodic")]
    NonPeriodic,

    /// Mismatched array lengths.
    #[error("data length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Supplied length.
        got: usize,
    },

    /// Evaluation at a non-finite point.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
