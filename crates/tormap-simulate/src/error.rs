use tormap_equilibrium::EqError;

/// Internal integration-routine errors.
///
/// Most variants describe a particle's terminal condition rather than a
/// hard failure; [`Particle`](crate::Particle) converts them into its
/// [`Status`](crate::Status) and sibling particles keep running.
#[derive(thiserror::Error, Debug)]
pub enum ParticleError {
    /// Error evaluating the equilibrium.
    #[error("{0}")]
    Eq(#[from] EqError),

    /// The orbit left the `[0, ψp_wall]` flux interval.
    #[error("orbit escaped through the wall")]
    EscapedWall,

    /// The controller pushed the step size below the configured floor.
    #[error("step size fell below the configured floor")]
    StepFloorReached,

    /// Non-finite values encountered during state evaluation.
    #[error("non-finite values encountered during state evaluation")]
    NonFinite,

    /// The step budget ran out before the requested end.
    #[error("step budget exhausted")]
    StepLimitReached,

    /// The cooperative stop flag was raised.
    #[error("cancelled by the stop flag")]
    Cancelled,

    /// The spacing between consecutive recorded intersections deviates
    /// from 2π beyond the configured threshold.
    #[error("intersection spacing check failed")]
    InvalidIntersections,
}

/// Invalid integration/mapping configuration.
///
/// Configuration errors abort the whole job synchronously, before any
/// particle is integrated.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Non-positive error tolerances.
    #[error("error tolerances must be positive, got atol={atol}, rtol={rtol}")]
    InvalidTolerance {
        /// Absolute tolerance.
        atol: f64,
        /// Relative tolerance.
        rtol: f64,
    },

    /// Non-positive energy tolerance.
    #[error("energy tolerance must be positive, got {0}")]
    InvalidEnergyTolerance(f64),

    /// Safety factor outside `(0, 1)`.
    #[error("safety factor must be in (0, 1), got {0}")]
    InvalidSafetyFactor(f64),

    /// Inconsistent step bounds.
    #[error("step bounds must satisfy 0 < min ≤ first ≤ max, got min={min}, first={first}, max={max}")]
    InvalidStepBounds {
        /// Smallest allowed step.
        min: f64,
        /// Initial step.
        first: f64,
        /// Largest allowed step.
        max: f64,
    },

    /// Zero step budget.
    #[error("max_steps must be positive")]
    ZeroMaxSteps,

    /// Zero storage stride.
    #[error("store_stride must be at least 1")]
    ZeroStride,

    /// A mapping with no intersections requested.
    #[error("a mapping needs at least one intersection")]
    ZeroIntersections,

    /// Non-finite surface constant.
    #[error("the section constant α must be finite, got {0}")]
    InvalidAlpha(f64),
}

/// Errors of the parallel driver.
#[derive(thiserror::Error, Debug)]
pub enum HeapError {
    /// The initial condition arrays have different lengths.
    #[error("initial conditions arrays must all have the same length")]
    InitMismatch,

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The worker pool could not be built.
    #[error("could not build the worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Result arrays could not be assembled.
    #[error("could not assemble result arrays: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
