//! Integration and mapping configuration.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::ConfigError;
#[allow(unused_imports, reason = "doc links")]
use crate::Particle;

/// The method used to calculate the next optimal step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SteppingMethod {
    /// Classic embedded RK error estimation: adjust the step size so the
    /// local truncation error stays within `error_abs_tol`/`error_rel_tol`.
    #[default]
    ErrorAdaptiveStep,
    /// Force the step size to be small enough that the energy difference
    /// between consecutive steps stays under `energy_tol`.
    EnergyAdaptiveStep,
}

/// Direction filter for surface crossings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventDirection {
    /// Record crossings in both directions.
    #[default]
    Any,
    /// Record only crossings with the monitored angle increasing.
    Ascending,
    /// Record only crossings with the monitored angle decreasing.
    Descending,
}

// ===============================================================================================

/// Ensures that all routines' configurations have the fields required by the
/// Stepper.
pub(crate) trait StepperConfig {
    fn method(&self) -> SteppingMethod;
    fn max_steps(&self) -> usize;
    fn first_step(&self) -> f64;
    fn min_step(&self) -> f64;
    fn max_step(&self) -> f64;
    fn safety_factor(&self) -> f64;
    fn error_rel_tol(&self) -> f64;
    fn error_abs_tol(&self) -> f64;
    fn energy_tol(&self) -> f64;
    fn stop_flag(&self) -> Option<&AtomicBool>;

    /// Checks the stepper-related fields.
    fn validate_stepper(&self) -> Result<(), ConfigError> {
        if self.error_abs_tol() <= 0.0 || self.error_rel_tol() <= 0.0 {
            return Err(ConfigError::InvalidTolerance {
                atol: self.error_abs_tol(),
                rtol: self.error_rel_tol(),
            });
        }
        if self.energy_tol() <= 0.0 {
            return Err(ConfigError::InvalidEnergyTolerance(self.energy_tol()));
        }
        if !(0.0..1.0).contains(&self.safety_factor()) || self.safety_factor() == 0.0 {
            return Err(ConfigError::InvalidSafetyFactor(self.safety_factor()));
        }
        let (min, first, max) = (self.min_step(), self.first_step(), self.max_step());
        if !(min > 0.0 && min <= first && first <= max) {
            return Err(ConfigError::InvalidStepBounds { min, first, max });
        }
        if self.max_steps() == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        Ok(())
    }
}

#[rustfmt::skip]
macro_rules! stepper_config_impl {
    ($object:ident) => {
        impl StepperConfig for $object {
            #[inline(always)]
            fn method(&self) -> SteppingMethod { self.method }
            #[inline(always)]
            fn max_steps(&self) -> usize { self.max_steps }
            #[inline(always)]
            fn first_step(&self) -> f64 { self.first_step }
            #[inline(always)]
            fn min_step(&self) -> f64 { self.min_step }
            #[inline(always)]
            fn max_step(&self) -> f64 { self.max_step }
            #[inline(always)]
            fn safety_factor(&self) -> f64 { self.safety_factor }
            #[inline(always)]
            fn error_rel_tol(&self) -> f64 { self.error_rel_tol }
            #[inline(always)]
            fn error_abs_tol(&self) -> f64 { self.error_abs_tol }
            #[inline(always)]
            fn energy_tol(&self) -> f64 { self.energy_tol }
            #[inline(always)]
            fn stop_flag(&self) -> Option<&AtomicBool> { self.stop_flag.as_deref() }
        }
    };
}

stepper_config_impl!(IntegrationConfig);
stepper_config_impl!(MappingConfig);

// ===============================================================================================

/// Defines the parameters of the [`Particle::integrate`] routine.
///
/// See [`IntegrationConfig::default`] for the default values.
#[derive(Debug, Clone)]
pub struct IntegrationConfig {
    /// The optimal step calculation method.
    pub method: SteppingMethod,
    /// Hard ceiling on accepted plus rejected steps.
    pub max_steps: usize,
    /// The initial time step of the RKF4(5) stepper. The value is
    /// empirical.
    pub first_step: f64,
    /// The smallest step the controller may propose before the integration
    /// aborts.
    pub min_step: f64,
    /// The largest step the controller may propose.
    pub max_step: f64,
    /// The safety factor of the step controllers. Must be in `(0, 1)`.
    pub safety_factor: f64,
    /// The relative tolerance of the local truncation error in every step.
    pub error_rel_tol: f64,
    /// The absolute tolerance of the local truncation error in every step.
    pub error_abs_tol: f64,
    /// The allowed relative energy drift per step of the energy controller.
    pub energy_tol: f64,
    /// Store every `store_stride`-th accepted step in the evolution.
    pub store_stride: usize,
    /// Upper bound on stored evolution rows; the oldest rows are dropped
    /// once it is reached.
    pub store_capacity: usize,
    /// Worker count of batch runs; `0` uses all available cores.
    pub worker_count: usize,
    /// Cooperative stop flag, polled once per accepted step.
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            method: SteppingMethod::default(),
            max_steps: 1_000_000,
            first_step: 1e-1,
            min_step: 1e-10,
            max_step: 1e3,
            safety_factor: 0.9,
            error_rel_tol: 1e-12,
            error_abs_tol: 1e-14,
            energy_tol: 1e-10,
            store_stride: 1,
            store_capacity: usize::MAX,
            worker_count: 0,
            stop_flag: None,
        }
    }
}

impl IntegrationConfig {
    /// Checks the configuration, aborting the job on nonsensical values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_stepper()?;
        if self.store_stride == 0 {
            return Err(ConfigError::ZeroStride);
        }
        Ok(())
    }
}

// ===============================================================================================

/// Defines the parameters of the [`Particle::map`] routine.
///
/// See [`MappingConfig::default`] for the default values.
#[derive(Debug, Clone)]
pub struct MappingConfig {
    /// The optimal step calculation method.
    pub method: SteppingMethod,
    /// Hard ceiling on accepted plus rejected steps.
    pub max_steps: usize,
    /// The initial time step of the RKF4(5) stepper. The value is
    /// empirical.
    pub first_step: f64,
    /// The smallest step the controller may propose before the integration
    /// aborts.
    pub min_step: f64,
    /// The largest step the controller may propose.
    pub max_step: f64,
    /// The safety factor of the step controllers. Must be in `(0, 1)`.
    pub safety_factor: f64,
    /// The relative tolerance of the local truncation error in every step.
    pub error_rel_tol: f64,
    /// The absolute tolerance of the local truncation error in every step.
    pub error_abs_tol: f64,
    /// The allowed relative energy drift per step of the energy controller.
    pub energy_tol: f64,
    /// Direction filter for recorded crossings.
    pub event_direction: EventDirection,
    /// The maximum allowed deviation of the spacing of two consecutive
    /// same-direction intersections from 2π.
    pub map_threshold: f64,
    /// Worker count of batch runs; `0` uses all available cores.
    pub worker_count: usize,
    /// Cooperative stop flag, polled once per accepted step.
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            method: SteppingMethod::default(),
            max_steps: 1_000_000,
            first_step: 1e-1,
            min_step: 1e-10,
            max_step: 1e3,
            safety_factor: 0.9,
            error_rel_tol: 1e-12,
            error_abs_tol: 1e-14,
            energy_tol: 1e-10,
            event_direction: EventDirection::default(),
            map_threshold: 1e-9,
            worker_count: 0,
            stop_flag: None,
        }
    }
}

impl MappingConfig {
    /// Checks the configuration, aborting the job on nonsensical values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_stepper()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        IntegrationConfig::default().validate().unwrap();
        MappingConfig::default().validate().unwrap();
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let config = IntegrationConfig {
            error_abs_tol: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTolerance { .. })
        ));

        let config = IntegrationConfig {
            safety_factor: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSafetyFactor(..))
        ));

        let config = IntegrationConfig {
            min_step: 1.0,
            first_step: 0.1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStepBounds { .. })
        ));

        let config = IntegrationConfig {
            store_stride: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroStride)));

        let config = MappingConfig {
            max_steps: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroMaxSteps)));
    }
}
