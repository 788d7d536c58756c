//! Representation of a particle.

use derive_is_enum_variant::is_enum_variant as IsEnumVariant;
use tormap_equilibrium::{Bfield, Currents, Flux, Length, MagneticMoment, Perturbation, Qfactor, Radians};

use crate::routines::{MappingParameters, integrate, map_integrate};
use crate::{ConfigError, Evolution, IntegrationConfig, MappingConfig, ParticleError, State};

/// A set of a particle's initial conditions.
#[derive(Clone, Debug)]
pub struct InitialConditions {
    /// The initial time.
    pub time0: f64,
    /// The initial `θ` angle.
    pub theta0: Radians,
    /// The initial poloidal magnetic flux `ψp`.
    pub psip0: Flux,
    /// The initial parallel gyroradius `ρ‖`.
    pub rho0: Length,
    /// The initial `ζ` angle.
    pub zeta0: Radians,
    /// The magnetic moment `μ`.
    pub mu: MagneticMoment,
}

/// The particle's terminal status.
#[derive(Debug, Clone, Default, PartialEq, Eq, IsEnumVariant)]
pub enum Status {
    /// Initialized from [`InitialConditions`], not yet integrated.
    #[default]
    Initialized,
    /// Reached the end of the integration or mapping.
    Completed,
    /// Left the `[0, ψp_wall]` flux interval.
    EscapedWall,
    /// The step controller hit the configured step floor.
    StepFloorReached,
    /// Non-finite values encountered during state evaluation.
    NonFinite,
    /// Stopped by the cooperative stop flag.
    Cancelled,
    /// The spacing between consecutive recorded intersections deviates
    /// from 2π beyond the configured threshold.
    InvalidIntersections,
}

/// Representation of a particle.
#[derive(Clone)]
pub struct Particle {
    /// The [`InitialConditions`] set of the particle.
    pub initial_conditions: InitialConditions,
    /// The initial [`State`] of the particle.
    pub(crate) initial_state: State,
    /// The final [`State`] of the particle.
    pub(crate) final_state: State,
    /// The time [`Evolution`] of the particle.
    pub evolution: Evolution,
    /// The terminal status of the last routine.
    pub status: Status,
}

impl Particle {
    /// Creates a new [`Particle`] from a set of [`InitialConditions`].
    ///
    /// # Example
    ///
    /// ```
    /// # use tormap_simulate::*;
    /// let initial_conditions = InitialConditions {
    ///     time0: 0.0,
    ///     theta0: 0.0,
    ///     psip0: 0.05,
    ///     rho0: 1e-4,
    ///     zeta0: 0.0,
    ///     mu: 0.0,
    /// };
    /// let particle = Particle::new(&initial_conditions);
    /// assert!(particle.status.is_initialized());
    /// ```
    pub fn new(initial_conditions: &InitialConditions) -> Self {
        let initial_state = State::from_initial(initial_conditions);
        Self {
            initial_conditions: initial_conditions.clone(),
            initial_state,
            final_state: State::default(),
            evolution: Evolution::default(),
            status: Status::default(),
        }
    }

    /// Integrates the particle over `t_eval`, storing the calculated orbit
    /// in [`Particle::evolution`].
    ///
    /// Configuration errors abort synchronously; everything else the
    /// routine runs into is recorded in [`Particle::status`].
    ///
    /// # Example
    ///
    /// ```
    /// # use tormap_simulate::*;
    /// # use tormap_equilibrium::*;
    /// # let dataset = synthetic::lar_dataset(32, 33, 0.1, 2.0);
    /// # let qfactor = NumericQfactor::from_dataset(&dataset, "steffen")?;
    /// # let currents = NumericCurrents::from_dataset(&dataset, "steffen")?;
    /// # let bfield = NumericBfield::from_dataset(&dataset, "bicubic")?;
    /// # let perturbation = NumericPerturbation::from_harmonics(vec![]);
    /// # let initial_conditions = InitialConditions {
    /// #     time0: 0.0,
    /// #     theta0: 0.0,
    /// #     psip0: 0.05,
    /// #     rho0: 1e-4,
    /// #     zeta0: 0.0,
    /// #     mu: 0.0,
    /// # };
    /// let mut particle = Particle::new(&initial_conditions);
    /// let config = IntegrationConfig::default();
    /// particle.integrate(&qfactor, &currents, &bfield, &perturbation, (0.0, 100.0), &config)?;
    /// assert!(particle.status.is_completed());
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn integrate(
        &mut self,
        qfactor: &impl Qfactor,
        currents: &impl Currents,
        bfield: &impl Bfield,
        perturbation: &impl Perturbation,
        t_eval: (f64, f64),
        config: &IntegrationConfig,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        self.integrate_unchecked(qfactor, currents, bfield, perturbation, t_eval, config);
        Ok(())
    }

    /// [`integrate`](Self::integrate) with the configuration already
    /// validated.
    pub(crate) fn integrate_unchecked(
        &mut self,
        qfactor: &impl Qfactor,
        currents: &impl Currents,
        bfield: &impl Bfield,
        perturbation: &impl Perturbation,
        t_eval: (f64, f64),
        config: &IntegrationConfig,
    ) {
        match integrate(self, qfactor, currents, bfield, perturbation, t_eval, config) {
            Ok(()) => self.status = Status::Completed,
            Err(error) => self.set_status_from_error(&error),
        }
    }

    /// Integrates the particle, storing only its intersections with the
    /// Poincaré surface defined by [`MappingParameters`].
    ///
    /// # Example
    ///
    /// ```
    /// # use tormap_simulate::*;
    /// # use tormap_equilibrium::*;
    /// # let dataset = synthetic::lar_dataset(32, 33, 0.1, 2.0);
    /// # let qfactor = NumericQfactor::from_dataset(&dataset, "steffen")?;
    /// # let currents = NumericCurrents::from_dataset(&dataset, "steffen")?;
    /// # let bfield = NumericBfield::from_dataset(&dataset, "bicubic")?;
    /// # let perturbation = NumericPerturbation::from_harmonics(vec![]);
    /// # let initial_conditions = InitialConditions {
    /// #     time0: 0.0,
    /// #     theta0: 0.0,
    /// #     psip0: 0.05,
    /// #     rho0: 1e-4,
    /// #     zeta0: 0.0,
    /// #     mu: 0.0,
    /// # };
    /// let mut particle = Particle::new(&initial_conditions);
    /// let params = MappingParameters::new(PoincareSection::ConstTheta, 0.0, 10);
    /// let config = MappingConfig::default();
    /// particle.map(&qfactor, &currents, &bfield, &perturbation, &params, &config)?;
    /// assert!(particle.status.is_completed());
    /// assert_eq!(particle.evolution.steps_stored(), 10);
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn map(
        &mut self,
        qfactor: &impl Qfactor,
        currents: &impl Currents,
        bfield: &impl Bfield,
        perturbation: &impl Perturbation,
        params: &MappingParameters,
        config: &MappingConfig,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        params.validate()?;
        self.map_unchecked(qfactor, currents, bfield, perturbation, params, config);
        Ok(())
    }

    /// [`map`](Self::map) with the configuration already validated.
    pub(crate) fn map_unchecked(
        &mut self,
        qfactor: &impl Qfactor,
        currents: &impl Currents,
        bfield: &impl Bfield,
        perturbation: &impl Perturbation,
        params: &MappingParameters,
        config: &MappingConfig,
    ) {
        match map_integrate(self, qfactor, currents, bfield, perturbation, params, config) {
            Ok(()) => self.status = Status::Completed,
            Err(error) => self.set_status_from_error(&error),
        }
    }

    /// Sets the particle's [`Status`] from an integration routine error.
    pub(crate) fn set_status_from_error(&mut self, error: &ParticleError) {
        self.status = match error {
            // The budget ran out; whatever was recorded until then stands.
            ParticleError::StepLimitReached => Status::Completed,
            ParticleError::EscapedWall => Status::EscapedWall,
            ParticleError::StepFloorReached => Status::StepFloorReached,
            ParticleError::NonFinite | ParticleError::Eq(..) => Status::NonFinite,
            ParticleError::Cancelled => Status::Cancelled,
            ParticleError::InvalidIntersections => Status::InvalidIntersections,
        }
    }
}

impl Particle {
    /// Returns the initial energy of the particle, calculated from its
    /// initial state.
    pub fn initial_energy(&self) -> f64 {
        self.initial_state.energy()
    }

    /// Returns the final energy of the particle, calculated from its final
    /// state.
    pub fn final_energy(&self) -> f64 {
        self.final_state.energy()
    }

    /// Returns the particle's final state.
    pub fn final_state(&self) -> &State {
        &self.final_state
    }
}

impl std::fmt::Debug for Particle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Particle")
            .field("ψp-acc", &self.final_state.xacc)
            .field("θ-acc", &self.final_state.yacc)
            .field("hcache", &self.final_state.hcaches.first())
            .field("initial energy", &self.initial_energy())
            .field("final energy  ", &self.final_energy())
            .field("status", &self.status)
            .field("evolution", &self.evolution)
            .finish()
    }
}
