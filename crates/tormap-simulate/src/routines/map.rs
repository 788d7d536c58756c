//! Integration of a particle recording only its exact intersections with a
//! constant θ/ζ surface.

use std::f64::consts::TAU;
use std::sync::atomic::Ordering;
use std::time::Instant;

use tormap_equilibrium::{Bfield, Currents, Perturbation, Qfactor, Radians};

use crate::config::StepperConfig;
use crate::routines::henon::{direction_allowed, event_step, intersected, on_section, section_step};
use crate::{ConfigError, Evolution, MappingConfig, Particle, ParticleError, Result, State, Stepper};

/// Defines the surface of the Poincaré section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoincareSection {
    /// A surface of constant θ.
    ConstTheta,
    /// A surface of constant ζ.
    ConstZeta,
}

/// Defines all the necessary parameters of a Poincaré map.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct MappingParameters {
    /// The surface of section Σ, defined by xᵢ = α with xᵢ = θ or ζ.
    pub section: PoincareSection,
    /// The constant that defines the surface of section.
    pub alpha: Radians,
    /// The number of intersections to record.
    pub intersections: usize,
}

impl MappingParameters {
    /// Creates a new [`MappingParameters`].
    pub fn new(section: PoincareSection, alpha: Radians, intersections: usize) -> Self {
        // mod `alpha` once, instead of in every step
        Self {
            section,
            alpha: alpha.rem_euclid(TAU),
            intersections,
        }
    }

    /// Checks the parameters, aborting the job on nonsensical values.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.intersections == 0 {
            return Err(ConfigError::ZeroIntersections);
        }
        if !self.alpha.is_finite() {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        Ok(())
    }
}

/// Calculates the particle's intersections with the configured surface.
pub(crate) fn map_integrate(
    particle: &mut Particle,
    qfactor: &impl Qfactor,
    currents: &impl Currents,
    bfield: &impl Bfield,
    perturbation: &impl Perturbation,
    params: &MappingParameters,
    config: &MappingConfig,
) -> Result<()> {
    // ==================== Setup

    let start = Instant::now();
    let wall = bfield.psip_wall();
    // Bounded by construction; accepted steps never write here.
    particle.evolution = Evolution::with_capacity(params.intersections);
    particle
        .initial_state
        .evaluate(qfactor, currents, bfield, perturbation)?;

    let mut state1 = particle.initial_state.clone();
    let mut state2: State;
    let mut dt = config.first_step;
    // A seed placed exactly on the surface is not a return; its degenerate
    // bracket in the first step must not be recorded.
    let seed_on_section = on_section(monitored(&state1, params.section), params.alpha);
    let mut first_step = true;

    // ==================== Main loop

    let res = loop {
        if particle.evolution.steps_stored() >= params.intersections {
            break Ok(());
        }
        if particle.evolution.steps_taken >= config.max_steps {
            break Ok(());
        }
        if config.stop_flag().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            break Err(ParticleError::Cancelled);
        }

        // Perform a step on the normal system.
        let mut stepper = Stepper::new(&state1);
        state2 = match stepper.step_adaptive(
            &mut dt,
            qfactor,
            currents,
            bfield,
            perturbation,
            config,
            &mut particle.evolution.steps_taken,
        ) {
            Ok(state) => state,
            Err(ParticleError::StepLimitReached) => break Ok(()),
            Err(error) => break Err(error),
        };
        if state2.psip < 0.0 || state2.psip > wall {
            state1 = state2;
            break Err(ParticleError::EscapedWall);
        }

        // Hénon's trick. Whatever the monitored coordinate, one reduced
        // step of the remaining angular distance from state1 lands on the
        // surface. The main trajectory then continues from state2, not
        // from the crossing, so event placement never feeds back into it.
        let old_angle = monitored(&state1, params.section);
        let new_angle = monitored(&state2, params.section);
        let delta = new_angle - old_angle;
        if intersected(old_angle, new_angle, params.alpha)
            && direction_allowed(config.event_direction, delta)
            && !(first_step && seed_on_section)
        {
            let dx = section_step(old_angle, delta, params.alpha);
            let crossing = event_step(
                &state1,
                params.section,
                dx,
                qfactor,
                currents,
                bfield,
                perturbation,
            )?
            .into_evaluated(qfactor, currents, bfield, perturbation)?;
            particle.evolution.push_state(&crossing);
        }
        first_step = false;
        state1 = state2;
    };

    // ==================== Finalization

    let res = res.and_then(|()| check_mapping_accuracy(&particle.evolution, params, config));
    particle.final_state = state1;
    particle.evolution.finish();
    particle.evolution.duration = start.elapsed();
    res
}

/// The monitored coordinate of a state.
fn monitored(state: &State, section: PoincareSection) -> Radians {
    match section {
        PoincareSection::ConstTheta => state.theta,
        PoincareSection::ConstZeta => state.zeta,
    }
}

/// Checks that consecutive recorded intersections are not further apart
/// than one full turn of the monitored angle.
fn check_mapping_accuracy(
    evolution: &Evolution,
    params: &MappingParameters,
    config: &MappingConfig,
) -> Result<()> {
    let intersections = match params.section {
        PoincareSection::ConstTheta => evolution.theta(),
        PoincareSection::ConstZeta => evolution.zeta(),
    };
    spacing_within_threshold(intersections.as_slice().unwrap_or(&[]), config.map_threshold)
}

/// Extracted for testing.
fn spacing_within_threshold(intersections: &[f64], threshold: f64) -> Result<()> {
    match intersections
        .windows(2)
        .all(|pair| (pair[1] - pair[0]).abs() - TAU < threshold)
    {
        true => Ok(()),
        false => Err(ParticleError::InvalidIntersections),
    }
}
