//! Integration of a particle over a specific time interval.

use std::sync::atomic::Ordering;
use std::time::Instant;

use tormap_equilibrium::{Bfield, Currents, Perturbation, Qfactor};

use crate::config::StepperConfig;
use crate::{Evolution, IntegrationConfig, Particle, ParticleError, Result, State, Stepper};

/// Integrates the particle over the time interval `t_eval`, the final step
/// clamped onto the interval's end.
pub(crate) fn integrate(
    particle: &mut Particle,
    qfactor: &impl Qfactor,
    currents: &impl Currents,
    bfield: &impl Bfield,
    perturbation: &impl Perturbation,
    t_eval: (f64, f64),
    config: &IntegrationConfig,
) -> Result<()> {
    // ==================== Setup

    let start = Instant::now();
    let wall = bfield.psip_wall();
    particle.evolution = Evolution::with_capacity(config.store_capacity);
    particle
        .initial_state
        .evaluate(qfactor, currents, bfield, perturbation)?;
    particle.evolution.push_state(&particle.initial_state);

    let mut state1 = particle.initial_state.clone();
    let mut state2: State;
    let mut dt = config.first_step;
    let mut accepted: usize = 0;

    // ==================== Main loop

    let res = loop {
        if state1.time >= t_eval.1 {
            break Ok(());
        }
        if particle.evolution.steps_taken >= config.max_steps {
            break Ok(());
        }
        if config.stop_flag().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            break Err(ParticleError::Cancelled);
        }

        // Perform a step, clamping onto the end of the interval.
        let remaining = t_eval.1 - state1.time;
        let clamped = remaining < dt;
        let mut step = dt.min(remaining);
        let mut stepper = Stepper::new(&state1);
        state2 = match stepper.step_adaptive(
            &mut step,
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
        if !clamped {
            dt = step;
        }
        accepted += 1;

        // Store and continue.
        let stored = accepted % config.store_stride == 0;
        if stored {
            particle.evolution.push_state(&state2);
        }
        if state2.psip < 0.0 || state2.psip > wall {
            if !stored {
                particle.evolution.push_state(&state2);
            }
            state1 = state2;
            break Err(ParticleError::EscapedWall);
        }
        state1 = state2;
    };

    // ==================== Finalization

    particle.final_state = state1;
    particle.evolution.finish();
    particle.evolution.duration = start.elapsed();
    res
}
