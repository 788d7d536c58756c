//! The embedded Runge-Kutta-Fehlberg 4(5) stepper.
//!
//! The stepper advances the 5-vector `(t, θ, ψp, ρ‖, ζ)` with a selectable
//! independent variable. In normal operation the independent variable is
//! the time; for the event layer it is swapped to the monitored angle by
//! dividing the whole right-hand side by that angle's rate (Hénon's
//! trick), so one reduced step lands exactly on a surface of section.

use tormap_equilibrium::{Bfield, Currents, Perturbation, Qfactor};

use crate::config::{SteppingMethod, StepperConfig};
use crate::routines::PoincareSection;
use crate::state::State;
use crate::{ParticleError, Result};

/// Number of stages of the embedded pair.
const STAGES: usize = 6;

/// Nodes of the Fehlberg tableau.
const C: [f64; STAGES] = [0.0, 0.25, 0.375, 12.0 / 13.0, 1.0, 0.5];

/// Stage weights of the Fehlberg tableau.
const A: [[f64; STAGES - 1]; STAGES] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [0.25, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 32.0, 9.0 / 32.0, 0.0, 0.0, 0.0],
    [1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0, 0.0, 0.0],
    [439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0, 0.0],
    [-8.0 / 27.0, 2.0, -3544.0 / 2565.0, 1859.0 / 4104.0, -11.0 / 40.0],
];

/// 5th order solution weights.
const B5: [f64; STAGES] = [
    16.0 / 135.0,
    0.0,
    6656.0 / 12825.0,
    28561.0 / 56430.0,
    -9.0 / 50.0,
    2.0 / 55.0,
];

/// Per-stage weights of the embedded error estimate (5th minus 4th order).
const ERR: [f64; STAGES] = [
    1.0 / 360.0,
    0.0,
    -128.0 / 4275.0,
    -2197.0 / 75240.0,
    1.0 / 50.0,
    2.0 / 55.0,
];

/// Smallest factor a single rejection may shrink the step by.
const SHRINK_MIN: f64 = 0.1;
/// Largest factor a single acceptance may grow the step by.
const GROW_MAX: f64 = 5.0;

/// The independent variable of the integrated system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Independent {
    /// The normal system, advancing in time.
    Time,
    /// Reduced system with θ as the independent variable.
    Theta,
    /// Reduced system with ζ as the independent variable.
    Zeta,
}

impl Independent {
    /// Position of the independent variable in the state 5-vector
    /// `[t, θ, ψp, ρ‖, ζ]`.
    fn index(self) -> usize {
        match self {
            Self::Time => 0,
            Self::Theta => 1,
            Self::Zeta => 4,
        }
    }
}

/// One RKF4(5) step from a fixed start state.
pub(crate) struct Stepper {
    mode: Independent,
    /// The start 5-vector `[t, θ, ψp, ρ‖, ζ]`.
    y0: [f64; 5],
    /// The start state's derivatives, transformed to the integrated system.
    k1: [f64; 5],
    /// The start state's energy, for the energy controller.
    base_energy: f64,
    /// Stage derivatives.
    stages: [[f64; 5]; STAGES],
    /// Working state, carrying the particle's accelerators and caches.
    scratch: State,
}

impl Stepper {
    /// Creates a [`Stepper`] from an *evaluated* state, integrating in
    /// time.
    pub(crate) fn new(state: &State) -> Self {
        Self::with_mode(state, Independent::Time)
    }

    /// Creates a [`Stepper`] from an *evaluated* state, integrating in the
    /// section's monitored angle.
    pub(crate) fn new_section(state: &State, section: PoincareSection) -> Self {
        let mode = match section {
            PoincareSection::ConstTheta => Independent::Theta,
            PoincareSection::ConstZeta => Independent::Zeta,
        };
        Self::with_mode(state, mode)
    }

    fn with_mode(state: &State, mode: Independent) -> Self {
        Self {
            mode,
            y0: pack(state),
            k1: transform(mode, derivatives(state)),
            base_energy: state.energy(),
            stages: [[0.0; 5]; STAGES],
            scratch: state.clone(),
        }
    }

    /// Computes the six stage derivative vectors for step size `h`.
    pub(crate) fn start(
        &mut self,
        h: f64,
        qfactor: &impl Qfactor,
        currents: &impl Currents,
        bfield: &impl Bfield,
        perturbation: &impl Perturbation,
    ) -> Result<()> {
        self.stages[0] = self.k1;
        for stage in 1..STAGES {
            let mut y = self.y0;
            for (weights, k) in A[stage].iter().zip(self.stages.iter()) {
                for (component, slope) in y.iter_mut().zip(k.iter()) {
                    *component += h * weights * slope;
                }
            }
            // The independent component advances trivially; keep it exact.
            y[self.mode.index()] = self.y0[self.mode.index()] + C[stage] * h;

            unpack(&mut self.scratch, &y);
            self.scratch
                .evaluate(qfactor, currents, bfield, perturbation)?;
            self.stages[stage] = transform(self.mode, derivatives(&self.scratch));
        }
        Ok(())
    }

    /// The 5th order solution 5-vector at step size `h`.
    fn next_y(&self, h: f64) -> [f64; 5] {
        let mut y = self.y0;
        for (weights, k) in B5.iter().zip(self.stages.iter()) {
            for (component, slope) in y.iter_mut().zip(k.iter()) {
                *component += h * weights * slope;
            }
        }
        y[self.mode.index()] = self.y0[self.mode.index()] + h;
        y
    }

    /// Builds the 5th order state at step size `h` from the stage
    /// derivatives.
    pub(crate) fn next_state(&self, h: f64) -> State {
        let mut state = self.scratch.clone();
        unpack(&mut state, &self.next_y(h));
        state
    }

    /// The embedded per-component error estimate at step size `h`.
    fn error_estimate(&self, h: f64) -> [f64; 5] {
        let mut error = [0.0; 5];
        for (weights, k) in ERR.iter().zip(self.stages.iter()) {
            for (component, slope) in error.iter_mut().zip(k.iter()) {
                *component += weights * slope;
            }
        }
        error.map(|component| (h * component).abs())
    }

    /// The normalised local truncation error η; the step is acceptable iff
    /// `η ≤ 1`.
    fn normalised_error(&self, h: f64, config: &impl StepperConfig) -> f64 {
        let y5 = self.next_y(h);
        self.error_estimate(h)
            .iter()
            .enumerate()
            .map(|(index, error)| {
                let scale = config.error_abs_tol()
                    + config.error_rel_tol() * y5[index].abs().max(self.y0[index].abs());
                error / scale
            })
            .fold(0.0, f64::max)
    }

    /// Performs one accepted step, shrinking `h` until the configured
    /// controller accepts. On return `h` holds the proposed next step.
    ///
    /// `steps` counts every attempt, accepted and rejected, against the
    /// configured budget.
    pub(crate) fn step_adaptive(
        &mut self,
        h: &mut f64,
        qfactor: &impl Qfactor,
        currents: &impl Currents,
        bfield: &impl Bfield,
        perturbation: &impl Perturbation,
        config: &impl StepperConfig,
        steps: &mut usize,
    ) -> Result<State> {
        loop {
            if *steps >= config.max_steps() {
                return Err(ParticleError::StepLimitReached);
            }
            *steps += 1;

            self.start(*h, qfactor, currents, bfield, perturbation)?;

            let (accepted, factor) = match config.method() {
                SteppingMethod::ErrorAdaptiveStep => {
                    let eta = self.normalised_error(*h, config);
                    if !eta.is_finite() && eta != f64::INFINITY {
                        return Err(ParticleError::NonFinite);
                    }
                    (eta <= 1.0, config.safety_factor() * eta.powf(-0.2))
                }
                SteppingMethod::EnergyAdaptiveStep => {
                    let trial = self.next_state(*h);
                    let energy = trial
                        .into_evaluated(qfactor, currents, bfield, perturbation)?
                        .energy();
                    let drift = (energy - self.base_energy).abs();
                    let allowed = config.energy_tol() * 1.0_f64.max(self.base_energy.abs());
                    // Aim the next step at half the allowed drift.
                    let factor = config.safety_factor() * (0.5 * allowed / drift).powf(0.2);
                    (drift <= allowed, factor)
                }
            };

            if accepted {
                let state = self
                    .next_state(*h)
                    .into_evaluated(qfactor, currents, bfield, perturbation)?;
                *h = (*h * factor.clamp(SHRINK_MIN, GROW_MAX)).min(config.max_step());
                return Ok(state);
            }

            *h *= factor.max(SHRINK_MIN);
            if *h < config.min_step() {
                return Err(ParticleError::StepFloorReached);
            }
        }
    }
}

/// The state's coordinates as the 5-vector `[t, θ, ψp, ρ‖, ζ]`.
fn pack(state: &State) -> [f64; 5] {
    [state.time, state.theta, state.psip, state.rho, state.zeta]
}

/// Writes the 5-vector back into the state's coordinates.
fn unpack(state: &mut State, y: &[f64; 5]) {
    state.time = y[0];
    state.theta = y[1];
    state.psip = y[2];
    state.rho = y[3];
    state.zeta = y[4];
}

/// The state's physical derivatives, with `dt/dt = 1`.
fn derivatives(state: &State) -> [f64; 5] {
    [
        1.0,
        state.theta_dot,
        state.psip_dot,
        state.rho_dot,
        state.zeta_dot,
    ]
}

/// Divides the derivative vector by the independent variable's rate, which
/// turns it into the reduced system of Hénon's trick. A no-op for the
/// normal system.
fn transform(mode: Independent, mut derivs: [f64; 5]) -> [f64; 5] {
    let index = mode.index();
    if index != 0 {
        let rate = derivs[index];
        for component in &mut derivs {
            *component /= rate;
        }
        derivs[index] = 1.0;
    }
    derivs
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tableau_consistency() {
        // Each row of stage weights sums to its node.
        for stage in 1..STAGES {
            let row: f64 = A[stage].iter().sum();
            assert_relative_eq!(row, C[stage], epsilon = 1e-14);
        }
        let b5: f64 = B5.iter().sum();
        assert_relative_eq!(b5, 1.0, epsilon = 1e-15);
        // The error weights are the difference of two order conditions.
        let err: f64 = ERR.iter().sum();
        assert_relative_eq!(err, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_transform_divides_by_rate() {
        let derivs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let reduced = transform(Independent::Theta, derivs);
        assert_relative_eq!(reduced[0], 0.5);
        assert_relative_eq!(reduced[1], 1.0);
        assert_relative_eq!(reduced[2], 1.5);
        assert_relative_eq!(reduced[4], 2.5);

        assert_eq!(transform(Independent::Time, derivs), derivs);
    }
}
