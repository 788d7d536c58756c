//! Time series of a particle's orbit.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::time::Duration;

use ndarray::Array1;
use tormap_common::array1d_getter_impl;

use crate::State;

/// The initial allocation of the time series buffers.
const EVOLUTION_INIT_CAPACITY: usize = 2000;

/// Time series of a particle's orbit.
///
/// In time-series mode every stored accepted step appends one row; in
/// mapping mode only the surface crossings do. The buffers are bounded by
/// the configured capacity: once full, the oldest rows are dropped, ring
/// style, so a long run keeps its most recent history.
#[derive(Clone)]
pub struct Evolution {
    time: VecDeque<f64>,
    /// The `θ` angle time series.
    theta: VecDeque<f64>,
    /// The poloidal flux `ψp` time series.
    psip: VecDeque<f64>,
    /// The parallel gyroradius `ρ‖` time series.
    rho: VecDeque<f64>,
    /// The `ζ` angle time series.
    zeta: VecDeque<f64>,
    /// The toroidal flux `ψ` time series.
    psi: VecDeque<f64>,
    /// The canonical momentum `Pθ` time series.
    ptheta: VecDeque<f64>,
    /// The canonical momentum `Pζ` time series.
    pzeta: VecDeque<f64>,
    /// The energy time series.
    energy: VecDeque<f64>,

    /// Upper bound on stored rows.
    capacity: usize,
    /// The wall-clock duration of the integration.
    pub duration: Duration,
    /// Attempted (accepted plus rejected) steps of the integration.
    pub(crate) steps_taken: usize,
    /// Relative standard deviation of the energy time series (σ/μ).
    pub energy_std: f64,
}

impl Evolution {
    /// Creates an [`Evolution`] holding at most `capacity` rows.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let initial = capacity.min(EVOLUTION_INIT_CAPACITY);
        Self {
            time: VecDeque::with_capacity(initial),
            theta: VecDeque::with_capacity(initial),
            psip: VecDeque::with_capacity(initial),
            rho: VecDeque::with_capacity(initial),
            zeta: VecDeque::with_capacity(initial),
            psi: VecDeque::with_capacity(initial),
            ptheta: VecDeque::with_capacity(initial),
            pzeta: VecDeque::with_capacity(initial),
            energy: VecDeque::with_capacity(initial),
            capacity,
            duration: Duration::default(),
            steps_taken: 0,
            energy_std: f64::NAN,
        }
    }

    /// Returns the attempted (accepted plus rejected) steps of the
    /// integration.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Returns the number of rows currently stored in the time series.
    pub fn steps_stored(&self) -> usize {
        self.time.len()
    }

    /// Returns the final stored time.
    pub fn final_time(&self) -> Option<f64> {
        self.time.back().copied()
    }

    /// Pushes the variables of a [`State`] to the time series, dropping
    /// the oldest row if the buffers are full.
    pub(crate) fn push_state(&mut self, state: &State) {
        if self.time.len() == self.capacity {
            let _ = self.time.pop_front();
            let _ = self.theta.pop_front();
            let _ = self.psip.pop_front();
            let _ = self.rho.pop_front();
            let _ = self.zeta.pop_front();
            let _ = self.psi.pop_front();
            let _ = self.ptheta.pop_front();
            let _ = self.pzeta.pop_front();
            let _ = self.energy.pop_front();
        }
        self.time.push_back(state.time);
        self.theta.push_back(state.theta);
        self.psip.push_back(state.psip);
        self.rho.push_back(state.rho);
        self.zeta.push_back(state.zeta);
        self.psi.push_back(state.psi);
        self.ptheta.push_back(state.ptheta);
        self.pzeta.push_back(state.pzeta);
        self.energy.push_back(state.energy());
    }

    /// Calculates `energy_std` once the integration is over.
    pub(crate) fn finish(&mut self) {
        let energy_array = self.energy();
        self.energy_std = energy_array.std(0.0) / energy_array.mean().unwrap_or(f64::NAN);
    }

    /// Resets all series to empty, keeping the counters.
    ///
    /// Use this to free memory when dealing with many particles.
    pub fn discard(&mut self) {
        self.time = VecDeque::default();
        self.theta = VecDeque::default();
        self.psip = VecDeque::default();
        self.rho = VecDeque::default();
        self.zeta = VecDeque::default();
        self.psi = VecDeque::default();
        self.ptheta = VecDeque::default();
        self.pzeta = VecDeque::default();
        self.energy = VecDeque::default();
    }

    array1d_getter_impl!(time, time);
    array1d_getter_impl!(theta, theta);
    array1d_getter_impl!(psip, psip);
    array1d_getter_impl!(rho, rho);
    array1d_getter_impl!(zeta, zeta);
    array1d_getter_impl!(psi, psi);
    array1d_getter_impl!(ptheta, ptheta);
    array1d_getter_impl!(pzeta, pzeta);
    array1d_getter_impl!(energy, energy);
}

impl Debug for Evolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evolution")
            .field(
                "time",
                &format!(
                    "[{:.5}, {:.5}]",
                    self.time.front().unwrap_or(&f64::NAN),
                    self.time.back().unwrap_or(&f64::NAN),
                ),
            )
            .field("duration", &self.duration)
            .field("energy_std", &format!("{:.5}", self.energy_std))
            .field("steps taken", &self.steps_taken())
            .field("steps stored", &self.steps_stored())
            .finish()
    }
}

impl Default for Evolution {
    fn default() -> Self {
        Self::with_capacity(usize::MAX)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn state_at(time: f64) -> State {
        State {
            time,
            ..State::default()
        }
    }

    #[test]
    fn test_ring_semantics_drop_oldest() {
        let mut evolution = Evolution::with_capacity(3);
        for step in 0..5 {
            evolution.push_state(&state_at(step as f64));
        }
        assert_eq!(evolution.steps_stored(), 3);
        assert_eq!(evolution.time().to_vec(), vec![2.0, 3.0, 4.0]);
        assert_eq!(evolution.final_time(), Some(4.0));
    }

    #[test]
    fn test_discard_keeps_counters() {
        let mut evolution = Evolution::default();
        evolution.push_state(&state_at(0.0));
        evolution.steps_taken = 12;
        evolution.discard();
        assert_eq!(evolution.steps_stored(), 0);
        assert_eq!(evolution.steps_taken(), 12);
    }
}
