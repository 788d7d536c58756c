//! Surface crossing detection and root-precise placement.

use std::f64::consts::TAU;

use tormap_equilibrium::{Bfield, Currents, Perturbation, Qfactor};

use crate::config::EventDirection;
use crate::routines::PoincareSection;
use crate::{Result, State, Stepper};

/// Checks whether the monitored angle crossed the surface at
/// `surface_angle` between two consecutive states, for any 2π image of
/// the surface.
///
/// The product of half-angle sines changes sign exactly when the two
/// angles straddle the surface. `<=` keeps crossings where one endpoint
/// sits on the surface so closely that the sine underflows to exactly 0.
pub(crate) fn intersected(old_angle: f64, new_angle: f64, surface_angle: f64) -> bool {
    let diff1 = new_angle - surface_angle;
    let diff2 = old_angle - surface_angle;
    (diff1 / 2.0).sin() * (diff2 / 2.0).sin() <= 0.0
}

/// Returns `true` if `angle` sits exactly on a 2π image of the surface.
pub(crate) fn on_section(angle: f64, surface_angle: f64) -> bool {
    ((angle - surface_angle) / 2.0).sin() == 0.0
}

/// Checks the crossing direction against the configured filter.
pub(crate) fn direction_allowed(direction: EventDirection, delta: f64) -> bool {
    match direction {
        EventDirection::Any => true,
        EventDirection::Ascending => delta > 0.0,
        EventDirection::Descending => delta < 0.0,
    }
}

/// The signed step in the monitored angle that brings `old_angle` onto the
/// nearest image of the surface in the direction of motion.
pub(crate) fn section_step(old_angle: f64, delta: f64, surface_angle: f64) -> f64 {
    let ascending_distance = (surface_angle - old_angle).rem_euclid(TAU);
    if delta >= 0.0 || ascending_distance == 0.0 {
        ascending_distance
    } else {
        ascending_distance - TAU
    }
}

/// Takes one reduced RKF4(5) step of size `dx` in the monitored angle,
/// starting from the (evaluated) pre-crossing state.
///
/// This is Hénon's trick: with the independent variable swapped to the
/// angle, a single step of exactly the remaining angular distance lands on
/// the surface to integrator order, without bisection. The returned state
/// is not evaluated.
pub(crate) fn event_step(
    state: &State,
    section: PoincareSection,
    dx: f64,
    qfactor: &impl Qfactor,
    currents: &impl Currents,
    bfield: &impl Bfield,
    perturbation: &impl Perturbation,
) -> Result<State> {
    let mut stepper = Stepper::new_section(state, section);
    stepper.start(dx, qfactor, currents, bfield, perturbation)?;
    Ok(stepper.next_state(dx))
}
