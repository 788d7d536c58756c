//! Aggregate statistics of a heap run.

use std::time::Duration;

use crate::heap::Routine;
use crate::{Heap, HeapInitialConditions, Particle};

/// Counts and timings aggregated over a heap's particles.
#[non_exhaustive]
#[derive(Default)]
pub struct HeapStats {
    routine: Routine,
    total_particles: usize,
    completed: usize,
    escaped: usize,
    step_floor: usize,
    non_finite: usize,
    cancelled: usize,
    invalid: usize,
    /// Duration of the slowest particle.
    slowest: RunDuration,
    /// Duration of the fastest particle.
    fastest: RunDuration,
}

impl HeapStats {
    /// Creates a new [`HeapStats`], only knowing the batch size.
    pub(crate) fn new(initials: &HeapInitialConditions) -> Self {
        Self {
            total_particles: initials.len(),
            ..Self::default()
        }
    }

    /// Aggregates a heap's particles after a routine.
    pub(crate) fn from_heap(heap: &Heap) -> Self {
        let mut stats = Self::new(&heap.initials);
        stats.routine = heap.routine.clone();
        stats.count_statuses(heap);
        stats.find_durations(heap);
        stats
    }

    /// Counts the occurrences of each status variant.
    fn count_statuses(&mut self, heap: &Heap) {
        macro_rules! count_variants {
            ($is_variant:ident) => {
                heap.particles
                    .iter()
                    .filter(|particle| particle.status.$is_variant())
                    .count()
            };
        }
        self.completed = count_variants!(is_completed);
        self.escaped = count_variants!(is_escaped_wall);
        self.step_floor = count_variants!(is_step_floor_reached);
        self.non_finite = count_variants!(is_non_finite);
        self.cancelled = count_variants!(is_cancelled);
        self.invalid = count_variants!(is_invalid_intersections);
        self.total_particles = heap.particles.len();
    }

    /// Finds the fastest and slowest integrations.
    fn find_durations(&mut self, heap: &Heap) {
        self.slowest = heap
            .particles
            .iter()
            .max_by_key(|particle| particle.evolution.duration)
            .map(RunDuration::from)
            .unwrap_or_default();
        self.fastest = heap
            .particles
            .iter()
            .filter(|particle| particle.evolution.steps_stored() > 0)
            .min_by_key(|particle| particle.evolution.duration)
            .map(RunDuration::from)
            .unwrap_or_default();
    }

    /// Returns the number of particles that completed their routine.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Returns the number of particles that escaped through the wall.
    pub fn escaped(&self) -> usize {
        self.escaped
    }

    /// Returns the number of cancelled particles.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl std::fmt::Debug for HeapStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeapStats")
            .field("routine", &self.routine)
            .field("total_particles", &self.total_particles)
            .field("completed", &self.completed)
            .field("escaped", &self.escaped)
            .field("step_floor", &self.step_floor)
            .field("non_finite", &self.non_finite)
            .field("cancelled", &self.cancelled)
            .field("invalid", &self.invalid)
            .field("slowest", &self.slowest)
            .field("fastest", &self.fastest)
            .finish()
    }
}

// ===============================================================================================

/// Helper struct to display the fastest and slowest particles.
#[derive(Default)]
struct RunDuration {
    steps: usize,
    duration: Duration,
}

impl From<&Particle> for RunDuration {
    fn from(particle: &Particle) -> Self {
        Self {
            steps: particle.evolution.steps_taken(),
            duration: particle.evolution.duration,
        }
    }
}

impl std::fmt::Debug for RunDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "duration: {:?} ({} steps)", self.duration, self.steps)
    }
}
