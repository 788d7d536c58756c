//! A collection of particles, integrated in parallel.

use ndarray::{Array1, Array2};
use rayon::ThreadPoolBuilder;
use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};

use tormap_common::array2d_getter_impl;
use tormap_equilibrium::{Bfield, Currents, Flux, Perturbation, Qfactor, Radians};

use crate::progress::{IntegrationPbar, PoincarePbar};
use crate::{
    HeapError, HeapInitialConditions, HeapStats, IntegrationConfig, MappingConfig,
    MappingParameters, Particle, Status,
};

/// Describes the routine by which the heap's particles were integrated.
#[non_exhaustive]
#[derive(Default, Clone, Debug)]
pub enum Routine {
    /// Not yet integrated.
    #[default]
    None,
    /// Plain time-series integration.
    Integration,
    /// Poincaré mapping.
    Poincare(MappingParameters),
}

/// A collection of multiple [`Particle`]s, constructed from
/// [`HeapInitialConditions`].
///
/// The heap is the parallel driver: each routine distributes the particles
/// over a bounded worker pool. The equilibrium components are shared
/// read-only; every particle owns its integration scratch and output
/// buffers, so workers write into their own pre-allocated slot and never
/// synchronise after dispatch.
#[derive(Default)]
pub struct Heap {
    /// Initial conditions arrays.
    pub initials: HeapInitialConditions,
    /// Tracked [`Particle`]s, one per initial condition set.
    pub particles: Vec<Particle>,
    /// Describes the routine by which the particles were integrated.
    pub routine: Routine,
    /// Aggregate statistics of the last routine.
    pub stats: HeapStats,
    /// The recorded θ angles, one row per particle.
    thetas: Array2<Radians>,
    /// The recorded ζ angles, one row per particle.
    zetas: Array2<Radians>,
    /// The recorded poloidal fluxes ψp, one row per particle.
    psips: Array2<Flux>,
    /// The recorded toroidal fluxes ψ, one row per particle.
    psis: Array2<Flux>,
}

impl Heap {
    /// Creates a [`Heap`], initializing one particle per set of initial
    /// conditions.
    pub fn new(initials: &HeapInitialConditions) -> Self {
        Self {
            initials: initials.clone(),
            particles: initials.to_particles(),
            stats: HeapStats::new(initials),
            ..Self::default()
        }
    }

    /// Calculates every particle's intersections with the configured
    /// surface of section.
    ///
    /// Particles that terminate early keep their partial record and
    /// status; they never abort the batch.
    pub fn poincare(
        &mut self,
        qfactor: &(impl Qfactor + Sync),
        currents: &(impl Currents + Sync),
        bfield: &(impl Bfield + Sync),
        perturbation: &(impl Perturbation + Sync),
        params: &MappingParameters,
        config: &MappingConfig,
    ) -> Result<(), HeapError> {
        config.validate()?;
        params.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_count)
            .build()?;

        let pbar = PoincarePbar::new(self, params, pool.current_num_threads());
        pbar.print_prelude();
        pool.install(|| {
            self.particles.par_iter_mut().for_each(|particle| {
                particle.map_unchecked(qfactor, currents, bfield, perturbation, params, config);
                pbar.inc(&particle.status);
                pbar.print_stats();
            });
        });
        pbar.finish();

        self.routine = Routine::Poincare(*params);
        self.stats = HeapStats::from_heap(self);
        self.store_arrays(params)?;
        Ok(())
    }

    /// Integrates every particle over the time interval `t_eval`, storing
    /// the orbits in the particles' evolutions.
    pub fn integrate(
        &mut self,
        qfactor: &(impl Qfactor + Sync),
        currents: &(impl Currents + Sync),
        bfield: &(impl Bfield + Sync),
        perturbation: &(impl Perturbation + Sync),
        t_eval: (f64, f64),
        config: &IntegrationConfig,
    ) -> Result<(), HeapError> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_count)
            .build()?;

        let pbar = IntegrationPbar::new(self, pool.current_num_threads());
        pool.install(|| {
            self.particles.par_iter_mut().for_each(|particle| {
                particle.integrate_unchecked(
                    qfactor,
                    currents,
                    bfield,
                    perturbation,
                    t_eval,
                    config,
                );
                pbar.inc();
            });
        });
        pbar.finish();

        self.routine = Routine::Integration;
        self.stats = HeapStats::from_heap(self);
        Ok(())
    }

    /// Returns the per-index terminal statuses.
    pub fn statuses(&self) -> Vec<Status> {
        self.particles
            .iter()
            .map(|particle| particle.status.clone())
            .collect()
    }

    /// Returns the number of particles.
    pub fn len(&self) -> usize {
        self.initials.len()
    }

    /// Returns `true` if the heap holds no particles.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Data extraction
impl Heap {
    array2d_getter_impl!(thetas, thetas);
    array2d_getter_impl!(zetas, zetas);
    array2d_getter_impl!(psips, psips);
    array2d_getter_impl!(psis, psis);

    /// Stacks the particles' mapping series into 2D arrays, one row per
    /// particle, aligned with the initial conditions.
    ///
    /// Rows of particles that terminated early are padded with NaN, so
    /// they can still be plotted without disturbing the indexing.
    fn store_arrays(&mut self, params: &MappingParameters) -> Result<(), HeapError> {
        let columns = params.intersections;
        let shape = (0, columns);
        self.thetas = Array2::from_elem(shape, Radians::NAN);
        self.zetas = Array2::from_elem(shape, Radians::NAN);
        self.psips = Array2::from_elem(shape, Flux::NAN);
        self.psis = Array2::from_elem(shape, Flux::NAN);

        /// Copies one evolution series into a NaN-padded row of `columns`
        /// entries and pushes it onto the result array.
        macro_rules! pad_and_push_row {
            ($particle:ident, $results_array:ident, $source:ident) => {
                let series = $particle.evolution.$source();
                debug_assert!(series.len() <= columns);
                self.$results_array.push_row(
                    Array1::from_shape_fn(columns, |index| {
                        series.get(index).copied().unwrap_or(f64::NAN)
                    })
                    .view(),
                )?;
            };
        }

        for particle in &self.particles {
            pad_and_push_row!(particle, thetas, theta);
            pad_and_push_row!(particle, zetas, zeta);
            pad_and_push_row!(particle, psips, psip);
            pad_and_push_row!(particle, psis, psi);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Heap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.stats.fmt(f)
    }
}
