//! Initial conditions of a batch of particles.

use ndarray::Array1;
use tormap_common::array1d_getter_impl;
use tormap_equilibrium::{Flux, Length, MagneticMoment, Radians};

use crate::{HeapError, InitialConditions, Particle};

/// The initial conditions arrays of a batch of particles, one particle per
/// index.
#[non_exhaustive]
#[derive(Clone)]
pub struct HeapInitialConditions {
    thetas: Array1<Radians>,
    psips: Array1<Flux>,
    rhos: Array1<Length>,
    zetas: Array1<Radians>,
    mus: Array1<MagneticMoment>,
}

/// Initial conditions and particle creation
impl HeapInitialConditions {
    /// Creates a new [`HeapInitialConditions`].
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::InitMismatch`] if the arrays are not all of the
    /// same length.
    ///
    /// # Example
    /// ```
    /// # use tormap_simulate::*;
    /// let initials = HeapInitialConditions::build(
    ///     &[0.0, 0.1, 0.2],
    ///     &[0.01, 0.02, 0.03],
    ///     &[1e-3, 2e-3, 3e-3],
    ///     &[0.0, 0.0, 0.0],
    ///     &[0.5, 0.5, 0.5],
    /// )?;
    /// assert_eq!(initials.len(), 3);
    /// # Ok::<_, HeapError>(())
    /// ```
    pub fn build(
        thetas: &[Radians],
        psips: &[Flux],
        rhos: &[Length],
        zetas: &[Radians],
        mus: &[MagneticMoment],
    ) -> Result<Self, HeapError> {
        let len = thetas.len();
        if !(psips.len() == len && rhos.len() == len && zetas.len() == len && mus.len() == len) {
            return Err(HeapError::InitMismatch);
        }

        Ok(Self {
            thetas: Array1::from_vec(thetas.to_vec()),
            psips: Array1::from_vec(psips.to_vec()),
            rhos: Array1::from_vec(rhos.to_vec()),
            zetas: Array1::from_vec(zetas.to_vec()),
            mus: Array1::from_vec(mus.to_vec()),
        })
    }

    /// Creates a vector with one [`Particle`] per initial condition set.
    pub(crate) fn to_particles(&self) -> Vec<Particle> {
        (0..self.len())
            .map(|index| Particle::new(&self.initial_from_index(index)))
            .collect()
    }

    /// Creates an [`InitialConditions`] set from position `index` of the
    /// arrays.
    pub(crate) fn initial_from_index(&self, index: usize) -> InitialConditions {
        InitialConditions {
            time0: 0.0,
            theta0: self.thetas[index],
            psip0: self.psips[index],
            rho0: self.rhos[index],
            zeta0: self.zetas[index],
            mu: self.mus[index],
        }
    }

    /// Returns the number of particles.
    pub fn len(&self) -> usize {
        self.thetas.len()
    }

    /// Returns `true` if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Getters
impl HeapInitialConditions {
    array1d_getter_impl!(thetas, thetas);
    array1d_getter_impl!(psips, psips);
    array1d_getter_impl!(rhos, rhos);
    array1d_getter_impl!(zetas, zetas);
    array1d_getter_impl!(mus, mus);
}

impl Default for HeapInitialConditions {
    fn default() -> Self {
        Self {
            thetas: Array1::zeros(0),
            psips: Array1::zeros(0),
            rhos: Array1::zeros(0),
            zetas: Array1::zeros(0),
            mus: Array1::zeros(0),
        }
    }
}

impl std::fmt::Debug for HeapInitialConditions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeapInitialConditions")
            .field("length", &self.len())
            .finish()
    }
}
