//! Analytical stand-ins for the numerical equilibrium components.
//!
//! Useful for tests and for quick orbit studies where no reconstruction is
//! available. They satisfy the same evaluation traits as the numerical
//! components, ignoring the accelerators they are handed.

use tormap_interp::{Accelerator, CellCache};

use crate::{Bfield, Currents, Flux, Length, Qfactor, Radians, Result};

/// Constant q-factor, `q(ψp) = q0` and `ψ = q0·ψp`.
#[derive(Debug, Clone, Copy)]
pub struct ConstQfactor {
    /// The constant q value.
    pub q0: f64,
}

impl ConstQfactor {
    /// Creates a new [`ConstQfactor`].
    pub fn new(q0: f64) -> Self {
        Self { q0 }
    }
}

#[allow(unused_variables, reason = "analytical formulas need no accelerator")]
impl Qfactor for ConstQfactor {
    fn q(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.q0)
    }

    fn psi(&self, psip: Flux, acc: &mut Accelerator) -> Result<Flux> {
        Ok(self.q0 * psip)
    }

    fn dpsi_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.q0)
    }
}

// ===============================================================================================

/// Large Aspect Ratio approximation of the plasma currents, `g = 1`, `I = 0`.
#[derive(Debug, Clone, Copy)]
pub struct LarCurrents;

#[allow(unused_variables, reason = "analytical formulas need no accelerator")]
impl Currents for LarCurrents {
    /// Always returns `1.0`.
    fn g(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(1.0)
    }

    /// Always returns `0.0`.
    fn i(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(0.0)
    }

    /// Always returns `0.0`.
    fn dg_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(0.0)
    }

    /// Always returns `0.0`.
    fn di_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(0.0)
    }
}

// ===============================================================================================

/// Uniform magnetic field, `B(ψp, θ) = b0`.
#[derive(Debug, Clone, Copy)]
pub struct UniformBfield {
    /// The constant field strength.
    pub b0: f64,
    /// The poloidal flux at the wall.
    pub psip_wall: Flux,
}

impl UniformBfield {
    /// Creates a new [`UniformBfield`].
    pub fn new(b0: f64, psip_wall: Flux) -> Self {
        Self { b0, psip_wall }
    }
}

#[allow(unused_variables, reason = "analytical formulas need no accelerator")]
impl Bfield for UniformBfield {
    fn b(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<f64> {
        Ok(self.b0)
    }

    fn db_dpsip(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<f64> {
        Ok(0.0)
    }

    fn db_dtheta(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<f64> {
        Ok(0.0)
    }

    fn r(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<Length> {
        Ok(1.0)
    }

    fn z(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<Length> {
        Ok(0.0)
    }

    fn psip_wall(&self) -> Flux {
        self.psip_wall
    }
}

// ===============================================================================================

/// Large Aspect Ratio approximation of the magnetic field,
/// `B(ψ, θ) = 1 - √(2ψ)·cosθ`.
///
/// The LAR field is a function of the toroidal flux ψ, so it depends on the
/// q-factor profile: every evaluation converts ψp through the contained
/// [`Qfactor`].
#[derive(Debug, Clone)]
pub struct LarBfield<Q: Qfactor> {
    qfactor: Q,
    psip_wall: Flux,
}

impl<Q: Qfactor> LarBfield<Q> {
    /// Creates a new LAR magnetic field over the given q-factor profile.
    ///
    /// # Example
    /// ```
    /// # use tormap_equilibrium::*;
    /// let bfield = LarBfield::new(ConstQfactor::new(2.0), 0.1);
    /// ```
    pub fn new(qfactor: Q, psip_wall: Flux) -> Self {
        Self { qfactor, psip_wall }
    }

    /// Returns the contained [`Qfactor`] object.
    pub fn qfactor(&self) -> &Q {
        &self.qfactor
    }

    /// The minor radius coordinate `r = √(2ψ)`.
    fn minor_radius(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok((2.0 * self.qfactor.psi(psip, acc)?).sqrt())
    }
}

#[allow(unused_variables, reason = "only the ψp axis accelerator is used")]
impl<Q: Qfactor> Bfield for LarBfield<Q> {
    fn b(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<f64> {
        Ok(1.0 - self.minor_radius(psip, xacc)? * theta.cos())
    }

    fn db_dpsip(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<f64> {
        let radius = self.minor_radius(psip, xacc)?;
        let dpsi = self.qfactor.dpsi_dpsip(psip, xacc)?;
        Ok(-dpsi / radius * theta.cos())
    }

    fn db_dtheta(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<f64> {
        Ok(self.minor_radius(psip, xacc)? * theta.sin())
    }

    fn r(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<Length> {
        Ok(1.0 + self.minor_radius(psip, xacc)? * theta.cos())
    }

    fn z(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<Length> {
        Ok(self.minor_radius(psip, xacc)? * theta.sin())
    }

    fn psip_wall(&self) -> Flux {
        self.psip_wall
    }
}
