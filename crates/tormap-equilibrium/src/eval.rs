//! Definitions of evaluation methods of equilibrium objects.
//!
//! For analytical equilibria these are evaluations of closed formulas; for
//! numerical equilibria, interpolations over the reconstruction arrays.
//! Every method takes the caller's accelerators/caches, so implementors
//! stay immutable and shareable across threads.

use tormap_interp::{Accelerator, CellCache};

use crate::HarmonicCache;
use crate::Result;
use crate::{Flux, Length, Radians};

/// q-factor related quantities computation.
pub trait Qfactor {
    /// Calculates the q-factor `q(ψp)`.
    fn q(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;

    /// Calculates the toroidal flux `ψ(ψp)`.
    fn psi(&self, psip: Flux, acc: &mut Accelerator) -> Result<Flux>;

    /// Calculates the derivative `dψ/dψp`.
    fn dpsi_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;
}

/// Plasma current related quantities computation.
pub trait Currents {
    /// Calculates `g(ψp)`.
    fn g(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;

    /// Calculates `I(ψp)`.
    fn i(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;

    /// Calculates `𝜕g(ψp)/𝜕ψp`.
    fn dg_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;

    /// Calculates `𝜕I(ψp)/𝜕ψp`.
    fn di_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;
}

/// Magnetic field related quantities computation.
pub trait Bfield {
    /// Calculates `B(ψp, θ)`.
    fn b(
        &self,
        psip: Flux,
        theta: Radians,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
        cache: &mut CellCache,
    ) -> Result<f64>;

    /// Calculates `𝜕B(ψp, θ)/𝜕ψp`.
    fn db_dpsip(
        &self,
        psip: Flux,
        theta: Radians,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
        cache: &mut CellCache,
    ) -> Result<f64>;

    /// Calculates `𝜕B(ψp, θ)/𝜕𝜃`.
    fn db_dtheta(
        &self,
        psip: Flux,
        theta: Radians,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
        cache: &mut CellCache,
    ) -> Result<f64>;

    /// Calculates the lab coordinate `R(ψp, θ)`, in \[m\].
    fn r(
        &self,
        psip: Flux,
        theta: Radians,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
        cache: &mut CellCache,
    ) -> Result<Length>;

    /// Calculates the lab coordinate `Z(ψp, θ)`, in \[m\].
    fn z(
        &self,
        psip: Flux,
        theta: Radians,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
        cache: &mut CellCache,
    ) -> Result<Length>;

    /// Returns the poloidal flux at the wall, which bounds the domain where
    /// orbits are followed.
    fn psip_wall(&self) -> Flux;
}

/// Single perturbation harmonic related quantities computation.
pub trait Harmonic {
    /// Calculates the harmonic `α(ψp)·cos(mθ - nζ + φ(ψp) + ωt)`.
    fn h(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        cache: &mut HarmonicCache,
    ) -> Result<f64>;

    /// Calculates the harmonic derivative `𝜕h/𝜕ψp`.
    fn dh_dpsip(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        cache: &mut HarmonicCache,
    ) -> Result<f64>;

    /// Calculates the harmonic derivative `𝜕h/𝜕θ`.
    fn dh_dtheta(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        cache: &mut HarmonicCache,
    ) -> Result<f64>;

    /// Calculates the harmonic derivative `𝜕h/𝜕ζ`.
    fn dh_dzeta(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        cache: &mut HarmonicCache,
    ) -> Result<f64>;

    /// Calculates the harmonic derivative `𝜕h/𝜕t`.
    fn dh_dt(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        cache: &mut HarmonicCache,
    ) -> Result<f64>;

    /// Calculates the harmonic's *amplitude* `α(ψp)`.
    fn a(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;

    /// Calculates the harmonic's *amplitude* derivative `dα(ψp)/dψp`.
    fn da_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;

    /// Calculates the harmonic's *phase* `φ(ψp)`.
    fn phase(&self, psip: Flux, acc: &mut Accelerator) -> Result<Radians>;
}

/// Total perturbation related quantities computation.
///
/// A perturbation is an ordered collection of harmonics; every aggregate
/// query is the sum of the harmonics' answers. `caches` must hold one
/// [`HarmonicCache`] per harmonic.
pub trait Perturbation {
    /// Calculates the perturbation `Σ αₘₙ(ψp)·cos(mθ - nζ + φ + ωt)`.
    fn p(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        caches: &mut [HarmonicCache],
    ) -> Result<f64>;

    /// Calculates the perturbation's derivative with respect to `ψp`.
    fn dp_dpsip(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        caches: &mut [HarmonicCache],
    ) -> Result<f64>;

    /// Calculates the perturbation's derivative with respect to `θ`.
    fn dp_dtheta(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        caches: &mut [HarmonicCache],
    ) -> Result<f64>;

    /// Calculates the perturbation's derivative with respect to `ζ`.
    fn dp_dzeta(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        caches: &mut [HarmonicCache],
    ) -> Result<f64>;

    /// Calculates the perturbation's derivative with respect to `t`.
    fn dp_dt(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        caches: &mut [HarmonicCache],
    ) -> Result<f64>;

    /// Returns the number of harmonics.
    fn len(&self) -> usize;

    /// Returns `true` if the perturbation has no harmonics.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
