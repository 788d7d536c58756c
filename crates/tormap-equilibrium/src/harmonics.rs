//! Representation of a single perturbation harmonic.

use std::f64::consts::TAU;

use ndarray::Array1;
use tormap_common::array1d_getter_impl;
use tormap_interp::{Accelerator, Spline, make_spline};

use crate::cache::HarmonicCache;
use crate::{EquilibriumDataset, Flux, Harmonic, Radians, Result};

/// Defines the calculation method of the phase `φ(ψp)` in a
/// [`NumericHarmonic`].
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseMethod {
    /// `φ = const`, the average of the phase samples, fixed at
    /// construction.
    #[default]
    Constant,
    /// `φ(ψp)` interpolated over the phase samples, with the explicit time
    /// dependence `+ ωt` from the harmonic's rotation frequency.
    Interpolated,
}

/// Single perturbation harmonic built from [`HarmonicData`] samples.
///
/// The harmonic has the form `α(ψp)·cos(mθ - nζ + φ + ωt)`, where `α(ψp)`
/// is interpolated over the amplitude samples and `φ` is calculated as
/// defined by the [`PhaseMethod`].
///
/// [`HarmonicData`]: crate::HarmonicData
pub struct NumericHarmonic {
    /// 1D interpolation type, in case-insensitive string format.
    typ: String,
    /// The calculation method of the phase `φ(ψp)`.
    phase_method: PhaseMethod,

    /// The `θ` mode number.
    m: i64,
    /// The `ζ` mode number.
    n: i64,
    /// Rotation frequency of the explicit time dependence.
    omega: f64,
    /// The average value of the phase samples.
    phase_average: Radians,

    // Mode numbers cast once, used in the actual calculations.
    m_f: f64,
    n_f: f64,

    /// Spline over the amplitude samples `α(ψp)`.
    a_spline: Spline,
    /// Spline over the phase samples `φ(ψp)`.
    ///
    /// Kept even in `Constant` mode, for plotting and data extraction.
    phase_spline: Spline,
}

/// Creation
impl NumericHarmonic {
    /// Constructs the `index`-th harmonic of the dataset, with splines of
    /// `typ` interpolation type.
    ///
    /// # Example
    /// ```
    /// # use tormap_equilibrium::*;
    /// # let mut dataset = synthetic::lar_dataset(32, 33, 0.1, 2.0);
    /// # dataset.harmonics.push(synthetic::harmonic_data(&dataset, 2, 1, 1e-4));
    /// let harmonic =
    ///     NumericHarmonic::from_dataset(&dataset, 0, "steffen", PhaseMethod::Constant)?;
    /// # Ok::<_, EqError>(())
    /// ```
    pub fn from_dataset(
        dataset: &EquilibriumDataset,
        index: usize,
        typ: &str,
        phase_method: PhaseMethod,
    ) -> Result<Self> {
        dataset.validate()?;
        let data = dataset
            .harmonics
            .get(index)
            .ok_or_else(|| crate::EqError::MalformedInput(format!("harmonics[{index}]")))?;

        let psip = dataset.psip_data.as_slice().expect("owned standard layout");
        let a_spline = make_spline(typ, psip, data.a_data.as_slice().expect("1D"))?;
        let phase_spline = make_spline(typ, psip, data.phase_data.as_slice().expect("1D"))?;
        let phase_average = data.phase_data.mean().expect("samples are non-empty");

        Ok(Self {
            typ: typ.into(),
            phase_method,
            m: data.m,
            n: data.n,
            omega: data.omega,
            phase_average,
            m_f: data.m as f64,
            n_f: data.n as f64,
            a_spline,
            phase_spline,
        })
    }
}

/// Terms shared between the cache and the evaluation methods.
impl NumericHarmonic {
    /// Calculates the phase derivative `dφ/dψp`, zero for a constant phase.
    pub(crate) fn dphase_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        match self.phase_method {
            PhaseMethod::Constant => Ok(0.0),
            PhaseMethod::Interpolated => Ok(self.phase_spline.eval_deriv(psip, acc)?),
        }
    }

    /// Calculates the angular argument `mθ - nζ + φ + ωt`, reduced mod 2π.
    pub(crate) fn mod_arg(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
    ) -> Result<Radians> {
        let phase = self.phase(psip, acc)?;
        Ok((self.m_f * theta - self.n_f * zeta + phase + self.omega * time).rem_euclid(TAU))
    }
}

/// Evaluation
impl Harmonic for NumericHarmonic {
    fn h(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        cache: &mut HarmonicCache,
    ) -> Result<f64> {
        if !cache.is_updated(psip, theta, zeta, time) {
            cache.update(self, psip, theta, zeta, time, acc)?;
        }
        Ok(cache.alpha * cache.cos)
    }

    fn dh_dpsip(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        cache: &mut HarmonicCache,
    ) -> Result<f64> {
        if !cache.is_updated(psip, theta, zeta, time) {
            cache.update(self, psip, theta, zeta, time, acc)?;
        }
        Ok(cache.da_dpsip * cache.cos - cache.alpha * cache.dphase_dpsip * cache.sin)
    }

    fn dh_dtheta(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        cache: &mut HarmonicCache,
    ) -> Result<f64> {
        if !cache.is_updated(psip, theta, zeta, time) {
            cache.update(self, psip, theta, zeta, time, acc)?;
        }
        Ok(cache.alpha * (-self.m_f) * cache.sin)
    }

    fn dh_dzeta(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        cache: &mut HarmonicCache,
    ) -> Result<f64> {
        if !cache.is_updated(psip, theta, zeta, time) {
            cache.update(self, psip, theta, zeta, time, acc)?;
        }
        Ok(cache.alpha * self.n_f * cache.sin)
    }

    fn dh_dt(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        time: f64,
        acc: &mut Accelerator,
        cache: &mut HarmonicCache,
    ) -> Result<f64> {
        if !cache.is_updated(psip, theta, zeta, time) {
            cache.update(self, psip, theta, zeta, time, acc)?;
        }
        Ok(cache.alpha * (-self.omega) * cache.sin)
    }

    fn a(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.a_spline.eval(psip, acc)?)
    }

    fn da_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.a_spline.eval_deriv(psip, acc)?)
    }

    fn phase(&self, psip: Flux, acc: &mut Accelerator) -> Result<Radians> {
        match self.phase_method {
            PhaseMethod::Constant => Ok(self.phase_average),
            PhaseMethod::Interpolated => Ok(self.phase_spline.eval(psip, acc)?),
        }
    }
}

/// Getters
impl NumericHarmonic {
    /// Returns the interpolation type.
    pub fn typ(&self) -> String {
        self.typ.clone()
    }

    /// Returns the phase calculation method.
    pub fn phase_method(&self) -> PhaseMethod {
        self.phase_method
    }

    /// Returns the poloidal mode number `m`.
    pub fn m(&self) -> i64 {
        self.m
    }

    /// Returns the toroidal mode number `n`.
    pub fn n(&self) -> i64 {
        self.n
    }

    /// Returns the rotation frequency `ω`.
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Returns the average of the phase samples.
    pub fn phase_average(&self) -> Radians {
        self.phase_average
    }

    /// Returns the number of sample points.
    #[allow(clippy::len_without_is_empty, reason = "samples are never empty")]
    pub fn len(&self) -> usize {
        self.a_spline.len()
    }

    array1d_getter_impl!(psip_data, a_spline.xa);
    array1d_getter_impl!(a_data, a_spline.ya);
    array1d_getter_impl!(phase_data, phase_spline.ya);
}

impl std::fmt::Debug for NumericHarmonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumericHarmonic")
            .field("typ", &self.typ())
            .field("m", &self.m())
            .field("n", &self.n())
            .field("phase_method", &self.phase_method)
            .field("phase_average", &format!("{:.7}", self.phase_average()))
            .finish()
    }
}
