//! Representation of an equilibrium's plasma currents.

use ndarray::Array1;
use tormap_common::array1d_getter_impl;
use tormap_interp::{Accelerator, Spline, make_spline};

use crate::{Currents, EquilibriumDataset, Flux, Result};

/// Plasma currents reconstructed from an [`EquilibriumDataset`].
///
/// Wraps splines over the covariant current samples `g(ψp)` and `I(ψp)`.
pub struct NumericCurrents {
    /// 1D interpolation type, in case-insensitive string format.
    typ: String,

    /// Spline over the `g` samples, as a function of ψp.
    g_spline: Spline,
    /// Spline over the `I` samples, as a function of ψp.
    i_spline: Spline,
}

/// Creation
impl NumericCurrents {
    /// Constructs a [`NumericCurrents`] with splines of `typ` interpolation
    /// type.
    ///
    /// # Example
    /// ```
    /// # use tormap_equilibrium::*;
    /// # let dataset = synthetic::lar_dataset(32, 33, 0.1, 2.0);
    /// let currents = NumericCurrents::from_dataset(&dataset, "steffen")?;
    /// # Ok::<_, EqError>(())
    /// ```
    pub fn from_dataset(dataset: &EquilibriumDataset, typ: &str) -> Result<Self> {
        dataset.validate()?;

        let psip = dataset.psip_data.as_slice().expect("owned standard layout");
        let g_spline = make_spline(typ, psip, dataset.g_data.as_slice().expect("1D"))?;
        let i_spline = make_spline(typ, psip, dataset.i_data.as_slice().expect("1D"))?;

        Ok(Self {
            typ: typ.into(),
            g_spline,
            i_spline,
        })
    }
}

/// Interpolation
impl Currents for NumericCurrents {
    fn g(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.g_spline.eval(psip, acc)?)
    }

    fn i(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.i_spline.eval(psip, acc)?)
    }

    fn dg_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.g_spline.eval_deriv(psip, acc)?)
    }

    fn di_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.i_spline.eval_deriv(psip, acc)?)
    }
}

/// Getters
impl NumericCurrents {
    /// Returns the interpolation type.
    pub fn typ(&self) -> String {
        self.typ.clone()
    }

    /// Returns the number of sample points.
    #[allow(clippy::len_without_is_empty, reason = "samples are never empty")]
    pub fn len(&self) -> usize {
        self.g_spline.len()
    }

    array1d_getter_impl!(psip_data, g_spline.xa);
    array1d_getter_impl!(g_data, g_spline.ya);
    array1d_getter_impl!(i_data, i_spline.ya);
}

impl std::fmt::Debug for NumericCurrents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumericCurrents")
            .field("typ", &self.typ())
            .field("len", &self.len())
            .finish()
    }
}
