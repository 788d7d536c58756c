//! Representation of an equilibrium's q-factor.

use ndarray::Array1;
use tormap_common::array1d_getter_impl;
use tormap_interp::{Accelerator, Spline, make_spline};

use crate::{EquilibriumDataset, Flux, Qfactor, Result};

/// q-factor reconstructed from an [`EquilibriumDataset`].
///
/// Wraps splines over the `q(ψp)` and `ψ(ψp)` samples. The derivative
/// `dψ/dψp` comes from the ψ-spline, which lets the caller cross-check the
/// tabulated q values through [`q_data_derived`](Self::q_data_derived).
pub struct NumericQfactor {
    /// 1D interpolation type, in case-insensitive string format.
    typ: String,

    /// Spline over the `q` samples, as a function of ψp.
    q_spline: Spline,
    /// Spline over the `ψ` samples, as a function of ψp.
    psi_spline: Spline,
}

/// Creation
impl NumericQfactor {
    /// Constructs a [`NumericQfactor`] with splines of `typ` interpolation
    /// type.
    ///
    /// # Example
    /// ```
    /// # use tormap_equilibrium::*;
    /// # let dataset = synthetic::lar_dataset(32, 33, 0.1, 2.0);
    /// let qfactor = NumericQfactor::from_dataset(&dataset, "cubic")?;
    /// # Ok::<_, EqError>(())
    /// ```
    pub fn from_dataset(dataset: &EquilibriumDataset, typ: &str) -> Result<Self> {
        dataset.validate()?;

        let psip = dataset.psip_data.as_slice().expect("owned standard layout");
        let q_spline = make_spline(typ, psip, dataset.q_data.as_slice().expect("1D"))?;
        let psi_spline = make_spline(typ, psip, dataset.psi_data.as_slice().expect("1D"))?;

        Ok(Self {
            typ: typ.into(),
            q_spline,
            psi_spline,
        })
    }
}

/// Interpolation
impl Qfactor for NumericQfactor {
    fn q(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.q_spline.eval(psip, acc)?)
    }

    fn psi(&self, psip: Flux, acc: &mut Accelerator) -> Result<Flux> {
        Ok(self.psi_spline.eval(psip, acc)?)
    }

    fn dpsi_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.psi_spline.eval_deriv(psip, acc)?)
    }
}

/// Getters
impl NumericQfactor {
    /// Returns the interpolation type.
    pub fn typ(&self) -> String {
        self.typ.clone()
    }

    /// Returns the number of sample points.
    #[allow(clippy::len_without_is_empty, reason = "samples are never empty")]
    pub fn len(&self) -> usize {
        self.q_spline.len()
    }

    /// Returns `dψ/dψp` evaluated at every `psip_data` point.
    ///
    /// Ideally identical to `q_data`; the difference measures how well the
    /// tabulated q profile and the ψ samples agree.
    pub fn q_data_derived(&self) -> Array1<f64> {
        let mut acc = Accelerator::new();
        Array1::from_iter(self.q_spline.xa.iter().map(|psip| {
            self.psi_spline
                .eval_deriv(*psip, &mut acc)
                .expect("sample points are finite")
        }))
    }

    /// Returns the largest deviation between the tabulated q values and
    /// [`q_data_derived`](Self::q_data_derived).
    ///
    /// Reported for diagnostics, never enforced.
    pub fn q_data_deviation(&self) -> f64 {
        self.q_data_derived()
            .iter()
            .zip(self.q_spline.ya.iter())
            .map(|(derived, tabulated)| (derived - tabulated).abs())
            .fold(0.0, f64::max)
    }

    array1d_getter_impl!(psip_data, q_spline.xa);
    array1d_getter_impl!(q_data, q_spline.ya);
    array1d_getter_impl!(psi_data, psi_spline.ya);
}

impl std::fmt::Debug for NumericQfactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumericQfactor")
            .field("typ", &self.typ())
            .field("len", &self.len())
            .finish()
    }
}
