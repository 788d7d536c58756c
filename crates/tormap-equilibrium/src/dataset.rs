//! The in-memory equilibrium dataset contract.
//!
//! Reading the reconstruction from disk is an external collaborator's
//! concern; whatever the source format, the loader hands over this struct
//! of plain arrays. [`EquilibriumDataset::validate`] is the single place
//! where the input contract is enforced, so the equilibrium components can
//! assume well-formed data.

use std::f64::consts::TAU;

use ndarray::{Array1, Array2};
use tormap_interp::InterpError;

use crate::{EqError, Flux, Length, Radians, Result};

/// Sample arrays of a single perturbation harmonic
/// `α(ψp)·cos(mθ - nζ + φ + ωt)`.
#[derive(Debug, Clone)]
pub struct HarmonicData {
    /// The poloidal mode number `m`.
    pub m: i64,
    /// The toroidal mode number `n`.
    pub n: i64,
    /// The amplitude samples `α(ψp)`, over the dataset's `psip_data`.
    pub a_data: Array1<f64>,
    /// The phase samples `φ(ψp)`, over the dataset's `psip_data`.
    pub phase_data: Array1<Radians>,
    /// Rotation frequency `ω` of the explicit time dependence `φ + ωt`.
    pub omega: f64,
}

/// A reconstructed equilibrium as already-loaded numeric arrays.
///
/// The 2D arrays are indexed `[ψp, θ]` and must match the two grid
/// lengths. All fields are public; the loader fills them and calls
/// [`validate`](Self::validate) (every component constructor re-validates
/// on its own, so a malformed dataset cannot slip through).
#[derive(Debug, Clone)]
pub struct EquilibriumDataset {
    /// The poloidal flux grid `ψp`, strictly increasing.
    pub psip_data: Array1<Flux>,
    /// The q-factor samples `q(ψp)`.
    pub q_data: Array1<f64>,
    /// The toroidal flux samples `ψ(ψp)`.
    pub psi_data: Array1<Flux>,
    /// The covariant toroidal current samples `g(ψp)`.
    pub g_data: Array1<f64>,
    /// The covariant poloidal current samples `I(ψp)`.
    pub i_data: Array1<f64>,

    /// The poloidal angle grid `θ`, strictly increasing over one period.
    pub theta_data: Array1<Radians>,
    /// The field strength samples `B(ψp, θ)`.
    pub b_data: Array2<f64>,
    /// The lab coordinate samples `R(ψp, θ)`.
    pub r_data: Array2<Length>,
    /// The lab coordinate samples `Z(ψp, θ)`.
    pub z_data: Array2<Length>,
    /// Tabulated `𝜕B/𝜕ψp` samples, if the source supplies them.
    pub db_dpsip_data: Option<Array2<f64>>,
    /// Tabulated `𝜕B/𝜕θ` samples, if the source supplies them.
    pub db_dtheta_data: Option<Array2<f64>>,

    /// The poloidal flux at the wall.
    pub psip_wall: Flux,
    /// The toroidal flux at the wall.
    pub psi_wall: Flux,
    /// Magnetic field strength on the axis, in \[T\].
    pub baxis: f64,
    /// Horizontal position of the magnetic axis, in \[m\].
    pub raxis: Length,

    /// The perturbation harmonics, possibly empty.
    pub harmonics: Vec<HarmonicData>,
}

impl EquilibriumDataset {
    /// Checks the whole dataset against the input contract.
    ///
    /// # Errors
    ///
    /// + [`EqError::MalformedInput`] on empty/non-finite arrays or scalars,
    /// + [`EqError::ShapeMismatch`] on length disagreements,
    /// + [`InterpError::NonMonotone`] on a non-increasing grid.
    pub fn validate(&self) -> Result<()> {
        let n = self.psip_data.len();
        let m = self.theta_data.len();
        if n == 0 {
            return Err(EqError::MalformedInput("psip_data".into()));
        }
        if m == 0 {
            return Err(EqError::MalformedInput("theta_data".into()));
        }

        for (name, array) in [
            ("psip_data", &self.psip_data),
            ("q_data", &self.q_data),
            ("psi_data", &self.psi_data),
            ("g_data", &self.g_data),
            ("i_data", &self.i_data),
        ] {
            check_1d(name, array, n)?;
        }
        check_1d("theta_data", &self.theta_data, m)?;

        for (name, array) in [
            ("b_data", Some(&self.b_data)),
            ("r_data", Some(&self.r_data)),
            ("z_data", Some(&self.z_data)),
            ("db_dpsip_data", self.db_dpsip_data.as_ref()),
            ("db_dtheta_data", self.db_dtheta_data.as_ref()),
        ] {
            if let Some(array) = array {
                check_2d(name, array, (n, m))?;
            }
        }

        for (name, value) in [
            ("psip_wall", self.psip_wall),
            ("psi_wall", self.psi_wall),
            ("baxis", self.baxis),
            ("raxis", self.raxis),
        ] {
            if !value.is_finite() {
                return Err(EqError::MalformedInput(name.into()));
            }
        }

        for grid in [&self.psip_data, &self.theta_data] {
            if !grid.as_slice().is_some_and(is_strictly_increasing) {
                return Err(InterpError::NonMonotone.into());
            }
        }

        // The θ grid must cover exactly one period, since the field is
        // evaluated at θ reduced modulo 2π.
        let span = self.theta_data[m - 1] - self.theta_data[0];
        if (span - TAU).abs() > 1e-6 {
            return Err(EqError::MalformedInput("theta_data".into()));
        }

        // ψ vanishes on the magnetic axis.
        if self.psi_data[0].abs() > 1e-8 * 1.0_f64.max(self.psi_wall.abs()) {
            return Err(EqError::MalformedInput("psi_data".into()));
        }

        for (index, harmonic) in self.harmonics.iter().enumerate() {
            check_1d(&format!("harmonics[{index}].a_data"), &harmonic.a_data, n)?;
            check_1d(
                &format!("harmonics[{index}].phase_data"),
                &harmonic.phase_data,
                n,
            )?;
            if !harmonic.omega.is_finite() {
                return Err(EqError::MalformedInput(format!(
                    "harmonics[{index}].omega"
                )));
            }
        }

        Ok(())
    }

    /// Returns the grid shape `(psip_data.len(), theta_data.len())`.
    pub fn shape(&self) -> (usize, usize) {
        (self.psip_data.len(), self.theta_data.len())
    }
}

fn is_strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] < pair[1])
}

fn check_1d(name: &str, array: &Array1<f64>, expected: usize) -> Result<()> {
    if array.len() != expected {
        return Err(EqError::ShapeMismatch {
            name: name.into(),
            expected: vec![expected],
            got: vec![array.len()],
        });
    }
    if !array.iter().all(|value| value.is_finite()) {
        return Err(EqError::MalformedInput(name.into()));
    }
    Ok(())
}

fn check_2d(name: &str, array: &Array2<f64>, expected: (usize, usize)) -> Result<()> {
    if array.dim() != expected {
        return Err(EqError::ShapeMismatch {
            name: name.into(),
            expected: vec![expected.0, expected.1],
            got: array.shape().to_vec(),
        });
    }
    if !array.iter().all(|value| value.is_finite()) {
        return Err(EqError::MalformedInput(name.into()));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::synthetic;
    use crate::EqError;

    #[test]
    fn test_synthetic_datasets_validate() {
        synthetic::uniform_dataset(32, 33, 0.1, 2.0).validate().unwrap();
        synthetic::lar_dataset(32, 33, 0.1, 2.0).validate().unwrap();
    }

    #[test]
    fn test_shape_mismatch_detected() {
        let mut dataset = synthetic::uniform_dataset(16, 17, 0.1, 2.0);
        dataset.q_data = dataset.q_data.slice(ndarray::s![..8]).to_owned();
        assert!(matches!(
            dataset.validate(),
            Err(EqError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_non_finite_sample_detected() {
        let mut dataset = synthetic::uniform_dataset(16, 17, 0.1, 2.0);
        dataset.b_data[[3, 4]] = f64::NAN;
        assert!(matches!(
            dataset.validate(),
            Err(EqError::MalformedInput(name)) if name == "b_data"
        ));
    }

    #[test]
    fn test_non_monotone_grid_detected() {
        let mut dataset = synthetic::uniform_dataset(16, 17, 0.1, 2.0);
        dataset.psip_data.swap(3, 4);
        assert!(dataset.validate().is_err());
    }
}
