//! Representation of a total perturbation, a sum of multiple harmonics.

use tormap_interp::Accelerator;

use crate::cache::HarmonicCache;
use crate::harmonics::{NumericHarmonic, PhaseMethod};
use crate::{EquilibriumDataset, Harmonic, Perturbation, Result};

/// A sum of perturbation [`NumericHarmonic`]s,
/// `Σ αₘₙ(ψp)·cos(mθ - nζ + φ + ωt)`.
///
/// Harmonics keep their dataset order; indexing returns the i-th harmonic.
pub struct NumericPerturbation {
    harmonics: Vec<NumericHarmonic>,
}

/// Creation and data extraction
impl NumericPerturbation {
    /// Creates a perturbation from already-built harmonics.
    ///
    /// # Example
    ///
    /// No perturbation:
    /// ```
    /// # use tormap_equilibrium::*;
    /// let perturbation = NumericPerturbation::from_harmonics(vec![]);
    /// assert!(perturbation.is_empty());
    /// ```
    pub fn from_harmonics(harmonics: Vec<NumericHarmonic>) -> Self {
        Self { harmonics }
    }

    /// Builds every harmonic of the dataset.
    ///
    /// # Example
    /// ```
    /// # use tormap_equilibrium::*;
    /// # let mut dataset = synthetic::lar_dataset(32, 33, 0.1, 2.0);
    /// # dataset.harmonics.push(synthetic::harmonic_data(&dataset, 2, 1, 1e-4));
    /// # dataset.harmonics.push(synthetic::harmonic_data(&dataset, 3, 2, 1e-4));
    /// let perturbation =
    ///     NumericPerturbation::from_dataset(&dataset, "steffen", PhaseMethod::Constant)?;
    /// assert_eq!(perturbation.len(), 2);
    /// # Ok::<_, EqError>(())
    /// ```
    pub fn from_dataset(
        dataset: &EquilibriumDataset,
        typ: &str,
        phase_method: PhaseMethod,
    ) -> Result<Self> {
        let harmonics = (0..dataset.harmonics.len())
            .map(|index| NumericHarmonic::from_dataset(dataset, index, typ, phase_method))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { harmonics })
    }

    /// Returns the contained harmonics.
    pub fn harmonics(&self) -> &[NumericHarmonic] {
        &self.harmonics
    }
}

/// Folds `query` over all harmonics, summing the answers.
macro_rules! perturbation_fold_impl {
    ($meth_name:ident, $query:ident) => {
        #[doc = "Sums the harmonics' `"]
        #[doc = stringify!($query)]
        #[doc = "` terms."]
        fn $meth_name(
            &self,
            psip: f64,
            theta: f64,
            zeta: f64,
            time: f64,
            acc: &mut Accelerator,
            caches: &mut [HarmonicCache],
        ) -> Result<f64> {
            self.harmonics
                .iter()
                .zip(caches.iter_mut())
                .try_fold(0.0, |sum, (harmonic, cache)| {
                    harmonic
                        .$query(psip, theta, zeta, time, acc, cache)
                        .map(|value| sum + value)
                })
        }
    };
}

impl Perturbation for NumericPerturbation {
    perturbation_fold_impl!(p, h);
    perturbation_fold_impl!(dp_dpsip, dh_dpsip);
    perturbation_fold_impl!(dp_dtheta, dh_dtheta);
    perturbation_fold_impl!(dp_dzeta, dh_dzeta);
    perturbation_fold_impl!(dp_dt, dh_dt);

    fn len(&self) -> usize {
        self.harmonics.len()
    }
}

impl std::ops::Index<usize> for NumericPerturbation {
    type Output = NumericHarmonic;

    fn index(&self, index: usize) -> &Self::Output {
        &self.harmonics[index]
    }
}

impl std::fmt::Debug for NumericPerturbation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.harmonics.iter()).finish()
    }
}
