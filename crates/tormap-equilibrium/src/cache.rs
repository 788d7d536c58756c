//! Caching of harmonic terms between consecutive evaluations.

use tormap_interp::Accelerator;

use crate::harmonics::NumericHarmonic;
use crate::{Harmonic, Result};

/// Holds a harmonic's terms evaluated at a specific point.
///
/// The integrator calls a harmonic's value and all of its derivatives
/// consecutively over the same coordinates, so the shared terms are
/// computed once and kept here. Like the accelerators, the cache is an
/// independent object owned by the caller; it only mirrors values the
/// harmonic's methods computed.
#[derive(Clone)]
pub struct HarmonicCache {
    hits: usize,
    misses: usize,

    psip: f64,
    theta: f64,
    zeta: f64,
    time: f64,

    pub(crate) alpha: f64,
    pub(crate) da_dpsip: f64,
    pub(crate) phase: f64,
    pub(crate) dphase_dpsip: f64,
    /// The angular argument of the sin/cos.
    pub(crate) angle: f64,
    pub(crate) sin: f64,
    pub(crate) cos: f64,
}

impl HarmonicCache {
    /// Creates a new, invalid [`HarmonicCache`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the cache's fields are valid for the given coordinates.
    ///
    /// Comparing floats is fine here: the keys are copied verbatim on every
    /// update, and the check *must* fail on the slightest difference.
    pub(crate) fn is_updated(&mut self, psip: f64, theta: f64, zeta: f64, time: f64) -> bool {
        if self.psip == psip && self.theta == theta && self.zeta == zeta && self.time == time {
            self.hits += 1;
            true
        } else {
            self.misses += 1;
            false
        }
    }

    /// Updates the cache's fields as the harmonic itself defines them.
    pub(crate) fn update(
        &mut self,
        harmonic: &NumericHarmonic,
        psip: f64,
        theta: f64,
        zeta: f64,
        time: f64,
        acc: &mut Accelerator,
    ) -> Result<()> {
        self.psip = psip;
        self.theta = theta;
        self.zeta = zeta;
        self.time = time;
        self.alpha = harmonic.a(psip, acc)?;
        self.da_dpsip = harmonic.da_dpsip(psip, acc)?;
        self.phase = harmonic.phase(psip, acc)?;
        self.dphase_dpsip = harmonic.dphase_dpsip(psip, acc)?;
        self.angle = harmonic.mod_arg(psip, theta, zeta, time, acc)?;
        // On some platforms this is faster than calculating them separately.
        (self.sin, self.cos) = self.angle.sin_cos();
        Ok(())
    }

    /// Returns the cache's hit count.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the cache's miss count.
    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl std::fmt::Debug for HarmonicCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarmonicCache")
            .field("hits  ", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}

/// All keys start as NaN, in case an initial condition of `ψp = 0` actually
/// makes sense.
impl Default for HarmonicCache {
    fn default() -> Self {
        Self {
            hits: 0,
            misses: 0,
            psip: f64::NAN,
            theta: f64::NAN,
            zeta: f64::NAN,
            time: f64::NAN,
            alpha: f64::NAN,
            da_dpsip: f64::NAN,
            phase: f64::NAN,
            dphase_dpsip: f64::NAN,
            angle: f64::NAN,
            sin: f64::NAN,
            cos: f64::NAN,
        }
    }
}
