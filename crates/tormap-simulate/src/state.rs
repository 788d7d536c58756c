//! The guiding-centre state and its equations of motion.

use tormap_equilibrium::{Bfield, Currents, HarmonicCache, Perturbation, Qfactor};
use tormap_equilibrium::{Flux, Length, MagneticMoment, Radians};
use tormap_interp::{Accelerator, CellCache};

use crate::particle::InitialConditions;
use crate::{ParticleError, Result};

/// A single point of a guiding-centre orbit, together with everything the
/// stepper needs at that point.
///
/// Besides the coordinates `(t, θ, ψp, ρ‖, ζ)` and the constant μ, the
/// state carries the derived quantities filled by [`evaluate`]
/// (canonical momenta, time derivatives, field strength) and the
/// per-particle interpolation scratch (accelerators and caches). Cloning a
/// state clones the scratch with it, so sibling particles never contend.
///
/// [`evaluate`]: Self::evaluate
#[derive(Clone, Debug)]
pub struct State {
    /// The time `t`, the independent variable.
    pub time: f64,
    /// The poloidal angle `θ`, unwrapped.
    pub theta: Radians,
    /// The poloidal magnetic flux `ψp`.
    pub psip: Flux,
    /// The parallel gyroradius `ρ‖`.
    pub rho: Length,
    /// The toroidal angle `ζ`, unwrapped.
    pub zeta: Radians,
    /// The magnetic moment `μ`, a constant of motion.
    pub mu: MagneticMoment,

    /// The toroidal flux `ψ(ψp)`.
    pub psi: Flux,
    /// The canonical momentum `Pθ = ψ + ρ‖·I`.
    pub ptheta: f64,
    /// The canonical momentum `Pζ = ρ‖·g - ψp`.
    pub pzeta: f64,

    /// The field strength `B` at the state's position.
    pub(crate) bfield: f64,
    /// The perturbation value at the state's position.
    pub(crate) perturbation: f64,

    /// `dθ/dt`.
    pub(crate) theta_dot: f64,
    /// `dψp/dt`.
    pub(crate) psip_dot: f64,
    /// `dρ‖/dt`.
    pub(crate) rho_dot: f64,
    /// `dζ/dt`.
    pub(crate) zeta_dot: f64,

    /// Interval accelerator of the ψp axis, shared by every 1D profile and
    /// the 2D grid's first axis.
    pub(crate) xacc: Accelerator,
    /// Interval accelerator of the θ axis.
    pub(crate) yacc: Accelerator,
    /// Cell coefficient cache of the 2D field spline.
    pub(crate) cell_cache: CellCache,
    /// One term cache per perturbation harmonic.
    pub(crate) hcaches: Vec<HarmonicCache>,
}

/// Creation
impl State {
    /// Creates an unevaluated [`State`] from a set of initial conditions.
    pub(crate) fn from_initial(initial: &InitialConditions) -> Self {
        Self {
            time: initial.time0,
            theta: initial.theta0,
            psip: initial.psip0,
            rho: initial.rho0,
            zeta: initial.zeta0,
            mu: initial.mu,
            ..Self::default()
        }
    }
}

/// Evaluation
impl State {
    /// Fills the derived quantities and the time derivatives at the
    /// state's coordinates.
    ///
    /// This is the right-hand side of the equations of motion. At a single
    /// `(ψp, θ, ζ, t)` it evaluates `q`, `ψ`; `g`, `I` and their
    /// derivatives; `B` and its partials; the perturbation and its
    /// partials, all sharing the state's accelerator pair, and assembles
    /// `(θ̇, ψ̇p, ρ̇‖, ζ̇)` from the guiding-centre Hamiltonian
    /// `H = ρ‖²B²/2 + μB + p` in the canonical momenta
    /// `Pθ = ψ + ρ‖·I`, `Pζ = ρ‖·g - ψp`.
    pub fn evaluate(
        &mut self,
        qfactor: &impl Qfactor,
        currents: &impl Currents,
        bfield: &impl Bfield,
        perturbation: &impl Perturbation,
    ) -> Result<()> {
        let (psip, theta, zeta, time) = (self.psip, self.theta, self.zeta, self.time);
        if self.hcaches.len() != perturbation.len() {
            self.hcaches
                .resize_with(perturbation.len(), HarmonicCache::new);
        }

        let q = qfactor.q(psip, &mut self.xacc)?;
        let psi = qfactor.psi(psip, &mut self.xacc)?;
        let g = currents.g(psip, &mut self.xacc)?;
        let dg = currents.dg_dpsip(psip, &mut self.xacc)?;
        let i = currents.i(psip, &mut self.xacc)?;
        let di = currents.di_dpsip(psip, &mut self.xacc)?;

        let b = bfield.b(psip, theta, &mut self.xacc, &mut self.yacc, &mut self.cell_cache)?;
        let db_dpsip =
            bfield.db_dpsip(psip, theta, &mut self.xacc, &mut self.yacc, &mut self.cell_cache)?;
        let db_dtheta =
            bfield.db_dtheta(psip, theta, &mut self.xacc, &mut self.yacc, &mut self.cell_cache)?;

        let p = perturbation.p(psip, theta, zeta, time, &mut self.xacc, &mut self.hcaches)?;
        let dp_dpsip =
            perturbation.dp_dpsip(psip, theta, zeta, time, &mut self.xacc, &mut self.hcaches)?;
        let dp_dtheta =
            perturbation.dp_dtheta(psip, theta, zeta, time, &mut self.xacc, &mut self.hcaches)?;
        let dp_dzeta =
            perturbation.dp_dzeta(psip, theta, zeta, time, &mut self.xacc, &mut self.hcaches)?;

        // Determinant of 𝜕(Pθ, Pζ)/𝜕(ψp, ρ‖).
        let det = g * q + i + self.rho * (g * di - i * dg);
        // 𝜕H at fixed (θ, ψp, ρ‖, ζ).
        let moment = self.mu + self.rho * self.rho * b;
        let h_psip = moment * db_dpsip + dp_dpsip;
        let h_theta = moment * db_dtheta + dp_dtheta;
        let h_zeta = dp_dzeta;
        let h_rho = self.rho * b * b;

        self.theta_dot = (g * h_psip + (1.0 - self.rho * dg) * h_rho) / det;
        self.psip_dot = (i * h_zeta - g * h_theta) / det;
        self.rho_dot = ((self.rho * dg - 1.0) * h_theta - (q + self.rho * di) * h_zeta) / det;
        self.zeta_dot = ((q + self.rho * di) * h_rho - i * h_psip) / det;

        self.psi = psi;
        self.ptheta = psi + self.rho * i;
        self.pzeta = self.rho * g - psip;
        self.bfield = b;
        self.perturbation = p;

        if !(self.theta_dot.is_finite()
            && self.psip_dot.is_finite()
            && self.rho_dot.is_finite()
            && self.zeta_dot.is_finite()
            && self.energy().is_finite())
        {
            return Err(ParticleError::NonFinite);
        }
        Ok(())
    }

    /// Consumes the state and returns it evaluated.
    pub fn into_evaluated(
        mut self,
        qfactor: &impl Qfactor,
        currents: &impl Currents,
        bfield: &impl Bfield,
        perturbation: &impl Perturbation,
    ) -> Result<Self> {
        self.evaluate(qfactor, currents, bfield, perturbation)?;
        Ok(self)
    }
}

/// Derived quantities, valid after [`State::evaluate`].
impl State {
    /// The total energy `E = ρ‖²B²/2 + μB + p`.
    pub fn energy(&self) -> f64 {
        self.parallel_energy() + self.perpendicular_energy() + self.perturbation
    }

    /// The parallel energy `ρ‖²B²/2`.
    pub fn parallel_energy(&self) -> f64 {
        let b = self.bfield;
        0.5 * self.rho * self.rho * b * b
    }

    /// The perpendicular energy `μB`.
    pub fn perpendicular_energy(&self) -> f64 {
        self.mu * self.bfield
    }
}

impl Default for State {
    fn default() -> Self {
        Self {
            time: f64::NAN,
            theta: f64::NAN,
            psip: f64::NAN,
            rho: f64::NAN,
            zeta: f64::NAN,
            mu: f64::NAN,
            psi: f64::NAN,
            ptheta: f64::NAN,
            pzeta: f64::NAN,
            bfield: f64::NAN,
            perturbation: f64::NAN,
            theta_dot: f64::NAN,
            psip_dot: f64::NAN,
            rho_dot: f64::NAN,
            zeta_dot: f64::NAN,
            xacc: Accelerator::new(),
            yacc: Accelerator::new(),
            cell_cache: CellCache::new(),
            hcaches: Vec::new(),
        }
    }
}
