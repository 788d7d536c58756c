//! Representation of an equilibrium's magnetic field.

use std::f64::consts::TAU;

use ndarray::Array2;
use tormap_common::array2d_getter_impl;
use tormap_interp::{Accelerator, CellCache, Spline2d, make_spline2d};

use crate::{Bfield, EquilibriumDataset, Flux, Length, Radians, Result};

/// Magnetic field reconstructed from an [`EquilibriumDataset`].
///
/// Wraps 2D splines over `B(ψp, θ)` and the lab coordinates `R(ψp, θ)`,
/// `Z(ψp, θ)`. The field partials evaluated on the hot path come from the
/// B-spline itself, so that consecutive `b`/`db_dpsip`/`db_dtheta` calls at
/// one point reuse the same cached cell coefficients. The tabulated
/// `𝜕B` arrays, when the dataset carries them, are kept for diagnostics
/// and data extraction.
pub struct NumericBfield {
    /// 2D interpolation type, in case-insensitive string format.
    typ: String,

    /// The poloidal flux at the wall.
    psip_wall: Flux,
    /// The toroidal flux at the wall.
    psi_wall: Flux,
    /// Magnetic field strength on the axis, in \[T\].
    baxis: f64,
    /// Horizontal position of the magnetic axis, in \[m\].
    raxis: Length,

    /// Interpolant over the `B` samples, as a function of (ψp, θ).
    b_spline: Spline2d,
    /// Interpolant over the `R` samples, as a function of (ψp, θ).
    r_spline: Spline2d,
    /// Interpolant over the `Z` samples, as a function of (ψp, θ).
    z_spline: Spline2d,

    /// `𝜕B/𝜕ψp` at the grid nodes, tabulated or spline-derived.
    db_dpsip_data: Array2<f64>,
    /// `𝜕B/𝜕θ` at the grid nodes, tabulated or spline-derived.
    db_dtheta_data: Array2<f64>,
}

/// Creation
impl NumericBfield {
    /// Constructs a [`NumericBfield`] with splines of `typ` interpolation
    /// type.
    ///
    /// The node arrays `db_dpsip_data`/`db_dtheta_data` are taken from the
    /// dataset when supplied, and evaluated from the B-spline's derivative
    /// at the grid nodes otherwise.
    ///
    /// # Example
    /// ```
    /// # use tormap_equilibrium::*;
    /// # let dataset = synthetic::lar_dataset(32, 33, 0.1, 2.0);
    /// let bfield = NumericBfield::from_dataset(&dataset, "bicubic")?;
    /// # Ok::<_, EqError>(())
    /// ```
    pub fn from_dataset(dataset: &EquilibriumDataset, typ: &str) -> Result<Self> {
        dataset.validate()?;

        let psip = dataset.psip_data.as_slice().expect("owned standard layout");
        let theta = dataset.theta_data.as_slice().expect("owned standard layout");
        let flat = |array: &Array2<f64>| array.as_standard_layout().as_slice().expect("2D").to_vec();

        let b_spline = make_spline2d(typ, psip, theta, &flat(&dataset.b_data))?;
        let r_spline = make_spline2d(typ, psip, theta, &flat(&dataset.r_data))?;
        let z_spline = make_spline2d(typ, psip, theta, &flat(&dataset.z_data))?;

        let db_dpsip_data = match &dataset.db_dpsip_data {
            Some(array) => array.clone(),
            None => node_partials(&b_spline, dataset.shape(), Spline2d::eval_deriv_x),
        };
        let db_dtheta_data = match &dataset.db_dtheta_data {
            Some(array) => array.clone(),
            None => node_partials(&b_spline, dataset.shape(), Spline2d::eval_deriv_y),
        };

        Ok(Self {
            typ: typ.into(),
            psip_wall: dataset.psip_wall,
            psi_wall: dataset.psi_wall,
            baxis: dataset.baxis,
            raxis: dataset.raxis,
            b_spline,
            r_spline,
            z_spline,
            db_dpsip_data,
            db_dtheta_data,
        })
    }
}

/// Evaluates a partial of the B-spline at every grid node.
fn node_partials(
    spline: &Spline2d,
    shape: (usize, usize),
    partial: impl Fn(
        &Spline2d,
        f64,
        f64,
        &mut Accelerator,
        &mut Accelerator,
        &mut CellCache,
    ) -> std::result::Result<f64, tormap_interp::DomainError>,
) -> Array2<f64> {
    let mut xacc = Accelerator::new();
    let mut yacc = Accelerator::new();
    let mut cache = CellCache::new();
    Array2::from_shape_fn(shape, |(i, j)| {
        partial(
            spline,
            spline.xa[i],
            spline.ya[j],
            &mut xacc,
            &mut yacc,
            &mut cache,
        )
        .expect("grid nodes are finite")
    })
}

/// Interpolation
#[rustfmt::skip] // pretty!
impl Bfield for NumericBfield {
    fn b(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<f64> {
        Ok(self.b_spline.eval(psip, self.wrap_theta(theta), xacc, yacc, cache)?)
    }

    fn db_dpsip(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<f64> {
        Ok(self.b_spline.eval_deriv_x(psip, self.wrap_theta(theta), xacc, yacc, cache)?)
    }

    fn db_dtheta(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<f64> {
        Ok(self.b_spline.eval_deriv_y(psip, self.wrap_theta(theta), xacc, yacc, cache)?)
    }

    fn r(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<Length> {
        Ok(self.r_spline.eval(psip, self.wrap_theta(theta), xacc, yacc, cache)?)
    }

    fn z(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<Length> {
        Ok(self.z_spline.eval(psip, self.wrap_theta(theta), xacc, yacc, cache)?)
    }

    fn psip_wall(&self) -> Flux {
        self.psip_wall
    }
}

/// Angle reduction into the grid's period.
impl NumericBfield {
    /// Reduces θ into the grid's `[θ₀, θ₀ + 2π)` span.
    fn wrap_theta(&self, theta: Radians) -> Radians {
        let theta0 = self.b_spline.ya[0];
        theta0 + (theta - theta0).rem_euclid(TAU)
    }
}

/// Second order partials, from the B-spline.
#[rustfmt::skip] // pretty!
impl NumericBfield {
    /// Calculates `𝜕²B/𝜕ψp²`.
    pub fn d2b_dpsip2(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<f64> {
        Ok(self.b_spline.eval_deriv_xx(psip, self.wrap_theta(theta), xacc, yacc, cache)?)
    }

    /// Calculates `𝜕²B/𝜕θ²`.
    pub fn d2b_dtheta2(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<f64> {
        Ok(self.b_spline.eval_deriv_yy(psip, self.wrap_theta(theta), xacc, yacc, cache)?)
    }

    /// Calculates the mixed partial `𝜕²B/𝜕ψp𝜕θ`.
    pub fn d2b_dpsip_dtheta(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator, cache: &mut CellCache) -> Result<f64> {
        Ok(self.b_spline.eval_deriv_xy(psip, self.wrap_theta(theta), xacc, yacc, cache)?)
    }
}

/// Getters
impl NumericBfield {
    /// Returns the interpolation type.
    pub fn typ(&self) -> String {
        self.typ.clone()
    }

    /// Returns the grid shape `(ψp, θ)`.
    pub fn shape(&self) -> (usize, usize) {
        self.b_spline.shape()
    }

    /// Returns the toroidal flux at the wall.
    pub fn psi_wall(&self) -> Flux {
        self.psi_wall
    }

    /// Returns the on-axis field strength, in \[T\].
    pub fn baxis(&self) -> f64 {
        self.baxis
    }

    /// Returns the magnetic axis position, in \[m\].
    pub fn raxis(&self) -> Length {
        self.raxis
    }

    array2d_getter_impl!(db_dpsip_data, db_dpsip_data);
    array2d_getter_impl!(db_dtheta_data, db_dtheta_data);

    /// Returns the `B(ψp, θ)` samples as a 2D array.
    pub fn b_data(&self) -> Array2<f64> {
        let (_, ny) = self.shape();
        Array2::from_shape_fn(self.shape(), |(i, j)| self.b_spline.za[i * ny + j])
    }
}

impl std::fmt::Debug for NumericBfield {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumericBfield")
            .field("typ", &self.typ())
            .field("shape", &self.shape())
            .field("psip_wall", &self.psip_wall)
            .finish()
    }
}
