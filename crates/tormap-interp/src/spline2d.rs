//! 2D tensor-product spline construction and evaluation.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::cubic;
use crate::error::{DomainError, InterpError};
use crate::{Accelerator, CellCache, Result};

/// Identity tag allocator for [`CellCache`] validation.
static NEXT_SPLINE2D_ID: AtomicU64 = AtomicU64::new(0);

/// The available 2D interpolation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interp2dType {
    /// Bilinear interpolation, C⁰.
    Bilinear,
    /// Bicubic interpolation, C¹ with continuous mixed partials.
    ///
    /// Node partial derivatives are tabulated from natural cubic splines
    /// along each grid axis.
    Bicubic,
}

impl Interp2dType {
    /// Returns the minimum number of points per axis of the type.
    pub fn min_size(&self) -> usize {
        match self {
            Self::Bilinear => 2,
            Self::Bicubic => 3,
        }
    }

    /// Returns the type's selector name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bilinear => "bilinear",
            Self::Bicubic => "bicubic",
        }
    }
}

impl FromStr for Interp2dType {
    type Err = InterpError;

    fn from_str(selector: &str) -> Result<Self> {
        match selector.to_lowercase().as_str() {
            "bilinear" => Ok(Self::Bilinear),
            "bicubic" => Ok(Self::Bicubic),
            _ => Err(InterpError::UnknownInterpolation(selector.into())),
        }
    }
}

/// Creates a [`Spline2d`] from a selector string.
///
/// `za` is laid out row-major over `xa`: `za[i * ya.len() + j]` is the value
/// at `(xa[i], ya[j])`.
///
/// # Example
///
/// ```
/// # use tormap_interp::{make_spline2d, Accelerator, CellCache};
/// let xa = [0.0, 1.0, 2.0];
/// let ya = [0.0, 1.0, 2.0, 3.0];
/// let za: Vec<f64> = (0..12).map(|k| k as f64).collect();
/// let spline = make_spline2d("bicubic", &xa, &ya, &za)?;
///
/// let (mut xacc, mut yacc) = (Accelerator::new(), Accelerator::new());
/// let mut cache = CellCache::new();
/// let z = spline.eval(0.5, 1.5, &mut xacc, &mut yacc, &mut cache)?;
/// # Ok::<_, tormap_interp::InterpError>(())
/// ```
pub fn make_spline2d(typ: &str, xa: &[f64], ya: &[f64], za: &[f64]) -> Result<Spline2d> {
    Spline2d::build(typ.parse()?, xa, ya, za)
}

// ===============================================================================================

/// A 2D tensor-product interpolant owning its sample grid.
///
/// Evaluation is parameterised by one [`Accelerator`] per axis plus a
/// [`CellCache`] holding the coefficients of the last visited cell. All
/// three are owned by the caller so that the spline itself stays shareable
/// across threads.
pub struct Spline2d {
    typ: Interp2dType,
    id: u64,
    /// The first-axis sample abscissa, strictly increasing.
    pub xa: Vec<f64>,
    /// The second-axis sample abscissa, strictly increasing.
    pub ya: Vec<f64>,
    /// The sample values, row-major over `xa`.
    pub za: Vec<f64>,
    /// ∂z/∂x at the nodes (bicubic only).
    zx: Vec<f64>,
    /// ∂z/∂y at the nodes (bicubic only).
    zy: Vec<f64>,
    /// ∂²z/∂x∂y at the nodes (bicubic only).
    zxy: Vec<f64>,
}

/// Creation
impl Spline2d {
    /// Constructs a [`Spline2d`] of the given type over the grid.
    pub fn build(typ: Interp2dType, xa: &[f64], ya: &[f64], za: &[f64]) -> Result<Self> {
        let (nx, ny) = (xa.len(), ya.len());
        for (axis, len) in [(xa, nx), (ya, ny)] {
            if len < typ.min_size() {
                return Err(InterpError::InsufficientPoints {
                    typ: typ.name(),
                    min: typ.min_size(),
                    got: len,
                });
            }
            if !axis.windows(2).all(|w| w[0] < w[1]) {
                return Err(InterpError::NonMonotone);
            }
        }
        if za.len() != nx * ny {
            return Err(InterpError::LengthMismatch {
                expected: nx * ny,
                got: za.len(),
            });
        }

        let mut spline = Self {
            typ,
            id: NEXT_SPLINE2D_ID.fetch_add(1, Ordering::Relaxed),
            xa: xa.to_vec(),
            ya: ya.to_vec(),
            za: za.to_vec(),
            zx: Vec::new(),
            zy: Vec::new(),
            zxy: Vec::new(),
        };
        if typ == Interp2dType::Bicubic {
            spline.tabulate_node_partials();
        }
        Ok(spline)
    }

    /// Tabulates ∂z/∂x, ∂z/∂y and ∂²z/∂x∂y at every node from natural
    /// cubic splines along the grid axes.
    fn tabulate_node_partials(&mut self) {
        let (nx, ny) = (self.xa.len(), self.ya.len());
        self.zx = vec![0.0; nx * ny];
        self.zy = vec![0.0; nx * ny];
        self.zxy = vec![0.0; nx * ny];

        // ∂z/∂y along each grid row.
        for i in 0..nx {
            let row = &self.za[i * ny..(i + 1) * ny];
            let derivs = cubic::node_derivatives(&self.ya, row);
            self.zy[i * ny..(i + 1) * ny].copy_from_slice(&derivs);
        }

        // ∂z/∂x and ∂²z/∂x∂y along each grid column, the latter from the
        // tabulated ∂z/∂y values.
        let mut column = vec![0.0; nx];
        for j in 0..ny {
            for i in 0..nx {
                column[i] = self.za[i * ny + j];
            }
            for (i, deriv) in cubic::node_derivatives(&self.xa, &column).into_iter().enumerate() {
                self.zx[i * ny + j] = deriv;
            }

            for i in 0..nx {
                column[i] = self.zy[i * ny + j];
            }
            for (i, deriv) in cubic::node_derivatives(&self.xa, &column).into_iter().enumerate() {
                self.zxy[i * ny + j] = deriv;
            }
        }
    }
}

/// Evaluation
impl Spline2d {
    /// Evaluates the interpolant at `(x, y)`.
    pub fn eval(
        &self,
        x: f64,
        y: f64,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
        cache: &mut CellCache,
    ) -> std::result::Result<f64, DomainError> {
        self.eval_with(x, y, xacc, yacc, cache, |a, t, u, _, _| {
            let mut z = 0.0;
            for k in (0..4).rev() {
                z = z * t + horner(&a[k], u);
            }
            z
        })
    }

    /// Evaluates ∂z/∂x at `(x, y)`.
    pub fn eval_deriv_x(
        &self,
        x: f64,
        y: f64,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
        cache: &mut CellCache,
    ) -> std::result::Result<f64, DomainError> {
        self.eval_with(x, y, xacc, yacc, cache, |a, t, u, dx, _| {
            let mut z = 0.0;
            for k in (1..4).rev() {
                z = z * t + k as f64 * horner(&a[k], u);
            }
            z / dx
        })
    }

    /// Evaluates ∂z/∂y at `(x, y)`.
    pub fn eval_deriv_y(
        &self,
        x: f64,
        y: f64,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
        cache: &mut CellCache,
    ) -> std::result::Result<f64, DomainError> {
        self.eval_with(x, y, xacc, yacc, cache, |a, t, u, _, dy| {
            let mut z = 0.0;
            for k in (0..4).rev() {
                z = z * t + horner_deriv(&a[k], u);
            }
            z / dy
        })
    }

    /// Evaluates ∂²z/∂x² at `(x, y)`.
    pub fn eval_deriv_xx(
        &self,
        x: f64,
        y: f64,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
        cache: &mut CellCache,
    ) -> std::result::Result<f64, DomainError> {
        self.eval_with(x, y, xacc, yacc, cache, |a, t, u, dx, _| {
            let mut z = 0.0;
            for k in (2..4).rev() {
                z = z * t + (k * (k - 1)) as f64 * horner(&a[k], u);
            }
            z / (dx * dx)
        })
    }

    /// Evaluates ∂²z/∂y² at `(x, y)`.
    pub fn eval_deriv_yy(
        &self,
        x: f64,
        y: f64,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
        cache: &mut CellCache,
    ) -> std::result::Result<f64, DomainError> {
        self.eval_with(x, y, xacc, yacc, cache, |a, t, u, _, dy| {
            let mut z = 0.0;
            for k in (0..4).rev() {
                z = z * t + horner_deriv2(&a[k], u);
            }
            z / (dy * dy)
        })
    }

    /// Evaluates the mixed partial ∂²z/∂x∂y at `(x, y)`.
    pub fn eval_deriv_xy(
        &self,
        x: f64,
        y: f64,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
        cache: &mut CellCache,
    ) -> std::result::Result<f64, DomainError> {
        self.eval_with(x, y, xacc, yacc, cache, |a, t, u, dx, dy| {
            let mut z = 0.0;
            for k in (1..4).rev() {
                z = z * t + k as f64 * horner_deriv(&a[k], u);
            }
            z / (dx * dy)
        })
    }

    /// Locates the cell of `(x, y)`, refreshes the coefficient cache if
    /// needed and applies `combine` to the cell polynomial.
    fn eval_with(
        &self,
        x: f64,
        y: f64,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
        cache: &mut CellCache,
        combine: impl Fn(&[[f64; 4]; 4], f64, f64, f64, f64) -> f64,
    ) -> std::result::Result<f64, DomainError> {
        if !x.is_finite() {
            return Err(DomainError { value: x });
        }
        if !y.is_finite() {
            return Err(DomainError { value: y });
        }

        let i = xacc.find(&self.xa, x);
        let j = yacc.find(&self.ya, y);
        let dx = self.xa[i + 1] - self.xa[i];
        let dy = self.ya[j + 1] - self.ya[j];
        let t = (x - self.xa[i]) / dx;
        let u = (y - self.ya[j]) / dy;

        if cache.key != Some((self.id, i, j)) {
            cache.coeff = match self.typ {
                Interp2dType::Bilinear => self.bilinear_cell(i, j),
                Interp2dType::Bicubic => self.bicubic_cell(i, j),
            };
            cache.key = Some((self.id, i, j));
        }
        Ok(combine(&cache.coeff, t, u, dx, dy))
    }

    /// Bilinear coefficients of cell `(i, j)` in the unit square basis.
    fn bilinear_cell(&self, i: usize, j: usize) -> [[f64; 4]; 4] {
        let ny = self.ya.len();
        let z00 = self.za[i * ny + j];
        let z01 = self.za[i * ny + j + 1];
        let z10 = self.za[(i + 1) * ny + j];
        let z11 = self.za[(i + 1) * ny + j + 1];

        let mut a = [[0.0; 4]; 4];
        a[0][0] = z00;
        a[0][1] = z01 - z00;
        a[1][0] = z10 - z00;
        a[1][1] = z00 - z10 - z01 + z11;
        a
    }

    /// Bicubic coefficients of cell `(i, j)` in the unit square basis,
    /// from the corner values and tabulated partials.
    fn bicubic_cell(&self, i: usize, j: usize) -> [[f64; 4]; 4] {
        let ny = self.ya.len();
        let dx = self.xa[i + 1] - self.xa[i];
        let dy = self.ya[j + 1] - self.ya[j];
        let at = |arr: &[f64], di: usize, dj: usize| arr[(i + di) * ny + j + dj];

        // Corner data, with the derivatives scaled to the unit square.
        let f = [
            [
                at(&self.za, 0, 0),
                at(&self.za, 0, 1),
                at(&self.zy, 0, 0) * dy,
                at(&self.zy, 0, 1) * dy,
            ],
            [
                at(&self.za, 1, 0),
                at(&self.za, 1, 1),
                at(&self.zy, 1, 0) * dy,
                at(&self.zy, 1, 1) * dy,
            ],
            [
                at(&self.zx, 0, 0) * dx,
                at(&self.zx, 0, 1) * dx,
                at(&self.zxy, 0, 0) * dx * dy,
                at(&self.zxy, 0, 1) * dx * dy,
            ],
            [
                at(&self.zx, 1, 0) * dx,
                at(&self.zx, 1, 1) * dx,
                at(&self.zxy, 1, 0) * dx * dy,
                at(&self.zxy, 1, 1) * dx * dy,
            ],
        ];

        // a = M · f · Mᵀ with the Hermite-to-monomial matrix M.
        const M: [[f64; 4]; 4] = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [-3.0, 3.0, -2.0, -1.0],
            [2.0, -2.0, 1.0, 1.0],
        ];

        let mut mf = [[0.0; 4]; 4];
        for (row, mf_row) in mf.iter_mut().enumerate() {
            for col in 0..4 {
                mf_row[col] = (0..4).map(|k| M[row][k] * f[k][col]).sum();
            }
        }
        let mut a = [[0.0; 4]; 4];
        for (row, a_row) in a.iter_mut().enumerate() {
            for col in 0..4 {
                a_row[col] = (0..4).map(|k| mf[row][k] * M[col][k]).sum();
            }
        }
        a
    }
}

/// Getters
impl Spline2d {
    /// Returns the interpolation type.
    pub fn typ(&self) -> Interp2dType {
        self.typ
    }

    /// Returns the grid shape `(xa.len(), ya.len())`.
    pub fn shape(&self) -> (usize, usize) {
        (self.xa.len(), self.ya.len())
    }

    /// Returns the sample domain as `((x_min, x_max), (y_min, y_max))`.
    pub fn domain(&self) -> ((f64, f64), (f64, f64)) {
        (
            (self.xa[0], self.xa[self.xa.len() - 1]),
            (self.ya[0], self.ya[self.ya.len() - 1]),
        )
    }
}

impl std::fmt::Debug for Spline2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spline2d")
            .field("typ", &self.typ.name())
            .field("shape", &self.shape())
            .field("domain", &self.domain())
            .finish()
    }
}

fn horner(row: &[f64; 4], u: f64) -> f64 {
    row[0] + u * (row[1] + u * (row[2] + u * row[3]))
}

fn horner_deriv(row: &[f64; 4], u: f64) -> f64 {
    row[1] + u * (2.0 * row[2] + u * 3.0 * row[3])
}

fn horner_deriv2(row: &[f64; 4], u: f64) -> f64 {
    2.0 * row[2] + u * 6.0 * row[3]
}
