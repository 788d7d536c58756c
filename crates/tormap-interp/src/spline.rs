//! 1D spline construction and evaluation.

use std::str::FromStr;

use crate::error::{DomainError, InterpError};
use crate::{Accelerator, Result};
use crate::{akima, cubic, linear, steffen};

/// The available 1D interpolation types.
///
/// The selector is dispatched once, at construction; evaluation runs on the
/// precomputed piecewise-cubic coefficients and is identical for all types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpType {
    /// Piecewise linear, C⁰.
    Linear,
    /// Natural cubic spline, C².
    Cubic,
    /// Akima's local method, C¹.
    Akima,
    /// Akima with periodic boundary conditions.
    ///
    /// The sample values must match at the endpoints; value and first
    /// derivative are then continuous across the period.
    AkimaPeriodic,
    /// Steffen's monotone method, C¹, free of overshoots.
    Steffen,
}

impl InterpType {
    /// Returns the minimum number of sample points of the type.
    pub fn min_size(&self) -> usize {
        match self {
            Self::Linear => 2,
            Self::Cubic | Self::Steffen => 3,
            Self::Akima | Self::AkimaPeriodic => 5,
        }
    }

    /// Returns the type's selector name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Cubic => "cubic",
            Self::Akima => "akima",
            Self::AkimaPeriodic => "akima-periodic",
            Self::Steffen => "steffen",
        }
    }
}

impl FromStr for InterpType {
    type Err = InterpError;

    fn from_str(selector: &str) -> Result<Self> {
        match selector.to_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "cubic" => Ok(Self::Cubic),
            "akima" => Ok(Self::Akima),
            "akima-periodic" | "akima_periodic" | "akimaperiodic" => Ok(Self::AkimaPeriodic),
            "steffen" => Ok(Self::Steffen),
            _ => Err(InterpError::UnknownInterpolation(selector.into())),
        }
    }
}

/// Creates a [`Spline`] from a selector string.
///
/// # Example
///
/// ```
/// # use tormap_interp::make_spline;
/// let xa = [0.0, 0.5, 1.0, 1.5, 2.0];
/// let ya = [1.0, 1.2, 1.1, 0.9, 1.0];
/// let spline = make_spline("steffen", &xa, &ya)?;
/// # Ok::<_, tormap_interp::InterpError>(())
/// ```
pub fn make_spline(typ: &str, xa: &[f64], ya: &[f64]) -> Result<Spline> {
    Spline::build(typ.parse()?, xa, ya)
}

// ===============================================================================================

/// A 1D interpolant owning its sample arrays and coefficients.
///
/// Whatever the [`InterpType`], the interpolant is stored as a cubic
/// polynomial per interval: `y(x) = ya[i] + t·(b[i] + t·(c[i] + t·d[i]))`
/// with `t = x - xa[i]`. Queries outside `[x_min, x_max]` evaluate the
/// first/last interval polynomial, which yields the type's natural
/// extrapolation; periodic types reduce the query into the period first.
pub struct Spline {
    typ: InterpType,
    /// The sample abscissa, strictly increasing.
    pub xa: Vec<f64>,
    /// The sample ordinates.
    pub ya: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

/// Creation
impl Spline {
    /// Constructs a [`Spline`] of the given type over `(xa, ya)`.
    pub fn build(typ: InterpType, xa: &[f64], ya: &[f64]) -> Result<Self> {
        if ya.len() != xa.len() {
            return Err(InterpError::LengthMismatch {
                expected: xa.len(),
                got: ya.len(),
            });
        }
        if xa.len() < typ.min_size() {
            return Err(InterpError::InsufficientPoints {
                typ: typ.name(),
                min: typ.min_size(),
                got: xa.len(),
            });
        }
        if !xa.windows(2).all(|w| w[0] < w[1]) {
            return Err(InterpError::NonMonotone);
        }

        let (b, c, d) = match typ {
            InterpType::Linear => linear::coefficients(xa, ya),
            InterpType::Cubic => cubic::coefficients(xa, ya),
            InterpType::Akima => akima::coefficients(xa, ya, false),
            InterpType::AkimaPeriodic => {
                let scale = 1.0_f64.max(ya[0].abs());
                if (ya[0] - ya[ya.len() - 1]).abs() > 1e-8 * scale {
                    return Err(InterpError::NonPeriodic);
                }
                akima::coefficients(xa, ya, true)
            }
            InterpType::Steffen => steffen::coefficients(xa, ya),
        };

        Ok(Self {
            typ,
            xa: xa.to_vec(),
            ya: ya.to_vec(),
            b,
            c,
            d,
        })
    }
}

/// Evaluation
impl Spline {
    /// Evaluates the interpolant at `x`.
    pub fn eval(&self, x: f64, acc: &mut Accelerator) -> std::result::Result<f64, DomainError> {
        let (i, t) = self.locate(x, acc)?;
        Ok(self.ya[i] + t * (self.b[i] + t * (self.c[i] + t * self.d[i])))
    }

    /// Evaluates the first derivative at `x`.
    pub fn eval_deriv(
        &self,
        x: f64,
        acc: &mut Accelerator,
    ) -> std::result::Result<f64, DomainError> {
        let (i, t) = self.locate(x, acc)?;
        Ok(self.b[i] + t * (2.0 * self.c[i] + t * 3.0 * self.d[i]))
    }

    /// Evaluates the second derivative at `x`.
    pub fn eval_deriv2(
        &self,
        x: f64,
        acc: &mut Accelerator,
    ) -> std::result::Result<f64, DomainError> {
        let (i, t) = self.locate(x, acc)?;
        Ok(2.0 * self.c[i] + t * 6.0 * self.d[i])
    }

    /// Finds the interval of `x` and the offset from its left knot.
    fn locate(
        &self,
        x: f64,
        acc: &mut Accelerator,
    ) -> std::result::Result<(usize, f64), DomainError> {
        if !x.is_finite() {
            return Err(DomainError { value: x });
        }
        let xq = match self.typ {
            InterpType::AkimaPeriodic => {
                let x0 = self.x_min();
                x0 + (x - x0).rem_euclid(self.x_max() - x0)
            }
            _ => x,
        };
        let i = acc.find(&self.xa, xq);
        Ok((i, xq - self.xa[i]))
    }
}

/// Getters
impl Spline {
    /// Returns the interpolation type.
    pub fn typ(&self) -> InterpType {
        self.typ
    }

    /// Returns the number of sample points.
    #[allow(clippy::len_without_is_empty, reason = "splines are never empty")]
    pub fn len(&self) -> usize {
        self.xa.len()
    }

    /// Returns the lower end of the sample domain.
    pub fn x_min(&self) -> f64 {
        self.xa[0]
    }

    /// Returns the upper end of the sample domain.
    pub fn x_max(&self) -> f64 {
        self.xa[self.xa.len() - 1]
    }
}

impl std::fmt::Debug for Spline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spline")
            .field("typ", &self.typ.name())
            .field("len", &self.len())
            .field("domain", &(self.x_min(), self.x_max()))
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_selector_parsing() {
        assert_eq!("Cubic".parse::<InterpType>().unwrap(), InterpType::Cubic);
        assert_eq!(
            "AkimaPeriodic".parse::<InterpType>().unwrap(),
            InterpType::AkimaPeriodic
        );
        assert!(matches!(
            "quintic".parse::<InterpType>(),
            Err(InterpError::UnknownInterpolation(..))
        ));
    }

    #[test]
    fn test_construction_errors() {
        let xa = [0.0, 1.0, 2.0];
        assert!(matches!(
            make_spline("cubic", &xa, &[0.0, 1.0]),
            Err(InterpError::LengthMismatch { .. })
        ));
        assert!(matches!(
            make_spline("akima", &xa, &[0.0, 1.0, 2.0]),
            Err(InterpError::InsufficientPoints { min: 5, got: 3, .. })
        ));
        assert!(matches!(
            make_spline("cubic", &[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0]),
            Err(InterpError::NonMonotone)
        ));
        assert!(matches!(
            make_spline(
                "akima-periodic",
                &[0.0, 1.0, 2.0, 3.0, 4.0],
                &[0.0, 1.0, 0.5, 1.0, 3.0]
            ),
            Err(InterpError::NonPeriodic)
        ));
    }

    #[test]
    fn test_non_finite_query() {
        let xa = [0.0, 1.0, 2.0];
        let spline = make_spline("linear", &xa, &xa).unwrap();
        let mut acc = Accelerator::new();
        assert!(spline.eval(f64::NAN, &mut acc).is_err());
        assert!(spline.eval(f64::INFINITY, &mut acc).is_err());
    }
}
