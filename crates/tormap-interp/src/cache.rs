//! Per-cell coefficient cache for 2D evaluation.

/// Caches the polynomial coefficients of the last 2D grid cell visited.
///
/// Computing the 16 bicubic coefficients of a cell is the expensive part of
/// a 2D evaluation. Consecutive queries land in the same cell almost
/// always, so the coefficients are cached here, owned by the caller just
/// like an [`Accelerator`](crate::Accelerator).
///
/// The cache is keyed by the owning spline's identity as well as the cell
/// indices, so handing the same cache to different splines is safe (though
/// it defeats the caching).
#[derive(Debug, Clone, Default)]
pub struct CellCache {
    pub(crate) key: Option<(u64, usize, usize)>,
    pub(crate) coeff: [[f64; 4]; 4],
}

impl CellCache {
    /// Creates an empty [`CellCache`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidates the cached cell.
    pub fn reset(&mut self) {
        self.key = None;
    }
}
