//! Progress bar styles and methods for heap calculations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{Heap, MappingParameters, Status};

/// The Poincaré map calculation progress bar style.
const POINCARE_PBAR_STYLE: &str = concat!(
    "{msg}\n", // for the live stats
    "🕜 {elapsed_precise} ",
    "{prefix} ",
    "[{wide_bar:.cyan/blue}] ",
    "{spinner:.bold} ",
    "{pos:>2}/{len:2} ",
    "({eta}) ",
);

/// The progress bar chars (filled, current, to do).
const PROGRESS_CHARS: &str = "#>-";

// ===============================================================================================

pub(crate) struct PoincarePbar {
    pbar: ProgressBar,
    params: MappingParameters,
    length: usize,
    threads: usize,
    // Live statistics
    completed: AtomicUsize,
    escaped: AtomicUsize,
    cancelled: AtomicUsize,
}

impl PoincarePbar {
    /// Initializes the progress bar.
    ///
    /// `.progress_with()` seems to update the bar *before* the routine is
    /// called, so it is created and updated manually instead.
    pub(crate) fn new(heap: &Heap, params: &MappingParameters, threads: usize) -> Self {
        let style = ProgressStyle::with_template(POINCARE_PBAR_STYLE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(PROGRESS_CHARS);
        let pbar = ProgressBar::new(heap.particles.len() as u64).with_style(style);
        pbar.enable_steady_tick(Duration::from_millis(100));
        Self {
            pbar,
            params: *params,
            length: heap.particles.len(),
            threads,
            completed: AtomicUsize::default(),
            escaped: AtomicUsize::default(),
            cancelled: AtomicUsize::default(),
        }
    }

    /// Prints an informative message before the ticking starts.
    pub(crate) fn print_prelude(&self) {
        self.pbar.println(format!(
            "🚀 Using {} threads for {} particles",
            self.threads, self.length
        ));
        self.pbar.println(format!(
            "🗿 Integrating with {:?}={:.4} for {} intersections",
            self.params.section, self.params.alpha, self.params.intersections,
        ));
    }

    /// Advances the wrapped bar, as well as the live statistics.
    pub(crate) fn inc(&self, status: &Status) {
        self.pbar.inc(1);
        match status {
            Status::Completed => self.completed.fetch_add(1, Ordering::SeqCst),
            Status::EscapedWall => self.escaped.fetch_add(1, Ordering::SeqCst),
            Status::Cancelled => self.cancelled.fetch_add(1, Ordering::SeqCst),
            _ => 0, // ignored
        };
    }

    /// Updates the printed live statistics.
    pub(crate) fn print_stats(&self) {
        self.pbar.set_message(format!(
            concat!(
                "📍 Mapped = {}\n",
                "🏃 Escaped = {}\n",
                "🛑 Cancelled = {}",
            ),
            self.completed.load(Ordering::SeqCst),
            self.escaped.load(Ordering::SeqCst),
            self.cancelled.load(Ordering::SeqCst),
        ));
    }

    pub(crate) fn finish(&self) {
        self.pbar.println("✅️ Mapping done");
        self.pbar.finish();
    }
}

// ===============================================================================================

pub(crate) struct IntegrationPbar {
    pbar: ProgressBar,
}

impl IntegrationPbar {
    /// Initializes the progress bar.
    pub(crate) fn new(heap: &Heap, threads: usize) -> Self {
        let style = ProgressStyle::with_template(POINCARE_PBAR_STYLE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(PROGRESS_CHARS);
        let pbar = ProgressBar::new(heap.particles.len() as u64).with_style(style);
        pbar.enable_steady_tick(Duration::from_millis(100));
        pbar.println(format!(
            "🚀 Using {} threads for {} particles",
            threads,
            heap.particles.len()
        ));
        Self { pbar }
    }

    /// Advances the wrapped bar.
    pub(crate) fn inc(&self) {
        self.pbar.inc(1);
    }

    pub(crate) fn finish(&self) {
        self.pbar.println("✅️ Integration done");
        self.pbar.finish();
    }
}
