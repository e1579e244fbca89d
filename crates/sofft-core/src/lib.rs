//! # SO(3) Fourier Transform Library
//!
//! This crate computes forward and inverse discrete Fourier transforms on
//! the rotation group SO(3) (the DSOFT algorithm of Kostelec & Rockmore,
//! "FFTs on the Rotation Group"). A band-limited complex function sampled
//! on a 2B×2B×2B equispaced grid of Euler angles (α, β, γ) maps to its
//! Wigner-D coefficients f̂^l_{M,M'} for 0 ≤ l < B, -l ≤ M, M' ≤ l, and
//! back.
//!
//! ## Pipeline
//!
//! The transform separates variables into three stages:
//!
//! ```text
//! forward:  grid ──layer-wise 2-D FFT──▶ (α,γ) spectra ──weighted Wigner
//!           matrices per (M,M')──▶ coefficients
//!
//! inverse:  coefficients ──transposed Wigner matrices──▶ (α,γ) spectra
//!           ──layer-wise inverse FFT + 1/(2B)²──▶ grid
//! ```
//!
//! The azimuthal stages are plain planar FFTs (rustfft); the polar stage is
//! a discrete Wigner transform whose matrices come from a stable three-term
//! recurrence. Seven Wigner-d symmetries let one matrix serve up to eight
//! order pairs through in-place flips, which is where the speed lives.
//!
//! ## Example
//!
//! ```rust
//! use sofft_core::prelude::*;
//!
//! let bandwidth = 4;
//!
//! // Coefficients of some band-limited function.
//! let mut fc = SoftCoefficients::new(bandwidth);
//! fc.set(1, 0, 0, Complex::new(1.0, 0.0));
//! fc.set(2, 1, -1, Complex::new(0.0, 0.5));
//!
//! // Synthesize its Euler-angle sample and transform back.
//! let mut grid = Grid3::cube(2 * bandwidth);
//! idsoft(&fc, &mut grid, 1).unwrap();
//!
//! let mut recovered = SoftCoefficients::new(bandwidth);
//! dsoft(grid, &mut recovered, 1).unwrap();
//! assert!(fc.max_abs_diff(&recovered) < 1e-12);
//! ```
//!
//! ## Parallelism
//!
//! With the default `parallel` feature the order-pair stages and the
//! per-layer FFTs fan out over rayon whenever the caller passes an advisory
//! thread count above 1 and the bandwidth reaches [`DSOFT_THRESHOLD`].
//! Every task owns its scratch and writes disjoint cells, so results are
//! bit-identical for every thread count.

pub mod coefficients;
pub mod dsoft;
pub mod fft2;
pub mod flip;
pub mod grid3d;
pub mod idsoft;
pub mod matrix;
pub mod quadrature;
pub mod random;
pub mod stopwatch;
pub mod types;
pub mod vector;
pub mod wigner;

// Re-export main types
pub use coefficients::SoftCoefficients;
pub use dsoft::dsoft;
pub use fft2::LayerFft2;
pub use grid3d::Grid3;
pub use idsoft::idsoft;
pub use matrix::Matrix;
pub use stopwatch::Stopwatch;
pub use types::{Complex, SoftError, SoftResult};
pub use vector::{CxVector, Orientation};

/// Bandwidth below which the transform drivers stay serial; the per-task
/// work is too small to pay for scheduling underneath this.
pub const DSOFT_THRESHOLD: usize = 20;

/// Number of worker threads the runtime offers, or 1 when it cannot tell.
pub fn max_threads() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coefficients::SoftCoefficients;
    pub use crate::dsoft::dsoft;
    pub use crate::grid3d::Grid3;
    pub use crate::idsoft::idsoft;
    pub use crate::random::{fill_coefficients, fill_coefficients_seeded, Engine};
    pub use crate::types::{Complex, SoftError, SoftResult};
    pub use crate::{max_threads, DSOFT_THRESHOLD};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_threads_is_positive() {
        assert!(max_threads() >= 1);
    }

    #[test]
    fn test_threshold_matches_reference_tuning() {
        assert_eq!(DSOFT_THRESHOLD, 20);
    }
}
