//! Core types for SO(3) Fourier analysis
//!
//! This module defines the scalar type and the error taxonomy shared by the
//! transform drivers and the numeric containers.
//!
//! All exterior arithmetic is double precision. Complex values use
//! [`num_complex::Complex64`], re-exported as [`Complex`] so downstream code
//! does not have to name the underlying crate.

use num_complex::Complex64;

/// Type alias for complex numbers using f64 precision
pub type Complex = Complex64;

/// Result type for SO(3) transform operations
pub type SoftResult<T> = Result<T, SoftError>;

/// Errors that can occur while setting up or running a transform
///
/// Shape errors are recoverable: the driver that detects one emits a
/// diagnostic and returns without touching its output argument. Numeric
/// degeneracies (NaN/Inf escaping the Wigner recurrence on ill-posed input)
/// are deliberately *not* represented here; they propagate through the
/// output values instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SoftError {
    #[error("sample grid dimensions {rows}x{cols}x{lays} are not equal; the grid must be cubic")]
    GridNotCubic {
        rows: usize,
        cols: usize,
        lays: usize,
    },

    #[error("sample grid dimension {0} is odd; each axis must hold 2B points")]
    GridDimensionOdd(usize),

    #[error("coefficient container bandwidth {coefficients} does not match grid bandwidth {grid}")]
    BandwidthMismatch { coefficients: usize, grid: usize },

    #[error("weights buffer length {0} is odd; expected 2B entries")]
    WeightsLengthOdd(usize),

    #[error("Wigner matrix is {rows}x{cols} but orders M={m}, M'={mp} at bandwidth {bandwidth} require {expected_rows}x{expected_cols}")]
    WignerShapeMismatch {
        rows: usize,
        cols: usize,
        m: i32,
        mp: i32,
        bandwidth: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("random range is empty: min {min} is greater than max {max}")]
    EmptyRandomRange { min: f64, max: f64 },
}
