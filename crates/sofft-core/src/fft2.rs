//! Layer-wise 2-D FFT collaborator
//!
//! The SO(3) transform handles its two azimuthal variables with planar 2-D
//! DFTs applied independently to every β-slice of the sample grid. This
//! module wraps `rustfft` into that exact shape: a processor planned once
//! for a fixed slice geometry, then executed over `lays` contiguous planes.
//!
//! Transforms are **unnormalized** in both directions (plain sum
//! convention); the inverse transform driver applies its own 1/(2B)² scale.
//!
//! ## Planner discipline
//!
//! FFT planners are generally not re-entrant. All plans are created inside
//! [`LayerFft2::new`] on the calling thread; the parallel path only ever
//! *executes* the finished [`Fft`] handles, which are `Send + Sync`. This
//! keeps plan creation strictly serialized even when slices fan out across
//! worker threads.

use std::sync::Arc;

use rustfft::{Fft, FftPlanner};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::types::Complex;

/// 2-D FFT processor for a stack of equally-sized complex planes.
///
/// A plane is `rows × cols` in column-major order (a column is contiguous),
/// matching the grid layout used by the transform drivers.
pub struct LayerFft2 {
    rows: usize,
    cols: usize,
    fwd_rows: Arc<dyn Fft<f64>>,
    fwd_cols: Arc<dyn Fft<f64>>,
    inv_rows: Arc<dyn Fft<f64>>,
    inv_cols: Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for LayerFft2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerFft2")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}

impl LayerFft2 {
    /// Plan forward and inverse transforms for `rows × cols` planes.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fwd_rows = planner.plan_fft_forward(rows);
        let fwd_cols = planner.plan_fft_forward(cols);
        let inv_rows = planner.plan_fft_inverse(rows);
        let inv_cols = planner.plan_fft_inverse(cols);

        Self {
            rows,
            cols,
            fwd_rows,
            fwd_cols,
            inv_rows,
            inv_cols,
        }
    }

    /// Plane dimensions as (rows, cols).
    pub fn plane_dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Forward-transform every plane of `buf` in place.
    ///
    /// `threads` is advisory: values above 1 let the planes fan out over the
    /// rayon pool (when the `parallel` feature is enabled); planes are
    /// independent, so the result does not depend on the thread count.
    ///
    /// # Panics
    /// Panics if `buf.len()` is not a multiple of the plane size.
    pub fn forward(&self, buf: &mut [Complex], threads: usize) {
        self.run(buf, threads, &self.fwd_rows, &self.fwd_cols);
    }

    /// Inverse-transform every plane of `buf` in place (unnormalized).
    pub fn inverse(&self, buf: &mut [Complex], threads: usize) {
        self.run(buf, threads, &self.inv_rows, &self.inv_cols);
    }

    fn run(
        &self,
        buf: &mut [Complex],
        threads: usize,
        row_fft: &Arc<dyn Fft<f64>>,
        col_fft: &Arc<dyn Fft<f64>>,
    ) {
        let plane = self.rows * self.cols;
        assert_eq!(
            buf.len() % plane,
            0,
            "buffer length {} is not a multiple of the plane size {}",
            buf.len(),
            plane
        );

        #[cfg(feature = "parallel")]
        if threads > 1 {
            buf.par_chunks_mut(plane)
                .for_each(|layer| transform_plane(self.rows, self.cols, row_fft, col_fft, layer));
            return;
        }

        let _ = threads;
        for layer in buf.chunks_mut(plane) {
            transform_plane(self.rows, self.cols, row_fft, col_fft, layer);
        }
    }
}

/// One separable 2-D DFT over a column-major plane.
///
/// Columns are contiguous, so the row-dimension pass runs directly on the
/// buffer; the column-dimension pass gathers each strided row into a scratch
/// line, transforms it and scatters it back.
fn transform_plane(
    rows: usize,
    cols: usize,
    row_fft: &Arc<dyn Fft<f64>>,
    col_fft: &Arc<dyn Fft<f64>>,
    layer: &mut [Complex],
) {
    let mut scratch =
        vec![
            Complex::new(0.0, 0.0);
            row_fft
                .get_inplace_scratch_len()
                .max(col_fft.get_inplace_scratch_len())
        ];

    for c in 0..cols {
        row_fft.process_with_scratch(&mut layer[c * rows..(c + 1) * rows], &mut scratch);
    }

    let mut line = vec![Complex::new(0.0, 0.0); cols];
    for r in 0..rows {
        for c in 0..cols {
            line[c] = layer[c * rows + r];
        }
        col_fft.process_with_scratch(&mut line, &mut scratch);
        for c in 0..cols {
            layer[c * rows + r] = line[c];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cx(re: f64, im: f64) -> Complex {
        Complex::new(re, im)
    }

    #[test]
    fn test_constant_plane_transforms_to_dc_bin() {
        let fft = LayerFft2::new(4, 4);
        assert_eq!(fft.plane_dims(), (4, 4));

        let mut buf = vec![cx(1.0, 0.0); 16];
        fft.forward(&mut buf, 1);

        // Unnormalized sum convention: DC bin carries rows*cols.
        assert_relative_eq!(buf[0].re, 16.0, epsilon = 1e-12);
        for v in &buf[1..] {
            assert_relative_eq!(v.norm(), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_forward_inverse_round_trip() {
        let fft = LayerFft2::new(8, 8);
        let orig: Vec<Complex> = (0..2 * 64)
            .map(|i| cx((i as f64 * 0.37).sin(), (i as f64 * 0.11).cos()))
            .collect();
        let mut buf = orig.clone();

        fft.forward(&mut buf, 1);
        fft.inverse(&mut buf, 1);

        // inverse ∘ forward multiplies by rows*cols
        for (o, v) in orig.iter().zip(buf.iter()) {
            assert_relative_eq!(v.re, 64.0 * o.re, epsilon = 1e-9);
            assert_relative_eq!(v.im, 64.0 * o.im, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_planes_are_independent() {
        let fft = LayerFft2::new(4, 4);

        let layer_a: Vec<Complex> = (0..16).map(|i| cx(i as f64, 0.0)).collect();
        let layer_b: Vec<Complex> = (0..16).map(|i| cx(0.0, -(i as f64))).collect();

        let mut stacked: Vec<Complex> = layer_a.iter().chain(layer_b.iter()).copied().collect();
        fft.forward(&mut stacked, 1);

        let mut single_a = layer_a;
        let mut single_b = layer_b;
        fft.forward(&mut single_a, 1);
        fft.forward(&mut single_b, 1);

        assert_eq!(&stacked[..16], &single_a[..]);
        assert_eq!(&stacked[16..], &single_b[..]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_thread_count_does_not_change_output() {
        let fft = LayerFft2::new(8, 8);
        let orig: Vec<Complex> = (0..4 * 64)
            .map(|i| cx((i as f64 * 0.53).sin(), (i as f64 * 0.29).sin()))
            .collect();

        let mut serial = orig.clone();
        fft.forward(&mut serial, 1);

        let mut parallel = orig;
        fft.forward(&mut parallel, 4);

        assert_eq!(serial, parallel);
    }
}
