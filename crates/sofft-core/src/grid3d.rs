//! Equiangular sample grid on SO(3)
//!
//! A band-limited function on the rotation group is sampled on a
//! `2B × 2B × 2B` grid of Euler angles (α, β, γ). [`Grid3`] stores such a
//! sample in **layer-major, column-major** order: element `(i, j, k)` lives
//! at offset `k·rows·cols + j·rows + i`. A fixed layer index `k` selects one
//! contiguous β-slice, which is exactly the unit the layer-wise 2-D FFT
//! operates on.
//!
//! Axis convention for the transform drivers: the row axis runs over β, the
//! column axis over α and the layer axis over γ.

use crate::fft2::LayerFft2;
use crate::types::Complex;

/// Contiguous 3-D grid of complex samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid3 {
    rows: usize,
    cols: usize,
    lays: usize,
    data: Vec<Complex>,
}

impl Grid3 {
    /// Create a zero-initialized grid.
    pub fn new(rows: usize, cols: usize, lays: usize) -> Self {
        Self {
            rows,
            cols,
            lays,
            data: vec![Complex::new(0.0, 0.0); rows * cols * lays],
        }
    }

    /// Create a cubic grid with `edge` points per axis.
    pub fn cube(edge: usize) -> Self {
        Self::new(edge, edge, edge)
    }

    /// Create a cubic grid with every element set to `value`.
    pub fn cube_filled(edge: usize, value: Complex) -> Self {
        Self {
            rows: edge,
            cols: edge,
            lays: edge,
            data: vec![value; edge * edge * edge],
        }
    }

    /// Number of rows per layer.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns per layer.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of layers.
    #[inline]
    pub fn lays(&self) -> usize {
        self.lays
    }

    /// Get element at (row, col, lay).
    #[inline]
    pub fn get(&self, row: usize, col: usize, lay: usize) -> Complex {
        debug_assert!(row < self.rows && col < self.cols && lay < self.lays);
        self.data[lay * self.rows * self.cols + col * self.rows + row]
    }

    /// Set element at (row, col, lay).
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, lay: usize, value: Complex) {
        debug_assert!(row < self.rows && col < self.cols && lay < self.lays);
        self.data[lay * self.rows * self.cols + col * self.rows + row] = value;
    }

    /// Underlying storage, layer-major then column-major.
    #[inline]
    pub fn as_slice(&self) -> &[Complex] {
        &self.data
    }

    /// Mutable underlying storage.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Complex] {
        &mut self.data
    }

    /// Sum of |value|² over the whole grid.
    pub fn energy(&self) -> f64 {
        self.data.iter().map(|v| v.norm_sqr()).sum()
    }

    /// Forward 2-D DFT of every layer in place, optionally followed by a
    /// global scalar multiply.
    ///
    /// Unnormalized sum convention; `threads` is advisory and forwarded to
    /// the FFT collaborator.
    pub fn layer_wise_dft2(&mut self, scale: Option<Complex>, threads: usize) {
        let fft = LayerFft2::new(self.rows, self.cols);
        fft.forward(&mut self.data, threads);
        if let Some(s) = scale {
            self.scale(s);
        }
    }

    /// Inverse 2-D DFT of every layer in place, optionally followed by a
    /// global scalar multiply.
    pub fn layer_wise_idft2(&mut self, scale: Option<Complex>, threads: usize) {
        let fft = LayerFft2::new(self.rows, self.cols);
        fft.inverse(&mut self.data, threads);
        if let Some(s) = scale {
            self.scale(s);
        }
    }

    /// Multiply every element by `factor` in place.
    pub fn scale(&mut self, factor: Complex) {
        for v in self.data.iter_mut() {
            *v *= factor;
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
    fn test_layer_major_column_major_layout() {
        let mut g = Grid3::new(2, 3, 2);
        g.set(1, 2, 1, cx(7.0, 0.0));
        // offset = 1*2*3 + 2*2 + 1 = 11
        assert_eq!(g.as_slice()[11], cx(7.0, 0.0));
        assert_eq!(g.get(1, 2, 1), cx(7.0, 0.0));
    }

    #[test]
    fn test_dft2_then_idft2_scales_by_plane_size() {
        let edge = 4;
        let mut g = Grid3::cube(edge);
        for k in 0..edge {
            for j in 0..edge {
                for i in 0..edge {
                    g.set(i, j, k, cx((i + 2 * j) as f64, (k as f64) - 1.0));
                }
            }
        }
        let orig = g.clone();

        g.layer_wise_dft2(None, 1);
        // undo the rows*cols factor with the scale hook
        g.layer_wise_idft2(Some(cx(1.0 / (edge * edge) as f64, 0.0)), 1);

        for (a, b) in orig.as_slice().iter().zip(g.as_slice()) {
            assert_relative_eq!(a.re, b.re, epsilon = 1e-10);
            assert_relative_eq!(a.im, b.im, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_energy() {
        let mut g = Grid3::cube(2);
        g.set(0, 0, 0, cx(3.0, 4.0));
        assert_relative_eq!(g.energy(), 25.0, epsilon = 1e-12);
    }
}
