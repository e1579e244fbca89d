//! Forward discrete SO(3) Fourier transform
//!
//! Computes the Wigner-D Fourier coefficients of a band-limited function
//! sampled on a 2B×2B×2B grid of Euler angles, after Kostelec & Rockmore's
//! "FFTs on the Rotation Group":
//!
//! ```text
//! f̂^l_{M,M'} = π/(2B²) · Σ_k w_B(k)·d̃^l_{M,M'}(β_k)
//!              · Σ_{j2} e^{iM'γ_{j2}} Σ_{j1} e^{iMα_{j1}} f(α_{j1}, β_k, γ_{j2})
//! ```
//!
//! The two inner sums over α and γ are one layer-wise 2-D FFT; the weighted
//! β-sum is a dense Wigner matrix against a length-2B vector per order pair.
//! One Wigner matrix serves up to eight (M, M') cases through the seven
//! Wigner-d symmetries
//!
//! ```text
//! d^J_{M,M'}(β) = (-1)^{M-M'} d^J_{-M,-M'}(β) = d^J_{-M',-M}(β)
//!              = (-1)^{J-M'} d^J_{-M,M'}(π-β) = (-1)^{J+M} d^J_{M,-M'}(π-β) = …
//! ```
//!
//! realized as in-place column flips of the matrix plus alternating sign
//! flips on the product vector, so the recurrence runs only once per pair.
//!
//! Order pairs are independent of one another and fan out over two parallel
//! regions (the eight axis/diagonal cases per M, and the eight cases per
//! off-diagonal pair M' < M). Every task writes a disjoint set of (l, M, M')
//! cells, so the result does not depend on scheduling and is bit-equal for
//! every thread count.

use std::f64::consts::PI;

use tracing::warn;

use crate::coefficients::SoftCoefficients;
use crate::flip::{fliplr, fliplr_ne2nderow, fliplr_ne2ndorow};
use crate::grid3d::Grid3;
use crate::matrix::Matrix;
use crate::quadrature::quadrature_weights;
use crate::types::{Complex, SoftError, SoftResult};
use crate::vector::{CxVector, Orientation};
use crate::wigner::weighted_wigner_d_matrix;
use crate::DSOFT_THRESHOLD;

/// Coefficients for one (M, M') order pair, degrees l = max(|M|,|M'|)..B-1.
struct CoeffRun {
    m: i32,
    mp: i32,
    sh: CxVector,
}

/// Forward SO(3) transform of `sample` into `fc`.
///
/// The grid axes are (β, α, γ) as (row, column, layer) and must all equal
/// 2B for the bandwidth B of `fc`. The sample is consumed: the transform
/// rewrites it in place during the FFT stage.
///
/// `threads` is advisory. The order-pair stage runs serially when
/// `threads <= 1` or when the bandwidth is below [`DSOFT_THRESHOLD`];
/// otherwise it fans out over the rayon pool. The coefficient values are
/// identical either way.
///
/// On a shape failure a diagnostic is emitted and `fc` is left untouched.
pub fn dsoft(mut sample: Grid3, fc: &mut SoftCoefficients, threads: usize) -> SoftResult<()> {
    check_cubic_even(sample.rows(), sample.cols(), sample.lays())?;

    let bandwidth = sample.cols() / 2;
    let bw2 = 2 * bandwidth;

    if bandwidth != fc.bandwidth() {
        warn!(
            grid = bandwidth,
            coefficients = fc.bandwidth(),
            "coefficient container bandwidth does not match sample grid bandwidth"
        );
        return Err(SoftError::BandwidthMismatch {
            coefficients: fc.bandwidth(),
            grid: bandwidth,
        });
    }

    #[cfg(not(feature = "parallel"))]
    if threads > 1 {
        warn!("built without the `parallel` feature; the thread count has no effect");
    }

    // Stage 1: α,γ sums as one 2-D DFT per β-slice.
    sample.layer_wise_dft2(None, threads);

    let mut weights = vec![0.0; bw2];
    quadrature_weights(&mut weights)?;

    let norm = Complex::new(PI / (bandwidth * bw2) as f64, 0.0);

    // Stage 2, base case M = M' = 0.
    let mut dw = Matrix::new(bandwidth, bw2);
    weighted_wigner_d_matrix(&mut dw, bandwidth, 0, 0, &weights)?;
    dw.scale(-1.0);

    let s = column_through_layers(&sample, 0, 0);
    let run = CoeffRun {
        m: 0,
        mp: 0,
        sh: dw.mul_vector(&s),
    };
    commit_runs(fc, norm, std::slice::from_ref(&run));

    let parallel = threads > 1 && bandwidth >= DSOFT_THRESHOLD;

    // Stage 2, region (a): axis and diagonal order pairs for each M.
    let axis_runs = run_tasks(parallel, bandwidth.saturating_sub(1), |i| {
        axis_and_diagonal_cases(&sample, &weights, bandwidth, i + 1)
    })?;
    for runs in &axis_runs {
        commit_runs(fc, norm, runs);
    }

    // Stage 2, region (b): strictly off-diagonal pairs 1 <= M' < M < B,
    // fused into a single task index.
    let pair_runs = run_tasks(parallel, pair_task_count(bandwidth), |mmp| {
        off_diagonal_cases(&sample, &weights, bandwidth, mmp)
    })?;
    for runs in &pair_runs {
        commit_runs(fc, norm, runs);
    }

    Ok(())
}

/// Shape preconditions shared by both transform directions.
pub(crate) fn check_cubic_even(rows: usize, cols: usize, lays: usize) -> SoftResult<()> {
    if rows != cols || rows != lays {
        warn!(rows, cols, lays, "all sample grid dimensions should be equal");
        return Err(SoftError::GridNotCubic { rows, cols, lays });
    }
    if rows % 2 != 0 {
        warn!(rows, "sample grid dimensions are not even");
        return Err(SoftError::GridDimensionOdd(rows));
    }
    Ok(())
}

/// Number of fused tasks covering the pairs 1 <= M' < M < B.
pub(crate) fn pair_task_count(bandwidth: usize) -> usize {
    bandwidth.saturating_sub(2) * bandwidth.saturating_sub(1) / 2
}

/// Decode a fused task index into its (M, M') pair with 1 <= M' < M < B.
pub(crate) fn split_order_pair(bandwidth: usize, mmp: usize) -> (usize, usize) {
    let i = mmp / (bandwidth - 1) + 1;
    let j = mmp % (bandwidth - 1) + 1;
    if j > i {
        (bandwidth - i, bandwidth - j)
    } else {
        (i + 1, j)
    }
}

/// Run `count` independent tasks, optionally on the rayon pool.
pub(crate) fn run_tasks<T, F>(parallel: bool, count: usize, task: F) -> SoftResult<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> SoftResult<T> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;
        return (0..count).into_par_iter().map(|i| task(i)).collect();
    }

    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    (0..count).map(task).collect()
}

/// The length-2B vector behind grid position (row, col), one entry per layer.
fn column_through_layers(sample: &Grid3, row: usize, col: usize) -> CxVector {
    let data = (0..sample.lays())
        .map(|k| sample.get(row, col, k))
        .collect();
    CxVector::from_data(data, Orientation::Column)
}

fn commit_runs(fc: &mut SoftCoefficients, norm: Complex, runs: &[CoeffRun]) {
    for run in runs {
        let j = run.m.unsigned_abs().max(run.mp.unsigned_abs()) as usize;
        for (t, &v) in run.sh.as_slice().iter().enumerate() {
            fc.set(j + t, run.m, run.mp, norm * v);
        }
    }
}

/// The eight cases sharing Wigner matrices of orders (M, 0) and (M, M):
/// (±M, 0), (0, ±M), (M, M), (-M, -M), (M, -M), (-M, M).
fn axis_and_diagonal_cases(
    sample: &Grid3,
    weights: &[f64],
    bandwidth: usize,
    m: usize,
) -> SoftResult<Vec<CoeffRun>> {
    let bw2 = 2 * bandwidth;
    let mi = m as i32;
    let mut runs = Vec::with_capacity(8);

    let mut dw = Matrix::new(bandwidth - m, bw2);
    weighted_wigner_d_matrix(&mut dw, bandwidth, mi, 0, weights)?;
    dw.scale(-1.0);

    // f_{M,0}
    let s = column_through_layers(sample, 0, m);
    runs.push(CoeffRun {
        m: mi,
        mp: 0,
        sh: dw.mul_vector(&s),
    });

    // f_{0,M}
    let s = column_through_layers(sample, m, 0);
    let mut sh = dw.mul_vector(&s);
    if m % 2 == 1 {
        sh.scale(-1.0);
    }
    runs.push(CoeffRun { m: 0, mp: mi, sh });

    // f_{-M,0}: reuse via β → π-β
    fliplr(&mut dw);
    let s = column_through_layers(sample, 0, bw2 - m);
    let mut sh = dw.mul_vector(&s);
    sh.negate_alternate(if m % 2 == 1 { 0 } else { 1 });
    runs.push(CoeffRun { m: -mi, mp: 0, sh });

    // f_{0,-M}
    let s = column_through_layers(sample, bw2 - m, 0);
    let mut sh = dw.mul_vector(&s);
    sh.negate_alternate(1);
    runs.push(CoeffRun { m: 0, mp: -mi, sh });

    // Diagonal orders need their own matrix.
    weighted_wigner_d_matrix(&mut dw, bandwidth, mi, mi, weights)?;
    dw.scale(-1.0);

    // f_{M,M}
    let s = column_through_layers(sample, m, m);
    runs.push(CoeffRun {
        m: mi,
        mp: mi,
        sh: dw.mul_vector(&s),
    });

    // f_{-M,-M}
    let s = column_through_layers(sample, bw2 - m, bw2 - m);
    runs.push(CoeffRun {
        m: -mi,
        mp: -mi,
        sh: dw.mul_vector(&s),
    });

    // f_{M,-M} and f_{-M,M} share one more reshuffle.
    fliplr_ne2ndorow(&mut dw);

    let s = column_through_layers(sample, bw2 - m, m);
    runs.push(CoeffRun {
        m: mi,
        mp: -mi,
        sh: dw.mul_vector(&s),
    });

    let s = column_through_layers(sample, m, bw2 - m);
    runs.push(CoeffRun {
        m: -mi,
        mp: mi,
        sh: dw.mul_vector(&s),
    });

    Ok(runs)
}

/// The eight cases sharing the Wigner matrix of one off-diagonal pair
/// 1 <= M' < M < B: (±M, ±M'), (±M', ±M).
fn off_diagonal_cases(
    sample: &Grid3,
    weights: &[f64],
    bandwidth: usize,
    mmp: usize,
) -> SoftResult<Vec<CoeffRun>> {
    let bw2 = 2 * bandwidth;
    let (m, mp) = split_order_pair(bandwidth, mmp);
    let (mi, mpi) = (m as i32, mp as i32);
    let even_gap = (m - mp) % 2 == 0;
    let mut runs = Vec::with_capacity(8);

    let mut dw = Matrix::new(bandwidth - m, bw2);
    weighted_wigner_d_matrix(&mut dw, bandwidth, mi, mpi, weights)?;

    // f_{M,M'}: the base-row sign is folded into the output here instead of
    // negating the matrix up front.
    let s = column_through_layers(sample, mp, m);
    let mut sh = dw.mul_vector(&s);
    sh.scale(-1.0);
    runs.push(CoeffRun {
        m: mi,
        mp: mpi,
        sh,
    });

    // f_{M',M}
    let s = column_through_layers(sample, m, mp);
    let mut sh = dw.mul_vector(&s);
    if even_gap {
        sh.scale(-1.0);
    }
    runs.push(CoeffRun {
        m: mpi,
        mp: mi,
        sh,
    });

    // f_{-M,-M'}
    let s = column_through_layers(sample, bw2 - mp, bw2 - m);
    let mut sh = dw.mul_vector(&s);
    if even_gap {
        sh.scale(-1.0);
    }
    runs.push(CoeffRun {
        m: -mi,
        mp: -mpi,
        sh,
    });

    // f_{-M',-M}
    let s = column_through_layers(sample, bw2 - m, bw2 - mp);
    let mut sh = dw.mul_vector(&s);
    sh.scale(-1.0);
    runs.push(CoeffRun {
        m: -mpi,
        mp: -mi,
        sh,
    });

    // The weights share the β → π-β symmetry of the matrix, so the flipped
    // weighted matrix serves the mixed-sign cases directly.
    fliplr_ne2nderow(&mut dw);

    // f_{M',-M}
    let s = column_through_layers(sample, bw2 - m, mp);
    runs.push(CoeffRun {
        m: mpi,
        mp: -mi,
        sh: dw.mul_vector(&s),
    });

    // f_{M,-M'}
    let s = column_through_layers(sample, bw2 - mp, m);
    runs.push(CoeffRun {
        m: mi,
        mp: -mpi,
        sh: dw.mul_vector(&s),
    });

    if !even_gap {
        dw.scale(-1.0);
    }

    // f_{-M',M}
    let s = column_through_layers(sample, m, bw2 - mp);
    runs.push(CoeffRun {
        m: -mpi,
        mp: mi,
        sh: dw.mul_vector(&s),
    });

    // f_{-M,M'}
    let s = column_through_layers(sample, mp, bw2 - m);
    runs.push(CoeffRun {
        m: -mi,
        mp: mpi,
        sh: dw.mul_vector(&s),
    });

    Ok(runs)
}
