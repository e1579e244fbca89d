//! Inverse discrete SO(3) Fourier transform
//!
//! Synthesizes the 2B×2B×2B Euler-angle sample of a band-limited function
//! from its Wigner-D Fourier coefficients:
//!
//! ```text
//! f(α, β, γ) = Σ_{l≥0} Σ_{M=-l}^{l} Σ_{M'=-l}^{l} f̂^l_{M,M'} · D̃^l_{M,M'}(α, β, γ)
//! ```
//!
//! The pipeline mirrors the forward driver in reverse: for every order pair
//! the coefficient run is pushed through the transposed (unweighted)
//! Wigner-d matrix into one (row, column) line of the frequency grid, then a
//! layer-wise inverse 2-D FFT with a final 1/(2B)² scale produces the
//! samples. The same eight-fold symmetry reuse applies, with the column
//! flips of the forward direction becoming row flips on the transposed
//! matrices.
//!
//! Composed with the forward driver this is the identity on band-limited
//! data up to floating-point round-off, in either order.

use std::f64::consts::PI;

use tracing::warn;

use crate::coefficients::SoftCoefficients;
use crate::dsoft::{check_cubic_even, pair_task_count, run_tasks, split_order_pair};
use crate::flip::{flipud, flipud_ne2ndecol, flipud_ne2ndocol};
use crate::grid3d::Grid3;
use crate::matrix::Matrix;
use crate::types::{Complex, SoftError, SoftResult};
use crate::vector::{CxVector, Orientation};
use crate::wigner::wigner_d_matrix;
use crate::DSOFT_THRESHOLD;

/// One synthesized frequency line: values over all layers at (row, col).
struct GridRun {
    row: usize,
    col: usize,
    s: CxVector,
}

/// Inverse SO(3) transform of `fc` into the sample grid `synthesis`.
///
/// `synthesis` must be cubic with edge 2B matching the bandwidth of `fc`;
/// its previous contents are discarded. `threads` is advisory exactly as in
/// [`dsoft`](crate::dsoft::dsoft).
///
/// On a shape failure a diagnostic is emitted and `synthesis` is left
/// untouched.
pub fn idsoft(fc: &SoftCoefficients, synthesis: &mut Grid3, threads: usize) -> SoftResult<()> {
    check_cubic_even(synthesis.rows(), synthesis.cols(), synthesis.lays())?;

    let bandwidth = synthesis.cols() / 2;
    let bw2 = 2 * bandwidth;

    if bandwidth != fc.bandwidth() {
        warn!(
            grid = bandwidth,
            coefficients = fc.bandwidth(),
            "coefficient container bandwidth does not match synthesis grid bandwidth"
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

    // Frequency lines with |M| or |M'| at the Nyquist index carry no
    // coefficients and stay zero.
    synthesis
        .as_mut_slice()
        .fill(Complex::new(0.0, 0.0));

    let norm = (bandwidth * bw2) as f64 / PI;

    // Base case M = M' = 0.
    let mut d = Matrix::new(bandwidth, bw2);
    wigner_d_matrix(&mut d, bandwidth, 0, 0)?;
    d.scale(-1.0);
    d.transpose();

    let sh = coefficient_run(fc, norm, 0, 0);
    let run = GridRun {
        row: 0,
        col: 0,
        s: d.mul_vector(&sh),
    };
    commit_runs(synthesis, std::slice::from_ref(&run));

    let parallel = threads > 1 && bandwidth >= DSOFT_THRESHOLD;

    let axis_runs = run_tasks(parallel, bandwidth.saturating_sub(1), |i| {
        axis_and_diagonal_synthesis(fc, bandwidth, norm, i + 1)
    })?;
    for runs in &axis_runs {
        commit_runs(synthesis, runs);
    }

    let pair_runs = run_tasks(parallel, pair_task_count(bandwidth), |mmp| {
        off_diagonal_synthesis(fc, bandwidth, norm, mmp)
    })?;
    for runs in &pair_runs {
        commit_runs(synthesis, runs);
    }

    // α,γ synthesis per β-slice; the inverse FFT is unnormalized, so the
    // (2B)² plane factor is folded into the final scale.
    let scale = Complex::new(1.0 / (4.0 * (bandwidth * bandwidth) as f64), 0.0);
    synthesis.layer_wise_idft2(Some(scale), threads);

    Ok(())
}

/// Coefficients (J..B-1, M, M') as a column vector, pre-scaled by `norm`.
fn coefficient_run(fc: &SoftCoefficients, norm: f64, m: i32, mp: i32) -> CxVector {
    let j = m.unsigned_abs().max(mp.unsigned_abs()) as usize;
    let data = (j..fc.bandwidth())
        .map(|l| norm * fc.get(l, m, mp))
        .collect();
    CxVector::from_data(data, Orientation::Column)
}

fn commit_runs(synthesis: &mut Grid3, runs: &[GridRun]) {
    for run in runs {
        for (k, &v) in run.s.as_slice().iter().enumerate() {
            synthesis.set(run.row, run.col, k, v);
        }
    }
}

/// Synthesis counterpart of the eight axis/diagonal cases per M.
fn axis_and_diagonal_synthesis(
    fc: &SoftCoefficients,
    bandwidth: usize,
    norm: f64,
    m: usize,
) -> SoftResult<Vec<GridRun>> {
    let bw2 = 2 * bandwidth;
    let mi = m as i32;
    let mut runs = Vec::with_capacity(8);

    let mut d = Matrix::new(bandwidth - m, bw2);
    wigner_d_matrix(&mut d, bandwidth, mi, 0)?;
    d.scale(-1.0);
    d.transpose();

    // f_{M,0}
    let sh = coefficient_run(fc, norm, mi, 0);
    runs.push(GridRun {
        row: 0,
        col: m,
        s: d.mul_vector(&sh),
    });

    // f_{0,M}
    let mut sh = coefficient_run(fc, norm, 0, mi);
    if m % 2 == 1 {
        sh.scale(-1.0);
    }
    runs.push(GridRun {
        row: m,
        col: 0,
        s: d.mul_vector(&sh),
    });

    // On the transposed matrix the β → π-β reuse is a row flip.
    flipud(&mut d);

    // f_{-M,0}
    let mut sh = coefficient_run(fc, norm, -mi, 0);
    sh.negate_alternate(if m % 2 == 1 { 0 } else { 1 });
    runs.push(GridRun {
        row: 0,
        col: bw2 - m,
        s: d.mul_vector(&sh),
    });

    // f_{0,-M}
    let mut sh = coefficient_run(fc, norm, 0, -mi);
    sh.negate_alternate(1);
    runs.push(GridRun {
        row: bw2 - m,
        col: 0,
        s: d.mul_vector(&sh),
    });

    // Diagonal orders need their own matrix.
    let mut d = Matrix::new(bandwidth - m, bw2);
    wigner_d_matrix(&mut d, bandwidth, mi, mi)?;
    d.scale(-1.0);
    d.transpose();

    // f_{M,M}
    let sh = coefficient_run(fc, norm, mi, mi);
    runs.push(GridRun {
        row: m,
        col: m,
        s: d.mul_vector(&sh),
    });

    // f_{-M,-M}
    let sh = coefficient_run(fc, norm, -mi, -mi);
    runs.push(GridRun {
        row: bw2 - m,
        col: bw2 - m,
        s: d.mul_vector(&sh),
    });

    flipud_ne2ndocol(&mut d);

    // f_{M,-M}
    let sh = coefficient_run(fc, norm, mi, -mi);
    runs.push(GridRun {
        row: bw2 - m,
        col: m,
        s: d.mul_vector(&sh),
    });

    // f_{-M,M}
    let sh = coefficient_run(fc, norm, -mi, mi);
    runs.push(GridRun {
        row: m,
        col: bw2 - m,
        s: d.mul_vector(&sh),
    });

    Ok(runs)
}

/// Synthesis counterpart of the eight off-diagonal cases per fused pair.
fn off_diagonal_synthesis(
    fc: &SoftCoefficients,
    bandwidth: usize,
    norm: f64,
    mmp: usize,
) -> SoftResult<Vec<GridRun>> {
    let bw2 = 2 * bandwidth;
    let (m, mp) = split_order_pair(bandwidth, mmp);
    let (mi, mpi) = (m as i32, mp as i32);
    let even_gap = (m - mp) % 2 == 0;
    let mut runs = Vec::with_capacity(8);

    let mut d = Matrix::new(bandwidth - m, bw2);
    wigner_d_matrix(&mut d, bandwidth, mi, mpi)?;
    d.transpose();

    // f_{M,M'}: the base-row sign rides on the coefficient vector here.
    let mut sh = coefficient_run(fc, norm, mi, mpi);
    sh.scale(-1.0);
    runs.push(GridRun {
        row: mp,
        col: m,
        s: d.mul_vector(&sh),
    });

    // f_{M',M}
    let mut sh = coefficient_run(fc, norm, mpi, mi);
    if even_gap {
        sh.scale(-1.0);
    }
    runs.push(GridRun {
        row: m,
        col: mp,
        s: d.mul_vector(&sh),
    });

    // f_{-M,-M'}
    let mut sh = coefficient_run(fc, norm, -mi, -mpi);
    if even_gap {
        sh.scale(-1.0);
    }
    runs.push(GridRun {
        row: bw2 - mp,
        col: bw2 - m,
        s: d.mul_vector(&sh),
    });

    // f_{-M',-M}
    let mut sh = coefficient_run(fc, norm, -mpi, -mi);
    sh.scale(-1.0);
    runs.push(GridRun {
        row: bw2 - m,
        col: bw2 - mp,
        s: d.mul_vector(&sh),
    });

    flipud_ne2ndecol(&mut d);

    // f_{M',-M}
    let sh = coefficient_run(fc, norm, mpi, -mi);
    runs.push(GridRun {
        row: bw2 - m,
        col: mp,
        s: d.mul_vector(&sh),
    });

    // f_{M,-M'}
    let sh = coefficient_run(fc, norm, mi, -mpi);
    runs.push(GridRun {
        row: bw2 - mp,
        col: m,
        s: d.mul_vector(&sh),
    });

    if !even_gap {
        d.scale(-1.0);
    }

    // f_{-M',M}
    let sh = coefficient_run(fc, norm, -mpi, mi);
    runs.push(GridRun {
        row: m,
        col: bw2 - mp,
        s: d.mul_vector(&sh),
    });

    // f_{-M,M'}
    let sh = coefficient_run(fc, norm, -mi, mpi);
    runs.push(GridRun {
        row: mp,
        col: bw2 - m,
        s: d.mul_vector(&sh),
    });

    Ok(runs)
}
