//! Wigner-d matrices by three-term recurrence
//!
//! The polar variable of the SO(3) transform is handled by dense matrices of
//! L²-normalized Wigner-d values. For orders (M, M') with J = max(|M|, |M'|)
//! the matrix has one row per degree l = J..B-1 and one column per polar
//! sample β_k = π(2k+1)/(4B):
//!
//! ```text
//!     ⎛ d̃^J    (β_0) ⋯ d̃^J    (β_{2B-1}) ⎞
//! D = ⎜ d̃^{J+1}(β_0) ⋯ d̃^{J+1}(β_{2B-1}) ⎟
//!     ⎜      ⋮                  ⋮          ⎟
//!     ⎝ d̃^{B-1}(β_0) ⋯ d̃^{B-1}(β_{2B-1}) ⎠
//! ```
//!
//! The base row l = J is evaluated in closed half-angle form; every further
//! row follows from the stable upward three-term recurrence in l. The base
//! row carries a sign convention that the transform drivers cancel case by
//! case, so these matrices are only meaningful through those drivers.
//!
//! The weighted variant multiplies the base row by the quadrature weights;
//! the recurrence is linear in the row values, so the weights propagate to
//! every degree without further work.

use std::f64::consts::PI;

use tracing::warn;

use crate::matrix::Matrix;
use crate::types::{SoftError, SoftResult};

/// Fill `wig` with L²-normalized Wigner-d values for orders (`m`, `mp`).
///
/// `wig` must be `(bandwidth - J) × 2·bandwidth` with J = max(|m|, |mp|);
/// on a shape mismatch the matrix is left untouched.
pub fn wigner_d_matrix(
    wig: &mut Matrix<f64>,
    bandwidth: usize,
    m: i32,
    mp: i32,
) -> SoftResult<()> {
    fill(wig, bandwidth, m, mp, None)
}

/// As [`wigner_d_matrix`], with column `k` multiplied by the quadrature
/// weight `weights[k]`.
pub fn weighted_wigner_d_matrix(
    wig: &mut Matrix<f64>,
    bandwidth: usize,
    m: i32,
    mp: i32,
    weights: &[f64],
) -> SoftResult<()> {
    fill(wig, bandwidth, m, mp, Some(weights))
}

fn fill(
    wig: &mut Matrix<f64>,
    bandwidth: usize,
    m: i32,
    mp: i32,
    weights: Option<&[f64]>,
) -> SoftResult<()> {
    let min_j = m.abs().max(mp.abs());
    let expected_rows = bandwidth - min_j as usize;
    let expected_cols = 2 * bandwidth;

    if wig.rows() != expected_rows || wig.cols() != expected_cols {
        warn!(
            rows = wig.rows(),
            cols = wig.cols(),
            m,
            mp,
            bandwidth,
            "dimension mismatch between matrix and orders in wigner_d_matrix"
        );
        return Err(SoftError::WignerShapeMismatch {
            rows: wig.rows(),
            cols: wig.cols(),
            m,
            mp,
            bandwidth,
            expected_rows,
            expected_cols,
        });
    }

    // Normalization of the half-angle base row.
    let mut norm_factor = ((2.0 * min_j as f64 + 1.0) / 2.0).sqrt();
    for i in 0..(min_j - m.abs().min(mp.abs())) {
        norm_factor *= ((2 * min_j - i) as f64 / (i + 1) as f64).sqrt();
    }

    // Global base-row sign; the drivers cancel it case by case.
    let sin_sign = -1.0;

    // Half-angle powers for the four (M, M') configurations.
    let (cos_power, sin_power) = if min_j == m.abs() && m >= 0 {
        (min_j + mp, min_j - mp)
    } else if min_j == m.abs() {
        (min_j - mp, min_j + mp)
    } else if mp >= 0 {
        (min_j + m, min_j - m)
    } else {
        (min_j - m, min_j + m)
    };

    // Base row l = J, with cos β_k cached for the recurrence.
    let mut cos_beta = vec![0.0; 2 * bandwidth];
    for (k, cb) in cos_beta.iter_mut().enumerate() {
        let beta = (2.0 * k as f64 + 1.0) * PI / (4.0 * bandwidth as f64);
        *cb = beta.cos();

        let base = norm_factor
            * sin_sign
            * (0.5 * beta).sin().powi(sin_power)
            * (0.5 * beta).cos().powi(cos_power);
        wig.set(0, k, weights.map_or(base, |w| base * w[k]));
    }

    // Upward recurrence over degrees l = J..B-2, filling row l+1 from rows
    // l and l-1. The l-1 term is absent on the first step.
    let mf = f64::from(m);
    let mpf = f64::from(mp);
    for i in 0..expected_rows.saturating_sub(1) {
        let l = (min_j as usize + i) as f64;

        let norm = ((2.0 * l + 3.0) / (2.0 * l + 1.0)).sqrt();
        let nom = (l + 1.0) * (2.0 * l + 1.0);
        let den =
            1.0 / ((((l + 1.0) * (l + 1.0) - mf * mf) * ((l + 1.0) * (l + 1.0) - mpf * mpf))
                .sqrt());

        let f1 = norm * nom * den;
        let mut f2 = 0.0;
        let mut c1 = 0.0;

        // l = 0 has no l-1 term and no M·M'/(l(l+1)) contribution.
        if min_j as usize + i != 0 {
            let t1 = ((2.0 * l + 3.0) / (2.0 * l - 1.0)).sqrt() * (l + 1.0) / l;
            let t2 = ((l * l - mf * mf) * (l * l - mpf * mpf)).sqrt();

            c1 = -t1 * t2 * den;
            f2 = -mf * mpf / (l * (l + 1.0));
        }

        for k in 0..expected_cols {
            let prev = if i == 0 { 0.0 } else { wig.get(i - 1, k) };
            let next = c1 * prev + wig.get(i, k) * f1 * (f2 + cos_beta[k]);
            wig.set(i + 1, k, next);
        }
    }

    Ok(())
}
