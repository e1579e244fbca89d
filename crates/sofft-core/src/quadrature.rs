//! Quadrature weights for the discrete Wigner transform
//!
//! The β-sum of the discrete SO(3) transform is only exact for band-limited
//! integrands when each sample β_k = π(2k+1)/(4B) is weighted. For bandwidth
//! B the 2B weights are
//!
//! ```text
//! w_B(j) = (2/B)·sin(π(2j+1)/(4B)) · Σ_{k=0}^{B-1} 1/(2k+1) · sin((2j+1)(2k+1)π/(4B))
//! ```
//!
//! The weight vector is symmetric, `w_B(j) = w_B(2B-1-j)`, so only the first
//! half is computed and the tail is mirrored.

use std::f64::consts::PI;

use tracing::warn;

use crate::types::{SoftError, SoftResult};

/// Fill `out` with the 2B quadrature weights, where `out.len() == 2B`.
///
/// Deterministic in the buffer length alone. Fails without touching the
/// buffer when the length is odd, since an odd buffer has no bandwidth.
pub fn quadrature_weights(out: &mut [f64]) -> SoftResult<()> {
    if out.len() % 2 != 0 {
        warn!(
            len = out.len(),
            "uneven vector length in quadrature_weights"
        );
        return Err(SoftError::WeightsLengthOdd(out.len()));
    }

    let bandwidth = out.len() / 2;
    for j in 0..bandwidth {
        let arg = (2.0 * j as f64 + 1.0) * PI / (4.0 * bandwidth as f64);
        let mut sum = 0.0;
        for k in 0..bandwidth {
            sum += 1.0 / (2.0 * k as f64 + 1.0) * ((2.0 * k as f64 + 1.0) * arg).sin();
        }

        let wj = 2.0 / bandwidth as f64 * arg.sin() * sum;
        out[j] = wj;
        out[2 * bandwidth - 1 - j] = wj;
    }

    Ok(())
}
