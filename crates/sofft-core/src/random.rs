//! Random seeding of coefficient containers and vectors
//!
//! Test and benchmark helpers that fill transform inputs with uniformly
//! distributed complex values. Each coefficient receives two independent
//! draws, real part first, walking degrees outward and orders M, then M' from
//! -l to l, so a fixed seed always produces the same container.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::{Distribution, Uniform};
use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::coefficients::SoftCoefficients;
use crate::types::{Complex, SoftError, SoftResult};
use crate::vector::CxVector;

/// Random engine selection for the fill helpers.
///
/// `Default` is the rand crate's cryptographically seeded standard engine;
/// `Small` trades quality for speed in large benchmark sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    #[default]
    Default,
    Small,
}

/// Fill `fc` with uniform values in `[min, max]`, seeded from the wall
/// clock.
pub fn fill_coefficients(
    fc: &mut SoftCoefficients,
    min: f64,
    max: f64,
    engine: Engine,
) -> SoftResult<()> {
    fill_coefficients_seeded(fc, min, max, engine, time_seed())
}

/// Fill `fc` with uniform values in `[min, max]` from an explicit seed.
pub fn fill_coefficients_seeded(
    fc: &mut SoftCoefficients,
    min: f64,
    max: f64,
    engine: Engine,
    seed: u64,
) -> SoftResult<()> {
    check_range(min, max)?;
    match engine {
        Engine::Default => fill_container(fc, min, max, &mut StdRng::seed_from_u64(seed)),
        Engine::Small => fill_container(fc, min, max, &mut SmallRng::seed_from_u64(seed)),
    }
    Ok(())
}

/// Fill a complex vector with uniform values in `[min, max]`, seeded from
/// the wall clock.
pub fn fill_vector(vec: &mut CxVector, min: f64, max: f64) -> SoftResult<()> {
    check_range(min, max)?;
    let mut rng = StdRng::seed_from_u64(time_seed());
    let dist = Uniform::new_inclusive(min, max);
    for v in vec.as_mut_slice() {
        let re = dist.sample(&mut rng);
        let im = dist.sample(&mut rng);
        *v = Complex::new(re, im);
    }
    Ok(())
}

fn check_range(min: f64, max: f64) -> SoftResult<()> {
    if min > max {
        warn!(min, max, "min value is greater than max value in random fill");
        return Err(SoftError::EmptyRandomRange { min, max });
    }
    Ok(())
}

fn fill_container<R: Rng>(fc: &mut SoftCoefficients, min: f64, max: f64, rng: &mut R) {
    let dist = Uniform::new_inclusive(min, max);
    for l in 0..fc.bandwidth() {
        let li = l as i32;
        for m in -li..=li {
            for mp in -li..=li {
                let re = dist.sample(rng);
                let im = dist.sample(rng);
                fc.set(l, m, mp, Complex::new(re, im));
            }
        }
    }
}

fn time_seed() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    now.as_micros() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Orientation;

    #[test]
    fn test_seeded_fill_is_reproducible() {
        let mut a = SoftCoefficients::new(4);
        let mut b = SoftCoefficients::new(4);
        fill_coefficients_seeded(&mut a, -1.0, 1.0, Engine::Default, 77).unwrap();
        fill_coefficients_seeded(&mut b, -1.0, 1.0, Engine::Default, 77).unwrap();
        assert_eq!(a.max_abs_diff(&b), 0.0);
    }

    #[test]
    fn test_engines_produce_distinct_streams() {
        let mut a = SoftCoefficients::new(4);
        let mut b = SoftCoefficients::new(4);
        fill_coefficients_seeded(&mut a, -1.0, 1.0, Engine::Default, 77).unwrap();
        fill_coefficients_seeded(&mut b, -1.0, 1.0, Engine::Small, 77).unwrap();
        assert!(a.max_abs_diff(&b) > 0.0);
    }

    #[test]
    fn test_values_respect_the_range() {
        let mut fc = SoftCoefficients::new(6);
        fill_coefficients_seeded(&mut fc, 0.25, 0.75, Engine::Default, 3).unwrap();
        fc.for_each(|_, _, _, v| {
            assert!((0.25..=0.75).contains(&v.re));
            assert!((0.25..=0.75).contains(&v.im));
        });
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let mut fc = SoftCoefficients::new(2);
        let err = fill_coefficients(&mut fc, 1.0, -1.0, Engine::Default).unwrap_err();
        assert!(matches!(err, SoftError::EmptyRandomRange { .. }));
        assert_eq!(fc.energy(), 0.0);
    }

    #[test]
    fn test_vector_fill_covers_every_entry() {
        let mut v = CxVector::new(16, Orientation::Column);
        fill_vector(&mut v, 0.5, 1.5).unwrap();
        assert!(v.as_slice().iter().all(|c| c.re >= 0.5 && c.im >= 0.5));
    }
}
