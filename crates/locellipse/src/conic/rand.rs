//! Random error ellipses (axis-range sampling + replay tokens).
//!
//! Model
//! - Draw the major semi-axis uniformly from `major_range`, the minor one as
//!   `major * aspect` with `aspect` from `aspect_range ⊂ (0, 1]`, and the trend
//!   uniformly in `[0, π)`. Build the `c3 = 1` form via `Ellipse::from_principal_axes`.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG,
//!   so any draw in a stream can be regenerated on its own.
//!
//! Code cross-refs: `Ellipse::from_principal_axes`

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ellipse::Ellipse;
use super::types::{Coefficients, Location};
use crate::error::EllipseError;

/// Sampler configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleCfg {
    /// Inclusive range for the major semi-axis; both ends > 0.
    pub major_range: (f64, f64),
    /// Inclusive range for `minor / major`; within `(0, 1]`.
    pub aspect_range: (f64, f64),
}

impl Default for SampleCfg {
    fn default() -> Self {
        Self {
            major_range: (1.0, 50.0),
            aspect_range: (0.1, 1.0),
        }
    }
}

impl SampleCfg {
    fn validate(&self) -> Result<(), EllipseError> {
        let (lo, hi) = self.major_range;
        if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi) {
            return Err(EllipseError::invalid(format!(
                "major_range must satisfy 0 < lo <= hi (got {lo}..={hi})"
            )));
        }
        let (lo, hi) = self.aspect_range;
        if !(lo > 0.0 && lo <= hi && hi <= 1.0) {
            return Err(EllipseError::invalid(format!(
                "aspect_range must lie within (0, 1] with lo <= hi (got {lo}..={hi})"
            )));
        }
        Ok(())
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw `(major, minor, trend)` from `cfg`.
pub fn draw_axes<R: Rng>(rng: &mut R, cfg: &SampleCfg) -> Result<(f64, f64, f64), EllipseError> {
    cfg.validate()?;
    let major = rng.gen_range(cfg.major_range.0..=cfg.major_range.1);
    let aspect = rng.gen_range(cfg.aspect_range.0..=cfg.aspect_range.1);
    let trend = rng.gen::<f64>() * PI;
    Ok((major, major * aspect, trend))
}

/// Draw the coefficients of a random `c3 = 1` ellipse.
pub fn draw_coefficients<R: Rng>(rng: &mut R, cfg: &SampleCfg) -> Result<Coefficients, EllipseError> {
    let (major, minor, trend) = draw_axes(rng, cfg)?;
    let e = Ellipse::<()>::from_principal_axes((), major, minor, trend)?;
    e.coefficients()
        .copied()
        .ok_or(EllipseError::NotInitialized)
}

/// Draw one ellipse centered at the origin location.
pub fn draw_ellipse(cfg: SampleCfg, tok: ReplayToken) -> Result<Ellipse<Location>, EllipseError> {
    let mut rng = tok.to_std_rng();
    let (major, minor, trend) = draw_axes(&mut rng, &cfg)?;
    Ellipse::from_principal_axes(Location::default(), major, minor, trend)
}
