//! Math utilities shared across the gate DSP path.
//!
//! Allocation-free, `no_std` friendly. Transcendental functions go through
//! `libm` so the same code builds without `std`.

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use percgate_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Input is floored at 1e-10 so silence maps to a large negative value
/// instead of -inf.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Linear interpolation between `a` (at t=0) and `b` (at t=1).
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Flush subnormal floats to zero.
///
/// Subnormals in IIR feedback paths cause large CPU spikes on most
/// architectures; anything below 1e-20 carries no audible signal.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_linear_roundtrip() {
        let original = 0.5;
        let db = linear_to_db(original);
        let back = db_to_linear(db);
        assert!((original - back).abs() < 1e-5);
    }

    #[test]
    fn db_known_values() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(-6.0206) - 0.5).abs() < 0.001);
        assert!((db_to_linear(-24.0) - 0.0631).abs() < 0.001);
        assert!((linear_to_db(1.0)).abs() < 1e-5);
    }

    #[test]
    fn linear_to_db_floors_silence() {
        assert!(linear_to_db(0.0) <= -190.0);
        assert!(linear_to_db(-1.0) <= -190.0);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(-18.0, -60.0, 0.0), -18.0);
        assert_eq!(lerp(-18.0, -60.0, 1.0), -60.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn flush_denormal_passes_normal_values() {
        assert_eq!(flush_denormal(1.0), 1.0);
        assert_eq!(flush_denormal(-0.5), -0.5);
        assert_eq!(flush_denormal(1e-21), 0.0);
        assert_eq!(flush_denormal(1e-38), 0.0);
    }
}
