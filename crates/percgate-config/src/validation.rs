//! Session and profile validation.
//!
//! The engine degrades silently on bad filter designs (that contract is
//! deliberate), so the config layer is where a typo in a session file
//! turns into a readable error instead of a gate that quietly does
//! nothing.

use thiserror::Error;

use crate::session::{ProfileDef, Session};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Threshold outside the usable dBFS window.
    #[error("threshold {0} dB out of range [-80, 0]")]
    Threshold(f32),

    /// Attack time out of range.
    #[error("attack {0} s out of range [0, 0.5]")]
    Attack(f32),

    /// Release time out of range.
    #[error("release {0} s out of range [0, 2]")]
    Release(f32),

    /// Profile defined without any focus band.
    #[error("profile has no focus bands")]
    NoBands,

    /// A focus band whose edges are not an ascending positive range.
    #[error("band {low}..{high} Hz is not an ascending positive range")]
    BandEdges {
        /// Lower edge, Hz.
        low: f32,
        /// Upper edge, Hz.
        high: f32,
    },

    /// Non-positive band weight.
    #[error("band weight {0} must be positive")]
    BandWeight(f32),

    /// Hold range not an ascending positive range.
    #[error("hold range {min}..{max} s is not an ascending positive range")]
    HoldRange {
        /// Shortest hold, seconds.
        min: f32,
        /// Longest hold, seconds.
        max: f32,
    },

    /// Hysteresis outside the open unit interval.
    #[error("hysteresis {0} must lie strictly between 0 and 1")]
    Hysteresis(f32),

    /// Closing curve outside the supported exponent range.
    #[error("curve {0} out of range [1.1, 3.0]")]
    Curve(f32),

    /// Non-positive EQ bandwidth.
    #[error("eq q {0} must be positive")]
    EqQ(f32),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a whole session: gate settings plus any custom profile.
pub fn validate_session(session: &Session) -> ValidationResult<()> {
    let mut errors = Vec::new();

    let gate = &session.gate;
    if !(-80.0..=0.0).contains(&gate.threshold_db) {
        errors.push(ValidationError::Threshold(gate.threshold_db));
    }
    if !(0.0..=0.5).contains(&gate.attack_s) {
        errors.push(ValidationError::Attack(gate.attack_s));
    }
    if !(0.0..=2.0).contains(&gate.release_s) {
        errors.push(ValidationError::Release(gate.release_s));
    }

    if let Some(profile) = &session.profile
        && let Err(e) = validate_profile(profile)
    {
        match e {
            ValidationError::Multiple(list) => errors.extend(list),
            single => errors.push(single),
        }
    }

    collect(errors)
}

/// Validate a custom profile definition.
pub fn validate_profile(profile: &ProfileDef) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if profile.bands.is_empty() {
        errors.push(ValidationError::NoBands);
    }
    for band in &profile.bands {
        if band.low_hz <= 0.0 || band.high_hz <= band.low_hz {
            errors.push(ValidationError::BandEdges {
                low: band.low_hz,
                high: band.high_hz,
            });
        }
        if band.weight <= 0.0 {
            errors.push(ValidationError::BandWeight(band.weight));
        }
    }

    let [hold_min, hold_max] = profile.hold_range_s;
    if hold_min <= 0.0 || hold_max <= hold_min {
        errors.push(ValidationError::HoldRange {
            min: hold_min,
            max: hold_max,
        });
    }
    if profile.hysteresis <= 0.0 || profile.hysteresis >= 1.0 {
        errors.push(ValidationError::Hysteresis(profile.hysteresis));
    }
    if !(1.1..=3.0).contains(&profile.curve) {
        errors.push(ValidationError::Curve(profile.curve));
    }
    for point in profile.emphasis.iter().chain(&profile.bleed_cuts) {
        if point.q <= 0.0 {
            errors.push(ValidationError::EqQ(point.q));
        }
    }

    collect(errors)
}

fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.pop().expect("len checked")),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
