//! Session configuration for the percgate engine.
//!
//! A session is a TOML file carrying everything needed to reproduce a
//! gating pass: the gate settings, the drum classification, and - for
//! the `custom` class - an optional full profile definition (focus
//! bands, floor, hold range, hysteresis, bias, curve, sidechain EQ).
//!
//! Loading validates semantics (band edges ascending, hysteresis inside
//! the unit interval, hold range ordered) before anything reaches the
//! engine, so a bad file fails loudly here instead of degrading
//! silently there.
//!
//! # Example
//!
//! ```rust
//! use percgate_config::Session;
//!
//! let session = Session::from_toml(r#"
//!     class = "snare"
//!
//!     [gate]
//!     threshold_db = -24.0
//!     attack_s = 0.001
//!     release_s = 0.12
//! "#).unwrap();
//!
//! let settings = session.gate_settings();
//! let profile = session.resolve_profile();
//! assert!(settings.active);
//! assert!(!profile.focus_bands.is_empty());
//! ```

mod error;
mod session;

/// Session and profile validation.
pub mod validation;

pub use error::ConfigError;
pub use session::{BandDef, EqPointDef, GateSection, ProfileDef, Session};
pub use validation::{ValidationError, ValidationResult, validate_profile, validate_session};
