//! Percgate Analysis - offline statistics for gate auto-calibration
//!
//! Everything in this crate runs off the real-time path, over decoded
//! mono sample sequences. It provides:
//!
//! - [`window_peaks`] - reduce a waveform to one peak amplitude per
//!   analysis window
//! - [`SpectralSnapshot`] - per-band RMS/peak summary obtained by
//!   running a profile's detection filter bank and sidechain EQ over
//!   the audio
//! - [`suggest`] - propose a starting threshold and release time from
//!   the amplitude distribution and spectral balance
//!
//! All functions are pure: they own no shared state and may run
//! concurrently for different inputs without coordination. Insufficient
//! or ambiguous input yields `None`, never an error - callers fall back
//! to manual defaults.

pub mod snapshot;
pub mod suggest;
pub mod waveform;

pub use snapshot::SpectralSnapshot;
pub use suggest::{Suggestion, suggest};
pub use waveform::{DEFAULT_WINDOW, window_peaks};
