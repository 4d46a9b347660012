//! Percgate Engine - sidechain-triggered noise gate for percussion stems
//!
//! Given an audio stream and a classification of which percussion type it
//! carries (kick, snare, hi-hat, toms, claps/tambourine, or a custom
//! class), the engine attenuates inter-hit bleed while preserving
//! transients. Detection runs through a per-class tuned filter bank and a
//! corrective sidechain EQ; gating is an envelope follower with
//! hysteresis, transient hold, and a soft-knee closing curve.
//!
//! # Pieces
//!
//! - [`DrumProfile`] / [`profile_for`] - immutable per-class tuning
//!   (detection bands, sidechain EQ shape, gate-shape biases)
//! - [`BandDetector`] - weighted bandpass bank producing one focus-energy
//!   scalar per sample
//! - [`SidechainEq`] - ordered conditioning cascade feeding detection
//! - [`GateEngine`] - the real-time state machine; configured through
//!   [`GateEngine::reconfigure`], driven through
//!   [`GateEngine::process_block`]
//! - [`handoff`] (std) - lock-free config publication for hosts that
//!   reconfigure from a control thread while audio runs elsewhere
//!
//! # Real-time contract
//!
//! The per-sample path never allocates, locks, blocks, or fails. All
//! fallibility is confined to configuration time, where invalid filter
//! designs degrade silently (a bad band is dropped, a bad EQ stage is
//! omitted) rather than aborting the stream.
//!
//! # Example
//!
//! ```rust
//! use percgate_engine::{DrumClass, GateEngine, GateSettings, profile_for};
//!
//! let profile = profile_for(Some(&DrumClass::Snare));
//! let settings = GateSettings {
//!     threshold_db: -24.0,
//!     attack_s: 0.001,
//!     release_s: 0.12,
//!     active: true,
//!     auto_applied: false,
//! };
//!
//! let mut gate = GateEngine::new();
//! gate.reconfigure(&settings, 48000.0, Some(&profile));
//!
//! let mut left = vec![0.0f32; 512];
//! let mut right = vec![0.0f32; 512];
//! gate.process_block(&mut [&mut left, &mut right]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod block;
pub mod detector;
pub mod engine;
#[cfg(feature = "std")]
pub mod handoff;
pub mod profile;
pub mod sidechain;

pub use block::Sample;
pub use detector::BandDetector;
pub use engine::{GateConfig, GateEngine, GateSettings};
#[cfg(feature = "std")]
pub use handoff::{GateController, RealtimeGate, handoff};
pub use profile::{DrumClass, DrumProfile, EqPoint, FrequencyBand, profile_for};
pub use sidechain::SidechainEq;
