//! Percgate Core - DSP primitives for percussion gating
//!
//! This crate provides the filter and math building blocks the gate engine
//! is assembled from, designed for real-time processing with zero
//! allocation in the audio path.
//!
//! # Contents
//!
//! - [`Biquad`] - Second-order IIR filter (Direct Form I) with fallible
//!   RBJ cookbook constructors
//! - Math utilities: [`db_to_linear`], [`linear_to_db`], [`lerp`],
//!   [`flush_denormal`]
//!
//! # Construction failure as absence
//!
//! Filter constructors return `Option` rather than panicking or erroring:
//! an invalid design (non-positive sample rate, degenerate band edges, a
//! zero normalization coefficient) yields `None` and the caller decides
//! whether to drop the stage or fail the whole bank. Nothing in this crate
//! can fail once constructed.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded hosts. Disable the
//! default `std` feature:
//!
//! ```toml
//! [dependencies]
//! percgate-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod math;

pub use biquad::Biquad;
pub use math::{db_to_linear, flush_denormal, lerp, linear_to_db};
