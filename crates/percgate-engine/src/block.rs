//! Block processing over planar channel buffers.
//!
//! The host delivers N mutable per-channel buffers of equal length per
//! block; the engine mutates them in place. Two sample formats are
//! supported at this boundary: 32-bit float and 16-bit signed PCM.
//! Integer samples are normalized against full scale (32768) for
//! detection and rounded/clamped back on write.

use crate::engine::GateEngine;

/// Full-scale magnitude of a 16-bit PCM sample.
const I16_SCALE: f32 = 32768.0;

/// A sample format the gate can process in place.
///
/// Conversions must round-trip exactly at unity gain so an open (or
/// inactive) gate leaves buffers bit-for-bit untouched.
pub trait Sample: Copy {
    /// Normalize to full-scale float.
    fn to_f32(self) -> f32;
    /// Convert back from full-scale float, rounding and clamping to the
    /// representable range.
    fn from_f32(value: f32) -> Self;
}

impl Sample for f32 {
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }
}

impl Sample for i16 {
    #[inline]
    fn to_f32(self) -> f32 {
        f32::from(self) / I16_SCALE
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        libm::roundf(value * I16_SCALE).clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
    }
}

impl GateEngine {
    /// Gate one block of planar channel buffers in place.
    ///
    /// Channels are downmixed by averaging for detection; the same gain
    /// is applied to every channel of a frame, so imaging is preserved.
    /// Unequal buffer lengths process up to the shortest. Real-time
    /// safe: no allocation, no locking, no failure path. Unconfigured
    /// or inactive engines return without touching the buffers.
    pub fn process_block<S: Sample>(&mut self, channels: &mut [&mut [S]]) {
        if !self.is_active() || channels.is_empty() {
            return;
        }

        let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
        let channel_count = channels.len() as f32;

        for frame in 0..frames {
            let mut sum = 0.0f32;
            let mut raw_peak = 0.0f32;
            for channel in channels.iter() {
                let value = channel[frame].to_f32();
                sum += value;
                raw_peak = raw_peak.max(value.abs());
            }

            let gain = self.advance(sum / channel_count, raw_peak);

            for channel in channels.iter_mut() {
                let value = channel[frame].to_f32();
                channel[frame] = S::from_f32(value * gain);
            }
        }
    }
}
