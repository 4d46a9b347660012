//! Composite band detector: a weighted bank of bandpass filters.
//!
//! Each focus band of a profile becomes one bandpass [`Biquad`]; per
//! sample the detector reports the single most-excited band, not the sum.
//! Max-pick is deliberate: a broadband out-of-focus transient must not
//! accumulate across irrelevant bands into a false detection.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use percgate_core::Biquad;

use crate::profile::FrequencyBand;

/// Bank of `(bandpass filter, weight)` pairs built from a profile's focus
/// bands.
///
/// Bands whose filter design fails (degenerate edges, band past the
/// usable range for the sample rate) are silently dropped at
/// construction; construction only fails when nothing survives.
#[derive(Debug, Clone)]
pub struct BandDetector {
    bands: Vec<(Biquad, f32)>,
}

impl BandDetector {
    /// Build a detector for `sample_rate`, keeping every band that yields
    /// a valid filter. Returns `None` when all bands are dropped.
    pub fn new(bands: &[FrequencyBand], sample_rate: f32) -> Option<Self> {
        let bands: Vec<(Biquad, f32)> = bands
            .iter()
            .filter_map(|band| {
                Biquad::bandpass(band.low_hz, band.high_hz, sample_rate)
                    .map(|filter| (filter, band.weight))
            })
            .collect();

        if bands.is_empty() {
            None
        } else {
            Some(Self { bands })
        }
    }

    /// Feed one sample through every retained filter and return the
    /// largest weighted rectified output.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut focus = 0.0f32;
        for (filter, weight) in &mut self.bands {
            focus = focus.max(filter.process(input).abs() * *weight);
        }
        focus
    }

    /// Number of bands that survived construction.
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Clear all filter history.
    pub fn reset(&mut self) {
        for (filter, _) in &mut self.bands {
            filter.reset();
        }
    }
}
