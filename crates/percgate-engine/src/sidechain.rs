//! Sidechain conditioning EQ: the filter cascade feeding detection.
//!
//! The detection signal is not the raw input. A profile's corrective EQ
//! first strips rumble and out-of-class energy (high-pass, low-pass,
//! bleed cuts) and lifts the class's own spectral fingerprint (emphasis
//! peaks) so the envelope follower reacts to hits, not bleed.
//!
//! Stage order is fixed: high-pass, low-pass, emphasis peaks in listed
//! order, bleed cuts in listed order. A stage whose filter design fails
//! for the given sample rate is omitted and the rest of the chain keeps
//! working.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::f32::consts::FRAC_1_SQRT_2;
use percgate_core::Biquad;

use crate::profile::DrumProfile;

/// Ordered cascade of conditioning filters built from a [`DrumProfile`].
#[derive(Debug, Clone)]
pub struct SidechainEq {
    stages: Vec<Biquad>,
}

impl SidechainEq {
    /// Build the conditioning chain for `sample_rate`.
    ///
    /// Never fails: invalid stages are dropped, and an empty chain acts
    /// as a passthrough.
    pub fn from_profile(profile: &DrumProfile, sample_rate: f32) -> Self {
        let mut stages = Vec::new();

        if let Some(cutoff) = profile.sidechain_hp_hz
            && let Some(filter) = Biquad::highpass(cutoff, FRAC_1_SQRT_2, sample_rate)
        {
            stages.push(filter);
        }
        if let Some(cutoff) = profile.sidechain_lp_hz
            && let Some(filter) = Biquad::lowpass(cutoff, FRAC_1_SQRT_2, sample_rate)
        {
            stages.push(filter);
        }
        for point in &profile.emphasis {
            if let Some(filter) = Biquad::peaking(point.freq_hz, point.q, point.gain_db, sample_rate)
            {
                stages.push(filter);
            }
        }
        for point in &profile.bleed_cuts {
            if let Some(filter) = Biquad::peaking(point.freq_hz, point.q, point.gain_db, sample_rate)
            {
                stages.push(filter);
            }
        }

        Self { stages }
    }

    /// Run one sample through every stage in order.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut sample = input;
        for stage in &mut self.stages {
            sample = stage.process(sample);
        }
        sample
    }

    /// Number of stages that survived construction.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Whether every stage was dropped (chain is a passthrough).
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Clear all filter history.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{DrumClass, EqPoint, FrequencyBand, profile_for};
    use core::f32::consts::PI;

    #[cfg(not(feature = "std"))]
    use alloc::vec;

    fn sine_peak(eq: &mut SidechainEq, freq: f32, sample_rate: f32) -> f32 {
        let total = (sample_rate * 0.5) as usize;
        let settle = total / 2;
        let mut peak = 0.0f32;
        for n in 0..total {
            let x = (2.0 * PI * freq * n as f32 / sample_rate).sin();
            let y = eq.process(x);
            if n >= settle {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn stage_order_and_count_follow_the_profile() {
        let profile = profile_for(Some(&DrumClass::Snare));
        let eq = SidechainEq::from_profile(&profile, 44100.0);
        // HP + LP + 2 emphasis + 2 cuts
        assert_eq!(eq.stage_count(), 6);
    }

    #[test]
    fn invalid_stages_are_dropped_not_fatal() {
        let profile = DrumProfile {
            focus_bands: vec![FrequencyBand::new(100.0, 400.0, 1.0)],
            floor_db: -18.0,
            hold_min_s: 0.05,
            hold_max_s: 0.1,
            hysteresis_ratio: 0.6,
            threshold_bias_db: 0.0,
            focus_weight: 1.0,
            curve: 1.45,
            // Both cutoffs past Nyquist for this sample rate
            sidechain_hp_hz: Some(30000.0),
            sidechain_lp_hz: Some(40000.0),
            emphasis: vec![EqPoint::new(1000.0, 3.0, 1.0)],
            bleed_cuts: vec![EqPoint::new(50000.0, -3.0, 1.0)],
        };
        let eq = SidechainEq::from_profile(&profile, 44100.0);
        assert_eq!(eq.stage_count(), 1, "only the 1 kHz emphasis survives");
    }

    #[test]
    fn empty_chain_is_a_passthrough() {
        let profile = DrumProfile {
            focus_bands: vec![FrequencyBand::new(100.0, 400.0, 1.0)],
            floor_db: -18.0,
            hold_min_s: 0.05,
            hold_max_s: 0.1,
            hysteresis_ratio: 0.6,
            threshold_bias_db: 0.0,
            focus_weight: 1.0,
            curve: 1.45,
            sidechain_hp_hz: None,
            sidechain_lp_hz: None,
            emphasis: Vec::new(),
            bleed_cuts: Vec::new(),
        };
        let mut eq = SidechainEq::from_profile(&profile, 44100.0);
        assert!(eq.is_empty());
        for i in 0..64 {
            let x = (i as f32 * 0.31).sin();
            assert_eq!(eq.process(x), x);
        }
    }

    #[test]
    fn hihat_chain_rejects_lows() {
        let profile = profile_for(Some(&DrumClass::HiHat));
        let sample_rate = 44100.0;
        let mut at_low = SidechainEq::from_profile(&profile, sample_rate);
        let mut at_high = SidechainEq::from_profile(&profile, sample_rate);

        let low = sine_peak(&mut at_low, 100.0, sample_rate);
        let high = sine_peak(&mut at_high, 7500.0, sample_rate);
        assert!(
            low < high * 0.1,
            "hat sidechain must crush lows: {low} vs {high}"
        );
    }

    #[test]
    fn silence_stays_silent() {
        let profile = profile_for(Some(&DrumClass::Kick));
        let mut eq = SidechainEq::from_profile(&profile, 48000.0);
        for _ in 0..4096 {
            assert_eq!(eq.process(0.0), 0.0);
        }
    }
}
