//! Spectral balance snapshot via the detection filter bank.
//!
//! Rather than an FFT, the snapshot reuses the exact filters the
//! real-time gate will run: the profile's [`SidechainEq`] conditions the
//! signal and the [`BandDetector`] extracts focus energy, so the numbers
//! describe what the gate will actually see.

use percgate_engine::{BandDetector, DrumProfile, SidechainEq};

/// Per-band RMS/peak summary of a decoded clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralSnapshot {
    /// RMS of the focus-band detector output.
    pub focus_rms: f32,
    /// Peak of the focus-band detector output.
    pub focus_peak: f32,
    /// RMS of the conditioned signal the focus bands do not explain.
    pub offband_rms: f32,
    /// RMS of the conditioned (sidechain EQ'd) signal.
    pub broadband_rms: f32,
    /// Peak of the conditioned signal.
    pub broadband_peak: f32,
}

impl SpectralSnapshot {
    /// Run the profile's detection chain over a decoded mono clip.
    ///
    /// Returns `None` for empty input or when no focus band of the
    /// profile yields a valid filter at this sample rate.
    pub fn compute(samples: &[f32], profile: &DrumProfile, sample_rate: f32) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut detector = BandDetector::new(&profile.focus_bands, sample_rate)?;
        let mut eq = SidechainEq::from_profile(profile, sample_rate);

        let mut focus_sq = 0.0f64;
        let mut focus_peak = 0.0f32;
        let mut offband_sq = 0.0f64;
        let mut broadband_sq = 0.0f64;
        let mut broadband_peak = 0.0f32;

        for &sample in samples {
            let conditioned = eq.process(sample);
            let broadband = conditioned.abs();
            let focus = detector.process(conditioned);
            let offband = (broadband - focus).max(0.0);

            focus_sq += f64::from(focus) * f64::from(focus);
            focus_peak = focus_peak.max(focus);
            offband_sq += f64::from(offband) * f64::from(offband);
            broadband_sq += f64::from(broadband) * f64::from(broadband);
            broadband_peak = broadband_peak.max(broadband);
        }

        let n = samples.len() as f64;
        Some(Self {
            focus_rms: (focus_sq / n).sqrt() as f32,
            focus_peak,
            offband_rms: (offband_sq / n).sqrt() as f32,
            broadband_rms: (broadband_sq / n).sqrt() as f32,
            broadband_peak,
        })
    }

    /// Focus-to-offband separation in dB. Large values mean the clip's
    /// energy really does live where the profile expects it.
    pub fn focus_to_off_db(&self) -> f32 {
        20.0 * (self.focus_rms.max(1e-10) / self.offband_rms.max(1e-10)).log10()
    }

    /// Crest factor of the focus signal in dB (peak over RMS). Peakier
    /// material has transients that stand further above its sustain.
    pub fn crest_db(&self) -> f32 {
        20.0 * (self.focus_peak.max(1e-10) / self.focus_rms.max(1e-10)).log10()
    }
}
