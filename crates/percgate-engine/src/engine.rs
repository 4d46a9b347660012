//! The real-time gate state machine.
//!
//! [`GateEngine`] consumes one detection frame per sample (mono downmix
//! plus raw per-channel peak), drives an asymmetric envelope follower,
//! transient/hold logic, and a soft-knee closing curve, and produces the
//! gain applied to every channel of that frame.
//!
//! All numeric run parameters live in a [`GateConfig`] snapshot derived
//! once per reconfiguration from `(settings, sample rate, profile)`.
//! Deriving may allocate (filter banks are built there); the per-sample
//! path never does. Installing a new snapshot keeps the envelope and
//! hold counter, so a parameter tweak does not make the gate forget that
//! a hit just happened.

use libm::{expf, powf, roundf};
use percgate_core::{db_to_linear, flush_denormal, lerp};

use crate::detector::BandDetector;
use crate::profile::DrumProfile;
use crate::sidechain::SidechainEq;

/// Fixed ceiling on sidechain amplification, dB. The conditioned
/// detection signal may exceed the raw peak by at most this much.
const DETECTION_BOOST_DB: f32 = 12.0;

/// Absolute detection cap, in units of the boost ceiling.
const DETECTION_CAP: f32 = 8.0;

/// Raw-peak margin over the threshold that counts as a transient.
const TRANSIENT_FACTOR: f32 = 1.3;

/// Hysteresis point used when no profile is supplied.
const DEFAULT_HYSTERESIS: f32 = 0.6;

/// Closing-curve exponent used when no profile is supplied.
const DEFAULT_CURVE: f32 = 1.45;

/// Closed-state floor used when no profile is supplied, dB.
const DEFAULT_FLOOR_DB: f32 = -18.0;

/// Floor the interpolation targets as the threshold approaches 0 dB.
const AGGRESSIVE_FLOOR_DB: f32 = -60.0;

/// Lower bound on the linear threshold, guarding the ratio division.
const THRESHOLD_EPSILON: f32 = 1e-6;

/// Shortest effective attack/release the coefficient math will accept.
const MIN_ATTACK_S: f32 = 0.0004;
const MIN_RELEASE_S: f32 = 0.001;

/// Hold duration is derived from the release time, floored here.
const HOLD_BASE_MIN_S: f32 = 0.025;
const HOLD_RELEASE_RATIO: f32 = 0.85;

/// ln(1000): release smoothing follows the -60 dB decay convention, so
/// the envelope sheds 99.9% of its excess over one release period.
const RELEASE_DECAY_LN: f32 = 6.907_755;

/// User-tunable gate parameters.
///
/// Replaced wholesale by the caller; every replacement must go through
/// [`GateEngine::reconfigure`] before more samples are processed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateSettings {
    /// Open threshold in dBFS.
    pub threshold_db: f32,
    /// Envelope attack time, seconds.
    pub attack_s: f32,
    /// Envelope release time, seconds.
    pub release_s: f32,
    /// When false the gate is bypassed entirely.
    pub active: bool,
    /// Whether these values came from the auto-suggestion analyzer.
    pub auto_applied: bool,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            threshold_db: -24.0,
            attack_s: 0.001,
            release_s: 0.12,
            active: true,
            auto_applied: false,
        }
    }
}

/// Immutable run-parameter snapshot derived from
/// `(GateSettings, DrumProfile, sample rate)`.
///
/// Owns the detection filter bank and sidechain EQ, so installing a
/// snapshot is the only thing a host must publish across the real-time
/// boundary.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub(crate) threshold_linear: f32,
    pub(crate) close_ratio: f32,
    pub(crate) attack_coeff: f32,
    pub(crate) release_coeff: f32,
    pub(crate) hold_samples: u32,
    pub(crate) floor_gain: f32,
    pub(crate) curve: f32,
    pub(crate) focus_weight: f32,
    pub(crate) detection_boost: f32,
    pub(crate) detection_cap: f32,
    pub(crate) detector: Option<BandDetector>,
    pub(crate) sidechain: Option<SidechainEq>,
}

impl GateConfig {
    /// Derive a snapshot, or `None` when the settings are inactive (or
    /// the sample rate is unusable). May allocate; call off the audio
    /// thread.
    pub fn derive(
        settings: &GateSettings,
        sample_rate: f32,
        profile: Option<&DrumProfile>,
    ) -> Option<Self> {
        if !settings.active || sample_rate <= 0.0 {
            return None;
        }

        let threshold_linear = db_to_linear(settings.threshold_db).max(THRESHOLD_EPSILON);

        let close_ratio = profile
            .map_or(DEFAULT_HYSTERESIS, |p| p.hysteresis_ratio)
            .clamp(0.25, 0.95);

        // The closer the threshold sits to 0 dB, the harder the closed
        // state leans toward silence; at -24 dB and below the profile's
        // gentler nominal floor is used unmodified.
        let tightness = ((settings.threshold_db + 24.0) / 24.0).clamp(0.0, 1.0);
        let nominal_floor = profile.map_or(DEFAULT_FLOOR_DB, |p| p.floor_db);
        let floor_gain = db_to_linear(lerp(nominal_floor, AGGRESSIVE_FLOOR_DB, tightness));

        let curve = profile.map_or(DEFAULT_CURVE, |p| p.curve).clamp(1.1, 3.0);

        let mut hold_s = (settings.release_s * HOLD_RELEASE_RATIO).max(HOLD_BASE_MIN_S);
        if let Some(p) = profile {
            hold_s = hold_s.clamp(p.hold_min_s, p.hold_max_s);
        }
        let hold_samples = (roundf(sample_rate * hold_s) as u32).max(1);

        let attack_coeff = if settings.attack_s > 0.0 {
            expf(-1.0 / (sample_rate * settings.attack_s.max(MIN_ATTACK_S)))
        } else {
            0.0
        };
        let release_coeff = if settings.release_s > 0.0 {
            expf(-RELEASE_DECAY_LN / (sample_rate * settings.release_s.max(MIN_RELEASE_S)))
        } else {
            0.0
        };

        let detection_boost = db_to_linear(DETECTION_BOOST_DB);
        let detector = profile.and_then(|p| BandDetector::new(&p.focus_bands, sample_rate));
        let sidechain = profile
            .map(|p| SidechainEq::from_profile(p, sample_rate))
            .filter(|eq| !eq.is_empty());

        Some(Self {
            threshold_linear,
            close_ratio,
            attack_coeff,
            release_coeff,
            hold_samples,
            floor_gain,
            curve,
            focus_weight: profile.map_or(1.0, |p| p.focus_weight),
            detection_boost,
            detection_cap: DETECTION_CAP * detection_boost,
            detector,
            sidechain,
        })
    }

    /// Linear open threshold.
    pub fn threshold_linear(&self) -> f32 {
        self.threshold_linear
    }

    /// Envelope-to-threshold ratio below which the gate starts closing.
    /// Always strictly inside (0, 1).
    pub fn close_ratio(&self) -> f32 {
        self.close_ratio
    }

    /// Post-hit hold duration in samples.
    pub fn hold_samples(&self) -> u32 {
        self.hold_samples
    }

    /// Closed-state leak gain.
    pub fn floor_gain(&self) -> f32 {
        self.floor_gain
    }
}

/// Sidechain-triggered percussion gate.
///
/// Construct once per stream, [`reconfigure`](Self::reconfigure) on
/// every settings/profile/sample-rate change (between buffers, never
/// mid-buffer), then drive with
/// [`process_block`](crate::block) once per sample block. Processing
/// never fails, allocates, or blocks.
#[derive(Debug, Clone)]
pub struct GateEngine {
    config: Option<GateConfig>,
    envelope: f32,
    hold_counter: u32,
    last_gain: f32,
}

impl Default for GateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GateEngine {
    /// Create an unconfigured engine; until configured it passes audio
    /// through untouched.
    pub fn new() -> Self {
        Self {
            config: None,
            envelope: 0.0,
            hold_counter: 0,
            last_gain: 1.0,
        }
    }

    /// Derive and install a fresh config snapshot.
    ///
    /// Returns whether the gate is now active. Inactive settings clear
    /// the config; subsequent processing is a passthrough. The envelope
    /// and hold counter survive, so the gate's physical state is
    /// continuous across parameter changes.
    ///
    /// Not real-time safe; call from a control context only (see
    /// [`handoff`](crate::handoff) for concurrent hosts).
    pub fn reconfigure(
        &mut self,
        settings: &GateSettings,
        sample_rate: f32,
        profile: Option<&DrumProfile>,
    ) -> bool {
        self.install(GateConfig::derive(settings, sample_rate, profile));
        self.is_active()
    }

    /// Swap in a pre-derived snapshot, returning the retired one.
    ///
    /// Allocation-free; this is the audio-thread half of a concurrent
    /// reconfiguration (the retired snapshot is handed back so its
    /// filters are freed elsewhere).
    pub fn install(&mut self, config: Option<GateConfig>) -> Option<GateConfig> {
        core::mem::replace(&mut self.config, config)
    }

    /// Whether a config is installed and gating will occur.
    pub fn is_active(&self) -> bool {
        self.config.is_some()
    }

    /// Installed config snapshot, if any.
    pub fn config(&self) -> Option<&GateConfig> {
        self.config.as_ref()
    }

    /// Gain applied to the most recent frame (1.0 before any processing).
    pub fn last_gain(&self) -> f32 {
        self.last_gain
    }

    /// Gain reduction on the most recent frame, in positive dB.
    pub fn gain_reduction_db(&self) -> f32 {
        -percgate_core::linear_to_db(self.last_gain.max(1e-6)).min(0.0)
    }

    /// Current envelope level (linear).
    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    /// Advance the state machine by one frame and return the gain for
    /// that frame.
    ///
    /// `mono` is the channel average, `raw_peak` the largest absolute
    /// per-channel sample, both normalized to full scale.
    #[inline]
    pub(crate) fn advance(&mut self, mono: f32, raw_peak: f32) -> f32 {
        let Some(config) = self.config.as_mut() else {
            self.last_gain = 1.0;
            return 1.0;
        };

        let sidechain = match config.sidechain.as_mut() {
            Some(eq) => eq.process(mono),
            None => mono,
        };
        let broadband = sidechain.abs();
        let focus = config
            .detector
            .as_mut()
            .map_or(0.0, |d| d.process(sidechain) * config.focus_weight);

        // Detection favors the louder of broadband/focus but is clamped
        // against runaway amplification: never below the raw peak (a
        // loud hit is never missed), never more than the boost ceiling
        // above it (a narrow sidechain lift cannot fabricate a hit out
        // of noise).
        let boosted_limit = (raw_peak * config.detection_boost).max(raw_peak);
        let detected = raw_peak.max(config.detection_cap.min(DETECTION_CAP.min(
            boosted_limit.min(broadband.max(focus)),
        )));

        let coeff = if detected > self.envelope {
            config.attack_coeff
        } else {
            config.release_coeff
        };
        self.envelope = flush_denormal(coeff * (self.envelope - detected) + detected);

        let ratio = self.envelope / config.threshold_linear;
        // Checked against the raw, unsmoothed peak so envelope lag never
        // swallows a fast transient.
        let transient_hit = raw_peak >= config.threshold_linear * TRANSIENT_FACTOR;

        if ratio >= 1.0 {
            self.hold_counter = config.hold_samples;
        }
        if transient_hit {
            self.hold_counter = self.hold_counter.max(config.hold_samples);
            self.envelope = self.envelope.max(raw_peak);
        }

        let gain = if transient_hit {
            1.0
        } else if self.hold_counter > 0 {
            self.hold_counter -= 1;
            1.0
        } else if ratio >= config.close_ratio {
            closing_gain(ratio, config.close_ratio, config.curve, config.floor_gain)
        } else {
            config.floor_gain
        };

        self.last_gain = gain;
        gain
    }
}

/// Soft-knee ramp from `close_ratio` (floor) up to 1.0 (unity).
#[inline]
fn closing_gain(ratio: f32, close_ratio: f32, curve: f32, floor_gain: f32) -> f32 {
    let position = ((ratio - close_ratio) / (1.0 - close_ratio)).clamp(0.0, 1.0);
    powf(position, curve).max(floor_gain)
}
