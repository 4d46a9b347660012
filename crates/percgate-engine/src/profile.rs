//! Per-class drum profiles: the tuning data behind detection and gating.
//!
//! A [`DrumProfile`] is an immutable record describing where a percussion
//! class lives spectrally (focus bands), how the sidechain should be
//! conditioned before detection (high-pass/low-pass cutoffs, emphasis
//! peaks, bleed cuts), and how the gate should behave for that class
//! (floor level, hold-duration range, hysteresis, threshold bias, curve).
//!
//! Profiles are hand-tuned constants. [`profile_for`] is a total, pure
//! lookup: every class - including unknown/custom ones - resolves to a
//! profile, and nothing at runtime ever mutates one.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};

use core::fmt;
use core::str::FromStr;

/// One detection passband with its relative importance in the bank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    /// Lower band edge in Hz.
    pub low_hz: f32,
    /// Upper band edge in Hz.
    pub high_hz: f32,
    /// Relative weight applied to this band's rectified output.
    pub weight: f32,
}

impl FrequencyBand {
    /// Convenience constructor used by the built-in tables.
    pub const fn new(low_hz: f32, high_hz: f32, weight: f32) -> Self {
        Self {
            low_hz,
            high_hz,
            weight,
        }
    }
}

/// A single peaking-EQ point in the sidechain conditioning chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqPoint {
    /// Center frequency in Hz.
    pub freq_hz: f32,
    /// Boost (positive) or cut (negative) in dB.
    pub gain_db: f32,
    /// Bandwidth control.
    pub q: f32,
}

impl EqPoint {
    /// Convenience constructor used by the built-in tables.
    pub const fn new(freq_hz: f32, gain_db: f32, q: f32) -> Self {
        Self {
            freq_hz,
            gain_db,
            q,
        }
    }
}

/// Percussion classification driving profile lookup.
///
/// The set is closed apart from [`DrumClass::Custom`], which carries an
/// arbitrary label (e.g. a user-defined stem name). Custom classes resolve
/// to the generic profile unless the host supplies its own
/// [`DrumProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DrumClass {
    /// Kick / bass drum.
    Kick,
    /// Snare drum.
    Snare,
    /// Hi-hat, open or closed.
    HiHat,
    /// Rack and floor toms.
    Toms,
    /// Tambourine and shakers.
    Tambourine,
    /// Hand claps.
    Claps,
    /// Anything else, labeled by the host.
    Custom(String),
}

impl fmt::Display for DrumClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrumClass::Kick => write!(f, "kick"),
            DrumClass::Snare => write!(f, "snare"),
            DrumClass::HiHat => write!(f, "hihat"),
            DrumClass::Toms => write!(f, "toms"),
            DrumClass::Tambourine => write!(f, "tambourine"),
            DrumClass::Claps => write!(f, "claps"),
            DrumClass::Custom(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for DrumClass {
    type Err = core::convert::Infallible;

    /// Parse a class name; unknown names become [`DrumClass::Custom`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Ok(match lowered.as_str() {
            "kick" | "bd" | "bassdrum" => DrumClass::Kick,
            "snare" | "sd" => DrumClass::Snare,
            "hihat" | "hi-hat" | "hh" | "hat" | "hats" => DrumClass::HiHat,
            "toms" | "tom" => DrumClass::Toms,
            "tambourine" | "tamb" | "shaker" => DrumClass::Tambourine,
            "claps" | "clap" => DrumClass::Claps,
            _ => DrumClass::Custom(lowered),
        })
    }
}

/// Immutable per-class gate tuning.
///
/// Field semantics:
///
/// - `focus_bands` parameterize the [`BandDetector`](crate::BandDetector)
/// - `floor_db` is the closed-state leak level before threshold tightening
/// - `[hold_min_s, hold_max_s]` bounds the post-hit hold duration
/// - `hysteresis_ratio` is the envelope-to-threshold ratio below which the
///   gate starts closing (strictly below 1, leaving a dead band against
///   chatter)
/// - `threshold_bias_db` shifts auto-suggested thresholds for this class
/// - `focus_weight` scales detector output against the broadband level
/// - `curve` is the soft-knee closing exponent
/// - `sidechain_hp_hz` / `sidechain_lp_hz` / `emphasis` / `bleed_cuts`
///   shape the [`SidechainEq`](crate::SidechainEq)
#[derive(Debug, Clone, PartialEq)]
pub struct DrumProfile {
    /// Detection passbands, most characteristic first.
    pub focus_bands: Vec<FrequencyBand>,
    /// Nominal closed-state level in dB.
    pub floor_db: f32,
    /// Shortest allowed hold, seconds.
    pub hold_min_s: f32,
    /// Longest allowed hold, seconds.
    pub hold_max_s: f32,
    /// Closing hysteresis point as a fraction of the open threshold.
    pub hysteresis_ratio: f32,
    /// Bias applied to suggested thresholds, dB.
    pub threshold_bias_db: f32,
    /// Multiplier on band-detector output.
    pub focus_weight: f32,
    /// Soft-knee closing exponent.
    pub curve: f32,
    /// Optional sidechain high-pass cutoff, Hz.
    pub sidechain_hp_hz: Option<f32>,
    /// Optional sidechain low-pass cutoff, Hz.
    pub sidechain_lp_hz: Option<f32>,
    /// Peaking boosts emphasizing the class's own energy.
    pub emphasis: Vec<EqPoint>,
    /// Peaking cuts suppressing known bleed regions.
    pub bleed_cuts: Vec<EqPoint>,
}

/// Resolve the profile for a classification.
///
/// Total and pure: `None` and [`DrumClass::Custom`] fall back to the
/// generic profile. Tambourine and claps share one profile - both are
/// short broadband bursts living in the same upper-mid region.
pub fn profile_for(class: Option<&DrumClass>) -> DrumProfile {
    match class {
        Some(DrumClass::Kick) => kick(),
        Some(DrumClass::Snare) => snare(),
        Some(DrumClass::HiHat) => hihat(),
        Some(DrumClass::Toms) => toms(),
        Some(DrumClass::Tambourine | DrumClass::Claps) => hand_percussion(),
        Some(DrumClass::Custom(_)) | None => generic(),
    }
}

/// Fundamental thump plus beater click; long hold so the low tail is not
/// clipped off.
fn kick() -> DrumProfile {
    DrumProfile {
        focus_bands: vec![
            FrequencyBand::new(45.0, 110.0, 1.0),
            FrequencyBand::new(1800.0, 5200.0, 0.6),
        ],
        floor_db: -18.0,
        hold_min_s: 0.07,
        hold_max_s: 0.14,
        hysteresis_ratio: 0.55,
        threshold_bias_db: -2.0,
        focus_weight: 1.6,
        curve: 1.6,
        sidechain_hp_hz: Some(30.0),
        sidechain_lp_hz: Some(9000.0),
        emphasis: vec![EqPoint::new(60.0, 4.0, 1.0), EqPoint::new(3500.0, 2.5, 1.2)],
        bleed_cuts: vec![EqPoint::new(350.0, -4.5, 1.1)],
    }
}

/// Body crack around 200 Hz plus wire sizzle; cuts target kick and hat
/// bleed on either side.
fn snare() -> DrumProfile {
    DrumProfile {
        focus_bands: vec![
            FrequencyBand::new(150.0, 350.0, 1.0),
            FrequencyBand::new(2000.0, 6000.0, 0.8),
        ],
        floor_db: -16.0,
        hold_min_s: 0.06,
        hold_max_s: 0.12,
        hysteresis_ratio: 0.6,
        threshold_bias_db: 0.0,
        focus_weight: 1.4,
        curve: 1.45,
        sidechain_hp_hz: Some(90.0),
        sidechain_lp_hz: Some(12000.0),
        emphasis: vec![EqPoint::new(200.0, 3.0, 1.0), EqPoint::new(4000.0, 3.0, 1.1)],
        bleed_cuts: vec![EqPoint::new(60.0, -6.0, 1.0), EqPoint::new(8000.0, -3.0, 1.4)],
    }
}

/// All energy above 5 kHz; short hold window since hats decay fast and
/// chatter is the main risk.
fn hihat() -> DrumProfile {
    DrumProfile {
        focus_bands: vec![
            FrequencyBand::new(5000.0, 10000.0, 1.0),
            FrequencyBand::new(10000.0, 14000.0, 0.7),
        ],
        floor_db: -14.0,
        hold_min_s: 0.03,
        hold_max_s: 0.07,
        hysteresis_ratio: 0.65,
        threshold_bias_db: 1.5,
        focus_weight: 1.2,
        curve: 1.3,
        sidechain_hp_hz: Some(2000.0),
        sidechain_lp_hz: None,
        emphasis: vec![EqPoint::new(7500.0, 3.0, 1.0)],
        bleed_cuts: vec![EqPoint::new(200.0, -8.0, 0.9)],
    }
}

fn toms() -> DrumProfile {
    DrumProfile {
        focus_bands: vec![
            FrequencyBand::new(70.0, 180.0, 1.0),
            FrequencyBand::new(2500.0, 5000.0, 0.5),
        ],
        floor_db: -17.0,
        hold_min_s: 0.08,
        hold_max_s: 0.16,
        hysteresis_ratio: 0.58,
        threshold_bias_db: -1.0,
        focus_weight: 1.5,
        curve: 1.5,
        sidechain_hp_hz: Some(45.0),
        sidechain_lp_hz: Some(10000.0),
        emphasis: vec![EqPoint::new(110.0, 3.5, 1.0)],
        bleed_cuts: vec![EqPoint::new(400.0, -3.0, 1.0), EqPoint::new(6500.0, -2.5, 1.3)],
    }
}

/// Shared by tambourine and claps.
fn hand_percussion() -> DrumProfile {
    DrumProfile {
        focus_bands: vec![
            FrequencyBand::new(3000.0, 8000.0, 1.0),
            FrequencyBand::new(8000.0, 12000.0, 0.6),
        ],
        floor_db: -15.0,
        hold_min_s: 0.04,
        hold_max_s: 0.09,
        hysteresis_ratio: 0.62,
        threshold_bias_db: 1.0,
        focus_weight: 1.25,
        curve: 1.35,
        sidechain_hp_hz: Some(1200.0),
        sidechain_lp_hz: None,
        emphasis: vec![EqPoint::new(5000.0, 2.5, 1.0)],
        bleed_cuts: vec![EqPoint::new(150.0, -7.0, 0.9)],
    }
}

/// Fallback for custom or absent classification: one wide band, no
/// corrective EQ beyond a rumble high-pass.
fn generic() -> DrumProfile {
    DrumProfile {
        focus_bands: vec![FrequencyBand::new(100.0, 5000.0, 1.0)],
        floor_db: -18.0,
        hold_min_s: 0.05,
        hold_max_s: 0.12,
        hysteresis_ratio: 0.6,
        threshold_bias_db: 0.0,
        focus_weight: 1.3,
        curve: 1.45,
        sidechain_hp_hz: Some(40.0),
        sidechain_lp_hz: None,
        emphasis: Vec::new(),
        bleed_cuts: Vec::new(),
    }
}
