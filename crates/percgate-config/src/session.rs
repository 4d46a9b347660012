//! Session file format and conversion into engine types.

use serde::{Deserialize, Serialize};
use std::path::Path;

use percgate_engine::{DrumClass, DrumProfile, EqPoint, FrequencyBand, GateSettings, profile_for};

use crate::error::ConfigError;
use crate::validation::validate_session;

/// A gating session: settings, classification, optional custom profile.
///
/// # TOML Format
///
/// ```toml
/// class = "snare"
///
/// [gate]
/// threshold_db = -24.0
/// attack_s = 0.001
/// release_s = 0.12
/// active = true
///
/// # Only needed for custom classes; built-in classes bring their own.
/// [profile]
/// floor_db = -18.0
/// hold_range_s = [0.05, 0.12]
/// hysteresis = 0.6
/// curve = 1.45
/// sidechain_hp_hz = 60.0
///
/// [[profile.bands]]
/// low_hz = 200.0
/// high_hz = 900.0
/// weight = 1.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Drum class name; anything unrecognized becomes a custom class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Gate settings.
    pub gate: GateSection,

    /// Custom profile overriding the built-in lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileDef>,
}

/// The `[gate]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateSection {
    /// Open threshold in dBFS.
    pub threshold_db: f32,
    /// Attack time, seconds.
    #[serde(default = "default_attack_s")]
    pub attack_s: f32,
    /// Release time, seconds.
    #[serde(default = "default_release_s")]
    pub release_s: f32,
    /// Whether gating is enabled.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_attack_s() -> f32 {
    0.001
}

fn default_release_s() -> f32 {
    0.12
}

fn default_active() -> bool {
    true
}

/// A custom drum profile as written in a session file.
///
/// Defaults mirror the generic built-in profile, so a minimal custom
/// profile only has to name its focus bands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileDef {
    /// Detection passbands.
    pub bands: Vec<BandDef>,
    /// Closed-state level, dB.
    #[serde(default = "default_floor_db")]
    pub floor_db: f32,
    /// Allowed hold range `[min, max]`, seconds.
    #[serde(default = "default_hold_range")]
    pub hold_range_s: [f32; 2],
    /// Closing hysteresis point, fraction of the open threshold.
    #[serde(default = "default_hysteresis")]
    pub hysteresis: f32,
    /// Bias applied to auto-suggested thresholds, dB.
    #[serde(default)]
    pub threshold_bias_db: f32,
    /// Multiplier on detector output.
    #[serde(default = "default_focus_weight")]
    pub focus_weight: f32,
    /// Soft-knee closing exponent.
    #[serde(default = "default_curve")]
    pub curve: f32,
    /// Sidechain high-pass cutoff, Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidechain_hp_hz: Option<f32>,
    /// Sidechain low-pass cutoff, Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidechain_lp_hz: Option<f32>,
    /// Emphasis peaks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emphasis: Vec<EqPointDef>,
    /// Bleed cuts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bleed_cuts: Vec<EqPointDef>,
}

fn default_floor_db() -> f32 {
    -18.0
}

fn default_hold_range() -> [f32; 2] {
    [0.05, 0.12]
}

fn default_hysteresis() -> f32 {
    0.6
}

fn default_focus_weight() -> f32 {
    1.3
}

fn default_curve() -> f32 {
    1.45
}

/// A `[[profile.bands]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BandDef {
    /// Lower band edge, Hz.
    pub low_hz: f32,
    /// Upper band edge, Hz.
    pub high_hz: f32,
    /// Relative band weight.
    #[serde(default = "default_weight")]
    pub weight: f32,
}

/// An `[[profile.emphasis]]` or `[[profile.bleed_cuts]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EqPointDef {
    /// Center frequency, Hz.
    pub freq_hz: f32,
    /// Boost or cut, dB.
    pub gain_db: f32,
    /// Bandwidth control.
    #[serde(default = "default_weight")]
    pub q: f32,
}

fn default_weight() -> f32 {
    1.0
}

impl Session {
    /// Load and validate a session from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a session from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let session: Session = toml::from_str(toml_str)?;
        validate_session(&session)?;
        Ok(session)
    }

    /// Save the session to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Engine settings for this session.
    pub fn gate_settings(&self) -> GateSettings {
        GateSettings {
            threshold_db: self.gate.threshold_db,
            attack_s: self.gate.attack_s,
            release_s: self.gate.release_s,
            active: self.gate.active,
            auto_applied: false,
        }
    }

    /// Parsed drum classification, if one was named.
    pub fn drum_class(&self) -> Option<DrumClass> {
        self.class
            .as_deref()
            .map(|name| name.parse().expect("DrumClass parsing is infallible"))
    }

    /// Resolve the profile this session gates with: the custom profile
    /// when defined, otherwise the built-in for the named class (or the
    /// generic fallback).
    pub fn resolve_profile(&self) -> DrumProfile {
        match &self.profile {
            Some(def) => def.to_profile(),
            None => profile_for(self.drum_class().as_ref()),
        }
    }
}

impl ProfileDef {
    /// Convert into the engine's profile type.
    pub fn to_profile(&self) -> DrumProfile {
        DrumProfile {
            focus_bands: self
                .bands
                .iter()
                .map(|b| FrequencyBand::new(b.low_hz, b.high_hz, b.weight))
                .collect(),
            floor_db: self.floor_db,
            hold_min_s: self.hold_range_s[0],
            hold_max_s: self.hold_range_s[1],
            hysteresis_ratio: self.hysteresis,
            threshold_bias_db: self.threshold_bias_db,
            focus_weight: self.focus_weight,
            curve: self.curve,
            sidechain_hp_hz: self.sidechain_hp_hz,
            sidechain_lp_hz: self.sidechain_lp_hz,
            emphasis: self
                .emphasis
                .iter()
                .map(|p| EqPoint::new(p.freq_hz, p.gain_db, p.q))
                .collect(),
            bleed_cuts: self
                .bleed_cuts
                .iter()
                .map(|p| EqPoint::new(p.freq_hz, p.gain_db, p.q))
                .collect(),
        }
    }
}
