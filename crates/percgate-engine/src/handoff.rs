//! Config publication across the real-time boundary.
//!
//! Reconfiguration allocates (filter banks are rebuilt), so a host that
//! runs the gate on a real-time audio callback cannot call
//! [`GateEngine::reconfigure`] there. This module splits the engine into
//! a control half and an audio half connected by channels:
//!
//! - [`GateController`] derives [`GateConfig`] snapshots on the control
//!   thread and publishes them.
//! - [`RealtimeGate`] adopts the latest published snapshot at the next
//!   block boundary (never mid-buffer) and ships the retired snapshot
//!   back, so the audio thread neither builds nor frees filter state.
//!
//! A snapshot is moved whole through the channel; the audio side either
//! sees the old config or the new one, never a mix.
//!
//! # Example
//!
//! ```rust
//! use percgate_engine::{GateSettings, handoff, profile_for};
//!
//! let (controller, mut gate) = handoff();
//! controller.publish(&GateSettings::default(), 48000.0, Some(&profile_for(None)));
//!
//! // ... on the audio thread:
//! let mut block = vec![0.0f32; 256];
//! gate.process_block(&mut [&mut block]);
//! ```

use std::sync::mpsc::{Receiver, Sender, channel};

use crate::block::Sample;
use crate::engine::{GateConfig, GateEngine, GateSettings};
use crate::profile::DrumProfile;

/// Create a connected controller/audio pair.
pub fn handoff() -> (GateController, RealtimeGate) {
    let (to_audio, from_control) = channel();
    let (to_control, retired) = channel();
    (
        GateController { to_audio, retired },
        RealtimeGate {
            engine: GateEngine::new(),
            from_control,
            to_control,
        },
    )
}

/// Control-thread half: derives and publishes config snapshots.
pub struct GateController {
    to_audio: Sender<Option<GateConfig>>,
    retired: Receiver<Option<GateConfig>>,
}

impl GateController {
    /// Derive a snapshot from the given parameters and publish it.
    ///
    /// Returns whether the published state is active. Retired snapshots
    /// shipped back by the audio side are dropped here, off the
    /// real-time path. Returns false if the audio half is gone.
    pub fn publish(
        &self,
        settings: &GateSettings,
        sample_rate: f32,
        profile: Option<&DrumProfile>,
    ) -> bool {
        self.collect_retired();
        let config = GateConfig::derive(settings, sample_rate, profile);
        let active = config.is_some();
        self.to_audio.send(config).is_ok() && active
    }

    /// Drop any snapshots the audio side has retired.
    pub fn collect_retired(&self) {
        while self.retired.try_recv().is_ok() {}
    }
}

/// Audio-thread half: a [`GateEngine`] that adopts published configs at
/// block boundaries.
pub struct RealtimeGate {
    engine: GateEngine,
    from_control: Receiver<Option<GateConfig>>,
    to_control: Sender<Option<GateConfig>>,
}

impl RealtimeGate {
    /// Adopt any pending configs, then gate the block in place.
    ///
    /// When several snapshots were published since the last block, each
    /// is installed in order and the displaced one shipped back, so the
    /// block runs under the newest config and nothing is freed here.
    pub fn process_block<S: Sample>(&mut self, channels: &mut [&mut [S]]) {
        while let Ok(config) = self.from_control.try_recv() {
            let retired = self.engine.install(config);
            // If the controller is gone the retired config leaks back to
            // us; dropping it here is the best remaining option.
            let _ = self.to_control.send(retired);
        }
        self.engine.process_block(channels);
    }

    /// Read-only view of the engine (metering, activity checks).
    pub fn engine(&self) -> &GateEngine {
        &self.engine
    }
}
