//! End-to-end gate behavior over realistic percussion-shaped signals.
#![allow(missing_docs)]

use percgate_engine::{DrumClass, GateEngine, GateSettings, profile_for};

const SR: f32 = 44100.0;

fn settings(threshold_db: f32, attack_s: f32, release_s: f32) -> GateSettings {
    GateSettings {
        threshold_db,
        attack_s,
        release_s,
        active: true,
        auto_applied: false,
    }
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

#[test]
fn never_configured_gate_passes_audio_unchanged() {
    let mut gate = GateEngine::new();
    let original: Vec<f32> = (0..2048).map(|i| (i as f32 * 0.07).sin() * 0.8).collect();
    let mut buffer = original.clone();
    gate.process_block(&mut [&mut buffer]);
    assert_eq!(buffer, original);
}

#[test]
fn snare_gate_attenuates_sub_threshold_bleed() {
    // 256 samples of constant 0.05 (~-26 dBFS) against a -24 dB
    // threshold: below threshold, so the block must come out quieter.
    let profile = profile_for(Some(&DrumClass::Snare));
    let mut gate = GateEngine::new();
    assert!(gate.reconfigure(&settings(-24.0, 0.001, 0.02), SR, Some(&profile)));

    let mut buffer = vec![0.05f32; 256];
    gate.process_block(&mut [&mut buffer]);

    assert!(
        peak(&buffer) < 0.05,
        "gate must attenuate, peak = {}",
        peak(&buffer)
    );
}

#[test]
fn kick_transient_passes_whole_and_holds_open() {
    let profile = profile_for(Some(&DrumClass::Kick));
    let mut gate = GateEngine::new();
    assert!(gate.reconfigure(&settings(-18.0, 0.001, 0.02), SR, Some(&profile)));
    let hold = gate.config().unwrap().hold_samples();
    // 25 ms base hold clamps into kick's 70-140 ms window.
    assert_eq!(hold, (SR * 0.07).round() as u32);

    // Full-scale hit, then a second of silence.
    let mut buffer = vec![0.0f32; 1001];
    buffer[0] = 1.0;
    let mut gains = Vec::with_capacity(buffer.len());
    for sample in &mut buffer {
        let mut frame = [*sample];
        gate.process_block(&mut [&mut frame]);
        *sample = frame[0];
        gains.push(gate.last_gain());
    }

    assert_eq!(buffer[0], 1.0, "the hit itself must pass unattenuated");
    for (n, &gain) in gains.iter().take(1001).enumerate() {
        assert_eq!(gain, 1.0, "gate must stay open during hold, sample {n}");
    }
}

#[test]
fn sustained_quiet_sine_converges_to_floor_leakage() {
    let mut gate = GateEngine::new();
    let release_s = 0.05;
    assert!(gate.reconfigure(&settings(-24.0, 0.001, release_s), SR, None));
    let floor_gain = gate.config().unwrap().floor_gain();

    // -40 dBFS sine, far below threshold.
    let amp = 0.01;
    let total = (SR * release_s) as usize * 4;
    let mut tail_peak = 0.0f32;
    for n in 0..total {
        let x = amp * (2.0 * std::f32::consts::PI * 300.0 * n as f32 / SR).sin();
        let mut frame = [x];
        gate.process_block(&mut [&mut frame]);
        if n >= total - (SR / 300.0) as usize {
            tail_peak = tail_peak.max(frame[0].abs());
        }
    }

    let expected = amp * floor_gain;
    assert!(
        (tail_peak - expected).abs() < expected * 0.05,
        "tail peak {tail_peak} should approach {expected}"
    );
}

#[test]
fn hits_pass_while_bleed_between_them_is_ducked() {
    // A snare-ish pattern: 60 ms bursts of 230 Hz at -6 dBFS every
    // 250 ms, with continuous -38 dBFS bleed underneath.
    let profile = profile_for(Some(&DrumClass::Snare));
    let mut gate = GateEngine::new();
    assert!(gate.reconfigure(&settings(-24.0, 0.001, 0.08), SR, Some(&profile)));

    let total = (SR * 1.0) as usize;
    let hit_period = (SR * 0.25) as usize;
    let hit_len = (SR * 0.06) as usize;

    let mut input = Vec::with_capacity(total);
    for n in 0..total {
        let bleed = 0.012 * (2.0 * std::f32::consts::PI * 150.0 * n as f32 / SR).sin();
        let in_hit = n % hit_period < hit_len;
        let hit = if in_hit {
            0.5 * (2.0 * std::f32::consts::PI * 230.0 * n as f32 / SR).sin()
        } else {
            0.0
        };
        input.push(bleed + hit);
    }

    let mut output = input.clone();
    gate.process_block(&mut [&mut output.as_mut_slice()]);

    // Hit bodies survive essentially intact.
    let hit_in = peak(&input[0..hit_len]);
    let hit_out = peak(&output[0..hit_len]);
    assert!(
        hit_out > hit_in * 0.95,
        "hit must pass: {hit_out} vs {hit_in}"
    );

    // The gap right before the next hit is well attenuated.
    let gap = &output[hit_period - 2000..hit_period - 100];
    let gap_in = &input[hit_period - 2000..hit_period - 100];
    assert!(
        peak(gap) < peak(gap_in) * 0.5,
        "bleed must be ducked: {} vs {}",
        peak(gap),
        peak(gap_in)
    );
}

#[test]
fn reconfigure_between_blocks_keeps_streaming_seamless() {
    let profile = profile_for(Some(&DrumClass::Toms));
    let mut gate = GateEngine::new();
    gate.reconfigure(&settings(-30.0, 0.001, 0.1), SR, Some(&profile));

    let mut block_a = vec![0.3f32; 512];
    gate.process_block(&mut [&mut block_a]);
    let envelope = gate.envelope();

    // Tighten the threshold between blocks; the envelope carries over.
    gate.reconfigure(&settings(-12.0, 0.001, 0.1), SR, Some(&profile));
    assert_eq!(gate.envelope(), envelope);

    let mut block_b = vec![0.3f32; 512];
    gate.process_block(&mut [&mut block_b]);
    // 0.3 (~-10.5 dBFS) still clears the -12 dB threshold.
    assert_eq!(gate.last_gain(), 1.0);
}
