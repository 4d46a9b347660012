//! Offline file gating command.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;

use percgate_analysis::{DEFAULT_WINDOW, SpectralSnapshot, suggest, window_peaks};
use percgate_config::Session;
use percgate_engine::{DrumClass, DrumProfile, GateEngine, GateSettings, Sample, profile_for};
use percgate_io::{ChannelData, read_planar, write_planar};

#[derive(Args)]
pub struct GateArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Drum class (kick, snare, hihat, toms, tambourine, claps, or custom)
    #[arg(short, long)]
    class: Option<String>,

    /// Gate threshold in dBFS
    #[arg(short, long, default_value = "-24.0", allow_hyphen_values = true)]
    threshold: f32,

    /// Attack time in milliseconds
    #[arg(long, default_value = "1.0")]
    attack: f32,

    /// Release time in milliseconds
    #[arg(long, default_value = "120.0")]
    release: f32,

    /// Run the analyzer first and apply its suggested settings
    #[arg(long)]
    auto: bool,

    /// Session file (TOML); flags above are ignored when set
    #[arg(short, long)]
    session: Option<PathBuf>,

    /// Processing block size in frames
    #[arg(long, default_value = "512")]
    block_size: usize,
}

pub fn run(args: GateArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let mut audio = read_planar(&args.input)?;
    let sample_rate = audio.sample_rate as f32;

    println!(
        "  {} channel(s), {} frames, {} Hz, {:.2}s",
        audio.channels(),
        audio.frames(),
        audio.sample_rate,
        audio.duration_secs()
    );

    let (mut settings, profile) = resolve_configuration(&args)?;

    if args.auto {
        apply_suggestion(&mut settings, &profile, &audio.mono(), sample_rate);
    }

    let mut gate = GateEngine::new();
    if !gate.reconfigure(&settings, sample_rate, Some(&profile)) {
        anyhow::bail!("gate is inactive; nothing to do");
    }

    println!(
        "Gating at {:.1} dB (attack {:.1} ms, release {:.1} ms)...",
        settings.threshold_db,
        settings.attack_s * 1000.0,
        settings.release_s * 1000.0
    );

    let pb = ProgressBar::new(audio.frames() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );

    let (in_rms, in_peak) = stats(&audio.data);
    match &mut audio.data {
        ChannelData::F32(data) => gate_channels(&mut gate, data, args.block_size, &pb),
        ChannelData::I16(data) => gate_channels(&mut gate, data, args.block_size, &pb),
    }
    pb.finish_with_message("done");

    let (out_rms, out_peak) = stats(&audio.data);
    println!("\nStats:");
    println!("  Input:  RMS {in_rms:.1} dB, Peak {in_peak:.1} dB");
    println!("  Output: RMS {out_rms:.1} dB, Peak {out_peak:.1} dB");

    println!("\nWriting {}...", args.output.display());
    write_planar(&args.output, &audio)?;
    println!("Done!");

    Ok(())
}

/// Settings and profile from the session file when given, flags
/// otherwise.
fn resolve_configuration(args: &GateArgs) -> anyhow::Result<(GateSettings, DrumProfile)> {
    if let Some(path) = &args.session {
        let session = Session::load(path)?;
        info!(session = %path.display(), "loaded session");
        return Ok((session.gate_settings(), session.resolve_profile()));
    }

    let class: Option<DrumClass> = args
        .class
        .as_deref()
        .map(|name| name.parse().expect("DrumClass parsing is infallible"));
    let settings = GateSettings {
        threshold_db: args.threshold,
        attack_s: args.attack / 1000.0,
        release_s: args.release / 1000.0,
        active: true,
        auto_applied: false,
    };
    Ok((settings, profile_for(class.as_ref())))
}

/// Run the analyzer over the mono downmix and fold its recommendation
/// into the settings. Keeps manual values when the clip yields nothing.
fn apply_suggestion(
    settings: &mut GateSettings,
    profile: &DrumProfile,
    mono: &[f32],
    sample_rate: f32,
) {
    let peaks = window_peaks(mono, DEFAULT_WINDOW);
    let snapshot = SpectralSnapshot::compute(mono, profile, sample_rate);

    match suggest(&peaks, Some(profile), snapshot.as_ref()) {
        Some(suggestion) => {
            info!(
                threshold_db = suggestion.threshold_db,
                release_s = ?suggestion.release_s,
                "applying auto-suggested settings"
            );
            settings.threshold_db = suggestion.threshold_db;
            if let Some(release) = suggestion.release_s {
                settings.release_s = release;
            }
            settings.auto_applied = true;
        }
        None => {
            println!("No usable transient contrast; keeping manual settings.");
        }
    }
}

/// Gate planar channels block by block.
fn gate_channels<S: Sample>(
    gate: &mut GateEngine,
    channels: &mut [Vec<S>],
    block_size: usize,
    pb: &ProgressBar,
) {
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    let block_size = block_size.max(1);

    let mut start = 0;
    while start < frames {
        let end = (start + block_size).min(frames);
        let mut refs: Vec<&mut [S]> = channels
            .iter_mut()
            .map(|c| &mut c[start..end])
            .collect();
        gate.process_block(&mut refs);
        pb.set_position(end as u64);
        start = end;
    }
}

/// Cross-channel RMS and peak in dB.
fn stats(data: &ChannelData) -> (f32, f32) {
    let mut sum_sq = 0.0f64;
    let mut peak = 0.0f32;
    let mut count = 0usize;

    match data {
        ChannelData::F32(channels) => {
            for channel in channels {
                for &s in channel {
                    sum_sq += f64::from(s) * f64::from(s);
                    peak = peak.max(s.abs());
                    count += 1;
                }
            }
        }
        ChannelData::I16(channels) => {
            for channel in channels {
                for &s in channel {
                    let v = s.to_f32();
                    sum_sq += f64::from(v) * f64::from(v);
                    peak = peak.max(v.abs());
                    count += 1;
                }
            }
        }
    }

    let rms = if count == 0 {
        0.0
    } else {
        (sum_sq / count as f64).sqrt() as f32
    };
    (
        percgate_core::linear_to_db(rms),
        percgate_core::linear_to_db(peak),
    )
}
