//! Gate auto-suggestion command.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use percgate_analysis::{DEFAULT_WINDOW, SpectralSnapshot, suggest, window_peaks};
use percgate_engine::{DrumClass, profile_for};
use percgate_io::read_mono;

#[derive(Args)]
pub struct SuggestArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Drum class the clip contains
    #[arg(short, long)]
    class: Option<String>,

    /// Analysis window size in samples
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    window: usize,

    /// Emit machine-readable JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    class: String,
    threshold_db: Option<f32>,
    release_s: Option<f32>,
    crest_db: Option<f32>,
    focus_to_off_db: Option<f32>,
}

pub fn run(args: SuggestArgs) -> anyhow::Result<()> {
    let (mono, sample_rate) = read_mono(&args.input)?;

    let class: Option<DrumClass> = args
        .class
        .as_deref()
        .map(|name| name.parse().expect("DrumClass parsing is infallible"));
    let profile = profile_for(class.as_ref());

    let peaks = window_peaks(&mono, args.window.max(1));
    let snapshot = SpectralSnapshot::compute(&mono, &profile, sample_rate as f32);
    let suggestion = suggest(&peaks, Some(&profile), snapshot.as_ref());

    let class_name = class.map_or_else(|| "generic".to_string(), |c| c.to_string());

    if args.json {
        let report = Report {
            class: class_name,
            threshold_db: suggestion.map(|s| s.threshold_db),
            release_s: suggestion.and_then(|s| s.release_s),
            crest_db: snapshot.as_ref().map(SpectralSnapshot::crest_db),
            focus_to_off_db: snapshot.as_ref().map(SpectralSnapshot::focus_to_off_db),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Analyzed {} ({} windows)", args.input.display(), peaks.len());
    println!("  Class: {class_name}");
    if let Some(snapshot) = &snapshot {
        println!("  Focus crest:      {:6.1} dB", snapshot.crest_db());
        println!("  Focus/offband:    {:6.1} dB", snapshot.focus_to_off_db());
    }

    match suggestion {
        Some(suggestion) => {
            println!("\nSuggested settings:");
            println!("  Threshold:  {:6.1} dB", suggestion.threshold_db);
            match suggestion.release_s {
                Some(release) => println!("  Release:    {:6.0} ms", release * 1000.0),
                None => println!("  Release:    no recommendation (ambiguous decay)"),
            }
        }
        None => {
            println!("\nNo suggestion: the clip lacks clear transient/sustain contrast.");
        }
    }

    Ok(())
}
