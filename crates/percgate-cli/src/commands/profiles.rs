//! Built-in profile listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;

use percgate_engine::{DrumClass, profile_for};

#[derive(Args)]
pub struct ProfilesArgs {
    /// Show full tuning for a specific class
    #[arg(value_name = "CLASS")]
    class: Option<String>,
}

pub fn run(args: ProfilesArgs) -> anyhow::Result<()> {
    if let Some(name) = &args.class {
        let class: DrumClass = name.parse().expect("DrumClass parsing is infallible");
        print_detail(&class);
        return Ok(());
    }

    println!(
        "{:12}  {:24}  {:>9}  {:>12}  {:>6}",
        "Class", "Focus bands (Hz)", "Floor", "Hold (ms)", "Hyst"
    );
    println!(
        "{:12}  {:24}  {:>9}  {:>12}  {:>6}",
        "-----", "----------------", "-----", "---------", "----"
    );

    for class in [
        DrumClass::Kick,
        DrumClass::Snare,
        DrumClass::HiHat,
        DrumClass::Toms,
        DrumClass::Tambourine,
        DrumClass::Claps,
    ] {
        let profile = profile_for(Some(&class));
        let bands: Vec<String> = profile
            .focus_bands
            .iter()
            .map(|b| format!("{:.0}-{:.0}", b.low_hz, b.high_hz))
            .collect();
        println!(
            "{:12}  {:24}  {:>6.0} dB  {:>5.0}-{:>3.0} ms  {:>6.2}",
            class.to_string(),
            bands.join(", "),
            profile.floor_db,
            profile.hold_min_s * 1000.0,
            profile.hold_max_s * 1000.0,
            profile.hysteresis_ratio
        );
    }
    println!("\nAny other class name falls back to the generic profile.");

    Ok(())
}

fn print_detail(class: &DrumClass) {
    let profile = profile_for(Some(class));
    let name = class.to_string();
    println!("{name}");
    println!("{}", "=".repeat(name.len()));
    println!();
    for band in &profile.focus_bands {
        println!(
            "  focus band   {:6.0}-{:6.0} Hz  weight {:.2}",
            band.low_hz, band.high_hz, band.weight
        );
    }
    println!("  floor        {:6.1} dB", profile.floor_db);
    println!(
        "  hold range   {:6.0}-{:6.0} ms",
        profile.hold_min_s * 1000.0,
        profile.hold_max_s * 1000.0
    );
    println!("  hysteresis   {:6.2}", profile.hysteresis_ratio);
    println!("  bias         {:6.1} dB", profile.threshold_bias_db);
    println!("  focus weight {:6.2}", profile.focus_weight);
    println!("  curve        {:6.2}", profile.curve);
    match profile.sidechain_hp_hz {
        Some(hz) => println!("  sidechain HP {:6.0} Hz", hz),
        None => println!("  sidechain HP      -"),
    }
    match profile.sidechain_lp_hz {
        Some(hz) => println!("  sidechain LP {:6.0} Hz", hz),
        None => println!("  sidechain LP      -"),
    }
    for point in &profile.emphasis {
        println!(
            "  emphasis     {:6.0} Hz  {:+.1} dB  Q {:.2}",
            point.freq_hz, point.gain_db, point.q
        );
    }
    for point in &profile.bleed_cuts {
        println!(
            "  bleed cut    {:6.0} Hz  {:+.1} dB  Q {:.2}",
            point.freq_hz, point.gain_db, point.q
        );
    }
}
