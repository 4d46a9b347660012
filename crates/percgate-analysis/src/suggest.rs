//! Threshold and release auto-suggestion.
//!
//! A statistical pass over a clip's windowed amplitudes (and optionally
//! its [`SpectralSnapshot`]) that proposes starting gate settings. The
//! heuristic looks for contrast: hits must stand above the inter-hit
//! bed, either in the amplitude distribution or in the focus-band
//! balance. Clips without that contrast get no suggestion at all -
//! recommending a gate for them would be a coin flip.

use percgate_engine::DrumProfile;

use crate::snapshot::SpectralSnapshot;

/// Fewest amplitude windows worth analyzing.
const MIN_WINDOWS: usize = 12;

/// Quietest clip peak worth analyzing, linear full scale.
const MIN_PEAK: f32 = 0.01;

/// Amplitude-contrast gates, dB: any one of peak lift, tail lift, or
/// floor lift passing marks the clip as gateable.
const PEAK_LIFT_MIN_DB: f32 = 6.0;
const TAIL_LIFT_MIN_DB: f32 = 4.0;
const FLOOR_LIFT_MIN_DB: f32 = 8.0;

/// Spectral fallback: required focus-to-offband separation, dB.
const FOCUS_SEPARATION_MIN_DB: f32 = 4.0;

/// Crest factor assumed when no snapshot is available, dB.
const DEFAULT_CREST_DB: f32 = 18.0;

/// Release recommendation bounds, seconds.
const RELEASE_MIN_S: f32 = 0.07;
const RELEASE_MAX_S: f32 = 0.35;

/// Recommended starting gate settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suggestion {
    /// Proposed open threshold, dBFS (always <= 0).
    pub threshold_db: f32,
    /// Proposed release time, seconds; `None` when the decay evidence
    /// was ambiguous.
    pub release_s: Option<f32>,
}

/// Propose gate settings from a clip's windowed peak amplitudes.
///
/// `amplitudes` is one value per analysis window (see
/// [`window_peaks`](crate::window_peaks)); scaling does not matter, the
/// sequence is renormalized against its own peak. Returns `None` when
/// the clip is too short, too quiet, or shows no usable
/// transient/sustain contrast.
pub fn suggest(
    amplitudes: &[f32],
    profile: Option<&DrumProfile>,
    snapshot: Option<&SpectralSnapshot>,
) -> Option<Suggestion> {
    let peak = amplitudes
        .iter()
        .copied()
        .filter(|a| a.is_finite())
        .fold(0.0f32, |acc, a| acc.max(a.abs()));
    if peak < MIN_PEAK {
        return None;
    }

    let mut values: Vec<f32> = amplitudes
        .iter()
        .filter(|a| a.is_finite())
        .map(|a| a.abs() / peak)
        .filter(|a| *a > 0.0)
        .collect();
    if values.len() < MIN_WINDOWS {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).expect("non-finite values were filtered"));

    let p10 = percentile(&values, 10.0);
    let p15 = percentile(&values, 15.0);
    let p50 = percentile(&values, 50.0);
    let p75 = percentile(&values, 75.0);
    let p82 = percentile(&values, 82.0);
    let p99 = percentile(&values, 99.0);
    let max_amp = values[values.len() - 1];

    // Three views of the same question - do hits stand above the bed?
    let body = p50.max(0.9 * p75);
    let peak_lift_db = lift_db(max_amp, body);
    let tail_lift_db = lift_db(p99, p75);
    let floor_lift_db = lift_db(p75, p10);

    let amplitude_contrast = peak_lift_db >= PEAK_LIFT_MIN_DB
        || tail_lift_db >= TAIL_LIFT_MIN_DB
        || floor_lift_db >= FLOOR_LIFT_MIN_DB;
    if !amplitude_contrast {
        // The amplitude distribution is flat; only clear spectral focus
        // can still justify a recommendation.
        let separation = snapshot.map(SpectralSnapshot::focus_to_off_db)?;
        if separation < FOCUS_SEPARATION_MIN_DB {
            return None;
        }
    }

    // Peakier material gets a more permissive floor: its transients
    // already stand far above the sustain.
    let crest_db = snapshot.map_or(DEFAULT_CREST_DB, SpectralSnapshot::crest_db);
    let mix_floor_db = if crest_db >= 24.0 {
        -42.0
    } else if crest_db >= 20.0 {
        -36.0
    } else if crest_db >= 16.0 {
        -32.0
    } else {
        -28.0
    };

    let bias = profile.map_or(0.0, |p| p.threshold_bias_db);
    let threshold_db = (20.0 * p82.log10() + bias).min(0.0).max(mix_floor_db);

    // Release from the decay spread between sustain and floor windows.
    let ratio_db = lift_db(p75, p15);
    let release_s = if ratio_db < 3.0 {
        None
    } else if ratio_db < 6.0 {
        Some(0.18)
    } else if ratio_db < 10.0 {
        Some(0.14)
    } else {
        Some(0.10)
    }
    .map(|r: f32| r.clamp(RELEASE_MIN_S, RELEASE_MAX_S));

    Some(Suggestion {
        threshold_db,
        release_s,
    })
}

/// Nearest-rank percentile over an ascending-sorted slice.
fn percentile(sorted: &[f32], q: f32) -> f32 {
    let rank = (q / 100.0 * sorted.len() as f32).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// dB gap between two linear amplitudes, floored against log blowup.
fn lift_db(upper: f32, lower: f32) -> f32 {
    20.0 * (upper.max(1e-10) / lower.max(1e-10)).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use percgate_engine::{DrumClass, profile_for};

    /// Percussion-shaped distribution: quiet bed, some sustain, a few
    /// strong hit windows.
    fn hit_heavy_amplitudes() -> Vec<f32> {
        let mut values = Vec::new();
        values.extend(std::iter::repeat_n(0.05, 40)); // bed
        values.extend(std::iter::repeat_n(0.3, 30)); // decay tails
        values.extend(std::iter::repeat_n(0.5, 20)); // sustain
        values.extend(std::iter::repeat_n(0.7, 6)); // body of hits
        values.extend(std::iter::repeat_n(0.95, 3)); // hit peaks
        values.push(1.0);
        values
    }

    #[test]
    fn percentile_is_nearest_rank() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        assert_eq!(percentile(&sorted, 10.0), 1.0);
        assert_eq!(percentile(&sorted, 50.0), 5.0);
        assert_eq!(percentile(&sorted, 82.0), 9.0);
        assert_eq!(percentile(&sorted, 100.0), 10.0);
    }

    #[test]
    fn hit_heavy_clip_gets_a_suggestion() {
        let suggestion = suggest(&hit_heavy_amplitudes(), None, None).unwrap();
        assert!(suggestion.threshold_db <= 0.0);
        assert!(suggestion.threshold_db >= -42.0);
        let release = suggestion.release_s.unwrap();
        assert!([0.10f32, 0.14, 0.18].contains(&release));
    }

    #[test]
    fn constant_amplitude_gets_none() {
        for len in [12, 100, 5000] {
            let flat = vec![0.5f32; len];
            assert!(
                suggest(&flat, None, None).is_none(),
                "flat clip of {len} windows must not get a suggestion"
            );
        }
    }

    #[test]
    fn too_short_or_too_quiet_gets_none() {
        assert!(suggest(&[0.9, 0.1, 0.5], None, None).is_none());
        let quiet = vec![0.001f32; 100];
        assert!(suggest(&quiet, None, None).is_none());
        assert!(suggest(&[], None, None).is_none());
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let mut values = hit_heavy_amplitudes();
        values.push(f32::NAN);
        values.push(f32::INFINITY);
        let with_junk = suggest(&values, None, None).unwrap();
        let clean = suggest(&hit_heavy_amplitudes(), None, None).unwrap();
        assert_eq!(with_junk, clean);
    }

    #[test]
    fn profile_bias_shifts_the_threshold() {
        let kick = profile_for(Some(&DrumClass::Kick)); // -2 dB bias
        let hat = profile_for(Some(&DrumClass::HiHat)); // +1.5 dB bias

        let amplitudes = hit_heavy_amplitudes();
        let with_kick = suggest(&amplitudes, Some(&kick), None).unwrap();
        let with_hat = suggest(&amplitudes, Some(&hat), None).unwrap();
        assert!(with_kick.threshold_db < with_hat.threshold_db);
    }

    #[test]
    fn flat_amplitudes_with_strong_focus_fall_back_to_spectrum() {
        // Amplitude windows nearly flat (lifts below every gate) but
        // the spectral snapshot shows clear focus separation.
        let mut flat: Vec<f32> = (0..100).map(|i| 0.5 + 0.01 * (i % 7) as f32).collect();
        flat[0] = 0.56;

        let focused = SpectralSnapshot {
            focus_rms: 0.4,
            focus_peak: 0.9,
            offband_rms: 0.1, // 12 dB separation
            broadband_rms: 0.45,
            broadband_peak: 0.95,
        };
        assert!(suggest(&flat, None, Some(&focused)).is_some());

        let diffuse = SpectralSnapshot {
            focus_rms: 0.2,
            focus_peak: 0.4,
            offband_rms: 0.18, // under 1 dB separation
            broadband_rms: 0.3,
            broadband_peak: 0.5,
        };
        assert!(suggest(&flat, None, Some(&diffuse)).is_none());
        assert!(suggest(&flat, None, None).is_none());
    }

    #[test]
    fn crest_factor_steers_the_threshold_floor() {
        // Distribution whose p82 sits very low, so the threshold rides
        // the crest-mapped floor.
        let mut values = vec![0.005f32; 95];
        values.extend([0.3, 0.5, 0.8, 0.9, 1.0]);

        let peaky = SpectralSnapshot {
            focus_rms: 0.02,
            focus_peak: 0.9, // 33 dB crest
            offband_rms: 0.01,
            broadband_rms: 0.03,
            broadband_peak: 0.95,
        };
        let with_peaky = suggest(&values, None, Some(&peaky)).unwrap();
        assert_eq!(with_peaky.threshold_db, -42.0);

        // No snapshot: 18 dB default crest maps to a -32 dB floor.
        let without = suggest(&values, None, None).unwrap();
        assert_eq!(without.threshold_db, -32.0);
    }

    #[test]
    fn release_ladder_follows_the_decay_spread() {
        // Narrow p75/p15 spread (between 3 and 6 dB): longest release.
        let mut narrow = vec![0.4f32; 30];
        narrow.extend(std::iter::repeat_n(0.6, 60));
        narrow.extend([0.9, 1.0, 1.0, 1.0]);
        let suggestion = suggest(&narrow, None, None).unwrap();
        assert_eq!(suggestion.release_s, Some(0.18));

        // Wide spread (over 10 dB): shortest release.
        let mut wide = vec![0.05f32; 30];
        wide.extend(std::iter::repeat_n(0.6, 60));
        wide.extend([0.9, 1.0, 1.0, 1.0]);
        let suggestion = suggest(&wide, None, None).unwrap();
        assert_eq!(suggestion.release_s, Some(0.10));
    }

    #[test]
    fn ambiguous_decay_spread_yields_threshold_only() {
        // p75 and p15 nearly identical: no release recommendation, but
        // the strong peaks still justify a threshold.
        let mut values = vec![0.5f32; 96];
        values.extend([0.9, 1.0, 1.0, 1.0]);
        let suggestion = suggest(&values, None, None).unwrap();
        assert_eq!(suggestion.release_s, None);
        assert!(suggestion.threshold_db <= 0.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn threshold_is_always_in_range(
                values in proptest::collection::vec(0.0f32..1.0, 12..200),
            ) {
                if let Some(s) = suggest(&values, None, None) {
                    prop_assert!(s.threshold_db <= 0.0);
                    prop_assert!(s.threshold_db >= -42.0);
                    if let Some(release) = s.release_s {
                        prop_assert!((0.07..=0.35).contains(&release));
                    }
                }
            }

            #[test]
            fn scaling_the_input_does_not_change_the_result(
                values in proptest::collection::vec(0.01f32..1.0, 20..100),
                scale in 0.5f32..2.0,
            ) {
                let scaled: Vec<f32> = values.iter().map(|v| v * scale).collect();
                let a = suggest(&values, None, None);
                let b = suggest(&scaled, None, None);
                match (a, b) {
                    (Some(a), Some(b)) => {
                        prop_assert!((a.threshold_db - b.threshold_db).abs() < 0.1);
                        prop_assert_eq!(a.release_s, b.release_s);
                    }
                    (None, None) => {}
                    other => prop_assert!(false, "divergent: {:?}", other),
                }
            }
        }
    }
}
