//! Waveform reduction: one amplitude per analysis window.

/// Default analysis window, ~23 ms at 44.1 kHz. Short enough that a
/// single hit and the gap after it land in different windows.
pub const DEFAULT_WINDOW: usize = 1024;

/// Reduce a mono waveform to its peak absolute amplitude per window.
///
/// Only full windows are emitted; a trailing partial window is dropped.
/// Input shorter than one window collapses to a single value so very
/// short clips still produce something to analyze.
pub fn window_peaks(samples: &[f32], window_size: usize) -> Vec<f32> {
    if window_size == 0 || samples.len() < window_size {
        return vec![peak(samples)];
    }

    samples
        .chunks_exact(window_size)
        .map(peak)
        .collect()
}

fn peak(window: &[f32]) -> f32 {
    window.iter().map(|s| s.abs()).fold(0.0, f32::max)
}
