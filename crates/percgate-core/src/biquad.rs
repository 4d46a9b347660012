//! Biquad (bi-quadratic) filter primitive.
//!
//! A second-order IIR filter in Direct Form I, with coefficient design
//! from the RBJ Audio EQ Cookbook. Each instance exclusively owns its
//! delay-line state; instances are never shared between chains, so two
//! filters fed the same signal cannot cross-contaminate history.
//!
//! Constructors are fallible: an invalid design returns `None` instead of
//! producing an unstable filter. Once constructed, [`Biquad::process`]
//! cannot fail and never allocates.

use core::f32::consts::PI;
use libm::{cosf, powf, sinf, sqrtf};

/// Highest usable band edge as a fraction of the sample rate.
///
/// Slightly below Nyquist so the warped center frequency of a wide band
/// stays in a numerically well-behaved region.
const MAX_BAND_EDGE_RATIO: f32 = 0.48;

/// Q range for detection bandpass design.
const BANDPASS_Q_MIN: f32 = 0.2;
const BANDPASS_Q_MAX: f32 = 8.0;

/// Second-order IIR filter: normalized coefficients plus two samples of
/// input/output history.
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Build from unnormalized RBJ coefficients.
    ///
    /// Returns `None` when `a0` is zero (the design would divide by zero)
    /// or any coefficient is non-finite after normalization.
    fn from_coefficients(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Option<Self> {
        if a0 == 0.0 {
            return None;
        }
        let a0_inv = 1.0 / a0;
        let filter = Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        let finite = filter.b0.is_finite()
            && filter.b1.is_finite()
            && filter.b2.is_finite()
            && filter.a1.is_finite()
            && filter.a2.is_finite();
        finite.then_some(filter)
    }

    /// Constant-skirt-gain bandpass over the band `[low, high]` Hz.
    ///
    /// Center frequency is the geometric mean of the edges; Q is derived
    /// from center over bandwidth and clamped to [0.2, 8.0]. Returns
    /// `None` for a non-positive sample rate, a degenerate band
    /// (`high <= low`, `low <= 0`), or a band reaching past 0.48 of the
    /// sample rate.
    pub fn bandpass(low_hz: f32, high_hz: f32, sample_rate: f32) -> Option<Self> {
        if sample_rate <= 0.0 || low_hz <= 0.0 || high_hz <= low_hz {
            return None;
        }
        if high_hz >= sample_rate * MAX_BAND_EDGE_RATIO {
            return None;
        }

        let center = sqrtf(low_hz * high_hz);
        let bandwidth = (high_hz - low_hz).max(1.0);
        let q = (center / bandwidth).clamp(BANDPASS_Q_MIN, BANDPASS_Q_MAX);

        let omega = 2.0 * PI * center / sample_rate;
        let sin_omega = sinf(omega);
        let cos_omega = cosf(omega);
        let alpha = sin_omega / (2.0 * q);

        // Constant skirt gain (peak gain = Q)
        let b0 = sin_omega / 2.0;
        let b1 = 0.0;
        let b2 = -sin_omega / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::from_coefficients(b0, b1, b2, a0, a1, a2)
    }

    /// RBJ highpass at `cutoff_hz`.
    ///
    /// Returns `None` when the cutoff does not fit the sample rate.
    pub fn highpass(cutoff_hz: f32, q: f32, sample_rate: f32) -> Option<Self> {
        if !cutoff_valid(cutoff_hz, q, sample_rate) {
            return None;
        }

        let omega = 2.0 * PI * cutoff_hz / sample_rate;
        let cos_omega = cosf(omega);
        let alpha = sinf(omega) / (2.0 * q);

        let b0 = (1.0 + cos_omega) / 2.0;
        let b1 = -(1.0 + cos_omega);
        let b2 = (1.0 + cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::from_coefficients(b0, b1, b2, a0, a1, a2)
    }

    /// RBJ lowpass at `cutoff_hz`.
    ///
    /// Returns `None` when the cutoff does not fit the sample rate.
    pub fn lowpass(cutoff_hz: f32, q: f32, sample_rate: f32) -> Option<Self> {
        if !cutoff_valid(cutoff_hz, q, sample_rate) {
            return None;
        }

        let omega = 2.0 * PI * cutoff_hz / sample_rate;
        let cos_omega = cosf(omega);
        let alpha = sinf(omega) / (2.0 * q);

        let b0 = (1.0 - cos_omega) / 2.0;
        let b1 = 1.0 - cos_omega;
        let b2 = (1.0 - cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::from_coefficients(b0, b1, b2, a0, a1, a2)
    }

    /// RBJ peaking EQ: boost or cut `gain_db` around `freq_hz`.
    pub fn peaking(freq_hz: f32, q: f32, gain_db: f32, sample_rate: f32) -> Option<Self> {
        if !cutoff_valid(freq_hz, q, sample_rate) {
            return None;
        }

        let a = powf(10.0, gain_db / 40.0);
        let omega = 2.0 * PI * freq_hz / sample_rate;
        let cos_omega = cosf(omega);
        let alpha = sinf(omega) / (2.0 * q);

        let b0 = 1.0 + alpha * a;
        let b1 = -2.0 * cos_omega;
        let b2 = 1.0 - alpha * a;
        let a0 = 1.0 + alpha / a;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha / a;

        Self::from_coefficients(b0, b1, b2, a0, a1, a2)
    }

    /// Process a single sample through the filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clear the delay lines without touching the coefficients.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// Shared validity check for single-frequency designs.
fn cutoff_valid(freq_hz: f32, q: f32, sample_rate: f32) -> bool {
    sample_rate > 0.0 && freq_hz > 0.0 && freq_hz < sample_rate * 0.5 && q > 0.0
}
