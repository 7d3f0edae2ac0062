//! FM stereo separation.
//!
//! Broadcast FM stereo multiplexes a 19 kHz pilot tone and a DSB-SC
//! subcarrier at twice the pilot frequency carrying the L−R difference
//! signal. [`StereoSeparator`] tracks the pilot with a table-driven local
//! oscillator steered by correlation feedback, then multiplies the
//! composite signal by the regenerated 2×pilot reference to coherently
//! demodulate the difference channel.
//!
//! Lock detection is deliberately sluggish: the correlation statistics are
//! exponential moving averages with time constants in the 30–150 ms range
//! at broadcast composite rates, so `has_pilot` settles over a few blocks
//! instead of flapping on noisy signals.

use crate::sample::Samples;

/// Entries in the oscillator steering tables: one per 0.01 Hz step over
/// a ±40 Hz window around the pilot frequency.
const TABLE_SIZE: usize = 8001;

/// Upper bound on the correlation variance for the pilot to count as
/// locked.
const CORR_THRESHOLD: f32 = 400.0;

/// Correlation variance assumed before any signal has been seen; starts
/// the separator in the unlocked state.
const INITIAL_CORR_VARIANCE: f32 = 2.0 * CORR_THRESHOLD;

/// An exponential moving average with variance tracking.
///
/// `add` folds each value in with weight `1 / (weight + 1)`, giving a
/// decay time constant of about `weight` samples.
#[derive(Debug, Clone, Copy)]
struct ExpAverage {
    weight: f32,
    avg: f32,
    var: f32,
}

impl ExpAverage {
    fn new(weight: u32) -> Self {
        Self::with_variance(weight, 0.0)
    }

    fn with_variance(weight: u32, initial_var: f32) -> Self {
        Self {
            weight: weight as f32,
            avg: 0.0,
            var: initial_var,
        }
    }

    fn add(&mut self, value: f32) -> f32 {
        self.avg = (self.weight * self.avg + value) / (self.weight + 1.0);
        let dev = value - self.avg;
        self.var = (self.weight * self.var + dev * dev) / (self.weight + 1.0);
        self.avg
    }

    fn variance(&self) -> f32 {
        self.var
    }
}

/// A separated stereo signal: one block of the demodulated L−R channel
/// plus the pilot lock state after that block.
#[derive(Debug, Clone)]
pub struct StereoSignal {
    /// Whether the pilot tone is currently locked.
    pub has_pilot: bool,
    /// The recovered L−R difference signal.
    pub diff: Samples,
}

/// Extracts the stereo difference channel from a demodulated FM signal.
///
/// The local oscillator state (`sin`, `cos`) advances every sample by an
/// angle picked from precomputed tables spanning pilot − 40 Hz to
/// pilot + 40 Hz. The steering index comes from the ratio of two running
/// correlations of the input against the oscillator's quadrature outputs,
/// clamped to ±4 (±40 Hz), which closes the loop: a phase lead raises the
/// oscillator frequency until it catches up.
pub struct StereoSeparator {
    sin_table: Vec<f32>,
    cos_table: Vec<f32>,
    /// Local oscillator state, updated every sample.
    sin: f32,
    cos: f32,
    /// In-phase and quadrature correlation averages.
    iavg: ExpAverage,
    qavg: ExpAverage,
    /// Lock-strength statistic over the steering correlation.
    cavg: ExpAverage,
}

impl StereoSeparator {
    /// Create a separator for the given composite sample rate and pilot
    /// tone frequency (19 kHz for broadcast FM).
    ///
    /// # Panics
    ///
    /// Panics if `sample_rate` is 0 or the pilot is at or beyond Nyquist.
    pub fn new(sample_rate: u32, pilot_freq: u32) -> Self {
        assert!(sample_rate > 0, "Sample rate must be greater than 0");
        assert!(
            pilot_freq > 0 && 2 * pilot_freq < sample_rate,
            "Pilot frequency must be below half the sample rate"
        );

        let mut sin_table = vec![0.0f32; TABLE_SIZE];
        let mut cos_table = vec![0.0f32; TABLE_SIZE];
        for i in 0..TABLE_SIZE {
            let freq = (pilot_freq as f64 + i as f64 / 100.0 - 40.0)
                * std::f64::consts::TAU
                / sample_rate as f64;
            sin_table[i] = freq.sin() as f32;
            cos_table[i] = freq.cos() as f32;
        }

        Self {
            sin_table,
            cos_table,
            sin: 0.0,
            cos: 1.0,
            iavg: ExpAverage::new(9999),
            qavg: ExpAverage::new(9999),
            cavg: ExpAverage::with_variance(49999, INITIAL_CORR_VARIANCE),
        }
    }

    /// Lock on to the pilot tone and use it to demodulate the stereo
    /// difference channel from one block of composite signal.
    pub fn separate(&mut self, samples: &[f32]) -> StereoSignal {
        let mut diff = Vec::with_capacity(samples.len());
        for &x in samples {
            let hdev = self.iavg.add(x * self.sin);
            let vdev = self.qavg.add(x * self.cos);

            // Coherent product with the regenerated 2×pilot carrier.
            diff.push(x * self.sin * self.cos * 2.0);

            // Phase error estimate, clamped to the ±40 Hz steering range.
            let corr = if hdev > 0.0 {
                (vdev / hdev).clamp(-4.0, 4.0)
            } else if vdev == 0.0 {
                0.0
            } else if vdev > 0.0 {
                4.0
            } else {
                -4.0
            };
            let idx = ((corr + 4.0) * 1000.0).round() as usize;

            let new_sin = self.sin * self.cos_table[idx] + self.cos * self.sin_table[idx];
            self.cos = self.cos * self.cos_table[idx] - self.sin * self.sin_table[idx];
            self.sin = new_sin;

            self.cavg.add(corr * 10.0);
        }
        StereoSignal {
            has_pilot: self.cavg.variance() < CORR_THRESHOLD,
            diff,
        }
    }

    /// Reset the oscillator and correlation state, as after a gap in the
    /// stream.
    pub fn reset(&mut self) {
        self.sin = 0.0;
        self.cos = 1.0;
        self.iavg = ExpAverage::new(9999);
        self.qavg = ExpAverage::new(9999);
        self.cavg = ExpAverage::with_variance(49999, INITIAL_CORR_VARIANCE);
    }
}
