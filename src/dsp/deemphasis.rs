//! De-emphasis filtering for FM broadcast audio.
//!
//! FM stations boost high frequencies before transmission (pre-emphasis)
//! to improve signal-to-noise ratio; [`Deemphasizer`] applies the inverse
//! single-pole low-pass to restore the original balance.
//!
//! Common time constants:
//! - Europe and most of the world: 50 µs
//! - North America, South Korea: 75 µs

/// A de-emphasis filter.
///
/// Single-pole exponential low-pass with `mult = exp(-1 / (rate * tau))`;
/// each sample is replaced by `val = x + (val - x) * mult`. The
/// accumulator persists across calls for the lifetime of the stream.
///
/// # Example
///
/// ```
/// use superhet::dsp::deemphasis::Deemphasizer;
///
/// let mut deemph = Deemphasizer::new(48_000, 50.0);
/// let mut audio = vec![0.1, 0.2, 0.3];
/// deemph.process_in_place(&mut audio);
/// ```
pub struct Deemphasizer {
    mult: f64,
    val: f64,
}

impl Deemphasizer {
    /// Create a filter for the given sample rate and time constant in
    /// microseconds.
    ///
    /// # Panics
    ///
    /// Panics if `sample_rate` is 0 or `time_constant_us` is not positive.
    pub fn new(sample_rate: u32, time_constant_us: f64) -> Self {
        assert!(sample_rate > 0, "Sample rate must be greater than 0");
        assert!(
            time_constant_us > 0.0,
            "Time constant must be greater than 0"
        );
        let tau = time_constant_us * 1e-6;
        Self {
            mult: (-1.0 / (sample_rate as f64 * tau)).exp(),
            val: 0.0,
        }
    }

    /// De-emphasize the given samples in place.
    pub fn process_in_place(&mut self, samples: &mut [f32]) {
        for s in samples.iter_mut() {
            let x = *s as f64;
            self.val = x + (self.val - x) * self.mult;
            *s = self.val as f32;
        }
    }

    /// Reset the accumulator, as after a gap in the stream.
    pub fn reset(&mut self) {
        self.val = 0.0;
    }
}
