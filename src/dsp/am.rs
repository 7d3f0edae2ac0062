//! AM envelope demodulation.
//!
//! [`AmDemodulator`] downsamples the tuned I/Q stream to the audio rate
//! and recovers the amplitude envelope `sqrt(i^2 + q^2)` of each complex
//! sample. The envelope is returned as-is; removing its DC term is the
//! caller's concern (see [`AmDecoder`](crate::pipeline::AmDecoder)).

use crate::sample::Samples;

use super::downsample::IqDownsampler;
use super::fir::low_pass_fir_coeffs;
use super::{Demodulator, CARRIER_THRESHOLD};

/// Demodulates I/Q-interleaved samples of an amplitude-modulated signal
/// into raw audio.
pub struct AmDemodulator {
    downsampler: IqDownsampler,
    carrier: bool,
}

impl AmDemodulator {
    /// Create a demodulator for the given rates and channel filter.
    ///
    /// `filter_freq` and `kernel_len` configure the low-pass filter
    /// applied while downsampling from `in_rate` to `out_rate`.
    ///
    /// # Panics
    ///
    /// Panics on the rate and kernel preconditions of
    /// [`IqDownsampler`](super::downsample::IqDownsampler) and
    /// [`low_pass_fir_coeffs`](super::fir::low_pass_fir_coeffs).
    pub fn new(in_rate: u32, out_rate: u32, filter_freq: f32, kernel_len: usize) -> Self {
        let coeffs = low_pass_fir_coeffs(in_rate as f32, filter_freq, kernel_len);
        Self {
            downsampler: IqDownsampler::new(in_rate, out_rate, coeffs),
            carrier: false,
        }
    }

    /// Clear the continuity state, as after a gap in the stream.
    pub fn reset(&mut self) {
        self.downsampler.reset();
        self.carrier = false;
    }
}

impl Demodulator for AmDemodulator {
    fn demodulate(&mut self, samples: &[f32]) -> Samples {
        let iq = self.downsampler.downsample(samples);
        let mut sum = 0.0f32;
        let out: Samples = iq
            .i
            .iter()
            .zip(&iq.q)
            .map(|(&i, &q)| {
                let ampl = (i * i + q * q).sqrt();
                sum += ampl;
                ampl
            })
            .collect();
        if !out.is_empty() {
            self.carrier = sum / out.len() as f32 > CARRIER_THRESHOLD;
        }
        out
    }

    fn has_carrier(&self) -> bool {
        self.carrier
    }
}
