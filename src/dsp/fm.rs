//! FM quadrature demodulation.
//!
//! [`FmDemodulator`] downsamples the tuned I/Q stream and recovers the
//! instantaneous frequency from the phase rotation between consecutive
//! complex samples. The output is scaled so a deviation of `max_f`
//! maps to an amplitude of 1.

use num_complex::Complex;
use std::f32::consts::TAU;

use crate::sample::Samples;

use super::downsample::IqDownsampler;
use super::fir::low_pass_fir_coeffs;
use super::{Demodulator, CARRIER_THRESHOLD};

/// Demodulates I/Q-interleaved samples of a frequency-modulated signal
/// into raw audio.
///
/// The last complex sample of each block is carried into the next one, so
/// the first output of a new block is demodulated against true history
/// rather than a zero pair.
pub struct FmDemodulator {
    /// Output scale: phase increment per sample times this equals the
    /// deviation relative to `max_f`.
    ampl_conv: f32,
    downsampler: IqDownsampler,
    /// Last complex sample of the previous block.
    last: Complex<f32>,
    carrier: bool,
}

impl FmDemodulator {
    /// Create a demodulator for the given rates, maximum frequency
    /// deviation and channel filter.
    ///
    /// # Panics
    ///
    /// Panics if `max_f` is not positive, plus the rate and kernel
    /// preconditions of [`IqDownsampler`](super::downsample::IqDownsampler)
    /// and [`low_pass_fir_coeffs`](super::fir::low_pass_fir_coeffs).
    pub fn new(in_rate: u32, out_rate: u32, max_f: f32, filter_freq: f32, kernel_len: usize) -> Self {
        assert!(max_f > 0.0, "Maximum deviation must be greater than 0");
        let coeffs = low_pass_fir_coeffs(in_rate as f32, filter_freq, kernel_len);
        Self {
            ampl_conv: out_rate as f32 / (TAU * max_f),
            downsampler: IqDownsampler::new(in_rate, out_rate, coeffs),
            last: Complex::new(0.0, 0.0),
            carrier: false,
        }
    }

    /// Clear the continuity state, as after a gap in the stream.
    pub fn reset(&mut self) {
        self.downsampler.reset();
        self.last = Complex::new(0.0, 0.0);
        self.carrier = false;
    }
}

impl Demodulator for FmDemodulator {
    fn demodulate(&mut self, samples: &[f32]) -> Samples {
        let iq = self.downsampler.downsample(samples);
        let mut out = Vec::with_capacity(iq.len());
        let mut level = 0.0f32;
        for (&i, &q) in iq.i.iter().zip(&iq.q) {
            let cur = Complex::new(i, q);
            level += (i * i + q * q).sqrt();
            // Phase increment: arg(cur * conj(last))
            out.push((cur * self.last.conj()).arg() * self.ampl_conv);
            self.last = cur;
        }
        if !out.is_empty() {
            self.carrier = level / out.len() as f32 > CARRIER_THRESHOLD;
        }
        out
    }

    fn has_carrier(&self) -> bool {
        self.carrier
    }
}
