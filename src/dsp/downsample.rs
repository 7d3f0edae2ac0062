//! Anti-aliased integer-ratio downsampling.
//!
//! This module provides:
//! - [`Downsampler`]: low-pass filter plus decimation for one real stream
//! - [`IqDownsampler`]: deinterleaves an I/Q-interleaved stream and
//!   downsamples both channels with identical phase
//! - [`IqSamples`]: the deinterleaved output pair
//!
//! Both downsamplers reject non-integer rate ratios at construction;
//! fractional resampling is deliberately out of scope.
//!
//! # Example
//!
//! ```
//! use superhet::dsp::downsample::Downsampler;
//! use superhet::dsp::fir::low_pass_fir_coeffs;
//!
//! let coeffs = low_pass_fir_coeffs(96_000.0, 10_000.0, 41);
//! let mut down = Downsampler::new(96_000, 48_000, coeffs);
//!
//! let output = down.downsample(&vec![0.5; 1000]);
//! assert_eq!(output.len(), 500);
//! ```

use crate::sample::Samples;

use super::fir::FirFilter;

/// A deinterleaved I/Q sample block.
///
/// `i` and `q` always have equal length.
#[derive(Debug, Clone)]
pub struct IqSamples {
    /// In-phase channel samples.
    pub i: Samples,
    /// Quadrature channel samples.
    pub q: Samples,
}

impl IqSamples {
    /// Number of complex samples in the block.
    pub fn len(&self) -> usize {
        self.i.len()
    }

    /// Whether the block is empty.
    pub fn is_empty(&self) -> bool {
        self.i.is_empty()
    }
}

fn decimation_factor(in_rate: u32, out_rate: u32) -> usize {
    assert!(in_rate > 0, "Input rate must be greater than 0");
    assert!(out_rate > 0, "Output rate must be greater than 0");
    assert!(
        in_rate % out_rate == 0,
        "Input rate must be an integer multiple of the output rate"
    );
    (in_rate / out_rate) as usize
}

/// Applies a low-pass filter and resamples one real stream to a lower rate.
///
/// The FIR filter runs at the input rate over consecutive samples; only
/// every `in_rate / out_rate`-th filtered sample is evaluated, which
/// performs the decimation without a separate pass. Filter history is
/// carried across blocks.
pub struct Downsampler {
    filter: FirFilter,
    factor: usize,
}

impl Downsampler {
    /// Create a downsampler for the given rates and anti-alias
    /// coefficients.
    ///
    /// # Panics
    ///
    /// Panics if either rate is 0 or `in_rate` is not an integer multiple
    /// of `out_rate`.
    pub fn new(in_rate: u32, out_rate: u32, coefficients: Vec<f32>) -> Self {
        Self {
            filter: FirFilter::new(coefficients, 1),
            factor: decimation_factor(in_rate, out_rate),
        }
    }

    /// Filter and decimate one block.
    ///
    /// Returns `floor(samples.len() / factor)` output samples.
    pub fn downsample(&mut self, samples: &[f32]) -> Samples {
        self.filter.load_samples(samples);
        let out_len = samples.len() / self.factor;
        (0..out_len).map(|k| self.filter.get(k * self.factor)).collect()
    }

    /// Clear the filter history, as after a gap in the stream.
    pub fn reset(&mut self) {
        self.filter.reset();
    }
}

/// Deinterleaves and downsamples an I/Q stream coming from the tuner.
///
/// The input block interleaves the two channels: even indices are I, odd
/// indices are Q. A single step-2 [`FirFilter`] convolves each channel
/// over its own samples; output `k` evaluates the filter at positions
/// `2*k*factor` (I) and `2*k*factor + 1` (Q), keeping both channels in
/// phase lock through identical filter delay.
pub struct IqDownsampler {
    filter: FirFilter,
    factor: usize,
}

impl IqDownsampler {
    /// Create a downsampler for the given per-channel rates and
    /// anti-alias coefficients.
    ///
    /// `in_rate` and `out_rate` are complex-pair rates; the interleaved
    /// input block carries `2 * in_rate` values per second.
    ///
    /// # Panics
    ///
    /// Panics if either rate is 0 or `in_rate` is not an integer multiple
    /// of `out_rate`.
    pub fn new(in_rate: u32, out_rate: u32, coefficients: Vec<f32>) -> Self {
        Self {
            filter: FirFilter::new(coefficients, 2),
            factor: decimation_factor(in_rate, out_rate),
        }
    }

    /// Deinterleave, filter and decimate one interleaved block.
    ///
    /// Returns `floor(samples.len() / (2 * factor))` complex samples.
    pub fn downsample(&mut self, samples: &[f32]) -> IqSamples {
        debug_assert!(
            samples.len() % 2 == 0,
            "interleaved I/Q block must contain whole sample pairs"
        );
        self.filter.load_samples(samples);
        let out_len = samples.len() / (2 * self.factor);
        let mut i = Vec::with_capacity(out_len);
        let mut q = Vec::with_capacity(out_len);
        for k in 0..out_len {
            let base = 2 * k * self.factor;
            i.push(self.filter.get(base));
            q.push(self.filter.get(base + 1));
        }
        IqSamples { i, q }
    }

    /// Clear the filter history, as after a gap in the stream.
    pub fn reset(&mut self) {
        self.filter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::fir::low_pass_fir_coeffs;
    use approx::assert_relative_eq;

    fn coeffs() -> Vec<f32> {
        low_pass_fir_coeffs(96_000.0, 10_000.0, 41)
    }

    #[test]
    fn test_output_length_law() {
        let mut down = Downsampler::new(96_000, 24_000, coeffs());
        for len in [0, 3, 4, 100, 1001, 4096] {
            let out = down.downsample(&vec![0.0; len]);
            assert_eq!(out.len(), len / 4);
        }
    }

    #[test]
    #[should_panic(expected = "integer multiple")]
    fn test_non_integer_ratio_rejected() {
        let _ = Downsampler::new(96_000, 36_000, coeffs());
    }

    #[test]
    #[should_panic(expected = "Output rate must be greater than 0")]
    fn test_zero_out_rate_rejected() {
        let _ = Downsampler::new(96_000, 0, coeffs());
    }

    #[test]
    fn test_dc_passthrough() {
        let mut down = Downsampler::new(96_000, 48_000, coeffs());
        let out = down.downsample(&vec![1.0; 1000]);
        for &s in &out[50..] {
            assert_relative_eq!(s, 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_continuity_across_blocks() {
        let signal: Vec<f32> = (0..1200).map(|i| (i as f32 * 0.05).sin()).collect();

        let mut whole = Downsampler::new(96_000, 24_000, coeffs());
        let expected = whole.downsample(&signal);

        // Chunk sizes stay multiples of the factor so the decimation grid
        // is preserved across blocks.
        let mut chunked = Downsampler::new(96_000, 24_000, coeffs());
        let mut actual = Vec::new();
        for chunk in signal.chunks(400) {
            actual.extend(chunked.downsample(chunk));
        }

        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(&expected) {
            assert_relative_eq!(*a, *e, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_iq_channel_lengths_equal() {
        let mut down = IqDownsampler::new(96_000, 24_000, coeffs());
        let out = down.downsample(&vec![0.0; 1000]);
        assert_eq!(out.i.len(), out.q.len());
        assert_eq!(out.len(), 125);
    }

    #[test]
    fn test_iq_deinterleave() {
        // Even indices carry I, odd indices carry Q; constant but distinct
        // channel values must come through unmixed.
        let mut down = IqDownsampler::new(96_000, 48_000, coeffs());
        let interleaved: Vec<f32> = (0..2000)
            .map(|i| if i % 2 == 0 { 0.75 } else { -0.25 })
            .collect();
        let out = down.downsample(&interleaved);
        for k in 50..out.len() {
            assert_relative_eq!(out.i[k], 0.75, epsilon = 1e-3);
            assert_relative_eq!(out.q[k], -0.25, epsilon = 1e-3);
        }
    }

    #[test]
    #[should_panic(expected = "integer multiple")]
    fn test_iq_non_integer_ratio_rejected() {
        let _ = IqDownsampler::new(100_000, 48_000, coeffs());
    }
}
