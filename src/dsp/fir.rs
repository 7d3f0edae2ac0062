//! FIR filter design and streaming convolution.
//!
//! This module provides:
//! - [`low_pass_fir_coeffs`]: windowed-sinc low-pass coefficient design
//! - [`FirFilter`]: a stateful FIR convolution engine that retains history
//!   across blocks, so a stream can be filtered in chunks without edge
//!   artifacts
//!
//! # Example
//!
//! ```
//! use superhet::dsp::fir::{low_pass_fir_coeffs, FirFilter};
//!
//! // 15 kHz low-pass for a 240 kHz stream, 51 taps
//! let coeffs = low_pass_fir_coeffs(240_000.0, 15_000.0, 51);
//! let mut filter = FirFilter::new(coeffs, 1);
//!
//! filter.load_samples(&vec![0.5; 100]);
//! let filtered = filter.get(99);
//! assert!((filtered - 0.5).abs() < 0.01);
//! ```

use std::f32::consts::PI;

/// Generate coefficients for a low-pass FIR filter with the given
/// half-amplitude frequency and kernel length at the given sample rate.
///
/// The design is a windowed sinc with a Hamming window for sidelobe
/// suppression. Coefficients are computed for one half of the kernel and
/// mirrored, so `coeffs[i] == coeffs[length - 1 - i]` holds exactly
/// (linear phase), and are normalized to unity gain at DC (sum 1).
///
/// # Panics
///
/// Panics if `length` is even or zero (a symmetric linear-phase kernel
/// needs a single center tap), or if `sample_rate` or `half_ampl_freq`
/// is not positive, or if `half_ampl_freq` is at or beyond Nyquist.
pub fn low_pass_fir_coeffs(sample_rate: f32, half_ampl_freq: f32, length: usize) -> Vec<f32> {
    assert!(length % 2 == 1, "Kernel length must be odd");
    assert!(sample_rate > 0.0, "Sample rate must be greater than 0");
    assert!(
        half_ampl_freq > 0.0 && half_ampl_freq < sample_rate / 2.0,
        "Cutoff must be in range (0, sample_rate / 2)"
    );

    if length == 1 {
        return vec![1.0];
    }

    let center = length / 2;
    let freq = half_ampl_freq / sample_rate;
    let mut coeffs = vec![0.0f32; length];

    for n in 0..=center {
        let x = (center - n) as f32;
        let sinc = if n == center {
            2.0 * freq
        } else {
            (2.0 * freq * PI * x).sin() / (PI * x)
        };
        // Hamming window
        let window = 0.54 - 0.46 * ((2.0 * PI * n as f32) / (length as f32 - 1.0)).cos();
        let tap = sinc * window;
        coeffs[n] = tap;
        coeffs[length - 1 - n] = tap;
    }

    // Normalize to unity gain at DC
    let norm: f32 = coeffs.iter().sum();
    for c in coeffs.iter_mut() {
        *c /= norm;
    }

    coeffs
}

/// A Finite Impulse Response filter with cross-block history.
///
/// The filter retains the trailing `(taps - 1) * step` samples of each
/// loaded block, so [`get`](FirFilter::get) near the start of a new block
/// still convolves against true history rather than zeros. Before the
/// first [`load_samples`](FirFilter::load_samples) the history is
/// zero-filled.
///
/// `step` strides the taps across the working window: a step of 1 filters
/// an ordinary stream, a step of 2 filters one channel of an interleaved
/// I/Q stream while skipping the other. Decimation is performed by the
/// caller evaluating `get` only at the decimated positions; see
/// [`Downsampler`](crate::dsp::downsample::Downsampler).
pub struct FirFilter {
    coefficients: Vec<f32>,
    step: usize,
    /// Number of history samples retained ahead of each block.
    offset: usize,
    /// Retained history followed by the current block.
    buffer: Vec<f32>,
}

impl FirFilter {
    /// Create a filter with the given coefficients and tap stride.
    ///
    /// # Panics
    ///
    /// Panics if `coefficients` is empty or `step` is 0.
    pub fn new(coefficients: Vec<f32>, step: usize) -> Self {
        assert!(!coefficients.is_empty(), "Coefficients must not be empty");
        assert!(step > 0, "Step must be greater than 0");

        let offset = (coefficients.len() - 1) * step;
        Self {
            coefficients,
            step,
            offset,
            buffer: vec![0.0; offset],
        }
    }

    /// Load a new block of samples, retaining the previous block's tail
    /// as history.
    pub fn load_samples(&mut self, samples: &[f32]) {
        let tail_start = self.buffer.len() - self.offset;
        let mut next = Vec::with_capacity(self.offset + samples.len());
        next.extend_from_slice(&self.buffer[tail_start..]);
        next.extend_from_slice(samples);
        self.buffer = next;
    }

    /// Return the filtered sample at `index` of the current block: the dot
    /// product of the coefficients with the `step`-strided window ending
    /// at that sample.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the current block (a caller contract
    /// violation), including any call before the first `load_samples`.
    pub fn get(&self, index: usize) -> f32 {
        let mut acc = 0.0;
        for (i, &c) in self.coefficients.iter().enumerate() {
            acc += c * self.buffer[index + i * self.step];
        }
        acc
    }

    /// Number of taps.
    pub fn taps(&self) -> usize {
        self.coefficients.len()
    }

    /// Clear the history, as after a gap in the stream.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.buffer.resize(self.offset, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_coeffs_normalized() {
        for length in [9, 41, 151, 351] {
            let coeffs = low_pass_fir_coeffs(96_000.0, 10_000.0, length);
            assert_eq!(coeffs.len(), length);
            let sum: f32 = coeffs.iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_coeffs_symmetric() {
        let coeffs = low_pass_fir_coeffs(336_000.0, 75_000.0, 151);
        let n = coeffs.len();
        for i in 0..n {
            // Exact equality: halves are mirrored at construction.
            assert_eq!(coeffs[i], coeffs[n - 1 - i]);
        }
    }

    #[test]
    #[should_panic(expected = "Kernel length must be odd")]
    fn test_coeffs_even_length() {
        let _ = low_pass_fir_coeffs(96_000.0, 10_000.0, 50);
    }

    #[test]
    #[should_panic(expected = "Kernel length must be odd")]
    fn test_coeffs_zero_length() {
        let _ = low_pass_fir_coeffs(96_000.0, 10_000.0, 0);
    }

    #[test]
    #[should_panic(expected = "Cutoff must be in range")]
    fn test_coeffs_cutoff_beyond_nyquist() {
        let _ = low_pass_fir_coeffs(96_000.0, 50_000.0, 51);
    }

    #[test]
    fn test_filter_dc_gain() {
        let coeffs = low_pass_fir_coeffs(96_000.0, 10_000.0, 41);
        let mut filter = FirFilter::new(coeffs, 1);
        filter.load_samples(&vec![1.0; 200]);
        // Past the kernel length the zero history has flushed out.
        for i in 50..200 {
            assert_relative_eq!(filter.get(i), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_filter_zero_history_at_start() {
        let coeffs = low_pass_fir_coeffs(96_000.0, 10_000.0, 41);
        let mut filter = FirFilter::new(coeffs, 1);
        filter.load_samples(&vec![1.0; 100]);
        // The first output convolves mostly against zero history.
        assert!(filter.get(0) < 0.5);
    }

    #[test]
    fn test_filter_continuity_across_blocks() {
        let coeffs = low_pass_fir_coeffs(96_000.0, 10_000.0, 31);
        let signal: Vec<f32> = (0..400)
            .map(|i| (i as f32 * 0.1).sin() + 0.3 * (i as f32 * 0.7).cos())
            .collect();

        let mut whole = FirFilter::new(coeffs.clone(), 1);
        whole.load_samples(&signal);
        let expected: Vec<f32> = (0..400).map(|i| whole.get(i)).collect();

        let mut chunked = FirFilter::new(coeffs, 1);
        let mut actual = Vec::new();
        for chunk in signal.chunks(150) {
            chunked.load_samples(chunk);
            for i in 0..chunk.len() {
                actual.push(chunked.get(i));
            }
        }

        for (a, e) in actual.iter().zip(&expected) {
            assert_relative_eq!(*a, *e, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_filter_strided_channels_independent() {
        // With step 2, even and odd interleaved channels never mix.
        let coeffs = low_pass_fir_coeffs(96_000.0, 10_000.0, 31);
        let mut filter = FirFilter::new(coeffs, 2);
        let interleaved: Vec<f32> = (0..400)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        filter.load_samples(&interleaved);
        for k in 60..150 {
            assert_relative_eq!(filter.get(2 * k), 1.0, epsilon = 1e-4);
            assert_relative_eq!(filter.get(2 * k + 1), -1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_filter_reset_clears_history() {
        let coeffs = low_pass_fir_coeffs(96_000.0, 10_000.0, 31);
        let mut filter = FirFilter::new(coeffs, 1);
        filter.load_samples(&vec![1.0; 100]);
        filter.reset();
        filter.load_samples(&vec![1.0; 100]);
        // Same attenuated start as a fresh filter.
        assert!(filter.get(0) < 0.5);
    }
}
