//! Raw sample buffer conversion.
//!
//! Tuner hardware delivers fixed-point ADC codes, most commonly unsigned
//! 8-bit (RTL dongles) or signed 16-bit (higher-end frontends). These
//! functions convert raw buffers into normalized `f32` sample blocks in
//! [-1, 1), the representation every stage downstream operates on.
//!
//! Both conversions are pure and stateless; block boundaries carry no
//! meaning at this level.

/// Type for sample block storage: one channel of audio or baseband data.
pub type Samples = Vec<f32>;

/// Convert a buffer of unsigned 8-bit ADC codes into normalized samples.
///
/// Each byte `b` maps to `(b - 128) / 128`, removing the mid-scale DC
/// offset of unsigned converters. A buffer of all-128 bytes converts to
/// exact zeros.
///
/// # Example
///
/// ```
/// use superhet::sample::samples_from_u8;
///
/// let samples = samples_from_u8(&[0, 128, 255]);
/// assert_eq!(samples[0], -1.0);
/// assert_eq!(samples[1], 0.0);
/// ```
pub fn samples_from_u8(buffer: &[u8]) -> Samples {
    buffer.iter().map(|&b| (b as f32 - 128.0) / 128.0).collect()
}

/// Convert a buffer of signed 16-bit samples into normalized samples.
///
/// Each value `v` maps to `v / 32768`.
///
/// # Example
///
/// ```
/// use superhet::sample::samples_from_i16;
///
/// let samples = samples_from_i16(&[-32768, 0, 16384]);
/// assert_eq!(samples[0], -1.0);
/// assert_eq!(samples[2], 0.5);
/// ```
pub fn samples_from_i16(buffer: &[i16]) -> Samples {
    buffer.iter().map(|&v| v as f32 / 32768.0).collect()
}
