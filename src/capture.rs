//! Raw I/Q capture reading.
//!
//! This module reads recorded tuner output — a flat file of interleaved
//! I/Q ADC codes — in fixed-size blocks of normalized `f32` samples, ready
//! to feed a decoder. The tuner driver itself is an external collaborator;
//! this reader only consumes what it recorded.

use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::sample::{samples_from_i16, samples_from_u8, Samples};

/// Raw sample encoding of a capture.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SampleFormat {
    /// Unsigned 8-bit ADC codes (RTL dongles).
    U8,
    /// Signed 16-bit little-endian samples.
    I16,
}

impl SampleFormat {
    /// Bytes per single sample value (I and Q each count as one).
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::I16 => 2,
        }
    }
}

/// A block reader over a raw I/Q capture.
///
/// Yields blocks of `block_size` interleaved normalized samples (so
/// `block_size / 2` complex pairs per block). Iteration ends at the first
/// short read.
pub struct Capture<R: Read> {
    reader: R,
    format: SampleFormat,
    block_size: usize,
}

impl Capture<std::io::BufReader<std::fs::File>> {
    /// Open a capture file.
    ///
    /// `block_size` counts raw sample values and must be positive and
    /// even, so blocks carry whole I/Q pairs.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        format: SampleFormat,
        block_size: usize,
    ) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::new(std::io::BufReader::new(file), format, block_size)
    }
}

impl<R: Read> Capture<R> {
    /// Wrap any byte reader as a capture source.
    pub fn new(reader: R, format: SampleFormat, block_size: usize) -> Result<Self> {
        if block_size == 0 || block_size % 2 != 0 {
            return Err(Error::config(format!(
                "block size must be positive and even, got {}",
                block_size
            )));
        }
        Ok(Self {
            reader,
            format,
            block_size,
        })
    }

    fn read_block(&mut self) -> Result<Samples> {
        let mut buffer = vec![0u8; self.block_size * self.format.bytes_per_sample()];
        self.reader.read_exact(&mut buffer)?;
        Ok(match self.format {
            SampleFormat::U8 => samples_from_u8(&buffer),
            SampleFormat::I16 => {
                let values: Vec<i16> = buffer
                    .chunks_exact(2)
                    .map(|c| i16::from_le_bytes([c[0], c[1]]))
                    .collect();
                samples_from_i16(&values)
            }
        })
    }
}

impl<R: Read> Iterator for Capture<R> {
    type Item = Result<Samples>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_block() {
            Ok(samples) => Some(Ok(samples)),
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => None,
            Err(e) => Some(Err(e)),
        }
    }
}
