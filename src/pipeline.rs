//! Complete broadcast receive chains.
//!
//! This module wires the DSP blocks into ready-made decoders that take
//! interleaved I/Q blocks straight from the tuner and produce 48 kHz
//! stereo audio:
//!
//! - [`FmDecoder`]: wideband FM with pilot-locked stereo separation and
//!   de-emphasis. Falls back to dual mono while the pilot is unlocked.
//! - [`AmDecoder`]: envelope-detected AM, DC-blocked, duplicated into
//!   both channels.
//!
//! Both decoders report per-block signal quality through the
//! [`StereoAudio`] flags; a missing carrier or pilot is an ordinary state,
//! not an error.
//!
//! # Example
//!
//! ```
//! use superhet::pipeline::{FmDecoder, Region};
//!
//! let mut decoder = FmDecoder::new(1_008_000, Region::Worldwide);
//! let block = vec![0.0f32; 12_600]; // interleaved I/Q
//! let audio = decoder.process(&block);
//! assert_eq!(audio.left.len(), 300);
//! assert!(!audio.carrier);
//! ```

use tracing::debug;

use crate::dsp::am::AmDemodulator;
use crate::dsp::deemphasis::Deemphasizer;
use crate::dsp::downsample::Downsampler;
use crate::dsp::fir::low_pass_fir_coeffs;
use crate::dsp::fm::FmDemodulator;
use crate::dsp::stereo::StereoSeparator;
use crate::dsp::Demodulator;
use crate::sample::Samples;

/// Audio output rate of the decoders.
pub const AUDIO_RATE: u32 = 48_000;

/// Intermediate rate of the FM composite signal, high enough to carry the
/// full ±75 kHz deviation plus the 38 kHz stereo subcarrier.
const INTER_RATE: u32 = 336_000;

/// Maximum FM frequency deviation for broadcast stations.
const MAX_F: f32 = 75_000.0;

/// Stereo pilot tone frequency.
const PILOT_FREQ: u32 = 19_000;

/// Channel filter for the FM demodulator's input downsampling.
const FM_FILTER_FREQ: f32 = 60_000.0;
const FM_KERNEL_LEN: usize = 51;

/// Audio low-pass applied while downsampling the composite to audio rate.
/// The kernel is long enough to suppress the 19 kHz pilot and 38 kHz
/// subcarrier residue before decimation.
const AUDIO_FILTER_FREQ: f32 = 10_000.0;
const AUDIO_KERNEL_LEN: usize = 151;

/// Channel filter for AM reception.
const AM_FILTER_FREQ: f32 = 6_000.0;
const AM_KERNEL_LEN: usize = 151;

/// De-emphasis region, selecting the time constant the local broadcast
/// standard prescribes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// 50 µs de-emphasis (Europe and most of the world).
    #[default]
    Worldwide,
    /// 75 µs de-emphasis (North America, South Korea).
    Americas,
}

impl Region {
    fn time_constant_us(self) -> f64 {
        match self {
            Region::Worldwide => 50.0,
            Region::Americas => 75.0,
        }
    }
}

/// One block of decoded stereo audio with per-block signal flags.
#[derive(Debug, Clone)]
pub struct StereoAudio {
    /// Left channel at [`AUDIO_RATE`].
    pub left: Samples,
    /// Right channel, same length as `left`.
    pub right: Samples,
    /// Whether the stereo pilot was locked for this block.
    pub in_stereo: bool,
    /// Whether a carrier was detected (lagging by one block).
    pub carrier: bool,
}

/// Wideband FM receive chain: quadrature demodulation, stereo separation,
/// audio downsampling and de-emphasis.
pub struct FmDecoder {
    demodulator: FmDemodulator,
    stereo: StereoSeparator,
    left_downsampler: Downsampler,
    right_downsampler: Downsampler,
    left_deemph: Deemphasizer,
    right_deemph: Deemphasizer,
    in_stereo: bool,
    carrier: bool,
}

impl FmDecoder {
    /// Create a decoder for a tuner running at `in_rate` complex samples
    /// per second.
    ///
    /// # Panics
    ///
    /// Panics if `in_rate` is not an integer multiple of the 336 kHz
    /// intermediate rate.
    pub fn new(in_rate: u32, region: Region) -> Self {
        let audio_coeffs = low_pass_fir_coeffs(INTER_RATE as f32, AUDIO_FILTER_FREQ, AUDIO_KERNEL_LEN);
        Self {
            demodulator: FmDemodulator::new(in_rate, INTER_RATE, MAX_F, FM_FILTER_FREQ, FM_KERNEL_LEN),
            stereo: StereoSeparator::new(INTER_RATE, PILOT_FREQ),
            left_downsampler: Downsampler::new(INTER_RATE, AUDIO_RATE, audio_coeffs.clone()),
            right_downsampler: Downsampler::new(INTER_RATE, AUDIO_RATE, audio_coeffs),
            left_deemph: Deemphasizer::new(AUDIO_RATE, region.time_constant_us()),
            right_deemph: Deemphasizer::new(AUDIO_RATE, region.time_constant_us()),
            in_stereo: false,
            carrier: false,
        }
    }

    /// Decode one block of interleaved I/Q samples into stereo audio.
    pub fn process(&mut self, samples: &[f32]) -> StereoAudio {
        let mono = self.demodulator.demodulate(samples);
        let signal = self.stereo.separate(&mono);

        let (left, right): (Samples, Samples) = if signal.has_pilot {
            mono.iter()
                .zip(&signal.diff)
                .map(|(&m, &d)| (m + d, m - d))
                .unzip()
        } else {
            (mono.clone(), mono)
        };

        let mut left = self.left_downsampler.downsample(&left);
        let mut right = self.right_downsampler.downsample(&right);
        self.left_deemph.process_in_place(&mut left);
        self.right_deemph.process_in_place(&mut right);

        if signal.has_pilot != self.in_stereo {
            debug!(locked = signal.has_pilot, "stereo pilot lock changed");
            self.in_stereo = signal.has_pilot;
        }
        let carrier = self.demodulator.has_carrier();
        if carrier != self.carrier {
            debug!(present = carrier, "carrier detection changed");
            self.carrier = carrier;
        }

        StereoAudio {
            left,
            right,
            in_stereo: signal.has_pilot,
            carrier,
        }
    }

    /// Reset all continuity state, as after a gap in the stream or a
    /// retune.
    pub fn reset(&mut self) {
        self.demodulator.reset();
        self.stereo.reset();
        self.left_downsampler.reset();
        self.right_downsampler.reset();
        self.left_deemph.reset();
        self.right_deemph.reset();
        self.in_stereo = false;
        self.carrier = false;
    }
}

/// AM receive chain: envelope demodulation straight to audio rate, with a
/// DC blocker removing the carrier level from the envelope.
pub struct AmDecoder {
    demodulator: AmDemodulator,
    // DC blocker state: y[n] = x[n] - x[n-1] + a * y[n-1]
    dc_x1: f32,
    dc_y1: f32,
}

impl AmDecoder {
    const DC_POLE: f32 = 0.995;

    /// Create a decoder for a tuner running at `in_rate` complex samples
    /// per second.
    ///
    /// # Panics
    ///
    /// Panics if `in_rate` is not an integer multiple of the 48 kHz audio
    /// rate.
    pub fn new(in_rate: u32) -> Self {
        Self {
            demodulator: AmDemodulator::new(in_rate, AUDIO_RATE, AM_FILTER_FREQ, AM_KERNEL_LEN),
            dc_x1: 0.0,
            dc_y1: 0.0,
        }
    }

    /// Decode one block of interleaved I/Q samples into dual-mono audio.
    pub fn process(&mut self, samples: &[f32]) -> StereoAudio {
        let envelope = self.demodulator.demodulate(samples);
        let mut audio = Vec::with_capacity(envelope.len());
        for &x in &envelope {
            let y = x - self.dc_x1 + Self::DC_POLE * self.dc_y1;
            self.dc_x1 = x;
            self.dc_y1 = y;
            audio.push(y);
        }
        StereoAudio {
            left: audio.clone(),
            right: audio,
            in_stereo: false,
            carrier: self.demodulator.has_carrier(),
        }
    }

    /// Reset all continuity state, as after a gap in the stream or a
    /// retune.
    pub fn reset(&mut self) {
        self.demodulator.reset();
        self.dc_x1 = 0.0;
        self.dc_y1 = 0.0;
    }
}
