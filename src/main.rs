use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use hound::{WavSpec, WavWriter};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use superhet::capture::{Capture, SampleFormat};
use superhet::pipeline::{AmDecoder, FmDecoder, Region, StereoAudio, AUDIO_RATE};

/// Decode raw I/Q captures to stereo WAV audio
#[derive(Parser, Debug)]
#[command(name = "superhet")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input raw I/Q capture file
    #[arg(value_name = "CAPTURE")]
    input: PathBuf,

    /// Capture sample format
    #[arg(short, long, value_enum, default_value = "u8")]
    format: Format,

    /// Capture rate in complex samples per second
    #[arg(short, long, default_value_t = 1_008_000)]
    rate: u32,

    /// Demodulation mode
    #[arg(short, long, value_enum, default_value = "fm")]
    mode: Mode,

    /// De-emphasis region
    #[arg(long, value_enum, default_value = "ww")]
    region: RegionArg,

    /// Raw samples per processing block (I and Q each count)
    #[arg(short, long, default_value_t = 126_000)]
    block: usize,

    /// Output WAV file
    #[arg(short, long, default_value = "audio.wav")]
    output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Format {
    U8,
    I16,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Mode {
    Fm,
    Am,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum RegionArg {
    /// Worldwide (50 µs de-emphasis)
    Ww,
    /// North America (75 µs de-emphasis)
    Na,
}

enum Decoder {
    Fm(Box<FmDecoder>),
    Am(Box<AmDecoder>),
}

impl Decoder {
    fn process(&mut self, samples: &[f32]) -> StereoAudio {
        match self {
            Decoder::Fm(decoder) => decoder.process(samples),
            Decoder::Am(decoder) => decoder.process(samples),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_target(false)
        .with_max_level(level)
        .init();

    // Validate the rate up front so a bad flag fails with a usage error
    // instead of a decoder panic.
    let rate_step = match args.mode {
        Mode::Fm => 336_000,
        Mode::Am => AUDIO_RATE,
    };
    if args.rate == 0 || args.rate % rate_step != 0 {
        eprintln!(
            "Error: --rate must be a positive multiple of {} for {:?} mode",
            rate_step, args.mode
        );
        std::process::exit(1);
    }

    let format = match args.format {
        Format::U8 => SampleFormat::U8,
        Format::I16 => SampleFormat::I16,
    };
    let region = match args.region {
        RegionArg::Ww => Region::Worldwide,
        RegionArg::Na => Region::Americas,
    };

    let capture = Capture::from_file(&args.input, format, args.block)?;
    let mut decoder = match args.mode {
        Mode::Fm => Decoder::Fm(Box::new(FmDecoder::new(args.rate, region))),
        Mode::Am => Decoder::Am(Box::new(AmDecoder::new(args.rate))),
    };

    let spec = WavSpec {
        channels: 2,
        sample_rate: AUDIO_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&args.output, spec)?;

    info!(
        "Decoding {} ({:?}, {} S/s) in {:?} mode",
        args.input.display(),
        format,
        args.rate,
        args.mode
    );

    let mut blocks = 0u64;
    let mut frames = 0u64;
    let mut stereo_blocks = 0u64;
    for block in capture {
        let block = block?;
        let audio = decoder.process(&block);
        for (l, r) in audio.left.iter().zip(&audio.right) {
            // Convert f32 [-1.0, 1.0] to i16, with some headroom
            writer.write_sample((l * 32000.0).clamp(-32768.0, 32767.0) as i16)?;
            writer.write_sample((r * 32000.0).clamp(-32768.0, 32767.0) as i16)?;
        }
        blocks += 1;
        frames += audio.left.len() as u64;
        if audio.in_stereo {
            stereo_blocks += 1;
        }
    }
    writer.finalize()?;

    info!(
        "Wrote {} ({:.1} s audio, {} blocks, {} in stereo)",
        args.output.display(),
        frames as f64 / AUDIO_RATE as f64,
        blocks,
        stereo_blocks
    );

    Ok(())
}
