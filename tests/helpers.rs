//! Test helper utilities for generating and measuring synthetic signals
#![allow(dead_code)]

use std::f64::consts::{PI, TAU};

/// Generate one real tone: `ampl * sin(2π * freq * n / rate)`.
pub fn tone(n: usize, rate: f64, freq: f64, ampl: f64) -> Vec<f64> {
    (0..n)
        .map(|k| ampl * (TAU * freq * k as f64 / rate).sin())
        .collect()
}

/// Frequency-modulate a composite signal into interleaved I/Q samples.
///
/// The instantaneous frequency is `deviation * composite[n]`; the phase
/// accumulates in f64 and wraps to keep precision over long runs.
pub fn fm_modulate_iq(composite: &[f64], rate: f64, deviation: f64) -> Vec<f32> {
    let mut phase = 0.0f64;
    let mut out = Vec::with_capacity(composite.len() * 2);
    for &m in composite {
        phase += TAU * deviation * m / rate;
        if phase > PI {
            phase -= TAU;
        } else if phase < -PI {
            phase += TAU;
        }
        out.push(phase.cos() as f32);
        out.push(phase.sin() as f32);
    }
    out
}

/// Build a broadcast-style FM stereo composite signal.
///
/// Left channel carries a 1 kHz tone, right channel an 800 Hz tone; the
/// composite is `0.5*(L+R) + 0.1*pilot + 0.5*(L-R)*sin(2*pilot_phase)`
/// with a 19 kHz pilot, all phase-locked.
pub fn stereo_composite(n: usize, rate: f64, start: usize) -> Vec<f64> {
    (start..start + n)
        .map(|k| {
            let t = k as f64 / rate;
            let left = 0.4 * (TAU * 1_000.0 * t).sin();
            let right = 0.4 * (TAU * 800.0 * t).sin();
            let pilot_phase = TAU * 19_000.0 * t;
            0.5 * (left + right)
                + 0.1 * pilot_phase.sin()
                + 0.5 * (left - right) * (2.0 * pilot_phase).sin()
        })
        .collect()
}

/// Interleaved I/Q of an amplitude-modulated carrier at the tuned
/// frequency: `I = level * (1 + depth * sin(2π tone t))`, `Q = 0`.
pub fn am_tone_iq(pairs: usize, rate: f64, level: f64, depth: f64, tone_freq: f64) -> Vec<f32> {
    let mut out = Vec::with_capacity(pairs * 2);
    for k in 0..pairs {
        let t = k as f64 / rate;
        out.push((level * (1.0 + depth * (TAU * tone_freq * t).sin())) as f32);
        out.push(0.0);
    }
    out
}

/// Deterministic uniform noise in [-amplitude, amplitude] (xorshift64*).
pub fn noise(n: usize, amplitude: f32, seed: &mut u64) -> Vec<f32> {
    (0..n)
        .map(|_| {
            *seed ^= *seed << 13;
            *seed ^= *seed >> 7;
            *seed ^= *seed << 17;
            let unit = (*seed >> 11) as f32 / (1u64 << 53) as f32;
            (unit * 2.0 - 1.0) * amplitude
        })
        .collect()
}

/// Amplitude of the tone at `freq` via single-bin DFT projection:
/// `2 * |X(freq)| / N`. Exact for whole numbers of periods in the window.
pub fn tone_amplitude(signal: &[f32], rate: f64, freq: f64) -> f64 {
    let n = signal.len();
    let w = TAU * freq / rate;
    let (mut re, mut im) = (0.0f64, 0.0f64);
    for (k, &x) in signal.iter().enumerate() {
        let t = w * k as f64;
        re += x as f64 * t.cos();
        im += x as f64 * t.sin();
    }
    2.0 * (re * re + im * im).sqrt() / n as f64
}

/// Frequency of the strongest tone among `candidates`.
pub fn strongest_tone(signal: &[f32], rate: f64, candidates: &[f64]) -> f64 {
    let mut best = candidates[0];
    let mut best_ampl = -1.0;
    for &f in candidates {
        let a = tone_amplitude(signal, rate, f);
        if a > best_ampl {
            best_ampl = a;
            best = f;
        }
    }
    best
}
