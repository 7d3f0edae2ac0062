#![doc = include_str!("../readme.md")]

pub mod capture;
pub mod dsp;
pub mod error;
pub mod pipeline;
pub mod sample;

// Re-export the main types for convenience
pub use error::{Error, Result};
pub use sample::{samples_from_i16, samples_from_u8, Samples};
