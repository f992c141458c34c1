//! This module provides objects to reason about the processing context.
//! Currently, the only information wrapped is the current audio sample rate.

use crate::SynthError;

#[derive(Clone, Copy, Debug, PartialEq)]
/// A processing context, passed to every device on every sample
pub struct Context {
    /// The sample rate, in Hz
    pub sample_rate: f32,
}

impl Context {
    /// The sample rate used when none is configured
    pub const DEFAULT_SAMPLE_RATE: u32 = 48000;
    /// Lowest sample rate accepted by [Context::try_from]
    pub const MIN_SAMPLE_RATE: u32 = 8000;
    /// Highest sample rate accepted by [Context::try_from]
    pub const MAX_SAMPLE_RATE: u32 = 192000;

    /// Create a new `Context`
    pub const fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }
    /// Create a new context with a sample rate of 48kHz
    pub const fn new_480() -> Self {
        Self::new(Self::DEFAULT_SAMPLE_RATE as f32)
    }
    /// Converts a duration in milliseconds to a (fractional) sample count
    pub fn ms_to_samples(&self, ms: f32) -> f32 {
        ms * self.sample_rate / 1000.0
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new_480()
    }
}

impl TryFrom<u32> for Context {
    type Error = SynthError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if (Self::MIN_SAMPLE_RATE..=Self::MAX_SAMPLE_RATE).contains(&value) {
            Ok(Self::new(value as f32))
        } else {
            Err(SynthError::UnsupportedSampleRate(value))
        }
    }
}
