use crate::patch::ParamId;

/// Errors raised at the crate's API boundary.
///
/// Nothing on the per-sample path returns these: audio-rate setters clamp
/// instead, and the serial decoder recovers from bad input on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SynthError {
    /// A waveform id outside of the known [Waveform](crate::devices::Waveform)s
    #[error("invalid waveform id {0}")]
    InvalidWaveform(u16),
    /// A wire address that does not name any [ParamId]
    #[error("unknown parameter address {0}")]
    UnknownParameter(u8),
    /// A parameter value outside of the range given by [ParamId::range]
    #[error("value {value} is out of range for {param:?}")]
    ValueOutOfRange {
        /// The parameter being set
        param: ParamId,
        /// The rejected value
        value: u16,
    },
    /// A patch asked for an LFO to run at 0 Hz
    #[error("{0:?} must be non-zero")]
    ZeroFrequency(ParamId),
    /// The sample rate is not usable for processing
    #[error("unsupported sample rate {0} Hz")]
    UnsupportedSampleRate(u32),
}
