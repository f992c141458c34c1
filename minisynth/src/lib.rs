//! This crate contains the signal core of the synthesizer: the per-sample
//! DSP devices, the [voice::Voice] that wires them into a fixed subtractive
//! signal graph, and the [serial::SerialDecoder] that recovers parameter
//! updates from a controller's byte stream.
//!
//! The crate is `no_std` and does not allocate, so the same code runs inside a
//! host's audio callback or on a bare-metal target.  Everything on the
//! per-sample path is bounded and lock-free; the only floating point type used
//! is `f32`.
//!
//! Most of the relevant code for users can be found in the [devices] and
//! [voice] modules.  Patch parameters and their wire addresses live in
//! [patch].

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod context;
pub mod devices;
mod error;
pub mod patch;
pub mod serial;
pub mod tables;
pub mod util;
pub mod voice;

pub use context::Context;
pub use error::SynthError;
pub use patch::{ParamId, ParamSource, Patch};
pub use serial::{ByteSource, ControlEvent, DecoderStats, SerialDecoder};
pub use voice::{Voice, VoiceState};

/// Re-exported so callers can name key numbers and velocities without
/// depending on `wmidi` directly
pub use wmidi::{Note, U14, U7};
