//! Decoding of the serial control protocol.
//!
//! A controller sends parameter updates as 5-byte messages:
//!
//! | byte | contents |
//! |---|---|
//! | 0 | `0x80` start marker |
//! | 1 | parameter address, 7 bits |
//! | 2 | value bits 13-7 |
//! | 3 | value bits 6-0 |
//! | 4 | stop marker `0b11xx_xxxP` |
//!
//! Bytes 1-3 always have the high bit clear.  `P` is the parity of all the
//! bits of `value ^ address`.  Messages with a framing error are discarded
//! and the decoder hunts for the next start marker; messages with bad parity
//! are silently dropped.  Both cases are counted in [DecoderStats].

use arrayvec::ArrayVec;
use log::debug;
use wmidi::{U14, U7};

const MESSAGE_START: u8 = 0x80;
const DATA_FLAG: u8 = 0x80;
const STOP_MASK: u8 = 0xC0;
const MESSAGE_LEN: usize = 5;

/// Largest number of bytes [SerialDecoder::process] takes from its source in
/// one call
pub const READ_CHUNK: usize = 100;
/// Largest number of events one [SerialDecoder::process] call can return: one
/// per full message in the chunk, plus one finishing a message that started in
/// the previous chunk
pub const MAX_EVENTS_PER_READ: usize = READ_CHUNK / MESSAGE_LEN + 1;

/// A parameter update received from a controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlEvent {
    /// Parameter address (see [ParamId](crate::ParamId))
    pub address: U7,
    /// New raw value
    pub value: U14,
}

impl ControlEvent {
    /// Constructor
    pub const fn new(address: U7, value: U14) -> Self {
        Self { address, value }
    }
    /// The parity bit carried in this event's stop byte
    pub fn parity(&self) -> u8 {
        parity(u8::from(self.address), u16::from(self.value))
    }
    /// The wire representation of this event
    pub fn encode(&self) -> [u8; MESSAGE_LEN] {
        let value = u16::from(self.value);
        [
            MESSAGE_START,
            u8::from(self.address),
            (value >> 7) as u8 & 0x7F,
            value as u8 & 0x7F,
            STOP_MASK | self.parity(),
        ]
    }
}

fn parity(address: u8, value: u16) -> u8 {
    ((value ^ address as u16).count_ones() & 1) as u8
}

/// Where the decoder is within a message
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecoderState {
    /// Waiting for a start marker
    #[default]
    Start,
    /// Expecting the address byte
    ReadAddress,
    /// Expecting the high half of the value
    ReadValue1,
    /// Expecting the low half of the value
    ReadValue2,
    /// Expecting the stop byte
    ReadStop,
}

/// Counters describing the health of the control link
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Messages decoded and delivered
    pub messages: u32,
    /// Bytes that did not fit the message framing
    pub framing_errors: u32,
    /// Well-framed messages dropped for bad parity
    pub parity_errors: u32,
}

/// A non-blocking source of bytes, such as a UART receive buffer
pub trait ByteSource {
    /// Copy whatever is available, up to `buf.len()` bytes, into `buf` and
    /// return the number of bytes copied.  Returning 0 means nothing is
    /// available right now; this must never wait for input.
    fn read_bytes(&mut self, buf: &mut [u8]) -> usize;
}

impl ByteSource for &[u8] {
    fn read_bytes(&mut self, buf: &mut [u8]) -> usize {
        let count = buf.len().min(self.len());
        let (head, tail) = self.split_at(count);
        buf[..count].copy_from_slice(head);
        *self = tail;
        count
    }
}

/// Recovers [ControlEvent]s from the serial byte stream
///
/// The decoder holds only the message in progress, so it may be fed a byte
/// at a time or in arbitrarily split chunks.
#[derive(Clone, Debug, Default)]
pub struct SerialDecoder {
    state: DecoderState,
    address: u8,
    value: u16,
    stats: DecoderStats,
}

impl SerialDecoder {
    /// Constructor
    pub fn new() -> Self {
        Self::default()
    }
    /// Where the decoder is within a message
    pub fn state(&self) -> DecoderState {
        self.state
    }
    /// Counters since construction or the last [SerialDecoder::reset_stats]
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }
    /// Zero the counters
    pub fn reset_stats(&mut self) {
        self.stats = DecoderStats::default();
    }
    /// Consume one byte, returning an event if it completed a valid message
    pub fn push_byte(&mut self, byte: u8) -> Option<ControlEvent> {
        match self.state {
            DecoderState::Start => {
                if byte == MESSAGE_START {
                    self.begin_message();
                } else {
                    self.framing_error(byte);
                }
                None
            }
            _ if self.state != DecoderState::ReadStop && byte & DATA_FLAG != 0 => {
                self.resync(byte);
                None
            }
            DecoderState::ReadAddress => {
                self.address = byte;
                self.state = DecoderState::ReadValue1;
                None
            }
            DecoderState::ReadValue1 => {
                self.value = (byte as u16) << 7;
                self.state = DecoderState::ReadValue2;
                None
            }
            DecoderState::ReadValue2 => {
                self.value |= byte as u16;
                self.state = DecoderState::ReadStop;
                None
            }
            DecoderState::ReadStop => {
                if byte & STOP_MASK != STOP_MASK {
                    self.resync(byte);
                    return None;
                }
                self.state = DecoderState::Start;
                self.finish_message(byte & 1)
            }
        }
    }
    /// Decode every byte of `bytes`, passing each event to `on_event`
    pub fn decode(&mut self, bytes: &[u8], mut on_event: impl FnMut(ControlEvent)) {
        for byte in bytes {
            if let Some(event) = self.push_byte(*byte) {
                on_event(event);
            }
        }
    }
    /// Read up to [READ_CHUNK] bytes from `source` and decode them.  Returns
    /// immediately if nothing is available.
    pub fn process(
        &mut self,
        source: &mut impl ByteSource,
    ) -> ArrayVec<ControlEvent, MAX_EVENTS_PER_READ> {
        let mut buf = [0u8; READ_CHUNK];
        let count = source.read_bytes(&mut buf).min(READ_CHUNK);
        let mut events = ArrayVec::new();
        // bounded by MAX_EVENTS_PER_READ
        self.decode(&buf[..count], |event| events.push(event));
        events
    }
    fn begin_message(&mut self) {
        self.address = 0;
        self.value = 0;
        self.state = DecoderState::ReadAddress;
    }
    fn finish_message(&mut self, parity_bit: u8) -> Option<ControlEvent> {
        if parity_bit != parity(self.address, self.value) {
            self.stats.parity_errors = self.stats.parity_errors.wrapping_add(1);
            return None;
        }
        let event = ControlEvent::new(
            U7::try_from(self.address).ok()?,
            U14::try_from(self.value).ok()?,
        );
        self.stats.messages = self.stats.messages.wrapping_add(1);
        Some(event)
    }
    fn framing_error(&mut self, byte: u8) {
        debug!("serial framing error: {:#04x} in {:?}", byte, self.state);
        self.stats.framing_errors = self.stats.framing_errors.wrapping_add(1);
    }
    /// Abandon the message in progress.  A start marker begins a new one.
    fn resync(&mut self, byte: u8) {
        self.framing_error(byte);
        if byte == MESSAGE_START {
            self.begin_message();
        } else {
            self.state = DecoderState::Start;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(address: u8, value: u16) -> ControlEvent {
        ControlEvent::new(
            U7::try_from(address).unwrap(),
            U14::try_from(value).unwrap(),
        )
    }
    fn decode_all(decoder: &mut SerialDecoder, bytes: &[u8]) -> Vec<ControlEvent> {
        let mut events = Vec::new();
        decoder.decode(bytes, |e| events.push(e));
        events
    }

    #[test]
    fn decodes_message() {
        // 5 ^ 64 has three bits set
        let bytes = [0x80, 0x05, 0x00, 0x40, 0xC1];
        let mut decoder = SerialDecoder::new();
        assert_eq!(decode_all(&mut decoder, &bytes), [event(5, 64)]);
        assert_eq!(decoder.state(), DecoderState::Start);
        assert_eq!(event(5, 64).encode(), bytes);
        assert_eq!(decoder.stats().messages, 1);
    }
    #[test]
    fn drops_bad_parity() {
        let mut decoder = SerialDecoder::new();
        assert!(decode_all(&mut decoder, &[0x80, 0x05, 0x00, 0x40, 0xC0]).is_empty());
        assert_eq!(
            decoder.stats(),
            DecoderStats {
                messages: 0,
                framing_errors: 0,
                parity_errors: 1
            }
        );
        // the next message still gets through
        assert_eq!(
            decode_all(&mut decoder, &event(21, 16383).encode()),
            [event(21, 16383)]
        );
    }
    #[test]
    fn resyncs_on_spurious_start() {
        let mut decoder = SerialDecoder::new();
        let mut bytes = vec![0x80, 0x09];
        bytes.extend_from_slice(&event(9, 300).encode());
        assert_eq!(decode_all(&mut decoder, &bytes), [event(9, 300)]);
        assert_eq!(decoder.stats().framing_errors, 1);
    }
    #[test]
    fn skips_garbage() {
        let mut decoder = SerialDecoder::new();
        let mut bytes = vec![0x00, 0x7F, 0xC3, 0x80, 0x01, 0x02, 0x55];
        bytes.extend_from_slice(&event(3, 50).encode());
        bytes.extend_from_slice(&[0x80, 0x02, 0x01, 0x01, 0x81]);
        bytes.extend_from_slice(&event(4, 150).encode());
        assert_eq!(decode_all(&mut decoder, &bytes), [event(3, 50), event(4, 150)]);
        assert_eq!(decoder.stats().messages, 2);
        // three leading bytes, then one bad stop byte in each broken message
        assert_eq!(decoder.stats().framing_errors, 5);
        decoder.reset_stats();
        assert_eq!(decoder.stats(), DecoderStats::default());
    }
    #[test]
    fn split_messages() {
        let mut decoder = SerialDecoder::new();
        let bytes = event(12, 9000).encode();
        assert_eq!(decoder.push_byte(bytes[0]), None);
        assert_eq!(decoder.state(), DecoderState::ReadAddress);
        assert_eq!(decoder.push_byte(bytes[1]), None);
        assert_eq!(decoder.push_byte(bytes[2]), None);
        assert_eq!(decoder.state(), DecoderState::ReadValue2);
        assert_eq!(decoder.push_byte(bytes[3]), None);
        assert_eq!(decoder.state(), DecoderState::ReadStop);
        assert_eq!(decoder.push_byte(bytes[4]), Some(event(12, 9000)));
    }
    #[test]
    fn process_reads_in_chunks() {
        let mut stream = Vec::new();
        for i in 0..30u16 {
            stream.extend_from_slice(&event((i % 22) as u8, i * 100).encode());
        }
        let mut source: &[u8] = &stream;
        let mut decoder = SerialDecoder::new();
        let first = decoder.process(&mut source);
        assert_eq!(first.len(), 20);
        assert_eq!(source.len(), 50);
        let second = decoder.process(&mut source);
        assert_eq!(second.len(), 10);
        assert_eq!(second[9], event(29 % 22, 2900));
        assert!(decoder.process(&mut source).is_empty());
    }
}
