//! A reference host for the minisynth core.
//!
//! The host is split along the two paths the core expects: a [ControlPath]
//! that turns controller bytes into patch snapshots, and an [AudioPath] that
//! owns a [Voice] and picks up new snapshots only between blocks of samples.
//! The two talk over a bounded channel, so they may run on different threads.

use std::io::{ErrorKind, Read};
use std::sync::mpsc;

use minisynth::{ByteSource, DecoderStats, Patch, SerialDecoder, Voice};

/// Name of the program
pub const NAME: &str = "Minisynth";
/// Version of the program
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How many patch snapshots may be queued between the control and audio paths
pub const PATCH_QUEUE_DEPTH: usize = 1;

/// Create the channel a [ControlPath] publishes patches to and an [AudioPath]
/// reads them from
pub fn patch_channel() -> (mpsc::SyncSender<Patch>, mpsc::Receiver<Patch>) {
    mpsc::sync_channel(PATCH_QUEUE_DEPTH)
}

/// Adapts a [Read] implementation (a file, a serial port, a pipe) to a
/// [ByteSource]
pub struct ReaderSource<R: Read> {
    reader: R,
    eof: bool,
}

impl<R: Read> ReaderSource<R> {
    /// Constructor
    pub fn new(reader: R) -> Self {
        Self { reader, eof: false }
    }
    /// True once the reader has reported end of file or failed
    pub fn is_eof(&self) -> bool {
        self.eof
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> usize {
        if self.eof {
            return 0;
        }
        match self.reader.read(buf) {
            Ok(0) if !buf.is_empty() => {
                log::info!("Control stream closed");
                self.eof = true;
                0
            }
            Ok(n) => n,
            Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => 0,
            Err(e) => {
                log::error!("Failed to read control stream: {}", e);
                self.eof = true;
                0
            }
        }
    }
}

/// Decodes controller input into a patch and publishes snapshots of it
pub struct ControlPath {
    decoder: SerialDecoder,
    patch: Patch,
    patch_tx: mpsc::SyncSender<Patch>,
    pending: bool,
}

impl ControlPath {
    /// Constructor, starting from `patch`
    pub fn new(patch: Patch, patch_tx: mpsc::SyncSender<Patch>) -> Self {
        Self {
            decoder: SerialDecoder::new(),
            patch,
            patch_tx,
            pending: false,
        }
    }
    /// The patch as edited so far
    pub fn patch(&self) -> &Patch {
        &self.patch
    }
    /// Link health counters from the decoder
    pub fn stats(&self) -> DecoderStats {
        self.decoder.stats()
    }
    /// Decode whatever `source` has available and apply it to the patch.  If
    /// the patch has changed since the last snapshot was accepted, publish a
    /// new one without blocking.  Returns the number of parameters changed.
    pub fn poll(&mut self, source: &mut impl ByteSource) -> usize {
        let mut applied = 0;
        for event in self.decoder.process(source) {
            match self.patch.apply_event(event) {
                Ok(id) => {
                    log::debug!("{} = {}", id.to_str(), self.patch.get(id));
                    applied += 1;
                }
                Err(e) => log::warn!("Rejected control message {:?}: {}", event, e),
            }
        }
        self.pending |= applied > 0;
        if self.pending {
            self.publish();
        }
        applied
    }
    fn publish(&mut self) {
        match self.patch_tx.try_send(self.patch.clone()) {
            Ok(()) => self.pending = false,
            // the audio path hasn't caught up; try again on the next poll
            Err(mpsc::TrySendError::Full(_)) => {}
            Err(mpsc::TrySendError::Disconnected(_)) => {
                log::warn!("Audio path is gone, dropping patch update");
                self.pending = false;
            }
        }
    }
}

/// Runs a [Voice], applying patch snapshots between blocks
pub struct AudioPath {
    voice: Voice,
    patch_rx: mpsc::Receiver<Patch>,
}

impl AudioPath {
    /// Constructor
    pub fn new(voice: Voice, patch_rx: mpsc::Receiver<Patch>) -> Self {
        Self { voice, patch_rx }
    }
    /// The voice being played
    pub fn voice(&self) -> &Voice {
        &self.voice
    }
    /// The voice being played, for note events
    pub fn voice_mut(&mut self) -> &mut Voice {
        &mut self.voice
    }
    /// Apply the newest queued patch, if any, then fill `out` with samples
    pub fn render(&mut self, out: &mut [f32]) {
        if let Some(patch) = self.patch_rx.try_iter().last() {
            match self.voice.apply_patch(&patch) {
                Ok(()) => log::debug!("Applied patch update"),
                Err(e) => log::warn!("Ignoring patch update: {}", e),
            }
        }
        self.voice.render(out);
    }
}
