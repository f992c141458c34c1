use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use minisynth::{Context, Note, Patch, Voice, U7};
use minisynth_host::{patch_channel, AudioPath, ControlPath, ReaderSource};

/// Play a single note through one minisynth voice and write it out as raw
/// little-endian f32 mono PCM
#[derive(Parser)]
#[command(name = "minisynth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// MIDI key number to play
    #[arg(short, long, default_value_t = 60)]
    note: u8,

    /// Note-on velocity, 1-127
    #[arg(short, long, default_value_t = 100)]
    velocity: u8,

    /// How long the key is held, in seconds
    #[arg(short, long, default_value_t = 0.5)]
    gate: f32,

    /// Total length of the output, in seconds
    #[arg(short, long, default_value_t = 1.0)]
    seconds: f32,

    /// Sample rate, in Hz
    #[arg(short = 'r', long, default_value_t = 48000)]
    sample_rate: u32,

    /// Samples rendered between patch updates
    #[arg(short, long, default_value_t = 256)]
    block_size: usize,

    /// File of serial control messages to apply while playing
    #[arg(short, long)]
    control: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let ctx = Context::try_from(cli.sample_rate)?;
    let note = Note::try_from(cli.note).map_err(|_| format!("invalid note {}", cli.note))?;
    let velocity = U7::try_from(cli.velocity)
        .ok()
        .filter(|v| u8::from(*v) > 0)
        .ok_or_else(|| format!("invalid velocity {}", cli.velocity))?;
    if cli.block_size == 0 {
        return Err("block size must be non-zero".into());
    }

    let mut control_source = match &cli.control {
        Some(path) => Some(ReaderSource::new(File::open(path)?)),
        None => None,
    };
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let (patch_tx, patch_rx) = patch_channel();
    let mut control = ControlPath::new(Patch::new(), patch_tx);
    let mut audio = AudioPath::new(Voice::new(ctx), patch_rx);

    let total = (cli.seconds.max(0.0) * ctx.sample_rate) as usize;
    let gate = ((cli.gate.max(0.0) * ctx.sample_rate) as usize).min(total);
    log::info!(
        "{} {}: rendering {} samples of {:?} at {} Hz",
        minisynth_host::NAME,
        minisynth_host::VERSION,
        total,
        note,
        cli.sample_rate
    );

    audio.voice_mut().note_on(note, velocity);
    let mut block = vec![0f32; cli.block_size];
    let mut pos = 0;
    let mut released = false;
    while pos < total {
        if let Some(source) = control_source.as_mut() {
            control.poll(source);
        }
        if !released && pos >= gate {
            audio.voice_mut().note_off();
            released = true;
        }
        let end = if released { total } else { gate };
        let len = cli.block_size.min(end - pos);
        let block = &mut block[..len];
        audio.render(block);
        for sample in block.iter() {
            out.write_all(&sample.to_le_bytes())?;
        }
        pos += len;
    }
    out.flush()?;

    if control_source.is_some() {
        let stats = control.stats();
        log::info!(
            "Control link: {} messages, {} framing errors, {} parity errors",
            stats.messages,
            stats.framing_errors,
            stats.parity_errors
        );
    }
    log::info!("Voice finished in state {:?}", audio.voice().state());
    Ok(())
}
