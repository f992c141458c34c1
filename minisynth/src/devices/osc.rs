use super::*;
use crate::tables::{KEY_COUNT, KEY_FREQUENCY, SINE_POINTS, SINE_TABLE};
use crate::SynthError;
use core::mem::transmute;
use num_traits::Float;
use oorandom::Rand32;

/// Default random seed to use if not provided a seed
const RANDOM_SEED: u64 = 1;

/// Modulation at full depth moves the frequency by this many Hz
const MODULATION_RANGE_HZ: f32 = 20.0;

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
/// The waveform produced by an [Oscillator]
pub enum Waveform {
    /// Sine wave is default
    #[default]
    Sine,
    /// Square wave
    Square,
    /// Sawtooth wave, rising
    Sawtooth,
    /// Triangle wave
    Triangle,
    /// Pulse wave, high for 1/8 of the period
    Pulse12,
    /// Pulse wave, high for 1/4 of the period
    Pulse25,
    /// White noise
    WhiteNoise,
}

impl Waveform {
    const ELEM: [Waveform; 7] = [
        Self::Sine,
        Self::Square,
        Self::Sawtooth,
        Self::Triangle,
        Self::Pulse12,
        Self::Pulse25,
        Self::WhiteNoise,
    ];
    /// Returns a slice to all of the possible Waveforms
    pub const fn waveforms() -> &'static [Waveform] {
        &Self::ELEM
    }
    /// Provides the name of the waveform (long-format)
    pub const fn to_str(&self) -> &'static str {
        [
            "Sine",
            "Square",
            "Sawtooth",
            "Triangle",
            "Pulse 12.5%",
            "Pulse 25%",
            "White Noise",
        ][*self as usize]
    }
    /// Provides the name of the waveform (short-format)
    ///
    /// This is a single character (for waveforms with unicode representations)
    /// or up to three character abbreviation (e.g. "P12")
    pub const fn to_str_short(&self) -> &'static str {
        [
            crate::util::SIN_CHARSTR,
            crate::util::SQ_CHARSTR,
            crate::util::SAW_CHARSTR,
            crate::util::TRI_CHARSTR,
            crate::util::PULSE12_STR,
            crate::util::PULSE25_STR,
            crate::util::NOISE_STR,
        ][*self as usize]
    }
    /// Try to create a Waveform from a u8
    pub const fn new_from_u8(value: u8) -> Option<Self> {
        if value <= Waveform::WhiteNoise as u8 {
            unsafe { Some(transmute::<u8, Waveform>(value)) }
        } else {
            None
        }
    }
    /// The fraction of the period a pulse wave spends high, if this is one
    const fn duty_cycle(&self) -> Option<f32> {
        match self {
            Self::Pulse12 => Some(0.125),
            Self::Pulse25 => Some(0.25),
            _ => None,
        }
    }
}

impl From<Waveform> for &'static str {
    fn from(value: Waveform) -> Self {
        value.to_str()
    }
}

impl TryFrom<u8> for Waveform {
    type Error = SynthError;
    fn try_from(value: u8) -> Result<Self, SynthError> {
        Self::new_from_u8(value).ok_or(SynthError::InvalidWaveform(value as u16))
    }
}

impl TryFrom<u16> for Waveform {
    type Error = SynthError;
    fn try_from(value: u16) -> Result<Self, SynthError> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new_from_u8)
            .ok_or(SynthError::InvalidWaveform(value))
    }
}

/// A general purpose, table-driven oscillator
///
/// The oscillator counts samples within the current period rather than
/// accumulating a fractional phase: the period is the sample rate divided by
/// the instantaneous frequency, rounded to a whole number of samples, and each
/// waveform is computed from the position of the counter within it.  Sine
/// output comes from the 360 point [SINE_TABLE].
///
/// The base frequency is set either directly in Hz or from a MIDI key via the
/// [KEY_FREQUENCY] table.  Detune and octave are applied in log2-frequency
/// space, so an octave shift exactly doubles or halves the frequency.  The
/// effective frequency is recomputed on every setter call and never on the
/// per-sample path.
///
/// The input to this node is the level of an optional modulator, e.g. an LFO.
/// At full modulation depth a modulator at `±1` moves the frequency by 20 Hz.
/// When modulation pulls the frequency to zero or below, the oscillator holds
/// its previous output for that sample.
///
/// Every oscillator owns its noise generator, so noise is reproducible for a
/// given seed and independent between oscillators.
#[derive(Clone, Debug)]
pub struct Oscillator {
    waveform: Waveform,
    frequency: f32,
    mid_frequency: f32,
    detune: f32,
    octave: f32,
    modulation_depth: f32,
    sample_count: u32,
    output: f32,
    rng: Rand32,
}

impl Oscillator {
    /// Constructor: a sine wave at 20 Hz
    pub fn new() -> Self {
        Self::with_seed(RANDOM_SEED)
    }
    /// Constructor, seeding the noise generator with `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self {
            waveform: Waveform::Sine,
            frequency: 20.0,
            mid_frequency: 20.0,
            detune: 0.0,
            octave: 0.0,
            modulation_depth: 0.0,
            sample_count: 0,
            output: 0.0,
            rng: Rand32::new(seed),
        }
    }
    /// Select the waveform to generate
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }
    /// The current waveform
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }
    /// Set the base frequency, in Hz.  Must be positive.
    pub fn set_frequency(&mut self, frequency: f32) {
        debug_assert!(frequency > 0.0, "oscillator frequency must be positive");
        if frequency > 0.0 && frequency.is_finite() {
            self.mid_frequency = frequency;
            self.update_frequency();
        }
    }
    /// Set the base frequency from a MIDI key number.  Keys beyond the end of
    /// the [KEY_FREQUENCY] table are ignored.
    pub fn set_midi_note(&mut self, note: u8) {
        if let Some(freq) = KEY_FREQUENCY.get(note as usize) {
            self.mid_frequency = *freq;
            self.update_frequency();
        }
    }
    /// Set the detune amount, in `[-1, 1]`.  Full scale bends the pitch by
    /// half an octave.
    pub fn set_detune(&mut self, detune: f32) {
        debug_assert!((-1.0..=1.0).contains(&detune), "detune out of range");
        self.detune = detune.clamp(-1.0, 1.0) / 2.0;
        self.update_frequency();
    }
    /// Shift the pitch by whole octaves, in `[-3, 2]`
    pub fn set_octave(&mut self, octave: i8) {
        debug_assert!((-3..=2).contains(&octave), "octave out of range");
        self.octave = octave.clamp(-3, 2) as f32;
        self.update_frequency();
    }
    /// Set how strongly the modulator input bends the frequency, in `[0, 1]`
    pub fn set_modulation_depth(&mut self, depth: f32) {
        debug_assert!((0.0..=1.0).contains(&depth), "modulation depth out of range");
        self.modulation_depth = depth.clamp(0.0, 1.0);
    }
    /// The effective (detuned, octave-shifted, unmodulated) frequency, in Hz
    pub fn frequency(&self) -> f32 {
        self.frequency
    }
    /// The base frequency before detune and octave are applied, in Hz
    pub fn base_frequency(&self) -> f32 {
        self.mid_frequency
    }
    /// Position within the current period, in samples
    pub fn phase(&self) -> u32 {
        self.sample_count
    }
    fn update_frequency(&mut self) {
        // 2^(log2(f) + x) == f * 2^x, and this form leaves f untouched when x == 0
        self.frequency = self.mid_frequency * Float::exp2(self.detune + self.octave);
    }
    fn calc_waveform(&mut self, period: u32) -> f32 {
        let count = self.sample_count;
        let fperiod = period as f32;
        match self.waveform {
            Waveform::Sine => {
                let index = (count as u64 * SINE_POINTS as u64) / period as u64;
                SINE_TABLE[index as usize]
            }
            Waveform::Square => {
                if count * 2 < period {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => -1.0 + (2.0 * count as f32) / fperiod,
            Waveform::Triangle => {
                let double = 2.0 * count as f32;
                if count * 2 < period {
                    -1.0 + (2.0 * double) / fperiod
                } else {
                    1.0 - (2.0 * (double - fperiod)) / fperiod
                }
            }
            Waveform::Pulse12 | Waveform::Pulse25 => {
                let duty = self.waveform.duty_cycle().unwrap_or(0.5);
                if (count as f32) < fperiod * duty {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::WhiteNoise => self.rng.rand_float() * 2.0 - 1.0,
        }
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalNode for Oscillator {
    /// The modulator's output level, or `None` when unmodulated
    type Input = Option<f32>;
    fn advance(&mut self, context: &Context, modulator: Option<f32>) {
        let mut frequency = self.frequency;
        if let Some(level) = modulator {
            frequency += level * self.modulation_depth * MODULATION_RANGE_HZ;
            if frequency <= 0.0 {
                return;
            }
        }
        let period = Float::round(context.sample_rate / frequency).max(1.0) as u32;
        self.sample_count += 1;
        if self.sample_count >= period {
            self.sample_count = 0;
        }
        self.output = clip(self.calc_waveform(period));
    }
    fn read_output(&self) -> f32 {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::calculate_cents;

    fn render(osc: &mut Oscillator, ctx: &Context, samples: usize) -> f32 {
        osc.render(ctx, core::iter::repeat(None)).take(samples).last().unwrap()
    }

    #[test]
    fn midi_notes_increase_monotonically() {
        let mut osc = Oscillator::new();
        let mut last = 0.0;
        for note in 0..KEY_COUNT as u8 {
            osc.set_midi_note(note);
            assert!(osc.frequency() > last);
            last = osc.frequency();
        }
        osc.set_midi_note(69);
        assert_eq!(osc.frequency(), 440.0);
    }
    #[test]
    fn out_of_range_note_is_ignored() {
        let mut osc = Oscillator::new();
        osc.set_midi_note(60);
        let freq = osc.frequency();
        osc.set_midi_note(KEY_COUNT as u8);
        osc.set_midi_note(127);
        assert_eq!(osc.frequency(), freq);
    }
    #[test]
    fn detune_is_symmetric_in_log_space() {
        let mut osc = Oscillator::new();
        osc.set_midi_note(57);
        let base = osc.base_frequency();
        for d in [0.05f32, 0.2, 0.5, 1.0] {
            osc.set_detune(d);
            let up = calculate_cents(base, osc.frequency());
            osc.set_detune(-d);
            let down = calculate_cents(base, osc.frequency());
            assert!((up + down).abs() < 0.01);
            assert!((up - 600.0 * d).abs() < 0.01);
        }
    }
    #[test]
    fn octave_round_trip() {
        let mut osc = Oscillator::new();
        osc.set_midi_note(64);
        osc.set_detune(0.3);
        let before = osc.frequency();
        for octave in -3..=2 {
            osc.set_octave(octave);
            osc.set_octave(0);
            assert_eq!(osc.frequency(), before);
        }
        osc.set_detune(0.0);
        osc.set_octave(1);
        assert_eq!(osc.frequency(), 2.0 * osc.base_frequency());
        osc.set_octave(-1);
        assert_eq!(osc.frequency(), 0.5 * osc.base_frequency());
    }
    #[test]
    fn output_stays_in_range() {
        let ctx = Context::default();
        for wave in Waveform::waveforms() {
            for freq in [0.5f32, 20.0, 133.0, 440.0, 5000.0, 23000.0] {
                let mut osc = Oscillator::with_seed(7);
                osc.set_waveform(*wave);
                osc.set_frequency(freq);
                for out in osc.render(&ctx, core::iter::repeat(None)).take(10000) {
                    assert!((-1.0..=1.0).contains(&out));
                }
            }
        }
    }
    #[test]
    fn sine_quarter_periods() {
        let ctx = Context::default();
        let mut osc = Oscillator::new();
        // 48000 / 360 samples per period: one table entry per sample
        osc.set_frequency(ctx.sample_rate / 360.0);
        assert_eq!(render(&mut osc, &ctx, 360), 0.0);
        assert_eq!(osc.phase(), 0);
        assert!((render(&mut osc, &ctx, 90) - 1.0).abs() < 1e-6);
        assert!(render(&mut osc, &ctx, 90).abs() < 1e-6);
        assert!((render(&mut osc, &ctx, 90) + 1.0).abs() < 1e-6);
    }
    #[test]
    fn waveform_shapes() {
        let ctx = Context::default();
        let mut osc = Oscillator::new();
        osc.set_frequency(ctx.sample_rate / 8.0);
        osc.set_waveform(Waveform::Square);
        let sq: Vec<f32> = osc.render(&ctx, core::iter::repeat(None)).take(8).collect();
        assert_eq!(sq, [1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0, 1.0]);
        osc.set_waveform(Waveform::Sawtooth);
        let saw: Vec<f32> = osc.render(&ctx, core::iter::repeat(None)).take(8).collect();
        assert_eq!(saw, [-0.75, -0.5, -0.25, 0.0, 0.25, 0.5, 0.75, -1.0]);
        osc.set_waveform(Waveform::Triangle);
        let tri: Vec<f32> = osc.render(&ctx, core::iter::repeat(None)).take(8).collect();
        assert_eq!(tri, [-0.5, 0.0, 0.5, 1.0, 0.5, 0.0, -0.5, -1.0]);
        osc.set_waveform(Waveform::Pulse25);
        let pulse: Vec<f32> = osc.render(&ctx, core::iter::repeat(None)).take(8).collect();
        assert_eq!(pulse, [1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, 1.0]);
    }
    #[test]
    fn negative_modulated_frequency_holds_output() {
        let ctx = Context::default();
        let mut osc = Oscillator::new();
        osc.set_waveform(Waveform::Sawtooth);
        osc.set_frequency(10.0);
        osc.set_modulation_depth(1.0);
        osc.advance(&ctx, Some(0.0));
        let (phase, out) = (osc.phase(), osc.read_output());
        // 10 Hz - 20 Hz < 0
        osc.advance(&ctx, Some(-1.0));
        assert_eq!(osc.phase(), phase);
        assert_eq!(osc.read_output(), out);
        osc.advance(&ctx, Some(1.0));
        assert_eq!(osc.phase(), phase + 1);
    }
    #[test]
    fn noise_is_reproducible_per_seed() {
        let ctx = Context::default();
        let mut a = Oscillator::with_seed(42);
        let mut b = Oscillator::with_seed(42);
        let mut c = Oscillator::with_seed(43);
        for osc in [&mut a, &mut b, &mut c] {
            osc.set_waveform(Waveform::WhiteNoise);
        }
        let a: Vec<f32> = a.render(&ctx, core::iter::repeat(None)).take(64).collect();
        let b: Vec<f32> = b.render(&ctx, core::iter::repeat(None)).take(64).collect();
        let c: Vec<f32> = c.render(&ctx, core::iter::repeat(None)).take(64).collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
    #[test]
    fn waveform_ids() {
        assert_eq!(Waveform::try_from(3u8), Ok(Waveform::Triangle));
        assert_eq!(Waveform::try_from(6u16), Ok(Waveform::WhiteNoise));
        assert_eq!(Waveform::try_from(7u8), Err(SynthError::InvalidWaveform(7)));
        assert_eq!(Waveform::try_from(300u16), Err(SynthError::InvalidWaveform(300)));
        for (i, wave) in Waveform::waveforms().iter().enumerate() {
            assert_eq!(*wave as usize, i);
        }
    }
    #[test]
    fn waveform_labels() {
        assert_eq!(Waveform::Sine.to_str_short(), crate::util::SIN_CHARSTR);
        assert_eq!(Waveform::Pulse12.to_str_short(), "P12");
        assert_eq!(Waveform::WhiteNoise.to_str_short(), "WN");
        assert_eq!(<&str>::from(Waveform::Triangle), "Triangle");
        let waves = Waveform::waveforms();
        for (i, a) in waves.iter().enumerate() {
            assert!(!a.to_str_short().is_empty());
            assert_eq!(<&str>::from(*a), a.to_str());
            for b in &waves[i + 1..] {
                assert_ne!(a.to_str_short(), b.to_str_short());
                assert_ne!(a.to_str(), b.to_str());
            }
        }
    }
}
