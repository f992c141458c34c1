//! This module contains a struct composing the devices into a single voice
//! unit for a basic subtractive synthesizer.

use crate::context::Context;
use crate::devices::*;
use crate::patch::{ParamId, ParamSource, Patch};
use crate::SynthError;
use wmidi::{Note, U7};

const DEFAULT_SEED: u64 = 1;
const VELOCITY_MAX: f32 = 127.0;

/// What a [Voice] is doing, derived from its amplifier envelope
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceState {
    /// Silent and free to take a new note
    Idle,
    /// Sounding a held note
    Active,
    /// The note was released and is fading out
    Releasing,
}

#[derive(Clone, Copy, Debug)]
struct EnvSettings {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
}

impl EnvSettings {
    fn read<P: ParamSource + ?Sized>(source: &P, ids: [ParamId; 4]) -> Result<Self, SynthError> {
        let [attack, decay, sustain, release] = ids;
        Ok(Self {
            attack: checked(source, attack)? as f32,
            decay: checked(source, decay)? as f32,
            sustain: percent(source, sustain)?,
            release: checked(source, release)? as f32,
        })
    }
    fn apply(&self, env: &mut Env) {
        env.set_attack(self.attack);
        env.set_decay(self.decay);
        env.set_sustain(self.sustain);
        env.set_release(self.release);
    }
}

/// Every patch value, validated and scaled to the units the devices expect
#[derive(Clone, Copy, Debug)]
struct VoiceSettings {
    lfo_vco_wave: Waveform,
    lfo_vco_freq: f32,
    vco_wave: Waveform,
    vco_mod: f32,
    vco2_detune: f32,
    vco2_octave: i8,
    lfo_vcf_wave: Waveform,
    lfo_vcf_freq: f32,
    vcf_cutoff: f32,
    vcf_resonance: f32,
    eg_vcf: EnvSettings,
    vcf_mod: f32,
    lfo_vca_wave: Waveform,
    lfo_vca_freq: f32,
    eg_vca: EnvSettings,
    vca_mod: f32,
}

fn checked<P: ParamSource + ?Sized>(source: &P, id: ParamId) -> Result<u16, SynthError> {
    let value = source.get_parameter(id);
    if id.range().contains(&value) {
        Ok(value)
    } else {
        Err(SynthError::ValueOutOfRange { param: id, value })
    }
}

fn percent<P: ParamSource + ?Sized>(source: &P, id: ParamId) -> Result<f32, SynthError> {
    Ok(checked(source, id)? as f32 / 100.0)
}

fn waveform<P: ParamSource + ?Sized>(source: &P, id: ParamId) -> Result<Waveform, SynthError> {
    Waveform::try_from(source.get_parameter(id))
}

/// An LFO rate, in Hz, given the parameter's unit as a fraction of a Hz
fn lfo_rate<P: ParamSource + ?Sized>(
    source: &P,
    id: ParamId,
    unit: f32,
) -> Result<f32, SynthError> {
    if source.get_parameter(id) == 0 {
        return Err(SynthError::ZeroFrequency(id));
    }
    Ok(checked(source, id)? as f32 * unit)
}

impl VoiceSettings {
    fn read<P: ParamSource + ?Sized>(source: &P) -> Result<Self, SynthError> {
        Ok(Self {
            lfo_vco_wave: waveform(source, ParamId::LfoVcoWaveform)?,
            lfo_vco_freq: lfo_rate(source, ParamId::LfoVcoFrequency, 1.0)?,
            vco_wave: waveform(source, ParamId::VcoWaveform)?,
            vco_mod: percent(source, ParamId::VcoModulationVolume)?,
            vco2_detune: checked(source, ParamId::VcoDetune)? as f32 / 100.0 - 1.0,
            vco2_octave: checked(source, ParamId::Vco2Octave)? as i8 - 3,
            lfo_vcf_wave: waveform(source, ParamId::LfoVcfWaveform)?,
            lfo_vcf_freq: lfo_rate(source, ParamId::LfoVcfFrequency, 0.1)?,
            vcf_cutoff: checked(source, ParamId::VcfCutoffFrequency)? as f32,
            vcf_resonance: percent(source, ParamId::VcfResonance)?,
            eg_vcf: EnvSettings::read(
                source,
                [
                    ParamId::EgVcfAttack,
                    ParamId::EgVcfDecay,
                    ParamId::EgVcfSustain,
                    ParamId::EgVcfRelease,
                ],
            )?,
            vcf_mod: percent(source, ParamId::VcfModulationVolume)?,
            lfo_vca_wave: waveform(source, ParamId::LfoVcaWaveform)?,
            lfo_vca_freq: lfo_rate(source, ParamId::LfoVcaFrequency, 0.1)?,
            eg_vca: EnvSettings::read(
                source,
                [
                    ParamId::EgVcaAttack,
                    ParamId::EgVcaDecay,
                    ParamId::EgVcaSustain,
                    ParamId::EgVcaRelease,
                ],
            )?,
            vca_mod: percent(source, ParamId::VcaModulationVolume)?,
        })
    }
}

/// This struct encapsulates a single voice unit: two oscillators sharing a
/// pitch LFO, mixed into a low-pass filter and then an amplifier, each of
/// which has its own LFO and envelope.
///
/// The graph is fixed.  [Voice::advance] runs every device once, in an order
/// where each device sees its modulators' output for the same sample.
#[derive(Clone, Debug)]
pub struct Voice {
    ctx: Context,
    lfo_vco: Oscillator,
    vco: Oscillator,
    vco2: Oscillator,
    mixer: Mixer<2>,
    lfo_vcf: Oscillator,
    eg_vcf: Env,
    vcf: Filter,
    lfo_vca: Oscillator,
    eg_vca: Env,
    vca: Amp,
    key: Option<Note>,
}

impl Voice {
    /// Constructor.  The voice starts out with the default [Patch].
    pub fn new(ctx: Context) -> Self {
        Self::new_with_seed(ctx, DEFAULT_SEED)
    }
    /// Constructor.  Each oscillator's noise generator gets its own seed,
    /// derived from `seed`.
    pub fn new_with_seed(ctx: Context, seed: u64) -> Self {
        let base = seed.wrapping_mul(8);
        let mut voice = Self {
            ctx,
            lfo_vco: Oscillator::with_seed(base),
            vco: Oscillator::with_seed(base.wrapping_add(1)),
            vco2: Oscillator::with_seed(base.wrapping_add(2)),
            mixer: Mixer::new(),
            lfo_vcf: Oscillator::with_seed(base.wrapping_add(3)),
            eg_vcf: Env::new(),
            vcf: Filter::new(),
            lfo_vca: Oscillator::with_seed(base.wrapping_add(4)),
            eg_vca: Env::new(),
            vca: Amp::new(),
            key: None,
        };
        let defaults = voice.apply_patch(&Patch::new());
        debug_assert!(defaults.is_ok(), "default patch must be valid");
        voice
    }
    /// The processing context this voice runs in
    pub fn context(&self) -> &Context {
        &self.ctx
    }
    /// Load every parameter from `source`.
    ///
    /// All values are read and validated before any device is touched, so on
    /// error the voice is left exactly as it was.
    pub fn apply_patch<P: ParamSource + ?Sized>(&mut self, source: &P) -> Result<(), SynthError> {
        let settings = VoiceSettings::read(source)?;

        self.lfo_vco.set_waveform(settings.lfo_vco_wave);
        self.lfo_vco.set_frequency(settings.lfo_vco_freq);
        for vco in [&mut self.vco, &mut self.vco2] {
            vco.set_waveform(settings.vco_wave);
            vco.set_modulation_depth(settings.vco_mod);
        }
        self.vco2.set_detune(settings.vco2_detune);
        self.vco2.set_octave(settings.vco2_octave);

        self.lfo_vcf.set_waveform(settings.lfo_vcf_wave);
        self.lfo_vcf.set_frequency(settings.lfo_vcf_freq);
        self.vcf.set_cutoff_frequency(settings.vcf_cutoff);
        self.vcf.set_resonance(settings.vcf_resonance);
        self.vcf.set_modulation_depth(settings.vcf_mod);
        settings.eg_vcf.apply(&mut self.eg_vcf);

        self.lfo_vca.set_waveform(settings.lfo_vca_wave);
        self.lfo_vca.set_frequency(settings.lfo_vca_freq);
        self.vca.set_modulation_depth(settings.vca_mod);
        settings.eg_vca.apply(&mut self.eg_vca);
        Ok(())
    }
    /// Start playing `key`.  `velocity` should be at least 1.
    pub fn note_on(&mut self, key: Note, velocity: U7) {
        let velocity = u8::from(velocity);
        debug_assert!(velocity > 0, "note_on velocity must be at least 1");
        let level = velocity.max(1) as f32 / VELOCITY_MAX;
        self.key = Some(key);
        self.vco.set_midi_note(key.into());
        self.vco2.set_midi_note(key.into());
        self.eg_vcf.note_on(level);
        self.eg_vca.note_on(level);
    }
    /// Release the current note
    pub fn note_off(&mut self) {
        self.eg_vcf.note_off();
        self.eg_vca.note_off();
    }
    /// Run the whole voice for one sample
    pub fn advance(&mut self) {
        let ctx = &self.ctx;
        self.lfo_vco.advance(ctx, None);
        let pitch_mod = Some(self.lfo_vco.read_output());
        self.vco.advance(ctx, pitch_mod);
        self.vco2.advance(ctx, pitch_mod);
        self.mixer
            .advance(ctx, [self.vco.read_output(), self.vco2.read_output()]);

        self.lfo_vcf.advance(ctx, None);
        self.eg_vcf.advance(ctx, ());
        self.vcf.advance(
            ctx,
            FilterInput {
                signal: self.mixer.read_output(),
                lfo: self.lfo_vcf.read_output(),
                envelope: self.eg_vcf.read_output(),
            },
        );

        self.lfo_vca.advance(ctx, None);
        self.eg_vca.advance(ctx, ());
        self.vca.advance(
            ctx,
            AmpInput {
                signal: self.vcf.read_output(),
                lfo: self.lfo_vca.read_output(),
                envelope: self.eg_vca.read_output(),
            },
        );
    }
    /// The voice's output for the last sample
    pub fn read_output(&self) -> f32 {
        self.vca.read_output()
    }
    /// Advance once per element of `out`, storing each sample
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            self.advance();
            *sample = self.read_output();
        }
    }
    /// What the voice is doing
    pub fn state(&self) -> VoiceState {
        match self.eg_vca.state() {
            EnvState::Idle => VoiceState::Idle,
            EnvState::Attack | EnvState::Decay | EnvState::Sustain => VoiceState::Active,
            EnvState::Release => VoiceState::Releasing,
        }
    }
    /// The key being played, or `None` once the voice has gone idle
    pub fn key_number(&self) -> Option<Note> {
        match self.state() {
            VoiceState::Idle => None,
            _ => self.key,
        }
    }
}
