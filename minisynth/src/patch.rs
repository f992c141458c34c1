//! Contains the voice parameters a controller can set, and a value store for
//! them.
//!
//! Each [ParamId] has a fixed wire address (its discriminant), a valid range
//! and a default.  Values are kept in the units a controller sends them in
//! (whole Hz, tenths of Hz, milliseconds, percent); [Voice](crate::Voice)
//! scales them when a patch is applied.

use crate::serial::ControlEvent;
use crate::SynthError;
use arrayvec::ArrayString;
use core::ops::RangeInclusive;
use wmidi::U7;

/// A voice parameter.  The discriminant is the parameter's wire address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParamId {
    /// Waveform of the LFO modulating both oscillators
    LfoVcoWaveform,
    /// Rate of the oscillator LFO, in Hz
    LfoVcoFrequency,
    /// Waveform of both audio oscillators
    VcoWaveform,
    /// Depth of the oscillator LFO, in percent
    VcoModulationVolume,
    /// Detune of the second oscillator, in percent; 100 is in tune
    VcoDetune,
    /// Octave of the second oscillator; 3 is the first oscillator's octave
    Vco2Octave,
    /// Waveform of the filter LFO
    LfoVcfWaveform,
    /// Rate of the filter LFO, in tenths of Hz
    LfoVcfFrequency,
    /// Filter cutoff, in Hz
    VcfCutoffFrequency,
    /// Filter resonance, in percent
    VcfResonance,
    /// Filter envelope attack, in ms
    EgVcfAttack,
    /// Filter envelope decay, in ms
    EgVcfDecay,
    /// Filter envelope sustain, in percent
    EgVcfSustain,
    /// Filter envelope release, in ms
    EgVcfRelease,
    /// Depth of the filter LFO, in percent
    VcfModulationVolume,
    /// Waveform of the amplifier LFO
    LfoVcaWaveform,
    /// Rate of the amplifier LFO, in tenths of Hz
    LfoVcaFrequency,
    /// Amplifier envelope attack, in ms
    EgVcaAttack,
    /// Amplifier envelope decay, in ms
    EgVcaDecay,
    /// Amplifier envelope sustain, in percent
    EgVcaSustain,
    /// Amplifier envelope release, in ms
    EgVcaRelease,
    /// Depth of the amplifier LFO (tremolo), in percent
    VcaModulationVolume,
}

const WAVEFORM_RANGE: RangeInclusive<u16> = 0..=6;
const PERCENT_RANGE: RangeInclusive<u16> = 0..=100;
const TIME_RANGE: RangeInclusive<u16> = 0..=10000;
const SLOW_LFO_RANGE: RangeInclusive<u16> = 1..=350;

impl ParamId {
    /// The number of parameters
    pub const COUNT: usize = 22;

    const ALL: [ParamId; Self::COUNT] = [
        Self::LfoVcoWaveform,
        Self::LfoVcoFrequency,
        Self::VcoWaveform,
        Self::VcoModulationVolume,
        Self::VcoDetune,
        Self::Vco2Octave,
        Self::LfoVcfWaveform,
        Self::LfoVcfFrequency,
        Self::VcfCutoffFrequency,
        Self::VcfResonance,
        Self::EgVcfAttack,
        Self::EgVcfDecay,
        Self::EgVcfSustain,
        Self::EgVcfRelease,
        Self::VcfModulationVolume,
        Self::LfoVcaWaveform,
        Self::LfoVcaFrequency,
        Self::EgVcaAttack,
        Self::EgVcaDecay,
        Self::EgVcaSustain,
        Self::EgVcaRelease,
        Self::VcaModulationVolume,
    ];

    /// Every parameter, in address order
    pub const fn all() -> &'static [ParamId] {
        &Self::ALL
    }
    /// Look up a parameter by its wire address
    pub const fn from_address(address: u8) -> Option<Self> {
        if (address as usize) < Self::COUNT {
            Some(Self::ALL[address as usize])
        } else {
            None
        }
    }
    /// The parameter's wire address
    pub const fn address(self) -> U7 {
        U7::from_u8_lossy(self as u8)
    }
    /// The values this parameter accepts
    pub const fn range(self) -> RangeInclusive<u16> {
        match self {
            Self::LfoVcoWaveform | Self::VcoWaveform => WAVEFORM_RANGE,
            Self::LfoVcfWaveform | Self::LfoVcaWaveform => WAVEFORM_RANGE,
            Self::LfoVcoFrequency => 1..=35,
            Self::LfoVcfFrequency | Self::LfoVcaFrequency => SLOW_LFO_RANGE,
            Self::VcoDetune => 0..=200,
            Self::Vco2Octave => 0..=5,
            Self::VcfCutoffFrequency => 20..=20000,
            Self::EgVcfAttack | Self::EgVcfDecay | Self::EgVcfRelease => TIME_RANGE,
            Self::EgVcaAttack | Self::EgVcaDecay | Self::EgVcaRelease => TIME_RANGE,
            Self::VcoModulationVolume
            | Self::VcfResonance
            | Self::EgVcfSustain
            | Self::VcfModulationVolume
            | Self::EgVcaSustain
            | Self::VcaModulationVolume => PERCENT_RANGE,
        }
    }
    /// The value a fresh [Patch] holds for this parameter
    pub const fn default_value(self) -> u16 {
        match self {
            Self::LfoVcoWaveform | Self::LfoVcfWaveform | Self::LfoVcaWaveform => 0,
            Self::VcoWaveform => 2,
            Self::LfoVcoFrequency => 5,
            Self::LfoVcfFrequency | Self::LfoVcaFrequency => 20,
            Self::VcoDetune => 100,
            Self::Vco2Octave => 3,
            Self::VcfCutoffFrequency => 4000,
            Self::EgVcfAttack | Self::EgVcaAttack => 10,
            Self::EgVcfDecay | Self::EgVcaDecay => 200,
            Self::EgVcfSustain => 50,
            Self::EgVcaSustain => 80,
            Self::EgVcfRelease | Self::EgVcaRelease => 300,
            Self::VcoModulationVolume
            | Self::VcfResonance
            | Self::VcfModulationVolume
            | Self::VcaModulationVolume => 0,
        }
    }
    /// A human-readable name for the parameter
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::LfoVcoWaveform => "VCO LFO Wave",
            Self::LfoVcoFrequency => "VCO LFO Rate",
            Self::VcoWaveform => "VCO Wave",
            Self::VcoModulationVolume => "VCO Mod",
            Self::VcoDetune => "VCO2 Detune",
            Self::Vco2Octave => "VCO2 Octave",
            Self::LfoVcfWaveform => "VCF LFO Wave",
            Self::LfoVcfFrequency => "VCF LFO Rate",
            Self::VcfCutoffFrequency => "VCF Cutoff",
            Self::VcfResonance => "VCF Resonance",
            Self::EgVcfAttack => "VCF Attack",
            Self::EgVcfDecay => "VCF Decay",
            Self::EgVcfSustain => "VCF Sustain",
            Self::EgVcfRelease => "VCF Release",
            Self::VcfModulationVolume => "VCF Mod",
            Self::LfoVcaWaveform => "VCA LFO Wave",
            Self::LfoVcaFrequency => "VCA LFO Rate",
            Self::EgVcaAttack => "VCA Attack",
            Self::EgVcaDecay => "VCA Decay",
            Self::EgVcaSustain => "VCA Sustain",
            Self::EgVcaRelease => "VCA Release",
            Self::VcaModulationVolume => "VCA Mod",
        }
    }
}

impl TryFrom<u8> for ParamId {
    type Error = SynthError;
    fn try_from(address: u8) -> Result<Self, SynthError> {
        Self::from_address(address).ok_or(SynthError::UnknownParameter(address))
    }
}

impl TryFrom<U7> for ParamId {
    type Error = SynthError;
    fn try_from(address: U7) -> Result<Self, SynthError> {
        Self::try_from(u8::from(address))
    }
}

impl From<ParamId> for &'static str {
    fn from(value: ParamId) -> Self {
        value.to_str()
    }
}

/// Something a [Voice](crate::Voice) can read a full set of parameters from
pub trait ParamSource {
    /// The current raw value of `id`
    fn get_parameter(&self, id: ParamId) -> u16;
}

/// A named set of parameter values
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patch {
    name: ArrayString<32>,
    values: [u16; ParamId::COUNT],
}

impl Patch {
    /// Longest name a patch can hold, in bytes
    pub const NAME_CAPACITY: usize = 32;

    /// A patch holding every parameter's default value
    pub fn new() -> Self {
        let mut values = [0; ParamId::COUNT];
        for id in ParamId::all() {
            values[*id as usize] = id.default_value();
        }
        Self {
            name: ArrayString::new(),
            values,
        }
    }
    /// The patch name
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Set the patch name, truncating it to [Patch::NAME_CAPACITY] bytes
    pub fn set_name(&mut self, name: &str) {
        self.name.clear();
        for c in name.chars() {
            if self.name.try_push(c).is_err() {
                break;
            }
        }
    }
    /// The current value of `id`
    pub fn get(&self, id: ParamId) -> u16 {
        self.values[id as usize]
    }
    /// Set `id` to `value`, leaving the patch unchanged if the value is out of
    /// range
    pub fn set(&mut self, id: ParamId, value: u16) -> Result<(), SynthError> {
        if !id.range().contains(&value) {
            return Err(SynthError::ValueOutOfRange { param: id, value });
        }
        self.values[id as usize] = value;
        Ok(())
    }
    /// Apply a decoded control message, returning the parameter it changed
    pub fn apply_event(&mut self, event: ControlEvent) -> Result<ParamId, SynthError> {
        let id = ParamId::try_from(event.address)?;
        self.set(id, u16::from(event.value))?;
        Ok(id)
    }
}

impl Default for Patch {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamSource for Patch {
    fn get_parameter(&self, id: ParamId) -> u16 {
        self.get(id)
    }
}
