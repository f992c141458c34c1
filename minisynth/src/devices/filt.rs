use super::*;
use core::f32::consts::PI;
use num_traits::Float;

/// Inputs to a [Filter] for one sample
#[derive(Clone, Copy, Default, Debug)]
pub struct FilterInput {
    /// The audio signal to filter
    pub signal: f32,
    /// Output of the filter's LFO, in `[-1, 1]`
    pub lfo: f32,
    /// Output of the filter's envelope, in `[0, 1]`
    pub envelope: f32,
}

/// A voltage-controlled low-pass filter
///
/// This emulates a two-pole state-variable filter (using the topology-preserving
/// transform, so it stays stable for any cutoff below Nyquist) and returns its
/// low-pass output.  The envelope sweeps the cutoff up from [Filter::MIN_CUTOFF]
/// to the configured cutoff frequency, and the LFO then bends it by up to an
/// octave either way, scaled by the modulation depth.
///
/// Resonance is capped at 15/16 to avoid unbounded self-oscillation and
/// numerical issues as the resonance approaches 1.
#[derive(Clone, Debug)]
pub struct Filter {
    cutoff: f32,
    resonance: f32,
    modulation_depth: f32,
    low_z: f32,
    band_z: f32,
    output: f32,
}

impl Filter {
    /// Lowest cutoff frequency the filter will run at, in Hz
    pub const MIN_CUTOFF: f32 = 20.0;
    /// Cutoff is held below this fraction of the sample rate
    const MAX_CUTOFF_RATIO: f32 = 0.45;
    const RES_MAX: f32 = 0.9375;

    /// Constructor
    pub fn new() -> Self {
        Self {
            cutoff: 20000.0,
            resonance: 0.0,
            modulation_depth: 0.0,
            low_z: 0.0,
            band_z: 0.0,
            output: 0.0,
        }
    }
    /// Cutoff frequency, in Hz, reached when the envelope is fully open
    pub fn set_cutoff_frequency(&mut self, hz: f32) {
        debug_assert!(hz > 0.0, "cutoff frequency must be positive");
        self.cutoff = hz.max(Self::MIN_CUTOFF);
    }
    /// Resonance, as a value between 0 and 1
    pub fn set_resonance(&mut self, resonance: f32) {
        debug_assert!((0.0..=1.0).contains(&resonance), "resonance out of range");
        self.resonance = resonance.clamp(0.0, 1.0);
    }
    /// How far the LFO moves the cutoff, in `[0, 1]`.  Full depth is one
    /// octave either way.
    pub fn set_modulation_depth(&mut self, depth: f32) {
        debug_assert!((0.0..=1.0).contains(&depth), "modulation depth out of range");
        self.modulation_depth = depth.clamp(0.0, 1.0);
    }
    /// The cutoff frequency, in Hz, for one sample's modulation inputs
    pub fn modulated_cutoff(&self, context: &Context, lfo: f32, envelope: f32) -> f32 {
        let swept = Self::MIN_CUTOFF + (self.cutoff - Self::MIN_CUTOFF) * envelope;
        let bent = swept * Float::exp2(lfo * self.modulation_depth);
        bent.clamp(
            Self::MIN_CUTOFF,
            context.sample_rate * Self::MAX_CUTOFF_RATIO,
        )
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalNode for Filter {
    type Input = FilterInput;
    fn advance(&mut self, context: &Context, input: FilterInput) {
        let cutoff = self.modulated_cutoff(context, input.lfo, input.envelope);
        let res = 1.0 - self.resonance.min(Self::RES_MAX);
        let gain = Float::tan(PI * cutoff / context.sample_rate);
        let denom = gain * gain + 2.0 * res * gain + 1.0;
        let high = (input.signal - (2.0 * res + gain) * self.band_z - self.low_z) / denom;

        let band_gain = gain * high;
        let band = band_gain + self.band_z;
        self.band_z = band + band_gain;

        let low_gain = gain * band;
        let low = low_gain + self.low_z;
        self.low_z = low + low_gain;

        self.output = clip(low);
    }
    fn read_output(&self) -> f32 {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{Oscillator, Waveform};

    fn peak_output(filt: &mut Filter, ctx: &Context, freq: f32, envelope: f32) -> f32 {
        let mut osc = Oscillator::new();
        osc.set_frequency(freq);
        let mut peak = 0f32;
        for i in 0..9600 {
            osc.advance(ctx, None);
            filt.advance(
                ctx,
                FilterInput {
                    signal: osc.read_output(),
                    lfo: 0.0,
                    envelope,
                },
            );
            if i > 4800 {
                peak = peak.max(filt.read_output().abs());
            }
        }
        peak
    }

    #[test]
    fn passes_low_and_cuts_high() {
        let ctx = Context::default();
        let mut filt = Filter::new();
        filt.set_cutoff_frequency(500.0);
        let low = peak_output(&mut filt, &ctx, 100.0, 1.0);
        let mut filt = Filter::new();
        filt.set_cutoff_frequency(500.0);
        let high = peak_output(&mut filt, &ctx, 8000.0, 1.0);
        assert!(low > 0.8);
        assert!(high < 0.05);
    }
    #[test]
    fn closed_envelope_closes_filter() {
        let ctx = Context::default();
        let mut filt = Filter::new();
        filt.set_cutoff_frequency(8000.0);
        assert_eq!(filt.modulated_cutoff(&ctx, 0.0, 0.0), Filter::MIN_CUTOFF);
        assert_eq!(filt.modulated_cutoff(&ctx, 0.0, 1.0), 8000.0);
        filt.set_modulation_depth(1.0);
        assert!((filt.modulated_cutoff(&ctx, 1.0, 1.0) - 16000.0).abs() < 0.01);
        assert!((filt.modulated_cutoff(&ctx, -1.0, 1.0) - 4000.0).abs() < 0.01);
        // held below Nyquist
        filt.set_cutoff_frequency(20000.0);
        assert!((filt.modulated_cutoff(&ctx, 1.0, 1.0) - 21600.0).abs() < 0.01);
    }
    #[test]
    fn output_stays_in_range() {
        let ctx = Context::default();
        let mut filt = Filter::new();
        filt.set_cutoff_frequency(2000.0);
        filt.set_resonance(1.0);
        filt.set_modulation_depth(1.0);
        let mut osc = Oscillator::new();
        osc.set_waveform(Waveform::Square);
        osc.set_frequency(1900.0);
        let mut lfo = Oscillator::new();
        lfo.set_frequency(3.0);
        for _ in 0..10000 {
            osc.advance(&ctx, None);
            lfo.advance(&ctx, None);
            filt.advance(
                &ctx,
                FilterInput {
                    signal: osc.read_output(),
                    lfo: lfo.read_output(),
                    envelope: 1.0,
                },
            );
            assert!((-1.0..=1.0).contains(&filt.read_output()));
        }
    }
}
