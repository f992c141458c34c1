use super::*;

/// Inputs to an [Amp] for one sample
#[derive(Clone, Copy, Default, Debug)]
pub struct AmpInput {
    /// The audio signal to amplify
    pub signal: f32,
    /// Output of the amplifier's LFO (tremolo), in `[-1, 1]`
    pub lfo: f32,
    /// Output of the amplifier's envelope, in `[0, 1]`
    pub envelope: f32,
}

/// A voltage-controlled amplifier
///
/// The envelope sets the gain directly.  The LFO pulls the gain down by up to
/// `modulation_depth`, so at full depth the LFO's trough silences the voice and
/// its crest leaves the envelope level untouched.
#[derive(Clone, Default, Debug)]
pub struct Amp {
    modulation_depth: f32,
    output: f32,
}

impl Amp {
    /// Constructor
    pub fn new() -> Self {
        Self::default()
    }
    /// Tremolo depth, in `[0, 1]`
    pub fn set_modulation_depth(&mut self, depth: f32) {
        debug_assert!((0.0..=1.0).contains(&depth), "modulation depth out of range");
        self.modulation_depth = depth.clamp(0.0, 1.0);
    }
}

impl SignalNode for Amp {
    type Input = AmpInput;
    fn advance(&mut self, _: &Context, input: AmpInput) {
        let tremolo = 1.0 - self.modulation_depth * (1.0 - input.lfo) / 2.0;
        self.output = clip(input.signal * input.envelope * tremolo);
    }
    fn read_output(&self) -> f32 {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amp(amp: &mut Amp, signal: f32, lfo: f32, envelope: f32) -> f32 {
        amp.advance(
            &Context::default(),
            AmpInput {
                signal,
                lfo,
                envelope,
            },
        );
        amp.read_output()
    }

    #[test]
    fn envelope_is_gain() {
        let mut vca = Amp::new();
        assert_eq!(amp(&mut vca, 0.5, -1.0, 1.0), 0.5);
        assert_eq!(amp(&mut vca, 0.5, 0.3, 0.5), 0.25);
        assert_eq!(amp(&mut vca, 0.5, 1.0, 0.0), 0.0);
    }
    #[test]
    fn tremolo() {
        let mut vca = Amp::new();
        vca.set_modulation_depth(1.0);
        assert_eq!(amp(&mut vca, 0.5, 1.0, 1.0), 0.5);
        assert_eq!(amp(&mut vca, 0.5, 0.0, 1.0), 0.25);
        assert_eq!(amp(&mut vca, 0.5, -1.0, 1.0), 0.0);
        vca.set_modulation_depth(0.5);
        assert_eq!(amp(&mut vca, 1.0, -1.0, 1.0), 0.5);
    }
}
