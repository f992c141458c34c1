use super::*;
use core::iter::zip;

/// A signal mixer.  The number of signals to mix together is passed in the
/// const-generic parameter `N`.
///
/// Each input is multiplied by its gain and the results are summed.  Gains
/// default to `1/N`, so the mixer averages its inputs out of the box and can
/// never leave `[-1, 1]`; louder settings are clipped.
#[derive(Clone, Debug)]
pub struct Mixer<const N: usize> {
    gains: [f32; N],
    output: f32,
}

impl<const N: usize> Mixer<N> {
    /// Constructor
    pub fn new() -> Self {
        Self {
            gains: [1.0 / N as f32; N],
            output: 0.0,
        }
    }
    /// Set the gain applied to each input
    pub fn set_gains(&mut self, gains: [f32; N]) {
        debug_assert!(gains.iter().all(|g| g.is_finite()), "gains must be finite");
        self.gains = gains;
    }
    /// The gain applied to each input
    pub fn gains(&self) -> &[f32; N] {
        &self.gains
    }
}

impl<const N: usize> Default for Mixer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SignalNode for Mixer<N> {
    type Input = [f32; N];
    fn advance(&mut self, _: &Context, input: [f32; N]) {
        self.output = clip(
            zip(input.iter(), self.gains.iter())
                .fold(0.0, |acc, (signal, gain)| acc + signal * gain),
        );
    }
    fn read_output(&self) -> f32 {
        self.output
    }
}
