//! This module contains definitions of the DSP primitives that make up a
//! voice.

use crate::context::Context;
use core::iter::Iterator;

mod amp;
mod env;
mod filt;
mod mixer;
mod osc;

/// A signal-producing module
///
/// This is one of the central abstractions in this library.  A node is asked
/// to [advance](SignalNode::advance) by one sample, consuming this sample's
/// value of each of its inputs (an audio signal, the level of a modulator,
/// etc.), and afterwards reports its current level through
/// [read_output](SignalNode::read_output) without side effects.  Both calls are
/// bounded and allocation-free so they may be made from an audio callback.
///
/// Nodes never hold references to each other.  Whoever owns a set of nodes
/// (see [Voice](crate::voice::Voice)) advances them in topological order and
/// passes upstream outputs in as `Input`, so every node sees its modulators'
/// value for the *current* sample.
pub trait SignalNode {
    /// What the node consumes every sample.  Nodes without signal inputs use
    /// `()`.
    type Input;
    /// Within the provided `context`, take one sample of `input` and advance
    /// the node's state by one sample
    fn advance(&mut self, context: &Context, input: Self::Input);
    /// The node's current output level, in `[-1, 1]` (`[0, 1]` for
    /// envelopes)
    fn read_output(&self) -> f32;
    /// This is similar to [SignalNode::advance], but works on iterators and
    /// returns an iterator over the output after each sample
    fn render<'a, InputIt: Iterator<Item = Self::Input>>(
        &'a mut self,
        context: &'a Context,
        input: InputIt,
    ) -> NodeIter<'a, Self, InputIt>
    where
        Self: Sized,
    {
        NodeIter {
            node: self,
            ctx: context,
            input,
        }
    }
}

/// An iterator over a [SignalNode] returned by [SignalNode::render]
pub struct NodeIter<'a, N: SignalNode, InputIt: Iterator<Item = N::Input>> {
    node: &'a mut N,
    ctx: &'a Context,
    input: InputIt,
}

impl<'a, N: SignalNode, InputIt: Iterator<Item = N::Input>> Iterator for NodeIter<'a, N, InputIt> {
    type Item = f32;
    fn next(&mut self) -> Option<f32> {
        self.node.advance(self.ctx, self.input.next()?);
        Some(self.node.read_output())
    }
}

/// Clamp a sample to the `[-1, 1]` range every node promises
pub(crate) fn clip(x: f32) -> f32 {
    x.clamp(-1.0, 1.0)
}

pub use amp::{Amp, AmpInput};
pub use env::{Env, EnvState};
pub use filt::{Filter, FilterInput};
pub use mixer::Mixer;
pub use osc::{Oscillator, Waveform};
