use super::*;

#[derive(Eq, PartialEq, Clone, Copy, Debug, Default)]
/// The segment an [Env] is currently in
pub enum EnvState {
    /// Silent, waiting for a note
    #[default]
    Idle,
    /// Rising towards the note's level
    Attack,
    /// Falling from the peak towards the sustain level
    Decay,
    /// Holding the sustain level until the note is released
    Sustain,
    /// Falling towards silence after the note was released
    Release,
}

/// An ADSR Envelope Generator
///
/// Every segment is a linear ramp.  Attack moves from wherever the envelope
/// currently is to the level passed to [Env::note_on] over the attack time,
/// falling rather than rising if it is retriggered above that level.  Decay
/// falls from there to `sustain * level`, and release falls from the current
/// level to zero, after which the envelope goes [EnvState::Idle] on its own.
/// A segment with a zero time completes in a single sample.  Times are in milliseconds and are
/// converted to samples using the [Context] passed to each
/// [advance](SignalNode::advance) call.
#[derive(Clone, Debug)]
pub struct Env {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
    state: EnvState,
    level: f32,
    peak: f32,
    attack_from: f32,
    release_from: f32,
}

impl Env {
    /// Default attack/decay/release time, in milliseconds
    pub const ADR_DEFAULT: f32 = 100.0;

    /// Constructor
    pub fn new() -> Self {
        Self {
            attack: Self::ADR_DEFAULT,
            decay: Self::ADR_DEFAULT,
            sustain: 1.0,
            release: Self::ADR_DEFAULT,
            state: EnvState::Idle,
            level: 0.0,
            peak: 0.0,
            attack_from: 0.0,
            release_from: 0.0,
        }
    }
    /// Attack time, in milliseconds
    pub fn set_attack(&mut self, ms: f32) {
        self.attack = Self::checked_time(ms);
    }
    /// Decay time, in milliseconds
    pub fn set_decay(&mut self, ms: f32) {
        self.decay = Self::checked_time(ms);
    }
    /// Sustain level, between 0 and 1, relative to the note's level
    pub fn set_sustain(&mut self, level: f32) {
        debug_assert!((0.0..=1.0).contains(&level), "sustain out of range");
        self.sustain = level.clamp(0.0, 1.0);
    }
    /// Release time, in milliseconds
    pub fn set_release(&mut self, ms: f32) {
        self.release = Self::checked_time(ms);
    }
    /// Start (or restart) the attack phase, rising to `level` in `[0, 1]`
    pub fn note_on(&mut self, level: f32) {
        debug_assert!((0.0..=1.0).contains(&level), "envelope level out of range");
        self.peak = level.clamp(0.0, 1.0);
        self.attack_from = self.level;
        self.state = EnvState::Attack;
    }
    /// Start the release phase from the current level.  Does nothing while
    /// idle.
    pub fn note_off(&mut self) {
        if self.state != EnvState::Idle {
            self.release_from = self.level;
            self.state = EnvState::Release;
        }
    }
    /// The current segment
    pub fn state(&self) -> EnvState {
        self.state
    }
    fn checked_time(ms: f32) -> f32 {
        debug_assert!(ms >= 0.0, "envelope times must not be negative");
        ms.max(0.0)
    }
    /// Amount to move per sample to cover `span` in `ms`
    fn step(context: &Context, span: f32, ms: f32) -> f32 {
        span / context.ms_to_samples(ms).max(1.0)
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalNode for Env {
    type Input = ();
    fn advance(&mut self, context: &Context, _: ()) {
        match self.state {
            EnvState::Idle => {
                self.level = 0.0;
            }
            EnvState::Attack => {
                let span = self.peak - self.attack_from;
                let step = Self::step(context, span.abs(), self.attack);
                let done = if span >= 0.0 {
                    self.level += step;
                    self.level >= self.peak
                } else {
                    self.level -= step;
                    self.level <= self.peak
                };
                if done {
                    self.level = self.peak;
                    self.state = EnvState::Decay;
                }
            }
            EnvState::Decay => {
                let target = self.sustain * self.peak;
                self.level -= Self::step(context, self.peak - target, self.decay);
                if self.level <= target {
                    self.level = target;
                    self.state = EnvState::Sustain;
                }
            }
            EnvState::Sustain => {
                self.level = self.sustain * self.peak;
            }
            EnvState::Release => {
                self.level -= Self::step(context, self.release_from, self.release);
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.state = EnvState::Idle;
                }
            }
        }
        self.level = self.level.clamp(0.0, 1.0);
    }
    fn read_output(&self) -> f32 {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(env: &mut Env, ctx: &Context, samples: usize) -> f32 {
        env.render(ctx, core::iter::repeat(())).take(samples).last().unwrap()
    }

    #[test]
    fn full_cycle() {
        let ctx = Context::default();
        let mut env = Env::new();
        env.set_attack(10.0);
        env.set_decay(10.0);
        env.set_sustain(0.5);
        env.set_release(10.0);
        assert_eq!(env.state(), EnvState::Idle);
        env.note_on(1.0);
        assert_eq!(env.state(), EnvState::Attack);
        // 10ms at 48kHz
        let level = run(&mut env, &ctx, 240);
        assert!((level - 0.5).abs() < 1e-3);
        run(&mut env, &ctx, 241);
        assert_eq!(env.state(), EnvState::Decay);
        run(&mut env, &ctx, 485);
        assert_eq!(env.state(), EnvState::Sustain);
        assert_eq!(env.read_output(), 0.5);
        env.note_off();
        assert_eq!(env.state(), EnvState::Release);
        let level = run(&mut env, &ctx, 240);
        assert!((level - 0.25).abs() < 1e-3);
        run(&mut env, &ctx, 245);
        assert_eq!(env.state(), EnvState::Idle);
        assert_eq!(env.read_output(), 0.0);
    }
    #[test]
    fn velocity_scales_peak() {
        let ctx = Context::default();
        let mut env = Env::new();
        env.set_attack(0.0);
        env.set_decay(0.0);
        env.set_sustain(1.0);
        env.note_on(0.25);
        run(&mut env, &ctx, 4);
        assert_eq!(env.state(), EnvState::Sustain);
        assert_eq!(env.read_output(), 0.25);
    }
    #[test]
    fn attack_takes_attack_time_at_any_level() {
        let ctx = Context::default();
        let mut env = Env::new();
        env.set_attack(10.0);
        env.note_on(0.5);
        let level = run(&mut env, &ctx, 240);
        assert_eq!(env.state(), EnvState::Attack);
        assert!((level - 0.25).abs() < 1e-3);
        run(&mut env, &ctx, 245);
        assert_ne!(env.state(), EnvState::Attack);
        assert!((env.read_output() - 0.5).abs() < 1e-6);
    }
    #[test]
    fn retrigger_below_current_level_ramps_down() {
        let ctx = Context::default();
        let mut env = Env::new();
        env.set_attack(10.0);
        env.set_decay(0.0);
        env.set_sustain(1.0);
        env.note_on(1.0);
        run(&mut env, &ctx, 2000);
        assert_eq!(env.state(), EnvState::Sustain);
        assert_eq!(env.read_output(), 1.0);
        env.note_on(0.2);
        let level = run(&mut env, &ctx, 1);
        assert_eq!(env.state(), EnvState::Attack);
        assert!(level > 0.99);
        // halfway through the 10ms attack
        let level = run(&mut env, &ctx, 239);
        assert!((level - 0.6).abs() < 1e-3);
        run(&mut env, &ctx, 250);
        assert_eq!(env.state(), EnvState::Sustain);
        assert!((env.read_output() - 0.2).abs() < 1e-6);
    }
    #[test]
    fn note_off_while_idle() {
        let ctx = Context::default();
        let mut env = Env::new();
        env.note_off();
        assert_eq!(env.state(), EnvState::Idle);
        run(&mut env, &ctx, 1);
        assert_eq!(env.state(), EnvState::Idle);
        assert_eq!(env.read_output(), 0.0);
    }
    #[test]
    fn release_during_attack() {
        let ctx = Context::default();
        let mut env = Env::new();
        env.set_attack(100.0);
        env.set_release(1.0);
        env.note_on(1.0);
        run(&mut env, &ctx, 100);
        let level = env.read_output();
        assert!(level > 0.0 && level < 1.0);
        env.note_off();
        run(&mut env, &ctx, 50);
        assert_eq!(env.state(), EnvState::Idle);
    }
    #[test]
    fn output_stays_in_range() {
        let ctx = Context::default();
        let mut env = Env::new();
        env.set_attack(1.0);
        env.set_decay(3.0);
        env.set_sustain(0.3);
        env.set_release(2.0);
        for i in 0..2000 {
            if i % 300 == 0 {
                env.note_on(0.9);
            } else if i % 300 == 200 {
                env.note_off();
            }
            env.advance(&ctx, ());
            assert!((0.0..=1.0).contains(&env.read_output()));
        }
    }
}
