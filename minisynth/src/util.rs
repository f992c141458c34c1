//! Various utility functions and helpful constants

// currently the only users of this function are unit tests... shut up dead code warning
#[cfg(test)]
pub fn calculate_cents(base: f32, freq: f32) -> f32 {
    1200.0 * f32::log2(freq / base)
}

/// A character depicting a sine wave (∿)
pub const SIN_CHARSTR: &str = "\u{223F}";
/// A character depicting a square wave (⎍).
/// This is actually the Unicode "monostable symbol"
pub const SQ_CHARSTR: &str = "\u{238D}";
/// A character depicting a triangle wave (Λ).  This is the greek capital
/// lambda, so use a sans-serif font for this to appear correct
pub const TRI_CHARSTR: &str = "\u{039B}";
/// A character depicting a sawtooth wave (⩘).  This is the "sloping large and".
pub const SAW_CHARSTR: &str = "\u{2A58}";
/// Short label for a pulse wave at 1/8 duty cycle
pub const PULSE12_STR: &str = "P12";
/// Short label for a pulse wave at 1/4 duty cycle
pub const PULSE25_STR: &str = "P25";
/// Short label for white noise
pub const NOISE_STR: &str = "WN";
