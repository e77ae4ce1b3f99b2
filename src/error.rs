//! # Construction Errors
//!
//! Processing a block can never fail: out-of-range controls are clamped
//! and the buffer is sized for the worst case up front. The only fallible
//! step is building a delay line, which happens once in `initialize()`.

use thiserror::Error;

/// Why a delay line could not be constructed.
///
/// Any of these is fatal for the instance: the plugin shell logs it and
/// refuses the audio configuration, so no half-built delay line is ever
/// handed to `process()`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DelayError {
    /// The host reported a sample rate that is zero, negative or not finite.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// The maximum delay time is zero, negative or not finite.
    #[error("invalid maximum delay: {0} s")]
    InvalidMaxDelay(f32),

    /// The power-of-two capacity needed for this delay doesn't fit in a
    /// `usize`.
    #[error("a {max_delay_seconds} s delay at {sample_rate} Hz needs more samples than can be addressed")]
    CapacityOverflow {
        sample_rate: f32,
        max_delay_seconds: f32,
    },

    /// The sample buffer could not be allocated.
    #[error("failed to allocate a delay buffer of {capacity} samples")]
    Allocation { capacity: usize },
}
