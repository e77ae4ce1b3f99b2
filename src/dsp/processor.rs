//! # Delay Processors
//!
//! Two algorithms share the same [`DelayBuffer`]:
//!
//! - **Echo** (simple delay): the input goes into the buffer untouched and
//!   comes out once, `D` samples later.
//! - **Feedback** delay: what goes into the buffer is the input *plus* a
//!   scaled copy of what is coming out, so every echo produces another one.
//!
//! ```text
//! Echo                               Feedback
//!
//! x ──┬──────────── × dry ──┐        x ──┬───────────────── × dry ──┐
//!     │                     │            │                          │
//!     └──► [buffer, D] ─ × wet ─►(+)─► y  └─►(+)─► [buffer, D] ─┬─ × wet ─►(+)─► y
//!                                             ▲                 │
//!                                             └── × feedback ◄──┘
//! ```
//!
//! Controls are read once per block and held constant across it.
//!
//! ## Ordering Inside One Sample
//!
//! Echo **writes, then reads**. With `D = 0` the read lands on the slot
//! that was just written, so a zero delay passes the input straight
//! through.
//!
//! Feedback **reads, then writes**. The value written depends on the value
//! read, so the read has to see the old contents of the slot. Because of
//! this a zero-sample feedback loop is meaningless, and `D = 0` is raised
//! to 1.

use super::delay_buffer::DelayBuffer;
use crate::error::DelayError;

/// Which of the two delay algorithms an instance runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayKind {
    /// Non-recirculating delay: one echo per input sample.
    Echo,
    /// Recirculating delay: echoes are fed back into the line.
    Feedback,
}

/// The control values for one block.
///
/// Any value is accepted. Each is clamped into its legal range when the
/// block is processed, so automation overshoot never needs special care.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayControls {
    /// Delay length in seconds, clamped to `[0, max_delay]`.
    pub delay_seconds: f32,
    /// Dry/wet balance, clamped to `[0, 1]`. 0 is all dry, 1 all wet.
    pub dry_wet: f32,
    /// Feedback coefficient, clamped to `[-1, 1]`. Ignored by echo.
    pub feedback: f32,
}

impl DelayControls {
    /// The startup values for an instance with the given maximum delay:
    /// a 1 second delay (or the maximum if that is shorter), an even
    /// dry/wet blend, and half feedback.
    pub fn defaults_for(max_delay_seconds: f32) -> Self {
        Self {
            delay_seconds: max_delay_seconds.min(1.0),
            dry_wet: 0.5,
            feedback: 0.5,
        }
    }
}

/// Dry and wet gains for a raw mix control.
#[inline]
fn dry_wet_gains(mix: f32) -> (f32, f32) {
    let wet = mix.clamp(0.0, 1.0);
    (1.0 - wet, wet)
}

/// A mono delay line: one buffer and the algorithm that drives it.
#[derive(Debug)]
pub struct DelayProcessor {
    kind: DelayKind,
    buffer: DelayBuffer,
}

impl DelayProcessor {
    /// Build a processor and its buffer. This allocates; call it from
    /// `initialize()`, never from the audio callback.
    pub fn new(kind: DelayKind, sample_rate: f32, max_delay_seconds: f32) -> Result<Self, DelayError> {
        Ok(Self {
            kind,
            buffer: DelayBuffer::new(sample_rate, max_delay_seconds)?,
        })
    }

    pub fn kind(&self) -> DelayKind {
        self.kind
    }

    pub fn buffer(&self) -> &DelayBuffer {
        &self.buffer
    }

    /// Start from silence. Called on every (re)activation.
    pub fn activate(&mut self) {
        self.buffer.reset();
    }

    /// The delay in whole samples this block will use.
    pub fn effective_delay(&self, controls: &DelayControls) -> usize {
        let delay = self.buffer.delay_samples(controls.delay_seconds);
        match self.kind {
            DelayKind::Echo => delay,
            DelayKind::Feedback => delay.max(1),
        }
    }

    /// Process one block from `input` into `output`.
    ///
    /// The block length is the shorter of the two slices; any extra output
    /// samples are left untouched.
    pub fn process(&mut self, input: &[f32], output: &mut [f32], controls: &DelayControls) {
        let len = input.len().min(output.len());
        let output = &mut output[..len];
        output.copy_from_slice(&input[..len]);
        self.process_in_place(output, controls);
    }

    /// Process one block, replacing each input sample with its output.
    ///
    /// Each input sample is consumed before its slot is overwritten, so
    /// this is equivalent to [`process`](Self::process) with separate
    /// buffers.
    pub fn process_in_place(&mut self, samples: &mut [f32], controls: &DelayControls) {
        match self.kind {
            DelayKind::Echo => self.run_echo(samples, controls),
            DelayKind::Feedback => self.run_feedback(samples, controls),
        }
        self.buffer.advance(samples.len());
    }

    fn run_echo(&mut self, samples: &mut [f32], controls: &DelayControls) {
        let delay = self.effective_delay(controls);
        let (dry, wet) = dry_wet_gains(controls.dry_wet);

        for (i, sample) in samples.iter_mut().enumerate() {
            let input = *sample;
            self.buffer.write_at(i, input);
            *sample = dry * input + wet * self.buffer.tap(i, delay);
        }
    }

    fn run_feedback(&mut self, samples: &mut [f32], controls: &DelayControls) {
        let delay = self.effective_delay(controls);
        let (dry, wet) = dry_wet_gains(controls.dry_wet);
        let feedback = controls.feedback.clamp(-1.0, 1.0);

        for (i, sample) in samples.iter_mut().enumerate() {
            let input = *sample;
            let delayed = self.buffer.tap(i, delay);
            *sample = dry * input + wet * delayed;
            self.buffer.write_at(i, input + feedback * delayed);
        }
    }

    /// How long the output keeps ringing after the input goes silent, in
    /// samples, or `None` if it never stops.
    ///
    /// Echo rings for exactly one delay period. Feedback repeats until the
    /// echoes fall below -60 dB: each pass scales the level by `|feedback|`,
    /// so that takes `log10(0.001) / log10(|feedback|)` passes.
    pub fn tail_samples(&self, controls: &DelayControls) -> Option<u32> {
        let delay = self.effective_delay(controls) as f32;

        match self.kind {
            DelayKind::Echo => Some(delay as u32),
            DelayKind::Feedback => {
                let feedback = controls.feedback.clamp(-1.0, 1.0).abs();
                if feedback >= 1.0 {
                    None
                } else if feedback > 0.001 {
                    let repeats = -3.0 / feedback.log10();
                    Some((repeats.ceil() * delay) as u32)
                } else {
                    Some(delay as u32)
                }
            }
        }
    }
}
