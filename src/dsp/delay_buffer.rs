//! # Delay Buffer (Power-of-Two Ring Buffer)
//!
//! The delay buffer stores past audio samples so they can be read back a
//! fixed number of samples later. It is the only piece of state a delay
//! instance owns.
//!
//! ## Sizing
//!
//! The buffer must hold the longest delay the instance can be asked for,
//! plus the sample being written right now:
//!
//! ```text
//! minimum = floor(sample_rate * max_delay_seconds) + 1
//! ```
//!
//! The capacity is the smallest power of two that is at least `minimum`.
//! At 44100 Hz with a 1 second maximum that is 44101 → 65536 samples.
//!
//! ## Masking Instead of Modulo
//!
//! With a power-of-two capacity, wrapping an index is a bitwise AND:
//!
//! ```text
//! index & (capacity - 1)  ==  index % capacity
//! ```
//!
//! For `capacity = 8` the mask is `0b0111`, so index 11 (`0b1011`) maps to
//! 3. The equality only holds while the capacity stays a power of two,
//! which is why the capacity is fixed at construction and there is no way
//! to resize a buffer afterwards.
//!
//! ## Addressing
//!
//! Everything is addressed relative to the write cursor `w`. Within a block,
//! sample `i` is written at `w + i` and the sample delayed by `D` is read
//! at `w + i + capacity - D`. Adding `capacity` before subtracting keeps
//! the index non-negative (`usize` can't go below zero); the mask takes
//! the extra `capacity` back off.

use crate::error::DelayError;

/// A fixed-capacity circular sample buffer addressed by masking.
///
/// All index arithmetic lives here. The delay algorithms only ever talk in
/// offsets from the write cursor, so the mask invariant can't leak out.
#[derive(Debug)]
pub struct DelayBuffer {
    sample_rate: f32,
    max_delay_seconds: f32,

    /// `capacity` samples, all zero until something is written.
    storage: Vec<f32>,

    /// `capacity - 1`. Valid as a mask because `capacity` is a power of two.
    mask: usize,

    /// Where the sample at block offset 0 of the next block will be stored.
    write_cursor: usize,
}

impl DelayBuffer {
    /// Allocate a buffer big enough for `max_delay_seconds` at `sample_rate`.
    ///
    /// This is the only place a delay line allocates. It fails if either
    /// argument isn't a positive finite number, if the required capacity
    /// doesn't fit in a `usize`, or if the allocation itself fails.
    pub fn new(sample_rate: f32, max_delay_seconds: f32) -> Result<Self, DelayError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(DelayError::InvalidSampleRate(sample_rate));
        }
        if !(max_delay_seconds.is_finite() && max_delay_seconds > 0.0) {
            return Err(DelayError::InvalidMaxDelay(max_delay_seconds));
        }

        let capacity = capacity_for(sample_rate, max_delay_seconds).ok_or(
            DelayError::CapacityOverflow {
                sample_rate,
                max_delay_seconds,
            },
        )?;

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| DelayError::Allocation { capacity })?;
        storage.resize(capacity, 0.0);

        Ok(Self {
            sample_rate,
            max_delay_seconds,
            storage,
            mask: capacity - 1,
            write_cursor: 0,
        })
    }

    /// Silence the whole buffer and rewind the write cursor.
    ///
    /// Safe to call any number of times. The host may deactivate and
    /// reactivate a live instance without rebuilding it, and every
    /// activation has to start from silence.
    pub fn reset(&mut self) {
        self.storage.fill(0.0);
        self.write_cursor = 0;
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn max_delay_seconds(&self) -> f32 {
        self.max_delay_seconds
    }

    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    /// Convert a delay-length control value into a whole number of samples.
    ///
    /// The value is clamped to `[0, max_delay_seconds]` first and the
    /// product is truncated, not rounded. A NaN control truncates to 0.
    /// The result never exceeds `capacity - 1`.
    #[inline]
    pub fn delay_samples(&self, seconds: f32) -> usize {
        let seconds = seconds.clamp(0.0, self.max_delay_seconds);
        ((seconds * self.sample_rate) as usize).min(self.mask)
    }

    /// Store `sample` at `offset` samples past the write cursor.
    #[inline]
    pub(crate) fn write_at(&mut self, offset: usize, sample: f32) {
        let index = (self.write_cursor + offset) & self.mask;
        self.storage[index] = sample;
    }

    /// Read the sample that was written `delay` samples before the slot
    /// at `offset` past the write cursor.
    ///
    /// `delay` must not exceed `capacity - 1`; [`delay_samples`](Self::delay_samples)
    /// guarantees that.
    #[inline]
    pub(crate) fn tap(&self, offset: usize, delay: usize) -> f32 {
        let read_base = self.write_cursor + self.capacity() - delay;
        self.storage[(read_base + offset) & self.mask]
    }

    /// Move the write cursor forward by a whole block.
    #[inline]
    pub(crate) fn advance(&mut self, samples: usize) {
        self.write_cursor = (self.write_cursor + samples) & self.mask;
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &[f32] {
        &self.storage
    }
}

/// Smallest power of two that can hold `floor(sample_rate * max_delay) + 1`
/// samples, or `None` if that power of two doesn't fit in a `usize`.
///
/// The float-to-integer cast saturates, so an enormous or infinite product
/// lands on `usize::MAX` and fails the `+ 1`.
pub fn capacity_for(sample_rate: f32, max_delay_seconds: f32) -> Option<usize> {
    ((sample_rate * max_delay_seconds) as usize)
        .checked_add(1)?
        .checked_next_power_of_two()
}
