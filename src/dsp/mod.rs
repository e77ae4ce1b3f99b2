//! # DSP Core
//!
//! - **`delay_buffer`**: a power-of-two ring buffer that stores past
//!   samples and hands them back a whole number of samples later.
//!
//! - **`processor`**: the echo and feedback algorithms that drive the
//!   buffer one block at a time.
//!
//! Nothing in here knows about plugin hosts. The shell in `lib.rs` passes
//! in sample slices and a [`processor::DelayControls`] per block.

pub mod delay_buffer;
pub mod processor;
