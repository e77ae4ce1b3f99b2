//! # Furse Delay Lines — Echo and Feedback Delays (AU/VST3/CLAP)
//!
//! Ten mono delay plugins built with [nih-plug](https://github.com/robbert-vdh/nih-plug):
//! an echo and a feedback delay, each with a fixed maximum delay of 10ms,
//! 100ms, 1s, 5s or 60s. The maximum decides how much memory an instance
//! reserves; everything else is a normal host parameter.
//!
//! ## Layout
//!
//! - [`dsp::delay_buffer`]: the power-of-two ring buffer.
//! - [`dsp::processor`]: the echo and feedback algorithms on top of it.
//! - [`variants`]: the table of the ten configurations.
//! - [`params`]: host parameters, built per variant.
//! - this file: the nih-plug shell that maps host callbacks onto the
//!   processor lifecycle.
//!
//! ## Lifecycle
//!
//! ```text
//! initialize()  →  DelayVariant::instantiate()   allocate the buffer
//! reset()       →  DelayProcessor::activate()    silence + rewind
//! process()     →  DelayProcessor::process_in_place()
//! drop          →  buffer freed
//! ```

pub mod dsp;
pub mod error;
pub mod params;
pub mod variants;

use std::marker::PhantomData;
use std::num::NonZeroU32;
use std::sync::Arc;

use nih_plug::prelude::*;

pub use dsp::delay_buffer::DelayBuffer;
pub use dsp::processor::{DelayControls, DelayKind, DelayProcessor};
pub use error::DelayError;
pub use params::DelayParams;
pub use variants::{DelayVariant, VARIANTS};

/// Ties a plugin type to one row of [`VARIANTS`].
pub trait Variant: Send + Sync + 'static {
    const VARIANT: DelayVariant;
}

/// One mono delay plugin. `V` picks the configuration.
///
/// The processor doesn't exist until the host has told us the sample rate
/// in `initialize()`. Until then `process()` passes audio through.
pub struct DelayPlugin<V: Variant> {
    params: Arc<DelayParams>,
    processor: Option<DelayProcessor>,
    _variant: PhantomData<V>,
}

impl<V: Variant> Default for DelayPlugin<V> {
    fn default() -> Self {
        Self {
            params: Arc::new(DelayParams::new(&V::VARIANT)),
            processor: None,
            _variant: PhantomData,
        }
    }
}

impl<V: Variant> Plugin for DelayPlugin<V> {
    const NAME: &'static str = V::VARIANT.name;
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Mono only. Stereo is two instances on the host side.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[AudioIOLayout {
        main_input_channels: NonZeroU32::new(1),
        main_output_channels: NonZeroU32::new(1),
        aux_input_ports: &[],
        aux_output_ports: &[],
        names: PortNames::const_default(),
    }];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    // Controls are block-constant, so there is nothing to gain from
    // splitting blocks at automation points.
    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Build the delay line for the host's sample rate.
    ///
    /// This is the only allocation an instance ever makes. If it fails the
    /// instance is unusable, so we say so and refuse the configuration.
    fn initialize(
        &mut self,
        _audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let variant = V::VARIANT;

        // A new sample rate means a new buffer size, so any earlier
        // processor is dropped and rebuilt rather than resized.
        match variant.instantiate(buffer_config.sample_rate) {
            Ok(processor) => {
                let buffer = processor.buffer();
                nih_log!(
                    "{}: {} Hz, {} s maximum, buffer of {} samples",
                    variant.label,
                    buffer.sample_rate(),
                    buffer.max_delay_seconds(),
                    buffer.capacity()
                );
                self.processor = Some(processor);
                true
            }
            Err(err) => {
                nih_error!("{}: {err}", variant.label);
                self.processor = None;
                false
            }
        }
    }

    /// Activation. May be called many times on the same instance; every
    /// call starts the delay line from silence.
    fn reset(&mut self) {
        if let Some(processor) = self.processor.as_mut() {
            processor.activate();
        }
    }

    fn deactivate(&mut self) {
        nih_log!("{}: deactivated", V::VARIANT.label);
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let Some(processor) = self.processor.as_mut() else {
            return ProcessStatus::Normal;
        };

        nih_debug_assert_eq!(buffer.channels(), 1);

        // Read every knob exactly once. The delay length, mix and feedback
        // then stay fixed for the whole block, which is what lets the
        // processor compute its read position once and walk both cursors
        // in lockstep. Moving a knob takes effect at the next block.
        let controls = self.params.controls();

        // nih-plug hands us the host's buffer to overwrite in place. With
        // the mono layout there is exactly one channel.
        if let Some(samples) = buffer.as_slice().first_mut() {
            processor.process_in_place(samples, &controls);
        }

        // Tell the host how long the effect keeps sounding after the input
        // goes quiet, so it doesn't stop calling process() mid-echo.
        //
        // An echo sounds once, one delay later. A feedback delay repeats,
        // each pass scaled by |feedback|, until the repeats drop below
        // -60 dB (see `tail_samples`). At |feedback| = 1 the repeats never
        // decay, so we ask to be kept alive indefinitely.
        match processor.tail_samples(&controls) {
            Some(tail) => ProcessStatus::Tail(tail),
            None => ProcessStatus::KeepAlive,
        }
    }
}

impl<V: Variant> ClapPlugin for DelayPlugin<V> {
    const CLAP_ID: &'static str = V::VARIANT.clap_id;
    const CLAP_DESCRIPTION: Option<&'static str> = Some(V::VARIANT.kind.description());
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Mono,
        ClapFeature::Delay,
    ];
}

impl<V: Variant> Vst3Plugin for DelayPlugin<V> {
    const VST3_CLASS_ID: [u8; 16] = V::VARIANT.vst3_class_id;
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] = &[
        Vst3SubCategory::Fx,
        Vst3SubCategory::Delay,
        Vst3SubCategory::Mono,
    ];
}

/// Declare a marker type for a row of [`VARIANTS`] and name its plugin.
macro_rules! delay_plugins {
    ($($plugin:ident: $marker:ident = $index:literal;)*) => {
        $(
            #[doc = concat!("Row ", stringify!($index), " of [`VARIANTS`].")]
            pub struct $marker;

            impl Variant for $marker {
                const VARIANT: DelayVariant = VARIANTS[$index];
            }

            pub type $plugin = DelayPlugin<$marker>;
        )*
    };
}

delay_plugins! {
    EchoDelay10ms: Echo10ms = 0;
    EchoDelay100ms: Echo100ms = 1;
    EchoDelay1s: Echo1s = 2;
    EchoDelay5s: Echo5s = 3;
    EchoDelay60s: Echo60s = 4;
    FeedbackDelay10ms: Feedback10ms = 5;
    FeedbackDelay100ms: Feedback100ms = 6;
    FeedbackDelay1s: Feedback1s = 7;
    FeedbackDelay5s: Feedback5s = 8;
    FeedbackDelay60s: Feedback60s = 9;
}

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────
//
// One shared library carries all ten delays. The CLAP and VST3 factories
// list every type below; a host scanning the library sees ten plugins,
// each with the ID and name from its row of VARIANTS.

nih_export_clap!(
    EchoDelay10ms,
    EchoDelay100ms,
    EchoDelay1s,
    EchoDelay5s,
    EchoDelay60s,
    FeedbackDelay10ms,
    FeedbackDelay100ms,
    FeedbackDelay1s,
    FeedbackDelay5s,
    FeedbackDelay60s
);
nih_export_vst3!(
    EchoDelay10ms,
    EchoDelay100ms,
    EchoDelay1s,
    EchoDelay5s,
    EchoDelay60s,
    FeedbackDelay10ms,
    FeedbackDelay100ms,
    FeedbackDelay1s,
    FeedbackDelay5s,
    FeedbackDelay60s
);

// AUv2 entry point for Logic Pro, wrapping the CLAP factory above.
clap_wrapper::export_auv2!();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_identity_comes_from_table() {
        assert_eq!(<EchoDelay10ms as Plugin>::NAME, VARIANTS[0].name);
        assert_eq!(<FeedbackDelay60s as Plugin>::NAME, VARIANTS[9].name);
        assert_eq!(
            <FeedbackDelay1s as ClapPlugin>::CLAP_ID,
            "com.loveless-audio.furse-delay.fbdelay_1s"
        );
        assert_eq!(
            <EchoDelay5s as Vst3Plugin>::VST3_CLASS_ID,
            *b"FurseDlyE05000ms"
        );
        assert_eq!(Echo100ms::VARIANT.max_delay_seconds, 0.1);
        assert_eq!(Feedback10ms::VARIANT.kind, DelayKind::Feedback);
    }

    #[test]
    fn test_plugins_are_mono() {
        let layouts = <EchoDelay1s as Plugin>::AUDIO_IO_LAYOUTS;
        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts[0].main_input_channels, NonZeroU32::new(1));
        assert_eq!(layouts[0].main_output_channels, NonZeroU32::new(1));
    }

    #[test]
    fn test_default_plugin_waits_for_initialize() {
        let plugin = FeedbackDelay5s::default();
        assert!(plugin.processor.is_none());
        assert_eq!(
            plugin.params.controls(),
            DelayControls::defaults_for(5.0)
        );
    }
}
