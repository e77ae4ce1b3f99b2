//! # Plugin Parameters
//!
//! Each delay exposes the same three controls. The ranges depend on the
//! variant: the delay knob runs from 0 to the variant's maximum, and the
//! feedback knob only does anything on feedback variants (echo variants
//! keep it hidden so presets still line up across the family).
//!
//! ## No Smoothing
//!
//! Unlike most plugin parameters these have no smoother. The processors
//! read every control once at the start of a block and hold it for the
//! whole block, so a knob move lands as a step at the next block boundary.
//! For the delay time that step is a jump of the read position; for mix
//! and feedback it is a gain change.
//!
//! ## Ranges
//!
//! The delay range is skewed toward short times: on a 60 s variant the
//! first half of the knob covers the first 15 s, where most settings live.
//! Mix and feedback are linear.

use nih_plug::prelude::*;

use crate::dsp::processor::DelayControls;
use crate::variants::DelayVariant;

#[derive(Params)]
pub struct DelayParams {
    /// **Delay** in seconds, `0..=max_delay`.
    ///
    /// Truncated to whole samples when the block is processed.
    #[id = "delay"]
    pub delay: FloatParam,

    /// **Dry/Wet Balance**: 0 is input only, 1 is delayed signal only.
    #[id = "drywet"]
    pub dry_wet: FloatParam,

    /// **Feedback**, `-1..=1`. Negative values flip the polarity of every
    /// other repeat.
    ///
    /// The full `±1` range is allowed. At exactly `±1` the repeats never
    /// decay; the host is told to keep the plugin alive in that case.
    #[id = "fdbk"]
    pub feedback: FloatParam,
}

impl DelayParams {
    pub fn new(variant: &DelayVariant) -> Self {
        let defaults = DelayControls::defaults_for(variant.max_delay_seconds);

        let feedback = FloatParam::new(
            "Feedback",
            defaults.feedback,
            FloatRange::Linear {
                min: -1.0,
                max: 1.0,
            },
        )
        .with_unit("%")
        .with_value_to_string(formatters::v2s_f32_percentage(1))
        .with_string_to_value(formatters::s2v_f32_percentage());

        Self {
            delay: FloatParam::new(
                "Delay (Seconds)",
                defaults.delay_seconds,
                FloatRange::Skewed {
                    min: 0.0,
                    max: variant.max_delay_seconds,
                    factor: FloatRange::skew_factor(-1.0),
                },
            )
            .with_unit(" s")
            .with_value_to_string(formatters::v2s_f32_rounded(4)),

            dry_wet: FloatParam::new(
                "Dry/Wet Balance",
                defaults.dry_wet,
                FloatRange::Linear { min: 0.0, max: 1.0 },
            )
            .with_unit("%")
            .with_value_to_string(formatters::v2s_f32_percentage(1))
            .with_string_to_value(formatters::s2v_f32_percentage()),

            feedback: if variant.kind.has_feedback() {
                feedback
            } else {
                feedback.hide()
            },
        }
    }

    /// Snapshot the current values for one block.
    pub fn controls(&self) -> DelayControls {
        DelayControls {
            delay_seconds: self.delay.value(),
            dry_wet: self.dry_wet.value(),
            feedback: self.feedback.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::VARIANTS;

    #[test]
    fn test_defaults_match_controls() {
        for variant in &VARIANTS {
            let params = DelayParams::new(variant);
            assert_eq!(
                params.controls(),
                DelayControls::defaults_for(variant.max_delay_seconds),
                "{}",
                variant.label
            );
        }
    }

    #[test]
    fn test_delay_default_never_exceeds_maximum() {
        for variant in &VARIANTS {
            let params = DelayParams::new(variant);
            let default = params.delay.default_plain_value();
            assert!(
                default <= variant.max_delay_seconds,
                "{}: default {default} above maximum",
                variant.label
            );
            let expected = variant.max_delay_seconds.min(1.0);
            assert!((default - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_delay_range_ends_at_variant_maximum() {
        for variant in &VARIANTS {
            let params = DelayParams::new(variant);
            assert!(params.delay.preview_plain(0.0).abs() < 1e-6);
            // Half the knob is a quarter of the range.
            assert!(
                (params.delay.preview_plain(0.5) - variant.max_delay_seconds * 0.25).abs() < 1e-4
            );
            assert!(
                (params.delay.preview_plain(1.0) - variant.max_delay_seconds).abs() < 1e-4,
                "{}",
                variant.label
            );
        }
    }

    #[test]
    fn test_feedback_and_mix_ranges() {
        let params = DelayParams::new(&VARIANTS[7]);
        assert!((params.feedback.preview_plain(0.0) + 1.0).abs() < 1e-6);
        assert!((params.feedback.preview_plain(1.0) - 1.0).abs() < 1e-6);
        assert!(params.dry_wet.preview_plain(0.0).abs() < 1e-6);
        assert!((params.dry_wet.preview_plain(1.0) - 1.0).abs() < 1e-6);
    }
}
