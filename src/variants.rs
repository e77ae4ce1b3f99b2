//! # Delay Variants
//!
//! Every delay ships in ten fixed configurations: echo or feedback, each
//! with a maximum delay of 10ms, 100ms, 1s, 5s or 60s. The maximum decides
//! how much memory an instance reserves and bounds its delay control.
//!
//! The configurations live in one immutable table, [`VARIANTS`]. The
//! plugin shell turns each row into a plugin type; anything else that
//! needs to list or identify the delays (a host-side registry, tests) reads
//! the same table.

use crate::dsp::processor::{DelayKind, DelayProcessor};
use crate::error::DelayError;

impl DelayKind {
    pub const fn description(self) -> &'static str {
        match self {
            DelayKind::Echo => "A mono delay line that repeats its input once",
            DelayKind::Feedback => "A mono delay line with a signed feedback loop",
        }
    }

    pub const fn has_feedback(self) -> bool {
        matches!(self, DelayKind::Feedback)
    }
}

/// Identity and configuration of one delay plugin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayVariant {
    /// Numeric plugin ID, unique across the family.
    pub unique_id: u32,
    /// Short machine label, `<prefix>_<max>s`.
    pub label: &'static str,
    /// Human-readable name shown in the host's plugin browser.
    pub name: &'static str,
    pub kind: DelayKind,
    /// Upper bound of the delay control, in seconds. Fixed for the
    /// lifetime of every instance of this variant.
    pub max_delay_seconds: f32,
    /// Reverse-domain CLAP ID.
    pub clap_id: &'static str,
    /// 16-byte VST3 class ID.
    pub vst3_class_id: [u8; 16],
}

impl DelayVariant {
    /// Build the processor for this configuration at the host's sample rate.
    ///
    /// This is the only constructor the plugins use: the maximum delay is
    /// plain data taken from the table row.
    pub fn instantiate(&self, sample_rate: f32) -> Result<DelayProcessor, DelayError> {
        DelayProcessor::new(self.kind, sample_rate, self.max_delay_seconds)
    }

    pub fn find(label: &str) -> Option<&'static DelayVariant> {
        VARIANTS.iter().find(|v| v.label == label)
    }

    pub fn by_unique_id(unique_id: u32) -> Option<&'static DelayVariant> {
        VARIANTS.iter().find(|v| v.unique_id == unique_id)
    }
}

/// First numeric ID of the family; the rest follow in table order.
pub const FIRST_UNIQUE_ID: u32 = 1053;

/// The maximum delays every kind is offered with, in seconds.
pub const MAX_DELAYS: [f32; 5] = [0.01, 0.1, 1.0, 5.0, 60.0];

/// Build one row of [`VARIANTS`].
///
/// Labels, names and CLAP IDs are all spelled out here from the same
/// pieces, so they can't drift apart:
///
/// ```text
/// label   <prefix>_<max>s                             fbdelay_60s
/// name    <Kind> Delay Line (Maximum Delay <max>s)    Feedback Delay Line (Maximum Delay 60s)
/// clap    com.loveless-audio.furse-delay.<label>      com.loveless-audio.furse-delay.fbdelay_60s
/// ```
macro_rules! delay_variant {
    (@row $offset:literal, $kind:ident, $prefix:literal, $display:literal, $max:literal, $vst3:literal) => {
        DelayVariant {
            unique_id: FIRST_UNIQUE_ID + $offset,
            label: concat!($prefix, "_", stringify!($max), "s"),
            name: concat!($display, " Delay Line (Maximum Delay ", stringify!($max), "s)"),
            kind: DelayKind::$kind,
            max_delay_seconds: $max as f32,
            clap_id: concat!("com.loveless-audio.furse-delay.", $prefix, "_", stringify!($max), "s"),
            vst3_class_id: *$vst3,
        }
    };
    ($offset:literal, Echo, $max:literal, $vst3:literal) => {
        delay_variant!(@row $offset, Echo, "delay", "Echo", $max, $vst3)
    };
    ($offset:literal, Feedback, $max:literal, $vst3:literal) => {
        delay_variant!(@row $offset, Feedback, "fbdelay", "Feedback", $max, $vst3)
    };
}

/// All ten configurations, echo first, each kind in ascending maximum delay.
pub const VARIANTS: [DelayVariant; 10] = [
    delay_variant!(0, Echo, 0.01, b"FurseDlyE00010ms"),
    delay_variant!(1, Echo, 0.1, b"FurseDlyE00100ms"),
    delay_variant!(2, Echo, 1, b"FurseDlyE01000ms"),
    delay_variant!(3, Echo, 5, b"FurseDlyE05000ms"),
    delay_variant!(4, Echo, 60, b"FurseDlyE60000ms"),
    delay_variant!(5, Feedback, 0.01, b"FurseDlyF00010ms"),
    delay_variant!(6, Feedback, 0.1, b"FurseDlyF00100ms"),
    delay_variant!(7, Feedback, 1, b"FurseDlyF01000ms"),
    delay_variant!(8, Feedback, 5, b"FurseDlyF05000ms"),
    delay_variant!(9, Feedback, 60, b"FurseDlyF60000ms"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn max_delay_str(seconds: f32) -> String {
        // 0.01 → "0.01", 60 → "60"
        format!("{seconds}")
    }

    /// The table is the full kind × maximum-delay matrix in order.
    #[test]
    fn test_table_covers_every_combination() {
        let mut rows = VARIANTS.iter();
        for kind in [DelayKind::Echo, DelayKind::Feedback] {
            for max_delay in MAX_DELAYS {
                let row = rows.next().unwrap();
                assert_eq!(row.kind, kind);
                assert_eq!(row.max_delay_seconds, max_delay);
            }
        }
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_ids_are_sequential() {
        for (i, variant) in VARIANTS.iter().enumerate() {
            assert_eq!(variant.unique_id, FIRST_UNIQUE_ID + i as u32);
        }
    }

    #[test]
    fn test_labels_and_names_follow_pattern() {
        for variant in &VARIANTS {
            let max = max_delay_str(variant.max_delay_seconds);
            let (prefix, display) = match variant.kind {
                DelayKind::Echo => ("delay", "Echo"),
                DelayKind::Feedback => ("fbdelay", "Feedback"),
            };
            assert_eq!(variant.label, format!("{prefix}_{max}s"));
            assert_eq!(
                variant.name,
                format!("{display} Delay Line (Maximum Delay {max}s)")
            );
            assert_eq!(
                variant.clap_id,
                format!("com.loveless-audio.furse-delay.{}", variant.label)
            );
        }
    }

    #[test]
    fn test_spelled_out_rows() {
        assert_eq!(VARIANTS[0].label, "delay_0.01s");
        assert_eq!(VARIANTS[0].name, "Echo Delay Line (Maximum Delay 0.01s)");
        assert_eq!(VARIANTS[9].label, "fbdelay_60s");
        assert_eq!(VARIANTS[9].name, "Feedback Delay Line (Maximum Delay 60s)");
        assert_eq!(VARIANTS[9].max_delay_seconds, 60.0);
        assert_eq!(VARIANTS[5].max_delay_seconds, 0.01);
    }

    #[test]
    fn test_host_ids_are_unique() {
        for (i, a) in VARIANTS.iter().enumerate() {
            for b in &VARIANTS[i + 1..] {
                assert_ne!(a.clap_id, b.clap_id);
                assert_ne!(a.vst3_class_id, b.vst3_class_id);
                assert_ne!(a.label, b.label);
            }
        }
    }

    #[test]
    fn test_lookup() {
        let fb = DelayVariant::find("fbdelay_60s").unwrap();
        assert_eq!(fb.kind, DelayKind::Feedback);
        assert_eq!(fb.max_delay_seconds, 60.0);
        assert_eq!(fb.unique_id, 1062);

        assert_eq!(DelayVariant::by_unique_id(1055).unwrap().label, "delay_1s");
        assert!(DelayVariant::find("delay_2s").is_none());
        assert!(DelayVariant::by_unique_id(1052).is_none());
    }

    #[test]
    fn test_instantiate_sizes_buffer_for_max_delay() {
        let variant = DelayVariant::find("delay_0.1s").unwrap();
        let processor = variant.instantiate(48000.0).unwrap();

        assert_eq!(processor.kind(), DelayKind::Echo);
        assert_eq!(processor.buffer().max_delay_seconds(), 0.1);
        // 4800 + 1 → 8192
        assert_eq!(processor.buffer().capacity(), 8192);

        assert!(matches!(
            variant.instantiate(0.0),
            Err(DelayError::InvalidSampleRate(_))
        ));
    }
}
