//! Export configuration.

use serde::{Deserialize, Serialize};

/// Frame-timing base used by the keypoint destination (ticks per second).
pub const KEYPOINT_TIMEBASE: u64 = 153_600;

/// Parametric steps used when approximating spatial arc length.
pub const ARC_LENGTH_STEPS: usize = 200;

/// Configuration shared by every stage of a property export.
/// Keep this minimal; every field has a working default.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Decimal places used by the sampler's change detection.
    pub sample_precision: SamplePrecision,

    /// Decimal places kept on Bezier handle coordinates.
    pub handle_decimals: u32,

    /// Parametric subdivisions for spatial arc length.
    pub arc_length_steps: usize,

    /// Ticks per second written into keypoint `<time>` fields.
    pub keypoint_timebase: u64,

    /// Upper bound on frames a single sampler pass may evaluate.
    pub max_sample_frames: usize,

    /// Secondary "ease-high" percentage (0..1) applied to the keypoint
    /// destination's tangents for kinds that carry one.
    pub ease_high_percent: Option<f64>,
}

/// Rounding applied before comparing neighbouring samples.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SamplePrecision {
    /// Three decimals: general export.
    #[default]
    General,
    /// One decimal: callers insensitive to small thresholds.
    Coarse,
}

impl SamplePrecision {
    #[inline]
    pub fn decimals(self) -> u32 {
        match self {
            SamplePrecision::General => 3,
            SamplePrecision::Coarse => 1,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sample_precision: SamplePrecision::General,
            handle_decimals: 3,
            arc_length_steps: ARC_LENGTH_STEPS,
            keypoint_timebase: KEYPOINT_TIMEBASE,
            max_sample_frames: 1_000_000,
            ease_high_percent: None,
        }
    }
}

impl ExportConfig {
    /// Parse a config from JSON, filling omitted fields with defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
