//! Error types for the export pipeline

use serde::{Deserialize, Serialize};

use crate::remap::PropertyKind;
use crate::value::ValueKind;

/// Failure reported by a [`PropertyAccessor`](crate::property::PropertyAccessor).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{reason}")]
pub struct AccessorError {
    pub reason: String,
}

impl AccessorError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Error for a keyframe index outside `0..count`.
    pub fn key_out_of_range(index: usize, count: usize) -> Self {
        Self::new(format!("keyframe index {index} out of range (count {count})"))
    }
}

/// Errors raised while exporting a single property.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ExportError {
    /// Curve building needs at least two keyframes; route to the sampler instead.
    #[error("curve building requires at least 2 keyframes, property has {keyframes}")]
    InputShape { keyframes: usize },

    /// The property accessor could not answer a query.
    #[error("property accessor failed: {0}")]
    Accessor(#[from] AccessorError),

    /// Time range with a non-positive or non-finite step, or reversed bounds.
    #[error("invalid time range [{start}, {end}) with step {step}")]
    InvalidTimeRange { start: f64, end: f64, step: f64 },

    /// Sampling would exceed the configured frame budget.
    #[error("sampling range spans {frames} frames (limit: {limit})")]
    RangeTooLong { frames: usize, limit: usize },

    /// A remap rule received a value it does not understand.
    #[error("cannot remap {value:?} value as {kind:?}")]
    UnsupportedValue { kind: PropertyKind, value: ValueKind },

    /// Keyframe values of different kinds inside one property.
    #[error("keyframe {index} has a {actual:?} value, expected {expected:?}")]
    ValueKindMismatch {
        index: usize,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Keyframe values of one kind but different widths (shape vertex counts).
    #[error("keyframe {index} has {actual} components, expected {expected}")]
    ComponentCountMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

impl ExportError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InputShape { .. }
            | Self::ValueKindMismatch { .. }
            | Self::ComponentCountMismatch { .. } => "input",
            Self::Accessor(_) => "accessor",
            Self::InvalidTimeRange { .. } | Self::RangeTooLong { .. } => "range",
            Self::UnsupportedValue { .. } => "remap",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessor_errors_convert() {
        let err: ExportError = AccessorError::new("no such time").into();
        assert!(matches!(err, ExportError::Accessor(_)));
        assert_eq!(err.category(), "accessor");
        assert_eq!(err.to_string(), "property accessor failed: no such time");
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(ExportError::InputShape { keyframes: 1 }.category(), "input");
        assert_eq!(
            ExportError::RangeTooLong {
                frames: 10,
                limit: 5
            }
            .category(),
            "range"
        );
    }
}
