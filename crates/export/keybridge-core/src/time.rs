//! Time ranges and frame arithmetic.
//! Times are seconds in the host composition; `step` is one frame.

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::property::PropertyAccessor;

/// Half-open window `[start, end)` walked in `step` increments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl TimeRange {
    /// Create a new time range
    #[inline]
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self, ExportError> {
        if !(step.is_finite() && step > 0.0)
            || !start.is_finite()
            || !end.is_finite()
            || start > end
        {
            return Err(ExportError::InvalidTimeRange { start, end, step });
        }
        Ok(Self { start, end, step })
    }

    /// Range spanning a layer's in/out points.
    #[inline]
    pub fn from_in_out(in_point: f64, out_point: f64, frame_duration: f64) -> Result<Self, ExportError> {
        Self::new(in_point, out_point, frame_duration)
    }

    /// Range from the first keyframe to one frame past the last.
    ///
    /// Keyless properties get a single-frame window at zero.
    pub fn from_keyframes<A>(accessor: &A, frame_duration: f64) -> Result<Self, ExportError>
    where
        A: PropertyAccessor + ?Sized,
    {
        let count = accessor.keyframe_count();
        if count == 0 {
            return Self::single_step(0.0, frame_duration);
        }
        let first = accessor.keyframe_time(0)?;
        let last = accessor.keyframe_time(count - 1)?;
        Self::new(first, last + frame_duration, frame_duration)
    }

    /// Window of exactly one frame starting at `start`.
    #[inline]
    pub fn single_step(start: f64, frame_duration: f64) -> Result<Self, ExportError> {
        Self::new(start, start + frame_duration, frame_duration)
    }

    /// Get the duration of this range
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Number of frames the range covers. Partial trailing frames count.
    ///
    /// An empty range still yields one frame so the start is always visited.
    #[inline]
    pub fn frame_count(&self) -> usize {
        let frames = (self.duration() / self.step - 1e-9).ceil();
        if frames.is_finite() && frames > 1.0 {
            frames as usize
        } else {
            1
        }
    }

    /// Time of the `index`-th frame. Computed by multiplication to avoid drift.
    #[inline]
    pub fn time_at(&self, index: usize) -> f64 {
        self.start + index as f64 * self.step
    }

    /// Iterate frame times from `start` up to (excluding) `end`.
    pub fn frames(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.frame_count()).map(move |i| self.time_at(i))
    }

    /// Check if a time is within this range
    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }
}

/// Convert a time in seconds to the nearest destination frame index.
#[inline]
pub fn time_to_frame(time: f64, frame_duration: f64) -> i64 {
    (time / frame_duration).round() as i64
}
