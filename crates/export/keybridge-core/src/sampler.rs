//! Sampling API: derive a sparse keyframe-equivalent series by evaluating a
//! property once per frame.
//!
//! A frame is kept when its rounded value differs from the rounded value of
//! either neighbouring frame, so the series holds the first and last frame of
//! every change and drops the interior of static stretches.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::numeric::round_all;
use crate::property::PropertyAccessor;
use crate::time::TimeRange;
use crate::value::Value;

/// One sampled `(time, value)` pair.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SampledPoint {
    pub time: f64,
    pub value: Value,
}

/// Parallel time/value arrays, never empty.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SampledSeries {
    pub times: Vec<f64>,
    pub values: Vec<Value>,
}

impl SampledSeries {
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    fn push(&mut self, time: f64, value: Value) {
        self.times.push(time);
        self.values.push(value);
    }

    /// Iterate as points.
    pub fn points(&self) -> impl Iterator<Item = SampledPoint> + '_ {
        self.times
            .iter()
            .zip(self.values.iter())
            .map(|(time, value)| SampledPoint {
                time: *time,
                value: value.clone(),
            })
    }
}

/// Sample `accessor` across `range`.
///
/// Each frame is compared with the frames one step before and after, so the
/// property is evaluated at `range.start - step` and at the frame after the
/// last one as well.
pub fn sample<A>(accessor: &A, range: &TimeRange, config: &ExportConfig) -> Result<SampledSeries, ExportError>
where
    A: PropertyAccessor + ?Sized,
{
    let frames = range.frame_count();
    if frames > config.max_sample_frames {
        return Err(ExportError::RangeTooLong {
            frames,
            limit: config.max_sample_frames,
        });
    }
    let decimals = config.sample_precision.decimals();

    // Window slot `i` holds frame `i - 1`.
    let mut raw = Vec::with_capacity(frames + 2);
    let mut rounded = Vec::with_capacity(frames + 2);
    for slot in 0..frames + 2 {
        let t = range.start + (slot as f64 - 1.0) * range.step;
        let value = accessor.value_at(t)?;
        rounded.push(round_all(&value.components(), decimals));
        raw.push(value);
    }

    let mut series = SampledSeries::default();
    for frame in 0..frames {
        let slot = frame + 1;
        let current = &rounded[slot];
        if current != &rounded[slot - 1] || current != &rounded[slot + 1] {
            series.push(range.time_at(frame), raw[slot].clone());
        }
    }

    if series.is_empty() {
        series.push(range.start, raw[1].clone());
    }
    debug!(
        "sampled {} frames into {} points over [{}, {})",
        frames,
        series.len(),
        range.start,
        range.end
    );
    Ok(series)
}
