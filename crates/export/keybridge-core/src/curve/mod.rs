//! Curve reconstruction: keyframe pairs -> Hold | Linear | Bezier segments.
//!
//! Model:
//! - One segment per consecutive keyframe pair, followed by a terminal point.
//! - Handles are normalized per axis: `x` is a fraction of the segment's
//!   duration, `y` a fraction of its value change (unbounded).
//! - Spatial segments share one handle pair across axes and keep the host's
//!   raw tangent vectors.

pub mod arc_length;
pub mod builder;
pub mod ease;

use serde::{Deserialize, Serialize};

use crate::numeric::lerp;
use crate::value::Value;

pub use builder::{build_curve, build_segments, ease_handles, segment_between};

/// Normalized control handle (time fraction, value fraction).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Handle {
    pub x: f64,
    pub y: f64,
}

impl Handle {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Raw spatial tangent vectors bounding a segment, as the host reported them.
///
/// They shape the path [`Segment::evaluate`] follows. Emitters never see them:
/// exported keys carry only the normalized per-axis handles.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SpatialTangents {
    /// Leaving the segment's first keyframe.
    pub out: Vec<f64>,
    /// Arriving at the segment's second keyframe.
    pub r#in: Vec<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    Hold {
        start_time: f64,
        start_value: Value,
    },
    /// Straight interpolation. Handles satisfy `y == x` on every axis.
    Linear {
        start_time: f64,
        start_value: Value,
        out_handles: Vec<Handle>,
        in_handles: Vec<Handle>,
    },
    Bezier {
        start_time: f64,
        start_value: Value,
        out_handles: Vec<Handle>,
        in_handles: Vec<Handle>,
        #[serde(default)]
        spatial_tangents: Option<SpatialTangents>,
    },
}

impl Segment {
    pub fn start_time(&self) -> f64 {
        match self {
            Segment::Hold { start_time, .. }
            | Segment::Linear { start_time, .. }
            | Segment::Bezier { start_time, .. } => *start_time,
        }
    }

    pub fn start_value(&self) -> &Value {
        match self {
            Segment::Hold { start_value, .. }
            | Segment::Linear { start_value, .. }
            | Segment::Bezier { start_value, .. } => start_value,
        }
    }

    /// `(out, in)` handles, or `None` for holds.
    pub fn handles(&self) -> Option<(&[Handle], &[Handle])> {
        match self {
            Segment::Hold { .. } => None,
            Segment::Linear {
                out_handles,
                in_handles,
                ..
            }
            | Segment::Bezier {
                out_handles,
                in_handles,
                ..
            } => Some((out_handles, in_handles)),
        }
    }

    /// Evaluate between this segment's start and `end` at `time`.
    pub fn evaluate(&self, end: &CurvePoint, time: f64) -> Value {
        let (out_handles, in_handles, tangents) = match self {
            Segment::Hold { start_value, .. } => return start_value.clone(),
            Segment::Linear {
                out_handles,
                in_handles,
                ..
            } => (out_handles, in_handles, None),
            Segment::Bezier {
                out_handles,
                in_handles,
                spatial_tangents,
                ..
            } => (out_handles, in_handles, spatial_tangents.as_ref()),
        };
        let start_time = self.start_time();
        let start_value = self.start_value();
        let span = end.time - start_time;
        let u = if span > 0.0 {
            ((time - start_time) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let eased_axis = |axis: usize| -> f64 {
            let last = out_handles.len().min(in_handles.len()).saturating_sub(1);
            match (out_handles.get(axis.min(last)), in_handles.get(axis.min(last))) {
                (Some(o), Some(i)) => ease::bezier_ease(u, o.x, o.y, i.x, i.y),
                _ => u,
            }
        };

        if let Some(tangents) = tangents {
            // Spatial: move along the tangent-defined path at the eased rate.
            let from = start_value.position_components();
            let to = end.value.position_components();
            let [p0, p1, p2, p3] =
                arc_length::control_points(&from, &tangents.out, &to, &tangents.r#in);
            let along = arc_length::point_at(&p0, &p1, &p2, &p3, eased_axis(0));
            return start_value.with_components(&along);
        }

        match (start_value, &end.value) {
            (Value::Shape(_), _) => start_value.lerp(&end.value, eased_axis(0)),
            _ => {
                let a = start_value.components();
                let b = end.value.components();
                let data: Vec<f64> = a
                    .iter()
                    .zip(b.iter())
                    .enumerate()
                    .map(|(axis, (x, y))| lerp(*x, *y, eased_axis(axis)))
                    .collect();
                start_value.with_components(&data)
            }
        }
    }
}

/// A bare `(time, value)` pair: the terminal point of a curve or a static property.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CurvePoint {
    pub time: f64,
    pub value: Value,
}

/// Ordered segments spanning `[first key, last key]`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Curve {
    pub segments: Vec<Segment>,
    pub end: CurvePoint,
}

impl Curve {
    pub fn start_time(&self) -> f64 {
        self.segments
            .first()
            .map(Segment::start_time)
            .unwrap_or(self.end.time)
    }

    /// Evaluate the reconstructed curve, holding the first/last values outside its span.
    pub fn evaluate(&self, time: f64) -> Value {
        let idx = self
            .segments
            .partition_point(|s| s.start_time() <= time);
        if idx == 0 {
            return self
                .segments
                .first()
                .map(|s| s.start_value().clone())
                .unwrap_or_else(|| self.end.value.clone());
        }
        if time >= self.end.time {
            return self.end.value.clone();
        }
        let seg = &self.segments[idx - 1];
        match self.segments.get(idx) {
            Some(next) => {
                let next_point = CurvePoint {
                    time: next.start_time(),
                    value: next.start_value().clone(),
                };
                seg.evaluate(&next_point, time)
            }
            None => seg.evaluate(&self.end, time),
        }
    }
}

/// Result of curve building for a property of any key count >= 1.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum CurveData {
    /// A single keyframe: the property never changes.
    Static(CurvePoint),
    Segments(Curve),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_segment(spatial_tangents: Option<SpatialTangents>) -> Segment {
        Segment::Bezier {
            start_time: 0.0,
            start_value: Value::vec2(0.0, 0.0),
            out_handles: vec![Handle::new(0.333, 0.333); 2],
            in_handles: vec![Handle::new(0.667, 0.667); 2],
            spatial_tangents,
        }
    }

    #[test]
    fn spatial_tangents_bend_the_evaluated_path() {
        let end = CurvePoint {
            time: 1.0,
            value: Value::vec2(100.0, 0.0),
        };
        let arched = straight_segment(Some(SpatialTangents {
            out: vec![0.0, 100.0],
            r#in: vec![0.0, 100.0],
        }));
        assert_eq!(arched.evaluate(&end, 0.5), Value::vec2(50.0, 75.0));

        let flat = straight_segment(None);
        assert_eq!(flat.evaluate(&end, 0.5), Value::vec2(50.0, 0.0));
    }
}
