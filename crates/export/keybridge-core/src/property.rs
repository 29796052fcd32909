//! Property access: the seam between the host application and the exporter.
//!
//! [`PropertyAccessor`] is implemented by the host binding. Two in-crate
//! implementations are provided: [`KeyframeTrack`] (serde-loadable keyframe
//! data) and [`FnProperty`] (a closure standing in for an expression).

use serde::{Deserialize, Serialize};

use crate::config::ExportConfig;
use crate::curve::segment_between;
use crate::error::AccessorError;
use crate::value::Value;

/// Keyframe interpolation on one side of a key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationKind {
    Hold,
    Linear,
    #[default]
    Bezier,
}

/// Host-side keyframe shaping: how far the ease reaches (percent of the
/// segment) and the value speed at the key (units per second).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ease {
    pub influence: f64,
    pub speed: f64,
}

impl Ease {
    pub fn new(influence: f64, speed: f64) -> Self {
        Self { influence, speed }
    }
}

impl Default for Ease {
    /// The host's default ease: one sixth of the segment at zero speed.
    fn default() -> Self {
        Self {
            influence: 100.0 / 6.0,
            speed: 0.0,
        }
    }
}

/// Read-only view of one animatable property.
///
/// Every query is expected to be deterministic; failures terminate the
/// export of this property only.
pub trait PropertyAccessor {
    /// Evaluate the property (including any expression) at `time` seconds.
    fn value_at(&self, time: f64) -> Result<Value, AccessorError>;

    fn keyframe_count(&self) -> usize;

    fn keyframe_time(&self, index: usize) -> Result<f64, AccessorError>;

    fn keyframe_value(&self, index: usize) -> Result<Value, AccessorError>;

    /// Incoming ease; one entry per axis or a single entry for spatial/shape.
    fn ease_in(&self, index: usize) -> Result<Vec<Ease>, AccessorError>;

    /// Outgoing ease; one entry per axis or a single entry for spatial/shape.
    fn ease_out(&self, index: usize) -> Result<Vec<Ease>, AccessorError>;

    fn spatial_tangent_in(&self, index: usize) -> Result<Option<Vec<f64>>, AccessorError>;

    fn spatial_tangent_out(&self, index: usize) -> Result<Option<Vec<f64>>, AccessorError>;

    fn in_interpolation(&self, index: usize) -> Result<InterpolationKind, AccessorError>;

    fn out_interpolation(&self, index: usize) -> Result<InterpolationKind, AccessorError>;

    /// Position-like property whose keys carry spatial tangents.
    fn is_spatial(&self) -> bool;

    /// Value is computed by an expression rather than the keyframes alone.
    fn is_expression_driven(&self) -> bool {
        false
    }
}

/// A single native keyframe.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    pub time: f64,
    pub value: Value,
    #[serde(default)]
    pub ease_in: Vec<Ease>,
    #[serde(default)]
    pub ease_out: Vec<Ease>,
    #[serde(default)]
    pub spatial_tangent_in: Option<Vec<f64>>,
    #[serde(default)]
    pub spatial_tangent_out: Option<Vec<f64>>,
    #[serde(default)]
    pub in_interpolation: InterpolationKind,
    #[serde(default)]
    pub out_interpolation: InterpolationKind,
}

impl Keyframe {
    /// Keyframe with default eases and Bezier interpolation on both sides.
    pub fn new(time: f64, value: Value) -> Self {
        Self {
            time,
            value,
            ease_in: Vec::new(),
            ease_out: Vec::new(),
            spatial_tangent_in: None,
            spatial_tangent_out: None,
            in_interpolation: InterpolationKind::Bezier,
            out_interpolation: InterpolationKind::Bezier,
        }
    }

    pub fn with_eases(mut self, ease_in: Ease, ease_out: Ease) -> Self {
        self.ease_in = vec![ease_in];
        self.ease_out = vec![ease_out];
        self
    }

    pub fn with_interpolation(mut self, r#in: InterpolationKind, out: InterpolationKind) -> Self {
        self.in_interpolation = r#in;
        self.out_interpolation = out;
        self
    }

    pub fn with_spatial_tangents(mut self, r#in: Vec<f64>, out: Vec<f64>) -> Self {
        self.spatial_tangent_in = Some(r#in);
        self.spatial_tangent_out = Some(out);
        self
    }
}

/// Keyframe data held in memory, ordered by time.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct KeyframeTrack {
    #[serde(default)]
    pub name: String,
    pub keyframes: Vec<Keyframe>,
    #[serde(default)]
    pub spatial: bool,
}

impl KeyframeTrack {
    pub fn new(keyframes: Vec<Keyframe>) -> Self {
        Self {
            name: String::new(),
            keyframes,
            spatial: false,
        }
    }

    pub fn spatial(mut self) -> Self {
        self.spatial = true;
        self
    }

    fn key(&self, index: usize) -> Result<&Keyframe, AccessorError> {
        self.keyframes
            .get(index)
            .ok_or_else(|| AccessorError::key_out_of_range(index, self.keyframes.len()))
    }
}

impl PropertyAccessor for KeyframeTrack {
    fn value_at(&self, time: f64) -> Result<Value, AccessorError> {
        let keys = &self.keyframes;
        let (first, last) = match (keys.first(), keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(AccessorError::new("property has no keyframes")),
        };
        if time <= first.time {
            return Ok(first.value.clone());
        }
        if time >= last.time {
            return Ok(last.value.clone());
        }
        // keys[idx - 1].time < time < keys[idx].time
        let idx = keys.partition_point(|k| k.time <= time);
        let index = idx - 1;
        let segment = segment_between(self, index, &ExportConfig::default())
            .map_err(|e| AccessorError::new(e.to_string()))?;
        let end = crate::curve::CurvePoint {
            time: keys[idx].time,
            value: keys[idx].value.clone(),
        };
        Ok(segment.evaluate(&end, time))
    }

    fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    fn keyframe_time(&self, index: usize) -> Result<f64, AccessorError> {
        self.key(index).map(|k| k.time)
    }

    fn keyframe_value(&self, index: usize) -> Result<Value, AccessorError> {
        self.key(index).map(|k| k.value.clone())
    }

    fn ease_in(&self, index: usize) -> Result<Vec<Ease>, AccessorError> {
        self.key(index).map(|k| k.ease_in.clone())
    }

    fn ease_out(&self, index: usize) -> Result<Vec<Ease>, AccessorError> {
        self.key(index).map(|k| k.ease_out.clone())
    }

    fn spatial_tangent_in(&self, index: usize) -> Result<Option<Vec<f64>>, AccessorError> {
        self.key(index).map(|k| k.spatial_tangent_in.clone())
    }

    fn spatial_tangent_out(&self, index: usize) -> Result<Option<Vec<f64>>, AccessorError> {
        self.key(index).map(|k| k.spatial_tangent_out.clone())
    }

    fn in_interpolation(&self, index: usize) -> Result<InterpolationKind, AccessorError> {
        self.key(index).map(|k| k.in_interpolation)
    }

    fn out_interpolation(&self, index: usize) -> Result<InterpolationKind, AccessorError> {
        self.key(index).map(|k| k.out_interpolation)
    }

    fn is_spatial(&self) -> bool {
        self.spatial
    }
}

/// Expression-driven property with no native keyframes.
pub struct FnProperty<F> {
    eval: F,
}

impl<F> FnProperty<F>
where
    F: Fn(f64) -> Result<Value, AccessorError>,
{
    pub fn new(eval: F) -> Self {
        Self { eval }
    }
}

impl<F> PropertyAccessor for FnProperty<F>
where
    F: Fn(f64) -> Result<Value, AccessorError>,
{
    fn value_at(&self, time: f64) -> Result<Value, AccessorError> {
        (self.eval)(time)
    }

    fn keyframe_count(&self) -> usize {
        0
    }

    fn keyframe_time(&self, index: usize) -> Result<f64, AccessorError> {
        Err(AccessorError::key_out_of_range(index, 0))
    }

    fn keyframe_value(&self, index: usize) -> Result<Value, AccessorError> {
        Err(AccessorError::key_out_of_range(index, 0))
    }

    fn ease_in(&self, index: usize) -> Result<Vec<Ease>, AccessorError> {
        Err(AccessorError::key_out_of_range(index, 0))
    }

    fn ease_out(&self, index: usize) -> Result<Vec<Ease>, AccessorError> {
        Err(AccessorError::key_out_of_range(index, 0))
    }

    fn spatial_tangent_in(&self, index: usize) -> Result<Option<Vec<f64>>, AccessorError> {
        Err(AccessorError::key_out_of_range(index, 0))
    }

    fn spatial_tangent_out(&self, index: usize) -> Result<Option<Vec<f64>>, AccessorError> {
        Err(AccessorError::key_out_of_range(index, 0))
    }

    fn in_interpolation(&self, index: usize) -> Result<InterpolationKind, AccessorError> {
        Err(AccessorError::key_out_of_range(index, 0))
    }

    fn out_interpolation(&self, index: usize) -> Result<InterpolationKind, AccessorError> {
        Err(AccessorError::key_out_of_range(index, 0))
    }

    fn is_spatial(&self) -> bool {
        false
    }

    fn is_expression_driven(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_keys(out: InterpolationKind) -> KeyframeTrack {
        KeyframeTrack::new(vec![
            Keyframe::new(0.0, Value::scalar(0.0))
                .with_interpolation(InterpolationKind::Linear, out),
            Keyframe::new(1.0, Value::scalar(10.0)).with_interpolation(
                InterpolationKind::Linear,
                InterpolationKind::Linear,
            ),
        ])
    }

    #[test]
    fn linear_track_evaluates_linearly() {
        let track = two_keys(InterpolationKind::Linear);
        assert_eq!(track.value_at(0.5).unwrap(), Value::scalar(5.0));
        assert_eq!(track.value_at(-1.0).unwrap(), Value::scalar(0.0));
        assert_eq!(track.value_at(2.0).unwrap(), Value::scalar(10.0));
    }

    #[test]
    fn hold_track_keeps_first_value() {
        let track = two_keys(InterpolationKind::Hold);
        for i in 0..10 {
            let t = i as f64 / 10.0;
            assert_eq!(track.value_at(t).unwrap(), Value::scalar(0.0));
        }
        assert_eq!(track.value_at(1.0).unwrap(), Value::scalar(10.0));
    }

    #[test]
    fn out_of_range_key_is_an_accessor_error() {
        let track = two_keys(InterpolationKind::Linear);
        let err = track.keyframe_time(5).unwrap_err();
        assert!(err.reason.contains("out of range"));
    }

    #[test]
    fn fn_property_is_expression_driven() {
        let prop = FnProperty::new(|t| Ok(Value::scalar(t * 2.0)));
        assert!(prop.is_expression_driven());
        assert_eq!(prop.keyframe_count(), 0);
        assert_eq!(prop.value_at(1.5).unwrap(), Value::scalar(3.0));
    }

    #[test]
    fn keyframe_json_defaults() {
        let key: Keyframe =
            serde_json::from_str(r#"{ "time": 1.0, "value": { "type": "scalar", "data": 4.0 } }"#)
                .unwrap();
        assert_eq!(key.in_interpolation, InterpolationKind::Bezier);
        assert!(key.ease_in.is_empty());
    }
}
