//! Segment construction from a property's native keyframes.
//!
//! Handle math, per axis:
//! - `out.x = easeOut.influence / 100`, `in.x = 1 - easeIn.influence / 100`
//! - `out.y = (easeOut.speed / avg) * out.x`
//! - `in.y  = 1 - (easeIn.speed / avg) * easeIn.influence / 100`
//!
//! `avg` is the signed value change per second for independent axes, or the
//! arc length per second for spatial and shape values. A zero `avg` collapses
//! `y` onto `x`.

use log::trace;

use super::arc_length::arc_length;
use super::{Curve, CurveData, CurvePoint, Handle, Segment, SpatialTangents};
use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::numeric::{distance, round_to};
use crate::property::{Ease, InterpolationKind, PropertyAccessor};
use crate::value::{Value, ValueKind};

/// Compute `(out, in)` handles for one axis from the surrounding eases.
pub fn ease_handles(ease_out: Ease, ease_in: Ease, average_speed: f64, decimals: u32) -> (Handle, Handle) {
    let out_x = ease_out.influence / 100.0;
    let in_x = 1.0 - ease_in.influence / 100.0;
    let (out_y, in_y) = if average_speed == 0.0 || !average_speed.is_finite() {
        (out_x, in_x)
    } else {
        (
            (ease_out.speed / average_speed) * out_x,
            1.0 - (ease_in.speed / average_speed) * (ease_in.influence / 100.0),
        )
    };
    (
        Handle::new(round_to(out_x, decimals), round_to(out_y, decimals)),
        Handle::new(round_to(in_x, decimals), round_to(in_y, decimals)),
    )
}

/// `y == x` handles for straight segments.
fn linear_handles(ease_out: Ease, ease_in: Ease, decimals: u32) -> (Handle, Handle) {
    ease_handles(ease_out, ease_in, 0.0, decimals)
}

/// Pick the ease for `axis`, reusing the last entry when the host reports fewer.
fn ease_for_axis(eases: &[Ease], axis: usize) -> Ease {
    eases
        .get(axis)
        .or_else(|| eases.last())
        .copied()
        .unwrap_or_default()
}

fn is_spatial<A: PropertyAccessor + ?Sized>(accessor: &A, value: &Value) -> bool {
    value.kind() == ValueKind::Shape
        || (accessor.is_spatial() && matches!(value.kind(), ValueKind::Vec2 | ValueKind::Vec3))
}

/// Build the segment between keyframes `index` and `index + 1`.
pub fn segment_between<A>(accessor: &A, index: usize, config: &ExportConfig) -> Result<Segment, ExportError>
where
    A: PropertyAccessor + ?Sized,
{
    let start_time = accessor.keyframe_time(index)?;
    let start_value = accessor.keyframe_value(index)?;

    if accessor.out_interpolation(index)? == InterpolationKind::Hold {
        return Ok(Segment::Hold {
            start_time,
            start_value,
        });
    }

    let next = index + 1;
    let end_time = accessor.keyframe_time(next)?;
    let end_value = accessor.keyframe_value(next)?;
    if end_value.kind() != start_value.kind() {
        return Err(ExportError::ValueKindMismatch {
            index: next,
            expected: start_value.kind(),
            actual: end_value.kind(),
        });
    }
    let (expected, actual) = (start_value.components().len(), end_value.components().len());
    if expected != actual {
        return Err(ExportError::ComponentCountMismatch {
            index: next,
            expected,
            actual,
        });
    }

    let eases_out = accessor.ease_out(index)?;
    let eases_in = accessor.ease_in(next)?;
    let decimals = config.handle_decimals;
    let axes = start_value.axis_count();
    let spatial = is_spatial(accessor, &start_value);

    let both_linear = accessor.out_interpolation(index)? == InterpolationKind::Linear
        && accessor.in_interpolation(next)? == InterpolationKind::Linear;
    if both_linear {
        let (out_handles, in_handles): (Vec<Handle>, Vec<Handle>) = (0..axes)
            .map(|axis| {
                let axis = if spatial { 0 } else { axis };
                linear_handles(ease_for_axis(&eases_out, axis), ease_for_axis(&eases_in, axis), decimals)
            })
            .unzip();
        return Ok(Segment::Linear {
            start_time,
            start_value,
            out_handles,
            in_handles,
        });
    }

    let duration = end_time - start_time;

    if spatial {
        let from = start_value.position_components();
        let to = end_value.position_components();
        let tangents = if start_value.kind() == ValueKind::Shape {
            None
        } else {
            Some(SpatialTangents {
                out: accessor.spatial_tangent_out(index)?.unwrap_or_else(|| vec![0.0; from.len()]),
                r#in: accessor.spatial_tangent_in(next)?.unwrap_or_else(|| vec![0.0; to.len()]),
            })
        };
        let length = match &tangents {
            Some(t) => arc_length(&from, &t.out, &to, &t.r#in, config.arc_length_steps),
            None => distance(&from, &to),
        };
        let average_speed = if duration > 0.0 { length / duration } else { 0.0 };
        trace!("spatial segment {index}: arc length {length}, average speed {average_speed}");

        let (out_h, in_h) = ease_handles(
            ease_for_axis(&eases_out, 0),
            ease_for_axis(&eases_in, 0),
            average_speed,
            decimals,
        );
        return Ok(Segment::Bezier {
            start_time,
            start_value,
            out_handles: vec![out_h; axes],
            in_handles: vec![in_h; axes],
            spatial_tangents: tangents,
        });
    }

    let from = start_value.components();
    let to = end_value.components();
    let (out_handles, in_handles): (Vec<Handle>, Vec<Handle>) = from
        .iter()
        .zip(to.iter())
        .enumerate()
        .map(|(axis, (a, b))| {
            let average_speed = if duration > 0.0 { (b - a) / duration } else { 0.0 };
            ease_handles(
                ease_for_axis(&eases_out, axis),
                ease_for_axis(&eases_in, axis),
                average_speed,
                decimals,
            )
        })
        .unzip();

    Ok(Segment::Bezier {
        start_time,
        start_value,
        out_handles,
        in_handles,
        spatial_tangents: None,
    })
}

/// Build the segment list for a property with at least two keyframes.
pub fn build_segments<A>(accessor: &A, config: &ExportConfig) -> Result<Curve, ExportError>
where
    A: PropertyAccessor + ?Sized,
{
    let count = accessor.keyframe_count();
    if count < 2 {
        return Err(ExportError::InputShape { keyframes: count });
    }
    let segments = (0..count - 1)
        .map(|index| segment_between(accessor, index, config))
        .collect::<Result<Vec<_>, _>>()?;
    let end = CurvePoint {
        time: accessor.keyframe_time(count - 1)?,
        value: accessor.keyframe_value(count - 1)?,
    };
    Ok(Curve { segments, end })
}

/// Like [`build_segments`] but a single keyframe yields a static value.
pub fn build_curve<A>(accessor: &A, config: &ExportConfig) -> Result<CurveData, ExportError>
where
    A: PropertyAccessor + ?Sized,
{
    match accessor.keyframe_count() {
        0 => Err(ExportError::InputShape { keyframes: 0 }),
        1 => Ok(CurveData::Static(CurvePoint {
            time: accessor.keyframe_time(0)?,
            value: accessor.keyframe_value(0)?,
        })),
        _ => build_segments(accessor, config).map(CurveData::Segments),
    }
}
