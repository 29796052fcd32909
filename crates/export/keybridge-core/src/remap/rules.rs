//! Built-in remap rules. All rules are pure: `(raw value, geometry) -> destination value`.
//!
//! Host conventions: pixels with a top-left origin and y down, clockwise
//! degrees, percentages on a 0..100 scale. Sign flips subtract from zero so
//! a zero input never becomes `-0.0` in emitted text.

use crate::remap::GeometryContext;
use crate::value::Value;

/// Map the x/y components of a Vec2/Vec3, leaving z untouched.
fn map_xy(value: &Value, f: impl Fn(f64, f64) -> (f64, f64)) -> Option<Value> {
    match value {
        Value::Vec2([x, y]) => {
            let (x, y) = f(*x, *y);
            Some(Value::Vec2([x, y]))
        }
        Value::Vec3([x, y, z]) => {
            let (x, y) = f(*x, *y);
            Some(Value::Vec3([x, y, *z]))
        }
        _ => None,
    }
}

/// Apply `f` to every component of a numeric (non-shape) value.
fn map_components(value: &Value, f: impl Fn(f64) -> f64) -> Option<Value> {
    match value {
        Value::Shape(_) => None,
        other => {
            let data: Vec<f64> = other.components().into_iter().map(f).collect();
            Some(other.with_components(&data))
        }
    }
}

/// Composition pixels -> 0..1 with a bottom-left origin.
pub fn position_normalized(value: &Value, geo: &GeometryContext) -> Option<Value> {
    let [cx, cy] = geo.anchor_correction();
    map_xy(value, |x, y| {
        ((x + cx) / geo.comp_width, 1.0 - (y + cy) / geo.comp_height)
    })
}

/// Composition pixels -> pixels from the composition center, y up.
pub fn position_centered(value: &Value, geo: &GeometryContext) -> Option<Value> {
    let [cx, cy] = geo.anchor_correction();
    map_xy(value, |x, y| {
        (
            x + cx - geo.comp_width * 0.5,
            geo.comp_height * 0.5 - (y + cy),
        )
    })
}

/// Pixel offset -> fraction of the composition, y up.
pub fn offset_normalized(value: &Value, geo: &GeometryContext) -> Option<Value> {
    map_xy(value, |x, y| (x / geo.comp_width, 0.0 - y / geo.comp_height))
}

/// Pixel offset with the vertical axis flipped.
pub fn offset_flipped(value: &Value, _geo: &GeometryContext) -> Option<Value> {
    map_xy(value, |x, y| (x, 0.0 - y))
}

/// 0..100 -> 0..1 on every component.
pub fn percent_to_unit(value: &Value, _geo: &GeometryContext) -> Option<Value> {
    map_components(value, |v| v / 100.0)
}

/// Clockwise degrees -> counter-clockwise degrees.
pub fn rotation_flip_degrees(value: &Value, _geo: &GeometryContext) -> Option<Value> {
    match value {
        Value::Scalar(deg) => Some(Value::Scalar(0.0 - deg)),
        _ => None,
    }
}

/// Clockwise degrees -> counter-clockwise radians.
pub fn rotation_flip_radians(value: &Value, _geo: &GeometryContext) -> Option<Value> {
    match value {
        Value::Scalar(deg) => Some(Value::Scalar(0.0 - deg.to_radians())),
        _ => None,
    }
}

pub fn shape_size_normalized(value: &Value, geo: &GeometryContext) -> Option<Value> {
    let [w, h] = geo.container_size();
    match value {
        Value::Vec2([x, y]) => Some(Value::Vec2([x / w, y / h])),
        _ => None,
    }
}

pub fn shape_width_normalized(value: &Value, geo: &GeometryContext) -> Option<Value> {
    let [w, _] = geo.container_size();
    match value {
        Value::Scalar(x) => Some(Value::Scalar(x / w)),
        _ => None,
    }
}

pub fn shape_height_normalized(value: &Value, geo: &GeometryContext) -> Option<Value> {
    let [_, h] = geo.container_size();
    match value {
        Value::Scalar(y) => Some(Value::Scalar(y / h)),
        _ => None,
    }
}

pub fn color_passthrough(value: &Value, _geo: &GeometryContext) -> Option<Value> {
    match value {
        Value::Color(_) => Some(value.clone()),
        _ => None,
    }
}

pub fn identity(value: &Value, _geo: &GeometryContext) -> Option<Value> {
    Some(value.clone())
}
