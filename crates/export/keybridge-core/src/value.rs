//! Value: property values as read from the host and written to destinations.
//! All numeric types use f64 so ten-decimal output stays exact.

use serde::{Deserialize, Serialize};

/// Lightweight kind enum for pattern-matching and error reporting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Scalar,
    Vec2,
    Vec3,
    Color,
    Shape,
}

/// Vector path geometry: one vertex per entry, tangents relative to their vertex.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ShapePath {
    pub vertices: Vec<[f64; 2]>,
    #[serde(default)]
    pub in_tangents: Vec<[f64; 2]>,
    #[serde(default)]
    pub out_tangents: Vec<[f64; 2]>,
    #[serde(default)]
    pub closed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Value {
    /// Scalar (opacity, rotation, slider, ...)
    Scalar(f64),

    /// 2D vector (position, scale, size)
    Vec2([f64; 2]),

    /// 3D vector (3D position, 3D scale)
    Vec3([f64; 3]),

    /// RGB color, normalized 0..1
    Color([f64; 3]),

    /// Vector path
    Shape(ShapePath),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Color(_) => ValueKind::Color,
            Value::Shape(_) => ValueKind::Shape,
        }
    }

    /// Number of independently animated axes.
    ///
    /// Shapes animate as a single axis: the whole path eases together.
    pub fn axis_count(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::Vec2(_) => 2,
            Value::Vec3(_) | Value::Color(_) => 3,
            Value::Shape(_) => 1,
        }
    }

    /// Flatten into plain components. Shapes flatten vertices, then in/out tangents.
    pub fn components(&self) -> Vec<f64> {
        match self {
            Value::Scalar(v) => vec![*v],
            Value::Vec2(a) => a.to_vec(),
            Value::Vec3(a) | Value::Color(a) => a.to_vec(),
            Value::Shape(path) => path
                .vertices
                .iter()
                .chain(path.in_tangents.iter())
                .chain(path.out_tangents.iter())
                .flat_map(|p| p.iter().copied())
                .collect(),
        }
    }

    /// Flattened vertex coordinates only (the part of a shape that moves along a path).
    pub fn position_components(&self) -> Vec<f64> {
        match self {
            Value::Shape(path) => path.vertices.iter().flat_map(|p| p.iter().copied()).collect(),
            other => other.components(),
        }
    }

    /// Rebuild a value of the same kind from flattened components.
    ///
    /// Missing components fall back to the receiver's own values.
    pub fn with_components(&self, data: &[f64]) -> Value {
        let at = |i: usize, fallback: f64| data.get(i).copied().unwrap_or(fallback);
        match self {
            Value::Scalar(v) => Value::Scalar(at(0, *v)),
            Value::Vec2(a) => Value::Vec2([at(0, a[0]), at(1, a[1])]),
            Value::Vec3(a) => Value::Vec3([at(0, a[0]), at(1, a[1]), at(2, a[2])]),
            Value::Color(a) => Value::Color([at(0, a[0]), at(1, a[1]), at(2, a[2])]),
            Value::Shape(path) => {
                let mut idx = 0;
                let mut take = |points: &[[f64; 2]]| -> Vec<[f64; 2]> {
                    points
                        .iter()
                        .map(|p| {
                            let out = [at(idx, p[0]), at(idx + 1, p[1])];
                            idx += 2;
                            out
                        })
                        .collect()
                };
                let vertices = take(&path.vertices);
                let in_tangents = take(&path.in_tangents);
                let out_tangents = take(&path.out_tangents);
                Value::Shape(ShapePath {
                    vertices,
                    in_tangents,
                    out_tangents,
                    closed: path.closed,
                })
            }
        }
    }

    /// Component-wise linear blend. Mismatched kinds keep the left value.
    pub fn lerp(&self, other: &Value, t: f64) -> Value {
        if self.kind() != other.kind() {
            return self.clone();
        }
        let a = self.components();
        let b = other.components();
        if a.len() != b.len() {
            return self.clone();
        }
        let data: Vec<f64> = a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| x + (y - x) * t)
            .collect();
        self.with_components(&data)
    }

    /// Convenience constructors
    pub fn scalar(v: f64) -> Self {
        Value::Scalar(v)
    }

    pub fn vec2(x: f64, y: f64) -> Self {
        Value::Vec2([x, y])
    }

    pub fn vec3(x: f64, y: f64, z: f64) -> Self {
        Value::Vec3([x, y, z])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_components_round_trip_through_template() {
        let shape = Value::Shape(ShapePath {
            vertices: vec![[0.0, 0.0], [10.0, 5.0]],
            in_tangents: vec![[1.0, 1.0], [2.0, 2.0]],
            out_tangents: vec![[3.0, 3.0], [4.0, 4.0]],
            closed: true,
        });
        let flat = shape.components();
        assert_eq!(flat.len(), 12);
        assert_eq!(shape.with_components(&flat), shape);
        assert_eq!(shape.position_components(), vec![0.0, 0.0, 10.0, 5.0]);
    }

    #[test]
    fn lerp_mismatched_kinds_keeps_left() {
        let a = Value::scalar(1.0);
        let b = Value::vec2(2.0, 3.0);
        assert_eq!(a.lerp(&b, 0.5), a);
        assert_eq!(
            Value::vec2(0.0, 10.0).lerp(&Value::vec2(10.0, 0.0), 0.25),
            Value::vec2(2.5, 7.5)
        );
    }

    #[test]
    fn serde_uses_type_data_tagging() {
        let json = serde_json::to_value(Value::vec2(1.0, 2.0)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "vec2", "data": [1.0, 2.0] }));
    }
}
