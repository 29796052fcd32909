//! Value remapping registry.
//!
//! Each destination owns a table of pure rules keyed on [`PropertyKind`].
//! Built-in entries come from an exhaustive match so adding a kind fails to
//! compile until every destination handles it; callers may override single
//! entries with [`RemapRegistry::register`].

pub mod rules;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::value::Value;

/// Semantic role of an animated property, selecting its remap rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// Layer position in composition pixels.
    Position,
    /// Relative pixel offset (anchor point, shape group position).
    Offset,
    /// Percent scale.
    Scale,
    /// Rotation in degrees, clockwise.
    Rotation,
    /// Opacity percentage.
    Opacity,
    /// Any other 0..100 parameter.
    Percentage,
    /// Shape width/height pair in pixels.
    ShapeSize,
    ShapeWidth,
    ShapeHeight,
    /// Normalized RGB.
    Color,
    /// Passed through untouched.
    Identity,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 11] = [
        PropertyKind::Position,
        PropertyKind::Offset,
        PropertyKind::Scale,
        PropertyKind::Rotation,
        PropertyKind::Opacity,
        PropertyKind::Percentage,
        PropertyKind::ShapeSize,
        PropertyKind::ShapeWidth,
        PropertyKind::ShapeHeight,
        PropertyKind::Color,
        PropertyKind::Identity,
    ];

    /// Kinds whose keypoint tangents carry the secondary ease-high percentage.
    #[inline]
    pub fn carries_ease_high(self) -> bool {
        matches!(self, PropertyKind::Scale | PropertyKind::Opacity)
    }
}

/// Target animation system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Discrete per-frame table: normalized coordinates, bottom-left origin.
    Table,
    /// Keypoint blocks with Bezier tangents: centered pixels, radians.
    Keypoint,
}

impl Destination {
    /// Whether the destination can represent continuous Bezier curves.
    #[inline]
    pub fn supports_curves(self) -> bool {
        match self {
            Destination::Table => false,
            Destination::Keypoint => true,
        }
    }
}

/// Layer-space rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[inline]
    pub fn center(&self) -> [f64; 2] {
        [self.left + self.width * 0.5, self.top + self.height * 0.5]
    }
}

/// Scene facts the remap rules need.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryContext {
    pub comp_width: f64,
    pub comp_height: f64,
    /// Seconds per frame.
    pub frame_duration: f64,
    /// Layer anchor point, layer space.
    #[serde(default)]
    pub anchor: Option<[f64; 2]>,
    /// Layer content bounds, layer space.
    #[serde(default)]
    pub bounds: Option<Bounds>,
    /// Width/height used to normalize shape sizes; defaults to the composition.
    #[serde(default)]
    pub container: Option<[f64; 2]>,
}

impl GeometryContext {
    pub fn new(comp_width: f64, comp_height: f64, frame_rate: f64) -> Self {
        Self {
            comp_width,
            comp_height,
            frame_duration: 1.0 / frame_rate,
            anchor: None,
            bounds: None,
            container: None,
        }
    }

    pub fn with_anchor_bounds(mut self, anchor: [f64; 2], bounds: Bounds) -> Self {
        self.anchor = Some(anchor);
        self.bounds = Some(bounds);
        self
    }

    pub fn with_container(mut self, width: f64, height: f64) -> Self {
        self.container = Some([width, height]);
        self
    }

    /// Pixel correction moving an anchored position onto the content center.
    pub fn anchor_correction(&self) -> [f64; 2] {
        match (self.anchor, self.bounds) {
            (Some(anchor), Some(bounds)) => {
                let center = bounds.center();
                [center[0] - anchor[0], center[1] - anchor[1]]
            }
            _ => [0.0, 0.0],
        }
    }

    pub fn container_size(&self) -> [f64; 2] {
        self.container
            .unwrap_or([self.comp_width, self.comp_height])
    }
}

/// A pure remap function. `None` means the value's kind is not handled.
pub type RemapRule = fn(&Value, &GeometryContext) -> Option<Value>;

fn builtin_rule(destination: Destination, kind: PropertyKind) -> RemapRule {
    use Destination::*;
    use PropertyKind::*;
    match (destination, kind) {
        (Table, Position) => rules::position_normalized,
        (Keypoint, Position) => rules::position_centered,
        (Table, Offset) => rules::offset_normalized,
        (Keypoint, Offset) => rules::offset_flipped,
        (Table | Keypoint, Scale) => rules::percent_to_unit,
        (Table, Rotation) => rules::rotation_flip_degrees,
        (Keypoint, Rotation) => rules::rotation_flip_radians,
        (Table | Keypoint, Opacity | Percentage) => rules::percent_to_unit,
        (Table | Keypoint, ShapeSize) => rules::shape_size_normalized,
        (Table | Keypoint, ShapeWidth) => rules::shape_width_normalized,
        (Table | Keypoint, ShapeHeight) => rules::shape_height_normalized,
        (Table | Keypoint, Color) => rules::color_passthrough,
        (Table | Keypoint, Identity) => rules::identity,
    }
}

/// Per-destination rule table.
#[derive(Clone, Debug)]
pub struct RemapRegistry {
    destination: Destination,
    rules: HashMap<PropertyKind, RemapRule>,
}

impl RemapRegistry {
    /// Registry pre-populated with the destination's built-in rules.
    pub fn for_destination(destination: Destination) -> Self {
        let mut registry = Self {
            destination,
            rules: HashMap::with_capacity(PropertyKind::ALL.len()),
        };
        for kind in PropertyKind::ALL {
            registry.register(kind, builtin_rule(destination, kind));
        }
        registry
    }

    #[inline]
    pub fn destination(&self) -> Destination {
        self.destination
    }

    /// Replace the rule for one kind.
    #[inline]
    pub fn register(&mut self, kind: PropertyKind, rule: RemapRule) {
        self.rules.insert(kind, rule);
    }

    #[inline]
    pub fn rule(&self, kind: PropertyKind) -> RemapRule {
        self.rules
            .get(&kind)
            .copied()
            .unwrap_or_else(|| builtin_rule(self.destination, kind))
    }

    /// Apply the rule for `kind` to `value`.
    pub fn remap(
        &self,
        kind: PropertyKind,
        value: &Value,
        geometry: &GeometryContext,
    ) -> Result<Value, ExportError> {
        (self.rule(kind))(value, geometry).ok_or(ExportError::UnsupportedValue {
            kind,
            value: value.kind(),
        })
    }
}
