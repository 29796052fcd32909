//! Property export pipeline: route -> remap -> split channels -> emit.
//!
//! - Destinations without curve support, expression-driven properties and
//!   keyless properties go through the sampler.
//! - A single keyframe exports as one static point.
//! - Everything else goes through the curve builder; handles stay normalized
//!   so they survive the per-axis affine remaps unchanged. Hold segments get
//!   an extra knot one destination frame before the next key.
//! - Sampling always steps by the destination frame duration; a request
//!   range only supplies the window.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::ExportConfig;
use crate::curve::{build_curve, Curve, CurveData, Handle, Segment};
use crate::emit::{Emitter, KeypointEmitter, RemappedPoint, TableEmitter};
use crate::error::ExportError;
use crate::property::PropertyAccessor;
use crate::remap::{Destination, GeometryContext, PropertyKind, RemapRegistry};
use crate::sampler::{sample, SampledSeries};
use crate::time::TimeRange;
use crate::value::Value;

/// What to export and where.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub kind: PropertyKind,
    pub destination: Destination,
    pub geometry: GeometryContext,
    /// Sampling window; defaults to the keyframe span.
    #[serde(default)]
    pub range: Option<TimeRange>,
}

impl ExportRequest {
    pub fn new(kind: PropertyKind, destination: Destination, geometry: GeometryContext) -> Self {
        Self {
            kind,
            destination,
            geometry,
            range: None,
        }
    }

    pub fn with_range(mut self, range: TimeRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// Which path produced the points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Sampled,
    Static,
    Curve,
}

/// Emitted text for one value component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelExport {
    pub axis: usize,
    pub points: Vec<RemappedPoint>,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyExport {
    pub route: Route,
    pub channels: Vec<ChannelExport>,
}

/// Decide how a property is read.
pub fn choose_route<A>(accessor: &A, destination: Destination) -> Route
where
    A: PropertyAccessor + ?Sized,
{
    let keys = accessor.keyframe_count();
    if !destination.supports_curves() || accessor.is_expression_driven() || keys == 0 {
        Route::Sampled
    } else if keys == 1 {
        Route::Static
    } else {
        Route::Curve
    }
}

/// Holds shorter than this (seconds) get no pinned end knot.
const HOLD_EPSILON: f64 = 1e-9;

/// A time-stamped value plus the normalized handles touching it, per axis.
struct Knot {
    time: f64,
    value: Value,
    tangent_in: Option<Vec<Handle>>,
    tangent_out: Option<Vec<Handle>>,
}

fn knots_from_series(series: &SampledSeries) -> Vec<Knot> {
    series
        .points()
        .map(|p| Knot {
            time: p.time,
            value: p.value,
            tangent_in: None,
            tangent_out: None,
        })
        .collect()
}

fn knots_from_curve(curve: &Curve, frame_duration: f64) -> Vec<Knot> {
    let mut knots = Vec::with_capacity(curve.segments.len() + 1);
    let mut arriving: Option<Vec<Handle>> = None;
    for (index, segment) in curve.segments.iter().enumerate() {
        let (out, next_in) = match segment.handles() {
            Some((out, r#in)) => (Some(out.to_vec()), Some(r#in.to_vec())),
            None => (None, None),
        };
        knots.push(Knot {
            time: segment.start_time(),
            value: segment.start_value().clone(),
            tangent_in: arriving.take(),
            tangent_out: out,
        });
        arriving = next_in;

        if let Segment::Hold { start_time, start_value } = segment {
            // The held value lasts until one destination frame before the next key.
            let next_time = curve
                .segments
                .get(index + 1)
                .map(Segment::start_time)
                .unwrap_or(curve.end.time);
            let pinned = next_time - frame_duration;
            if pinned > *start_time + HOLD_EPSILON {
                knots.push(Knot {
                    time: pinned,
                    value: start_value.clone(),
                    tangent_in: None,
                    tangent_out: None,
                });
            }
        }
    }
    knots.push(Knot {
        time: curve.end.time,
        value: curve.end.value.clone(),
        tangent_in: arriving,
        tangent_out: None,
    });
    knots
}

/// Handle for `axis`, reusing the last one for values wider than their handle list.
fn axis_handle(handles: &Option<Vec<Handle>>, axis: usize) -> Option<Handle> {
    let handles = handles.as_ref()?;
    handles.get(axis).or_else(|| handles.last()).copied()
}

/// Remap knots and split them into per-component channels.
fn remap_channels(
    knots: &[Knot],
    request: &ExportRequest,
    registry: &RemapRegistry,
) -> Result<Vec<Vec<RemappedPoint>>, ExportError> {
    let mut channels: Vec<Vec<RemappedPoint>> = Vec::new();
    for (index, knot) in knots.iter().enumerate() {
        let remapped = registry.remap(request.kind, &knot.value, &request.geometry)?;
        let components = remapped.components();
        if channels.is_empty() {
            channels = vec![Vec::with_capacity(knots.len()); components.len()];
        } else if components.len() != channels.len() {
            return Err(ExportError::ComponentCountMismatch {
                index,
                expected: channels.len(),
                actual: components.len(),
            });
        }
        for (axis, (channel, value)) in channels.iter_mut().zip(components).enumerate() {
            channel.push(RemappedPoint {
                time: knot.time,
                value,
                tangent_in: axis_handle(&knot.tangent_in, axis),
                tangent_out: axis_handle(&knot.tangent_out, axis),
            });
        }
    }
    Ok(channels)
}

fn emitter_for(request: &ExportRequest, config: &ExportConfig) -> Box<dyn Emitter> {
    let frame_duration = request.geometry.frame_duration;
    match request.destination {
        Destination::Table => Box::new(TableEmitter::new(frame_duration)),
        Destination::Keypoint => {
            let ease_high = if request.kind.carries_ease_high() {
                config.ease_high_percent
            } else {
                None
            };
            Box::new(
                KeypointEmitter::new(frame_duration)
                    .with_timebase(config.keypoint_timebase)
                    .with_ease_high(ease_high),
            )
        }
    }
}

/// Export one property into per-channel text.
pub fn export_property<A>(
    accessor: &A,
    request: &ExportRequest,
    config: &ExportConfig,
) -> Result<PropertyExport, ExportError>
where
    A: PropertyAccessor + ?Sized,
{
    let route = choose_route(accessor, request.destination);
    debug!("exporting {:?} via {:?} route", request.kind, route);

    let knots = match route {
        Route::Sampled => {
            let frame_duration = request.geometry.frame_duration;
            // Sample on destination frames so every emitted key is unique.
            let range = match request.range {
                Some(range) => TimeRange::new(range.start, range.end, frame_duration)?,
                None => TimeRange::from_keyframes(accessor, frame_duration)?,
            };
            knots_from_series(&sample(accessor, &range, config)?)
        }
        Route::Static | Route::Curve => match build_curve(accessor, config)? {
            CurveData::Static(point) => vec![Knot {
                time: point.time,
                value: point.value,
                tangent_in: None,
                tangent_out: None,
            }],
            CurveData::Segments(curve) => knots_from_curve(&curve, request.geometry.frame_duration),
        },
    };

    let registry = RemapRegistry::for_destination(request.destination);
    let emitter = emitter_for(request, config);
    let channels = remap_channels(&knots, request, &registry)?
        .into_iter()
        .enumerate()
        .map(|(axis, points)| ChannelExport {
            axis,
            text: emitter.emit(&points),
            points,
        })
        .collect();

    Ok(PropertyExport { route, channels })
}

/// One property in a batch.
pub struct BatchItem<'a> {
    pub name: String,
    pub accessor: &'a dyn PropertyAccessor,
    pub request: ExportRequest,
}

/// Outcome for one property in a batch.
#[derive(Debug)]
pub struct BatchResult {
    pub name: String,
    pub result: Result<PropertyExport, ExportError>,
}

/// Export many properties; a failure only affects its own property.
pub fn export_batch<'a, I>(items: I, config: &ExportConfig) -> Vec<BatchResult>
where
    I: IntoIterator<Item = BatchItem<'a>>,
{
    items
        .into_iter()
        .map(|item| {
            let result = export_property(item.accessor, &item.request, config);
            if let Err(err) = &result {
                warn!("skipping property '{}' ({}): {}", item.name, err.category(), err);
            }
            BatchResult {
                name: item.name,
                result,
            }
        })
        .collect()
}
