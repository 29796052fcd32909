//! Keybridge Core
//!
//! Ports per-property animation between engines with different curve math.
//! A host property (keyframes with influence/speed eases, optional spatial
//! tangents, or an expression) is either rebuilt as normalized Bezier
//! segments or sampled per frame, remapped into destination units, and
//! written as destination keyframe text.
//!
//! Every call is self-contained: nothing is cached between exports, so
//! independent properties can be exported from different threads.

pub mod config;
pub mod curve;
pub mod emit;
pub mod error;
pub mod numeric;
pub mod pipeline;
pub mod property;
pub mod remap;
pub mod sampler;
pub mod time;
pub mod value;

// Re-exports for consumers (host bindings)
pub use config::{ExportConfig, SamplePrecision};
pub use curve::{build_curve, build_segments, Curve, CurveData, CurvePoint, Handle, Segment};
pub use emit::{Emitter, KeypointEmitter, RemappedPoint, TableEmitter};
pub use error::{AccessorError, ExportError};
pub use pipeline::{
    choose_route, export_batch, export_property, BatchItem, BatchResult, ChannelExport, ExportRequest,
    PropertyExport, Route,
};
pub use property::{Ease, FnProperty, InterpolationKind, Keyframe, KeyframeTrack, PropertyAccessor};
pub use remap::{Bounds, Destination, GeometryContext, PropertyKind, RemapRegistry};
pub use sampler::{sample, SampledPoint, SampledSeries};
pub use time::TimeRange;
pub use value::{ShapePath, Value, ValueKind};

/// Export result type
pub type Result<T> = core::result::Result<T, ExportError>;
