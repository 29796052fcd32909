//! Text emitters for remapped keyframe streams.
//!
//! Emitters are stateless formatters over one scalar channel. They assume
//! strictly ascending, finite times and do not validate: unordered times are
//! written in the order given, a non-finite time collapses to frame/tick 0,
//! and non-finite values print as `NaN`/`inf`.

pub mod keypoint;
pub mod table;

use serde::{Deserialize, Serialize};

use crate::curve::Handle;

pub use keypoint::KeypointEmitter;
pub use table::TableEmitter;

/// One channel sample in destination units.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct RemappedPoint {
    pub time: f64,
    pub value: f64,
    /// Handle arriving at this point (normalized to the previous segment).
    #[serde(default)]
    pub tangent_in: Option<Handle>,
    /// Handle leaving this point (normalized to the next segment).
    #[serde(default)]
    pub tangent_out: Option<Handle>,
}

impl RemappedPoint {
    pub fn new(time: f64, value: f64) -> Self {
        Self {
            time,
            value,
            tangent_in: None,
            tangent_out: None,
        }
    }
}

/// Serializes a channel into destination-specific text.
pub trait Emitter {
    fn emit(&self, points: &[RemappedPoint]) -> String;
}
