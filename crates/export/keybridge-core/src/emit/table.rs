//! Table-style backend: one `[frame] = { value, Flags = { StepIn = true } },`
//! line per point, spliced by the caller into a table literal it owns.

use super::{Emitter, RemappedPoint};
use crate::numeric::positive_zero;
use crate::time::time_to_frame;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableEmitter {
    /// Seconds per destination frame.
    pub frame_duration: f64,
}

impl TableEmitter {
    pub fn new(frame_duration: f64) -> Self {
        Self { frame_duration }
    }

    /// Format a single entry.
    pub fn line(&self, point: &RemappedPoint) -> String {
        format!(
            "[{}] = {{ {:.10}, Flags = {{ StepIn = true }} }},",
            time_to_frame(point.time, self.frame_duration),
            positive_zero(point.value)
        )
    }
}

impl Emitter for TableEmitter {
    fn emit(&self, points: &[RemappedPoint]) -> String {
        points
            .iter()
            .map(|p| self.line(p))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
