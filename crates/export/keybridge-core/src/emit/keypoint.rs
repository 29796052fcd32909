//! Keypoint-block backend.
//!
//! ```text
//! <keypoint>
//!     <time>158720 153600 1 0</time>
//!     <value>0.5</value>
//!     <inputTangentTime>..</inputTangentTime>
//!     <inputTangentValue>..</inputTangentValue>
//!     <outputTangentTime>..</outputTangentTime>
//!     <outputTangentValue>..</outputTangentValue>
//! </keypoint>
//! ```
//!
//! Time is written as ticks of a fixed timebase, snapped to whole destination
//! frames. Tangents are absolute: handle x scales by the seconds to the
//! neighbouring point, handle y by the value change to it. Incoming tangents
//! point backwards and are therefore negative for rising curves.

use std::fmt::Write as _;

use super::{Emitter, RemappedPoint};
use crate::config::KEYPOINT_TIMEBASE;
use crate::numeric::positive_zero;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeypointEmitter {
    /// Seconds per destination frame.
    pub frame_duration: f64,
    /// Ticks per second.
    pub timebase: u64,
    /// Ease-high percentage (0..1) scaling every tangent, when the kind has one.
    pub ease_high: Option<f64>,
}

impl KeypointEmitter {
    pub fn new(frame_duration: f64) -> Self {
        Self {
            frame_duration,
            timebase: KEYPOINT_TIMEBASE,
            ease_high: None,
        }
    }

    pub fn with_timebase(mut self, timebase: u64) -> Self {
        self.timebase = timebase;
        self
    }

    pub fn with_ease_high(mut self, ease_high: Option<f64>) -> Self {
        self.ease_high = ease_high;
        self
    }

    /// Tick count for `time`, snapped to the nearest destination frame.
    pub fn ticks(&self, time: f64) -> i64 {
        let frame = (time / self.frame_duration).round();
        (frame * self.frame_duration * self.timebase as f64).round() as i64
    }

    #[inline]
    fn attenuation(&self) -> f64 {
        match self.ease_high {
            Some(high) => 1.0 - high,
            None => 1.0,
        }
    }

    /// `(inputTangentTime, inputTangentValue)` for `points[i]`.
    fn input_tangent(&self, points: &[RemappedPoint], i: usize) -> Option<(f64, f64)> {
        let handle = points[i].tangent_in?;
        let prev = points.get(i.checked_sub(1)?)?;
        let cur = &points[i];
        let k = self.attenuation();
        Some((
            positive_zero(-(1.0 - handle.x) * (cur.time - prev.time) * k),
            positive_zero(-(1.0 - handle.y) * (cur.value - prev.value) * k),
        ))
    }

    /// `(outputTangentTime, outputTangentValue)` for `points[i]`.
    fn output_tangent(&self, points: &[RemappedPoint], i: usize) -> Option<(f64, f64)> {
        let handle = points[i].tangent_out?;
        let next = points.get(i + 1)?;
        let cur = &points[i];
        let k = self.attenuation();
        Some((
            positive_zero(handle.x * (next.time - cur.time) * k),
            positive_zero(handle.y * (next.value - cur.value) * k),
        ))
    }

    /// Format the block for `points[i]`.
    pub fn block(&self, points: &[RemappedPoint], i: usize) -> String {
        let point = &points[i];
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "<keypoint>");
        let _ = writeln!(
            out,
            "\t<time>{} {} 1 0</time>",
            self.ticks(point.time),
            self.timebase
        );
        let _ = writeln!(out, "\t<value>{}</value>", positive_zero(point.value));
        if let Some((t, v)) = self.input_tangent(points, i) {
            let _ = writeln!(out, "\t<inputTangentTime>{t}</inputTangentTime>");
            let _ = writeln!(out, "\t<inputTangentValue>{v}</inputTangentValue>");
        }
        if let Some((t, v)) = self.output_tangent(points, i) {
            let _ = writeln!(out, "\t<outputTangentTime>{t}</outputTangentTime>");
            let _ = writeln!(out, "\t<outputTangentValue>{v}</outputTangentValue>");
        }
        out.push_str("</keypoint>");
        out
    }
}

impl Emitter for KeypointEmitter {
    fn emit(&self, points: &[RemappedPoint]) -> String {
        (0..points.len())
            .map(|i| self.block(points, i))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
