use std::collections::BTreeMap;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::signals::overlay::{place_overlay, AxisLayout, OverlaySet, OverlaySettings};
use crate::signals::store::Recording;
use crate::signals::time_index::value_at_or_before;
use crate::signals::window::WindowSpec;
/// Instantaneous readout of every requested channel at `time`.
#[derive(Clone, Debug, Default)]
pub struct CursorState {
    pub time: f64,
    /// Step-hold values; NaN before a channel's first sample or when the channel is missing.
    pub values: BTreeMap<String, f64>,
    /// Requested paths that did not resolve in the recording.
    pub missing: Vec<String>,
}
impl CursorState {
    pub fn value(&self, path: &str) -> f64 {
        self.values.get(path).copied().unwrap_or(f64::NAN)
    }
}
/// Resolve the last value at or before `cursor_time` on each channel's full series.
///
/// Reads the recording directly, never a previously extracted window, so the cursor may
/// sit anywhere in the recording. O(log n) per channel.
pub fn resolve_cursor<I, P>(
    recording: &Recording,
    cursor_time: f64,
    channel_paths: I,
) -> CursorState
where
    I: IntoIterator<Item = P>,
    P: AsRef<str>,
{
    let mut values = BTreeMap::new();
    let mut missing = Vec::new();
    for path in channel_paths {
        let path = path.as_ref();
        let value = match recording.channel(path) {
            Ok(channel) => value_at_or_before(channel.time, channel.values, cursor_time),
            Err(_) => {
                missing.push(path.to_owned());
                f64::NAN
            }
        };
        values.insert(path.to_owned(), value);
    }
    CursorState {
        time: cursor_time,
        values,
        missing,
    }
}
/// Three decimals, or `--` when there is no value yet.
pub fn format_readout(value: f64) -> String {
    if value.is_nan() {
        "--".to_owned()
    } else {
        format!("{value:.3}")
    }
}
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        ticks: u64,
    },
}
/// Keeps the latest cursor readout and overlay while the user drags the cursor control.
#[derive(Debug, Default)]
pub struct CursorEngine {
    state: DragState,
    cursor: Option<CursorState>,
    overlay: OverlaySet,
    settings: OverlaySettings,
}
impl CursorEngine {
    pub fn new(settings: OverlaySettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }
    pub fn state(&self) -> DragState {
        self.state
    }
    pub fn cursor(&self) -> Option<&CursorState> {
        self.cursor.as_ref()
    }
    pub fn overlay(&self) -> &OverlaySet {
        &self.overlay
    }
    /// One interaction step: resolve values at `cursor_time` and swap in a fresh overlay.
    pub fn tick<I, P>(
        &mut self,
        recording: &Recording,
        cursor_time: f64,
        channel_paths: I,
        axes: &[AxisLayout],
    ) -> &CursorState
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        self.state = match self.state {
            DragState::Idle => DragState::Dragging { ticks: 1 },
            DragState::Dragging { ticks } => DragState::Dragging { ticks: ticks + 1 },
        };
        let cursor = resolve_cursor(recording, cursor_time, channel_paths);
        self.overlay = place_overlay(&cursor, axes, &self.settings);
        debug!(
            "cursor at {cursor_time}: {} channels, {} missing",
            cursor.values.len(),
            cursor.missing.len()
        );
        self.cursor.insert(cursor)
    }
    /// Input went quiet; the last readout and overlay stay in place.
    pub fn settle(&mut self) {
        self.state = DragState::Idle;
    }
    /// Forget everything drawn for the previous window or recording.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
        self.cursor = None;
        self.overlay = OverlaySet::default();
    }
}
/// Slider that moves the cursor relative to the event anchor, over `[-before, after]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliderSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}
impl SliderSpec {
    pub fn from_window(spec: WindowSpec, step: f64) -> Self {
        Self {
            min: -spec.before,
            max: spec.after,
            step,
        }
    }
    /// Clamp into range and round to the nearest step counted from `min`.
    ///
    /// A degenerate range (`min > max` or a NaN bound) never panics: `max` wins.
    pub fn snap(&self, offset: f64) -> f64 {
        let clamped = self.bound(offset);
        if self.step.is_nan() || self.step <= 0.0 || !clamped.is_finite() {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        self.bound(self.min + steps * self.step)
    }
    fn bound(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
    /// Whole-second tick marks inside the range.
    pub fn marks(&self) -> Vec<(i64, String)> {
        let lo = self.min.ceil() as i64;
        let hi = self.max.floor() as i64;
        (lo..=hi).map(|s| (s, format!("{:+.1}", s as f64))).collect()
    }
}
