use std::collections::BTreeMap;
use std::ops::Range;
use log::{debug, warn};
use ndarray::{s, Array1};
use serde::{Deserialize, Serialize};
use crate::signals::error::SignalError;
use crate::signals::store::Recording;
use crate::signals::time_index::{index_range, search_left, search_right};
/// Reference timestamp a window is built around.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventAnchor {
    pub time: f64,
}
impl EventAnchor {
    pub fn new(time: f64) -> Self {
        Self { time }
    }
}
/// Look-back / look-forward offsets, `[anchor - before, anchor + after)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSpec {
    pub before: f64,
    pub after: f64,
}
impl WindowSpec {
    pub fn new(before: f64, after: f64) -> Result<Self, SignalError> {
        let spec = Self { before, after };
        spec.validate()?;
        Ok(spec)
    }
    pub fn validate(&self) -> Result<(), SignalError> {
        let ok = |v: f64| v.is_finite() && v >= 0.0;
        if ok(self.before) && ok(self.after) {
            Ok(())
        } else {
            Err(SignalError::InvalidWindow {
                before: self.before,
                after: self.after,
            })
        }
    }
    pub fn bounds(&self, anchor: EventAnchor) -> (f64, f64) {
        (anchor.time - self.before, anchor.time + self.after)
    }
    /// Both offsets zero: the window is the anchor instant itself.
    pub fn is_point(&self) -> bool {
        self.before == 0.0 && self.after == 0.0
    }
}
impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            before: 3.0,
            after: 2.0,
        }
    }
}
/// Samples of one channel that fall inside the window.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowResult {
    /// Half-open range into the channel's full time/value arrays.
    pub indices: Range<usize>,
    pub time: Array1<f64>,
    pub values: Array1<f64>,
}
impl WindowResult {
    pub fn len(&self) -> usize {
        self.indices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
    /// Min and max of the finite values in the slice.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
/// Output of one extraction. Never mutated; a new anchor or spec builds a new set.
#[derive(Debug)]
pub struct WindowSet {
    pub anchor: EventAnchor,
    pub spec: WindowSpec,
    pub start: f64,
    pub end: f64,
    pub channels: BTreeMap<String, Result<WindowResult, SignalError>>,
}
impl WindowSet {
    pub fn get(&self, path: &str) -> Option<&Result<WindowResult, SignalError>> {
        self.channels.get(path)
    }
    pub fn ok_channels(&self) -> impl Iterator<Item = (&str, &WindowResult)> {
        self.channels
            .iter()
            .filter_map(|(path, entry)| entry.as_ref().ok().map(|w| (path.as_str(), w)))
    }
}
/// Slice every requested channel to `[anchor - before, anchor + after)`.
///
/// A point window (`before == after == 0`) keeps the samples stamped exactly at the
/// anchor. Channels fail independently: an unknown path yields an `Err` entry for that
/// path only.
pub fn extract<I, P>(
    recording: &Recording,
    anchor: EventAnchor,
    spec: WindowSpec,
    channel_paths: I,
) -> WindowSet
where
    I: IntoIterator<Item = P>,
    P: AsRef<str>,
{
    let (start, end) = spec.bounds(anchor);
    let mut channels = BTreeMap::new();
    for path in channel_paths {
        let path = path.as_ref();
        let entry = recording.channel(path).map(|channel| {
            let indices = if spec.is_point() {
                search_left(channel.time, anchor.time)..search_right(channel.time, anchor.time)
            } else {
                index_range(channel.time, start, end)
            };
            WindowResult {
                time: channel.time.slice(s![indices.clone()]).to_owned(),
                values: channel.values.slice(s![indices.clone()]).to_owned(),
                indices,
            }
        });
        match &entry {
            Ok(window) => debug!("{path}: {} samples in [{start}, {end})", window.len()),
            Err(err) => warn!("{path}: skipped ({err})"),
        }
        channels.insert(path.to_owned(), entry);
    }
    WindowSet {
        anchor,
        spec,
        start,
        end,
        channels,
    }
}
