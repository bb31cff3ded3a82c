//! Marker and label geometry for the cursor overlay.
//!
//! The renderer reports its subplot axes (`AxisLayout`); placement here only reads that
//! metadata, so any number of subplots get one marker and one label each.
use serde::{Deserialize, Serialize};
use crate::signals::cursor::{format_readout, CursorState};
use crate::signals::window::EventAnchor;
/// One subplot as laid out by the rendering layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisLayout {
    pub x_axis: String,
    pub y_axis: String,
    pub title: String,
    /// Channel drawn on this subplot, if any.
    pub channel: Option<String>,
    /// Vertical span of the subplot in paper coordinates, `(bottom, top)`.
    pub domain: (f64, f64),
}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubplotLayout {
    pub axes: Vec<AxisLayout>,
}
impl SubplotLayout {
    /// Rows stacked top to bottom with a shared x axis, `vertical_spacing` between rows.
    pub fn stacked<S: AsRef<str>>(channels: &[S], vertical_spacing: f64) -> Self {
        let rows = channels.len();
        if rows == 0 {
            return Self::default();
        }
        let spacing = vertical_spacing.clamp(0.0, 1.0);
        let height = ((1.0 - spacing * (rows - 1) as f64) / rows as f64).max(0.0);
        let axes = channels
            .iter()
            .enumerate()
            .map(|(row, channel)| {
                let top = 1.0 - row as f64 * (height + spacing);
                AxisLayout {
                    x_axis: format!("x{}", row + 1),
                    y_axis: format!("y{}", row + 1),
                    title: channel.as_ref().to_owned(),
                    channel: Some(channel.as_ref().to_owned()),
                    domain: ((top - height).max(0.0), top),
                }
            })
            .collect();
        Self { axes }
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineDash {
    Solid,
    Dot,
}
/// Vertical line at `x`, spanning `[y0, y1]` of the axis' own domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerLine {
    pub x_ref: String,
    /// `"<y axis> domain"`: y is normalised to the subplot, 0 at the bottom, 1 at the top.
    pub y_ref: String,
    pub x: f64,
    pub y0: f64,
    pub y1: f64,
    pub dash: LineDash,
}
impl MarkerLine {
    fn spanning(axis: &AxisLayout, x: f64, dash: LineDash) -> Self {
        Self {
            x_ref: axis.x_axis.clone(),
            y_ref: format!("{} domain", axis.y_axis),
            x,
            y0: 0.0,
            y1: 1.0,
            dash,
        }
    }
}
/// Label badge in paper coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelBadge {
    pub y_axis: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
}
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub label_x: f64,
    /// Distance below the top of the subplot domain.
    pub label_top_offset: f64,
}
impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            label_x: 0.07,
            label_top_offset: 0.04,
        }
    }
}
/// Full cursor overlay for one cursor position. Replaced as a whole on every update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlaySet {
    pub cursor_time: Option<f64>,
    pub markers: Vec<MarkerLine>,
    pub labels: Vec<LabelBadge>,
}
impl OverlaySet {
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.labels.is_empty()
    }
}
pub fn place_overlay(
    cursor: &CursorState,
    axes: &[AxisLayout],
    settings: &OverlaySettings,
) -> OverlaySet {
    let mut markers = Vec::with_capacity(axes.len());
    let mut labels = Vec::with_capacity(axes.len());
    for axis in axes {
        markers.push(MarkerLine::spanning(axis, cursor.time, LineDash::Dot));
        let text = match &axis.channel {
            Some(channel) => format!("{}: {}", axis.title, format_readout(cursor.value(channel))),
            None => axis.title.clone(),
        };
        labels.push(LabelBadge {
            y_axis: axis.y_axis.clone(),
            text,
            x: settings.label_x,
            y: axis.domain.1 - settings.label_top_offset,
        });
    }
    OverlaySet {
        cursor_time: Some(cursor.time),
        markers,
        labels,
    }
}
/// Static solid line marking the event anchor on every subplot.
pub fn event_markers(anchor: EventAnchor, axes: &[AxisLayout]) -> Vec<MarkerLine> {
    axes.iter()
        .map(|axis| MarkerLine::spanning(axis, anchor.time, LineDash::Solid))
        .collect()
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::cursor::resolve_cursor;
    use crate::signals::store::tests::sample_recording;
    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }
    #[test]
    fn stacked_layout_matches_shared_x_rows() {
        let layout = SubplotLayout::stacked(&["port1.dx", "port2.c1"], 0.05);
        assert_eq!(layout.axes.len(), 2);
        let top = &layout.axes[0];
        let bottom = &layout.axes[1];
        assert_eq!(top.y_axis, "y1");
        assert!(close(top.domain.0, 0.525) && close(top.domain.1, 1.0));
        assert!(close(bottom.domain.0, 0.0) && close(bottom.domain.1, 0.475));
    }
    #[test]
    fn one_marker_and_label_per_reported_axis() {
        let rec = sample_recording();
        let axes = vec![
            AxisLayout {
                x_axis: "x7".into(),
                y_axis: "y7".into(),
                title: "dx".into(),
                channel: Some("port1.dx".into()),
                domain: (0.6, 0.9),
            },
            AxisLayout {
                x_axis: "x3".into(),
                y_axis: "y3".into(),
                title: "c1".into(),
                channel: Some("port2.c1".into()),
                domain: (0.1, 0.5),
            },
            AxisLayout {
                x_axis: "x9".into(),
                y_axis: "y9".into(),
                title: "notes".into(),
                channel: None,
                domain: (0.0, 0.05),
            },
        ];
        let cursor = resolve_cursor(&rec, 1.5, ["port1.dx", "port2.c1"]);
        let overlay = place_overlay(&cursor, &axes, &OverlaySettings::default());
        assert_eq!(overlay.markers.len(), 3);
        assert_eq!(overlay.labels.len(), 3);
        assert_eq!(overlay.markers[0].x_ref, "x7");
        assert_eq!(overlay.markers[0].y_ref, "y7 domain");
        assert_eq!((overlay.markers[1].y0, overlay.markers[1].y1), (0.0, 1.0));
        assert!(overlay.markers.iter().all(|m| m.x == 1.5 && m.dash == LineDash::Dot));
        assert!(close(overlay.labels[0].y, 0.86));
        assert!(close(overlay.labels[1].y, 0.46));
        assert_eq!(overlay.labels[0].text, "dx: 20.000");
        assert_eq!(overlay.labels[1].text, "c1: 5.000");
        assert_eq!(overlay.labels[2].text, "notes");
    }
    #[test]
    fn readout_before_first_sample_shows_placeholder() {
        let rec = sample_recording();
        let layout = SubplotLayout::stacked(&["port2.c1"], 0.05);
        let cursor = resolve_cursor(&rec, 0.1, ["port2.c1"]);
        let overlay = place_overlay(&cursor, &layout.axes, &OverlaySettings::default());
        assert_eq!(overlay.labels[0].text, "port2.c1: --");
    }
    #[test]
    fn event_markers_are_solid() {
        let layout = SubplotLayout::stacked(&["a.b", "c.d", "e.f"], 0.05);
        let markers = event_markers(EventAnchor::new(4.0), &layout.axes);
        assert_eq!(markers.len(), 3);
        assert!(markers.iter().all(|m| m.dash == LineDash::Solid && m.x == 4.0));
    }
    #[test]
    fn empty_layout() {
        assert!(SubplotLayout::stacked::<&str>(&[], 0.05).axes.is_empty());
    }
}
