use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::*;
use crate::signals::error::SignalError;
use crate::signals::overlay::{event_markers, LineDash, MarkerLine, OverlaySet, SubplotLayout};
use crate::signals::window::{WindowResult, WindowSet};
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub palette: Vec<RGBColor>,
    /// Captions, axis labels and label badges. Needs a system font.
    pub show_text: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
            background: WHITE,
            palette: vec![BLUE, RED, GREEN, CYAN, MAGENTA, YELLOW],
            show_text: true,
        }
    }
}
/// Draw the base traces of `window`, the event line and the cursor overlay, one subplot
/// per reported axis, and encode the result as PNG.
pub fn render_window_png(
    window: &WindowSet,
    layout: &SubplotLayout,
    overlay: &OverlaySet,
    style: &PlotStyle,
) -> Result<Vec<u8>, SignalError> {
    if layout.axes.is_empty() {
        return Err(SignalError::Plot("layout has no subplots".into()));
    }
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let (x_lo, x_hi) = x_bounds(window);
        let event_lines = event_markers(window.anchor, &layout.axes);
        for (idx, axis) in layout.axes.iter().enumerate() {
            let (top, height) = domain_pixels(axis.domain, style.height);
            let area = root.clone().shrink((0, top), (style.width as i32, height));
            let slice = axis
                .channel
                .as_deref()
                .and_then(|path| window.get(path))
                .and_then(|entry| entry.as_ref().ok());
            let (y_lo, y_hi) = y_bounds(slice);
            let mut builder = ChartBuilder::on(&area);
            builder
                .margin(5)
                .set_label_area_size(LabelAreaPosition::Left, 45)
                .set_label_area_size(LabelAreaPosition::Bottom, 20);
            if style.show_text {
                builder.caption(&axis.title, ("sans-serif", 14).into_font());
            }
            let mut chart = builder.build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
            if style.show_text {
                chart
                    .configure_mesh()
                    .light_line_style(&BLACK.mix(0.05))
                    .draw()?;
            }
            if let Some(slice) = slice {
                let color = trace_color(style, idx);
                let points: Vec<(f64, f64)> = slice
                    .time
                    .iter()
                    .copied()
                    .zip(slice.values.iter().copied())
                    .filter(|(_, v)| v.is_finite())
                    .collect();
                chart.draw_series(LineSeries::new(points.iter().copied(), &color))?;
                chart.draw_series(
                    points
                        .iter()
                        .map(|&p| Circle::new(p, 2, color.filled())),
                )?;
            }
            let markers = event_lines
                .iter()
                .chain(overlay.markers.iter())
                .filter(|m| m.x_ref == axis.x_axis);
            for marker in markers {
                let (y0, y1) = marker_span(marker, y_lo, y_hi);
                let span = vec![(marker.x, y0), (marker.x, y1)];
                match dash_pattern(marker.dash) {
                    Some((size, spacing)) => {
                        chart.draw_series(DashedLineSeries::new(
                            span,
                            size,
                            spacing,
                            BLACK.stroke_width(2),
                        ))?;
                    }
                    None => {
                        chart.draw_series(LineSeries::new(span, BLACK.stroke_width(1)))?;
                    }
                }
            }
        }
        if style.show_text {
            for label in &overlay.labels {
                draw_badge(&root, &label.text, label.x, label.y, style)?;
            }
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// Palette entry for subplot `idx`; an empty palette falls back to blue.
fn trace_color(style: &PlotStyle, idx: usize) -> RGBColor {
    match style.palette.len() {
        0 => BLUE,
        n => style.palette[idx % n],
    }
}
/// Dash length and gap in pixels, `None` for a solid line.
fn dash_pattern(dash: LineDash) -> Option<(u32, u32)> {
    match dash {
        LineDash::Solid => None,
        LineDash::Dot => Some((2, 4)),
    }
}
fn x_bounds(window: &WindowSet) -> (f64, f64) {
    if window.end - window.start > 1e-9 {
        (window.start, window.end)
    } else {
        (window.start - 0.5, window.end + 0.5)
    }
}
fn y_bounds(slice: Option<&WindowResult>) -> (f64, f64) {
    match slice.and_then(WindowResult::value_bounds) {
        Some((lo, hi)) => {
            // Avoid a zero-height axis.
            let pad = if hi > lo { (hi - lo) * 0.1 } else { 1.0 };
            (lo - pad, hi + pad)
        }
        None => (-1.0, 1.0),
    }
}
/// Pixel offset and height of a `(bottom, top)` paper-coordinate span.
fn domain_pixels(domain: (f64, f64), height: u32) -> (i32, i32) {
    let h = height as f64;
    let top = ((1.0 - domain.1.clamp(0.0, 1.0)) * h).round() as i32;
    let bottom = ((1.0 - domain.0.clamp(0.0, 1.0)) * h).round() as i32;
    (top, (bottom - top).max(1))
}
fn marker_span(marker: &MarkerLine, y_lo: f64, y_hi: f64) -> (f64, f64) {
    let span = y_hi - y_lo;
    (y_lo + marker.y0 * span, y_lo + marker.y1 * span)
}
/// Right-anchored badge at paper coordinates `(x, y)`.
fn draw_badge<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    text: &str,
    x: f64,
    y: f64,
    style: &PlotStyle,
) -> Result<(), SignalError>
where
    DB::ErrorType: 'static,
{
    let right = (x * style.width as f64).round() as i32;
    let top = ((1.0 - y) * style.height as f64).round() as i32;
    // Rough glyph width for a 13px sans font.
    let width = 7 * text.chars().count() as i32 + 6;
    let badge = [(right - width, top), (right, top + 18)];
    root.draw(&Rectangle::new(badge, RGBColor(220, 235, 255).mix(0.5).filled()))?;
    root.draw(&Rectangle::new(badge, RGBColor(80, 120, 200).stroke_width(1)))?;
    root.draw(&Text::new(
        text.to_owned(),
        (right - width + 3, top + 3),
        ("sans-serif", 13).into_font(),
    ))?;
    Ok(())
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, SignalError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| SignalError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
