// src/session.rs
//! Host-side state for one loaded recording: the extracted window and the cursor.
//!
//! `Session::apply` is the single entry point; each event touches only the state it owns.
//! Anchor and window changes rebuild the window, cursor input only re-runs the cursor
//! engine against the full recording.
use std::collections::VecDeque;
use std::sync::Arc;
use log::{debug, info};
use crate::config::DashboardConfig;
use crate::signals::{
    extract, render_window_png, CursorEngine, CursorState, DragState, EventAnchor, OverlaySet,
    PlotStyle, Recording, SignalError, SliderSpec, SubplotLayout, WindowSet, WindowSpec,
};
use crate::types::{CursorInput, SessionEvent};
/// Windows kept per recording; the oldest is evicted first.
const WINDOW_CACHE_LIMIT: usize = 8;
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct WindowKey {
    recording: usize,
    anchor: u64,
    before: u64,
    after: u64,
}
impl WindowKey {
    fn new(recording: &Arc<Recording>, anchor: EventAnchor, spec: WindowSpec) -> Self {
        Self {
            recording: Arc::as_ptr(recording) as usize,
            anchor: anchor.time.to_bits(),
            before: spec.before.to_bits(),
            after: spec.after.to_bits(),
        }
    }
}
pub struct Session {
    channels: Vec<String>,
    layout: SubplotLayout,
    spec: WindowSpec,
    slider_step: f64,
    recording: Option<Arc<Recording>>,
    anchor: Option<EventAnchor>,
    window: Option<Arc<WindowSet>>,
    window_cache: VecDeque<(WindowKey, Arc<WindowSet>)>,
    engine: CursorEngine,
}
impl Session {
    /// Fails when `config` does not validate.
    pub fn new(config: &DashboardConfig) -> Result<Self, SignalError> {
        config.validate()?;
        Ok(Self {
            channels: config.channels.clone(),
            layout: SubplotLayout::stacked(&config.channels, config.vertical_spacing),
            spec: config.window,
            slider_step: config.slider_step,
            recording: None,
            anchor: None,
            window: None,
            window_cache: VecDeque::new(),
            engine: CursorEngine::new(config.overlay),
        })
    }
    pub fn apply(&mut self, event: SessionEvent) -> Result<(), SignalError> {
        match event {
            SessionEvent::LoadRecording(recording) => {
                info!("switching to recording {}", recording.label());
                // Nothing computed against the previous recording survives the swap.
                self.window_cache.clear();
                self.window = None;
                self.anchor = None;
                self.engine.reset();
                self.recording = Some(recording);
            }
            SessionEvent::SelectAnchor(anchor) => {
                self.require_recording()?;
                self.anchor = Some(anchor);
                self.rebuild_window()?;
            }
            SessionEvent::SetWindowSpec(spec) => {
                spec.validate()?;
                self.spec = spec;
                if self.anchor.is_some() {
                    self.rebuild_window()?;
                }
            }
            SessionEvent::Cursor(input) => {
                let recording = Arc::clone(self.require_recording()?);
                let time = match input {
                    CursorInput::Offset(offset) => {
                        let anchor = self.anchor.ok_or(SignalError::NoAnchor)?;
                        anchor.time + self.slider().snap(offset)
                    }
                    CursorInput::Absolute(time) => time,
                };
                self.engine
                    .tick(&recording, time, &self.channels, &self.layout.axes);
            }
            SessionEvent::Settle => self.engine.settle(),
        }
        Ok(())
    }
    fn require_recording(&self) -> Result<&Arc<Recording>, SignalError> {
        self.recording.as_ref().ok_or(SignalError::NoRecording)
    }
    /// Swap in the window for the current anchor and spec; the old overlay is dropped.
    fn rebuild_window(&mut self) -> Result<(), SignalError> {
        let recording = Arc::clone(self.require_recording()?);
        let anchor = self.anchor.ok_or(SignalError::NoAnchor)?;
        let key = WindowKey::new(&recording, anchor, self.spec);
        let cached = self
            .window_cache
            .iter()
            .position(|(k, _)| *k == key)
            .and_then(|idx| self.window_cache.remove(idx));
        let window = match cached {
            Some((_, window)) => {
                debug!("window cache hit at anchor {}", anchor.time);
                window
            }
            None => Arc::new(extract(&recording, anchor, self.spec, &self.channels)),
        };
        if self.window_cache.len() == WINDOW_CACHE_LIMIT {
            self.window_cache.pop_front();
        }
        self.window_cache.push_back((key, Arc::clone(&window)));
        self.window = Some(window);
        self.engine.reset();
        Ok(())
    }
    pub fn recording(&self) -> Option<&Arc<Recording>> {
        self.recording.as_ref()
    }
    pub fn anchor(&self) -> Option<EventAnchor> {
        self.anchor
    }
    pub fn spec(&self) -> WindowSpec {
        self.spec
    }
    pub fn window(&self) -> Option<&Arc<WindowSet>> {
        self.window.as_ref()
    }
    pub fn cursor(&self) -> Option<&CursorState> {
        self.engine.cursor()
    }
    pub fn overlay(&self) -> &OverlaySet {
        self.engine.overlay()
    }
    pub fn drag_state(&self) -> DragState {
        self.engine.state()
    }
    pub fn layout(&self) -> &SubplotLayout {
        &self.layout
    }
    pub fn slider(&self) -> SliderSpec {
        SliderSpec::from_window(self.spec, self.slider_step)
    }
    pub fn render(&self, style: &PlotStyle) -> Result<Vec<u8>, SignalError> {
        let window = self.window.as_ref().ok_or(SignalError::NoAnchor)?;
        render_window_png(window, &self.layout, self.engine.overlay(), style)
    }
}
