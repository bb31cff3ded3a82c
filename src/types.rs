// src/types.rs
use std::sync::Arc;
use crate::signals::{EventAnchor, Recording, WindowSpec};
/// How the host moved the cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CursorInput {
    /// Slider position relative to the event anchor, in seconds.
    Offset(f64),
    /// Absolute recording time; may lie outside the displayed window.
    Absolute(f64),
}
/// Everything the host can tell a session.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// Wholesale swap to another recording.
    LoadRecording(Arc<Recording>),
    SelectAnchor(EventAnchor),
    SetWindowSpec(WindowSpec),
    Cursor(CursorInput),
    /// No cursor input since the last tick.
    Settle,
}
