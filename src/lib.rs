//! Event-window extraction and cursor readout for recorded multi-channel sensor logs.
//!
//! A [`Recording`] is loaded once through a [`LogReader`]; [`extract`] slices the
//! channels around an [`EventAnchor`], and the [`CursorEngine`] resolves step-hold
//! values and overlay geometry for a movable cursor without touching the window again.
pub mod config;
pub mod events;
pub mod session;
pub mod signals;
pub mod types;
pub use config::DashboardConfig;
pub use events::{EventList, EventRecord};
pub use session::Session;
pub use signals::{
    extract, load_recording, resolve_cursor, CursorEngine, CursorState, EventAnchor, LogReader,
    Recording, SignalError, WindowResult, WindowSet, WindowSpec,
};
pub use types::{CursorInput, SessionEvent};
