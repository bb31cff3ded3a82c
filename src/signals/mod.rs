// src/signals/mod.rs
pub mod cursor;
pub mod error;
pub mod overlay;
pub mod plot;
pub mod source;
pub mod store;
pub mod time_index;
pub mod window;
pub use cursor::{format_readout, resolve_cursor, CursorEngine, CursorState, DragState, SliderSpec};
pub use error::SignalError;
pub use overlay::{
    event_markers, place_overlay, AxisLayout, LabelBadge, LineDash, MarkerLine, OverlaySet,
    OverlaySettings, SubplotLayout,
};
pub use plot::{render_window_png, PlotStyle};
pub use source::{load_recording, JsonLogReader, LogReader, ManualReader};
pub use store::{Channel, LogNode, LogTree, Recording};
pub use time_index::{index_at_or_before, index_range, value_at_or_before};
pub use window::{extract, EventAnchor, WindowResult, WindowSet, WindowSpec};
