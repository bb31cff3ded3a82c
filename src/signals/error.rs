use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum SignalError {
    /// A path segment does not resolve in the recording.
    #[error("channel not found: {path}")]
    ChannelNotFound { path: String },
    #[error("invalid channel data at {path}: {reason}")]
    InvalidChannelData { path: String, reason: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("window offsets must be finite and non-negative (before {before}, after {after})")]
    InvalidWindow { before: f64, after: f64 },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("no recording loaded")]
    NoRecording,
    #[error("no event anchor selected")]
    NoAnchor,
    #[error("event not found: {0}")]
    EventNotFound(String),
    #[error("event {event_id} matches {matches} rows, expected exactly one")]
    AmbiguousEvent { event_id: String, matches: usize },
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl SignalError {
    pub fn is_channel_not_found(&self) -> bool {
        matches!(self, SignalError::ChannelNotFound { .. })
    }
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for SignalError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        SignalError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for SignalError {
    fn from(value: image::ImageError) -> Self {
        SignalError::Plot(value.to_string())
    }
}
