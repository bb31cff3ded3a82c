// src/events.rs
use std::path::{Path, PathBuf};
use csv::{ReaderBuilder, Trim};
use log::info;
use serde::{Deserialize, Serialize};
use crate::signals::{EventAnchor, SignalError};
/// One flagged event: which recording it lives in and its trigger timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_id: String,
    /// Recording name without extension.
    pub file: String,
    pub dat: f64,
}
impl EventRecord {
    pub fn anchor(&self, trigger_offset: f64) -> EventAnchor {
        EventAnchor::new(self.dat + trigger_offset)
    }
}
#[derive(Clone, Debug, Default)]
pub struct EventList {
    base_dir: PathBuf,
    records: Vec<EventRecord>,
}
impl EventList {
    /// Read an `event_id,file,dat` CSV. Recording paths resolve relative to its directory.
    pub fn load(path: &Path) -> Result<Self, SignalError> {
        let parse_err = |reason: String| SignalError::Parse {
            path: path.to_path_buf(),
            reason,
        };
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(path)
            .map_err(|e| match e.into_kind() {
                csv::ErrorKind::Io(source) => SignalError::Io {
                    path: path.to_path_buf(),
                    source,
                },
                other => parse_err(format!("{other:?}")),
            })?;
        let mut records = Vec::new();
        for row in reader.deserialize::<EventRecord>() {
            let record = row.map_err(|e| parse_err(e.to_string()))?;
            records.push(record);
        }
        info!("loaded {} events from {}", records.len(), path.display());
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self { base_dir, records })
    }
    pub fn from_records(base_dir: impl Into<PathBuf>, records: Vec<EventRecord>) -> Self {
        Self {
            base_dir: base_dir.into(),
            records,
        }
    }
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }
    /// The single row for `event_id`.
    pub fn lookup(&self, event_id: &str) -> Result<&EventRecord, SignalError> {
        let mut matches = self.records.iter().filter(|r| r.event_id == event_id);
        let first = matches
            .next()
            .ok_or_else(|| SignalError::EventNotFound(event_id.to_owned()))?;
        let extra = matches.count();
        if extra > 0 {
            return Err(SignalError::AmbiguousEvent {
                event_id: event_id.to_owned(),
                matches: extra + 1,
            });
        }
        Ok(first)
    }
    pub fn recording_path(&self, record: &EventRecord) -> PathBuf {
        self.base_dir.join(format!("{}.json", record.file))
    }
}
