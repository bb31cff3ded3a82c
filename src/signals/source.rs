use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use log::info;
use serde_json::Value;
use crate::signals::error::SignalError;
use crate::signals::store::{LogTree, Recording};
/// Anything that can turn a log container on disk into a key hierarchy.
pub trait LogReader {
    fn read(&self, path: &Path) -> Result<LogTree, SignalError>;
}
/// Reads nested JSON objects; arrays of numbers become series, objects become groups.
/// `null` entries inside a series are read as NaN.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonLogReader;
impl LogReader for JsonLogReader {
    fn read(&self, path: &Path) -> Result<LogTree, SignalError> {
        let file = File::open(path).map_err(|source| SignalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| SignalError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        tree_from_json(path, &value)
    }
}
pub fn tree_from_json(path: &Path, value: &Value) -> Result<LogTree, SignalError> {
    let parse_err = |reason: String| SignalError::Parse {
        path: path.to_path_buf(),
        reason,
    };
    let Value::Object(root) = value else {
        return Err(parse_err("top level must be an object".into()));
    };
    let mut tree = LogTree::new();
    let mut stack: Vec<(String, &serde_json::Map<String, Value>)> = vec![(String::new(), root)];
    while let Some((prefix, object)) = stack.pop() {
        for (key, node) in object {
            if key.contains('.') {
                return Err(parse_err(format!("key {key:?} contains '.'")));
            }
            let key_path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match node {
                Value::Object(children) => stack.push((key_path, children)),
                Value::Array(items) => {
                    let series = items
                        .iter()
                        .map(|item| match item {
                            Value::Null => Ok(f64::NAN),
                            other => other.as_f64().ok_or_else(|| {
                                parse_err(format!("{key_path}: non-numeric sample"))
                            }),
                        })
                        .collect::<Result<Vec<f64>, _>>()?;
                    tree.insert_series(&key_path, series)?;
                }
                // Scalars carry recording metadata; they are not channels.
                _ => {}
            }
        }
    }
    Ok(tree)
}
/// In-memory reader useful for tests and deterministic playback.
#[derive(Default)]
pub struct ManualReader {
    trees: HashMap<PathBuf, LogTree>,
}
impl ManualReader {
    pub fn new(trees: impl IntoIterator<Item = (PathBuf, LogTree)>) -> Self {
        Self {
            trees: trees.into_iter().collect(),
        }
    }
}
impl LogReader for ManualReader {
    fn read(&self, path: &Path) -> Result<LogTree, SignalError> {
        self.trees.get(path).cloned().ok_or_else(|| SignalError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such recording"),
        })
    }
}
/// Read and validate a recording. This is the only place a recording is materialised.
pub fn load_recording<R: LogReader + ?Sized>(
    reader: &R,
    path: &Path,
) -> Result<Recording, SignalError> {
    let tree = reader.read(path)?;
    let recording = Recording::from_tree(path.display().to_string(), tree)?;
    info!(
        "loaded recording {} ({} channels)",
        recording.label(),
        recording.channel_paths().len()
    );
    Ok(recording)
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    #[test]
    fn json_reader_builds_groups_and_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample-001.json");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"{{"job": 11000,
                "port1": {{"time": [0.0, 1.0, 2.0], "dx": [1, 2, null]}},
                "port2": {{"time": [0.5], "c1": [7.5]}}}}"#
        )
        .unwrap();
        let rec = load_recording(&JsonLogReader, &path).unwrap();
        assert_eq!(rec.channel_paths(), vec!["port1.dx", "port2.c1"]);
        let dx = rec.channel("port1.dx").unwrap();
        assert_eq!(dx.values[1], 2.0);
        assert!(dx.values[2].is_nan());
    }
    #[test]
    fn io_failure_is_distinct_from_missing_channel() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_recording(&JsonLogReader, &dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SignalError::Io { .. }));
        assert!(!err.is_channel_not_found());
    }
    #[test]
    fn rejects_non_numeric_samples() {
        let value: Value = serde_json::json!({"p": {"time": [0.0], "v": ["x"]}});
        let err = tree_from_json(Path::new("inline"), &value).unwrap_err();
        assert!(matches!(err, SignalError::Parse { .. }));
    }
    #[test]
    fn rejects_dotted_keys() {
        let value: Value = serde_json::json!({"p": {"time": [0.0], "v.raw": [1.0]}});
        match tree_from_json(Path::new("inline"), &value) {
            Err(SignalError::Parse { reason, .. }) => assert!(reason.contains("v.raw")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
    #[test]
    fn invalid_data_fails_at_load() {
        let value: Value = serde_json::json!({"p": {"time": [1.0, 0.0], "v": [1.0, 2.0]}});
        let tree = tree_from_json(Path::new("inline"), &value).unwrap();
        let reader = ManualReader::new([(PathBuf::from("bad"), tree)]);
        let err = load_recording(&reader, Path::new("bad")).unwrap_err();
        assert!(matches!(err, SignalError::InvalidChannelData { .. }));
    }
}
