use std::collections::BTreeMap;
use log::debug;
use ndarray::{Array1, ArrayView1};
use crate::signals::error::SignalError;
use crate::signals::time_index::first_unsorted;
/// Name of the series that carries the time base of its group.
pub const TIME_KEY: &str = "time";
/// One node of a structured log container.
#[derive(Clone, Debug)]
pub enum LogNode {
    Group(BTreeMap<String, LogNode>),
    Series(Array1<f64>),
}
/// Nested key hierarchy as handed over by a log reader.
#[derive(Clone, Debug, Default)]
pub struct LogTree {
    root: BTreeMap<String, LogNode>,
}
impl LogTree {
    pub fn new() -> Self {
        Self::default()
    }
    /// Insert a series at a dotted path, creating intermediate groups.
    pub fn insert_series(
        &mut self,
        path: &str,
        data: impl Into<Array1<f64>>,
    ) -> Result<(), SignalError> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(SignalError::InvalidChannelData {
                path: path.to_owned(),
                reason: "empty path segment".into(),
            });
        }
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(SignalError::InvalidChannelData {
                path: path.to_owned(),
                reason: "empty path".into(),
            });
        };
        let mut group = &mut self.root;
        for segment in parents {
            let node = group
                .entry((*segment).to_owned())
                .or_insert_with(|| LogNode::Group(BTreeMap::new()));
            group = match node {
                LogNode::Group(children) => children,
                LogNode::Series(_) => {
                    return Err(SignalError::InvalidChannelData {
                        path: path.to_owned(),
                        reason: format!("segment '{segment}' is a series, not a group"),
                    })
                }
            };
        }
        if let Some(LogNode::Group(_)) = group.get(*leaf) {
            return Err(SignalError::InvalidChannelData {
                path: path.to_owned(),
                reason: "path already holds a group".into(),
            });
        }
        group.insert((*leaf).to_owned(), LogNode::Series(data.into()));
        Ok(())
    }
    /// Walk a dotted path down to a series.
    pub fn resolve(&self, path: &str) -> Result<ArrayView1<'_, f64>, SignalError> {
        let not_found = || SignalError::ChannelNotFound {
            path: path.to_owned(),
        };
        let mut segments = path.split('.').peekable();
        let mut group = &self.root;
        while let Some(segment) = segments.next() {
            let node = group.get(segment).ok_or_else(not_found)?;
            match (node, segments.peek().is_some()) {
                (LogNode::Group(children), true) => group = children,
                (LogNode::Series(data), false) => return Ok(data.view()),
                _ => return Err(not_found()),
            }
        }
        Err(not_found())
    }
    fn group(&self, prefix: &[&str]) -> Option<&BTreeMap<String, LogNode>> {
        let mut group = &self.root;
        for segment in prefix {
            match group.get(*segment)? {
                LogNode::Group(children) => group = children,
                LogNode::Series(_) => return None,
            }
        }
        Some(group)
    }
    /// Every group in the tree with its dotted prefix ("" for the root).
    fn groups(&self) -> Vec<(String, &BTreeMap<String, LogNode>)> {
        let mut out = Vec::new();
        let mut stack = vec![(String::new(), &self.root)];
        while let Some((prefix, group)) = stack.pop() {
            for (key, node) in group {
                if let LogNode::Group(children) = node {
                    stack.push((join_path(&prefix, key), children));
                }
            }
            out.push((prefix, group));
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}
/// Borrowed view of one channel: its values and the time base of its group.
#[derive(Clone, Copy, Debug)]
pub struct Channel<'a> {
    pub name: &'a str,
    pub time: ArrayView1<'a, f64>,
    pub values: ArrayView1<'a, f64>,
}
impl<'a> Channel<'a> {
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
/// A validated recording. Immutable once built; a new selection builds a new one.
#[derive(Clone, Debug)]
pub struct Recording {
    label: String,
    tree: LogTree,
}
impl Recording {
    /// Validate every time base and its sibling series up front so later lookups can
    /// assume sorted, length-matched data.
    pub fn from_tree(label: impl Into<String>, tree: LogTree) -> Result<Self, SignalError> {
        for (prefix, group) in tree.groups() {
            let Some(LogNode::Series(time)) = group.get(TIME_KEY) else {
                continue;
            };
            let time_path = join_path(&prefix, TIME_KEY);
            if let Some(idx) = first_unsorted(time.view()) {
                return Err(SignalError::InvalidChannelData {
                    path: time_path,
                    reason: format!("time is NaN or decreasing at index {idx}"),
                });
            }
            for (key, node) in group {
                if let LogNode::Series(values) = node {
                    if values.len() != time.len() {
                        return Err(SignalError::InvalidChannelData {
                            path: join_path(&prefix, key),
                            reason: format!(
                                "length {} does not match time length {}",
                                values.len(),
                                time.len()
                            ),
                        });
                    }
                }
            }
            debug!("validated group '{}' ({} samples)", prefix, time.len());
        }
        Ok(Self {
            label: label.into(),
            tree,
        })
    }
    pub fn label(&self) -> &str {
        &self.label
    }
    /// Resolve `"group.name"` to the `group.name` values paired with `group.time`.
    pub fn channel<'a>(&'a self, path: &'a str) -> Result<Channel<'a>, SignalError> {
        let values = self.tree.resolve(path)?;
        let parent: Vec<&str> = match path.rsplit_once('.') {
            Some((parent, _)) => parent.split('.').collect(),
            None => Vec::new(),
        };
        let time = match self.tree.group(&parent).and_then(|g| g.get(TIME_KEY)) {
            Some(LogNode::Series(time)) => time.view(),
            _ => {
                return Err(SignalError::ChannelNotFound {
                    path: join_path(&parent.join("."), TIME_KEY),
                })
            }
        };
        Ok(Channel {
            name: path,
            time,
            values,
        })
    }
    /// All value channels that have a time base, sorted by path.
    pub fn channel_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for (prefix, group) in self.tree.groups() {
            if !matches!(group.get(TIME_KEY), Some(LogNode::Series(_))) {
                continue;
            }
            for (key, node) in group {
                if key != TIME_KEY && matches!(node, LogNode::Series(_)) {
                    paths.push(join_path(&prefix, key));
                }
            }
        }
        paths.sort();
        paths
    }
}
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    pub(crate) fn sample_recording() -> Recording {
        let mut tree = LogTree::new();
        tree.insert_series("port1.time", vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        tree.insert_series("port1.dx", vec![10.0, 20.0, 30.0, 40.0]).unwrap();
        tree.insert_series("port1.dy", vec![-1.0, -2.0, -3.0, -4.0]).unwrap();
        tree.insert_series("port2.time", vec![0.5, 2.5, 4.5, 6.5, 7.0]).unwrap();
        tree.insert_series("port2.c0", vec![0.0, 0.0, 1.0, 1.0, 0.0]).unwrap();
        tree.insert_series("port2.c1", vec![5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
        Recording::from_tree("sample", tree).unwrap()
    }
    #[test]
    fn resolves_channel_with_group_time_base() {
        let rec = sample_recording();
        let ch = rec.channel("port2.c1").unwrap();
        assert_eq!(ch.name, "port2.c1");
        assert_eq!(ch.len(), 5);
        assert_eq!(ch.time[1], 2.5);
        assert_eq!(ch.values[1], 6.0);
    }
    #[test]
    fn missing_segments_are_channel_not_found() {
        let rec = sample_recording();
        for path in ["port3.dx", "port1.dz", "port1", "port1.dx.extra", ""] {
            let err = rec.channel(path).unwrap_err();
            assert!(err.is_channel_not_found(), "{path}: {err}");
        }
    }
    #[test]
    fn missing_time_base_is_reported_with_its_path() {
        let mut tree = LogTree::new();
        tree.insert_series("imu.ax", vec![1.0, 2.0]).unwrap();
        let rec = Recording::from_tree("no-time", tree).unwrap();
        match rec.channel("imu.ax") {
            Err(SignalError::ChannelNotFound { path }) => assert_eq!(path, "imu.time"),
            other => panic!("unexpected {other:?}"),
        }
    }
    #[test]
    fn nested_groups_use_parent_time() {
        let mut tree = LogTree::new();
        tree.insert_series("a.b.time", vec![0.0, 1.0]).unwrap();
        tree.insert_series("a.b.c", vec![3.0, 4.0]).unwrap();
        let rec = Recording::from_tree("nested", tree).unwrap();
        let ch = rec.channel("a.b.c").unwrap();
        assert_eq!(ch.time.to_vec(), vec![0.0, 1.0]);
        assert_eq!(rec.channel_paths(), vec!["a.b.c".to_owned()]);
    }
    #[test]
    fn rejects_unsorted_time() {
        let mut tree = LogTree::new();
        tree.insert_series("p.time", vec![0.0, 2.0, 1.0]).unwrap();
        tree.insert_series("p.v", vec![0.0, 0.0, 0.0]).unwrap();
        match Recording::from_tree("bad", tree) {
            Err(SignalError::InvalidChannelData { path, .. }) => assert_eq!(path, "p.time"),
            other => panic!("unexpected {other:?}"),
        }
    }
    #[test]
    fn rejects_length_mismatch() {
        let mut tree = LogTree::new();
        tree.insert_series("p.time", vec![0.0, 1.0, 2.0]).unwrap();
        tree.insert_series("p.v", vec![0.0, 0.0]).unwrap();
        match Recording::from_tree("bad", tree) {
            Err(SignalError::InvalidChannelData { path, .. }) => assert_eq!(path, "p.v"),
            other => panic!("unexpected {other:?}"),
        }
    }
    #[test]
    fn insert_rejects_conflicting_shapes() {
        let mut tree = LogTree::new();
        tree.insert_series("p.v", vec![0.0]).unwrap();
        assert!(tree.insert_series("p.v.w", vec![0.0]).is_err());
        assert!(tree.insert_series("p", vec![0.0]).is_err());
        assert!(tree.insert_series("p..v", vec![0.0]).is_err());
    }
    #[test]
    fn lists_value_channels() {
        let rec = sample_recording();
        assert_eq!(
            rec.channel_paths(),
            vec!["port1.dx", "port1.dy", "port2.c0", "port2.c1"]
        );
    }
}
