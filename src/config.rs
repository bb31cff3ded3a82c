// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::signals::{OverlaySettings, PlotStyle, SignalError, SliderSpec, WindowSpec};
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub width: u32,
    pub height: u32,
    pub show_text: bool,
}
impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
            show_text: true,
        }
    }
}
impl PlotSettings {
    pub fn style(&self) -> PlotStyle {
        PlotStyle {
            width: self.width,
            height: self.height,
            show_text: self.show_text,
            ..PlotStyle::default()
        }
    }
}
/// Dashboard settings. Every field falls back to its default when absent from the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub event_list_path: PathBuf,
    /// Added to an event's `dat` to get the anchor time.
    pub trigger_offset: f64,
    pub window: WindowSpec,
    /// Channels shown as stacked subplots, top first.
    pub channels: Vec<String>,
    pub slider_step: f64,
    pub vertical_spacing: f64,
    pub overlay: OverlaySettings,
    pub plot: PlotSettings,
}
impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            event_list_path: PathBuf::from("./event-list.csv"),
            trigger_offset: 0.8,
            window: WindowSpec::default(),
            channels: vec!["port1.dx".to_owned(), "port2.c1".to_owned()],
            slider_step: 0.05,
            vertical_spacing: 0.05,
            overlay: OverlaySettings::default(),
            plot: PlotSettings::default(),
        }
    }
}
impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self, SignalError> {
        let text = fs::read_to_string(path).map_err(|source| SignalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| SignalError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> Result<(), SignalError> {
        self.window.validate()?;
        if !self.trigger_offset.is_finite() {
            return Err(SignalError::Config("trigger_offset must be finite".into()));
        }
        if !(self.slider_step.is_finite() && self.slider_step > 0.0) {
            return Err(SignalError::Config(format!(
                "slider_step must be positive, got {}",
                self.slider_step
            )));
        }
        if !(0.0..1.0).contains(&self.vertical_spacing) {
            return Err(SignalError::Config(format!(
                "vertical_spacing must be in [0, 1), got {}",
                self.vertical_spacing
            )));
        }
        if self.channels.is_empty() {
            return Err(SignalError::Config("at least one channel is required".into()));
        }
        if self.plot.width == 0 || self.plot.height == 0 {
            return Err(SignalError::Config("plot size must be non-zero".into()));
        }
        Ok(())
    }
    pub fn slider(&self) -> SliderSpec {
        SliderSpec::from_window(self.window, self.slider_step)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn defaults_match_dashboard() {
        let config = DashboardConfig::default();
        assert_eq!(config.window, WindowSpec::new(3.0, 2.0).unwrap());
        assert_eq!(config.trigger_offset, 0.8);
        assert_eq!(config.channels, vec!["port1.dx", "port2.c1"]);
        config.validate().unwrap();
        assert_eq!(config.slider().min, -3.0);
    }
    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, r#"{"window": {"before": 1.5, "after": 0.5}, "plot": {"width": 400}}"#)
            .unwrap();
        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.window, WindowSpec::new(1.5, 0.5).unwrap());
        assert_eq!(config.plot.width, 400);
        assert_eq!(config.plot.height, 600);
        assert_eq!(config.slider_step, 0.05);
    }
    #[test]
    fn window_offsets_default_independently() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"window": {"before": 1.5}}"#).unwrap();
        assert_eq!(config.window, WindowSpec::new(1.5, 2.0).unwrap());
        let config: DashboardConfig = serde_json::from_str(r#"{"window": {}}"#).unwrap();
        assert_eq!(config.window, WindowSpec::default());
    }
    #[test]
    fn rejects_bad_values() {
        let mut config = DashboardConfig::default();
        config.window.before = -1.0;
        assert!(matches!(config.validate(), Err(SignalError::InvalidWindow { .. })));
        let mut config = DashboardConfig::default();
        config.slider_step = 0.0;
        assert!(matches!(config.validate(), Err(SignalError::Config(_))));
        let mut config = DashboardConfig::default();
        config.vertical_spacing = 1.0;
        assert!(config.validate().is_err());
    }
    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            DashboardConfig::load(&path),
            Err(SignalError::Parse { .. })
        ));
    }
}
