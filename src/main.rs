// src/main.rs
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use signalyzer::signals::{format_readout, JsonLogReader};
use signalyzer::{
    load_recording, CursorInput, DashboardConfig, EventAnchor, EventList, Session, SessionEvent,
};
#[derive(Parser)]
#[command(name = "signalyzer")]
#[command(about = "Inspect recorded sensor channels around a flagged event")]
struct Cli {
    /// Dashboard configuration (JSON). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Event id to look up in the configured event list
    #[arg(long, conflicts_with_all = ["anchor", "recording"])]
    event: Option<String>,
    /// Anchor time in seconds, used together with --recording
    #[arg(long, allow_negative_numbers = true, requires = "recording")]
    anchor: Option<f64>,
    /// Recording file (JSON log container)
    #[arg(long)]
    recording: Option<PathBuf>,
    /// Cursor offset from the anchor in seconds; repeat to simulate slider moves
    #[arg(long = "cursor-offset", allow_negative_numbers = true)]
    cursor_offsets: Vec<f64>,
    /// Absolute cursor time, applied after the offsets
    #[arg(long = "cursor-at", allow_negative_numbers = true)]
    cursor_at: Option<f64>,
    /// Write the rendered chart to this PNG file
    #[arg(long)]
    out: Option<PathBuf>,
}
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    let (recording_path, anchor) = match (&cli.event, &cli.recording, cli.anchor) {
        (Some(event_id), _, _) => {
            let list = EventList::load(&config.event_list_path).with_context(|| {
                format!("loading event list {}", config.event_list_path.display())
            })?;
            let record = list.lookup(event_id)?;
            info!("event {} in {} at dat {:.2}", record.event_id, record.file, record.dat);
            (list.recording_path(record), record.anchor(config.trigger_offset))
        }
        (None, Some(path), Some(time)) => (path.clone(), EventAnchor::new(time)),
        _ => bail!("pass either --event <id> or --recording <path> --anchor <seconds>"),
    };
    let recording = load_recording(&JsonLogReader, &recording_path)
        .with_context(|| format!("loading recording {}", recording_path.display()))?;
    let mut session = Session::new(&config)?;
    session.apply(SessionEvent::LoadRecording(Arc::new(recording)))?;
    session.apply(SessionEvent::SelectAnchor(anchor))?;
    if let Some(window) = session.window() {
        info!("window [{:.2}, {:.2}) around {:.2}", window.start, window.end, anchor.time);
        for (path, entry) in &window.channels {
            match entry {
                Ok(slice) => info!("  {path}: {} samples", slice.len()),
                Err(err) => warn!("  {path}: {err}"),
            }
        }
    }
    let inputs = cli
        .cursor_offsets
        .iter()
        .map(|offset| CursorInput::Offset(*offset))
        .chain(cli.cursor_at.map(CursorInput::Absolute));
    for input in inputs {
        session.apply(SessionEvent::Cursor(input))?;
        if let Some(cursor) = session.cursor() {
            let readouts: Vec<String> = cursor
                .values
                .iter()
                .map(|(path, value)| format!("{path}={}", format_readout(*value)))
                .collect();
            info!("cursor {:.3}: {}", cursor.time, readouts.join(" "));
        }
    }
    session.apply(SessionEvent::Settle)?;
    if let Some(out) = &cli.out {
        let png = session.render(&config.plot.style())?;
        fs::write(out, png).with_context(|| format!("writing {}", out.display()))?;
        info!("chart written to {}", out.display());
    }
    Ok(())
}
