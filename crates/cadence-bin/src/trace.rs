// Trace playback: feed recorded key states through an InputManager.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use cadence_input::{Dispatch, InputManager, RecordingHost, VirtualKeyboardBackend};
use cadence_types::PhysicalKey;
use serde::{Deserialize, Serialize};

/// Key state at one poll of a recorded session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFrame {
    pub time_ms: u64,
    #[serde(default)]
    pub pressed: Vec<PhysicalKey>,
    /// A dialog had input at this poll.
    #[serde(default)]
    pub blocked: bool,
}

/// What happened at one poll during playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Dispatched(Dispatch),
    PluginToggled { time_ms: u64, name: String },
    Skipped { time_ms: u64 },
}

impl std::fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceEvent::Dispatched(d) => {
                write!(f, "{:>8}ms  {:<24} {:?}", d.time_ms, d.action.to_string(), d.trigger)
            }
            TraceEvent::PluginToggled { time_ms, name } => {
                write!(f, "{:>8}ms  plugin {:?} toggled", time_ms, name)
            }
            TraceEvent::Skipped { time_ms } => write!(f, "{:>8}ms  (input blocked)", time_ms),
        }
    }
}

pub fn load_trace(path: &Path) -> Result<Vec<TraceFrame>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read trace: {}", path.display()))?;
    let frames: Vec<TraceFrame> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse trace: {}", path.display()))?;
    Ok(frames)
}

/// Play `frames` in order. Timestamps must not go backwards.
pub fn run_trace(
    manager: &mut InputManager<RecordingHost>,
    host: &mut RecordingHost,
    frames: &[TraceFrame],
) -> Result<Vec<TraceEvent>> {
    let mut keyboard = VirtualKeyboardBackend::new();
    let mut events = Vec::new();
    let mut last_time = None;

    for frame in frames {
        if let Some(last) = last_time
            && frame.time_ms < last
        {
            bail!(
                "trace time went backwards: {}ms after {}ms",
                frame.time_ms,
                last
            );
        }
        last_time = Some(frame.time_ms);

        keyboard.set_pressed(frame.pressed.iter().copied());
        host.dialog_open = frame.blocked;

        let report = manager
            .poll(frame.time_ms, &keyboard, host)
            .with_context(|| format!("Poll failed at {}ms", frame.time_ms))?;

        if report.skipped {
            events.push(TraceEvent::Skipped {
                time_ms: frame.time_ms,
            });
            continue;
        }
        events.extend(report.dispatches.into_iter().map(TraceEvent::Dispatched));
        events.extend(
            report
                .toggled_plugins
                .into_iter()
                .map(|name| TraceEvent::PluginToggled {
                    time_ms: frame.time_ms,
                    name,
                }),
        );
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_input::{KeybindConfig, Trigger};
    use cadence_types::Action;
    use tempfile::tempdir;

    fn frame(time_ms: u64, pressed: &[PhysicalKey]) -> TraceFrame {
        TraceFrame {
            time_ms,
            pressed: pressed.to_vec(),
            blocked: false,
        }
    }

    #[test]
    fn parses_trace_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trace.json");
        fs::write(
            &path,
            r#"[
                { "time_ms": 0, "pressed": ["Ctrl", "Z"] },
                { "time_ms": 16, "blocked": true },
                { "time_ms": 32 }
            ]"#,
        )
        .unwrap();

        let frames = load_trace(&path).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].pressed, vec![PhysicalKey::Ctrl, PhysicalKey::Z]);
        assert!(frames[1].blocked);
        assert!(frames[2].pressed.is_empty());
    }

    #[test]
    fn bad_key_in_trace_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trace.json");
        fs::write(&path, r#"[{ "time_ms": 0, "pressed": ["Hyper"] }]"#).unwrap();
        assert!(load_trace(&path).is_err());
    }

    #[test]
    fn plays_hold_and_tap() {
        let mut manager = InputManager::from_config(&KeybindConfig::default()).unwrap();
        let mut host = RecordingHost::new();
        let mut frames: Vec<TraceFrame> = (0..=300)
            .step_by(25)
            .map(|t| frame(t, &[PhysicalKey::Up]))
            .collect();
        frames.push(frame(325, &[]));
        frames.push(frame(350, &[PhysicalKey::Space]));

        let events = run_trace(&mut manager, &mut host, &frames).unwrap();
        let dispatched: Vec<(u64, Action, Trigger)> = events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Dispatched(d) => Some((d.time_ms, d.action, d.trigger)),
                _ => None,
            })
            .collect();

        assert_eq!(
            dispatched,
            vec![
                (0, Action::SeekForwards, Trigger::Press),
                (250, Action::SeekForwards, Trigger::Repeat),
                (275, Action::SeekForwards, Trigger::Repeat),
                (300, Action::SeekForwards, Trigger::Repeat),
                (350, Action::PlayPause, Trigger::Press),
            ]
        );
        assert_eq!(host.calls.len(), 5);
    }

    #[test]
    fn blocked_frames_are_reported() {
        let mut manager = InputManager::from_config(&KeybindConfig::default()).unwrap();
        let mut host = RecordingHost::new();
        let frames = vec![TraceFrame {
            time_ms: 0,
            pressed: vec![PhysicalKey::Escape],
            blocked: true,
        }];

        let events = run_trace(&mut manager, &mut host, &frames).unwrap();
        assert_eq!(events, vec![TraceEvent::Skipped { time_ms: 0 }]);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn time_going_backwards_is_an_error() {
        let mut manager = InputManager::from_config(&KeybindConfig::default()).unwrap();
        let mut host = RecordingHost::new();
        let frames = vec![frame(100, &[]), frame(50, &[])];
        let err = run_trace(&mut manager, &mut host, &frames).unwrap_err();
        assert!(err.to_string().contains("backwards"));
    }

    #[test]
    fn event_lines_are_readable() {
        let line = TraceEvent::PluginToggled {
            time_ms: 42,
            name: "Snap".to_string(),
        }
        .to_string();
        assert!(line.contains("42ms"));
        assert!(line.contains("\"Snap\""));
    }
}
