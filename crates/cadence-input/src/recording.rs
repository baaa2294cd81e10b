use anyhow::{Result, anyhow};
use cadence_types::{Direction, EditorTool};

use crate::effects::EditorHost;

/// One host command as seen by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    AdjustZoom(i32),
    SeekInDirection(Direction),
    SeekTo(i64),
    SeekToStart,
    SeekToEnd,
    SeekToStartOfSelection,
    SeekToEndOfSelection,
    ChangePlaybackRate(Direction),
    ChangeTool(Direction),
    ChangeToolTo(EditorTool),
    TogglePlayPause,
    LeaveEditor,
    TogglePlugin(String),
}

/// Editor host that records every command instead of editing anything.
///
/// Used by trace playback and tests. Playback state and track time are
/// tracked so the 1 ms seeks behave like they would on a real editor.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
    pub playing: bool,
    pub track_time_ms: i64,
    pub dialog_open: bool,
    pub overlay_hovered: bool,
    /// When set, every command fails with this message and is not recorded.
    pub fail_with: Option<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    fn record(&mut self, call: HostCall) -> Result<()> {
        if let Some(message) = &self.fail_with {
            return Err(anyhow!("{}", message));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl EditorHost for RecordingHost {
    fn dialog_open(&self) -> bool {
        self.dialog_open
    }

    fn overlay_hovered(&self) -> bool {
        self.overlay_hovered
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn track_time_ms(&self) -> i64 {
        self.track_time_ms
    }

    fn adjust_zoom(&mut self, delta: i32) -> Result<()> {
        self.record(HostCall::AdjustZoom(delta))
    }

    fn seek_in_direction(&mut self, direction: Direction) -> Result<()> {
        self.record(HostCall::SeekInDirection(direction))
    }

    fn seek_to(&mut self, time_ms: i64) -> Result<()> {
        self.record(HostCall::SeekTo(time_ms))?;
        self.track_time_ms = time_ms;
        Ok(())
    }

    fn seek_to_start(&mut self) -> Result<()> {
        self.record(HostCall::SeekToStart)
    }

    fn seek_to_end(&mut self) -> Result<()> {
        self.record(HostCall::SeekToEnd)
    }

    fn seek_to_start_of_selection(&mut self) -> Result<()> {
        self.record(HostCall::SeekToStartOfSelection)
    }

    fn seek_to_end_of_selection(&mut self) -> Result<()> {
        self.record(HostCall::SeekToEndOfSelection)
    }

    fn change_playback_rate(&mut self, direction: Direction) -> Result<()> {
        self.record(HostCall::ChangePlaybackRate(direction))
    }

    fn change_tool(&mut self, direction: Direction) -> Result<()> {
        self.record(HostCall::ChangeTool(direction))
    }

    fn change_tool_to(&mut self, tool: EditorTool) -> Result<()> {
        self.record(HostCall::ChangeToolTo(tool))
    }

    fn toggle_play_pause(&mut self) -> Result<()> {
        self.record(HostCall::TogglePlayPause)?;
        self.playing = !self.playing;
        Ok(())
    }

    fn leave_editor(&mut self) -> Result<()> {
        self.record(HostCall::LeaveEditor)
    }

    fn toggle_plugin(&mut self, name: &str) -> Result<()> {
        self.record(HostCall::TogglePlugin(name.to_string()))
    }
}
