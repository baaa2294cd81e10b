use std::fmt;

use serde::{Deserialize, Serialize};

/// Editing commands that can be bound to a keybind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ExitEditor,
    PlayPause,
    ZoomIn,
    ZoomInLarge,
    ZoomOut,
    ZoomOutLarge,
    SeekForwards,
    SeekBackwards,
    #[serde(rename = "seek_forwards_1ms")]
    SeekForwards1ms,
    #[serde(rename = "seek_backwards_1ms")]
    SeekBackwards1ms,
    SeekToStart,
    SeekToEnd,
    SeekToStartOfSelection,
    SeekToEndOfSelection,
    IncreasePlaybackRate,
    DecreasePlaybackRate,
    ChangeToolUp,
    ChangeToolDown,
    ChangeToolToSelect,
    ChangeToolToNote,
    ChangeToolToLongNote,
}

impl Action {
    pub fn all() -> &'static [Action] {
        &[
            Action::ExitEditor,
            Action::PlayPause,
            Action::ZoomIn,
            Action::ZoomInLarge,
            Action::ZoomOut,
            Action::ZoomOutLarge,
            Action::SeekForwards,
            Action::SeekBackwards,
            Action::SeekForwards1ms,
            Action::SeekBackwards1ms,
            Action::SeekToStart,
            Action::SeekToEnd,
            Action::SeekToStartOfSelection,
            Action::SeekToEndOfSelection,
            Action::IncreasePlaybackRate,
            Action::DecreasePlaybackRate,
            Action::ChangeToolUp,
            Action::ChangeToolDown,
            Action::ChangeToolToSelect,
            Action::ChangeToolToNote,
            Action::ChangeToolToLongNote,
        ]
    }

    /// Built-in firing discipline. Configuration may override it.
    pub fn default_class(self) -> ActionClass {
        match self {
            Action::ZoomIn
            | Action::ZoomInLarge
            | Action::ZoomOut
            | Action::ZoomOutLarge
            | Action::SeekForwards
            | Action::SeekBackwards
            | Action::SeekForwards1ms
            | Action::SeekBackwards1ms
            | Action::IncreasePlaybackRate
            | Action::DecreasePlaybackRate
            | Action::ChangeToolUp
            | Action::ChangeToolDown => ActionClass::HoldRepeat,
            _ => ActionClass::EdgeOnly,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How an action reacts to a chord being held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionClass {
    /// Fires once per press.
    #[default]
    EdgeOnly,
    /// Fires on press, then repeatedly while held after the repeat delay.
    HoldRepeat,
    /// Fires on press, throttled while held, and once more on release.
    HoldAndRelease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

/// Composition tools the editor can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorTool {
    Select,
    Note,
    LongNote,
}
