//! Host editing surface and the action -> effect table.
//!
//! The dispatcher never names host methods directly. It looks an action up in
//! an [`EffectTable`] built once at startup; an action without an entry is a
//! no-op.

use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use cadence_types::{Action, Direction, EditorTool};

/// The editing surface that actions act on.
///
/// Effects return `Result` so a failing command propagates out of the poll;
/// the engine never retries.
pub trait EditorHost {
    /// A modal dialog is open.
    fn dialog_open(&self) -> bool;

    /// An overlay (plugin window, inspector) is under the cursor and capturing input.
    fn overlay_hovered(&self) -> bool {
        false
    }

    fn is_playing(&self) -> bool;
    fn track_time_ms(&self) -> i64;

    fn adjust_zoom(&mut self, delta: i32) -> Result<()>;
    fn seek_in_direction(&mut self, direction: Direction) -> Result<()>;
    fn seek_to(&mut self, time_ms: i64) -> Result<()>;
    fn seek_to_start(&mut self) -> Result<()>;
    fn seek_to_end(&mut self) -> Result<()>;
    fn seek_to_start_of_selection(&mut self) -> Result<()>;
    fn seek_to_end_of_selection(&mut self) -> Result<()>;
    fn change_playback_rate(&mut self, direction: Direction) -> Result<()>;
    fn change_tool(&mut self, direction: Direction) -> Result<()>;
    fn change_tool_to(&mut self, tool: EditorTool) -> Result<()>;
    fn toggle_play_pause(&mut self) -> Result<()>;
    fn leave_editor(&mut self) -> Result<()>;
    fn toggle_plugin(&mut self, name: &str) -> Result<()>;
}

/// Why an effect is being invoked this poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// A chord went down this poll.
    Press,
    /// Auto-repeat of a held `HoldRepeat` action.
    Repeat,
    /// Throttled re-fire of a held `HoldAndRelease` action.
    Hold,
    /// A `HoldAndRelease` chord was let go.
    Release,
}

impl Trigger {
    pub fn is_key_press(self) -> bool {
        matches!(self, Trigger::Press | Trigger::Repeat)
    }

    pub fn is_release(self) -> bool {
        self == Trigger::Release
    }
}

pub type Effect<H> = Box<dyn Fn(&mut H, Trigger) -> Result<()>>;

/// Capability table from action to effect.
pub struct EffectTable<H> {
    handlers: HashMap<Action, Effect<H>>,
}

impl<H> Default for EffectTable<H> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<H> fmt::Debug for EffectTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<_> = self.handlers.keys().collect();
        actions.sort();
        f.debug_struct("EffectTable").field("actions", &actions).finish()
    }
}

impl<H> EffectTable<H> {
    /// An empty table; every action is a no-op.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, action: Action, effect: F) -> &mut Self
    where
        F: Fn(&mut H, Trigger) -> Result<()> + 'static,
    {
        self.handlers.insert(action, Box::new(effect));
        self
    }

    pub fn unregister(&mut self, action: Action) -> Option<Effect<H>> {
        self.handlers.remove(&action)
    }

    pub fn get(&self, action: Action) -> Option<&Effect<H>> {
        self.handlers.get(&action)
    }

    pub fn contains(&self, action: Action) -> bool {
        self.handlers.contains_key(&action)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<H: EditorHost> EffectTable<H> {
    /// Every built-in action wired to its host command.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table
            .register(Action::ExitEditor, |host, _| host.leave_editor())
            .register(Action::PlayPause, |host, _| host.toggle_play_pause())
            .register(Action::ZoomIn, |host, _| host.adjust_zoom(1))
            .register(Action::ZoomInLarge, |host, _| host.adjust_zoom(5))
            .register(Action::ZoomOut, |host, _| host.adjust_zoom(-1))
            .register(Action::ZoomOutLarge, |host, _| host.adjust_zoom(-5))
            .register(Action::SeekForwards, |host, _| {
                host.seek_in_direction(Direction::Forward)
            })
            .register(Action::SeekBackwards, |host, _| {
                host.seek_in_direction(Direction::Backward)
            })
            // Millisecond nudges only apply while paused.
            .register(Action::SeekForwards1ms, |host, _| {
                if host.is_playing() {
                    return Ok(());
                }
                let time = host.track_time_ms();
                host.seek_to(time + 1)
            })
            .register(Action::SeekBackwards1ms, |host, _| {
                if host.is_playing() {
                    return Ok(());
                }
                let time = host.track_time_ms();
                host.seek_to(time - 1)
            })
            .register(Action::SeekToStart, |host, _| host.seek_to_start())
            .register(Action::SeekToEnd, |host, _| host.seek_to_end())
            .register(Action::SeekToStartOfSelection, |host, _| {
                host.seek_to_start_of_selection()
            })
            .register(Action::SeekToEndOfSelection, |host, _| {
                host.seek_to_end_of_selection()
            })
            .register(Action::IncreasePlaybackRate, |host, _| {
                host.change_playback_rate(Direction::Forward)
            })
            .register(Action::DecreasePlaybackRate, |host, _| {
                host.change_playback_rate(Direction::Backward)
            })
            .register(Action::ChangeToolUp, |host, _| {
                host.change_tool(Direction::Backward)
            })
            .register(Action::ChangeToolDown, |host, _| {
                host.change_tool(Direction::Forward)
            })
            .register(Action::ChangeToolToSelect, |host, _| {
                host.change_tool_to(EditorTool::Select)
            })
            .register(Action::ChangeToolToNote, |host, _| {
                host.change_tool_to(EditorTool::Note)
            })
            .register(Action::ChangeToolToLongNote, |host, _| {
                host.change_tool_to(EditorTool::LongNote)
            });
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{HostCall, RecordingHost};

    #[test]
    fn trigger_flags() {
        assert!(Trigger::Press.is_key_press());
        assert!(Trigger::Repeat.is_key_press());
        assert!(!Trigger::Hold.is_key_press());
        assert!(!Trigger::Release.is_key_press());
        assert!(Trigger::Release.is_release());
        assert!(!Trigger::Hold.is_release());
    }

    #[test]
    fn standard_covers_every_action() {
        let table = EffectTable::<RecordingHost>::standard();
        for action in Action::all() {
            assert!(table.contains(*action), "{action} has no effect");
        }
    }

    #[test]
    fn standard_effects_call_host() {
        let table = EffectTable::<RecordingHost>::standard();
        let mut host = RecordingHost::default();

        let run = |host: &mut RecordingHost, action| {
            table.get(action).unwrap()(host, Trigger::Press).unwrap();
        };
        run(&mut host, Action::ZoomOutLarge);
        run(&mut host, Action::ChangeToolUp);
        run(&mut host, Action::ChangeToolToLongNote);
        run(&mut host, Action::ExitEditor);

        assert_eq!(
            host.calls,
            vec![
                HostCall::AdjustZoom(-5),
                HostCall::ChangeTool(Direction::Backward),
                HostCall::ChangeToolTo(EditorTool::LongNote),
                HostCall::LeaveEditor,
            ]
        );
    }

    #[test]
    fn millisecond_seek_only_while_paused() {
        let table = EffectTable::<RecordingHost>::standard();
        let mut host = RecordingHost {
            track_time_ms: 1000,
            ..RecordingHost::default()
        };
        let seek = table.get(Action::SeekBackwards1ms).unwrap();

        seek(&mut host, Trigger::Press).unwrap();
        assert_eq!(host.calls, vec![HostCall::SeekTo(999)]);

        host.playing = true;
        seek(&mut host, Trigger::Repeat).unwrap();
        assert_eq!(host.calls.len(), 1);
    }

    #[test]
    fn register_and_unregister() {
        let mut table = EffectTable::<RecordingHost>::new();
        assert!(table.is_empty());
        table.register(Action::PlayPause, |host, trigger| {
            if trigger.is_release() {
                host.toggle_play_pause()?;
            }
            Ok(())
        });
        assert_eq!(table.len(), 1);
        assert!(table.unregister(Action::PlayPause).is_some());
        assert!(table.get(Action::PlayPause).is_none());
    }
}
