use std::collections::BTreeMap;

use anyhow::Result;
use cadence_types::{Action, ActionClass};

use crate::effects::{EffectTable, Trigger};
use crate::key_state::KeyStateSnapshot;
use crate::registry::KeybindRegistry;
use crate::repeat_gate::{RepeatGate, TimingTable};

/// A single effect invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub action: Action,
    pub trigger: Trigger,
    pub time_ms: u64,
}

/// What one poll did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Input was blocked by a dialog or overlay; nothing else happened.
    pub skipped: bool,
    /// Effects that ran, in firing order.
    pub dispatches: Vec<Dispatch>,
    /// Plugins toggled this poll.
    pub toggled_plugins: Vec<String>,
}

impl PollReport {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    pub fn fired(&self, action: Action) -> bool {
        self.dispatches.iter().any(|d| d.action == action)
    }

    pub fn count(&self, action: Action) -> usize {
        self.dispatches.iter().filter(|d| d.action == action).count()
    }

    pub fn trigger_of(&self, action: Action) -> Option<Trigger> {
        self.dispatches
            .iter()
            .find(|d| d.action == action)
            .map(|d| d.trigger)
    }

    pub fn is_empty(&self) -> bool {
        self.dispatches.is_empty() && self.toggled_plugins.is_empty()
    }
}

/// Resolves held chords to actions and runs their effects.
///
/// Holds no per-session state of its own: the registry, snapshots and timing
/// records are passed in by the input manager on every call.
pub struct ActionDispatcher<H> {
    effects: EffectTable<H>,
    gate: RepeatGate,
}

impl<H> ActionDispatcher<H> {
    pub fn new(effects: EffectTable<H>, gate: RepeatGate) -> Self {
        Self { effects, gate }
    }

    pub fn gate(&self) -> &RepeatGate {
        &self.gate
    }

    pub fn set_gate(&mut self, gate: RepeatGate) {
        self.gate = gate;
    }

    pub fn effects(&self) -> &EffectTable<H> {
        &self.effects
    }

    /// Run `action`'s effect if it has one. Returns whether it ran.
    fn fire(
        &self,
        action: Action,
        trigger: Trigger,
        now_ms: u64,
        host: &mut H,
        timings: &mut TimingTable,
        report: &mut PollReport,
    ) -> Result<bool> {
        let Some(effect) = self.effects.get(action) else {
            return Ok(false);
        };
        effect(host, trigger)?;
        timings.stamp_dispatch(action, now_ms);
        log::debug!("{} fired ({:?}) at {}ms", action, trigger, now_ms);
        report.dispatches.push(Dispatch {
            action,
            trigger,
            time_ms: now_ms,
        });
        Ok(true)
    }

    /// Press, repeat and hold handling for every satisfied chord.
    ///
    /// An action fires at most once per poll even when several of its chords
    /// are held; it takes the press path if any of them went down this poll.
    #[allow(clippy::too_many_arguments)]
    pub fn dispatch_presses(
        &self,
        registry: &KeybindRegistry,
        current: &KeyStateSnapshot,
        previous: &KeyStateSnapshot,
        now_ms: u64,
        host: &mut H,
        timings: &mut TimingTable,
        report: &mut PollReport,
    ) -> Result<()> {
        let mut resolved: BTreeMap<Action, bool> = BTreeMap::new();
        for keybind in current.pressed_keybinds(registry) {
            let edge = current.is_edge_press(keybind, previous);
            for &action in registry.lookup(keybind) {
                *resolved.entry(action).or_insert(false) |= edge;
            }
        }

        for (action, edge) in resolved {
            let class = registry.class_of(action);
            let timing = timings.get(action);

            if edge {
                self.fire(action, Trigger::Press, now_ms, host, timings, report)?;
                timings.stamp_press(action, now_ms);
            } else if self.gate.can_repeat(class, now_ms, &timing) {
                self.fire(action, Trigger::Repeat, now_ms, host, timings, report)?;
            } else if self.gate.can_hold(class, now_ms, &timing) {
                self.fire(action, Trigger::Hold, now_ms, host, timings, report)?;
            }
        }
        Ok(())
    }

    /// Fire each `HoldAndRelease` action once on the first poll none of its
    /// chords is satisfied, after at least one was satisfied the poll before.
    #[allow(clippy::too_many_arguments)]
    pub fn dispatch_releases(
        &self,
        registry: &KeybindRegistry,
        current: &KeyStateSnapshot,
        previous: &KeyStateSnapshot,
        now_ms: u64,
        host: &mut H,
        timings: &mut TimingTable,
        report: &mut PollReport,
    ) -> Result<()> {
        for action in registry.actions_of_class(ActionClass::HoldAndRelease) {
            if current.is_release(registry.bindings(action), previous) {
                self.fire(action, Trigger::Release, now_ms, host, timings, report)?;
            }
        }
        Ok(())
    }
}
