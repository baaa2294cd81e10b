use std::collections::HashMap;

use cadence_types::{Action, ActionClass};

/// Time after the initial press before auto-repeat starts (ms).
pub const DEFAULT_HOLD_REPEAT_DELAY_MS: u64 = 250;
/// Minimum spacing between repeats of a held action (ms).
pub const DEFAULT_HOLD_REPEAT_INTERVAL_MS: u64 = 25;

/// Per-action timestamps in milliseconds. `None` until first set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionTiming {
    /// Last poll at which one of the action's chords was edge-pressed.
    pub last_press_ms: Option<u64>,
    /// Last poll at which the action's effect ran (press, repeat, hold or release).
    pub last_dispatch_ms: Option<u64>,
}

impl ActionTiming {
    fn elapsed_at_least(since: Option<u64>, now_ms: u64, span_ms: u64) -> bool {
        match since {
            Some(t) => now_ms.saturating_sub(t) >= span_ms,
            None => true,
        }
    }

    pub fn press_elapsed(&self, now_ms: u64, span_ms: u64) -> bool {
        Self::elapsed_at_least(self.last_press_ms, now_ms, span_ms)
    }

    pub fn dispatch_elapsed(&self, now_ms: u64, span_ms: u64) -> bool {
        Self::elapsed_at_least(self.last_dispatch_ms, now_ms, span_ms)
    }
}

/// Timing records for one editing session. Records are created on first use
/// and never removed.
#[derive(Debug, Clone, Default)]
pub struct TimingTable {
    records: HashMap<Action, ActionTiming>,
}

impl TimingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for an action; an all-`None` record if it never fired.
    pub fn get(&self, action: Action) -> ActionTiming {
        self.records.get(&action).copied().unwrap_or_default()
    }

    pub fn contains(&self, action: Action) -> bool {
        self.records.contains_key(&action)
    }

    pub fn stamp_press(&mut self, action: Action, now_ms: u64) {
        self.records.entry(action).or_default().last_press_ms = Some(now_ms);
    }

    pub fn stamp_dispatch(&mut self, action: Action, now_ms: u64) {
        self.records.entry(action).or_default().last_dispatch_ms = Some(now_ms);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Decides whether a held action may fire again this poll.
///
/// Both bounds are inclusive: with a 250 ms delay and 25 ms interval an
/// action held from t=0 repeats at 250, 275, 300, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatGate {
    pub hold_repeat_delay_ms: u64,
    pub hold_repeat_interval_ms: u64,
}

impl Default for RepeatGate {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_REPEAT_DELAY_MS, DEFAULT_HOLD_REPEAT_INTERVAL_MS)
    }
}

impl RepeatGate {
    pub fn new(hold_repeat_delay_ms: u64, hold_repeat_interval_ms: u64) -> Self {
        Self {
            hold_repeat_delay_ms,
            hold_repeat_interval_ms,
        }
    }

    /// `HoldRepeat` actions re-fire once the delay since the press and the
    /// interval since the last dispatch have both passed.
    pub fn can_repeat(&self, class: ActionClass, now_ms: u64, timing: &ActionTiming) -> bool {
        class == ActionClass::HoldRepeat
            && timing.dispatch_elapsed(now_ms, self.hold_repeat_interval_ms)
            && timing.press_elapsed(now_ms, self.hold_repeat_delay_ms)
    }

    /// `HoldAndRelease` actions fire while held, throttled to the interval.
    pub fn can_hold(&self, class: ActionClass, now_ms: u64, timing: &ActionTiming) -> bool {
        class == ActionClass::HoldAndRelease
            && timing.dispatch_elapsed(now_ms, self.hold_repeat_interval_ms)
    }
}
