use std::path::Path;

use anyhow::Result;
use cadence_types::Action;

use crate::dispatcher::{ActionDispatcher, PollReport};
use crate::effects::{EditorHost, EffectTable};
use crate::key_config::KeybindConfig;
use crate::key_state::KeyStateSnapshot;
use crate::keyboard::KeyboardBackend;
use crate::registry::KeybindRegistry;
use crate::repeat_gate::{ActionTiming, RepeatGate, TimingTable};

/// Per-frame keybind dispatch for one editing session.
///
/// Owns the registry, the previous poll's snapshot and every timing record.
/// Call [`InputManager::poll`] once per frame.
pub struct InputManager<H> {
    registry: KeybindRegistry,
    dispatcher: ActionDispatcher<H>,
    /// Key state seen by the last completed poll.
    previous: KeyStateSnapshot,
    timings: TimingTable,
}

impl<H> InputManager<H> {
    pub fn new(registry: KeybindRegistry, gate: RepeatGate, effects: EffectTable<H>) -> Self {
        Self {
            registry,
            dispatcher: ActionDispatcher::new(effects, gate),
            previous: KeyStateSnapshot::default(),
            timings: TimingTable::new(),
        }
    }

    /// Build from a configuration with the given effect table.
    pub fn with_effects(config: &KeybindConfig, effects: EffectTable<H>) -> Result<Self> {
        let registry = KeybindRegistry::from_config(config)?;
        let gate = RepeatGate::new(config.hold_repeat_delay_ms, config.hold_repeat_interval_ms);
        Ok(Self::new(registry, gate, effects))
    }

    /// Treat whatever is held right now as already seen, so keys held when
    /// the editor opens do not fire.
    pub fn prime(&mut self, keyboard: &dyn KeyboardBackend) {
        self.previous = KeyStateSnapshot::capture(keyboard);
    }

    pub fn registry(&self) -> &KeybindRegistry {
        &self.registry
    }

    /// Swap in a new registry. Timing records and the repeat gate carry over;
    /// use [`InputManager::apply_config`] to take a config's repeat timing too.
    pub fn set_registry(&mut self, registry: KeybindRegistry) {
        self.registry = registry;
    }

    /// Rebind from `config`, replacing both the registry and the repeat gate.
    /// Timing records carry over. Leaves everything unchanged if the config
    /// is invalid.
    pub fn apply_config(&mut self, config: &KeybindConfig) -> Result<()> {
        let registry = KeybindRegistry::from_config(config)?;
        self.registry = registry;
        self.dispatcher.set_gate(RepeatGate::new(
            config.hold_repeat_delay_ms,
            config.hold_repeat_interval_ms,
        ));
        Ok(())
    }

    pub fn gate(&self) -> &RepeatGate {
        self.dispatcher.gate()
    }

    pub fn timing(&self, action: Action) -> ActionTiming {
        self.timings.get(action)
    }

    pub fn timings(&self) -> &TimingTable {
        &self.timings
    }

    pub fn previous_snapshot(&self) -> &KeyStateSnapshot {
        &self.previous
    }
}

impl<H: EditorHost> InputManager<H> {
    /// Build from a configuration with the standard effect table.
    pub fn from_config(config: &KeybindConfig) -> Result<Self> {
        Self::with_effects(config, EffectTable::standard())
    }

    /// Load the keybind config file and build from it.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_config(&KeybindConfig::load_from(path)?)
    }

    /// Run one frame of input handling.
    ///
    /// Does nothing while a dialog or overlay has input. Otherwise captures
    /// key state, dispatches presses, releases and plugin toggles in that
    /// order, then keeps the snapshot for the next poll. A failing effect
    /// aborts the poll and the snapshot is not kept, so on the next poll every
    /// edge of the failed one is seen again: effects that already ran before
    /// the failure fire a second time as `Press`.
    pub fn poll(
        &mut self,
        now_ms: u64,
        keyboard: &dyn KeyboardBackend,
        host: &mut H,
    ) -> Result<PollReport> {
        if host.dialog_open() || host.overlay_hovered() {
            log::debug!("Input blocked at {}ms, skipping poll", now_ms);
            return Ok(PollReport::skipped());
        }

        let current = KeyStateSnapshot::capture(keyboard);
        let mut report = PollReport::default();

        self.dispatcher.dispatch_presses(
            &self.registry,
            &current,
            &self.previous,
            now_ms,
            host,
            &mut self.timings,
            &mut report,
        )?;
        self.dispatcher.dispatch_releases(
            &self.registry,
            &current,
            &self.previous,
            now_ms,
            host,
            &mut self.timings,
            &mut report,
        )?;
        self.dispatch_plugin_toggles(&current, host, &mut report)?;

        self.previous = current;
        Ok(report)
    }

    /// Toggle each plugin whose chord went down this poll.
    fn dispatch_plugin_toggles(
        &self,
        current: &KeyStateSnapshot,
        host: &mut H,
        report: &mut PollReport,
    ) -> Result<()> {
        for (name, keybinds) in self.registry.plugin_keybinds() {
            if keybinds
                .iter()
                .any(|keybind| current.is_edge_press(keybind, &self.previous))
            {
                host.toggle_plugin(name)?;
                log::debug!("Plugin {:?} toggled", name);
                report.toggled_plugins.push(name.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::VirtualKeyboardBackend;
    use crate::effects::Trigger;
    use crate::recording::{HostCall, RecordingHost};
    use cadence_types::{Keybind, PhysicalKey};

    fn manager() -> InputManager<RecordingHost> {
        InputManager::from_config(&KeybindConfig::default()).unwrap()
    }

    #[test]
    fn builds_from_default_config() {
        let manager = manager();
        assert_eq!(manager.gate(), &RepeatGate::new(250, 25));
        assert!(manager.timings().is_empty());
        assert!(manager.previous_snapshot().is_empty());
    }

    #[test]
    fn prime_suppresses_keys_held_at_start() {
        let mut manager = manager();
        let mut kb = VirtualKeyboardBackend::new();
        let mut host = RecordingHost::new();
        kb.press(PhysicalKey::Space);
        manager.prime(&kb);

        let report = manager.poll(0, &kb, &mut host).unwrap();
        assert!(report.is_empty());
        assert!(host.calls.is_empty());
    }

    #[test]
    fn blocked_poll_touches_nothing() {
        let mut manager = manager();
        let mut kb = VirtualKeyboardBackend::new();
        let mut host = RecordingHost {
            dialog_open: true,
            ..RecordingHost::default()
        };
        kb.press(PhysicalKey::Space);

        let report = manager.poll(0, &kb, &mut host).unwrap();
        assert!(report.skipped);
        assert!(host.calls.is_empty());
        assert!(manager.timings().is_empty());
        assert!(manager.previous_snapshot().is_empty());

        // Once the dialog closes the press is still an edge.
        host.dialog_open = false;
        let report = manager.poll(16, &kb, &mut host).unwrap();
        assert!(report.fired(Action::PlayPause));
    }

    #[test]
    fn hovered_overlay_blocks_input() {
        let mut manager = manager();
        let mut kb = VirtualKeyboardBackend::new();
        let mut host = RecordingHost {
            overlay_hovered: true,
            ..RecordingHost::default()
        };
        kb.press(PhysicalKey::Escape);
        assert!(manager.poll(0, &kb, &mut host).unwrap().skipped);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn plugin_toggles_on_edge_only() {
        let mut config = KeybindConfig::default();
        config
            .plugin_keybinds
            .insert("Timing Tools".to_string(), vec!["Alt+T".parse().unwrap()]);
        let mut manager: InputManager<RecordingHost> = InputManager::from_config(&config).unwrap();
        let mut kb = VirtualKeyboardBackend::new();
        let mut host = RecordingHost::new();

        kb.press(PhysicalKey::Alt);
        kb.press(PhysicalKey::T);
        let report = manager.poll(0, &kb, &mut host).unwrap();
        assert_eq!(report.toggled_plugins, vec!["Timing Tools".to_string()]);

        let report = manager.poll(500, &kb, &mut host).unwrap();
        assert!(report.toggled_plugins.is_empty());
        assert_eq!(
            host.calls,
            vec![HostCall::TogglePlugin("Timing Tools".to_string())]
        );
    }

    #[test]
    fn failed_poll_keeps_previous_snapshot() {
        let mut manager = manager();
        let mut kb = VirtualKeyboardBackend::new();
        let mut host = RecordingHost {
            fail_with: Some("boom".to_string()),
            ..RecordingHost::default()
        };
        kb.press(PhysicalKey::Space);

        assert!(manager.poll(0, &kb, &mut host).is_err());
        assert!(manager.previous_snapshot().is_empty());

        host.fail_with = None;
        let report = manager.poll(16, &kb, &mut host).unwrap();
        assert_eq!(report.dispatches.len(), 1);
    }

    #[test]
    fn failed_poll_refires_effects_that_already_ran() {
        let mut effects = EffectTable::standard();
        effects.register(Action::ChangeToolToSelect, |_: &mut RecordingHost, _| {
            anyhow::bail!("tool switch failed")
        });
        let mut manager = InputManager::with_effects(&KeybindConfig::default(), effects).unwrap();
        let mut kb = VirtualKeyboardBackend::new();
        let mut host = RecordingHost::new();

        // PlayPause runs before ChangeToolToSelect fails.
        kb.set_pressed([PhysicalKey::Space, PhysicalKey::Num1]);
        assert!(manager.poll(0, &kb, &mut host).is_err());
        assert_eq!(host.take_calls(), vec![HostCall::TogglePlayPause]);

        kb.release(PhysicalKey::Num1);
        let report = manager.poll(16, &kb, &mut host).unwrap();
        assert_eq!(report.trigger_of(Action::PlayPause), Some(Trigger::Press));
        assert_eq!(host.take_calls(), vec![HostCall::TogglePlayPause]);
    }

    #[test]
    fn apply_config_replaces_repeat_gate() {
        let mut manager = manager();
        let mut config = KeybindConfig::default();
        config.hold_repeat_delay_ms = 100;
        config.hold_repeat_interval_ms = 10;
        let w: Keybind = "W".parse().unwrap();
        config.keybinds.insert(Action::SeekForwards, vec![w.clone()]);

        manager.apply_config(&config).unwrap();
        assert_eq!(manager.gate(), &RepeatGate::new(100, 10));
        assert_eq!(
            manager.registry().bindings(Action::SeekForwards),
            &[w][..]
        );

        let mut kb = VirtualKeyboardBackend::new();
        let mut host = RecordingHost::new();
        kb.press(PhysicalKey::W);
        manager.poll(0, &kb, &mut host).unwrap();
        let report = manager.poll(100, &kb, &mut host).unwrap();
        assert_eq!(report.trigger_of(Action::SeekForwards), Some(Trigger::Repeat));
    }

    #[test]
    fn invalid_config_leaves_manager_unchanged() {
        let mut manager = manager();
        let mut config = KeybindConfig::default();
        config.hold_repeat_interval_ms = 0;
        assert!(manager.apply_config(&config).is_err());
        assert_eq!(manager.gate(), &RepeatGate::new(250, 25));
    }

    #[test]
    fn set_registry_rebinds() {
        let mut manager = manager();
        let mut kb = VirtualKeyboardBackend::new();
        let mut host = RecordingHost::new();

        let mut registry = manager.registry().clone();
        registry.set_bindings(Action::PlayPause, vec!["P".parse().unwrap()]);
        manager.set_registry(registry);

        kb.press(PhysicalKey::Space);
        assert!(manager.poll(0, &kb, &mut host).unwrap().is_empty());
        kb.press(PhysicalKey::P);
        assert!(manager.poll(16, &kb, &mut host).unwrap().fired(Action::PlayPause));
    }
}
