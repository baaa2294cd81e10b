use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use cadence_types::{Action, ActionClass, Keybind, PhysicalKey};
use serde::{Deserialize, Serialize};

use crate::repeat_gate::{DEFAULT_HOLD_REPEAT_DELAY_MS, DEFAULT_HOLD_REPEAT_INTERVAL_MS};

const KEYBIND_CONFIG_FILE: &str = "editor_keybinds.json";

fn default_hold_repeat_delay_ms() -> u64 {
    DEFAULT_HOLD_REPEAT_DELAY_MS
}

fn default_hold_repeat_interval_ms() -> u64 {
    DEFAULT_HOLD_REPEAT_INTERVAL_MS
}

/// Configurable editor keybinds.
///
/// Actions missing from `keybinds` get their default chords on load; an
/// explicitly empty list leaves the action unbound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeybindConfig {
    #[serde(default)]
    pub keybinds: BTreeMap<Action, Vec<Keybind>>,
    /// Plugin name to the chords that toggle it.
    #[serde(default)]
    pub plugin_keybinds: BTreeMap<String, Vec<Keybind>>,
    /// Per-action overrides of `Action::default_class`.
    #[serde(default)]
    pub action_classes: BTreeMap<Action, ActionClass>,
    #[serde(default = "default_hold_repeat_delay_ms")]
    pub hold_repeat_delay_ms: u64,
    #[serde(default = "default_hold_repeat_interval_ms")]
    pub hold_repeat_interval_ms: u64,
}

impl Default for KeybindConfig {
    fn default() -> Self {
        use PhysicalKey as K;

        let mut keybinds = BTreeMap::new();
        let mut bind = |action: Action, binds: Vec<Keybind>| {
            keybinds.insert(action, binds);
        };

        bind(Action::ExitEditor, vec![K::Escape.into()]);
        bind(Action::PlayPause, vec![K::Space.into()]);
        bind(Action::ZoomIn, vec![K::Equals.into()]);
        bind(Action::ZoomInLarge, vec![K::PageUp.into()]);
        bind(Action::ZoomOut, vec![K::Minus.into()]);
        bind(Action::ZoomOutLarge, vec![K::PageDown.into()]);
        bind(Action::SeekForwards, vec![K::Up.into()]);
        bind(Action::SeekBackwards, vec![K::Down.into()]);
        bind(Action::SeekForwards1ms, vec![K::Right.into()]);
        bind(Action::SeekBackwards1ms, vec![K::Left.into()]);
        bind(Action::SeekToStart, vec![K::Home.into()]);
        bind(Action::SeekToEnd, vec![K::End.into()]);
        bind(Action::SeekToStartOfSelection, Vec::new());
        bind(Action::SeekToEndOfSelection, Vec::new());
        bind(Action::IncreasePlaybackRate, vec![K::Period.into()]);
        bind(Action::DecreasePlaybackRate, vec![K::Comma.into()]);
        bind(Action::ChangeToolUp, vec![K::Q.into()]);
        bind(Action::ChangeToolDown, vec![K::E.into()]);
        bind(Action::ChangeToolToSelect, vec![K::Num1.into()]);
        bind(Action::ChangeToolToNote, vec![K::Num2.into()]);
        bind(Action::ChangeToolToLongNote, vec![K::Num3.into()]);

        Self {
            keybinds,
            plugin_keybinds: BTreeMap::new(),
            action_classes: BTreeMap::new(),
            hold_repeat_delay_ms: DEFAULT_HOLD_REPEAT_DELAY_MS,
            hold_repeat_interval_ms: DEFAULT_HOLD_REPEAT_INTERVAL_MS,
        }
    }
}

impl KeybindConfig {
    /// Load keybinds from the default file.
    pub fn load() -> Result<Self> {
        Self::load_from(KEYBIND_CONFIG_FILE)
    }

    /// Load keybinds from a path. A missing file yields the defaults; a
    /// malformed one is an error.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!(
                "No keybind config at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read keybind config: {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse keybind config: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid keybind config: {}", path.display()))?;
        config.normalize();
        log::info!("Loaded keybind config from {}", path.display());
        Ok(config)
    }

    /// Save keybinds to the default file.
    pub fn save(&self) -> Result<()> {
        self.save_to(KEYBIND_CONFIG_FILE)
    }

    /// Save keybinds to a path as pretty JSON.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write keybind config: {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.hold_repeat_interval_ms == 0 {
            bail!("hold_repeat_interval_ms must be greater than zero");
        }
        for name in self.plugin_keybinds.keys() {
            if name.trim().is_empty() {
                bail!("plugin keybinds need a plugin name");
            }
        }
        Ok(())
    }

    fn normalize(&mut self) {
        let defaults = Self::default();
        let mut filled = Vec::new();

        for action in Action::all() {
            if !self.keybinds.contains_key(action) {
                filled.push(*action);
                self.keybinds.insert(
                    *action,
                    defaults.keybinds.get(action).cloned().unwrap_or_default(),
                );
            }
        }

        if !filled.is_empty() {
            log::warn!("Keybind config is missing {:?}; using defaults", filled);
        }
    }
}
