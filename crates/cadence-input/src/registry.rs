use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Result;
use cadence_types::{Action, ActionClass, Keybind};

use crate::key_config::KeybindConfig;

static NO_ACTIONS: BTreeSet<Action> = BTreeSet::new();

/// Bidirectional keybind mapping.
///
/// The forward map (action to chords) is the source of truth. The reverse map
/// (chord to actions) is rebuilt from it on every change and never edited
/// directly.
#[derive(Debug, Clone, Default)]
pub struct KeybindRegistry {
    forward: BTreeMap<Action, Vec<Keybind>>,
    reverse: BTreeMap<Keybind, BTreeSet<Action>>,
    classes: BTreeMap<Action, ActionClass>,
    plugins: BTreeMap<String, Vec<Keybind>>,
}

impl KeybindRegistry {
    /// Build from a forward map. Classes are the built-in defaults.
    pub fn new(forward: BTreeMap<Action, Vec<Keybind>>) -> Self {
        let mut registry = Self {
            forward,
            ..Self::default()
        };
        registry.rebuild_reverse();
        registry
    }

    /// Build from a validated configuration.
    pub fn from_config(config: &KeybindConfig) -> Result<Self> {
        config.validate()?;
        let mut registry = Self::new(config.keybinds.clone());
        registry.classes = config.action_classes.clone();
        registry.plugins = config.plugin_keybinds.clone();
        Ok(registry)
    }

    /// Load the default config file and build from it.
    pub fn load() -> Result<Self> {
        Self::from_config(&KeybindConfig::load()?)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_config(&KeybindConfig::load_from(path)?)
    }

    /// Derive chord -> actions from the forward map in one pass.
    pub fn reverse(forward: &BTreeMap<Action, Vec<Keybind>>) -> BTreeMap<Keybind, BTreeSet<Action>> {
        let mut reverse: BTreeMap<Keybind, BTreeSet<Action>> = BTreeMap::new();
        for (action, keybinds) in forward {
            for keybind in keybinds {
                reverse.entry(keybind.clone()).or_default().insert(*action);
            }
        }
        reverse
    }

    fn rebuild_reverse(&mut self) {
        self.reverse = Self::reverse(&self.forward);
        for (keybind, actions) in &self.reverse {
            if actions.len() > 1 {
                log::warn!("Keybind {} is bound to several actions: {:?}", keybind, actions);
            }
        }
    }

    /// Replace the chords of one action and refresh the reverse map.
    pub fn set_bindings(&mut self, action: Action, keybinds: Vec<Keybind>) {
        self.forward.insert(action, keybinds);
        self.rebuild_reverse();
    }

    /// Actions bound to a chord; empty for an unbound chord.
    pub fn lookup(&self, keybind: &Keybind) -> &BTreeSet<Action> {
        self.reverse.get(keybind).unwrap_or(&NO_ACTIONS)
    }

    /// Chords bound to an action, in configured order.
    pub fn bindings(&self, action: Action) -> &[Keybind] {
        self.forward.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every chord with at least one bound action.
    pub fn keybinds(&self) -> impl Iterator<Item = &Keybind> {
        self.reverse.keys()
    }

    pub fn reverse_map(&self) -> &BTreeMap<Keybind, BTreeSet<Action>> {
        &self.reverse
    }

    pub fn forward_map(&self) -> &BTreeMap<Action, Vec<Keybind>> {
        &self.forward
    }

    pub fn class_of(&self, action: Action) -> ActionClass {
        self.classes
            .get(&action)
            .copied()
            .unwrap_or_else(|| action.default_class())
    }

    pub fn actions_of_class(&self, class: ActionClass) -> impl Iterator<Item = Action> + '_ {
        Action::all()
            .iter()
            .copied()
            .filter(move |&action| self.class_of(action) == class)
    }

    pub fn plugin_keybinds(&self) -> &BTreeMap<String, Vec<Keybind>> {
        &self.plugins
    }
}
