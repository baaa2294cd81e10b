use std::collections::BTreeSet;

use cadence_types::{Keybind, PhysicalKey};

use crate::keyboard::KeyboardBackend;
use crate::registry::KeybindRegistry;

/// The set of keys held at one poll. Immutable once captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyStateSnapshot {
    pressed: BTreeSet<PhysicalKey>,
}

impl KeyStateSnapshot {
    /// Read the current key set from the backend.
    pub fn capture(backend: &dyn KeyboardBackend) -> Self {
        Self {
            pressed: backend.pressed_keys(),
        }
    }

    pub fn from_keys<I: IntoIterator<Item = PhysicalKey>>(keys: I) -> Self {
        Self {
            pressed: keys.into_iter().collect(),
        }
    }

    pub fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.pressed.contains(&key)
    }

    pub fn pressed_keys(&self) -> &BTreeSet<PhysicalKey> {
        &self.pressed
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }

    pub fn satisfies(&self, keybind: &Keybind) -> bool {
        keybind.is_satisfied_by(&self.pressed)
    }

    /// Every registered chord whose keys are all held. Overlapping chords are
    /// each reported.
    pub fn pressed_keybinds<'r>(&self, registry: &'r KeybindRegistry) -> BTreeSet<&'r Keybind> {
        registry
            .keybinds()
            .filter(|keybind| self.satisfies(keybind))
            .collect()
    }

    /// Keys held now that were not held in `previous`.
    pub fn unique_presses(&self, previous: &KeyStateSnapshot) -> BTreeSet<PhysicalKey> {
        self.pressed.difference(&previous.pressed).copied().collect()
    }

    /// A chord is edge-pressed when it is satisfied now and at least one of its
    /// keys went down since `previous`.
    pub fn is_edge_press(&self, keybind: &Keybind, previous: &KeyStateSnapshot) -> bool {
        self.satisfies(keybind) && keybind.keys().any(|key| !previous.is_pressed(key))
    }

    /// A set of chords is released when one of them was satisfied in
    /// `previous` and none is now.
    pub fn is_release(&self, keybinds: &[Keybind], previous: &KeyStateSnapshot) -> bool {
        keybinds.iter().any(|keybind| previous.satisfies(keybind))
            && !keybinds.iter().any(|keybind| self.satisfies(keybind))
    }
}
