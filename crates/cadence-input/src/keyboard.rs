/// Raw keyboard state source.
///
/// The host's windowing layer implements `KeyboardBackend`; the engine only
/// reads from it once per poll.
use std::collections::{BTreeSet, HashSet};

use cadence_types::PhysicalKey;

/// Platform abstraction for keyboard state queries.
pub trait KeyboardBackend {
    /// Returns `true` if the given key is currently held.
    fn is_key_pressed(&self, key: PhysicalKey) -> bool;

    /// Sample every known key. Backends with a cheaper bulk query may override this.
    fn pressed_keys(&self) -> BTreeSet<PhysicalKey> {
        PhysicalKey::ALL
            .iter()
            .copied()
            .filter(|&key| self.is_key_pressed(key))
            .collect()
    }
}

/// Virtual keyboard backend for tests and trace playback.
#[derive(Debug, Default)]
pub struct VirtualKeyboardBackend {
    pressed: HashSet<PhysicalKey>,
}

impl VirtualKeyboardBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: PhysicalKey) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: PhysicalKey) {
        self.pressed.remove(&key);
    }

    pub fn release_all(&mut self) {
        self.pressed.clear();
    }

    /// Replace the held set wholesale.
    pub fn set_pressed<I: IntoIterator<Item = PhysicalKey>>(&mut self, keys: I) {
        self.pressed = keys.into_iter().collect();
    }
}

impl KeyboardBackend for VirtualKeyboardBackend {
    fn is_key_pressed(&self, key: PhysicalKey) -> bool {
        self.pressed.contains(&key)
    }

    fn pressed_keys(&self) -> BTreeSet<PhysicalKey> {
        self.pressed.iter().copied().collect()
    }
}
