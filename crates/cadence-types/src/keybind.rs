use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::physical_key::PhysicalKey;

/// A chord: one or more keys that must be held at the same time.
///
/// Equality ignores the order the keys were written in. The key set is never
/// empty. Written as key names joined by `+`, e.g. `"Ctrl+Shift+Z"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Keybind {
    keys: BTreeSet<PhysicalKey>,
}

impl Keybind {
    /// Build a chord from any set of keys. Fails on an empty set.
    pub fn new<I: IntoIterator<Item = PhysicalKey>>(keys: I) -> Result<Self> {
        let keys: BTreeSet<PhysicalKey> = keys.into_iter().collect();
        if keys.is_empty() {
            bail!("a keybind needs at least one key");
        }
        Ok(Self { keys })
    }

    pub fn single(key: PhysicalKey) -> Self {
        Self {
            keys: BTreeSet::from([key]),
        }
    }

    /// Add another key to the chord.
    pub fn with(mut self, key: PhysicalKey) -> Self {
        self.keys.insert(key);
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = PhysicalKey> + '_ {
        self.keys.iter().copied()
    }

    pub fn contains(&self, key: PhysicalKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Never true for a constructed chord.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether every key of the chord is in `pressed`.
    pub fn is_satisfied_by(&self, pressed: &BTreeSet<PhysicalKey>) -> bool {
        self.keys.is_subset(pressed)
    }
}

impl From<PhysicalKey> for Keybind {
    fn from(key: PhysicalKey) -> Self {
        Self::single(key)
    }
}

impl fmt::Display for Keybind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            f.write_str(key.name())?;
        }
        Ok(())
    }
}

impl FromStr for Keybind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            bail!("empty keybind");
        }
        let mut keys = BTreeSet::new();
        for part in s.split('+') {
            if part.trim().is_empty() {
                bail!("empty key in keybind {:?}", s);
            }
            keys.insert(part.parse::<PhysicalKey>()?);
        }
        Self::new(keys)
    }
}

impl TryFrom<String> for Keybind {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Keybind> for String {
    fn from(keybind: Keybind) -> Self {
        keybind.to_string()
    }
}
