// Shared data model for the editor input engine (keys, chords, actions).

pub mod action;
pub mod keybind;
pub mod physical_key;

pub use action::{Action, ActionClass, Direction, EditorTool};
pub use keybind::Keybind;
pub use physical_key::PhysicalKey;
