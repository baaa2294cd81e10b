//! Keybind-to-action dispatch for the chart editor.
//!
//! This crate provides:
//! - [`KeybindRegistry`]: action <-> chord mapping built from [`KeybindConfig`]
//! - [`KeyStateSnapshot`]: per-poll key state and edge detection
//! - [`RepeatGate`]: hold-to-repeat timing policy
//! - [`ActionDispatcher`]: chord resolution and effect invocation
//! - [`InputManager`]: the once-per-frame entry point

pub mod dispatcher;
pub mod effects;
pub mod input_manager;
pub mod key_config;
pub mod key_state;
pub mod keyboard;
pub mod recording;
pub mod registry;
pub mod repeat_gate;

pub use dispatcher::{ActionDispatcher, Dispatch, PollReport};
pub use effects::{EditorHost, Effect, EffectTable, Trigger};
pub use input_manager::InputManager;
pub use key_config::KeybindConfig;
pub use key_state::KeyStateSnapshot;
pub use keyboard::{KeyboardBackend, VirtualKeyboardBackend};
pub use recording::{HostCall, RecordingHost};
pub use registry::KeybindRegistry;
pub use repeat_gate::{
    ActionTiming, DEFAULT_HOLD_REPEAT_DELAY_MS, DEFAULT_HOLD_REPEAT_INTERVAL_MS, RepeatGate,
    TimingTable,
};
