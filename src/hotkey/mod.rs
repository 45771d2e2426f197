//! Hotkey module for global keyboard shortcuts
//!
//! Parses chord strings, installs them with the OS hook and keeps one
//! binding per action.

mod backend;
mod chord;
mod facility;
#[cfg(test)]
pub(crate) mod fake;
mod registry;
mod sequence;

pub use backend::{BackendError, KeyBackend, SystemKeys};
pub use chord::{Chord, ChordStep, ModifierSet};
pub use facility::{GlobalHook, HookFacility, HotkeyError, REPLAY_GRACE};
pub use registry::{Action, HotkeyRegistry};
pub use sequence::SEQUENCE_TIMEOUT;
