//! State machine module for the launcher tray
//!
//! Provides the two-state window machine:
//! - Hidden: initial state, window created but not shown
//! - Visible: window shown, menu offers "Hide"

mod machine;

pub use machine::{hotkey_label, TrayState, Visibility};
