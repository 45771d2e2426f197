//! chat-tray: system-tray chat launcher and clipboard rewriter
//!
//! Two small tray apps share this library:
//! - `chat-launcher` shows and hides an embedded chat browser window from
//!   the tray menu or a global hotkey chord
//! - `chat-translator` sends clipboard text to a completion API and puts
//!   the rewritten text back on the clipboard
//!
//! The core is the hotkey registry ([`hotkey`]) and the tray state machine
//! ([`state`], [`tray`]); the rest is platform plumbing.

pub mod app;
pub mod autostart;
pub mod clipboard;
pub mod config;
pub mod events;
pub mod hotkey;
pub mod lifecycle;
pub mod state;
pub mod transform;
pub mod tray;
pub mod ui;
