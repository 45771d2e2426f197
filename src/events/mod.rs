//! Events module for tray state transitions
//!
//! Every change to what the user sees (window visibility, hotkey label,
//! clipboard contents) is described by a [`StateEvent`] and logged.

/// Events emitted by the tray controllers during transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    /// Browser window became visible
    WindowShown,

    /// Browser window was hidden
    WindowHidden,

    /// Toggle hotkey was replaced
    HotkeyChanged {
        /// Previous canonical chord
        from: String,
        /// New canonical chord
        to: String,
    },

    /// A new hotkey was refused; the old one is still active
    HotkeyRejected {
        /// Text the user entered
        input: String,
    },

    /// Clipboard text was captured for the transform dialog
    ClipboardCaptured {
        /// Number of characters captured
        chars: usize,
    },

    /// Transformed text was written to the clipboard
    TransformApplied {
        /// Mode that produced the text
        mode: String,
        /// Number of characters written
        chars: usize,
    },

    /// Original text was restored to the clipboard
    TransformUndone,
}

impl std::fmt::Display for StateEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateEvent::WindowShown => write!(f, "WINDOW_SHOWN"),
            StateEvent::WindowHidden => write!(f, "WINDOW_HIDDEN"),
            StateEvent::HotkeyChanged { from, to } => {
                write!(f, "HOTKEY_CHANGED ({} -> {})", from, to)
            }
            StateEvent::HotkeyRejected { input } => write!(f, "HOTKEY_REJECTED ({})", input),
            StateEvent::ClipboardCaptured { chars } => {
                write!(f, "CLIPBOARD_CAPTURED ({} chars)", chars)
            }
            StateEvent::TransformApplied { mode, chars } => {
                write!(f, "TRANSFORM_APPLIED ({}, {} chars)", mode, chars)
            }
            StateEvent::TransformUndone => write!(f, "TRANSFORM_UNDONE"),
        }
    }
}
