//! Launcher tray state machine
//!
//! Tracks whether the browser window is visible and which chord toggles
//! it. Menu labels are derived from this state and never stored.

use crate::events::StateEvent;
use crate::hotkey::Chord;

/// Visibility of the browser window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Window exists but is not shown
    #[default]
    Hidden,
    /// Window is shown
    Visible,
}

impl Visibility {
    /// The opposite visibility
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Hidden => Visibility::Visible,
            Visibility::Visible => Visibility::Hidden,
        }
    }

    /// Label for the Show/Hide menu item in this state
    pub fn toggle_label(self) -> &'static str {
        match self {
            Visibility::Hidden => "Show",
            Visibility::Visible => "Hide",
        }
    }

    /// Check if the window is shown
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Hidden => write!(f, "Hidden"),
            Visibility::Visible => write!(f, "Visible"),
        }
    }
}

/// Label for the Set Hotkey menu item
pub fn hotkey_label(chord: &Chord) -> String {
    format!("Set Hotkey ({})", chord)
}

/// Launcher state: window visibility plus the active toggle chord
#[derive(Debug, Clone)]
pub struct TrayState {
    visibility: Visibility,
    hotkey: Chord,
}

impl TrayState {
    /// Initial state: window hidden
    pub fn new(hotkey: Chord) -> Self {
        Self {
            visibility: Visibility::Hidden,
            hotkey,
        }
    }

    /// Current window visibility
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Chord currently bound to the toggle action
    pub fn hotkey(&self) -> &Chord {
        &self.hotkey
    }

    /// Flip visibility
    pub fn toggle(&mut self) -> StateEvent {
        self.visibility = self.visibility.toggled();
        match self.visibility {
            Visibility::Visible => StateEvent::WindowShown,
            Visibility::Hidden => StateEvent::WindowHidden,
        }
    }

    /// Record a chord that is already live in the registry
    pub fn set_hotkey(&mut self, hotkey: Chord) -> StateEvent {
        let from = std::mem::replace(&mut self.hotkey, hotkey);
        StateEvent::HotkeyChanged {
            from: from.to_string(),
            to: self.hotkey.to_string(),
        }
    }

    /// Label for the Show/Hide menu item
    pub fn toggle_label(&self) -> &'static str {
        self.visibility.toggle_label()
    }

    /// Label for the Set Hotkey menu item
    pub fn hotkey_label(&self) -> String {
        hotkey_label(&self.hotkey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_state() -> TrayState {
        TrayState::new(Chord::parse("ctrl+g, g").unwrap())
    }

    #[test]
    fn test_initial_state() {
        let state = create_state();
        assert_eq!(state.visibility(), Visibility::Hidden);
        assert_eq!(state.toggle_label(), "Show");
        assert_eq!(state.hotkey_label(), "Set Hotkey (ctrl+g, g)");
    }

    #[test]
    fn test_hidden_to_visible() {
        let mut state = create_state();
        assert_eq!(state.toggle(), StateEvent::WindowShown);
        assert_eq!(state.visibility(), Visibility::Visible);
        assert_eq!(state.toggle_label(), "Hide");
    }

    #[test]
    fn test_visible_to_hidden() {
        let mut state = create_state();
        state.toggle();
        assert_eq!(state.toggle(), StateEvent::WindowHidden);
        assert_eq!(state.visibility(), Visibility::Hidden);
        assert_eq!(state.toggle_label(), "Show");
    }

    #[test]
    fn test_even_toggles_are_identity() {
        for start_visible in [false, true] {
            let mut state = create_state();
            if start_visible {
                state.toggle();
            }
            let start = state.visibility();
            for _ in 0..6 {
                state.toggle();
            }
            assert_eq!(state.visibility(), start);
            assert_eq!(state.toggle_label(), start.toggle_label());
        }
    }

    #[test]
    fn test_set_hotkey_updates_label() {
        let mut state = create_state();
        let event = state.set_hotkey(Chord::parse("ctrl+h, h").unwrap());
        assert_eq!(
            event,
            StateEvent::HotkeyChanged {
                from: "ctrl+g, g".to_string(),
                to: "ctrl+h, h".to_string(),
            }
        );
        assert_eq!(state.hotkey_label(), "Set Hotkey (ctrl+h, h)");
    }
}
