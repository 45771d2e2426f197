//! Hotkey bindings owned by a tray app
//!
//! The registry is the only code that talks to the hook facility after
//! startup. It keeps at most one chord per [`Action`] and never removes a
//! binding before its replacement is live.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::chord::Chord;
use super::facility::{HookFacility, HotkeyError};

/// Something a chord can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Show or hide the browser window
    ToggleWindow,
    /// Send the clipboard text to the transform dialog
    ProcessClipboard,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::ToggleWindow => write!(f, "toggle window"),
            Action::ProcessClipboard => write!(f, "process clipboard"),
        }
    }
}

/// Owns the hook facility and the chord bound to each action
pub struct HotkeyRegistry<H: HookFacility> {
    hook: H,
    bindings: HashMap<Action, Chord>,
}

impl<H: HookFacility> HotkeyRegistry<H> {
    /// Create a registry with no bindings
    pub fn new(hook: H) -> Self {
        Self {
            hook,
            bindings: HashMap::new(),
        }
    }

    /// Bind `chord_text` to `action`
    ///
    /// If the action already has a chord, it is removed only after the new
    /// one is installed. On error the existing binding is untouched.
    pub fn register(&mut self, chord_text: &str, action: Action) -> Result<Chord, HotkeyError> {
        let chord = Chord::parse(chord_text)?;
        self.bind(chord, action)
    }

    /// Replace `old` with `new_text` for `action`
    pub fn rebind(
        &mut self,
        old: &Chord,
        new_text: &str,
        action: Action,
    ) -> Result<Chord, HotkeyError> {
        if self.bindings.get(&action) != Some(old) {
            warn!(old = %old, %action, "rebinding from a chord the action does not hold");
        }
        self.register(new_text, action)
    }

    /// Remove every binding; safe to call repeatedly
    pub fn unregister_all(&mut self) {
        let count = self.bindings.len();
        self.hook.remove_all();
        self.bindings.clear();
        info!(count, "hotkeys unregistered");
    }

    /// Resolve a raw hook event to the action it triggers
    pub fn trigger(&mut self, event: &H::Event) -> Option<Action> {
        let chord = self.hook.translate(event)?;
        let action = self
            .bindings
            .iter()
            .find(|(_, bound)| **bound == chord)
            .map(|(action, _)| *action);
        debug!(chord = %chord, ?action, "hotkey fired");
        action
    }

    /// The chord currently bound to `action`
    pub fn binding(&self, action: Action) -> Option<&Chord> {
        self.bindings.get(&action)
    }

    /// Number of live bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Let the hook drop a timed-out partial sequence
    pub fn expire(&mut self, now: Instant) {
        self.hook.expire(now);
    }

    /// When [`HotkeyRegistry::expire`] next needs to run
    pub fn next_deadline(&self) -> Option<Instant> {
        self.hook.next_deadline()
    }

    /// The underlying hook facility
    pub fn hook(&self) -> &H {
        &self.hook
    }

    fn bind(&mut self, chord: Chord, action: Action) -> Result<Chord, HotkeyError> {
        if let Some((other, _)) = self
            .bindings
            .iter()
            .find(|(bound_action, bound)| **bound_action != action && **bound == chord)
        {
            return Err(HotkeyError::Conflict {
                chord: chord.to_string(),
                action: other.to_string(),
            });
        }

        let previous = self.bindings.get(&action).cloned();
        if previous.as_ref() == Some(&chord) {
            debug!(chord = %chord, %action, "hotkey already bound");
            return Ok(chord);
        }

        // Install first: a failure here leaves the previous chord live
        self.hook.add(&chord)?;
        if let Some(previous) = &previous {
            self.hook.remove(previous);
        }
        self.bindings.insert(action, chord.clone());

        match previous {
            Some(previous) => info!(from = %previous, to = %chord, %action, "hotkey rebound"),
            None => info!(chord = %chord, %action, "hotkey registered"),
        }
        Ok(chord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::fake::{FakeHook, HookOp};

    fn registry() -> HotkeyRegistry<FakeHook> {
        HotkeyRegistry::new(FakeHook::new())
    }

    fn chord(s: &str) -> Chord {
        Chord::parse(s).unwrap()
    }

    #[test]
    fn test_register_then_unregister_all_leaves_nothing() {
        let mut reg = registry();
        reg.register("ctrl+g, g", Action::ToggleWindow).unwrap();
        reg.register("ctrl+c, c", Action::ProcessClipboard).unwrap();
        assert_eq!(reg.hook().live_count(), 2);

        reg.unregister_all();
        assert!(reg.is_empty());
        assert_eq!(reg.hook().live_count(), 0);
        assert_eq!(reg.trigger(&chord("ctrl+g, g")), None);
    }

    #[test]
    fn test_unregister_all_twice() {
        let mut reg = registry();
        reg.register("ctrl+g, g", Action::ToggleWindow).unwrap();
        reg.unregister_all();
        reg.unregister_all();
        assert!(reg.is_empty());
    }

    #[test]
    fn test_unregister_all_with_nothing_registered() {
        let mut reg = registry();
        reg.unregister_all();
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn test_register_rejects_malformed_chord() {
        let mut reg = registry();
        let err = reg.register("ctrl+", Action::ToggleWindow).unwrap_err();
        assert!(matches!(err, HotkeyError::InvalidChord { .. }));
        assert!(reg.is_empty());
        assert!(reg.hook().ops.is_empty());
    }

    #[test]
    fn test_rebind_invalid_keeps_old() {
        let mut reg = registry();
        let old = reg.register("ctrl+g, g", Action::ToggleWindow).unwrap();

        for bad in ["", "ctrl+", "ctrl+nope", "ctrl+g,,g", "a+b"] {
            let err = reg.rebind(&old, bad, Action::ToggleWindow).unwrap_err();
            assert!(matches!(err, HotkeyError::InvalidChord { .. }), "{}", bad);
            assert_eq!(reg.binding(Action::ToggleWindow), Some(&old));
            assert_eq!(reg.trigger(&old), Some(Action::ToggleWindow));
        }
        assert!(reg.hook().is_live("ctrl+g, g"));
    }

    #[test]
    fn test_rebind_refused_by_hook_keeps_old() {
        let mut hook = FakeHook::new();
        hook.refuse("ctrl+h, h");
        let mut reg = HotkeyRegistry::new(hook);
        let old = reg.register("ctrl+g, g", Action::ToggleWindow).unwrap();

        let err = reg.rebind(&old, "ctrl+h, h", Action::ToggleWindow).unwrap_err();
        assert!(err.to_string().contains("another application"));
        assert_eq!(reg.binding(Action::ToggleWindow), Some(&old));
        assert!(reg.hook().is_live("ctrl+g, g"));
        assert!(!reg
            .hook()
            .ops
            .contains(&HookOp::Remove("ctrl+g, g".to_string())));
    }

    #[test]
    fn test_rebind_moves_trigger() {
        let mut reg = registry();
        let old = reg.register("ctrl+g, g", Action::ToggleWindow).unwrap();
        let new = reg.rebind(&old, "ctrl+h, h", Action::ToggleWindow).unwrap();

        assert_eq!(reg.trigger(&old), None);
        assert_eq!(reg.trigger(&new), Some(Action::ToggleWindow));
        assert_eq!(reg.len(), 1);
        assert!(!reg.hook().is_live("ctrl+g, g"));
    }

    #[test]
    fn test_rebind_adds_before_removing() {
        let mut reg = registry();
        let old = reg.register("ctrl+g, g", Action::ToggleWindow).unwrap();
        reg.rebind(&old, "ctrl+h, h", Action::ToggleWindow).unwrap();

        assert_eq!(
            reg.hook().ops,
            vec![
                HookOp::Add("ctrl+g, g".to_string()),
                HookOp::Add("ctrl+h, h".to_string()),
                HookOp::Remove("ctrl+g, g".to_string()),
            ]
        );
    }

    #[test]
    fn test_rebind_to_same_chord_is_noop() {
        let mut reg = registry();
        let old = reg.register("ctrl+g, g", Action::ToggleWindow).unwrap();
        let same = reg.rebind(&old, "Control+G, G", Action::ToggleWindow).unwrap();

        assert_eq!(same, old);
        assert!(reg.hook().is_live("ctrl+g, g"));
        assert_eq!(reg.hook().ops.len(), 1);
    }

    #[test]
    fn test_register_same_action_replaces_binding() {
        let mut reg = registry();
        reg.register("ctrl+g, g", Action::ToggleWindow).unwrap();
        reg.register("alt+space", Action::ToggleWindow).unwrap();

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.hook().live_count(), 1);
        assert_eq!(reg.trigger(&chord("alt+space")), Some(Action::ToggleWindow));
    }

    #[test]
    fn test_conflicting_action_rejected() {
        let mut reg = registry();
        reg.register("ctrl+c, c", Action::ProcessClipboard).unwrap();
        let err = reg.register("ctrl+c, c", Action::ToggleWindow).unwrap_err();

        assert!(matches!(err, HotkeyError::Conflict { .. }));
        assert_eq!(reg.binding(Action::ToggleWindow), None);
        assert_eq!(
            reg.trigger(&chord("ctrl+c, c")),
            Some(Action::ProcessClipboard)
        );
    }

    #[test]
    fn test_unbound_chord_does_not_trigger() {
        let mut reg = registry();
        reg.register("ctrl+g, g", Action::ToggleWindow).unwrap();
        assert_eq!(reg.trigger(&chord("ctrl+x")), None);
    }
}
