//! Translator tray controller
//!
//! Has no window state: its hotkey captures the clipboard text and hands
//! it to a new transform dialog.

use std::time::Instant;

use tracing::{debug, info};

use super::register_with_fallback;
use crate::clipboard::ClipboardAccess;
use crate::events::StateEvent;
use crate::hotkey::{Action, Chord, HookFacility, HotkeyError, HotkeyRegistry};
use crate::transform::TransformSession;

/// Owns the clipboard hotkey binding
pub struct TranslatorController<H: HookFacility> {
    registry: HotkeyRegistry<H>,
}

impl<H: HookFacility> TranslatorController<H> {
    /// Bind the clipboard chord
    pub fn start(hook: H, preferred: &str, fallback: &str) -> Result<Self, HotkeyError> {
        let mut registry = HotkeyRegistry::new(hook);
        let chord =
            register_with_fallback(&mut registry, preferred, fallback, Action::ProcessClipboard)?;
        info!(hotkey = %chord, "translator ready");
        Ok(Self { registry })
    }

    /// Handle a raw hotkey event; returns a session if a dialog should open
    pub fn handle_hotkey<C>(
        &mut self,
        event: &H::Event,
        clipboard: &mut C,
    ) -> Option<TransformSession>
    where
        C: ClipboardAccess + ?Sized,
    {
        let action = self.registry.trigger(event)?;
        self.dispatch(action, clipboard)
    }

    /// Run a bound action
    pub fn dispatch<C>(&mut self, action: Action, clipboard: &mut C) -> Option<TransformSession>
    where
        C: ClipboardAccess + ?Sized,
    {
        match action {
            Action::ProcessClipboard => {
                let text = clipboard.get_text();
                if text.is_empty() {
                    debug!("clipboard empty, nothing to process");
                    return None;
                }
                let event = StateEvent::ClipboardCaptured {
                    chars: text.chars().count(),
                };
                info!(%event, "tray transition");
                Some(TransformSession::new(text))
            }
            Action::ToggleWindow => {
                debug!(%action, "action not handled by translator");
                None
            }
        }
    }

    /// Chord bound to the clipboard action
    pub fn hotkey(&self) -> Option<&Chord> {
        self.registry.binding(Action::ProcessClipboard)
    }

    /// Drop a timed-out partial sequence
    pub fn expire(&mut self, now: Instant) {
        self.registry.expire(now);
    }

    /// When [`TranslatorController::expire`] next needs to run
    pub fn next_deadline(&self) -> Option<Instant> {
        self.registry.next_deadline()
    }

    /// Remove all hotkeys before exit; safe to call more than once
    pub fn shutdown(&mut self) {
        self.registry.unregister_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::fake::FakeClipboard;
    use crate::hotkey::fake::FakeHook;

    const DEFAULT: &str = "ctrl+c, c";

    fn create_controller() -> TranslatorController<FakeHook> {
        TranslatorController::start(FakeHook::new(), DEFAULT, DEFAULT).unwrap()
    }

    #[test]
    fn test_hotkey_opens_session_with_clipboard_text() {
        let mut c = create_controller();
        let mut clipboard = FakeClipboard::with_text("Guten Morgen");

        let session = c
            .handle_hotkey(&Chord::parse(DEFAULT).unwrap(), &mut clipboard)
            .unwrap();
        assert_eq!(session.original(), "Guten Morgen");
        assert_eq!(session.current(), "Guten Morgen");
    }

    #[test]
    fn test_empty_clipboard_opens_nothing() {
        let mut c = create_controller();
        let mut clipboard = FakeClipboard::default();
        assert!(c
            .handle_hotkey(&Chord::parse(DEFAULT).unwrap(), &mut clipboard)
            .is_none());
    }

    #[test]
    fn test_other_chord_ignored() {
        let mut c = create_controller();
        let mut clipboard = FakeClipboard::with_text("text");
        assert!(c
            .handle_hotkey(&Chord::parse("ctrl+g, g").unwrap(), &mut clipboard)
            .is_none());
    }

    #[test]
    fn test_shutdown_removes_binding() {
        let mut c = create_controller();
        assert_eq!(c.hotkey().map(|h| h.to_string()).as_deref(), Some(DEFAULT));
        c.shutdown();
        c.shutdown();
        assert!(c.hotkey().is_none());
    }
}
