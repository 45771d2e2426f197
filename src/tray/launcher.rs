//! Launcher tray controller
//!
//! Menu clicks, hotkey firings and the window close button all end up in
//! [`LauncherController::toggle`].

use std::time::Instant;

use tracing::{debug, info, warn};

use super::{register_with_fallback, TraySurface};
use crate::events::StateEvent;
use crate::hotkey::{Action, Chord, HookFacility, HotkeyError, HotkeyRegistry};
use crate::state::{TrayState, Visibility};

/// Owns the toggle binding and the window/menu state
pub struct LauncherController<H: HookFacility, S: TraySurface> {
    registry: HotkeyRegistry<H>,
    state: TrayState,
    surface: S,
}

impl<H: HookFacility, S: TraySurface> LauncherController<H, S> {
    /// Bind the toggle chord and draw the initial (hidden) state
    ///
    /// `preferred` comes from the config; `fallback` is used if the OS
    /// refuses it.
    pub fn start(
        hook: H,
        surface: S,
        preferred: &str,
        fallback: &str,
    ) -> Result<Self, HotkeyError> {
        let mut registry = HotkeyRegistry::new(hook);
        let chord =
            register_with_fallback(&mut registry, preferred, fallback, Action::ToggleWindow)?;

        let mut controller = Self {
            registry,
            state: TrayState::new(chord),
            surface,
        };
        controller.render();
        info!(hotkey = %controller.state.hotkey(), "launcher ready");
        Ok(controller)
    }

    /// Flip window visibility
    pub fn toggle(&mut self) -> StateEvent {
        let event = self.state.toggle();
        self.surface
            .set_window_visible(self.state.visibility().is_visible());
        self.surface.set_toggle_label(self.state.toggle_label());
        info!(%event, to = %self.state.visibility(), "tray transition");
        event
    }

    /// Run a bound action
    pub fn dispatch(&mut self, action: Action) -> Option<StateEvent> {
        match action {
            Action::ToggleWindow => Some(self.toggle()),
            Action::ProcessClipboard => {
                debug!(%action, "action not handled by launcher");
                None
            }
        }
    }

    /// Handle a raw hotkey event from the hook
    pub fn handle_hotkey(&mut self, event: &H::Event) -> Option<StateEvent> {
        let action = self.registry.trigger(event)?;
        self.dispatch(action)
    }

    /// Window close button: hide through the normal transition
    pub fn close_window(&mut self) -> Option<StateEvent> {
        self.state
            .visibility()
            .is_visible()
            .then(|| self.toggle())
    }

    /// Replace the toggle hotkey
    ///
    /// On error the current chord and menu label are unchanged and the
    /// error is returned for display.
    pub fn change_hotkey(&mut self, text: &str) -> Result<StateEvent, HotkeyError> {
        let current = self.state.hotkey().clone();
        match self.registry.rebind(&current, text, Action::ToggleWindow) {
            Ok(chord) => {
                let event = self.state.set_hotkey(chord);
                self.surface.set_hotkey_label(&self.state.hotkey_label());
                info!(%event, "tray transition");
                Ok(event)
            }
            Err(e) => {
                let event = StateEvent::HotkeyRejected {
                    input: text.to_string(),
                };
                warn!(%event, error = %e, current = %current, "tray transition");
                Err(e)
            }
        }
    }

    /// Chord currently toggling the window
    pub fn hotkey(&self) -> &Chord {
        self.state.hotkey()
    }

    /// Current window visibility
    pub fn visibility(&self) -> Visibility {
        self.state.visibility()
    }

    /// The UI surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The hotkey registry
    pub fn registry(&self) -> &HotkeyRegistry<H> {
        &self.registry
    }

    /// Drop a timed-out partial sequence
    pub fn expire(&mut self, now: Instant) {
        self.registry.expire(now);
    }

    /// When [`LauncherController::expire`] next needs to run
    pub fn next_deadline(&self) -> Option<Instant> {
        self.registry.next_deadline()
    }

    /// Remove all hotkeys before exit; safe to call more than once
    pub fn shutdown(&mut self) {
        self.registry.unregister_all();
    }

    fn render(&mut self) {
        self.surface
            .set_window_visible(self.state.visibility().is_visible());
        self.surface.set_toggle_label(self.state.toggle_label());
        self.surface.set_hotkey_label(&self.state.hotkey_label());
    }
}
