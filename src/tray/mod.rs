//! Tray controllers
//!
//! Controllers own their hotkey registry and turn hotkey firings and menu
//! clicks into state changes. They run on the UI thread only.

mod icon;
mod launcher;
mod menu;
mod translator;

pub use icon::{render_icon, tray_icon, ICON_SIZE};
pub use launcher::LauncherController;
pub use menu::{LauncherMenu, MenuCommand, TranslatorMenu};
pub use translator::TranslatorController;

use tracing::warn;

use crate::hotkey::{Action, Chord, HookFacility, HotkeyError, HotkeyRegistry};

/// UI the launcher controller drives
pub trait TraySurface {
    /// Show or hide the browser window
    fn set_window_visible(&mut self, visible: bool);

    /// Text of the Show/Hide menu item
    fn set_toggle_label(&mut self, label: &str);

    /// Text of the Set Hotkey menu item
    fn set_hotkey_label(&mut self, label: &str);
}

/// Register `preferred`, or `fallback` if the preferred chord is refused
fn register_with_fallback<H: HookFacility>(
    registry: &mut HotkeyRegistry<H>,
    preferred: &str,
    fallback: &str,
    action: Action,
) -> Result<Chord, HotkeyError> {
    match registry.register(preferred, action) {
        Ok(chord) => Ok(chord),
        Err(e) if preferred != fallback => {
            warn!(preferred, fallback, error = %e, "configured hotkey refused, using default");
            registry.register(fallback, action)
        }
        Err(e) => Err(e),
    }
}
