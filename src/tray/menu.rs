//! Tray icons and their context menus

use anyhow::{Context, Result};
use tray_icon::menu::{CheckMenuItem, Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{TrayIcon, TrayIconBuilder};

use super::icon::tray_icon;
use crate::autostart::Autostart;

/// Tooltip of the launcher tray icon
const LAUNCHER_TOOLTIP: &str = "ChatGPT Shortcut";

/// Tooltip of the translator tray icon
const TRANSLATOR_TOOLTIP: &str = "ChatGPT Translator";

/// A menu entry the user clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    /// Show/Hide the browser window
    Toggle,
    /// Prompt for a new hotkey
    SetHotkey,
    /// Start-with-OS check item
    Autostart,
    /// Open the settings dialog
    Settings,
    /// Exit the app
    Quit,
}

fn build_tray(menu: Menu, letter: char, tooltip: &str) -> Result<TrayIcon> {
    let icon = tray_icon(letter).context("failed to build tray icon image")?;
    TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip(tooltip)
        .with_icon(icon)
        .build()
        .context("failed to create tray icon")
}

/// Launcher tray: Show/Hide, Set Hotkey, Start with OS, Quit
pub struct LauncherMenu {
    _tray: TrayIcon,
    toggle: MenuItem,
    hotkey: MenuItem,
    autostart: CheckMenuItem,
    quit: MenuItem,
}

impl LauncherMenu {
    /// Create the tray icon; labels are filled in by the controller
    pub fn build(autostart: &Autostart) -> Result<Self> {
        let menu = Menu::new();
        let toggle = MenuItem::new("Show", true, None);
        let hotkey = MenuItem::new("Set Hotkey", true, None);
        let autostart_item = CheckMenuItem::new(
            autostart.label(),
            autostart.is_supported(),
            autostart.is_enabled(),
            None,
        );
        let quit = MenuItem::new("Quit", true, None);

        menu.append(&toggle)?;
        menu.append(&hotkey)?;
        menu.append(&autostart_item)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&quit)?;

        Ok(Self {
            _tray: build_tray(menu, 'G', LAUNCHER_TOOLTIP)?,
            toggle,
            hotkey,
            autostart: autostart_item,
            quit,
        })
    }

    /// Resolve a clicked menu id
    pub fn command(&self, id: &MenuId) -> Option<MenuCommand> {
        if id == self.toggle.id() {
            Some(MenuCommand::Toggle)
        } else if id == self.hotkey.id() {
            Some(MenuCommand::SetHotkey)
        } else if id == self.autostart.id() {
            Some(MenuCommand::Autostart)
        } else if id == self.quit.id() {
            Some(MenuCommand::Quit)
        } else {
            None
        }
    }

    /// Set the Show/Hide text
    pub fn set_toggle_label(&self, label: &str) {
        self.toggle.set_text(label);
    }

    /// Set the Set Hotkey text
    pub fn set_hotkey_label(&self, label: &str) {
        self.hotkey.set_text(label);
    }

    /// Whether the Start-with-OS item is checked
    pub fn autostart_checked(&self) -> bool {
        self.autostart.is_checked()
    }

    /// Force the Start-with-OS check state
    pub fn set_autostart_checked(&self, checked: bool) {
        self.autostart.set_checked(checked);
    }
}

/// Translator tray: Settings, Quit
pub struct TranslatorMenu {
    _tray: TrayIcon,
    settings: MenuItem,
    quit: MenuItem,
}

impl TranslatorMenu {
    /// Create the tray icon
    pub fn build() -> Result<Self> {
        let menu = Menu::new();
        let settings = MenuItem::new("Settings", true, None);
        let quit = MenuItem::new("Quit", true, None);

        menu.append(&settings)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&quit)?;

        Ok(Self {
            _tray: build_tray(menu, 'T', TRANSLATOR_TOOLTIP)?,
            settings,
            quit,
        })
    }

    /// Resolve a clicked menu id
    pub fn command(&self, id: &MenuId) -> Option<MenuCommand> {
        if id == self.settings.id() {
            Some(MenuCommand::Settings)
        } else if id == self.quit.id() {
            Some(MenuCommand::Quit)
        } else {
            None
        }
    }
}
