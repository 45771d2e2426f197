//! Launcher app: tray icon plus a hidden browser window
//!
//! The window is toggled from the tray menu, the global hotkey, or its own
//! close button. The hotkey can be changed at runtime and is persisted.

use std::collections::HashMap;
use std::time::Instant;

use anyhow::{Context, Result};
use tao::event::{Event, StartCause, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy, EventLoopWindowTarget};
use tao::window::WindowId;
use tracing::{debug, error, info, warn};
use tray_icon::menu::MenuId;

use super::{build_runtime, open_dialog, spawn_forwarders, wait_for, AppEvent};
use crate::autostart::Autostart;
use crate::config::{ConfigStore, Settings, HOTKEY};
use crate::hotkey::GlobalHook;
use crate::lifecycle::ShutdownSignal;
use crate::tray::{LauncherController, LauncherMenu, MenuCommand, TraySurface};
use crate::ui::{BrowserWindow, DialogRequest, DialogView, DialogWindow};

/// Page loaded into the browser window
const CHAT_URL: &str = "https://chatgpt.com";

/// Toggle chord used when none is configured
const DEFAULT_HOTKEY: &str = "ctrl+g, g";

/// Name of the run-at-login entry
const AUTOSTART_ENTRY: &str = "ChatGPTShortcut";

/// Browser window and tray menu driven by the controller
struct LauncherView {
    browser: BrowserWindow,
    menu: LauncherMenu,
}

impl TraySurface for LauncherView {
    fn set_window_visible(&mut self, visible: bool) {
        self.browser.set_visible(visible);
    }

    fn set_toggle_label(&mut self, label: &str) {
        self.menu.set_toggle_label(label);
    }

    fn set_hotkey_label(&mut self, label: &str) {
        self.menu.set_hotkey_label(label);
    }
}

struct Launcher {
    controller: LauncherController<GlobalHook, LauncherView>,
    autostart: Autostart,
    store: Option<ConfigStore>,
    settings: Settings,
    proxy: EventLoopProxy<AppEvent>,
    prompt: Option<DialogWindow>,
    notices: HashMap<WindowId, DialogWindow>,
}

impl Launcher {
    fn start(
        target: &EventLoopWindowTarget<AppEvent>,
        proxy: EventLoopProxy<AppEvent>,
        store: Option<ConfigStore>,
        settings: Settings,
    ) -> Result<Self> {
        let autostart = Autostart::detect(AUTOSTART_ENTRY);
        let browser = BrowserWindow::new(target, CHAT_URL)?;
        let menu = LauncherMenu::build(&autostart)?;
        let hook = GlobalHook::new().context("global hotkeys unavailable")?;

        let preferred = settings.hotkey().unwrap_or(DEFAULT_HOTKEY).to_string();
        let controller = LauncherController::start(
            hook,
            LauncherView { browser, menu },
            &preferred,
            DEFAULT_HOTKEY,
        )
        .context("failed to register toggle hotkey")?;

        Ok(Self {
            controller,
            autostart,
            store,
            settings,
            proxy,
            prompt: None,
            notices: HashMap::new(),
        })
    }

    /// Returns false when the app should exit
    fn on_menu(&mut self, id: &MenuId, target: &EventLoopWindowTarget<AppEvent>) -> bool {
        let Some(command) = self.controller.surface().menu.command(id) else {
            return true;
        };
        debug!(?command, "menu command");

        match command {
            MenuCommand::Toggle => {
                self.controller.toggle();
            }
            MenuCommand::SetHotkey => self.open_prompt(target),
            MenuCommand::Autostart => self.apply_autostart(),
            MenuCommand::Quit => return false,
            MenuCommand::Settings => {}
        }
        true
    }

    fn open_prompt(&mut self, target: &EventLoopWindowTarget<AppEvent>) {
        if self.prompt.is_some() {
            debug!("hotkey prompt already open");
            return;
        }
        let view = DialogView::Prompt {
            title: "Set Hotkey".to_string(),
            label: "Enter new hotkey (e.g., ctrl+g, g):".to_string(),
            value: self.controller.hotkey().to_string(),
        };
        match open_dialog(target, &self.proxy, &view) {
            Ok(dialog) => self.prompt = Some(dialog),
            Err(e) => error!(error = %e, "failed to open hotkey prompt"),
        }
    }

    fn apply_autostart(&mut self) {
        let menu = &self.controller.surface().menu;
        // The check item has already flipped itself
        let wanted = menu.autostart_checked();
        if let Err(e) = self.autostart.set_enabled(wanted) {
            warn!(error = %e, wanted, "failed to change autostart");
            menu.set_autostart_checked(!wanted);
        }
    }

    fn on_dialog(
        &mut self,
        window: WindowId,
        request: DialogRequest,
        target: &EventLoopWindowTarget<AppEvent>,
    ) {
        if self.notices.remove(&window).is_some() {
            return;
        }
        if self.prompt.as_ref().map(DialogWindow::id) != Some(window) {
            debug!(?window, "request from unknown dialog");
            return;
        }

        match request {
            DialogRequest::Submit { value } => {
                self.prompt = None;
                if value.trim().is_empty() {
                    return;
                }
                self.change_hotkey(&value, target);
            }
            DialogRequest::Cancel => self.prompt = None,
            other => debug!(?other, "ignored prompt request"),
        }
    }

    fn change_hotkey(&mut self, text: &str, target: &EventLoopWindowTarget<AppEvent>) {
        match self.controller.change_hotkey(text) {
            Ok(_) => self.persist_hotkey(),
            Err(e) => {
                let view = DialogView::Notice {
                    title: "Invalid Hotkey".to_string(),
                    message: e.to_string(),
                };
                match open_dialog(target, &self.proxy, &view) {
                    Ok(dialog) => {
                        self.notices.insert(dialog.id(), dialog);
                    }
                    Err(e) => error!(error = %e, "failed to open notice"),
                }
            }
        }
    }

    fn persist_hotkey(&mut self) {
        self.settings
            .set_str(HOTKEY, self.controller.hotkey().to_string());
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.settings) {
                warn!(error = %e, "failed to save hotkey");
            }
        }
    }

    fn on_close(&mut self, window: WindowId) {
        if window == self.controller.surface().browser.id() {
            self.controller.close_window();
        } else if self.prompt.as_ref().map(DialogWindow::id) == Some(window) {
            self.prompt = None;
        } else {
            self.notices.remove(&window);
        }
    }
}

/// Run the launcher until Quit or a shutdown signal
pub fn run() -> Result<()> {
    let runtime = build_runtime()?;
    let event_loop = EventLoopBuilder::<AppEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();
    spawn_forwarders(&proxy)?;

    let signal_proxy = proxy.clone();
    ShutdownSignal::new().spawn(runtime.handle(), move || {
        let _ = signal_proxy.send_event(AppEvent::Quit);
    });

    let mut store = match ConfigStore::for_app("launcher") {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = %e, "hotkey changes will not be saved");
            None
        }
    };
    let mut settings = store.as_ref().map(ConfigStore::load);
    let mut proxy = Some(proxy);
    let mut app: Option<Launcher> = None;

    event_loop.run(move |event, target, control_flow| {
        // Keeps the signal task alive for the life of the loop
        let _runtime = &runtime;

        let keep_running = match event {
            Event::NewEvents(StartCause::Init) => {
                let Some(proxy) = proxy.take() else { return };
                match Launcher::start(
                    target,
                    proxy,
                    store.take(),
                    settings.take().unwrap_or_default(),
                ) {
                    Ok(launcher) => {
                        app = Some(launcher);
                        true
                    }
                    Err(e) => {
                        error!(error = ?e, "launcher failed to start");
                        false
                    }
                }
            }
            Event::UserEvent(user_event) => match (&mut app, user_event) {
                (_, AppEvent::Quit) => false,
                (Some(launcher), AppEvent::Hotkey(event)) => {
                    launcher.controller.handle_hotkey(&event);
                    true
                }
                (Some(launcher), AppEvent::Menu(id)) => launcher.on_menu(&id, target),
                (Some(launcher), AppEvent::Dialog { window, request }) => {
                    launcher.on_dialog(window, request, target);
                    true
                }
                (None, _) => true,
            },
            Event::WindowEvent {
                window_id,
                event: WindowEvent::CloseRequested,
                ..
            } => {
                if let Some(launcher) = &mut app {
                    launcher.on_close(window_id);
                }
                true
            }
            Event::LoopDestroyed => {
                if let Some(launcher) = &mut app {
                    launcher.controller.shutdown();
                }
                return;
            }
            _ => true,
        };

        match &mut app {
            Some(launcher) if keep_running => {
                launcher.controller.expire(Instant::now());
                *control_flow = wait_for(launcher.controller.next_deadline());
            }
            Some(launcher) => {
                launcher.controller.shutdown();
                info!("launcher exiting");
                *control_flow = ControlFlow::Exit;
            }
            None if keep_running => *control_flow = ControlFlow::Wait,
            None => *control_flow = ControlFlow::Exit,
        }
    })
}
