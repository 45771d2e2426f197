//! Translator app: clipboard hotkey opens a transform dialog
//!
//! Each hotkey press with text on the clipboard opens its own dialog. Runs
//! send the original text to the completion API and put the result back on
//! the clipboard; undo restores the original.

use std::collections::HashMap;
use std::time::Instant;

use anyhow::{Context, Result};
use tao::event::{Event, StartCause, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy, EventLoopWindowTarget};
use tao::window::WindowId;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};
use tray_icon::menu::MenuId;

use super::{build_runtime, open_dialog, spawn_forwarders, wait_for, AppEvent};
use crate::clipboard::SystemClipboard;
use crate::config::{ConfigStore, Settings, API_KEY, MODEL};
use crate::hotkey::GlobalHook;
use crate::lifecycle::ShutdownSignal;
use crate::transform::{Mode, OpenAiService, TransformError, TransformSession, DEFAULT_MODEL};
use crate::tray::{MenuCommand, TranslatorController, TranslatorMenu};
use crate::ui::{DialogRequest, DialogUpdate, DialogView, DialogWindow};

/// Clipboard chord used when none is configured
const DEFAULT_HOTKEY: &str = "ctrl+c, c";

struct Translator {
    controller: TranslatorController<GlobalHook>,
    menu: TranslatorMenu,
    clipboard: SystemClipboard,
    store: Option<ConfigStore>,
    settings: Settings,
    runtime: Handle,
    proxy: EventLoopProxy<AppEvent>,
    settings_dialog: Option<DialogWindow>,
    sessions: HashMap<WindowId, (DialogWindow, TransformSession)>,
}

impl Translator {
    fn start(
        proxy: EventLoopProxy<AppEvent>,
        runtime: Handle,
        store: Option<ConfigStore>,
        settings: Settings,
    ) -> Result<Self> {
        let menu = TranslatorMenu::build()?;
        let clipboard = SystemClipboard::new().context("clipboard unavailable")?;
        let hook = GlobalHook::new().context("global hotkeys unavailable")?;

        let preferred = settings.hotkey().unwrap_or(DEFAULT_HOTKEY).to_string();
        let controller = TranslatorController::start(hook, &preferred, DEFAULT_HOTKEY)
            .context("failed to register clipboard hotkey")?;

        Ok(Self {
            controller,
            menu,
            clipboard,
            store,
            settings,
            runtime,
            proxy,
            settings_dialog: None,
            sessions: HashMap::new(),
        })
    }

    fn on_hotkey(
        &mut self,
        event: &global_hotkey::GlobalHotKeyEvent,
        target: &EventLoopWindowTarget<AppEvent>,
    ) {
        let Some(session) = self.controller.handle_hotkey(event, &mut self.clipboard) else {
            return;
        };
        let view = DialogView::Process {
            language: session.language().to_string(),
            modes: Mode::ALL.iter().map(|m| m.label().to_string()).collect(),
            text: session.original().to_string(),
        };
        match open_dialog(target, &self.proxy, &view) {
            Ok(dialog) => {
                self.sessions.insert(dialog.id(), (dialog, session));
            }
            Err(e) => error!(error = %e, "failed to open transform dialog"),
        }
    }

    /// Returns false when the app should exit
    fn on_menu(&mut self, id: &MenuId, target: &EventLoopWindowTarget<AppEvent>) -> bool {
        match self.menu.command(id) {
            Some(MenuCommand::Settings) => self.open_settings(target),
            Some(MenuCommand::Quit) => return false,
            Some(other) => debug!(?other, "menu command not handled by translator"),
            None => {}
        }
        true
    }

    fn open_settings(&mut self, target: &EventLoopWindowTarget<AppEvent>) {
        if self.settings_dialog.is_some() {
            debug!("settings already open");
            return;
        }
        let view = DialogView::Settings {
            api_key: self.settings.api_key().to_string(),
        };
        match open_dialog(target, &self.proxy, &view) {
            Ok(dialog) => self.settings_dialog = Some(dialog),
            Err(e) => error!(error = %e, "failed to open settings"),
        }
    }

    fn on_dialog(&mut self, window: WindowId, request: DialogRequest) {
        if self.settings_dialog.as_ref().map(DialogWindow::id) == Some(window) {
            self.on_settings_request(request);
        } else if self.sessions.contains_key(&window) {
            self.on_session_request(window, request);
        } else {
            debug!(?window, "request from unknown dialog");
        }
    }

    fn on_settings_request(&mut self, request: DialogRequest) {
        match request {
            DialogRequest::Submit { value } => {
                self.settings.set_str(API_KEY, value.trim());
                if let Some(store) = &self.store {
                    if let Err(e) = store.save(&self.settings) {
                        warn!(error = %e, "failed to save settings");
                    }
                }
                info!("settings updated");
                self.settings_dialog = None;
            }
            DialogRequest::Cancel => self.settings_dialog = None,
            other => debug!(?other, "ignored settings request"),
        }
    }

    fn on_session_request(&mut self, window: WindowId, request: DialogRequest) {
        let outcome = match request {
            DialogRequest::Run { mode } => {
                let Some(mode) = Mode::from_label(&mode) else {
                    warn!(%mode, "unknown transform mode");
                    return;
                };
                let service = self.service();
                let Some((_, session)) = self.sessions.get_mut(&window) else {
                    return;
                };
                match service {
                    Ok(service) => session.run(mode, &service, &mut self.clipboard),
                    Err(e) => Err(e),
                }
            }
            DialogRequest::Undo => {
                let Some((_, session)) = self.sessions.get_mut(&window) else {
                    return;
                };
                session.undo(&mut self.clipboard)
            }
            DialogRequest::Cancel => {
                self.sessions.remove(&window);
                return;
            }
            DialogRequest::Submit { .. } => return,
        };

        let Some((dialog, session)) = self.sessions.get(&window) else {
            return;
        };
        let update = match outcome {
            Ok(event) => {
                debug!(%event, "dialog updated");
                DialogUpdate::SetText {
                    text: session.current().to_string(),
                }
            }
            Err(e) => {
                warn!(error = %e, "transform failed");
                DialogUpdate::Error {
                    title: e.title().to_string(),
                    message: e.to_string(),
                }
            }
        };
        dialog.update(&update);
    }

    /// Completion client for the configured key and model
    fn service(&self) -> Result<OpenAiService, TransformError> {
        let api_key = self.settings.api_key();
        if api_key.is_empty() {
            return Err(TransformError::MissingApiKey);
        }
        let model = self.settings.get_str(MODEL).unwrap_or(DEFAULT_MODEL);
        Ok(OpenAiService::new(self.runtime.clone(), api_key, model)?)
    }

    fn on_close(&mut self, window: WindowId) {
        if self.settings_dialog.as_ref().map(DialogWindow::id) == Some(window) {
            self.settings_dialog = None;
        } else {
            self.sessions.remove(&window);
        }
    }
}

/// Run the translator until Quit or a shutdown signal
pub fn run() -> Result<()> {
    let runtime = build_runtime()?;
    let event_loop = EventLoopBuilder::<AppEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();
    spawn_forwarders(&proxy)?;

    let signal_proxy = proxy.clone();
    ShutdownSignal::new().spawn(runtime.handle(), move || {
        let _ = signal_proxy.send_event(AppEvent::Quit);
    });

    let mut store = match ConfigStore::for_app("translator") {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = %e, "settings will not be saved");
            None
        }
    };
    let mut settings = store.as_ref().map(ConfigStore::load);
    let mut proxy = Some(proxy);
    let mut app: Option<Translator> = None;

    event_loop.run(move |event, target, control_flow| {
        let keep_running = match event {
            Event::NewEvents(StartCause::Init) => {
                let Some(proxy) = proxy.take() else { return };
                match Translator::start(
                    proxy,
                    runtime.handle().clone(),
                    store.take(),
                    settings.take().unwrap_or_default(),
                ) {
                    Ok(translator) => {
                        app = Some(translator);
                        true
                    }
                    Err(e) => {
                        error!(error = ?e, "translator failed to start");
                        false
                    }
                }
            }
            Event::UserEvent(user_event) => match (&mut app, user_event) {
                (_, AppEvent::Quit) => false,
                (Some(translator), AppEvent::Hotkey(event)) => {
                    translator.on_hotkey(&event, target);
                    true
                }
                (Some(translator), AppEvent::Menu(id)) => translator.on_menu(&id, target),
                (Some(translator), AppEvent::Dialog { window, request }) => {
                    translator.on_dialog(window, request);
                    true
                }
                (None, _) => true,
            },
            Event::WindowEvent {
                window_id,
                event: WindowEvent::CloseRequested,
                ..
            } => {
                if let Some(translator) = &mut app {
                    translator.on_close(window_id);
                }
                true
            }
            Event::LoopDestroyed => {
                if let Some(translator) = &mut app {
                    translator.controller.shutdown();
                }
                return;
            }
            _ => true,
        };

        match &mut app {
            Some(translator) if keep_running => {
                translator.controller.expire(Instant::now());
                *control_flow = wait_for(translator.controller.next_deadline());
            }
            Some(translator) => {
                translator.controller.shutdown();
                info!("translator exiting");
                *control_flow = ControlFlow::Exit;
            }
            None if keep_running => *control_flow = ControlFlow::Wait,
            None => *control_flow = ControlFlow::Exit,
        }
    })
}
