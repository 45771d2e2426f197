//! Event-loop wiring for the two tray apps
//!
//! Hotkey and menu events arrive on library threads and are forwarded into
//! the tao event loop as [`AppEvent`]s, so every state change happens on
//! the UI thread.

pub mod launcher;
pub mod translator;

use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use global_hotkey::GlobalHotKeyEvent;
use tao::event_loop::{ControlFlow, EventLoopProxy, EventLoopWindowTarget};
use tao::window::WindowId;
use tokio::runtime::Runtime;
use tray_icon::menu::{MenuEvent, MenuId};
use tracing::debug;

use crate::ui::{DialogRequest, DialogView, DialogWindow};

/// Events delivered to the UI thread
#[derive(Debug)]
pub enum AppEvent {
    /// Raw press/release from the global hotkey hook
    Hotkey(GlobalHotKeyEvent),
    /// Tray menu item clicked
    Menu(MenuId),
    /// Request posted by a dialog page
    Dialog {
        window: WindowId,
        request: DialogRequest,
    },
    /// Signal or other request to exit
    Quit,
}

/// Forward hotkey and menu events into the event loop
fn spawn_forwarders(proxy: &EventLoopProxy<AppEvent>) -> Result<()> {
    let hotkey_proxy = proxy.clone();
    thread::Builder::new()
        .name("hotkey-forwarder".to_string())
        .spawn(move || {
            let rx = GlobalHotKeyEvent::receiver();
            while let Ok(event) = rx.recv() {
                if hotkey_proxy.send_event(AppEvent::Hotkey(event)).is_err() {
                    break;
                }
            }
            debug!("hotkey forwarder stopped");
        })
        .context("failed to spawn hotkey forwarder")?;

    let menu_proxy = proxy.clone();
    thread::Builder::new()
        .name("menu-forwarder".to_string())
        .spawn(move || {
            let rx = MenuEvent::receiver();
            while let Ok(event) = rx.recv() {
                if menu_proxy.send_event(AppEvent::Menu(event.id)).is_err() {
                    break;
                }
            }
            debug!("menu forwarder stopped");
        })
        .context("failed to spawn menu forwarder")?;

    Ok(())
}

/// Runtime for signal handling and HTTP requests
fn build_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("chat-tray-rt")
        .enable_all()
        .build()
        .context("failed to start tokio runtime")
}

/// Open a dialog whose requests come back as [`AppEvent::Dialog`]
fn open_dialog(
    target: &EventLoopWindowTarget<AppEvent>,
    proxy: &EventLoopProxy<AppEvent>,
    view: &DialogView,
) -> Result<DialogWindow> {
    let proxy = proxy.clone();
    DialogWindow::open(target, view, move |window, request| {
        let _ = proxy.send_event(AppEvent::Dialog { window, request });
    })
}

/// Sleep until the next hotkey-sequence deadline, if any
fn wait_for(deadline: Option<Instant>) -> ControlFlow {
    match deadline {
        Some(deadline) => ControlFlow::WaitUntil(deadline),
        None => ControlFlow::Wait,
    }
}
