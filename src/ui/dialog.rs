//! HTML dialogs
//!
//! Every dialog is the same page rendering a different [`DialogView`].
//! Requests posted by the page are parsed here and handed to a callback
//! tagged with the dialog's window id.

use anyhow::{Context, Result};
use tao::dpi::LogicalSize;
use tao::event_loop::EventLoopWindowTarget;
use tao::window::{Window, WindowBuilder, WindowId};
use tracing::{debug, warn};
use wry::http::Request;
use wry::{WebView, WebViewBuilder};

use super::build_webview;
use super::protocol::{DialogRequest, DialogUpdate, DialogView};

const DIALOG_HTML: &str = include_str!("../../assets/dialog.html");

/// An open dialog window
pub struct DialogWindow {
    window: Window,
    webview: WebView,
}

impl DialogWindow {
    /// Open a dialog showing `view`
    pub fn open<T, F>(
        target: &EventLoopWindowTarget<T>,
        view: &DialogView,
        on_request: F,
    ) -> Result<Self>
    where
        T: 'static,
        F: Fn(WindowId, DialogRequest) + 'static,
    {
        let (width, height) = view.size();
        let window = WindowBuilder::new()
            .with_title(view.title())
            .with_inner_size(LogicalSize::new(width, height))
            .with_resizable(matches!(view, DialogView::Process { .. }))
            .build(target)
            .context("failed to create dialog window")?;
        let id = window.id();

        let seed = serde_json::to_string(view).context("failed to encode dialog view")?;
        let builder = WebViewBuilder::new()
            .with_html(DIALOG_HTML)
            .with_initialization_script(&format!("window.__DIALOG__ = {};", seed))
            .with_ipc_handler(move |req: Request<String>| {
                match serde_json::from_str::<DialogRequest>(req.body()) {
                    Ok(request) => on_request(id, request),
                    Err(e) => warn!(?e, body = %req.body(), "malformed dialog request"),
                }
            });
        let webview = build_webview(&window, builder)?;

        debug!(title = view.title(), "dialog opened");
        Ok(Self { window, webview })
    }

    /// Id used to route requests and window events
    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    /// Push an update to the page
    pub fn update(&self, update: &DialogUpdate) {
        let payload = match serde_json::to_string(update) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(?e, "failed to encode dialog update");
                return;
            }
        };
        if let Err(e) = self
            .webview
            .evaluate_script(&format!("window.__dialogUpdate({});", payload))
        {
            warn!(?e, "failed to update dialog");
        }
    }
}
