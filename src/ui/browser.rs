//! Launcher browser window

use anyhow::{Context, Result};
use tao::dpi::LogicalSize;
use tao::event_loop::EventLoopWindowTarget;
use tao::window::{Window, WindowBuilder, WindowId};
use wry::{WebView, WebViewBuilder};

use super::build_webview;

/// Window title
const TITLE: &str = "ChatGPT Shortcut";

/// Page background shown while the site loads
const BACKGROUND: (u8, u8, u8, u8) = (0x20, 0x21, 0x24, 0xff);

/// Hidden-until-toggled window with an embedded browser
pub struct BrowserWindow {
    window: Window,
    _webview: WebView,
}

impl BrowserWindow {
    /// Create the window, initially hidden, loading `url`
    pub fn new<T: 'static>(target: &EventLoopWindowTarget<T>, url: &str) -> Result<Self> {
        let window = WindowBuilder::new()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(1024.0, 768.0))
            .with_visible(false)
            .build(target)
            .context("failed to create browser window")?;

        let builder = WebViewBuilder::new()
            .with_url(url)
            .with_background_color(BACKGROUND);
        let webview = build_webview(&window, builder)?;

        Ok(Self {
            window,
            _webview: webview,
        })
    }

    /// Id used to match window events
    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    /// Show (and focus) or hide the window
    pub fn set_visible(&self, visible: bool) {
        self.window.set_visible(visible);
        if visible {
            self.window.set_focus();
        }
    }
}
