//! Windows: the embedded browser and HTML dialogs

mod browser;
mod dialog;
mod protocol;

pub use browser::BrowserWindow;
pub use dialog::DialogWindow;
pub use protocol::{DialogRequest, DialogUpdate, DialogView};

use anyhow::{Context, Result};
use tao::window::Window;
use wry::{WebView, WebViewBuilder};

/// Attach a webview to a tao window
fn build_webview(window: &Window, builder: WebViewBuilder<'_>) -> Result<WebView> {
    #[cfg(target_os = "linux")]
    {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;

        let vbox = window
            .default_vbox()
            .context("window has no GTK container")?;
        builder.build_gtk(vbox).context("failed to create webview")
    }

    #[cfg(not(target_os = "linux"))]
    {
        builder.build(window).context("failed to create webview")
    }
}
