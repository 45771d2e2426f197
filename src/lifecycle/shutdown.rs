//! Signal handling for graceful shutdown
//!
//! A signal takes the same path as the Quit menu item, so hotkeys are
//! always unregistered before the process exits.

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Handles shutdown signals (SIGTERM, SIGINT / Ctrl-C)
pub struct ShutdownSignal;

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self
    }

    /// Wait for a shutdown signal
    pub async fn wait(&self) {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    warn!(?e, "failed to register SIGTERM handler");
                    return self.wait_ctrl_c().await;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => {
                    debug!("received SIGTERM");
                }
                _ = self.wait_ctrl_c() => {}
            }
        }

        #[cfg(not(unix))]
        self.wait_ctrl_c().await;
    }

    async fn wait_ctrl_c(&self) {
        match tokio::signal::ctrl_c().await {
            Ok(()) => debug!("received SIGINT"),
            Err(e) => {
                // Without a handler, never resolve rather than quit at once
                warn!(?e, "failed to register SIGINT handler");
                std::future::pending::<()>().await;
            }
        }
    }

    /// Run `on_signal` on `runtime` once a signal arrives
    pub fn spawn<F>(self, runtime: &Handle, on_signal: F)
    where
        F: FnOnce() + Send + 'static,
    {
        runtime.spawn(async move {
            self.wait().await;
            info!("shutdown signal received");
            on_signal();
        });
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
