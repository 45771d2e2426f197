//! Clipboard access

use arboard::Clipboard;
use tracing::debug;

/// Errors reading or writing the clipboard
#[derive(Debug, thiserror::Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(String);

/// Text clipboard used by the translator
pub trait ClipboardAccess {
    /// Current clipboard text; empty if there is none
    fn get_text(&mut self) -> String;

    /// Replace the clipboard text
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard
pub struct SystemClipboard {
    inner: Clipboard,
}

impl SystemClipboard {
    /// Open the OS clipboard
    pub fn new() -> Result<Self, ClipboardError> {
        let inner = Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl ClipboardAccess for SystemClipboard {
    fn get_text(&mut self) -> String {
        self.inner.get_text().unwrap_or_else(|e| {
            // Non-text contents land here too
            debug!(?e, "no clipboard text");
            String::new()
        })
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| ClipboardError(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::{ClipboardAccess, ClipboardError};

    /// In-memory clipboard
    #[derive(Debug, Default)]
    pub struct FakeClipboard {
        pub text: String,
        pub writes: usize,
    }

    impl FakeClipboard {
        pub fn with_text(text: &str) -> Self {
            Self {
                text: text.to_string(),
                writes: 0,
            }
        }
    }

    impl ClipboardAccess for FakeClipboard {
        fn get_text(&mut self) -> String {
            self.text.clone()
        }

        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.text = text.to_string();
            self.writes += 1;
            Ok(())
        }
    }
}
