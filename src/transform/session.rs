//! One transform dialog's worth of state
//!
//! The session remembers the captured text so every run starts from the
//! original and undo can always restore it.

use tracing::info;

use super::{detect_language, CompletionService, Mode, RemoteServiceError};
use crate::clipboard::{ClipboardAccess, ClipboardError};
use crate::events::StateEvent;

/// Errors from running a transformation
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Please set your API key in settings.")]
    MissingApiKey,

    #[error(transparent)]
    Remote(#[from] RemoteServiceError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

impl TransformError {
    /// Title for the dialog reporting this error
    pub fn title(&self) -> &'static str {
        match self {
            TransformError::MissingApiKey => "Missing Key",
            TransformError::Remote(_) | TransformError::Clipboard(_) => "Error",
        }
    }
}

/// Captured clipboard text and the latest result
#[derive(Debug, Clone)]
pub struct TransformSession {
    original: String,
    current: String,
    language: String,
}

impl TransformSession {
    /// Start a session for text taken from the clipboard
    pub fn new(original: impl Into<String>) -> Self {
        let original = original.into();
        let language = detect_language(&original);
        Self {
            current: original.clone(),
            original,
            language,
        }
    }

    /// Text the session started with
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Text currently shown in the dialog
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Detected language of the original text
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Transform the original text and put the result on the clipboard
    ///
    /// On failure the clipboard and the shown text are unchanged.
    pub fn run<S, C>(
        &mut self,
        mode: Mode,
        service: &S,
        clipboard: &mut C,
    ) -> Result<StateEvent, TransformError>
    where
        S: CompletionService + ?Sized,
        C: ClipboardAccess + ?Sized,
    {
        let result = service.complete(&mode.prompt(&self.original))?;
        clipboard.set_text(&result)?;
        self.current = result;

        let event = StateEvent::TransformApplied {
            mode: mode.label().to_string(),
            chars: self.current.chars().count(),
        };
        info!(%event, "transform applied");
        Ok(event)
    }

    /// Put the original text back on the clipboard
    pub fn undo<C>(&mut self, clipboard: &mut C) -> Result<StateEvent, TransformError>
    where
        C: ClipboardAccess + ?Sized,
    {
        clipboard.set_text(&self.original)?;
        self.current = self.original.clone();
        info!(event = %StateEvent::TransformUndone, "transform undone");
        Ok(StateEvent::TransformUndone)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::clipboard::fake::FakeClipboard;

    /// Service returning a canned reply and recording prompts
    struct FakeService {
        reply: Result<String, u16>,
        prompts: RefCell<Vec<String>>,
    }

    impl FakeService {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: RefCell::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl CompletionService for FakeService {
        fn complete(&self, prompt: &str) -> Result<String, RemoteServiceError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.reply.clone().map_err(|status| RemoteServiceError::Http {
                status,
                message: "boom".to_string(),
            })
        }
    }

    #[test]
    fn test_run_replaces_clipboard() {
        let service = FakeService::ok("Bonjour");
        let mut clipboard = FakeClipboard::with_text("Hello");
        let mut session = TransformSession::new(clipboard.text.clone());

        let event = session
            .run(Mode::TranslateToEnglish, &service, &mut clipboard)
            .unwrap();

        assert_eq!(clipboard.text, "Bonjour");
        assert_eq!(session.current(), "Bonjour");
        assert_eq!(
            event,
            StateEvent::TransformApplied {
                mode: "Translate to English".to_string(),
                chars: 7,
            }
        );
        assert_eq!(
            service.prompts.borrow()[0],
            "Translate the following text into English:\n\nHello"
        );
    }

    #[test]
    fn test_failure_leaves_clipboard() {
        let service = FakeService::failing(500);
        let mut clipboard = FakeClipboard::with_text("Hello");
        let mut session = TransformSession::new("Hello");

        let err = session.run(Mode::Rewrite, &service, &mut clipboard).unwrap_err();

        assert!(matches!(err, TransformError::Remote(_)));
        assert_eq!(err.title(), "Error");
        assert_eq!(clipboard.text, "Hello");
        assert_eq!(clipboard.writes, 0);
        assert_eq!(session.current(), "Hello");
    }

    #[test]
    fn test_runs_always_start_from_original() {
        let service = FakeService::ok("shorter");
        let mut clipboard = FakeClipboard::with_text("original text");
        let mut session = TransformSession::new("original text");

        session.run(Mode::Summarize, &service, &mut clipboard).unwrap();
        session.run(Mode::Friendlier, &service, &mut clipboard).unwrap();

        let prompts = service.prompts.borrow();
        assert!(prompts[1].ends_with("\n\noriginal text"));
    }

    #[test]
    fn test_undo_restores_original() {
        let service = FakeService::ok("rewritten");
        let mut clipboard = FakeClipboard::with_text("draft");
        let mut session = TransformSession::new("draft");

        session.run(Mode::Rewrite, &service, &mut clipboard).unwrap();
        assert_eq!(session.undo(&mut clipboard).unwrap(), StateEvent::TransformUndone);

        assert_eq!(clipboard.text, "draft");
        assert_eq!(session.current(), "draft");
    }

    #[test]
    fn test_missing_key_title() {
        assert_eq!(TransformError::MissingApiKey.title(), "Missing Key");
        assert_eq!(
            TransformError::MissingApiKey.to_string(),
            "Please set your API key in settings."
        );
    }
}
