//! Text transformation through a hosted completion API
//!
//! A [`Mode`] turns the captured text into a prompt, a
//! [`CompletionService`] answers it, and a [`TransformSession`] applies the
//! answer to the clipboard with undo.

mod openai;
mod session;

pub use openai::{OpenAiService, DEFAULT_MODEL};
pub use session::{TransformError, TransformSession};

/// Errors from the remote completion service
#[derive(Debug, thiserror::Error)]
pub enum RemoteServiceError {
    #[error("the API key was rejected ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("the API quota or rate limit was exceeded: {0}")]
    Quota(String),

    #[error("the API returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("could not reach the API: {0}")]
    Transport(String),

    #[error("the API response contained no text")]
    EmptyResponse,
}

/// Remote service that completes a prompt
pub trait CompletionService {
    /// Send `prompt` and wait for the completion text
    fn complete(&self, prompt: &str) -> Result<String, RemoteServiceError>;
}

/// Transformations offered by the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Rewrite,
    TranslateToEnglish,
    Friendlier,
    Summarize,
}

impl Mode {
    /// All modes, in menu order
    pub const ALL: [Mode; 4] = [
        Mode::Rewrite,
        Mode::TranslateToEnglish,
        Mode::Friendlier,
        Mode::Summarize,
    ];

    /// Name shown in the mode selector
    pub fn label(self) -> &'static str {
        match self {
            Mode::Rewrite => "Rewrite",
            Mode::TranslateToEnglish => "Translate to English",
            Mode::Friendlier => "Friendlier",
            Mode::Summarize => "Summarize",
        }
    }

    /// Look up a mode by its label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == label)
    }

    /// Instruction placed before the text
    pub fn instruction(self) -> &'static str {
        match self {
            Mode::Rewrite => "Rewrite the following text with improved style and clarity without changing its meaning:",
            Mode::TranslateToEnglish => "Translate the following text into English:",
            Mode::Friendlier => "Rewrite the following text in a friendlier tone:",
            Mode::Summarize => "Summarize the following text:",
        }
    }

    /// Full prompt for `text`
    pub fn prompt(self, text: &str) -> String {
        format!("{}\n\n{}", self.instruction(), text)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Name of the language `text` is written in, or `"?"`
pub fn detect_language(text: &str) -> String {
    whatlang::detect_lang(text)
        .map(|lang| lang.eng_name().to_string())
        .unwrap_or_else(|| "?".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_layout() {
        assert_eq!(
            Mode::Summarize.prompt("hello"),
            "Summarize the following text:\n\nhello"
        );
    }

    #[test]
    fn test_labels_resolve() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_label(mode.label()), Some(mode));
        }
        assert_eq!(Mode::from_label("Shout"), None);
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(
            detect_language("This is a reasonably long English sentence about the weather today."),
            "English"
        );
        assert_eq!(detect_language(""), "?");
    }
}
