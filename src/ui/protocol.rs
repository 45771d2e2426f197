//! Dialog message protocol
//!
//! Dialog pages talk to the app with JSON messages tagged by `type`. The
//! page is seeded with a [`DialogView`] and later receives
//! [`DialogUpdate`]s.

use serde::{Deserialize, Serialize};

/// Requests from a dialog page to the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogRequest {
    /// OK/Save with the entered value
    Submit { value: String },

    /// Run the transform in the selected mode
    Run { mode: String },

    /// Restore the original text
    Undo,

    /// Cancel/close without changes
    Cancel,
}

/// What a dialog page renders when it opens
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DialogView {
    /// Single-line text entry
    Prompt {
        title: String,
        label: String,
        value: String,
    },

    /// Message with an OK button
    Notice { title: String, message: String },

    /// API key entry
    Settings { api_key: String },

    /// Transform dialog
    Process {
        language: String,
        modes: Vec<String>,
        text: String,
    },
}

impl DialogView {
    /// Window title
    pub fn title(&self) -> &str {
        match self {
            DialogView::Prompt { title, .. } | DialogView::Notice { title, .. } => title,
            DialogView::Settings { .. } => "Settings",
            DialogView::Process { .. } => "ChatGPT",
        }
    }

    /// Initial window size in logical pixels
    pub fn size(&self) -> (f64, f64) {
        match self {
            DialogView::Prompt { .. } => (420.0, 170.0),
            DialogView::Notice { .. } => (420.0, 160.0),
            DialogView::Settings { .. } => (420.0, 170.0),
            DialogView::Process { .. } => (500.0, 400.0),
        }
    }
}

/// Updates pushed to an open dialog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogUpdate {
    /// Replace the text area contents
    SetText { text: String },

    /// Show an error inside the dialog
    Error { title: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialization() {
        let req: DialogRequest =
            serde_json::from_str(r#"{"type":"submit","value":"ctrl+h, h"}"#).unwrap();
        assert_eq!(
            req,
            DialogRequest::Submit {
                value: "ctrl+h, h".to_string()
            }
        );

        let req: DialogRequest = serde_json::from_str(r#"{"type":"undo"}"#).unwrap();
        assert_eq!(req, DialogRequest::Undo);
    }

    #[test]
    fn test_unknown_request_rejected() {
        assert!(serde_json::from_str::<DialogRequest>(r#"{"type":"explode"}"#).is_err());
    }

    #[test]
    fn test_view_serialization() {
        let view = DialogView::Settings {
            api_key: "sk-test".to_string(),
        };
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains(r#""view":"settings""#));
        assert!(json.contains("sk-test"));
        assert_eq!(view.title(), "Settings");
    }

    #[test]
    fn test_update_serialization() {
        let update = DialogUpdate::Error {
            title: "Missing Key".to_string(),
            message: "Please set your API key in settings.".to_string(),
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains(r#""type":"error""#));
    }
}
