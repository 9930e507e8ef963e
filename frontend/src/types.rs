//! Common types used across the frontend application.
//!
//! This module centralizes type definitions so the submitter, the
//! transport and the Leptos components agree on them.
//!
//! # Categories
//!
//! - **Attempt Types** - upload lifecycle state
//! - **View Types** - what the form renders for a given state
//! - **API Types** - wire shapes of the `/upload` exchange
//! - **Error Types** - transport failures

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Attempt Types
// =============================================================================

/// Lifecycle of a single upload attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Request sent, waiting for the server.
    InFlight,
    /// Server accepted the file.
    Succeeded,
    /// Validation, server or transport failure.
    Failed,
}

/// A file picked in the form, ready to be sent.
///
/// `F` is the platform handle: a `web_sys::File` in the browser,
/// plain bytes in tests.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedFile<F> {
    /// Original file name, sent as the multipart filename.
    pub name: String,
    /// File content handle.
    pub content: F,
}

impl<F> SelectedFile<F> {
    pub fn new(name: impl Into<String>, content: F) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }
}

/// One submission of the upload form.
///
/// Created on submit, driven Idle → InFlight → Succeeded | Failed,
/// then dropped once rendered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadAttempt {
    /// Name of the selected file, if any.
    pub file_name: Option<String>,
    /// Current state.
    pub state: RequestState,
    /// User-facing outcome text. Empty until terminal.
    pub message: String,
}

impl UploadAttempt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the request as sent.
    pub fn start(&mut self, file_name: impl Into<String>) {
        self.file_name = Some(file_name.into());
        self.state = RequestState::InFlight;
        self.message.clear();
    }

    pub fn succeed(&mut self, message: impl Into<String>) {
        self.state = RequestState::Succeeded;
        self.message = message.into();
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = RequestState::Failed;
        self.message = message.into();
    }

    /// Presentation for the current state.
    ///
    /// The busy indicator is shown iff the attempt is in flight, and the
    /// submit control is disabled for exactly that time.
    pub fn view_state(&self) -> ViewState {
        let notice = match self.state {
            RequestState::Succeeded => Some(Notice::success(&self.message)),
            RequestState::Failed => Some(Notice::error(&self.message)),
            RequestState::Idle | RequestState::InFlight => None,
        };

        ViewState {
            busy: self.state == RequestState::InFlight,
            submit_enabled: self.state != RequestState::InFlight,
            notice,
        }
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Outcome styling of a rendered message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            MessageKind::Success => "message success",
            MessageKind::Error => "message error",
        }
    }
}

/// Message shown under the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: MessageKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

/// Everything the form needs to draw itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    /// Busy indicator (spinner) visible.
    pub busy: bool,
    /// Submit button clickable.
    pub submit_enabled: bool,
    /// Current message; replaces any previous one.
    pub notice: Option<Notice>,
}

impl Default for ViewState {
    fn default() -> Self {
        UploadAttempt::default().view_state()
    }
}

// =============================================================================
// API Types
// =============================================================================

/// Raw HTTP response as seen by the submitter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// JSON body returned by `POST /upload`.
///
/// Success bodies carry `message`, failure bodies carry `error`.
/// Either may be absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Error Types
// =============================================================================

/// The request never produced an HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    /// Request or form body could not be built.
    Request(String),
    /// Connection, DNS or fetch failure.
    Network(String),
    /// No response within the configured timeout (milliseconds).
    TimedOut(u32),
    /// Response body could not be read.
    Body(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(msg) => write!(f, "Failed to build request: {}", msg),
            TransportError::Network(msg) => write!(f, "HTTP request failed: {}", msg),
            TransportError::TimedOut(ms) => write!(f, "No response after {} ms", ms),
            TransportError::Body(msg) => write!(f, "Failed to read response: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_only_while_in_flight() {
        let mut attempt = UploadAttempt::new();
        assert!(!attempt.view_state().busy);
        assert!(attempt.view_state().submit_enabled);

        attempt.start("report.xlsx");
        let view = attempt.view_state();
        assert!(view.busy);
        assert!(!view.submit_enabled);
        assert_eq!(view.notice, None);

        attempt.succeed("Imported 10 rows");
        let view = attempt.view_state();
        assert!(!view.busy);
        assert!(view.submit_enabled);
        assert_eq!(view.notice, Some(Notice::success("Imported 10 rows")));
    }

    #[test]
    fn test_failed_attempt_renders_error_style() {
        let mut attempt = UploadAttempt::new();
        attempt.fail("Invalid format");

        let notice = attempt.view_state().notice.unwrap();
        assert_eq!(notice.kind, MessageKind::Error);
        assert_eq!(notice.kind.css_class(), "message error");
        assert_eq!(attempt.state, RequestState::Failed);
    }

    #[test]
    fn test_reply_deserialization() {
        let ok: UploadReply = serde_json::from_str(r#"{"message":"Imported 10 rows"}"#).unwrap();
        assert_eq!(ok.message.as_deref(), Some("Imported 10 rows"));
        assert_eq!(ok.error, None);

        let empty: UploadReply = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, UploadReply::default());
    }

    #[test]
    fn test_success_range() {
        assert!(HttpReply::new(200, "").is_success());
        assert!(HttpReply::new(204, "").is_success());
        assert!(!HttpReply::new(302, "").is_success());
        assert!(!HttpReply::new(400, "").is_success());
        assert!(!HttpReply::new(500, "").is_success());
    }
}
