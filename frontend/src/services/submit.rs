//! Upload form submission logic.
//!
//! [`UploadSubmitter`] owns the whole submit sequence: read the selected
//! file, send it as the `file` part of `POST /upload`, interpret the reply
//! and render the outcome. The file input, the HTTP transport and the view
//! are injected, so the same logic drives the Leptos form and the tests.

use async_trait::async_trait;
use std::cell::Cell;

use crate::config::{
    MSG_CONNECTION_ERROR, MSG_NO_FILE, MSG_UPLOAD_DONE, MSG_UPLOAD_FAILED, UPLOAD_FIELD,
    UPLOAD_PATH,
};
use crate::types::{
    HttpReply, RequestState, SelectedFile, TransportError, UploadAttempt, UploadReply, ViewState,
};

// =============================================================================
// Seams
// =============================================================================

/// Source of the file picked by the user.
pub trait FileInput {
    type File;

    /// First selected file, `None` if nothing is selected.
    fn selected_file(&self) -> Option<SelectedFile<Self::File>>;
}

/// Sends one multipart upload.
#[async_trait(?Send)]
pub trait UploadTransport {
    type File;

    /// POST `file` as the single multipart part `field` to `path`.
    ///
    /// Any HTTP status is a reply; only a request that never got a
    /// response is an error.
    async fn post_file(
        &self,
        path: &str,
        field: &str,
        file: SelectedFile<Self::File>,
    ) -> Result<HttpReply, TransportError>;
}

/// Draws the form for a given state.
pub trait UploadView {
    fn render(&self, state: &ViewState);
}

// =============================================================================
// Configuration
// =============================================================================

/// User-facing texts for outcomes that have no server-provided message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadMessages {
    pub no_file: String,
    pub upload_failed: String,
    pub connection_error: String,
    pub upload_done: String,
}

impl Default for UploadMessages {
    fn default() -> Self {
        Self {
            no_file: MSG_NO_FILE.to_string(),
            upload_failed: MSG_UPLOAD_FAILED.to_string(),
            connection_error: MSG_CONNECTION_ERROR.to_string(),
            upload_done: MSG_UPLOAD_DONE.to_string(),
        }
    }
}

impl UploadMessages {
    /// Spanish texts for the statement importer page.
    pub fn spanish() -> Self {
        Self {
            no_file: "Por favor, selecciona un archivo .xlsx".to_string(),
            upload_failed: "Error al subir el archivo".to_string(),
            connection_error: "Error de conexión con el servidor".to_string(),
            upload_done: "Archivo subido".to_string(),
        }
    }
}

/// Where and how the submitter uploads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitConfig {
    /// Endpoint path, `/upload` by default.
    pub endpoint: String,
    /// Multipart field name, `file` by default.
    pub field_name: String,
    pub messages: UploadMessages,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            endpoint: UPLOAD_PATH.to_string(),
            field_name: UPLOAD_FIELD.to_string(),
            messages: UploadMessages::default(),
        }
    }
}

// =============================================================================
// Submitter
// =============================================================================

/// Drives one upload form.
///
/// At most one attempt is in flight per submitter: a submit that arrives
/// while a request is pending is ignored. Separate forms get separate
/// submitters and share nothing.
pub struct UploadSubmitter<I, T, V> {
    input: I,
    transport: T,
    view: V,
    config: SubmitConfig,
    in_flight: Cell<bool>,
}

impl<I, T, V> UploadSubmitter<I, T, V>
where
    I: FileInput,
    T: UploadTransport<File = I::File>,
    V: UploadView,
{
    pub fn new(input: I, transport: T, view: V) -> Self {
        Self {
            input,
            transport,
            view,
            config: SubmitConfig::default(),
            in_flight: Cell::new(false),
        }
    }

    pub fn with_config(mut self, config: SubmitConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether a request is currently pending.
    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    /// Run one submission to completion.
    ///
    /// Returns the finished attempt, or `None` when the submission was
    /// dropped because another one is still in flight. Every returned
    /// attempt has been rendered in its terminal state.
    pub async fn submit(&self) -> Option<UploadAttempt> {
        if self.in_flight.get() {
            log::warn!("Upload already in progress, ignoring submit");
            return None;
        }

        let mut attempt = UploadAttempt::new();

        let Some(file) = self.input.selected_file() else {
            attempt.fail(self.config.messages.no_file.as_str());
            self.view.render(&attempt.view_state());
            return Some(attempt);
        };

        log::info!("📤 Uploading {} to {}", file.name, self.config.endpoint);
        attempt.start(file.name.as_str());
        let guard = InFlightGuard::enter(&self.in_flight);
        self.view.render(&attempt.view_state());

        let result = self
            .transport
            .post_file(&self.config.endpoint, &self.config.field_name, file)
            .await;
        drop(guard);

        match result {
            Ok(reply) => {
                let (state, message) = interpret_reply(&reply, &self.config.messages);
                if state == RequestState::Succeeded {
                    log::info!("✅ Upload accepted ({}): {}", reply.status, message);
                    attempt.succeed(message);
                } else {
                    log::warn!("❌ Upload rejected ({}): {}", reply.status, message);
                    attempt.fail(message);
                }
            }
            Err(e) => {
                log::warn!("❌ Upload failed: {}", e);
                attempt.fail(self.config.messages.connection_error.as_str());
            }
        }

        self.view.render(&attempt.view_state());
        Some(attempt)
    }
}

/// Clears the in-flight flag when the request finishes or is dropped.
struct InFlightGuard<'a>(&'a Cell<bool>);

impl<'a> InFlightGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Map an HTTP reply to a terminal state and its message.
///
/// A body that is not a JSON object never came from the upload endpoint
/// (proxy pages, misrouted origins) and fails with the connection error,
/// whatever the status.
pub fn interpret_reply(reply: &HttpReply, messages: &UploadMessages) -> (RequestState, String) {
    let body: UploadReply = match serde_json::from_str(&reply.body) {
        Ok(body) => body,
        Err(e) => {
            log::warn!("Unparseable upload reply ({}): {}", reply.status, e);
            return (RequestState::Failed, messages.connection_error.clone());
        }
    };

    if reply.is_success() {
        let message = body.message.unwrap_or_else(|| messages.upload_done.clone());
        (RequestState::Succeeded, message)
    } else {
        let message = body.error.unwrap_or_else(|| messages.upload_failed.clone());
        (RequestState::Failed, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageKind, Notice};
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeInput(Option<SelectedFile<Vec<u8>>>);

    impl FileInput for FakeInput {
        type File = Vec<u8>;

        fn selected_file(&self) -> Option<SelectedFile<Vec<u8>>> {
            self.0.clone()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct RecordedRequest {
        path: String,
        field: String,
        file: SelectedFile<Vec<u8>>,
    }

    /// Replies with a fixed result and records every request.
    #[derive(Clone)]
    struct ScriptedTransport {
        result: Result<HttpReply, TransportError>,
        requests: Rc<RefCell<Vec<RecordedRequest>>>,
    }

    impl ScriptedTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                result: Ok(HttpReply::new(status, body)),
                requests: Rc::default(),
            }
        }

        fn failing(error: TransportError) -> Self {
            Self {
                result: Err(error),
                requests: Rc::default(),
            }
        }
    }

    #[async_trait(?Send)]
    impl UploadTransport for ScriptedTransport {
        type File = Vec<u8>;

        async fn post_file(
            &self,
            path: &str,
            field: &str,
            file: SelectedFile<Vec<u8>>,
        ) -> Result<HttpReply, TransportError> {
            self.requests.borrow_mut().push(RecordedRequest {
                path: path.to_string(),
                field: field.to_string(),
                file,
            });
            self.result.clone()
        }
    }

    /// Waits for the test to hand over the reply.
    struct PendingTransport {
        reply: RefCell<Option<oneshot::Receiver<HttpReply>>>,
        calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl UploadTransport for PendingTransport {
        type File = Vec<u8>;

        async fn post_file(
            &self,
            _path: &str,
            _field: &str,
            _file: SelectedFile<Vec<u8>>,
        ) -> Result<HttpReply, TransportError> {
            self.calls.set(self.calls.get() + 1);
            let rx = self.reply.borrow_mut().take().expect("single request");
            rx.await
                .map_err(|e| TransportError::Network(e.to_string()))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingView(Rc<RefCell<Vec<ViewState>>>);

    impl RecordingView {
        fn frames(&self) -> Vec<ViewState> {
            self.0.borrow().clone()
        }

        fn last(&self) -> ViewState {
            self.0.borrow().last().cloned().expect("at least one render")
        }
    }

    impl UploadView for RecordingView {
        fn render(&self, state: &ViewState) {
            self.0.borrow_mut().push(state.clone());
        }
    }

    fn report() -> FakeInput {
        FakeInput(Some(SelectedFile::new("report.xlsx", b"PK\x03\x04".to_vec())))
    }

    #[test]
    fn test_no_file_skips_network() {
        let transport = ScriptedTransport::replying(200, r#"{"message":"unused"}"#);
        let requests = transport.requests.clone();
        let view = RecordingView::default();
        let submitter = UploadSubmitter::new(FakeInput(None), transport, view.clone());

        let attempt = block_on(submitter.submit()).unwrap();

        assert_eq!(attempt.state, RequestState::Failed);
        assert_eq!(attempt.message, MSG_NO_FILE);
        assert!(requests.borrow().is_empty());
        assert_eq!(view.frames().len(), 1);
        assert_eq!(view.last().notice, Some(Notice::error(MSG_NO_FILE)));
        assert!(!view.last().busy);
    }

    #[test]
    fn test_sends_single_file_part_to_upload() {
        let transport = ScriptedTransport::replying(200, r#"{"message":"ok"}"#);
        let requests = transport.requests.clone();
        let submitter = UploadSubmitter::new(report(), transport, RecordingView::default());

        block_on(submitter.submit()).unwrap();

        let requests = requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/upload");
        assert_eq!(requests[0].field, "file");
        assert_eq!(requests[0].file.name, "report.xlsx");
        assert_eq!(requests[0].file.content, b"PK\x03\x04".to_vec());
    }

    #[test]
    fn test_success_shows_server_message() {
        let transport = ScriptedTransport::replying(200, r#"{"message":"Imported 10 rows"}"#);
        let view = RecordingView::default();
        let submitter = UploadSubmitter::new(report(), transport, view.clone());

        let attempt = block_on(submitter.submit()).unwrap();

        assert_eq!(attempt.state, RequestState::Succeeded);
        assert_eq!(attempt.file_name.as_deref(), Some("report.xlsx"));

        let frames = view.frames();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].busy);
        assert!(!frames[0].submit_enabled);
        assert_eq!(frames[0].notice, None);

        let done = view.last();
        assert!(!done.busy);
        assert!(done.submit_enabled);
        assert_eq!(done.notice, Some(Notice::success("Imported 10 rows")));
        assert!(!submitter.is_busy());
    }

    #[test]
    fn test_server_error_shows_error_field() {
        let transport = ScriptedTransport::replying(400, r#"{"error":"Invalid format"}"#);
        let view = RecordingView::default();
        let submitter = UploadSubmitter::new(report(), transport, view.clone());

        let attempt = block_on(submitter.submit()).unwrap();

        assert_eq!(attempt.state, RequestState::Failed);
        let notice = view.last().notice.unwrap();
        assert_eq!(notice.text, "Invalid format");
        assert_eq!(notice.kind, MessageKind::Error);
        assert!(view.last().submit_enabled);
    }

    #[test]
    fn test_server_error_without_error_field_uses_fallback() {
        let transport = ScriptedTransport::replying(500, r#"{"detail":"boom"}"#);
        let submitter = UploadSubmitter::new(report(), transport, RecordingView::default());

        let attempt = block_on(submitter.submit()).unwrap();

        assert_eq!(attempt.state, RequestState::Failed);
        assert_eq!(attempt.message, MSG_UPLOAD_FAILED);
    }

    #[test]
    fn test_non_json_reply_fails_for_any_status() {
        let messages = UploadMessages::default();

        for reply in [
            HttpReply::new(200, "<!DOCTYPE html><title>proxy login</title>"),
            HttpReply::new(200, ""),
            HttpReply::new(502, "<html>Bad Gateway</html>"),
        ] {
            let (state, message) = interpret_reply(&reply, &messages);
            assert_eq!(state, RequestState::Failed);
            assert_eq!(message, MSG_CONNECTION_ERROR);
        }
    }

    #[test]
    fn test_html_success_page_is_not_reported_as_uploaded() {
        let view = RecordingView::default();
        let transport = ScriptedTransport::replying(200, "<html><body>Sign in</body></html>");
        let submitter = UploadSubmitter::new(report(), transport, view.clone());

        let attempt = block_on(submitter.submit()).unwrap();

        assert_eq!(attempt.state, RequestState::Failed);
        assert_eq!(view.last().notice, Some(Notice::error(MSG_CONNECTION_ERROR)));
        assert!(view.last().submit_enabled);
    }

    #[test]
    fn test_empty_json_object_uses_defaults() {
        let messages = UploadMessages::default();

        let (state, message) = interpret_reply(&HttpReply::new(200, "{}"), &messages);
        assert_eq!(state, RequestState::Succeeded);
        assert_eq!(message, MSG_UPLOAD_DONE);

        let (state, message) = interpret_reply(&HttpReply::new(400, "{}"), &messages);
        assert_eq!(state, RequestState::Failed);
        assert_eq!(message, MSG_UPLOAD_FAILED);
    }

    #[test]
    fn test_transport_failure_shows_connection_error() {
        for error in [
            TransportError::Network("Failed to fetch".into()),
            TransportError::TimedOut(120_000),
        ] {
            let view = RecordingView::default();
            let submitter =
                UploadSubmitter::new(report(), ScriptedTransport::failing(error), view.clone());

            let attempt = block_on(submitter.submit()).unwrap();

            assert_eq!(attempt.state, RequestState::Failed);
            assert_eq!(attempt.message, MSG_CONNECTION_ERROR);
            assert!(!view.last().busy);
            assert!(view.last().submit_enabled);
        }
    }

    #[test]
    fn test_new_outcome_replaces_previous_message() {
        let view = RecordingView::default();
        let first = UploadSubmitter::new(
            report(),
            ScriptedTransport::replying(400, r#"{"error":"Invalid format"}"#),
            view.clone(),
        );
        block_on(first.submit());

        let second = UploadSubmitter::new(
            report(),
            ScriptedTransport::replying(200, r#"{"message":"Imported 10 rows"}"#),
            view.clone(),
        );
        block_on(second.submit());

        assert_eq!(view.last().notice, Some(Notice::success("Imported 10 rows")));
    }

    #[test]
    fn test_submit_while_in_flight_is_ignored() {
        let (tx, rx) = oneshot::channel();
        let transport = PendingTransport {
            reply: RefCell::new(Some(rx)),
            calls: Cell::new(0),
        };
        let view = RecordingView::default();
        let submitter = UploadSubmitter::new(report(), transport, view.clone());

        block_on(async {
            let first = submitter.submit();
            futures::pin_mut!(first);
            assert!(futures::poll!(first.as_mut()).is_pending());
            assert!(submitter.is_busy());
            assert!(view.last().busy);

            assert_eq!(submitter.submit().await, None);

            tx.send(HttpReply::new(200, r#"{"message":"Imported 10 rows"}"#))
                .unwrap();
            let attempt = first.await.unwrap();
            assert_eq!(attempt.state, RequestState::Succeeded);
        });

        assert_eq!(submitter.transport.calls.get(), 1);
        assert!(!submitter.is_busy());
    }

    #[test]
    fn test_custom_messages() {
        let config = SubmitConfig {
            messages: UploadMessages::spanish(),
            ..SubmitConfig::default()
        };
        let submitter = UploadSubmitter::new(
            FakeInput(None),
            ScriptedTransport::replying(200, "{}"),
            RecordingView::default(),
        )
        .with_config(config);

        let attempt = block_on(submitter.submit()).unwrap();
        assert_eq!(attempt.message, "Por favor, selecciona un archivo .xlsx");
    }
}
