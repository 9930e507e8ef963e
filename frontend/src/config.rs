//! Application configuration.
//!
//! Centralized configuration for the Cartola upload form.
//! These are compile-time constants; [`crate::SubmitConfig`] bundles the
//! ones the submitter needs so tests and alternative deployments can
//! override them.

/// Backend base URL.
///
/// Empty means same origin: the backend serves the built frontend itself.
pub const BACKEND_URL: &str = "";

/// Path of the upload endpoint.
pub const UPLOAD_PATH: &str = "/upload";

/// Multipart field name carrying the file.
pub const UPLOAD_FIELD: &str = "file";

/// Request timeout in milliseconds, `None` to wait for the server.
///
/// The server answers only after every row has reached Notion (about three
/// rows per second), and it keeps importing when the client gives up. A
/// timed out request is aborted and reported like any other connection
/// failure.
pub const REQUEST_TIMEOUT_MS: Option<u32> = None;

/// Shown when the form is submitted without a file.
pub const MSG_NO_FILE: &str = "Please select a file";

/// Shown when the server rejects the upload without an `error` field.
pub const MSG_UPLOAD_FAILED: &str = "Error uploading the file";

/// Shown when the request never produced a response.
pub const MSG_CONNECTION_ERROR: &str = "Could not connect to the server";

/// Shown when the server accepts the upload without a `message` field.
pub const MSG_UPLOAD_DONE: &str = "File uploaded";
