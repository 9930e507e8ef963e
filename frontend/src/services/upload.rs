//! HTTP transport for the upload form, built on `gloo-net` fetch.

use async_trait::async_trait;
use futures::future::{select, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use web_sys::{AbortController, File, FormData};

use super::submit::UploadTransport;
use crate::config::{BACKEND_URL, REQUEST_TIMEOUT_MS};
use crate::types::{HttpReply, SelectedFile, TransportError};

/// Browser fetch transport.
///
/// Sends `multipart/form-data` built with `FormData`; the browser sets
/// the boundary header itself.
#[derive(Clone, Debug)]
pub struct FetchTransport {
    base_url: String,
    timeout_ms: Option<u32>,
}

impl Default for FetchTransport {
    fn default() -> Self {
        Self::new(BACKEND_URL).with_timeout(REQUEST_TIMEOUT_MS)
    }
}

impl FetchTransport {
    /// Transport for `base_url` without a timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: None,
        }
    }

    /// Abort requests that take longer than `timeout_ms`.
    pub fn with_timeout(mut self, timeout_ms: Option<u32>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Multipart body with a single `field` part carrying the file and its name.
pub fn build_form(field: &str, file: &SelectedFile<File>) -> Result<FormData, TransportError> {
    let form_data = FormData::new()
        .map_err(|e| TransportError::Request(format!("Failed to create FormData: {:?}", e)))?;
    form_data
        .append_with_blob_and_filename(field, &file.content, &file.name)
        .map_err(|e| TransportError::Request(format!("Failed to append file: {:?}", e)))?;
    Ok(form_data)
}

#[async_trait(?Send)]
impl UploadTransport for FetchTransport {
    type File = File;

    async fn post_file(
        &self,
        path: &str,
        field: &str,
        file: SelectedFile<File>,
    ) -> Result<HttpReply, TransportError> {
        let form_data = build_form(field, &file)?;

        let controller = AbortController::new().map_err(|e| {
            TransportError::Request(format!("Failed to create AbortController: {:?}", e))
        })?;
        let signal = controller.signal();

        let request = Request::post(&self.url_for(path))
            .abort_signal(Some(&signal))
            .body(form_data)
            .map_err(|e| TransportError::Request(e.to_string()))?;

        // Headers and body both count against the timeout.
        let exchange = async move {
            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Body(e.to_string()))?;
            Ok::<_, TransportError>(HttpReply { status, body })
        };

        let Some(ms) = self.timeout_ms else {
            return exchange.await;
        };

        let timeout = TimeoutFuture::new(ms);
        futures::pin_mut!(exchange);
        futures::pin_mut!(timeout);
        match select(exchange, timeout).await {
            Either::Left((reply, _)) => reply,
            Either::Right(_) => {
                controller.abort();
                Err(TransportError::TimedOut(ms))
            }
        }
    }
}
