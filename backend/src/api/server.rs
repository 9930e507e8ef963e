//! HTTP server for the statement upload page.
//!
//! # API Endpoints
//!
//! | Method | Path      | Description                                   |
//! |--------|-----------|-----------------------------------------------|
//! | GET    | `/health` | Health check                                  |
//! | POST   | `/upload` | Upload an `.xlsx` statement, import to Notion |
//! | GET    | `/logs`   | SSE stream of import progress, for operators  |
//! | GET    | `/*`      | Built frontend (static files), if configured  |

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::{header, Method},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::{cors::CorsLayer, services::ServeDir};

use super::logs::{log_error, log_info, log_warning, LOG_BROADCASTER};
use super::types::UploadReply;
use crate::error::{ServerError, ServerResult};
use crate::import::import_workbook;
use crate::notion::TransactionSink;

/// Multipart field carrying the statement.
pub const UPLOAD_FIELD: &str = "file";

/// Largest accepted request body (50 MiB).
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn TransactionSink>,
}

impl AppState {
    pub fn new(sink: Arc<dyn TransactionSink>) -> Self {
        Self { sink }
    }
}

/// Build the application router.
///
/// When `static_dir` is set, unmatched GET requests are served from it.
pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    // Permissive CORS for local development of the frontend
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload_statement))
        .route("/logs", get(sse_logs));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(
    port: u16,
    static_dir: Option<PathBuf>,
    sink: Arc<dyn TransactionSink>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(AppState::new(sink), static_dir.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Cartola server running on http://localhost:{}", port);
    println!("   POST /upload - Upload .xlsx statement");
    println!("   GET  /logs   - SSE import log");
    println!("   GET  /health - Health check");
    if let Some(dir) = static_dir {
        println!("   GET  /       - Frontend from {}", dir.display());
    }
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "cartola",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /upload",
            "logs": "GET /logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // Lagged receivers skip what they missed
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload endpoint: one `file` part holding an `.xlsx` statement.
async fn upload_statement(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Json<UploadReply>> {
    let (file_name, bytes) = read_upload(multipart).await.map_err(|e| {
        log_warning(format!("Upload rejected: {}", e));
        e
    })?;

    log_info(format!("📄 NEW UPLOAD: {} ({} bytes)", file_name, bytes.len()));

    let summary = import_workbook(&bytes, state.sink.as_ref())
        .await
        .map_err(|e| {
            log_error(format!("Import failed: {}", e));
            ServerError::from(e)
        })?;

    Ok(Json(summary.into()))
}

/// Extract the `file` part and check its extension.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<(String, Vec<u8>)> {
    let mut multipart = multipart.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
        upload = Some((file_name, bytes.to_vec()));
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| ServerError::BadRequest("No file uploaded".into()))?;

    if !is_xlsx(&file_name) {
        return Err(ServerError::BadRequest("File must be .xlsx".into()));
    }

    Ok((file_name, bytes))
}

fn is_xlsx(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".xlsx")
}
