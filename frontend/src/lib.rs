//! Cartola Import - Frontend Rust/Leptos Application
//!
//! A WebAssembly upload page that sends a bank statement spreadsheet to
//! the backend's `POST /upload` endpoint and shows the outcome.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  UploadForm (Leptos)                                         │
//! │   NodeFileInput ──┐                    ┌── SignalView        │
//! │                   ▼                    │                     │
//! │            UploadSubmitter ── ViewState┘                     │
//! │                   │                                          │
//! │                   ▼                                          │
//! │            FetchTransport ──▶ POST /upload (multipart "file") │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Endpoint, timeout and message constants
//! - [`types`] - Attempt state, view state, wire types
//! - [`services`] - Submission logic and fetch transport
//! - [`components`] - UI components (Hero, UploadForm, Footer)

use leptos::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod services;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Attempt
    RequestState, SelectedFile, UploadAttempt,
    // View
    MessageKind, Notice, ViewState,
    // API
    HttpReply, UploadReply,
    // Errors
    TransportError,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application
// =============================================================================

/// Root component, mounted by the `cartola-frontend` binary.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <main>
            <div class="container">
                <Hero/>
                <UploadForm/>
            </div>
            <Footer/>
        </main>
    }
}
