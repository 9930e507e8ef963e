//! HTTP API module.
//!
//! The upload server, its wire types and the import progress log.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::{router, start_server, AppState};
pub use types::*;
