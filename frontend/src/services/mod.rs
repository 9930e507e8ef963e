//! Upload services.
//!
//! # Services
//!
//! - [`submit`] - form submission logic ([`UploadSubmitter`]) and its seams
//! - [`upload`] - `gloo-net` fetch transport for `POST /upload`

pub mod submit;
pub mod upload;

pub use submit::*;
pub use upload::*;
