//! UI Components for the Cartola upload page.
//!
//! # Layout Components
//! - [`Hero`] - Title and expected spreadsheet format
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadForm`] - Statement upload form with busy indicator and outcome message

mod footer;
mod hero;
mod upload;

pub use footer::*;
pub use hero::*;
pub use upload::*;
