//! Gemini API implementation
//!
//! A small client for the `generateContent` endpoint of Google's Gemini API,
//! used by the content extractor to apply free-form instructions to page text.

mod client;
mod http;
mod models;
mod types;

pub use client::Client;
pub use http::HttpOptions;
pub use models::ModelsService;

/// Re-export of types module for public use
pub mod prelude {
    pub use super::types::*;
    pub use crate::error::Error;
    pub use crate::error::Result;
}
