//! # docmatch-client
//!
//! Typed HTTP client for the docmatch document-scanner backend: session-aware
//! auth, document upload and scan, ranked similarity matches, credit
//! requests, and the admin surfaces. The server tracks identity with a
//! session cookie, so the client carries a cookie store and every call rides
//! on it implicitly.

pub use reqwest;

pub mod client;
pub mod error;
pub mod routes;

pub use client::ApiClient;
pub use error::{ApiError, Result};
