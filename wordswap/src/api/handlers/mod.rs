//! HTTP request handlers for all API endpoints.
//!
//! Each handler is responsible for request validation and deserialization,
//! dispatching into the rewrite engine, and response serialization.
//!
//! # Handler Modules
//!
//! - [`replace`]: the multipart find/replace operation
//! - [`formats`]: supported document format listing
//! - [`status`]: liveness probe
//! - [`static_assets`]: embedded client form serving
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`] which converts to the appropriate
//! HTTP status code and a JSON error body.

pub mod formats;
pub mod replace;
pub mod static_assets;
pub mod status;
