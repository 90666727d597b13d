//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Replace** (`/api/replace`): the multipart find/replace operation
//! - **Formats** (`/api/formats`): supported document formats
//! - **Health** (`/health`): liveness probe
//! - **Static assets** (`/`): the embedded client form
//!
//! # OpenAPI Documentation
//!
//! Endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is available at `/docs` when the server is running.

pub mod handlers;
pub mod models;
