//! API request and response data models.
//!
//! These models define the public API contract and are annotated with
//! `utoipa` for the generated OpenAPI document. The engine's internal types
//! stay separate so the wire format can evolve independently.

pub mod replace;
