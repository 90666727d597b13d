//! OpenAPI documentation configuration.
//!
//! The generated document covers the replace operation, the format listing,
//! and the health probe; it is served with a Scalar UI at `/docs`.

use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "wordswap",
        description = "Stateless find-and-replace service for PDF and CSV documents. \
                       Upload a file with a find word and a replace word; download \
                       the rewritten document.",
    ),
    paths(
        api::handlers::replace::replace_document,
        api::handlers::formats::list_formats,
        api::handlers::status::health,
    ),
    components(schemas(
        api::models::replace::FormatResponse,
        api::models::replace::FormatListResponse,
        api::models::replace::ErrorResponse,
    )),
    tags(
        (name = "replace", description = "Document find/replace operations"),
        (name = "status", description = "Service health")
    )
)]
pub struct ApiDoc;
