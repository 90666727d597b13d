use axum::Json;

use crate::api::models::replace::{FormatListResponse, FormatResponse};
use crate::engine::DocumentFormat;
use crate::errors::Result;

#[utoipa::path(
    get,
    path = "/api/formats",
    tag = "replace",
    summary = "List supported formats",
    description = "Returns the document formats the replace endpoint accepts.",
    responses(
        (status = 200, description = "Supported formats", body = FormatListResponse)
    )
)]
pub async fn list_formats() -> Result<Json<FormatListResponse>> {
    let formats = DocumentFormat::ALL.iter().copied().map(FormatResponse::from).collect();
    Ok(Json(FormatListResponse { formats }))
}
