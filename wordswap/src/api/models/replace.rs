use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::DocumentFormat;

/// Description of one supported document format.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormatResponse {
    /// Canonical filename extension (without the dot)
    pub extension: String,
    /// MIME type returned for rewritten documents of this format
    pub mime_type: String,
}

impl From<DocumentFormat> for FormatResponse {
    fn from(format: DocumentFormat) -> Self {
        Self {
            extension: format.extension().to_string(),
            mime_type: format.mime_type().to_string(),
        }
    }
}

/// Response body for `GET /api/formats`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormatListResponse {
    pub formats: Vec<FormatResponse>,
}

/// JSON error body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable failure classifier, e.g. `unsupported_format`,
    /// `corrupt_document`, `replacement_unrepresentable`
    pub kind: String,
    /// Human-readable description safe to show to users
    pub message: String,
}
