use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::engine;
use crate::errors::{Error, Result};
use crate::AppState;

/// Strip path components and quote characters from a client-supplied filename
/// so it is safe to echo back in a Content-Disposition header.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.replace(['"', '\r', '\n'], "_")
}

#[utoipa::path(
    post,
    path = "/api/replace",
    tag = "replace",
    summary = "Find and replace in a document",
    description = "Upload a PDF or CSV file together with a find word and a replace word. \
                   Returns the rewritten document as a binary download. The number of \
                   substitutions is reported in the `x-replacement-count` response header.",
    request_body(
        content_type = "multipart/form-data",
        description = "Fields: `file` (binary), `findWord` (string), `replaceWord` (string)"
    ),
    responses(
        (status = 200, description = "Modified document", content_type = "application/octet-stream"),
        (status = 400, description = "Missing file or find word", body = crate::api::models::replace::ErrorResponse),
        (status = 413, description = "File exceeds the configured size limit", body = crate::api::models::replace::ErrorResponse),
        (status = 415, description = "Unsupported file type", body = crate::api::models::replace::ErrorResponse),
        (status = 422, description = "Corrupt document or unrepresentable replacement", body = crate::api::models::replace::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::api::models::replace::ErrorResponse)
    )
)]
pub async fn replace_document(State(state): State<AppState>, mut multipart: Multipart) -> Result<impl IntoResponse> {
    // Correlates all log lines for one upload
    let job_id = Uuid::new_v4();

    let mut file_bytes: Vec<u8> = Vec::new();
    let mut file_name: Option<String> = None;
    let mut find_word: Option<String> = None;
    let mut replace_word: Option<String> = None;

    let max_file_size = state.config.limits.max_file_size;
    let max_term_length = state.config.limits.max_term_length;

    // Process multipart fields as they stream in
    while let Some(mut field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {}", e),
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                file_name = field.file_name().map(sanitize_file_name);

                tracing::debug!(
                    job_id = %job_id,
                    file_name = ?file_name,
                    "Receiving file upload"
                );

                while let Some(chunk) = field.chunk().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read file chunk: {}", e),
                })? {
                    // Check size limit incrementally to fail fast
                    if (file_bytes.len() + chunk.len()) as u64 > max_file_size {
                        tracing::warn!(
                            job_id = %job_id,
                            received = file_bytes.len() + chunk.len(),
                            max_file_size = max_file_size,
                            "File size limit exceeded, aborting upload"
                        );
                        return Err(Error::PayloadTooLarge {
                            message: format!(
                                "File size exceeds maximum allowed size of {} bytes ({} MB)",
                                max_file_size,
                                max_file_size / (1024 * 1024)
                            ),
                        });
                    }
                    file_bytes.extend_from_slice(&chunk);
                }
            }
            "findWord" => {
                let value = field.text().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read findWord: {}", e),
                })?;
                if value.len() > max_term_length {
                    return Err(Error::BadRequest {
                        message: format!("findWord exceeds maximum length of {} bytes", max_term_length),
                    });
                }
                find_word = Some(value);
            }
            "replaceWord" => {
                let value = field.text().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read replaceWord: {}", e),
                })?;
                if value.len() > max_term_length {
                    return Err(Error::BadRequest {
                        message: format!("replaceWord exceeds maximum length of {} bytes", max_term_length),
                    });
                }
                replace_word = Some(value);
            }
            _ => {
                // Ignore unknown fields (forward compatibility)
            }
        }
    }

    // Validate we received required data
    let file_name = file_name.ok_or_else(|| Error::BadRequest {
        message: "Missing required field: 'file'".to_string(),
    })?;

    if file_bytes.is_empty() {
        return Err(Error::BadRequest {
            message: "File cannot be empty".to_string(),
        });
    }

    let find_word = match find_word {
        Some(word) if !word.is_empty() => word,
        _ => {
            return Err(Error::BadRequest {
                message: "findWord must be present and non-empty".to_string(),
            })
        }
    };

    // An absent or empty replaceWord deletes occurrences
    let replace_word = replace_word.unwrap_or_default();

    let format = engine::detect_format(&file_name, &file_bytes).ok_or_else(|| Error::UnsupportedFormat {
        detected: std::path::Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_string()),
    })?;

    tracing::info!(
        job_id = %job_id,
        file_name = %file_name,
        format = %format,
        size_bytes = file_bytes.len(),
        "Starting document rewrite"
    );

    // The rewrite is CPU-bound; keep it off the async workers
    let outcome = tokio::task::spawn_blocking(move || engine::replace(format, &file_bytes, &find_word, &replace_word))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("join document rewrite task: {e}"),
        })??;

    tracing::info!(
        job_id = %job_id,
        format = %format,
        replacements = outcome.replacements,
        output_bytes = outcome.bytes.len(),
        "Document rewrite complete"
    );

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(format.mime_type()));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"modified_{file_name}\"")).map_err(|e| Error::Internal {
            operation: format!("build Content-Disposition header: {e}"),
        })?,
    );
    headers.insert(
        "x-replacement-count",
        HeaderValue::from_str(&outcome.replacements.to_string()).map_err(|e| Error::Internal {
            operation: format!("build x-replacement-count header: {e}"),
        })?,
    );

    Ok((StatusCode::OK, headers, outcome.bytes))
}
