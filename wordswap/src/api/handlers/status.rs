use axum::http::StatusCode;

#[utoipa::path(
    get,
    path = "/health",
    tag = "status",
    summary = "Liveness probe",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
