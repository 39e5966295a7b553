use crate::handlers::error::download_error;
use crate::state::AppState;
use actix_web::{get, web, HttpResponse, Result as ActixResult};
use tracing::info;

/// Handle file download, streaming the stored bytes back to the client
#[get("/files/{public_key}")]
pub async fn download(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let public_key = path.into_inner();
    let provider = state.config.active_provider();

    info!(
        public_key = ?public_key,
        provider = %provider,
        "GET /files - Request received"
    );

    match state.manager.get_by_public_key(provider, &public_key).await {
        Ok(stream) => Ok(HttpResponse::Ok()
            .content_type("application/octet-stream")
            .streaming(stream)),
        Err(e) => Ok(download_error(e)),
    }
}
