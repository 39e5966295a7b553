use crate::constants::{CODE_UPLOAD_ERROR, CODE_UPLOAD_SUCCESS, MSG_UPLOAD_ERROR, MSG_UPLOAD_SUCCESS};
use crate::handlers::error::upload_error;
use crate::handlers::upload_form::UploadForm;
use crate::state::AppState;
use actix_multipart::form::MultipartForm;
use actix_web::{post, web, HttpResponse, Result as ActixResult};
use common::{file_utils, ApiResponse, KeyPair};
use tracing::info;

/// Handle file upload (multipart/form-data)
#[post("/files")]
pub async fn upload(
    form: MultipartForm<UploadForm>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let provider = state.config.active_provider();
    let UploadForm { file } = form.into_inner();

    let file_name = file.file_name.clone().unwrap_or_default();

    // Debug formatter (?) escapes control characters in untrusted names
    info!(
        file_name = ?file_name,
        provider = %provider,
        "POST /files - Request received"
    );

    // Reject path traversal before the name is joined onto the folder
    if let Err(e) = file_utils::validate_filename(&file_name) {
        return Ok(
            HttpResponse::BadRequest().json(ApiResponse::<KeyPair>::failure(
                MSG_UPLOAD_ERROR,
                CODE_UPLOAD_ERROR,
                e.message(),
            )),
        );
    }

    // Read the multipart temp file back; its size is already capped by
    // the form's multipart limit.
    let content = std::fs::read(file.file.path())
        .map_err(|e| actix_web::error::ErrorInternalServerError(format!(
            "Failed to read uploaded file: {}",
            e
        )))?;

    match state.manager.upload(provider, &file_name, &content).await {
        Ok(pair) => {
            info!(file_name = ?file_name, provider = %provider, "POST /files - File uploaded");
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                MSG_UPLOAD_SUCCESS,
                CODE_UPLOAD_SUCCESS,
                Some(pair),
            )))
        }
        Err(e) => Ok(upload_error(e)),
    }
}
