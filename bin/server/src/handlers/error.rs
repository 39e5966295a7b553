use crate::constants::{
    CODE_DELETE_ERROR, CODE_DOWNLOAD_ERROR, CODE_DOWNLOAD_UNSUPPORTED, CODE_UPLOAD_ERROR,
    MSG_DELETE_ERROR, MSG_DOWNLOAD_ERROR, MSG_DOWNLOAD_UNSUPPORTED, MSG_UPLOAD_ERROR,
};
use actix_web::HttpResponse;
use common::ApiResponse;
use manager::ManagerError;
use tracing::error;

/// Map an upload failure to its response.
pub fn upload_error(e: ManagerError) -> HttpResponse {
    error!("Upload failed: {}", e);
    HttpResponse::BadRequest().json(ApiResponse::<()>::failure(
        MSG_UPLOAD_ERROR,
        CODE_UPLOAD_ERROR,
        &e.to_string(),
    ))
}

/// Map a download failure to its response. The unsupported-backend case
/// gets a distinct status and code so clients can tell it apart from a
/// stale key.
pub fn download_error(e: ManagerError) -> HttpResponse {
    error!("Download failed: {}", e);
    match e {
        ManagerError::Unsupported(_) => HttpResponse::FailedDependency().json(
            ApiResponse::<()>::failure(
                MSG_DOWNLOAD_UNSUPPORTED,
                CODE_DOWNLOAD_UNSUPPORTED,
                &e.to_string(),
            ),
        ),
        ManagerError::NotFound => HttpResponse::NotFound().json(ApiResponse::<()>::failure(
            MSG_DOWNLOAD_ERROR,
            CODE_DOWNLOAD_ERROR,
            "No such file found by this key",
        )),
        _ => HttpResponse::BadRequest().json(ApiResponse::<()>::failure(
            MSG_DOWNLOAD_ERROR,
            CODE_DOWNLOAD_ERROR,
            &e.to_string(),
        )),
    }
}

/// Map a delete failure to its response.
pub fn delete_error(e: ManagerError) -> HttpResponse {
    error!("Delete failed: {}", e);
    match e {
        ManagerError::NotFound => HttpResponse::NotFound().json(ApiResponse::<()>::failure(
            MSG_DELETE_ERROR,
            CODE_DELETE_ERROR,
            "No file found for private key",
        )),
        _ => HttpResponse::BadRequest().json(ApiResponse::<()>::failure(
            MSG_DELETE_ERROR,
            CODE_DELETE_ERROR,
            "Something went wrong",
        )),
    }
}
