use crate::constants::{CODE_DELETE_SUCCESS, MSG_DELETE_SUCCESS};
use crate::handlers::error::delete_error;
use crate::state::AppState;
use actix_web::{delete, web, HttpResponse, Result as ActixResult};
use common::ApiResponse;
use tracing::info;

/// Handle file deletion by private key
#[delete("/files/{private_key}")]
pub async fn delete(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let private_key = path.into_inner();
    let provider = state.config.active_provider();

    info!(provider = %provider, "DELETE /files - Request received");

    match state
        .manager
        .delete_by_private_key(provider, &private_key)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success(
            MSG_DELETE_SUCCESS,
            CODE_DELETE_SUCCESS,
            None,
        ))),
        Err(e) => Ok(delete_error(e)),
    }
}
