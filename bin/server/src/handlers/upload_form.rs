use actix_multipart::form::{tempfile::TempFile, MultipartForm};

/// Multipart form for file upload
#[derive(MultipartForm)]
pub struct UploadForm {
    /// The file being uploaded
    #[multipart(limit = "100MB")]
    pub file: TempFile,
}
