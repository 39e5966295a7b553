pub mod file_utils;

use serde::{Deserialize, Serialize};

/// Key pair handed to a client after a successful upload.
/// The public key retrieves the file, the private key deletes it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    pub public_key: String,
    pub private_key: String,
}

/// Single error entry in a failure response body.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorDetail {
    pub msg: String,
}

/// Response envelope shared by all file endpoints.
/// The transport layer alone decides which message/code pair to send.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, code: &str, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            code: code.to_string(),
            data,
            errors: None,
        }
    }

    pub fn failure(message: &str, code: &str, detail: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            code: code.to_string(),
            data: None,
            errors: Some(vec![ErrorDetail {
                msg: detail.to_string(),
            }]),
        }
    }
}

/// Response from the health check endpoint
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String, // "ok" when healthy
}
