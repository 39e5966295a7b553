pub mod delete;
pub mod download;
pub mod error;
pub mod health;
pub mod upload;
pub mod upload_form;
