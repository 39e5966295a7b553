//! Durable keyed metadata for uploaded files.
//!
//! The store owns the canonical snapshot in memory and rewrites it to disk
//! after every mutation, so a crash after a successful call never loses
//! that mutation. Mutations must be serialized by the caller; the store
//! performs no internal locking.

pub mod error;
pub mod models;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use models::FileRecord;
pub use store::MetadataStore;
