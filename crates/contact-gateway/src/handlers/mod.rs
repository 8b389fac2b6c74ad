mod collection;
mod health;
mod item;

pub use collection::{delete_all_contacts_handler, list_contacts_handler, save_contact_handler};
pub use health::health_handler;
pub use item::{delete_contact_handler, get_contact_handler, update_contact_handler};

use contact_core::{Contact, ErrorKind, StorageError};
use tracing::{error, info};

use crate::error::AppError;

/// Logs a storage failure under `op` and classifies it for the response.
fn storage_failure(op: &'static str, slug: &'static str, err: StorageError) -> AppError {
    match err.kind() {
        ErrorKind::NotFound => info!(op, error = %err, "contact not found"),
        _ => error!(op, error = %err, slug, "storage operation failed"),
    }
    AppError::from_storage(slug, err)
}

/// Decodes a contact from the raw body. The `Content-Type` header is not
/// consulted.
fn decode_contact(body: &[u8]) -> serde_json::Result<Contact> {
    serde_json::from_slice(body)
}
