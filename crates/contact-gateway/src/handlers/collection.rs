use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use contact_core::{Contact, ContactLister, ContactPurger, ContactSaver};
use tracing::info;

use super::{decode_contact, storage_failure};
use crate::error::{AppError, Result};
use crate::model::SaveContactResponse;

pub async fn list_contacts_handler<L: ContactLister>(
    State(lister): State<Arc<L>>,
) -> Result<Json<Vec<Contact>>> {
    const OP: &str = "handlers.contacts.list";

    let contacts = lister
        .list_all()
        .await
        .map_err(|err| storage_failure(OP, "error get any record", err))?;

    info!(op = OP, count = contacts.len(), "listed contacts");
    Ok(Json(contacts))
}

pub async fn save_contact_handler<S: ContactSaver>(
    State(saver): State<Arc<S>>,
    body: Bytes,
) -> Result<Json<SaveContactResponse>> {
    const OP: &str = "handlers.contacts.save";

    let contact = decode_contact(&body).map_err(|err| {
        info!(op = OP, error = %err, "error reading json");
        AppError::bad_request("request error", Some(err.to_string()))
    })?;

    let id = saver
        .save(contact)
        .await
        .map_err(|err| storage_failure(OP, "error saving contact", err))?;

    info!(op = OP, id = %id, "saved contact");
    Ok(Json(SaveContactResponse {
        id,
        msg: "successful save contact".to_string(),
    }))
}

pub async fn delete_all_contacts_handler<P: ContactPurger>(
    State(purger): State<Arc<P>>,
) -> Result<Json<String>> {
    const OP: &str = "handlers.contacts.delete_all";

    let count = purger
        .delete_all()
        .await
        .map_err(|err| storage_failure(OP, "error deleting records", err))?;

    info!(op = OP, count, "deleted contacts");
    Ok(Json(format!(
        "deleting {count} records complete successfully"
    )))
}
