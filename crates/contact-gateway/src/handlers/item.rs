use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use contact_core::{Contact, ContactGetter, ContactRemover, ContactUpdater};
use tracing::info;

use super::{decode_contact, storage_failure};
use crate::error::{AppError, Result};
use crate::model::ContactStatusResponse;

const EMPTY_ID_SLUG: &str = "uncorrected uri, id is empty";

pub async fn get_contact_handler<G: ContactGetter>(
    State(getter): State<Arc<G>>,
    Path(id): Path<String>,
) -> Result<Json<Contact>> {
    const OP: &str = "handlers.contact.get";

    if id.is_empty() {
        info!(op = OP, "empty id");
        return Err(AppError::bad_request(EMPTY_ID_SLUG, None));
    }

    let contact = getter
        .get_by_id(&id)
        .await
        .map_err(|err| storage_failure(OP, "error getting item", err))?;

    info!(op = OP, id = %id, "fetched contact");
    Ok(Json(contact))
}

pub async fn delete_contact_handler<D: ContactRemover>(
    State(remover): State<Arc<D>>,
    Path(id): Path<String>,
) -> Result<Json<ContactStatusResponse>> {
    const OP: &str = "handlers.contact.delete";

    if id.is_empty() {
        info!(op = OP, "empty id");
        return Err(AppError::bad_request(EMPTY_ID_SLUG, None));
    }

    let ok = remover
        .delete_by_id(&id)
        .await
        .map_err(|err| storage_failure(OP, "error deleting item", err))?;

    info!(op = OP, id = %id, "deleted contact");
    Ok(Json(ContactStatusResponse {
        ok,
        msg: format!("complete deleting item with id: {id}"),
    }))
}

/// Replaces the contact named in the path. The path id wins over any id in
/// the body. An undecodable body is answered as a server-side failure.
pub async fn update_contact_handler<U: ContactUpdater>(
    State(updater): State<Arc<U>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ContactStatusResponse>> {
    const OP: &str = "handlers.contact.update";

    if id.is_empty() {
        info!(op = OP, "empty id");
        return Err(AppError::bad_request(EMPTY_ID_SLUG, None));
    }

    let contact = decode_contact(&body).map_err(|err| {
        info!(op = OP, error = %err, "error parsing request body");
        AppError::internal("error parsing request body", err)
    })?;

    let ok = updater
        .update(contact.with_id(id.clone()))
        .await
        .map_err(|err| storage_failure(OP, "error updating contact", err))?;

    info!(op = OP, id = %id, "updated contact");
    Ok(Json(ContactStatusResponse {
        ok,
        msg: format!("successful update item with id: {id}"),
    }))
}
