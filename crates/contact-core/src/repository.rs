//! Capability traits over contact storage.
//!
//! Every HTTP handler depends on exactly one of these traits, so a handler
//! can be exercised against a stand-in that implements a single method.
//! [`ContactRepository`] bundles all of them for the backends that provide
//! the full set.

use crate::contact::Contact;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ContactLister: Send + Sync + 'static {
    /// Returns every stored contact, in the backend's natural order.
    async fn list_all(&self) -> Result<Vec<Contact>>;
}

#[async_trait]
pub trait ContactSaver: Send + Sync + 'static {
    /// Stores a new contact and returns its freshly assigned identifier.
    /// Any identifier already present on `contact` is ignored.
    async fn save(&self, contact: Contact) -> Result<String>;
}

#[async_trait]
pub trait ContactPurger: Send + Sync + 'static {
    /// Removes every contact and returns how many were removed.
    async fn delete_all(&self) -> Result<u64>;
}

#[async_trait]
pub trait ContactGetter: Send + Sync + 'static {
    /// Retrieves a contact by identifier.
    /// Returns `Err(NotFound)` if the identifier is malformed or unknown.
    async fn get_by_id(&self, id: &str) -> Result<Contact>;
}

#[async_trait]
pub trait ContactRemover: Send + Sync + 'static {
    /// Removes a contact by identifier.
    /// Returns `Err(NotFound)` if the identifier is malformed or nothing was removed.
    async fn delete_by_id(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ContactUpdater: Send + Sync + 'static {
    /// Replaces every non-id field of the contact identified by `contact.id`.
    /// Returns `Err(NotFound)` if the identifier is malformed or matches nothing.
    async fn update(&self, contact: Contact) -> Result<bool>;
}

/// The full storage surface.
pub trait ContactRepository:
    ContactLister + ContactSaver + ContactPurger + ContactGetter + ContactRemover + ContactUpdater
{
}

impl<T> ContactRepository for T where
    T: ContactLister
        + ContactSaver
        + ContactPurger
        + ContactGetter
        + ContactRemover
        + ContactUpdater
{
}
