use async_trait::async_trait;
use contact_core::error::Result;
use contact_core::{
    Contact, ContactGetter, ContactLister, ContactPurger, ContactRemover, ContactSaver,
    ContactUpdater, StorageError,
};
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;

use crate::document::{parse_object_id, ContactDocument};

/// In-memory implementation of the contact capabilities using DashMap.
///
/// Identifiers follow the same rules as [`MongoRepository`](crate::MongoRepository):
/// they are freshly generated object ids, and anything that does not parse
/// as one is reported as `NotFound`. Listing order is unspecified.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<ObjectId, ContactDocument>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ContactLister for InMemoryRepository {
    async fn list_all(&self) -> Result<Vec<Contact>> {
        Ok(self
            .storage
            .iter()
            .map(|entry| entry.value().clone().into_contact())
            .collect())
    }
}

#[async_trait]
impl ContactSaver for InMemoryRepository {
    async fn save(&self, contact: Contact) -> Result<String> {
        let id = ObjectId::new();
        let document = ContactDocument {
            id: Some(id),
            ..ContactDocument::without_id(contact)
        };

        self.storage.insert(id, document);
        Ok(id.to_hex())
    }
}

#[async_trait]
impl ContactPurger for InMemoryRepository {
    async fn delete_all(&self) -> Result<u64> {
        let before = self.storage.len();
        self.storage.clear();
        Ok(before as u64)
    }
}

#[async_trait]
impl ContactGetter for InMemoryRepository {
    async fn get_by_id(&self, id: &str) -> Result<Contact> {
        let object_id = parse_object_id(id)?;

        self.storage
            .get(&object_id)
            .map(|entry| entry.value().clone().into_contact())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl ContactRemover for InMemoryRepository {
    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let object_id = parse_object_id(id)?;

        match self.storage.remove(&object_id) {
            Some(_) => Ok(true),
            None => Err(StorageError::NotFound(id.to_string())),
        }
    }
}

#[async_trait]
impl ContactUpdater for InMemoryRepository {
    async fn update(&self, contact: Contact) -> Result<bool> {
        let object_id = parse_object_id(&contact.id)?;

        match self.storage.get_mut(&object_id) {
            Some(mut entry) => {
                *entry = ContactDocument {
                    id: Some(object_id),
                    ..ContactDocument::without_id(contact)
                };
                Ok(true)
            }
            None => Err(StorageError::NotFound(contact.id)),
        }
    }
}
