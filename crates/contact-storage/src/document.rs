//! BSON representation of a contact and the translation to and from the
//! service-level [`Contact`].

use contact_core::error::Result;
use contact_core::{Contact, Phone, StorageError};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A contact as stored in the `contact-list` collection.
///
/// `_id` is left out of the serialized form while it is unset, so the server
/// assigns one on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "username", default)]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telephone: PhoneDocument,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneDocument {
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub home: String,
}

/// Parses the hex form of an object id.
///
/// Anything that is not exactly 24 hex digits is reported as `NotFound`.
pub fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StorageError::invalid_id(id))
}

impl ContactDocument {
    /// Builds a document without an identifier, ignoring `contact.id`.
    pub fn without_id(contact: Contact) -> Self {
        Self {
            id: None,
            user_name: contact.user_name,
            email: contact.email,
            telephone: PhoneDocument {
                mobile: contact.telephone.mobile,
                home: contact.telephone.home,
            },
        }
    }

    /// Builds a document carrying the parsed `contact.id`.
    pub fn try_from_contact(contact: Contact) -> Result<Self> {
        let id = parse_object_id(&contact.id)?;
        Ok(Self {
            id: Some(id),
            ..Self::without_id(contact)
        })
    }

    pub fn into_contact(self) -> Contact {
        Contact {
            id: self.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_name: self.user_name,
            email: self.email,
            telephone: Phone {
                mobile: self.telephone.mobile,
                home: self.telephone.home,
            },
        }
    }
}
