use serde::{Deserialize, Serialize};

/// A contact record as seen by the API and the handlers.
///
/// `id` is empty until the record has been persisted. Once stored it holds
/// the hex form of the storage identifier, which is assigned by the storage
/// backend and never by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "username", default)]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telephone: Phone,
}

/// Phone numbers embedded in a [`Contact`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub home: String,
}

impl Contact {
    /// Returns the same contact carrying the given identifier.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self
        }
    }
}
