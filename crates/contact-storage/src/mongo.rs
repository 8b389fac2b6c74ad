use std::fmt::Display;
use std::future::{Future, IntoFuture};
use std::time::Duration;

use async_trait::async_trait;
use contact_core::error::Result;
use contact_core::{
    Contact, ContactGetter, ContactLister, ContactPurger, ContactRemover, ContactSaver,
    ContactUpdater, StorageError,
};
use mongodb::bson::doc;
use mongodb::error::ErrorKind as MongoErrorKind;
use mongodb::{Client, Collection};
use tracing::{debug, error, info, warn};
use typed_builder::TypedBuilder;

use crate::document::{parse_object_id, ContactDocument};

pub const DEFAULT_DATABASE: &str = "contacts";
pub const DEFAULT_COLLECTION: &str = "contact-list";
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Where contacts live and how long a single operation may take.
#[derive(Debug, Clone, TypedBuilder)]
pub struct MongoOptions {
    #[builder(default = DEFAULT_DATABASE.to_string(), setter(into))]
    pub database: String,
    #[builder(default = DEFAULT_COLLECTION.to_string(), setter(into))]
    pub collection: String,
    #[builder(default = DEFAULT_OPERATION_TIMEOUT)]
    pub operation_timeout: Duration,
}

impl Default for MongoOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Fixed-count, fixed-delay retry used while establishing the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Runs `operation` until it succeeds or `attempts` tries are used up,
    /// sleeping `delay` between tries but not after the last one. At least
    /// one try is always made. Returns the last error on exhaustion.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> std::result::Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => {
                    debug!(attempt, "attempt succeeded");
                    return Ok(value);
                }
                Err(err) if attempt < attempts => {
                    warn!(attempt, max_attempts = attempts, error = %err, "attempt failed, retrying");
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(attempt, max_attempts = attempts, error = %err, "final attempt failed");
                    return Err(err);
                }
            }
        }
    }
}

/// MongoDB implementation of the contact capabilities.
///
/// Every operation runs under its own `operation_timeout`, regardless of the
/// caller. Identifiers are validated before any round-trip: a malformed id
/// is reported as `NotFound` without touching the server.
#[derive(Debug, Clone)]
pub struct MongoRepository {
    client: Client,
    collection: Collection<ContactDocument>,
    operation_timeout: Duration,
}

impl MongoRepository {
    /// Creates a repository from an existing client.
    pub fn new(client: Client, options: MongoOptions) -> Self {
        let collection = client
            .database(&options.database)
            .collection::<ContactDocument>(&options.collection);

        Self {
            client,
            collection,
            operation_timeout: options.operation_timeout,
        }
    }

    /// Connects with default options and the default retry policy.
    pub async fn connect(uri: &str) -> Result<Self> {
        Self::connect_with(uri, MongoOptions::default(), RetryPolicy::default()).await
    }

    /// Builds a client for `uri` and pings the server until it answers or the
    /// retry policy is exhausted.
    ///
    /// A malformed connection string fails immediately.
    pub async fn connect_with(uri: &str, options: MongoOptions, retry: RetryPolicy) -> Result<Self> {
        let client = Client::with_uri_str(uri).await.map_err(|err| {
            error!(error = %err, "invalid MongoDB connection string");
            StorageError::Unavailable(format!("invalid connection string: {err}"))
        })?;

        let connected = retry.run(|| ping(&client)).await;
        match connected {
            Ok(()) => {
                info!("connected to MongoDB");
                Ok(Self::new(client, options))
            }
            Err(err) => {
                let attempts = retry.attempts.max(1);
                error!(attempts, error = %err, "giving up on MongoDB");
                Err(StorageError::Unavailable(format!(
                    "failed to reach MongoDB after {attempts} attempts: {err}"
                )))
            }
        }
    }

    /// Shuts the client down, waiting for outstanding cursors and sessions.
    pub async fn close(&self) {
        self.client.clone().shutdown().await;
        debug!("MongoDB client shut down");
    }

    async fn bounded<T, F>(&self, operation: &'static str, future: F) -> Result<T>
    where
        F: IntoFuture<Output = mongodb::error::Result<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, future).await {
            Ok(result) => result.map_err(|err| map_mongo_error(operation, err)),
            Err(_) => Err(StorageError::Timeout(format!(
                "{operation}: no answer within {:?}",
                self.operation_timeout
            ))),
        }
    }
}

async fn ping(client: &Client) -> mongodb::error::Result<()> {
    client.database("admin").run_command(doc! { "ping": 1 }).await?;
    Ok(())
}

fn map_mongo_error(operation: &str, err: mongodb::error::Error) -> StorageError {
    let message = format!("{operation}: {err}");

    match err.kind.as_ref() {
        MongoErrorKind::ServerSelection { .. }
        | MongoErrorKind::ConnectionPoolCleared { .. }
        | MongoErrorKind::Authentication { .. }
        | MongoErrorKind::Io(_) => StorageError::Unavailable(message),
        MongoErrorKind::BsonDeserialization(_) => StorageError::InvalidData(message),
        MongoErrorKind::BsonSerialization(_) => StorageError::Operation(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ContactLister for MongoRepository {
    async fn list_all(&self) -> Result<Vec<Contact>> {
        let documents = self
            .bounded("list contacts", async {
                let mut cursor = self.collection.find(doc! {}).await?;
                let mut documents = Vec::new();
                while cursor.advance().await? {
                    documents.push(cursor.deserialize_current()?);
                }
                Ok::<_, mongodb::error::Error>(documents)
            })
            .await?;

        Ok(documents
            .into_iter()
            .map(ContactDocument::into_contact)
            .collect())
    }
}

#[async_trait]
impl ContactSaver for MongoRepository {
    async fn save(&self, contact: Contact) -> Result<String> {
        let document = ContactDocument::without_id(contact);

        let result = self
            .bounded("insert contact", self.collection.insert_one(document))
            .await?;

        result
            .inserted_id
            .as_object_id()
            .map(|id| id.to_hex())
            .ok_or_else(|| {
                StorageError::InvalidData(format!(
                    "insert returned a non-ObjectId identifier: {}",
                    result.inserted_id
                ))
            })
    }
}

#[async_trait]
impl ContactPurger for MongoRepository {
    async fn delete_all(&self) -> Result<u64> {
        let result = self
            .bounded("delete contacts", self.collection.delete_many(doc! {}))
            .await?;

        Ok(result.deleted_count)
    }
}

#[async_trait]
impl ContactGetter for MongoRepository {
    async fn get_by_id(&self, id: &str) -> Result<Contact> {
        let object_id = parse_object_id(id)?;

        let document = self
            .bounded(
                "get contact",
                self.collection.find_one(doc! { "_id": object_id }),
            )
            .await?;

        document
            .map(ContactDocument::into_contact)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl ContactRemover for MongoRepository {
    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let object_id = parse_object_id(id)?;

        let result = self
            .bounded(
                "delete contact",
                self.collection.delete_one(doc! { "_id": object_id }),
            )
            .await?;

        if result.deleted_count == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }

        Ok(true)
    }
}

#[async_trait]
impl ContactUpdater for MongoRepository {
    async fn update(&self, contact: Contact) -> Result<bool> {
        let id = contact.id.clone();
        let document = ContactDocument::try_from_contact(contact)?;
        let filter = doc! { "_id": document.id };

        let result = self
            .bounded(
                "update contact",
                self.collection.replace_one(filter, document),
            )
            .await?;

        if result.matched_count == 0 {
            return Err(StorageError::NotFound(id));
        }

        Ok(true)
    }
}
