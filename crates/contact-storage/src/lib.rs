pub mod document;
pub mod memory;
pub mod mongo;

pub use contact_core::{
    ContactGetter, ContactLister, ContactPurger, ContactRemover, ContactRepository, ContactSaver,
    ContactUpdater, ErrorKind, StorageError,
};
pub use memory::InMemoryRepository;
pub use mongo::{MongoOptions, MongoRepository, RetryPolicy};
