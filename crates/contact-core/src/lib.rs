//! Core types and traits for the contact API.
//!
//! This crate provides the service-level data model, the storage error
//! taxonomy and the single-method capability traits shared by the storage
//! backends and the HTTP gateway.

pub mod contact;
pub mod error;
pub mod repository;

pub use contact::{Contact, Phone};
pub use error::{ErrorKind, StorageError};
pub use repository::{
    ContactGetter, ContactLister, ContactPurger, ContactRemover, ContactRepository, ContactSaver,
    ContactUpdater,
};
