//! HTTP gateway for the contact API.
//!
//! Routes `/v1/contact` requests to handlers that each depend on a single
//! storage capability from `contact_core`.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod telemetry;

pub use app::App;
pub use error::{AppError, Result};
