mod contact;
mod health;

pub use contact::{ContactStatusResponse, SaveContactResponse};
pub use health::HealthResponse;
