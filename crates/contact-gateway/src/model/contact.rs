use serde::{Deserialize, Serialize};

/// Returned by `POST /v1/contact`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveContactResponse {
    pub id: String,
    pub msg: String,
}

/// Returned by the by-id delete and update endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactStatusResponse {
    pub ok: bool,
    pub msg: String,
}
