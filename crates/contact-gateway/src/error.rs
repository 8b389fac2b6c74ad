use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contact_core::{ErrorKind, StorageError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

pub const NOT_FOUND_SLUG: &str = "contact not found";

/// A failed request, rendered as `{slug, error?}`.
///
/// Not-found conditions share the 400 class with malformed requests. The
/// rendered body never carries `error`; the detailed body rides along as a
/// [`DetailedError`] extension for the router to swap in when debug errors
/// are enabled.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{slug}")]
    BadRequest {
        slug: &'static str,
        detail: Option<String>,
    },
    #[error("{slug}")]
    Internal {
        slug: &'static str,
        detail: Option<String>,
    },
}

impl AppError {
    pub fn bad_request(slug: &'static str, detail: Option<String>) -> Self {
        Self::BadRequest { slug, detail }
    }

    pub fn internal(slug: &'static str, detail: impl ToString) -> Self {
        Self::Internal {
            slug,
            detail: Some(detail.to_string()),
        }
    }

    /// Classifies a storage failure; `slug` is used for anything that is not
    /// a missing contact.
    pub fn from_storage(slug: &'static str, err: StorageError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => Self::bad_request(NOT_FOUND_SLUG, Some(err.to_string())),
            ErrorKind::BadRequest => Self::bad_request(slug, Some(err.to_string())),
            ErrorKind::Internal => Self::internal(slug, err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            AppError::BadRequest { slug, .. } | AppError::Internal { slug, .. } => slug,
        }
    }

    pub fn body(&self, expose_detail: bool) -> ErrorBody {
        let detail = match self {
            AppError::BadRequest { detail, .. } | AppError::Internal { detail, .. } => detail,
        };

        ErrorBody {
            slug: self.slug().to_string(),
            error: detail.clone().filter(|_| expose_detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error body including the underlying error text.
#[derive(Debug, Clone)]
pub struct DetailedError(pub ErrorBody);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), Json(self.body(false))).into_response();
        response
            .extensions_mut()
            .insert(DetailedError(self.body(true)));
        response
    }
}
