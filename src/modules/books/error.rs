//! Error translation for the books repository

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::BookId;

/// Wire shape of a [`ModelError`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub status: u16,
}

/// Domain errors raised by write operations on books.
///
/// Store causes are kept as the error source for logging; they never reach
/// the message.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("can not create book")]
    CreationFailed {
        #[source]
        source: sqlx::Error,
    },

    #[error("book not found")]
    NotFound { id: BookId },

    #[error("can not update this book")]
    UpdateFailed {
        #[source]
        source: sqlx::Error,
    },
}

impl ModelError {
    /// Wrap a store failure raised while inserting
    pub fn creation_failed(source: sqlx::Error) -> Self {
        Self::CreationFailed { source }
    }

    /// Create a not found error
    pub fn not_found(id: BookId) -> Self {
        Self::NotFound { id }
    }

    /// Wrap a store failure raised while updating
    pub fn update_failed(source: sqlx::Error) -> Self {
        Self::UpdateFailed { source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ModelError::CreationFailed { .. } => StatusCode::BAD_REQUEST,
            ModelError::NotFound { .. } => StatusCode::BAD_REQUEST,
            ModelError::UpdateFailed { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            message: self.to_string(),
            status: self.status().as_u16(),
        }
    }
}

impl IntoResponse for ModelError {
    fn into_response(self) -> Response {
        let status = self.status();

        tracing::warn!(
            status_code = %status.as_u16(),
            error = %self,
            source = ?std::error::Error::source(&self).map(|e| e.to_string()),
            "books request failed"
        );

        (status, Json(self.body())).into_response()
    }
}

/// Failure inside a write operation, before translation.
#[derive(Debug)]
pub(crate) enum Failure {
    Model(ModelError),
    Store(sqlx::Error),
}

impl Failure {
    /// Domain errors pass through verbatim; store errors are wrapped with `wrap`.
    pub(crate) fn translate(self, wrap: impl FnOnce(sqlx::Error) -> ModelError) -> ModelError {
        match self {
            Failure::Model(err) => err,
            Failure::Store(err) => wrap(err),
        }
    }
}

impl From<ModelError> for Failure {
    fn from(err: ModelError) -> Self {
        Failure::Model(err)
    }
}

impl From<sqlx::Error> for Failure {
    fn from(err: sqlx::Error) -> Self {
        Failure::Store(err)
    }
}
