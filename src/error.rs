//! Defines the app level error type and conversions to API responses and HTML pages.
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The `month` query parameter is not a month name, abbreviation or
    /// number between 1 and 12.
    #[error("\"{0}\" is not a valid month")]
    InvalidMonth(String),

    /// The `month` query parameter was required but not given.
    #[error("the month query parameter is required")]
    MissingMonth,

    /// The query string could not be decoded, e.g. `page=abc` or `perPage=-1`.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// A page number of zero was requested. Pages start at one.
    #[error("page must be 1 or greater, got {0}")]
    InvalidPage(u64),

    /// The requested page size is zero or larger than the configured maximum.
    #[error("perPage must be between 1 and {max}, got {got}")]
    InvalidPageSize {
        /// The page size from the request.
        got: u64,
        /// The largest page size the server will return.
        max: u64,
    },

    /// The seed data could not be downloaded or decoded.
    ///
    /// The error string comes from the HTTP client or JSON decoder.
    #[error("could not fetch seed data: {0}")]
    SeedFetchError(String),

    /// The seed data was downloaded but is not a JSON array of records.
    #[error("seed data is not a JSON array of records: {0}")]
    InvalidSeedData(String),

    /// A record in the seed data could not be converted into a product
    /// transaction.
    #[error("invalid seed record at index {index}: {reason}")]
    InvalidSeedRecord {
        /// The position of the record in the feed.
        index: usize,
        /// What was wrong with the record.
        reason: String,
    },

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A background task panicked or was cancelled before it finished.
    #[error("a background task failed: {0}")]
    TaskError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::SeedFetchError(value.to_string())
    }
}

impl From<QueryRejection> for Error {
    fn from(value: QueryRejection) -> Self {
        Error::InvalidQuery(value.body_text())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Error::TaskError(value.to_string())
    }
}

impl Error {
    /// Whether the error was caused by the request rather than the server.
    fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidMonth(_)
                | Error::MissingMonth
                | Error::InvalidQuery(_)
                | Error::InvalidPage(_)
                | Error::InvalidPageSize { .. }
        )
    }

    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Convert the error into a plain text response for the JSON API.
    ///
    /// `action` describes what the handler was doing, e.g. "fetching statistics",
    /// and the body reads "Error {action}: {error}".
    pub(crate) fn into_api_response(self, action: &str) -> Response {
        let status = self.status_code();

        if !self.is_client_error() {
            tracing::error!("Error {action}: {self}");
        }

        (status, format!("Error {action}: {self}")).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            error if error.is_client_error() => (
                StatusCode::BAD_REQUEST,
                error_view(
                    "Bad Request",
                    "400",
                    "Invalid request",
                    &format!("{error}. Check the address and try again."),
                ),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_view(
                        "Internal Server Error",
                        "500",
                        "Sorry, something went wrong.",
                        "Try again later or check the server logs",
                    ),
                )
                    .into_response()
            }
        }
    }
}
