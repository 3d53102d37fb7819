//! Unified error type for LedgerEdge.
//!
//! Store, validation and gateway failures share one enum so the orchestration
//! layer can propagate with `?` and the HTTP layer can map each kind to a status.

use thiserror::Error;

/// Every failure the ledger can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced customer or record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up ("customer", "record")
        entity: &'static str,
        /// The identifier that was not found
        id: String,
    },

    /// Input rejected before it reached the store.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Non-database storage failure (in-memory store).
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable reason
        message: String,
    },

    /// The text-generation service failed, timed out, or answered off-schema.
    #[error("Gateway error: {message}")]
    Gateway {
        /// Human-readable reason
        message: String,
    },

    /// An AI request for this customer is already in flight.
    #[error("An AI request is already running for customer {customer_id}")]
    Busy {
        /// Customer whose request slot is taken
        customer_id: String,
    },

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable reason
        message: String,
    },

    /// I/O failure (binding a socket, reading files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client failure talking to the text-generation service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a missing customer.
    pub fn customer_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "customer",
            id: id.into(),
        }
    }

    /// Shorthand for a missing financial record.
    pub fn record_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "record",
            id: id.into(),
        }
    }

    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a gateway failure.
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
