//! Error types for photo feed searches
//!
//! Failures fall into two groups: the feed could not be reached or decoded
//! ([`SearchError::Transport`]), or it answered with a payload that does not
//! have the feed's shape ([`SearchError::MalformedPayload`]). An empty feed
//! is not an error.

use thiserror::Error;

/// Shape violations detected while transforming a raw feed payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The payload has no `items` field (or is not an object at all)
    #[error("feed payload has no `items` field")]
    MissingItems,

    /// `items` exists but is not an array
    #[error("feed payload `items` is not an array")]
    ItemsNotArray,

    /// An entry of `items` is not an object
    #[error("feed item {index} is not an object")]
    ItemNotObject {
        /// Position of the offending entry
        index: usize,
    },
}

/// Errors that can occur while searching the feed
#[derive(Error, Debug)]
pub enum SearchError {
    /// The configured feed endpoint is not a usable URL
    #[error("invalid feed endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The endpoint as configured
        endpoint: String,
        /// Why it was rejected
        reason: String,
    },

    /// Network error, timeout, non-success status or undecodable body
    #[error("feed request failed: {0}")]
    Transport(String),

    /// The feed answered, but not with the expected shape
    #[error("malformed feed payload: {0}")]
    MalformedPayload(#[from] ParseError),
}

impl SearchError {
    /// Whether the failure happened at the network boundary
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Whether the feed returned a payload of the wrong shape
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPayload(_))
    }
}

/// Result type alias for photo search operations
pub type SearchOutcome<T> = Result<T, SearchError>;
