//! Photo Search Library
//!
//! Keyword search over the public photo feed, normalized into
//! [`PhotoResult`] records.
//!
//! The pipeline has three parts, each usable on its own:
//! - [`parser::parse`] turns a raw feed payload into results
//! - [`PhotoSearchClient`] builds the query, fetches it through a
//!   [`FeedFetcher`] and parses the payload
//! - [`SearchCoordinator`] owns the user-facing [`SearchState`]
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use photo_search::{Config, PhotoSearchClient, SearchCoordinator};
//!
//! let config = Config::load()?;
//! let client = PhotoSearchClient::from_config(&config)?;
//! let coordinator = SearchCoordinator::new(Arc::new(client), config.messages);
//!
//! coordinator.search("red").await;
//! for photo in coordinator.state().results {
//!     println!("{} {}", photo.title, photo.link);
//! }
//! ```
//!
//! # Configuration
//! Set `PHOTO_SEARCH_ENDPOINT` or configure in `~/.photo-search/config.toml`

pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod fetch;
pub mod init;
pub mod parser;
pub mod query;
pub mod types;

pub use client::{PhotoSearch, PhotoSearchClient};
pub use config::Config;
pub use coordinator::{SearchCoordinator, Settlement};
pub use error::{ParseError, SearchError, SearchOutcome};
pub use fetch::{FeedFetcher, HttpFeedFetcher};
pub use init::{init_tracing, LogFormat};
pub use query::QueryTemplate;
pub use types::{PhotoResult, SearchState, SearchStatus};
