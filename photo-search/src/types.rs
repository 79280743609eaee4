//! Core types for photo search results and coordinator state
//!
//! [`PhotoResult`] is the stable shape every feed item is normalized into.
//! [`SearchState`] is the view the presentation layer renders.

use serde::{Deserialize, Serialize};

/// A single normalized photo from the public feed
///
/// Every field is always present. Sub-fields missing from the feed map to
/// an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoResult {
    /// URL of the photo image (the feed's `media.m`)
    pub image: String,
    /// URL of the photo page
    pub link: String,
    /// The photo title
    pub title: String,
    /// The description as published by the feed (usually HTML)
    pub description: String,
}

/// Lifecycle of the most recently issued search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// No search has been issued yet
    Idle,
    /// The latest search is still outstanding
    Loading,
    /// The latest search settled with results (possibly none)
    Success,
    /// The latest search settled with a failure
    Failed,
}

/// User-facing search state owned by the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    /// Keyword of the most recently issued search
    pub keyword: String,
    /// Prompt, informational or error message for display
    pub message: String,
    /// Results of the latest successful search, in feed order
    pub results: Vec<PhotoResult>,
    /// Where the latest search is in its lifecycle
    pub status: SearchStatus,
}

impl SearchState {
    /// Initial state: no keyword, the prompt message and no results
    pub fn idle(prompt: impl Into<String>) -> Self {
        Self {
            keyword: String::new(),
            message: prompt.into(),
            results: Vec::new(),
            status: SearchStatus::Idle,
        }
    }
}
