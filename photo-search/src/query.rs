//! Query construction
//!
//! The feed query is a fixed template (endpoint, output format, callback
//! marker, extra parameters) with the keyword slotted in as `tags`.

use std::collections::BTreeMap;
use url::{form_urlencoded, Url};

use crate::config::FeedConfig;
use crate::error::SearchError;

/// Fixed query template for the public photo feed
#[derive(Debug, Clone)]
pub struct QueryTemplate {
    endpoint: Url,
    format: String,
    callback_param: String,
    callback: String,
    extra_params: BTreeMap<String, String>,
}

impl QueryTemplate {
    /// Build the template from feed configuration
    pub fn from_config(config: &FeedConfig) -> Result<Self, SearchError> {
        let invalid = |reason: String| SearchError::InvalidEndpoint {
            endpoint: config.endpoint.clone(),
            reason,
        };

        let endpoint = Url::parse(&config.endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", endpoint.scheme())));
        }

        Ok(Self {
            endpoint,
            format: config.format.clone(),
            callback_param: config.callback_param.clone(),
            callback: config.callback.clone(),
            extra_params: config.extra_params.clone(),
        })
    }

    /// The feed endpoint queries are issued against
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the query URL for a keyword
    pub fn url_for(&self, keyword: &str) -> String {
        let mut params = vec![
            pair("format", &self.format),
            pair("tags", keyword),
        ];
        if !self.callback.is_empty() {
            params.push(pair(&self.callback_param, &self.callback));
        }
        params.extend(self.extra_params.iter().map(|(k, v)| pair(k, v)));

        let query = params.join("&");
        let mut url = self.endpoint.clone();
        let query = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{}&{}", existing, query),
            _ => query,
        };
        url.set_query(Some(&query));
        url.into()
    }
}

/// Percent-encode a query component, with spaces as `%20` rather than `+`
pub fn encode_component(value: &str) -> String {
    // byte_serialize emits `+` only for spaces; a literal `+` becomes `%2B`
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn pair(key: &str, value: &str) -> String {
    format!("{}={}", encode_component(key), encode_component(value))
}
