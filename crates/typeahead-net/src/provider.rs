//! A [`SearchProvider`] that asks an HTTP suggestion endpoint.
//!
//! Each lookup is a `GET {endpoint}?{query_param}={term}`. The endpoint must
//! answer with either a bare JSON array of strings or an object with a
//! `results` array of strings. Any other outcome (transport failure,
//! non-2xx status, malformed body) becomes a [`LookupError`] carrying the
//! [`NetworkError`]'s message.

use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use typeahead_core::logging::targets;
use typeahead_core::{LookupError, SearchProvider, SearchResult};

use crate::error::{NetworkError, Result};
use crate::http::HttpClient;

/// Where and how to query a suggestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSearchConfig {
    /// Base URL of the endpoint.
    pub endpoint: String,
    /// Name of the query parameter carrying the term.
    pub query_param: String,
    /// Per-lookup timeout, overriding the client's.
    pub timeout: Option<Duration>,
}

impl HttpSearchConfig {
    /// Query `endpoint` with the default `q` parameter.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            query_param: "q".to_string(),
            timeout: None,
        }
    }

    /// Use a different query parameter name.
    pub fn with_query_param(mut self, name: impl Into<String>) -> Self {
        self.query_param = name.into();
        self
    }

    /// Set a per-lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Accepted response bodies.
#[derive(Deserialize)]
#[serde(untagged)]
enum SuggestionBody {
    List(Vec<String>),
    Wrapped { results: Vec<String> },
}

impl From<SuggestionBody> for Vec<String> {
    fn from(body: SuggestionBody) -> Self {
        match body {
            SuggestionBody::List(items) => items,
            SuggestionBody::Wrapped { results } => results,
        }
    }
}

/// Looks suggestions up over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSearchProvider {
    client: HttpClient,
    config: HttpSearchConfig,
}

impl HttpSearchProvider {
    /// Create a provider with a default client.
    pub fn new(config: HttpSearchConfig) -> Result<Self> {
        Ok(Self::with_client(HttpClient::new()?, config))
    }

    /// Create a provider sharing an existing client.
    pub fn with_client(client: HttpClient, config: HttpSearchConfig) -> Self {
        Self { client, config }
    }

    /// The endpoint configuration.
    pub fn config(&self) -> &HttpSearchConfig {
        &self.config
    }

    /// Run one lookup and return the suggestions.
    pub async fn fetch(&self, term: &str) -> Result<Vec<String>> {
        fetch_suggestions(&self.client, &self.config, term).await
    }
}

async fn fetch_suggestions(
    client: &HttpClient,
    config: &HttpSearchConfig,
    term: &str,
) -> Result<Vec<String>> {
    let mut request = client
        .get(&config.endpoint)
        .header("Accept", "application/json")
        .query(config.query_param.as_str(), term);
    if let Some(timeout) = config.timeout {
        request = request.timeout(timeout);
    }

    tracing::debug!(target: targets::NET, endpoint = %config.endpoint, term, "requesting suggestions");
    let response = request.send().await?.error_for_status_with_body().await?;
    let body: SuggestionBody = response.json().await?;
    let items: Vec<String> = body.into();
    tracing::debug!(target: targets::NET, term, count = items.len(), "suggestions received");
    Ok(items)
}

impl SearchProvider for HttpSearchProvider {
    fn search(&self, term: &str) -> BoxFuture<'static, SearchResult> {
        let client = self.client.clone();
        let config = self.config.clone();
        let term = term.to_string();
        async move {
            fetch_suggestions(&client, &config, &term)
                .await
                .map_err(|err: NetworkError| {
                    tracing::debug!(target: targets::NET, term, error = %err, "lookup failed");
                    LookupError::from(err)
                })
        }
        .boxed()
    }
}
