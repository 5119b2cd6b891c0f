//! A client for a transaction store that speaks REST/JSON over HTTP.
//!
//! Resource paths end with a slash: the collection lives at
//! `{base}/transactions/` and a single transaction at `{base}/transactions/{id}/`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};

use crate::{
    Error,
    store::{StoreError, TransactionStore},
    transaction::{NewTransaction, Transaction, TransactionId},
};

/// The resource name of the transaction collection.
const TRANSACTIONS_RESOURCE: &str = "transactions";

/// Error bodies longer than this many characters are cut off in [StoreError::Status].
const MAX_ERROR_MESSAGE_CHARS: usize = 200;

/// A [TransactionStore] backed by a remote REST API.
#[derive(Debug, Clone)]
pub struct HttpTransactionStore {
    client: Client,
    base_url: Url,
}

impl HttpTransactionStore {
    /// Create a client for the API at `base_url`, e.g. `http://localhost:8000/api`.
    ///
    /// Requests that take longer than `timeout` fail with [StoreError::Network].
    ///
    /// # Errors
    /// Returns [Error::InvalidApiUrl] if `base_url` is not an absolute HTTP(S) URL,
    /// or [Error::HttpClientError] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let mut normalized = base_url.trim().to_owned();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }

        let base_url = Url::parse(&normalized)
            .map_err(|error| Error::InvalidApiUrl(format!("{base_url}: {error}")))?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidApiUrl(format!(
                "{base_url}: expected an http or https URL"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::HttpClientError(error.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// The URL of the resource at `segments` below the base URL, with a trailing slash.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();

        // `new` only accepts URLs that can be a base, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments).push("");
        }

        url
    }
}

#[async_trait]
impl TransactionStore for HttpTransactionStore {
    async fn list(&self) -> Result<Vec<Transaction>, StoreError> {
        let url = self.url(&[TRANSACTIONS_RESOURCE]);
        tracing::debug!("GET {url}");

        let response = self.client.get(url).send().await.map_err(into_store_error)?;

        ensure_success(response)
            .await?
            .json()
            .await
            .map_err(into_store_error)
    }

    async fn create(&self, transaction: NewTransaction) -> Result<Transaction, StoreError> {
        let url = self.url(&[TRANSACTIONS_RESOURCE]);
        tracing::debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .json(&transaction)
            .send()
            .await
            .map_err(into_store_error)?;

        ensure_success(response)
            .await?
            .json()
            .await
            .map_err(into_store_error)
    }

    async fn delete(&self, id: &TransactionId) -> Result<(), StoreError> {
        let url = self.url(&[TRANSACTIONS_RESOURCE, id.as_str()]);
        tracing::debug!("DELETE {url}");

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(into_store_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.clone()));
        }

        ensure_success(response).await.map(|_| ())
    }
}

fn into_store_error(error: reqwest::Error) -> StoreError {
    if error.is_decode() {
        StoreError::MalformedResponse(error.to_string())
    } else {
        StoreError::Network(error.to_string())
    }
}

async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_owned()
    } else {
        body.chars().take(MAX_ERROR_MESSAGE_CHARS).collect()
    };

    Err(StoreError::Status {
        status: status.as_u16(),
        message,
    })
}
