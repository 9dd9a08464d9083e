//! Firestore REST directory client
//!
//! Reads the `buses` and `busStops` collections through the public
//! [Firestore REST API](https://firebase.google.com/docs/firestore/use-rest-api).
//! The client is read-only.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, instrument, warn};

use crate::config::DirectoryConfig;
use crate::error::DirectoryError;
use crate::models::{DirectoryDocument, FirestoreDocument, ListDocumentsResponse};

/// Trait for transit directory clients
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Fetch every document of a collection, all pages concatenated in order
    async fn list_documents(&self, collection: &str)
    -> Result<Vec<DirectoryDocument>, DirectoryError>;

    /// Fetch one document, `None` if it does not exist
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DirectoryDocument>, DirectoryError>;

    /// Check if the directory is reachable
    async fn is_healthy(&self) -> bool;
}

/// Directory client over the Firestore REST API
#[derive(Debug)]
pub struct FirestoreDirectoryClient {
    client: Client,
    config: DirectoryConfig,
}

impl FirestoreDirectoryClient {
    /// Create a new Firestore directory client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        config
            .validate()
            .map_err(DirectoryError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("SmartTransit/0.2")
            .build()
            .map_err(|e| DirectoryError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Attach the API key, if one is configured
    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => request.query(&[("key", key)]),
            _ => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DirectoryError> {
        self.with_key(request).send().await.map_err(|e| {
            if e.is_timeout() {
                DirectoryError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                }
            } else {
                DirectoryError::ConnectionFailed(e.to_string())
            }
        })
    }

    /// Map non-success statuses to errors
    fn check_status(response: &Response) -> Result<(), DirectoryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(match status {
            StatusCode::TOO_MANY_REQUESTS => DirectoryError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                DirectoryError::AccessDenied(format!("HTTP {status}"))
            },
            s if s.is_server_error() => DirectoryError::ServiceUnavailable(format!("HTTP {s}")),
            s => DirectoryError::RequestFailed(format!("HTTP {s}")),
        })
    }

    async fn fetch_page(
        &self,
        url: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, DirectoryError> {
        let mut params = vec![("pageSize", self.config.page_size.to_string())];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let response = self.send(self.client.get(url).query(&params)).await?;
        Self::check_status(&response)?;

        response
            .json()
            .await
            .map_err(|e| DirectoryError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl DirectoryClient for FirestoreDirectoryClient {
    #[instrument(skip(self))]
    async fn list_documents(
        &self,
        collection: &str,
    ) -> Result<Vec<DirectoryDocument>, DirectoryError> {
        let url = self.config.documents_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 1..=self.config.max_pages {
            let response = self.fetch_page(&url, page_token.as_deref()).await?;
            debug!(page, count = response.documents.len(), "Fetched directory page");

            documents.extend(
                response
                    .documents
                    .into_iter()
                    .map(FirestoreDocument::into_directory_document),
            );

            match response.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(documents),
            }
        }

        warn!(
            max_pages = self.config.max_pages,
            count = documents.len(),
            "Directory listing truncated at page limit"
        );
        Ok(documents)
    }

    #[instrument(skip(self))]
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DirectoryDocument>, DirectoryError> {
        let url = self
            .config
            .document_url(collection, id)
            .map_err(DirectoryError::ConfigurationError)?;
        let response = self.send(self.client.get(url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Directory document not found");
            return Ok(None);
        }
        Self::check_status(&response)?;

        let document: FirestoreDocument = response
            .json()
            .await
            .map_err(|e| DirectoryError::ParseError(e.to_string()))?;

        Ok(Some(document.into_directory_document()))
    }

    async fn is_healthy(&self) -> bool {
        let url = self.config.documents_url("buses");
        let request = self.client.get(&url).query(&[("pageSize", "1")]);
        match self.send(request).await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Directory health check failed");
                false
            },
        }
    }
}
