//! Directory service configuration

use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the Firestore-backed transit directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Base URL of the Firestore REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Cloud project holding the directory
    #[serde(default = "default_project_id")]
    pub project_id: String,

    /// Database id within the project
    #[serde(default = "default_database_id")]
    pub database_id: String,

    /// Web API key appended as `key=` (optional for open rules)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Documents requested per page when listing a collection
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Upper bound on pages fetched for one listing
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_base_url() -> String {
    "https://firestore.googleapis.com".to_string()
}

fn default_project_id() -> String {
    "smart-transit".to_string()
}

fn default_database_id() -> String {
    "(default)".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_page_size() -> u32 {
    300
}

const fn default_max_pages() -> u32 {
    50
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            project_id: default_project_id(),
            database_id: default_database_id(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

impl DirectoryConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            project_id: "test-project".to_string(),
            timeout_secs: 5,
            page_size: 2,
            max_pages: 10,
            ..Default::default()
        }
    }

    /// URL of a collection's documents endpoint
    #[must_use]
    pub fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents/{collection}",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.database_id
        )
    }

    /// URL of one document, the id percent-encoded as a single path segment
    pub fn document_url(&self, collection: &str, id: &str) -> Result<Url, String> {
        let mut url = Url::parse(&self.documents_url(collection))
            .map_err(|e| format!("base_url is not a valid URL: {e}"))?;
        url.path_segments_mut()
            .map_err(|()| "base_url cannot carry a path".to_string())?
            .push(id);
        Ok(url)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        Url::parse(&self.base_url).map_err(|e| format!("base_url is not a valid URL: {e}"))?;

        if self.project_id.trim().is_empty() {
            return Err("project_id must not be empty".to_string());
        }

        if self.database_id.trim().is_empty() {
            return Err("database_id must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.page_size == 0 || self.page_size > 1000 {
            return Err("page_size must be between 1 and 1000".to_string());
        }

        if self.max_pages == 0 {
            return Err("max_pages must be greater than 0".to_string());
        }

        Ok(())
    }
}
