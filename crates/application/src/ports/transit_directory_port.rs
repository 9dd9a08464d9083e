//! Transit directory port
//!
//! Read-only access to the shared bus and bus-stop collections.

use std::fmt;

use async_trait::async_trait;
use domain::{RecordKind, TransitId, TransitRecord};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// The two collections the directory exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryCollection {
    /// Moving vehicles with a live location
    Buses,
    /// Fixed stops
    BusStops,
}

impl DirectoryCollection {
    /// Collection name in the backing store
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buses => "buses",
            Self::BusStops => "busStops",
        }
    }

    /// Kind of record stored in this collection
    #[must_use]
    pub const fn record_kind(&self) -> RecordKind {
        match self {
            Self::Buses => RecordKind::Bus,
            Self::BusStops => RecordKind::Stop,
        }
    }
}

impl fmt::Display for DirectoryCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port for the transit directory
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransitDirectoryPort: Send + Sync {
    /// Fetch every record in a collection
    ///
    /// Records with missing optional fields are returned as-is; only
    /// transport or decoding failures produce an error.
    async fn list_all(
        &self,
        collection: DirectoryCollection,
    ) -> Result<Vec<TransitRecord>, ApplicationError>;

    /// Fetch a single bus by id, `None` if it does not exist
    async fn get_bus(&self, id: &TransitId) -> Result<Option<TransitRecord>, ApplicationError>;

    /// Check if the directory is reachable
    async fn is_available(&self) -> bool;
}
