//! Transit directory and geocoding integration for Smart Transit
//!
//! Provides read access to the bus and bus-stop directory stored in
//! [Cloud Firestore](https://firebase.google.com/docs/firestore/use-rest-api)
//! and reverse geocoding via
//! [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org).
//!
//! # Architecture
//!
//! [`DirectoryClient`] defines the interface for listing a collection and
//! fetching a single document, implemented by [`FirestoreDirectoryClient`].
//! [`GeocodingClient`] turns coordinates into addresses via
//! [`NominatimGeocodingClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_transit::{DirectoryClient, DirectoryConfig, FirestoreDirectoryClient};
//!
//! let client = FirestoreDirectoryClient::new(&DirectoryConfig::default())?;
//! let buses = client.list_documents("buses").await?;
//! ```

mod client;
mod config;
mod error;
mod geocoding;
mod models;

pub use client::{DirectoryClient, FirestoreDirectoryClient};
pub use config::DirectoryConfig;
pub use error::DirectoryError;
pub use geocoding::{GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient};
pub use models::{DirectoryDocument, GeoPoint};
