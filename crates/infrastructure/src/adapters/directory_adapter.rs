//! Directory adapter - Implements TransitDirectoryPort using integration_transit

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{DirectoryCollection, TransitDirectoryPort};
use async_trait::async_trait;
use domain::{
    Coordinate, OccupancyState, OperationalState, RecordKind, TransitId, TransitRecord,
};
use integration_transit::{
    DirectoryClient, DirectoryConfig, DirectoryDocument, DirectoryError, FirestoreDirectoryClient,
};
use tracing::{debug, instrument, warn};

/// Adapter for the Firestore-backed bus and stop directory
pub struct FirestoreDirectoryAdapter {
    client: Arc<dyn DirectoryClient>,
}

impl std::fmt::Debug for FirestoreDirectoryAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreDirectoryAdapter")
            .field("client", &"DirectoryClient")
            .finish()
    }
}

impl FirestoreDirectoryAdapter {
    /// Create an adapter over a Firestore REST client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client fails to initialize.
    pub fn new(config: &DirectoryConfig) -> Result<Self, ApplicationError> {
        let client = FirestoreDirectoryClient::new(config).map_err(Self::map_error)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create an adapter over any directory client
    #[must_use]
    pub fn with_client(client: Arc<dyn DirectoryClient>) -> Self {
        Self { client }
    }

    /// Map integration directory error to application error
    fn map_error(err: DirectoryError) -> ApplicationError {
        match err {
            DirectoryError::ConnectionFailed(e) => ApplicationError::Unavailable(e),
            DirectoryError::Timeout { timeout_secs } => ApplicationError::Unavailable(format!(
                "directory request timed out after {timeout_secs}s"
            )),
            DirectoryError::RequestFailed(e)
            | DirectoryError::ParseError(e)
            | DirectoryError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            DirectoryError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
            DirectoryError::AccessDenied(e) | DirectoryError::ConfigurationError(e) => {
                ApplicationError::Configuration(e)
            },
        }
    }

    /// Convert a directory document into a domain record
    ///
    /// Documents with an unusable id are skipped; an out-of-range position is
    /// dropped and the record kept without a location.
    fn to_record(kind: RecordKind, document: DirectoryDocument) -> Option<TransitRecord> {
        let id = match TransitId::new(document.id.as_str()) {
            Ok(id) => id,
            Err(e) => {
                warn!(id = %document.id, error = %e, "Skipping directory document");
                return None;
            },
        };

        let name = document
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| id.as_str().to_string());
        let mut record = TransitRecord::new(id, kind, name).with_cities(&document.cities);
        for city in record.multi_word_cities() {
            warn!(id = %record.id(), city, "Multi-word city never matches an address token");
        }

        if let Some(point) = document.location {
            match Coordinate::new(point.latitude, point.longitude) {
                Ok(coordinate) => record = record.with_location(coordinate),
                Err(e) => warn!(id = %record.id(), error = %e, "Ignoring invalid location"),
            }
        }
        if let Some(label) = document.occupancy.as_deref() {
            record = record.with_occupancy(OccupancyState::from_label(label));
        }
        if let Some(label) = document.status.as_deref() {
            record = record.with_operational(OperationalState::from_label(label));
        }

        Some(record)
    }
}

#[async_trait]
impl TransitDirectoryPort for FirestoreDirectoryAdapter {
    #[instrument(skip(self))]
    async fn list_all(
        &self,
        collection: DirectoryCollection,
    ) -> Result<Vec<TransitRecord>, ApplicationError> {
        let documents = self
            .client
            .list_documents(collection.as_str())
            .await
            .map_err(Self::map_error)?;

        let fetched = documents.len();
        let records: Vec<TransitRecord> = documents
            .into_iter()
            .filter_map(|document| Self::to_record(collection.record_kind(), document))
            .collect();

        debug!(fetched, kept = records.len(), "Loaded directory collection");
        Ok(records)
    }

    #[instrument(skip(self), fields(bus_id = %id))]
    async fn get_bus(&self, id: &TransitId) -> Result<Option<TransitRecord>, ApplicationError> {
        let document = self
            .client
            .get_document(DirectoryCollection::Buses.as_str(), id.as_str())
            .await
            .map_err(Self::map_error)?;

        Ok(document.and_then(|document| Self::to_record(RecordKind::Bus, document)))
    }

    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}

#[cfg(test)]
mod tests {
    use integration_transit::GeoPoint;
    use mockall::{mock, predicate::eq};

    use super::*;

    mock! {
        pub Directory {}

        #[async_trait::async_trait]
        impl DirectoryClient for Directory {
            async fn list_documents(&self, collection: &str) -> Result<Vec<DirectoryDocument>, DirectoryError>;
            async fn get_document(&self, collection: &str, id: &str) -> Result<Option<DirectoryDocument>, DirectoryError>;
            async fn is_healthy(&self) -> bool;
        }
    }

    fn document(id: &str, location: Option<(f64, f64)>) -> DirectoryDocument {
        DirectoryDocument {
            id: id.to_string(),
            name: Some(format!("Bus {id}")),
            cities: vec!["Kochi".to_string(), " Aluva ".to_string()],
            location: location.map(|(latitude, longitude)| GeoPoint {
                latitude,
                longitude,
            }),
            occupancy: Some("Partially Filled".to_string()),
            status: Some("Running".to_string()),
        }
    }

    #[test]
    fn to_record_maps_all_fields() {
        let record =
            FirestoreDirectoryAdapter::to_record(RecordKind::Bus, document("b1", Some((9.9, 76.3))))
                .unwrap();

        assert_eq!(record.id().as_str(), "b1");
        assert_eq!(record.name(), "Bus b1");
        assert_eq!(record.kind(), RecordKind::Bus);
        assert!(record.service_area_cities().contains("kochi"));
        assert!(record.service_area_cities().contains("aluva"));
        assert!(record.current_location().is_some());
        assert_eq!(record.occupancy(), OccupancyState::FullySeated);
        assert_eq!(record.operational(), OperationalState::Running);
    }

    #[test]
    fn to_record_skips_blank_id() {
        assert!(FirestoreDirectoryAdapter::to_record(RecordKind::Stop, document("  ", None)).is_none());
    }

    #[test]
    fn to_record_drops_out_of_range_location() {
        let record = FirestoreDirectoryAdapter::to_record(
            RecordKind::Bus,
            document("b2", Some((123.0, 76.3))),
        )
        .unwrap();
        assert!(record.current_location().is_none());
    }

    #[test]
    fn to_record_keeps_multi_word_city() {
        let mut doc = document("b5", None);
        doc.cities = vec!["Fort Kochi".to_string(), "Aluva".to_string()];
        let record = FirestoreDirectoryAdapter::to_record(RecordKind::Bus, doc).unwrap();
        assert!(record.service_area_cities().contains("aluva"));
        assert_eq!(record.multi_word_cities().collect::<Vec<_>>(), vec!["fort kochi"]);
    }

    #[test]
    fn to_record_falls_back_to_id_for_name() {
        let mut doc = document("vyttila", None);
        doc.name = None;
        doc.occupancy = None;
        let record = FirestoreDirectoryAdapter::to_record(RecordKind::Stop, doc).unwrap();
        assert_eq!(record.name(), "vyttila");
        assert_eq!(record.occupancy(), OccupancyState::Unknown);
    }

    #[test]
    fn map_error_variants() {
        assert!(matches!(
            FirestoreDirectoryAdapter::map_error(DirectoryError::ConnectionFailed("refused".into())),
            ApplicationError::Unavailable(_)
        ));
        assert!(matches!(
            FirestoreDirectoryAdapter::map_error(DirectoryError::Timeout { timeout_secs: 10 }),
            ApplicationError::Unavailable(_)
        ));
        assert!(matches!(
            FirestoreDirectoryAdapter::map_error(DirectoryError::RateLimitExceeded {
                retry_after_secs: None
            }),
            ApplicationError::RateLimited
        ));
        assert!(matches!(
            FirestoreDirectoryAdapter::map_error(DirectoryError::AccessDenied("403".into())),
            ApplicationError::Configuration(_)
        ));
        assert!(matches!(
            FirestoreDirectoryAdapter::map_error(DirectoryError::ServiceUnavailable("503".into())),
            ApplicationError::ExternalService(_)
        ));
    }

    #[tokio::test]
    async fn list_all_uses_collection_name_and_kind() {
        let mut client = MockDirectory::new();
        client
            .expect_list_documents()
            .with(eq("busStops"))
            .times(1)
            .returning(|_| Ok(vec![document("s1", Some((9.97, 76.32))), document("", None)]));

        let adapter = FirestoreDirectoryAdapter::with_client(Arc::new(client));
        let records = adapter.list_all(DirectoryCollection::BusStops).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind(), RecordKind::Stop);
    }

    #[tokio::test]
    async fn list_all_propagates_errors() {
        let mut client = MockDirectory::new();
        client
            .expect_list_documents()
            .returning(|_| Err(DirectoryError::ServiceUnavailable("HTTP 503".into())));

        let adapter = FirestoreDirectoryAdapter::with_client(Arc::new(client));
        let err = adapter.list_all(DirectoryCollection::Buses).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn get_bus_reads_buses_collection() {
        let mut client = MockDirectory::new();
        client
            .expect_get_document()
            .with(eq("buses"), eq("KL07-1234"))
            .returning(|_, id| Ok(Some(document(id, Some((10.0, 76.4))))));
        client
            .expect_get_document()
            .with(eq("buses"), eq("ghost"))
            .returning(|_, _| Ok(None));

        let adapter = FirestoreDirectoryAdapter::with_client(Arc::new(client));

        let bus = adapter
            .get_bus(&TransitId::new("KL07-1234").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bus.kind(), RecordKind::Bus);

        let missing = adapter.get_bus(&TransitId::new("ghost").unwrap()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn is_available_delegates_to_health_check() {
        let mut client = MockDirectory::new();
        client.expect_is_healthy().returning(|| false);

        let adapter = FirestoreDirectoryAdapter::with_client(Arc::new(client));
        assert!(!adapter.is_available().await);
    }

    #[test]
    fn debug_impl() {
        let adapter = FirestoreDirectoryAdapter::with_client(Arc::new(MockDirectory::new()));
        assert!(format!("{adapter:?}").contains("FirestoreDirectoryAdapter"));
    }
}
