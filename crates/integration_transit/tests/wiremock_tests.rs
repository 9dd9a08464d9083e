//! Integration tests for the directory and geocoding clients (wiremock-based)

use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_transit::{
    DirectoryClient, DirectoryConfig, DirectoryError, FirestoreDirectoryClient, GeocodingClient,
    GeocodingError, NominatimConfig, NominatimGeocodingClient,
};

const BUSES_PATH: &str = "/v1/projects/test-project/databases/(default)/documents/buses";

fn config_for_mock(base_url: &str) -> DirectoryConfig {
    DirectoryConfig {
        base_url: base_url.to_string(),
        ..DirectoryConfig::for_testing()
    }
}

fn geocoding_config_for_mock(base_url: &str) -> NominatimConfig {
    NominatimConfig {
        base_url: base_url.to_string(),
        ..NominatimConfig::for_testing()
    }
}

fn bus_document(id: &str, city: &str, lat: f64, lon: f64) -> serde_json::Value {
    serde_json::json!({
        "name": format!("projects/test-project/databases/(default)/documents/buses/{id}"),
        "fields": {
            "name": {"stringValue": format!("Bus {id}")},
            "cities": {"arrayValue": {"values": [{"stringValue": city}]}},
            "current_location": {"mapValue": {"fields": {
                "latitude": {"doubleValue": lat},
                "longitude": {"doubleValue": lon}
            }}},
            "occupancy": {"stringValue": "Available"}
        }
    })
}

#[tokio::test]
async fn test_list_documents_follows_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BUSES_PATH))
        .and(query_param("pageSize", "2"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [
                bus_document("b1", "Kochi", 9.93, 76.26),
                bus_document("b2", "Aluva", 10.10, 76.35)
            ],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(BUSES_PATH))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [bus_document("b3", "Kochi", 9.97, 76.29)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = FirestoreDirectoryClient::new(&config_for_mock(&server.uri())).unwrap();
    let documents = client.list_documents("buses").await.unwrap();

    let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["b1", "b2", "b3"]);
    assert_eq!(documents[0].cities, vec!["Kochi"]);
    assert_eq!(documents[0].occupancy.as_deref(), Some("Available"));
}

#[tokio::test]
async fn test_list_documents_sends_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BUSES_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let config = DirectoryConfig {
        api_key: Some("test-key".to_string()),
        ..config_for_mock(&server.uri())
    };
    let client = FirestoreDirectoryClient::new(&config).unwrap();

    let documents = client.list_documents("buses").await.unwrap();
    assert!(documents.is_empty());
}

#[tokio::test]
async fn test_list_documents_stops_at_page_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BUSES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [bus_document("loop", "Kochi", 9.93, 76.26)],
            "nextPageToken": "again"
        })))
        .mount(&server)
        .await;

    let config = DirectoryConfig {
        max_pages: 3,
        ..config_for_mock(&server.uri())
    };
    let client = FirestoreDirectoryClient::new(&config).unwrap();

    let documents = client.list_documents("buses").await.unwrap();
    assert_eq!(documents.len(), 3);
}

#[tokio::test]
async fn test_list_documents_server_error_is_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BUSES_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = FirestoreDirectoryClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.list_documents("buses").await.unwrap_err();

    assert!(matches!(err, DirectoryError::ServiceUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_list_documents_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BUSES_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = FirestoreDirectoryClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.list_documents("buses").await.unwrap_err();

    assert!(matches!(
        err,
        DirectoryError::RateLimitExceeded {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_forbidden_is_access_denied() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BUSES_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = FirestoreDirectoryClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.list_documents("buses").await.unwrap_err();

    assert!(matches!(err, DirectoryError::AccessDenied(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BUSES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = FirestoreDirectoryClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.list_documents("buses").await.unwrap_err();
    assert!(matches!(err, DirectoryError::ParseError(_)));
}

#[tokio::test]
async fn test_get_document_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{BUSES_PATH}/b7")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(bus_document("b7", "Kochi", 9.95, 76.27)),
        )
        .mount(&server)
        .await;

    let client = FirestoreDirectoryClient::new(&config_for_mock(&server.uri())).unwrap();
    let document = client.get_document("buses", "b7").await.unwrap().unwrap();

    assert_eq!(document.id, "b7");
    let location = document.location.unwrap();
    assert!((location.latitude - 9.95).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_get_document_escapes_reserved_characters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{BUSES_PATH}/KL07%232")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(bus_document("KL07#2", "Kochi", 9.95, 76.27)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{BUSES_PATH}/KL07")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(bus_document("KL07", "Kochi", 10.0, 76.0)),
        )
        .expect(0)
        .mount(&server)
        .await;

    let client = FirestoreDirectoryClient::new(&config_for_mock(&server.uri())).unwrap();
    let document = client.get_document("buses", "KL07#2").await.unwrap().unwrap();
    assert_eq!(document.id, "KL07#2");

    let missing = client.get_document("buses", "KL07?x=1").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_get_document_missing_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{BUSES_PATH}/ghost")))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": 404, "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let client = FirestoreDirectoryClient::new(&config_for_mock(&server.uri())).unwrap();
    let document = client.get_document("buses", "ghost").await.unwrap();
    assert!(document.is_none());
}

#[tokio::test]
async fn test_is_healthy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BUSES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = FirestoreDirectoryClient::new(&config_for_mock(&server.uri())).unwrap();
    assert!(client.is_healthy().await);
}

#[tokio::test]
async fn test_reverse_geocode_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("format", "jsonv2"))
        .and(query_param("accept-language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "MG Road, Ernakulam, Kochi, Kerala, 682016, India"
        })))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&geocoding_config_for_mock(&server.uri())).unwrap();
    let address = client.reverse_geocode(9.9312, 76.2673).await.unwrap();
    assert_eq!(address, "MG Road, Ernakulam, Kochi, Kerala, 682016, India");
}

#[tokio::test]
async fn test_reverse_geocode_unresolvable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"error": "Unable to geocode"})),
        )
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&geocoding_config_for_mock(&server.uri())).unwrap();
    let err = client.reverse_geocode(0.0, -160.0).await.unwrap_err();
    assert!(matches!(err, GeocodingError::AddressNotFound(_)));
}

#[tokio::test]
async fn test_reverse_geocode_cache_hit_skips_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "Vyttila, Kochi, Kerala, India"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = NominatimConfig {
        cache_ttl_minutes: 10,
        ..geocoding_config_for_mock(&server.uri())
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();

    let first = client.reverse_geocode(9.96671, 76.32061).await.unwrap();
    let second = client.reverse_geocode(9.96672, 76.32064).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_reverse_geocode_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&geocoding_config_for_mock(&server.uri())).unwrap();
    let err = client.reverse_geocode(9.93, 76.26).await.unwrap_err();
    assert!(err.is_retryable());
}
