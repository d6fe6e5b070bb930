//! Geocoding integration tests against a mock Nominatim server

use std::time::Duration as StdDuration;

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use souvenirs::application::ports::{GeocodeError, Geocoder};
use souvenirs::application::{BoundedLookup, ComposeEntryUseCase};
use souvenirs::domain::journal::{Coordinate, EntryDraft};
use souvenirs::infrastructure::{FsArtifactStore, JsonEntryStore, NominatimGeocoder};

const USER_AGENT: &str = "souvenirs-tests/1.0";

fn geocoder(server: &MockServer) -> NominatimGeocoder {
    NominatimGeocoder::with_base_url(server.uri(), USER_AGENT).unwrap()
}

fn places(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json")
}

#[tokio::test]
async fn resolves_first_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Eiffel Tower"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(places(
            r#"[{"lat":"48.8583701","lon":"2.2944813","display_name":"Tour Eiffel"}]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let coordinate = geocoder(&server).resolve("Eiffel Tower").await.unwrap();
    assert_eq!(coordinate, Coordinate::new(48.8583701, 2.2944813));
}

#[tokio::test]
async fn empty_result_is_no_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(places("[]"))
        .mount(&server)
        .await;

    assert!(matches!(
        geocoder(&server).resolve("Nowhere at all").await,
        Err(GeocodeError::NoMatch)
    ));
}

#[tokio::test]
async fn server_error_is_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    match geocoder(&server).resolve("Paris").await {
        Err(GeocodeError::RequestFailed(message)) => assert!(message.contains("500")),
        other => panic!("expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn rate_limit_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    match geocoder(&server).resolve("Paris").await {
        Err(GeocodeError::RequestFailed(message)) => assert_eq!(message, "Rate limited"),
        other => panic!("expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(places(r#"{"error":"Unable to geocode"}"#))
        .mount(&server)
        .await;

    assert!(matches!(
        geocoder(&server).resolve("Paris").await,
        Err(GeocodeError::ParseError(_))
    ));
}

#[tokio::test]
async fn slow_provider_yields_absent_coordinate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            places(r#"[{"lat":"1.0","lon":"2.0"}]"#).set_delay(StdDuration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let lookup = BoundedLookup::new(geocoder(&server));
    let outcome = lookup.lookup("Paris", StdDuration::from_millis(200)).await;

    assert!(outcome.coordinate.is_none());
}

#[tokio::test]
async fn compose_stores_resolved_coordinate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "Kyoto"))
        .respond_with(places(r#"[{"lat":"35.0","lon":"135.75"}]"#))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let journal_path = dir.path().join("journal.json");
    let compose = ComposeEntryUseCase::new(
        FsArtifactStore::new(dir.path().join("audio")),
        geocoder(&server),
        JsonEntryStore::new(&journal_path),
    );

    let draft = EntryDraft {
        title: "Temple".to_string(),
        body: "Maple leaves".to_string(),
        location_label: " Kyoto ".to_string(),
        is_anonymous: true,
    };
    let entry = compose.execute(draft, None).await.unwrap();

    assert_eq!(entry.coordinate, Some(Coordinate::new(35.0, 135.75)));
    assert_eq!(entry.location_label, "Kyoto");

    let saved = std::fs::read_to_string(&journal_path).unwrap();
    assert!(saved.contains("135.75"));
    assert!(saved.contains(&entry.id.to_string()));
}
