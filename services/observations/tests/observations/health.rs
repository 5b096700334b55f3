use http::StatusCode;
use pretty_assertions::assert_eq;
use sensorsign_observations::{Config, HealthStatus, StaticCredentialProvider};

use super::mock::*;

#[tokio::test]
async fn test_health_ok() {
    let mock = MockHttpSend::ok(r#"[{"id": "site-1", "name": "North Buoy"}]"#);
    let client = client(config(), &mock);

    let health = client.check_health().await;

    assert_eq!(health.status, HealthStatus::Ok);
    assert_eq!(health.message, "Data source is working");
}

#[tokio::test]
async fn test_health_reports_missing_settings_without_calling_out() {
    let mock = MockHttpSend::ok("[]");
    let client = client(Config::new().with_server_url(SERVER_URL), &mock);

    let health = client.check_health().await;

    assert!(!health.is_ok());
    assert_eq!(health.message, "HMAC signing key is missing");
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_health_no_things() {
    let mock = MockHttpSend::ok("[]");
    let client = client(config(), &mock);

    let health = client.check_health().await;

    assert_eq!(health.status, HealthStatus::Error);
    assert_eq!(health.message, "No root nodes found");
}

#[tokio::test]
async fn test_health_error_status() {
    let mock = MockHttpSend::new(|_| Ok((StatusCode::UNAUTHORIZED, "bad signature".to_string())));
    let client = client(config(), &mock);

    let health = client.check_health().await;

    assert_eq!(health.status, HealthStatus::Error);
    assert_eq!(health.message, "Request failed: bad signature");
}

#[tokio::test]
async fn test_health_malformed_body() {
    let mock = MockHttpSend::ok("<html>gateway</html>");
    let client = client(config(), &mock);

    let health = client.check_health().await;

    assert_eq!(health.status, HealthStatus::Error);
    assert!(health.message.starts_with("Unmarshaling failed: "));
}

#[tokio::test]
async fn test_health_transport_failure() {
    let mock = MockHttpSend::unreachable();
    let client = client(config(), &mock);

    let health = client.check_health().await;

    assert_eq!(health.status, HealthStatus::Error);
    assert!(health.message.starts_with("Request failed: "));
}

#[tokio::test]
async fn test_health_validates_the_resolved_credential() {
    let mock = MockHttpSend::ok(r#"[{"id": "site-1", "name": "North Buoy"}]"#);
    let client = client(config(), &mock)
        .with_credential_provider(StaticCredentialProvider::new(CLIENT_ID, ""));

    let health = client.check_health().await;

    assert_eq!(health.status, HealthStatus::Error);
    assert_eq!(health.message, "HMAC signing key is missing");
    assert_eq!(mock.calls(), 0);
}
