use http::header::{AUTHORIZATION, DATE};
use http::StatusCode;
use pretty_assertions::assert_eq;
use sensorsign_core::time::parse_rfc3339;
use sensorsign_core::ErrorKind;
use sensorsign_observations::sign_request::{canonical_message, sign, SignableRequest};
use sensorsign_observations::{ResourceQuery, StaticCredentialProvider};

use super::mock::*;

#[tokio::test]
async fn test_list_things() -> anyhow::Result<()> {
    let mock = MockHttpSend::ok("[]");
    let client = client(config(), &mock);

    let resp = client.list_things().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body().as_ref(), b"[]");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].uri, "https://api.example.com/sites");
    assert_eq!(requests[0].headers[DATE], "2024-01-01T00:00:00.000Z");
    assert_eq!(
        requests[0].headers[AUTHORIZATION],
        "xCloud YWJj:Qm5Ke43pF2stC69rBEA1sHdbeAylHyQK0F1GRQ36LJ0="
    );

    Ok(())
}

#[tokio::test]
async fn test_list_data_streams_uses_singular_site() -> anyhow::Result<()> {
    let mock = MockHttpSend::ok("[]");
    let client = client(config(), &mock);

    client.list_data_streams("site-42").await?;

    let requests = mock.requests();
    assert_eq!(requests[0].path_and_query, "/site/site-42/datastreams");
    assert_eq!(
        requests[0].headers[AUTHORIZATION],
        "xCloud YWJj:hU+fQAAcnGFBpKEf0JhuHqyWo+V7je6FdY/c1jJ4XL0="
    );

    Ok(())
}

#[tokio::test]
async fn test_list_observations_signs_query_string() -> anyhow::Result<()> {
    let mock = MockHttpSend::ok("{}");
    let client = client(config(), &mock);

    client
        .list_observations(
            ["d1", "d2"],
            parse_rfc3339("2024-01-01T00:00:00Z")?,
            parse_rfc3339("2024-01-02T00:00:00Z")?,
        )
        .await?;

    let requests = mock.requests();
    let expected_path = "/observations?from=2024-01-01T00%3A00%3A00.000Z&until=2024-01-02T00%3A00%3A00.000Z&datastreamIds=d1&datastreamIds=d2";
    assert_eq!(requests[0].path_and_query, expected_path);
    assert_eq!(
        requests[0].headers[AUTHORIZATION],
        "xCloud YWJj:7b8HX7GLc+WvGp5/ElA6vK6jOkW+aDOc5COOB6V8h4A="
    );

    // The server rebuilds the message from the Date header and the request line.
    let date = requests[0].headers[DATE].to_str()?;
    let message = canonical_message(&SignableRequest::get(date, expected_path, CLIENT_ID));
    let signature = sign(&message, SECRET_KEY)?;
    assert!(requests[0].headers[AUTHORIZATION]
        .to_str()?
        .ends_with(&signature));

    Ok(())
}

#[tokio::test]
async fn test_empty_observation_ids_never_reach_the_network() {
    let mock = MockHttpSend::ok("{}");
    let client = client(config(), &mock);

    let err = client
        .list_observations(Vec::<String>::new(), fixed_time(), fixed_time())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_invalid_key_never_reaches_the_network() {
    let mock = MockHttpSend::ok("[]");
    let client = client(config().with_secret_key("not-base64!!"), &mock);

    let err = client.list_things().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::KeyDecode);
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_missing_credential() {
    let mock = MockHttpSend::ok("[]");
    let client = client(config().with_client_id(""), &mock);

    let err = client.list_things().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_missing_server_url() {
    let mock = MockHttpSend::ok("[]");
    let mut config = config();
    config.server_url = None;
    let client = client(config, &mock);

    let err = client.list_things().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_network_errors_are_surfaced() {
    let mock = MockHttpSend::unreachable();
    let client = client(config(), &mock);

    let err = client.list_things().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_server_errors_are_plain_responses() -> anyhow::Result<()> {
    let mock = MockHttpSend::new(|_| {
        Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message":"boom"}"#.to_string(),
        ))
    });
    let client = client(config(), &mock);

    let resp = client.list_data_streams("site-42").await?;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body().as_ref(), br#"{"message":"boom"}"#);
    Ok(())
}

#[tokio::test]
async fn test_base_path_is_signed() -> anyhow::Result<()> {
    let mock = MockHttpSend::ok("[]");
    let client = client(
        config()
            .with_base_path("/xcloud/data-export")
            .with_client_id("client-1"),
        &mock,
    )
    .with_clock(|| parse_rfc3339("2025-05-25T13:24:56.789Z").unwrap());

    client.send(&ResourceQuery::things()).await?;

    let requests = mock.requests();
    assert_eq!(
        requests[0].uri,
        "https://api.example.com/xcloud/data-export/sites"
    );
    assert_eq!(
        requests[0].headers[AUTHORIZATION],
        "xCloud Y2xpZW50LTE=:Onk+99uHPTlsgcsMUtQxNpfH9sr6lfo4t5U0/6lqPXQ="
    );
    Ok(())
}

#[tokio::test]
async fn test_custom_auth_method_and_provider() -> anyhow::Result<()> {
    let mock = MockHttpSend::ok("[]");
    let mut config = config().with_auth_method("partner");
    config.client_id = None;
    config.secret_key = None;
    let client = client(config, &mock)
        .with_credential_provider(StaticCredentialProvider::new(CLIENT_ID, SECRET_KEY));

    client.list_things().await?;

    let requests = mock.requests();
    assert_eq!(
        requests[0].headers[AUTHORIZATION],
        "partner YWJj:Qm5Ke43pF2stC69rBEA1sHdbeAylHyQK0F1GRQ36LJ0="
    );
    Ok(())
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() -> anyhow::Result<()> {
    let mock = MockHttpSend::ok("[]");
    let client = client(config(), &mock);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.list_data_streams(&format!("site-{i}")).await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await??.status(), StatusCode::OK);
    }

    let mut paths: Vec<_> = mock
        .requests()
        .into_iter()
        .map(|r| r.path_and_query)
        .collect();
    paths.sort();
    assert_eq!(paths.len(), 8);
    assert_eq!(paths[0], "/site/site-0/datastreams");
    assert_eq!(paths[7], "/site/site-7/datastreams");
    Ok(())
}
