use http::StatusCode;
use pretty_assertions::assert_eq;
use sensorsign_core::time::parse_rfc3339;
use sensorsign_core::ErrorKind;
use sensorsign_observations::models::parse_observations;

use super::mock::*;

const THINGS: &str = r#"[
    {"id": "site-1", "name": "North Buoy", "location": [{"latitude": 43.5, "longitude": -69.25}]},
    {"id": "site-2", "name": "Dock"}
]"#;

fn catalog(path: &str) -> sensorsign_core::Result<(StatusCode, String)> {
    let body = match path {
        "/sites" => THINGS.to_string(),
        "/site/site-1/datastreams" => {
            r#"[{"id": "d1", "name": "Water temperature", "unitOfMeasurement": {"name": "degree Celsius", "symbol": "C"}}]"#
                .to_string()
        }
        "/site/site-2/datastreams" => "[]".to_string(),
        _ => return Ok((StatusCode::NOT_FOUND, String::new())),
    };
    Ok((StatusCode::OK, body))
}

#[tokio::test]
async fn test_list_things_with_data_streams() -> anyhow::Result<()> {
    let mock = MockHttpSend::new(catalog);
    let client = client(config(), &mock);

    let resources = client.list_things_with_data_streams().await?;

    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0].thing.id, "site-1");
    assert_eq!(resources[0].data_streams[0].id, "d1");
    assert!(resources[1].data_streams.is_empty());
    assert_eq!(mock.calls(), 3);
    Ok(())
}

#[tokio::test]
async fn test_list_things_with_data_streams_fails_on_error_status() {
    let mock = MockHttpSend::new(|path| match path {
        "/sites" => Ok((StatusCode::OK, THINGS.to_string())),
        _ => Ok((StatusCode::INTERNAL_SERVER_ERROR, "down".to_string())),
    });
    let client = client(config(), &mock);

    let err = client.list_things_with_data_streams().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn test_observations_body_decodes() -> anyhow::Result<()> {
    let mock = MockHttpSend::ok(
        r#"{"d1": [{"value": 12.5, "phenomenonTime": 1704067200000}], "d2": []}"#,
    );
    let client = client(config(), &mock);

    let resp = client
        .list_observations(["d1", "d2"], fixed_time(), fixed_time())
        .await?;
    let observations = parse_observations(resp.body())?;

    assert_eq!(observations.len(), 1);
    assert_eq!(observations["d1"][0].phenomenon_time, 1704067200000);
    Ok(())
}

const OBSERVATIONS_PATH: &str = "/observations?from=2024-01-01T00%3A00%3A00.000Z&until=2024-01-02T00%3A00%3A00.000Z&datastreamIds=d1&datastreamIds=d2&datastreamIds=d3";

fn thing_catalog(path: &str) -> sensorsign_core::Result<(StatusCode, String)> {
    let body = match path {
        "/site/site-1/datastreams" => r#"[
            {"id": "d1", "name": "Water temperature"},
            {"id": "d2", "name": "Salinity"},
            {"id": "d3", "name": "Wave height"}
        ]"#,
        "/site/empty/datastreams" => "[]",
        OBSERVATIONS_PATH => r#"{
            "d3": [{"value": 0.8, "phenomenonTime": 1704067200000}],
            "d1": [
                {"value": 12.5, "phenomenonTime": 1704067200000},
                {"value": null, "phenomenonTime": 1704067260000}
            ],
            "d2": []
        }"#,
        _ => return Ok((StatusCode::NOT_FOUND, String::new())),
    };
    Ok((StatusCode::OK, body.to_string()))
}

fn range() -> anyhow::Result<(sensorsign_core::time::DateTime, sensorsign_core::time::DateTime)> {
    Ok((
        parse_rfc3339("2024-01-01T00:00:00Z")?,
        parse_rfc3339("2024-01-02T00:00:00Z")?,
    ))
}

#[tokio::test]
async fn test_query_thing() -> anyhow::Result<()> {
    let mock = MockHttpSend::new(thing_catalog);
    let client = client(config(), &mock);
    let (from, until) = range()?;

    let series = client.query_thing("site-1", from, until).await?;

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].path_and_query, OBSERVATIONS_PATH);

    let labels: Vec<_> = series
        .iter()
        .map(|s| (s.data_stream.name.as_str(), s.observations.len()))
        .collect();
    assert_eq!(labels, vec![("Water temperature", 1), ("Wave height", 1)]);
    assert_eq!(series[1].observations[0].value, 0.8);
    Ok(())
}

#[tokio::test]
async fn test_query_thing_without_data_streams() -> anyhow::Result<()> {
    let mock = MockHttpSend::new(thing_catalog);
    let client = client(config(), &mock);
    let (from, until) = range()?;

    let series = client.query_thing("empty", from, until).await?;

    assert!(series.is_empty());
    assert_eq!(mock.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_query_thing_fails_on_error_status() -> anyhow::Result<()> {
    let mock = MockHttpSend::new(|path| {
        if path.starts_with("/observations") {
            Ok((StatusCode::BAD_GATEWAY, "upstream".to_string()))
        } else {
            thing_catalog(path)
        }
    });
    let client = client(config(), &mock);
    let (from, until) = range()?;

    let err = client.query_thing("site-1", from, until).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(err.to_string().contains("upstream"));
    assert_eq!(mock.calls(), 2);
    Ok(())
}
