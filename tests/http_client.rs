use contracts::clients::http::{HttpClient, RequestContext};
use contracts::config::ClientConfig;
use contracts::constants::headers;
use contracts::dtos::{BaseReading, BaseResponse};
use contracts::ErrorKind;
use mockito::Matcher;

mod stubs;

const CONTENT_TYPE_YAML: &str = "application/x-yaml";

fn client(server: &mockito::Server) -> HttpClient {
    HttpClient::new(&server.url(), &ClientConfig::default()).unwrap()
}

#[test]
fn test_get_json_decodes_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/v2/reading/id/7a1707f0-166f-4c4b-bc9d-1d54c74e0137")
        .match_header(headers::CORRELATION_ID, Matcher::Any)
        .with_status(200)
        .with_header(headers::CONTENT_TYPE, headers::CONTENT_TYPE_JSON)
        .with_body(stubs::dtos::READING)
        .create();

    let reading: BaseReading = client(&server)
        .get_json(
            &RequestContext::new(),
            "/api/v2/reading/id/7a1707f0-166f-4c4b-bc9d-1d54c74e0137",
            &[],
        )
        .unwrap();

    assert_eq!(reading.device_name, "meter-01");
    mock.assert();
}

#[test]
fn test_post_json_sets_headers_and_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v2/interval")
        .match_header(headers::CORRELATION_ID, "corr-42")
        .match_header(headers::CONTENT_TYPE, headers::CONTENT_TYPE_JSON)
        .match_body(Matcher::PartialJsonString(
            r#"{"name": "hourly", "interval": "1h"}"#.to_string(),
        ))
        .with_status(201)
        .with_body(r#"{"apiVersion": "v2", "statusCode": 201}"#)
        .create();

    let ctx = RequestContext::new().with_correlation_id("corr-42");
    let response: BaseResponse = client(&server)
        .post_json(
            &ctx,
            "/api/v2/interval",
            &contracts::dtos::Interval::new("hourly", "1h"),
        )
        .unwrap();

    assert_eq!(response.status_code, 201);
    mock.assert();
}

#[test]
fn test_post_encoded_uses_given_content_type() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v2/deviceprofile/uploadfile")
        .match_header(headers::CONTENT_TYPE, CONTENT_TYPE_YAML)
        .match_body(stubs::dtos::PROFILE_YAML)
        .with_status(207)
        .with_body("[]")
        .create();

    let body = client(&server)
        .post_encoded(
            &RequestContext::new(),
            "/api/v2/deviceprofile/uploadfile",
            stubs::dtos::PROFILE_YAML.as_bytes(),
            CONTENT_TYPE_YAML,
        )
        .unwrap();

    assert_eq!(body, b"[]");
    mock.assert();
}

#[test]
fn test_conflict_maps_to_duplicate_name() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PUT", "/api/v2/subscription")
        .with_status(409)
        .with_body(r#"{"apiVersion": "v2", "message": "subscription ops-alerts already exists", "statusCode": 409}"#)
        .create();

    let err = client(&server)
        .put_json::<_, BaseResponse>(&RequestContext::new(), "/api/v2/subscription", &serde_json::json!({}))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateName);
    assert_eq!(err.to_string(), "subscription ops-alerts already exists");
    mock.assert();
}

#[test]
fn test_unparseable_error_body_is_kept() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PATCH", "/api/v2/interval")
        .with_status(503)
        .with_body("maintenance")
        .create();

    let err = client(&server)
        .patch_json::<_, BaseResponse>(&RequestContext::new(), "/api/v2/interval", &serde_json::json!([]))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    assert_eq!(
        err.to_string(),
        "request failed, status code: 503, response: maintenance"
    );
    mock.assert();
}

#[test]
fn test_unreachable_server_is_server_error() {
    let client = HttpClient::new("http://127.0.0.1:1", &ClientConfig::default()).unwrap();
    let err = client
        .get(&RequestContext::new(), "/api/v2/ping", &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerError);
}
