//! Integration tests for resource requests over real HTTP.
//!
//! These tests run the default `HttpSession` against a `wiremock` server and
//! verify URL building, status classification and body decoding end to end.

use serde_json::json;
use slumber::{
    Api, Credentials, Error, HttpError, Payload, PutOutcome, Query, ResourceAttributes,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client rooted at the mock server.
fn create_test_api(server: &MockServer) -> Api {
    Api::new(format!("{}/", server.uri())).unwrap()
}

// ============================================================================
// Success Tests
// ============================================================================

#[tokio::test]
async fn test_get_decodes_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1/"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "ada"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = create_test_api(&server);
    let user = api.child("users").unwrap().id(1).unwrap().get(None).await.unwrap();

    assert_eq!(user, Some(Payload::Decoded(json!({"id": 1, "name": "ada"}))));
}

#[tokio::test]
async fn test_get_sends_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = create_test_api(&server);
    let mut query = Query::new();
    query.insert("page".to_string(), "2".to_string());

    let posts = api.child("posts").unwrap().get(Some(query)).await.unwrap();
    assert_eq!(posts, Some(Payload::Decoded(json!([]))));
}

#[tokio::test]
async fn test_get_returns_raw_body_without_codec() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/readme/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("plain words", "text/plain"))
        .mount(&server)
        .await;

    let api = create_test_api(&server);
    let readme = api.child("readme").unwrap().get(None).await.unwrap().unwrap();

    assert!(readme.is_raw());
    assert_eq!(readme.as_bytes().unwrap().as_ref(), b"plain words");
}

#[tokio::test]
async fn test_get_decodes_yaml_by_response_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("debug: true\n", "text/yaml"))
        .mount(&server)
        .await;

    // Requests ask for JSON, the server answers YAML.
    let api = create_test_api(&server);
    let config = api.child("config").unwrap().get(None).await.unwrap();

    assert_eq!(config, Some(Payload::Decoded(json!({"debug": true}))));
}

#[tokio::test]
async fn test_post_encodes_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "grace"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 2, "name": "grace"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = create_test_api(&server);
    let created = api
        .child("users")
        .unwrap()
        .post(Some(json!({"name": "grace"})), None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.as_value().unwrap()["id"], 2);
}

#[tokio::test]
async fn test_put_and_patch_return_decoded_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/users/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "patched": true})))
        .mount(&server)
        .await;

    let user = create_test_api(&server).child("users").unwrap().id(3).unwrap();

    let put = user.put(Some(json!({"name": "x"})), None).await.unwrap();
    assert_eq!(put, PutOutcome::Updated(Payload::Decoded(json!({"id": 3}))));

    let patched = user.patch(Some(json!({"name": "y"})), None).await.unwrap();
    assert_eq!(patched.unwrap().as_value().unwrap()["patched"], true);
}

#[tokio::test]
async fn test_delete_no_content_returns_true() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/4/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = create_test_api(&server);
    let deleted = api.child("users").unwrap().id(4).unwrap().delete(None).await.unwrap();

    assert!(deleted);
}

#[tokio::test]
async fn test_append_slash_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = Api::builder()
        .base_url(server.uri())
        .append_slash(false)
        .build()
        .unwrap();

    let users = api.child("users").unwrap().get(None).await.unwrap();
    assert!(users.is_some());
}

#[tokio::test]
async fn test_basic_auth_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"me": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = Api::builder()
        .base_url(format!("{}/", server.uri()))
        .auth(Credentials::basic("user", Some("pass")))
        .build()
        .unwrap();

    let me = api.child("me").unwrap().get(None).await.unwrap();
    assert_eq!(me, Some(Payload::Decoded(json!({"me": true}))));
}

// ============================================================================
// Error Classification Tests
// ============================================================================

#[tokio::test]
async fn test_get_not_found_is_client_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/99/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .mount(&server)
        .await;

    let api = create_test_api(&server);
    let result = api.child("users").unwrap().id(99).unwrap().get(None).await;

    match result {
        Err(Error::Http(HttpError::Client(e))) => {
            assert_eq!(e.code, 404);
            assert_eq!(e.content.as_ref(), b"missing");
            assert!(e.url.ends_with("/users/99/"));
        }
        other => panic!("expected client error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_put_not_found_is_client_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let api = create_test_api(&server);
    let result = api.child("users").unwrap().id(1).unwrap().put(None, None).await;

    assert_eq!(result.unwrap_err().status(), Some(404));
}

#[tokio::test]
async fn test_server_error_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let api = create_test_api(&server);
    let result = api.child("users").unwrap().id(1).unwrap().delete(None).await;

    assert!(matches!(
        result,
        Err(Error::Http(HttpError::Server(e))) if e.code == 503
    ));
}

#[tokio::test]
async fn test_malformed_json_body_is_codec_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{broken", "application/json"))
        .mount(&server)
        .await;

    let api = create_test_api(&server);
    let result = api.child("broken").unwrap().get(None).await;

    assert!(matches!(result, Err(Error::Codec(_))));
}

// ============================================================================
// Redirect Tests
// ============================================================================

#[tokio::test]
async fn test_redirect_is_not_followed_automatically() {
    let server = MockServer::start().await;
    Mock::given(path("/old/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new/"))
        .mount(&server)
        .await;

    let api = create_test_api(&server);
    let old = api.child("old").unwrap();

    assert_eq!(old.get(None).await.unwrap(), None);
    assert!(!old.delete(None).await.unwrap());
}

#[tokio::test]
async fn test_handle_redirect_follows_location() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs/"))
        .respond_with(ResponseTemplate::new(303).insert_header("Location", "/jobs/7/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs/7/"))
        .and(query_param("verbose", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = create_test_api(&server).child("jobs").unwrap();
    let response = jobs
        .request(slumber::HttpMethod::Post, Some(json!({"run": true})), None, None)
        .await
        .unwrap();
    assert_eq!(response.code, 303);

    let mut query = Query::new();
    query.insert("verbose".to_string(), "1".to_string());
    let job = jobs.handle_redirect(&response, Some(query)).await.unwrap();

    assert_eq!(job, Some(Payload::Decoded(json!({"id": 7}))));
}
