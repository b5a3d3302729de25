//! Integration tests for the request/decode path.


use fixtures::{client_for, header, json_response, requests_to, text_response};
use minitweet_core::api::Method;
use minitweet_core::{ApiClient, ApiError, Credential, Reply};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_non_json_body_is_returned_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(text_response(200, "OK"))
        .mount(&server)
        .await;

    let reply = client_for(&server).get("/ping", None).await.unwrap();
    assert_eq!(reply, Reply::Text("OK".into()));
}

#[tokio::test]
async fn test_empty_and_html_bodies_are_text() {
    let server = MockServer::start().await;
    Mock::given(path("/empty"))
        .respond_with(text_response(204, ""))
        .mount(&server)
        .await;
    Mock::given(path("/html"))
        .respond_with(text_response(502, "<html><body>Bad Gateway</body></html>"))
        .mount(&server)
        .await;

    let api = client_for(&server);
    assert_eq!(api.get("/empty", None).await.unwrap(), Reply::Text(String::new()));
    assert_eq!(
        api.get("/html", None).await.unwrap(),
        Reply::Text("<html><body>Bad Gateway</body></html>".into())
    );
}

#[tokio::test]
async fn test_status_code_is_not_inspected() {
    let server = MockServer::start().await;
    Mock::given(path("/created"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
        .mount(&server)
        .await;
    Mock::given(path("/denied"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"token": "t"})))
        .mount(&server)
        .await;

    let api = client_for(&server);
    assert_eq!(api.get("/created", None).await.unwrap(), Reply::Json(json!({"id": 3})));
    // Classification is by shape only, even on a 401
    assert_eq!(api.get("/denied", None).await.unwrap(), Reply::Json(json!({"token": "t"})));
}

#[tokio::test]
async fn test_json_primitives_decode() {
    let server = MockServer::start().await;
    Mock::given(path("/num"))
        .respond_with(text_response(200, "42"))
        .mount(&server)
        .await;

    let reply = client_for(&server).get("/num", None).await.unwrap();
    assert_eq!(reply, Reply::Json(json!(42)));
}

#[tokio::test]
async fn test_headers_without_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"email": "a@b.c", "password": "pw"})))
        .respond_with(json_response(json!({"token": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let body = json!({"email": "a@b.c", "password": "pw"});
    client_for(&server).post("/login", &body, None).await.unwrap();

    let requests = requests_to(&server, "/login").await;
    assert_eq!(requests.len(), 1);
    assert_eq!(header(&requests[0], "content-type"), Some("application/json"));
    assert_eq!(header(&requests[0], "authorization"), None);
}

#[tokio::test]
async fn test_bearer_header_and_no_body_on_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(json_response(json!([])))
        .mount(&server)
        .await;

    let credential = Credential::new("tok-123");
    client_for(&server).get("/feed", Some(&credential)).await.unwrap();

    let requests = requests_to(&server, "/feed").await;
    assert_eq!(requests.len(), 1);
    assert_eq!(header(&requests[0], "authorization"), Some("Bearer tok-123"));
    assert_eq!(header(&requests[0], "content-type"), Some("application/json"));
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_send_distinguishes_no_body_from_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response(200, ""))
        .mount(&server)
        .await;

    let api = client_for(&server);
    api.send::<()>(Method::POST, "/none", None, None).await.unwrap();
    api.send(Method::POST, "/empty", Some(&json!({})), None).await.unwrap();

    assert!(requests_to(&server, "/none").await[0].body.is_empty());
    assert_eq!(requests_to(&server, "/empty").await[0].body, b"{}".to_vec());
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_fault() {
    // Nothing listens on port 1
    let api = ApiClient::new("http://127.0.0.1:1").unwrap();
    let err = api.get("/feed", None).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
