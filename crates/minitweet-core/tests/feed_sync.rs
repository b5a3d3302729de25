//! Integration tests for feed refresh and post submission.


use fixtures::{
    anonymous_session, client_for, header, json_response, post_json, requests_to, session_with,
    text_response,
};
use minitweet_core::{ComposeError, FeedSynchronizer, FeedUpdate, PostComposer};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer};

#[tokio::test]
async fn test_refresh_replaces_feed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(json_response(json!([
            {"id": 1, "username": "a", "content": "hi", "created_at": "2024-01-01T00:00:00Z"}
        ])))
        .mount(&server)
        .await;

    let session = session_with("tok");
    let mut feed = FeedSynchronizer::new();
    let update = feed.refresh(&client_for(&server), &session).await.unwrap();

    assert_eq!(update, FeedUpdate::Replaced(1));
    let post = &feed.posts()[0];
    assert_eq!(post.id, 1);
    assert_eq!(post.username, "a");
    assert_eq!(post.content, "hi");
    assert_eq!(post.created_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");

    let requests = requests_to(&server, "/feed").await;
    assert_eq!(header(&requests[0], "authorization"), Some("Bearer tok"));
}

#[tokio::test]
async fn test_refresh_preserves_server_order() {
    let server = MockServer::start().await;
    Mock::given(path("/feed"))
        .respond_with(json_response(json!([
            post_json(3, "c", "newest", "2024-01-03T00:00:00Z"),
            post_json(2, "b", "middle", "2024-01-02T00:00:00Z"),
            post_json(1, "a", "oldest", "2024-01-01T00:00:00Z"),
        ])))
        .mount(&server)
        .await;

    let mut feed = FeedSynchronizer::new();
    feed.refresh(&client_for(&server), &session_with("tok")).await.unwrap();
    let ids: Vec<i64> = feed.posts().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_refresh_with_object_keeps_previous_feed() {
    let server = MockServer::start().await;
    let api = client_for(&server);
    let session = session_with("tok");
    let mut feed = FeedSynchronizer::new();

    Mock::given(path("/feed"))
        .respond_with(json_response(json!([post_json(1, "a", "hi", "2024-01-01T00:00:00Z")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    feed.refresh(&api, &session).await.unwrap();

    Mock::given(path("/feed"))
        .respond_with(json_response(json!({})))
        .mount(&server)
        .await;
    let update = feed.refresh(&api, &session).await.unwrap();

    assert_eq!(update, FeedUpdate::Unchanged);
    assert_eq!(feed.posts().len(), 1);
    assert_eq!(feed.posts()[0].content, "hi");
}

#[tokio::test]
async fn test_refresh_with_plain_text_keeps_previous_feed() {
    let server = MockServer::start().await;
    let api = client_for(&server);
    let session = anonymous_session();
    let mut feed = FeedSynchronizer::new();

    Mock::given(path("/feed"))
        .respond_with(json_response(json!([post_json(1, "a", "hi", "2024-01-01T00:00:00Z")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    feed.refresh(&api, &session).await.unwrap();

    Mock::given(path("/feed"))
        .respond_with(text_response(401, "missing auth\n"))
        .mount(&server)
        .await;
    assert_eq!(feed.refresh(&api, &session).await.unwrap(), FeedUpdate::Unchanged);
    assert_eq!(feed.posts().len(), 1);
}

#[tokio::test]
async fn test_stale_fetch_after_logout_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(path("/feed"))
        .respond_with(json_response(json!([post_json(1, "a", "hi", "2024-01-01T00:00:00Z")])))
        .mount(&server)
        .await;

    let api = client_for(&server);
    let mut session = session_with("tok");
    let mut feed = FeedSynchronizer::new();

    let request = feed.begin(&session);
    let response = request.send(&api).await.unwrap();
    session.clear().unwrap();

    assert_eq!(feed.apply(response, &session), FeedUpdate::Stale);
    assert!(feed.is_empty());
}

#[tokio::test]
async fn test_submit_success_clears_draft_and_refreshes_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tweets"))
        .and(body_json(json!({"content": "hello world"})))
        .respond_with(json_response(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(json_response(json!([post_json(7, "a", "hello world", "2024-01-01T00:00:00Z")])))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server);
    let session = session_with("tok");
    let mut feed = FeedSynchronizer::new();
    let mut composer = PostComposer::new();
    composer.set_draft("hello world");

    let outcome = composer.submit(&api, &session, &mut feed).await.unwrap();

    assert_eq!(outcome.feed, FeedUpdate::Replaced(1));
    assert_eq!(composer.draft(), "");
    assert_eq!(feed.fetches_started(), 1);
    assert_eq!(feed.posts()[0].id, 7);

    let posts = requests_to(&server, "/tweets").await;
    assert_eq!(header(&posts[0], "authorization"), Some("Bearer tok"));
}

#[tokio::test]
async fn test_submit_rejected_keeps_draft_and_skips_refresh() {
    let server = MockServer::start().await;
    Mock::given(path("/tweets"))
        .respond_with(json_response(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/feed"))
        .respond_with(json_response(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut feed = FeedSynchronizer::new();
    let mut composer = PostComposer::new();
    composer.set_draft("keep me");

    let err = composer
        .submit(&client_for(&server), &session_with("tok"), &mut feed)
        .await
        .unwrap_err();

    assert!(matches!(err, ComposeError::Rejected));
    assert_eq!(composer.draft(), "keep me");
    assert_eq!(feed.fetches_started(), 0);
}

#[tokio::test]
async fn test_submit_plain_text_rejection_keeps_draft() {
    let server = MockServer::start().await;
    Mock::given(path("/tweets"))
        .respond_with(text_response(400, "content length invalid\n"))
        .mount(&server)
        .await;

    let mut feed = FeedSynchronizer::new();
    let mut composer = PostComposer::new();
    composer.set_draft("draft");

    let result = composer
        .submit(&client_for(&server), &session_with("tok"), &mut feed)
        .await;
    assert!(matches!(result, Err(ComposeError::Rejected)));
    assert_eq!(composer.draft(), "draft");
}
