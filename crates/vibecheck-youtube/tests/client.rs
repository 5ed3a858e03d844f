//! Integration tests for `YouTubeClient` using wiremock HTTP mocks.

use serde_json::json;
use vibecheck_youtube::{YouTubeClient, YouTubeError, MAX_COMMENT_PAGES};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> YouTubeClient {
    YouTubeClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
        .with_retry_policy(0, 1)
}

fn thread(video_id: &str, author: &str, text: &str, likes: u64) -> serde_json::Value {
    json!({
        "snippet": {
            "videoId": video_id,
            "topLevelComment": {
                "snippet": {
                    "authorDisplayName": author,
                    "textDisplay": text,
                    "likeCount": likes,
                    "publishedAt": "2024-03-01T12:00:00Z"
                }
            }
        }
    })
}

#[tokio::test]
async fn fetch_comments_parses_a_single_page() {
    let server = MockServer::start().await;

    let body = json!({
        "items": [
            thread("abc123", "alice", "great video", 12),
            thread("abc123", "bob", "meh", 0),
        ]
    });

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("part", "snippet"))
        .and(query_param("videoId", "abc123"))
        .and(query_param("maxResults", "100"))
        .and(query_param("textFormat", "plainText"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let comments = client
        .fetch_comments("abc123", 100)
        .await
        .expect("should parse comments");

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].author, "alice");
    assert_eq!(comments[0].text, "great video");
    assert_eq!(comments[0].like_count, 12);
    assert_eq!(comments[0].source_video_id, "abc123");
}

#[tokio::test]
async fn fetch_comments_follows_continuation_tokens() {
    let server = MockServer::start().await;

    let page_one = json!({
        "items": [thread("abc123", "alice", "first page", 5)],
        "nextPageToken": "p2"
    });
    let page_two = json!({
        "items": [thread("abc123", "bob", "second page", 3)]
    });

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("pageToken", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_two))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_one))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let comments = client.fetch_comments("abc123", 100).await.unwrap();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].text, "first page");
    assert_eq!(comments[1].text, "second page");
}

#[tokio::test]
async fn fetch_comments_stops_at_the_page_cap() {
    let server = MockServer::start().await;

    // Every page offers another continuation token; only the cap stops us.
    let endless = json!({
        "items": [thread("abc123", "alice", "again", 1)],
        "nextPageToken": "more"
    });

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&endless))
        .expect(MAX_COMMENT_PAGES as u64)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let comments = client.fetch_comments("abc123", 100).await.unwrap();

    assert_eq!(comments.len(), MAX_COMMENT_PAGES);
}

#[tokio::test]
async fn page_failure_discards_all_collected_comments() {
    let server = MockServer::start().await;

    let page_one = json!({
        "items": (0..50_u64).map(|i| thread("abc123", "a", &format!("c{i}"), i)).collect::<Vec<_>>(),
        "nextPageToken": "p2"
    });

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("pageToken", "p2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_one))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_comments("abc123", 100).await;

    assert!(result.is_err(), "partial results must not be returned");
}

#[tokio::test]
async fn foreign_video_records_are_filtered_out() {
    let server = MockServer::start().await;

    let body = json!({
        "items": [
            thread("abc123", "alice", "mine", 2),
            thread("zzz999", "mallory", "cross-contaminated", 9),
        ]
    });

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let comments = client.fetch_comments("abc123", 100).await.unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "mine");
}

#[tokio::test]
async fn api_error_envelope_surfaces_as_api_error() {
    let server = MockServer::start().await;

    let body = json!({
        "error": { "code": 403, "message": "commentsDisabled" }
    });

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(403).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_comments("abc123", 100).await.unwrap_err();

    match err {
        YouTubeError::Api(message) => assert!(
            message.contains("commentsDisabled"),
            "expected the API message, got: {message}"
        ),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn video_title_returns_the_snippet_title() {
    let server = MockServer::start().await;

    let body = json!({
        "items": [ { "snippet": { "title": "Launch Day" } } ]
    });

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("part", "snippet"))
        .and(query_param("id", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(client.video_title("abc123").await, "Launch Day");
}

#[tokio::test]
async fn video_title_reports_missing_videos() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({ "items": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(
        client.video_title("abc123").await,
        "Video Not Found (ID: abc123)"
    );
}

#[tokio::test]
async fn video_title_degrades_on_transport_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let title = client.video_title("abc123").await;
    assert!(
        title.starts_with("Title Unavailable ("),
        "expected a placeholder, got: {title}"
    );
}

#[tokio::test]
async fn transient_errors_are_retried_per_page() {
    let server = MockServer::start().await;

    // Two 500s, then success. A client with 3 retries should get through.
    let ok = json!({ "items": [thread("abc123", "alice", "finally", 1)] });
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&ok))
        .mount(&server)
        .await;

    let client = YouTubeClient::with_base_url("test-key", 30, &server.uri())
        .unwrap()
        .with_retry_policy(3, 1);
    let comments = client.fetch_comments("abc123", 100).await.unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "finally");
}
