// tests/sink_tests.rs
use mockito::Matcher;
use serde_json::json;
use status_notifier::config::SlackConfig;
use status_notifier::notifier::{Color, MessagingSink, NotificationMessage, SinkError, SlackSink};
use url::Url;

fn sink_for(server: &mockito::ServerGuard) -> SlackSink {
    SlackSink::new(SlackConfig {
        api_url: Url::parse(&format!("{}/api/", server.url())).unwrap(),
        token: "xoxb-test".to_string(),
        channel_id: "C0123".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_posts_attachment() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat.postMessage")
        .match_header("authorization", "Bearer xoxb-test")
        .match_body(Matcher::Json(json!({
            "channel": "C0123",
            "attachments": [{
                "color": "#ff0000",
                "text": "Production is unhealthy! 503",
                "fallback": "Production is unhealthy! 503",
            }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;

    let message = NotificationMessage::new(Color::Bad, "Production is unhealthy! 503");
    sink_for(&server).send(&message).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_rejection_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat.postMessage")
        .with_status(200)
        .with_body(r#"{"ok":false,"error":"channel_not_found"}"#)
        .create_async()
        .await;

    let message = NotificationMessage::new(Color::Good, "Production is healthy");
    let err = sink_for(&server).send(&message).await.unwrap_err();

    match err {
        SinkError::Rejected(reason) => assert_eq!(reason, "channel_not_found"),
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_failure_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat.postMessage")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let message = NotificationMessage::new(Color::Bad, "Production is OFFLINE!");
    let err = sink_for(&server).send(&message).await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, SinkError::Status(500)));
}
