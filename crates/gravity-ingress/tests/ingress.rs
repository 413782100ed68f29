//! Feed fetching against a canned local HTTP endpoint, and webhook deliveries
//! from fixtures, both decoded directly and posted to a live endpoint.

use std::path::PathBuf;

use gravity_core::{EventKind, FeedDecoder, Registry};
use gravity_ingress::{
    compute_signature, fetch_and_validate, format_signature_header, serve, FeedClient,
    FeedConfig, FeedSource, FeedTarget, IngressError, ServerState, WebhookReceiver,
    WebhookVerifier, GITHUB_V3_ACCEPT, WEBHOOK_PATH,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};

const FEED: &str = r#"[
    {"id": "1", "type": "WatchEvent", "payload": {"action": "started"}},
    {"id": "2", "type": "PushEvent", "payload": {"ref": "refs/heads/master", "size": 0}}
]"#;

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join(name)
}

/// Serve one request with `status` and `body`; resolves to the raw request.
async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let mut request = Vec::new();
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).to_string()
    });

    (base, handle)
}

// ── Feed client ─────────────────────────────────────────────────────────

#[tokio::test]
async fn client_fetches_feed_with_github_headers() {
    let (base, server) = serve_once("200 OK", FEED).await;
    let config = FeedConfig::new(&base).with_token("ghp_test");
    let client = FeedClient::new(config, FeedTarget::repo("pingcap", "tidb")).unwrap();

    let verified = fetch_and_validate(&client, &FeedDecoder::default(), &["WatchEvent"])
        .await
        .unwrap();
    assert_eq!(verified.get("WatchEvent").unwrap().len(), 1);
    assert!(verified.get("PushEvent").is_none());

    let request = server.await.unwrap().to_lowercase();
    assert!(request.starts_with("get /repos/pingcap/tidb/events http/1.1"));
    assert!(request.contains(&format!("accept: {GITHUB_V3_ACCEPT}")));
    assert!(request.contains("authorization: bearer ghp_test"));
    assert!(request.contains("user-agent: gravity-ingress/"));
}

#[tokio::test]
async fn client_reports_non_success_status() {
    let (base, _server) = serve_once("403 Forbidden", r#"{"message": "API rate limit exceeded"}"#).await;
    let client = FeedClient::new(FeedConfig::new(&base), FeedTarget::Public).unwrap();

    match client.fetch().await {
        Err(IngressError::Status { status, url }) => {
            assert_eq!(status, 403);
            assert!(url.ends_with("/events"));
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_feed_surfaces_as_core_error() {
    let (base, _server) = serve_once("200 OK", r#"{"message": "Not Found"}"#).await;
    let client = FeedClient::new(FeedConfig::new(&base), FeedTarget::Public).unwrap();

    let err = fetch_and_validate(&client, &FeedDecoder::default(), &["WatchEvent"])
        .await
        .unwrap_err();
    assert!(matches!(err, IngressError::Core(_)));
}

// ── Webhooks ────────────────────────────────────────────────────────────

#[test]
fn signed_issue_comment_delivery_resolves() {
    let body = std::fs::read(testdata("issue-comment-created.json")).unwrap();
    let secret = "hook-secret";
    let header = format_signature_header(&compute_signature(&body, secret.as_bytes()).unwrap());

    let receiver = WebhookReceiver::new(WebhookVerifier::new(Some(secret)), Registry::standard());
    let delivery = receiver
        .receive("issue_comment", Some(&header), &body)
        .unwrap();

    assert_eq!(delivery.discriminator, Some("IssueCommentEvent"));
    assert_eq!(delivery.payload.kind(), EventKind::IssueComment);
    assert_eq!(delivery.payload.action(), Some("created"));
    assert_eq!(delivery.sender.as_ref().unwrap().login, "carol");
    assert_eq!(delivery.repository.as_ref().unwrap().full_name, "pingcap/tidb");
}

#[test]
fn legacy_repository_timestamps_are_accepted() {
    let body = std::fs::read(testdata("fork.json")).unwrap();
    let receiver = WebhookReceiver::new(WebhookVerifier::new(None), Registry::standard());
    let delivery = receiver.receive("fork", None, &body).unwrap();

    let gravity_core::Event::Fork(fork) = delivery.payload else {
        panic!("expected ForkEvent");
    };
    assert_eq!(
        fork.forkee.created_at.unwrap().to_rfc3339(),
        "2022-07-12T15:19:30+00:00"
    );
}

#[test]
fn tampered_delivery_is_rejected() {
    let body = std::fs::read(testdata("issue-comment-created.json")).unwrap();
    let header =
        format_signature_header(&compute_signature(b"something else", b"hook-secret").unwrap());

    let receiver =
        WebhookReceiver::new(WebhookVerifier::new(Some("hook-secret")), Registry::standard());
    assert!(matches!(
        receiver.receive("issue_comment", Some(&header), &body),
        Err(IngressError::SignatureMismatch)
    ));
}

// ── Webhook endpoint ────────────────────────────────────────────────────

#[tokio::test]
async fn webhook_endpoint_accepts_signed_delivery() {
    let secret = "hook-secret";
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}{}", listener.local_addr().unwrap(), WEBHOOK_PATH);

    let (tx, mut rx) = mpsc::channel(4);
    let (stop, stopped) = oneshot::channel::<()>();
    let receiver = WebhookReceiver::new(WebhookVerifier::new(Some(secret)), Registry::standard());
    let state = ServerState::new(receiver, tx, false);
    let server = tokio::spawn(serve(listener, state, async move {
        let _ = stopped.await;
    }));

    let body = std::fs::read(testdata("issue-comment-created.json")).unwrap();
    let header = format_signature_header(&compute_signature(&body, secret.as_bytes()).unwrap());
    let http = reqwest::Client::new();

    let response = http
        .post(&url)
        .header("content-type", "application/json")
        .header("X-GitHub-Event", "issue_comment")
        .header("X-Hub-Signature-256", &header)
        .body(body.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let delivery = rx.recv().await.unwrap();
    assert_eq!(delivery.payload.kind(), EventKind::IssueComment);
    assert_eq!(delivery.sender.unwrap().login, "carol");

    let response = http
        .post(&url)
        .header("content-type", "application/json")
        .header("X-GitHub-Event", "star")
        .header(
            "X-Hub-Signature-256",
            format_signature_header(&compute_signature(b"{}", secret.as_bytes()).unwrap()),
        )
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 501);

    drop(http);
    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}
