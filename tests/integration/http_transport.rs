//! Integration tests for the HTTP transport against a local TCP server

use gstr2a_puller::client::{OctaClient, PullApi, PullFailure};
use gstr2a_puller::config::{Credentials, PullConfig};
use gstr2a_puller::period::ReturnPeriod;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const GSTIN: &str = "19AADCG0737G1ZQ";

/// base64("key-0123456789:secret-0123456789")
const EXPECTED_AUTH: &str = "Basic a2V5LTAxMjM0NTY3ODk6c2VjcmV0LTAxMjM0NTY3ODk=";

/// One request as seen by the server.
#[derive(Debug)]
struct Captured {
    head: String,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<String> {
        self.head.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

fn http_response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut response = format!("HTTP/1.1 {status}\r\n");
    for (name, value) in headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str(&format!(
        "Content-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    ));
    response
}

fn content_length(head: &str) -> usize {
    head.lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().ok())
                .flatten()
        })
        .unwrap_or(0)
}

/// Serve `responses` to consecutive connections, one request each.
async fn serve(responses: Vec<String>) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut captured = Vec::new();
        for response in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let split = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed before sending a full request");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&buf[..pos]).to_string();
                    if buf.len() >= pos + 4 + content_length(&head) {
                        break pos;
                    }
                }
            };

            captured.push(Captured {
                head: String::from_utf8_lossy(&buf[..split]).to_string(),
                body: String::from_utf8_lossy(&buf[split + 4..]).to_string(),
            });
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
        captured
    });

    (format!("http://{addr}/api"), handle)
}

fn config(base_url: String, retry_count: u32) -> PullConfig {
    PullConfig {
        credentials: Credentials::new("key-0123456789", "secret-0123456789"),
        base_url,
        retry_count,
        retry_delay: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
        ..PullConfig::default()
    }
}

fn period() -> ReturnPeriod {
    "2024-04".parse().unwrap()
}

#[tokio::test]
async fn test_successful_pull_sends_auth_header_and_body() {
    let (url, server) = serve(vec![http_response("200 OK", &[], r#"{"jobId":"JOB-123"}"#)]).await;
    let client = OctaClient::from_config(&config(url, 1)).unwrap();

    let outcome = client.pull("oc-3372", GSTIN, period()).await;
    assert_eq!(outcome, Ok("JOB-123".to_string()));

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    assert!(request.head.starts_with("POST /api/gstr2a/pull HTTP/1.1"));
    assert_eq!(
        request.header("authorization").as_deref(),
        Some(EXPECTED_AUTH)
    );
    assert_eq!(request.header("octa-company").as_deref(), Some("oc-3372"));

    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"gstin": GSTIN, "returnPeriod": "2024-04"})
    );
}

#[tokio::test]
async fn test_not_connected_error_code() {
    let (url, server) = serve(vec![http_response(
        "400 Bad Request",
        &[("Octa-ErrorCode", "2000"), ("Octa-ErrorMessage", "Not connected to GST System")],
        "{}",
    )])
    .await;
    let client = OctaClient::from_config(&config(url, 3)).unwrap();

    let outcome = client.pull("oc-3372", GSTIN, period()).await;
    assert_eq!(
        outcome,
        Err(PullFailure::NotConnected {
            gstin: GSTIN.to_string()
        })
    );
    // not retried
    assert_eq!(server.await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let (url, server) = serve(vec![
        http_response("503 Service Unavailable", &[], "{}"),
        http_response("200 OK", &[], r#"{"jobId":77}"#),
    ])
    .await;
    let client = OctaClient::from_config(&config(url, 3)).unwrap();

    assert_eq!(client.pull("oc-3372", GSTIN, period()).await, Ok("77".to_string()));
    assert_eq!(server.await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_unauthorized() {
    let (url, _server) = serve(vec![http_response("401 Unauthorized", &[], "{}")]).await;
    let client = OctaClient::from_config(&config(url, 3)).unwrap();

    assert!(matches!(
        client.pull("oc-3372", GSTIN, period()).await,
        Err(PullFailure::Authentication(_))
    ));
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = OctaClient::from_config(&config(format!("http://{addr}/api"), 1)).unwrap();
    assert!(matches!(
        client.pull("oc-3372", GSTIN, period()).await,
        Err(PullFailure::Connection(_))
    ));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let mut config = config(format!("http://{addr}/api"), 1);
    config.timeout = Duration::from_millis(200);
    let client = OctaClient::from_config(&config).unwrap();

    assert_eq!(client.pull("oc-3372", GSTIN, period()).await, Err(PullFailure::Timeout));
}
