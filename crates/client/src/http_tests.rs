// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

use tokio::io::AsyncReadExt as _;
use tokio::net::TcpListener;

/// Serve one canned HTTP response, returning the raw request that arrived.
async fn one_shot_server(
    response: &'static str,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        tokio::io::AsyncWriteExt::write_all(&mut stream, response.as_bytes()).await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });
    (addr, handle)
}

#[tokio::test]
async fn get_reads_content_length_framed_body() {
    let (addr, server) =
        one_shot_server("HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello").await;
    let response = TcpTransport::new(addr).get("/files/x", &[]).await.unwrap();
    assert_eq!(response.code, 200);
    assert_eq!(response.body, b"hello");
    assert!(response.is_success());

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /files/x HTTP/1.1\r\n"), "{}", request);
}

#[tokio::test]
async fn extra_headers_are_sent() {
    let (addr, server) = one_shot_server("HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n").await;
    TcpTransport::new(addr)
        .get("/x", &[("Accept", "application/octet-stream")])
        .await
        .unwrap();
    let request = server.await.unwrap();
    assert!(request.contains("Accept: application/octet-stream\r\n"), "{}", request);
}

#[tokio::test]
async fn non_success_codes_pass_through() {
    let (addr, _server) =
        one_shot_server("HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\n\r\nnot found").await;
    let response = TcpTransport::new(addr).get("/missing", &[]).await.unwrap();
    assert_eq!(response.code, 404);
    assert_eq!(response.text(), "not found");
    assert!(!response.is_success());
}

#[tokio::test]
async fn missing_content_length_means_empty_body() {
    let (addr, _server) = one_shot_server("HTTP/1.1 204 No Content\r\n\r\n").await;
    let response = TcpTransport::new(addr).get("/x", &[]).await.unwrap();
    assert_eq!(response.code, 204);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn garbage_status_line_is_a_transport_error() {
    let (addr, _server) = one_shot_server("ceci n'est pas une http\r\n\r\n").await;
    let err = TcpTransport::new(addr).get("/x", &[]).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "{:?}", err);
}

#[tokio::test]
async fn connect_failure_is_a_transport_error() {
    // Port 1 on localhost is essentially never listening.
    let err = TcpTransport::new("127.0.0.1:1").get("/x", &[]).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "{:?}", err);
}
