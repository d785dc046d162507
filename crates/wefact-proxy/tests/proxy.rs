//! SOCKS5 proxy tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wefact_client::{ClientOptions, Params, WefactClient};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn start_proxy() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(wefact_proxy::serve(listener));
    addr
}

/// Like [`start_proxy`], but counts the connections the proxy accepts.
async fn start_counting_proxy() -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let config = Arc::new(wefact_proxy::config());

    let counter = Arc::clone(&accepted);
    tokio::spawn(async move {
        loop {
            let (stream, peer) = listener.accept().await.unwrap();
            counter.fetch_add(1, Ordering::SeqCst);
            let config = Arc::clone(&config);
            tokio::spawn(async move {
                let _ = wefact_proxy::handle(stream, peer, config).await;
            });
        }
    });

    (addr, accepted)
}

async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

// ============================================================================
// Client through the proxy
// ============================================================================

#[tokio::test]
async fn every_request_opens_its_own_proxied_connection() {
    let (proxy, accepted) = start_counting_proxy().await;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "controller": "invoice",
            "action": "list",
            "status": "success",
            "totalresults": 0,
        })))
        .expect(2)
        .mount(&server)
        .await;

    let options = ClientOptions::with_endpoint(server.uri()).proxy(proxy.to_string());
    let client = WefactClient::with_options("test-api-key", options).unwrap();

    for _ in 0..2 {
        let response = client.request("invoice", "list", Params::new()).await.unwrap();
        assert!(response.is_success());
    }

    assert_eq!(accepted.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unreachable_proxy_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(0)
        .mount(&server)
        .await;

    let proxy = closed_port().await;
    let options = ClientOptions::with_endpoint(server.uri()).proxy(proxy.to_string());
    let client = WefactClient::with_options("test-api-key", options).unwrap();

    let err = client.request("invoice", "list", Params::new()).await.unwrap_err();

    assert!(err.is_transport());
    assert!(!err.is_unauthorized());
}

// ============================================================================
// Raw tunnel
// ============================================================================

#[tokio::test]
async fn tunnel_relays_both_directions() {
    let proxy = start_proxy().await;
    let target = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let SocketAddr::V4(target_addr) = target.local_addr().unwrap() else {
        panic!("bound an IPv4 address");
    };

    let mut stream = TcpStream::connect(proxy).await.unwrap();
    stream.write_all(&[0x05, 0x01, 0x00]).await.unwrap();
    let mut choice = [0u8; 2];
    stream.read_exact(&mut choice).await.unwrap();
    assert_eq!(choice, [0x05, 0x00]);

    let mut request = vec![0x05, 0x01, 0x00, 0x01];
    request.extend_from_slice(&target_addr.ip().octets());
    request.extend_from_slice(&target_addr.port().to_be_bytes());
    stream.write_all(&request).await.unwrap();

    let (mut upstream, _) = target.accept().await.unwrap();
    let mut reply = [0u8; 10];
    stream.read_exact(&mut reply).await.unwrap();
    assert_eq!(&reply[..2], &[0x05, 0x00]);

    stream.write_all(b"ping").await.unwrap();
    let mut buf = [0u8; 4];
    upstream.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"ping");

    upstream.write_all(b"pong").await.unwrap();
    stream.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"pong");
}
