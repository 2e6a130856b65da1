//! Shared utilities for integration testing.

use axum::{
    http::{header, HeaderMap, StatusCode, Uri},
    Router,
};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use suburb_proxy::{HttpServer, ProxyConfig, Shutdown};

/// Base path the mock upstream is mounted under, mirroring the real API.
pub const API_PREFIX: &str = "/report_generator/api";

/// What the mock upstream saw for one call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, API_PREFIX)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

/// Start a programmable upstream that answers every path with `respond`.
pub async fn start_mock_upstream<F>(respond: F) -> MockUpstream
where
    F: Fn(&RecordedCall) -> (u16, String) + Send + Sync + 'static,
{
    start_slow_mock_upstream(Duration::ZERO, respond).await
}

/// Like `start_mock_upstream`, but waits `delay` before answering.
pub async fn start_slow_mock_upstream<F>(delay: Duration, respond: F) -> MockUpstream
where
    F: Fn(&RecordedCall) -> (u16, String) + Send + Sync + 'static,
{
    let calls = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let recorded = calls.clone();
    let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap| {
        let recorded = recorded.clone();
        let respond = respond.clone();
        async move {
            let call = RecordedCall {
                path: uri.path().to_string(),
                query: url::form_urlencoded::parse(uri.query().unwrap_or("").as_bytes())
                    .into_owned()
                    .collect(),
                authorization: header_string(&headers, "authorization"),
                request_id: header_string(&headers, "x-request-id"),
            };
            let (status, body) = respond(&call);
            recorded.lock().unwrap().push(call);

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            (
                StatusCode::from_u16(status).unwrap(),
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, calls }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// A running proxy pointed at `base_url`.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestProxy {
    pub async fn get(&self, path_and_query: &str) -> reqwest::Response {
        self.client
            .get(format!("http://{}{}", self.addr, path_and_query))
            .send()
            .await
            .expect("Proxy unreachable")
    }

    pub async fn get_json(&self, path_and_query: &str) -> (u16, serde_json::Value) {
        let res = self.get(path_and_query).await;
        let status = res.status().as_u16();
        (status, res.json().await.expect("Proxy returned non-JSON body"))
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_proxy(base_url: String, timeout_secs: u64) -> TestProxy {
    let mut config = ProxyConfig::default();
    config.upstream.base_url = base_url;
    config.upstream.api_token = "test-token".to_string();
    config.upstream.timeout_secs = timeout_secs;
    config.upstream.use_system_proxy = false;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestProxy {
        addr,
        client,
        shutdown,
    }
}
