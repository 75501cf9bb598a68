//! Common fixtures for integration tests.
//!
//! `TestServer` is a minimal HTTP/1.1 server on a random local port. Each
//! connection gets one response and is then closed, which is enough for
//! `reqwest` and lets a route declare more bytes than it sends to simulate
//! a dropped download.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use skytube::error::Result;
use skytube::updater::{InstallRequest, Installer};
use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
    /// Content-Length to declare instead of the real body length.
    pub declared_length: Option<usize>,
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self { status: 200, body: body.into(), declared_length: None }
    }

    pub fn json(value: &serde_json::Value) -> Self {
        Self::ok(value.to_string())
    }

    /// Declares `declared` bytes but sends only `body`.
    pub fn truncated(body: impl Into<Vec<u8>>, declared: usize) -> Self {
        Self { status: 200, body: body.into(), declared_length: Some(declared) }
    }
}

type Routes = Arc<Mutex<HashMap<String, Route>>>;

pub struct TestServer {
    addr: SocketAddr,
    routes: Routes,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("failed to bind test server");
        let addr = listener.local_addr().expect("failed to read local addr");
        let routes: Routes = Arc::default();

        let accept_routes = routes.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(handle(socket, accept_routes.clone()));
            }
        });

        Self { addr, routes }
    }

    pub fn route(&self, path: &str, route: Route) {
        self.routes.lock().unwrap().insert(path.to_string(), route);
    }

    pub fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}{path}", self.addr)).unwrap()
    }
}

async fn handle(mut socket: TcpStream, routes: Routes) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
        if request.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let head = String::from_utf8_lossy(&request);
    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    let route = routes.lock().unwrap().get(&path).cloned().unwrap_or(Route {
        status: 404,
        body: b"not found".to_vec(),
        declared_length: None,
    });

    let length = route.declared_length.unwrap_or(route.body.len());
    let header = format!(
        "HTTP/1.1 {} X\r\nContent-Length: {length}\r\nConnection: close\r\n\r\n",
        route.status
    );

    let _ = socket.write_all(header.as_bytes()).await;
    let _ = socket.write_all(&route.body).await;
    let _ = socket.flush().await;
    let _ = socket.shutdown().await;
}

/// A URL on which nothing is listening.
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("failed to bind");
    let addr = listener.local_addr().expect("failed to read local addr");
    drop(listener);
    Url::parse(&format!("http://{addr}/manifest.json")).unwrap()
}

/// Records install requests instead of launching anything.
#[derive(Default)]
pub struct RecordingInstaller {
    pub requests: Mutex<Vec<InstallRequest>>,
}

impl Installer for RecordingInstaller {
    fn launch(&self, request: &InstallRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}

/// Deterministic package bytes.
pub fn package_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
