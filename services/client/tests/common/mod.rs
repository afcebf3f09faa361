//! Shared helpers for the integration tests: an in-process backend bound to
//! an ephemeral port, and a listener that counts session-expiry events.

#![allow(dead_code)]

use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use tradevision_core::ports::UnauthorizedListener;

/// Serves `router` on 127.0.0.1 and returns its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[derive(Default)]
pub struct CountingListener {
    count: AtomicUsize,
}

impl CountingListener {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl UnauthorizedListener for CountingListener {
    fn on_unauthorized(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
