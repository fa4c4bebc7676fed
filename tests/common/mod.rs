//! In-process stand-in for the upstream catalog API.

#![allow(dead_code)]

use axum::Router;
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use drama_browser::ApiConfig;
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// How the fake upstream answers one endpoint.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16, &'static str),
    Raw(&'static str),
    Slow(Duration, Value),
}

#[derive(Default)]
struct Upstream {
    replies: Mutex<HashMap<String, Reply>>,
    hits: Mutex<Vec<(String, Option<String>)>>,
}

/// Handle to a running fake upstream.
#[derive(Clone)]
pub struct FakeUpstream {
    state: Arc<Upstream>,
    pub addr: SocketAddr,
}

impl FakeUpstream {
    pub async fn start() -> Self {
        let state = Arc::new(Upstream::default());
        let app = Router::new()
            .route("/api/dramabox/{endpoint}", get(reply).post(reply))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { state, addr }
    }

    /// Sets the reply for `/api/dramabox/{endpoint}`.
    pub fn on(&self, endpoint: &str, reply: Reply) -> &Self {
        self.state
            .replies
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), reply);
        self
    }

    /// API configuration pointing at this upstream, with fast retries.
    pub fn config(&self) -> ApiConfig {
        ApiConfig::new(format!("http://{}/api", self.addr))
            .with_backoff_step(Duration::from_millis(10))
            .with_timeout(Duration::from_secs(5))
    }

    /// Requests received so far for `endpoint`, as raw query strings.
    pub fn hits(&self, endpoint: &str) -> Vec<Option<String>> {
        self.state
            .hits
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == endpoint)
            .map(|(_, query)| query.clone())
            .collect()
    }
}

async fn reply(
    State(state): State<Arc<Upstream>>,
    Path(endpoint): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    state.hits.lock().unwrap().push((endpoint.clone(), query));
    let reply = state.replies.lock().unwrap().get(&endpoint).cloned();

    match reply {
        Some(Reply::Json(body)) => axum::Json(body).into_response(),
        Some(Reply::Status(status, body)) => {
            (StatusCode::from_u16(status).unwrap(), body).into_response()
        }
        Some(Reply::Raw(body)) => body.into_response(),
        Some(Reply::Slow(delay, body)) => {
            tokio::time::sleep(delay).await;
            axum::Json(body).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no such endpoint").into_response(),
    }
}

/// Serves `router` on an ephemeral port and returns its base URL.
pub async fn spawn_router(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
