#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// What the fake detection backend answers. `None` means HTTP 500.
#[derive(Default)]
pub struct Upstream {
    pub stats: Option<Value>,
    pub interaction: Option<Value>,
    pub streaming_ok: bool,
    pub streaming_ack: Option<String>,
    pub remote_streaming: Value,
    pub received: Vec<bool>,
}

pub type SharedUpstream = Arc<Mutex<Upstream>>;

pub fn healthy_upstream() -> Upstream {
    Upstream {
        stats: Some(json!({
            "day": { "true": 3, "false": 1 },
            "week": { "true": 10, "false": 30 },
        })),
        interaction: Some(json!({
            "interaction_time": "2024-01-01",
            "time_passed": "3h",
        })),
        streaming_ok: true,
        streaming_ack: None,
        remote_streaming: Value::Null,
        received: Vec::new(),
    }
}

#[derive(Deserialize)]
struct StreamingQuery {
    value: bool,
}

fn json_or_500(value: Option<Value>) -> Response {
    match value {
        Some(value) => Json(value).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response(),
    }
}

async fn detection_stats(State(upstream): State<SharedUpstream>) -> Response {
    let value = upstream.lock().unwrap().stats.clone();
    json_or_500(value)
}

async fn interaction_time(State(upstream): State<SharedUpstream>) -> Response {
    let value = upstream.lock().unwrap().interaction.clone();
    json_or_500(value)
}

async fn set_streaming_state(
    State(upstream): State<SharedUpstream>,
    Query(query): Query<StreamingQuery>,
) -> Response {
    let mut upstream = upstream.lock().unwrap();
    upstream.received.push(query.value);
    if !upstream.streaming_ok {
        return (StatusCode::INTERNAL_SERVER_ERROR, "write failed").into_response();
    }
    match upstream.streaming_ack.clone() {
        Some(body) => body.into_response(),
        None => Json(Value::Null).into_response(),
    }
}

async fn get_streaming_state(State(upstream): State<SharedUpstream>) -> Json<Value> {
    Json(upstream.lock().unwrap().remote_streaming.clone())
}

/// Serve the fake backend on a random local port; returns its base URL.
pub async fn spawn_upstream(upstream: Upstream) -> (String, SharedUpstream) {
    let shared = Arc::new(Mutex::new(upstream));
    let app = Router::new()
        .route("/detection_stats", get(detection_stats))
        .route("/get_interaction_time", get(interaction_time))
        .route("/set_streaming_state", post(set_streaming_state))
        .route("/get_streaming_state", get(get_streaming_state))
        .with_state(Arc::clone(&shared));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream");
    let addr = listener.local_addr().expect("upstream addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("upstream server");
    });

    (format!("http://{addr}/"), shared)
}
