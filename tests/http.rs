mod common;

use common::{healthy_upstream, spawn_upstream, SharedUpstream, Upstream};
use detection_dashboard::{router, ApiClient, AppState, Config, DashboardController};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[cfg(unix)]
mod cleanup {
    use once_cell::sync::Lazy;
    use std::sync::{Mutex, Once};

    static REGISTER: Once = Once::new();
    static PIDS: Lazy<Mutex<Vec<i32>>> = Lazy::new(|| Mutex::new(Vec::new()));

    pub fn register(pid: u32) {
        if let Ok(mut pids) = PIDS.lock() {
            pids.push(pid as i32);
        }
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for pid in pids.iter().copied().filter(|pid| *pid > 0) {
                unsafe {
                    libc::kill(pid, libc::SIGTERM);
                }
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/view")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("dashboard did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_binary(api_url: &str, extra_env: &[(&str, &str)]) -> TestServer {
    let port = pick_free_port();
    let mut command = Command::new(env!("CARGO_BIN_EXE_detection_dashboard"));
    command
        .env("PORT", port.to_string())
        .env("DASHBOARD_API_URL", api_url)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    for (key, value) in extra_env {
        command.env(key, value);
    }
    let child = command.spawn().expect("failed to spawn dashboard");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

/// Serve the router in-process against `upstream`, after a page load.
async fn spawn_in_process(upstream: Upstream) -> (String, SharedUpstream) {
    let (api_url, shared) = spawn_upstream(upstream).await;
    let config = {
        let api_url = api_url.clone();
        Config::from_lookup(move |key| match key {
            "DASHBOARD_API_URL" => Some(api_url.clone()),
            _ => None,
        })
        .unwrap()
    };
    let controller = DashboardController::new(ApiClient::new(&api_url), &config);
    controller.load().await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState::new(controller));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), shared)
}

async fn get_view(client: &Client, base_url: &str) -> Value {
    client
        .get(format!("{base_url}/api/view"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_binary_loads_stats_at_start() {
    let _guard = TEST_LOCK.lock().await;
    let (api_url, _upstream) = spawn_upstream(healthy_upstream()).await;
    let server = spawn_binary(&api_url, &[]).await;
    let client = Client::new();

    let view = get_view(&client, &server.base_url).await;
    assert_eq!(view["selected_range"], "day");
    assert_eq!(view["view"]["stats_display"]["kind"], "summary");
    assert_eq!(view["view"]["stats_display"]["true_count"], 3);
    assert_eq!(view["view"]["last_interaction"], "2024-01-01");
    assert_eq!(view["view"]["stream_button"]["label"], "Start Livestream");

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("False detections %: 25.00%"));
}

#[tokio::test]
async fn http_binary_toggle_only_skips_fetches() {
    let _guard = TEST_LOCK.lock().await;
    let (api_url, _upstream) = spawn_upstream(healthy_upstream()).await;
    let server = spawn_binary(&api_url, &[("DASHBOARD_PANELS", "toggle-only")]).await;
    let client = Client::new();

    let view = get_view(&client, &server.base_url).await;
    assert_eq!(view["panels"], "toggle-only");
    assert_eq!(view["view"]["stats_display"]["kind"], "pending");
    assert_eq!(view["view"]["last_interaction"], "");
}

#[tokio::test]
async fn http_range_selection_rerenders() {
    let (base_url, _upstream) = spawn_in_process(healthy_upstream()).await;
    let client = Client::new();

    let view: Value = client
        .post(format!("{base_url}/api/range"))
        .json(&serde_json::json!({ "range": "week" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["selected_range"], "week");
    assert_eq!(view["view"]["stats_display"]["false_percent"], 75.0);

    let page = client
        .post(format!("{base_url}/range"))
        .form(&[("range", "month")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("No data available for this period."));

    let response = client
        .post(format!("{base_url}/api/range"))
        .json(&serde_json::json!({ "range": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_toggle_updates_button_after_ack() {
    let (base_url, upstream) = spawn_in_process(healthy_upstream()).await;
    let client = Client::new();

    let view: Value = client
        .post(format!("{base_url}/api/streaming/toggle"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["is_streaming"], true);
    assert_eq!(view["view"]["stream_button"]["label"], "Stop Livestream");
    assert_eq!(view["view"]["stream_button"]["background"], "red");

    let page = client
        .post(format!("{base_url}/stream/toggle"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Start Livestream"));
    assert_eq!(upstream.lock().unwrap().received, vec![true, false]);
}

#[tokio::test]
async fn http_failed_toggle_leaves_state() {
    let (base_url, upstream) = spawn_in_process(healthy_upstream()).await;
    upstream.lock().unwrap().streaming_ok = false;
    let client = Client::new();

    let response = client
        .post(format!("{base_url}/api/streaming/toggle"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let page = client
        .post(format!("{base_url}/stream/toggle"))
        .send()
        .await
        .unwrap();
    assert!(page.status().is_success());
    assert!(page.text().await.unwrap().contains("Start Livestream"));

    let view = get_view(&client, &base_url).await;
    assert_eq!(view["is_streaming"], false);
}

#[tokio::test]
async fn http_failed_stats_shows_fixed_message() {
    let (base_url, _upstream) = spawn_in_process(Upstream::default()).await;
    let client = Client::new();

    let page = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains(r#"<div id="stats-display" class="stats">Failed to load stats</div>"#));
    assert!(page.contains(r#"<span id="last-interaction" class="value">Error</span>"#));
}
